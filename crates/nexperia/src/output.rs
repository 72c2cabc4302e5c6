//! Output formatting: one text line or a JSON object.

use serde::Serialize;

use nexperia_api::{GuestWifiSettings, WriteOutcome};

use crate::cli::OutputFormat;
use crate::error::CliError;

#[derive(Serialize)]
struct StatusReport<'a> {
    enabled: bool,
    settings: &'a GuestWifiSettings,
}

#[derive(Serialize)]
struct ChangeReport {
    enabled: bool,
    changed: bool,
}

/// Render the current state. Text output is `Guest-Wifi is: on|off`.
pub fn render_status(
    format: OutputFormat,
    enabled: bool,
    settings: &GuestWifiSettings,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Text => Ok(format!("Guest-Wifi is: {}", on_off(enabled))),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&StatusReport {
            enabled,
            settings,
        })?),
    }
}

/// Render the result of a set. Text output stays silent.
pub fn render_change(
    format: OutputFormat,
    enabled: bool,
    outcome: WriteOutcome,
) -> Result<Option<String>, CliError> {
    match format {
        OutputFormat::Text => Ok(None),
        OutputFormat::Json => Ok(Some(serde_json::to_string_pretty(&ChangeReport {
            enabled,
            changed: outcome == WriteOutcome::Applied,
        })?)),
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}
