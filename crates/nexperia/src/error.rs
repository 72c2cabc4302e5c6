//! CLI error types with miette diagnostics.
//!
//! Maps `nexperia_api::Error` and `ConfigError` into user-facing errors
//! with exit codes.

use miette::Diagnostic;
use thiserror::Error;

use nexperia_config::ConfigError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONFIG: i32 = 3;
    pub const PROTOCOL: i32 = 4;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Usage ────────────────────────────────────────────────────────

    #[error("Invalid state: '{value}'. Use 'On' or 'Off'")]
    #[diagnostic(code(nexperia::invalid_state))]
    InvalidState { value: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(
        code(nexperia::config),
        help("Pass --host, --user and --pwd, or set them in a profile.")
    )]
    Config(#[from] ConfigError),

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(nexperia::validation))]
    Validation { field: String, reason: String },

    // ── Router ───────────────────────────────────────────────────────

    #[error("Could not connect to router at {host}")]
    #[diagnostic(
        code(nexperia::connection_failed),
        help("Check that the router is reachable over plain HTTP and the host is correct.")
    )]
    ConnectionFailed {
        host: String,
        #[source]
        source: nexperia_api::Error,
    },

    #[error("Router at {host} returned an unexpected response")]
    #[diagnostic(
        code(nexperia::protocol),
        help(
            "A rejected user name or password looks the same as an unsupported\n\
             firmware version. Verify the credentials first."
        )
    )]
    Protocol {
        host: String,
        #[source]
        source: nexperia_api::Error,
    },

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(nexperia::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Wrap a router client error, keeping the host for the message.
    pub fn from_api(err: nexperia_api::Error, host: &str) -> Self {
        let host = host.to_owned();
        match err {
            nexperia_api::Error::InvalidHost { host } => Self::Validation {
                field: "host".into(),
                reason: format!("'{host}' is not a valid host name or address"),
            },
            err if err.is_transport() => Self::ConnectionFailed { host, source: err },
            err => Self::Protocol { host, source: err },
        }
    }

    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidState { .. } => exit_code::USAGE,
            Self::Config(_) | Self::Validation { .. } => exit_code::CONFIG,
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Protocol { .. } => exit_code::PROTOCOL,
            Self::Io(_) | Self::Json(_) => exit_code::GENERAL,
        }
    }

    /// Errors printed as a single plain line instead of a diagnostic report.
    pub fn is_plain(&self) -> bool {
        matches!(
            self,
            Self::InvalidState { .. } | Self::Config(ConfigError::Missing { .. })
        )
    }
}
