mod cli;
mod error;
mod output;
mod state;

use std::io::Write;

use clap::Parser;
use secrecy::SecretString;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use nexperia_api::{GuestWifiSettings, RouterClient, WriteOutcome};
use nexperia_config::{Overrides, load_config, resolve};

use crate::cli::Cli;
use crate::error::CliError;
use crate::state::{Action, parse_action};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        if matches!(err, CliError::InvalidState { .. }) {
            eprintln!("{err}");
        } else if err.is_plain() {
            eprintln!("error: {err}");
        } else {
            eprintln!("{:?}", miette::Report::new(err));
        }
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    // Everything up to the client build happens before any network traffic.
    let config = load_config(cli.config.as_deref())?;
    let overrides = Overrides {
        profile: cli.profile,
        host: cli.host,
        username: cli.user,
        password: cli.pwd.map(SecretString::from),
        timeout: cli.timeout,
    };
    let resolved = resolve(&overrides, &config)?;
    let action = parse_action(cli.state.as_deref())?;

    let mut client = resolved
        .build_client()
        .map_err(|e| CliError::from_api(e, &resolved.host))?;

    tracing::debug!(host = %resolved.host, ?action, "dispatching");
    let result = execute(&mut client, action).await;

    if cli.logout {
        if let Err(e) = client.logout().await {
            warn!(error = %e, "logout failed");
        }
    }

    let report = result.map_err(|e| CliError::from_api(e, &resolved.host))?;
    let rendered = match report {
        Report::Status { enabled, settings } => {
            Some(output::render_status(cli.output, enabled, &settings)?)
        }
        Report::Change { enabled, outcome } => {
            output::render_change(cli.output, enabled, outcome)?
        }
    };
    if let Some(line) = rendered {
        writeln!(std::io::stdout().lock(), "{line}")?;
    }
    Ok(())
}

enum Report {
    Status {
        enabled: bool,
        settings: GuestWifiSettings,
    },
    Change {
        enabled: bool,
        outcome: WriteOutcome,
    },
}

async fn execute(client: &mut RouterClient, action: Action) -> Result<Report, nexperia_api::Error> {
    match action {
        Action::Show => {
            let settings = client.guest_wifi_settings().await?;
            let enabled = settings.enabled()?;
            Ok(Report::Status { enabled, settings })
        }
        Action::Set(enable) => {
            let outcome = client.set_guest_wifi_enable(enable).await?;
            Ok(Report::Change {
                enabled: enable,
                outcome,
            })
        }
    }
}
