//! Clap derive structures for the `nexperia-guest-wifi` CLI.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// nexperia-guest-wifi -- switch the guest Wi-Fi of a Nexperia V10 router
#[derive(Debug, Parser)]
#[command(
    name = "nexperia-guest-wifi",
    version,
    about = "Query or switch the guest Wi-Fi of a Nexperia V10 router",
    long_about = "Logs in to the router's web interface and reads or sets the guest Wi-Fi switch.\n\n\
        Without a STATE argument the current state is printed. With 'on' or 'off'\n\
        the switch is changed, but only if it is not already in that state."
)]
pub struct Cli {
    /// The host name or IP address of the router
    #[arg(long, short = 'i', env = "NEXPERIA_HOST")]
    pub host: Option<String>,

    /// The user name for login (Admin)
    #[arg(long, short = 'u', env = "NEXPERIA_USER")]
    pub user: Option<String>,

    /// The password for the user
    #[arg(long, short = 'p', env = "NEXPERIA_PASSWORD", hide_env_values = true)]
    pub pwd: Option<String>,

    /// Set the guest Wi-Fi state (on or off); if omitted the current state is shown
    pub state: Option<String>,

    /// Router profile from the config file
    #[arg(long, env = "NEXPERIA_PROFILE")]
    pub profile: Option<String>,

    /// Config file to read instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(long, short = 'o', default_value = "text")]
    pub output: OutputFormat,

    /// Log off from the router when done
    #[arg(long)]
    pub logout: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable line (default)
    Text,
    /// JSON object with the full switch parameters
    Json,
}
