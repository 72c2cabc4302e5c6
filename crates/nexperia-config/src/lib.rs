//! Configuration for the guest Wi-Fi CLI.
//!
//! An optional TOML file holds named router profiles (host, user name,
//! timeout). Passwords never live in the file; they come from the command
//! line or the environment for the duration of one run. Command-line values
//! always win over the profile.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use nexperia_api::{Credentials, RouterClient, RouterEndpoint, TransportConfig};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required value was supplied neither on the command line nor by
    /// the profile.
    #[error("no {field} specified")]
    Missing { field: &'static str },

    #[error("profile '{name}' not found in configuration")]
    ProfileNotFound { name: String, available: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named router profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

/// A named router.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Host name or IP address of the router (e.g. "192.168.2.254").
    pub host: Option<String>,

    /// User name for the web interface.
    pub username: Option<String>,

    /// Override the default timeout.
    pub timeout: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("", "", "nexperia-guest-wifi").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("nexperia-guest-wifi");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the config from `path` (or the default location) plus
/// `NEXPERIA_`-prefixed environment variables. A missing file yields the
/// defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("NEXPERIA_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Resolution ──────────────────────────────────────────────────────

/// Values given on the command line (or through their env fallbacks).
#[derive(Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub host: Option<String>,
    pub username: Option<String>,
    pub password: Option<SecretString>,
    pub timeout: Option<u64>,
}

/// Everything needed to talk to one router.
#[derive(Debug)]
pub struct ClientConfig {
    pub host: String,
    pub username: String,
    pub password: SecretString,
    pub timeout: Duration,
}

impl ClientConfig {
    /// Build a logged-out client. No network traffic.
    pub fn build_client(&self) -> Result<RouterClient, nexperia_api::Error> {
        let endpoint = RouterEndpoint::new(&self.host)?;
        let credentials = Credentials::new(self.username.clone(), self.password.clone());
        Ok(RouterClient::new(
            endpoint,
            credentials,
            TransportConfig::with_timeout(self.timeout),
        ))
    }
}

/// Merge command-line values over the selected profile.
///
/// Checks host, then user name, then password, and reports the first one
/// missing. Empty strings count as missing.
pub fn resolve(overrides: &Overrides, config: &Config) -> Result<ClientConfig, ConfigError> {
    let profile = select_profile(overrides, config)?;

    let host = non_empty(overrides.host.as_deref())
        .or_else(|| non_empty(profile.host.as_deref()))
        .ok_or(ConfigError::Missing { field: "host" })?;

    let username = non_empty(overrides.username.as_deref())
        .or_else(|| non_empty(profile.username.as_deref()))
        .ok_or(ConfigError::Missing { field: "user-name" })?;

    let password = overrides
        .password
        .clone()
        .filter(|p| !p.expose_secret().is_empty())
        .ok_or(ConfigError::Missing { field: "password" })?;

    let timeout = overrides
        .timeout
        .or(profile.timeout)
        .unwrap_or(config.defaults.timeout);

    Ok(ClientConfig {
        host: host.to_owned(),
        username: username.to_owned(),
        password,
        timeout: Duration::from_secs(timeout),
    })
}

fn select_profile(overrides: &Overrides, config: &Config) -> Result<Profile, ConfigError> {
    if let Some(ref name) = overrides.profile {
        return config
            .profiles
            .get(name)
            .cloned()
            .ok_or_else(|| ConfigError::ProfileNotFound {
                name: name.clone(),
                available: available_profiles(config),
            });
    }

    Ok(config
        .default_profile
        .as_ref()
        .and_then(|name| config.profiles.get(name))
        .cloned()
        .unwrap_or_default())
}

fn available_profiles(config: &Config) -> String {
    let mut names: Vec<&str> = config.profiles.keys().map(String::as_str).collect();
    names.sort_unstable();
    if names.is_empty() {
        "(none)".into()
    } else {
        names.join(", ")
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
