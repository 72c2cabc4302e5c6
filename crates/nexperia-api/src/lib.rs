// nexperia-api: session client for the guest Wi-Fi switch of Nexperia V10 routers

pub mod auth;
pub mod client;
pub mod error;
pub mod guest_wifi;
pub mod token;
pub mod transport;

pub use auth::{Credentials, SessionToken, extract_session_token, login_hash};
pub use client::{RouterClient, RouterEndpoint};
pub use error::Error;
pub use guest_wifi::{GuestWifiSettings, WriteOutcome, parse_guest_wifi_settings};
pub use token::{WriteToken, decode_write_token, extract_write_token};
pub use transport::TransportConfig;
