// Router HTTP client
//
// Wraps `reqwest::Client` with the router's URL layout and the mutable
// session state (cookies + page-scoped write token). Protocol steps are
// implemented as inherent methods in `auth` and `guest_wifi`; this module
// only covers construction and transport mechanics.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, trace};
use url::Url;

use crate::auth::Credentials;
use crate::error::Error;
use crate::token::WriteToken;
use crate::transport::TransportConfig;

pub(crate) const LOGIN_TOKEN_PATH: &str =
    "/function_module/login_module/login_page/logintoken_lua.lua";
pub(crate) const PAGE_LOADER_PATH: &str = "/getpage.lua";
pub(crate) const GUEST_WIFI_PAGE: &str = "Localnet_Wlan_GuestWiFi_t.lp";
pub(crate) const GUEST_WIFI_PAGE_ID: &str = "123";
pub(crate) const GUEST_WIFI_DATA_PATH: &str = "/common_page/Localnet_Wlan_GuestWiFiOnOff_lua.lua";

/// The router's web interface root, always plain HTTP unless the caller
/// spells out a scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterEndpoint {
    url: Url,
}

impl RouterEndpoint {
    /// Build an endpoint from a host name, IP address or `host:port`.
    pub fn new(host: &str) -> Result<Self, Error> {
        let host = host.trim();
        let invalid = || Error::InvalidHost {
            host: host.to_owned(),
        };
        if host.is_empty() {
            return Err(invalid());
        }

        let raw = if host.contains("://") {
            host.to_owned()
        } else {
            format!("http://{host}/")
        };
        let url = Url::parse(&raw).map_err(|_| invalid())?;
        if url.host_str().is_none_or(str::is_empty) {
            return Err(invalid());
        }
        Ok(Self { url })
    }

    /// The root URL (`http://host/`).
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub(crate) fn join(&self, path: &str) -> Result<Url, Error> {
        Ok(self.url.join(path)?)
    }
}

impl FromStr for RouterEndpoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for RouterEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.url, f)
    }
}

/// One authenticated conversation with the router.
///
/// Owns its own cookie jar; a new login builds a new `Session`.
#[derive(Debug)]
pub(crate) struct Session {
    http: reqwest::Client,
    /// Token scraped from the last guest Wi-Fi page visit. Consumed by the
    /// next write.
    pub(crate) write_token: Option<WriteToken>,
}

impl Session {
    pub(crate) fn new(transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.clone().with_cookie_jar().build_client()?;
        Ok(Self {
            http,
            write_token: None,
        })
    }

    /// Send a GET and return the response without reading the body.
    pub(crate) async fn get(&self, url: Url) -> Result<reqwest::Response, Error> {
        debug!("GET {url}");
        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;
        trace!(status = %resp.status(), "response");
        Ok(resp)
    }

    /// Send a GET and read the body as text.
    pub(crate) async fn get_text(&self, url: Url) -> Result<String, Error> {
        let resp = self.get(url).await?;
        resp.text().await.map_err(Error::Transport)
    }

    /// Send a form-encoded POST and read the body as text.
    pub(crate) async fn post_form(&self, url: Url, form: &[(&str, &str)]) -> Result<String, Error> {
        debug!("POST {url}");
        let resp = self
            .http
            .post(url)
            .form(form)
            .send()
            .await
            .map_err(Error::Transport)?;
        trace!(status = %resp.status(), "response");
        resp.text().await.map_err(Error::Transport)
    }
}

/// Stateful client for one router.
///
/// Holds the credentials and, once logged in, the session cookies and the
/// most recent write token. All operations take `&mut self`: the write token
/// is only valid for the page visit that produced it, so interleaving two
/// callers on one client would break it. Wrap the client in a mutex if it
/// has to be shared.
#[derive(Debug)]
pub struct RouterClient {
    endpoint: RouterEndpoint,
    credentials: Credentials,
    transport: TransportConfig,
    pub(crate) session: Option<Session>,
}

impl RouterClient {
    /// Create a client. No network traffic happens until the first call.
    pub fn new(endpoint: RouterEndpoint, credentials: Credentials, transport: TransportConfig) -> Self {
        Self {
            endpoint,
            credentials,
            transport,
            session: None,
        }
    }

    pub fn endpoint(&self) -> &RouterEndpoint {
        &self.endpoint
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn transport(&self) -> &TransportConfig {
        &self.transport
    }

    /// Whether a login handshake has completed and not been logged out.
    pub fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }

    /// The write token from the most recent guest Wi-Fi read, if it has not
    /// been used yet.
    pub fn write_token(&self) -> Option<&WriteToken> {
        self.session.as_ref()?.write_token.as_ref()
    }

    /// The live session, logging in first if there is none.
    pub(crate) async fn session_mut(&mut self) -> Result<&mut Session, Error> {
        let session = match self.session.take() {
            Some(session) => session,
            None => self.handshake_session().await?,
        };
        Ok(self.session.insert(session))
    }

    async fn handshake_session(&mut self) -> Result<Session, Error> {
        debug!("no live session, logging in");
        self.login().await?;
        self.session.take().ok_or(Error::NotLoggedIn)
    }
}
