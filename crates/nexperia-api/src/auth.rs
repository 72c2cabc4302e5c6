// Login handshake
//
// Three requests, in this order, or the router refuses the session:
// seed cookies from `/`, fetch the numeric challenge, then POST the
// username with SHA-256(password || challenge). The router answers the
// POST the same way whether the password was right or not.

use std::sync::LazyLock;

use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use tracing::{debug, trace};

use crate::client::{LOGIN_TOKEN_PATH, RouterClient, Session};
use crate::error::Error;

static SESSION_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("session token pattern is valid"));

/// Username and password for the router's web interface.
///
/// Held in memory for the lifetime of the client only.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<SecretString>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Numeric challenge scraped from the login-token page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Pull the first run of decimal digits out of the login-token page.
pub fn extract_session_token(body: &str) -> Result<SessionToken, Error> {
    SESSION_TOKEN_RE
        .find(body)
        .map(|m| SessionToken(m.as_str().to_owned()))
        .ok_or(Error::LoginTokenNotFound)
}

/// Lowercase hex SHA-256 of `password || token`, as sent in the login form.
pub fn login_hash(password: &SecretString, token: &SessionToken) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.expose_secret().as_bytes());
    hasher.update(token.as_str().as_bytes());
    hex::encode(hasher.finalize())
}

impl RouterClient {
    /// Run the full login handshake and replace any existing session.
    ///
    /// Success here only means the router answered all three requests.
    /// Rejected credentials surface later, when the guest Wi-Fi pages
    /// fail to scrape.
    pub async fn login(&mut self) -> Result<(), Error> {
        self.session = None;
        let session = self.handshake().await?;
        self.session = Some(session);
        Ok(())
    }

    /// End the current session with the router's log-off action.
    ///
    /// The local session is dropped even if the request fails. Without a
    /// live session this does nothing.
    pub async fn logout(&mut self) -> Result<(), Error> {
        let Some(session) = self.session.take() else {
            debug!("no live session, logout skipped");
            return Ok(());
        };

        let url = self.endpoint().url().clone();
        debug!("logging out at {url}");

        session
            .post_form(
                url,
                &[
                    ("IF_LogOff", "1"),
                    ("IF_LanguageSwitch", ""),
                    ("IF_ModeSwitch", ""),
                ],
            )
            .await?;

        debug!("logout complete");
        Ok(())
    }

    async fn handshake(&self) -> Result<Session, Error> {
        let session = Session::new(self.transport())?;
        let root = self.endpoint().url().clone();

        debug!("login stage 1: seeding cookies from {root}");
        session.get(root.clone()).await?;

        let token_url = self.endpoint().join(LOGIN_TOKEN_PATH)?;
        debug!("login stage 2: fetching challenge from {token_url}");
        let body = session.get_text(token_url).await?;
        let token = extract_session_token(&body)?;
        trace!(token_len = token.as_str().len(), "session token scraped");

        let credentials = self.credentials();
        let hash = login_hash(&credentials.password, &token);

        debug!(user = %credentials.username, "login stage 3: posting credentials");
        session
            .post_form(
                root,
                &[
                    ("Username", credentials.username.as_str()),
                    ("Password", hash.as_str()),
                    ("action", "login"),
                ],
            )
            .await?;

        debug!("login handshake complete");
        Ok(session)
    }
}
