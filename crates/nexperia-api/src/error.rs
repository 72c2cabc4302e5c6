use thiserror::Error;

/// Top-level error type for the `nexperia-api` crate.
///
/// Two families matter to callers: transport failures (the router could
/// not be reached) and protocol failures (the router answered, but not with
/// the page we expected to scrape). A wrong password is only ever seen as a
/// protocol failure further down the line, because the login POST itself
/// reports nothing useful.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The router host was empty or could not be turned into a URL.
    #[error("Invalid router host '{host}'")]
    InvalidHost { host: String },

    /// The underlying HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),

    // ── Login handshake ─────────────────────────────────────────────
    /// The login-token page carried no numeric challenge.
    #[error("Unexpected login page format: no session token found")]
    LoginTokenNotFound,

    /// An operation needed a live session and there was none.
    #[error("No live router session")]
    NotLoggedIn,

    // ── Page token ──────────────────────────────────────────────────
    /// The guest Wi-Fi page did not contain a `_sessionTmpToken` assignment.
    #[error("Guest Wi-Fi page did not contain a session token")]
    WriteTokenNotFound,

    /// The `_sessionTmpToken` payload contained a unit that is not hex.
    #[error("Malformed session token unit '{unit}' at position {position}")]
    MalformedWriteToken { unit: String, position: usize },

    // ── Settings fragment ───────────────────────────────────────────
    /// The settings endpoint did not return well-formed XML.
    #[error("Malformed settings XML: {message}")]
    MalformedXml { message: String, body: String },

    /// The XML parsed, but the guest Wi-Fi switch object was absent.
    #[error("Guest Wi-Fi element not found")]
    GuestWifiElementNotFound,

    /// `ParaName` and `ParaValue` lists could not be paired up.
    #[error("Parameter list mismatch: {names} names, {values} values")]
    ParameterMismatch { names: usize, values: usize },

    /// A `ParaValue` could not be read as an integer.
    #[error("Parameter '{name}' has non-integer value '{value}'")]
    InvalidParameterValue { name: String, value: String },

    /// A parameter the caller relies on is not in the fragment.
    #[error("Parameter '{name}' missing from guest Wi-Fi settings")]
    MissingParameter { name: String },
}

impl Error {
    /// Returns `true` if the router could not be reached or the request
    /// never produced a response.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::InvalidUrl(_) | Self::InvalidHost { .. } | Self::HttpClient(_)
        )
    }

    /// Returns `true` if the router answered with something we could not
    /// scrape. This covers bad credentials, an expired session and
    /// firmware changes alike.
    pub fn is_protocol(&self) -> bool {
        !self.is_transport()
    }
}
