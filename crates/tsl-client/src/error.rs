use thiserror::Error;

/// Result type alias for trust-list client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors raised while fetching or reading a trust list
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed before a response arrived
    #[error("HTTP request to {url} failed: {message}")]
    Http {
        /// Requested URL
        url: String,
        /// Transport error
        message: String,
    },

    /// Server answered with a non-success status
    #[error("{url} returned HTTP {code}")]
    Status {
        /// Requested URL
        url: String,
        /// HTTP status code
        code: u16,
    },

    /// URL could not be parsed or has no file name
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Trust-list document is not well-formed XML
    #[error("trust list XML error: {0}")]
    XmlParse(String),

    /// HTTP client could not be constructed
    #[error("client configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Returns true if the error came from retrieving a document, as opposed to reading it
    #[must_use]
    pub const fn is_fetch_error(&self) -> bool {
        matches!(self, Self::Http { .. } | Self::Status { .. })
    }

    /// Returns the HTTP status code if the server answered with an error
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { code, .. } => Some(*code),
            _ => None,
        }
    }
}
