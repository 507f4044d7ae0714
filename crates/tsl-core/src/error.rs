use thiserror::Error;

/// Result type alias for certificate processing
pub type Result<T> = std::result::Result<T, TslError>;

/// Errors that can occur while turning a certificate into a stored record
#[derive(Error, Debug)]
pub enum TslError {
    /// The DER structure could not be decoded as an X.509 certificate
    #[error("certificate parse error: {reason}")]
    CertificateParse {
        /// Decoder message
        reason: String,
    },

    /// The public key algorithm is none of RSA, EC, Ed25519 or Ed448
    #[error("unsupported key type: {algorithm}")]
    UnsupportedKeyType {
        /// Algorithm OID or curve description
        algorithm: String,
    },

    /// The key is of a supported algorithm but its encoding is unusable
    #[error("invalid public key: {0}")]
    InvalidKey(String),

    /// Subject or issuer carries no Common Name attribute
    #[error("missing common name in {field}")]
    MissingCommonName {
        /// `subject` or `issuer`
        field: &'static str,
    },

    /// A validity timestamp falls outside the representable range
    #[error("invalid validity timestamp: {0}")]
    InvalidTimestamp(i64),
}

impl TslError {
    pub(crate) fn parse(reason: impl std::fmt::Display) -> Self {
        Self::CertificateParse {
            reason: reason.to_string(),
        }
    }
}
