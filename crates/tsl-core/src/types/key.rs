//! Key algorithm and encoding labels.

use serde::Serialize;
use std::fmt;

/// Public key algorithm family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum KeyType {
    /// RSA
    #[serde(rename = "RSA")]
    Rsa,
    /// Elliptic curve (ECDSA / ECDH keys)
    #[serde(rename = "EC")]
    Ec,
    /// Edwards curve 25519
    Ed25519,
    /// Edwards curve 448
    Ed448,
    /// Anything else
    Unknown,
}

impl KeyType {
    /// Label stored in the `key_type` column
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rsa => "RSA",
            Self::Ec => "EC",
            Self::Ed25519 => "Ed25519",
            Self::Ed448 => "Ed448",
            Self::Unknown => "Unknown",
        }
    }

    /// The encoding convention paired with this algorithm
    #[must_use]
    pub const fn format(self) -> KeyFormat {
        match self {
            Self::Rsa => KeyFormat::Spki,
            Self::Ec => KeyFormat::Sec1,
            Self::Ed25519 | Self::Ed448 => KeyFormat::Raw,
            Self::Unknown => KeyFormat::None,
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Byte encoding of a normalized public key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum KeyFormat {
    /// DER `SubjectPublicKeyInfo`
    Spki,
    /// SEC1 uncompressed point
    Sec1,
    /// Raw key bytes
    Raw,
    /// No encoding available
    None,
}

impl KeyFormat {
    /// Label stored in the `key_format` column
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Spki => "SPKI",
            Self::Sec1 => "SEC1",
            Self::Raw => "RAW",
            Self::None => "NONE",
        }
    }
}

impl fmt::Display for KeyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
