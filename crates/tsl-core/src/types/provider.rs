use serde::Serialize;

/// Name used when the trust list carries no English provider name.
pub const UNKNOWN_PROVIDER: &str = "unknown_provider";

/// A trust-service provider as listed in the trust list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Provider {
    /// English-language provider name
    pub name: String,
    /// English-language trade name, when listed
    pub trade_name: Option<String>,
    /// File name of the downloaded certificate container
    pub original_filename: String,
}

impl Provider {
    /// Create a provider entry
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        trade_name: Option<String>,
        original_filename: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            trade_name,
            original_filename: original_filename.into(),
        }
    }
}
