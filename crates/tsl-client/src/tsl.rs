//! Trust-service status list traversal.
//!
//! Only the parts of the ETSI TSL schema the collector needs are read:
//! each `TrustServiceProvider`'s English name and trade name, and the
//! French-language information URI pointing at its certificate container.

use roxmltree::{Document, Node};
use tracing::debug;
use tsl_core::{Provider, UNKNOWN_PROVIDER};

use crate::error::{ClientError, Result};

/// XML namespaces used to address trust-list elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Namespaces {
    /// ETSI TSL namespace
    pub tsl: &'static str,
    /// W3C `xml:` namespace, for `xml:lang`
    pub xml: &'static str,
}

/// Namespaces of ETSI TS 102 231 v2 / TS 119 612 trust lists.
pub const TSL_NAMESPACES: Namespaces = Namespaces {
    tsl: "http://uri.etsi.org/02231/v2#",
    xml: "http://www.w3.org/XML/1998/namespace",
};

const NAME_PATH: &[&str] = &["TSPName", "Name"];
const TRADE_NAME_PATH: &[&str] = &["TSPTradeName", "Name"];
const URI_PATH: &[&str] = &["TSPInformation", "TSPInformationURI", "URI"];

/// One `TrustServiceProvider` element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrustListEntry {
    /// English provider name
    pub name: Option<String>,
    /// English trade name
    pub trade_name: Option<String>,
    /// French information URI, where the certificate container lives
    pub information_uri: Option<String>,
}

impl TrustListEntry {
    /// Provider name, or the placeholder used when the list has none.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNKNOWN_PROVIDER)
    }

    /// Build the stored provider identity for a downloaded container.
    #[must_use]
    pub fn to_provider(&self, original_filename: impl Into<String>) -> Provider {
        Provider::new(
            self.display_name(),
            self.trade_name.clone(),
            original_filename,
        )
    }
}

/// The providers listed in a trust list, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrustList {
    /// Provider entries
    pub entries: Vec<TrustListEntry>,
}

impl TrustList {
    /// Parse a trust-list document using the standard TSL namespaces.
    pub fn parse(xml: &str) -> Result<Self> {
        Self::parse_with(xml, &TSL_NAMESPACES)
    }

    /// Parse a trust-list document with explicit namespaces.
    pub fn parse_with(xml: &str, ns: &Namespaces) -> Result<Self> {
        let doc = Document::parse(xml.trim_start_matches('\u{feff}'))
            .map_err(|e| ClientError::XmlParse(e.to_string()))?;

        let entries: Vec<TrustListEntry> = doc
            .descendants()
            .filter(|n| n.has_tag_name((ns.tsl, "TrustServiceProvider")))
            .map(|provider| TrustListEntry {
                name: localized_text(provider, ns, NAME_PATH, "en"),
                trade_name: localized_text(provider, ns, TRADE_NAME_PATH, "en"),
                information_uri: localized_text(provider, ns, URI_PATH, "fr"),
            })
            .collect();

        debug!(providers = entries.len(), "parsed trust list");
        Ok(Self { entries })
    }

    /// Number of providers
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list names no provider
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Text of the first `path` match below `node` whose last step has `xml:lang == lang`.
///
/// The first step matches any descendant, later steps match direct children.
fn localized_text(node: Node<'_, '_>, ns: &Namespaces, path: &[&str], lang: &str) -> Option<String> {
    let (first, rest) = path.split_first()?;
    node.descendants()
        .skip(1)
        .filter(|n| n.has_tag_name((ns.tsl, *first)))
        .find_map(|start| descend(start, ns, rest, lang))
        .and_then(|n| n.text())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

fn descend<'a, 'input>(
    node: Node<'a, 'input>,
    ns: &Namespaces,
    path: &[&str],
    lang: &str,
) -> Option<Node<'a, 'input>> {
    match path.split_first() {
        None => (node.attribute((ns.xml, "lang")) == Some(lang)).then_some(node),
        Some((step, rest)) => node
            .children()
            .filter(|c| c.has_tag_name((ns.tsl, *step)))
            .find_map(|c| descend(c, ns, rest, lang)),
    }
}
