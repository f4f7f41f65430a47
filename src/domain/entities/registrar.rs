//! Registrar entity: one row of the source table.

use serde::{Deserialize, Serialize};

/// A registrar and the RDAP endpoint it publishes.
///
/// Created once per input row. `rdap_authority` and `category` start empty and are
/// filled in by the classification pass; the record is not modified afterwards
/// except by reconciliation, which only repoints `category`.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrarRecord {
    pub id: u32,
    pub name: String,
    /// Domains under management. `None` when the source did not report a count.
    pub domain_count: Option<u64>,
    pub rdap_url: Option<String>,
    /// Lower-cased host of `rdap_url`.
    pub rdap_authority: Option<String>,
    /// Gateway provider name, or `None` for unclassified/self-hosted.
    pub category: Option<String>,
    /// Free-form category/duplicate flags carried through from the source system.
    pub source_flags: Option<String>,
}

impl RegistrarRecord {
    /// Creates an unclassified record.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let record = RegistrarRecord::new(
    ///     303,
    ///     "PDR Ltd.".to_string(),
    ///     Some(4_845_099),
    ///     Some("https://rdapserver.net/".to_string()),
    /// );
    /// ```
    pub fn new(
        id: u32,
        name: String,
        domain_count: Option<u64>,
        rdap_url: Option<String>,
    ) -> Self {
        Self {
            id,
            name,
            domain_count,
            rdap_url,
            rdap_authority: None,
            category: None,
            source_flags: None,
        }
    }

    pub fn with_source_flags(mut self, flags: Option<String>) -> Self {
        self.source_flags = flags;
        self
    }

    /// Domain count with absent values treated as zero.
    pub fn domains(&self) -> u64 {
        self.domain_count.unwrap_or(0)
    }

    /// The RDAP URL trimmed, or `None` if absent or blank.
    pub fn rdap_url_trimmed(&self) -> Option<&str> {
        self.rdap_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn is_classified(&self) -> bool {
        self.category.is_some()
    }

    pub fn is_in_category(&self, name: &str) -> bool {
        self.category.as_deref() == Some(name)
    }
}
