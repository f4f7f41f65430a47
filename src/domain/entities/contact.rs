//! Registrar contact metadata returned by a registrar directory.

use serde::{Deserialize, Serialize};

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PostalAddress {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

/// Contact details for a registrar, keyed by registrar identifier.
///
/// Every field except `id` is optional; directories commonly know only part of it.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RegistrarContact {
    pub id: u32,
    pub name: Option<String>,
    pub website: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub abuse_email: Option<String>,
    pub address: Option<PostalAddress>,
}

/// A registrar joined with whatever the directory knew about it.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedRegistrar {
    pub id: u32,
    pub name: String,
    pub category: Option<String>,
    pub domain_count: Option<u64>,
    pub contact: Option<RegistrarContact>,
    /// Set when the lookup failed; the record is still reported without contact data.
    pub lookup_error: Option<String>,
}

impl EnrichedRegistrar {
    pub fn is_enriched(&self) -> bool {
        self.contact.is_some()
    }
}
