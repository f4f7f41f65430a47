//! Aggregated statistics derived from classified registrar records.
//!
//! Nothing in this module is edited by hand: every value is recomputed from the
//! record set by [`crate::application::services::Aggregator`].

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

/// A registrar listed in a ranking.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRegistrar {
    pub id: u32,
    pub name: String,
    pub domain_count: Option<u64>,
    pub rdap_url: Option<String>,
}

/// Statistics for one gateway provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    pub name: String,
    pub registrar_count: usize,
    pub total_domains: u64,
    /// Distinct RDAP URLs used by registrars in this category.
    pub unique_endpoints: usize,
    /// `total_domains` as a percentage of the whole dataset.
    pub market_share_percent: f64,
    /// Mean over registrars that reported a domain count.
    pub average_domains: f64,
    pub median_domains: u64,
    pub rdap_urls: Vec<String>,
    /// Registrar count per RDAP authority.
    pub endpoint_distribution: BTreeMap<String, usize>,
    pub top_registrars: Vec<RankedRegistrar>,
}

/// Registrar and domain totals for a group of categories.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct BucketTotals {
    pub registrars: usize,
    pub domains: u64,
    pub market_share_percent: f64,
}

/// Dataset-wide classification result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketReport {
    pub catalog_version: u32,
    pub total_registrars: usize,
    pub total_domains: u64,
    pub unique_rdap_urls: usize,
    /// Summaries in catalog order, serialized as a `name -> summary` map.
    #[serde(serialize_with = "serialize_categories")]
    pub categories: Vec<CategorySummary>,
    /// All classified records together.
    pub gateway: BucketTotals,
    /// Records with no category.
    pub self_hosted: BucketTotals,
    pub largest_self_hosted: Vec<RankedRegistrar>,
}

impl MarketReport {
    pub fn category(&self, name: &str) -> Option<&CategorySummary> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Categories by total domains, largest first. Ties keep catalog order.
    pub fn ranked(&self) -> Vec<&CategorySummary> {
        let mut ranked: Vec<&CategorySummary> = self.categories.iter().collect();
        ranked.sort_by(|a, b| b.total_domains.cmp(&a.total_domains));
        ranked
    }

    pub fn category_domain_total(&self) -> u64 {
        self.categories.iter().map(|c| c.total_domains).sum()
    }
}

fn serialize_categories<S>(categories: &[CategorySummary], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_map(categories.iter().map(|c| (c.name.as_str(), c)))
}

/// An RDAP authority shared by several unclassified registrars.
///
/// Produced by candidate detection only; never part of the canonical result set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateGateway {
    pub authority: String,
    pub registrar_count: usize,
    pub total_domains: u64,
    /// Largest registrars on this authority, by domain count.
    pub sample_registrars: Vec<String>,
}

/// Usage of one RDAP authority across the dataset, classified or not.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorityUsage {
    pub authority: String,
    pub registrar_count: usize,
    pub total_domains: u64,
    pub category: Option<String>,
}

impl AuthorityUsage {
    pub fn is_gateway(&self) -> bool {
        self.category.is_some()
    }
}
