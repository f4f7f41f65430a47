//! Per-provider market statistics.

use std::collections::{BTreeMap, HashSet};

use tracing::{debug, warn};

use crate::domain::entities::{
    BucketTotals, CategorySummary, MarketReport, PatternCatalog, RankedRegistrar, RegistrarRecord,
};
use crate::utils::percent::{mean, percent_of, upper_median};

pub const DEFAULT_TOP_N: usize = 5;
pub const DEFAULT_SELF_HOSTED_TOP_N: usize = 10;

/// Computes a [`MarketReport`] from classified records.
///
/// Output is a pure function of the records (including their order) and the
/// catalog, so running it twice on the same input yields identical reports.
#[derive(Debug, Clone, Copy)]
pub struct Aggregator {
    top_n: usize,
    self_hosted_top_n: usize,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_N, DEFAULT_SELF_HOSTED_TOP_N)
    }
}

impl Aggregator {
    pub fn new(top_n: usize, self_hosted_top_n: usize) -> Self {
        Self {
            top_n,
            self_hosted_top_n,
        }
    }

    /// Aggregates records by category.
    ///
    /// Summaries follow catalog order and only providers with at least one record
    /// appear. Categories found on records but missing from the catalog are
    /// appended after the catalog providers so that every classified domain is
    /// accounted for.
    ///
    /// Market shares are relative to the domain total of the whole dataset; when
    /// that total is zero every share is reported as `0.0`.
    pub fn aggregate(&self, records: &[RegistrarRecord], catalog: &PatternCatalog) -> MarketReport {
        let total_domains: u64 = records.iter().map(RegistrarRecord::domains).sum();

        let unique_rdap_urls = records
            .iter()
            .filter_map(RegistrarRecord::rdap_url_trimmed)
            .collect::<HashSet<_>>()
            .len();

        let mut names: Vec<&str> = catalog.provider_names().collect();
        for record in records {
            if let Some(category) = record.category.as_deref()
                && !names.contains(&category)
            {
                warn!(category, "Category is not in the pattern catalog");
                names.push(category);
            }
        }

        let categories: Vec<CategorySummary> = names
            .into_iter()
            .filter_map(|name| self.summarize(name, records, total_domains))
            .collect();

        let gateway_domains: u64 = categories.iter().map(|c| c.total_domains).sum();
        let gateway_registrars: usize = categories.iter().map(|c| c.registrar_count).sum();
        let self_hosted_domains = total_domains - gateway_domains;

        let self_hosted_records = records.iter().filter(|r| !r.is_classified());
        let largest_self_hosted = top_by_domains(self_hosted_records, self.self_hosted_top_n)
            .into_iter()
            .map(ranked)
            .collect();

        debug!(
            categories = categories.len(),
            total_domains, gateway_domains, "Aggregation complete"
        );

        MarketReport {
            catalog_version: catalog.version(),
            total_registrars: records.len(),
            total_domains,
            unique_rdap_urls,
            categories,
            gateway: BucketTotals {
                registrars: gateway_registrars,
                domains: gateway_domains,
                market_share_percent: percent_of(gateway_domains, total_domains),
            },
            self_hosted: BucketTotals {
                registrars: records.len() - gateway_registrars,
                domains: self_hosted_domains,
                market_share_percent: percent_of(self_hosted_domains, total_domains),
            },
            largest_self_hosted,
        }
    }

    fn summarize(
        &self,
        name: &str,
        records: &[RegistrarRecord],
        dataset_domains: u64,
    ) -> Option<CategorySummary> {
        let members: Vec<&RegistrarRecord> =
            records.iter().filter(|r| r.is_in_category(name)).collect();
        if members.is_empty() {
            return None;
        }

        let total_domains: u64 = members.iter().map(|r| r.domains()).sum();
        let known_counts: Vec<u64> = members.iter().filter_map(|r| r.domain_count).collect();

        let mut rdap_urls: Vec<String> = Vec::new();
        for url in members.iter().filter_map(|r| r.rdap_url_trimmed()) {
            if !rdap_urls.iter().any(|u| u == url) {
                rdap_urls.push(url.to_string());
            }
        }

        let mut endpoint_distribution = BTreeMap::new();
        for authority in members.iter().filter_map(|r| r.rdap_authority.as_ref()) {
            *endpoint_distribution.entry(authority.clone()).or_insert(0) += 1;
        }

        Some(CategorySummary {
            name: name.to_string(),
            registrar_count: members.len(),
            total_domains,
            unique_endpoints: rdap_urls.len(),
            market_share_percent: percent_of(total_domains, dataset_domains),
            average_domains: mean(&known_counts),
            median_domains: upper_median(&known_counts),
            rdap_urls,
            endpoint_distribution,
            top_registrars: top_by_domains(members.iter().copied(), self.top_n)
                .into_iter()
                .map(ranked)
                .collect(),
        })
    }
}

/// Returns the `n` records with the most domains.
///
/// Records without a count rank as zero. The sort is stable: equal counts keep
/// input order.
pub(crate) fn top_by_domains<'r>(
    records: impl IntoIterator<Item = &'r RegistrarRecord>,
    n: usize,
) -> Vec<&'r RegistrarRecord> {
    let mut sorted: Vec<&RegistrarRecord> = records.into_iter().collect();
    sorted.sort_by(|a, b| b.domains().cmp(&a.domains()));
    sorted.truncate(n);
    sorted
}

fn ranked(record: &RegistrarRecord) -> RankedRegistrar {
    RankedRegistrar {
        id: record.id,
        name: record.name.clone(),
        domain_count: record.domain_count,
        rdap_url: record.rdap_url_trimmed().map(str::to_string),
    }
}
