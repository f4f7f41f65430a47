//! Detection of unclassified RDAP authorities shared by several registrars.
//!
//! A registrar that self-hosts RDAP normally has an authority of its own. When
//! several registrars point at the same authority and none of them is attributed
//! to a known provider, that authority is a candidate for an undiscovered gateway.

use std::collections::HashMap;

use tracing::debug;

use crate::application::services::aggregator::top_by_domains;
use crate::domain::entities::{AuthorityUsage, CandidateGateway, RegistrarRecord};
use crate::utils::authority::extract_authority;

/// Number of registrar names attached to each candidate.
pub const SAMPLE_SIZE: usize = 3;

struct AuthorityGroup<'r> {
    authority: String,
    members: Vec<&'r RegistrarRecord>,
}

impl AuthorityGroup<'_> {
    fn total_domains(&self) -> u64 {
        self.members.iter().map(|r| r.domains()).sum()
    }

    fn first_category(&self) -> Option<&str> {
        self.members.iter().find_map(|r| r.category.as_deref())
    }
}

/// Finds candidate gateways among classified records.
pub struct CandidateDetector {
    min_registrars: usize,
}

impl CandidateDetector {
    /// Creates a detector reporting authorities used by at least `min_registrars`
    /// registrars. Values below 1 are treated as 1.
    pub fn new(min_registrars: usize) -> Self {
        Self {
            min_registrars: min_registrars.max(1),
        }
    }

    pub fn min_registrars(&self) -> usize {
        self.min_registrars
    }

    /// Returns candidate gateways, largest aggregate domain count first.
    ///
    /// An authority is excluded as soon as any one of its records carries a
    /// category, so a known provider's endpoint is never reported twice. Ties are
    /// broken by authority name.
    pub fn find_candidates(&self, records: &[RegistrarRecord]) -> Vec<CandidateGateway> {
        let mut candidates: Vec<CandidateGateway> = group_by_authority(records)
            .into_iter()
            .filter(|g| g.members.len() >= self.min_registrars)
            .filter(|g| g.first_category().is_none())
            .map(|g| CandidateGateway {
                registrar_count: g.members.len(),
                total_domains: g.total_domains(),
                sample_registrars: top_by_domains(g.members.iter().copied(), SAMPLE_SIZE)
                    .into_iter()
                    .map(|r| r.name.clone())
                    .collect(),
                authority: g.authority,
            })
            .collect();

        candidates.sort_by(|a, b| {
            b.total_domains
                .cmp(&a.total_domains)
                .then_with(|| a.authority.cmp(&b.authority))
        });

        debug!(
            count = candidates.len(),
            min_registrars = self.min_registrars,
            "Candidate gateways detected"
        );

        candidates
    }
}

/// Ranks every RDAP authority by aggregate domain count, with the category its
/// records were attributed to.
///
/// Same ordering as [`CandidateDetector::find_candidates`]. `limit` caps the
/// number of entries returned.
pub fn authority_usage(records: &[RegistrarRecord], limit: Option<usize>) -> Vec<AuthorityUsage> {
    let mut usage: Vec<AuthorityUsage> = group_by_authority(records)
        .into_iter()
        .map(|g| AuthorityUsage {
            registrar_count: g.members.len(),
            total_domains: g.total_domains(),
            category: g.first_category().map(str::to_string),
            authority: g.authority,
        })
        .collect();

    usage.sort_by(|a, b| {
        b.total_domains
            .cmp(&a.total_domains)
            .then_with(|| a.authority.cmp(&b.authority))
    });

    if let Some(limit) = limit {
        usage.truncate(limit);
    }

    usage
}

/// Groups records by authority, in order of first appearance.
///
/// Uses the authority stored by the classifier, deriving it from the URL when
/// the record has not been through classification. Records without a usable
/// URL are skipped.
fn group_by_authority(records: &[RegistrarRecord]) -> Vec<AuthorityGroup<'_>> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<AuthorityGroup<'_>> = Vec::new();

    for record in records {
        let authority = match &record.rdap_authority {
            Some(authority) => authority.clone(),
            None => match record.rdap_url_trimmed().map(extract_authority) {
                Some(Ok(authority)) => authority,
                _ => continue,
            },
        };

        match index.get(&authority) {
            Some(&i) => groups[i].members.push(record),
            None => {
                index.insert(authority.clone(), groups.len());
                groups.push(AuthorityGroup {
                    authority,
                    members: vec![record],
                });
            }
        }
    }

    groups
}
