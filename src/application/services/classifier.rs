//! Gateway provider classification.

use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::entities::{PatternCatalog, RegistrarRecord};
use crate::utils::authority::extract_authority;

/// Counts produced by a classification pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClassificationStats {
    pub classified: usize,
    pub unclassified: usize,
    pub missing_url: usize,
    pub malformed_url: usize,
}

/// Assigns RDAP URLs to gateway providers using a [`PatternCatalog`].
///
/// Matching is plain substring containment on the lower-cased URL. Providers are
/// tried in catalog order and the first hit wins, so when a reseller's domain also
/// appears inside a larger provider's patterns, whichever is declared first takes
/// the record.
pub struct Classifier<'a> {
    catalog: &'a PatternCatalog,
}

impl<'a> Classifier<'a> {
    pub fn new(catalog: &'a PatternCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &PatternCatalog {
        self.catalog
    }

    /// Returns the provider for `rdap_url`, or `None` if it is absent, blank or
    /// matches nothing.
    pub fn classify(&self, rdap_url: Option<&str>) -> Option<&'a str> {
        let url = rdap_url?.trim();
        if url.is_empty() {
            return None;
        }

        let url = url.to_lowercase();
        self.catalog
            .providers()
            .iter()
            .find(|provider| provider.patterns.iter().any(|p| url.contains(p.as_str())))
            .map(|provider| provider.name.as_str())
    }

    /// Fills `rdap_authority` and `category` on every record.
    ///
    /// Records keep their input order. A URL that cannot be parsed gets no
    /// authority but is still matched against the catalog.
    pub fn classify_records(&self, records: &mut [RegistrarRecord]) -> ClassificationStats {
        let mut stats = ClassificationStats::default();

        for record in records.iter_mut() {
            record.rdap_authority = match record.rdap_url_trimmed() {
                None => {
                    stats.missing_url += 1;
                    None
                }
                Some(url) => match extract_authority(url) {
                    Ok(authority) => Some(authority),
                    Err(e) => {
                        warn!(registrar_id = record.id, "{e}");
                        stats.malformed_url += 1;
                        None
                    }
                },
            };

            record.category = self.classify(record.rdap_url.as_deref()).map(str::to_string);

            match &record.category {
                Some(provider) => {
                    debug!(registrar_id = record.id, provider = %provider, "Classified");
                    stats.classified += 1;
                }
                None => stats.unclassified += 1,
            }
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ProviderPatterns;

    fn catalog() -> PatternCatalog {
        PatternCatalog::new(
            1,
            vec![
                ProviderPatterns::new("RRPProxy", &["rrpproxy.net"]),
                ProviderPatterns::new("LogicBoxes", &["rdapserver.net"]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_classify_absent_and_blank() {
        let catalog = catalog();
        let classifier = Classifier::new(&catalog);

        assert_eq!(classifier.classify(None), None);
        assert_eq!(classifier.classify(Some("")), None);
        assert_eq!(classifier.classify(Some("   \t")), None);
    }

    #[test]
    fn test_classify_absent_with_empty_catalog() {
        let catalog = PatternCatalog::empty();
        let classifier = Classifier::new(&catalog);

        assert_eq!(classifier.classify(None), None);
        assert_eq!(classifier.classify(Some("")), None);
        assert_eq!(classifier.classify(Some("https://rdap.rrpproxy.net")), None);
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        let catalog = catalog();
        let classifier = Classifier::new(&catalog);

        assert_eq!(
            classifier.classify(Some("HTTPS://RDAP.RRPPROXY.NET/")),
            Some("RRPProxy")
        );
    }

    #[test]
    fn test_classify_does_not_require_scheme() {
        let catalog = catalog();
        let classifier = Classifier::new(&catalog);

        assert_eq!(classifier.classify(Some("rdapserver.net")), Some("LogicBoxes"));
    }

    #[test]
    fn test_classify_no_match() {
        let catalog = catalog();
        let classifier = Classifier::new(&catalog);

        assert_eq!(classifier.classify(Some("https://self.example.com")), None);
    }

    #[test]
    fn test_first_declared_provider_wins() {
        let catalog = PatternCatalog::new(
            1,
            vec![
                ProviderPatterns::new("Tucows", &["tucows.com"]),
                ProviderPatterns::new("Enom", &["enom.rdap.tucows.com"]),
            ],
        )
        .unwrap();
        let classifier = Classifier::new(&catalog);

        assert_eq!(
            classifier.classify(Some("https://enom.rdap.tucows.com/")),
            Some("Tucows")
        );
    }

    #[test]
    fn test_classify_records_fills_fields() {
        let catalog = catalog();
        let classifier = Classifier::new(&catalog);
        let mut records = vec![
            RegistrarRecord::new(
                1,
                "Acme".to_string(),
                Some(100),
                Some("https://RDAP.rrpproxy.net/".to_string()),
            ),
            RegistrarRecord::new(2, "Beta".to_string(), Some(50), None),
            RegistrarRecord::new(
                3,
                "Gamma".to_string(),
                None,
                Some("rdapserver.net".to_string()),
            ),
            RegistrarRecord::new(
                4,
                "Delta".to_string(),
                Some(7),
                Some("https://self.example.com".to_string()),
            ),
        ];

        let stats = classifier.classify_records(&mut records);

        assert_eq!(records[0].category.as_deref(), Some("RRPProxy"));
        assert_eq!(records[0].rdap_authority.as_deref(), Some("rdap.rrpproxy.net"));
        assert_eq!(records[1].category, None);
        assert_eq!(records[1].rdap_authority, None);
        assert_eq!(records[2].category.as_deref(), Some("LogicBoxes"));
        assert_eq!(records[2].rdap_authority, None);
        assert_eq!(records[3].category, None);
        assert_eq!(records[3].rdap_authority.as_deref(), Some("self.example.com"));

        assert_eq!(
            stats,
            ClassificationStats {
                classified: 2,
                unclassified: 2,
                missing_url: 1,
                malformed_url: 1,
            }
        );
    }
}
