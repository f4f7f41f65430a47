//! Optional registrar metadata enrichment.

use std::sync::Arc;
use std::time::Duration;

use tokio_retry::Retry;
use tokio_retry::strategy::ExponentialBackoff;
use tracing::{debug, info, warn};

use crate::domain::entities::{EnrichedRegistrar, RegistrarRecord};
use crate::domain::repositories::RegistrarDirectory;

pub const DEFAULT_RETRIES: usize = 3;

/// Decorates registrar records with contact data from a [`RegistrarDirectory`].
///
/// Lookups are retried with exponential backoff. A lookup that still fails is
/// logged and the registrar is reported without contact data; enrichment never
/// fails as a whole and never touches classification results.
pub struct EnrichmentService<D: RegistrarDirectory> {
    directory: Arc<D>,
    retries: usize,
    base_delay_ms: u64,
    max_delay: Duration,
}

impl<D: RegistrarDirectory> EnrichmentService<D> {
    /// Creates a new enrichment service.
    pub fn new(directory: Arc<D>, retries: usize) -> Self {
        Self {
            directory,
            retries,
            base_delay_ms: 100,
            max_delay: Duration::from_secs(5),
        }
    }

    /// Overrides the first backoff delay. Each further retry waits twice as long,
    /// up to five seconds.
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay_ms = delay.as_millis().max(1) as u64;
        self
    }

    /// Enriches every record, in input order.
    pub async fn enrich(&self, records: &[RegistrarRecord]) -> Vec<EnrichedRegistrar> {
        let mut enriched = Vec::with_capacity(records.len());

        for record in records {
            enriched.push(self.enrich_one(record).await);
        }

        let found = enriched.iter().filter(|e| e.is_enriched()).count();
        info!(
            directory = self.directory.name(),
            total = enriched.len(),
            found,
            "Enrichment finished"
        );

        enriched
    }

    /// Delays between attempts: base, 2 x base, 4 x base, ... capped at `max_delay`.
    fn backoff(&self) -> impl Iterator<Item = Duration> + use<D> {
        // tokio-retry yields factor * 2^n for n >= 1.
        ExponentialBackoff::from_millis(2)
            .factor((self.base_delay_ms / 2).max(1))
            .max_delay(self.max_delay)
            .take(self.retries)
    }

    /// Enriches a single record.
    pub async fn enrich_one(&self, record: &RegistrarRecord) -> EnrichedRegistrar {
        let directory = Arc::clone(&self.directory);
        let id = record.id;
        let result = Retry::spawn(self.backoff(), || {
            let directory = Arc::clone(&directory);
            async move { directory.lookup(id).await }
        })
        .await;

        let (contact, lookup_error) = match result {
            Ok(Some(contact)) => {
                debug!(registrar_id = id, "Contact found");
                (Some(contact), None)
            }
            Ok(None) => {
                debug!(registrar_id = id, "No directory entry");
                (None, None)
            }
            Err(e) => {
                warn!(registrar_id = id, error = %e, "Registrar lookup failed");
                (None, Some(e.to_string()))
            }
        };

        EnrichedRegistrar {
            id,
            name: record.name.clone(),
            category: record.category.clone(),
            domain_count: record.domain_count,
            contact,
            lookup_error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::RegistrarContact;
    use crate::domain::repositories::MockRegistrarDirectory;
    use crate::error::AppError;
    use mockall::Sequence;

    fn record(id: u32) -> RegistrarRecord {
        let mut r = RegistrarRecord::new(id, format!("R{id}"), Some(10), None);
        r.category = Some("LogicBoxes".to_string());
        r
    }

    fn contact(id: u32) -> RegistrarContact {
        RegistrarContact {
            id,
            website: Some("https://example.com".to_string()),
            ..Default::default()
        }
    }

    fn service(mock: MockRegistrarDirectory, retries: usize) -> EnrichmentService<MockRegistrarDirectory> {
        EnrichmentService::new(Arc::new(mock), retries).with_base_delay(Duration::from_millis(1))
    }

    #[test]
    fn test_backoff_doubles_from_base_delay() {
        let service = EnrichmentService::new(Arc::new(MockRegistrarDirectory::new()), 3);

        let delays: Vec<Duration> = service.backoff().collect();

        assert_eq!(
            delays,
            vec![
                Duration::from_millis(100),
                Duration::from_millis(200),
                Duration::from_millis(400),
            ]
        );
    }

    #[test]
    fn test_backoff_is_capped() {
        let service = EnrichmentService::new(Arc::new(MockRegistrarDirectory::new()), 8)
            .with_base_delay(Duration::from_secs(1));

        let delays: Vec<Duration> = service.backoff().collect();

        assert_eq!(delays.len(), 8);
        assert_eq!(delays[0], Duration::from_secs(1));
        assert_eq!(delays[2], Duration::from_secs(4));
        assert!(delays[3..].iter().all(|d| *d == Duration::from_secs(5)));
    }

    #[tokio::test]
    async fn test_enrich_found() {
        let mut mock = MockRegistrarDirectory::new();
        mock.expect_lookup()
            .withf(|id| *id == 303)
            .times(1)
            .returning(|id| Ok(Some(contact(id))));
        mock.expect_name().return_const("mock");

        let result = service(mock, 3).enrich(&[record(303)]).await;

        assert_eq!(result.len(), 1);
        assert!(result[0].is_enriched());
        assert_eq!(result[0].category.as_deref(), Some("LogicBoxes"));
        assert!(result[0].lookup_error.is_none());
    }

    #[tokio::test]
    async fn test_enrich_not_found_is_not_retried() {
        let mut mock = MockRegistrarDirectory::new();
        mock.expect_lookup().times(1).returning(|_| Ok(None));

        let result = service(mock, 3).enrich_one(&record(1)).await;

        assert!(!result.is_enriched());
        assert!(result.lookup_error.is_none());
    }

    #[tokio::test]
    async fn test_enrich_retries_then_succeeds() {
        let mut mock = MockRegistrarDirectory::new();
        let mut seq = Sequence::new();
        mock.expect_lookup()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|id| Err(AppError::enrichment(id, "timeout")));
        mock.expect_lookup()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|id| Ok(Some(contact(id))));

        let result = service(mock, 3).enrich_one(&record(7)).await;

        assert!(result.is_enriched());
    }

    #[tokio::test]
    async fn test_enrich_failure_degrades_record() {
        let mut mock = MockRegistrarDirectory::new();
        mock.expect_lookup()
            .times(3)
            .returning(|id| Err(AppError::enrichment(id, "service unavailable")));
        mock.expect_name().return_const("mock");

        let records = vec![record(9)];
        let result = service(mock, 2).enrich(&records).await;

        assert_eq!(result.len(), 1);
        assert!(!result[0].is_enriched());
        assert_eq!(result[0].domain_count, Some(10));
        assert!(
            result[0]
                .lookup_error
                .as_deref()
                .unwrap()
                .contains("service unavailable")
        );
    }
}
