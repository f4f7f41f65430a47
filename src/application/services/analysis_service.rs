//! End-to-end classification pipeline.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::application::services::aggregator::{DEFAULT_SELF_HOSTED_TOP_N, DEFAULT_TOP_N};
use crate::application::services::{
    Aggregator, CandidateDetector, ClassificationStats, Classifier, ReconcileService, ResultSet,
    authority_usage,
};
use crate::domain::entities::{
    AuthorityUsage, CandidateGateway, PatternCatalog, PatternOverlap, RegistrarRecord,
};

/// Tunables for a pipeline run.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisOptions {
    /// Minimum registrars sharing an authority before it is reported as a candidate.
    pub min_registrars: usize,
    pub top_n: usize,
    pub self_hosted_top_n: usize,
    /// Number of entries in the authority usage ranking.
    pub authority_limit: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            min_registrars: 2,
            top_n: DEFAULT_TOP_N,
            self_hosted_top_n: DEFAULT_SELF_HOSTED_TOP_N,
            authority_limit: 20,
        }
    }
}

/// Everything one run produces.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub analyzed_at: DateTime<Utc>,
    pub result_set: ResultSet,
    pub candidates: Vec<CandidateGateway>,
    pub authority_usage: Vec<AuthorityUsage>,
    pub classification: ClassificationStats,
    pub ambiguities: Vec<PatternOverlap>,
}

/// Runs classification, candidate detection and aggregation in one pass.
pub struct AnalysisService {
    options: AnalysisOptions,
}

impl AnalysisService {
    pub fn new(options: AnalysisOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    pub fn aggregator(&self) -> Aggregator {
        Aggregator::new(self.options.top_n, self.options.self_hosted_top_n)
    }

    pub fn reconciler(&self) -> ReconcileService {
        ReconcileService::new(self.aggregator())
    }

    /// Classifies `records` against `catalog` and aggregates the result.
    ///
    /// Record order is preserved throughout; ranking tie-breaks depend on it.
    pub fn run(&self, catalog: PatternCatalog, mut records: Vec<RegistrarRecord>) -> AnalysisOutcome {
        let ambiguities = catalog.ambiguities();
        for overlap in &ambiguities {
            warn!(
                provider = %overlap.provider,
                pattern = %overlap.pattern,
                contained_in = %overlap.contained_in_provider,
                "Overlapping catalog patterns; catalog order decides"
            );
        }

        let classification = Classifier::new(&catalog).classify_records(&mut records);
        info!(
            records = records.len(),
            classified = classification.classified,
            unclassified = classification.unclassified,
            malformed = classification.malformed_url,
            "Classification complete"
        );

        let candidates =
            CandidateDetector::new(self.options.min_registrars).find_candidates(&records);
        let authority_usage = authority_usage(&records, Some(self.options.authority_limit));

        let result_set = self.reconciler().build(catalog, records);
        info!(
            categories = result_set.report().categories.len(),
            candidates = candidates.len(),
            total_domains = result_set.report().total_domains,
            "Analysis complete"
        );

        AnalysisOutcome {
            analyzed_at: Utc::now(),
            result_set,
            candidates,
            authority_usage,
            classification,
            ambiguities,
        }
    }
}
