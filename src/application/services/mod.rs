//! Business logic services for the application layer.
//!
//! Data flows one way: [`Classifier`] annotates records, [`CandidateDetector`]
//! looks for unknown shared endpoints, [`Aggregator`] builds the report, and
//! [`ReconcileService`] folds later rename/removal decisions back in.
//! [`AnalysisService`] wires the first three together.

pub mod aggregator;
pub mod analysis_service;
pub mod candidate_detector;
pub mod classifier;
pub mod enrichment_service;
pub mod reconcile_service;

pub use aggregator::Aggregator;
pub use analysis_service::{AnalysisOptions, AnalysisOutcome, AnalysisService};
pub use candidate_detector::{CandidateDetector, authority_usage};
pub use classifier::{ClassificationStats, Classifier};
pub use enrichment_service::EnrichmentService;
pub use reconcile_service::{Directive, ReconcileService, ResultSet, ResultSnapshot};
