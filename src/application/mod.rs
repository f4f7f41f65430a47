//! Application layer services implementing the analysis pipeline.
//!
//! Services take domain values (records, catalogs) and return domain values
//! (reports, candidates, result sets). File handling stays in
//! [`crate::infrastructure`].
//!
//! # Available Services
//!
//! - [`services::classifier::Classifier`] - Provider attribution per RDAP URL
//! - [`services::candidate_detector::CandidateDetector`] - Shared unknown endpoints
//! - [`services::aggregator::Aggregator`] - Per-provider market statistics
//! - [`services::reconcile_service::ReconcileService`] - Category renames and removals
//! - [`services::enrichment_service::EnrichmentService`] - Optional registrar metadata
//! - [`services::analysis_service::AnalysisService`] - The full pipeline

pub mod services;
