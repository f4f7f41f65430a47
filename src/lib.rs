//! # RDAP Gateway Analysis
//!
//! Classifies ICANN-accredited registrars by the RDAP gateway provider that
//! serves their registration data, measures each provider's market footprint,
//! and surfaces shared RDAP endpoints that no known provider claims yet.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Registrar records, the pattern catalog, report types
//!   and the registrar directory trait
//! - **Application Layer** ([`application`]) - Classification, candidate detection,
//!   aggregation, reconciliation and enrichment services
//! - **Infrastructure Layer** ([`infrastructure`]) - CSV input, JSON/CSV exporters and
//!   directory implementations
//!
//! ## Pipeline
//!
//! ```text
//! CSV table -> Classifier -> CandidateDetector -> Aggregator -> report.json
//!                                                     ^
//!                         ReconcileService (rename / remove directives)
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! export GATEWAY_INPUT="data/registrars.csv"
//!
//! # Classify, aggregate and write reports into ./output
//! cargo run -- analyze
//!
//! # Fold a provider into another and recompute
//! cargo run -- reconcile -d "InternetX=>RRPProxy/CentralNic"
//! ```
//!
//! ## Configuration
//!
//! Run configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod utils;

pub use error::AppError;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{
        Aggregator, AnalysisOptions, AnalysisOutcome, AnalysisService, CandidateDetector,
        ClassificationStats, Classifier, Directive, EnrichmentService, ReconcileService,
        ResultSet, ResultSnapshot, authority_usage,
    };
    pub use crate::domain::entities::{
        CandidateGateway, CategorySummary, MarketReport, PatternCatalog, ProviderPatterns,
        RegistrarRecord,
    };
    pub use crate::error::AppError;
    pub use crate::infrastructure::input::CsvTableLoader;
}
