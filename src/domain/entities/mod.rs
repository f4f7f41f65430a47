//! Core domain entities.
//!
//! # Entity Types
//!
//! - [`RegistrarRecord`] - One registrar row with its RDAP endpoint and category
//! - [`PatternCatalog`] - Ordered gateway provider patterns
//! - [`MarketReport`] / [`CategorySummary`] - Aggregated statistics
//! - [`CandidateGateway`] / [`AuthorityUsage`] - Endpoint sharing analysis
//! - [`RegistrarContact`] - Optional metadata from a registrar directory

pub mod catalog;
pub mod contact;
pub mod registrar;
pub mod summary;

pub use catalog::{PatternCatalog, PatternOverlap, ProviderPatterns};
pub use contact::{EnrichedRegistrar, PostalAddress, RegistrarContact};
pub use registrar::RegistrarRecord;
pub use summary::{
    AuthorityUsage, BucketTotals, CandidateGateway, CategorySummary, MarketReport, RankedRegistrar,
};
