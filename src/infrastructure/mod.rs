//! Infrastructure layer: everything that touches files or external sources.
//!
//! - [`input`] - source table loading
//! - [`export`] - JSON and CSV writers
//! - [`directory`] - registrar metadata sources for enrichment

pub mod directory;
pub mod export;
pub mod input;
