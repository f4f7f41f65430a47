//! Domain layer containing the registrar model and collaborator contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Registrar records, the pattern catalog, and derived statistics
//! - [`repositories`] - Trait for external registrar metadata lookups
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Derived statistics are produced by [`crate::application::services`], never edited directly

pub mod entities;
pub mod repositories;
