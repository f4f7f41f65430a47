//! Collaborator traits for the domain layer.
//!
//! - [`RegistrarDirectory`] - Registrar contact lookups by identifier
//!
//! Implementations live in `crate::infrastructure::directory`; mocks are
//! generated with `mockall` for unit tests.

pub mod registrar_directory;

pub use registrar_directory::RegistrarDirectory;

#[cfg(test)]
pub use registrar_directory::MockRegistrarDirectory;
