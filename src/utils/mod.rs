//! Small shared helpers.

pub mod authority;
pub mod percent;
