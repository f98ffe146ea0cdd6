//! Error types for canopy

use thiserror::Error;

/// Result type alias for canopy operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in canopy operations
///
/// Only soft outcomes are represented here. Contract violations, such as a
/// declared child missing on insert or erasing a node that is still
/// referenced, would corrupt the reference-count invariants if execution
/// continued, so they fail fast with a panic instead of surfacing as a
/// variant.
#[derive(Error, Debug)]
pub enum Error {
    #[error("node not found: {0}")]
    NotFound(String),
}

impl Error {
    /// Build a `NotFound` from any debug-printable key.
    pub fn not_found(key: impl std::fmt::Debug) -> Self {
        Error::NotFound(format!("{:?}", key))
    }
}
