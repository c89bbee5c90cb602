//! Tax domain errors

use thiserror::Error;

/// Errors that can occur in the tax domain
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxError {
    /// Jurisdiction relationship tag not recognized
    #[error("Unrecognized jurisdiction relationship: {0}")]
    UnrecognizedRelationship(String),
}
