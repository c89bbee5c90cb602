//! Numbering domain errors

use thiserror::Error;

/// Errors that can occur during identity assignment
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NumberingError {
    /// Two invoices in one work relationship claim the same historical
    /// number; fatal for the whole group since both cannot legitimately
    /// hold that identity
    #[error("Duplicate historical number '{number}' claimed by '{first}' and '{second}'")]
    DuplicateOverride {
        number: String,
        first: String,
        second: String,
    },
}
