//! Numbering Domain - Deterministic Invoice Identities
//!
//! Assigns face numbers and canonical identifiers to batches of invoices.
//! The canonical rank of an invoice within its work relationship is a
//! stable sort on `(date, source key)`; re-running over an unchanged
//! invoice set yields identical identifiers regardless of the order the
//! caller discovered them in. Historical face numbers are honored verbatim
//! without shifting the counters of sibling invoices.
//!
//! Numbering consumes only invoice metadata ([`InvoiceRecord`]), never
//! billing results, so one invoice's calculation failure cannot shift the
//! sequence numbers of unaffected invoices in the same batch.

pub mod error;
pub mod identity;
pub mod service;

pub use error::NumberingError;
pub use identity::{CanonicalId, InvoiceIdentity, InvoiceRecord};
pub use service::NumberingService;
