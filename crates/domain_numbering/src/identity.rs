//! Invoice identity value objects

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The deterministic system identifier for an invoice, distinct from the
/// possibly-historical face number printed on the document.
///
/// Displays as `PREFIX-WW-SS-YYMMDD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalId {
    pub prefix: String,
    pub work_sequence: String,
    pub invoice_sequence: String,
    pub date: NaiveDate,
}

impl fmt::Display for CanonicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}-{}",
            self.prefix,
            self.work_sequence,
            self.invoice_sequence,
            self.date.format("%y%m%d")
        )
    }
}

/// The assigned identity for one invoice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceIdentity {
    /// The number presented on the document; a preserved historical value
    /// when an override exists, else the canonical id
    pub face_number: String,
    pub canonical: CanonicalId,
}

/// The metadata the numbering service needs for one invoice.
///
/// File discovery and parsing are external; this is the already-resolved
/// shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// Stable per-invoice key (typically the source filename); the
    /// secondary sort key that makes ranking deterministic
    pub source_key: String,
    pub date: NaiveDate,
    /// Client prefix identifying the party the work relationship belongs to
    pub prefix: String,
    /// Work relationship sequence; derived from chronological rank within
    /// the prefix when absent
    #[serde(default)]
    pub work_sequence: Option<String>,
    /// Whether this invoice participates in the contract series counter;
    /// standalone engagements always receive sequence `00`
    #[serde(default = "default_contract_series")]
    pub contract_series: bool,
    /// Explicit invoice-sequence override, used verbatim in the canonical id
    #[serde(default)]
    pub sequence_override: Option<String>,
    /// Explicit historical face number, used verbatim
    #[serde(default)]
    pub face_override: Option<String>,
}

fn default_contract_series() -> bool {
    true
}

impl InvoiceRecord {
    /// Creates a series record with no overrides
    pub fn new(source_key: impl Into<String>, date: NaiveDate, prefix: impl Into<String>) -> Self {
        Self {
            source_key: source_key.into(),
            date,
            prefix: prefix.into(),
            work_sequence: None,
            contract_series: true,
            sequence_override: None,
            face_override: None,
        }
    }

    /// Sets the explicit work relationship sequence
    pub fn with_work_sequence(mut self, work_sequence: impl Into<String>) -> Self {
        self.work_sequence = Some(work_sequence.into());
        self
    }

    /// Marks this as a standalone engagement (sequence `00`)
    pub fn standalone(mut self) -> Self {
        self.contract_series = false;
        self
    }

    /// Sets an explicit invoice-sequence override
    pub fn with_sequence_override(mut self, sequence: impl Into<String>) -> Self {
        self.sequence_override = Some(sequence.into());
        self
    }

    /// Sets an explicit historical face number
    pub fn with_face_override(mut self, face_number: impl Into<String>) -> Self {
        self.face_override = Some(face_number.into());
        self
    }
}
