//! Tax Domain - GST Regime Classification
//!
//! Maps an invoice's date and jurisdiction relationship onto a tax treatment
//! and rate set. Three mutually exclusive regimes exist, with the
//! registration cutoff date as an orthogonal axis:
//!
//! - **domestic-intra-state**: the combined rate split into equal CGST and
//!   SGST components
//! - **domestic-inter-state**: a single IGST component at the combined rate
//! - **export-zero-rated**: no components, flagged for the export
//!   notification declaration
//!
//! Before the cutoff date no tax applies; an invoice dated exactly at the
//! cutoff uses the post-cutoff regime. Classification is a pure function.

pub mod classifier;
pub mod error;
pub mod regime;
pub mod rules;

pub use classifier::{TaxBreakdown, TaxClassifier, TaxComponent};
pub use error::TaxError;
pub use regime::{JurisdictionRelation, TaxRegime};
pub use rules::TaxRules;
