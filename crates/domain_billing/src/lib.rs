//! Billing Domain - Composable Fee Computation Engine
//!
//! This crate resolves abstract pricing formulas into concrete billing rows
//! and totals. All fee-structure variation comes from configuration data:
//! a formula is an ordered list of calculation components, each of which is
//! one of exactly two primitives:
//!
//! - **flat_rate**: a fixed amount, either bound from the variable context
//!   or summed from matching line items (milestones, reimbursements)
//! - **unit_rate**: quantity times rate, with an optional free allowance and
//!   cap on the billable quantity
//!
//! Components that have no bound amount or rate instead partition the line
//! items (by description+metadata, or by each item's own rate) and emit one
//! row per partition, in first-occurrence order.
//!
//! # Determinism
//!
//! Re-running the engine over the same inputs produces byte-identical
//! results. Everything is computed from explicitly passed values - the
//! formula registry is a plain value scoped to the run, grouping preserves
//! first-seen order, and currency rounding is applied exactly once per row.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_billing::{BillingConfig, FeeCalculator};
//!
//! let config: BillingConfig = serde_yaml::from_str(&billing_yaml)?;
//! let calculator = FeeCalculator::new(&config);
//! let result = calculator.calculate("retainer_excess", &items, &params, invoice_date)?;
//! assert_eq!(result.total.amount(), result.rows.iter().map(|r| r.amount.amount()).sum());
//! ```

pub mod calculator;
pub mod context;
pub mod error;
pub mod formula;
pub mod grouping;
pub mod interpolate;
pub mod line_item;

pub use calculator::{BillingResult, BillingRow, FeeCalculator};
pub use context::{EvalContext, Scalar};
pub use error::BillingError;
pub use formula::{
    BillingConfig, Component, InvoicePreset, PricingFormula, RowTemplate, ThresholdScope, ValueRef,
};
pub use grouping::group_by;
pub use line_item::{LineItem, RawLineItem};
