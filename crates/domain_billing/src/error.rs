//! Billing domain errors
//!
//! Configuration and data failures are fatal for the invoice being
//! processed; every variant carries enough context (component id, variable
//! name) to be actionable without source inspection.

use core_kernel::MoneyError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur in the billing domain
#[derive(Debug, Error)]
pub enum BillingError {
    /// Preset id not present in the billing configuration
    #[error("Unknown invoice preset: {0}")]
    UnknownPreset(String),

    /// Formula id not present in the billing configuration
    #[error("Unknown pricing formula: {0}")]
    UnknownFormula(String),

    /// A row template referenced a variable that is not bound anywhere
    #[error("Missing variable '{name}' for component '{component_id}'")]
    MissingVariable { name: String, component_id: String },

    /// Component quantity bounds are inverted
    #[error("Invalid threshold for component '{component_id}': min_quantity {min} exceeds max_quantity {max}")]
    InvalidThreshold {
        component_id: String,
        min: Decimal,
        max: Decimal,
    },

    /// A row template could not be parsed (unbalanced braces)
    #[error("Malformed row template for component '{component_id}': {template:?}")]
    MalformedTemplate {
        component_id: String,
        template: String,
    },

    /// Two components in one formula share an id
    #[error("Duplicate component id '{component_id}' in formula '{formula_id}'")]
    DuplicateComponentId {
        formula_id: String,
        component_id: String,
    },

    /// A line item failed normalization
    #[error("Invalid line item: {0}")]
    InvalidLineItem(String),

    /// Money operation failed
    #[error("Money error: {0}")]
    Money(#[from] MoneyError),
}
