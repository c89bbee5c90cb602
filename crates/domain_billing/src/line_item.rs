//! Invoice line items and legacy-shape normalization
//!
//! External data files still carry unit-keyed quantity fields (`hours`,
//! `sessions`, `words`, `articles`). Those shapes are normalized here, in a
//! single explicit step before the engine runs; the calculator only ever
//! sees [`LineItem`].

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::context::Scalar;
use crate::error::BillingError;

/// A unit of work or charge supplied for an invoice, read-only to the engine
#[derive(Debug, Clone, Serialize)]
pub struct LineItem {
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub owner: Option<String>,
    /// Quantity of work, never negative
    pub quantity: Decimal,
    /// Direct charge amount, for milestone/reimbursement shaped items
    pub amount: Option<Decimal>,
    /// Per-item rate, used when the component does not bind one
    pub rate: Option<Decimal>,
    /// Unit name override (e.g. "hour", "word")
    pub unit: Option<String>,
    /// Auxiliary key/value pairs used only for grouping and interpolation
    pub meta: BTreeMap<String, Scalar>,
}

impl LineItem {
    /// Creates a line item with the given quantity and no other fields set
    pub fn new(quantity: Decimal) -> Self {
        Self {
            date: None,
            description: None,
            owner: None,
            quantity,
            amount: None,
            rate: None,
            unit: None,
            meta: BTreeMap::new(),
        }
    }

    /// Sets the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the work date
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Sets a direct charge amount
    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Sets the per-item rate
    pub fn with_rate(mut self, rate: Decimal) -> Self {
        self.rate = Some(rate);
        self
    }

    /// Sets the unit name
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Adds a metadata entry
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    /// Normalizes an externally-parsed item into engine shape.
    ///
    /// Exactly one quantity source wins: a legacy unit-keyed field
    /// (`hours`/`sessions`/`words`/`articles`, which also fixes the unit
    /// name) or the plain `quantity` field, defaulting to 1. A negative
    /// quantity is a data error.
    pub fn from_raw(raw: RawLineItem) -> Result<Self, BillingError> {
        let legacy = [
            (raw.hours, "hour"),
            (raw.sessions, "session"),
            (raw.words, "word"),
            (raw.articles, "article"),
        ]
        .into_iter()
        .find_map(|(value, unit)| value.map(|v| (v, unit)));

        let (quantity, unit) = match legacy {
            Some((value, unit)) => (value, Some(unit.to_string())),
            None => (raw.quantity.unwrap_or(dec!(1)), raw.unit),
        };

        if quantity.is_sign_negative() {
            return Err(BillingError::InvalidLineItem(format!(
                "negative quantity {} for item {:?}",
                quantity,
                raw.description.as_deref().unwrap_or("<unnamed>")
            )));
        }

        Ok(Self {
            date: raw.date,
            description: raw.description,
            owner: raw.owner,
            quantity,
            amount: raw.amount,
            rate: raw.rate,
            unit,
            meta: raw.meta,
        })
    }
}

/// The externally-parsed line item shape, before normalization
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLineItem {
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub owner: Option<String>,
    pub quantity: Option<Decimal>,
    pub amount: Option<Decimal>,
    pub rate: Option<Decimal>,
    pub unit: Option<String>,
    #[serde(default)]
    pub meta: BTreeMap<String, Scalar>,

    // Legacy unit-keyed quantities
    pub hours: Option<Decimal>,
    pub sessions: Option<Decimal>,
    pub words: Option<Decimal>,
    pub articles: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_hours_normalization() {
        let raw: RawLineItem = serde_json::from_value(serde_json::json!({
            "description": "Consulting",
            "hours": 7.5
        }))
        .unwrap();

        let item = LineItem::from_raw(raw).unwrap();
        assert_eq!(item.quantity, dec!(7.5));
        assert_eq!(item.unit.as_deref(), Some("hour"));
    }

    #[test]
    fn test_quantity_defaults_to_one() {
        let item = LineItem::from_raw(RawLineItem::default()).unwrap();
        assert_eq!(item.quantity, dec!(1));
        assert_eq!(item.unit, None);
    }

    #[test]
    fn test_negative_quantity_rejected() {
        let raw = RawLineItem {
            quantity: Some(dec!(-2)),
            ..Default::default()
        };
        assert!(matches!(
            LineItem::from_raw(raw),
            Err(BillingError::InvalidLineItem(_))
        ));
    }

    #[test]
    fn test_explicit_unit_survives() {
        let raw: RawLineItem = serde_json::from_value(serde_json::json!({
            "quantity": 3,
            "unit": "review",
            "rate": 250
        }))
        .unwrap();

        let item = LineItem::from_raw(raw).unwrap();
        assert_eq!(item.unit.as_deref(), Some("review"));
        assert_eq!(item.rate, Some(dec!(250)));
    }
}
