//! Variable-binding context for formula evaluation
//!
//! The context is assembled once per invoice from preset defaults and
//! caller-supplied parameters (parameters win), plus the invoice date
//! decomposition. It is read-only for the lifetime of the computation.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use core_kernel::Currency;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::BillingError;

/// A scalar variable value: text or number.
///
/// Numeric text (including comma-grouped amounts like `"1,500.00"`) can be
/// coerced on demand via [`Scalar::as_number`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Number(Decimal),
}

impl Scalar {
    /// Returns the numeric value, coercing comma-grouped text if needed
    pub fn as_number(&self) -> Option<Decimal> {
        match self {
            Scalar::Number(d) => Some(*d),
            Scalar::Text(s) => Decimal::from_str(&s.replace(',', "")).ok(),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(s) => write!(f, "{}", s),
            Scalar::Number(d) => write!(f, "{}", d.normalize()),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Text(s)
    }
}

impl From<Decimal> for Scalar {
    fn from(d: Decimal) -> Self {
        Scalar::Number(d)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Number(Decimal::from(n))
    }
}

/// Read-only variable bindings for one invoice computation
#[derive(Debug, Clone)]
pub struct EvalContext {
    vars: BTreeMap<String, Scalar>,
    currency: Currency,
    invoice_date: NaiveDate,
}

impl EvalContext {
    /// Builds the context for one invoice.
    ///
    /// Defaults are merged under params (params win). Legacy contract
    /// parameter names are normalized here, once, so the calculator never
    /// sees them: `rate_per_unit`/`rate_per_hour` alias `rate`, and
    /// `included_hours` aliases `threshold`. The invoice date is decomposed
    /// into `date`, `day`, `month` (English name) and `year` bindings.
    ///
    /// Currency comes from the merged `currency` binding, defaulting to INR.
    pub fn build(
        defaults: &BTreeMap<String, Scalar>,
        params: &BTreeMap<String, Scalar>,
        invoice_date: NaiveDate,
    ) -> Result<Self, BillingError> {
        let mut vars = defaults.clone();
        vars.extend(params.iter().map(|(k, v)| (k.clone(), v.clone())));

        if !vars.contains_key("rate") {
            let alias = vars
                .get("rate_per_unit")
                .or_else(|| vars.get("rate_per_hour"))
                .cloned();
            if let Some(rate) = alias {
                vars.insert("rate".to_string(), rate);
            }
        }
        if !vars.contains_key("threshold") {
            if let Some(included) = vars.get("included_hours").cloned() {
                vars.insert("threshold".to_string(), included);
            }
        }

        let currency = match vars.get("currency") {
            Some(value) => Currency::from_str(&value.to_string()).map_err(BillingError::Money)?,
            None => Currency::INR,
        };

        vars.insert(
            "date".to_string(),
            Scalar::Text(invoice_date.format("%Y-%m-%d").to_string()),
        );
        vars.insert("day".to_string(), Scalar::Text(invoice_date.day().to_string()));
        vars.insert(
            "month".to_string(),
            Scalar::Text(invoice_date.format("%B").to_string()),
        );
        vars.insert(
            "year".to_string(),
            Scalar::Text(invoice_date.year().to_string()),
        );

        Ok(Self {
            vars,
            currency,
            invoice_date,
        })
    }

    /// Looks up a variable binding
    pub fn get(&self, name: &str) -> Option<&Scalar> {
        self.vars.get(name)
    }

    /// Looks up a variable and coerces it to a number
    pub fn number(&self, name: &str) -> Option<Decimal> {
        self.vars.get(name).and_then(Scalar::as_number)
    }

    /// Looks up a variable and renders it to text
    pub fn text(&self, name: &str) -> Option<String> {
        self.vars.get(name).map(Scalar::to_string)
    }

    /// Iterates all bindings in name order
    pub fn vars(&self) -> impl Iterator<Item = (&String, &Scalar)> {
        self.vars.iter()
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn invoice_date(&self) -> NaiveDate {
        self.invoice_date
    }
}
