//! Pricing formula model and registry
//!
//! A formula is an ordered list of calculation components. Only two
//! component primitives exist (`flat_rate` and `unit_rate`); the dispatch
//! over them is a single exhaustive match in the calculator, not an
//! open-ended plugin mechanism. Component parameters are either literal
//! numbers or `{variable}` references resolved against the evaluation
//! context at computation time.
//!
//! The registry ([`BillingConfig`]) is deserialized once per run by an
//! external loader and passed explicitly to the calculator; it is never
//! read from ambient global state.

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::context::{EvalContext, Scalar};
use crate::error::BillingError;

/// A component parameter: a literal number or a `{variable}` reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueRef {
    Literal(Decimal),
    Variable(String),
}

impl ValueRef {
    /// Creates a reference to a context variable
    pub fn variable(name: impl Into<String>) -> Self {
        ValueRef::Variable(name.into())
    }

    /// Creates a literal value
    pub fn literal(value: Decimal) -> Self {
        ValueRef::Literal(value)
    }

    /// Resolves against the context; an unbound variable resolves to `None`,
    /// which the calculator treats the same as an absent parameter.
    pub fn resolve(&self, ctx: &EvalContext) -> Option<Decimal> {
        match self {
            ValueRef::Literal(d) => Some(*d),
            ValueRef::Variable(name) => ctx.number(name),
        }
    }
}

impl<'de> Deserialize<'de> for ValueRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(Decimal),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Number(d) => Ok(ValueRef::Literal(d)),
            Repr::Text(s) => {
                let trimmed = s.trim();
                if let Some(name) = trimmed
                    .strip_prefix('{')
                    .and_then(|rest| rest.strip_suffix('}'))
                {
                    Ok(ValueRef::Variable(name.to_string()))
                } else {
                    Decimal::from_str(&trimmed.replace(',', ""))
                        .map(ValueRef::Literal)
                        .map_err(|_| {
                            DeError::custom(format!(
                                "expected a number or a {{variable}} reference, got {s:?}"
                            ))
                        })
                }
            }
        }
    }
}

impl Serialize for ValueRef {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ValueRef::Literal(d) => Serialize::serialize(d, serializer),
            ValueRef::Variable(name) => serializer.serialize_str(&format!("{{{name}}}")),
        }
    }
}

/// Whether unit-rate quantity bounds apply to each rate partition or to the
/// combined quantity before partitioning.
///
/// The bounds-per-partition question has no single right answer across fee
/// structures, so it is explicit configuration rather than an inferred
/// behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdScope {
    #[default]
    PerPartition,
    Combined,
}

/// One calculation block within a formula
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Component {
    FlatRate {
        id: String,
        #[serde(default)]
        amount: Option<ValueRef>,
    },
    UnitRate {
        id: String,
        #[serde(default)]
        rate: Option<ValueRef>,
        #[serde(default)]
        min_quantity: Option<ValueRef>,
        #[serde(default)]
        max_quantity: Option<ValueRef>,
        #[serde(default)]
        threshold_scope: ThresholdScope,
    },
}

impl Component {
    /// Returns the component id, unique within its formula
    pub fn id(&self) -> &str {
        match self {
            Component::FlatRate { id, .. } => id,
            Component::UnitRate { id, .. } => id,
        }
    }
}

/// An abstract pricing formula: ordered calculation components
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingFormula {
    /// Formula id; stamped from the registry key during validation
    #[serde(default)]
    pub id: String,
    pub components: Vec<Component>,
}

/// Row presentation strings with `{variable}` placeholders
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RowTemplate {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub details: String,
}

/// An invoice preset: names a formula and carries per-component row
/// templates plus default variable bindings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoicePreset {
    pub formula_id: String,
    #[serde(default)]
    pub row_templates: BTreeMap<String, RowTemplate>,
    #[serde(default)]
    pub defaults: BTreeMap<String, Scalar>,
}

/// The formula registry, loaded once per run from external configuration
/// and read-only thereafter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BillingConfig {
    #[serde(default)]
    pub pricing_formulas: BTreeMap<String, PricingFormula>,
    #[serde(default)]
    pub invoice_presets: BTreeMap<String, InvoicePreset>,
}

impl BillingConfig {
    /// Stamps formula ids from their registry keys and rejects duplicate
    /// component ids within a formula. Loaders call this once after
    /// deserializing.
    pub fn validate(&mut self) -> Result<(), BillingError> {
        for (formula_id, formula) in &mut self.pricing_formulas {
            formula.id = formula_id.clone();
            let mut seen = BTreeSet::new();
            for component in &formula.components {
                if !seen.insert(component.id().to_string()) {
                    return Err(BillingError::DuplicateComponentId {
                        formula_id: formula_id.clone(),
                        component_id: component.id().to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Resolves a formula by id
    pub fn formula(&self, formula_id: &str) -> Result<&PricingFormula, BillingError> {
        self.pricing_formulas
            .get(formula_id)
            .ok_or_else(|| BillingError::UnknownFormula(formula_id.to_string()))
    }

    /// Resolves a preset by id
    pub fn preset(&self, preset_id: &str) -> Result<&InvoicePreset, BillingError> {
        self.invoice_presets
            .get(preset_id)
            .ok_or_else(|| BillingError::UnknownPreset(preset_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_value_ref_parsing() {
        let literal: ValueRef = serde_json::from_value(json!(150)).unwrap();
        assert_eq!(literal, ValueRef::Literal(dec!(150)));

        let from_text: ValueRef = serde_json::from_value(json!("1,500.50")).unwrap();
        assert_eq!(from_text, ValueRef::Literal(dec!(1500.50)));

        let variable: ValueRef = serde_json::from_value(json!("{base_amount}")).unwrap();
        assert_eq!(variable, ValueRef::Variable("base_amount".to_string()));

        let bad: Result<ValueRef, _> = serde_json::from_value(json!("not a number"));
        assert!(bad.is_err());
    }

    #[test]
    fn test_component_parsing() {
        let component: Component = serde_json::from_value(json!({
            "type": "unit_rate",
            "id": "excess_hours",
            "rate": "{rate}",
            "min_quantity": "{threshold}"
        }))
        .unwrap();

        match component {
            Component::UnitRate {
                id,
                rate,
                min_quantity,
                max_quantity,
                threshold_scope,
            } => {
                assert_eq!(id, "excess_hours");
                assert_eq!(rate, Some(ValueRef::variable("rate")));
                assert_eq!(min_quantity, Some(ValueRef::variable("threshold")));
                assert_eq!(max_quantity, None);
                assert_eq!(threshold_scope, ThresholdScope::PerPartition);
            }
            other => panic!("parsed wrong variant: {other:?}"),
        }
    }

    #[test]
    fn test_validate_stamps_ids_and_rejects_duplicates() {
        let mut config: BillingConfig = serde_json::from_value(json!({
            "pricing_formulas": {
                "hourly": {
                    "components": [
                        {"type": "unit_rate", "id": "fees", "rate": "{rate}"}
                    ]
                }
            }
        }))
        .unwrap();

        config.validate().unwrap();
        assert_eq!(config.formula("hourly").unwrap().id, "hourly");

        let mut duplicated: BillingConfig = serde_json::from_value(json!({
            "pricing_formulas": {
                "broken": {
                    "components": [
                        {"type": "flat_rate", "id": "fees"},
                        {"type": "unit_rate", "id": "fees"}
                    ]
                }
            }
        }))
        .unwrap();

        assert!(matches!(
            duplicated.validate(),
            Err(BillingError::DuplicateComponentId { .. })
        ));
    }

    #[test]
    fn test_unknown_lookups() {
        let config = BillingConfig::default();
        assert!(matches!(
            config.formula("nope"),
            Err(BillingError::UnknownFormula(_))
        ));
        assert!(matches!(
            config.preset("nope"),
            Err(BillingError::UnknownPreset(_))
        ));
    }
}
