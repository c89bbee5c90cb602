//! Test Fixtures
//!
//! A standard billing configuration covering the fee structures the engine
//! must express from data alone, plus common dates.

use chrono::NaiveDate;
use core_kernel::{Currency, Money};
use domain_billing::BillingConfig;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use serde_json::json;

/// Common invoice dates
pub struct DateFixtures;

impl DateFixtures {
    /// A post-cutoff invoice date
    pub fn invoice_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 31).expect("valid fixture date")
    }

    /// A pre-cutoff invoice date
    pub fn pre_cutoff_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 31).expect("valid fixture date")
    }
}

/// Common monetary amounts
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// An amount in the default billing currency
    pub fn inr(amount: Decimal) -> Money {
        Money::new(amount, Currency::INR)
    }

    /// An amount in the export billing currency
    pub fn usd(amount: Decimal) -> Money {
        Money::new(amount, Currency::USD)
    }
}

static STANDARD_BILLING_CONFIG: Lazy<BillingConfig> = Lazy::new(|| {
    let mut config: BillingConfig = serde_json::from_value(json!({
        "pricing_formulas": {
            "hourly": {
                "components": [
                    {"type": "unit_rate", "id": "professional_fees", "rate": "{rate}"}
                ]
            },
            "retainer_with_excess": {
                "components": [
                    {"type": "flat_rate", "id": "retainer_fee", "amount": "{retainer_amount}"},
                    {"type": "unit_rate", "id": "excess_hours", "rate": "{rate}",
                     "min_quantity": "{threshold}"}
                ]
            },
            "milestone_sum": {
                "components": [
                    {"type": "flat_rate", "id": "milestone_fees"}
                ]
            },
            "per_unit_tiers": {
                "components": [
                    {"type": "unit_rate", "id": "tiered_fees"}
                ]
            }
        },
        "invoice_presets": {
            "hourly": {
                "formula_id": "hourly",
                "row_templates": {
                    "professional_fees": {
                        "label": "Professional services ({month} {year})",
                        "details": "{qty} {units} @ {rate}"
                    }
                },
                "defaults": {"unit_name": "hours"}
            },
            "retainer_excess": {
                "formula_id": "retainer_with_excess",
                "row_templates": {
                    "retainer_fee": {
                        "label": "Monthly retainer",
                        "details": "Retainer for {month} {year}"
                    },
                    "excess_hours": {
                        "label": "Additional hours",
                        "details": "{qty} {units} @ {rate} beyond first {threshold}"
                    }
                },
                "defaults": {"unit_name": "hours"}
            },
            "milestone": {
                "formula_id": "milestone_sum",
                "row_templates": {
                    "milestone_fees": {
                        "label": "{description}",
                        "details": "Milestone {number}"
                    }
                }
            },
            "per_word": {
                "formula_id": "per_unit_tiers",
                "row_templates": {
                    "tiered_fees": {
                        "label": "Editorial services",
                        "details": "{qty} {units} @ {rate}"
                    }
                },
                "defaults": {"unit_name": "words"}
            }
        }
    }))
    .expect("fixture config parses");
    config.validate().expect("fixture config is valid");
    config
});

/// The standard billing configuration shared across the test suite
pub fn standard_billing_config() -> &'static BillingConfig {
    &STANDARD_BILLING_CONFIG
}
