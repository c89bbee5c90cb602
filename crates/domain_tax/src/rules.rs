//! Tax rate and cutoff configuration

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// GST rates and the registration cutoff date.
///
/// Configurable in principle; the defaults carry the fixed values for this
/// domain (9% + 9% split, 18% combined, cutoff 2024-04-16).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxRules {
    pub cgst_rate: Decimal,
    pub sgst_rate: Decimal,
    pub igst_rate: Decimal,
    pub cutoff_date: NaiveDate,
}

impl Default for TaxRules {
    fn default() -> Self {
        Self {
            cgst_rate: dec!(0.09),
            sgst_rate: dec!(0.09),
            igst_rate: dec!(0.18),
            cutoff_date: NaiveDate::from_ymd_opt(2024, 4, 16).expect("valid cutoff date"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let rules = TaxRules::default();
        assert_eq!(rules.cgst_rate + rules.sgst_rate, rules.igst_rate);
        assert_eq!(
            rules.cutoff_date,
            NaiveDate::from_ymd_opt(2024, 4, 16).unwrap()
        );
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let rules: TaxRules = serde_json::from_str(r#"{"igst_rate": "0.12"}"#).unwrap();
        assert_eq!(rules.igst_rate, dec!(0.12));
        assert_eq!(rules.cgst_rate, dec!(0.09));
    }
}
