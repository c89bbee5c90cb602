//! Display formatting for amounts and quantities
//!
//! Billing rows interpolate pre-formatted strings into their templates, so
//! the formatting rules live here rather than in the presentation layer:
//! currency amounts carry thousands separators and two decimals, quantities
//! render without a fraction when integral.

use rust_decimal::{Decimal, RoundingStrategy};

/// Formats a currency amount with thousands separators and two decimals
/// (`12500` becomes `12,500.00`).
pub fn format_currency(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() { "-" } else { "" };
    let text = format!("{:.2}", rounded.abs());
    let (integral, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    format!("{}{}.{}", sign, group_thousands(integral), fraction)
}

/// Formats a quantity: integral values render without a fraction (`15`),
/// everything else with two decimals (`7.50`).
pub fn format_quantity(value: Decimal) -> String {
    if value.fract().is_zero() {
        format!("{:.0}", value)
    } else {
        format!(
            "{:.2}",
            value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        )
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_currency_groups_thousands() {
        assert_eq!(format_currency(dec!(1234567.891)), "1,234,567.89");
        assert_eq!(format_currency(dec!(1000)), "1,000.00");
        assert_eq!(format_currency(dec!(999)), "999.00");
        assert_eq!(format_currency(dec!(0)), "0.00");
    }

    #[test]
    fn test_format_currency_rounds_half_up() {
        assert_eq!(format_currency(dec!(2.005)), "2.01");
        assert_eq!(format_currency(dec!(-2.005)), "-2.01");
    }

    #[test]
    fn test_format_quantity() {
        assert_eq!(format_quantity(dec!(15)), "15");
        assert_eq!(format_quantity(dec!(15.00)), "15");
        assert_eq!(format_quantity(dec!(7.5)), "7.50");
        assert_eq!(format_quantity(dec!(0.125)), "0.13");
    }
}
