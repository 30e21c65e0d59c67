//! Decimal arithmetic utilities for financial calculations.

use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

/// Round a decimal to a specific number of decimal places.
///
/// Midpoints round to even, so `0.125` becomes `0.12`.
pub fn round_to_precision(value: Decimal, decimals: u32) -> Decimal {
    value.round_dp(decimals)
}

/// Parse a decimal from text, accepting scientific notation.
pub fn parse_decimal(text: &str) -> Option<Decimal> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// Coerce a JSON value to a decimal.
///
/// Numbers and numeric strings convert; everything else yields `None`.
pub fn decimal_from_json(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(s),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_round_to_precision() {
        assert_eq!(round_to_precision(dec!(24.68), 2), dec!(24.68));
        assert_eq!(round_to_precision(dec!(24.6849), 2), dec!(24.68));
        assert_eq!(round_to_precision(dec!(0.125), 2), dec!(0.12));
        assert_eq!(round_to_precision(dec!(0.135), 2), dec!(0.14));
    }

    #[test]
    fn test_decimal_from_json() {
        assert_eq!(decimal_from_json(&json!("100.5")), Some(dec!(100.5)));
        assert_eq!(decimal_from_json(&json!(0)), Some(dec!(0)));
        assert_eq!(decimal_from_json(&json!(49500.25)), Some(dec!(49500.25)));
        assert_eq!(decimal_from_json(&json!(" 12 ")), Some(dec!(12)));
        assert_eq!(decimal_from_json(&json!("1e3")), Some(dec!(1000)));
    }

    #[test]
    fn test_non_numeric_json_is_skipped() {
        assert_eq!(decimal_from_json(&json!("n/a")), None);
        assert_eq!(decimal_from_json(&json!("")), None);
        assert_eq!(decimal_from_json(&json!(null)), None);
        assert_eq!(decimal_from_json(&json!(true)), None);
        assert_eq!(decimal_from_json(&json!({"price": 1})), None);
    }
}
