//! Price extraction from tickers and stop-loss pricing.

use crate::exchange::Ticker;
use crate::utils::decimal::{decimal_from_json, round_to_precision};
use rust_decimal::Decimal;

/// A ticker field a price can be read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceField {
    Close,
    LastPrice,
    MarkPrice,
}

/// Fields tried in order; the first present and numeric one wins.
pub const PRICE_PRECEDENCE: [PriceField; 3] =
    [PriceField::Close, PriceField::LastPrice, PriceField::MarkPrice];

impl PriceField {
    pub fn name(&self) -> &'static str {
        match self {
            PriceField::Close => "close",
            PriceField::LastPrice => "last_price",
            PriceField::MarkPrice => "mark_price",
        }
    }

    /// Read this field as a decimal, if present and numeric.
    pub fn extract(&self, ticker: &Ticker) -> Option<Decimal> {
        let raw = match self {
            PriceField::Close => ticker.close.as_ref(),
            PriceField::LastPrice => ticker.last_price.as_ref(),
            PriceField::MarkPrice => ticker.mark_price.as_ref(),
        }?;
        decimal_from_json(raw)
    }
}

/// Extract a price using [`PRICE_PRECEDENCE`].
pub fn extract_price(ticker: &Ticker) -> Option<Decimal> {
    PRICE_PRECEDENCE
        .iter()
        .find_map(|field| field.extract(ticker))
}

/// Protective buy-stop for a short option leg.
///
/// `premium * multiplier`, rounded to 2dp. A multiplier of 2 caps the loss at
/// one premium collected. `None` if the product overflows.
pub fn stop_price(premium: Decimal, multiplier: Decimal) -> Option<Decimal> {
    premium
        .checked_mul(multiplier)
        .map(|stop| round_to_precision(stop, 2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn ticker(value: serde_json::Value) -> Ticker {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_close_string_is_parsed() {
        assert_eq!(extract_price(&ticker(json!({"close": "100.5"}))), Some(dec!(100.5)));
    }

    #[test]
    fn test_zero_mark_price_is_a_price() {
        assert_eq!(extract_price(&ticker(json!({"mark_price": 0}))), Some(dec!(0)));
    }

    #[test]
    fn test_empty_ticker_has_no_price() {
        assert_eq!(extract_price(&ticker(json!({}))), None);
    }

    #[test]
    fn test_precedence_order() {
        let t = ticker(json!({"close": "10", "last_price": "11", "mark_price": "12"}));
        assert_eq!(extract_price(&t), Some(dec!(10)));

        let t = ticker(json!({"last_price": 11.5, "mark_price": "12"}));
        assert_eq!(extract_price(&t), Some(dec!(11.5)));
    }

    #[test]
    fn test_non_numeric_falls_through() {
        let t = ticker(json!({"close": "n/a", "last_price": null, "mark_price": "12.25"}));
        assert_eq!(extract_price(&t), Some(dec!(12.25)));
        assert_eq!(PriceField::Close.extract(&t), None);
        assert_eq!(PriceField::MarkPrice.name(), "mark_price");
    }

    #[test]
    fn test_stop_price_doubles_premium() {
        assert_eq!(stop_price(dec!(12.34), dec!(2)), Some(dec!(24.68)));
        assert_eq!(stop_price(dec!(0.005), dec!(2)), Some(dec!(0.01)));
        assert_eq!(stop_price(dec!(10.1234), dec!(2)), Some(dec!(20.25)));
    }

    #[test]
    fn test_stop_price_overflow() {
        assert_eq!(stop_price(Decimal::MAX, dec!(2)), None);
    }
}
