//! Delta option symbology: `{C|P}-<ASSET>-<strike>-<ddmmyy>`.

use crate::utils::decimal::parse_decimal;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use std::fmt;

/// IST is UTC+05:30; Delta dates option expiries in IST.
const IST_OFFSET_SECS: i64 = 5 * 3600 + 30 * 60;

/// Today's expiry tag (`ddmmyy`) in India Standard Time.
pub fn expiry_tag(now: DateTime<Utc>) -> String {
    (now + Duration::seconds(IST_OFFSET_SECS))
        .format("%d%m%y")
        .to_string()
}

/// Contract type letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKind {
    Call,
    Put,
}

impl OptionKind {
    pub fn letter(&self) -> &'static str {
        match self {
            OptionKind::Call => "C",
            OptionKind::Put => "P",
        }
    }

    /// Exchange shorthand used in reports.
    pub fn short_code(&self) -> &'static str {
        match self {
            OptionKind::Call => "CE",
            OptionKind::Put => "PE",
        }
    }

    fn from_letter(letter: &str) -> Option<Self> {
        match letter {
            "C" => Some(OptionKind::Call),
            "P" => Some(OptionKind::Put),
            _ => None,
        }
    }
}

/// Parsed option symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSymbol {
    pub kind: OptionKind,
    pub asset: String,
    pub strike: Decimal,
    pub expiry: String,
}

impl OptionSymbol {
    pub fn new(kind: OptionKind, asset: &str, strike: Decimal, expiry: &str) -> Self {
        Self {
            kind,
            asset: asset.to_string(),
            strike,
            expiry: expiry.to_string(),
        }
    }

    /// Parse a symbol of exactly four dash-separated segments with a positive strike.
    pub fn parse(symbol: &str) -> Option<Self> {
        let parts: Vec<&str> = symbol.split('-').collect();
        let [kind, asset, strike, expiry] = parts.as_slice() else {
            return None;
        };

        let kind = OptionKind::from_letter(kind)?;
        let strike = parse_decimal(strike).filter(|s| *s > Decimal::ZERO)?;
        if asset.is_empty() || expiry.is_empty() {
            return None;
        }

        Some(Self::new(kind, asset, strike, expiry))
    }

    /// Whether the strike has a fractional part that rendering will drop.
    pub fn has_fractional_strike(&self) -> bool {
        self.strike.fract() != Decimal::ZERO
    }
}

/// Renders the exchange symbol. The strike is truncated to an integer.
impl fmt::Display for OptionSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}-{}",
            self.kind.letter(),
            self.asset,
            self.strike.trunc(),
            self.expiry
        )
    }
}
