//! Human-readable summary of a strangle run.

use super::symbol::OptionKind;
use crate::exchange::OrderRecord;
use rust_decimal::Decimal;
use std::fmt;

/// One short option leg.
#[derive(Debug, Clone, PartialEq)]
pub struct LegSummary {
    pub kind: OptionKind,
    pub symbol: String,
    pub product_id: i64,
    pub premium: Decimal,
    pub stop_price: Decimal,
}

/// An order placed during the run, labelled e.g. "CE entry".
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedOrder {
    pub label: String,
    pub record: OrderRecord,
}

/// Outcome of a successful run, delivered once to the operator.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionReport {
    pub asset: String,
    pub expiry: String,
    pub spot: Decimal,
    pub call: LegSummary,
    pub put: LegSummary,
    pub orders: Vec<PlacedOrder>,
}

fn or_none<T: fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "None".to_string())
}

impl ExecutionReport {
    /// Report lines in delivery order.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("<b>{} Short Strangle Executed</b>", self.asset),
            format!("Expiry: {}", self.expiry),
            format!("Spot (CMP): {}", self.spot),
        ];

        for leg in [&self.call, &self.put] {
            lines.push(format!(
                "{}: {} | premium≈{} | SL={}",
                leg.kind.short_code(),
                leg.symbol,
                leg.premium,
                leg.stop_price
            ));
        }

        for order in &self.orders {
            lines.push(format!(
                "{}: id={}, state={}",
                order.label,
                or_none(order.record.id),
                or_none(order.record.state.as_deref())
            ));
        }

        lines
    }
}

impl fmt::Display for ExecutionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lines().join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn order(label: &str, id: Option<i64>, state: Option<&str>) -> PlacedOrder {
        PlacedOrder {
            label: label.to_string(),
            record: OrderRecord {
                id,
                state: state.map(str::to_string),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_report_lines() {
        let report = ExecutionReport {
            asset: "BTC".to_string(),
            expiry: "150125".to_string(),
            spot: dec!(50000),
            call: LegSummary {
                kind: OptionKind::Call,
                symbol: "C-BTC-50500-150125".to_string(),
                product_id: 1,
                premium: dec!(12.34),
                stop_price: dec!(24.68),
            },
            put: LegSummary {
                kind: OptionKind::Put,
                symbol: "P-BTC-49500-150125".to_string(),
                product_id: 2,
                premium: dec!(10),
                stop_price: dec!(20),
            },
            orders: vec![
                order("CE entry", Some(101), Some("closed")),
                order("PE entry", Some(102), Some("closed")),
                order("CE stop", Some(103), Some("pending")),
                order("PE stop", None, None),
            ],
        };

        let text = report.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], "<b>BTC Short Strangle Executed</b>");
        assert_eq!(lines[1], "Expiry: 150125");
        assert_eq!(lines[2], "Spot (CMP): 50000");
        assert_eq!(lines[3], "CE: C-BTC-50500-150125 | premium≈12.34 | SL=24.68");
        assert_eq!(lines[4], "PE: P-BTC-49500-150125 | premium≈10 | SL=20");
        assert_eq!(lines[5], "CE entry: id=101, state=closed");
        assert_eq!(lines[8], "PE stop: id=None, state=None");
    }
}
