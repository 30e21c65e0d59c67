//! Contract discovery and strike selection.

use super::symbol::OptionSymbol;
use crate::exchange::Product;
use rust_decimal::Decimal;
use std::collections::{BTreeSet, HashMap};

/// Same-day option contracts keyed by full symbol.
pub type ContractMap = HashMap<String, Product>;

/// Keep the `{C|P}-<asset>-<strike>-<expiry>` products expiring on `expiry`.
pub fn discover_contracts(products: &[Product], asset: &str, expiry: &str) -> ContractMap {
    products
        .iter()
        .filter(|p| !p.symbol.is_empty() && p.symbol.contains(asset))
        .filter(|p| {
            OptionSymbol::parse(&p.symbol)
                .is_some_and(|sym| sym.asset == asset && sym.expiry == expiry)
        })
        .map(|p| (p.symbol.clone(), p.clone()))
        .collect()
}

/// Distinct strikes present among `contracts`, ascending.
pub fn collect_strikes(contracts: &ContractMap) -> Vec<Decimal> {
    contracts
        .keys()
        .filter_map(|symbol| OptionSymbol::parse(symbol))
        .map(|sym| sym.strike)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Strike closest to `target`; ties go to the first one in `strikes` order.
pub fn nearest_strike(strikes: &[Decimal], target: Decimal) -> Option<Decimal> {
    strikes.iter().copied().fold(None, |best, strike| match best {
        Some(b) if distance(b, target) <= distance(strike, target) => Some(b),
        _ => Some(strike),
    })
}

fn distance(strike: Decimal, target: Decimal) -> Decimal {
    strike
        .checked_sub(target)
        .map(|d| d.abs())
        .unwrap_or(Decimal::MAX)
}

/// `spot * (1 + offset)` and `spot * (1 - offset)`, or `None` on overflow.
pub fn strike_targets(spot: Decimal, offset: Decimal) -> Option<(Decimal, Decimal)> {
    let up = spot.checked_mul(Decimal::ONE.checked_add(offset)?)?;
    let down = spot.checked_mul(Decimal::ONE.checked_sub(offset)?)?;
    Some((up, down))
}

/// Call and put strikes nearest to the [`strike_targets`].
pub fn pick_strikes(
    spot: Decimal,
    strikes: &[Decimal],
    offset: Decimal,
) -> Option<(Decimal, Decimal)> {
    let (up_target, down_target) = strike_targets(spot, offset)?;
    let call = nearest_strike(strikes, up_target)?;
    let put = nearest_strike(strikes, down_target)?;
    Some((call, put))
}
