//! Strangle execution: one full cycle from spot price to stop orders.

use super::error::StrangleError;
use super::pricing::{extract_price, stop_price};
use super::report::{ExecutionReport, LegSummary, PlacedOrder};
use super::selection::{
    collect_strikes, discover_contracts, pick_strikes, strike_targets, ContractMap,
};
use super::symbol::{expiry_tag, OptionKind, OptionSymbol};
use crate::config::StrategyConfig;
use crate::exchange::{OptionsExchange, OrderRequest, OrderSide};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{error, info, instrument, warn};

/// Executes a same-day short strangle.
///
/// Stateless between runs; every call re-reads products and prices.
pub struct StrangleExecutor {
    config: StrategyConfig,
}

/// A leg after contract resolution, before orders go out.
struct ResolvedLeg {
    kind: OptionKind,
    symbol: String,
    product_id: i64,
    premium: Decimal,
}

impl StrangleExecutor {
    /// Create a new strangle executor.
    pub fn new(config: StrategyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    /// Run one cycle for `underlying_symbol` at the current time.
    pub async fn execute(
        &self,
        exchange: &dyn OptionsExchange,
        underlying_symbol: &str,
    ) -> Result<ExecutionReport, StrangleError> {
        self.execute_at(exchange, underlying_symbol, Utc::now()).await
    }

    /// Run one cycle as of `now`.
    ///
    /// Steps run strictly in order and the first failure aborts the run.
    /// Orders already placed at that point are left live.
    #[instrument(skip(self, exchange), fields(asset = %self.config.option_asset))]
    pub async fn execute_at(
        &self,
        exchange: &dyn OptionsExchange,
        underlying_symbol: &str,
        now: DateTime<Utc>,
    ) -> Result<ExecutionReport, StrangleError> {
        let asset = self.config.option_asset.as_str();

        let spot_ticker = exchange.get_ticker(underlying_symbol).await?;
        let spot = extract_price(&spot_ticker).ok_or_else(|| StrangleError::PriceUnavailable {
            symbol: underlying_symbol.to_string(),
        })?;

        let expiry = expiry_tag(now);
        info!(%underlying_symbol, %spot, %expiry, "Spot resolved");

        let products = exchange.get_products().await?;
        let contracts = discover_contracts(&products, asset, &expiry);
        if contracts.is_empty() {
            return Err(StrangleError::NoContractsForExpiry {
                asset: asset.to_string(),
                expiry,
            });
        }

        if strike_targets(spot, self.config.strike_offset).is_none() {
            return Err(StrangleError::PriceOutOfRange {
                symbol: underlying_symbol.to_string(),
            });
        }

        let strikes = collect_strikes(&contracts);
        let (call_strike, put_strike) =
            pick_strikes(spot, &strikes, self.config.strike_offset)
                .ok_or(StrangleError::NoStrikesParsed)?;

        info!(
            contracts = contracts.len(),
            strikes = strikes.len(),
            %call_strike,
            %put_strike,
            "Strikes selected"
        );

        let call_symbol = self.leg_symbol(OptionKind::Call, call_strike, &expiry);
        let put_symbol = self.leg_symbol(OptionKind::Put, put_strike, &expiry);

        if !contracts.contains_key(&call_symbol) || !contracts.contains_key(&put_symbol) {
            return Err(StrangleError::SelectedContractMissing {
                call: call_symbol,
                put: put_symbol,
            });
        }

        let call_id = product_id(&contracts, &call_symbol)?;
        let put_id = product_id(&contracts, &put_symbol)?;

        let call = ResolvedLeg {
            kind: OptionKind::Call,
            premium: premium(exchange, &call_symbol).await?,
            symbol: call_symbol,
            product_id: call_id,
        };
        let put = ResolvedLeg {
            kind: OptionKind::Put,
            premium: premium(exchange, &put_symbol).await?,
            symbol: put_symbol,
            product_id: put_id,
        };

        // Stops are priced before any order goes out.
        let call_stop = leg_stop(&call, self.config.stop_loss_multiplier)?;
        let put_stop = leg_stop(&put, self.config.stop_loss_multiplier)?;

        let size = self.config.order_size;
        let mut orders: Vec<PlacedOrder> = Vec::with_capacity(4);

        for leg in [&call, &put] {
            let label = format!("{} entry", leg.kind.short_code());
            let order = OrderRequest::market(leg.product_id, OrderSide::Sell, size);
            place(exchange, label, &order, &mut orders).await?;
        }

        for (leg, stop) in [(&call, call_stop), (&put, put_stop)] {
            let label = format!("{} stop", leg.kind.short_code());
            let order = OrderRequest::stop(leg.product_id, OrderSide::Buy, size, stop);
            place(exchange, label, &order, &mut orders).await?;
        }

        info!(%expiry, %spot, call_stop = %call_stop, put_stop = %put_stop, "Strangle placed");

        Ok(ExecutionReport {
            asset: asset.to_string(),
            expiry,
            spot,
            call: leg_summary(call, call_stop),
            put: leg_summary(put, put_stop),
            orders,
        })
    }

    fn leg_symbol(&self, kind: OptionKind, strike: Decimal, expiry: &str) -> String {
        let symbol = OptionSymbol::new(kind, &self.config.option_asset, strike, expiry);
        if symbol.has_fractional_strike() {
            warn!(%strike, symbol = %symbol, "Fractional strike truncated when building symbol");
        }
        symbol.to_string()
    }
}

fn product_id(contracts: &ContractMap, symbol: &str) -> Result<i64, StrangleError> {
    contracts
        .get(symbol)
        .and_then(|p| p.id)
        .ok_or_else(|| StrangleError::ProductIdMissing {
            symbol: symbol.to_string(),
        })
}

async fn premium(exchange: &dyn OptionsExchange, symbol: &str) -> Result<Decimal, StrangleError> {
    let ticker = exchange.get_ticker(symbol).await?;
    extract_price(&ticker).ok_or_else(|| StrangleError::PremiumUnavailable {
        symbol: symbol.to_string(),
    })
}

async fn place(
    exchange: &dyn OptionsExchange,
    label: String,
    order: &OrderRequest,
    placed: &mut Vec<PlacedOrder>,
) -> Result<(), StrangleError> {
    match exchange.place_order(order).await {
        Ok(record) => {
            info!(%label, order_id = ?record.id, state = ?record.state, "Order placed");
            placed.push(PlacedOrder { label, record });
            Ok(())
        }
        Err(e) => {
            let live: Vec<String> = placed
                .iter()
                .map(|o| format!("{}={:?}", o.label, o.record.id))
                .collect();
            error!(%label, error = %e, already_placed = ?live, "Order placement failed, earlier orders stay live");
            Err(StrangleError::from_order(&label, e))
        }
    }
}

fn leg_stop(leg: &ResolvedLeg, multiplier: Decimal) -> Result<Decimal, StrangleError> {
    stop_price(leg.premium, multiplier).ok_or_else(|| StrangleError::PriceOutOfRange {
        symbol: leg.symbol.clone(),
    })
}

fn leg_summary(leg: ResolvedLeg, stop_price: Decimal) -> LegSummary {
    LegSummary {
        kind: leg.kind,
        symbol: leg.symbol,
        product_id: leg.product_id,
        premium: leg.premium,
        stop_price,
    }
}
