//! Short strangle strategy.
//!
//! Contains the core logic for:
//! - Option symbol parsing and same-day expiry tagging
//! - Contract discovery and strike selection around spot
//! - Premium lookup and stop-loss pricing
//! - Sequential order placement and run reporting

mod error;
mod executor;
pub mod pricing;
mod report;
pub mod selection;
pub mod symbol;

pub use error::StrangleError;
pub use executor::StrangleExecutor;
pub use pricing::{extract_price, stop_price, PriceField, PRICE_PRECEDENCE};
pub use report::{ExecutionReport, LegSummary, PlacedOrder};
pub use selection::{collect_strikes, discover_contracts, pick_strikes, strike_targets};
pub use symbol::{expiry_tag, OptionKind, OptionSymbol};
