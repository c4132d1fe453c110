//! Domain types for the backtest dashboard.

pub mod decision;
pub mod equity;
pub mod lenient;
pub mod metrics;
pub mod response;
pub mod trade;

pub use decision::DecisionRecord;
pub use equity::{equity_values, EquityPoint};
pub use metrics::Metrics;
pub use response::{BacktestResponse, BacktestRun, DecisionPage, ResponseError};
pub use trade::{TradeRecord, TradeSide};
