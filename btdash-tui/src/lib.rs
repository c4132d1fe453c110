//! btdash TUI: terminal dashboard over backtest results and decision history.
//!
//! Panels:
//! 1. Backtest: parameters, summary, trade statistics, best/worst trade
//! 2. Trades: paginated trade table
//! 3. Charts: equity curve and rolling win rate
//! 4. History: latest decision and paginated decision history
//! 5. Help: keyboard shortcuts

pub mod app;
pub mod input;
pub mod persistence;
pub mod surface;
pub mod theme;
pub mod ui;
pub mod worker;
