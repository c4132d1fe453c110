//! btdash analytics: everything derived from a backtest run.
//!
//! - Trade statistics and the rolling win-rate trend (pure functions)
//! - Line-chart rendering onto pluggable surfaces (recording, SVG)
//! - The backtest controller owning the trade table's paging
//! - The decision-history view owning its own paging
//! - Display strings and CSV/JSON export

pub mod chart;
pub mod controller;
pub mod export;
pub mod history;
pub mod stats;
pub mod trend;
pub mod view;

pub use chart::{
    ChartRenderer, RecordingSurface, RenderOutcome, Surface, SurfaceError, SvgSurface, Viewport,
};
pub use controller::{ApplyOutcome, BacktestController, RunTicket, RunView};
pub use export::ExportFormat;
pub use history::{DecisionHistory, HistoryUpdate};
pub use stats::TradeStats;
pub use trend::{rolling_win_rate, DEFAULT_WINDOW};
