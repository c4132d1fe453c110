//! btdash core: the data side of the backtest dashboard.
//!
//! - Domain types for backend payloads, normalized at the serde boundary
//! - Paging state shared by the trade and decision-history tables
//! - Display-string conventions
//! - Request building and result sources (file, HTTP)
//! - TOML configuration

pub mod config;
pub mod domain;
pub mod format;
pub mod pagination;
pub mod request;
pub mod source;

pub use config::{ConfigError, DashboardConfig};
pub use pagination::Pagination;
pub use source::{FileSource, HttpSource, ResultSource, SourceError};

#[cfg(test)]
mod tests {
    use super::*;

    /// Responses cross the loader thread in the TUI.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::BacktestResponse>();
        require_sync::<domain::BacktestResponse>();
        require_send::<domain::DecisionPage>();
        require_sync::<domain::DecisionPage>();
        require_send::<Pagination>();
        require_send::<DashboardConfig>();
        require_send::<SourceError>();
    }
}
