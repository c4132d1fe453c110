//! Query parameters for the two backend endpoints the dashboard reads.

use crate::pagination::Pagination;
use serde::{Deserialize, Serialize};

pub const BACKTEST_PATH: &str = "/api/backtest";
pub const HISTORY_PATH: &str = "/api/decision_history";

/// Largest page the history endpoint serves.
pub const MAX_HISTORY_PAGE_SIZE: usize = 200;

/// Initial equity used when the user input is not a number.
pub const DEFAULT_INITIAL_EQUITY: f64 = 10_000.0;

/// Parameters of one backtest request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestQuery {
    pub symbol: String,
    pub initial_equity: f64,
    /// Position size override in USDT; only sent when positive.
    pub position_size: Option<f64>,
    /// Leverage override; only sent when positive.
    pub leverage: Option<f64>,
}

impl BacktestQuery {
    pub fn new(symbol: impl Into<String>, initial_equity: f64) -> Self {
        Self {
            symbol: symbol.into(),
            initial_equity: if initial_equity.is_finite() {
                initial_equity
            } else {
                DEFAULT_INITIAL_EQUITY
            },
            position_size: None,
            leverage: None,
        }
    }

    /// Build from raw form inputs. Unparseable equity falls back to the
    /// default; size and leverage are dropped unless positive.
    pub fn from_inputs(symbol: &str, equity: &str, size: &str, leverage: &str) -> Self {
        let initial_equity = parse_finite(equity).unwrap_or(DEFAULT_INITIAL_EQUITY);
        Self {
            symbol: symbol.to_string(),
            initial_equity,
            position_size: positive(parse_finite(size)),
            leverage: positive(parse_finite(leverage)),
        }
    }

    pub fn with_position_size(mut self, size: Option<f64>) -> Self {
        self.position_size = positive(size);
        self
    }

    pub fn with_leverage(mut self, leverage: Option<f64>) -> Self {
        self.leverage = positive(leverage);
        self
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("symbol", self.symbol.clone()),
            ("initial_equity", self.initial_equity.to_string()),
        ];
        if let Some(size) = self.position_size {
            pairs.push(("position_size", size.to_string()));
        }
        if let Some(lev) = self.leverage {
            pairs.push(("leverage", lev.to_string()));
        }
        pairs
    }
}

/// Parameters of one decision-history page request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryQuery {
    pub symbol: String,
    pub page: usize,
    pub page_size: usize,
}

impl HistoryQuery {
    /// The page the given paging state currently points at.
    pub fn for_page(pages: &Pagination, symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            page: pages.page(),
            page_size: pages.page_size(),
        }
    }

    /// The `page`-th page of the largest size the server allows.
    pub fn bulk(symbol: impl Into<String>, page: usize) -> Self {
        Self {
            symbol: symbol.into(),
            page: page.max(1),
            page_size: MAX_HISTORY_PAGE_SIZE,
        }
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("page", self.page.to_string()),
            ("page_size", self.page_size.to_string()),
            ("symbol", self.symbol.clone()),
        ]
    }
}

fn parse_finite(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}
