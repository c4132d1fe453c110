//! TradeRecord: one simulated round-trip trade, canonicalized at the wire boundary.

use super::lenient;
use serde::{Deserialize, Serialize};

/// Direction parsed from a free-form side label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeSide {
    Long,
    Short,
}

impl TradeSide {
    /// Classify a side label by substring.
    ///
    /// `"long"` is checked before `"short"`; a label matching neither has no
    /// direction. Matching is case-sensitive, as labels come from the backend
    /// verbatim (`"long"`, `"open_short"`, ...).
    pub fn classify(label: &str) -> Option<Self> {
        if label.contains("long") {
            Some(TradeSide::Long)
        } else if label.contains("short") {
            Some(TradeSide::Short)
        } else {
            None
        }
    }
}

/// A completed simulated trade.
///
/// Deserialization accepts both historical field spellings (`pnl_usdt`/`pnl`,
/// `position_size`/`size`) and always produces this single shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireTrade")]
pub struct TradeRecord {
    pub side: String,
    pub entry_price: Option<f64>,
    pub exit_price: Option<f64>,
    pub position_size: Option<f64>,
    /// Realized PnL in USDT.
    pub pnl: Option<f64>,
    /// Return as a fraction (0.05 = 5%).
    pub return_pct: Option<f64>,
    pub enter_time: Option<String>,
    pub exit_time: Option<String>,
}

impl TradeRecord {
    /// PnL used for every calculation; missing PnL counts as zero.
    pub fn pnl_or_zero(&self) -> f64 {
        self.pnl.unwrap_or(0.0)
    }

    pub fn return_or_zero(&self) -> f64 {
        self.return_pct.unwrap_or(0.0)
    }

    /// A trade wins when its PnL is non-negative. Break-even counts as a win.
    pub fn is_win(&self) -> bool {
        self.pnl_or_zero() >= 0.0
    }

    pub fn direction(&self) -> Option<TradeSide> {
        TradeSide::classify(&self.side)
    }

    /// Entry notional (`size * entry_price`) in USDT.
    pub fn notional(&self) -> f64 {
        self.position_size.unwrap_or(0.0) * self.entry_price.unwrap_or(0.0)
    }
}

/// Every shape the backend has ever emitted for a trade.
#[derive(Debug, Default, Deserialize)]
struct WireTrade {
    #[serde(default, deserialize_with = "lenient::text")]
    side: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    entry_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    exit_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    position_size: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    size: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pnl: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pnl_usdt: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    return_pct: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text")]
    enter_time: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    exit_time: Option<String>,
}

impl From<WireTrade> for TradeRecord {
    fn from(w: WireTrade) -> Self {
        Self {
            side: w.side.unwrap_or_default(),
            entry_price: w.entry_price,
            exit_price: w.exit_price,
            position_size: w.position_size.or(w.size),
            pnl: w.pnl_usdt.or(w.pnl),
            return_pct: w.return_pct,
            enter_time: w.enter_time,
            exit_time: w.exit_time,
        }
    }
}
