//! Backend-computed run metrics. Passed through for display, never recomputed.

use super::lenient;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    #[serde(default, deserialize_with = "lenient::number")]
    pub starting_equity: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub ending_equity: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub total_pnl: Option<f64>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub num_trades: Option<u64>,
    /// Fraction of winning trades as the backend counted them.
    #[serde(default, deserialize_with = "lenient::number")]
    pub win_rate: Option<f64>,
    /// Peak-to-trough decline as a fraction.
    #[serde(default, deserialize_with = "lenient::number")]
    pub max_drawdown: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub position_size_override: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub leverage_used: Option<f64>,
}
