//! Equity curve points.

use super::lenient;
use serde::{Deserialize, Serialize};

/// One sample of account equity. Index position is the only ordering signal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    /// Account value; missing or malformed samples decode as `0.0`.
    #[serde(default, deserialize_with = "lenient::number_or_zero")]
    pub equity: f64,
    /// Sample label as emitted by the backend, passed through untouched.
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

impl EquityPoint {
    pub fn new(equity: f64) -> Self {
        Self { equity, time: None }
    }
}

/// Project a curve onto its equity values.
pub fn equity_values(curve: &[EquityPoint]) -> Vec<f64> {
    curve.iter().map(|p| p.equity).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn malformed_equity_decodes_as_zero() {
        let curve: Vec<EquityPoint> =
            serde_json::from_value(json!([{"equity": "abc"}, {"time": "END"}, {"equity": 5}]))
                .unwrap();
        assert_eq!(equity_values(&curve), vec![0.0, 0.0, 5.0]);
        assert_eq!(curve[1].time.as_deref(), Some("END"));
    }
}
