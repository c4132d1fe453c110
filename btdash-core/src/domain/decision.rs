//! DecisionRecord: one row of the bot's decision history.

use super::lenient;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    #[serde(default, deserialize_with = "lenient::count")]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub timestamp: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub symbol: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub current_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub action: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub confidence_level: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub reason: Option<String>,
    /// Position size in contracts/coins (not USDT).
    #[serde(default, deserialize_with = "lenient::number")]
    pub position_size: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub stop_loss_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub take_profit_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub executed: bool,
}

impl DecisionRecord {
    /// Position notional in USDT. A non-positive or missing price counts as zero.
    pub fn notional(&self) -> f64 {
        let price = self.current_price.filter(|p| *p > 0.0).unwrap_or(0.0);
        self.position_size.unwrap_or(0.0) * price
    }

    /// Identity of a decision for "has a newer one arrived" checks.
    pub fn latest_key(&self) -> String {
        format!(
            "{}|{}|{}",
            self.timestamp.as_deref().unwrap_or(""),
            self.action.as_deref().unwrap_or(""),
            self.reason.as_deref().unwrap_or("")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn executed_accepts_integer_flag() {
        let d: DecisionRecord = serde_json::from_value(json!({"executed": 1})).unwrap();
        assert!(d.executed);
    }

    #[test]
    fn notional_ignores_negative_price() {
        let d = DecisionRecord {
            position_size: Some(2.0),
            current_price: Some(-10.0),
            ..Default::default()
        };
        assert_eq!(d.notional(), 0.0);
    }

    #[test]
    fn latest_key_joins_fields() {
        let d = DecisionRecord {
            timestamp: Some("2024-05-01 10:00:00".into()),
            action: Some("BUY".into()),
            reason: None,
            ..Default::default()
        };
        assert_eq!(d.latest_key(), "2024-05-01 10:00:00|BUY|");
    }
}
