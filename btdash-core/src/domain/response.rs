//! Response envelopes returned by the dashboard backend.

use super::lenient;
use super::{DecisionRecord, EquityPoint, Metrics, TradeRecord};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors turning a backend response into usable data.
#[derive(Debug, Error)]
pub enum ResponseError {
    #[error("backend rejected the request: {0}")]
    Rejected(String),

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// `GET /api/backtest` envelope.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BacktestResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, deserialize_with = "lenient_metrics")]
    pub metrics: Metrics,
    #[serde(default, deserialize_with = "lenient::records")]
    pub trades: Vec<TradeRecord>,
    #[serde(default, deserialize_with = "lenient::records")]
    pub curve: Vec<EquityPoint>,
}

/// The materialized inputs of one backtest run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BacktestRun {
    pub metrics: Metrics,
    pub trades: Vec<TradeRecord>,
    pub curve: Vec<EquityPoint>,
}

impl BacktestResponse {
    pub fn from_json(json: &str) -> Result<Self, ResponseError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Unwrap the envelope, failing with the backend's message when it
    /// reports `success: false`.
    pub fn into_run(self) -> Result<BacktestRun, ResponseError> {
        if !self.success {
            return Err(ResponseError::Rejected(
                self.error.unwrap_or_else(|| "backtest failed".to_string()),
            ));
        }
        Ok(BacktestRun {
            metrics: self.metrics,
            trades: self.trades,
            curve: self.curve,
        })
    }
}

impl From<BacktestRun> for BacktestResponse {
    fn from(run: BacktestRun) -> Self {
        Self {
            success: true,
            error: None,
            metrics: run.metrics,
            trades: run.trades,
            curve: run.curve,
        }
    }
}

/// `GET /api/decision_history` envelope: one server-side page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionPage {
    #[serde(default = "default_true")]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Total record count across all pages.
    #[serde(default, deserialize_with = "lenient::count")]
    pub total: Option<u64>,
    #[serde(default, deserialize_with = "lenient::records")]
    pub data: Vec<DecisionRecord>,
}

impl DecisionPage {
    pub fn from_json(json: &str) -> Result<Self, ResponseError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn total_or_zero(&self) -> usize {
        self.total.unwrap_or(0) as usize
    }

    /// The rows, or the server's error when it reported failure.
    pub fn into_records(self) -> Result<Vec<DecisionRecord>, ResponseError> {
        if self.success {
            Ok(self.data)
        } else {
            Err(ResponseError::Rejected(
                self.error
                    .unwrap_or_else(|| "decision history request failed".to_string()),
            ))
        }
    }
}

impl Default for DecisionPage {
    fn default() -> Self {
        Self {
            success: true,
            error: None,
            total: None,
            data: Vec::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn lenient_metrics<'de, D>(deserializer: D) -> Result<Metrics, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Metrics>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_response_carries_message() {
        let resp =
            BacktestResponse::from_json(r#"{"success": false, "error": "no data"}"#).unwrap();
        match resp.into_run() {
            Err(ResponseError::Rejected(msg)) => assert_eq!(msg, "no data"),
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn missing_success_is_rejection() {
        let resp = BacktestResponse::from_json(r#"{"trades": []}"#).unwrap();
        assert!(resp.into_run().is_err());
    }

    #[test]
    fn null_collections_decode_empty() {
        let resp = BacktestResponse::from_json(
            r#"{"success": true, "metrics": null, "trades": null, "curve": [null, {"equity": 3}]}"#,
        )
        .unwrap();
        let run = resp.into_run().unwrap();
        assert!(run.trades.is_empty());
        assert_eq!(run.curve.len(), 2);
        assert_eq!(run.curve[0].equity, 0.0);
        assert_eq!(run.metrics, Metrics::default());
    }

    #[test]
    fn decision_page_defaults_to_success() {
        let page =
            DecisionPage::from_json(r#"{"total": "25", "data": [{"action": "HOLD"}]}"#).unwrap();
        assert!(page.success);
        assert_eq!(page.total_or_zero(), 25);
        assert_eq!(page.data[0].action.as_deref(), Some("HOLD"));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        assert!(matches!(
            BacktestResponse::from_json("not json"),
            Err(ResponseError::Decode(_))
        ));
    }
}
