//! Where backtest results and decision history come from.
//!
//! The analytics layer never performs I/O; the binaries pick a
//! [`ResultSource`] and hand the materialized responses over. Two sources
//! exist: saved JSON files and the live dashboard HTTP API.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::config::SourceSettings;
use crate::domain::{BacktestResponse, DecisionPage, DecisionRecord, ResponseError};
use crate::request::{BacktestQuery, HistoryQuery, BACKTEST_PATH, HISTORY_PATH};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{0}")]
    Response(#[from] ResponseError),

    #[error("source has no {0} configured")]
    NotConfigured(&'static str),
}

/// Anything that can produce backend responses.
pub trait ResultSource: Send + Sync {
    fn backtest(&self, query: &BacktestQuery) -> Result<BacktestResponse, SourceError>;

    fn history(&self, query: &HistoryQuery) -> Result<DecisionPage, SourceError>;

    /// Every decision for `symbol`, newest first, walking the history pages
    /// until the reported total is reached. Without a total, a short or
    /// empty page ends the walk.
    fn all_history(&self, symbol: &str) -> Result<Vec<DecisionRecord>, SourceError> {
        let mut records = Vec::new();
        let mut page = 1;
        loop {
            let query = HistoryQuery::bulk(symbol, page);
            let response = self.history(&query)?;
            let total = response.total.map(|t| t as usize);
            let rows = response.into_records()?;
            let fetched = rows.len();
            records.extend(rows);
            let done = match total {
                Some(total) => records.len() >= total,
                None => fetched < query.page_size,
            };
            if fetched == 0 || done {
                break;
            }
            page += 1;
        }
        tracing::debug!(symbol, pages = page, rows = records.len(), "full history fetched");
        Ok(records)
    }

    fn describe(&self) -> String;
}

/// Saved responses on disk. Queries are ignored; the files are the answer.
#[derive(Debug, Clone, Default)]
pub struct FileSource {
    pub backtest_path: Option<PathBuf>,
    pub history_path: Option<PathBuf>,
}

impl FileSource {
    pub fn new(backtest_path: Option<PathBuf>, history_path: Option<PathBuf>) -> Self {
        Self {
            backtest_path,
            history_path,
        }
    }

    fn read(path: &PathBuf) -> Result<String, SourceError> {
        std::fs::read_to_string(path).map_err(|source| SourceError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}

impl ResultSource for FileSource {
    fn backtest(&self, _query: &BacktestQuery) -> Result<BacktestResponse, SourceError> {
        let path = self
            .backtest_path
            .as_ref()
            .ok_or(SourceError::NotConfigured("backtest file"))?;
        Ok(BacktestResponse::from_json(&Self::read(path)?)?)
    }

    fn history(&self, _query: &HistoryQuery) -> Result<DecisionPage, SourceError> {
        let path = self
            .history_path
            .as_ref()
            .ok_or(SourceError::NotConfigured("history file"))?;
        Ok(DecisionPage::from_json(&Self::read(path)?)?)
    }

    /// A saved history file is a single page; it is the whole history.
    fn all_history(&self, symbol: &str) -> Result<Vec<DecisionRecord>, SourceError> {
        Ok(self.history(&HistoryQuery::bulk(symbol, 1))?.into_records()?)
    }

    fn describe(&self) -> String {
        let show = |p: &Option<PathBuf>| {
            p.as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "-".to_string())
        };
        format!(
            "files (backtest: {}, history: {})",
            show(&self.backtest_path),
            show(&self.history_path)
        )
    }
}

/// The dashboard backend's JSON API.
pub struct HttpSource {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| SourceError::Http {
                url: base_url.clone(),
                source,
            })?;
        Ok(Self { base_url, client })
    }

    fn get_text(
        &self,
        path: &str,
        pairs: &[(&'static str, String)],
    ) -> Result<String, SourceError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "fetching");
        let http_err = |source| SourceError::Http {
            url: url.clone(),
            source,
        };
        // Error statuses still carry a JSON body with `success: false`.
        self.client
            .get(&url)
            .query(pairs)
            .send()
            .map_err(http_err)?
            .text()
            .map_err(http_err)
    }
}

impl ResultSource for HttpSource {
    fn backtest(&self, query: &BacktestQuery) -> Result<BacktestResponse, SourceError> {
        let body = self.get_text(BACKTEST_PATH, &query.query_pairs())?;
        Ok(BacktestResponse::from_json(&body)?)
    }

    fn history(&self, query: &HistoryQuery) -> Result<DecisionPage, SourceError> {
        let body = self.get_text(HISTORY_PATH, &query.query_pairs())?;
        Ok(DecisionPage::from_json(&body)?)
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

/// The source described by the `[source]` config section: saved files when
/// any file path is set, the HTTP API otherwise.
pub fn from_settings(settings: &SourceSettings) -> Result<Box<dyn ResultSource>, SourceError> {
    if settings.uses_files() {
        return Ok(Box::new(FileSource::new(
            settings.backtest_file.clone(),
            settings.history_file.clone(),
        )));
    }
    let source = HttpSource::new(
        settings.base_url.clone(),
        Duration::from_secs(settings.timeout_secs),
    )?;
    Ok(Box::new(source))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_source_reads_both_endpoints() {
        let dir = tempfile::tempdir().unwrap();
        let bt = dir.path().join("bt.json");
        let hist = dir.path().join("hist.json");
        std::fs::write(&bt, r#"{"success": true, "trades": [{"pnl": 1}], "curve": []}"#).unwrap();
        std::fs::write(&hist, r#"{"success": true, "total": 1, "data": [{"action": "BUY"}]}"#)
            .unwrap();

        let source = FileSource::new(Some(bt), Some(hist));
        let q = BacktestQuery::new("ETH", 10_000.0);
        let resp = source.backtest(&q).unwrap();
        assert_eq!(resp.trades.len(), 1);

        let page = source
            .history(&HistoryQuery {
                symbol: "ETH".into(),
                page: 1,
                page_size: 10,
            })
            .unwrap();
        assert_eq!(page.total_or_zero(), 1);
    }

    #[test]
    fn missing_path_is_not_configured() {
        let source = FileSource::default();
        let q = BacktestQuery::new("ETH", 10_000.0);
        assert!(matches!(
            source.backtest(&q),
            Err(SourceError::NotConfigured(_))
        ));
    }

    #[test]
    fn unreadable_file_is_io_error() {
        let source = FileSource::new(Some(PathBuf::from("/nonexistent/bt.json")), None);
        let q = BacktestQuery::new("ETH", 10_000.0);
        assert!(matches!(source.backtest(&q), Err(SourceError::Io { .. })));
    }

    /// Serves `total` decisions in pages, honoring the query like the backend.
    struct Paged {
        total: usize,
        report_total: bool,
    }

    impl ResultSource for Paged {
        fn backtest(&self, _query: &BacktestQuery) -> Result<BacktestResponse, SourceError> {
            Err(SourceError::NotConfigured("backtest"))
        }

        fn history(&self, query: &HistoryQuery) -> Result<DecisionPage, SourceError> {
            let start = (query.page - 1) * query.page_size;
            let end = (start + query.page_size).min(self.total);
            Ok(DecisionPage {
                total: self.report_total.then_some(self.total as u64),
                data: (start.min(end)..end)
                    .map(|i| DecisionRecord {
                        id: Some(i as u64),
                        ..Default::default()
                    })
                    .collect(),
                ..Default::default()
            })
        }

        fn describe(&self) -> String {
            "paged".into()
        }
    }

    #[test]
    fn all_history_walks_every_page() {
        let source = Paged {
            total: 450,
            report_total: true,
        };
        let records = source.all_history("ETH").unwrap();
        assert_eq!(records.len(), 450);
        assert_eq!(records[0].id, Some(0));
        assert_eq!(records[449].id, Some(449));
    }

    #[test]
    fn all_history_without_total_stops_on_short_page() {
        let source = Paged {
            total: 400,
            report_total: false,
        };
        assert_eq!(source.all_history("ETH").unwrap().len(), 400);
        let empty = Paged {
            total: 0,
            report_total: true,
        };
        assert!(empty.all_history("ETH").unwrap().is_empty());
    }

    #[test]
    fn all_history_from_file_is_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let hist = dir.path().join("hist.json");
        std::fs::write(
            &hist,
            r#"{"success": true, "total": 50, "data": [{"action": "BUY"}, {"action": "HOLD"}]}"#,
        )
        .unwrap();
        let source = FileSource::new(None, Some(hist));
        assert_eq!(source.all_history("ETH").unwrap().len(), 2);
    }

    #[test]
    fn all_history_surfaces_rejection() {
        let dir = tempfile::tempdir().unwrap();
        let hist = dir.path().join("hist.json");
        std::fs::write(&hist, r#"{"success": false, "error": "db locked"}"#).unwrap();
        let source = FileSource::new(None, Some(hist));
        assert!(matches!(
            source.all_history("ETH"),
            Err(SourceError::Response(ResponseError::Rejected(_)))
        ));
    }

    #[test]
    fn settings_with_files_pick_file_source() {
        let settings = SourceSettings {
            backtest_file: Some(PathBuf::from("bt.json")),
            ..SourceSettings::default()
        };
        let source = from_settings(&settings).unwrap();
        assert!(source.describe().starts_with("files"));
        let http = from_settings(&SourceSettings::default()).unwrap();
        assert_eq!(http.describe(), "http://127.0.0.1:5000");
    }

    #[test]
    fn http_source_trims_trailing_slash() {
        let source = HttpSource::new("http://localhost:5000/", Duration::from_secs(1)).unwrap();
        assert_eq!(source.describe(), "http://localhost:5000");
    }
}
