//! App state persistence: JSON save/load across restarts.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::app::{AppState, Panel};

/// Serializable subset of app state that persists across restarts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    pub active_panel: Panel,
    pub symbol: Option<String>,
    pub trades_page_size: Option<usize>,
    pub history_page_size: Option<usize>,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            active_panel: Panel::Backtest,
            symbol: None,
            trades_page_size: None,
            history_page_size: None,
        }
    }
}

/// Load persisted state from disk. Returns defaults if file is missing or corrupt.
pub fn load(path: &Path) -> PersistedState {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
        Err(_) => PersistedState::default(),
    }
}

/// Save persisted state to disk. Creates parent directories if needed.
pub fn save(path: &Path, state: &PersistedState) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn extract(app: &AppState) -> PersistedState {
    PersistedState {
        active_panel: app.active_panel,
        symbol: Some(app.query.symbol.clone()),
        trades_page_size: Some(app.controller.trade_pages().page_size()),
        history_page_size: Some(app.history.pages().page_size()),
    }
}

/// Apply persisted state to a freshly built AppState, before any fetch.
pub fn apply(app: &mut AppState, state: PersistedState) {
    app.active_panel = state.active_panel;
    if let Some(symbol) = state.symbol.filter(|s| !s.trim().is_empty()) {
        app.query.symbol = symbol.clone();
        app.history.set_symbol(symbol);
    }
    if let Some(size) = state.trades_page_size {
        app.controller.set_page_size(size);
    }
    if let Some(size) = state.history_page_size {
        app.history.set_page_size(size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use btdash_core::DashboardConfig;
    use std::path::PathBuf;
    use std::sync::mpsc;

    fn app() -> AppState {
        let (cmd_tx, _cmd_rx) = mpsc::channel();
        let (_resp_tx, resp_rx) = mpsc::channel();
        AppState::new(DashboardConfig::default(), cmd_tx, resp_rx, PathBuf::from("state.json"))
    }

    #[test]
    fn roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("btdash").join("state.json");

        let state = PersistedState {
            active_panel: Panel::History,
            symbol: Some("BTC-USDT-SWAP".into()),
            trades_page_size: Some(50),
            history_page_size: Some(20),
        };
        save(&path, &state).unwrap();
        assert_eq!(load(&path), state);
    }

    #[test]
    fn missing_file_returns_defaults() {
        let loaded = load(Path::new("/nonexistent/path/state.json"));
        assert_eq!(loaded, PersistedState::default());
    }

    #[test]
    fn corrupt_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "not valid json {{{").unwrap();
        assert_eq!(load(&path), PersistedState::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, r#"{"active_panel":"Charts"}"#).unwrap();
        let loaded = load(&path);
        assert_eq!(loaded.active_panel, Panel::Charts);
        assert_eq!(loaded.trades_page_size, None);
    }

    #[test]
    fn apply_then_extract() {
        let mut app = app();
        apply(
            &mut app,
            PersistedState {
                active_panel: Panel::Trades,
                symbol: Some("SOL-USDT-SWAP".into()),
                trades_page_size: Some(100),
                history_page_size: Some(0),
            },
        );
        let out = extract(&app);
        assert_eq!(out.active_panel, Panel::Trades);
        assert_eq!(out.symbol.as_deref(), Some("SOL-USDT-SWAP"));
        assert_eq!(out.trades_page_size, Some(100));
        assert_eq!(out.history_page_size, Some(10));
        assert_eq!(app.history.symbol(), "SOL-USDT-SWAP");
    }
}
