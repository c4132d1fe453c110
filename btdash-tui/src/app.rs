//! Application state. Single owner, mutated only on the main thread.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::debug;

use btdash_analytics::export::{self, ExportFormat};
use btdash_analytics::{ApplyOutcome, BacktestController, DecisionHistory, RunTicket};
use btdash_core::domain::{BacktestResponse, DecisionPage};
use btdash_core::request::{BacktestQuery, HistoryQuery};
use btdash_core::DashboardConfig;

use crate::worker::{WorkerCommand, WorkerResponse};

const MAX_ERRORS: usize = 50;

/// The five top-level panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Panel {
    Backtest,
    Trades,
    Charts,
    History,
    Help,
}

impl Panel {
    pub const ALL: [Panel; 5] = [
        Panel::Backtest,
        Panel::Trades,
        Panel::Charts,
        Panel::History,
        Panel::Help,
    ];

    pub fn index(self) -> usize {
        match self {
            Panel::Backtest => 0,
            Panel::Trades => 1,
            Panel::Charts => 2,
            Panel::History => 3,
            Panel::Help => 4,
        }
    }

    pub fn from_index(i: usize) -> Option<Panel> {
        Self::ALL.get(i).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            Panel::Backtest => "Backtest",
            Panel::Trades => "Trades",
            Panel::Charts => "Charts",
            Panel::History => "History",
            Panel::Help => "Help",
        }
    }

    pub fn next(self) -> Panel {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Panel {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Status bar severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Response,
    Export,
    Other,
}

impl ErrorCategory {
    pub fn label(self) -> &'static str {
        match self {
            ErrorCategory::Network => "NET",
            ErrorCategory::Response => "RESP",
            ErrorCategory::Export => "EXP",
            ErrorCategory::Other => "ERR",
        }
    }
}

/// Editable backtest parameters on the backtest panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    Symbol,
    Equity,
    PositionSize,
    Leverage,
}

impl InputField {
    pub const ALL: [InputField; 4] = [
        InputField::Symbol,
        InputField::Equity,
        InputField::PositionSize,
        InputField::Leverage,
    ];

    pub fn label(self) -> &'static str {
        match self {
            InputField::Symbol => "Symbol",
            InputField::Equity => "Initial equity",
            InputField::PositionSize => "Position size (USDT)",
            InputField::Leverage => "Leverage",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> InputField {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> InputField {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// A field being typed into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEdit {
    pub field: InputField,
    pub buffer: String,
}

/// One entry in the error log on the backtest panel.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub timestamp: NaiveDateTime,
    pub category: ErrorCategory,
    pub message: String,
    pub context: String,
}

pub struct AppState {
    pub running: bool,
    pub active_panel: Panel,
    pub config: DashboardConfig,
    pub query: BacktestQuery,
    pub controller: BacktestController,
    pub history: DecisionHistory,
    pub selected_field: InputField,
    pub editing: Option<FieldEdit>,

    /// Ticket of the backtest fetch in flight, if any.
    pub pending_run: Option<RunTicket>,
    pub history_loading: bool,
    pub history_scroll: usize,
    /// Path of the export the worker is writing, if any.
    pub pending_export: Option<PathBuf>,

    pub status_message: Option<(String, StatusLevel)>,
    pub error_history: VecDeque<ErrorRecord>,

    pub worker_tx: Sender<WorkerCommand>,
    pub worker_rx: Receiver<WorkerResponse>,
    pub state_path: PathBuf,
}

impl AppState {
    pub fn new(
        config: DashboardConfig,
        worker_tx: Sender<WorkerCommand>,
        worker_rx: Receiver<WorkerResponse>,
        state_path: PathBuf,
    ) -> Self {
        let query = config.source.backtest_query();
        let controller = BacktestController::new(&config);
        let history = DecisionHistory::new(
            config.source.symbol.clone(),
            config.tables.history_page_size,
        );
        Self {
            running: true,
            active_panel: Panel::Backtest,
            config,
            query,
            controller,
            history,
            selected_field: InputField::Symbol,
            editing: None,
            pending_run: None,
            history_loading: false,
            history_scroll: 0,
            pending_export: None,
            status_message: None,
            error_history: VecDeque::new(),
            worker_tx,
            worker_rx,
            state_path,
        }
    }

    // ─── Requests ───────────────────────────────────────────────────

    /// Start a backtest fetch. Any fetch still in flight is superseded.
    pub fn request_backtest(&mut self) {
        let ticket = self.controller.begin_run();
        let cmd = WorkerCommand::RunBacktest {
            ticket,
            query: self.query.clone(),
        };
        if self.worker_tx.send(cmd).is_err() {
            self.push_error(
                ErrorCategory::Other,
                "Worker is not running".into(),
                "backtest".into(),
            );
            return;
        }
        self.pending_run = Some(ticket);
        self.set_status(format!("Running backtest for {}...", self.query.symbol));
    }

    /// Fetch the history page currently selected.
    pub fn request_history(&mut self) {
        let query = self.history.query();
        if self.worker_tx.send(WorkerCommand::FetchHistory { query }).is_err() {
            self.push_error(ErrorCategory::Other, "Worker is not running".into(), "history".into());
            return;
        }
        self.history_loading = true;
    }

    // ─── Responses ──────────────────────────────────────────────────

    pub fn handle_response(&mut self, resp: WorkerResponse) {
        match resp {
            WorkerResponse::Backtest { ticket, result } => self.apply_backtest(ticket, result),
            WorkerResponse::History { query, result } => self.apply_history(query, result),
            WorkerResponse::Export { path, result } => self.apply_export(path, result),
        }
    }

    pub fn apply_backtest(&mut self, ticket: RunTicket, result: Result<BacktestResponse, String>) {
        let current = self.pending_run == Some(ticket);
        if current {
            self.pending_run = None;
        }
        let response = match result {
            Ok(r) => r,
            Err(e) => {
                if current {
                    self.push_error(
                        ErrorCategory::Network,
                        format!("Backtest failed: {e}"),
                        self.query.symbol.clone(),
                    );
                }
                return;
            }
        };
        match self.controller.apply(ticket, response) {
            Ok(ApplyOutcome::Applied) => {
                let summary = self.controller.summary_line().unwrap_or_default();
                self.set_status(summary);
            }
            Ok(ApplyOutcome::Superseded) => {}
            Err(e) => {
                self.push_error(
                    ErrorCategory::Response,
                    format!("Backtest rejected: {e}"),
                    self.query.symbol.clone(),
                );
            }
        }
    }

    /// Pages for a query other than the one now selected are stale and dropped.
    pub fn apply_history(&mut self, query: HistoryQuery, result: Result<DecisionPage, String>) {
        if query != self.history.query() {
            debug!(page = query.page, symbol = %query.symbol, "dropping stale history page");
            return;
        }
        self.history_loading = false;
        let page = match result {
            Ok(p) => p,
            Err(e) => {
                self.push_error(
                    ErrorCategory::Network,
                    format!("History failed: {e}"),
                    query.symbol,
                );
                return;
            }
        };
        match self.history.apply_page(page) {
            Ok(update) => {
                if update.scroll_to_top {
                    self.history_scroll = 0;
                }
                if update.new_latest {
                    if let Some(card) = self.history.latest() {
                        self.set_status(format!(
                            "Latest decision: {} ({})",
                            card.action, card.confidence
                        ));
                    }
                }
                self.history_scroll = self
                    .history_scroll
                    .min(self.history.records().len().saturating_sub(1));
            }
            Err(e) => {
                self.push_error(
                    ErrorCategory::Response,
                    format!("History rejected: {e}"),
                    query.symbol,
                );
            }
        }
    }

    // ─── Parameter form ─────────────────────────────────────────────

    /// Current text of a form field.
    pub fn field_value(&self, field: InputField) -> String {
        let opt = |v: Option<f64>| v.map(|n| n.to_string()).unwrap_or_default();
        match field {
            InputField::Symbol => self.query.symbol.clone(),
            InputField::Equity => self.query.initial_equity.to_string(),
            InputField::PositionSize => opt(self.query.position_size),
            InputField::Leverage => opt(self.query.leverage),
        }
    }

    pub fn begin_edit(&mut self) {
        self.editing = Some(FieldEdit {
            field: self.selected_field,
            buffer: self.field_value(self.selected_field),
        });
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Commit the field being edited. A new symbol also switches the
    /// decision history and refetches it from page 1.
    pub fn commit_edit(&mut self) {
        let Some(edit) = self.editing.take() else {
            return;
        };
        let mut inputs = InputField::ALL.map(|f| self.field_value(f));
        inputs[edit.field.index()] = edit.buffer.trim().to_string();
        let [symbol, equity, size, leverage] = &inputs;
        if symbol.is_empty() {
            self.set_warning("Symbol cannot be empty");
            return;
        }
        let symbol_changed = *symbol != self.query.symbol;
        self.query = BacktestQuery::from_inputs(symbol, equity, size, leverage);
        if symbol_changed {
            self.history.set_symbol(self.query.symbol.clone());
            self.history_scroll = 0;
            self.request_history();
        }
        self.set_status(format!("{} set", edit.field.label()));
    }

    // ─── Paging ─────────────────────────────────────────────────────

    pub fn next_page(&mut self) {
        match self.active_panel {
            Panel::Trades => {
                self.controller.next_page();
            }
            Panel::History => {
                if self.history.next_page() {
                    self.history_scroll = 0;
                    self.request_history();
                }
            }
            _ => {}
        }
    }

    pub fn prev_page(&mut self) {
        match self.active_panel {
            Panel::Trades => {
                self.controller.prev_page();
            }
            Panel::History => {
                if self.history.prev_page() {
                    self.history_scroll = 0;
                    self.request_history();
                }
            }
            _ => {}
        }
    }

    /// Step the active table's page size through the configured choices.
    pub fn cycle_page_size(&mut self, forward: bool) {
        let current = match self.active_panel {
            Panel::Trades => self.controller.trade_pages().page_size(),
            Panel::History => self.history.pages().page_size(),
            _ => return,
        };
        let Some(size) = next_choice(&self.config.tables.page_size_choices, current, forward) else {
            return;
        };
        match self.active_panel {
            Panel::Trades => {
                self.controller.set_page_size(size);
            }
            Panel::History => {
                if self.history.set_page_size(size) {
                    self.history_scroll = 0;
                    self.request_history();
                }
            }
            _ => {}
        }
        self.set_status(format!("Page size: {size}"));
    }

    pub fn scroll_history(&mut self, down: bool) {
        let last = self.history.records().len().saturating_sub(1);
        self.history_scroll = if down {
            (self.history_scroll + 1).min(last)
        } else {
            self.history_scroll.saturating_sub(1)
        };
    }

    // ─── Export ─────────────────────────────────────────────────────

    /// Export the whole decision history for the current symbol into the
    /// working dir. The worker fetches every page and writes the file.
    pub fn export_history(&mut self, format: ExportFormat) {
        if self.pending_export.is_some() {
            self.set_warning("Export already running");
            return;
        }
        let symbol = self.history.symbol().to_string();
        let path = PathBuf::from(export::default_file_name(Some(&symbol), format));
        let cmd = WorkerCommand::ExportHistory {
            symbol,
            format,
            path: path.clone(),
        };
        if self.worker_tx.send(cmd).is_err() {
            self.push_error(ErrorCategory::Other, "Worker is not running".into(), "export".into());
            return;
        }
        self.set_status(format!("Exporting decision history to {}...", path.display()));
        self.pending_export = Some(path);
    }

    pub fn apply_export(&mut self, path: PathBuf, result: Result<usize, String>) {
        self.pending_export = None;
        let name = path.display().to_string();
        match result {
            Ok(rows) => self.set_status(format!("Exported {rows} decisions to {name}")),
            Err(e) => self.push_error(ErrorCategory::Export, format!("Export failed: {e}"), name),
        }
    }

    // ─── Status ─────────────────────────────────────────────────────

    pub fn is_loading(&self) -> bool {
        self.pending_run.is_some() || self.history_loading || self.pending_export.is_some()
    }

    /// Push an error to history (capped at 50) and show it in the status bar.
    pub fn push_error(&mut self, category: ErrorCategory, message: String, context: String) {
        let record = ErrorRecord {
            timestamp: chrono::Local::now().naive_local(),
            category,
            message: message.clone(),
            context,
        };
        self.error_history.push_front(record);
        if self.error_history.len() > MAX_ERRORS {
            self.error_history.pop_back();
        }
        self.status_message = Some((message, StatusLevel::Error));
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }
}

/// The choice after (or before) `current`, wrapping. A size that is not
/// among the choices snaps to the first or last one.
fn next_choice(choices: &[usize], current: usize, forward: bool) -> Option<usize> {
    if choices.is_empty() {
        return None;
    }
    let n = choices.len();
    let pick = match choices.iter().position(|&c| c == current) {
        Some(i) if forward => (i + 1) % n,
        Some(i) => (i + n - 1) % n,
        None if forward => 0,
        None => n - 1,
    };
    Some(choices[pick])
}
