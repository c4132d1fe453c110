//! Background worker thread. All network and file reads run here.
//!
//! The TUI sends [`WorkerCommand`]s and drains [`WorkerResponse`]s once per
//! frame, so a slow backend never blocks drawing or input.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use btdash_analytics::export::{self, ExportFormat};
use btdash_analytics::RunTicket;
use btdash_core::domain::{BacktestResponse, DecisionPage};
use btdash_core::request::{BacktestQuery, HistoryQuery};
use btdash_core::ResultSource;
use tracing::{debug, info, warn};

/// Commands sent from the TUI to the worker.
#[derive(Debug)]
pub enum WorkerCommand {
    RunBacktest {
        ticket: RunTicket,
        query: BacktestQuery,
    },
    FetchHistory {
        query: HistoryQuery,
    },
    /// Fetch every decision for `symbol` and write them to `path`.
    ExportHistory {
        symbol: String,
        format: ExportFormat,
        path: PathBuf,
    },
    Shutdown,
}

/// Responses sent from the worker back to the TUI.
///
/// Source errors are flattened to strings; the TUI only displays them.
#[derive(Debug)]
pub enum WorkerResponse {
    Backtest {
        ticket: RunTicket,
        result: Result<BacktestResponse, String>,
    },
    History {
        query: HistoryQuery,
        result: Result<DecisionPage, String>,
    },
    /// Rows written, or why the export failed.
    Export {
        path: PathBuf,
        result: Result<usize, String>,
    },
}

/// Spawn the background worker thread.
pub fn spawn_worker(
    source: Box<dyn ResultSource>,
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("btdash-worker".into())
        .spawn(move || worker_loop(source.as_ref(), rx, tx))
}

fn worker_loop(source: &dyn ResultSource, rx: Receiver<WorkerCommand>, tx: Sender<WorkerResponse>) {
    debug!(source = %source.describe(), "worker started");
    loop {
        match rx.recv() {
            Ok(WorkerCommand::Shutdown) | Err(_) => break,
            Ok(cmd) => {
                let resp = handle_command(source, cmd);
                if let Some(resp) = resp {
                    if tx.send(resp).is_err() {
                        break;
                    }
                }
            }
        }
    }
    debug!("worker stopped");
}

fn handle_command(source: &dyn ResultSource, cmd: WorkerCommand) -> Option<WorkerResponse> {
    match cmd {
        WorkerCommand::RunBacktest { ticket, query } => {
            let result = source.backtest(&query).map_err(|e| {
                warn!(ticket = ticket.value(), error = %e, "backtest fetch failed");
                e.to_string()
            });
            Some(WorkerResponse::Backtest { ticket, result })
        }
        WorkerCommand::FetchHistory { query } => {
            let result = source.history(&query).map_err(|e| {
                warn!(page = query.page, error = %e, "history fetch failed");
                e.to_string()
            });
            Some(WorkerResponse::History { query, result })
        }
        WorkerCommand::ExportHistory {
            symbol,
            format,
            path,
        } => {
            let result = export_history(source, &symbol, format, &path).map_err(|e| {
                warn!(path = %path.display(), error = %e, "history export failed");
                format!("{e:#}")
            });
            Some(WorkerResponse::Export { path, result })
        }
        WorkerCommand::Shutdown => None,
    }
}

fn export_history(
    source: &dyn ResultSource,
    symbol: &str,
    format: ExportFormat,
    path: &Path,
) -> anyhow::Result<usize> {
    let records = source.all_history(symbol)?;
    export::write_decisions(&records, format, path)?;
    info!(path = %path.display(), rows = records.len(), "history exported");
    Ok(records.len())
}
