//! Export of decision history and trades as CSV or JSON.
//!
//! CSV output starts with a UTF-8 byte-order mark so spreadsheet tools pick
//! the right encoding. JSON output is pretty-printed and wrapped in the same
//! `{ "success": true, "data": [...] }` envelope the backend uses.

use std::path::Path;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use btdash_core::domain::{DecisionRecord, TradeRecord};
use serde::Serialize;

const BOM: &str = "\u{feff}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => bail!("unknown export format '{other}' (expected csv or json)"),
        }
    }
}

/// `decision_history_ETH_USDT_SWAP.csv`; `all` when no symbol is set.
pub fn default_file_name(symbol: Option<&str>, format: ExportFormat) -> String {
    let symbol = symbol.filter(|s| !s.is_empty()).unwrap_or("all");
    format!("decision_history_{}.{}", symbol.replace('-', "_"), format.extension())
}

// ─── Decision history ───────────────────────────────────────────────

pub fn decisions_csv(records: &[DecisionRecord]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "id",
        "timestamp",
        "symbol",
        "current_price",
        "action",
        "confidence_level",
        "reason",
        "position_size",
        "stop_loss_price",
        "take_profit_price",
        "executed",
    ])?;
    for d in records {
        wtr.write_record([
            d.id.map(|i| i.to_string()).unwrap_or_default(),
            d.timestamp.clone().unwrap_or_default(),
            d.symbol.clone().unwrap_or_default(),
            opt_num(d.current_price),
            d.action.clone().unwrap_or_default(),
            d.confidence_level.clone().unwrap_or_default(),
            d.reason.clone().unwrap_or_default(),
            opt_num(d.position_size),
            opt_num(d.stop_loss_price),
            opt_num(d.take_profit_price),
            if d.executed { "1" } else { "0" }.to_string(),
        ])?;
    }
    finish_csv(wtr)
}

pub fn decisions_json(records: &[DecisionRecord]) -> Result<String> {
    envelope(records).context("failed to serialize decision history to JSON")
}

// ─── Trades ─────────────────────────────────────────────────────────

pub fn trades_csv(trades: &[TradeRecord]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "enter_time",
        "exit_time",
        "side",
        "entry_price",
        "exit_price",
        "position_size",
        "pnl",
        "return_pct",
    ])?;
    for t in trades {
        wtr.write_record([
            t.enter_time.clone().unwrap_or_default(),
            t.exit_time.clone().unwrap_or_default(),
            t.side.clone(),
            opt_num(t.entry_price),
            opt_num(t.exit_price),
            opt_num(t.position_size),
            opt_num(t.pnl),
            opt_num(t.return_pct),
        ])?;
    }
    finish_csv(wtr)
}

pub fn trades_json(trades: &[TradeRecord]) -> Result<String> {
    envelope(trades).context("failed to serialize trades to JSON")
}

// ─── Files ──────────────────────────────────────────────────────────

/// Write decision history to `path` in the given format.
pub fn write_decisions(
    records: &[DecisionRecord],
    format: ExportFormat,
    path: &Path,
) -> Result<()> {
    let body = match format {
        ExportFormat::Csv => decisions_csv(records)?,
        ExportFormat::Json => decisions_json(records)?,
    };
    write_file(path, &body)
}

pub fn write_trades(trades: &[TradeRecord], format: ExportFormat, path: &Path) -> Result<()> {
    let body = match format {
        ExportFormat::Csv => trades_csv(trades)?,
        ExportFormat::Json => trades_json(trades)?,
    };
    write_file(path, &body)
}

fn write_file(path: &Path, body: &str) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create export dir: {}", dir.display()))?;
    }
    std::fs::write(path, body).with_context(|| format!("failed to write {}", path.display()))
}

// ─── Helpers ────────────────────────────────────────────────────────

fn opt_num(v: Option<f64>) -> String {
    v.map(|n| n.to_string()).unwrap_or_default()
}

fn finish_csv(wtr: csv::Writer<Vec<u8>>) -> Result<String> {
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    let body = String::from_utf8(data).context("CSV output is not valid UTF-8")?;
    Ok(format!("{BOM}{body}"))
}

#[derive(Serialize)]
struct Envelope<'a, T> {
    success: bool,
    data: &'a [T],
}

fn envelope<T: Serialize>(data: &[T]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&Envelope {
        success: true,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decision() -> DecisionRecord {
        DecisionRecord {
            id: Some(3),
            timestamp: Some("2024-05-01T10:00:00".into()),
            symbol: Some("ETH-USDT-SWAP".into()),
            current_price: Some(3000.5),
            action: Some("BUY".into()),
            reason: Some("breakout, volume up".into()),
            executed: true,
            ..Default::default()
        }
    }

    #[test]
    fn decisions_csv_has_bom_and_header() {
        let csv = decisions_csv(&[decision()]).unwrap();
        assert!(csv.starts_with('\u{feff}'));
        let mut lines = csv.trim_start_matches('\u{feff}').lines();
        assert_eq!(
            lines.next().unwrap(),
            "id,timestamp,symbol,current_price,action,confidence_level,reason,\
             position_size,stop_loss_price,take_profit_price,executed"
        );
        assert_eq!(
            lines.next().unwrap(),
            "3,2024-05-01T10:00:00,ETH-USDT-SWAP,3000.5,BUY,,\"breakout, volume up\",,,,1"
        );
    }

    #[test]
    fn json_uses_envelope() {
        let json = decisions_json(&[decision()]).unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["success"], true);
        assert_eq!(v["data"][0]["action"], "BUY");
        assert_eq!(v["data"][0]["executed"], true);
    }

    #[test]
    fn trades_csv_rows() {
        let t = TradeRecord {
            side: "short".into(),
            pnl: Some(-2.5),
            ..Default::default()
        };
        let csv = trades_csv(&[t]).unwrap();
        let body = csv.trim_start_matches('\u{feff}');
        assert_eq!(body.lines().nth(1).unwrap(), ",,short,,,,-2.5,");
    }

    #[test]
    fn format_parsing() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!(" json ".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert!("xml".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn file_names() {
        assert_eq!(
            default_file_name(Some("ETH-USDT-SWAP"), ExportFormat::Csv),
            "decision_history_ETH_USDT_SWAP.csv"
        );
        assert_eq!(default_file_name(None, ExportFormat::Json), "decision_history_all.json");
    }

    #[test]
    fn write_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/nested/history.csv");
        write_decisions(&[decision()], ExportFormat::Csv, &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("BUY"));
    }
}
