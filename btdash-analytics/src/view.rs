//! Display-ready strings for every panel of the dashboard.
//!
//! These are plain data: the TUI lays them out in widgets, the CLI prints
//! them. All number formatting goes through [`btdash_core::format`].

use btdash_core::domain::{DecisionRecord, Metrics, TradeRecord};
use btdash_core::format::{self, num2, percent, text_or_placeholder, timestamp_seconds, usdt};
use serde::Serialize;

use crate::stats::TradeStats;

/// Shown in place of an empty trade table.
pub const NO_TRADES: &str = "(no trades)";
/// Shown in place of an empty decision-history table.
pub const NO_DATA: &str = "(no data)";
pub const NO_WINNING_TRADES: &str = "No winning trades";
pub const NO_LOSING_TRADES: &str = "No losing trades";

/// One-line run summary built from the backend metrics.
///
/// ```text
/// Start: 10000.00 USDT; End: 10450.50 USDT; Total PnL: 450.50 USDT; Trades: 3; Win rate: 66.67%;
/// Max drawdown: 3.10%;
/// ```
///
/// on one line, followed by the custom size and leverage when the run used them.
pub fn summary_line(m: &Metrics) -> String {
    let mut line = format!(
        "Start: {}; End: {}; Total PnL: {}; Trades: {}; Win rate: {}; Max drawdown: {};",
        usdt(m.starting_equity),
        usdt(m.ending_equity),
        usdt(m.total_pnl),
        m.num_trades.unwrap_or(0),
        format::fraction_percent(Some(m.win_rate.unwrap_or(0.0))),
        format::fraction_percent(Some(m.max_drawdown.unwrap_or(0.0))),
    );
    let mut extra = Vec::new();
    if let Some(size) = m.position_size_override {
        extra.push(format!("Custom size: {}", usdt(Some(size))));
    }
    if let Some(lev) = m.leverage_used {
        extra.push(format!("Leverage: {lev}x"));
    }
    if !extra.is_empty() {
        line.push(' ');
        line.push_str(&extra.join("; "));
    }
    line
}

/// The statistics panel, one string per field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsPanel {
    pub total: String,
    pub wins: String,
    pub losses: String,
    pub longs: String,
    pub shorts: String,
    pub win_rate: String,
    pub max_drawdown: String,
    pub avg_return: String,
    pub pl_ratio: String,
    pub max_win_streak: String,
    pub max_lose_streak: String,
}

impl StatsPanel {
    pub fn new(stats: &TradeStats, metrics: &Metrics) -> Self {
        Self {
            total: stats.total.to_string(),
            wins: stats.wins.to_string(),
            losses: stats.losses.to_string(),
            longs: stats.longs.to_string(),
            shorts: stats.shorts.to_string(),
            win_rate: percent(Some(stats.win_rate_pct)),
            max_drawdown: format::fraction_percent(Some(metrics.max_drawdown.unwrap_or(0.0))),
            avg_return: percent(Some(stats.avg_return_pct)),
            pl_ratio: num2(stats.pl_ratio),
            max_win_streak: stats.max_win_streak.to_string(),
            max_lose_streak: stats.max_lose_streak.to_string(),
        }
    }

    /// Label/value pairs in display order.
    pub fn rows(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("Trades", self.total.as_str()),
            ("Wins", self.wins.as_str()),
            ("Losses", self.losses.as_str()),
            ("Longs", self.longs.as_str()),
            ("Shorts", self.shorts.as_str()),
            ("Win rate", self.win_rate.as_str()),
            ("Max drawdown", self.max_drawdown.as_str()),
            ("Avg return", self.avg_return.as_str()),
            ("P/L ratio", self.pl_ratio.as_str()),
            ("Max win streak", self.max_win_streak.as_str()),
            ("Max lose streak", self.max_lose_streak.as_str()),
        ]
    }
}

/// Best or worst trade, as shown in its card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeCard {
    pub side: String,
    pub enter_time: String,
    pub exit_time: String,
    pub pnl: String,
    pub return_pct: String,
}

impl TradeCard {
    pub fn new(t: &TradeRecord) -> Self {
        Self {
            side: text_or_placeholder(Some(&t.side)),
            enter_time: timestamp_seconds(t.enter_time.as_deref()),
            exit_time: timestamp_seconds(t.exit_time.as_deref()),
            pnl: usdt(Some(t.pnl_or_zero())),
            return_pct: format::fraction_percent(Some(t.return_or_zero())),
        }
    }

    /// Card lines, or the "no winning trades" notice.
    pub fn best_lines(stats: &TradeStats, trades: &[TradeRecord]) -> Vec<String> {
        match stats.best(trades) {
            Some(t) => Self::new(t).lines(),
            None => vec![NO_WINNING_TRADES.to_string()],
        }
    }

    pub fn worst_lines(stats: &TradeStats, trades: &[TradeRecord]) -> Vec<String> {
        match stats.worst(trades) {
            Some(t) => Self::new(t).lines(),
            None => vec![NO_LOSING_TRADES.to_string()],
        }
    }

    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("Side: {}", self.side),
            format!("Entry: {}", self.enter_time),
            format!("Exit: {}", self.exit_time),
            format!("PnL: {}", self.pnl),
            format!("Return: {}", self.return_pct),
        ]
    }
}

/// One row of the trade table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeRow {
    pub enter_time: String,
    pub exit_time: String,
    pub side: String,
    pub entry_price: String,
    pub exit_price: String,
    pub notional: String,
    pub pnl: String,
    pub return_pct: String,
}

impl TradeRow {
    pub const HEADERS: [&'static str; 8] = [
        "Entry time",
        "Exit time",
        "Side",
        "Entry",
        "Exit",
        "Size",
        "PnL",
        "Return",
    ];

    pub fn new(t: &TradeRecord) -> Self {
        Self {
            enter_time: timestamp_seconds(t.enter_time.as_deref()),
            exit_time: timestamp_seconds(t.exit_time.as_deref()),
            side: t.side.clone(),
            entry_price: num2(t.entry_price),
            exit_price: num2(t.exit_price),
            notional: usdt(Some(t.notional())),
            pnl: num2(t.pnl),
            return_pct: format::fraction_percent(Some(t.return_or_zero())),
        }
    }

    pub fn cells(&self) -> [&str; 8] {
        [
            self.enter_time.as_str(),
            self.exit_time.as_str(),
            self.side.as_str(),
            self.entry_price.as_str(),
            self.exit_price.as_str(),
            self.notional.as_str(),
            self.pnl.as_str(),
            self.return_pct.as_str(),
        ]
    }
}

/// One row of the decision-history table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionRow {
    pub timestamp: String,
    pub action: String,
    pub confidence: String,
    pub notional: String,
    pub tp_sl: String,
    pub price: String,
    pub executed: String,
}

impl DecisionRow {
    pub const HEADERS: [&'static str; 7] =
        ["Time", "Action", "Confidence", "Size", "TP / SL", "Price", "Executed"];

    pub fn new(d: &DecisionRecord) -> Self {
        Self {
            timestamp: timestamp_seconds(d.timestamp.as_deref()),
            action: text_or_placeholder(d.action.as_deref()),
            confidence: text_or_placeholder(d.confidence_level.as_deref()),
            notional: usdt(Some(d.notional())),
            tp_sl: format!("{} / {}", num2(d.take_profit_price), num2(d.stop_loss_price)),
            price: num2(Some(d.current_price.unwrap_or(0.0))),
            executed: if d.executed { "yes" } else { "no" }.to_string(),
        }
    }

    pub fn cells(&self) -> [&str; 7] {
        [
            self.timestamp.as_str(),
            self.action.as_str(),
            self.confidence.as_str(),
            self.notional.as_str(),
            self.tp_sl.as_str(),
            self.price.as_str(),
            self.executed.as_str(),
        ]
    }
}

/// The "latest decision" card above the history table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatestDecisionCard {
    pub action: String,
    pub confidence: String,
    pub reason: String,
    pub size: String,
    pub tp_sl: String,
}

impl LatestDecisionCard {
    pub fn new(d: &DecisionRecord) -> Self {
        Self {
            action: text_or_placeholder(d.action.as_deref()),
            confidence: text_or_placeholder(d.confidence_level.as_deref()),
            reason: text_or_placeholder(d.reason.as_deref()),
            size: usdt(Some(d.notional())),
            tp_sl: format!(
                "TP: {} / SL: {}",
                num2(d.take_profit_price),
                num2(d.stop_loss_price)
            ),
        }
    }
}
