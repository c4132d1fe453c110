//! Trade statistics: pure functions over an ordered trade list.
//!
//! Every statistic is a pure function of the trades (and, for the win rate
//! of an empty run, the backend metrics). Nothing here formats or renders.

use btdash_core::domain::{TradeRecord, TradeSide};
use serde::{Deserialize, Serialize};

/// Everything the stats panel shows, derived from one trade list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeStats {
    pub total: usize,
    pub wins: usize,
    pub losses: usize,
    pub longs: usize,
    pub shorts: usize,
    /// Win rate in percent (0-100).
    pub win_rate_pct: f64,
    /// Mean per-trade return in percent.
    pub avg_return_pct: f64,
    /// Average win over average loss magnitude. `None` without both wins and losses.
    pub pl_ratio: Option<f64>,
    pub max_win_streak: usize,
    pub max_lose_streak: usize,
    /// Index of the most profitable trade.
    pub best_trade: Option<usize>,
    /// Index of the biggest losing trade.
    pub worst_trade: Option<usize>,
}

impl TradeStats {
    /// Compute all statistics in one go.
    ///
    /// `fallback_win_rate` is the backend's win-rate fraction, used only when
    /// there are no trades to count.
    pub fn compute(trades: &[TradeRecord], fallback_win_rate: Option<f64>) -> Self {
        let total = trades.len();
        let wins = count_wins(trades);
        let (longs, shorts) = side_counts(trades);
        let (max_win_streak, max_lose_streak) = streaks(trades);
        Self {
            total,
            wins,
            losses: total - wins,
            longs,
            shorts,
            win_rate_pct: win_rate_pct(trades, fallback_win_rate),
            avg_return_pct: avg_return_pct(trades),
            pl_ratio: pl_ratio(trades),
            max_win_streak,
            max_lose_streak,
            best_trade: best_trade(trades),
            worst_trade: worst_trade(trades),
        }
    }

    /// Resolve `best_trade` against the list the stats were computed from.
    pub fn best<'a>(&self, trades: &'a [TradeRecord]) -> Option<&'a TradeRecord> {
        self.best_trade.and_then(|i| trades.get(i))
    }

    pub fn worst<'a>(&self, trades: &'a [TradeRecord]) -> Option<&'a TradeRecord> {
        self.worst_trade.and_then(|i| trades.get(i))
    }
}

// ─── Individual statistics ──────────────────────────────────────────

/// Trades with non-negative PnL.
pub fn count_wins(trades: &[TradeRecord]) -> usize {
    trades.iter().filter(|t| t.is_win()).count()
}

/// `(longs, shorts)`. Trades whose side matches neither are not counted.
pub fn side_counts(trades: &[TradeRecord]) -> (usize, usize) {
    trades
        .iter()
        .fold((0, 0), |(longs, shorts), t| match t.direction() {
            Some(TradeSide::Long) => (longs + 1, shorts),
            Some(TradeSide::Short) => (longs, shorts + 1),
            None => (longs, shorts),
        })
}

/// Win rate in percent. With no trades, the backend's fraction scaled to
/// percent, or 0.
pub fn win_rate_pct(trades: &[TradeRecord], fallback: Option<f64>) -> f64 {
    if trades.is_empty() {
        return fallback.filter(|f| f.is_finite()).unwrap_or(0.0) * 100.0;
    }
    100.0 * count_wins(trades) as f64 / trades.len() as f64
}

/// Mean `return_pct` in percent; missing returns count as zero.
pub fn avg_return_pct(trades: &[TradeRecord]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    let sum: f64 = trades.iter().map(|t| t.return_or_zero()).sum();
    100.0 * sum / trades.len() as f64
}

/// Average profit of winners over average loss magnitude of losers.
///
/// Break-even trades count as winners with zero profit.
pub fn pl_ratio(trades: &[TradeRecord]) -> Option<f64> {
    let (mut profit_sum, mut profit_count) = (0.0, 0usize);
    let (mut loss_sum, mut loss_count) = (0.0, 0usize);
    for t in trades {
        let pnl = t.pnl_or_zero();
        if pnl >= 0.0 {
            profit_sum += pnl;
            profit_count += 1;
        } else {
            loss_sum += pnl.abs();
            loss_count += 1;
        }
    }
    if profit_count == 0 || loss_count == 0 {
        return None;
    }
    let avg_loss = loss_sum / loss_count as f64;
    if avg_loss <= 0.0 {
        return None;
    }
    Some((profit_sum / profit_count as f64) / avg_loss)
}

/// `(max_win_streak, max_lose_streak)` from a single left-to-right pass.
pub fn streaks(trades: &[TradeRecord]) -> (usize, usize) {
    let (mut max_win, mut max_lose) = (0, 0);
    let (mut cur_win, mut cur_lose) = (0, 0);
    for t in trades {
        if t.is_win() {
            cur_win += 1;
            cur_lose = 0;
            max_win = max_win.max(cur_win);
        } else {
            cur_lose += 1;
            cur_win = 0;
            max_lose = max_lose.max(cur_lose);
        }
    }
    (max_win, max_lose)
}

/// Index of the strictly greatest positive PnL; the first one wins ties.
pub fn best_trade(trades: &[TradeRecord]) -> Option<usize> {
    extreme_trade(trades, |pnl, best| pnl > 0.0 && best.map_or(true, |b| pnl > b))
}

/// Index of the strictly most negative PnL; the first one wins ties.
pub fn worst_trade(trades: &[TradeRecord]) -> Option<usize> {
    extreme_trade(trades, |pnl, worst| pnl < 0.0 && worst.map_or(true, |w| pnl < w))
}

// ─── Helpers ────────────────────────────────────────────────────────

fn extreme_trade(
    trades: &[TradeRecord],
    replaces: impl Fn(f64, Option<f64>) -> bool,
) -> Option<usize> {
    let mut found: Option<(usize, f64)> = None;
    for (i, t) in trades.iter().enumerate() {
        let pnl = t.pnl_or_zero();
        if replaces(pnl, found.map(|(_, p)| p)) {
            found = Some((i, pnl));
        }
    }
    found.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trade(pnl: f64) -> TradeRecord {
        TradeRecord {
            side: "long".into(),
            pnl: Some(pnl),
            return_pct: Some(pnl / 1000.0),
            ..Default::default()
        }
    }

    fn trades(pnls: &[f64]) -> Vec<TradeRecord> {
        pnls.iter().map(|&p| trade(p)).collect()
    }

    // ── Aggregate ──

    #[test]
    fn mixed_run() {
        let t = trades(&[10.0, -5.0, -3.0, 7.0]);
        let s = TradeStats::compute(&t, None);
        assert_eq!(s.total, 4);
        assert_eq!(s.wins, 2);
        assert_eq!(s.losses, 2);
        assert_eq!(s.max_win_streak, 1);
        assert_eq!(s.max_lose_streak, 2);
        assert_eq!(s.best(&t).and_then(|t| t.pnl), Some(10.0));
        assert_eq!(s.worst(&t).and_then(|t| t.pnl), Some(-5.0));
        assert!((s.win_rate_pct - 50.0).abs() < 1e-10);
        // (17 / 2) / (8 / 2)
        assert!((s.pl_ratio.unwrap() - 2.125).abs() < 1e-10);
    }

    #[test]
    fn empty_run_uses_backend_win_rate() {
        let s = TradeStats::compute(&[], Some(0.42));
        assert_eq!(s.total, 0);
        assert!((s.win_rate_pct - 42.0).abs() < 1e-10);
        assert_eq!(s.avg_return_pct, 0.0);
        assert_eq!(s.pl_ratio, None);
        assert_eq!(s.best_trade, None);
        assert_eq!(s.worst_trade, None);
    }

    #[test]
    fn empty_run_without_backend_win_rate_is_zero() {
        let s = TradeStats::compute(&[], None);
        assert_eq!(s.win_rate_pct, 0.0);
    }

    // ── Win / loss ──

    #[test]
    fn break_even_is_a_win() {
        let t = trades(&[0.0, 0.0]);
        assert_eq!(count_wins(&t), 2);
        assert_eq!(streaks(&t), (2, 0));
    }

    #[test]
    fn missing_pnl_counts_as_break_even() {
        let t = vec![TradeRecord::default(), trade(-1.0)];
        assert_eq!(count_wins(&t), 1);
    }

    // ── Sides ──

    #[test]
    fn side_classification_counts() {
        let mut t = trades(&[1.0, 1.0, 1.0, 1.0]);
        t[1].side = "open_short".into();
        t[2].side = "flat".into();
        t[3].side = "long_short".into();
        assert_eq!(side_counts(&t), (2, 1));
    }

    // ── P/L ratio ──

    #[test]
    fn pl_ratio_requires_both_sides() {
        assert_eq!(pl_ratio(&trades(&[1.0, 2.0])), None);
        assert_eq!(pl_ratio(&trades(&[-1.0, -2.0])), None);
        assert_eq!(pl_ratio(&[]), None);
    }

    #[test]
    fn pl_ratio_counts_break_even_as_profit() {
        // (0 + 10) / 2 = 5 avg win, 5 avg loss
        let r = pl_ratio(&trades(&[0.0, 10.0, -5.0])).unwrap();
        assert!((r - 1.0).abs() < 1e-10);
    }

    // ── Best / worst ──

    #[test]
    fn best_trade_first_occurrence_on_tie() {
        assert_eq!(best_trade(&trades(&[3.0, 9.0, 9.0, -1.0])), Some(1));
    }

    #[test]
    fn worst_trade_first_occurrence_on_tie() {
        assert_eq!(worst_trade(&trades(&[-4.0, 2.0, -4.0])), Some(0));
    }

    #[test]
    fn zero_pnl_is_neither_best_nor_worst() {
        let t = trades(&[0.0, 0.0]);
        assert_eq!(best_trade(&t), None);
        assert_eq!(worst_trade(&t), None);
    }

    // ── Returns ──

    #[test]
    fn avg_return_scales_to_percent() {
        let mut t = trades(&[1.0, 1.0]);
        t[0].return_pct = Some(0.10);
        t[1].return_pct = None;
        assert!((avg_return_pct(&t) - 5.0).abs() < 1e-10);
    }
}
