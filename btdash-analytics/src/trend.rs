//! Rolling win-rate trend over a fixed trade window.

use btdash_core::domain::TradeRecord;

/// Trades per window unless configured otherwise.
pub const DEFAULT_WINDOW: usize = 10;

/// Win percentage of every full window, left to right.
///
/// One value per right edge `w` in `window..=len`, so the series has
/// `len - window + 1` entries. Empty when there are fewer trades than the
/// window, or when the window is zero.
pub fn rolling_win_rate(trades: &[TradeRecord], window: usize) -> Vec<f64> {
    if window == 0 || trades.len() < window {
        return Vec::new();
    }
    let outcomes: Vec<bool> = trades.iter().map(|t| t.is_win()).collect();
    let mut wins = outcomes[..window].iter().filter(|w| **w).count();
    let mut series = Vec::with_capacity(outcomes.len() - window + 1);
    series.push(pct(wins, window));
    for right in window..outcomes.len() {
        if outcomes[right] {
            wins += 1;
        }
        if outcomes[right - window] {
            wins -= 1;
        }
        series.push(pct(wins, window));
    }
    series
}

fn pct(wins: usize, window: usize) -> f64 {
    100.0 * wins as f64 / window as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trades(pnls: &[f64]) -> Vec<TradeRecord> {
        pnls.iter()
            .map(|&p| TradeRecord {
                pnl: Some(p),
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn ten_wins_then_two_losses() {
        let mut pnls = vec![1.0; 10];
        pnls.extend([-1.0, -1.0]);
        assert_eq!(rolling_win_rate(&trades(&pnls), 10), vec![100.0, 90.0, 80.0]);
    }

    #[test]
    fn short_list_is_empty() {
        assert!(rolling_win_rate(&trades(&[1.0; 9]), 10).is_empty());
        assert!(rolling_win_rate(&[], 10).is_empty());
    }

    #[test]
    fn exact_window_gives_one_value() {
        let t = trades(&[1.0, -1.0, 1.0, -1.0]);
        assert_eq!(rolling_win_rate(&t, 4), vec![50.0]);
    }

    #[test]
    fn zero_window_is_empty() {
        assert!(rolling_win_rate(&trades(&[1.0, 2.0]), 0).is_empty());
    }

    #[test]
    fn window_slides_over_losses_recovering() {
        let t = trades(&[-1.0, -1.0, 1.0, 1.0]);
        assert_eq!(rolling_win_rate(&t, 2), vec![0.0, 50.0, 100.0]);
    }
}
