//! BacktestController: ties one backtest run to its stats, trend, charts
//! and the paginated trade table.
//!
//! Flow per run:
//! 1. `begin_run()` issues a ticket before the fetch starts
//! 2. `apply(ticket, response)` validates the envelope, recomputes stats and
//!    trend from scratch and resets the trade table to page 1
//! 3. The caller renders both charts and reads display strings
//!
//! A response carrying an older ticket than the newest issued one is
//! dropped, so overlapping fetches cannot interleave their results.

use btdash_core::config::DashboardConfig;
use btdash_core::domain::{
    equity_values, BacktestResponse, BacktestRun, Metrics, ResponseError, TradeRecord,
};
use btdash_core::pagination::Pagination;
use tracing::{debug, info, warn};

use crate::chart::{ChartRenderer, RenderOutcome, Surface, Viewport};
use crate::stats::TradeStats;
use crate::trend::rolling_win_rate;
use crate::view::{self, StatsPanel, TradeCard, TradeRow};

/// Sequence number of one backtest fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunTicket(u64);

impl RunTicket {
    pub fn value(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    /// A newer run was started after this one; the response was dropped.
    Superseded,
}

/// Everything derived from one applied run. Rebuilt on every run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunView {
    pub ticket: RunTicket,
    pub metrics: Metrics,
    pub trades: Vec<TradeRecord>,
    pub equity: Vec<f64>,
    pub stats: TradeStats,
    pub trend: Vec<f64>,
}

pub struct BacktestController {
    trade_pages: Pagination,
    trend_window: usize,
    equity_chart: ChartRenderer,
    trend_chart: ChartRenderer,
    issued: u64,
    current: Option<RunView>,
}

impl BacktestController {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            trade_pages: Pagination::new(config.tables.trades_page_size),
            trend_window: config.trend_window,
            equity_chart: ChartRenderer::equity(config.equity_chart.clone()),
            trend_chart: ChartRenderer::win_rate_trend(config.trend_chart.clone()),
            issued: 0,
            current: None,
        }
    }

    /// Start a new run. Responses for earlier tickets will be dropped.
    pub fn begin_run(&mut self) -> RunTicket {
        self.issued += 1;
        RunTicket(self.issued)
    }

    /// Apply a backend response for `ticket`.
    ///
    /// A rejected or superseded response leaves every piece of derived state
    /// as it was.
    pub fn apply(
        &mut self,
        ticket: RunTicket,
        response: BacktestResponse,
    ) -> Result<ApplyOutcome, ResponseError> {
        if ticket.0 != self.issued {
            debug!(
                ticket = ticket.0,
                newest = self.issued,
                "dropping superseded backtest response"
            );
            return Ok(ApplyOutcome::Superseded);
        }
        let run = response.into_run().map_err(|e| {
            warn!(ticket = ticket.0, error = %e, "backtest response rejected");
            e
        })?;
        self.install(ticket, run);
        Ok(ApplyOutcome::Applied)
    }

    /// `begin_run` + `apply` for callers without overlapping fetches.
    pub fn load(&mut self, response: BacktestResponse) -> Result<(), ResponseError> {
        let ticket = self.begin_run();
        self.apply(ticket, response).map(|_| ())
    }

    fn install(&mut self, ticket: RunTicket, run: BacktestRun) {
        let stats = TradeStats::compute(&run.trades, run.metrics.win_rate);
        let trend = rolling_win_rate(&run.trades, self.trend_window);
        self.trade_pages.reset(run.trades.len());
        info!(
            ticket = ticket.0,
            trades = stats.total,
            wins = stats.wins,
            curve_points = run.curve.len(),
            "backtest run applied"
        );
        self.current = Some(RunView {
            ticket,
            metrics: run.metrics,
            equity: equity_values(&run.curve),
            trades: run.trades,
            stats,
            trend,
        });
    }

    pub fn run(&self) -> Option<&RunView> {
        self.current.as_ref()
    }

    pub fn trades(&self) -> &[TradeRecord] {
        self.current.as_ref().map_or(&[][..], |r| r.trades.as_slice())
    }

    pub fn trend_window(&self) -> usize {
        self.trend_window
    }

    // ── Display strings ──

    pub fn summary_line(&self) -> Option<String> {
        self.current.as_ref().map(|r| view::summary_line(&r.metrics))
    }

    pub fn stats_panel(&self) -> Option<StatsPanel> {
        self.current
            .as_ref()
            .map(|r| StatsPanel::new(&r.stats, &r.metrics))
    }

    pub fn best_trade_lines(&self) -> Vec<String> {
        match &self.current {
            Some(r) => TradeCard::best_lines(&r.stats, &r.trades),
            None => vec![view::NO_WINNING_TRADES.to_string()],
        }
    }

    pub fn worst_trade_lines(&self) -> Vec<String> {
        match &self.current {
            Some(r) => TradeCard::worst_lines(&r.stats, &r.trades),
            None => vec![view::NO_LOSING_TRADES.to_string()],
        }
    }

    // ── Trade table ──

    pub fn trade_pages(&self) -> &Pagination {
        &self.trade_pages
    }

    pub fn next_page(&mut self) -> bool {
        self.trade_pages.next()
    }

    pub fn prev_page(&mut self) -> bool {
        self.trade_pages.prev()
    }

    pub fn set_page_size(&mut self, size: usize) -> bool {
        self.trade_pages.set_page_size(size)
    }

    pub fn set_page_size_str(&mut self, raw: &str) -> bool {
        self.trade_pages.set_page_size_str(raw)
    }

    /// Rows of the current trade page.
    pub fn page_rows(&self) -> Vec<TradeRow> {
        self.trade_pages
            .slice_for_page(self.trades())
            .iter()
            .map(TradeRow::new)
            .collect()
    }

    pub fn page_info(&self) -> String {
        self.trade_pages.page_info()
    }

    /// Notice shown instead of rows when the table is empty.
    pub fn empty_notice(&self) -> Option<&'static str> {
        (self.trade_pages.total() == 0).then_some(view::NO_TRADES)
    }

    // ── Charts ──

    pub fn equity_renderer(&self) -> &ChartRenderer {
        &self.equity_chart
    }

    pub fn trend_renderer(&self) -> &ChartRenderer {
        &self.trend_chart
    }

    pub fn render_equity(
        &self,
        surface: Option<&mut dyn Surface>,
        viewport: Viewport,
    ) -> RenderOutcome {
        let values = self.current.as_ref().map_or(&[][..], |r| r.equity.as_slice());
        self.equity_chart.render(surface, viewport, values)
    }

    pub fn render_trend(
        &self,
        surface: Option<&mut dyn Surface>,
        viewport: Viewport,
    ) -> RenderOutcome {
        let values = self.current.as_ref().map_or(&[][..], |r| r.trend.as_slice());
        self.trend_chart.render(surface, viewport, values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::RecordingSurface;
    use btdash_core::domain::EquityPoint;

    fn trade(pnl: f64) -> TradeRecord {
        TradeRecord {
            side: "long".into(),
            pnl: Some(pnl),
            ..Default::default()
        }
    }

    fn response(pnls: &[f64]) -> BacktestResponse {
        BacktestRun {
            metrics: Metrics::default(),
            trades: pnls.iter().map(|&p| trade(p)).collect(),
            curve: vec![EquityPoint::new(100.0), EquityPoint::new(110.0)],
        }
        .into()
    }

    fn controller() -> BacktestController {
        BacktestController::new(&DashboardConfig::default())
    }

    #[test]
    fn apply_computes_everything() {
        let mut c = controller();
        c.load(response(&[10.0, -5.0, -3.0, 7.0])).unwrap();
        let run = c.run().unwrap();
        assert_eq!(run.stats.wins, 2);
        assert!(run.trend.is_empty());
        assert_eq!(run.equity, vec![100.0, 110.0]);
        assert_eq!(c.trade_pages().total(), 4);
        assert!(c.summary_line().is_some());
    }

    #[test]
    fn stale_ticket_is_superseded() {
        let mut c = controller();
        let first = c.begin_run();
        let second = c.begin_run();
        assert_eq!(c.apply(second, response(&[1.0])).unwrap(), ApplyOutcome::Applied);
        assert_eq!(
            c.apply(first, response(&[1.0, 2.0, 3.0])).unwrap(),
            ApplyOutcome::Superseded
        );
        assert_eq!(c.trades().len(), 1);
        assert_eq!(c.run().unwrap().ticket, second);
    }

    #[test]
    fn rejection_leaves_state_untouched() {
        let mut c = controller();
        c.load(response(&[1.0, 2.0])).unwrap();
        let before = c.run().cloned();
        let rejected = BacktestResponse {
            success: false,
            error: Some("no candles".into()),
            ..Default::default()
        };
        assert!(c.load(rejected).is_err());
        assert_eq!(c.run().cloned(), before);
    }

    #[test]
    fn new_run_resets_trade_page() {
        let mut c = controller();
        c.load(response(&[1.0; 45])).unwrap();
        c.next_page();
        c.next_page();
        assert_eq!(c.trade_pages().page(), 3);
        assert_eq!(c.page_rows().len(), 5);
        c.load(response(&[1.0; 45])).unwrap();
        assert_eq!(c.trade_pages().page(), 1);
    }

    #[test]
    fn page_size_change_keeps_run() {
        let mut c = controller();
        c.load(response(&[1.0; 30])).unwrap();
        c.next_page();
        assert!(c.set_page_size_str("50"));
        assert_eq!(c.trade_pages().page(), 1);
        assert_eq!(c.page_rows().len(), 30);
    }

    #[test]
    fn empty_table_notice() {
        let c = controller();
        assert_eq!(c.empty_notice(), Some(view::NO_TRADES));
        assert_eq!(c.page_info(), "Page 1 / 1 (0 total)");
    }

    #[test]
    fn charts_render_independently() {
        let mut c = controller();
        let mut pnls = vec![1.0; 10];
        pnls.push(-1.0);
        c.load(response(&pnls)).unwrap();

        let mut broken = RecordingSurface::failing("lost");
        let mut trend = RecordingSurface::new();
        let eq = c.render_equity(Some(&mut broken), Viewport::new(600.0, 160.0));
        let tr = c.render_trend(Some(&mut trend), Viewport::new(600.0, 60.0));
        assert_eq!(eq, RenderOutcome::Failed);
        assert_eq!(tr, RenderOutcome::Drawn { points: 2 });
    }
}
