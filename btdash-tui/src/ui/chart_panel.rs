//! Panel 3: equity curve above the rolling win-rate trend.
//!
//! Both charts go through the shared chart renderer onto a
//! [`TerminalSurface`]; each frame redraws them from the current run.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::Frame;

use btdash_analytics::chart::RenderOutcome;

use crate::app::AppState;
use crate::surface::{viewport_for, TerminalSurface};

use super::section_block;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(area);

    let equity_block = section_block("Equity");
    let inner = equity_block.inner(chunks[0]);
    let mut equity = TerminalSurface::new();
    let outcome = app.controller.render_equity(Some(&mut equity), viewport_for(inner));
    paint(f, chunks[0], equity_block, &equity, outcome);

    let title = format!("Win rate, rolling {} trades", app.controller.trend_window());
    let trend_block = section_block(&title);
    let inner = trend_block.inner(chunks[1]);
    let mut trend = TerminalSurface::new();
    let outcome = app.controller.render_trend(Some(&mut trend), viewport_for(inner));
    paint(f, chunks[1], trend_block, &trend, outcome);
}

/// A failed render still gets its frame; the failure is already logged.
fn paint(
    f: &mut Frame,
    area: Rect,
    block: ratatui::widgets::Block<'_>,
    surface: &TerminalSurface,
    outcome: RenderOutcome,
) {
    match outcome {
        RenderOutcome::Failed => f.render_widget(block, area),
        _ => surface.paint(f, area, block),
    }
}
