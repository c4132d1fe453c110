//! Top-level UI layout: one panel at a time plus a status bar.

pub mod backtest_panel;
pub mod chart_panel;
pub mod help_panel;
pub mod history_panel;
pub mod status_bar;
pub mod trades_panel;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::{AppState, Panel};
use crate::theme;

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());

    draw_panel(f, chunks[0], app);
    status_bar::render(f, chunks[1], app);
}

fn draw_panel(f: &mut Frame, area: Rect, app: &AppState) {
    let panel = app.active_panel;
    let mut title = format!(" {} [{}] ", panel.label(), panel.index() + 1);
    if app.is_loading() {
        title.push_str("(loading) ");
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(true))
        .title(title)
        .title_style(theme::panel_title(true));

    let inner = block.inner(area);
    f.render_widget(block, area);

    match panel {
        Panel::Backtest => backtest_panel::render(f, inner, app),
        Panel::Trades => trades_panel::render(f, inner, app),
        Panel::Charts => chart_panel::render(f, inner, app),
        Panel::History => history_panel::render(f, inner, app),
        Panel::Help => help_panel::render(f, inner, app),
    }
}

/// A bordered sub-block inside a panel.
pub(crate) fn section_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme::muted())
        .title(Span::styled(format!(" {title} "), theme::accent_bold()))
}

/// Centered muted notice, used for empty tables.
pub(crate) fn notice(f: &mut Frame, area: Rect, text: &str) {
    let para = Paragraph::new(Line::from(Span::styled(text.to_string(), theme::muted())))
        .alignment(ratatui::layout::Alignment::Center);
    f.render_widget(para, area);
}
