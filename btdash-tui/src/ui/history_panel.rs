//! Panel 4: latest decision card and the paginated decision history.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;

use btdash_analytics::view::DecisionRow;

use crate::app::AppState;
use crate::theme;

use super::section_block;

const WIDTHS: [Constraint; 7] = [
    Constraint::Length(19),
    Constraint::Length(8),
    Constraint::Length(11),
    Constraint::Length(12),
    Constraint::Length(21),
    Constraint::Length(10),
    Constraint::Min(8),
];

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    render_latest(f, chunks[0], app);

    match app.history.empty_notice() {
        Some(text) => super::notice(f, chunks[1], text),
        None => render_table(f, chunks[1], app),
    }

    let footer = format!(
        "{} {}   size {}   n/p page  +/- size  e/E export",
        app.history.symbol(),
        app.history.page_info(),
        app.history.pages().page_size()
    );
    f.render_widget(Paragraph::new(Span::styled(footer, theme::muted())), chunks[2]);
}

fn render_latest(f: &mut Frame, area: Rect, app: &AppState) {
    let lines: Vec<Line> = match app.history.latest() {
        Some(card) => vec![
            Line::from(vec![
                Span::styled(card.action, theme::accent_bold()),
                Span::styled(format!("  confidence {}", card.confidence), theme::secondary()),
                Span::styled(format!("  size {}", card.size), theme::secondary()),
            ]),
            Line::from(Span::styled(card.tp_sl, theme::secondary())),
            Line::from(Span::styled(card.reason, theme::text())),
        ],
        None => vec![Line::from(Span::styled("No decisions yet", theme::muted()))],
    };
    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(section_block("Latest Decision")),
        area,
    );
}

fn render_table(f: &mut Frame, area: Rect, app: &AppState) {
    let header =
        Row::new(DecisionRow::HEADERS.iter().map(|h| Cell::from(*h))).style(theme::header());
    let rows: Vec<Row> = app
        .history
        .rows()
        .iter()
        .map(|r| Row::new(r.cells().map(|c| Cell::from(c.to_string()))))
        .collect();
    let table = Table::new(rows, WIDTHS)
        .header(header)
        .row_highlight_style(theme::accent().add_modifier(Modifier::REVERSED));
    let mut state = TableState::default().with_selected(Some(app.history_scroll));
    f.render_stateful_widget(table, area, &mut state);
}
