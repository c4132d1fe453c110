//! Panel 2: paginated trade table.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::Span;
use ratatui::widgets::{Cell, Paragraph, Row, Table};
use ratatui::Frame;

use btdash_analytics::view::TradeRow;

use crate::app::AppState;
use crate::theme;

const WIDTHS: [Constraint; 8] = [
    Constraint::Length(19),
    Constraint::Length(19),
    Constraint::Length(6),
    Constraint::Length(10),
    Constraint::Length(10),
    Constraint::Length(12),
    Constraint::Length(10),
    Constraint::Min(8),
];

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);

    match app.controller.empty_notice() {
        Some(text) => super::notice(f, chunks[0], text),
        None => render_table(f, chunks[0], app.controller.page_rows()),
    }

    let footer = format!(
        "{}   size {}   n/p page  +/- size",
        app.controller.page_info(),
        app.controller.trade_pages().page_size()
    );
    f.render_widget(Paragraph::new(Span::styled(footer, theme::muted())), chunks[1]);
}

fn render_table(f: &mut Frame, area: Rect, rows: Vec<TradeRow>) {
    let header = Row::new(TradeRow::HEADERS.iter().map(|h| Cell::from(*h))).style(theme::header());
    let body: Vec<Row> = rows
        .iter()
        .map(|r| {
            let cells = r.cells();
            Row::new(cells.iter().enumerate().map(|(i, c)| {
                // pnl and return columns carry a sign
                let style = if i >= 6 { theme::pnl(c) } else { theme::text() };
                Cell::from(Span::styled(c.to_string(), style))
            }))
        })
        .collect();
    f.render_widget(Table::new(body, WIDTHS).header(header), area);
}
