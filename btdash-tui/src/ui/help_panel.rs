//! Panel 5: keyboard shortcuts.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, _app: &AppState) {
    let mut lines: Vec<Line> = Vec::new();

    section(&mut lines, "Global Navigation");
    key(&mut lines, "1-5", "Switch to panel by number");
    key(&mut lines, "Tab / Shift+Tab", "Cycle panels forward / back");
    key(&mut lines, "r", "Run the backtest again");
    key(&mut lines, "q", "Quit");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 1 Backtest");
    key(&mut lines, "j / k", "Select parameter");
    key(&mut lines, "Enter", "Edit parameter, Enter again to apply");
    key(&mut lines, "Esc", "Cancel edit");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 2 Trades");
    key(&mut lines, "n / p, Right / Left", "Next / previous page");
    key(&mut lines, "+ / -", "Cycle page size");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 3 Charts");
    key(&mut lines, "", "Equity curve and rolling win rate of the last run");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 4 History");
    key(&mut lines, "n / p, Right / Left", "Next / previous page (fetches)");
    key(&mut lines, "+ / -", "Cycle page size");
    key(&mut lines, "j / k", "Move selection");
    key(&mut lines, "h", "Reload current page");
    key(&mut lines, "e / E", "Export full history as CSV / JSON");

    f.render_widget(Paragraph::new(lines), area);
}

fn section<'a>(lines: &mut Vec<Line<'a>>, title: &str) {
    lines.push(Line::from(Span::styled(title.to_string(), theme::accent_bold())));
}

fn key<'a>(lines: &mut Vec<Line<'a>>, keys: &str, desc: &str) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {:>20}  ", keys), theme::accent()),
        Span::styled(desc.to_string(), theme::muted()),
    ]));
}
