//! Panel 1: backtest parameters, summary, trade statistics and the
//! best/worst trade cards.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;

use crate::app::{AppState, InputField};
use crate::theme;

use super::section_block;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Length(3), Constraint::Min(5)])
        .split(cols[0]);
    render_form(f, left[0], app);
    render_summary(f, left[1], app);
    render_stats(f, left[2], app);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(35),
            Constraint::Percentage(35),
            Constraint::Percentage(30),
        ])
        .split(cols[1]);
    render_card(f, right[0], "Best Trade", app.controller.best_trade_lines());
    render_card(f, right[1], "Worst Trade", app.controller.worst_trade_lines());
    render_errors(f, right[2], app);
}

fn render_form(f: &mut Frame, area: Rect, app: &AppState) {
    let lines: Vec<Line> = InputField::ALL
        .iter()
        .map(|&field| {
            let selected = field == app.selected_field;
            let (value, editing) = match &app.editing {
                Some(edit) if edit.field == field => (format!("{}_", edit.buffer), true),
                _ => (app.field_value(field), false),
            };
            let marker = if selected { "> " } else { "  " };
            let value_style = if editing {
                theme::warning().add_modifier(Modifier::BOLD)
            } else if selected {
                theme::accent_bold()
            } else {
                theme::text()
            };
            Line::from(vec![
                Span::styled(marker, theme::accent()),
                Span::styled(format!("{:<22}", field.label()), theme::muted()),
                Span::styled(value, value_style),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines).block(section_block("Parameters")), area);
}

fn render_summary(f: &mut Frame, area: Rect, app: &AppState) {
    let text = app
        .controller
        .summary_line()
        .unwrap_or_else(|| "Press r to run a backtest".to_string());
    f.render_widget(
        Paragraph::new(Span::styled(text, theme::text())).block(section_block("Summary")),
        area,
    );
}

fn render_stats(f: &mut Frame, area: Rect, app: &AppState) {
    let lines: Vec<Line> = match app.controller.stats_panel() {
        Some(panel) => panel
            .rows()
            .into_iter()
            .map(|(label, value)| {
                Line::from(vec![
                    Span::styled(format!("{label:<18}"), theme::muted()),
                    Span::styled(value.to_string(), theme::text()),
                ])
            })
            .collect(),
        None => vec![Line::from(Span::styled("No run yet", theme::muted()))],
    };
    f.render_widget(Paragraph::new(lines).block(section_block("Trade Statistics")), area);
}

fn render_card(f: &mut Frame, area: Rect, title: &str, card: Vec<String>) {
    let lines: Vec<Line> = card
        .into_iter()
        .map(|l| Line::from(Span::styled(l, theme::secondary())))
        .collect();
    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(section_block(title)),
        area,
    );
}

fn render_errors(f: &mut Frame, area: Rect, app: &AppState) {
    let lines: Vec<Line> = app
        .error_history
        .iter()
        .take(area.height.saturating_sub(2) as usize)
        .map(|e| {
            Line::from(vec![
                Span::styled(e.timestamp.format("%H:%M:%S ").to_string(), theme::muted()),
                Span::styled(format!("[{}] ", e.category.label()), theme::warning()),
                Span::styled(e.message.clone(), theme::negative()),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines).block(section_block("Errors")), area);
}
