//! Keyboard input dispatch: an active field edit first, then global keys,
//! then panel-specific handlers.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use btdash_analytics::ExportFormat;

use crate::app::{AppState, Panel};

pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    if app.editing.is_some() {
        handle_edit_key(app, key);
        return;
    }

    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char(c @ '1'..='5') => {
            if let Some(panel) = Panel::from_index(c as usize - '1' as usize) {
                app.active_panel = panel;
            }
            return;
        }
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.active_panel = app.active_panel.prev();
            } else {
                app.active_panel = app.active_panel.next();
            }
            return;
        }
        KeyCode::BackTab => {
            app.active_panel = app.active_panel.prev();
            return;
        }
        KeyCode::Char('r') => {
            app.request_backtest();
            return;
        }
        _ => {}
    }

    match app.active_panel {
        Panel::Backtest => handle_backtest_key(app, key),
        Panel::Trades => {
            handle_table_key(app, key);
        }
        Panel::History => handle_history_key(app, key),
        Panel::Charts | Panel::Help => {}
    }
}

fn handle_edit_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.commit_edit(),
        KeyCode::Esc => app.cancel_edit(),
        KeyCode::Backspace => {
            if let Some(edit) = app.editing.as_mut() {
                edit.buffer.pop();
            }
        }
        KeyCode::Char(c) => {
            if let Some(edit) = app.editing.as_mut() {
                edit.buffer.push(c);
            }
        }
        _ => {}
    }
}

fn handle_backtest_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.selected_field = app.selected_field.next(),
        KeyCode::Char('k') | KeyCode::Up => app.selected_field = app.selected_field.prev(),
        KeyCode::Enter => app.begin_edit(),
        _ => {}
    }
}

/// Paging keys shared by both tables. Returns true when consumed.
fn handle_table_key(app: &mut AppState, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('n') | KeyCode::Right => app.next_page(),
        KeyCode::Char('p') | KeyCode::Left => app.prev_page(),
        KeyCode::Char('+') | KeyCode::Char('=') => app.cycle_page_size(true),
        KeyCode::Char('-') => app.cycle_page_size(false),
        _ => return false,
    }
    true
}

fn handle_history_key(app: &mut AppState, key: KeyEvent) {
    if handle_table_key(app, key) {
        return;
    }
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.scroll_history(true),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_history(false),
        KeyCode::Char('h') => app.request_history(),
        KeyCode::Char('e') => app.export_history(ExportFormat::Csv),
        KeyCode::Char('E') => app.export_history(ExportFormat::Json),
        _ => {}
    }
}
