//! Keyboard input dispatch: overlays → global keys → panel-specific handlers.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{AppState, Field, Overlay, Panel};

pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // 1. Overlays consume input first.
    match app.overlay {
        Overlay::Edit(field) => {
            handle_edit_overlay(app, field, key);
            return;
        }
        Overlay::ErrorHistory => {
            handle_error_overlay(app, key);
            return;
        }
        Overlay::None => {}
    }

    // 2. Global keys.
    match key.code {
        KeyCode::Char('q') => app.running = false,
        KeyCode::Char(c @ '1'..='4') => {
            if let Some(panel) = Panel::from_index(c as usize - '1' as usize) {
                app.active_panel = panel;
            }
        }
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.active_panel = app.active_panel.prev();
            } else {
                app.active_panel = app.active_panel.next();
            }
        }
        KeyCode::BackTab => app.active_panel = app.active_panel.prev(),
        KeyCode::Char('c') => app.open_edit(Field::Country),
        KeyCode::Char('f') => app.open_edit(Field::From),
        KeyCode::Char('t') => app.open_edit(Field::To),
        KeyCode::Char('m') => app.cycle_metric(),
        KeyCode::Char('r') => {
            app.show_report = !app.show_report;
            if app.show_report {
                app.active_panel = Panel::Report;
            }
        }
        KeyCode::Char('x') => app.export_current(),
        KeyCode::Char('R') => {
            if !app.load.in_progress {
                app.request_load(true);
            }
        }
        KeyCode::Char('e') => {
            app.overlay = Overlay::ErrorHistory;
            app.error_scroll = 0;
        }
        _ => handle_panel_key(app, key),
    }
}

fn handle_panel_key(app: &mut AppState, key: KeyEvent) {
    if app.active_panel != Panel::Table {
        return;
    }
    let last = app.table_len().saturating_sub(1);
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            app.table_scroll = (app.table_scroll + 1).min(last);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.table_scroll = app.table_scroll.saturating_sub(1);
        }
        KeyCode::PageDown => app.table_scroll = (app.table_scroll + 20).min(last),
        KeyCode::PageUp => app.table_scroll = app.table_scroll.saturating_sub(20),
        KeyCode::Char('g') | KeyCode::Home => app.table_scroll = 0,
        KeyCode::Char('G') | KeyCode::End => app.table_scroll = last,
        _ => {}
    }
}

fn handle_edit_overlay(app: &mut AppState, field: Field, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.overlay = Overlay::None;
            app.edit_input.clear();
        }
        KeyCode::Enter => app.apply_edit(field),
        KeyCode::Backspace => {
            app.edit_input.pop();
        }
        KeyCode::Char(c) => app.edit_input.push(c),
        _ => {}
    }
}

fn handle_error_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('e') => {
            app.overlay = Overlay::None;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if app.error_scroll + 1 < app.error_history.len() {
                app.error_scroll += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.error_scroll = app.error_scroll.saturating_sub(1);
        }
        _ => {}
    }
}
