//! Overlay widgets: input editor and error history.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table};
use ratatui::Frame;

use crate::app::{AppState, ErrorCategory, Field};
use crate::theme;
use crate::ui::centered_rect;

pub fn render_edit(f: &mut Frame, area: Rect, field: Field, input: &str) {
    let popup = centered_rect(50, 25, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(" Edit [Enter]apply [Esc]cancel ")
        .title_style(theme::accent_bold());

    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(format!("{}:", field.label()), theme::muted())),
        Line::from(""),
        Line::from(vec![
            Span::styled("> ", theme::accent()),
            Span::styled(input, theme::accent_bold()),
            Span::styled("_", theme::accent()),
        ]),
    ];
    f.render_widget(Paragraph::new(text), inner);
}

/// One row per recorded error, newest first: time, category, what was being
/// done, and the message the dashboard showed for it.
pub fn render_error_history(f: &mut Frame, area: Rect, app: &AppState) {
    let popup = centered_rect(80, 70, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::negative())
        .title(format!(" Errors: {} [Esc]close [j/k]scroll ", tally(app)))
        .title_style(theme::negative());

    if app.error_history.is_empty() {
        let empty = Paragraph::new(Span::styled("Nothing has failed yet.", theme::muted()))
            .block(block);
        f.render_widget(empty, popup);
        return;
    }

    let rows = app
        .error_history
        .iter()
        .enumerate()
        .skip(app.error_scroll)
        .map(|(i, err)| {
            let selected = i == app.error_scroll;
            let message_style = if selected {
                theme::negative().add_modifier(Modifier::BOLD)
            } else {
                theme::neutral()
            };
            Row::new(vec![
                Cell::from(if selected { "▸" } else { " " }).style(theme::negative()),
                Cell::from(err.timestamp.format("%H:%M:%S").to_string()).style(theme::muted()),
                Cell::from(err.category.label()).style(category_style(err.category)),
                Cell::from(err.context.as_str()).style(theme::muted()),
                Cell::from(err.message.as_str()).style(message_style),
            ])
        });

    let widths = [
        Constraint::Length(1),
        Constraint::Length(8),
        Constraint::Length(5),
        Constraint::Percentage(25),
        Constraint::Fill(1),
    ];
    let header = Row::new(vec!["", "Time", "Kind", "While", "Message"]).style(theme::accent_bold());
    f.render_widget(Table::new(rows, widths).header(header).block(block), popup);
}

/// Per-category counts, e.g. "2 INPUT, 1 NET", or "none".
fn tally(app: &AppState) -> String {
    let parts: Vec<String> = ErrorCategory::ALL
        .iter()
        .filter_map(|&cat| {
            let n = app.error_history.iter().filter(|e| e.category == cat).count();
            (n > 0).then(|| format!("{n} {}", cat.label()))
        })
        .collect();
    if parts.is_empty() {
        "none".to_string()
    } else {
        parts.join(", ")
    }
}

fn category_style(category: ErrorCategory) -> Style {
    match category {
        ErrorCategory::Network | ErrorCategory::Export => theme::warning(),
        ErrorCategory::Input => theme::accent(),
        ErrorCategory::Data => theme::negative(),
    }
}
