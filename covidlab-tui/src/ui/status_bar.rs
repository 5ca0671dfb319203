//! Bottom status bar: panel hints and the last status message.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{AppState, Panel, StatusLevel};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let hints: String = (0..Panel::COUNT)
        .filter_map(Panel::from_index)
        .map(|p| format!(" {}:{}", p.index() + 1, p.label()))
        .collect();
    let mut spans: Vec<Span> = vec![Span::styled(hints, theme::muted()), Span::raw(" | ")];

    if let Some((msg, level)) = &app.status_message {
        let style = match level {
            StatusLevel::Info => theme::accent(),
            StatusLevel::Warning => theme::warning(),
            StatusLevel::Error => theme::negative(),
        };
        spans.push(Span::styled(msg.as_str(), style));
    }

    if !app.error_history.is_empty() {
        spans.push(Span::styled(
            format!("  [e]rrors: {}", app.error_history.len()),
            theme::muted(),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
