//! Top-level UI layout: input bar, active panel, status bar.

pub mod chart_panel;
pub mod help_panel;
pub mod overlays;
pub mod report_panel;
pub mod status_bar;
pub mod table_panel;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::{AppState, Overlay, Panel};
use crate::theme;

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_inputs(f, chunks[0], app);
    draw_panel(f, chunks[1], app);
    status_bar::render(f, chunks[2], app);

    match app.overlay {
        Overlay::Edit(field) => overlays::render_edit(f, chunks[1], field, &app.edit_input),
        Overlay::ErrorHistory => overlays::render_error_history(f, chunks[1], app),
        Overlay::None => {}
    }
}

/// One-line summary of the current inputs.
fn draw_inputs(f: &mut Frame, area: Rect, app: &AppState) {
    let i = &app.inputs;
    let mut spans = vec![
        Span::styled(" [c]ountry ", theme::muted()),
        Span::styled(i.country.as_str(), theme::accent_bold()),
        Span::styled("  [f]rom ", theme::muted()),
        Span::styled(i.from.as_str(), theme::accent()),
        Span::styled("  [t]o ", theme::muted()),
        Span::styled(i.to.as_str(), theme::accent()),
        Span::styled("  [m]etric ", theme::muted()),
        Span::styled(i.metric.label(), theme::accent()),
    ];

    if let (Some(series), false) = (&app.series, app.load.in_progress) {
        spans.push(Span::styled(
            format!("  ● {} days", series.len()),
            theme::positive(),
        ));
    }

    if app.load.in_progress {
        let kind = app.load.current.map_or("...", |k| k.label());
        spans.push(Span::styled(
            format!("  Fetching {kind} [{}/{}]", app.load.done, app.load.total),
            theme::warning(),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Draw the active panel with its border.
fn draw_panel(f: &mut Frame, area: Rect, app: &AppState) {
    let panel = app.active_panel;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(true))
        .title(format!(" {} [{}] ", panel.label(), panel.index() + 1))
        .title_style(theme::panel_title(true));

    let inner = block.inner(area);
    f.render_widget(block, area);

    match panel {
        Panel::Table => table_panel::render(f, inner, app),
        Panel::Chart => chart_panel::render(f, inner, app),
        Panel::Report => report_panel::render(f, inner, app),
        Panel::Help => help_panel::render(f, inner, app),
    }
}

/// Placeholder shown by data panels before anything has loaded.
pub(crate) fn render_no_data(f: &mut Frame, area: Rect, app: &AppState) {
    let msg = if app.load.in_progress {
        format!("Loading {}...", app.inputs.country)
    } else {
        app.error_history
            .front()
            .map(|e| e.message.clone())
            .unwrap_or_else(|| "No data loaded. Press c to choose a country.".into())
    };
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(msg, theme::muted())),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

/// Compute a centered rect for overlays.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
