//! Panel 4 (Help): keyboard shortcuts.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut lines: Vec<Line> = Vec::new();

    section(&mut lines, "Global Navigation");
    key(&mut lines, "1-4", "Switch to panel by number");
    key(&mut lines, "Tab / Shift+Tab", "Cycle panels forward / back");
    key(&mut lines, "e", "Open error history");
    key(&mut lines, "q", "Quit");
    lines.push(Line::from(""));

    section(&mut lines, "Inputs");
    key(&mut lines, "c", "Edit country (case-insensitive)");
    key(&mut lines, "f / t", "Edit range start / end (YYYY-MM-DD)");
    key(&mut lines, "Enter / Esc", "Apply / cancel an edit");
    key(&mut lines, "m", "Cycle chart metric: Cases, Deaths, Recovered");
    lines.push(Line::from(""));

    section(&mut lines, "Data");
    key(&mut lines, "r", "Show / hide the report");
    key(&mut lines, "x", "Export table, report and range files");
    key(&mut lines, "R", "Reload from source (drops the cached country)");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 1: Table");
    key(&mut lines, "j / k", "Scroll one row");
    key(&mut lines, "PgDn / PgUp", "Scroll one page");
    key(&mut lines, "g / G", "Jump to newest / oldest");
    lines.push(Line::from(""));

    section(&mut lines, "Export directory");
    key(&mut lines, "", &app.export_dir.display().to_string());

    f.render_widget(Paragraph::new(lines), area);
}

fn section(lines: &mut Vec<Line<'_>>, title: &str) {
    lines.push(Line::from(Span::styled(title.to_string(), theme::accent_bold())));
}

fn key(lines: &mut Vec<Line<'_>>, keys: &str, desc: &str) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {keys:>16}  "), theme::accent()),
        Span::styled(desc.to_string(), theme::muted()),
    ]));
}
