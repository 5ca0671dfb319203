//! Panel 3 (Report): the 15-metric summary, shown on demand.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use covidlab_core::ReportValue;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(view) = &app.view else {
        return super::render_no_data(f, area, app);
    };

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(vec![
        Span::styled(format!("Report of {}", view.entity), theme::accent_bold()),
        Span::styled("  [r]show/hide [x]export", theme::muted()),
    ]));
    lines.push(Line::from(""));

    if !app.show_report {
        lines.push(Line::from(Span::styled(
            "Press r to show the report.",
            theme::muted(),
        )));
        f.render_widget(Paragraph::new(lines), area);
        return;
    }

    match &view.report {
        Err(e) => lines.push(Line::from(Span::styled(e.user_message(), theme::warning()))),
        Ok(report) => {
            let width = report.entries.iter().map(|e| e.label.len()).max().unwrap_or(0);
            lines.push(Line::from(Span::styled(
                format!("{:>3}  {:<width$}  {}", "", "Data", "Number"),
                theme::accent_bold(),
            )));
            for (i, entry) in report.entries.iter().enumerate() {
                let value_style = match entry.value {
                    ReportValue::Count(n) => theme::delta_style(n),
                    ReportValue::Date(_) => theme::neutral(),
                };
                lines.push(Line::from(vec![
                    Span::styled(format!("{:>3}  ", i + 1), theme::muted()),
                    Span::styled(format!("{:<width$}  ", entry.label), theme::muted()),
                    Span::styled(entry.value.to_string(), value_style),
                ]));
            }
        }
    }

    f.render_widget(Paragraph::new(lines), area);
}
