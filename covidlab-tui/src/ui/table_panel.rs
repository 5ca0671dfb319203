//! Panel 1 (Table): the full daily series, newest first.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(view) = &app.view else {
        return super::render_no_data(f, area, app);
    };

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(vec![
        Span::styled(format!("Covid-19 data of {}", view.entity), theme::accent_bold()),
        Span::styled(
            format!("  {} days  [j/k]scroll [g/G]top/bottom [x]export", view.table.len()),
            theme::muted(),
        ),
    ]));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("{:<12} {:>10} {:>10} {:>10}", "Date", "Cases", "Deaths", "Recovered"),
        theme::accent_bold(),
    )));

    let visible = area.height.saturating_sub(3) as usize;
    for r in view.table.iter().skip(app.table_scroll).take(visible) {
        lines.push(Line::from(vec![
            Span::styled(format!("{:<12} ", r.date.format("%Y-%m-%d")), theme::muted()),
            Span::styled(format!("{:>10} ", r.cases), theme::delta_style(r.cases)),
            Span::styled(format!("{:>10} ", r.deaths), theme::delta_style(r.deaths)),
            Span::styled(format!("{:>10}", r.recovered), theme::delta_style(r.recovered)),
        ]));
    }

    f.render_widget(Paragraph::new(lines), area);
}
