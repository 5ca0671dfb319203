//! Panel 2 (Chart): the selected metric over the date window.

use chrono::NaiveDate;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Chart, Dataset, GraphType, Paragraph};
use ratatui::Frame;

use covidlab_core::Metric;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(view) = &app.view else {
        return super::render_no_data(f, area, app);
    };

    match &view.window {
        Err(e) => render_message(f, area, &e.user_message()),
        Ok(_) if view.chart.is_empty() => {
            render_message(f, area, "No data in the selected range")
        }
        Ok(window) => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(1), Constraint::Min(3)])
                .split(area);
            let header = Line::from(vec![
                Span::styled(
                    format!("{} of {}", view.metric, view.entity),
                    theme::accent_bold(),
                ),
                Span::styled(format!("  {window}  [m]etric [f/t]range"), theme::muted()),
            ]);
            f.render_widget(Paragraph::new(header), chunks[0]);
            render_chart(f, chunks[1], &view.chart, view.metric);
        }
    }
}

fn render_message(f: &mut Frame, area: Rect, msg: &str) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(msg.to_string(), theme::warning())),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

fn render_chart(f: &mut Frame, area: Rect, points: &[(NaiveDate, i64)], metric: Metric) {
    let min_y = points.iter().map(|&(_, v)| v).min().unwrap_or(0) as f64;
    let max_y = points.iter().map(|&(_, v)| v).max().unwrap_or(0) as f64;
    let padding = ((max_y - min_y).abs() * 0.05).max(1.0);
    let y_min = min_y - padding;
    let y_max = max_y + padding;
    let x_max = points.len().saturating_sub(1) as f64;

    let data: Vec<(f64, f64)> = points
        .iter()
        .enumerate()
        .map(|(i, &(_, v))| (i as f64, v as f64))
        .collect();

    let dataset = Dataset::default()
        .name(metric.label())
        .marker(symbols::Marker::Braille)
        .style(Style::default().fg(theme::metric_color(metric)))
        .graph_type(GraphType::Line)
        .data(&data);

    let first = points.first().map(|(d, _)| d.to_string()).unwrap_or_default();
    let last = points.last().map(|(d, _)| d.to_string()).unwrap_or_default();

    let chart = Chart::new(vec![dataset])
        .x_axis(
            Axis::default()
                .title(Span::styled("Date", theme::muted()))
                .style(theme::muted())
                .bounds([0.0, x_max.max(1.0)])
                .labels(vec![
                    Span::styled(first, theme::muted()),
                    Span::styled(last, theme::muted()),
                ]),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled(metric.label(), theme::muted()))
                .style(theme::muted())
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::styled(format!("{y_min:.0}"), theme::muted()),
                    Span::styled(format!("{y_max:.0}"), theme::muted()),
                ]),
        );

    f.render_widget(chart, area);
}
