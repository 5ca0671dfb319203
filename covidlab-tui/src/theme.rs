//! Parrot/neon theme tokens.
//!
//! Neon accents on a dark background: cyan for focus, green and pink for
//! rising and falling counts, orange for warnings.

use ratatui::style::{Color, Modifier, Style};

pub const ACCENT: Color = Color::Rgb(0, 255, 255);
pub const POSITIVE: Color = Color::Rgb(0, 255, 128);
pub const NEGATIVE: Color = Color::Rgb(255, 20, 147);
pub const WARNING: Color = Color::Rgb(255, 140, 0);
pub const NEUTRAL: Color = Color::Rgb(147, 112, 219);
pub const MUTED: Color = Color::Rgb(100, 149, 237);

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn positive() -> Style {
    Style::default().fg(POSITIVE)
}

pub fn negative() -> Style {
    Style::default().fg(NEGATIVE)
}

pub fn warning() -> Style {
    Style::default().fg(WARNING)
}

pub fn neutral() -> Style {
    Style::default().fg(NEUTRAL)
}

pub fn muted() -> Style {
    Style::default().fg(MUTED)
}

pub fn panel_border(active: bool) -> Style {
    if active {
        accent()
    } else {
        muted()
    }
}

pub fn panel_title(active: bool) -> Style {
    if active {
        accent_bold()
    } else {
        muted()
    }
}

/// Negative deltas are source corrections; flag them.
pub fn delta_style(value: i64) -> Style {
    if value < 0 {
        negative()
    } else {
        Style::default()
    }
}

/// Line color per plotted metric.
pub fn metric_color(metric: covidlab_core::Metric) -> Color {
    match metric {
        covidlab_core::Metric::Cases => ACCENT,
        covidlab_core::Metric::Deaths => NEGATIVE,
        covidlab_core::Metric::Recovered => POSITIVE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_deltas_are_flagged() {
        assert_eq!(delta_style(-1), negative());
        assert_eq!(delta_style(0), Style::default());
        assert_eq!(delta_style(12), Style::default());
    }

    #[test]
    fn active_panel_uses_accent() {
        assert_eq!(panel_border(true).fg, Some(ACCENT));
        assert_eq!(panel_border(false).fg, Some(MUTED));
    }
}
