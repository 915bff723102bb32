//! Shared formatting for breakdown tables and bars.

use ratatui::style::Modifier;
use ratatui::text::{Line, Span};

use workforce_core::payload::BreakdownRow;

use crate::theme::Palette;

pub fn pct(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.1}%"),
        None => "-".to_string(),
    }
}

/// Signed percentage-point figure.
pub fn signed(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:+.1}"),
        None => "-".to_string(),
    }
}

pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{head}.")
    }
}

/// Horizontal bar scaled against `max`.
pub fn bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let filled = ((value / max) * width as f64).round() as usize;
    "█".repeat(filled.clamp(1, width))
}

pub fn breakdown_header(palette: &Palette, name: &str, width: usize) -> Line<'static> {
    Line::from(Span::styled(
        format!(
            "  {:<width$} {:>6} {:>6} {:>7} {:>7} {:>7}  {}",
            name, "Total", "Saudi", "Actual", "Target", "Var", "Status"
        ),
        palette.accent_bold(),
    ))
}

/// One breakdown row; `selected` rows are drawn reversed.
pub fn breakdown_line(
    palette: &Palette,
    row: &BreakdownRow,
    width: usize,
    selected: bool,
) -> Line<'static> {
    let base = if selected {
        palette.selected()
    } else {
        palette.text()
    };
    let status = row.status();
    let status_style = if selected {
        base.add_modifier(Modifier::BOLD)
    } else {
        palette.rag(status)
    };
    let marker = if selected { "> " } else { "  " };
    Line::from(vec![
        Span::styled(
            format!(
                "{marker}{:<width$} {:>6} {:>6} {:>7} {:>7} ",
                truncate(row.name(), width),
                row.total_employees,
                row.saudi_employees,
                pct(row.saudization_percent),
                pct(row.target_percent),
            ),
            base,
        ),
        Span::styled(
            format!("{:>7}  {}", signed(row.variance_percent), status.label()),
            status_style,
        ),
    ])
}

pub fn placeholder(palette: &Palette, text: &str) -> Line<'static> {
    Line::from(Span::styled(text.to_string(), palette.muted()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn truncate_marks_cut() {
        assert_eq!(truncate("Research & Development", 10), "Research .");
        assert_eq!(truncate("Sales", 10), "Sales");
    }

    #[test]
    fn bar_scales_and_never_vanishes() {
        assert_eq!(bar(50.0, 100.0, 10).chars().count(), 5);
        assert_eq!(bar(0.1, 100.0, 10).chars().count(), 1);
        assert!(bar(0.0, 100.0, 10).is_empty());
        assert_eq!(bar(200.0, 100.0, 10).chars().count(), 10);
    }

    #[test]
    fn figures_format() {
        assert_eq!(pct(Some(33.333)), "33.3%");
        assert_eq!(pct(None), "-");
        assert_eq!(signed(Some(-2.04)), "-2.0");
        assert_eq!(signed(Some(1.0)), "+1.0");
    }

    proptest! {
        #[test]
        fn truncate_never_exceeds_max(s in "\\PC{0,40}", max in 1usize..30) {
            prop_assert!(truncate(&s, max).chars().count() <= max);
        }

        #[test]
        fn bar_fits_width(value in -10.0f64..500.0, max in 0.0f64..400.0, width in 1usize..40) {
            prop_assert!(bar(value, max, width).chars().count() <= width);
        }
    }
}
