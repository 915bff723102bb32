//! Page 2: subsidiaries of a holding, actual against target.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use workforce_core::payload::ComparisonSeries;
use workforce_runner::DashboardPage;

use crate::app::AppState;
use crate::theme::Palette;
use crate::ui::scroll_start;
use crate::ui::widgets::{bar, breakdown_header, breakdown_line, placeholder, truncate};

const NAME_WIDTH: usize = 28;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let p = &app.palette;
    let Some(comparison) = app.holding.view().data() else {
        let text = app
            .holding
            .notice()
            .unwrap_or("Select a Holding Company (H) to compare subsidiaries.");
        f.render_widget(Paragraph::new(placeholder(p, text)), area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(8)])
        .split(area);

    let mut lines = vec![breakdown_header(p, "Company", NAME_WIDTH)];
    if comparison.rows.is_empty() {
        lines.push(placeholder(p, "  no subsidiaries found"));
    }
    let height = chunks[0].height.saturating_sub(1) as usize;
    let cursor = app.cursor();
    for (i, row) in comparison
        .rows
        .iter()
        .enumerate()
        .skip(scroll_start(cursor, height))
        .take(height)
    {
        lines.push(breakdown_line(p, row, NAME_WIDTH, i == cursor));
    }
    f.render_widget(Paragraph::new(lines), chunks[0]);
    f.render_widget(Paragraph::new(comparison_lines(p, &comparison.chart)), chunks[1]);
}

/// Actual bars with the target figure beside them.
fn comparison_lines(p: &Palette, chart: &ComparisonSeries) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled("Actual vs Target", p.accent_bold()))];
    let max = chart
        .actual_values
        .iter()
        .chain(chart.target_values.iter())
        .copied()
        .fold(0.0, f64::max);
    for (i, label) in chart.labels.iter().enumerate() {
        let actual = chart.actual_values.get(i).copied().unwrap_or(0.0);
        let target = chart.target_values.get(i).copied().unwrap_or(0.0);
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<20} ", truncate(label, 20)), p.text()),
            Span::styled(
                format!("{:<20}", bar(actual, max, 20)),
                Style::default().fg(p.series(0)),
            ),
            Span::styled(format!(" {actual:.1}% / {target:.1}%"), p.muted()),
        ]));
    }
    lines
}
