//! Page 5: executive scorecard.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use workforce_core::payload::ComparisonSeries;
use workforce_runner::DashboardPage;

use crate::app::{AppState, ScorecardSection};
use crate::theme::Palette;
use crate::ui::company_page::snapshot_lines;
use crate::ui::scroll_start;
use crate::ui::widgets::{bar, breakdown_header, breakdown_line, placeholder};

const NAME_WIDTH: usize = 28;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let p = &app.palette;
    let Some(card) = app.scorecard.view().data() else {
        let text = app
            .scorecard
            .notice()
            .unwrap_or("Select a Holding Company (H) or a Company (c).");
        f.render_widget(Paragraph::new(placeholder(p, text)), area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(7),
            Constraint::Min(3),
        ])
        .split(area);

    f.render_widget(Paragraph::new(snapshot_lines(p, &card.overall)), chunks[0]);
    f.render_widget(Paragraph::new(trend_lines(p, &card.trend)), chunks[1]);

    let height = chunks[2].height as usize;
    f.render_widget(Paragraph::new(table_lines(app, height)), chunks[2]);
}

/// Last months of actual against target, newest at the bottom.
fn trend_lines(p: &Palette, trend: &ComparisonSeries) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled("Monthly Trend", p.accent_bold()))];
    if trend.labels.is_empty() {
        lines.push(placeholder(p, "  no history"));
        return lines;
    }
    let max = trend.actual_values.iter().copied().fold(0.0, f64::max);
    let shown = trend.labels.len().min(6);
    let skip = trend.labels.len() - shown;
    for (i, label) in trend.labels.iter().enumerate().skip(skip) {
        let actual = trend.actual_values.get(i).copied().unwrap_or(0.0);
        let target = trend.target_values.get(i).copied().unwrap_or(0.0);
        lines.push(Line::from(vec![
            Span::styled(format!("  {label:<10} "), p.text()),
            Span::styled(
                format!("{:<24}", bar(actual, max, 24)),
                Style::default().fg(p.series(1)),
            ),
            Span::styled(format!(" {actual:.1}% / {target:.1}%"), p.muted()),
        ]));
    }
    lines
}

fn table_lines(app: &AppState, height: usize) -> Vec<Line<'static>> {
    let p = &app.palette;
    let cursor = app.cursor();
    let mut lines: Vec<(Option<usize>, Line<'static>)> = Vec::new();
    let mut current = None;
    for (i, (section, _, row)) in app.scorecard_items().into_iter().enumerate() {
        if current != Some(section) {
            current = Some(section);
            let title = match section {
                ScorecardSection::Subsidiaries => "Subsidiary".to_string(),
                ScorecardSection::RiskyPositions => format!(
                    "Risky positions: {}",
                    app.scorecard.risk_company().unwrap_or("-")
                ),
            };
            lines.push((None, breakdown_header(p, &title, NAME_WIDTH)));
        }
        lines.push((Some(i), breakdown_line(p, row, NAME_WIDTH, i == cursor)));
    }
    if let Some(notice) = app.scorecard.risky().notice() {
        lines.push((None, placeholder(p, notice)));
    }
    if lines.is_empty() {
        return vec![placeholder(p, "No subsidiaries for the selected holding.")];
    }

    let cursor_line = lines
        .iter()
        .position(|(i, _)| *i == Some(cursor))
        .unwrap_or(0);
    lines
        .into_iter()
        .skip(scroll_start(cursor_line, height))
        .take(height)
        .map(|(_, line)| line)
        .collect()
}
