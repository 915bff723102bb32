//! Page 6: Saudization trends.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Sparkline};
use ratatui::Frame;

use workforce_core::payload::{ChartData, TrendOverall};
use workforce_runner::DashboardPage;

use crate::app::AppState;
use crate::theme::Palette;
use crate::ui::scroll_start;
use crate::ui::widgets::{bar, placeholder, signed, truncate};

const HEADCOUNT_MONTHS: usize = 6;
const BRANCH_WIDTH: usize = 18;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let p = &app.palette;
    let Some(data) = app.trends.view().data() else {
        let text = app
            .trends
            .notice()
            .unwrap_or("Select a Holding Company (H) or a Company (c).");
        f.render_widget(Paragraph::new(placeholder(p, text)), area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(4),
            Constraint::Length(HEADCOUNT_MONTHS as u16 + 1),
            Constraint::Min(3),
        ])
        .split(area);

    f.render_widget(
        Paragraph::new(summary_line(p, &data.overall, app.trends.months_back())),
        chunks[0],
    );
    render_percent(f, chunks[1], p, &data.overall);
    f.render_widget(Paragraph::new(headcount_lines(p, &data.overall)), chunks[2]);

    let height = chunks[3].height as usize;
    let lines = match app.trends.branch_placeholder() {
        Some(text) => vec![
            Line::from(Span::styled("Branch-level Trend", p.accent_bold())),
            placeholder(p, text),
        ],
        None => branch_lines(p, &data.branch_level, app.cursor(), height),
    };
    f.render_widget(Paragraph::new(lines), chunks[3]);
}

fn summary_line(p: &Palette, overall: &TrendOverall, months: u32) -> Line<'static> {
    let Some(latest) = overall.latest() else {
        return placeholder(p, "No data");
    };
    let variance = latest.actual - latest.target;
    Line::from(vec![
        Span::styled(format!("{months} months to {}  ", latest.label), p.muted()),
        Span::styled(format!("Actual {:.1}%  ", latest.actual), p.kpi()),
        Span::styled(format!("Target {:.1}%  ", latest.target), p.text()),
        Span::styled(format!("Var {}  ", signed(Some(variance))), p.variance(Some(variance))),
        Span::styled(format!("Drift {}", signed(overall.drift())), p.muted()),
    ])
}

/// Actual percent as a sparkline with the target series beneath it.
fn render_percent(f: &mut Frame, area: Rect, p: &Palette, overall: &TrendOverall) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1), Constraint::Length(1)])
        .split(area);
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            "Saudization % (Actual vs Target)",
            p.accent_bold(),
        ))),
        chunks[0],
    );
    // Sparkline wants integers; tenths keep one decimal of resolution.
    let tenths = |values: &[f64]| -> Vec<u64> {
        values.iter().map(|v| (v.max(0.0) * 10.0).round() as u64).collect()
    };
    let actual = tenths(&overall.actual_values);
    let target = tenths(&overall.target_values);
    let max = actual.iter().chain(target.iter()).copied().max().unwrap_or(0);
    f.render_widget(
        Sparkline::default()
            .data(&actual)
            .max(max)
            .style(Style::default().fg(p.series(0))),
        chunks[1],
    );
    f.render_widget(
        Sparkline::default()
            .data(&target)
            .max(max)
            .style(Style::default().fg(p.series(2))),
        chunks[2],
    );
}

/// Saudi and non-Saudi headcount for the latest months, stacked in one bar.
fn headcount_lines(p: &Palette, overall: &TrendOverall) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        "Headcount (Saudi vs Non-Saudi)",
        p.accent_bold(),
    ))];
    let points = overall.points();
    if points.is_empty() {
        lines.push(placeholder(p, "  no history"));
        return lines;
    }
    let max = points.iter().map(|pt| pt.saudi + pt.non_saudi).max().unwrap_or(0) as f64;
    let skip = points.len().saturating_sub(HEADCOUNT_MONTHS);
    for pt in points.iter().skip(skip) {
        let saudi = bar(pt.saudi as f64, max, 30);
        let total = bar((pt.saudi + pt.non_saudi) as f64, max, 30);
        let rest = "█".repeat(total.chars().count().saturating_sub(saudi.chars().count()));
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<8} ", pt.label), p.text()),
            Span::styled(saudi, Style::default().fg(p.series(1))),
            Span::styled(format!("{rest:<30}"), Style::default().fg(p.series(3))),
            Span::styled(format!(" {} / {}", pt.saudi, pt.non_saudi), p.muted()),
        ]));
    }
    lines
}

/// One row per branch: latest percent and its change over the window.
fn branch_lines(p: &Palette, chart: &ChartData, cursor: usize, height: usize) -> Vec<Line<'static>> {
    let w = BRANCH_WIDTH;
    let mut lines = vec![Line::from(Span::styled(
        format!(
            "  {:<w$} {:>7} {:>7}  {}",
            "Branch-level Trend", "Latest", "Change", "Series"
        ),
        p.accent_bold(),
    ))];
    let rows = height.saturating_sub(1);
    let start = scroll_start(cursor, rows);
    for (i, dataset) in chart.datasets.iter().enumerate().skip(start).take(rows) {
        let selected = i == cursor;
        let first = dataset.values.first().copied();
        let last = dataset.values.last().copied();
        let change = first.zip(last).map(|(a, b)| b - a);
        let spark: String = dataset.values.iter().map(|v| level(*v)).collect();
        lines.push(Line::from(vec![
            Span::styled(
                format!(
                    "{}{:<w$} {:>7} ",
                    if selected { "> " } else { "  " },
                    truncate(&dataset.name, BRANCH_WIDTH),
                    last.map_or("-".to_string(), |v| format!("{v:.1}%")),
                ),
                if selected { p.selected() } else { p.text() },
            ),
            Span::styled(format!("{:>7}  ", signed(change)), p.variance(change)),
            Span::styled(spark, Style::default().fg(p.series(i))),
        ]));
    }
    lines
}

/// Eighth-block glyph for a percentage.
fn level(value: f64) -> char {
    const BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
    let idx = ((value.clamp(0.0, 100.0) / 100.0) * 7.0).round() as usize;
    BLOCKS[idx.min(7)]
}
