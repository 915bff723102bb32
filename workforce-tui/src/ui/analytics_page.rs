//! Page 1: HR Analytics. Tab strip, KPIs, breakdown bars, trend, matrix.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Sparkline};
use ratatui::Frame;

use workforce_core::payload::{ChartData, Kpis, MatrixRow};
use workforce_runner::pages::hr_analytics::AnalyticsView;
use workforce_runner::DashboardPage;

use crate::app::AppState;
use crate::theme::Palette;
use crate::ui::scroll_start;
use crate::ui::widgets::{bar, pct, placeholder, signed, truncate};

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let p = &app.palette;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Min(4),
        ])
        .split(area);

    f.render_widget(Paragraph::new(tab_strip(app)), chunks[0]);

    let Some(view) = app.analytics.view().data() else {
        let text = app
            .analytics
            .notice()
            .unwrap_or("Select a Company (c) to load the dashboard.");
        f.render_widget(Paragraph::new(placeholder(p, text)), chunks[1]);
        return;
    };

    f.render_widget(Paragraph::new(kpi_lines(p, &view.kpis)), chunks[1]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(chunks[2]);
    render_breakdowns(f, body[0], p, view);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(3)])
        .split(body[1]);
    render_trend(f, right[0], p, &view.trend);
    render_matrix(f, right[1], p, &view.matrix.rows, app.cursor());
}

fn tab_strip(app: &AppState) -> Vec<Line<'static>> {
    let p = &app.palette;
    let Some(tabs) = app.analytics.tabs().filter(|t| t.visible()) else {
        return vec![Line::from("")];
    };
    let mut spans: Vec<Span> = Vec::new();
    for (i, label) in tabs.labels().enumerate() {
        let active = tabs.active() == Some(i);
        let mut style = p.tab(active);
        if i == app.tab_cursor {
            style = style.add_modifier(ratatui::style::Modifier::UNDERLINED);
        }
        spans.push(Span::styled(format!(" {label} "), style));
        spans.push(Span::raw(" "));
    }
    vec![
        Line::from(spans),
        Line::from(Span::styled("  [ ] select tab, Enter activate", p.muted())),
    ]
}

fn kpi_lines(p: &Palette, k: &Kpis) -> Vec<Line<'static>> {
    vec![
        Line::from(vec![
            Span::styled("Employees ", p.muted()),
            Span::styled(k.total_employees.to_string(), p.kpi()),
            Span::styled("   Saudi ", p.muted()),
            Span::styled(k.saudi_employees.to_string(), p.kpi()),
            Span::styled("   Non-Saudi ", p.muted()),
            Span::styled(k.non_saudi_employees.to_string(), p.kpi()),
        ]),
        Line::from(vec![
            Span::styled("Saudization ", p.muted()),
            Span::styled(pct(k.saudization_percent), p.kpi()),
            Span::styled("   Target ", p.muted()),
            Span::styled(pct(k.target_percent), p.kpi()),
            Span::styled("   Variance ", p.muted()),
            Span::styled(signed(k.variance_percent), p.variance(k.variance_percent)),
        ]),
        Line::from(vec![
            Span::styled("Avg salary S/NS ", p.muted()),
            Span::styled(
                format!(
                    "{} / {}",
                    money(k.avg_salary_saudi),
                    money(k.avg_salary_non_saudi)
                ),
                p.text(),
            ),
            Span::styled("   Avg tenure S/NS ", p.muted()),
            Span::styled(
                format!(
                    "{} / {}",
                    years(k.avg_tenure_years_saudi),
                    years(k.avg_tenure_years_non_saudi)
                ),
                p.text(),
            ),
        ]),
    ]
}

fn money(v: Option<f64>) -> String {
    v.map_or_else(|| "-".to_string(), |v| format!("{v:.0}"))
}

fn years(v: Option<f64>) -> String {
    v.map_or_else(|| "-".to_string(), |v| format!("{v:.1}y"))
}

fn chart_lines(p: &Palette, title: &str, chart: &ChartData, color: usize) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(title.to_string(), p.accent_bold()))];
    let series = chart.first_series();
    if series.is_empty() {
        lines.push(placeholder(p, "  no data"));
        return lines;
    }
    let max = series.iter().map(|(_, v)| *v).fold(0.0, f64::max);
    for (label, value) in series {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<18} ", truncate(label, 18)), p.text()),
            Span::styled(
                format!("{:<12}", bar(value, max, 12)),
                ratatui::style::Style::default().fg(p.series(color)),
            ),
            Span::styled(format!(" {value:.1}"), p.muted()),
        ]));
    }
    lines
}

fn render_breakdowns(f: &mut Frame, area: Rect, p: &Palette, view: &AnalyticsView) {
    let mut lines = Vec::new();
    lines.extend(chart_lines(p, "By Department", &view.by_department, 0));
    lines.extend(chart_lines(p, "By Designation", &view.by_designation, 1));
    lines.extend(chart_lines(p, "By Salary Band", &view.by_salary_band, 2));

    lines.push(Line::from(Span::styled("Nationality Groups", p.accent_bold())));
    for group in &view.nationality {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {:<18} ", truncate(group.label.as_deref().unwrap_or("-"), 18)),
                p.text(),
            ),
            Span::styled(format!("{:.0}", group.value.unwrap_or(0.0)), p.kpi()),
        ]));
    }

    let avt = &view.actual_vs_target;
    lines.push(Line::from(vec![
        Span::styled("Actual vs Target variance ", p.accent_bold()),
        Span::styled(signed(avt.variance_percent), p.variance(avt.variance_percent)),
    ]));
    f.render_widget(Paragraph::new(lines), area);
}

fn render_trend(f: &mut Frame, area: Rect, p: &Palette, trend: &ChartData) {
    let series = trend.first_series();
    let title = match (series.first(), series.last()) {
        (Some((from, _)), Some((to, last))) => format!("Trend {from} .. {to}  latest {last:.1}%"),
        _ => "Trend  no data".to_string(),
    };
    // Sparkline wants integers; tenths keep one decimal of resolution.
    let data: Vec<u64> = series
        .iter()
        .map(|(_, v)| (v.max(0.0) * 10.0).round() as u64)
        .collect();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(title, p.accent_bold()))),
        chunks[0],
    );
    f.render_widget(
        Sparkline::default()
            .data(&data)
            .style(ratatui::style::Style::default().fg(p.series(0))),
        chunks[1],
    );
}

fn render_matrix(f: &mut Frame, area: Rect, p: &Palette, rows: &[MatrixRow], cursor: usize) {
    let mut lines = vec![Line::from(Span::styled(
        format!(
            "  {:<16} {:<18} {:>5} {:>7} {:>7} {:>6}",
            "Department", "Designation", "HC", "Actual", "Target", "Var"
        ),
        p.accent_bold(),
    ))];
    if rows.is_empty() {
        lines.push(placeholder(p, "  no rows above the headcount threshold"));
    }
    let height = area.height.saturating_sub(1) as usize;
    let start = scroll_start(cursor, height);
    for (i, row) in rows.iter().enumerate().skip(start).take(height) {
        let selected = i == cursor;
        let base = if selected { p.selected() } else { p.text() };
        lines.push(Line::from(vec![
            Span::styled(
                format!(
                    "{}{:<16} {:<18} {:>5} {:>7} {:>7} ",
                    if selected { "> " } else { "  " },
                    truncate(row.department.as_deref().unwrap_or("-"), 16),
                    truncate(row.designation.as_deref().unwrap_or("-"), 18),
                    row.headcount,
                    pct(row.saudization_percent),
                    pct(row.target_percent),
                ),
                base,
            ),
            Span::styled(
                format!("{:>6}", signed(row.variance_percent)),
                if selected { base } else { p.variance(row.variance_percent) },
            ),
        ]));
    }
    f.render_widget(Paragraph::new(lines), area);
}
