//! Page 3: company drilldown. Breadcrumb, snapshot, then the breakdown
//! sections as one selectable list.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use workforce_core::payload::Snapshot;
use workforce_runner::DashboardPage;

use crate::app::{AppState, CompanySection};
use crate::theme::Palette;
use crate::ui::scroll_start;
use crate::ui::widgets::{breakdown_header, breakdown_line, pct, placeholder, signed};

const NAME_WIDTH: usize = 28;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let p = &app.palette;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Min(3),
        ])
        .split(area);

    f.render_widget(Paragraph::new(breadcrumb(app)), chunks[0]);

    let Some(view) = app.company.view().data() else {
        let text = app
            .company
            .notice()
            .unwrap_or("Select a Company (c) to drill down.");
        f.render_widget(Paragraph::new(placeholder(p, text)), chunks[1]);
        return;
    };

    f.render_widget(
        Paragraph::new(snapshot_lines(p, &view.drilldown.overall())),
        chunks[1],
    );

    let lines = section_lines(app, chunks[2].height as usize);
    f.render_widget(Paragraph::new(lines), chunks[2]);
}

fn breadcrumb(app: &AppState) -> Line<'static> {
    let p = &app.palette;
    let crumbs = app.company.breadcrumb();
    let mut spans = Vec::new();
    for (i, crumb) in crumbs.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" > ", p.muted()));
        }
        let style = if i + 1 == crumbs.len() {
            p.accent_bold()
        } else {
            p.text()
        };
        spans.push(Span::styled(crumb.display(), style));
    }
    if crumbs.len() > 1 {
        spans.push(Span::styled("   [h] up", p.muted()));
    }
    Line::from(spans)
}

pub(crate) fn snapshot_lines(p: &Palette, s: &Snapshot) -> Vec<Line<'static>> {
    let mut first = vec![
        Span::styled("Employees ", p.muted()),
        Span::styled(s.total_employees.to_string(), p.kpi()),
        Span::styled("   Saudi ", p.muted()),
        Span::styled(s.saudi_employees.to_string(), p.kpi()),
        Span::styled("   Non-Saudi ", p.muted()),
        Span::styled(s.non_saudi_employees.to_string(), p.kpi()),
    ];
    if s.mom_change.is_some() {
        first.push(Span::styled("   MoM ", p.muted()));
        first.push(Span::styled(signed(s.mom_change), p.variance(s.mom_change)));
    }
    vec![
        Line::from(first),
        Line::from(vec![
            Span::styled("Saudization ", p.muted()),
            Span::styled(pct(s.saudization_percent), p.kpi()),
            Span::styled("   Target ", p.muted()),
            Span::styled(pct(s.target_percent), p.kpi()),
            Span::styled("   Variance ", p.muted()),
            Span::styled(signed(s.variance_percent), p.variance(s.variance_percent)),
            Span::styled("   ", p.muted()),
            Span::styled(s.status().label(), p.rag(s.status())),
        ]),
    ]
}

/// Section titles interleaved with their rows, scrolled to the cursor.
fn section_lines(app: &AppState, height: usize) -> Vec<Line<'static>> {
    let p = &app.palette;
    let items = app.company_items();
    let cursor = app.cursor();

    let mut lines: Vec<(Option<usize>, Line<'static>)> = Vec::new();
    let mut current: Option<CompanySection> = None;
    for (i, (section, row)) in items.iter().enumerate() {
        if current != Some(*section) {
            current = Some(*section);
            lines.push((None, breakdown_header(p, section.title(), NAME_WIDTH)));
        }
        lines.push((Some(i), breakdown_line(p, row, NAME_WIDTH, i == cursor)));
    }
    if let Some(notice) = app.company.designations().notice() {
        lines.push((None, placeholder(p, notice)));
    }
    if lines.is_empty() {
        return vec![placeholder(p, "No breakdown rows for the selected scope.")];
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
