//! Page 4: paged employee list.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use workforce_core::payload::EmployeeRow;
use workforce_runner::DashboardPage;

use crate::app::AppState;
use crate::theme::Palette;
use crate::ui::scroll_start;
use crate::ui::widgets::{placeholder, truncate};

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let p = &app.palette;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    let ctx = app.employees.filters().get();
    let criteria = Line::from(vec![
        Span::styled("Search: ", p.muted()),
        Span::styled(ctx.search_text.unwrap_or_else(|| "-".into()), p.text()),
        Span::styled("   Type: ", p.muted()),
        Span::styled(ctx.employee_type.label(), p.text()),
    ]);
    f.render_widget(Paragraph::new(criteria), chunks[0]);

    let table = match (app.employees.placeholder(), app.employees.view().data()) {
        (Some(text), _) => vec![placeholder(p, text)],
        (None, Some(page)) => table_lines(p, &page.rows, app.cursor(), chunks[1].height as usize),
        (None, None) => vec![placeholder(
            p,
            app.employees.notice().unwrap_or("Loading employees..."),
        )],
    };
    f.render_widget(Paragraph::new(table), chunks[1]);

    f.render_widget(Paragraph::new(pager(app)), chunks[2]);
}

fn table_lines(p: &Palette, rows: &[EmployeeRow], cursor: usize, height: usize) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        format!(
            "  {:<10} {:<22} {:<12} {:<16} {:<18} {:<9} {:<12} {:<10}",
            "Employee", "Name", "Branch", "Department", "Designation", "Type", "Nationality", "Joined"
        ),
        p.accent_bold(),
    ))];
    let height = height.saturating_sub(1);
    for (i, row) in rows
        .iter()
        .enumerate()
        .skip(scroll_start(cursor, height))
        .take(height)
    {
        let selected = i == cursor;
        let style = if selected { p.selected() } else { p.text() };
        let cell = |v: &Option<String>, w: usize| truncate(v.as_deref().unwrap_or("-"), w);
        lines.push(Line::from(Span::styled(
            format!(
                "{}{:<10} {:<22} {:<12} {:<16} {:<18} {:<9} {:<12} {:<10}",
                if selected { "> " } else { "  " },
                truncate(&row.employee, 10),
                cell(&row.employee_name, 22),
                cell(&row.branch, 12),
                cell(&row.department, 16),
                cell(&row.designation, 18),
                row.type_label(),
                cell(&row.nationality, 12),
                cell(&row.date_of_joining, 10),
            ),
            style,
        )));
    }
    lines
}

/// Paging summary with Prev and Next greyed out when disabled.
fn pager(app: &AppState) -> Line<'static> {
    let p = &app.palette;
    let paging = app.employees.paging();
    let button = |label: &'static str, disabled: bool| {
        Span::styled(label, if disabled { p.muted() } else { p.accent_bold() })
    };
    Line::from(vec![
        Span::styled(paging.summary(), p.text()),
        Span::raw("   "),
        button("[p] Prev", paging.prev_disabled()),
        Span::raw(" "),
        button("[n] Next", paging.next_disabled()),
    ])
}
