//! Top-level UI layout: page bar, active page, status bar.

pub mod analytics_page;
pub mod company_page;
pub mod employees_page;
pub mod holding_page;
pub mod overlays;
pub mod scorecard_page;
pub mod status_bar;
pub mod trends_page;
pub mod widgets;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use workforce_core::{FilterKey, PageRoute};

use crate::app::{page_index, AppState, Overlay};

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_header(f, chunks[0], app);
    draw_page(f, chunks[1], app);
    status_bar::render(f, chunks[2], app);

    let main_area = chunks[1];
    match &app.overlay {
        Overlay::Welcome => overlays::render_welcome(f, main_area, app),
        Overlay::Help => overlays::render_help(f, main_area, app),
        Overlay::Guide => overlays::render_guide(f, main_area, app),
        Overlay::ErrorHistory => overlays::render_error_history(f, main_area, app),
        Overlay::Input(key) => overlays::render_input(f, main_area, app, *key),
        Overlay::None => {}
    }
}

/// Page bar plus the scope the active page is filtered to.
fn draw_header(f: &mut Frame, area: Rect, app: &AppState) {
    let p = &app.palette;
    let mut pages: Vec<Span> = Vec::new();
    for route in PageRoute::ALL {
        let active = route == app.active;
        pages.push(Span::styled(
            format!(" {} {} ", page_index(route) + 1, route.title()),
            p.tab(active),
        ));
        pages.push(Span::raw(" "));
    }

    let ctx = app.filters();
    let mut scope: Vec<Span> = vec![Span::styled(" Scope: ", p.muted())];
    let shown = [
        FilterKey::HoldingCompany,
        FilterKey::Company,
        FilterKey::Branch,
        FilterKey::Department,
        FilterKey::Designation,
        FilterKey::NationalityGroup,
        FilterKey::AsOnDate,
    ];
    let pairs = ctx.pairs(&shown);
    for (i, (key, value)) in pairs.iter().enumerate() {
        if i > 0 {
            scope.push(Span::styled("  ", p.muted()));
        }
        scope.push(Span::styled(format!("{}: ", key.label()), p.muted()));
        scope.push(Span::styled(value.clone(), p.text()));
    }

    let para = Paragraph::new(vec![Line::from(pages), Line::from(scope)]);
    f.render_widget(para, area);
}

fn draw_page(f: &mut Frame, area: Rect, app: &AppState) {
    let p = &app.palette;
    let title = if app.in_flight > 0 {
        format!(" {} [loading] ", app.active.title())
    } else {
        format!(" {} ", app.active.title())
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(p.panel_border(true))
        .title(title)
        .title_style(p.panel_title(true));

    let inner = block.inner(area);
    f.render_widget(block, area);

    match app.active {
        PageRoute::HrAnalytics => analytics_page::render(f, inner, app),
        PageRoute::HoldingComparison => holding_page::render(f, inner, app),
        PageRoute::CompanyDrilldown => company_page::render(f, inner, app),
        PageRoute::EmployeeDrilldown => employees_page::render(f, inner, app),
        PageRoute::ExecutiveScorecard => scorecard_page::render(f, inner, app),
        PageRoute::SaudizationTrends => trends_page::render(f, inner, app),
    }
}

/// First row to draw so that `cursor` stays inside a window of `height`.
pub fn scroll_start(cursor: usize, height: usize) -> usize {
    if height == 0 {
        0
    } else {
        cursor.saturating_sub(height - 1)
    }
}

/// Compute a centered rect for overlays.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
