//! Bottom status bar: key hints for the active page, last status message.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use workforce_core::PageRoute;

use crate::app::{AppState, StatusLevel};

fn page_hints(page: PageRoute) -> &'static str {
    match page {
        PageRoute::HrAnalytics => " [/]tab",
        PageRoute::HoldingComparison => " H:holding",
        PageRoute::CompanyDrilldown => " h:up",
        PageRoute::EmployeeDrilldown => " n/p:page /:search t:type x:export",
        PageRoute::ExecutiveScorecard => " H:holding",
        PageRoute::SaudizationTrends => " +/-:months b:branch H:holding",
    }
}

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let p = &app.palette;
    let mut spans: Vec<Span> = Vec::new();

    spans.push(Span::styled(
        " 1-6:pages j/k:move Enter:open c:company d:date r:refresh ?:help q:quit",
        p.muted(),
    ));
    spans.push(Span::styled(page_hints(app.active), p.accent()));

    spans.push(Span::raw(" | "));

    if let Some((msg, level)) = &app.status_message {
        let style = match level {
            StatusLevel::Info => p.accent(),
            StatusLevel::Warning => p.warning(),
            StatusLevel::Error => p.negative(),
        };
        spans.push(Span::styled(msg.as_str(), style));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
