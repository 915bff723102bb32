//! Overlay widgets: welcome, help, guide, error history, filter input.

use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use workforce_core::{FilterKey, GUIDE};

use crate::app::AppState;
use crate::ui::centered_rect;

/// First-run welcome overlay.
pub fn render_welcome(f: &mut Frame, area: Rect, app: &AppState) {
    let p = &app.palette;
    let popup = centered_rect(60, 50, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(p.accent())
        .title(" Workforce Dashboard ")
        .title_style(p.accent_bold());

    let text = vec![
        Line::from(""),
        Line::from(Span::styled("Getting started:", p.accent_bold())),
        Line::from(""),
        Line::from(Span::styled("  1. Press c and type a company name", p.muted())),
        Line::from(Span::styled(
            "  2. Press H to pick a holding for pages 2 and 5",
            p.muted(),
        )),
        Line::from(Span::styled(
            "  3. Press 3, then Enter on a branch or department to drill down",
            p.muted(),
        )),
        Line::from(Span::styled(
            "  4. Enter on a designation opens its employees on page 4",
            p.muted(),
        )),
        Line::from(""),
        Line::from(Span::styled("Press any key to dismiss...", p.text())),
    ];

    let para = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
    f.render_widget(para, popup);
}

pub fn render_help(f: &mut Frame, area: Rect, app: &AppState) {
    let p = &app.palette;
    let popup = centered_rect(70, 80, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(p.accent())
        .title(" Keys [any key]close ")
        .title_style(p.accent_bold());

    let keys: &[(&str, &str)] = &[
        ("1-6, Tab", "switch page"),
        ("j/k", "move the selection"),
        ("Enter, l", "open the selected row"),
        ("h, Backspace", "drill up or go back"),
        ("c / H / d", "set company / holding / as-on date"),
        ("r", "reload the page"),
        ("[ ]", "choose a tab on HR Analytics"),
        ("n / p", "next / previous page of employees"),
        ("/", "search employees"),
        ("t", "cycle Saudi / Non-Saudi / All"),
        ("x", "export the employee list"),
        ("+ / -", "widen / narrow the trend window"),
        ("b", "set branch on Saudization Trends"),
        ("g", "indicator guide"),
        ("e", "error history"),
        ("q", "quit"),
    ];
    let mut lines = vec![Line::from("")];
    for (key, what) in keys {
        lines.push(Line::from(vec![
            Span::styled(format!("  {key:<14}"), p.accent_bold()),
            Span::styled(*what, p.text()),
        ]));
    }

    f.render_widget(Paragraph::new(lines).block(block), popup);
}

/// Indicator definitions, setup steps and common problems.
pub fn render_guide(f: &mut Frame, area: Rect, app: &AppState) {
    let p = &app.palette;
    let popup = centered_rect(80, 90, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(p.accent())
        .title(format!(" {} [any key]close ", GUIDE.title))
        .title_style(p.accent_bold());

    let lines: Vec<Line> = GUIDE
        .lines()
        .into_iter()
        .skip(1)
        .map(|line| {
            if line.starts_with(' ') || line.is_empty() {
                Line::from(Span::styled(line, p.text()))
            } else {
                Line::from(Span::styled(line, p.accent_bold()))
            }
        })
        .collect();

    let para = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    f.render_widget(para, popup);
}

/// Error history overlay.
pub fn render_error_history(f: &mut Frame, area: Rect, app: &AppState) {
    let p = &app.palette;
    let popup = centered_rect(80, 70, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(p.negative())
        .title(format!(
            " Error History ({}) [Esc]close [j/k]scroll ",
            app.error_history.len()
        ))
        .title_style(p.negative());

    let inner = block.inner(popup);
    f.render_widget(block, popup);

    if app.error_history.is_empty() {
        let text = Paragraph::new(Span::styled("No errors recorded.", p.muted()));
        f.render_widget(text, inner);
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    for (i, err) in app
        .error_history
        .iter()
        .enumerate()
        .skip(app.error_scroll)
        .take(inner.height as usize)
    {
        let style = if i == app.error_scroll {
            p.negative().add_modifier(Modifier::BOLD)
        } else {
            p.muted()
        };

        lines.push(Line::from(vec![
            Span::styled(format!("[{}] ", err.timestamp.format("%H:%M:%S")), p.muted()),
            Span::styled(format!("[{}] ", err.category.label()), p.warning()),
            Span::styled(err.message.as_str(), style),
        ]));

        if !err.context.is_empty() {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(err.context.as_str(), p.muted()),
            ]));
        }
    }

    f.render_widget(Paragraph::new(lines), inner);
}

/// Free-text entry for one filter.
pub fn render_input(f: &mut Frame, area: Rect, app: &AppState, key: FilterKey) {
    let p = &app.palette;
    let popup = centered_rect(50, 25, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(p.accent())
        .title(format!(" {} [Enter]apply [Esc]cancel ", key.label()))
        .title_style(p.accent_bold());

    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let hint = match key {
        FilterKey::AsOnDate => "Date as YYYY-MM-DD:",
        FilterKey::SearchText => "Name or employee number (empty clears):",
        _ => "Exact name (empty clears):",
    };
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(hint, p.muted())),
        Line::from(""),
        Line::from(vec![
            Span::styled("> ", p.accent()),
            Span::styled(app.input.as_str(), p.accent_bold()),
            Span::styled("_", p.accent()),
        ]),
    ];

    f.render_widget(Paragraph::new(text), inner);
}
