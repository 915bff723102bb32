//! Keyboard input dispatch: overlays, then global keys, then page keys.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use workforce_core::{FilterKey, PageRoute};

use crate::app::{next_page, prev_page, AppState, Overlay};

pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // 1. Overlays consume input first.
    match app.overlay.clone() {
        Overlay::Welcome | Overlay::Help | Overlay::Guide => {
            app.overlay = Overlay::None;
            return;
        }
        Overlay::ErrorHistory => {
            handle_error_overlay(app, key);
            return;
        }
        Overlay::Input(filter) => {
            handle_input_overlay(app, key, filter);
            return;
        }
        Overlay::None => {}
    }

    // 2. Global keys.
    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char(c @ '1'..='6') => {
            let index = c as usize - '1' as usize;
            app.switch_to(PageRoute::ALL[index]);
            return;
        }
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.switch_to(prev_page(app.active));
            } else {
                app.switch_to(next_page(app.active));
            }
            return;
        }
        KeyCode::BackTab => {
            app.switch_to(prev_page(app.active));
            return;
        }
        KeyCode::Char('?') => {
            app.overlay = Overlay::Help;
            return;
        }
        KeyCode::Char('g') => {
            app.overlay = Overlay::Guide;
            return;
        }
        KeyCode::Char('e') => {
            app.error_scroll = 0;
            app.overlay = Overlay::ErrorHistory;
            return;
        }
        KeyCode::Char('r') => {
            app.refresh(app.active);
            return;
        }
        KeyCode::Char('c') => {
            app.begin_input(FilterKey::Company);
            return;
        }
        KeyCode::Char('H') => {
            app.begin_input(FilterKey::HoldingCompany);
            return;
        }
        KeyCode::Char('d') => {
            app.begin_input(FilterKey::AsOnDate);
            return;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.cursor_down();
            return;
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.cursor_up();
            return;
        }
        KeyCode::Enter | KeyCode::Char('l') => {
            app.select();
            return;
        }
        KeyCode::Backspace | KeyCode::Char('h') => {
            app.up();
            return;
        }
        _ => {}
    }

    // 3. Page-specific keys.
    match app.active {
        PageRoute::HrAnalytics => handle_analytics_key(app, key),
        PageRoute::EmployeeDrilldown => handle_employees_key(app, key),
        PageRoute::SaudizationTrends => handle_trends_key(app, key),
        PageRoute::HoldingComparison
        | PageRoute::CompanyDrilldown
        | PageRoute::ExecutiveScorecard => {}
    }
}

fn handle_error_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('e') => {
            app.overlay = Overlay::None;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if app.error_scroll + 1 < app.error_history.len() {
                app.error_scroll += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.error_scroll = app.error_scroll.saturating_sub(1);
        }
        _ => {}
    }
}

fn handle_input_overlay(app: &mut AppState, key: KeyEvent, filter: FilterKey) {
    match key.code {
        KeyCode::Esc => {
            app.overlay = Overlay::None;
            app.input.clear();
        }
        KeyCode::Enter => app.commit_input(filter),
        KeyCode::Backspace => {
            app.input.pop();
        }
        KeyCode::Char(c) => app.input.push(c),
        _ => {}
    }
}

fn handle_analytics_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char(']') => app.move_tab(true),
        KeyCode::Char('[') => app.move_tab(false),
        _ => {}
    }
}

fn handle_employees_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('n') | KeyCode::PageDown => app.next_page_of_employees(),
        KeyCode::Char('p') | KeyCode::PageUp => app.prev_page_of_employees(),
        KeyCode::Char('/') => app.begin_input(FilterKey::SearchText),
        KeyCode::Char('t') => app.cycle_employee_type(),
        KeyCode::Char('x') => app.export(),
        _ => {}
    }
}

fn handle_trends_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('+') | KeyCode::Char('=') => app.shift_trend_months(1),
        KeyCode::Char('-') => app.shift_trend_months(-1),
        KeyCode::Char('b') => app.begin_input(FilterKey::Branch),
        _ => {}
    }
}
