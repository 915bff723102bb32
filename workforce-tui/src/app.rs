//! Application state. Single owner, main thread only.
//!
//! All pages live here. They plan batches that the worker runs; the main
//! loop drains the responses and hands each one back to the page whose
//! view planned it.

use std::collections::VecDeque;
use std::sync::mpsc::Receiver;

use chrono::NaiveDateTime;
use tokio::sync::mpsc::UnboundedSender;

use workforce_core::payload::BreakdownRow;
use workforce_core::{
    FilterContext, FilterKey, FilterPatch, HostRouter, MemoryRouter, PageRoute, RouteTarget,
    Settings, ValidationError,
};
use workforce_runner::pages::{company, employees, holding, hr_analytics, scorecard, trends};
use workforce_runner::{
    Batch, BatchResponse, CompanyDrilldownPage, DashboardPage, DrillStep, EmployeeListPage,
    ExecutiveScorecardPage, HoldingComparisonPage, HrAnalyticsPage, SaudizationTrendsPage,
    TabOutcome,
};

use crate::theme::Palette;
use crate::worker::{WorkerCommand, WorkerResponse};

pub const ERROR_HISTORY_CAP: usize = 50;

/// Position of a page in the number-key order.
pub fn page_index(page: PageRoute) -> usize {
    PageRoute::ALL
        .iter()
        .position(|p| *p == page)
        .unwrap_or(0)
}

pub fn next_page(page: PageRoute) -> PageRoute {
    PageRoute::ALL[(page_index(page) + 1) % PageRoute::ALL.len()]
}

pub fn prev_page(page: PageRoute) -> PageRoute {
    let n = PageRoute::ALL.len();
    PageRoute::ALL[(page_index(page) + n - 1) % n]
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// Error category for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Fetch,
    Export,
    Drill,
    Worker,
}

impl ErrorCategory {
    pub fn label(self) -> &'static str {
        match self {
            ErrorCategory::Fetch => "FETCH",
            ErrorCategory::Export => "EXPORT",
            ErrorCategory::Drill => "DRILL",
            ErrorCategory::Worker => "WORKER",
        }
    }
}

/// An error record for the error history overlay.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub timestamp: NaiveDateTime,
    pub category: ErrorCategory,
    pub message: String,
    pub context: String,
}

/// Which overlay (if any) is shown on top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    None,
    Welcome,
    Help,
    /// Indicator definitions and setup notes.
    Guide,
    ErrorHistory,
    /// Free-text entry for one filter of the active page.
    Input(FilterKey),
}

/// Selectable sections of the company drilldown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompanySection {
    Branches,
    Departments,
    Designations,
    RiskyPositions,
}

impl CompanySection {
    pub fn title(self) -> &'static str {
        match self {
            CompanySection::Branches => "Branches",
            CompanySection::Departments => "Departments",
            CompanySection::Designations => "Designations",
            CompanySection::RiskyPositions => "Top Risky Positions",
        }
    }
}

/// Selectable sections of the executive scorecard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScorecardSection {
    Subsidiaries,
    RiskyPositions,
}

/// Top-level application state.
pub struct AppState {
    pub active: PageRoute,
    pub running: bool,

    pub analytics: HrAnalyticsPage,
    pub holding: HoldingComparisonPage,
    pub company: CompanyDrilldownPage,
    pub employees: EmployeeListPage,
    pub scorecard: ExecutiveScorecardPage,
    pub trends: SaudizationTrendsPage,
    pub router: MemoryRouter,

    /// Row cursor per page, in number-key order.
    pub cursors: [usize; PageRoute::ALL.len()],
    pub tab_cursor: usize,
    pub in_flight: usize,
    pub palette: Palette,

    pub worker_tx: UnboundedSender<WorkerCommand>,
    pub worker_rx: Receiver<WorkerResponse>,

    pub status_message: Option<(String, StatusLevel)>,
    pub error_history: VecDeque<ErrorRecord>,
    pub error_scroll: usize,
    pub overlay: Overlay,
    pub input: String,
}

impl AppState {
    pub fn new(
        settings: &Settings,
        initial: FilterContext,
        worker_tx: UnboundedSender<WorkerCommand>,
        worker_rx: Receiver<WorkerResponse>,
    ) -> Self {
        let dashboard = &settings.dashboard;
        Self {
            active: PageRoute::HrAnalytics,
            running: true,
            analytics: HrAnalyticsPage::new(
                initial.clone(),
                dashboard,
                settings.fallback_navigation(),
            ),
            holding: HoldingComparisonPage::new(initial.clone()),
            company: CompanyDrilldownPage::new(initial.clone(), dashboard),
            employees: EmployeeListPage::new(initial.clone(), dashboard),
            scorecard: ExecutiveScorecardPage::new(initial.clone(), dashboard),
            trends: SaudizationTrendsPage::new(initial, dashboard),
            router: MemoryRouter::at(RouteTarget::Page(PageRoute::HrAnalytics)),
            cursors: [0; PageRoute::ALL.len()],
            tab_cursor: 0,
            in_flight: 0,
            palette: Palette::default(),
            worker_tx,
            worker_rx,
            status_message: None,
            error_history: VecDeque::with_capacity(ERROR_HISTORY_CAP),
            error_scroll: 0,
            overlay: Overlay::None,
            input: String::new(),
        }
    }

    pub fn page(&self, route: PageRoute) -> &dyn DashboardPage {
        match route {
            PageRoute::HrAnalytics => &self.analytics,
            PageRoute::HoldingComparison => &self.holding,
            PageRoute::CompanyDrilldown => &self.company,
            PageRoute::EmployeeDrilldown => &self.employees,
            PageRoute::ExecutiveScorecard => &self.scorecard,
            PageRoute::SaudizationTrends => &self.trends,
        }
    }

    pub fn page_mut(&mut self, route: PageRoute) -> &mut dyn DashboardPage {
        match route {
            PageRoute::HrAnalytics => &mut self.analytics,
            PageRoute::HoldingComparison => &mut self.holding,
            PageRoute::CompanyDrilldown => &mut self.company,
            PageRoute::EmployeeDrilldown => &mut self.employees,
            PageRoute::ExecutiveScorecard => &mut self.scorecard,
            PageRoute::SaudizationTrends => &mut self.trends,
        }
    }

    /// Live filters of the active page.
    pub fn filters(&self) -> FilterContext {
        self.page(self.active).filters().get()
    }

    pub fn cursor(&self) -> usize {
        self.cursors[page_index(self.active)]
    }

    pub fn set_cursor(&mut self, row: usize) {
        self.cursors[page_index(self.active)] = row;
    }

    /// Whether a page has rendered data yet.
    pub fn loaded(&self, route: PageRoute) -> bool {
        match route {
            PageRoute::HrAnalytics => self.analytics.view().data().is_some(),
            PageRoute::HoldingComparison => self.holding.view().data().is_some(),
            PageRoute::CompanyDrilldown => self.company.view().data().is_some(),
            PageRoute::EmployeeDrilldown => self.employees.view().data().is_some(),
            PageRoute::ExecutiveScorecard => self.scorecard.view().data().is_some(),
            PageRoute::SaudizationTrends => self.trends.view().data().is_some(),
        }
    }

    /// Ask for session config, then load the active page.
    pub fn start(&mut self) {
        if self.analytics.session().needs_navigation() {
            self.send(WorkerCommand::Navigation);
        }
        if self.analytics.session().needs_theme() {
            self.send(WorkerCommand::Theme);
        }
        self.refresh(self.active);
    }

    // ─── Worker traffic ──────────────────────────────────────────────

    fn send(&mut self, cmd: WorkerCommand) -> bool {
        if self.worker_tx.send(cmd).is_err() {
            self.push_error(
                ErrorCategory::Worker,
                "Worker stopped; restart the dashboard".into(),
                String::new(),
            );
            return false;
        }
        true
    }

    pub fn dispatch(&mut self, batch: Batch) {
        tracing::debug!(view = batch.view(), epoch = %batch.epoch(), queries = batch.specs().len(), "dispatch");
        if self.send(WorkerCommand::Run(batch)) {
            self.in_flight += 1;
        }
    }

    /// Plan and dispatch a refresh of `route`. A missing filter becomes a
    /// prompt in the status bar.
    pub fn refresh(&mut self, route: PageRoute) {
        match self.page_mut(route).begin_refresh() {
            Ok(batch) => self.dispatch(batch),
            Err(err) => self.prompt(err),
        }
    }

    fn prompt(&mut self, err: ValidationError) {
        self.set_warning(err.to_string());
    }

    pub fn handle_response(&mut self, resp: WorkerResponse) {
        match resp {
            WorkerResponse::Settled(response) => self.settle(response),
            WorkerResponse::Exported(Ok(receipt)) => {
                match self.employees.finish_export(receipt, &mut self.router) {
                    Ok(url) => self.set_status(format!("Exported {url}")),
                    Err(err) => {
                        self.push_error(ErrorCategory::Export, err.to_string(), "employee export".into())
                    }
                }
            }
            WorkerResponse::Exported(Err(err)) => {
                self.push_error(ErrorCategory::Export, err.to_string(), "employee export".into());
            }
            WorkerResponse::Navigation(result) => {
                self.analytics.store_navigation(result);
                if let Some(tabs) = self.analytics.tabs() {
                    self.tab_cursor = tabs.active().unwrap_or(0);
                }
                let rejected = self
                    .analytics
                    .session()
                    .loaded_navigation()
                    .map_or(0, |n| n.rejected.len());
                if rejected > 0 {
                    self.set_warning(format!("{rejected} navigation tab(s) ignored"));
                }
            }
            WorkerResponse::Theme(result) => {
                self.analytics.store_theme(result);
                if let Some(tokens) = self.analytics.theme() {
                    self.palette = Palette::from_tokens(tokens);
                }
            }
            WorkerResponse::Failed { message } => {
                self.push_error(ErrorCategory::Worker, message, "startup".into());
            }
        }
    }

    fn settle(&mut self, response: BatchResponse) {
        self.in_flight = self.in_flight.saturating_sub(1);
        let Some(route) = owner(response.view) else {
            tracing::warn!(view = response.view, "response for unknown view");
            return;
        };
        let failure = response.result.as_ref().err().map(ToString::to_string);
        let view = response.view;
        let applied = self.page_mut(route).apply(response);
        if let Some(next) = applied.follow_up {
            self.dispatch(next);
        }
        if let Some(message) = failure {
            if let Some(notice) = self.page(route).notice().map(str::to_string) {
                self.push_error(ErrorCategory::Fetch, message, view.to_string());
                self.set_warning(notice);
            }
        } else if applied.changed && route == self.active {
            self.status_message = None;
            self.clamp_cursor();
        }
    }

    // ─── Navigation ──────────────────────────────────────────────────

    /// Show `route` and load it if it never rendered.
    pub fn switch_to(&mut self, route: PageRoute) {
        if route == self.active {
            return;
        }
        self.active = route;
        self.router.set_route(RouteTarget::Page(route), None);
        if !self.loaded(route) {
            self.refresh(route);
        }
    }

    /// Follow the host router after an action moved it.
    ///
    /// The destination consumes the route options once and refreshes.
    pub fn follow_router(&mut self) {
        let Some(target) = self.router.current_route().cloned() else {
            return;
        };
        match target.page() {
            Some(route) => {
                self.active = route;
                self.set_cursor(0);
                let arrived = self.arrive(route);
                tracing::info!(page = route.slug(), arrived, "page handoff");
                self.refresh(route);
            }
            None => self.set_status(format!("Opened {target}")),
        }
    }

    fn arrive(&mut self, route: PageRoute) -> bool {
        let router = &mut self.router;
        match route {
            PageRoute::HrAnalytics => self.analytics.arrive(router),
            PageRoute::HoldingComparison => self.holding.arrive(router),
            PageRoute::CompanyDrilldown => self.company.arrive(router),
            PageRoute::EmployeeDrilldown => self.employees.arrive(router),
            PageRoute::ExecutiveScorecard => self.scorecard.arrive(router),
            PageRoute::SaudizationTrends => self.trends.arrive(router),
        }
    }

    pub fn back(&mut self) {
        let Some(page) = self.router.back().and_then(RouteTarget::page) else {
            return;
        };
        self.active = page;
        if !self.loaded(page) {
            self.refresh(page);
        }
    }

    fn drill_step(&mut self, step: Result<DrillStep, workforce_core::DrillError>) {
        let step = match step {
            Ok(step) => step,
            Err(err) => {
                self.push_error(ErrorCategory::Drill, err.to_string(), self.active.slug().into());
                return;
            }
        };
        if let DrillStep::Navigated(_) = step {
            self.follow_router();
            return;
        }
        match self.company.plan(&step) {
            Ok(Some(batch)) => self.dispatch(batch),
            Ok(None) => {}
            Err(err) => self.prompt(err),
        }
        self.clamp_cursor();
    }

    fn jumped(&mut self, result: Result<Option<PageRoute>, workforce_core::DrillError>) {
        match result {
            Ok(Some(_)) => self.follow_router(),
            Ok(None) => {}
            Err(err) => {
                self.push_error(ErrorCategory::Drill, err.to_string(), self.active.slug().into())
            }
        }
    }

    // ─── Page actions ────────────────────────────────────────────────

    pub fn move_tab(&mut self, forward: bool) {
        let Some(count) = self.analytics.tabs().map(|t| t.labels().count()) else {
            return;
        };
        if count == 0 {
            return;
        }
        self.tab_cursor = if forward {
            (self.tab_cursor + 1) % count
        } else {
            (self.tab_cursor + count - 1) % count
        };
    }

    pub fn activate_tab(&mut self) {
        let outcome = self.analytics.activate_tab(self.tab_cursor, &mut self.router);
        tracing::debug!(index = self.tab_cursor, ?outcome, "tab activated");
        match outcome {
            TabOutcome::Refresh => self.refresh(PageRoute::HrAnalytics),
            TabOutcome::Navigated(_) => self.follow_router(),
            TabOutcome::OpenedWindow(url) => self.set_status(format!("Opened {url}")),
            TabOutcome::Notice(msg) => self.set_warning(msg),
            TabOutcome::Ignored => {}
        }
    }

    /// Enter on the row under the cursor.
    pub fn select(&mut self) {
        let row = self.cursor();
        match self.active {
            PageRoute::HrAnalytics => self.activate_tab(),
            PageRoute::HoldingComparison => {
                let result = self.holding.open_row(row, &mut self.router);
                self.jumped(result);
            }
            PageRoute::CompanyDrilldown => {
                let Some((section, name)) = self
                    .company_items()
                    .get(row)
                    .map(|(s, r)| (*s, r.name().to_string()))
                else {
                    return;
                };
                let step = match section {
                    CompanySection::Branches => self.company.select_branch(Some(&name)),
                    CompanySection::Departments => self.company.select_department(&name),
                    CompanySection::Designations => {
                        self.company.select_designation(&name, &mut self.router)
                    }
                    CompanySection::RiskyPositions => {
                        self.company.select_risky(&name, &mut self.router)
                    }
                };
                self.drill_step(step);
            }
            PageRoute::EmployeeDrilldown | PageRoute::SaudizationTrends => {}
            PageRoute::ExecutiveScorecard => {
                let Some((section, index, name)) = self
                    .scorecard_items()
                    .get(row)
                    .map(|(s, i, r)| (*s, *i, r.name().to_string()))
                else {
                    return;
                };
                let result = match section {
                    ScorecardSection::Subsidiaries => {
                        self.scorecard.open_company(index, &mut self.router)
                    }
                    ScorecardSection::RiskyPositions => {
                        self.scorecard.open_risky(&name, &mut self.router)
                    }
                };
                self.jumped(result);
            }
        }
    }

    /// Step up one drill level on the company page, or go back a route.
    pub fn up(&mut self) {
        if self.active == PageRoute::CompanyDrilldown && self.company.breadcrumb().len() > 1 {
            let step = self.company.up();
            self.drill_step(Ok(step));
        } else {
            self.back();
        }
    }

    pub fn next_page_of_employees(&mut self) {
        if let Some(planned) = self.employees.next_page() {
            match planned {
                Ok(batch) => self.dispatch(batch),
                Err(err) => self.prompt(err),
            }
        }
    }

    pub fn prev_page_of_employees(&mut self) {
        if let Some(planned) = self.employees.prev_page() {
            match planned {
                Ok(batch) => self.dispatch(batch),
                Err(err) => self.prompt(err),
            }
        }
    }

    pub fn cycle_employee_type(&mut self) {
        let selected = self.employees.cycle_employee_type();
        self.set_status(format!("Employee type: {}", selected.label()));
        self.refresh(PageRoute::EmployeeDrilldown);
    }

    /// Widen or narrow the trend window by `delta` months and reload.
    pub fn shift_trend_months(&mut self, delta: i32) {
        let months = self.trends.months_back().saturating_add_signed(delta);
        self.trends.set_months_back(months);
        self.set_status(format!("Months back: {}", self.trends.months_back()));
        self.refresh(PageRoute::SaudizationTrends);
    }

    pub fn export(&mut self) {
        match self.employees.export_args() {
            Ok(args) => {
                if self.send(WorkerCommand::Export(args)) {
                    self.set_status("Exporting employees...");
                }
            }
            Err(err) => self.prompt(err),
        }
    }

    /// Open the input overlay for `key`, prefilled with its current value.
    pub fn begin_input(&mut self, key: FilterKey) {
        self.input = self.filters().value(key).unwrap_or_default();
        self.overlay = Overlay::Input(key);
    }

    /// Apply the input overlay to the active page and refresh it.
    pub fn commit_input(&mut self, key: FilterKey) {
        let value = std::mem::take(&mut self.input);
        self.overlay = Overlay::None;
        if key == FilterKey::SearchText && self.active == PageRoute::EmployeeDrilldown {
            self.employees.set_search(&value);
        } else {
            let route = self.active;
            self.page_mut(route)
                .update_filters(FilterPatch::new().set(key, value));
        }
        self.set_cursor(0);
        self.refresh(self.active);
    }

    // ─── Row models ──────────────────────────────────────────────────

    /// Rows of the company page in display order.
    pub fn company_items(&self) -> Vec<(CompanySection, &BreakdownRow)> {
        let mut items = Vec::new();
        if let Some(view) = self.company.view().data() {
            items.extend(view.drilldown.branches.iter().map(|r| (CompanySection::Branches, r)));
            items.extend(
                view.drilldown
                    .departments
                    .iter()
                    .map(|r| (CompanySection::Departments, r)),
            );
        }
        if let Some(breakdown) = self.company.designations().data() {
            items.extend(
                breakdown
                    .designations
                    .iter()
                    .map(|r| (CompanySection::Designations, r)),
            );
        }
        if let Some(view) = self.company.view().data() {
            items.extend(view.risky.items.iter().map(|r| (CompanySection::RiskyPositions, r)));
        }
        items
    }

    /// Rows of the scorecard with their index inside their section.
    pub fn scorecard_items(&self) -> Vec<(ScorecardSection, usize, &BreakdownRow)> {
        let mut items = Vec::new();
        if let Some(card) = self.scorecard.view().data() {
            items.extend(
                card.holding
                    .rows
                    .iter()
                    .enumerate()
                    .map(|(i, r)| (ScorecardSection::Subsidiaries, i, r)),
            );
        }
        if let Some(risky) = self.scorecard.risky().data() {
            items.extend(
                risky
                    .items
                    .iter()
                    .enumerate()
                    .map(|(i, r)| (ScorecardSection::RiskyPositions, i, r)),
            );
        }
        items
    }

    /// Number of selectable rows on the active page.
    pub fn row_count(&self) -> usize {
        match self.active {
            PageRoute::HrAnalytics => self
                .analytics
                .view()
                .data()
                .map_or(0, |v| v.matrix.rows.len()),
            PageRoute::HoldingComparison => self.holding.view().data().map_or(0, |v| v.rows.len()),
            PageRoute::CompanyDrilldown => self.company_items().len(),
            PageRoute::EmployeeDrilldown => self.employees.view().data().map_or(0, |v| v.rows.len()),
            PageRoute::ExecutiveScorecard => self.scorecard_items().len(),
            PageRoute::SaudizationTrends => self
                .trends
                .view()
                .data()
                .map_or(0, |v| v.branch_level.datasets.len()),
        }
    }

    pub fn cursor_down(&mut self) {
        let row = self.cursor();
        if row + 1 < self.row_count() {
            self.set_cursor(row + 1);
        }
    }

    pub fn cursor_up(&mut self) {
        let row = self.cursor();
        self.set_cursor(row.saturating_sub(1));
    }

    fn clamp_cursor(&mut self) {
        let max = self.row_count().saturating_sub(1);
        if self.cursor() > max {
            self.set_cursor(max);
        }
    }

    // ─── Status ──────────────────────────────────────────────────────

    /// Push an error to the history, capping at 50.
    pub fn push_error(&mut self, category: ErrorCategory, message: String, context: String) {
        tracing::warn!(category = category.label(), %message, %context, "ui error");
        let record = ErrorRecord {
            timestamp: chrono::Local::now().naive_local(),
            category,
            message: message.clone(),
            context,
        };
        self.error_history.push_front(record);
        if self.error_history.len() > ERROR_HISTORY_CAP {
            self.error_history.pop_back();
        }
        self.status_message = Some((message, StatusLevel::Error));
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }
}

/// Page that owns a view label.
pub fn owner(view: &str) -> Option<PageRoute> {
    match view {
        hr_analytics::VIEW => Some(PageRoute::HrAnalytics),
        holding::VIEW => Some(PageRoute::HoldingComparison),
        company::VIEW | company::DESIGNATIONS_VIEW => Some(PageRoute::CompanyDrilldown),
        employees::VIEW => Some(PageRoute::EmployeeDrilldown),
        scorecard::VIEW | scorecard::RISKY_VIEW => Some(PageRoute::ExecutiveScorecard),
        trends::VIEW => Some(PageRoute::SaudizationTrends),
        _ => None,
    }
}
