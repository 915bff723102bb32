//! Company-wide analytics page with the tab strip.

use workforce_core::payload::{ActualVsTarget, ChartData, Kpis, LabelValue, Matrix};
use workforce_core::settings::DashboardSettings;
use workforce_core::tabs::LoadedNavigation;
use workforce_core::{
    FetchError, FilterContext, FilterKey, FilterState, HostRouter, PageRoute, QueryName,
    QuerySpec, RouteTarget, ThemeTokens, ValidationError,
};

use super::{Applied, DashboardPage};
use crate::orchestrator::{Batch, BatchResponse, FetchOrchestrator, ViewState};
use crate::service::{NavigationService, ThemeService};
use crate::session::SessionCache;
use crate::tabs::{TabEngine, TabOutcome};

pub const VIEW: &str = "hr-analytics";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalyticsView {
    pub kpis: Kpis,
    pub nationality: Vec<LabelValue>,
    pub actual_vs_target: ActualVsTarget,
    pub by_designation: ChartData,
    pub by_department: ChartData,
    pub by_salary_band: ChartData,
    pub trend: ChartData,
    pub matrix: Matrix,
}

pub struct HrAnalyticsPage {
    filters: FilterState,
    fetch: FetchOrchestrator,
    view: ViewState<AnalyticsView>,
    session: SessionCache,
    tabs: Option<TabEngine>,
    min_headcount: u32,
    months_back: u32,
    home: RouteTarget,
}

impl HrAnalyticsPage {
    pub fn new(initial: FilterContext, settings: &DashboardSettings, fallback: LoadedNavigation) -> Self {
        Self {
            filters: FilterState::new(initial),
            fetch: FetchOrchestrator::new(VIEW),
            view: ViewState::default(),
            session: SessionCache::new(fallback),
            tabs: None,
            min_headcount: settings.min_headcount,
            months_back: settings.months_back,
            home: settings.home(),
        }
    }

    pub fn view(&self) -> &ViewState<AnalyticsView> {
        &self.view
    }

    pub fn tabs(&self) -> Option<&TabEngine> {
        self.tabs.as_ref()
    }

    pub fn theme(&self) -> Option<&ThemeTokens> {
        self.session.theme()
    }

    pub fn session(&self) -> &SessionCache {
        &self.session
    }

    pub fn store_navigation(&mut self, result: Result<serde_json::Value, FetchError>) {
        self.session.store_navigation(result);
        self.install_tabs();
    }

    pub fn store_theme(&mut self, result: Result<ThemeTokens, FetchError>) {
        self.session.store_theme(result);
    }

    /// Fetch navigation and theme if this session has not got them yet.
    pub async fn load_session<S>(&mut self, service: &S)
    where
        S: NavigationService + ThemeService + ?Sized,
    {
        self.session.ensure(service).await;
        self.install_tabs();
    }

    fn install_tabs(&mut self) {
        if self.tabs.is_some() {
            return;
        }
        if let Some(config) = self.session.navigation() {
            self.tabs = Some(TabEngine::new(
                config.clone(),
                PageRoute::HrAnalytics,
                self.home.clone(),
            ));
        }
    }

    pub fn activate_tab(&mut self, index: usize, router: &mut dyn HostRouter) -> TabOutcome {
        match self.tabs.as_mut() {
            Some(tabs) => tabs.activate(index, &mut self.filters, router),
            None => TabOutcome::Ignored,
        }
    }

    fn specs(&self) -> Vec<QuerySpec> {
        vec![
            QuerySpec::new(QueryName::Kpis),
            QuerySpec::new(QueryName::NationalityGroupBreakdown),
            QuerySpec::new(QueryName::ActualVsTargetOverall),
            QuerySpec::new(QueryName::SaudizationByDesignation)
                .param("min_headcount", self.min_headcount),
            QuerySpec::new(QueryName::SaudizationByDepartment),
            QuerySpec::new(QueryName::SaudizationBySalaryBand),
            QuerySpec::new(QueryName::SaudizationTrend).param("months_back", self.months_back),
            QuerySpec::new(QueryName::MatrixWithTargets).param("min_headcount", self.min_headcount),
        ]
    }
}

impl DashboardPage for HrAnalyticsPage {
    fn route(&self) -> PageRoute {
        PageRoute::HrAnalytics
    }

    fn filters(&self) -> &FilterState {
        &self.filters
    }

    fn filters_mut(&mut self) -> &mut FilterState {
        &mut self.filters
    }

    fn begin_refresh(&mut self) -> Result<Batch, ValidationError> {
        let specs = self.specs();
        self.fetch
            .begin(&self.filters.get(), &[FilterKey::Company], specs)
    }

    fn apply(&mut self, response: BatchResponse) -> Applied {
        let changed = self.fetch.apply(&mut self.view, response, |mut v| {
            Ok(AnalyticsView {
                kpis: v.take(QueryName::Kpis)?,
                nationality: v.take(QueryName::NationalityGroupBreakdown)?,
                actual_vs_target: v.take(QueryName::ActualVsTargetOverall)?,
                by_designation: v.take(QueryName::SaudizationByDesignation)?,
                by_department: v.take(QueryName::SaudizationByDepartment)?,
                by_salary_band: v.take(QueryName::SaudizationBySalaryBand)?,
                trend: v.take(QueryName::SaudizationTrend)?,
                matrix: v.take(QueryName::MatrixWithTargets)?,
            })
        });
        Applied::changed(changed)
    }

    fn notice(&self) -> Option<&str> {
        self.view.notice()
    }
}
