//! Company drilldown: snapshot, branch and department breakdowns, risky
//! positions, and the in-place designation breakdown.

use workforce_core::payload::{CompanyDrilldown, DesignationBreakdown, RiskyPositions};
use workforce_core::settings::DashboardSettings;
use workforce_core::{
    Crumb, DrillError, FilterContext, FilterKey, FilterPatch, FilterState, HostRouter, PageRoute,
    QueryName, QuerySpec, ValidationError,
};

use super::{Applied, DashboardPage};
use crate::drill::{DrillCoordinator, DrillStep};
use crate::orchestrator::{Batch, BatchResponse, FetchOrchestrator, ViewState};

pub const VIEW: &str = "company-drilldown";
pub const DESIGNATIONS_VIEW: &str = "company-drilldown/designations";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompanyView {
    pub drilldown: CompanyDrilldown,
    pub risky: RiskyPositions,
}

pub struct CompanyDrilldownPage {
    filters: FilterState,
    drill: DrillCoordinator,
    fetch: FetchOrchestrator,
    view: ViewState<CompanyView>,
    designation_fetch: FetchOrchestrator,
    designations: ViewState<DesignationBreakdown>,
    top_n: u32,
    min_headcount: u32,
}

impl CompanyDrilldownPage {
    pub fn new(initial: FilterContext, settings: &DashboardSettings) -> Self {
        Self {
            drill: DrillCoordinator::new(&initial),
            filters: FilterState::new(initial),
            fetch: FetchOrchestrator::new(VIEW),
            view: ViewState::default(),
            designation_fetch: FetchOrchestrator::new(DESIGNATIONS_VIEW),
            designations: ViewState::default(),
            top_n: settings.top_n,
            min_headcount: settings.min_headcount,
        }
    }

    pub fn view(&self) -> &ViewState<CompanyView> {
        &self.view
    }

    pub fn designations(&self) -> &ViewState<DesignationBreakdown> {
        &self.designations
    }

    pub fn breadcrumb(&self) -> &[Crumb] {
        self.drill.breadcrumb()
    }

    pub fn select_branch(&mut self, branch: Option<&str>) -> Result<DrillStep, DrillError> {
        self.drill.select_branch(&mut self.filters, branch)
    }

    pub fn select_department(&mut self, department: &str) -> Result<DrillStep, DrillError> {
        self.drill.select_department(&mut self.filters, department)
    }

    pub fn select_designation(
        &mut self,
        designation: &str,
        router: &mut dyn HostRouter,
    ) -> Result<DrillStep, DrillError> {
        self.drill
            .select_designation(&self.filters, router, designation)
    }

    pub fn select_risky(
        &self,
        designation: &str,
        router: &mut dyn HostRouter,
    ) -> Result<DrillStep, DrillError> {
        self.drill.select_risky(&self.filters, router, designation)
    }

    pub fn up(&mut self) -> DrillStep {
        self.drill.up(&mut self.filters)
    }

    /// Turn a drill step into the batch it needs, if any.
    pub fn plan(&mut self, step: &DrillStep) -> Result<Option<Batch>, ValidationError> {
        match step {
            DrillStep::Refresh => self.begin_refresh().map(Some),
            DrillStep::Designations(department) => self.begin_designations(department).map(Some),
            DrillStep::CloseDesignations => {
                self.close_designations();
                Ok(None)
            }
            DrillStep::Navigated(_) | DrillStep::Stay => Ok(None),
        }
    }

    pub fn begin_designations(&mut self, department: &str) -> Result<Batch, ValidationError> {
        let spec = QuerySpec::new(QueryName::DesignationBreakdown)
            .with_filter(FilterKey::Department, department)
            .param("min_headcount", self.min_headcount);
        self.designation_fetch.begin(
            &self.filters.get(),
            &[FilterKey::Company, FilterKey::Department],
            vec![spec],
        )
    }

    fn close_designations(&mut self) {
        self.designation_fetch.invalidate();
        self.designations.clear();
    }
}

impl DashboardPage for CompanyDrilldownPage {
    fn route(&self) -> PageRoute {
        PageRoute::CompanyDrilldown
    }

    fn filters(&self) -> &FilterState {
        &self.filters
    }

    fn filters_mut(&mut self) -> &mut FilterState {
        &mut self.filters
    }

    /// Changing company, branch or date closes any open department.
    fn update_filters(&mut self, mut patch: FilterPatch) {
        let rescoped = [FilterKey::Company, FilterKey::Branch, FilterKey::AsOnDate]
            .iter()
            .any(|k| patch.contains(*k));
        if rescoped && !patch.contains(FilterKey::Department) {
            patch = patch
                .clear(FilterKey::Department)
                .clear(FilterKey::Designation);
        }
        self.filters.set(patch);
        self.drill.sync(&self.filters.get());
    }

    fn begin_refresh(&mut self) -> Result<Batch, ValidationError> {
        if self.drill.department().is_none() {
            self.close_designations();
        }
        let specs = vec![
            QuerySpec::new(QueryName::CompanyDrilldown),
            QuerySpec::new(QueryName::TopRiskyPositions)
                .param("top_n", self.top_n)
                .param("min_headcount", self.min_headcount),
        ];
        self.fetch
            .begin(&self.filters.get(), &[FilterKey::Company], specs)
    }

    fn apply(&mut self, response: BatchResponse) -> Applied {
        let view = response.view;
        let changed = match view {
            VIEW => self.fetch.apply(&mut self.view, response, |mut v| {
                Ok(CompanyView {
                    drilldown: v.take(QueryName::CompanyDrilldown)?,
                    risky: v.take(QueryName::TopRiskyPositions)?,
                })
            }),
            DESIGNATIONS_VIEW => self
                .designation_fetch
                .apply(&mut self.designations, response, |mut v| {
                    v.take(QueryName::DesignationBreakdown)
                }),
            other => {
                tracing::debug!(view = other, "response for another page");
                false
            }
        };
        Applied::changed(changed)
    }

    fn notice(&self) -> Option<&str> {
        self.view.notice().or(self.designations.notice())
    }
}
