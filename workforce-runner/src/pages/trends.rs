//! Saudization trends: month-end actual vs target, Saudi and non-Saudi
//! headcount, and the top branches of a company.

use workforce_core::payload::TrendData;
use workforce_core::settings::DashboardSettings;
use workforce_core::{FilterContext, FilterKey, FilterState, PageRoute, QueryName, QuerySpec, ValidationError};

use super::{Applied, DashboardPage};
use crate::orchestrator::{Batch, BatchResponse, FetchOrchestrator, ViewState};

pub const VIEW: &str = "saudization-trends";

pub const BRANCH_PLACEHOLDER: &str = "Select a company to view top branches";
pub const NO_DATA: &str = "No data";

pub struct SaudizationTrendsPage {
    filters: FilterState,
    fetch: FetchOrchestrator,
    view: ViewState<TrendData>,
    months_back: u32,
}

impl SaudizationTrendsPage {
    pub fn new(initial: FilterContext, settings: &DashboardSettings) -> Self {
        Self {
            filters: FilterState::new(initial),
            fetch: FetchOrchestrator::new(VIEW),
            view: ViewState::default(),
            months_back: settings.months_back.max(1),
        }
    }

    pub fn view(&self) -> &ViewState<TrendData> {
        &self.view
    }

    pub fn months_back(&self) -> u32 {
        self.months_back
    }

    /// Takes effect on the next refresh.
    pub fn set_months_back(&mut self, months: u32) {
        self.months_back = months.max(1);
    }

    /// Text shown in place of the branch chart, if any.
    pub fn branch_placeholder(&self) -> Option<&'static str> {
        if self.filters.get().company.is_none() {
            return Some(BRANCH_PLACEHOLDER);
        }
        match self.view.data() {
            Some(d) if d.branch_level.is_empty() => Some(NO_DATA),
            _ => None,
        }
    }

    fn required(ctx: &FilterContext) -> &'static [FilterKey] {
        if ctx.company.is_some() {
            &[FilterKey::Company]
        } else {
            &[FilterKey::HoldingCompany]
        }
    }
}

impl DashboardPage for SaudizationTrendsPage {
    fn route(&self) -> PageRoute {
        PageRoute::SaudizationTrends
    }

    fn filters(&self) -> &FilterState {
        &self.filters
    }

    fn filters_mut(&mut self) -> &mut FilterState {
        &mut self.filters
    }

    fn begin_refresh(&mut self) -> Result<Batch, ValidationError> {
        let ctx = self.filters.get();
        let spec = QuerySpec::new(QueryName::TrendData).param("months_back", self.months_back);
        self.fetch.begin(&ctx, Self::required(&ctx), vec![spec])
    }

    fn apply(&mut self, response: BatchResponse) -> Applied {
        Applied::changed(
            self.fetch
                .apply(&mut self.view, response, |mut v| v.take(QueryName::TrendData)),
        )
    }

    fn notice(&self) -> Option<&str> {
        self.view.notice()
    }
}
