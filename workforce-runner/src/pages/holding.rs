//! Holding company comparison: one row per subsidiary.

use workforce_core::payload::HoldingComparison;
use workforce_core::{
    DrillError, DrillNode, FilterContext, FilterKey, FilterState, HostRouter, PageRoute,
    QueryName, QuerySpec, ValidationError,
};

use super::{Applied, DashboardPage};
use crate::drill;
use crate::orchestrator::{Batch, BatchResponse, FetchOrchestrator, ViewState};

pub const VIEW: &str = "holding-comparison";

pub struct HoldingComparisonPage {
    filters: FilterState,
    fetch: FetchOrchestrator,
    view: ViewState<HoldingComparison>,
}

impl HoldingComparisonPage {
    pub fn new(initial: FilterContext) -> Self {
        Self {
            filters: FilterState::new(initial),
            fetch: FetchOrchestrator::new(VIEW),
            view: ViewState::default(),
        }
    }

    pub fn view(&self) -> &ViewState<HoldingComparison> {
        &self.view
    }

    /// Open the company drilldown for the subsidiary in `row`.
    pub fn open_row(&self, row: usize, router: &mut dyn HostRouter) -> Result<Option<PageRoute>, DrillError> {
        let company = self
            .view
            .data()
            .and_then(|d| d.rows.get(row))
            .and_then(|r| r.label.as_deref());
        match company {
            Some(company) => drill::open_company(
                DrillNode::HoldingComparison,
                &self.filters.get(),
                company,
                router,
            )
            .map(Some),
            None => Ok(None),
        }
    }
}

impl DashboardPage for HoldingComparisonPage {
    fn route(&self) -> PageRoute {
        PageRoute::HoldingComparison
    }

    fn filters(&self) -> &FilterState {
        &self.filters
    }

    fn filters_mut(&mut self) -> &mut FilterState {
        &mut self.filters
    }

    fn begin_refresh(&mut self) -> Result<Batch, ValidationError> {
        self.fetch.begin(
            &self.filters.get(),
            &[FilterKey::HoldingCompany],
            vec![QuerySpec::new(QueryName::HoldingComparison)],
        )
    }

    fn apply(&mut self, response: BatchResponse) -> Applied {
        Applied::changed(self.fetch.apply(&mut self.view, response, |mut v| {
            v.take(QueryName::HoldingComparison)
        }))
    }

    fn notice(&self) -> Option<&str> {
        self.view.notice()
    }
}
