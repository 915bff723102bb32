//! Executive scorecard for a holding or a single company.
//!
//! Risky positions load in a second batch once the scorecard is known:
//! they belong to the chosen company, or to the highest-risk subsidiary
//! when only a holding is selected.

use workforce_core::payload::{ExecutiveScorecard, RiskyPositions};
use workforce_core::settings::DashboardSettings;
use workforce_core::{
    DrillError, DrillNode, DrilldownLevel, FilterContext, FilterKey, FilterState, HostRouter,
    PageRoute, QueryName, QuerySpec, ValidationError,
};

use super::{Applied, DashboardPage};
use crate::drill;
use crate::orchestrator::{Batch, BatchResponse, FetchOrchestrator, ViewState};

pub const VIEW: &str = "executive-scorecard";
pub const RISKY_VIEW: &str = "executive-scorecard/risky";

pub const DEFAULT_MONTHS_BACK: u32 = 12;

pub struct ExecutiveScorecardPage {
    filters: FilterState,
    fetch: FetchOrchestrator,
    view: ViewState<ExecutiveScorecard>,
    risky_fetch: FetchOrchestrator,
    risky: ViewState<RiskyPositions>,
    risk_company: Option<String>,
    months_back: u32,
    top_n: u32,
    min_headcount: u32,
}

impl ExecutiveScorecardPage {
    pub fn new(initial: FilterContext, settings: &DashboardSettings) -> Self {
        Self {
            filters: FilterState::new(initial),
            fetch: FetchOrchestrator::new(VIEW),
            view: ViewState::default(),
            risky_fetch: FetchOrchestrator::new(RISKY_VIEW),
            risky: ViewState::default(),
            risk_company: None,
            months_back: DEFAULT_MONTHS_BACK,
            top_n: settings.top_n,
            min_headcount: settings.min_headcount,
        }
    }

    pub fn view(&self) -> &ViewState<ExecutiveScorecard> {
        &self.view
    }

    pub fn risky(&self) -> &ViewState<RiskyPositions> {
        &self.risky
    }

    /// Company the risky positions were loaded for.
    pub fn risk_company(&self) -> Option<&str> {
        self.risk_company.as_deref()
    }

    pub fn set_months_back(&mut self, months: u32) {
        self.months_back = months.max(1);
    }

    /// A company filter narrows the scorecard; otherwise a holding is needed.
    fn required(ctx: &FilterContext) -> &'static [FilterKey] {
        if ctx.company.is_some() {
            &[FilterKey::Company]
        } else {
            &[FilterKey::HoldingCompany]
        }
    }

    fn begin_risky(&mut self, company: &str) -> Option<Batch> {
        let spec = QuerySpec::new(QueryName::TopRiskyPositions)
            .with_filter(FilterKey::Company, company)
            .param("top_n", self.top_n)
            .param("min_headcount", self.min_headcount);
        self.risk_company = Some(company.to_string());
        self.risky_fetch
            .begin(&self.filters.get(), &[], vec![spec])
            .ok()
    }

    /// Jump to the company drilldown from the holding risk table.
    pub fn open_company(
        &self,
        row: usize,
        router: &mut dyn HostRouter,
    ) -> Result<Option<PageRoute>, DrillError> {
        let company = self
            .view
            .data()
            .and_then(|d| d.holding.rows.get(row))
            .and_then(|r| r.label.as_deref());
        match company {
            Some(company) => drill::open_company(
                DrillNode::ExecutiveScorecard,
                &self.filters.get(),
                company,
                router,
            )
            .map(Some),
            None => Ok(None),
        }
    }

    /// Jump from a risky designation straight to its employees.
    pub fn open_risky(
        &self,
        designation: &str,
        router: &mut dyn HostRouter,
    ) -> Result<Option<PageRoute>, DrillError> {
        let Some(company) = self.risk_company.as_deref() else {
            return Ok(None);
        };
        let snapshot = self
            .filters
            .get()
            .with(FilterKey::Company, company)
            .with(FilterKey::Designation, designation);
        drill::jump(
            DrillNode::RiskyPositions,
            DrillNode::Level(DrilldownLevel::Employee),
            &snapshot,
            router,
        )
        .map(Some)
    }
}

impl DashboardPage for ExecutiveScorecardPage {
    fn route(&self) -> PageRoute {
        PageRoute::ExecutiveScorecard
    }

    fn filters(&self) -> &FilterState {
        &self.filters
    }

    fn filters_mut(&mut self) -> &mut FilterState {
        &mut self.filters
    }

    fn begin_refresh(&mut self) -> Result<Batch, ValidationError> {
        self.risky_fetch.invalidate();
        self.risky.clear();
        self.risk_company = None;
        let ctx = self.filters.get();
        let spec = QuerySpec::new(QueryName::ExecutiveScorecard).param("months_back", self.months_back);
        self.fetch.begin(&ctx, Self::required(&ctx), vec![spec])
    }

    fn apply(&mut self, response: BatchResponse) -> Applied {
        let view = response.view;
        match view {
            VIEW => {
                let changed = self.fetch.apply(&mut self.view, response, |mut v| {
                    v.take(QueryName::ExecutiveScorecard)
                });
                if !changed {
                    return Applied::changed(false);
                }
                let company = self
                    .filters
                    .get()
                    .company
                    .or_else(|| self.view.data().and_then(|d| d.highest_risk()).map(str::to_string));
                let follow_up = company.and_then(|c| self.begin_risky(&c));
                Applied {
                    changed,
                    follow_up,
                }
            }
            RISKY_VIEW => Applied::changed(self.risky_fetch.apply(&mut self.risky, response, |mut v| {
                v.take(QueryName::TopRiskyPositions)
            })),
            other => {
                tracing::debug!(view = other, "response for another page");
                Applied::default()
            }
        }
    }

    fn notice(&self) -> Option<&str> {
        self.view.notice().or(self.risky.notice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn page(ctx: FilterContext) -> ExecutiveScorecardPage {
        ExecutiveScorecardPage::new(ctx, &DashboardSettings::default())
    }

    fn as_on() -> FilterContext {
        FilterContext::as_on(NaiveDate::from_ymd_opt(2024, 6, 30).unwrap())
    }

    #[test]
    fn needs_holding_or_company() {
        let err = page(as_on()).begin_refresh().unwrap_err();
        assert_eq!(err, ValidationError::MissingField(FilterKey::HoldingCompany));
        assert!(page(as_on().with(FilterKey::Company, "Acme")).begin_refresh().is_ok());
    }

    #[test]
    fn holding_view_follows_up_with_highest_risk_company() {
        let mut p = page(as_on().with(FilterKey::HoldingCompany, "Group"));
        let batch = p.begin_refresh().unwrap();
        let response = BatchResponse {
            view: batch.view(),
            epoch: batch.epoch(),
            names: vec![QueryName::ExecutiveScorecard],
            result: Ok(vec![json!({
                "holding": {"rows": [
                    {"company": "North", "variance_percent": -4.0},
                    {"company": "South", "variance_percent": 1.5}
                ]}
            })]),
        };
        let applied = p.apply(response);
        assert!(applied.changed);
        let follow = applied.follow_up.unwrap();
        assert_eq!(follow.view(), RISKY_VIEW);
        let args = follow.specs()[0].args(follow.snapshot());
        assert_eq!(args["company"], "North");
        assert_eq!(p.risk_company(), Some("North"));
    }
}
