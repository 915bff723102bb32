//! Dashboard pages.
//!
//! A page owns its live filters and one orchestrator per independently
//! refreshed view. It plans batches, applies their responses and reports
//! what else has to be fetched; it never performs I/O itself. `drive`
//! runs a refresh to completion against a service.

pub mod company;
pub mod employees;
pub mod holding;
pub mod hr_analytics;
pub mod scorecard;
pub mod trends;

pub use company::{CompanyDrilldownPage, CompanyView};
pub use employees::{EmployeeListPage, ExportError};
pub use holding::HoldingComparisonPage;
pub use hr_analytics::{AnalyticsView, HrAnalyticsPage};
pub use scorecard::ExecutiveScorecardPage;
pub use trends::SaudizationTrendsPage;

use workforce_core::{FilterPatch, FilterState, HostRouter, PageRoute, ValidationError};

use crate::orchestrator::{Batch, BatchResponse};
use crate::service::QueryService;

/// What applying a response did.
#[derive(Debug, Default)]
pub struct Applied {
    /// The visible data changed.
    pub changed: bool,
    /// A dependent batch to run next.
    pub follow_up: Option<Batch>,
}

impl Applied {
    pub fn changed(changed: bool) -> Self {
        Self {
            changed,
            follow_up: None,
        }
    }
}

pub trait DashboardPage {
    fn route(&self) -> PageRoute;

    fn filters(&self) -> &FilterState;

    fn filters_mut(&mut self) -> &mut FilterState;

    /// Plan a refresh of the whole page.
    fn begin_refresh(&mut self) -> Result<Batch, ValidationError>;

    /// Apply a settled batch belonging to any of this page's views.
    fn apply(&mut self, response: BatchResponse) -> Applied;

    /// Notice raised by the last failed batch, if any.
    fn notice(&self) -> Option<&str>;

    /// Merge a filter change. Pages with extra state tied to the filters
    /// (pagination, drill trail) reset it here.
    fn update_filters(&mut self, patch: FilterPatch) {
        self.filters_mut().set(patch);
    }

    /// Seed the filters from the route options left by the previous page.
    /// Scope keys the options leave out are cleared, not kept.
    ///
    /// The options are consumed; a later refresh cannot replay them.
    fn arrive(&mut self, router: &mut dyn HostRouter) -> bool {
        match router.take_route_options() {
            Some(payload) if !payload.is_empty() => {
                tracing::debug!(page = self.route().slug(), keys = payload.len(), "seeded from route");
                self.update_filters(payload.into_seed());
                true
            }
            _ => false,
        }
    }
}

/// Run `first` and any dependent batches it triggers.
pub async fn drive_batch<P, S>(page: &mut P, first: Batch, service: &S) -> bool
where
    P: DashboardPage + ?Sized,
    S: QueryService + ?Sized,
{
    let mut changed = false;
    let mut next = Some(first);
    while let Some(batch) = next.take() {
        let response = batch.run(service).await;
        let applied = page.apply(response);
        changed |= applied.changed;
        next = applied.follow_up;
    }
    changed
}

/// Refresh a page to completion. Returns whether the visible data changed.
pub async fn drive<P, S>(page: &mut P, service: &S) -> Result<bool, ValidationError>
where
    P: DashboardPage + ?Sized,
    S: QueryService + ?Sized,
{
    let batch = page.begin_refresh()?;
    Ok(drive_batch(page, batch, service).await)
}
