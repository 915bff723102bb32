//! Workforce Runner: fetch orchestration, drill-down coordination, tab
//! dispatch and the dashboard pages built on `workforce-core`.
//!
//! This crate provides:
//! - Collaborator traits for queries, export, navigation and theme
//! - Epoch-tagged, all-or-nothing fetch batches
//! - Drill-down transitions and tab activation against a host router
//! - The six dashboard pages and a driver that refreshes them
//! - An HTTP client, a canned test double and a seeded offline dataset
//! - Employee CSV export

pub mod canned;
pub mod drill;
pub mod export;
pub mod http;
pub mod orchestrator;
pub mod pages;
pub mod sample;
pub mod service;
pub mod session;
pub mod tabs;

pub use canned::CannedService;
pub use drill::{DrillCoordinator, DrillStep};
pub use http::MethodClient;
pub use orchestrator::{Batch, BatchResponse, Epoch, FetchOrchestrator, Settled, ViewState};
pub use pages::{
    drive, drive_batch, Applied, CompanyDrilldownPage, DashboardPage, EmployeeListPage,
    ExecutiveScorecardPage, ExportError, HoldingComparisonPage, HrAnalyticsPage,
    SaudizationTrendsPage,
};
pub use sample::SampleBackend;
pub use service::{decode, ExportService, NavigationService, QueryService, ThemeService};
pub use session::SessionCache;
pub use tabs::{TabEngine, TabOutcome};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn batch_crosses_to_worker() {
        assert_send::<Batch>();
        assert_sync::<Batch>();
    }

    #[test]
    fn batch_response_crosses_back() {
        assert_send::<BatchResponse>();
        assert_sync::<BatchResponse>();
    }

    #[test]
    fn epoch_is_send_sync() {
        assert_send::<Epoch>();
        assert_sync::<Epoch>();
    }

    #[test]
    fn outcomes_are_send_sync() {
        assert_send::<DrillStep>();
        assert_sync::<DrillStep>();
        assert_send::<TabOutcome>();
        assert_sync::<TabOutcome>();
    }

    #[test]
    fn pages_are_send() {
        assert_send::<HrAnalyticsPage>();
        assert_send::<CompanyDrilldownPage>();
        assert_send::<EmployeeListPage>();
        assert_send::<ExecutiveScorecardPage>();
        assert_send::<HoldingComparisonPage>();
        assert_send::<SaudizationTrendsPage>();
    }
}
