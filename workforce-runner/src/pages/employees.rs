//! Paginated employee list with search, type selector and CSV export.

use thiserror::Error;
use workforce_core::payload::{EmployeePage, ExportReceipt};
use workforce_core::settings::DashboardSettings;
use workforce_core::{
    EmployeeType, ExportArgs, FetchError, FilterContext, FilterKey, FilterPatch, FilterState,
    HostRouter, PageRoute, PageWindow, PaginationState, QueryName, QuerySpec, ValidationError,
};

use super::{Applied, DashboardPage};
use crate::orchestrator::{Batch, BatchResponse, Epoch, FetchOrchestrator, ViewState};
use crate::service::ExportService;

pub const VIEW: &str = "employee-drilldown";

/// Shown instead of the table while no company is chosen.
pub const SELECT_COMPANY: &str = "Select a Company to load employees.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Could not generate file.")]
    NoFile,
}

pub struct EmployeeListPage {
    filters: FilterState,
    paging: PaginationState,
    fetch: FetchOrchestrator,
    view: ViewState<EmployeePage>,
    /// Window requested by the batch in flight.
    pending: Option<(Epoch, PageWindow)>,
}

impl EmployeeListPage {
    pub fn new(initial: FilterContext, settings: &DashboardSettings) -> Self {
        Self {
            filters: FilterState::new(initial),
            paging: PaginationState::new(settings.page_size),
            fetch: FetchOrchestrator::new(VIEW),
            view: ViewState::default(),
            pending: None,
        }
    }

    pub fn view(&self) -> &ViewState<EmployeePage> {
        &self.view
    }

    pub fn paging(&self) -> &PaginationState {
        &self.paging
    }

    /// Placeholder text for the table area, if the list cannot load.
    pub fn placeholder(&self) -> Option<&'static str> {
        if self.filters.get().company.is_none() {
            Some(SELECT_COMPANY)
        } else if self.view.data().is_some_and(|p| p.rows.is_empty()) {
            Some("No employees found for the selected filters.")
        } else {
            None
        }
    }

    pub fn set_search(&mut self, text: &str) {
        self.update_filters(FilterPatch::new().set(FilterKey::SearchText, text));
    }

    pub fn cycle_employee_type(&mut self) -> EmployeeType {
        let next = self.filters.get().employee_type.next();
        self.update_filters(FilterPatch::new().employee_type(next));
        next
    }

    /// Fetch `window`. The shown offset moves only once its rows apply.
    fn begin_fetch(&mut self, window: PageWindow) -> Result<Batch, ValidationError> {
        let spec = QuerySpec::new(QueryName::EmployeeList).page(window);
        let batch = self
            .fetch
            .begin(&self.filters.get(), &[FilterKey::Company], vec![spec])?;
        self.pending = Some((batch.epoch(), window));
        Ok(batch)
    }

    /// Fetch the following page. `None` when Next is disabled.
    pub fn next_page(&mut self) -> Option<Result<Batch, ValidationError>> {
        let window = self.paging.next_window()?;
        Some(self.begin_fetch(window))
    }

    /// Fetch the preceding page. `None` when Prev is disabled.
    pub fn prev_page(&mut self) -> Option<Result<Batch, ValidationError>> {
        let window = self.paging.prev_window()?;
        Some(self.begin_fetch(window))
    }

    /// Export arguments for the current filters; paging never applies.
    pub fn export_args(&self) -> Result<ExportArgs, ValidationError> {
        let ctx = self.filters.get();
        if let Some(missing) = ctx.first_missing(&[FilterKey::Company]) {
            return Err(ValidationError::MissingField(missing));
        }
        Ok(ExportArgs::from_filter(&ctx))
    }

    /// Open the exported file through the host.
    pub fn finish_export(
        &self,
        receipt: ExportReceipt,
        router: &mut dyn HostRouter,
    ) -> Result<String, ExportError> {
        let url = receipt
            .file_url
            .filter(|u| !u.trim().is_empty())
            .ok_or(ExportError::NoFile)?;
        tracing::info!(%url, "export ready");
        router.open_window(url.clone());
        Ok(url)
    }

    pub async fn export<S: ExportService + ?Sized>(
        &self,
        service: &S,
        router: &mut dyn HostRouter,
    ) -> Result<String, ExportError> {
        let args = self.export_args()?;
        let receipt = service.export(args).await?;
        self.finish_export(receipt, router)
    }
}

impl DashboardPage for EmployeeListPage {
    fn route(&self) -> PageRoute {
        PageRoute::EmployeeDrilldown
    }

    fn filters(&self) -> &FilterState {
        &self.filters
    }

    fn filters_mut(&mut self) -> &mut FilterState {
        &mut self.filters
    }

    fn update_filters(&mut self, patch: FilterPatch) {
        self.filters.set(patch);
        self.paging.reset();
    }

    /// Explicit refresh starts from the first page.
    fn begin_refresh(&mut self) -> Result<Batch, ValidationError> {
        let window = self.paging.first_window();
        self.begin_fetch(window)
    }

    fn apply(&mut self, response: BatchResponse) -> Applied {
        let epoch = response.epoch;
        let changed = self.fetch.apply(&mut self.view, response, |mut v| {
            v.take(QueryName::EmployeeList)
        });
        if changed {
            let window = match self.pending.take() {
                Some((pending, window)) if pending == epoch => window,
                _ => self.paging.window(),
            };
            if let Some(page) = self.view.data() {
                self.paging.show(window, page.total as usize);
            }
        }
        Applied::changed(changed)
    }

    fn notice(&self) -> Option<&str> {
        self.view.notice()
    }
}
