//! BDD tests for the employee list.
//!
//! These scenarios cover paging and export:
//! - Next/Prev move the offset; filters and refresh return to the first page
//! - A failed page leaves the paging on the rows still shown
//! - Export always sends the filters and never the paging window
//! - A missing file reference is reported, not opened
//! - The offline dataset serves the page end to end

use chrono::NaiveDate;
use serde_json::json;
use workforce_core::settings::DashboardSettings;
use workforce_core::{FilterContext, FilterKey, MemoryRouter, QueryName};
use workforce_runner::pages::employees::SELECT_COMPANY;
use workforce_runner::sample::SampleBackend;
use workforce_runner::{drive, drive_batch, CannedService, DashboardPage, EmployeeListPage, ExportError};

fn as_on() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
}

fn settings(page_size: usize) -> DashboardSettings {
    DashboardSettings {
        page_size,
        ..DashboardSettings::default()
    }
}

fn page_for(company: &str, page_size: usize) -> EmployeeListPage {
    EmployeeListPage::new(
        FilterContext::as_on(as_on()).with(FilterKey::Company, company),
        &settings(page_size),
    )
}

fn listing(total: u64) -> CannedService {
    CannedService::new().respond(
        QueryName::EmployeeList,
        json!({"total": total, "rows": [{"employee": "HR-EMP-0001", "is_saudi": 1}]}),
    )
}

fn offsets(service: &CannedService) -> Vec<String> {
    service
        .calls()
        .into_iter()
        .filter(|(n, _)| *n == QueryName::EmployeeList)
        .map(|(_, args)| args["offset"].clone())
        .collect()
}

#[tokio::test(flavor = "current_thread")]
async fn bdd_scenario_paging_moves_offset_and_refresh_starts_over() {
    // GIVEN an employee list of 137 rows shown 50 at a time
    let mut page = page_for("Acme", 50);
    let service = listing(137);
    drive(&mut page, &service).await.unwrap();
    assert_eq!(page.paging().summary(), "Showing 1 - 50 of 137");

    // WHEN the user pages forward twice
    let batch = page.next_page().unwrap().unwrap();
    drive_batch(&mut page, batch, &service).await;
    let batch = page.next_page().unwrap().unwrap();
    drive_batch(&mut page, batch, &service).await;

    // THEN the last page is shown and Next is disabled
    assert_eq!(page.paging().offset(), 100);
    assert!(page.paging().next_disabled());
    assert!(page.next_page().is_none());

    // WHEN the user refreshes
    drive(&mut page, &service).await.unwrap();

    // THEN the list starts from the first page again
    assert_eq!(offsets(&service), ["0", "50", "100", "0"]);
    assert_eq!(page.paging().offset(), 0);
}

#[tokio::test(flavor = "current_thread")]
async fn bdd_scenario_failed_next_page_keeps_paging_on_shown_rows() {
    // GIVEN the first page of 137 rows on screen
    let mut page = page_for("Acme", 50);
    drive(&mut page, &listing(137)).await.unwrap();
    let before = page.paging().summary();

    // WHEN the next page fails to load
    let broken = CannedService::new().fail(QueryName::EmployeeList);
    let batch = page.next_page().unwrap().unwrap();
    drive_batch(&mut page, batch, &broken).await;

    // THEN the rows, range and buttons still describe the first page
    assert_eq!(page.paging().offset(), 0);
    assert_eq!(page.paging().summary(), before);
    assert!(page.paging().prev_disabled());
    assert_eq!(page.view().data().unwrap().total, 137);
    assert!(page.notice().is_some());

    // AND Next retries the same window
    let batch = page.next_page().unwrap().unwrap();
    let args = batch.specs()[0].args(batch.snapshot());
    assert_eq!(args["offset"], "50");
}

#[tokio::test(flavor = "current_thread")]
async fn bdd_scenario_filter_change_returns_to_first_page() {
    // GIVEN a list on its second page
    let mut page = page_for("Acme", 50);
    let service = listing(137);
    drive(&mut page, &service).await.unwrap();
    let batch = page.next_page().unwrap().unwrap();
    drive_batch(&mut page, batch, &service).await;
    assert_eq!(page.paging().offset(), 50);

    // WHEN the user searches
    page.set_search("sara");

    // THEN paging resets before any fetch
    assert_eq!(page.paging().offset(), 0);
    assert!(page.prev_page().is_none());

    // AND the next fetch carries the search term from offset zero
    drive(&mut page, &service).await.unwrap();
    let (_, args) = service.calls().pop().unwrap();
    assert_eq!(args["search"], "sara");
    assert_eq!(args["offset"], "0");
}

#[tokio::test(flavor = "current_thread")]
async fn bdd_scenario_export_sends_filters_without_paging() {
    // GIVEN a list on its third page, filtered to Saudi employees
    let mut page = page_for("Acme", 50);
    let service = listing(137).export_to("https://hr.example.com/files/Employees_Acme_20240630.csv");
    page.cycle_employee_type();
    drive(&mut page, &service).await.unwrap();
    for _ in 0..2 {
        let batch = page.next_page().unwrap().unwrap();
        drive_batch(&mut page, batch, &service).await;
    }

    // WHEN the user exports
    let mut router = MemoryRouter::new();
    let url = page.export(&service, &mut router).await.unwrap();

    // THEN the export carries the filters and no paging window
    let exports = service.exports();
    assert_eq!(exports.len(), 1);
    let args = &exports[0];
    assert_eq!(args.get("company"), Some("Acme"));
    assert_eq!(args.get("is_saudi"), Some("1"));
    assert_eq!(args.get("as_on_date"), Some("2024-06-30"));
    assert!(!args.contains("limit"));
    assert!(!args.contains("offset"));

    // AND the file is opened through the host
    assert_eq!(router.opened_windows(), [url.as_str()]);
}

#[tokio::test(flavor = "current_thread")]
async fn bdd_scenario_export_without_file_is_reported() {
    // GIVEN a service that produces no file
    let page = page_for("Acme", 50);
    let service = CannedService::new();
    let mut router = MemoryRouter::new();

    // WHEN the user exports
    let err = page.export(&service, &mut router).await.unwrap_err();

    // THEN the user is told and nothing is opened
    assert_eq!(err, ExportError::NoFile);
    assert_eq!(err.to_string(), "Could not generate file.");
    assert!(router.opened_windows().is_empty());
}

#[tokio::test(flavor = "current_thread")]
async fn bdd_scenario_no_company_shows_placeholder_and_skips_export() {
    // GIVEN an employee list without a company
    let mut page = EmployeeListPage::new(FilterContext::as_on(as_on()), &settings(50));
    let service = listing(3);

    // THEN the table shows the placeholder
    assert_eq!(page.placeholder(), Some(SELECT_COMPANY));

    // AND neither refresh nor export reaches the service
    assert!(drive(&mut page, &service).await.is_err());
    let err = page.export(&service, &mut MemoryRouter::new()).await.unwrap_err();
    assert!(matches!(err, ExportError::Validation(_)));
    assert!(service.calls().is_empty());
    assert!(service.exports().is_empty());
}

#[tokio::test(flavor = "current_thread")]
async fn bdd_scenario_offline_dataset_serves_and_exports() {
    // GIVEN the offline dataset and a small page size
    let dir = tempfile::tempdir().unwrap();
    let backend = SampleBackend::new(dir.path()).with_today(as_on());
    let company = SampleBackend::companies().next().unwrap();
    let mut page = page_for(company, 10);

    // WHEN the page refreshes
    assert!(drive(&mut page, &backend).await.unwrap());

    // THEN one page of rows is shown out of the company total
    let view = page.view().data().unwrap();
    assert_eq!(view.rows.len(), 10.min(view.total as usize));
    assert_eq!(page.paging().total(), view.total as usize);

    // AND the export lands in the export directory
    let mut router = MemoryRouter::new();
    let url = page.export(&backend, &mut router).await.unwrap();
    let path = url.trim_start_matches("file://");
    let content = std::fs::read_to_string(path).unwrap();
    assert_eq!(content.lines().count() as u64, view.total + 1);
}
