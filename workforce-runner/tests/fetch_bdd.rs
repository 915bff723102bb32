//! BDD tests for batch fetching.
//!
//! These scenarios drive real pages against the canned service:
//! - A superseded batch never reaches the view, whatever order it lands in
//! - Every query of a batch is in flight before any of them resolves
//! - One failed query discards the batch and keeps the prior data
//! - A missing required filter blocks the refresh without any call

use chrono::NaiveDate;
use serde_json::json;
use workforce_core::settings::DashboardSettings;
use workforce_core::{FetchError, FilterContext, FilterKey, FilterPatch, QueryName, ValidationError};
use workforce_runner::{
    drive, CannedService, DashboardPage, HoldingComparisonPage, HrAnalyticsPage,
};

fn as_on() -> FilterContext {
    FilterContext::as_on(NaiveDate::from_ymd_opt(2024, 6, 30).unwrap())
}

fn holding(rows: &[(&str, f64)]) -> serde_json::Value {
    json!({
        "rows": rows
            .iter()
            .map(|(company, pct)| json!({"company": company, "saudization_percent": pct}))
            .collect::<Vec<_>>(),
    })
}

fn analytics_page() -> HrAnalyticsPage {
    let settings = DashboardSettings::default();
    HrAnalyticsPage::new(
        as_on().with(FilterKey::Company, "Acme"),
        &settings,
        workforce_core::Settings::default().fallback_navigation(),
    )
}

#[tokio::test(flavor = "current_thread")]
async fn bdd_scenario_superseded_batch_is_dropped_when_it_lands_last() {
    // GIVEN a holding page whose first refresh is held at the service
    let mut page = HoldingComparisonPage::new(as_on().with(FilterKey::HoldingCompany, "North Group"));
    let slow = CannedService::new().respond(QueryName::HoldingComparison, holding(&[("Old Co", 10.0)]));
    let gate = slow.gate(QueryName::HoldingComparison);
    let first = page.begin_refresh().unwrap();

    // AND the user switches holding, starting a second refresh
    page.update_filters(FilterPatch::new().set(FilterKey::HoldingCompany, "South Group"));
    let fast = CannedService::new().respond(QueryName::HoldingComparison, holding(&[("New Co", 40.0)]));
    let second = page.begin_refresh().unwrap();

    // WHEN both run concurrently and the second resolves first
    let (old, new) = tokio::join!(first.run(&slow), async {
        let response = second.run(&fast).await;
        gate.notify_one();
        response
    });

    // THEN only the second batch is applied
    assert!(page.apply(new).changed);
    assert!(!page.apply(old).changed);
    let rows = &page.view().data().unwrap().rows;
    assert_eq!(rows[0].name(), "New Co");
}

#[tokio::test(flavor = "current_thread")]
async fn bdd_scenario_superseded_batch_is_dropped_when_it_lands_first() {
    // GIVEN two refreshes of the same page, the first one superseded
    let mut page = HoldingComparisonPage::new(as_on().with(FilterKey::HoldingCompany, "North Group"));
    let old_service = CannedService::new().respond(QueryName::HoldingComparison, holding(&[("Old Co", 10.0)]));
    let new_service = CannedService::new().respond(QueryName::HoldingComparison, holding(&[("New Co", 40.0)]));
    let first = page.begin_refresh().unwrap();
    let second = page.begin_refresh().unwrap();

    // WHEN the superseded batch settles before the current one
    let old = first.run(&old_service).await;
    assert!(!page.apply(old).changed);
    assert!(page.view().data().is_none());

    // THEN the current batch still applies afterwards
    let new = second.run(&new_service).await;
    assert!(page.apply(new).changed);
    assert_eq!(page.view().data().unwrap().rows[0].name(), "New Co");
}

#[tokio::test(flavor = "current_thread")]
async fn bdd_scenario_every_query_is_in_flight_before_any_resolves() {
    // GIVEN the analytics page and a service that holds the KPI query
    let mut page = analytics_page();
    let service = CannedService::new();
    let gate = service.gate(QueryName::Kpis);
    let batch = page.begin_refresh().unwrap();
    let expected = batch.specs().len();

    // WHEN the batch runs while the KPI call is still held
    let (response, seen) = tokio::join!(batch.run(&service), async {
        tokio::task::yield_now().await;
        let seen = service.calls().len();
        gate.notify_one();
        seen
    });

    // THEN all eight calls had been issued before the first one resolved
    assert_eq!(expected, 8);
    assert_eq!(seen, expected);
    assert!(page.apply(response).changed);
}

#[tokio::test(flavor = "current_thread")]
async fn bdd_scenario_one_failed_query_discards_the_whole_batch() {
    // GIVEN an analytics page showing a successful refresh
    let mut page = analytics_page();
    let good = CannedService::new().respond(
        QueryName::Kpis,
        json!({"total_employees": 120, "saudi_employees": 42}),
    );
    assert!(drive(&mut page, &good).await.unwrap());
    let before = page.view().data().cloned().unwrap();
    assert_eq!(before.kpis.total_employees, 120);

    // WHEN a refresh fails on one of its eight queries
    let flaky = CannedService::new()
        .respond(QueryName::Kpis, json!({"total_employees": 999}))
        .fail(QueryName::SaudizationTrend);
    let changed = drive(&mut page, &flaky).await.unwrap();

    // THEN nothing from that batch is applied
    assert!(!changed);
    assert_eq!(page.view().data(), Some(&before));

    // AND the page shows the generic notice
    assert_eq!(page.notice(), Some(FetchError::NOTICE));
    assert_eq!(flaky.calls().len(), 8);
}

#[tokio::test(flavor = "current_thread")]
async fn bdd_scenario_missing_company_blocks_refresh_without_calls() {
    // GIVEN an analytics page with no company selected
    let settings = DashboardSettings::default();
    let mut page = HrAnalyticsPage::new(
        as_on(),
        &settings,
        workforce_core::Settings::default().fallback_navigation(),
    );
    let service = CannedService::new();

    // WHEN a refresh is requested
    let err = drive(&mut page, &service).await.unwrap_err();

    // THEN the user is prompted for the company and nothing is fetched
    assert_eq!(err, ValidationError::MissingField(FilterKey::Company));
    assert_eq!(err.to_string(), "please select Company");
    assert!(service.calls().is_empty());
}

#[tokio::test(flavor = "current_thread")]
async fn bdd_scenario_empty_service_answers_render_empty_views() {
    // GIVEN a service that answers every analytics query with null
    let mut page = analytics_page();
    let service = CannedService::new();

    // WHEN the page refreshes
    assert!(drive(&mut page, &service).await.unwrap());

    // THEN every panel decodes to its empty state
    let view = page.view().data().unwrap();
    assert_eq!(view.kpis.total_employees, 0);
    assert!(view.nationality.is_empty());
    assert!(view.trend.is_empty());
    assert!(view.matrix.rows.is_empty());
    assert!(page.notice().is_none());
}
