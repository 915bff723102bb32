//! BDD tests for cross-page navigation.
//!
//! These scenarios follow a user across pages through the host router:
//! - Opening a subsidiary seeds the company page exactly once
//! - The company drill trail hands its scope to the employee list
//! - Risky positions bypass the department level
//! - A later handoff replaces the scope an earlier one left behind
//! - Route-link tabs carry their payload to the destination page

use chrono::NaiveDate;
use serde_json::json;
use workforce_core::settings::DashboardSettings;
use workforce_core::{
    DrilldownLevel, FilterContext, FilterKey, HostRouter, MemoryRouter, PageRoute, QueryName,
    RouteTarget,
};
use workforce_runner::{
    drive, CannedService, CompanyDrilldownPage, DashboardPage, DrillStep, EmployeeListPage,
    ExecutiveScorecardPage, HoldingComparisonPage, HrAnalyticsPage, TabOutcome,
};

fn as_on() -> FilterContext {
    FilterContext::as_on(NaiveDate::from_ymd_opt(2024, 6, 30).unwrap())
}

#[tokio::test(flavor = "current_thread")]
async fn bdd_scenario_opening_a_subsidiary_seeds_company_page_once() {
    // GIVEN a loaded holding comparison
    let mut holding = HoldingComparisonPage::new(as_on().with(FilterKey::HoldingCompany, "Group"));
    let service = CannedService::new().respond(
        QueryName::HoldingComparison,
        json!({"rows": [{"company": "Acme KSA", "total_employees": 80}]}),
    );
    drive(&mut holding, &service).await.unwrap();

    // WHEN the user opens the first subsidiary
    let mut router = MemoryRouter::new();
    let page = holding.open_row(0, &mut router).unwrap();

    // THEN the router moves to the company drilldown with a payload
    assert_eq!(page, Some(PageRoute::CompanyDrilldown));
    assert_eq!(
        router.current_route(),
        Some(&RouteTarget::Page(PageRoute::CompanyDrilldown))
    );
    assert!(router.has_pending_options());

    // AND the company page consumes it on arrival
    let mut company = CompanyDrilldownPage::new(FilterContext::today(), &DashboardSettings::default());
    assert!(company.arrive(&mut router));
    let ctx = company.filters().get();
    assert_eq!(ctx.company.as_deref(), Some("Acme KSA"));
    assert_eq!(ctx.as_on_date, as_on().as_on_date);
    assert_eq!(ctx.holding_company, None);

    // AND a later arrival finds nothing to replay
    assert!(!company.arrive(&mut router));
    assert!(!router.has_pending_options());
}

#[test]
fn bdd_scenario_drill_trail_hands_scope_to_employee_list() {
    // GIVEN a company page for Acme
    let settings = DashboardSettings::default();
    let mut company = CompanyDrilldownPage::new(as_on().with(FilterKey::Company, "Acme"), &settings);
    let mut router = MemoryRouter::new();

    // WHEN the user picks a branch, then a department, then a designation
    assert_eq!(company.select_branch(Some("Riyadh")).unwrap(), DrillStep::Refresh);
    assert_eq!(
        company.select_department("Sales").unwrap(),
        DrillStep::Designations("Sales".into())
    );
    let step = company.select_designation("Sales Manager", &mut router).unwrap();

    // THEN the router lands on the employee list
    assert_eq!(step, DrillStep::Navigated(PageRoute::EmployeeDrilldown));
    let levels: Vec<_> = company.breadcrumb().iter().map(|c| c.level).collect();
    assert_eq!(
        levels,
        [
            DrilldownLevel::Company,
            DrilldownLevel::Branch,
            DrilldownLevel::Department,
            DrilldownLevel::Designation
        ]
    );

    // AND the employee page arrives with the full scope
    let mut employees = EmployeeListPage::new(FilterContext::today(), &settings);
    assert!(employees.arrive(&mut router));
    let ctx = employees.filters().get();
    assert_eq!(ctx.company.as_deref(), Some("Acme"));
    assert_eq!(ctx.branch.as_deref(), Some("Riyadh"));
    assert_eq!(ctx.department.as_deref(), Some("Sales"));
    assert_eq!(ctx.designation.as_deref(), Some("Sales Manager"));

    // AND the company page itself never stored the designation
    assert_eq!(company.filters().get().designation, None);
}

#[test]
fn bdd_scenario_risky_positions_skip_the_department() {
    // GIVEN a company page narrowed to a department
    let settings = DashboardSettings::default();
    let mut company = CompanyDrilldownPage::new(as_on().with(FilterKey::Company, "Acme"), &settings);
    company.select_department("Operations").unwrap();
    let mut router = MemoryRouter::new();

    // WHEN the user opens a risky designation
    let step = company.select_risky("Driver", &mut router).unwrap();
    assert_eq!(step, DrillStep::Navigated(PageRoute::EmployeeDrilldown));

    // THEN the employee list is scoped by designation only
    let payload = router.take_route_options().unwrap();
    assert_eq!(payload.get(FilterKey::Designation), Some("Driver"));
    assert!(!payload.contains(FilterKey::Department));
}

#[test]
fn bdd_scenario_second_handoff_replaces_scope_of_the_first() {
    // GIVEN an employee list reached through Sales > Engineer
    let settings = DashboardSettings::default();
    let mut company = CompanyDrilldownPage::new(as_on().with(FilterKey::Company, "Acme"), &settings);
    let mut router = MemoryRouter::new();
    company.select_department("Sales").unwrap();
    company.select_designation("Engineer", &mut router).unwrap();
    let mut employees = EmployeeListPage::new(FilterContext::today(), &settings);
    assert!(employees.arrive(&mut router));
    employees.set_search("sara");
    assert_eq!(employees.filters().get().department.as_deref(), Some("Sales"));

    // WHEN the user walks back to the company level and opens a risky designation
    company.up();
    company.up();
    company.select_risky("Cashier", &mut router).unwrap();
    assert!(employees.arrive(&mut router));

    // THEN the list is scoped by the new payload alone
    let ctx = employees.filters().get();
    assert_eq!(ctx.company.as_deref(), Some("Acme"));
    assert_eq!(ctx.designation.as_deref(), Some("Cashier"));
    assert_eq!(ctx.department, None);
    assert_eq!(ctx.search_text, None);
    assert_eq!(employees.paging().offset(), 0);
}

#[tokio::test(flavor = "current_thread")]
async fn bdd_scenario_second_subsidiary_does_not_inherit_branch() {
    // GIVEN a company page opened from the holding and narrowed to a branch
    let mut holding = HoldingComparisonPage::new(as_on().with(FilterKey::HoldingCompany, "Group"));
    let service = CannedService::new().respond(
        QueryName::HoldingComparison,
        json!({"rows": [
            {"company": "Acme KSA", "total_employees": 80},
            {"company": "Acme UAE", "total_employees": 40}
        ]}),
    );
    drive(&mut holding, &service).await.unwrap();
    let mut router = MemoryRouter::new();
    holding.open_row(0, &mut router).unwrap();
    let mut company = CompanyDrilldownPage::new(FilterContext::today(), &DashboardSettings::default());
    assert!(company.arrive(&mut router));
    company.select_branch(Some("Riyadh")).unwrap();

    // WHEN the user goes back and opens the other subsidiary
    holding.open_row(1, &mut router).unwrap();
    assert!(company.arrive(&mut router));

    // THEN the company page starts at the top of the new subsidiary
    let ctx = company.filters().get();
    assert_eq!(ctx.company.as_deref(), Some("Acme UAE"));
    assert_eq!(ctx.branch, None);
    assert_eq!(company.breadcrumb().len(), 1);
}

#[tokio::test(flavor = "current_thread")]
async fn bdd_scenario_scorecard_risky_row_opens_employees_of_riskiest_company() {
    // GIVEN a holding scorecard whose riskiest subsidiary is South
    let settings = DashboardSettings::default();
    let mut scorecard = ExecutiveScorecardPage::new(as_on().with(FilterKey::HoldingCompany, "Group"), &settings);
    let service = CannedService::new()
        .respond(
            QueryName::ExecutiveScorecard,
            json!({"holding": {"rows": [
                {"company": "North", "variance_percent": 2.0},
                {"company": "South", "variance_percent": -6.5}
            ]}}),
        )
        .respond(
            QueryName::TopRiskyPositions,
            json!({"company": "South", "items": [{"designation": "Cashier", "variance_percent": -20}]}),
        );

    // WHEN the page refreshes
    assert!(drive(&mut scorecard, &service).await.unwrap());

    // THEN risky positions were fetched for South in a second batch
    assert_eq!(scorecard.risk_company(), Some("South"));
    let calls = service.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].0, QueryName::TopRiskyPositions);
    assert_eq!(calls[1].1["company"], "South");
    assert_eq!(scorecard.risky().data().unwrap().items[0].name(), "Cashier");

    // WHEN the user opens the risky designation
    let mut router = MemoryRouter::new();
    let page = scorecard.open_risky("Cashier", &mut router).unwrap();

    // THEN the employee list receives company and designation
    assert_eq!(page, Some(PageRoute::EmployeeDrilldown));
    let payload = router.take_route_options().unwrap();
    assert_eq!(payload.get(FilterKey::Company), Some("South"));
    assert_eq!(payload.get(FilterKey::Designation), Some("Cashier"));
}

#[tokio::test(flavor = "current_thread")]
async fn bdd_scenario_route_link_tab_carries_filters_to_another_page() {
    // GIVEN an analytics page whose navigation links to the employee list
    let settings = DashboardSettings::default();
    let mut analytics = HrAnalyticsPage::new(
        as_on().with(FilterKey::Company, "Acme"),
        &settings,
        workforce_core::Settings::default().fallback_navigation(),
    );
    let service = CannedService::new().respond(
        QueryName::Navigation,
        json!({"tabs": [
            {"tab_label": "Overview", "tab_type": "Filter Dashboard", "department": "HR"},
            {"tab_label": "GCC Staff", "tab_type": "Route Link", "route": "employee-drilldown",
             "nationality_group": "GCC"}
        ]}),
    );
    analytics.load_session(&service).await;
    let labels: Vec<_> = analytics.tabs().unwrap().labels().collect();
    assert_eq!(labels, ["Overview", "GCC Staff"]);

    // WHEN the user activates the link tab
    let mut router = MemoryRouter::new();
    let outcome = analytics.activate_tab(1, &mut router);

    // THEN the router moves to the employee list and the analytics filters stay put
    assert_eq!(
        outcome,
        TabOutcome::Navigated(RouteTarget::Page(PageRoute::EmployeeDrilldown))
    );
    assert_eq!(analytics.filters().get().nationality_group, None);

    // AND the employee list arrives with the live company plus the tab's group
    let mut employees = EmployeeListPage::new(FilterContext::today(), &settings);
    assert!(employees.arrive(&mut router));
    let ctx = employees.filters().get();
    assert_eq!(ctx.company.as_deref(), Some("Acme"));
    assert_eq!(ctx.nationality_group.as_deref(), Some("GCC"));
}

#[tokio::test(flavor = "current_thread")]
async fn bdd_scenario_filter_tab_refreshes_in_place() {
    // GIVEN an analytics page using the built-in department tabs
    let settings = DashboardSettings::default();
    let mut analytics = HrAnalyticsPage::new(
        as_on().with(FilterKey::Company, "Acme"),
        &settings,
        workforce_core::Settings::default().fallback_navigation(),
    );
    let service = CannedService::new();
    analytics.load_session(&service).await;

    // WHEN the user activates the Sales tab
    let mut router = MemoryRouter::new();
    let outcome = analytics.activate_tab(2, &mut router);

    // THEN the page refreshes with the Sales department and stays put
    assert_eq!(outcome, TabOutcome::Refresh);
    assert_eq!(analytics.tabs().unwrap().active(), Some(2));
    assert_eq!(analytics.filters().get().department.as_deref(), Some("Sales"));
    assert!(router.history().is_empty());

    drive(&mut analytics, &service).await.unwrap();
    let kpi_call = service
        .calls()
        .into_iter()
        .find(|(n, _)| *n == QueryName::Kpis)
        .unwrap();
    assert_eq!(kpi_call.1["department"], "Sales");
}
