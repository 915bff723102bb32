//! BDD tests for the CLI commands against the offline dataset.
//!
//! These scenarios cover:
//! - Tabs fall back to the local configuration and report rejected rows
//! - Drill prints the breakdowns and opens a department in place
//! - Employees prints the paging summary; export writes the CSV file
//! - Url resolves filter tabs and report links
//! - Trends prints one row per month; guide prints the indicator notes

use chrono::NaiveDate;
use clap::Parser;
use workforce_cli::{execute, Cli};
use workforce_core::Settings;
use workforce_runner::export::export_file_name;
use workforce_runner::SampleBackend;

const COMPANY: &str = "Najd Trading";

fn as_on() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
}

async fn run(settings: &Settings, backend: &SampleBackend, args: &[&str]) -> (anyhow::Result<()>, String) {
    let cli = Cli::try_parse_from(std::iter::once("workforce").chain(args.iter().copied())).unwrap();
    let mut out = Vec::new();
    let result = execute(&cli.command, settings, backend, &mut out).await;
    (result, String::from_utf8(out).unwrap())
}

fn backend(dir: &tempfile::TempDir) -> SampleBackend {
    SampleBackend::new(dir.path()).with_today(as_on())
}

#[tokio::test(flavor = "current_thread")]
async fn bdd_scenario_tabs_fall_back_to_builtin_navigation() {
    // GIVEN a backend that serves no navigation
    let dir = tempfile::tempdir().unwrap();
    let backend = backend(&dir);

    // WHEN the tabs are listed
    let (result, out) = run(&Settings::default(), &backend, &["tabs"]).await;

    // THEN the three department tabs shipped with the dashboard are shown
    result.unwrap();
    assert!(out.contains("Tabs enabled (3 usable, 0 rejected)"), "{out}");
    assert!(out.contains("Research & Development"));
}

#[tokio::test(flavor = "current_thread")]
async fn bdd_scenario_tabs_report_rejected_rows() {
    // GIVEN a local navigation config with one unknown tab type
    let settings = Settings::from_toml_str(
        r#"
        [navigation]
        enable_tabs = 1

        [[navigation.tabs]]
        tab_label = "Sales"
        department = "Sales"

        [[navigation.tabs]]
        tab_label = "Mystery"
        tab_type = "Carousel"
        "#,
    )
    .unwrap();
    let dir = tempfile::tempdir().unwrap();

    // WHEN the tabs are validated
    let (result, out) = run(&settings, &backend(&dir), &["tabs"]).await;

    // THEN the usable tab is listed and the command fails on the rejected one
    assert!(out.contains("Sales"));
    assert!(out.contains("rejected:"), "{out}");
    assert!(result.is_err());
}

#[tokio::test(flavor = "current_thread")]
async fn bdd_scenario_drill_opens_department_in_place() {
    // GIVEN a company of the sample holding
    let dir = tempfile::tempdir().unwrap();
    let backend = backend(&dir);

    // WHEN the drilldown is asked for one department
    let (result, out) = run(
        &Settings::default(),
        &backend,
        &["drill", "--company", COMPANY, "--date", "2024-06-30", "--department", "Sales"],
    )
    .await;

    // THEN the breadcrumb ends at the department and its designations follow
    result.unwrap();
    let first = out.lines().next().unwrap_or_default();
    assert_eq!(first, format!("{COMPANY} > All branches > Sales"));
    assert!(out.contains("Branch "));
    assert!(out.contains("Designation "));
    assert!(out.contains("Risky position "));
}

#[tokio::test(flavor = "current_thread")]
async fn bdd_scenario_drill_without_company_is_rejected() {
    // GIVEN no company
    let dir = tempfile::tempdir().unwrap();

    // WHEN the drilldown runs
    let (result, _) = run(&Settings::default(), &backend(&dir), &["drill"]).await;

    // THEN the missing filter is reported before any query
    let err = result.unwrap_err().to_string();
    assert!(err.contains("Company"), "{err}");
}

#[tokio::test(flavor = "current_thread")]
async fn bdd_scenario_employees_print_paging_summary() {
    // GIVEN a company of the sample holding
    let dir = tempfile::tempdir().unwrap();

    // WHEN the first page of employees is listed
    let (result, out) = run(
        &Settings::default(),
        &backend(&dir),
        &["employees", "--company", COMPANY, "--date", "2024-06-30"],
    )
    .await;

    // THEN the last line is the paging summary
    result.unwrap();
    let last = out.lines().last().unwrap_or_default();
    assert!(last.starts_with("Showing 1 - "), "{last}");
}

#[tokio::test(flavor = "current_thread")]
async fn bdd_scenario_export_writes_named_csv() {
    // GIVEN an export directory
    let dir = tempfile::tempdir().unwrap();

    // WHEN the employee list is exported
    let (result, out) = run(
        &Settings::default(),
        &backend(&dir),
        &["export", "--company", COMPANY, "--date", "2024-06-30", "--type", "saudi"],
    )
    .await;

    // THEN the printed reference points at the generated file
    result.unwrap();
    let url = out.trim();
    let path = url.strip_prefix("file://").unwrap();
    assert!(path.ends_with(&export_file_name(COMPANY, as_on())), "{path}");
    assert!(std::path::Path::new(path).exists());
}

#[tokio::test(flavor = "current_thread")]
async fn bdd_scenario_url_resolves_filter_tab() {
    // GIVEN the builtin department tabs
    let dir = tempfile::tempdir().unwrap();

    // WHEN the Sales tab is resolved for a company
    let (result, out) = run(
        &Settings::default(),
        &backend(&dir),
        &["url", "Sales", "--company", COMPANY],
    )
    .await;

    // THEN it filters the analytics page by department
    result.unwrap();
    assert!(out.starts_with("filter /app/"), "{out}");
    assert!(out.contains("department=Sales"));
    assert!(out.contains("company=Najd%20Trading"));
}

#[tokio::test(flavor = "current_thread")]
async fn bdd_scenario_url_resolves_report_link_in_new_window() {
    // GIVEN a report tab that opens in a new window
    let settings = Settings::from_toml_str(
        r#"
        [[navigation.tabs]]
        tab_label = "Report"
        tab_type = "Report Link"
        report_name = "Saudization Report"
        open_in_new_window = 1
        "#,
    )
    .unwrap();
    let dir = tempfile::tempdir().unwrap();

    // WHEN the tab is resolved
    let (result, out) = run(&settings, &backend(&dir), &["url", "Report", "--company", COMPANY]).await;

    // THEN the URL names the escaped report and carries the company
    result.unwrap();
    assert!(
        out.starts_with("new window /app/query-report/Saudization%20Report?"),
        "{out}"
    );
    assert!(out.contains("company=Najd%20Trading"));
}

#[tokio::test(flavor = "current_thread")]
async fn bdd_scenario_unknown_tab_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let (result, _) = run(&Settings::default(), &backend(&dir), &["url", "Payroll"]).await;
    assert!(result.unwrap_err().to_string().contains("Payroll"));
}

#[tokio::test(flavor = "current_thread")]
async fn bdd_scenario_trends_list_months_and_branches() {
    // GIVEN a company of the sample holding
    let dir = tempfile::tempdir().unwrap();

    // WHEN three months of trend are asked for
    let (result, out) = run(
        &Settings::default(),
        &backend(&dir),
        &["trends", "--company", COMPANY, "--date", "2024-06-30", "--months", "3"],
    )
    .await;

    // THEN the months run oldest first and the branch table follows
    result.unwrap();
    let months: Vec<&str> = out
        .lines()
        .skip(1)
        .take(3)
        .filter_map(|l| l.split_whitespace().next())
        .collect();
    assert_eq!(months, vec!["2024-04", "2024-05", "2024-06"]);
    assert!(out.contains("Riyadh"), "{out}");
}

#[tokio::test(flavor = "current_thread")]
async fn bdd_scenario_holding_trends_ask_for_company_branches() {
    // GIVEN only the holding
    let dir = tempfile::tempdir().unwrap();

    // WHEN the trend runs
    let (result, out) = run(
        &Settings::default(),
        &backend(&dir),
        &["trends", "--holding", workforce_runner::sample::HOLDING, "--date", "2024-06-30"],
    )
    .await;

    // THEN the branch section is replaced by the company prompt
    result.unwrap();
    assert!(out.contains(workforce_runner::pages::trends::BRANCH_PLACEHOLDER), "{out}");
}

#[tokio::test(flavor = "current_thread")]
async fn bdd_scenario_guide_prints_definitions() {
    // GIVEN any backend
    let dir = tempfile::tempdir().unwrap();

    // WHEN the guide is printed
    let (result, out) = run(&Settings::default(), &backend(&dir), &["guide"]).await;

    // THEN the variance definition and the access note are present
    result.unwrap();
    assert!(out.contains("Variance: Actual % minus target %."), "{out}");
    assert!(out.trim_end().ends_with("Access: HR Manager or System Manager"));
}
