//! Workforce CLI commands.
//!
//! Every command runs against any service that answers the dashboard's
//! queries: the HTTP method client or the seeded sample backend.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use workforce_core::payload::{BreakdownRow, Snapshot};
use workforce_core::settings::DEFAULT_SETTINGS_FILE;
use workforce_core::{
    build_url, EmployeeType, FilterContext, FilterKey, FilterPatch, MemoryRouter, PageRoute,
    RouteTarget, Settings, TabAction, GUIDE,
};
use workforce_runner::{
    drive, drive_batch, CompanyDrilldownPage, DashboardPage, EmployeeListPage, ExportService,
    NavigationService, QueryService, SaudizationTrendsPage, SessionCache, ThemeService,
};

#[derive(Parser, Debug)]
#[command(
    name = "workforce",
    about = "Workforce CLI: Saudization dashboards from the terminal"
)]
pub struct Cli {
    /// Settings file.
    #[arg(long, default_value = DEFAULT_SETTINGS_FILE, global = true)]
    pub settings: PathBuf,

    /// Use the seeded offline dataset instead of the HTTP service.
    #[arg(long, default_value_t = false, global = true)]
    pub sample: bool,

    /// Where the sample backend writes exports.
    #[arg(long, default_value = "exports", global = true)]
    pub export_dir: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

/// Filters shared by the data commands.
#[derive(Args, Debug, Clone, Default)]
pub struct Scope {
    #[arg(long)]
    pub company: Option<String>,

    #[arg(long)]
    pub holding: Option<String>,

    #[arg(long)]
    pub branch: Option<String>,

    /// Snapshot date (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

impl Scope {
    pub fn context(&self) -> FilterContext {
        let mut ctx = match self.date {
            Some(date) => FilterContext::as_on(date),
            None => FilterContext::today(),
        };
        ctx.merge(
            &FilterPatch::new()
                .set_opt(FilterKey::Company, self.company.as_deref())
                .set_opt(FilterKey::HoldingCompany, self.holding.as_deref())
                .set_opt(FilterKey::Branch, self.branch.as_deref()),
        );
        ctx
    }
}

/// Narrowing of the employee list.
#[derive(Args, Debug, Clone, Default)]
pub struct EmployeeFilter {
    #[arg(long)]
    pub department: Option<String>,

    #[arg(long)]
    pub designation: Option<String>,

    /// Name or employee number.
    #[arg(long)]
    pub search: Option<String>,

    /// all, saudi or non-saudi.
    #[arg(long = "type", default_value = "all")]
    pub employee_type: EmployeeType,
}

impl EmployeeFilter {
    fn patch(&self) -> FilterPatch {
        FilterPatch::new()
            .set_opt(FilterKey::Department, self.department.as_deref())
            .set_opt(FilterKey::Designation, self.designation.as_deref())
            .set_opt(FilterKey::SearchText, self.search.as_deref())
            .employee_type(self.employee_type)
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load the navigation tabs and report any rejected row.
    Tabs {
        /// Print the validated config as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Company drilldown: snapshot, branches, departments, risky positions.
    Drill {
        #[command(flatten)]
        scope: Scope,

        /// Open the designation breakdown of this department.
        #[arg(long)]
        department: Option<String>,

        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// One page of the employee list.
    Employees {
        #[command(flatten)]
        scope: Scope,

        #[command(flatten)]
        filter: EmployeeFilter,

        /// 1-based page number.
        #[arg(long, default_value_t = 1)]
        page: usize,

        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Export the employee list as CSV and print the file reference.
    Export {
        #[command(flatten)]
        scope: Scope,

        #[command(flatten)]
        filter: EmployeeFilter,
    },
    /// Month-end Saudization trend for a holding or a company.
    Trends {
        #[command(flatten)]
        scope: Scope,

        /// Months of history, ending with the as-on month.
        #[arg(long)]
        months: Option<u32>,

        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print the indicator definitions and setup notes.
    Guide {
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Resolve what activating a navigation tab does.
    Url {
        /// Tab label as configured.
        label: String,

        #[command(flatten)]
        scope: Scope,
    },
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Tabs { .. } => "tabs",
            Commands::Drill { .. } => "drill",
            Commands::Employees { .. } => "employees",
            Commands::Export { .. } => "export",
            Commands::Trends { .. } => "trends",
            Commands::Guide { .. } => "guide",
            Commands::Url { .. } => "url",
        }
    }
}

/// Run one command, writing its report to `out`.
pub async fn execute<S>(
    command: &Commands,
    settings: &Settings,
    service: &S,
    out: &mut dyn Write,
) -> Result<()>
where
    S: QueryService + ExportService + NavigationService + ThemeService,
{
    tracing::debug!(command = command.name(), "running command");
    match command {
        Commands::Tabs { json } => run_tabs(settings, service, *json, out).await,
        Commands::Drill {
            scope,
            department,
            json,
        } => run_drill(settings, service, scope, department.as_deref(), *json, out).await,
        Commands::Employees {
            scope,
            filter,
            page,
            json,
        } => run_employees(settings, service, scope, filter, *page, *json, out).await,
        Commands::Export { scope, filter } => {
            run_export(settings, service, scope, filter, out).await
        }
        Commands::Trends {
            scope,
            months,
            json,
        } => run_trends(settings, service, scope, *months, *json, out).await,
        Commands::Guide { json } => run_guide(*json, out),
        Commands::Url { label, scope } => run_url(settings, service, label, scope, out).await,
    }
}

async fn run_tabs<S>(settings: &Settings, service: &S, json: bool, out: &mut dyn Write) -> Result<()>
where
    S: NavigationService + ThemeService,
{
    let mut session = SessionCache::new(settings.fallback_navigation());
    session.ensure(service).await;
    let Some(loaded) = session.loaded_navigation() else {
        bail!("no navigation configuration available");
    };
    let config = &loaded.config;
    tracing::info!(
        usable = config.tabs.len(),
        rejected = loaded.rejected.len(),
        visible = config.visible(),
        "navigation loaded"
    );

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(config)?)?;
    } else {
        writeln!(
            out,
            "Tabs {} ({} usable, {} rejected)",
            if config.visible() { "enabled" } else { "hidden" },
            config.tabs.len(),
            loaded.rejected.len()
        )?;
        let default = config.default_index();
        for (i, tab) in config.tabs.iter().enumerate() {
            writeln!(
                out,
                "{} {:>4}  {:<28} {}",
                if default == Some(i) { "*" } else { " " },
                tab.order,
                tab.label,
                tab.kind.label()
            )?;
        }
    }
    for err in &loaded.rejected {
        writeln!(out, "rejected: {err}")?;
    }
    if !loaded.rejected.is_empty() {
        bail!("{} navigation row(s) rejected", loaded.rejected.len());
    }
    Ok(())
}

async fn run_drill<S: QueryService>(
    settings: &Settings,
    service: &S,
    scope: &Scope,
    department: Option<&str>,
    json: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let mut page = CompanyDrilldownPage::new(scope.context(), &settings.dashboard);
    drive(&mut page, service).await?;
    if let Some(department) = department {
        let step = page.select_department(department)?;
        if let Some(batch) = page.plan(&step)? {
            drive_batch(&mut page, batch, service).await;
        }
    }
    if let Some(notice) = page.notice() {
        bail!("{notice}");
    }
    let Some(view) = page.view().data() else {
        bail!("company drilldown returned nothing");
    };
    tracing::info!(
        depth = page.breadcrumb().len(),
        branches = view.drilldown.branches.len(),
        departments = view.drilldown.departments.len(),
        risky = view.risky.items.len(),
        "drilldown loaded"
    );

    if json {
        let mut value = serde_json::json!({
            "drilldown": view.drilldown,
            "risky_positions": view.risky,
        });
        if let Some(designations) = page.designations().data() {
            value["designations"] = serde_json::to_value(designations)?;
        }
        writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
        return Ok(());
    }

    let crumbs: Vec<String> = page.breadcrumb().iter().map(|c| c.display()).collect();
    writeln!(out, "{}", crumbs.join(" > "))?;
    write_snapshot(out, &view.drilldown.overall())?;
    write_rows(out, "Branch", &view.drilldown.branches)?;
    write_rows(out, "Department", &view.drilldown.departments)?;
    if let Some(designations) = page.designations().data() {
        write_rows(out, "Designation", &designations.designations)?;
    }
    write_rows(out, "Risky position", &view.risky.items)?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn run_employees<S: QueryService>(
    settings: &Settings,
    service: &S,
    scope: &Scope,
    filter: &EmployeeFilter,
    page_number: usize,
    json: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let mut page = EmployeeListPage::new(scope.context(), &settings.dashboard);
    page.update_filters(filter.patch());
    drive(&mut page, service).await?;
    for _ in 1..page_number.max(1) {
        match page.next_page() {
            Some(batch) => {
                drive_batch(&mut page, batch?, service).await;
            }
            None => break,
        }
    }
    if let Some(notice) = page.notice() {
        bail!("{notice}");
    }
    let Some(list) = page.view().data() else {
        bail!("employee list returned nothing");
    };
    tracing::info!(
        offset = page.paging().offset(),
        rows = list.rows.len(),
        total = list.total,
        "employee page loaded"
    );

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(list)?)?;
        return Ok(());
    }

    if let Some(text) = page.placeholder() {
        writeln!(out, "{text}")?;
    }
    for row in &list.rows {
        writeln!(
            out,
            "{:<10} {:<24} {:<10} {:<22} {:<22} {:<9} {}",
            row.employee,
            row.employee_name.as_deref().unwrap_or("-"),
            row.branch.as_deref().unwrap_or("-"),
            row.department.as_deref().unwrap_or("-"),
            row.designation.as_deref().unwrap_or("-"),
            row.type_label(),
            row.date_of_joining.as_deref().unwrap_or("-"),
        )?;
    }
    writeln!(out, "{}", page.paging().summary())?;
    Ok(())
}

async fn run_export<S: ExportService>(
    settings: &Settings,
    service: &S,
    scope: &Scope,
    filter: &EmployeeFilter,
    out: &mut dyn Write,
) -> Result<()> {
    let mut page = EmployeeListPage::new(scope.context(), &settings.dashboard);
    page.update_filters(filter.patch());
    let mut router = MemoryRouter::new();
    let url = page
        .export(service, &mut router)
        .await
        .context("export failed")?;
    tracing::info!(%url, "export written");
    writeln!(out, "{url}")?;
    Ok(())
}

async fn run_trends<S: QueryService>(
    settings: &Settings,
    service: &S,
    scope: &Scope,
    months: Option<u32>,
    json: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let mut page = SaudizationTrendsPage::new(scope.context(), &settings.dashboard);
    if let Some(months) = months {
        page.set_months_back(months);
    }
    drive(&mut page, service).await?;
    if let Some(notice) = page.notice() {
        bail!("{notice}");
    }
    let Some(trend) = page.view().data() else {
        bail!("trend data returned nothing");
    };
    tracing::info!(
        months = trend.overall.labels.len(),
        branches = trend.branch_level.datasets.len(),
        "trend loaded"
    );

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(trend)?)?;
        return Ok(());
    }

    writeln!(
        out,
        "{:<8} {:>7} {:>7} {:>7} {:>7} {:>9}",
        "Month", "Actual", "Target", "Var", "Saudi", "Non-Saudi"
    )?;
    for pt in trend.overall.points() {
        writeln!(
            out,
            "{:<8} {:>7} {:>7} {:>7} {:>7} {:>9}",
            pt.label,
            percent(Some(pt.actual)),
            percent(Some(pt.target)),
            signed(Some(pt.actual - pt.target)),
            pt.saudi,
            pt.non_saudi,
        )?;
    }
    writeln!(out)?;
    match page.branch_placeholder() {
        Some(text) => writeln!(out, "{text}")?,
        None => {
            writeln!(out, "{:<28} {:>7} {:>7}", "Branch", "Latest", "Change")?;
            for dataset in &trend.branch_level.datasets {
                let first = dataset.values.first().copied();
                let last = dataset.values.last().copied();
                writeln!(
                    out,
                    "{:<28} {:>7} {:>7}",
                    dataset.name,
                    percent(last),
                    signed(first.zip(last).map(|(a, b)| b - a)),
                )?;
            }
        }
    }
    Ok(())
}

fn run_guide(json: bool, out: &mut dyn Write) -> Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&GUIDE)?)?;
    } else {
        for line in GUIDE.lines() {
            writeln!(out, "{line}")?;
        }
    }
    Ok(())
}

async fn run_url<S>(
    settings: &Settings,
    service: &S,
    label: &str,
    scope: &Scope,
    out: &mut dyn Write,
) -> Result<()>
where
    S: NavigationService + ThemeService,
{
    let mut session = SessionCache::new(settings.fallback_navigation());
    session.ensure(service).await;
    let Some(config) = session.navigation() else {
        bail!("no navigation configuration available");
    };
    let Some(tab) = config.tabs.iter().find(|t| t.label == label) else {
        bail!("no tab labelled {label:?}");
    };

    let ctx = scope.context();
    tracing::debug!(tab = %tab.label, kind = tab.kind.label(), "resolving tab");
    match tab.resolve(&ctx, &settings.dashboard.home())? {
        TabAction::OpenWindow(url) => writeln!(out, "new window {url}")?,
        TabAction::Navigate { target, payload } => {
            let url = build_url(&target.path(), payload.iter().map(|(k, v)| (k.as_str(), v)));
            writeln!(out, "navigate {url}")?;
        }
        // Filter tabs act on the analytics page, the only page that shows them.
        TabAction::ApplyFilters(patch) => {
            let mut merged = ctx.clone();
            merged.merge(&patch);
            let home = RouteTarget::Page(PageRoute::HrAnalytics);
            let url = build_url(
                &home.path(),
                merged.all_pairs().iter().map(|(k, v)| (k.as_str(), v.as_str())),
            );
            writeln!(out, "filter {url}")?;
        }
    }
    Ok(())
}

fn write_snapshot(out: &mut dyn Write, s: &Snapshot) -> Result<()> {
    writeln!(
        out,
        "Employees {}  Saudi {}  Non-Saudi {}  Saudization {}  Target {}  Variance {}  {}",
        s.total_employees,
        s.saudi_employees,
        s.non_saudi_employees,
        percent(s.saudization_percent),
        percent(s.target_percent),
        signed(s.variance_percent),
        s.status().label(),
    )?;
    Ok(())
}

fn write_rows(out: &mut dyn Write, name: &str, rows: &[BreakdownRow]) -> Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "{:<28} {:>6} {:>6} {:>7} {:>7} {:>7}  Status",
        name, "Total", "Saudi", "Actual", "Target", "Var"
    )?;
    for row in rows {
        writeln!(
            out,
            "{:<28} {:>6} {:>6} {:>7} {:>7} {:>7}  {}",
            row.name(),
            row.total_employees,
            row.saudi_employees,
            percent(row.saudization_percent),
            percent(row.target_percent),
            signed(row.variance_percent),
            row.status().label(),
        )?;
    }
    Ok(())
}

fn percent(v: Option<f64>) -> String {
    v.map_or_else(|| "-".to_string(), |v| format!("{v:.1}%"))
}

fn signed(v: Option<f64>) -> String {
    v.map_or_else(|| "-".to_string(), |v| format!("{v:+.1}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn logged_command_names_match_subcommands() {
        for (args, name) in [
            (vec!["workforce", "tabs"], "tabs"),
            (vec!["workforce", "drill"], "drill"),
            (vec!["workforce", "employees"], "employees"),
            (vec!["workforce", "export"], "export"),
            (vec!["workforce", "trends", "--months", "6"], "trends"),
            (vec!["workforce", "guide"], "guide"),
            (vec!["workforce", "url", "Sales"], "url"),
        ] {
            let cli = Cli::try_parse_from(args).unwrap();
            assert_eq!(cli.command.name(), name);
            assert!(Cli::command().find_subcommand(name).is_some());
        }
    }

    #[test]
    fn scope_builds_context() {
        let scope = Scope {
            company: Some("Najd Trading".into()),
            holding: None,
            branch: Some("  ".into()),
            date: NaiveDate::from_ymd_opt(2024, 6, 30),
        };
        let ctx = scope.context();
        assert_eq!(ctx.company.as_deref(), Some("Najd Trading"));
        assert_eq!(ctx.branch, None);
        assert_eq!(ctx.as_on_date, NaiveDate::from_ymd_opt(2024, 6, 30).unwrap());
    }

    #[test]
    fn employee_flags_parse() {
        let cli = Cli::try_parse_from([
            "workforce",
            "--sample",
            "employees",
            "--company",
            "Najd Trading",
            "--type",
            "saudi",
            "--page",
            "2",
        ])
        .unwrap();
        assert!(cli.sample);
        match cli.command {
            Commands::Employees { filter, page, .. } => {
                assert_eq!(filter.employee_type, EmployeeType::SaudiOnly);
                assert_eq!(page, 2);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
