//! Deterministic offline dataset.
//!
//! A seeded population of employees across one holding's companies,
//! aggregated in memory to answer every dashboard query. Each
//! `(company, branch, department)` cell draws from its own sub-seed, so
//! the population does not depend on generation order.

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{Datelike, Duration, Local, Months, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{json, Value};
use workforce_core::payload::{EmployeeRow, ExportReceipt, RagStatus};
use workforce_core::{ExportArgs, FetchError, QueryArgs, QueryName, ThemeTokens};

use crate::export;
use crate::service::{ExportService, NavigationService, QueryService, ThemeService};

pub const DEFAULT_SEED: u64 = 42;
pub const HOLDING: &str = "Sample Holding";

/// Companies of the holding with their Saudization targets.
const COMPANIES: [(&str, f64); 3] = [
    ("Najd Trading", 35.0),
    ("Hejaz Logistics", 30.0),
    ("Eastern Foods", 40.0),
];

const BRANCHES: [&str; 3] = ["Riyadh", "Jeddah", "Dammam"];

/// Branch series shown on the trends page.
const TOP_BRANCHES: usize = 6;

const DEPARTMENTS: [(&str, [&str; 3]); 5] = [
    ("Human Resources", ["HR Officer", "Recruiter", "HR Manager"]),
    (
        "Research & Development",
        ["Developer", "Data Analyst", "Engineering Manager"],
    ),
    ("Sales", ["Sales Representative", "Account Manager", "Sales Manager"]),
    ("Finance", ["Accountant", "Financial Analyst", "Finance Manager"]),
    ("Operations", ["Driver", "Storekeeper", "Operations Supervisor"]),
];

const FOREIGN: [(&str, &[&str]); 4] = [
    ("GCC", &["Bahraini", "Emirati", "Kuwaiti"]),
    ("Arab", &["Egyptian", "Jordanian", "Sudanese"]),
    ("Asian", &["Indian", "Pakistani", "Filipino"]),
    ("Western", &["British", "American"]),
];

const GIVEN: [&str; 12] = [
    "Abdullah", "Sara", "Faisal", "Noura", "Omar", "Layla", "Khalid", "Reem", "Yousef", "Huda",
    "Ravi", "Maria",
];
const FAMILY: [&str; 10] = [
    "Al-Harbi", "Al-Qahtani", "Al-Otaibi", "Haddad", "Mansour", "Khan", "Santos", "Nasser",
    "Al-Zahrani", "Farouk",
];

/// Upper bounds of the salary bands, in SAR.
const SALARY_BANDS: [(&str, f64); 4] = [
    ("Below 5,000", 5_000.0),
    ("5,000 - 10,000", 10_000.0),
    ("10,000 - 20,000", 20_000.0),
    ("20,000+", f64::INFINITY),
];

#[derive(Debug, Clone)]
struct Employee {
    id: String,
    number: String,
    name: String,
    company: &'static str,
    branch: &'static str,
    department: &'static str,
    designation: &'static str,
    is_saudi: bool,
    nationality: &'static str,
    group: &'static str,
    salary: f64,
    joined: NaiveDate,
}

impl Employee {
    fn salary_band(&self) -> &'static str {
        SALARY_BANDS
            .iter()
            .find(|(_, upper)| self.salary < *upper)
            .map_or("20,000+", |(label, _)| *label)
    }

    fn row(&self) -> EmployeeRow {
        EmployeeRow {
            employee: self.id.clone(),
            employee_name: Some(self.name.clone()),
            employee_number: Some(self.number.clone()),
            branch: Some(self.branch.to_string()),
            department: Some(self.department.to_string()),
            designation: Some(self.designation.to_string()),
            is_saudi: self.is_saudi,
            nationality: Some(self.nationality.to_string()),
            nationality_group: Some(self.group.to_string()),
            date_of_joining: Some(self.joined.format("%Y-%m-%d").to_string()),
        }
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    total: u64,
    saudi: u64,
}

impl Tally {
    fn of<'a>(rows: impl IntoIterator<Item = &'a Employee>) -> Self {
        let mut t = Tally::default();
        for e in rows {
            t.add(e);
        }
        t
    }

    fn add(&mut self, e: &Employee) {
        self.total += 1;
        if e.is_saudi {
            self.saudi += 1;
        }
    }

    fn percent(self) -> Option<f64> {
        (self.total > 0).then(|| round1(100.0 * self.saudi as f64 / self.total as f64))
    }

    fn variance(self, target: f64) -> Option<f64> {
        self.percent().map(|p| round1(p - target))
    }

    fn row(self, key: &str, label: &str, target: f64) -> Value {
        let variance = self.variance(target);
        let mut row = json!({
            "total_employees": self.total,
            "saudi_employees": self.saudi,
            "non_saudi_employees": self.total - self.saudi,
            "saudization_percent": self.percent(),
            "target_percent": target,
            "variance_percent": variance,
            "status": RagStatus::from_variance(variance),
        });
        row[key] = Value::from(label);
        row
    }
}

fn group_by<K: Ord>(rows: &[&Employee], key: impl Fn(&Employee) -> K) -> BTreeMap<K, Tally> {
    let mut groups: BTreeMap<K, Tally> = BTreeMap::new();
    for e in rows {
        groups.entry(key(e)).or_default().add(e);
    }
    groups
}

/// Saudi and non-Saudi headcount per label.
fn split_chart(groups: &BTreeMap<&'static str, Tally>) -> Value {
    json!({
        "labels": groups.keys().collect::<Vec<_>>(),
        "datasets": [
            {"name": "Saudi", "values": groups.values().map(|t| t.saudi).collect::<Vec<_>>()},
            {"name": "Non-Saudi", "values": groups.values().map(|t| t.total - t.saudi).collect::<Vec<_>>()},
        ],
    })
}

fn count_arg(args: &QueryArgs, key: &str, default: u64) -> u64 {
    args.get(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn month_end(date: NaiveDate) -> NaiveDate {
    let first = date.with_day(1).unwrap_or(date);
    first
        .checked_add_months(Months::new(1))
        .and_then(|d| d.pred_opt())
        .unwrap_or(date)
}

fn rejected(name: QueryName, message: &str) -> FetchError {
    FetchError::Rejected {
        method: name.method().to_string(),
        message: message.to_string(),
    }
}

/// In-memory backend answering every query from a seeded population.
pub struct SampleBackend {
    employees: Vec<Employee>,
    today: NaiveDate,
    export_dir: PathBuf,
}

impl SampleBackend {
    pub fn new(export_dir: impl Into<PathBuf>) -> Self {
        Self::with_seed(DEFAULT_SEED, export_dir)
    }

    pub fn with_seed(seed: u64, export_dir: impl Into<PathBuf>) -> Self {
        let mut employees = Vec::new();
        for (company, _) in COMPANIES {
            for branch in BRANCHES {
                for (department, designations) in DEPARTMENTS {
                    let mut rng = Self::rng_for(seed, company, branch, department);
                    Self::populate(&mut rng, &mut employees, company, branch, department, &designations);
                }
            }
        }
        for (i, e) in employees.iter_mut().enumerate() {
            e.id = format!("HR-EMP-{:05}", i + 1);
            e.number = format!("E{:05}", i + 1);
        }
        tracing::debug!(seed, employees = employees.len(), "sample population generated");
        Self {
            employees,
            today: Local::now().date_naive(),
            export_dir: export_dir.into(),
        }
    }

    /// Pin the date used when a query carries no `as_on_date`.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    /// Companies of the sample holding.
    pub fn companies() -> impl Iterator<Item = &'static str> {
        COMPANIES.iter().map(|(c, _)| *c)
    }

    fn sub_seed(seed: u64, company: &str, branch: &str, department: &str) -> u64 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&seed.to_le_bytes());
        for part in [company, branch, department] {
            hasher.update(part.as_bytes());
            hasher.update(&[0]);
        }
        let hash = hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&hash.as_bytes()[..8]);
        u64::from_le_bytes(bytes)
    }

    fn rng_for(seed: u64, company: &str, branch: &str, department: &str) -> StdRng {
        StdRng::seed_from_u64(Self::sub_seed(seed, company, branch, department))
    }

    fn populate(
        rng: &mut StdRng,
        out: &mut Vec<Employee>,
        company: &'static str,
        branch: &'static str,
        department: &'static str,
        designations: &[&'static str; 3],
    ) {
        let epoch = NaiveDate::from_ymd_opt(2016, 1, 1).unwrap_or(NaiveDate::MIN);
        let saudi_rate: f64 = rng.gen_range(0.15..0.6);
        let headcount = rng.gen_range(3..12);
        for _ in 0..headcount {
            let is_saudi = rng.gen_bool(saudi_rate);
            let (group, nationality) = if is_saudi {
                ("Saudi", "Saudi")
            } else {
                let (group, nationalities) = FOREIGN[rng.gen_range(0..FOREIGN.len())];
                (group, nationalities[rng.gen_range(0..nationalities.len())])
            };
            // Managers are rarer than staff.
            let designation = designations[match rng.gen_range(0..10) {
                0..=4 => 0,
                5..=8 => 1,
                _ => 2,
            }];
            let name = format!(
                "{} {}",
                GIVEN[rng.gen_range(0..GIVEN.len())],
                FAMILY[rng.gen_range(0..FAMILY.len())]
            );
            out.push(Employee {
                id: String::new(),
                number: String::new(),
                name,
                company,
                branch,
                department,
                designation,
                is_saudi,
                nationality,
                group,
                salary: (rng.gen_range(3_000.0..30_000.0_f64) / 100.0).round() * 100.0,
                joined: epoch + Duration::days(rng.gen_range(0..3_300)),
            });
        }
    }

    fn target(company: Option<&str>) -> f64 {
        match company.and_then(|c| COMPANIES.iter().find(|(name, _)| *name == c)) {
            Some((_, target)) => *target,
            None => round1(COMPANIES.iter().map(|(_, t)| t).sum::<f64>() / COMPANIES.len() as f64),
        }
    }

    fn as_on(&self, args: &QueryArgs) -> NaiveDate {
        args.get("as_on_date")
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .unwrap_or(self.today)
    }

    /// Employees matching every filter argument present in `args`.
    fn select(&self, args: &QueryArgs) -> Vec<&Employee> {
        let as_on = self.as_on(args);
        let text = |key: &str| args.get(key).map(String::as_str);
        let search = text("search").map(str::to_lowercase);
        self.employees
            .iter()
            .filter(|e| e.joined <= as_on)
            .filter(|_| text("holding_company").map_or(true, |h| h == HOLDING))
            .filter(|e| text("company").map_or(true, |v| v == e.company))
            .filter(|e| text("branch").map_or(true, |v| v == e.branch))
            .filter(|e| text("department").map_or(true, |v| v == e.department))
            .filter(|e| text("designation").map_or(true, |v| v == e.designation))
            .filter(|e| text("nationality_group").map_or(true, |v| v == e.group))
            .filter(|e| match text("is_saudi") {
                Some("1") => e.is_saudi,
                Some("0") => !e.is_saudi,
                _ => true,
            })
            .filter(|e| {
                search.as_deref().map_or(true, |s| {
                    e.name.to_lowercase().contains(s)
                        || e.id.to_lowercase().contains(s)
                        || e.number.to_lowercase().contains(s)
                })
            })
            .collect()
    }

    fn kpis(&self, args: &QueryArgs) -> Value {
        let rows = self.select(args);
        let tally = Tally::of(rows.iter().copied());
        let target = Self::target(args.get("company").map(String::as_str));
        let as_on = self.as_on(args);
        let average = |saudi: bool, f: &dyn Fn(&Employee) -> f64| {
            let values: Vec<f64> = rows.iter().filter(|e| e.is_saudi == saudi).map(|&e| f(e)).collect();
            (!values.is_empty()).then(|| round1(values.iter().sum::<f64>() / values.len() as f64))
        };
        let tenure = |e: &Employee| (as_on - e.joined).num_days() as f64 / 365.25;
        json!({
            "total_employees": tally.total,
            "saudi_employees": tally.saudi,
            "non_saudi_employees": tally.total - tally.saudi,
            "saudization_percent": tally.percent(),
            "avg_salary_saudi": average(true, &|e: &Employee| e.salary),
            "avg_salary_non_saudi": average(false, &|e: &Employee| e.salary),
            "avg_tenure_years_saudi": average(true, &tenure),
            "avg_tenure_years_non_saudi": average(false, &tenure),
            "target_percent": target,
            "variance_percent": tally.variance(target),
        })
    }

    fn nationality(&self, args: &QueryArgs) -> Value {
        let rows = self.select(args);
        let groups = group_by(&rows, |e| e.group);
        Value::Array(
            groups
                .iter()
                .map(|(label, t)| json!({"label": label, "value": t.total}))
                .collect(),
        )
    }

    fn actual_vs_target(&self, args: &QueryArgs) -> Value {
        let tally = Tally::of(self.select(args));
        let target = Self::target(args.get("company").map(String::as_str));
        json!({
            "labels": ["Actual", "Target"],
            "datasets": [{"name": "Saudization %", "values": [tally.percent(), target]}],
            "variance_percent": tally.variance(target),
        })
    }

    fn by_designation(&self, args: &QueryArgs) -> Value {
        let min = count_arg(args, "min_headcount", 0);
        let rows = self.select(args);
        let mut groups = group_by(&rows, |e| e.designation);
        groups.retain(|_, t| t.total >= min);
        split_chart(&groups)
    }

    /// Month ends from `months - 1` months before the as-on month up to it.
    fn month_ends(&self, args: &QueryArgs, months: u32) -> Vec<NaiveDate> {
        let last = month_end(self.as_on(args));
        (0..months.max(1))
            .rev()
            .map(|back| {
                last.checked_sub_months(Months::new(back))
                    .map(month_end)
                    .unwrap_or(last)
            })
            .collect()
    }

    fn trend_points(&self, args: &QueryArgs, months: u32) -> Vec<(String, Option<f64>)> {
        self.month_ends(args, months)
            .into_iter()
            .map(|end| {
                let tally = Tally::of(self.select(args).into_iter().filter(|e| e.joined <= end));
                (end.format("%Y-%m").to_string(), tally.percent())
            })
            .collect()
    }

    /// Month-end snapshots of the scope, with the target weighted by each
    /// company's headcount. Branch series only exist for a single company.
    fn trend_data(&self, args: &QueryArgs) -> Value {
        let months = count_arg(args, "months_back", 24) as u32;
        let ends = self.month_ends(args, months);
        let rows = self.select(args);
        let at = |end: NaiveDate| rows.iter().copied().filter(move |e| e.joined <= end);

        let mut actual = Vec::with_capacity(ends.len());
        let mut target = Vec::with_capacity(ends.len());
        let mut saudi = Vec::with_capacity(ends.len());
        let mut non_saudi = Vec::with_capacity(ends.len());
        for &end in &ends {
            let tally = Tally::of(at(end));
            let per_company = group_by(&at(end).collect::<Vec<_>>(), |e| e.company);
            let (weighted, base) = per_company.iter().fold((0.0, 0u64), |(sum, base), (c, t)| {
                (sum + Self::target(Some(*c)) * t.total as f64, base + t.total)
            });
            actual.push(tally.percent().unwrap_or(0.0));
            target.push(if base > 0 { round1(weighted / base as f64) } else { 0.0 });
            saudi.push(tally.saudi);
            non_saudi.push(tally.total - tally.saudi);
        }
        let labels: Vec<String> = ends.iter().map(|d| d.format("%Y-%m").to_string()).collect();

        let mut datasets = Vec::new();
        if args.contains_key("company") {
            let last = ends.last().copied().unwrap_or(self.today);
            let mut top: Vec<(&str, u64)> = group_by(&at(last).collect::<Vec<_>>(), |e| e.branch)
                .into_iter()
                .map(|(b, t)| (b, t.total))
                .collect();
            top.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
            top.truncate(TOP_BRANCHES);
            for (branch, _) in top {
                let values: Vec<f64> = ends
                    .iter()
                    .map(|&end| {
                        Tally::of(at(end).filter(|e| e.branch == branch))
                            .percent()
                            .unwrap_or(0.0)
                    })
                    .collect();
                datasets.push(json!({"name": branch, "values": values}));
            }
        }

        json!({
            "overall": {
                "labels": labels,
                "actual_values": actual,
                "target_values": target,
                "saudi_counts": saudi,
                "non_saudi_counts": non_saudi,
            },
            "branch_level": {"labels": labels, "datasets": datasets},
        })
    }

    fn trend(&self, args: &QueryArgs) -> Value {
        let months = count_arg(args, "months_back", 24) as u32;
        let target = Self::target(args.get("company").map(String::as_str));
        let points = self.trend_points(args, months);
        json!({
            "labels": points.iter().map(|(l, _)| l).collect::<Vec<_>>(),
            "datasets": [
                {"name": "Saudization %", "values": points.iter().map(|(_, p)| p).collect::<Vec<_>>()},
                {"name": "Target %", "values": vec![target; points.len()]},
            ],
        })
    }

    fn matrix(&self, args: &QueryArgs) -> Value {
        let min = count_arg(args, "min_headcount", 0);
        let target = Self::target(args.get("company").map(String::as_str));
        let rows = self.select(args);
        let groups = group_by(&rows, |e| (e.department, e.designation));
        Value::Array(
            groups
                .iter()
                .filter(|(_, t)| t.total >= min)
                .map(|((department, designation), t)| {
                    json!({
                        "department": department,
                        "designation": designation,
                        "headcount": t.total,
                        "saudization_percent": t.percent(),
                        "target_percent": target,
                        "variance_percent": t.variance(target),
                    })
                })
                .collect(),
        )
    }

    /// Per-company rows of the holding, most at risk first.
    fn company_rows(&self, args: &QueryArgs) -> Vec<(&'static str, Tally, f64)> {
        let mut scope = args.clone();
        scope.remove("company");
        let rows = self.select(&scope);
        let groups = group_by(&rows, |e| e.company);
        let mut out: Vec<_> = groups
            .into_iter()
            .map(|(c, t)| (c, t, Self::target(Some(c))))
            .collect();
        out.sort_by(|a, b| {
            let va = a.1.variance(a.2).unwrap_or(f64::MAX);
            let vb = b.1.variance(b.2).unwrap_or(f64::MAX);
            va.total_cmp(&vb)
        });
        out
    }

    fn holding_comparison(&self, args: &QueryArgs) -> Value {
        let rows = self.company_rows(args);
        json!({
            "rows": rows.iter().map(|(c, t, target)| t.row("company", c, *target)).collect::<Vec<_>>(),
            "chart": {
                "labels": rows.iter().map(|(c, _, _)| c).collect::<Vec<_>>(),
                "actual_values": rows.iter().map(|(_, t, _)| t.percent()).collect::<Vec<_>>(),
                "target_values": rows.iter().map(|(_, _, target)| target).collect::<Vec<_>>(),
            },
        })
    }

    fn company_drilldown(&self, args: &QueryArgs) -> Result<Value, FetchError> {
        let company = args
            .get("company")
            .ok_or_else(|| rejected(QueryName::CompanyDrilldown, "Company is required"))?;
        let target = Self::target(Some(company));
        let rows = self.select(args);
        let row = |(label, t): (&&str, &Tally), key: &str| t.row(key, label, target);
        Ok(json!({
            "company": company,
            "as_on_date": self.as_on(args).format("%Y-%m-%d").to_string(),
            "branch": args.get("branch"),
            "target_percent": target,
            "branches": group_by(&rows, |e| e.branch).iter().map(|g| row(g, "branch")).collect::<Vec<_>>(),
            "departments": group_by(&rows, |e| e.department).iter().map(|g| row(g, "department")).collect::<Vec<_>>(),
        }))
    }

    fn designation_breakdown(&self, args: &QueryArgs) -> Result<Value, FetchError> {
        let (Some(company), Some(department)) = (args.get("company"), args.get("department")) else {
            return Err(rejected(
                QueryName::DesignationBreakdown,
                "Company and Department are required",
            ));
        };
        let target = Self::target(Some(company));
        let rows = self.select(args);
        Ok(json!({
            "company": company,
            "department": department,
            "branch": args.get("branch"),
            "as_on_date": self.as_on(args).format("%Y-%m-%d").to_string(),
            "target_percent": target,
            "designations": group_by(&rows, |e| e.designation)
                .iter()
                .map(|(d, t)| t.row("designation", d, target))
                .collect::<Vec<_>>(),
        }))
    }

    fn risky_positions(&self, args: &QueryArgs) -> Result<Value, FetchError> {
        let company = args
            .get("company")
            .ok_or_else(|| rejected(QueryName::TopRiskyPositions, "Company is required"))?;
        let target = Self::target(Some(company));
        let top_n = count_arg(args, "top_n", 10) as usize;
        let min = count_arg(args, "min_headcount", 0);
        let rows = self.select(args);
        let mut groups: Vec<_> = group_by(&rows, |e| e.designation)
            .into_iter()
            .filter(|(_, t)| t.total >= min)
            .collect();
        groups.sort_by(|a, b| {
            let va = a.1.variance(target).unwrap_or(f64::MAX);
            let vb = b.1.variance(target).unwrap_or(f64::MAX);
            va.total_cmp(&vb).then(b.1.total.cmp(&a.1.total))
        });
        Ok(json!({
            "company": company,
            "branch": args.get("branch"),
            "as_on_date": self.as_on(args).format("%Y-%m-%d").to_string(),
            "target_percent": target,
            "items": groups
                .iter()
                .take(top_n)
                .map(|(d, t)| t.row("designation", d, target))
                .collect::<Vec<_>>(),
        }))
    }

    fn sorted(&self, args: &QueryArgs) -> Vec<&Employee> {
        let mut rows = self.select(args);
        rows.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        rows
    }

    fn employee_list(&self, args: &QueryArgs) -> Value {
        let rows = self.sorted(args);
        let limit = count_arg(args, "limit", u64::MAX) as usize;
        let offset = count_arg(args, "offset", 0) as usize;
        json!({
            "total": rows.len(),
            "rows": rows.iter().skip(offset).take(limit).map(|e| e.row()).collect::<Vec<_>>(),
        })
    }

    fn scorecard(&self, args: &QueryArgs) -> Value {
        let months = count_arg(args, "months_back", 12) as u32;
        let company = args.get("company").map(String::as_str);
        let target = Self::target(company);
        let tally = Tally::of(self.select(args));
        let as_on = self.as_on(args);
        let previous = as_on
            .with_day(1)
            .and_then(|d| d.pred_opt())
            .map(|end| Tally::of(self.select(args).into_iter().filter(|e| e.joined <= end)));
        let mom_change = match (tally.percent(), previous.and_then(Tally::percent)) {
            (Some(now), Some(before)) => Some(round1(now - before)),
            _ => None,
        };
        let variance = tally.variance(target);
        let points = self.trend_points(args, months);
        let companies = self.company_rows(args);
        json!({
            "overall": {
                "total_employees": tally.total,
                "saudi_employees": tally.saudi,
                "non_saudi_employees": tally.total - tally.saudi,
                "saudization_percent": tally.percent(),
                "target_percent": target,
                "variance_percent": variance,
                "status": RagStatus::from_variance(variance),
                "mom_change_percent": mom_change,
            },
            "trend": {
                "labels": points.iter().map(|(l, _)| l).collect::<Vec<_>>(),
                "actual_values": points.iter().map(|(_, p)| p).collect::<Vec<_>>(),
                "target_values": vec![target; points.len()],
            },
            "holding": {
                "labels": companies.iter().map(|(c, _, _)| c).collect::<Vec<_>>(),
                "variance_values": companies.iter().map(|(_, t, tg)| t.variance(*tg)).collect::<Vec<_>>(),
                "rows": companies.iter().map(|(c, t, tg)| t.row("company", c, *tg)).collect::<Vec<_>>(),
            },
        })
    }
}

#[async_trait(?Send)]
impl QueryService for SampleBackend {
    async fn query(&self, name: QueryName, args: QueryArgs) -> Result<Value, FetchError> {
        tracing::trace!(query = %name, ?args, "sample query");
        Ok(match name {
            QueryName::Kpis => self.kpis(&args),
            QueryName::NationalityGroupBreakdown => self.nationality(&args),
            QueryName::ActualVsTargetOverall => self.actual_vs_target(&args),
            QueryName::SaudizationByDesignation => self.by_designation(&args),
            QueryName::SaudizationByDepartment => {
                split_chart(&group_by(&self.select(&args), |e| e.department))
            }
            QueryName::SaudizationBySalaryBand => {
                split_chart(&group_by(&self.select(&args), |e| e.salary_band()))
            }
            QueryName::SaudizationTrend => self.trend(&args),
            QueryName::MatrixWithTargets => self.matrix(&args),
            QueryName::HoldingComparison => self.holding_comparison(&args),
            QueryName::CompanyDrilldown => self.company_drilldown(&args)?,
            QueryName::DesignationBreakdown => self.designation_breakdown(&args)?,
            QueryName::TopRiskyPositions => self.risky_positions(&args)?,
            QueryName::EmployeeList => self.employee_list(&args),
            QueryName::ExecutiveScorecard => self.scorecard(&args),
            QueryName::TrendData => self.trend_data(&args),
            QueryName::Navigation => Value::Null,
            QueryName::Theme => json!({}),
        })
    }
}

#[async_trait(?Send)]
impl ExportService for SampleBackend {
    async fn export(&self, args: ExportArgs) -> Result<ExportReceipt, FetchError> {
        let company = args
            .get("company")
            .ok_or_else(|| FetchError::Rejected {
                method: ExportArgs::METHOD.to_string(),
                message: "Company is required".to_string(),
            })?
            .to_string();
        let rows: Vec<EmployeeRow> = self.sorted(args.as_map()).iter().map(|e| e.row()).collect();
        let as_on = self.as_on(args.as_map());
        let path = export::write_export(&self.export_dir, &company, as_on, &rows).map_err(|e| {
            FetchError::Transport {
                method: ExportArgs::METHOD.to_string(),
                message: e.to_string(),
            }
        })?;
        Ok(ExportReceipt {
            file_url: Some(format!("file://{}", path.display())),
        })
    }
}

#[async_trait(?Send)]
impl NavigationService for SampleBackend {
    /// No server-side navigation; callers fall back to their settings.
    async fn navigation(&self) -> Result<Value, FetchError> {
        Ok(Value::Null)
    }
}

#[async_trait(?Send)]
impl ThemeService for SampleBackend {
    async fn theme(&self) -> Result<ThemeTokens, FetchError> {
        Ok(ThemeTokens::default())
    }
}
