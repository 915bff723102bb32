//! Named queries and their argument maps.
//!
//! Every query is an idempotent read identified by its method name. The
//! arguments are the query's filter scope taken from the live context,
//! plus a few fixed extras (thresholds, paging).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::filter::{FilterContext, FilterKey};
use crate::pagination::PageWindow;

const ANALYTICS_SCOPE: &[FilterKey] = &[
    FilterKey::Company,
    FilterKey::Department,
    FilterKey::Designation,
    FilterKey::NationalityGroup,
];

const EMPLOYEE_SCOPE: &[FilterKey] = &[
    FilterKey::Company,
    FilterKey::AsOnDate,
    FilterKey::Branch,
    FilterKey::Department,
    FilterKey::Designation,
    FilterKey::NationalityGroup,
    FilterKey::EmployeeType,
    FilterKey::SearchText,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum QueryName {
    Kpis,
    NationalityGroupBreakdown,
    ActualVsTargetOverall,
    SaudizationByDesignation,
    SaudizationByDepartment,
    SaudizationBySalaryBand,
    SaudizationTrend,
    MatrixWithTargets,
    HoldingComparison,
    CompanyDrilldown,
    DesignationBreakdown,
    TopRiskyPositions,
    EmployeeList,
    ExecutiveScorecard,
    TrendData,
    Navigation,
    Theme,
}

impl QueryName {
    pub fn method(self) -> &'static str {
        match self {
            QueryName::Kpis => "get_kpis",
            QueryName::NationalityGroupBreakdown => "get_nationality_group_breakdown",
            QueryName::ActualVsTargetOverall => "get_actual_vs_target_overall",
            QueryName::SaudizationByDesignation => "get_saudization_by_designation",
            QueryName::SaudizationByDepartment => "get_saudization_by_department",
            QueryName::SaudizationBySalaryBand => "get_saudization_by_salary_band",
            QueryName::SaudizationTrend => "get_saudization_trend",
            QueryName::MatrixWithTargets => "get_matrix_with_targets",
            QueryName::HoldingComparison => "get_holding_comparison",
            QueryName::CompanyDrilldown => "get_company_drilldown",
            QueryName::DesignationBreakdown => "get_designation_breakdown",
            QueryName::TopRiskyPositions => "get_top_risky_positions",
            QueryName::EmployeeList => "get_employee_list",
            QueryName::ExecutiveScorecard => "get_executive_scorecard",
            QueryName::TrendData => "get_trend_data",
            QueryName::Navigation => "get_navigation",
            QueryName::Theme => "get_theme",
        }
    }

    /// Filter fields this query reads from the live context.
    pub fn scope(self) -> &'static [FilterKey] {
        match self {
            QueryName::Kpis
            | QueryName::NationalityGroupBreakdown
            | QueryName::ActualVsTargetOverall
            | QueryName::SaudizationByDesignation
            | QueryName::SaudizationByDepartment
            | QueryName::SaudizationBySalaryBand
            | QueryName::SaudizationTrend
            | QueryName::MatrixWithTargets => ANALYTICS_SCOPE,
            QueryName::HoldingComparison => &[FilterKey::HoldingCompany, FilterKey::AsOnDate],
            QueryName::CompanyDrilldown | QueryName::TopRiskyPositions => {
                &[FilterKey::Company, FilterKey::AsOnDate, FilterKey::Branch]
            }
            QueryName::DesignationBreakdown => &[
                FilterKey::Company,
                FilterKey::Department,
                FilterKey::AsOnDate,
                FilterKey::Branch,
            ],
            QueryName::EmployeeList => EMPLOYEE_SCOPE,
            QueryName::ExecutiveScorecard | QueryName::TrendData => &[
                FilterKey::HoldingCompany,
                FilterKey::Company,
                FilterKey::Branch,
                FilterKey::AsOnDate,
            ],
            QueryName::Navigation | QueryName::Theme => &[],
        }
    }
}

impl fmt::Display for QueryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method())
    }
}

/// Flat argument map sent with a call. Unset filters are never present.
pub type QueryArgs = BTreeMap<String, String>;

/// A named query plus its fixed extra parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    pub name: QueryName,
    extras: Vec<(&'static str, String)>,
    /// Overrides for scope keys, e.g. a department chosen in place.
    overrides: Vec<(FilterKey, String)>,
}

impl QuerySpec {
    pub fn new(name: QueryName) -> Self {
        Self {
            name,
            extras: Vec::new(),
            overrides: Vec::new(),
        }
    }

    pub fn param(mut self, key: &'static str, value: impl ToString) -> Self {
        self.extras.push((key, value.to_string()));
        self
    }

    /// Pin a scope field to `value` regardless of the live context.
    pub fn with_filter(mut self, key: FilterKey, value: impl Into<String>) -> Self {
        self.overrides.push((key, value.into()));
        self
    }

    pub fn page(self, window: PageWindow) -> Self {
        self.param("limit", window.limit).param("offset", window.offset)
    }

    pub fn args(&self, ctx: &FilterContext) -> QueryArgs {
        let mut args: QueryArgs = ctx
            .pairs(self.name.scope())
            .into_iter()
            .map(|(k, v)| (k.as_str().to_string(), v))
            .collect();
        for (k, v) in &self.overrides {
            if v.trim().is_empty() {
                args.remove(k.as_str());
            } else {
                args.insert(k.as_str().to_string(), v.clone());
            }
        }
        for (k, v) in &self.extras {
            args.insert((*k).to_string(), v.clone());
        }
        args
    }
}

/// Arguments of the bulk export. Built only from the filter context, so
/// paging parameters cannot be carried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExportArgs(QueryArgs);

impl ExportArgs {
    pub const METHOD: &'static str = "export_employee_list_csv";

    pub fn from_filter(ctx: &FilterContext) -> Self {
        Self(
            ctx.pairs(EMPLOYEE_SCOPE)
                .into_iter()
                .map(|(k, v)| (k.as_str().to_string(), v))
                .collect(),
        )
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn as_map(&self) -> &QueryArgs {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::EmployeeType;
    use crate::pagination::PaginationState;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn ctx() -> FilterContext {
        let mut c = FilterContext::as_on(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())
            .with(FilterKey::Company, "Acme")
            .with(FilterKey::Branch, "Riyadh")
            .with(FilterKey::SearchText, "ali");
        c.employee_type = EmployeeType::SaudiOnly;
        c
    }

    #[test]
    fn analytics_queries_send_only_their_scope() {
        let args = QuerySpec::new(QueryName::SaudizationTrend)
            .param("months_back", 24)
            .args(&ctx());
        assert_eq!(args.get("company").map(String::as_str), Some("Acme"));
        assert_eq!(args.get("months_back").map(String::as_str), Some("24"));
        assert!(!args.contains_key("branch"));
        assert!(!args.contains_key("as_on_date"));
    }

    #[test]
    fn employee_page_carries_window_and_type() {
        let mut p = PaginationState::new(50);
        p.show(p.first_window(), 120);
        let window = p.next_window().unwrap();
        let args = QuerySpec::new(QueryName::EmployeeList).page(window).args(&ctx());
        assert_eq!(args["limit"], "50");
        assert_eq!(args["offset"], "50");
        assert_eq!(args["is_saudi"], "1");
        assert_eq!(args["search"], "ali");
        assert_eq!(args["as_on_date"], "2024-02-29");
    }

    #[test]
    fn overrides_pin_scope_fields() {
        let args = QuerySpec::new(QueryName::DesignationBreakdown)
            .with_filter(FilterKey::Department, "Sales")
            .with_filter(FilterKey::Branch, "")
            .args(&ctx());
        assert_eq!(args["department"], "Sales");
        assert!(!args.contains_key("branch"));
    }

    #[test]
    fn export_mirrors_list_filters() {
        let export = ExportArgs::from_filter(&ctx());
        let list = QuerySpec::new(QueryName::EmployeeList).args(&ctx());
        assert_eq!(export.as_map(), &list);
    }

    proptest! {
        #[test]
        fn export_never_has_paging(
            company in "[A-Za-z ]{1,12}",
            search in proptest::option::of("[a-z0-9]{0,8}"),
            dept in proptest::option::of("[A-Za-z]{0,8}"),
        ) {
            let mut c = FilterContext::as_on(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
                .with(FilterKey::Company, company);
            if let Some(s) = search { c = c.with(FilterKey::SearchText, s); }
            if let Some(d) = dept { c = c.with(FilterKey::Department, d); }
            let export = ExportArgs::from_filter(&c);
            prop_assert!(!export.contains("limit"));
            prop_assert!(!export.contains("offset"));
        }
    }
}
