//! Declarative tab configuration.
//!
//! Raw tab rows arrive as loosely typed records (`tab_type` is free text,
//! flags may be `0`/`1`, numbers may be strings). `NavigationConfig::load`
//! turns them into a tagged union once, at load time. A row that cannot
//! be interpreted is reported as a `ConfigError` and dropped on its own;
//! the remaining tabs load normally.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::filter::{FilterContext, FilterKey, FilterPatch};
use crate::route::{build_url, RoutePayload, RouteTarget};

/// Filter fields a link tab forwards to its destination.
pub const LINK_KEYS: [FilterKey; 5] = [
    FilterKey::Company,
    FilterKey::Branch,
    FilterKey::Department,
    FilterKey::Designation,
    FilterKey::NationalityGroup,
];

/// Problems found in tab configuration. Never fatal to the page.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("tab #{index} has no label")]
    MissingLabel { index: usize },

    #[error("tab '{label}' has unknown type '{tab_type}'")]
    UnknownTabType { label: String, tab_type: String },

    #[error("This tab is configured as a Report Link but no report is set.")]
    MissingReport { label: String },
}

/// Scalar that tolerates the shapes config sources actually send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Lenient {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Lenient {
    pub fn truthy(&self) -> bool {
        match self {
            Lenient::Bool(b) => *b,
            Lenient::Int(i) => *i != 0,
            Lenient::Float(f) => *f != 0.0,
            Lenient::Text(s) => {
                let s = s.trim();
                !(s.is_empty() || s == "0" || s.eq_ignore_ascii_case("false"))
            }
        }
    }

    pub fn as_i64(&self) -> i64 {
        match self {
            Lenient::Bool(b) => i64::from(*b),
            Lenient::Int(i) => *i,
            Lenient::Float(f) => *f as i64,
            Lenient::Text(s) => s.trim().parse().unwrap_or(0),
        }
    }
}

/// One tab row as delivered by the navigation source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawTab {
    pub tab_label: Option<String>,
    pub tab_type: Option<String>,
    pub route: Option<String>,
    pub report_name: Option<String>,
    pub company: Option<String>,
    pub branch: Option<String>,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub nationality_group: Option<String>,
    pub open_in_new_window: Option<Lenient>,
    pub order: Option<Lenient>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawNavigationConfig {
    pub enable_tabs: Option<Lenient>,
    pub default_tab: Option<String>,
    pub tabs: Vec<RawTab>,
}

/// Filter fields a tab may carry. Absent fields leave the live context alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabFields {
    pub company: Option<String>,
    pub branch: Option<String>,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub nationality_group: Option<String>,
}

impl TabFields {
    fn get(&self, key: FilterKey) -> Option<&str> {
        let v = match key {
            FilterKey::Company => &self.company,
            FilterKey::Branch => &self.branch,
            FilterKey::Department => &self.department,
            FilterKey::Designation => &self.designation,
            FilterKey::NationalityGroup => &self.nationality_group,
            _ => return None,
        };
        v.as_deref().filter(|s| !s.trim().is_empty())
    }

    /// Patch holding only the fields present on the tab.
    pub fn to_patch(&self) -> FilterPatch {
        LINK_KEYS
            .iter()
            .fold(FilterPatch::new(), |p, k| p.set_opt(*k, self.get(*k)))
    }

    /// Link parameters: tab fields win over the current context.
    pub fn merged_over(&self, ctx: &FilterContext) -> Vec<(FilterKey, String)> {
        LINK_KEYS
            .iter()
            .filter_map(|k| {
                self.get(*k)
                    .map(str::to_string)
                    .or_else(|| ctx.value(*k))
                    .map(|v| (*k, v))
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TabKind {
    FilterDashboard,
    RouteLink {
        route: Option<String>,
        new_window: bool,
    },
    ReportLink {
        report: Option<String>,
        new_window: bool,
    },
}

impl TabKind {
    pub fn label(&self) -> &'static str {
        match self {
            TabKind::FilterDashboard => "Filter Dashboard",
            TabKind::RouteLink { .. } => "Route Link",
            TabKind::ReportLink { .. } => "Report Link",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabDescriptor {
    pub label: String,
    pub kind: TabKind,
    pub fields: TabFields,
    pub order: i64,
}

/// What activating a tab should do, before any side effect happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabAction {
    /// Merge into the live filters and refresh the current view.
    ApplyFilters(FilterPatch),
    /// Open a URL in a new browsing context.
    OpenWindow(String),
    /// Change the in-app route, handing over a one-shot payload.
    Navigate {
        target: RouteTarget,
        payload: RoutePayload,
    },
}

impl TabDescriptor {
    /// Resolve the action for this tab against the live context.
    ///
    /// `home` is the route used when a route link has none configured.
    pub fn resolve(&self, ctx: &FilterContext, home: &RouteTarget) -> Result<TabAction, ConfigError> {
        let (target, new_window) = match &self.kind {
            TabKind::FilterDashboard => return Ok(TabAction::ApplyFilters(self.fields.to_patch())),
            TabKind::RouteLink { route, new_window } => {
                let target = match route.as_deref().map(str::trim) {
                    Some(r) if !r.is_empty() => RouteTarget::from_route(r),
                    _ => home.clone(),
                };
                (target, *new_window)
            }
            TabKind::ReportLink { report, new_window } => {
                let report = report
                    .as_deref()
                    .map(str::trim)
                    .filter(|r| !r.is_empty())
                    .ok_or_else(|| ConfigError::MissingReport {
                        label: self.label.clone(),
                    })?;
                (RouteTarget::Report(report.to_string()), *new_window)
            }
        };

        let params = self.fields.merged_over(ctx);
        if new_window {
            let url = build_url(
                &target.path(),
                params.iter().map(|(k, v)| (k.as_str(), v.as_str())),
            );
            return Ok(TabAction::OpenWindow(url));
        }

        let mut payload = RoutePayload::default();
        for (k, v) in params {
            payload.insert(k, v);
        }
        Ok(TabAction::Navigate { target, payload })
    }

    fn from_raw(index: usize, raw: &RawTab) -> Result<Self, ConfigError> {
        let label = raw
            .tab_label
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .ok_or(ConfigError::MissingLabel { index })?
            .to_string();

        let new_window = raw.open_in_new_window.as_ref().is_some_and(Lenient::truthy);
        let tab_type = raw.tab_type.as_deref().unwrap_or_default();
        let normalized: String = tab_type
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();

        let kind = match normalized.as_str() {
            "" | "filterdashboard" => TabKind::FilterDashboard,
            "routelink" => TabKind::RouteLink {
                route: raw.route.clone(),
                new_window,
            },
            "reportlink" => TabKind::ReportLink {
                report: raw.report_name.clone(),
                new_window,
            },
            _ => {
                return Err(ConfigError::UnknownTabType {
                    label,
                    tab_type: tab_type.to_string(),
                })
            }
        };

        Ok(Self {
            label,
            kind,
            fields: TabFields {
                company: raw.company.clone(),
                branch: raw.branch.clone(),
                department: raw.department.clone(),
                designation: raw.designation.clone(),
                nationality_group: raw.nationality_group.clone(),
            },
            order: raw.order.as_ref().map_or(0, Lenient::as_i64),
        })
    }
}

/// Validated navigation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationConfig {
    pub enable_tabs: bool,
    pub default_tab: Option<String>,
    /// Sorted by `order`; ties keep source order.
    pub tabs: Vec<TabDescriptor>,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            enable_tabs: false,
            default_tab: None,
            tabs: Vec::new(),
        }
    }
}

/// Result of loading: the usable config plus every rejected row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedNavigation {
    pub config: NavigationConfig,
    pub rejected: Vec<ConfigError>,
}

impl NavigationConfig {
    pub fn load(raw: &RawNavigationConfig) -> LoadedNavigation {
        let mut tabs = Vec::with_capacity(raw.tabs.len());
        let mut rejected = Vec::new();

        for (index, row) in raw.tabs.iter().enumerate() {
            match TabDescriptor::from_raw(index, row) {
                Ok(tab) => tabs.push(tab),
                Err(err) => {
                    tracing::warn!(error = %err, "dropping tab");
                    rejected.push(err);
                }
            }
        }
        tabs.sort_by_key(|t| t.order);

        let default_tab = raw
            .default_tab
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        LoadedNavigation {
            config: NavigationConfig {
                enable_tabs: raw.enable_tabs.as_ref().map_or(true, Lenient::truthy),
                default_tab,
                tabs,
            },
            rejected,
        }
    }

    /// Parse from the JSON shape returned by the navigation method.
    pub fn from_json(value: serde_json::Value) -> Result<LoadedNavigation, serde_json::Error> {
        let raw: RawNavigationConfig = serde_json::from_value(value)?;
        Ok(Self::load(&raw))
    }

    pub fn visible(&self) -> bool {
        self.enable_tabs && !self.tabs.is_empty()
    }

    pub fn position(&self, label: &str) -> Option<usize> {
        self.tabs.iter().position(|t| t.label == label)
    }

    /// Index of the configured default tab, if it survived loading.
    pub fn default_index(&self) -> Option<usize> {
        self.default_tab.as_deref().and_then(|d| self.position(d))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crate::route::PageRoute;
    use serde_json::json;

    fn ctx() -> FilterContext {
        FilterContext::as_on(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
            .with(FilterKey::Company, "Acme")
            .with(FilterKey::Department, "Ops")
    }

    fn home() -> RouteTarget {
        RouteTarget::Page(PageRoute::HrAnalytics)
    }

    fn load(value: serde_json::Value) -> LoadedNavigation {
        NavigationConfig::from_json(value).unwrap()
    }

    #[test]
    fn unknown_type_drops_only_that_tab() {
        let loaded = load(json!({
            "enable_tabs": 1,
            "tabs": [
                {"tab_label": "Ops", "tab_type": "Filter Dashboard", "order": 2},
                {"tab_label": "Bad", "tab_type": "Iframe", "order": 1},
                {"tab_label": "Analytics", "tab_type": "Route Link", "route": "analytics", "order": 0},
            ]
        }));
        assert_eq!(loaded.rejected.len(), 1);
        assert!(matches!(
            &loaded.rejected[0],
            ConfigError::UnknownTabType { label, .. } if label == "Bad"
        ));
        let labels: Vec<_> = loaded.config.tabs.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["Analytics", "Ops"]);
    }

    #[test]
    fn missing_type_defaults_to_filter_dashboard() {
        let loaded = load(json!({"tabs": [{"tab_label": "All", "company": "Acme"}]}));
        assert_eq!(loaded.config.tabs[0].kind, TabKind::FilterDashboard);
        assert!(loaded.config.enable_tabs);
    }

    #[test]
    fn type_matching_ignores_case_and_spacing() {
        let loaded = load(json!({"tabs": [{"tab_label": "R", "tab_type": "report_link", "report_name": "X"}]}));
        assert!(matches!(loaded.config.tabs[0].kind, TabKind::ReportLink { .. }));
    }

    #[test]
    fn missing_label_is_rejected() {
        let loaded = load(json!({"tabs": [{"tab_type": "Filter Dashboard"}]}));
        assert_eq!(loaded.rejected, vec![ConfigError::MissingLabel { index: 0 }]);
    }

    #[test]
    fn lenient_flags() {
        assert!(Lenient::Int(1).truthy());
        assert!(!Lenient::Text("0".into()).truthy());
        assert!(!Lenient::Bool(false).truthy());
        assert_eq!(Lenient::Text(" 7 ".into()).as_i64(), 7);
    }

    #[test]
    fn filter_dashboard_patch_has_only_present_fields() {
        let loaded = load(json!({"tabs": [{"tab_label": "Sales", "department": "Sales", "company": ""}]}));
        let action = loaded.config.tabs[0].resolve(&ctx(), &home()).unwrap();
        let TabAction::ApplyFilters(patch) = action else {
            panic!("expected filter merge");
        };
        let mut c = ctx();
        c.merge(&patch);
        assert_eq!(c.company.as_deref(), Some("Acme"));
        assert_eq!(c.department.as_deref(), Some("Sales"));
    }

    #[test]
    fn route_link_in_app_carries_nonempty_fields() {
        let loaded = load(json!({"tabs": [
            {"tab_label": "A", "tab_type": "Route Link", "route": "analytics", "company": "Acme"}
        ]}));
        let base = FilterContext::as_on(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        let action = loaded.config.tabs[0].resolve(&base, &home()).unwrap();
        let TabAction::Navigate { target, payload } = action else {
            panic!("expected in-app navigation");
        };
        assert_eq!(target, RouteTarget::Path("analytics".into()));
        assert_eq!(payload.len(), 1);
        assert_eq!(payload.get(FilterKey::Company), Some("Acme"));
    }

    #[test]
    fn route_link_new_window_builds_escaped_url() {
        let loaded = load(json!({"tabs": [
            {"tab_label": "A", "tab_type": "Route Link", "open_in_new_window": 1, "department": "R&D"}
        ]}));
        let action = loaded.config.tabs[0].resolve(&ctx(), &home()).unwrap();
        assert_eq!(
            action,
            TabAction::OpenWindow(
                "/app/saudization-hr-analytics?company=Acme&department=R%26D".into()
            )
        );
    }

    #[test]
    fn report_link_without_report_is_a_notice() {
        let loaded = load(json!({"tabs": [{"tab_label": "Rep", "tab_type": "Report Link"}]}));
        assert!(loaded.rejected.is_empty());
        let err = loaded.config.tabs[0].resolve(&ctx(), &home()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "This tab is configured as a Report Link but no report is set."
        );
    }

    #[test]
    fn report_link_targets_query_report() {
        let loaded = load(json!({"tabs": [
            {"tab_label": "Rep", "tab_type": "Report Link", "report_name": "Head Count", "open_in_new_window": "1"}
        ]}));
        let action = loaded.config.tabs[0].resolve(&ctx(), &home()).unwrap();
        assert_eq!(
            action,
            TabAction::OpenWindow("/app/query-report/Head%20Count?company=Acme&department=Ops".into())
        );
    }

    #[test]
    fn default_tab_is_found_after_sorting() {
        let loaded = load(json!({
            "default_tab": "Second",
            "tabs": [
                {"tab_label": "Second", "order": 5},
                {"tab_label": "First", "order": 1}
            ]
        }));
        assert_eq!(loaded.config.default_index(), Some(1));
    }

    #[test]
    fn disabled_strip_is_hidden() {
        let loaded = load(json!({"enable_tabs": 0, "tabs": [{"tab_label": "X"}]}));
        assert!(!loaded.config.visible());
    }
}
