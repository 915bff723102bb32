//! Routes, one-shot route payloads and the host routing seam.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::filter::{FilterContext, FilterKey, FilterPatch};

/// Dashboard pages known to this workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PageRoute {
    HrAnalytics,
    HoldingComparison,
    CompanyDrilldown,
    EmployeeDrilldown,
    ExecutiveScorecard,
    SaudizationTrends,
}

impl PageRoute {
    pub const ALL: [PageRoute; 6] = [
        PageRoute::HrAnalytics,
        PageRoute::HoldingComparison,
        PageRoute::CompanyDrilldown,
        PageRoute::EmployeeDrilldown,
        PageRoute::ExecutiveScorecard,
        PageRoute::SaudizationTrends,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            PageRoute::HrAnalytics => "saudization-hr-analytics",
            PageRoute::HoldingComparison => "holding-comparison",
            PageRoute::CompanyDrilldown => "company-drilldown",
            PageRoute::EmployeeDrilldown => "employee-drilldown",
            PageRoute::ExecutiveScorecard => "executive-scorecard",
            PageRoute::SaudizationTrends => "saudization-trends",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            PageRoute::HrAnalytics => "HR Analytics",
            PageRoute::HoldingComparison => "Holding vs Subsidiary Comparison",
            PageRoute::CompanyDrilldown => "Company Drilldown",
            PageRoute::EmployeeDrilldown => "Employee Drilldown",
            PageRoute::ExecutiveScorecard => "Executive Scorecard",
            PageRoute::SaudizationTrends => "Saudization Trends",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        PageRoute::ALL.into_iter().find(|p| p.slug() == slug)
    }
}

/// Where a navigation action lands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouteTarget {
    /// A page this workspace renders.
    Page(PageRoute),
    /// Any other in-app route, passed through verbatim.
    Path(String),
    /// An external report, addressed by name.
    Report(String),
}

impl RouteTarget {
    /// Resolve a configured route string, preferring known pages.
    pub fn from_route(route: &str) -> Self {
        let route = route.trim().trim_start_matches('/');
        match PageRoute::from_slug(route) {
            Some(page) => RouteTarget::Page(page),
            None => RouteTarget::Path(route.to_string()),
        }
    }

    /// Path below the app prefix, with report names escaped.
    pub fn path(&self) -> String {
        match self {
            RouteTarget::Page(page) => page.slug().to_string(),
            RouteTarget::Path(path) => path.clone(),
            RouteTarget::Report(name) => format!("query-report/{}", urlencoding::encode(name)),
        }
    }

    pub fn page(&self) -> Option<PageRoute> {
        match self {
            RouteTarget::Page(page) => Some(*page),
            _ => None,
        }
    }
}

impl fmt::Display for RouteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/app/{}", self.path())
    }
}

/// One-shot filter handoff carried by a page transition.
///
/// Only set keys are carried; an unset key is omitted rather than
/// forwarded as null.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutePayload {
    values: BTreeMap<FilterKey, String>,
}

impl RoutePayload {
    /// Capture `keys` from `ctx`, skipping unset ones.
    pub fn capture(ctx: &FilterContext, keys: &[FilterKey]) -> Self {
        Self {
            values: ctx.pairs(keys).into_iter().collect(),
        }
    }

    /// Add or replace a value; empty values remove the key.
    pub fn insert(&mut self, key: FilterKey, value: impl Into<String>) {
        let value = value.into();
        if value.trim().is_empty() {
            self.values.remove(&key);
        } else {
            self.values.insert(key, value);
        }
    }

    pub fn get(&self, key: FilterKey) -> Option<&str> {
        self.values.get(&key).map(String::as_str)
    }

    pub fn contains(&self, key: FilterKey) -> bool {
        self.values.contains_key(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FilterKey, &str)> {
        self.values.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Consume the payload into a patch merged over the current filters.
    pub fn into_patch(self) -> FilterPatch {
        self.values.into_iter().collect()
    }

    /// Consume the payload into a patch that seeds a destination page.
    ///
    /// Scope keys the payload does not carry are cleared, so nothing left
    /// by an earlier handoff narrows the new one. The date and the
    /// employee type selector are kept unless carried.
    pub fn into_seed(self) -> FilterPatch {
        let cleared = SEEDED_KEYS
            .iter()
            .filter(|k| !self.contains(**k))
            .fold(FilterPatch::new(), |patch, k| patch.clear(*k));
        cleared.extend(self.into_patch())
    }
}

/// Keys a handoff payload owns on the destination page.
pub const SEEDED_KEYS: [FilterKey; 6] = [
    FilterKey::Company,
    FilterKey::Branch,
    FilterKey::Department,
    FilterKey::Designation,
    FilterKey::NationalityGroup,
    FilterKey::SearchText,
];

/// Build `/app/<path>?k=v&...`, dropping empty values and escaping every
/// key and value.
pub fn build_url<K, V>(path: &str, params: impl IntoIterator<Item = (K, V)>) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let query = params
        .into_iter()
        .filter(|(_, v)| !v.as_ref().trim().is_empty())
        .map(|(k, v)| {
            format!(
                "{}={}",
                urlencoding::encode(k.as_ref()),
                urlencoding::encode(v.as_ref())
            )
        })
        .collect::<Vec<_>>()
        .join("&");

    if query.is_empty() {
        format!("/app/{path}")
    } else {
        format!("/app/{path}?{query}")
    }
}

/// Host routing facility.
///
/// Mirrors the primitives a host shell offers: set the current route with
/// options, read (and consume) the options handed to the current route,
/// and open a URL in a new browsing context.
pub trait HostRouter {
    fn set_route(&mut self, target: RouteTarget, options: Option<RoutePayload>);

    /// Take the pending route options. Subsequent calls return `None`.
    fn take_route_options(&mut self) -> Option<RoutePayload>;

    fn current_route(&self) -> Option<&RouteTarget>;

    fn open_window(&mut self, url: String);
}

/// In-process router that records history. Used by the terminal UI and tests.
#[derive(Debug, Default)]
pub struct MemoryRouter {
    current: Option<RouteTarget>,
    pending: Option<RoutePayload>,
    history: Vec<RouteTarget>,
    opened: Vec<String>,
}

impl MemoryRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(target: RouteTarget) -> Self {
        Self {
            current: Some(target.clone()),
            history: vec![target],
            ..Self::default()
        }
    }

    pub fn history(&self) -> &[RouteTarget] {
        &self.history
    }

    pub fn opened_windows(&self) -> &[String] {
        &self.opened
    }

    pub fn has_pending_options(&self) -> bool {
        self.pending.is_some()
    }

    /// Step back one route. Route options are never replayed.
    pub fn back(&mut self) -> Option<&RouteTarget> {
        if self.history.len() > 1 {
            self.history.pop();
            self.current = self.history.last().cloned();
            self.pending = None;
        }
        self.current.as_ref()
    }
}

impl HostRouter for MemoryRouter {
    fn set_route(&mut self, target: RouteTarget, options: Option<RoutePayload>) {
        tracing::debug!(route = %target, carries = options.as_ref().map_or(0, RoutePayload::len), "set route");
        self.history.push(target.clone());
        self.current = Some(target);
        self.pending = options;
    }

    fn take_route_options(&mut self) -> Option<RoutePayload> {
        self.pending.take()
    }

    fn current_route(&self) -> Option<&RouteTarget> {
        self.current.as_ref()
    }

    fn open_window(&mut self, url: String) {
        tracing::debug!(%url, "open window");
        self.opened.push(url);
    }
}
