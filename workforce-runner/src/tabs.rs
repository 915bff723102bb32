//! Tab dispatch: turn an activated tab into filter changes, navigation or
//! a new window.

use workforce_core::{
    ConfigError, FilterState, HostRouter, NavigationConfig, PageRoute, RouteTarget, TabAction,
};

/// Result of activating a tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabOutcome {
    /// Filters changed on this page; refresh it.
    Refresh,
    /// The host router moved elsewhere.
    Navigated(RouteTarget),
    OpenedWindow(String),
    /// The tab cannot act; show this notice and stay put.
    Notice(String),
    /// Tabs are hidden or the index is out of range.
    Ignored,
}

/// Active-tab bookkeeping over a validated navigation config.
#[derive(Debug, Clone)]
pub struct TabEngine {
    config: NavigationConfig,
    active: Option<usize>,
    page: PageRoute,
    home: RouteTarget,
}

impl TabEngine {
    /// The configured default tab starts active. Loading never navigates.
    pub fn new(config: NavigationConfig, page: PageRoute, home: RouteTarget) -> Self {
        let active = config.default_index();
        Self {
            config,
            active,
            page,
            home,
        }
    }

    pub fn config(&self) -> &NavigationConfig {
        &self.config
    }

    pub fn visible(&self) -> bool {
        self.config.visible()
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.config.tabs.iter().map(|t| t.label.as_str())
    }

    /// Activate tab `index`.
    ///
    /// Only filter-dashboard tabs become the active tab. A link whose
    /// target is this very page merges its payload in place instead of
    /// navigating.
    pub fn activate(
        &mut self,
        index: usize,
        filters: &mut FilterState,
        router: &mut dyn HostRouter,
    ) -> TabOutcome {
        if !self.visible() {
            return TabOutcome::Ignored;
        }
        let Some(tab) = self.config.tabs.get(index) else {
            return TabOutcome::Ignored;
        };

        let action = match tab.resolve(&filters.get(), &self.home) {
            Ok(action) => action,
            Err(err @ ConfigError::MissingReport { .. }) => {
                tracing::warn!(tab = %tab.label, "report link without report");
                return TabOutcome::Notice(err.to_string());
            }
            Err(err) => return TabOutcome::Notice(err.to_string()),
        };
        tracing::debug!(tab = %tab.label, kind = tab.kind.label(), "tab activated");

        match action {
            TabAction::ApplyFilters(patch) => {
                filters.set(patch);
                self.active = Some(index);
                TabOutcome::Refresh
            }
            TabAction::OpenWindow(url) => {
                router.open_window(url.clone());
                TabOutcome::OpenedWindow(url)
            }
            TabAction::Navigate { target, payload } if target.page() == Some(self.page) => {
                filters.set(payload.into_patch());
                TabOutcome::Refresh
            }
            TabAction::Navigate { target, payload } => {
                router.set_route(target.clone(), Some(payload));
                TabOutcome::Navigated(target)
            }
        }
    }
}
