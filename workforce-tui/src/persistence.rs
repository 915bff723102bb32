//! App state persistence. JSON save/load across restarts.
//!
//! Only the coarse scope survives a restart: the page and the company
//! and holding last looked at. The date always starts at today.

use std::path::Path;

use serde::{Deserialize, Serialize};

use workforce_core::{FilterKey, FilterPatch, MemoryRouter, PageRoute, RouteTarget};

use crate::app::{AppState, Overlay};

/// Serializable subset of app state that persists across restarts.
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    pub active_page: PageRoute,
    pub company: Option<String>,
    pub holding_company: Option<String>,
    pub welcome_dismissed: bool,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            active_page: PageRoute::HrAnalytics,
            company: None,
            holding_company: None,
            welcome_dismissed: false,
        }
    }
}

/// Load persisted state from disk. Returns defaults if file is missing or corrupt.
pub fn load(path: &Path) -> PersistedState {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "ignoring corrupt state file");
            PersistedState::default()
        }),
        Err(_) => PersistedState::default(),
    }
}

/// Save persisted state to disk. Creates parent directories if needed.
pub fn save(path: &Path, state: &PersistedState) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Extract persisted state from AppState.
pub fn extract(app: &AppState) -> PersistedState {
    let ctx = app.filters();
    PersistedState {
        active_page: app.active,
        company: ctx.company,
        holding_company: ctx.holding_company,
        welcome_dismissed: app.overlay != Overlay::Welcome,
    }
}

/// Apply persisted state to every page of AppState.
pub fn apply(app: &mut AppState, state: PersistedState) {
    let patch = FilterPatch::new()
        .set_opt(FilterKey::Company, state.company.as_deref())
        .set_opt(FilterKey::HoldingCompany, state.holding_company.as_deref());
    for route in PageRoute::ALL {
        app.page_mut(route).update_filters(patch.clone());
    }
    app.active = state.active_page;
    app.router = MemoryRouter::at(RouteTarget::Page(state.active_page));
    if !state.welcome_dismissed {
        app.overlay = Overlay::Welcome;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{as_on, harness};
    use workforce_core::FilterContext;

    #[test]
    fn roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");

        let state = PersistedState {
            active_page: PageRoute::EmployeeDrilldown,
            company: Some("Najd Trading".into()),
            holding_company: None,
            welcome_dismissed: true,
        };

        save(&path, &state).unwrap();
        let loaded = load(&path);

        assert_eq!(loaded.active_page, PageRoute::EmployeeDrilldown);
        assert_eq!(loaded.company.as_deref(), Some("Najd Trading"));
        assert!(loaded.welcome_dismissed);
    }

    #[test]
    fn missing_file_returns_defaults() {
        let loaded = load(Path::new("/nonexistent/path/state.json"));
        assert_eq!(loaded.active_page, PageRoute::HrAnalytics);
        assert!(loaded.company.is_none());
        assert!(!loaded.welcome_dismissed);
    }

    #[test]
    fn corrupt_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "not valid json {{{").unwrap();

        let loaded = load(&path);
        assert!(loaded.company.is_none());
    }

    #[test]
    fn apply_seeds_every_page_and_extract_reads_it_back() {
        let mut h = harness(FilterContext::as_on(as_on()));
        apply(
            &mut h.app,
            PersistedState {
                active_page: PageRoute::CompanyDrilldown,
                company: Some("Eastern Foods".into()),
                holding_company: Some("Sample Holding".into()),
                welcome_dismissed: false,
            },
        );

        assert_eq!(h.app.overlay, Overlay::Welcome);
        for route in PageRoute::ALL {
            let ctx = h.app.page(route).filters().get();
            assert_eq!(ctx.company.as_deref(), Some("Eastern Foods"));
            assert_eq!(ctx.as_on_date, as_on());
        }

        let back = extract(&h.app);
        assert_eq!(back.active_page, PageRoute::CompanyDrilldown);
        assert_eq!(back.holding_company.as_deref(), Some("Sample Holding"));
        assert!(!back.welcome_dismissed);
    }
}
