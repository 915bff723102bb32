//! Workspace settings, read from a TOML file.
//!
//! Every section is optional. A missing file is not an error for callers
//! that use `load_or_default`; a malformed one always is.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pagination::DEFAULT_PAGE_SIZE;
use crate::route::RouteTarget;
use crate::tabs::{NavigationConfig, RawNavigationConfig, RawTab, LoadedNavigation};

pub const DEFAULT_SETTINGS_FILE: &str = "workforce.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Origin of the dashboard server, e.g. `https://erp.example.com`.
    pub base_url: String,
    /// Dotted module path prefixed to every method name.
    pub app_module: String,
    /// `key:secret` pair sent as a token authorization header.
    pub api_token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            app_module: "saudization_dashboard.api".to_string(),
            api_token: None,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    pub page_size: usize,
    pub min_headcount: u32,
    pub top_n: u32,
    pub months_back: u32,
    /// Route used by route-link tabs that name none.
    pub home_route: String,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            min_headcount: 3,
            top_n: 10,
            months_back: 24,
            home_route: "saudization-hr-analytics".to_string(),
        }
    }
}

impl DashboardSettings {
    pub fn home(&self) -> RouteTarget {
        RouteTarget::from_route(&self.home_route)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub service: ServiceSettings,
    pub dashboard: DashboardSettings,
    /// Local navigation used when the service provides none.
    pub navigation: Option<RawNavigationConfig>,
}

impl Settings {
    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Defaults when `path` does not exist; errors otherwise propagate.
    pub fn load_or_default(path: &Path) -> Result<Self, SettingsError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.dashboard.page_size == 0 {
            return Err(SettingsError::Invalid {
                field: "dashboard.page_size",
                reason: "must be at least 1".into(),
            });
        }
        if self.service.timeout_secs == 0 {
            return Err(SettingsError::Invalid {
                field: "service.timeout_secs",
                reason: "must be at least 1".into(),
            });
        }
        let base = self.service.base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(SettingsError::Invalid {
                field: "service.base_url",
                reason: format!("'{base}' is not an http(s) URL"),
            });
        }
        if self.dashboard.home_route.trim().is_empty() {
            return Err(SettingsError::Invalid {
                field: "dashboard.home_route",
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Navigation used when the service returns nothing usable.
    pub fn fallback_navigation(&self) -> LoadedNavigation {
        match &self.navigation {
            Some(raw) => NavigationConfig::load(raw),
            None => NavigationConfig::load(&builtin_navigation()),
        }
    }
}

/// Three department tabs shipped with the dashboard.
pub fn builtin_navigation() -> RawNavigationConfig {
    let tab = |label: &str, order: i64| RawTab {
        tab_label: Some(label.to_string()),
        tab_type: Some("Filter Dashboard".to_string()),
        department: Some(label.to_string()),
        order: Some(crate::tabs::Lenient::Int(order)),
        ..RawTab::default()
    };
    RawNavigationConfig {
        enable_tabs: Some(crate::tabs::Lenient::Int(1)),
        default_tab: None,
        tabs: vec![
            tab("Human Resources", 10),
            tab("Research & Development", 20),
            tab("Sales", 30),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tabs::TabKind;

    #[test]
    fn empty_file_is_all_defaults() {
        let s = Settings::from_toml_str("").unwrap();
        assert_eq!(s, Settings::default());
        assert_eq!(s.dashboard.page_size, 50);
        assert_eq!(s.dashboard.months_back, 24);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let s = Settings::from_toml_str(
            r#"
            [service]
            base_url = "https://erp.example.com"

            [dashboard]
            top_n = 5
            "#,
        )
        .unwrap();
        assert_eq!(s.service.base_url, "https://erp.example.com");
        assert_eq!(s.service.app_module, "saudization_dashboard.api");
        assert_eq!(s.dashboard.top_n, 5);
        assert_eq!(s.dashboard.min_headcount, 3);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = Settings::from_toml_str("[dashboard]\npage_size = 0\n").unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { field: "dashboard.page_size", .. }));

        let err = Settings::from_toml_str("[service]\nbase_url = \"ftp://x\"\n").unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { field: "service.base_url", .. }));

        assert!(matches!(
            Settings::from_toml_str("[dashboard\n").unwrap_err(),
            SettingsError::Parse(_)
        ));
    }

    #[test]
    fn navigation_section_parses_tabs() {
        let s = Settings::from_toml_str(
            r#"
            [navigation]
            enable_tabs = true
            default_tab = "Reports"

            [[navigation.tabs]]
            tab_label = "Reports"
            tab_type = "Report Link"
            report_name = "Head Count"
            open_in_new_window = 1
            "#,
        )
        .unwrap();
        let loaded = s.fallback_navigation();
        assert!(loaded.rejected.is_empty());
        assert_eq!(loaded.config.default_index(), Some(0));
        assert!(matches!(
            loaded.config.tabs[0].kind,
            TabKind::ReportLink { new_window: true, .. }
        ));
    }

    #[test]
    fn builtin_navigation_has_three_department_tabs() {
        let loaded = Settings::default().fallback_navigation();
        assert_eq!(loaded.config.tabs.len(), 3);
        assert_eq!(
            loaded.config.tabs[2].fields.department.as_deref(),
            Some("Sales")
        );
    }

    #[test]
    fn load_or_default_tolerates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let s = Settings::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(s, Settings::default());

        let path = dir.path().join("workforce.toml");
        std::fs::write(&path, "[dashboard]\nmonths_back = 12\n").unwrap();
        assert_eq!(Settings::load_or_default(&path).unwrap().dashboard.months_back, 12);
    }
}
