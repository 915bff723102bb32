//! Session-wide configuration: navigation tabs and theme tokens.
//!
//! Both are fetched at most once per session and never invalidated. A
//! failed fetch is not cached; it is retried on the next refresh and the
//! page renders without it in the meantime.

use serde_json::Value;
use workforce_core::tabs::LoadedNavigation;
use workforce_core::{FetchError, NavigationConfig, ThemeTokens};

use crate::service::{NavigationService, ThemeService};

#[derive(Debug, Default)]
pub struct SessionCache {
    navigation: Option<LoadedNavigation>,
    theme: Option<ThemeTokens>,
    fallback: Option<LoadedNavigation>,
}

impl SessionCache {
    /// `fallback` is used when the service answers with no configuration.
    pub fn new(fallback: LoadedNavigation) -> Self {
        Self {
            navigation: None,
            theme: None,
            fallback: Some(fallback),
        }
    }

    pub fn navigation(&self) -> Option<&NavigationConfig> {
        self.navigation.as_ref().map(|n| &n.config)
    }

    pub fn loaded_navigation(&self) -> Option<&LoadedNavigation> {
        self.navigation.as_ref()
    }

    pub fn theme(&self) -> Option<&ThemeTokens> {
        self.theme.as_ref()
    }

    pub fn needs_navigation(&self) -> bool {
        self.navigation.is_none()
    }

    pub fn needs_theme(&self) -> bool {
        self.theme.is_none()
    }

    /// Store a navigation fetch result. Returns true when it was cached.
    pub fn store_navigation(&mut self, result: Result<Value, FetchError>) -> bool {
        if self.navigation.is_some() {
            return false;
        }
        let value = match result {
            Ok(value) => value,
            Err(err) => {
                tracing::debug!(error = %err, "navigation fetch failed; will retry");
                return false;
            }
        };
        let loaded = if value.is_null() {
            None
        } else {
            match NavigationConfig::from_json(value) {
                Ok(loaded) => Some(loaded),
                Err(err) => {
                    tracing::warn!(error = %err, "navigation payload unreadable; will retry");
                    return false;
                }
            }
        };
        let loaded = match loaded {
            Some(l) if !l.config.tabs.is_empty() || !l.rejected.is_empty() => l,
            Some(l) if self.fallback.is_none() => l,
            _ => match self.fallback.take() {
                Some(fallback) => fallback,
                None => LoadedNavigation::default(),
            },
        };
        tracing::debug!(
            tabs = loaded.config.tabs.len(),
            rejected = loaded.rejected.len(),
            "navigation cached"
        );
        self.navigation = Some(loaded);
        true
    }

    pub fn store_theme(&mut self, result: Result<ThemeTokens, FetchError>) -> bool {
        if self.theme.is_some() {
            return false;
        }
        match result {
            Ok(theme) => {
                self.theme = Some(theme);
                true
            }
            Err(err) => {
                tracing::debug!(error = %err, "theme fetch failed; using defaults");
                false
            }
        }
    }

    /// Fetch whatever is still missing.
    pub async fn ensure<S>(&mut self, service: &S)
    where
        S: NavigationService + ThemeService + ?Sized,
    {
        if self.needs_navigation() {
            let result = service.navigation().await;
            self.store_navigation(result);
        }
        if self.needs_theme() {
            let result = service.theme().await;
            self.store_theme(result);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use workforce_core::settings::builtin_navigation;

    fn fallback() -> LoadedNavigation {
        NavigationConfig::load(&builtin_navigation())
    }

    fn down() -> FetchError {
        FetchError::Transport {
            method: "get_navigation".into(),
            message: "refused".into(),
        }
    }

    #[test]
    fn failure_is_not_cached() {
        let mut cache = SessionCache::new(fallback());
        assert!(!cache.store_navigation(Err(down())));
        assert!(cache.needs_navigation());
        assert!(cache.store_navigation(Ok(json!({"tabs": [{"tab_label": "A"}]}))));
        assert_eq!(cache.navigation().unwrap().tabs[0].label, "A");
    }

    #[test]
    fn second_store_is_ignored() {
        let mut cache = SessionCache::new(fallback());
        cache.store_navigation(Ok(json!({"tabs": [{"tab_label": "A"}]})));
        assert!(!cache.store_navigation(Ok(json!({"tabs": [{"tab_label": "B"}]}))));
        assert_eq!(cache.navigation().unwrap().tabs[0].label, "A");
    }

    #[test]
    fn empty_answer_uses_fallback() {
        let mut cache = SessionCache::new(fallback());
        cache.store_navigation(Ok(Value::Null));
        let labels: Vec<_> = cache
            .navigation()
            .unwrap()
            .tabs
            .iter()
            .map(|t| t.label.as_str())
            .collect();
        assert_eq!(labels, ["Human Resources", "Research & Development", "Sales"]);
    }
}
