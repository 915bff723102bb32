//! Error taxonomy shared by the orchestration layers.
//!
//! `ConfigError` lives next to the tab loader and `SettingsError` next to
//! the settings file parser; the two here cross crate boundaries.

use thiserror::Error;

use crate::filter::FilterKey;

/// A required filter is missing when a refresh is requested.
///
/// Surfaced to the user as a blocking prompt; no fetch is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("please select {}", .0.label())]
    MissingField(FilterKey),
}

impl ValidationError {
    pub fn field(&self) -> FilterKey {
        match self {
            ValidationError::MissingField(key) => *key,
        }
    }
}

/// A collaborator call failed. One failure discards the whole batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("transport error calling '{method}': {message}")]
    Transport { method: String, message: String },

    #[error("'{method}' returned HTTP {status}: {message}")]
    Server {
        method: String,
        status: u16,
        message: String,
    },

    #[error("malformed response from '{method}': {message}")]
    Decode { method: String, message: String },

    #[error("'{method}' rejected the request: {message}")]
    Rejected { method: String, message: String },
}

impl FetchError {
    /// Generic notice shown when a batch is discarded.
    pub const NOTICE: &'static str = "Could not load dashboard data. Press Refresh to try again.";

    pub fn method(&self) -> &str {
        match self {
            FetchError::Transport { method, .. }
            | FetchError::Server { method, .. }
            | FetchError::Decode { method, .. }
            | FetchError::Rejected { method, .. } => method,
        }
    }

    pub fn decode(method: impl Into<String>, err: impl std::fmt::Display) -> Self {
        FetchError::Decode {
            method: method.into(),
            message: err.to_string(),
        }
    }
}
