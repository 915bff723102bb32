//! Collaborator seams.
//!
//! Every remote read goes through one of these traits. The orchestrator
//! only needs `QueryService`; pages that export or fetch session-wide
//! configuration also take the narrower traits below.
//!
//! Futures are not required to be `Send`: a page and all of its calls
//! live on one cooperative thread.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use workforce_core::payload::ExportReceipt;
use workforce_core::{ExportArgs, FetchError, QueryArgs, QueryName, ThemeTokens};

/// Idempotent, named reads.
#[async_trait(?Send)]
pub trait QueryService {
    async fn query(&self, name: QueryName, args: QueryArgs) -> Result<Value, FetchError>;
}

/// Bulk export of the employee list. Returns a downloadable file reference.
#[async_trait(?Send)]
pub trait ExportService {
    async fn export(&self, args: ExportArgs) -> Result<ExportReceipt, FetchError>;
}

/// Site-wide navigation config, as raw JSON; validation happens in core.
#[async_trait(?Send)]
pub trait NavigationService {
    async fn navigation(&self) -> Result<Value, FetchError>;
}

#[async_trait(?Send)]
pub trait ThemeService {
    async fn theme(&self) -> Result<ThemeTokens, FetchError>;
}

/// Decode one query result into its typed payload.
///
/// A null message reads as an empty object or list.
pub fn decode<T: DeserializeOwned>(name: QueryName, value: Value) -> Result<T, FetchError> {
    let result = if value.is_null() {
        serde_json::from_value(Value::Object(Default::default()))
            .or_else(|_| serde_json::from_value(Value::Array(Vec::new())))
    } else {
        serde_json::from_value(value)
    };
    result.map_err(|e| FetchError::decode(name.method(), e))
}

/// Walks a batch result in issue order, decoding each slot.
///
/// Pages know the order they issued their queries in, so they read the
/// slots back the same way.
pub struct BatchValues {
    slots: std::vec::IntoIter<(QueryName, Value)>,
}

impl BatchValues {
    pub fn new(names: Vec<QueryName>, values: Vec<Value>) -> Self {
        Self {
            slots: names
                .into_iter()
                .zip(values)
                .collect::<Vec<_>>()
                .into_iter(),
        }
    }

    /// Decode the next slot. A missing slot is a decode error.
    pub fn take<T: DeserializeOwned>(&mut self, expected: QueryName) -> Result<T, FetchError> {
        match self.slots.next() {
            Some((name, value)) if name == expected => decode(name, value),
            Some((name, _)) => Err(FetchError::decode(
                expected.method(),
                format!("batch slot holds '{name}'"),
            )),
            None => Err(FetchError::decode(expected.method(), "batch ended early")),
        }
    }
}
