//! In-memory collaborator with canned answers, injected failures and
//! call gates. Used by tests and demos.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Notify;
use workforce_core::payload::ExportReceipt;
use workforce_core::{ExportArgs, FetchError, QueryArgs, QueryName, ThemeTokens};

use crate::service::{decode, ExportService, NavigationService, QueryService, ThemeService};

#[derive(Default)]
pub struct CannedService {
    responses: BTreeMap<QueryName, Value>,
    failures: BTreeSet<QueryName>,
    gates: RefCell<BTreeMap<QueryName, Rc<Notify>>>,
    calls: RefCell<Vec<(QueryName, QueryArgs)>>,
    exports: RefCell<Vec<ExportArgs>>,
    export_url: Option<String>,
}

impl CannedService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `name` with `value`. Unanswered queries return null.
    pub fn respond(mut self, name: QueryName, value: Value) -> Self {
        self.responses.insert(name, value);
        self
    }

    pub fn fail(mut self, name: QueryName) -> Self {
        self.failures.insert(name);
        self
    }

    pub fn export_to(mut self, url: impl Into<String>) -> Self {
        self.export_url = Some(url.into());
        self
    }

    /// Hold every call to `name` until the returned gate is notified.
    pub fn gate(&self, name: QueryName) -> Rc<Notify> {
        self.gates
            .borrow_mut()
            .entry(name)
            .or_insert_with(|| Rc::new(Notify::new()))
            .clone()
    }

    /// Calls in the order they were issued.
    pub fn calls(&self) -> Vec<(QueryName, QueryArgs)> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self, name: QueryName) -> usize {
        self.calls.borrow().iter().filter(|(n, _)| *n == name).count()
    }

    pub fn exports(&self) -> Vec<ExportArgs> {
        self.exports.borrow().clone()
    }

    fn answer(&self, name: QueryName) -> Result<Value, FetchError> {
        if self.failures.contains(&name) {
            return Err(FetchError::Server {
                method: name.method().to_string(),
                status: 500,
                message: "injected failure".to_string(),
            });
        }
        Ok(self.responses.get(&name).cloned().unwrap_or(Value::Null))
    }
}

#[async_trait(?Send)]
impl QueryService for CannedService {
    async fn query(&self, name: QueryName, args: QueryArgs) -> Result<Value, FetchError> {
        self.calls.borrow_mut().push((name, args));
        let gate = self.gates.borrow().get(&name).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.answer(name)
    }
}

#[async_trait(?Send)]
impl ExportService for CannedService {
    async fn export(&self, args: ExportArgs) -> Result<ExportReceipt, FetchError> {
        self.exports.borrow_mut().push(args);
        Ok(ExportReceipt {
            file_url: self.export_url.clone(),
        })
    }
}

#[async_trait(?Send)]
impl NavigationService for CannedService {
    async fn navigation(&self) -> Result<Value, FetchError> {
        self.calls
            .borrow_mut()
            .push((QueryName::Navigation, QueryArgs::new()));
        self.answer(QueryName::Navigation)
    }
}

#[async_trait(?Send)]
impl ThemeService for CannedService {
    async fn theme(&self) -> Result<ThemeTokens, FetchError> {
        self.calls.borrow_mut().push((QueryName::Theme, QueryArgs::new()));
        decode(QueryName::Theme, self.answer(QueryName::Theme)?)
    }
}
