//! Epoch-tagged batch fetching.
//!
//! Each refresh of a view takes a new epoch and snapshots the filter
//! context. The batch is issued concurrently and joined all-or-nothing.
//! When it settles, the response is applied only if its epoch is still
//! the latest one for that view; anything older is dropped silently.
//!
//! Planning (`begin`) and applying (`settle`) are synchronous and touch
//! only the owning page. Running a batch is async and only needs the
//! ticket, so a render adapter can hand tickets to a worker.

use std::fmt;

use futures::future::try_join_all;
use serde_json::Value;
use workforce_core::{FetchError, FilterContext, FilterKey, QueryName, QuerySpec, ValidationError};

use crate::service::{BatchValues, QueryService};

/// Monotonic refresh counter for one view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Epoch(u64);

impl Epoch {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Per-view epoch source.
#[derive(Debug, Default)]
pub struct FetchOrchestrator {
    label: &'static str,
    epoch: Epoch,
}

impl FetchOrchestrator {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            epoch: Epoch::default(),
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn current(&self) -> Epoch {
        self.epoch
    }

    pub fn is_current(&self, epoch: Epoch) -> bool {
        self.epoch == epoch
    }

    /// Supersede anything in flight without starting a new batch.
    pub fn invalidate(&mut self) -> Epoch {
        self.epoch = Epoch(self.epoch.0 + 1);
        self.epoch
    }

    /// Start a refresh.
    ///
    /// The epoch advances even when validation fails, so a batch already
    /// in flight cannot overwrite the view after the user changed filters.
    pub fn begin(
        &mut self,
        filter: &FilterContext,
        required: &[FilterKey],
        specs: Vec<QuerySpec>,
    ) -> Result<Batch, ValidationError> {
        let epoch = self.invalidate();
        if let Some(missing) = filter.first_missing(required) {
            tracing::debug!(view = self.label, %epoch, field = %missing, "refresh blocked");
            return Err(ValidationError::MissingField(missing));
        }
        tracing::debug!(view = self.label, %epoch, queries = specs.len(), "refresh started");
        Ok(Batch {
            view: self.label,
            epoch,
            snapshot: filter.clone(),
            specs,
        })
    }

    /// Classify a settled batch against the current epoch and decode it.
    pub fn settle<T>(
        &self,
        response: BatchResponse,
        decode: impl FnOnce(BatchValues) -> Result<T, FetchError>,
    ) -> Settled<T> {
        if !self.is_current(response.epoch) {
            tracing::debug!(
                view = self.label,
                stale = %response.epoch,
                current = %self.epoch,
                "dropping superseded response"
            );
            return Settled::Stale;
        }
        let outcome = response
            .result
            .and_then(|values| decode(BatchValues::new(response.names, values)));
        match outcome {
            Ok(value) => Settled::Applied(value),
            Err(err) => {
                tracing::warn!(view = self.label, epoch = %response.epoch, error = %err, "batch failed");
                Settled::Failed(err)
            }
        }
    }

    /// Settle `response` straight into `view`. Returns true when the view
    /// data changed.
    pub fn apply<T>(
        &self,
        view: &mut ViewState<T>,
        response: BatchResponse,
        decode: impl FnOnce(BatchValues) -> Result<T, FetchError>,
    ) -> bool {
        let epoch = response.epoch;
        view.commit(epoch, self.settle(response, decode))
    }
}

/// A planned refresh: epoch, filter snapshot and the queries to issue.
#[derive(Debug, Clone)]
pub struct Batch {
    view: &'static str,
    epoch: Epoch,
    snapshot: FilterContext,
    specs: Vec<QuerySpec>,
}

impl Batch {
    pub fn view(&self) -> &'static str {
        self.view
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    pub fn snapshot(&self) -> &FilterContext {
        &self.snapshot
    }

    pub fn specs(&self) -> &[QuerySpec] {
        &self.specs
    }

    /// Issue every query, then await them together.
    ///
    /// All calls are created before the join is polled, so none waits on
    /// another. The first failure fails the whole batch.
    pub async fn run<S: QueryService + ?Sized>(self, service: &S) -> BatchResponse {
        let names: Vec<QueryName> = self.specs.iter().map(|s| s.name).collect();
        let calls: Vec<_> = self
            .specs
            .iter()
            .map(|spec| service.query(spec.name, spec.args(&self.snapshot)))
            .collect();
        let result = try_join_all(calls).await;
        if let Err(err) = &result {
            tracing::debug!(view = self.view, epoch = %self.epoch, error = %err, "batch call failed");
        }
        BatchResponse {
            view: self.view,
            epoch: self.epoch,
            names,
            result,
        }
    }
}

/// Outcome of running a batch, still tagged with its epoch.
#[derive(Debug, Clone)]
pub struct BatchResponse {
    /// Label of the view that planned the batch.
    pub view: &'static str,
    pub epoch: Epoch,
    pub names: Vec<QueryName>,
    pub result: Result<Vec<Value>, FetchError>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Settled<T> {
    Applied(T),
    Stale,
    Failed(FetchError),
}

/// What a view currently shows.
#[derive(Debug, Clone)]
pub struct ViewState<T> {
    data: Option<T>,
    applied: Option<Epoch>,
    notice: Option<String>,
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        Self {
            data: None,
            applied: None,
            notice: None,
        }
    }
}

impl<T> ViewState<T> {
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn applied_epoch(&self) -> Option<Epoch> {
        self.applied
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn clear(&mut self) {
        self.data = None;
        self.notice = None;
    }

    /// Apply a settled batch. Returns true when the visible data changed.
    ///
    /// A failure keeps the previous data and raises the generic notice.
    pub fn commit(&mut self, epoch: Epoch, settled: Settled<T>) -> bool {
        match settled {
            Settled::Applied(data) => {
                self.data = Some(data);
                self.applied = Some(epoch);
                self.notice = None;
                true
            }
            Settled::Failed(_) => {
                self.notice = Some(FetchError::NOTICE.to_string());
                false
            }
            Settled::Stale => false,
        }
    }
}
