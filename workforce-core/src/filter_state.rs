//! Filter state manager: sole owner and mutator of a page's filter context.
//!
//! Every `set` call produces exactly one `FilterChange`, however many
//! fields it touched, so a batch of field edits triggers one refresh.

use std::sync::mpsc::{channel, Receiver, Sender};

use crate::filter::{FilterContext, FilterKey, FilterPatch};

/// Notification fired once per `set` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterChange {
    /// Monotonic count of `set` calls on this manager.
    pub revision: u64,
    /// Keys whose value differs after the merge. May be empty.
    pub changed: Vec<FilterKey>,
    /// Snapshot taken right after the merge.
    pub snapshot: FilterContext,
}

impl FilterChange {
    pub fn touches(&self, key: FilterKey) -> bool {
        self.changed.contains(&key)
    }

    pub fn is_noop(&self) -> bool {
        self.changed.is_empty()
    }
}

/// Owns the current filter snapshot of one page.
#[derive(Debug)]
pub struct FilterState {
    current: FilterContext,
    revision: u64,
    subscribers: Vec<Sender<FilterChange>>,
}

impl FilterState {
    pub fn new(initial: FilterContext) -> Self {
        Self {
            current: initial,
            revision: 0,
            subscribers: Vec::new(),
        }
    }

    /// Defensive copy of the current context.
    pub fn get(&self) -> FilterContext {
        self.current.clone()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Merge `patch` over the current state and notify subscribers once.
    pub fn set(&mut self, patch: FilterPatch) -> FilterChange {
        let changed = self.current.merge(&patch);
        self.revision += 1;

        let change = FilterChange {
            revision: self.revision,
            changed,
            snapshot: self.current.clone(),
        };
        tracing::debug!(
            revision = change.revision,
            changed = ?change.changed,
            "filter context updated"
        );

        // Receivers that have been dropped are pruned here.
        self.subscribers.retain(|tx| tx.send(change.clone()).is_ok());
        change
    }

    /// Receive one `FilterChange` per subsequent `set` call.
    pub fn subscribe(&mut self) -> Receiver<FilterChange> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }
}
