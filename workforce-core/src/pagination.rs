//! Offset/limit pagination for list views.

use serde::{Deserialize, Serialize};

/// Page size of the employee list.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// The limit/offset pair sent with a paged query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWindow {
    pub limit: usize,
    pub offset: usize,
}

/// Pagination state: fixed limit, current offset, server-reported total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationState {
    limit: usize,
    offset: usize,
    total: usize,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl PaginationState {
    /// A zero limit is bumped to one so paging always advances.
    pub fn new(limit: usize) -> Self {
        Self {
            limit: limit.max(1),
            offset: 0,
            total: 0,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn window(&self) -> PageWindow {
        PageWindow {
            limit: self.limit,
            offset: self.offset,
        }
    }

    pub fn next_disabled(&self) -> bool {
        self.offset + self.limit >= self.total
    }

    pub fn prev_disabled(&self) -> bool {
        self.offset == 0
    }

    pub fn first_window(&self) -> PageWindow {
        PageWindow {
            limit: self.limit,
            offset: 0,
        }
    }

    /// Window of the following page, `None` when Next is disabled.
    pub fn next_window(&self) -> Option<PageWindow> {
        (!self.next_disabled()).then(|| PageWindow {
            limit: self.limit,
            offset: self.offset + self.limit,
        })
    }

    /// Window of the preceding page, clamped at zero. `None` when Prev is
    /// disabled.
    pub fn prev_window(&self) -> Option<PageWindow> {
        (!self.prev_disabled()).then(|| PageWindow {
            limit: self.limit,
            offset: self.offset.saturating_sub(self.limit),
        })
    }

    /// Record the window and total of the page now on screen.
    ///
    /// Offsets only move here, so a window that never arrived leaves the
    /// state describing the rows still shown.
    pub fn show(&mut self, window: PageWindow, total: usize) {
        self.offset = window.offset;
        self.total = total;
    }

    /// Back to the first page; called on every filter change and refresh.
    pub fn reset(&mut self) {
        self.offset = 0;
    }

    /// 1-based inclusive row range shown on the current page.
    pub fn range(&self) -> (usize, usize) {
        if self.total == 0 {
            return (0, 0);
        }
        let from = self.offset + 1;
        let to = (self.offset + self.limit).min(self.total);
        (from, to)
    }

    pub fn summary(&self) -> String {
        let (from, to) = self.range();
        format!("Showing {from} - {to} of {}", self.total)
    }
}
