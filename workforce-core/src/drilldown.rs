//! Drill-down hierarchy and its navigation graph.
//!
//! The hierarchy is strictly ordered (company → branch → department →
//! designation → employee). Every allowed move is listed in `DRILL_EDGES`,
//! including the risky-positions bypass straight to the employee list and
//! the cross-page jumps from the comparison dashboards.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::filter::FilterKey;
use crate::route::PageRoute;

/// One tier of the workforce hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DrilldownLevel {
    Company,
    Branch,
    Department,
    Designation,
    Employee,
}

impl DrilldownLevel {
    pub const ALL: [DrilldownLevel; 5] = [
        DrilldownLevel::Company,
        DrilldownLevel::Branch,
        DrilldownLevel::Department,
        DrilldownLevel::Designation,
        DrilldownLevel::Employee,
    ];

    pub fn depth(self) -> usize {
        self as usize
    }

    pub fn child(self) -> Option<Self> {
        DrilldownLevel::ALL.get(self.depth() + 1).copied()
    }

    pub fn parent(self) -> Option<Self> {
        self.depth().checked_sub(1).map(|i| DrilldownLevel::ALL[i])
    }

    /// Filter field narrowed when entering this level.
    pub fn filter_key(self) -> Option<FilterKey> {
        match self {
            DrilldownLevel::Company => Some(FilterKey::Company),
            DrilldownLevel::Branch => Some(FilterKey::Branch),
            DrilldownLevel::Department => Some(FilterKey::Department),
            DrilldownLevel::Designation => Some(FilterKey::Designation),
            DrilldownLevel::Employee => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DrilldownLevel::Company => "Company",
            DrilldownLevel::Branch => "Branch",
            DrilldownLevel::Department => "Department",
            DrilldownLevel::Designation => "Designation",
            DrilldownLevel::Employee => "Employee",
        }
    }
}

/// A node in the navigation graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrillNode {
    HoldingComparison,
    ExecutiveScorecard,
    RiskyPositions,
    Level(DrilldownLevel),
}

impl fmt::Display for DrillNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrillNode::HoldingComparison => f.write_str("holding comparison"),
            DrillNode::ExecutiveScorecard => f.write_str("executive scorecard"),
            DrillNode::RiskyPositions => f.write_str("risky positions"),
            DrillNode::Level(level) => f.write_str(level.label()),
        }
    }
}

/// How an edge is traversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Re-fetch a sub-view on the same page.
    InPlace,
    /// Navigate to another page with a one-shot payload of `carries`.
    Page {
        to: PageRoute,
        carries: &'static [FilterKey],
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrillEdge {
    pub from: DrillNode,
    pub to: DrillNode,
    pub transition: Transition,
}

const COMPANY_HANDOFF: &[FilterKey] = &[FilterKey::Company, FilterKey::AsOnDate];

const EMPLOYEE_HANDOFF: &[FilterKey] = &[
    FilterKey::Company,
    FilterKey::AsOnDate,
    FilterKey::Branch,
    FilterKey::Department,
    FilterKey::Designation,
];

const RISKY_HANDOFF: &[FilterKey] = &[
    FilterKey::Company,
    FilterKey::AsOnDate,
    FilterKey::Branch,
    FilterKey::Designation,
];

/// The complete navigation graph.
pub const DRILL_EDGES: &[DrillEdge] = &[
    DrillEdge {
        from: DrillNode::HoldingComparison,
        to: DrillNode::Level(DrilldownLevel::Company),
        transition: Transition::Page {
            to: PageRoute::CompanyDrilldown,
            carries: COMPANY_HANDOFF,
        },
    },
    DrillEdge {
        from: DrillNode::ExecutiveScorecard,
        to: DrillNode::Level(DrilldownLevel::Company),
        transition: Transition::Page {
            to: PageRoute::CompanyDrilldown,
            carries: COMPANY_HANDOFF,
        },
    },
    DrillEdge {
        from: DrillNode::Level(DrilldownLevel::Company),
        to: DrillNode::Level(DrilldownLevel::Branch),
        transition: Transition::InPlace,
    },
    DrillEdge {
        from: DrillNode::Level(DrilldownLevel::Branch),
        to: DrillNode::Level(DrilldownLevel::Department),
        transition: Transition::InPlace,
    },
    DrillEdge {
        from: DrillNode::Level(DrilldownLevel::Department),
        to: DrillNode::Level(DrilldownLevel::Designation),
        transition: Transition::InPlace,
    },
    DrillEdge {
        from: DrillNode::Level(DrilldownLevel::Designation),
        to: DrillNode::Level(DrilldownLevel::Employee),
        transition: Transition::Page {
            to: PageRoute::EmployeeDrilldown,
            carries: EMPLOYEE_HANDOFF,
        },
    },
    DrillEdge {
        from: DrillNode::RiskyPositions,
        to: DrillNode::Level(DrilldownLevel::Employee),
        transition: Transition::Page {
            to: PageRoute::EmployeeDrilldown,
            carries: RISKY_HANDOFF,
        },
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DrillError {
    #[error("no drill edge from {from} to {to}")]
    NoEdge { from: DrillNode, to: DrillNode },

    #[error("{from} to {to} stays on the current page")]
    InPlace { from: DrillNode, to: DrillNode },
}

/// Look up the edge between two nodes.
pub fn edge(from: DrillNode, to: DrillNode) -> Result<&'static DrillEdge, DrillError> {
    DRILL_EDGES
        .iter()
        .find(|e| e.from == from && e.to == to)
        .ok_or(DrillError::NoEdge { from, to })
}

/// Edges leaving `from`.
pub fn edges_from(from: DrillNode) -> impl Iterator<Item = &'static DrillEdge> {
    DRILL_EDGES.iter().filter(move |e| e.from == from)
}

/// One step of the in-place breadcrumb: the level and the value that
/// narrowed it (`None` means "all", e.g. every branch).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crumb {
    pub level: DrilldownLevel,
    pub value: Option<String>,
}

impl Crumb {
    pub fn display(&self) -> String {
        match (&self.value, self.level) {
            (Some(v), _) => v.clone(),
            (None, DrilldownLevel::Branch) => "All branches".to_string(),
            (None, level) => format!("All {}s", level.label().to_lowercase()),
        }
    }
}
