//! Workforce Core: filter context, drill-down graph, tab configuration,
//! pagination and the payload types shared by every dashboard page.
//!
//! This crate holds no I/O. It contains:
//! - The hierarchical filter context and its single-owner state manager
//! - The drill-down hierarchy with its explicit edge list
//! - Routes, one-shot route payloads and the host router seam
//! - Declarative tab configuration, validated at load time
//! - Offset/limit pagination
//! - Named queries, their arguments and decoded result payloads
//! - Theme tokens and TOML settings
//! - The static user guide

pub mod drilldown;
pub mod error;
pub mod filter;
pub mod filter_state;
pub mod guide;
pub mod pagination;
pub mod payload;
pub mod query;
pub mod route;
pub mod settings;
pub mod tabs;
pub mod theme;

pub use drilldown::{edge, Crumb, DrillEdge, DrillError, DrillNode, DrilldownLevel, Transition};
pub use error::{FetchError, ValidationError};
pub use filter::{EmployeeType, FilterContext, FilterKey, FilterPatch};
pub use filter_state::{FilterChange, FilterState};
pub use guide::{Guide, GUIDE};
pub use pagination::{PageWindow, PaginationState};
pub use query::{ExportArgs, QueryArgs, QueryName, QuerySpec};
pub use route::{build_url, HostRouter, MemoryRouter, PageRoute, RoutePayload, RouteTarget};
pub use settings::{Settings, SettingsError};
pub use tabs::{ConfigError, LoadedNavigation, NavigationConfig, TabAction, TabDescriptor, TabKind};
pub use theme::ThemeTokens;
