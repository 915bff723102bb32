//! Drill-down coordination for the company page and the cross-page jumps.
//!
//! Moves inside the company page narrow the live filters and tell the page
//! what to re-fetch. Moves that change page build a one-shot payload from
//! exactly the keys the edge declares and hand it to the host router.

use workforce_core::drilldown::edge;
use workforce_core::{
    Crumb, DrillError, DrillNode, DrilldownLevel, FilterContext, FilterKey, FilterPatch,
    FilterState, HostRouter, PageRoute, RoutePayload, RouteTarget, Transition,
};

/// What the page has to do after a drill move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrillStep {
    /// Re-run the page's main batch.
    Refresh,
    /// Fetch the designation breakdown of this department in place.
    Designations(String),
    /// Drop the designation breakdown.
    CloseDesignations,
    /// The host router moved to another page.
    Navigated(PageRoute),
    /// Nothing to do.
    Stay,
}

/// Follow a page-changing edge, carrying the declared keys of `snapshot`.
pub fn jump(
    from: DrillNode,
    to: DrillNode,
    snapshot: &FilterContext,
    router: &mut dyn HostRouter,
) -> Result<PageRoute, DrillError> {
    let e = edge(from, to)?;
    let Transition::Page { to: page, carries } = e.transition else {
        return Err(DrillError::InPlace { from, to });
    };
    let payload = RoutePayload::capture(snapshot, carries);
    tracing::info!(%from, %to, page = page.slug(), keys = payload.len(), "drill jump");
    router.set_route(RouteTarget::Page(page), Some(payload));
    Ok(page)
}

/// Open the company drilldown for `company` from a comparison dashboard.
pub fn open_company(
    from: DrillNode,
    snapshot: &FilterContext,
    company: &str,
    router: &mut dyn HostRouter,
) -> Result<PageRoute, DrillError> {
    let ctx = snapshot.clone().with(FilterKey::Company, company);
    jump(from, DrillNode::Level(DrilldownLevel::Company), &ctx, router)
}

/// Breadcrumb state of the in-place hierarchy on the company page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrillCoordinator {
    trail: Vec<Crumb>,
}

impl DrillCoordinator {
    pub fn new(ctx: &FilterContext) -> Self {
        let mut coordinator = Self { trail: Vec::new() };
        coordinator.sync(ctx);
        coordinator
    }

    /// Rebuild the trail from the live filters, e.g. after a route payload
    /// seeded them.
    pub fn sync(&mut self, ctx: &FilterContext) {
        self.trail = vec![Crumb {
            level: DrilldownLevel::Company,
            value: ctx.company.clone(),
        }];
        if ctx.branch.is_some() || ctx.department.is_some() {
            self.trail.push(Crumb {
                level: DrilldownLevel::Branch,
                value: ctx.branch.clone(),
            });
        }
        if let Some(dept) = &ctx.department {
            self.trail.push(Crumb {
                level: DrilldownLevel::Department,
                value: Some(dept.clone()),
            });
        }
    }

    pub fn level(&self) -> DrilldownLevel {
        self.trail
            .last()
            .map_or(DrilldownLevel::Company, |c| c.level)
    }

    pub fn breadcrumb(&self) -> &[Crumb] {
        &self.trail
    }

    /// Department currently narrowed in place, if any.
    pub fn department(&self) -> Option<&str> {
        self.trail
            .iter()
            .find(|c| c.level == DrilldownLevel::Department)
            .and_then(|c| c.value.as_deref())
    }

    /// Narrow to a branch, or to all branches with `None`.
    pub fn select_branch(
        &mut self,
        filters: &mut FilterState,
        branch: Option<&str>,
    ) -> Result<DrillStep, DrillError> {
        edge(
            DrillNode::Level(DrilldownLevel::Company),
            DrillNode::Level(DrilldownLevel::Branch),
        )?;
        filters.set(
            FilterPatch::new()
                .set(FilterKey::Branch, branch.unwrap_or_default())
                .clear(FilterKey::Department)
                .clear(FilterKey::Designation),
        );
        self.trail.truncate(1);
        self.trail.push(Crumb {
            level: DrilldownLevel::Branch,
            value: branch.map(str::to_string),
        });
        Ok(DrillStep::Refresh)
    }

    /// Narrow to a department in place.
    ///
    /// From the company level this passes through the branch level with
    /// "all branches".
    pub fn select_department(
        &mut self,
        filters: &mut FilterState,
        department: &str,
    ) -> Result<DrillStep, DrillError> {
        edge(
            DrillNode::Level(DrilldownLevel::Branch),
            DrillNode::Level(DrilldownLevel::Department),
        )?;
        if self.level() == DrilldownLevel::Company {
            self.trail.push(Crumb {
                level: DrilldownLevel::Branch,
                value: filters.get().branch,
            });
        }
        self.trail.truncate(2);
        filters.set(
            FilterPatch::new()
                .set(FilterKey::Department, department)
                .clear(FilterKey::Designation),
        );
        self.trail.push(Crumb {
            level: DrilldownLevel::Department,
            value: Some(department.to_string()),
        });
        Ok(DrillStep::Designations(department.to_string()))
    }

    /// Select a designation in the open department and move to its
    /// employee list.
    pub fn select_designation(
        &mut self,
        filters: &FilterState,
        router: &mut dyn HostRouter,
        designation: &str,
    ) -> Result<DrillStep, DrillError> {
        let from = DrillNode::Level(self.level());
        let to = DrillNode::Level(DrilldownLevel::Designation);
        if self.level() != DrilldownLevel::Department {
            return Err(DrillError::NoEdge { from, to });
        }
        edge(from, to)?;
        let snapshot = filters.get().with(FilterKey::Designation, designation);
        let page = jump(to, DrillNode::Level(DrilldownLevel::Employee), &snapshot, router)?;
        self.trail.push(Crumb {
            level: DrilldownLevel::Designation,
            value: Some(designation.to_string()),
        });
        Ok(DrillStep::Navigated(page))
    }

    /// Bypass from the risky-positions list straight to employees.
    pub fn select_risky(
        &self,
        filters: &FilterState,
        router: &mut dyn HostRouter,
        designation: &str,
    ) -> Result<DrillStep, DrillError> {
        let snapshot = filters.get().with(FilterKey::Designation, designation);
        let page = jump(
            DrillNode::RiskyPositions,
            DrillNode::Level(DrilldownLevel::Employee),
            &snapshot,
            router,
        )?;
        Ok(DrillStep::Navigated(page))
    }

    /// Step one level back up.
    pub fn up(&mut self, filters: &mut FilterState) -> DrillStep {
        match self.level() {
            DrilldownLevel::Company => DrillStep::Stay,
            DrilldownLevel::Branch => {
                let narrowed = self.trail.pop().and_then(|c| c.value).is_some();
                if narrowed {
                    filters.set(FilterPatch::new().clear(FilterKey::Branch));
                    DrillStep::Refresh
                } else {
                    DrillStep::Stay
                }
            }
            DrilldownLevel::Department | DrilldownLevel::Designation | DrilldownLevel::Employee => {
                self.trail.truncate(2);
                filters.set(
                    FilterPatch::new()
                        .clear(FilterKey::Department)
                        .clear(FilterKey::Designation),
                );
                DrillStep::CloseDesignations
            }
        }
    }
}
