//! BDD tests for filter handoff and tab navigation.
//!
//! These scenarios cover the core, side-effect free half of navigation:
//! - Tab patches merge over the live filter context
//! - Link tabs build payloads and URLs without empty keys
//! - Route payloads seed a destination exactly once
//! - Drill edges carry exactly the keys they declare

use chrono::NaiveDate;
use serde_json::json;
use workforce_core::{
    edge, DrillNode, DrilldownLevel, FilterContext, FilterKey, FilterState, HostRouter,
    MemoryRouter, NavigationConfig, PageRoute, RoutePayload, RouteTarget, TabAction, Transition,
};

fn as_on() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
}

fn home() -> RouteTarget {
    RouteTarget::Page(PageRoute::HrAnalytics)
}

#[test]
fn bdd_scenario_filter_dashboard_tab_overrides_only_its_fields() {
    // GIVEN a live context {company: Acme, department: Ops}
    let mut state = FilterState::new(
        FilterContext::as_on(as_on())
            .with(FilterKey::Company, "Acme")
            .with(FilterKey::Department, "Ops"),
    );
    let rx = state.subscribe();

    // AND a Filter Dashboard tab carrying {department: Sales}
    let loaded = NavigationConfig::from_json(json!({
        "tabs": [{"tab_label": "Sales", "tab_type": "Filter Dashboard", "department": "Sales"}]
    }))
    .unwrap();
    let tab = &loaded.config.tabs[0];

    // WHEN the tab's action is applied
    let TabAction::ApplyFilters(patch) = tab.resolve(&state.get(), &home()).unwrap() else {
        panic!("filter dashboard tabs merge filters");
    };
    state.set(patch);

    // THEN company is untouched and department is replaced
    let ctx = state.get();
    assert_eq!(ctx.company.as_deref(), Some("Acme"));
    assert_eq!(ctx.department.as_deref(), Some("Sales"));

    // AND exactly one change notification fired
    assert_eq!(rx.try_iter().count(), 1);
}

#[test]
fn bdd_scenario_route_link_in_app_carries_company_only() {
    // GIVEN an in-app Route Link tab to "analytics" carrying {company: Acme}
    let loaded = NavigationConfig::from_json(json!({
        "tabs": [{
            "tab_label": "Analytics", "tab_type": "Route Link",
            "route": "analytics", "company": "Acme",
            "department": "", "designation": null, "open_in_new_window": 0
        }]
    }))
    .unwrap();

    // AND an empty live context
    let ctx = FilterContext::as_on(as_on());

    // WHEN the tab resolves
    let action = loaded.config.tabs[0].resolve(&ctx, &home()).unwrap();

    // THEN it navigates in-app with company=Acme and nothing else
    let TabAction::Navigate { target, payload } = action else {
        panic!("expected in-app navigation");
    };
    assert_eq!(target.to_string(), "/app/analytics");
    let keys: Vec<_> = payload.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec![FilterKey::Company]);
    assert_eq!(payload.get(FilterKey::Company), Some("Acme"));
}

#[test]
fn bdd_scenario_one_shot_payload_seeds_destination_once() {
    // GIVEN a page transition carrying {designation: Engineer}
    let mut router = MemoryRouter::at(RouteTarget::Page(PageRoute::CompanyDrilldown));
    let mut payload = RoutePayload::default();
    payload.insert(FilterKey::Designation, "Engineer");
    router.set_route(RouteTarget::Page(PageRoute::EmployeeDrilldown), Some(payload));

    // WHEN the destination loads and consumes the route options
    let mut dest = FilterState::new(FilterContext::as_on(as_on()));
    if let Some(options) = router.take_route_options() {
        dest.set(options.into_seed());
    }
    assert_eq!(dest.get().designation.as_deref(), Some("Engineer"));

    // AND the user clears the designation and refreshes
    dest.set(workforce_core::FilterPatch::new().clear(FilterKey::Designation));
    let replay = router.take_route_options();

    // THEN nothing is replayed
    assert!(replay.is_none());
    assert_eq!(dest.get().designation, None);
}

#[test]
fn bdd_scenario_designation_edge_carries_hierarchy_keys() {
    // GIVEN a company drilldown context narrowed to a department
    let ctx = FilterContext::as_on(as_on())
        .with(FilterKey::Company, "Acme")
        .with(FilterKey::Department, "Sales")
        .with(FilterKey::Designation, "Engineer");

    // WHEN following Designation -> Employee
    let e = edge(
        DrillNode::Level(DrilldownLevel::Designation),
        DrillNode::Level(DrilldownLevel::Employee),
    )
    .unwrap();
    let Transition::Page { to, carries } = e.transition else {
        panic!("designation to employee changes page");
    };
    let payload = RoutePayload::capture(&ctx, carries);

    // THEN the payload targets the employee page and omits the unset branch
    assert_eq!(to, PageRoute::EmployeeDrilldown);
    assert_eq!(payload.get(FilterKey::Company), Some("Acme"));
    assert_eq!(payload.get(FilterKey::AsOnDate), Some("2024-06-30"));
    assert_eq!(payload.get(FilterKey::Department), Some("Sales"));
    assert!(!payload.contains(FilterKey::Branch));
}

#[test]
fn bdd_scenario_comparison_jump_carries_company_and_date_only() {
    let ctx = FilterContext::as_on(as_on())
        .with(FilterKey::HoldingCompany, "Acme Holding")
        .with(FilterKey::Company, "Acme KSA")
        .with(FilterKey::Branch, "Jeddah");

    let e = edge(
        DrillNode::HoldingComparison,
        DrillNode::Level(DrilldownLevel::Company),
    )
    .unwrap();
    let Transition::Page { carries, .. } = e.transition else {
        panic!("holding comparison jumps pages");
    };
    let payload = RoutePayload::capture(&ctx, carries);
    assert_eq!(payload.len(), 2);
    assert!(!payload.contains(FilterKey::HoldingCompany));
    assert!(!payload.contains(FilterKey::Branch));
}
