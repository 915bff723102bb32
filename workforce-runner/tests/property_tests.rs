//! Property tests for epoch ordering and export arguments.

use chrono::NaiveDate;
use proptest::prelude::*;
use workforce_core::{ExportArgs, FetchError, FilterContext, FilterKey, FilterPatch, QuerySpec, QueryName};
use workforce_runner::{BatchResponse, FetchOrchestrator, ViewState};

fn ctx() -> FilterContext {
    FilterContext::as_on(NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()).with(FilterKey::Company, "Acme")
}

fn order(n: usize) -> impl Strategy<Value = Vec<usize>> {
    Just((0..n).collect::<Vec<_>>()).prop_shuffle()
}

fn scenario() -> impl Strategy<Value = (Vec<usize>, Vec<bool>)> {
    (1usize..8).prop_flat_map(|n| (order(n), prop::collection::vec(any::<bool>(), n)))
}

proptest! {
    /// Whatever order responses land in, only the most recent batch is
    /// applied, and only if it succeeded.
    #[test]
    fn only_the_latest_batch_lands((arrival, succeeds) in scenario()) {
        let mut fetch = FetchOrchestrator::new("prop");
        let batches: Vec<_> = (0..arrival.len())
            .map(|_| fetch.begin(&ctx(), &[FilterKey::Company], vec![QuerySpec::new(QueryName::Kpis)]).unwrap())
            .collect();
        let latest = batches.len() - 1;

        let mut view: ViewState<usize> = ViewState::default();
        for &i in &arrival {
            let result = if succeeds[i] {
                Ok(vec![serde_json::Value::Null])
            } else {
                Err(FetchError::Transport { method: "get_kpis".into(), message: "down".into() })
            };
            let response = BatchResponse {
                view: batches[i].view(),
                epoch: batches[i].epoch(),
                names: vec![QueryName::Kpis],
                result,
            };
            let changed = fetch.apply(&mut view, response, |_| Ok(i));
            prop_assert_eq!(changed, i == latest && succeeds[i]);
        }

        if succeeds[latest] {
            prop_assert_eq!(view.data(), Some(&latest));
            prop_assert_eq!(view.applied_epoch(), Some(batches[latest].epoch()));
        } else {
            prop_assert_eq!(view.data(), None);
            prop_assert_eq!(view.notice(), Some(FetchError::NOTICE));
        }
    }

    /// Export arguments are a subset of the filter keys, so a paging
    /// window can never leak into them.
    #[test]
    fn export_args_never_page(search in "[a-z ]{0,8}", offset in 0usize..500) {
        let mut c = ctx();
        c.merge(&FilterPatch::new().set(FilterKey::SearchText, search.clone()));
        let args = ExportArgs::from_filter(&c);
        prop_assert!(!args.contains("limit"));
        prop_assert!(!args.contains("offset"));
        prop_assert_eq!(args.get("company"), Some("Acme"));

        let page = QuerySpec::new(QueryName::EmployeeList)
            .page(workforce_core::PageWindow { limit: 50, offset })
            .args(&c);
        prop_assert_eq!(page.get("offset").cloned(), Some(offset.to_string()));
        for (k, v) in args.as_map() {
            prop_assert_eq!(page.get(k), Some(v));
        }
    }
}
