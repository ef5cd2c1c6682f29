//! Property-based tests using proptest
//!
//! These tests verify the list filter, range filter, and normalizer purity
//! using randomized inputs.

use cloudnorm::filter::{filter_list, parse_range, range_filter, safe_dict_max, safe_dict_min};
use cloudnorm::{CloudContext, Filters, Normalizer, ResourceKind};
use proptest::prelude::*;
use serde_json::{json, Value};

/// Generate arbitrary flavor-like record data for testing
fn arb_flavor() -> impl Strategy<Value = Value> {
    (
        "[a-f0-9]{8}",          // id
        "[a-z][a-z0-9.-]{0,20}", // name
        prop_oneof![Just(512i64), Just(1024), Just(2048), Just(4096), Just(8192)],
        1i64..16,
        prop_oneof!["RUNNING", "STOPPED", "ACTIVE", "ERROR"],
    )
        .prop_map(|(id, name, ram, vcpus, status)| {
            json!({
                "id": id,
                "name": name,
                "ram": ram,
                "vcpus": vcpus,
                "status": status,
                "OS-FLV-EXT-DATA:ephemeral": 0,
                "links": []
            })
        })
}

/// Generate a list of flavors
fn arb_flavor_list() -> impl Strategy<Value = Vec<Value>> {
    prop::collection::vec(arb_flavor(), 0..50)
}

proptest! {
    /// No constraints returns all items, in order
    #[test]
    fn empty_filter_returns_all(items in arb_flavor_list()) {
        let filtered = filter_list(&items, None, None).unwrap();
        prop_assert_eq!(filtered, items);
    }

    /// Filtering is idempotent - filtering twice with same filter gives same result
    #[test]
    fn filter_is_idempotent(
        items in arb_flavor_list(),
        filter in "[a-z]{0,3}"
    ) {
        let once = filter_list(&items, Some(filter.as_str()), None).unwrap();
        let twice = filter_list(&once, Some(filter.as_str()), None).unwrap();
        prop_assert_eq!(once, twice);
    }

    /// Filtering never increases the number of items
    #[test]
    fn filter_never_increases_count(
        items in arb_flavor_list(),
        filter in ".*"
    ) {
        let filtered = filter_list(&items, Some(filter.as_str()), None).unwrap();
        prop_assert!(filtered.len() <= items.len());
    }

    /// Name matching is case-insensitive
    #[test]
    fn filter_is_case_insensitive(
        items in arb_flavor_list(),
        filter in "[a-zA-Z]{1,5}"
    ) {
        let lower = filter_list(&items, Some(filter.to_lowercase().as_str()), None).unwrap();
        let upper = filter_list(&items, Some(filter.to_uppercase().as_str()), None).unwrap();
        prop_assert_eq!(lower, upper);
    }

    /// Every record is found by its own id
    #[test]
    fn filter_by_id_finds_record(items in arb_flavor_list()) {
        for item in &items {
            let id = item["id"].as_str().unwrap();
            let found = filter_list(&items, Some(id), None).unwrap();
            prop_assert!(found.contains(item));
        }
    }

    /// A mapping filter only keeps records with the matching value
    #[test]
    fn match_filter_by_status(items in arb_flavor_list()) {
        for status in &["RUNNING", "STOPPED", "ACTIVE"] {
            let filters = Filters::from_value(json!({ "status": status }));
            let filtered = filter_list(&items, None, filters.as_ref()).unwrap();
            let expected = items.iter().filter(|i| i["status"] == *status).count();
            prop_assert_eq!(filtered.len(), expected);
        }
    }

    /// JMESPath and mapping filters agree on flat equality
    #[test]
    fn query_agrees_with_match(items in arb_flavor_list(), ram in prop_oneof![Just(512i64), Just(2048)]) {
        let mapping = Filters::from_value(json!({ "ram": ram }));
        let query = Filters::Query(format!("[?ram == `{}`]", ram));
        let by_mapping = filter_list(&items, None, mapping.as_ref()).unwrap();
        let by_query = filter_list(&items, None, Some(&query)).unwrap();
        prop_assert_eq!(by_mapping, by_query);
    }
}

/// Tests for range filtering
mod range_tests {
    use super::*;

    proptest! {
        /// "min" keeps exactly the records holding the minimum
        #[test]
        fn min_keeps_all_ties(items in arb_flavor_list()) {
            let kept = range_filter(&items, "ram", "min").unwrap();
            match safe_dict_min("ram", &items).unwrap() {
                None => prop_assert!(kept.is_empty()),
                Some(min) => {
                    let expected = items.iter().filter(|i| i["ram"] == min).count();
                    prop_assert_eq!(kept.len(), expected);
                    prop_assert!(kept.iter().all(|i| i["ram"] == min));
                }
            }
        }

        /// "max" keeps exactly the records holding the maximum
        #[test]
        fn max_keeps_all_ties(items in arb_flavor_list()) {
            let kept = range_filter(&items, "vcpus", "max").unwrap();
            if let Some(max) = safe_dict_max("vcpus", &items).unwrap() {
                prop_assert!(!kept.is_empty());
                prop_assert!(kept.iter().all(|i| i["vcpus"] == max));
            }
        }

        /// "<N" and ">=N" split the list without overlap, preserving order
        #[test]
        fn comparison_partitions(items in arb_flavor_list(), bound in 0i64..10000) {
            let below = range_filter(&items, "ram", &format!("<{}", bound)).unwrap();
            let above = range_filter(&items, "ram", &format!(">={}", bound)).unwrap();
            prop_assert_eq!(below.len() + above.len(), items.len());
            let in_order: Vec<&Value> = items
                .iter()
                .filter(|i| i["ram"].as_i64().unwrap() < bound)
                .collect();
            prop_assert_eq!(below.iter().collect::<Vec<_>>(), in_order);
        }

        /// Plain integers parse as exact bounds
        #[test]
        fn parse_plain_integer(n in 0i64..1_000_000) {
            let bound = parse_range(Some(n.to_string().as_str())).unwrap();
            prop_assert_eq!(bound.op, None);
            prop_assert_eq!(bound.value, n);
        }

        /// Strings with letters never parse
        #[test]
        fn parse_rejects_letters(s in "[<>=]{0,2}[0-9]{0,3}[a-zA-Z][0-9a-z]{0,3}") {
            prop_assert!(parse_range(Some(s.as_str())).is_none());
            prop_assert!(range_filter(&[], "ram", &s).is_err()
                || s.eq_ignore_ascii_case("min")
                || s.eq_ignore_ascii_case("max"));
        }
    }
}

/// Tests for normalizer purity
mod normalize_tests {
    use super::*;

    proptest! {
        /// Normalizing two copies of the same input gives equal output,
        /// and the input is never modified
        #[test]
        fn normalize_is_pure(raw in arb_flavor(), strict in any::<bool>()) {
            let ctx = CloudContext::new("cloud").with_strict_mode(strict);
            let normalizer = Normalizer::new(&ctx);
            let snapshot = raw.clone();
            let first = normalizer.normalize(ResourceKind::Flavor, &raw).unwrap();
            let second = normalizer.normalize(ResourceKind::Flavor, &raw.clone()).unwrap();
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(raw, snapshot);
        }

        /// Outside strict mode every property also appears at top level,
        /// without clobbering canonical fields
        #[test]
        fn properties_are_flattened(raw in arb_flavor(), extra in "[a-z]{1,8}") {
            let ctx = CloudContext::new("cloud");
            let mut raw = raw;
            raw[format!("x-{}", extra)] = json!(extra.clone());
            raw["properties"] = json!("shadow");
            let value = Normalizer::new(&ctx).normalize(ResourceKind::Flavor, &raw).unwrap();
            let properties = value["properties"].as_object().unwrap().clone();
            let key = format!("x-{}", extra);
            prop_assert!(properties.contains_key(&key));
            for (key, val) in &properties {
                if key == "properties" {
                    continue;
                }
                prop_assert_eq!(&value[key], val);
            }
            prop_assert_eq!(&value["ram"], &raw["ram"]);
        }
    }
}
