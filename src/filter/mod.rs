//! List filtering
//!
//! Narrow a list of (usually normalized) records the same way for every
//! resource kind:
//!
//! - [`filter_list`] keeps records matching a name-or-id and an optional
//!   [`Filters`] (nested equality mapping or JMESPath string)
//! - [`range_filter`] keeps records whose numeric field satisfies a
//!   [`RangeExpr`] such as `"<=1024"`, `"2"` or `"min"`
//!
//! Both preserve the input order.
//!
//! # Example
//!
//! ```
//! use cloudnorm::filter::{filter_list, range_filter};
//! use serde_json::json;
//!
//! let flavors = vec![
//!     json!({"id": "1", "name": "m1.small", "ram": 2048}),
//!     json!({"id": "2", "name": "m1.large", "ram": 8192}),
//! ];
//! let small = range_filter(&flavors, "ram", "<4096").unwrap();
//! assert_eq!(small.len(), 1);
//! let large = filter_list(&flavors, Some("large"), None).unwrap();
//! assert_eq!(large[0]["id"], "2");
//! ```

mod extremum;
mod predicate;
mod range;

pub use extremum::{find_extremum, safe_dict_max, safe_dict_min, Extremum};
pub use predicate::{
    dict_filter, matches, matches_name_or_id, query_filter, Filters, JmesPath, QueryEvaluator,
};
pub use range::{parse_range, Operator, RangeBound, RangeExpr};

use crate::error::{Result, Search};
use serde_json::Value;

/// Keep records matching `name_or_id` and `filters`, using JMESPath for query strings
pub fn filter_list(
    records: &[Value],
    name_or_id: Option<&str>,
    filters: Option<&Filters>,
) -> Result<Vec<Value>> {
    filter_list_with(&JmesPath, records, name_or_id, filters)
}

/// [`filter_list`] with a caller-supplied query evaluator
pub fn filter_list_with(
    evaluator: &dyn QueryEvaluator,
    records: &[Value],
    name_or_id: Option<&str>,
    filters: Option<&Filters>,
) -> Result<Vec<Value>> {
    if name_or_id.is_none() && filters.is_none() {
        return Ok(records.to_vec());
    }

    let mut kept = Vec::new();
    for record in records {
        if matches(evaluator, record, name_or_id, filters)? {
            kept.push(record.clone());
        }
    }

    tracing::trace!("filter_list kept {} of {} records", kept.len(), records.len());
    Ok(kept)
}

/// Keep records whose integer `key` satisfies `range`
///
/// `range` is `"min"`, `"max"` (any case), or a comparison understood by
/// [`parse_range`]. Records without `key` never match. Selecting min/max
/// over records that all lack `key` yields an empty list.
pub fn range_filter(records: &[Value], key: &str, range: &str) -> Result<Vec<Value>> {
    let bound = match range.parse::<RangeExpr>()? {
        RangeExpr::Min | RangeExpr::Max => {
            let which = if range.eq_ignore_ascii_case("min") {
                Extremum::Min
            } else {
                Extremum::Max
            };
            match find_extremum(key, records, which)? {
                Some(value) => RangeBound { op: None, value },
                None => return Ok(Vec::new()),
            }
        }
        RangeExpr::Bound(bound) => bound,
    };

    let mut kept = Vec::new();
    for record in records {
        let Some(candidate) = extremum::int_field(record, key, Search::Range)? else {
            continue;
        };
        if bound.matches(candidate) {
            kept.push(record.clone());
        }
    }

    tracing::trace!("range_filter {}={} kept {} of {}", key, range, kept.len(), records.len());
    Ok(kept)
}
