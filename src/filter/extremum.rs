//! Minimum/maximum lookup across records
//!
//! A key that is missing from a record is skipped; a key that is present
//! with a falsy value (`null`, `""`, `0`) counts as `0`.

use crate::error::{Error, Result, Search};
use crate::value;
use serde_json::Value;

/// Which end of the range to look for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extremum {
    Min,
    Max,
}

impl Extremum {
    fn search(self) -> Search {
        match self {
            Extremum::Min => Search::Minimum,
            Extremum::Max => Search::Maximum,
        }
    }

    fn prefers(self, candidate: i64, current: i64) -> bool {
        match self {
            Extremum::Min => candidate < current,
            Extremum::Max => candidate > current,
        }
    }
}

/// Integer value of `key` in `record`, or `None` if the key is absent
pub(crate) fn int_field(record: &Value, key: &str, search: Search) -> Result<Option<i64>> {
    let Some(raw) = record.get(key) else {
        return Ok(None);
    };
    value::as_int(raw)
        .map(Some)
        .ok_or_else(|| Error::NonIntegerValue {
            search,
            key: key.to_string(),
            value: value::display(raw),
        })
}

/// Find the smallest or largest integer stored under `key`
///
/// Returns `Ok(None)` when no record carries the key at all.
pub fn find_extremum(key: &str, records: &[Value], which: Extremum) -> Result<Option<i64>> {
    let mut best: Option<i64> = None;
    for record in records {
        let Some(candidate) = int_field(record, key, which.search())? else {
            continue;
        };
        best = match best {
            Some(current) if !which.prefers(candidate, current) => Some(current),
            _ => Some(candidate),
        };
    }
    Ok(best)
}

/// Smallest integer value of `key` across `records`
pub fn safe_dict_min(key: &str, records: &[Value]) -> Result<Option<i64>> {
    find_extremum(key, records, Extremum::Min)
}

/// Largest integer value of `key` across `records`
pub fn safe_dict_max(key: &str, records: &[Value]) -> Result<Option<i64>> {
    find_extremum(key, records, Extremum::Max)
}
