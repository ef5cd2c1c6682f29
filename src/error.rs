//! Error types for normalization and list filtering

use std::fmt;
use thiserror::Error;

/// Which code path was scanning a field for integers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Search {
    Minimum,
    Maximum,
    Range,
}

impl fmt::Display for Search {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Search::Minimum => f.write_str("Search for minimum value failed"),
            Search::Maximum => f.write_str("Search for maximum value failed"),
            Search::Range => f.write_str("Range filter failed"),
        }
    }
}

/// Errors raised while normalizing or filtering resource records
///
/// None of these are transient: they describe bad input data or a bad
/// query, so callers should surface the message as-is.
#[derive(Debug, Error)]
pub enum Error {
    /// Structured query string failed to compile or evaluate
    #[error("Invalid filter expression '{expression}': {reason}")]
    InvalidFilterExpression { expression: String, reason: String },

    /// Range filter string is not an integer, a comparator or min/max
    #[error("Invalid range value: {0}")]
    InvalidRange(String),

    /// A record holds a non-integer value for a range/extremum key
    #[error("{search}. Value for {key} is not an integer: {value}")]
    NonIntegerValue {
        search: Search,
        key: String,
        value: String,
    },

    /// Raw record lacks an identity field
    #[error("{kind} record is missing required field '{field}'")]
    MissingRequiredField { kind: &'static str, field: &'static str },

    /// Numeric canonical field holds something that is not a number
    #[error("{kind} field '{field}' is not numeric: {value}")]
    InvalidNumber {
        kind: &'static str,
        field: String,
        value: String,
    },

    /// Raw record is not a JSON object
    #[error("{kind} record must be a JSON object")]
    NotAnObject { kind: &'static str },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for normalization and filtering
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_message_echoes_input() {
        let err = Error::InvalidRange("<1A0".to_string());
        assert_eq!(err.to_string(), "Invalid range value: <1A0");
    }

    #[test]
    fn test_non_integer_wording_differs_per_search() {
        let min = Error::NonIntegerValue {
            search: Search::Minimum,
            key: "f1".to_string(),
            value: "aaa".to_string(),
        };
        let max = Error::NonIntegerValue {
            search: Search::Maximum,
            key: "f1".to_string(),
            value: "aaa".to_string(),
        };
        assert_eq!(
            min.to_string(),
            "Search for minimum value failed. Value for f1 is not an integer: aaa"
        );
        assert_eq!(
            max.to_string(),
            "Search for maximum value failed. Value for f1 is not an integer: aaa"
        );
    }
}
