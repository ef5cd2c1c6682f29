//! Range expressions
//!
//! Parses the strings accepted by range filters: `"1024"`, `"<1024"`,
//! `">=2"`, and the `min`/`max` selectors.

use crate::error::Error;
use std::fmt;
use std::str::FromStr;

/// Comparison operator of a range bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Lt,
    Gt,
    Le,
    Ge,
}

impl Operator {
    // Two-character operators come first so "<=" is not read as "<".
    const PREFIXES: [(&'static str, Operator); 4] = [
        ("<=", Operator::Le),
        (">=", Operator::Ge),
        ("<", Operator::Lt),
        (">", Operator::Gt),
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Lt => "<",
            Operator::Gt => ">",
            Operator::Le => "<=",
            Operator::Ge => ">=",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A numeric bound; no operator means exact equality
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeBound {
    pub op: Option<Operator>,
    pub value: i64,
}

impl RangeBound {
    pub fn matches(&self, candidate: i64) -> bool {
        match self.op {
            None => candidate == self.value,
            Some(Operator::Lt) => candidate < self.value,
            Some(Operator::Gt) => candidate > self.value,
            Some(Operator::Le) => candidate <= self.value,
            Some(Operator::Ge) => candidate >= self.value,
        }
    }
}

/// Parsed range filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeExpr {
    Min,
    Max,
    Bound(RangeBound),
}

impl FromStr for RangeExpr {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("min") {
            return Ok(RangeExpr::Min);
        }
        if s.eq_ignore_ascii_case("max") {
            return Ok(RangeExpr::Max);
        }
        parse_range(Some(s))
            .map(RangeExpr::Bound)
            .ok_or_else(|| Error::InvalidRange(s.to_string()))
    }
}

/// Parse a comparison string into a bound
///
/// Returns `None` for empty input and for anything that is not an optional
/// operator followed by decimal digits.
pub fn parse_range(value: Option<&str>) -> Option<RangeBound> {
    let value = value.filter(|v| !v.is_empty())?;

    let (op, digits) = Operator::PREFIXES
        .iter()
        .find_map(|(prefix, op)| value.strip_prefix(prefix).map(|rest| (Some(*op), rest)))
        .unwrap_or((None, value));

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    digits.parse::<i64>().ok().map(|value| RangeBound { op, value })
}
