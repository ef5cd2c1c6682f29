//! Record predicates
//!
//! Three independent tests a record can be put through: name-or-id
//! lookup, nested equality against a mapping, and a structured query
//! string handed to a [`QueryEvaluator`].

use crate::error::{Error, Result};
use crate::value;
use serde_json::{Map, Value};

/// Evaluates a structured query string against JSON data
pub trait QueryEvaluator {
    /// Run `expression` over `data` and return whatever it selects
    fn search(&self, expression: &str, data: &Value) -> Result<Value>;
}

/// JMESPath query evaluator
#[derive(Debug, Clone, Copy, Default)]
pub struct JmesPath;

impl QueryEvaluator for JmesPath {
    fn search(&self, expression: &str, data: &Value) -> Result<Value> {
        let invalid = |reason: String| Error::InvalidFilterExpression {
            expression: expression.to_string(),
            reason,
        };

        let compiled = match jmespath::compile(expression) {
            Ok(compiled) => compiled,
            Err(err) => {
                let quoted = quote_bare_literals(expression);
                if quoted == expression {
                    return Err(invalid(err.to_string()));
                }
                tracing::trace!("retrying query with quoted literals: {}", quoted);
                jmespath::compile(&quoted).map_err(|_| invalid(err.to_string()))?
            }
        };
        let found = compiled.search(data).map_err(|e| invalid(e.to_string()))?;
        Ok(serde_json::to_value(&*found)?)
    }
}

/// Rewrite backtick literals that are not valid JSON as JSON strings
///
/// `` `duck` `` becomes `` `"duck"` ``, the legacy JMESPath reading of a bare
/// literal. Raw strings and quoted identifiers are copied through untouched.
fn quote_bare_literals(expression: &str) -> String {
    let mut out = String::with_capacity(expression.len() + 8);
    let mut chars = expression.chars();

    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' => {
                out.push(c);
                while let Some(inner) = chars.next() {
                    out.push(inner);
                    if inner == '\\' {
                        if let Some(escaped) = chars.next() {
                            out.push(escaped);
                        }
                    } else if inner == c {
                        break;
                    }
                }
            }
            '`' => {
                let mut literal = String::new();
                while let Some(inner) = chars.next() {
                    match inner {
                        '\\' => match chars.next() {
                            Some('`') => literal.push('`'),
                            Some(other) => {
                                literal.push('\\');
                                literal.push(other);
                            }
                            None => literal.push('\\'),
                        },
                        '`' => break,
                        other => literal.push(other),
                    }
                }
                out.push('`');
                if serde_json::from_str::<Value>(&literal).is_ok() {
                    out.push_str(&literal.replace('`', "\\`"));
                } else {
                    let quoted = Value::String(literal.trim_start().to_string()).to_string();
                    out.push_str(&quoted.replace('`', "\\`"));
                }
                out.push('`');
            }
            other => out.push(other),
        }
    }

    out
}

/// A filter applied on top of name/id matching
#[derive(Debug, Clone, PartialEq)]
pub enum Filters {
    /// Every key must be present on the record with an equal value;
    /// nested mappings are compared recursively
    Match(Map<String, Value>),
    /// Structured query evaluated against a one-record list
    Query(String),
}

impl Filters {
    /// Interpret a JSON value as a filter: objects match, strings query
    ///
    /// Anything else (including an empty object or string) means "no filter".
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) if !map.is_empty() => Some(Filters::Match(map)),
            Value::String(expr) if !expr.is_empty() => Some(Filters::Query(expr)),
            _ => None,
        }
    }
}

impl From<Map<String, Value>> for Filters {
    fn from(map: Map<String, Value>) -> Self {
        Filters::Match(map)
    }
}

impl From<&str> for Filters {
    fn from(expr: &str) -> Self {
        Filters::Query(expr.to_string())
    }
}

/// Exact id match, or case-insensitive substring match on name
pub fn matches_name_or_id(record: &Value, name_or_id: &str) -> bool {
    if record.get("id").and_then(value::id_text).as_deref() == Some(name_or_id) {
        return true;
    }

    record
        .get("name")
        .and_then(Value::as_str)
        .map(|name| name.to_lowercase().contains(&name_or_id.to_lowercase()))
        .unwrap_or(false)
}

/// Nested equality: all keys of `filter` must be on `record` and equal
pub fn dict_filter(filter: &Map<String, Value>, record: &Value) -> bool {
    let Some(record) = record.as_object() else {
        return false;
    };
    if record.is_empty() {
        return false;
    }

    filter.iter().all(|(key, expected)| match (expected, record.get(key)) {
        (_, None) => false,
        (Value::Object(sub), Some(actual)) => dict_filter(sub, actual),
        (expected, Some(actual)) => expected == actual,
    })
}

/// Run a structured query against a single record
///
/// The record matches when the query selects something: a non-empty list,
/// or any truthy non-list result.
pub fn query_filter(evaluator: &dyn QueryEvaluator, expression: &str, record: &Value) -> Result<bool> {
    let view = Value::Array(vec![record.clone()]);
    let selected = evaluator.search(expression, &view)?;
    Ok(match selected {
        Value::Array(items) => !items.is_empty(),
        other => value::is_truthy(&other),
    })
}

/// Test a record against the name/id constraint and the filter
pub fn matches(
    evaluator: &dyn QueryEvaluator,
    record: &Value,
    name_or_id: Option<&str>,
    filters: Option<&Filters>,
) -> Result<bool> {
    if let Some(name_or_id) = name_or_id {
        if !matches_name_or_id(record, name_or_id) {
            return Ok(false);
        }
    }

    match filters {
        None => Ok(true),
        Some(Filters::Match(map)) if map.is_empty() => Ok(true),
        Some(Filters::Match(map)) => Ok(dict_filter(map, record)),
        Some(Filters::Query(expr)) => query_filter(evaluator, expr, record),
    }
}
