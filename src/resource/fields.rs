//! Field extraction over a copied raw record
//!
//! [`RawFields`] owns a private copy of the backend payload. Normalizers pop
//! canonical fields out of it one by one; whatever is left over becomes the
//! record's `properties`.

use crate::error::{Error, Result};
use crate::value;
use serde_json::{Map, Value};

/// Display-only and hypermedia keys that never reach a canonical record
const NOISE_FIELDS: &[&str] = &["links", "NAME_ATTR", "HUMAN_ID", "human_id"];

pub(crate) struct RawFields {
    kind: &'static str,
    strict: bool,
    map: Map<String, Value>,
}

impl RawFields {
    /// Copy `raw` so the caller's record is never touched
    pub fn copy_of(kind: &'static str, raw: &Value, strict: bool) -> Result<Self> {
        let map = raw.as_object().cloned().ok_or(Error::NotAnObject { kind })?;
        Ok(Self { kind, strict, map })
    }

    pub fn strip_noise(&mut self) {
        for key in NOISE_FIELDS {
            self.map.shift_remove(*key);
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.map.get(key)
    }

    pub fn pop(&mut self, key: &str) -> Option<Value> {
        self.map.shift_remove(key)
    }

    /// Pop `key`, or an explicit null when it is absent
    pub fn pop_value(&mut self, key: &str) -> Value {
        self.pop(key).unwrap_or(Value::Null)
    }

    pub fn pop_or(&mut self, key: &str, default: Value) -> Value {
        self.pop(key).unwrap_or(default)
    }

    /// Remove every candidate key and return the first one that was present
    pub fn pop_first(&mut self, keys: &[&str]) -> Option<Value> {
        keys.iter()
            .map(|key| self.pop(key))
            .fold(None, |found, popped| found.or(popped))
    }

    /// Vendor-extension keys are consumed only in strict mode; otherwise
    /// they stay behind in `properties` for flat legacy access
    pub fn pop_or_get(&mut self, key: &str) -> Option<Value> {
        if self.strict {
            self.pop(key)
        } else {
            self.get(key).cloned()
        }
    }

    /// Pop an identity field that must be present
    pub fn require(&mut self, field: &'static str) -> Result<Value> {
        self.pop(field).ok_or(Error::MissingRequiredField {
            kind: self.kind,
            field,
        })
    }

    pub fn pop_int(&mut self, key: &str) -> Result<i64> {
        let raw = self.pop_value(key);
        self.int_of(key, &raw)
    }

    pub fn pop_float(&mut self, key: &str) -> Result<f64> {
        let raw = self.pop_value(key);
        value::as_float(&raw).ok_or_else(|| self.invalid_number(key, &raw))
    }

    /// Pop a string-valued field, falling back to `default`
    pub fn pop_str_or(&mut self, key: &str, default: &str) -> String {
        match self.pop(key) {
            Some(Value::String(s)) => s,
            Some(Value::Null) | None => default.to_string(),
            Some(other) => value::display(&other),
        }
    }

    /// Integer coercion with falsy values as zero
    pub fn int_of(&self, field: &str, raw: &Value) -> Result<i64> {
        value::as_int(raw).ok_or_else(|| self.invalid_number(field, raw))
    }

    fn invalid_number(&self, field: &str, raw: &Value) -> Error {
        Error::InvalidNumber {
            kind: self.kind,
            field: field.to_string(),
            value: value::display(raw),
        }
    }

    /// Whatever was not claimed by a canonical field
    pub fn into_properties(self) -> Map<String, Value> {
        self.map
    }
}

/// Project id from the usual owner keys, newest name first
pub(crate) fn pop_project_id(fields: &mut RawFields) -> Option<Value> {
    fields.pop_first(&["project_id", "tenant_id"])
}

/// Drop hypermedia links from a nested object; leave scalars alone
pub(crate) fn without_links(value: Value) -> Value {
    match value {
        Value::Object(mut map) => {
            map.shift_remove("links");
            Value::Object(map)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(raw: Value, strict: bool) -> RawFields {
        RawFields::copy_of("test", &raw, strict).unwrap()
    }

    #[test]
    fn test_copy_leaves_input_alone() {
        let raw = json!({"id": "1", "links": []});
        let mut f = fields(raw.clone(), false);
        f.strip_noise();
        f.pop("id");
        assert_eq!(raw, json!({"id": "1", "links": []}));
        assert!(f.into_properties().is_empty());
    }

    #[test]
    fn test_not_an_object() {
        let err = RawFields::copy_of("flavor", &json!([1]), false).err().unwrap();
        assert_eq!(err.to_string(), "flavor record must be a JSON object");
    }

    #[test]
    fn test_pop_first_prefers_earlier_key_and_consumes_all() {
        let mut f = fields(json!({"from_port": 22, "port_range_min": 80, "x": 1}), false);
        assert_eq!(f.pop_first(&["port_range_min", "from_port"]), Some(json!(80)));
        let props = f.into_properties();
        assert_eq!(props.len(), 1);
        assert!(props.contains_key("x"));
    }

    #[test]
    fn test_pop_first_falls_back() {
        let mut f = fields(json!({"from_port": 22}), false);
        assert_eq!(f.pop_first(&["port_range_min", "from_port"]), Some(json!(22)));
        assert_eq!(f.pop_first(&["a", "b"]), None);
    }

    #[test]
    fn test_pop_or_get_depends_on_strict() {
        let mut lax = fields(json!({"OS-DCF:diskConfig": "MANUAL"}), false);
        assert_eq!(lax.pop_or_get("OS-DCF:diskConfig"), Some(json!("MANUAL")));
        assert_eq!(lax.into_properties().len(), 1);

        let mut strict = fields(json!({"OS-DCF:diskConfig": "MANUAL"}), true);
        assert_eq!(strict.pop_or_get("OS-DCF:diskConfig"), Some(json!("MANUAL")));
        assert!(strict.into_properties().is_empty());
    }

    #[test]
    fn test_require() {
        let mut f = fields(json!({"name": "x"}), false);
        let err = f.require("id").unwrap_err();
        assert_eq!(err.to_string(), "test record is missing required field 'id'");
        assert_eq!(f.require("name").unwrap(), json!("x"));
    }

    #[test]
    fn test_pop_int_defaults_and_errors() {
        let mut f = fields(json!({"ram": "512", "swap": "", "disk": "big"}), false);
        assert_eq!(f.pop_int("ram").unwrap(), 512);
        assert_eq!(f.pop_int("swap").unwrap(), 0);
        assert_eq!(f.pop_int("vcpus").unwrap(), 0);
        assert!(matches!(f.pop_int("disk"), Err(Error::InvalidNumber { .. })));
    }

    #[test]
    fn test_without_links() {
        assert_eq!(without_links(json!({"id": "i", "links": []})), json!({"id": "i"}));
        assert_eq!(without_links(json!("image-id")), json!("image-id"));
    }
}
