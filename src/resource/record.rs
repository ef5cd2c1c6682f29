//! Canonical record container
//!
//! A normalized resource is two parts: the typed canonical fields of its
//! kind, and an ordered bag of overflow `properties`. Legacy flat access
//! (properties copied to the top level, old alias names) is a separate
//! rendering step that only runs outside strict mode.

use crate::error::Result;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct Normalized<T> {
    /// Typed canonical fields
    pub resource: T,
    /// Raw fields not promoted to a canonical name
    pub properties: Map<String, Value>,
    aliases: Map<String, Value>,
    strict: bool,
}

impl<T: Serialize> Normalized<T> {
    pub fn new(resource: T, properties: Map<String, Value>, strict: bool) -> Self {
        Self {
            resource,
            properties,
            aliases: Map::new(),
            strict,
        }
    }

    /// Add a legacy alias; ignored in strict mode
    pub fn with_alias(mut self, key: &str, value: Value) -> Self {
        if !self.strict {
            self.aliases.insert(key.to_string(), value);
        }
        self
    }

    /// Render as a flat JSON object
    ///
    /// Canonical fields come first, then `properties`. Outside strict mode
    /// the aliases are added and every property is copied to the top level
    /// unless a key of that name is already set.
    pub fn to_value(&self) -> Result<Value> {
        let mut out = match serde_json::to_value(&self.resource)? {
            Value::Object(map) => map,
            other => {
                let mut map = Map::new();
                map.insert("resource".to_string(), other);
                map
            }
        };
        out.insert(
            "properties".to_string(),
            Value::Object(self.properties.clone()),
        );

        if !self.strict {
            for (key, value) in &self.aliases {
                out.insert(key.clone(), value.clone());
            }
            for (key, value) in &self.properties {
                out.entry(key.clone()).or_insert_with(|| value.clone());
            }
        }

        Ok(Value::Object(out))
    }
}

impl<T: Serialize> Serialize for Normalized<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_value()
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Thing {
        id: String,
        name: String,
    }

    fn thing() -> Thing {
        Thing {
            id: "1".to_string(),
            name: "canonical".to_string(),
        }
    }

    fn props() -> Map<String, Value> {
        json!({"name": "shadowed", "vendor:extra": true})
            .as_object()
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_flatten_does_not_overwrite_canonical() {
        let value = Normalized::new(thing(), props(), false)
            .with_alias("tenant_id", json!("p"))
            .to_value()
            .unwrap();
        assert_eq!(value["name"], "canonical");
        assert_eq!(value["vendor:extra"], true);
        assert_eq!(value["tenant_id"], "p");
        assert_eq!(value["properties"]["name"], "shadowed");
    }

    #[test]
    fn test_strict_has_no_flattening_or_aliases() {
        let record = Normalized::new(thing(), props(), true).with_alias("tenant_id", json!("p"));
        assert!(record.aliases.is_empty());
        let value = record.to_value().unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["id", "name", "properties"]);
    }

    #[test]
    fn test_serialize_matches_to_value() {
        let record = Normalized::new(thing(), props(), false);
        assert_eq!(serde_json::to_value(&record).unwrap(), record.to_value().unwrap());
    }
}
