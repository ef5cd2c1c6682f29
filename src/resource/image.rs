//! Image normalization
//!
//! Images come from two API generations: the older one reports a boolean
//! `is_public`, the newer one a `visibility` string and a nested
//! `properties` mapping. Both are folded into the same record.

use super::fields::RawFields;
use super::record::Normalized;
use super::Normalizer;
use crate::context::Location;
use crate::error::Result;
use crate::value;
use serde::Serialize;
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Image {
    pub location: Location,
    pub id: Value,
    pub name: Value,
    pub checksum: Value,
    pub container_format: Value,
    pub created_at: Value,
    pub direct_url: Value,
    pub disk_format: Value,
    pub file: Value,
    pub min_disk: i64,
    pub min_ram: i64,
    pub owner: Value,
    pub size: i64,
    pub status: Value,
    pub tags: Value,
    pub updated_at: Value,
    pub virtual_size: i64,
    pub is_protected: bool,
    pub locations: Value,
    pub visibility: String,
    pub is_public: bool,
}

impl Normalizer<'_> {
    pub fn normalize_image(&self, raw: &Value) -> Result<Normalized<Image>> {
        let mut fields = RawFields::copy_of("image", raw, self.context.strict_mode)?;
        fields.strip_noise();

        let location = {
            let owner = fields.get("owner").and_then(value::id_text);
            self.context.location(owner.as_deref(), None)
        };

        let mut properties = match fields.pop("properties") {
            Some(Value::Object(nested)) => nested,
            Some(Value::Null) | None => Map::new(),
            Some(opaque) => {
                let mut bag = Map::new();
                bag.insert("properties".to_string(), opaque);
                bag
            }
        };

        let explicit_visibility = fields
            .pop("visibility")
            .filter(value::is_truthy)
            .map(|v| value::display(&v));
        let legacy_public = fields.pop("is_public").map(|v| value::to_bool(&v));
        let (visibility, is_public) = match explicit_visibility {
            Some(visibility) => {
                let is_public = visibility == "public";
                (visibility, is_public)
            }
            None => {
                let is_public = legacy_public.unwrap_or(false);
                let visibility = if is_public { "public" } else { "private" };
                (visibility.to_string(), is_public)
            }
        };
        let is_protected = fields
            .pop("protected")
            .map(|v| value::to_bool(&v))
            .unwrap_or(false);

        let image = Image {
            location,
            id: fields.require("id")?,
            name: fields.pop_value("name"),
            checksum: fields.pop_value("checksum"),
            container_format: fields.pop_value("container_format"),
            created_at: fields.pop_value("created_at"),
            direct_url: fields.pop_value("direct_url"),
            disk_format: fields.pop_value("disk_format"),
            file: fields.pop_value("file"),
            min_disk: fields.pop_int("min_disk")?,
            min_ram: fields.pop_int("min_ram")?,
            owner: fields.pop_value("owner"),
            size: fields.pop_int("size")?,
            status: fields.pop_value("status"),
            tags: fields.pop_value("tags"),
            updated_at: fields.pop_value("updated_at"),
            virtual_size: fields.pop_int("virtual_size")?,
            is_protected,
            locations: fields.pop_or("locations", json!([])),
            visibility,
            is_public,
        };

        // Nested properties win over stray top-level leftovers.
        for (key, val) in fields.into_properties() {
            properties.entry(key).or_insert(val);
        }

        Ok(Normalized::new(image, properties, self.context.strict_mode)
            .with_alias("protected", Value::Bool(is_protected)))
    }

    pub fn normalize_images(&self, raws: &[Value]) -> Result<Vec<Normalized<Image>>> {
        raws.iter().map(|raw| self.normalize_image(raw)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{CloudContext, ProjectInfo};

    fn context() -> CloudContext {
        CloudContext::new("cloud").with_project(ProjectInfo::with_id("me"))
    }

    #[test]
    fn test_visibility_from_legacy_is_public() {
        let ctx = context();
        let normalizer = Normalizer::new(&ctx);

        let public = normalizer
            .normalize_image(&json!({"id": "i1", "is_public": true}))
            .unwrap();
        assert_eq!(public.resource.visibility, "public");
        assert!(public.resource.is_public);

        let private = normalizer.normalize_image(&json!({"id": "i2"})).unwrap();
        assert_eq!(private.resource.visibility, "private");
        assert!(!private.resource.is_public);
    }

    #[test]
    fn test_is_public_from_visibility() {
        let ctx = context();
        let normalizer = Normalizer::new(&ctx);

        let shared = normalizer
            .normalize_image(&json!({"id": "i1", "visibility": "shared", "is_public": true}))
            .unwrap();
        assert_eq!(shared.resource.visibility, "shared");
        assert!(!shared.resource.is_public);

        let public = normalizer
            .normalize_image(&json!({"id": "i2", "visibility": "public"}))
            .unwrap();
        assert!(public.resource.is_public);
    }

    #[test]
    fn test_numeric_fields_and_nested_properties() {
        let ctx = context();
        let raw = json!({
            "id": "i1",
            "name": "cirros",
            "size": "13287936",
            "min_ram": null,
            "protected": "True",
            "owner": "someone-else",
            "properties": {"architecture": "x86_64", "os_distro": "cirros"},
            "os_distro": "ignored",
            "hw_disk_bus": "virtio"
        });
        let record = Normalizer::new(&ctx).normalize_image(&raw).unwrap();
        let image = &record.resource;
        assert_eq!(image.size, 13287936);
        assert_eq!(image.min_ram, 0);
        assert_eq!(image.min_disk, 0);
        assert!(image.is_protected);
        assert_eq!(image.location.project, ProjectInfo::with_id("someone-else"));
        assert_eq!(image.locations, json!([]));
        assert_eq!(record.properties["os_distro"], "cirros");
        assert_eq!(record.properties["hw_disk_bus"], "virtio");

        let value = record.to_value().unwrap();
        assert_eq!(value["architecture"], "x86_64");
        assert_eq!(value["protected"], true);
    }

    #[test]
    fn test_opaque_properties_are_kept() {
        let ctx = context();
        let raw = json!({"id": "i", "name": "n", "properties": "vendor-blob"});
        let record = Normalizer::new(&ctx).normalize_image(&raw).unwrap();
        assert_eq!(record.properties["properties"], "vendor-blob");
        assert_eq!(record.resource.name, "n");

        let value = record.to_value().unwrap();
        assert_eq!(value["properties"], json!({"properties": "vendor-blob"}));
    }

    #[test]
    fn test_missing_id_fails() {
        let ctx = context();
        assert!(Normalizer::new(&ctx)
            .normalize_image(&json!({"name": "nameless"}))
            .is_err());
    }
}
