//! Flavor normalization

use super::fields::RawFields;
use super::record::Normalized;
use super::Normalizer;
use crate::context::Location;
use crate::error::Result;
use crate::value;
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Flavor {
    pub location: Location,
    pub id: Value,
    pub name: Value,
    pub is_public: bool,
    pub is_disabled: bool,
    pub ram: i64,
    pub vcpus: i64,
    pub disk: i64,
    pub ephemeral: i64,
    pub swap: i64,
    pub rxtx_factor: f64,
    pub extra_specs: Value,
}

impl Normalizer<'_> {
    pub fn normalize_flavor(&self, raw: &Value) -> Result<Normalized<Flavor>> {
        let mut fields = RawFields::copy_of("flavor", raw, self.context.strict_mode)?;
        fields.strip_noise();

        let vendor_ephemeral = fields
            .pop_or_get("OS-FLV-EXT-DATA:ephemeral")
            .unwrap_or(Value::Null);
        let ephemeral = match fields.pop("ephemeral") {
            Some(plain) => fields.int_of("ephemeral", &plain)?,
            None => fields.int_of("OS-FLV-EXT-DATA:ephemeral", &vendor_ephemeral)?,
        };

        let vendor_public = fields
            .pop_or_get("os-flavor-access:is_public")
            .map(|v| value::to_bool(&v))
            .unwrap_or(true);
        let is_public = fields
            .pop("is_public")
            .map(|v| value::to_bool(&v))
            .unwrap_or(vendor_public);
        let is_disabled = fields
            .pop_or_get("OS-FLV-DISABLED:disabled")
            .map(|v| value::to_bool(&v))
            .unwrap_or(false);
        let extra_specs = fields.pop_or("extra_specs", json!({}));

        let flavor = Flavor {
            location: self.context.current_location(),
            id: fields.require("id")?,
            name: fields.require("name")?,
            is_public,
            is_disabled,
            ram: fields.pop_int("ram")?,
            vcpus: fields.pop_int("vcpus")?,
            disk: fields.pop_int("disk")?,
            ephemeral,
            swap: fields.pop_int("swap")?,
            rxtx_factor: fields.pop_float("rxtx_factor")?,
            extra_specs,
        };

        Ok(Normalized::new(
            flavor,
            fields.into_properties(),
            self.context.strict_mode,
        ))
    }

    pub fn normalize_flavors(&self, raws: &[Value]) -> Result<Vec<Normalized<Flavor>>> {
        raws.iter().map(|raw| self.normalize_flavor(raw)).collect()
    }
}
