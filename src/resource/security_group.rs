//! Security group and rule normalization
//!
//! The compute service and the network service both serve security
//! groups. The compute flavor names ports `from_port`/`to_port` and uses
//! `-1` for "any port"; the network flavor uses `port_range_min`/
//! `port_range_max` and `null`. Records are shaped like the network flavor.

use super::fields::{pop_project_id, RawFields};
use super::record::Normalized;
use super::Normalizer;
use crate::context::Location;
use crate::error::Result;
use crate::value;
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecurityGroup {
    pub location: Location,
    pub id: Value,
    pub name: Value,
    pub description: Value,
    pub security_group_rules: Vec<Normalized<SecurityGroupRule>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecurityGroupRule {
    pub id: Value,
    pub direction: String,
    pub ethertype: String,
    pub port_range_min: Option<i64>,
    pub port_range_max: Option<i64>,
    pub protocol: Value,
    pub remote_ip_prefix: Value,
    pub security_group_id: Value,
    pub remote_group_id: Value,
    pub location: Location,
}

/// Port bound: `null` and `-1` both mean unbounded
fn port_bound(fields: &RawFields, field: &str, raw: Option<Value>) -> Result<Option<i64>> {
    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(raw) => match fields.int_of(field, &raw)? {
            -1 => Ok(None),
            port => Ok(Some(port)),
        },
    }
}

impl Normalizer<'_> {
    pub fn normalize_security_group(&self, raw: &Value) -> Result<Normalized<SecurityGroup>> {
        let mut fields = RawFields::copy_of("security group", raw, self.context.strict_mode)?;

        let rules_key = ["security_group_rules", "rules"]
            .into_iter()
            .find(|key| fields.get(key).is_some());
        let mut stray_rules = None;
        let rules = match fields.pop_first(&["security_group_rules", "rules"]) {
            Some(Value::Array(rules)) => self.normalize_security_group_rules(&rules)?,
            Some(Value::Null) | None => Vec::new(),
            // Not a list of rules; keep it verbatim in properties
            Some(other) => {
                stray_rules = rules_key.map(|key| (key.to_string(), other));
                Vec::new()
            }
        };
        let project_id = pop_project_id(&mut fields).unwrap_or_else(|| json!(""));

        let group = SecurityGroup {
            location: self.context.location(value::id_text(&project_id).as_deref(), None),
            id: fields.require("id")?,
            name: fields.require("name")?,
            description: fields.pop_value("description"),
            security_group_rules: rules,
        };

        let mut properties = fields.into_properties();
        if let Some((key, stray)) = stray_rules {
            properties.insert(key, stray);
        }

        Ok(Normalized::new(group, properties, self.context.strict_mode)
            .with_alias("tenant_id", project_id.clone())
            .with_alias("project_id", project_id))
    }

    pub fn normalize_security_groups(&self, raws: &[Value]) -> Result<Vec<Normalized<SecurityGroup>>> {
        raws.iter()
            .map(|raw| self.normalize_security_group(raw))
            .collect()
    }

    pub fn normalize_security_group_rule(&self, raw: &Value) -> Result<Normalized<SecurityGroupRule>> {
        let mut fields = RawFields::copy_of("security group rule", raw, self.context.strict_mode)?;

        let id = fields.require("id")?;
        let direction = fields.pop_str_or("direction", "ingress");
        let ethertype = fields.pop_str_or("ethertype", "IPv4");

        let min = fields.pop_first(&["port_range_min", "from_port"]);
        let port_range_min = port_bound(&fields, "port_range_min", min)?;
        let max = fields.pop_first(&["port_range_max", "to_port"]);
        let port_range_max = port_bound(&fields, "port_range_max", max)?;

        let protocol = fields.pop_first(&["protocol", "ip_protocol"]).unwrap_or_default();
        let cidr = fields
            .pop("ip_range")
            .and_then(|range| range.get("cidr").cloned())
            .unwrap_or_default();
        let remote_ip_prefix = fields.pop("remote_ip_prefix").unwrap_or(cidr);
        let security_group_id = fields
            .pop_first(&["security_group_id", "parent_group_id"])
            .unwrap_or_default();
        let remote_group_id = fields.pop_value("remote_group_id");
        let project_id = pop_project_id(&mut fields).unwrap_or_else(|| json!(""));

        let rule = SecurityGroupRule {
            id,
            direction,
            ethertype,
            port_range_min,
            port_range_max,
            protocol,
            remote_ip_prefix,
            security_group_id,
            remote_group_id,
            location: self.context.location(value::id_text(&project_id).as_deref(), None),
        };

        Ok(
            Normalized::new(rule, fields.into_properties(), self.context.strict_mode)
                .with_alias("tenant_id", project_id.clone())
                .with_alias("project_id", project_id),
        )
    }

    pub fn normalize_security_group_rules(
        &self,
        raws: &[Value],
    ) -> Result<Vec<Normalized<SecurityGroupRule>>> {
        raws.iter()
            .map(|raw| self.normalize_security_group_rule(raw))
            .collect()
    }
}
