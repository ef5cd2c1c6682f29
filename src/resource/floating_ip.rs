//! Floating IP normalization
//!
//! Only the attributes both backends can provide are promoted; everything
//! else stays in `properties`.

use super::fields::{pop_project_id, RawFields};
use super::record::Normalized;
use super::Normalizer;
use crate::context::{FloatingIpSource, Location};
use crate::error::Result;
use crate::value;
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FloatingIp {
    pub id: Value,
    pub location: Location,
    pub attached: bool,
    pub fixed_ip_address: Value,
    pub floating_ip_address: Value,
    pub network: Value,
    pub port: Value,
    pub router: Value,
    pub status: Value,
}

impl Normalizer<'_> {
    pub fn normalize_floating_ip(&self, raw: &Value) -> Result<Normalized<FloatingIp>> {
        let mut fields = RawFields::copy_of("floating ip", raw, self.context.strict_mode)?;

        let fixed_ip_address = fields
            .pop_first(&["fixed_ip_address", "fixed_ip"])
            .unwrap_or_default();
        let floating_ip_address = fields
            .pop_first(&["floating_ip_address", "ip"])
            .unwrap_or_default();
        let network_id = fields
            .pop_first(&["floating_network_id", "network", "pool"])
            .unwrap_or_default();
        let project_id = pop_project_id(&mut fields).unwrap_or_else(|| json!(""));

        let instance_id = fields.pop_value("instance_id");
        let router_id = fields.pop_value("router_id");
        let id = fields.require("id")?;
        let port_id = fields.pop_value("port_id");

        let (attached, status) = match self.context.floating_ip_source {
            FloatingIpSource::Network => (
                value::is_truthy(&port_id),
                fields.pop_or("status", json!("UNKNOWN")),
            ),
            // Compute-owned addresses have no lifecycle of their own.
            FloatingIpSource::Compute => (value::is_truthy(&instance_id), json!("ACTIVE")),
        };

        let ip = FloatingIp {
            id,
            location: self.context.location(value::id_text(&project_id).as_deref(), None),
            attached,
            fixed_ip_address,
            floating_ip_address,
            network: network_id.clone(),
            port: port_id.clone(),
            router: router_id.clone(),
            status,
        };

        Ok(
            Normalized::new(ip, fields.into_properties(), self.context.strict_mode)
                .with_alias("port_id", port_id)
                .with_alias("router_id", router_id)
                .with_alias("project_id", project_id.clone())
                .with_alias("tenant_id", project_id)
                .with_alias("floating_network_id", network_id),
        )
    }

    pub fn normalize_floating_ips(&self, raws: &[Value]) -> Result<Vec<Normalized<FloatingIp>>> {
        raws.iter()
            .map(|raw| self.normalize_floating_ip(raw))
            .collect()
    }
}
