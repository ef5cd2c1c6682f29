//! Server normalization

use super::fields::{pop_project_id, without_links, RawFields};
use super::record::Normalized;
use super::Normalizer;
use crate::context::Location;
use crate::error::Result;
use crate::value;
use serde::Serialize;
use serde_json::{json, Value};

/// Extended status keys; the canonical name is the part after the colon
const EXTENDED_STATUS_FIELDS: &[&str] = &[
    "OS-EXT-STS:power_state",
    "OS-EXT-STS:task_state",
    "OS-EXT-STS:vm_state",
    "OS-SRV-USG:launched_at",
    "OS-SRV-USG:terminated_at",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Server {
    pub id: Value,
    pub name: Value,
    pub flavor: Value,
    /// Either an object or a bare id string when booted from volume
    pub image: Value,
    pub location: Location,
    pub volumes: Value,
    pub has_config_drive: bool,
    pub host_id: Value,
    pub progress: i64,
    pub disk_config: Value,
    pub power_state: Value,
    pub task_state: Value,
    pub vm_state: Value,
    pub launched_at: Value,
    pub terminated_at: Value,
    #[serde(rename = "accessIPv4")]
    pub access_ipv4: Value,
    #[serde(rename = "accessIPv6")]
    pub access_ipv6: Value,
    pub addresses: Value,
    #[serde(rename = "adminPass")]
    pub admin_pass: Value,
    pub created: Value,
    pub key_name: Value,
    pub metadata: Value,
    pub networks: Value,
    pub private_v4: Value,
    pub public_v4: Value,
    pub public_v6: Value,
    pub security_groups: Value,
    pub status: Value,
    pub updated: Value,
    pub user_id: Value,
    pub interface_ip: String,
}

impl Normalizer<'_> {
    pub fn normalize_server(&self, raw: &Value) -> Result<Normalized<Server>> {
        let mut fields = RawFields::copy_of("server", raw, self.context.strict_mode)?;
        fields.strip_noise();

        let id = fields.require("id")?;
        let name = fields.require("name")?;
        let flavor = without_links(fields.pop_value("flavor"));
        let image = without_links(fields.pop_value("image"));

        let project_id = pop_project_id(&mut fields).unwrap_or_else(|| json!(""));
        let az = fields
            .pop_or_get("OS-EXT-AZ:availability_zone")
            .unwrap_or(Value::Null);
        let location = self.context.location(value::id_text(&project_id).as_deref(), az.as_str());

        let volumes = match fields.pop_or_get("os-extended-volumes:volumes_attached") {
            Some(Value::Null) | None => json!([]),
            Some(volumes) => volumes,
        };
        let config_drive = fields.pop_or("config_drive", Value::Bool(false));
        let host_id = fields.pop_value("hostId");
        let progress = fields.pop_int("progress")?;
        let disk_config = fields.pop_or_get("OS-DCF:diskConfig").unwrap_or(Value::Null);

        let mut extended = EXTENDED_STATUS_FIELDS
            .iter()
            .map(|key| fields.pop_or_get(key).unwrap_or(Value::Null))
            .collect::<Vec<_>>()
            .into_iter();

        let server = Server {
            id,
            name,
            flavor,
            image,
            location,
            volumes,
            has_config_drive: value::to_bool(&config_drive),
            host_id: host_id.clone(),
            progress,
            disk_config,
            power_state: extended.next().unwrap_or_default(),
            task_state: extended.next().unwrap_or_default(),
            vm_state: extended.next().unwrap_or_default(),
            launched_at: extended.next().unwrap_or_default(),
            terminated_at: extended.next().unwrap_or_default(),
            access_ipv4: fields.pop_value("accessIPv4"),
            access_ipv6: fields.pop_value("accessIPv6"),
            addresses: fields.pop_value("addresses"),
            admin_pass: fields.pop_value("adminPass"),
            created: fields.pop_value("created"),
            key_name: fields.pop_value("key_name"),
            metadata: fields.pop_value("metadata"),
            networks: fields.pop_value("networks"),
            private_v4: fields.pop_value("private_v4"),
            public_v4: fields.pop_value("public_v4"),
            public_v6: fields.pop_value("public_v6"),
            security_groups: fields.pop_value("security_groups"),
            status: fields.pop_value("status"),
            updated: fields.pop_value("updated"),
            user_id: fields.pop_value("user_id"),
            interface_ip: String::new(),
        };

        let region = self.context.region_name.clone();
        let cloud = self.context.cloud_name.clone();
        Ok(
            Normalized::new(server, fields.into_properties(), self.context.strict_mode)
                .with_alias("hostId", host_id)
                .with_alias("config_drive", config_drive)
                .with_alias("project_id", project_id.clone())
                .with_alias("tenant_id", project_id)
                .with_alias("region", json!(region))
                .with_alias("cloud", json!(cloud))
                .with_alias("az", az),
        )
    }

    pub fn normalize_servers(&self, raws: &[Value]) -> Result<Vec<Normalized<Server>>> {
        raws.iter().map(|raw| self.normalize_server(raw)).collect()
    }
}
