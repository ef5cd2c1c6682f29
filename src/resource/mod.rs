//! Resource normalization
//!
//! Compute, image and network services describe the same things with
//! different field names, types and nesting depending on API version and
//! vendor extensions. A [`Normalizer`] maps those raw records onto one
//! canonical shape per [`ResourceKind`].
//!
//! # Module Structure
//!
//! - `fields` - pop/ordered-fallback helpers over a copied raw record
//! - `record` - [`Normalized`], typed canonical fields plus overflow properties
//! - one module per resource kind
//!
//! # Example
//!
//! ```
//! use cloudnorm::context::CloudContext;
//! use cloudnorm::resource::{Normalizer, ResourceKind};
//! use serde_json::json;
//!
//! let ctx = CloudContext::new("mycloud").with_region("RegionOne");
//! let raw = json!({"id": "1", "name": "m1.tiny", "ram": "512", "swap": ""});
//! let flavor = Normalizer::new(&ctx).normalize(ResourceKind::Flavor, &raw).unwrap();
//! assert_eq!(flavor["ram"], 512);
//! assert_eq!(flavor["swap"], 0);
//! assert_eq!(flavor["location"]["region_name"], "RegionOne");
//! ```

mod fields;
mod flavor;
mod floating_ip;
mod image;
mod record;
mod security_group;
mod server;

pub use flavor::Flavor;
pub use floating_ip::FloatingIp;
pub use image::Image;
pub use record::Normalized;
pub use security_group::{SecurityGroup, SecurityGroupRule};
pub use server::Server;

use crate::context::CloudContext;
use crate::error::Result;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Kinds of resource with a canonical shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Flavor,
    Image,
    Server,
    SecurityGroup,
    SecurityGroupRule,
    FloatingIp,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 6] = [
        ResourceKind::Flavor,
        ResourceKind::Image,
        ResourceKind::Server,
        ResourceKind::SecurityGroup,
        ResourceKind::SecurityGroupRule,
        ResourceKind::FloatingIp,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Flavor => "flavor",
            ResourceKind::Image => "image",
            ResourceKind::Server => "server",
            ResourceKind::SecurityGroup => "security-group",
            ResourceKind::SecurityGroupRule => "security-group-rule",
            ResourceKind::FloatingIp => "floating-ip",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted || format!("{}s", kind.as_str()) == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|k| k.as_str()).collect();
                format!("unknown resource kind '{}' (expected one of: {})", s, known.join(", "))
            })
    }
}

/// Maps raw backend records to canonical records for one cloud context
#[derive(Debug, Clone, Copy)]
pub struct Normalizer<'a> {
    context: &'a CloudContext,
}

impl<'a> Normalizer<'a> {
    pub fn new(context: &'a CloudContext) -> Self {
        Self { context }
    }

    /// Normalize one raw record of `kind` and render it as JSON
    pub fn normalize(&self, kind: ResourceKind, raw: &Value) -> Result<Value> {
        tracing::debug!("Normalizing {} record", kind);
        match kind {
            ResourceKind::Flavor => self.normalize_flavor(raw)?.to_value(),
            ResourceKind::Image => self.normalize_image(raw)?.to_value(),
            ResourceKind::Server => self.normalize_server(raw)?.to_value(),
            ResourceKind::SecurityGroup => self.normalize_security_group(raw)?.to_value(),
            ResourceKind::SecurityGroupRule => self.normalize_security_group_rule(raw)?.to_value(),
            ResourceKind::FloatingIp => self.normalize_floating_ip(raw)?.to_value(),
        }
    }

    /// Normalize a list of raw records, keeping order; stops at the first bad record
    pub fn normalize_all(&self, kind: ResourceKind, raws: &[Value]) -> Result<Vec<Value>> {
        tracing::debug!("Normalizing {} {} records", raws.len(), kind);
        raws.iter().map(|raw| self.normalize(kind, raw)).collect()
    }
}
