//! Cloud context
//!
//! The read-only snapshot of "where we are" that every normalization call
//! consults: cloud name, region, default zone, current project and the
//! switches that change record shape.

use serde::{Deserialize, Serialize};

/// Which service owns floating IPs in this cloud
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FloatingIpSource {
    /// Network service: floating IPs are bound to ports and carry a status
    #[default]
    Network,
    /// Compute service: floating IPs are bound to instances, always active
    Compute,
}

impl std::str::FromStr for FloatingIpSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "network" | "neutron" => Ok(Self::Network),
            "compute" | "nova" => Ok(Self::Compute),
            other => Err(format!("unknown floating IP source: {}", other)),
        }
    }
}

/// Project identity attached to a location
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub id: Option<String>,
    pub name: Option<String>,
    pub domain_id: Option<String>,
    pub domain_name: Option<String>,
}

impl ProjectInfo {
    pub fn with_id(id: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            ..Self::default()
        }
    }
}

/// Where a resource lives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub cloud: String,
    pub region_name: Option<String>,
    pub zone: Option<String>,
    pub project: ProjectInfo,
}

/// Ambient values for one logical session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CloudContext {
    pub cloud_name: String,
    pub region_name: Option<String>,
    pub zone: Option<String>,
    pub project: ProjectInfo,
    /// Emit only canonical fields plus `properties`
    pub strict_mode: bool,
    pub floating_ip_source: FloatingIpSource,
}

impl CloudContext {
    pub fn new(cloud_name: &str) -> Self {
        Self {
            cloud_name: cloud_name.to_string(),
            ..Self::default()
        }
    }

    pub fn with_region(mut self, region: &str) -> Self {
        self.region_name = Some(region.to_string());
        self
    }

    pub fn with_zone(mut self, zone: &str) -> Self {
        self.zone = Some(zone.to_string());
        self
    }

    pub fn with_project(mut self, project: ProjectInfo) -> Self {
        self.project = project;
        self
    }

    pub fn with_strict_mode(mut self, strict: bool) -> Self {
        self.strict_mode = strict;
        self
    }

    pub fn with_floating_ip_source(mut self, source: FloatingIpSource) -> Self {
        self.floating_ip_source = source;
        self
    }

    /// Current project id, if known
    pub fn current_project_id(&self) -> Option<&str> {
        self.project.id.as_deref()
    }

    /// Resolve a location for a record owned by `project_id` in `zone`
    ///
    /// An empty or missing project id, or one equal to the current project,
    /// resolves to the full current project. A foreign project only carries
    /// its id. A missing zone falls back to the context zone.
    pub fn location(&self, project_id: Option<&str>, zone: Option<&str>) -> Location {
        let project = match project_id.filter(|id| !id.is_empty()) {
            Some(id) if Some(id) != self.current_project_id() => ProjectInfo::with_id(id),
            _ => self.project.clone(),
        };

        Location {
            cloud: self.cloud_name.clone(),
            region_name: self.region_name.clone(),
            zone: zone.map(str::to_string).or_else(|| self.zone.clone()),
            project,
        }
    }

    /// Location of the current project in the default zone
    pub fn current_location(&self) -> Location {
        self.location(None, None)
    }
}
