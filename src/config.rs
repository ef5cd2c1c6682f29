//! Configuration Management
//!
//! Handles persistent configuration storage for cloudnorm and resolves the
//! cloud context from flags, the config file and `OS_*` environment
//! variables, in that order.

use anyhow::Result;
use cloudnorm::{CloudContext, FloatingIpSource, ProjectInfo};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Cloud name stamped into every location
    #[serde(default)]
    pub cloud: Option<String>,
    #[serde(default)]
    pub region_name: Option<String>,
    /// Default availability zone
    #[serde(default)]
    pub zone: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub project_domain_id: Option<String>,
    #[serde(default)]
    pub project_domain_name: Option<String>,
    #[serde(default)]
    pub strict_mode: bool,
    #[serde(default)]
    pub floating_ip_source: FloatingIpSource,
}

/// Values given on the command line; each one beats the config file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub cloud: Option<String>,
    pub region_name: Option<String>,
    pub zone: Option<String>,
    pub project_id: Option<String>,
    pub strict_mode: bool,
    pub floating_ip_source: Option<FloatingIpSource>,
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

impl Config {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("cloudnorm").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable config {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        tracing::info!("Saved config to {:?}", path);

        Ok(())
    }

    /// Get effective cloud name (config > OS_CLOUD > "default")
    pub fn effective_cloud(&self) -> String {
        self.cloud
            .clone()
            .or_else(|| env_var("OS_CLOUD"))
            .unwrap_or_else(|| "default".to_string())
    }

    /// Get effective region (config > OS_REGION_NAME)
    pub fn effective_region(&self) -> Option<String> {
        self.region_name.clone().or_else(|| env_var("OS_REGION_NAME"))
    }

    /// Get effective current project (config > OS_PROJECT_* / OS_TENANT_*)
    pub fn effective_project(&self) -> ProjectInfo {
        ProjectInfo {
            id: self
                .project_id
                .clone()
                .or_else(|| env_var("OS_PROJECT_ID"))
                .or_else(|| env_var("OS_TENANT_ID")),
            name: self
                .project_name
                .clone()
                .or_else(|| env_var("OS_PROJECT_NAME"))
                .or_else(|| env_var("OS_TENANT_NAME")),
            domain_id: self
                .project_domain_id
                .clone()
                .or_else(|| env_var("OS_PROJECT_DOMAIN_ID")),
            domain_name: self
                .project_domain_name
                .clone()
                .or_else(|| env_var("OS_PROJECT_DOMAIN_NAME")),
        }
    }

    /// Fold command-line overrides into this config
    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(cloud) = &overrides.cloud {
            self.cloud = Some(cloud.clone());
        }
        if let Some(region) = &overrides.region_name {
            self.region_name = Some(region.clone());
        }
        if let Some(zone) = &overrides.zone {
            self.zone = Some(zone.clone());
        }
        if let Some(project_id) = &overrides.project_id {
            self.project_id = Some(project_id.clone());
        }
        if overrides.strict_mode {
            self.strict_mode = true;
        }
        if let Some(source) = overrides.floating_ip_source {
            self.floating_ip_source = source;
        }
    }

    /// Build the context snapshot used for one run
    pub fn to_context(&self) -> CloudContext {
        let mut context = CloudContext::new(&self.effective_cloud())
            .with_project(self.effective_project())
            .with_strict_mode(self.strict_mode)
            .with_floating_ip_source(self.floating_ip_source);
        if let Some(region) = self.effective_region() {
            context = context.with_region(&region);
        }
        if let Some(zone) = &self.zone {
            context = context.with_zone(zone);
        }
        context
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_win() {
        let mut config = Config {
            cloud: Some("from-file".to_string()),
            region_name: Some("RegionOne".to_string()),
            ..Config::default()
        };
        config.apply(&Overrides {
            cloud: Some("from-flag".to_string()),
            zone: Some("az-2".to_string()),
            strict_mode: true,
            floating_ip_source: Some(FloatingIpSource::Compute),
            ..Overrides::default()
        });

        let context = config.to_context();
        assert_eq!(context.cloud_name, "from-flag");
        assert_eq!(context.region_name.as_deref(), Some("RegionOne"));
        assert_eq!(context.zone.as_deref(), Some("az-2"));
        assert!(context.strict_mode);
        assert_eq!(context.floating_ip_source, FloatingIpSource::Compute);
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: Config = serde_json::from_str(r#"{"cloud": "c"}"#).unwrap();
        assert_eq!(config.cloud.as_deref(), Some("c"));
        assert!(!config.strict_mode);
        assert_eq!(config.floating_ip_source, FloatingIpSource::Network);
    }
}
