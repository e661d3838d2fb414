//! YAML mount configuration.
//!
//! One file describes the router every instance hangs off and the ordered
//! list of instances to mount on it.
//!
//! ## Example
//!
//! ```yaml
//! router:
//!   application_context_path: /
//!   root_path: /api
//!   name: api
//!
//! instances:
//!   - resource_package: com.example.api.v1
//!     uri_prefix: /v1
//!     title: Example API
//!     version: "1.0"
//!   - resource_package: com.example.api.v2
//!     uri_prefix: /v2
//!     host: https://api.example.com
//!     allow_list_tags: [public]
//!     security_definitions:
//!       - name: key
//!         type: api_key
//!         key_name: X-Api-Key
//!         in: header
//! ```

use std::fs;
use std::path::Path;

use document::InstanceConfig;
use paths::RouterPaths;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading a mount configuration file
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("missing required field: {0}")]
    MissingField(String),
}

/// Where the router is mounted and how it is named.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterConfig {
    #[serde(default = "default_root")]
    pub application_context_path: String,

    #[serde(default = "default_root")]
    pub root_path: String,

    /// Prefix of every cache key derived for instances on this router.
    #[serde(default = "default_router_name")]
    pub name: String,
}

impl RouterConfig {
    pub fn paths(&self) -> RouterPaths {
        RouterPaths::new(&self.application_context_path, &self.root_path)
    }

    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.name.trim().is_empty() {
            return Err(ConfigLoadError::MissingField("router.name".into()));
        }
        for (field, value) in [
            ("application_context_path", &self.application_context_path),
            ("root_path", &self.root_path),
        ] {
            if !value.is_empty() && !value.starts_with('/') {
                return Err(ConfigLoadError::Validation(format!(
                    "router.{field} must start with '/': {value}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            application_context_path: default_root(),
            root_path: default_root(),
            name: default_router_name(),
        }
    }
}

/// Top-level mount configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MountConfig {
    #[serde(default)]
    pub router: RouterConfig,

    #[serde(default)]
    pub instances: Vec<InstanceConfig>,
}

impl MountConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: MountConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Field-level checks. Cross-instance rules (unique names, a single key
    /// family) belong to the planner.
    fn validate(&self) -> Result<(), ConfigLoadError> {
        self.router.validate()?;

        if self.instances.is_empty() {
            return Err(ConfigLoadError::MissingField("instances".into()));
        }
        for (index, instance) in self.instances.iter().enumerate() {
            if instance.packages().next().is_none() {
                return Err(ConfigLoadError::MissingField(format!(
                    "instances[{index}].resource_package"
                )));
            }
        }
        Ok(())
    }
}

fn default_root() -> String {
    "/".to_string()
}

fn default_router_name() -> String {
    "api".to_string()
}
