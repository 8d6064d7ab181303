use crate::merge::{TransportProperties, merge};
use crate::planner::RegistryOptions;
use nacos_a2a_core::{NacosError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// A2A registration settings as written in a TOML file.
///
/// ```toml
/// enabled = true
/// register_as_latest = true
/// enabled_register_endpoint = true
/// overwrite_preferred_transport = "GRPC"
///
/// [transports.GRPC]
/// host = "10.0.0.5"
/// port = 50051
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NacosA2aConfig {
    pub enabled: bool,
    pub register_as_latest: bool,
    pub enabled_register_endpoint: bool,
    pub overwrite_preferred_transport: Option<String>,
    pub transports: HashMap<String, TransportProperties>,
}

impl Default for NacosA2aConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            register_as_latest: true,
            enabled_register_endpoint: true,
            overwrite_preferred_transport: None,
            transports: HashMap::new(),
        }
    }
}

impl NacosA2aConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content)
            .map_err(|e| NacosError::Config(format!("Invalid A2A registry config: {e}")))?;
        config.transports = config
            .transports
            .into_iter()
            .map(|(name, properties)| (name.to_uppercase(), properties))
            .collect();
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            NacosError::Config(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn registry_options(&self) -> RegistryOptions {
        RegistryOptions {
            set_as_latest: self.register_as_latest,
            enable_endpoint_registration: self.enabled_register_endpoint,
            overwrite_preferred_transport: self
                .overwrite_preferred_transport
                .clone()
                .filter(|t| !t.trim().is_empty()),
        }
    }

    /// File transports with `overrides` (typically the environment overlay) laid on top.
    pub fn transports_with(
        &self,
        overrides: &HashMap<String, TransportProperties>,
    ) -> HashMap<String, TransportProperties> {
        let mut transports = self.transports.clone();
        for (name, properties) in overrides {
            let name = name.to_uppercase();
            let merged = match transports.get(&name) {
                Some(base) => merge(base, Some(properties)),
                None => properties.clone(),
            };
            transports.insert(name, merged);
        }
        transports
    }
}
