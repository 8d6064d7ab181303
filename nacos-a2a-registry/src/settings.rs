//! Registry settings read from the process environment.

use crate::overlay::DEFAULT_ENV_PREFIX;
use crate::registry::{AgentRegistry, NacosA2aRegistry};
use nacos_a2a_core::{A2aService, NacosError, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::env;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const DEFAULT_NAMESPACE: &str = "public";
pub const DEFAULT_USERNAME: &str = "nacos";
pub const DEFAULT_PASSWORD: &str = "nacos";

/// Registry types this crate can register with.
pub const SUPPORTED_REGISTRY_TYPES: &[&str] = &[NacosA2aRegistry::NAME];

/// How the Nacos client authenticates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NacosAuth {
    AccessKey { access_key: String, secret_key: String },
    UsernamePassword { username: String, password: String },
}

/// Connection parameters for a Nacos client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NacosClientConfig {
    pub server_address: String,
    pub namespace_id: String,
    pub auth: NacosAuth,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrySettings {
    /// `A2A_REGISTRY_ENABLED`, default `true`.
    pub enabled: bool,
    /// `A2A_REGISTRY_TYPE`, a comma separated list.
    pub registry_types: Vec<String>,
    /// `NACOS_SERVER_ADDR`, or `NACOS_SERVER_ADDRESS`.
    pub server_address: Option<String>,
    pub namespace_id: String,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    /// `NACOS_A2A_ENV_PREFIX`, prefix of the transport overlay variables.
    pub env_prefix: String,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            registry_types: Vec::new(),
            server_address: None,
            namespace_id: DEFAULT_NAMESPACE.to_string(),
            access_key: None,
            secret_key: None,
            username: None,
            password: None,
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
        }
    }
}

fn non_blank(value: Option<&String>) -> Option<String> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty()).map(str::to_string)
}

impl RegistrySettings {
    /// Read settings from the process environment, after loading a `.env`
    /// file if one is found. Variables already set are not overridden.
    pub fn from_env() -> Self {
        match dotenvy::dotenv() {
            Ok(path) => debug!(path = %path.display(), "loaded .env file"),
            Err(_) => debug!("no .env file found"),
        }
        Self::from_vars(env::vars())
    }

    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: HashMap<String, String> =
            vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        let mut settings = Self::default();

        if let Some(enabled) = non_blank(vars.get("A2A_REGISTRY_ENABLED")) {
            settings.enabled = enabled.eq_ignore_ascii_case("true");
        }
        if let Some(types) = vars.get("A2A_REGISTRY_TYPE") {
            settings.registry_types = types
                .split(',')
                .map(|t| t.trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect();
        }
        settings.server_address = non_blank(vars.get("NACOS_SERVER_ADDR"))
            .or_else(|| non_blank(vars.get("NACOS_SERVER_ADDRESS")));
        if let Some(namespace) = non_blank(vars.get("NACOS_NAMESPACE_ID")) {
            settings.namespace_id = namespace;
        }
        settings.access_key = non_blank(vars.get("NACOS_ACCESS_KEY"));
        settings.secret_key = non_blank(vars.get("NACOS_SECRET_KEY"));
        settings.username = non_blank(vars.get("NACOS_USERNAME"));
        settings.password = non_blank(vars.get("NACOS_PASSWORD"));
        if let Some(prefix) = non_blank(vars.get("NACOS_A2A_ENV_PREFIX")) {
            settings.env_prefix = prefix;
        }

        settings
    }

    pub fn registry_types(&self) -> &[String] {
        &self.registry_types
    }

    /// The requested registry types this crate supports. Unknown ones are logged and skipped.
    pub fn supported_registry_types(&self) -> Vec<String> {
        self.registry_types
            .iter()
            .filter(|t| {
                let supported = SUPPORTED_REGISTRY_TYPES.contains(&t.as_str());
                if !supported {
                    warn!(registry_type = %t, "unsupported registry type, skipping");
                }
                supported
            })
            .cloned()
            .collect()
    }

    /// Access-key credentials win over username/password when both are present.
    pub fn client_config(&self) -> Result<NacosClientConfig> {
        let server_address = self.server_address.clone().ok_or_else(|| {
            NacosError::Config(
                "NACOS_SERVER_ADDR environment variable must be set to register with Nacos"
                    .to_string(),
            )
        })?;

        let auth = match (&self.access_key, &self.secret_key) {
            (Some(access_key), Some(secret_key)) => NacosAuth::AccessKey {
                access_key: access_key.clone(),
                secret_key: secret_key.clone(),
            },
            _ => NacosAuth::UsernamePassword {
                username: self.username.clone().unwrap_or_else(|| DEFAULT_USERNAME.to_string()),
                password: self.password.clone().unwrap_or_else(|| DEFAULT_PASSWORD.to_string()),
            },
        };

        Ok(NacosClientConfig { server_address, namespace_id: self.namespace_id.clone(), auth })
    }

    /// Build one registry per supported type, connecting each through `connect`.
    ///
    /// Returns no registries when registration is disabled or no type is
    /// requested. A registry that cannot be configured or connected is logged
    /// and skipped.
    pub fn create_registries<F>(&self, connect: F) -> Vec<Arc<dyn AgentRegistry>>
    where
        F: Fn(&NacosClientConfig) -> Result<Arc<dyn A2aService>>,
    {
        if !self.enabled {
            debug!("A2A registry disabled via A2A_REGISTRY_ENABLED");
            return Vec::new();
        }
        if self.registry_types.is_empty() {
            debug!("no A2A_REGISTRY_TYPE set, skipping registry setup");
            return Vec::new();
        }

        let mut registries: Vec<Arc<dyn AgentRegistry>> = Vec::new();
        for registry_type in self.supported_registry_types() {
            let service = self.client_config().and_then(|config| connect(&config));
            match service {
                Ok(service) => {
                    info!(registry_type = %registry_type, "created A2A registry");
                    registries.push(Arc::new(NacosA2aRegistry::new(service)));
                }
                Err(e) => warn!(
                    registry_type = %registry_type,
                    error = %e,
                    "failed to create registry, skipping"
                ),
            }
        }
        registries
    }
}
