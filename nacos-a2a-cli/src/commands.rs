use crate::cli::PlanArgs;
use anyhow::{Context, Result, bail};
use nacos_a2a_registry::a2a::{AgentCard, AgentInterface};
use nacos_a2a_registry::{
    EnvironmentOverlayParser, InMemoryA2aService, NacosA2aConfig, NacosA2aRegistry,
    NacosA2aRegistryProperties, RegistrySettings, collect_transports,
};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Build the card described by the `--interface` flags.
pub fn agent_card(args: &PlanArgs) -> Result<AgentCard> {
    let main_index = match &args.preferred_transport {
        Some(preferred) => args
            .interfaces
            .iter()
            .position(|(name, _)| name.eq_ignore_ascii_case(preferred))
            .with_context(|| {
                format!("preferred transport {preferred} is not among the interfaces")
            })?,
        None => 0,
    };
    let Some((main_transport, main_url)) = args.interfaces.get(main_index) else {
        bail!("at least one --interface is required");
    };

    let additional = args
        .interfaces
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != main_index)
        .map(|(_, (name, url))| AgentInterface::new(name.as_str(), url.as_str()))
        .collect();

    Ok(AgentCard::builder()
        .name(args.name.as_str())
        .version(args.version.as_str())
        .url(main_url.as_str())
        .preferred_transport(main_transport.as_str())
        .additional_interfaces(additional)
        .build())
}

/// Resolve transports, apply the file and environment overrides, and run the
/// registration against an in-memory registry. Returns the plan as JSON, or
/// `{"enabled": false}` when either the config file or the environment turns
/// registration off.
pub async fn plan(
    args: &PlanArgs,
    settings: &RegistrySettings,
    env: &HashMap<String, String>,
) -> Result<Value> {
    let config = match &args.config {
        Some(path) => NacosA2aConfig::load(path)?,
        None => NacosA2aConfig::default(),
    };
    if !config.enabled || !settings.enabled {
        info!(
            config_enabled = config.enabled,
            env_enabled = settings.enabled,
            "A2A registration disabled, nothing to plan"
        );
        return Ok(json!({ "enabled": false }));
    }

    let mut options = config.registry_options();
    if let Some(transport) = &args.overwrite_preferred_transport {
        options.overwrite_preferred_transport = Some(transport.clone());
    }
    if args.no_endpoints {
        options.enable_endpoint_registration = false;
    }
    if args.not_latest {
        options.set_as_latest = false;
    }

    let prefix = args.prefix.as_deref().unwrap_or(settings.env_prefix.as_str());
    let environment = EnvironmentOverlayParser::new(prefix).parse_properties(env);
    let overrides = config.transports_with(&environment);

    let card = agent_card(args)?;
    let properties = NacosA2aRegistryProperties::new(options)
        .with_transports(collect_transports(&card, &overrides));

    let registry = NacosA2aRegistry::new(Arc::new(InMemoryA2aService::new()));
    let plan = registry.register_agent(&card, &properties).await?;
    info!(agent = %card.name, transports = properties.transports.len(), "planned registration");

    Ok(serde_json::to_value(&plan)?)
}

/// The transport overrides `env` carries under `prefix`, as JSON.
pub fn overlay(prefix: &str, env: &HashMap<String, String>) -> Result<Value> {
    let properties = EnvironmentOverlayParser::new(prefix).parse_properties(env);
    Ok(serde_json::to_value(&properties)?)
}
