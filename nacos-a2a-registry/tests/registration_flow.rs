//! End-to-end registration against the in-memory registry client.

use async_trait::async_trait;
use nacos_a2a_core::{
    A2aService, AgentCard, AgentCardDetailInfo, AgentCardListener, AgentEndpoint, NacosError,
    Result,
};
use nacos_a2a_registry::a2a::{self, AgentInterface};
use nacos_a2a_registry::{
    AgentRegistry, EndpointAction, EnvironmentOverlayParser, InMemoryA2aService, NacosA2aRegistry,
    NacosA2aRegistryProperties, RegistryOptions, collect_transports, register_with_all,
};
use std::collections::HashSet;
use std::sync::Arc;

fn weather_card() -> a2a::AgentCard {
    a2a::AgentCard::builder()
        .name("weather")
        .description("Weather forecasts")
        .version("1.2.0")
        .url("http://127.0.0.1:8000/a2a")
        .additional_interface(AgentInterface::new("GRPC", "grpc://127.0.0.1:50051"))
        .build()
}

struct RejectingService {
    code: i32,
}

#[async_trait]
impl A2aService for RejectingService {
    async fn release_agent_card(
        &self,
        _card: AgentCard,
        _endpoint_type: &str,
        _latest: bool,
    ) -> Result<()> {
        Err(NacosError::remote(self.code, "permission denied"))
    }

    async fn register_agent_endpoint(
        &self,
        _agent_name: &str,
        _endpoint: AgentEndpoint,
    ) -> Result<()> {
        Ok(())
    }

    async fn register_agent_endpoints(
        &self,
        _agent_name: &str,
        _endpoints: HashSet<AgentEndpoint>,
    ) -> Result<()> {
        Ok(())
    }

    async fn get_agent_card(&self, agent_name: &str) -> Result<AgentCardDetailInfo> {
        Err(NacosError::remote(404, format!("{agent_name} not found")))
    }

    async fn subscribe_agent_card(
        &self,
        _agent_name: &str,
        _listener: Arc<dyn AgentCardListener>,
    ) -> Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_register_all_transports_with_environment_overlay() {
    let service = Arc::new(InMemoryA2aService::new());
    let registry = NacosA2aRegistry::new(service.clone());

    let overlay = EnvironmentOverlayParser::new("PREFIX_").parse_properties([
        ("PREFIX_JSONRPC_HOST", "10.0.0.8"),
        ("PREFIX_JSONRPC_PORT", "9000"),
        ("PREFIX_BADKEY", "ignored"),
        ("PREFIX_GRPC_UNKNOWNATTR", "ignored"),
    ]);
    let card = weather_card();
    let properties = NacosA2aRegistryProperties::new(RegistryOptions::default())
        .with_transports(collect_transports(&card, &overlay));

    let plan = registry.register_agent(&card, &properties).await.unwrap();
    assert!(matches!(plan.endpoint_action, EndpointAction::MultiEndpoint(_)));

    let released = service.get_agent_card("weather").await.unwrap();
    assert_eq!(released.card.version, "1.2.0");
    assert_eq!(released.registration_type.as_deref(), Some("SERVICE"));

    let endpoints = service.endpoints("weather");
    assert_eq!(endpoints.len(), 2);
    let jsonrpc = endpoints.iter().find(|e| e.transport == "JSONRPC").unwrap();
    assert_eq!(jsonrpc.address, "10.0.0.8");
    assert_eq!(jsonrpc.port, 9000);
    assert_eq!(jsonrpc.path.as_deref(), Some("/a2a"));
    assert_eq!(jsonrpc.version, "1.2.0");
}

#[tokio::test]
async fn test_preferred_transport_overwrite_rewrites_card() {
    let service = Arc::new(InMemoryA2aService::new());
    let registry = NacosA2aRegistry::new(service.clone());
    let card = weather_card();
    let properties = NacosA2aRegistryProperties::new(
        RegistryOptions::default()
            .with_overwrite_preferred_transport("grpc")
            .with_endpoint_registration(false),
    )
    .with_transports(collect_transports(&card, &Default::default()));

    let plan = registry.register_agent(&card, &properties).await.unwrap();
    assert_eq!(plan.endpoint_action, EndpointAction::NoEndpointRegistration);

    let released = service.get_agent_card("weather").await.unwrap().card;
    assert_eq!(released.preferred_transport.as_deref(), Some("GRPC"));
    assert_eq!(released.url, "grpc://127.0.0.1:50051");
    assert!(service.endpoints("weather").is_empty());
}

#[tokio::test]
async fn test_single_legacy_endpoint() {
    let service = Arc::new(InMemoryA2aService::new());
    let registry = NacosA2aRegistry::new(service.clone());
    let properties =
        NacosA2aRegistryProperties::with_default_transport(true, "10.0.0.1", 8080, "/a2a").unwrap();

    registry.register(&weather_card(), &properties).await.unwrap();

    let endpoints = service.endpoints("weather");
    assert_eq!(endpoints.len(), 1);
    let endpoint = endpoints.into_iter().next().unwrap();
    assert_eq!(endpoint.transport, "JSONRPC");
    assert_eq!(endpoint.address, "10.0.0.1");
    assert_eq!(endpoint.port, 8080);
}

#[tokio::test]
async fn test_remote_failure_becomes_registration_error() {
    let registry = NacosA2aRegistry::new(Arc::new(RejectingService { code: 403 }));
    let card = weather_card();
    let properties = NacosA2aRegistryProperties::new(RegistryOptions::default())
        .with_transports(collect_transports(&card, &Default::default()));

    let err = registry.register_agent(&card, &properties).await.unwrap_err();
    match err {
        NacosError::Registration { agent_name, code, message } => {
            assert_eq!(agent_name, "weather");
            assert_eq!(code, 403);
            assert_eq!(message, "permission denied");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_register_with_all_continues_past_failures() {
    let memory = Arc::new(InMemoryA2aService::new());
    let registries: Vec<Arc<dyn AgentRegistry>> = vec![
        Arc::new(NacosA2aRegistry::new(Arc::new(RejectingService { code: 500 }))),
        Arc::new(NacosA2aRegistry::new(memory.clone())),
    ];
    let card = weather_card();
    let properties = NacosA2aRegistryProperties::new(RegistryOptions::default());

    let registered = register_with_all(&registries, &card, &properties).await;
    assert_eq!(registered, vec!["nacos".to_string()]);
    assert!(memory.get_agent_card("weather").await.is_ok());
}
