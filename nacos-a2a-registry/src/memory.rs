use async_trait::async_trait;
use nacos_a2a_core::{
    A2aService, AgentCard, AgentCardDetailInfo, AgentCardEvent, AgentCardListener, AgentEndpoint,
    ENDPOINT_TYPE_SERVICE, ENDPOINT_TYPE_URL, NacosError, Result,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};

const NOT_FOUND: i32 = 404;

#[derive(Clone)]
struct StoredAgent {
    versions: HashMap<String, AgentCard>,
    latest_version: String,
    registration_type: String,
}

/// Registry client that keeps everything in process memory.
///
/// Releasing a card notifies every subscriber of that agent name. Agents
/// released with the `URL` endpoint type are reached through the card URL
/// and take no endpoint registrations.
#[derive(Default)]
pub struct InMemoryA2aService {
    agents: Arc<RwLock<HashMap<String, StoredAgent>>>,
    endpoints: Arc<RwLock<HashMap<String, HashSet<AgentEndpoint>>>>,
    listeners: Arc<RwLock<HashMap<String, Vec<Arc<dyn AgentCardListener>>>>>,
}

impl InMemoryA2aService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every endpoint registered for `agent_name` so far.
    pub fn endpoints(&self, agent_name: &str) -> HashSet<AgentEndpoint> {
        self.endpoints
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(agent_name)
            .cloned()
            .unwrap_or_default()
    }

    /// A specific released version of a card.
    pub fn card_version(&self, agent_name: &str, version: &str) -> Option<AgentCard> {
        self.agents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(agent_name)
            .and_then(|agent| agent.versions.get(version).cloned())
    }

    pub fn subscriber_count(&self, agent_name: &str) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(agent_name)
            .map_or(0, Vec::len)
    }

    fn detail(agent: &StoredAgent) -> Option<AgentCardDetailInfo> {
        agent.versions.get(&agent.latest_version).map(|card| AgentCardDetailInfo {
            card: card.clone(),
            registration_type: Some(agent.registration_type.clone()),
            latest_version: Some(true),
        })
    }
}

#[async_trait]
impl A2aService for InMemoryA2aService {
    async fn release_agent_card(
        &self,
        card: AgentCard,
        endpoint_type: &str,
        set_as_latest: bool,
    ) -> Result<()> {
        if card.name.is_empty() {
            return Err(NacosError::remote(
                NacosError::INVALID_PARAM,
                "agent name can not be empty",
            ));
        }
        if endpoint_type != ENDPOINT_TYPE_SERVICE && endpoint_type != ENDPOINT_TYPE_URL {
            return Err(NacosError::remote(
                NacosError::INVALID_PARAM,
                format!("unknown registration type {endpoint_type}"),
            ));
        }

        let agent_name = card.name.clone();
        let detail = {
            let mut agents = self.agents.write().unwrap_or_else(PoisonError::into_inner);
            let agent = agents.entry(agent_name.clone()).or_insert_with(|| StoredAgent {
                versions: HashMap::new(),
                latest_version: card.version.clone(),
                registration_type: endpoint_type.to_string(),
            });
            if set_as_latest {
                agent.latest_version = card.version.clone();
            }
            agent.registration_type = endpoint_type.to_string();
            agent.versions.insert(card.version.clone(), card);
            Self::detail(agent)
        };

        let listeners = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&agent_name)
            .cloned()
            .unwrap_or_default();
        if let Some(detail) = detail {
            for listener in listeners {
                listener.on_event(AgentCardEvent {
                    agent_name: agent_name.clone(),
                    agent_card: detail.clone(),
                });
            }
        }
        Ok(())
    }

    async fn register_agent_endpoint(
        &self,
        agent_name: &str,
        endpoint: AgentEndpoint,
    ) -> Result<()> {
        self.register_agent_endpoints(agent_name, HashSet::from([endpoint])).await
    }

    async fn register_agent_endpoints(
        &self,
        agent_name: &str,
        endpoints: HashSet<AgentEndpoint>,
    ) -> Result<()> {
        let registration_type = self
            .agents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(agent_name)
            .map(|agent| agent.registration_type.clone());
        match registration_type.as_deref() {
            None => {
                return Err(NacosError::remote(
                    NOT_FOUND,
                    format!("agent {agent_name} is not released"),
                ));
            }
            Some(ENDPOINT_TYPE_URL) => {
                return Err(NacosError::remote(
                    NacosError::INVALID_PARAM,
                    format!("agent {agent_name} is registered by URL and takes no endpoints"),
                ));
            }
            Some(_) => {}
        }
        self.endpoints
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(agent_name.to_string())
            .or_default()
            .extend(endpoints);
        Ok(())
    }

    async fn get_agent_card(&self, agent_name: &str) -> Result<AgentCardDetailInfo> {
        self.agents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(agent_name)
            .and_then(Self::detail)
            .ok_or_else(|| NacosError::remote(NOT_FOUND, format!("agent {agent_name} not found")))
    }

    async fn subscribe_agent_card(
        &self,
        agent_name: &str,
        listener: Arc<dyn AgentCardListener>,
    ) -> Result<()> {
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(agent_name.to_string())
            .or_default()
            .push(listener);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn card(version: &str) -> AgentCard {
        AgentCard {
            name: "weather".to_string(),
            version: version.to_string(),
            url: "http://127.0.0.1:8000/a2a".to_string(),
            ..Default::default()
        }
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<AgentCardEvent>>);

    impl AgentCardListener for Recorder {
        fn on_event(&self, event: AgentCardEvent) {
            self.0.lock().unwrap().push(event);
        }
    }

    #[tokio::test]
    async fn test_latest_tracking() {
        let service = InMemoryA2aService::new();
        service.release_agent_card(card("1.0.0"), "SERVICE", true).await.unwrap();
        service.release_agent_card(card("2.0.0"), "SERVICE", false).await.unwrap();

        let detail = service.get_agent_card("weather").await.unwrap();
        assert_eq!(detail.card.version, "1.0.0");
        assert_eq!(detail.latest_version, Some(true));
        assert!(service.card_version("weather", "2.0.0").is_some());
    }

    #[tokio::test]
    async fn test_unknown_agent_is_remote_error() {
        let service = InMemoryA2aService::new();
        let err = service.get_agent_card("nobody").await.unwrap_err();
        assert_eq!(err.code(), 404);

        let err = service
            .register_agent_endpoint("nobody", AgentEndpoint::default())
            .await
            .unwrap_err();
        assert!(matches!(err, NacosError::Remote { code: 404, .. }));
    }

    #[tokio::test]
    async fn test_url_agent_rejects_endpoints() {
        let service = InMemoryA2aService::new();
        service.release_agent_card(card("1.0.0"), ENDPOINT_TYPE_URL, true).await.unwrap();

        let detail = service.get_agent_card("weather").await.unwrap();
        assert_eq!(detail.registration_type.as_deref(), Some("URL"));

        let err = service
            .register_agent_endpoint("weather", AgentEndpoint::default())
            .await
            .unwrap_err();
        assert!(matches!(err, NacosError::Remote { code: NacosError::INVALID_PARAM, .. }));
        assert!(service.endpoints("weather").is_empty());
    }

    #[tokio::test]
    async fn test_unknown_registration_type_is_rejected() {
        let service = InMemoryA2aService::new();
        let err = service.release_agent_card(card("1.0.0"), "DNS", true).await.unwrap_err();
        assert_eq!(err.code(), NacosError::INVALID_PARAM);
        assert!(service.get_agent_card("weather").await.is_err());
    }

    #[tokio::test]
    async fn test_release_notifies_subscribers() {
        let service = InMemoryA2aService::new();
        let recorder = Arc::new(Recorder::default());
        service.subscribe_agent_card("weather", recorder.clone()).await.unwrap();

        service.release_agent_card(card("1.0.0"), "SERVICE", true).await.unwrap();

        let events = recorder.0.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].agent_card.registration_type.as_deref(), Some("SERVICE"));
    }
}
