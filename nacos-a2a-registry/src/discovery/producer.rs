use crate::a2a::{AgentCard, detail_to_a2a_agent_card};
use crate::discovery::AgentCardResolver;
use async_trait::async_trait;
use nacos_a2a_core::{A2aService, AgentCardEvent, AgentCardListener, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Agent-card cache backed by Nacos.
///
/// The first lookup of a name subscribes to its changes and fetches the card;
/// concurrent lookups of the same name wait for that one fetch. Change
/// notifications from the registry are queued on a channel and applied by a
/// dedicated task, last delivered wins.
///
/// Must be created inside a Tokio runtime.
pub struct NacosAgentCardProducer {
    inner: Arc<CardCache>,
    events: mpsc::UnboundedSender<AgentCardEvent>,
    notifier: JoinHandle<()>,
}

struct CardCache {
    service: Arc<dyn A2aService>,
    cards: RwLock<HashMap<String, AgentCard>>,
    loading: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl CardCache {
    fn cached(&self, agent_name: &str) -> Option<AgentCard> {
        self.cards.read().unwrap_or_else(PoisonError::into_inner).get(agent_name).cloned()
    }

    fn store(&self, agent_name: &str, card: AgentCard) {
        self.cards
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(agent_name.to_string(), card);
    }

    // A push update may land while a fetch is in flight; the fetched card must not replace it.
    fn store_if_absent(&self, agent_name: &str, card: AgentCard) -> AgentCard {
        self.cards
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(agent_name.to_string())
            .or_insert(card)
            .clone()
    }

    fn loading_gate(&self, agent_name: &str) -> Arc<tokio::sync::Mutex<()>> {
        self.loading
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(agent_name.to_string())
            .or_default()
            .clone()
    }

    fn release_gate(&self, agent_name: &str) {
        self.loading.lock().unwrap_or_else(PoisonError::into_inner).remove(agent_name);
    }
}

struct ChannelListener {
    events: mpsc::UnboundedSender<AgentCardEvent>,
}

impl AgentCardListener for ChannelListener {
    fn on_event(&self, event: AgentCardEvent) {
        if self.events.send(event).is_err() {
            debug!("agent card producer is gone, dropping notification");
        }
    }
}

impl NacosAgentCardProducer {
    pub fn new(service: Arc<dyn A2aService>) -> Self {
        let inner = Arc::new(CardCache {
            service,
            cards: RwLock::new(HashMap::new()),
            loading: Mutex::new(HashMap::new()),
        });
        let (events, mut receiver) = mpsc::unbounded_channel::<AgentCardEvent>();

        let cache = inner.clone();
        let notifier = tokio::spawn(async move {
            while let Some(event) = receiver.recv().await {
                info!(agent = %event.agent_name, "received agent card update from Nacos");
                cache.store(&event.agent_name, detail_to_a2a_agent_card(&event.agent_card));
            }
        });

        Self { inner, events, notifier }
    }

    /// Return the cached card for `agent_name`, fetching and subscribing on first use.
    pub async fn get_or_load(&self, agent_name: &str) -> Result<AgentCard> {
        if let Some(card) = self.inner.cached(agent_name) {
            return Ok(card);
        }

        let gate = self.inner.loading_gate(agent_name);
        let _guard = gate.lock().await;
        if let Some(card) = self.inner.cached(agent_name) {
            return Ok(card);
        }

        let loaded = self.load(agent_name).await;
        self.inner.release_gate(agent_name);
        loaded
    }

    async fn load(&self, agent_name: &str) -> Result<AgentCard> {
        let listener = Arc::new(ChannelListener { events: self.events.clone() });
        self.inner.service.subscribe_agent_card(agent_name, listener).await?;
        let detail = self.inner.service.get_agent_card(agent_name).await?;
        let card = self.inner.store_if_absent(agent_name, detail_to_a2a_agent_card(&detail));
        debug!(agent = agent_name, "loaded agent card from Nacos");
        Ok(card)
    }

    /// Replace the cached card for `agent_name`.
    pub fn on_remote_update(&self, agent_name: &str, card: AgentCard) {
        self.inner.store(agent_name, card);
    }

    /// The cached card, without contacting the registry.
    pub fn cached(&self, agent_name: &str) -> Option<AgentCard> {
        self.inner.cached(agent_name)
    }
}

impl Drop for NacosAgentCardProducer {
    fn drop(&mut self) {
        self.notifier.abort();
    }
}

#[async_trait]
impl AgentCardResolver for NacosAgentCardProducer {
    async fn agent_card(&self, agent_name: &str) -> Result<AgentCard> {
        self.get_or_load(agent_name).await
    }
}
