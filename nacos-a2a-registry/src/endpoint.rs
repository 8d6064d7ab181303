//! Transport endpoints: one network binding of an agent, and the set of them
//! that is handed to the registry.

use crate::a2a::AgentInterface;
use nacos_a2a_core::{AgentEndpoint, NacosError, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::collections::hash_map;
use url::Url;

const HTTPS_PROTOCOL: &str = "https";
const HTTP_PROTOCOL: &str = "http";

pub(crate) fn is_https(protocol: Option<&str>) -> bool {
    protocol.is_some_and(|p| p.eq_ignore_ascii_case(HTTPS_PROTOCOL))
}

/// One transport exposed by an agent. Built through [`TransportEndpointBuilder`],
/// which guarantees `transport` and `host` are non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportEndpoint {
    transport: String,
    host: String,
    port: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    support_tls: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    protocol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    query: Option<String>,
}

impl TransportEndpoint {
    pub fn builder() -> TransportEndpointBuilder {
        TransportEndpointBuilder::default()
    }

    /// Resolve an A2A interface declaration (`transport` + `url`).
    pub fn from_interface(interface: &AgentInterface) -> Result<Self> {
        resolve_endpoint(&interface.transport, &interface.url)
    }

    pub fn transport(&self) -> &str {
        &self.transport
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// `0` when the port was not set.
    pub fn port(&self) -> i32 {
        self.port
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn support_tls(&self) -> bool {
        self.support_tls
    }

    pub fn protocol(&self) -> Option<&str> {
        self.protocol.as_deref()
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// A builder pre-filled with this endpoint, for deriving a modified copy.
    pub fn to_builder(&self) -> TransportEndpointBuilder {
        TransportEndpointBuilder {
            transport: Some(self.transport.clone()),
            host: Some(self.host.clone()),
            port: self.port,
            path: self.path.clone(),
            support_tls: Some(self.support_tls),
            protocol: self.protocol.clone(),
            query: self.query.clone(),
        }
    }

    /// Reassemble a URL from the parts. Without a protocol the scheme follows the TLS flag.
    pub fn url(&self) -> String {
        let scheme = match self.protocol.as_deref() {
            Some(protocol) if !protocol.is_empty() => protocol,
            _ if self.support_tls => HTTPS_PROTOCOL,
            _ => HTTP_PROTOCOL,
        };

        let mut url = format!("{}://{}", scheme, self.host);
        if self.port > 0 {
            url.push_str(&format!(":{}", self.port));
        }
        if let Some(path) = self.path.as_deref().filter(|p| !p.is_empty()) {
            if !path.starts_with('/') {
                url.push('/');
            }
            url.push_str(path);
        }
        if let Some(query) = self.query.as_deref().filter(|q| !q.is_empty()) {
            url.push('?');
            url.push_str(query);
        }
        url
    }

    /// The registry's endpoint record for this transport of agent `version`.
    pub fn to_agent_endpoint(&self, version: &str) -> AgentEndpoint {
        AgentEndpoint {
            transport: self.transport.clone(),
            address: self.host.clone(),
            port: self.port,
            path: self.path.clone(),
            support_tls: self.support_tls,
            version: version.to_string(),
            protocol: self.protocol.clone(),
            query: self.query.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TransportEndpointBuilder {
    pub(crate) transport: Option<String>,
    pub(crate) host: Option<String>,
    pub(crate) port: i32,
    pub(crate) path: Option<String>,
    pub(crate) support_tls: Option<bool>,
    pub(crate) protocol: Option<String>,
    pub(crate) query: Option<String>,
}

impl TransportEndpointBuilder {
    pub fn transport(mut self, transport: impl Into<String>) -> Self {
        self.transport = Some(transport.into());
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn port(mut self, port: i32) -> Self {
        self.port = port;
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Explicit TLS flag. Left unset, `build` infers it from an `https` protocol.
    pub fn support_tls(mut self, support_tls: bool) -> Self {
        self.support_tls = Some(support_tls);
        self
    }

    pub fn protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = Some(protocol.into());
        self
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Fill host, port, path, protocol and query from `url`.
    ///
    /// Parts are taken verbatim from the text: the host keeps its case and
    /// the path is not normalized. An absent path stays unset.
    ///
    /// An `https` scheme forces the TLS flag on, replacing any value set
    /// earlier on this builder. Other schemes leave the flag untouched.
    pub fn with_url(mut self, url: &str) -> Result<Self> {
        let raw = url.trim();
        let invalid = |reason: String| NacosError::InvalidUrl { url: url.to_string(), reason };
        let parsed = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
        let parts = RawUrl::split(raw).unwrap_or_else(|| RawUrl::from_parsed(&parsed));

        self.host = Some(parts.host.to_string()).filter(|h| !h.is_empty());
        self.port = parts.port.map(i32::from).unwrap_or(0);
        self.path = Some(parts.path.to_string()).filter(|p| !p.is_empty());
        self.protocol = Some(parts.scheme.to_string());
        self.query = parts.query.map(str::to_string).filter(|q| !q.is_empty());

        if is_https(self.protocol.as_deref()) {
            self.support_tls = Some(true);
        }
        Ok(self)
    }

    pub fn build(self) -> Result<TransportEndpoint> {
        let transport = self.transport.filter(|t| !t.is_empty()).ok_or_else(|| {
            NacosError::Validation("A2a Endpoint `Transport` can not be empty.".to_string())
        })?;
        let host = self.host.filter(|h| !h.is_empty()).ok_or_else(|| {
            NacosError::Validation(format!(
                "A2a Endpoint `Address` can not be empty (transport {transport})."
            ))
        })?;
        let support_tls = self.support_tls.unwrap_or_else(|| is_https(self.protocol.as_deref()));

        Ok(TransportEndpoint {
            transport,
            host,
            port: self.port,
            path: self.path,
            support_tls,
            protocol: self.protocol,
            query: self.query,
        })
    }
}

/// Derive a [`TransportEndpoint`] from a transport name and the URL it is served on.
///
/// Fails with [`NacosError::InvalidUrl`] when `url` does not parse and with
/// [`NacosError::Validation`] when the transport name or host is empty.
pub fn resolve_endpoint(transport: &str, url: &str) -> Result<TransportEndpoint> {
    TransportEndpoint::builder().transport(transport).with_url(url)?.build()
}

// The pieces of a URL as written. `url::Url` validates the text but lowercases
// hosts, resolves `.`/`..` segments and turns an empty path into `/`.
struct RawUrl<'a> {
    scheme: &'a str,
    host: &'a str,
    port: Option<u16>,
    path: &'a str,
    query: Option<&'a str>,
}

impl<'a> RawUrl<'a> {
    fn split(raw: &'a str) -> Option<Self> {
        let (scheme, rest) = raw.split_once("://")?;
        let rest = rest.split('#').next().unwrap_or_default();
        let (rest, query) = match rest.split_once('?') {
            Some((rest, query)) => (rest, Some(query)),
            None => (rest, None),
        };
        let (authority, path) = match rest.find('/') {
            Some(index) => rest.split_at(index),
            None => (rest, ""),
        };
        let host_port = authority.rsplit_once('@').map_or(authority, |(_, hp)| hp);
        let (host, port) = match host_port.find(']') {
            // IPv6 literal, kept with its brackets
            Some(end) if host_port.starts_with('[') => host_port.split_at(end + 1),
            _ => host_port.split_at(host_port.find(':').unwrap_or(host_port.len())),
        };
        let port = port.strip_prefix(':').and_then(|p| p.parse().ok());
        Some(Self { scheme, host, port, path, query })
    }

    // Scheme-only URLs such as `mailto:agent@example.com` carry no authority.
    fn from_parsed(parsed: &'a Url) -> Self {
        Self {
            scheme: parsed.scheme(),
            host: parsed.host_str().unwrap_or_default(),
            port: parsed.port(),
            path: parsed.path(),
            query: parsed.query(),
        }
    }
}

/// Endpoints keyed by upper-cased transport name. The last insert for a name wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TransportEndpointSet {
    endpoints: HashMap<String, TransportEndpoint>,
}

impl TransportEndpointSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an endpoint, returning the one it replaced.
    pub fn insert(&mut self, endpoint: TransportEndpoint) -> Option<TransportEndpoint> {
        self.endpoints.insert(endpoint.transport.to_uppercase(), endpoint)
    }

    pub fn get(&self, transport: &str) -> Option<&TransportEndpoint> {
        self.endpoints.get(&transport.to_uppercase())
    }

    pub fn contains(&self, transport: &str) -> bool {
        self.get(transport).is_some()
    }

    pub fn remove(&mut self, transport: &str) -> Option<TransportEndpoint> {
        self.endpoints.remove(&transport.to_uppercase())
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    pub fn transports(&self) -> impl Iterator<Item = &str> {
        self.endpoints.keys().map(String::as_str)
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, TransportEndpoint> {
        self.endpoints.iter()
    }

    pub fn values(&self) -> hash_map::Values<'_, String, TransportEndpoint> {
        self.endpoints.values()
    }
}

impl FromIterator<TransportEndpoint> for TransportEndpointSet {
    fn from_iter<I: IntoIterator<Item = TransportEndpoint>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl Extend<TransportEndpoint> for TransportEndpointSet {
    fn extend<I: IntoIterator<Item = TransportEndpoint>>(&mut self, iter: I) {
        for endpoint in iter {
            self.insert(endpoint);
        }
    }
}

impl From<HashMap<String, TransportEndpoint>> for TransportEndpointSet {
    fn from(map: HashMap<String, TransportEndpoint>) -> Self {
        let endpoints =
            map.into_iter().map(|(name, endpoint)| (name.to_uppercase(), endpoint)).collect();
        Self { endpoints }
    }
}

impl IntoIterator for TransportEndpointSet {
    type Item = (String, TransportEndpoint);
    type IntoIter = hash_map::IntoIter<String, TransportEndpoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.endpoints.into_iter()
    }
}

impl<'a> IntoIterator for &'a TransportEndpointSet {
    type Item = (&'a String, &'a TransportEndpoint);
    type IntoIter = hash_map::Iter<'a, String, TransportEndpoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.endpoints.iter()
    }
}
