//! Field-by-field merging of transport properties.
//!
//! An override field replaces the base field only when it carries a value:
//! strings must be non-empty, integers strictly positive, nullable booleans
//! present. The TLS flag of [`TransportEndpoint`] is not nullable and always
//! takes the override's value.

use crate::endpoint::{TransportEndpoint, TransportEndpointBuilder};
use nacos_a2a_core::Result;
use serde::{Deserialize, Serialize};

/// A configuration record that can be overlaid by another of the same shape.
pub trait Merge: Clone {
    /// Return a new value with `overlay`'s set fields applied over `self`.
    fn merge_with(&self, overlay: &Self) -> Self;
}

/// Merge `overlay` over `base`. A missing overlay yields a copy of `base`.
pub fn merge<T: Merge>(base: &T, overlay: Option<&T>) -> T {
    match overlay {
        Some(overlay) => base.merge_with(overlay),
        None => base.clone(),
    }
}

pub(crate) fn merge_string(base: &Option<String>, overlay: &Option<String>) -> Option<String> {
    match overlay {
        Some(value) if !value.is_empty() => Some(value.clone()),
        _ => base.clone(),
    }
}

// Ports <= 0 mean "unset" and never override.
pub(crate) fn merge_port(base: i32, overlay: i32) -> i32 {
    if overlay > 0 { overlay } else { base }
}

/// Optional per-transport settings, as read from a config file or the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct TransportProperties {
    pub host: Option<String>,
    pub port: i32,
    pub path: Option<String>,
    pub support_tls: Option<bool>,
    pub protocol: Option<String>,
    pub query: Option<String>,
}

impl TransportProperties {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Build an endpoint for `transport`. Fails if no host is set.
    pub fn to_endpoint(&self, transport: &str) -> Result<TransportEndpoint> {
        TransportEndpointBuilder {
            transport: Some(transport.to_string()),
            host: self.host.clone(),
            port: self.port,
            path: self.path.clone(),
            support_tls: self.support_tls,
            protocol: self.protocol.clone(),
            query: self.query.clone(),
        }
        .build()
    }
}

impl From<&TransportEndpoint> for TransportProperties {
    fn from(endpoint: &TransportEndpoint) -> Self {
        Self {
            host: Some(endpoint.host().to_string()),
            port: endpoint.port(),
            path: endpoint.path().map(str::to_string),
            support_tls: Some(endpoint.support_tls()),
            protocol: endpoint.protocol().map(str::to_string),
            query: endpoint.query().map(str::to_string),
        }
    }
}

impl Merge for TransportProperties {
    fn merge_with(&self, overlay: &Self) -> Self {
        Self {
            host: merge_string(&self.host, &overlay.host),
            port: merge_port(self.port, overlay.port),
            path: merge_string(&self.path, &overlay.path),
            support_tls: overlay.support_tls.or(self.support_tls),
            protocol: merge_string(&self.protocol, &overlay.protocol),
            query: merge_string(&self.query, &overlay.query),
        }
    }
}

impl Merge for TransportEndpoint {
    /// The transport name is identity and is kept from `self`.
    fn merge_with(&self, overlay: &Self) -> Self {
        let base = TransportProperties::from(self);
        let overlay = TransportProperties::from(overlay);
        let merged = TransportProperties {
            host: merge_string(&base.host, &overlay.host),
            port: merge_port(base.port, overlay.port),
            path: merge_string(&base.path, &overlay.path),
            support_tls: overlay.support_tls,
            protocol: merge_string(&base.protocol, &overlay.protocol),
            query: merge_string(&base.query, &overlay.query),
        };
        // Both inputs had non-empty transport and host, so the merge has them too.
        merged.to_endpoint(self.transport()).unwrap_or_else(|_| self.clone())
    }
}

/// Apply optional overlay properties to an already resolved endpoint.
///
/// An overlay that sets a protocol without a TLS flag has the flag inferred
/// again from the merged protocol, so `https` turns TLS on.
pub fn merge_endpoint(
    base: &TransportEndpoint,
    overlay: Option<&TransportProperties>,
) -> Result<TransportEndpoint> {
    let mut merged = merge(&TransportProperties::from(base), overlay);
    let protocol_only = overlay.is_some_and(|o| {
        o.support_tls.is_none() && o.protocol.as_deref().is_some_and(|p| !p.is_empty())
    });
    if protocol_only {
        merged.support_tls = None;
    }
    merged.to_endpoint(base.transport())
}
