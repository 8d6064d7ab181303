//! Transport settings supplied through environment variables.
//!
//! Keys look like `{PREFIX}{TRANSPORT}_{ATTRIBUTE}`, for example
//! `NACOS_A2A_AGENT_JSONRPC_HOST=127.0.0.1`. The remainder after the prefix
//! is split on the first `_`, so `NACOS_A2A_AGENT_JSONRPC_SUPPORT_TLS=true`
//! names the `SUPPORT_TLS` attribute of `JSONRPC`.

use crate::endpoint::TransportEndpoint;
use crate::merge::TransportProperties;
use nacos_a2a_core::{NacosError, Result};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Prefix used when none is configured.
pub const DEFAULT_ENV_PREFIX: &str = "NACOS_A2A_AGENT_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportAttribute {
    Host,
    Port,
    Path,
    Protocol,
    Query,
    SupportTls,
}

impl TransportAttribute {
    /// Look up an attribute by its (already upper-cased) environment token.
    pub fn from_env_key(key: &str) -> Option<Self> {
        match key {
            "HOST" => Some(Self::Host),
            "PORT" => Some(Self::Port),
            "PATH" => Some(Self::Path),
            "PROTOCOL" => Some(Self::Protocol),
            "QUERY" => Some(Self::Query),
            "SUPPORT_TLS" => Some(Self::SupportTls),
            _ => None,
        }
    }

    pub fn env_key(&self) -> &'static str {
        match self {
            Self::Host => "HOST",
            Self::Port => "PORT",
            Self::Path => "PATH",
            Self::Protocol => "PROTOCOL",
            Self::Query => "QUERY",
            Self::SupportTls => "SUPPORT_TLS",
        }
    }
}

type RawTransportAttributes = HashMap<String, HashMap<TransportAttribute, String>>;

#[derive(Debug, Clone)]
pub struct EnvironmentOverlayParser {
    prefix: String,
}

impl Default for EnvironmentOverlayParser {
    fn default() -> Self {
        Self::new(DEFAULT_ENV_PREFIX)
    }
}

impl EnvironmentOverlayParser {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Group recognized `{TRANSPORT}_{ATTRIBUTE}` keys by transport. Malformed
    /// keys and unknown attributes are skipped.
    fn collect<I, K, V>(&self, env: I) -> RawTransportAttributes
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut result = RawTransportAttributes::new();
        for (key, value) in env {
            let Some(sub_key) = key.as_ref().strip_prefix(self.prefix.as_str()) else {
                continue;
            };
            let Some((transport, attr)) = sub_key.split_once('_') else {
                debug!(key = key.as_ref(), "skipping transport env key without attribute");
                continue;
            };
            let transport = transport.trim().to_uppercase();
            let attr = attr.trim().to_uppercase();
            if transport.is_empty() {
                continue;
            }
            let Some(attribute) = TransportAttribute::from_env_key(&attr) else {
                debug!(key = key.as_ref(), "skipping unknown transport attribute");
                continue;
            };
            result.entry(transport).or_default().insert(attribute, value.as_ref().to_string());
        }
        result
    }

    /// Parse the overlay into per-transport property bags, without requiring a host.
    ///
    /// A transport whose `PORT` is not a number is dropped with a warning; the
    /// others are unaffected.
    pub fn parse_properties<I, K, V>(&self, env: I) -> HashMap<String, TransportProperties>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.collect(env)
            .into_iter()
            .filter_map(|(transport, attributes)| match to_properties(&transport, &attributes) {
                Ok(properties) => Some((transport, properties)),
                Err(e) => {
                    warn!(
                        transport = %transport,
                        error = %e,
                        "ignoring transport from environment"
                    );
                    None
                }
            })
            .collect()
    }

    /// Parse the overlay into endpoints. Transports that fail to parse or lack
    /// a host are left out of the result.
    pub fn parse_overlay<I, K, V>(&self, env: I) -> HashMap<String, TransportEndpoint>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.parse_properties(env)
            .into_iter()
            .filter_map(|(transport, properties)| match properties.to_endpoint(&transport) {
                Ok(endpoint) => Some((transport, endpoint)),
                Err(e) => {
                    warn!(
                        transport = %transport,
                        error = %e,
                        "ignoring transport from environment"
                    );
                    None
                }
            })
            .collect()
    }

    /// [`Self::parse_properties`] over a snapshot of the process environment.
    pub fn properties_from_process_env(&self) -> HashMap<String, TransportProperties> {
        self.parse_properties(std::env::vars())
    }

    /// [`Self::parse_overlay`] over a snapshot of the process environment.
    pub fn overlay_from_process_env(&self) -> HashMap<String, TransportEndpoint> {
        self.parse_overlay(std::env::vars())
    }
}

/// Parse `{prefix}{TRANSPORT}_{ATTRIBUTE}` entries of `env` into endpoints.
pub fn parse_overlay(
    env: &HashMap<String, String>,
    prefix: &str,
) -> HashMap<String, TransportEndpoint> {
    EnvironmentOverlayParser::new(prefix).parse_overlay(env)
}

fn to_properties(
    transport: &str,
    attributes: &HashMap<TransportAttribute, String>,
) -> Result<TransportProperties> {
    let mut properties = TransportProperties::default();
    for (attribute, value) in attributes {
        match attribute {
            TransportAttribute::Host => properties.host = Some(value.clone()),
            TransportAttribute::Port => {
                properties.port = value.trim().parse().map_err(|_| NacosError::InvalidNumber {
                    field: format!("{transport}_{}", attribute.env_key()),
                    value: value.clone(),
                })?;
            }
            TransportAttribute::Path => properties.path = Some(value.clone()),
            TransportAttribute::Protocol => properties.protocol = Some(value.clone()),
            TransportAttribute::Query => properties.query = Some(value.clone()),
            TransportAttribute::SupportTls => {
                properties.support_tls = Some(value.trim().eq_ignore_ascii_case("true"));
            }
        }
    }
    Ok(properties)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_host_and_port() {
        let overlay = parse_overlay(
            &env(&[("PREFIX_JSONRPC_HOST", "127.0.0.1"), ("PREFIX_JSONRPC_PORT", "8080")]),
            "PREFIX_",
        );

        assert_eq!(overlay.len(), 1);
        let endpoint = &overlay["JSONRPC"];
        assert_eq!(endpoint.transport(), "JSONRPC");
        assert_eq!(endpoint.host(), "127.0.0.1");
        assert_eq!(endpoint.port(), 8080);
        assert!(!endpoint.support_tls());
        assert_eq!(endpoint.path(), None);
    }

    #[test]
    fn test_malformed_and_unknown_keys_are_skipped() {
        let overlay = parse_overlay(
            &env(&[
                ("PREFIX_BADKEY", "x"),
                ("PREFIX_JSONRPC_UNKNOWNATTR", "foo"),
                ("PREFIX__HOST", "nohost"),
                ("OTHER_JSONRPC_HOST", "ignored"),
            ]),
            "PREFIX_",
        );
        assert!(overlay.is_empty());
    }

    #[test]
    fn test_tokens_are_uppercased() {
        let overlay = parse_overlay(&env(&[("PREFIX_grpc_host", "10.0.0.1")]), "PREFIX_");
        assert_eq!(overlay["GRPC"].transport(), "GRPC");
    }

    #[test]
    fn test_same_attribute_in_different_case_keeps_one_value() {
        let overlay = EnvironmentOverlayParser::new("P_")
            .parse_overlay([("P_JSONRPC_HOST", "a"), ("P_jsonrpc_host", "b")]);

        assert_eq!(overlay.len(), 1);
        let host = overlay["JSONRPC"].host();
        assert!(host == "a" || host == "b", "unexpected host {host}");
    }

    #[test]
    fn test_support_tls_attribute_and_parsing() {
        let overlay = parse_overlay(
            &env(&[
                ("P_A_HOST", "a"),
                ("P_A_SUPPORT_TLS", "TRUE"),
                ("P_B_HOST", "b"),
                ("P_B_SUPPORT_TLS", "yes"),
            ]),
            "P_",
        );
        assert!(overlay["A"].support_tls());
        assert!(!overlay["B"].support_tls());
    }

    #[test]
    fn test_protocol_infers_tls_unless_explicit() {
        let overlay = parse_overlay(
            &env(&[
                ("P_A_HOST", "a"),
                ("P_A_PROTOCOL", "https"),
                ("P_B_HOST", "b"),
                ("P_B_PROTOCOL", "https"),
                ("P_B_SUPPORT_TLS", "false"),
            ]),
            "P_",
        );
        assert!(overlay["A"].support_tls());
        assert!(!overlay["B"].support_tls());
    }

    #[test]
    fn test_bad_port_drops_only_that_transport() {
        let overlay = parse_overlay(
            &env(&[
                ("P_JSONRPC_HOST", "a"),
                ("P_JSONRPC_PORT", "eighty"),
                ("P_GRPC_HOST", "b"),
                ("P_GRPC_PORT", "50051"),
            ]),
            "P_",
        );
        assert!(!overlay.contains_key("JSONRPC"));
        assert_eq!(overlay["GRPC"].port(), 50051);
    }

    #[test]
    fn test_missing_host_is_omitted_from_overlay_but_kept_as_properties() {
        let vars = env(&[("P_JSONRPC_PORT", "9000"), ("P_JSONRPC_PATH", "/a2a")]);
        let parser = EnvironmentOverlayParser::new("P_");

        assert!(parser.parse_overlay(&vars).is_empty());

        let properties = parser.parse_properties(&vars);
        assert_eq!(properties["JSONRPC"].port, 9000);
        assert_eq!(properties["JSONRPC"].path.as_deref(), Some("/a2a"));
        assert_eq!(properties["JSONRPC"].host, None);
    }

    #[test]
    fn test_pass_through_attributes() {
        let overlay = parse_overlay(
            &env(&[
                ("P_HTTP_HOST", "agent"),
                ("P_HTTP_PATH", "/rest/"),
                ("P_HTTP_QUERY", "a=1&b=2"),
                ("P_HTTP_PROTOCOL", "http"),
            ]),
            "P_",
        );
        let endpoint = &overlay["HTTP"];
        assert_eq!(endpoint.path(), Some("/rest/"));
        assert_eq!(endpoint.query(), Some("a=1&b=2"));
        assert_eq!(endpoint.protocol(), Some("http"));
    }

    #[test]
    fn test_default_prefix() {
        let parser = EnvironmentOverlayParser::default();
        let overlay = parser.parse_overlay(env(&[("NACOS_A2A_AGENT_JSONRPC_HOST", "127.0.0.1")]));
        assert_eq!(overlay["JSONRPC"].host(), "127.0.0.1");
    }

    #[test]
    fn test_attribute_lookup() {
        assert_eq!(
            TransportAttribute::from_env_key("SUPPORT_TLS"),
            Some(TransportAttribute::SupportTls)
        );
        assert_eq!(TransportAttribute::from_env_key("TLS"), None);
        assert_eq!(TransportAttribute::Port.env_key(), "PORT");
    }
}
