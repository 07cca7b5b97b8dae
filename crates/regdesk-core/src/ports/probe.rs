//! Test-connection port.
//!
//! The probe is the external collaborator behind the "Test Connection"
//! button. The core treats it as a black box: an `ok: true`-shaped reply is
//! success, anything else is failure, and transport errors carry whatever
//! message the adapter produced.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{DiscoveryConfig, McpToolDef};
use crate::endpoint::normalize_bearer_token;

/// Query value sent with every agent endpoint test.
pub const TEST_QUERY: &str = "test";

/// Request body for an agent endpoint test.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointTestRequest {
    pub method: String,
    pub protocol: String,
    pub endpoint: String,
    pub query_param: String,
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bearer_token: Option<String>,
}

impl EndpointTestRequest {
    /// Assemble a test request from the live discovery config and token.
    pub fn from_config(config: &DiscoveryConfig, bearer_token: &str) -> Self {
        let token = normalize_bearer_token(bearer_token);
        Self {
            method: config.method.to_string(),
            protocol: config.protocol.to_string(),
            endpoint: config.endpoint.trim().to_string(),
            query_param: config.query_param.trim().to_string(),
            query: TEST_QUERY.to_string(),
            bearer_token: (!token.is_empty()).then(|| token.to_string()),
        }
    }
}

/// Result of an agent endpoint test.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointTestReport {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_snippet: Option<String>,
}

/// Result of an MCP server connection test.
///
/// A passing test also returns the discovered tool list and the server's
/// initialize metadata, which the form persists alongside the entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerTestReport {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(default)]
    pub tools: Vec<McpToolDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Failure from the probe collaborator.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ProbeError {
    pub message: String,
    pub status: Option<u16>,
    pub code: Option<String>,
    pub details: Option<serde_json::Value>,
}

impl ProbeError {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            code: None,
            details: None,
        }
    }
}

/// External test-connection collaborator.
#[async_trait]
pub trait EndpointProbe: Send + Sync {
    /// Test an agent discovery endpoint.
    async fn test_agent_endpoint(
        &self,
        request: &EndpointTestRequest,
    ) -> Result<EndpointTestReport, ProbeError>;

    /// Test an MCP server discovery URL.
    async fn test_server_connection(
        &self,
        discovery_url: &str,
    ) -> Result<ServerTestReport, ProbeError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{HttpMethod, Protocol};

    #[test]
    fn test_request_normalizes_token_and_trims() {
        let config = DiscoveryConfig {
            method: HttpMethod::Get,
            protocol: Protocol::Http,
            endpoint: " api.example.com/v1 ".to_string(),
            query_param: " q ".to_string(),
        };

        let request = EndpointTestRequest::from_config(&config, "Bearer a.b.c");
        assert_eq!(request.method, "GET");
        assert_eq!(request.protocol, "HTTP");
        assert_eq!(request.endpoint, "api.example.com/v1");
        assert_eq!(request.query_param, "q");
        assert_eq!(request.query, TEST_QUERY);
        assert_eq!(request.bearer_token.as_deref(), Some("a.b.c"));
    }

    #[test]
    fn test_request_omits_empty_token() {
        let request = EndpointTestRequest::from_config(&DiscoveryConfig::default(), "   ");
        assert!(request.bearer_token.is_none());

        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("bearerToken").is_none());
    }
}
