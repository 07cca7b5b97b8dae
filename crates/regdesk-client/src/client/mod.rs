//! The registry API client.
//!
//! `DefaultRegistryClient` implements the core port traits over an
//! injectable HTTP backend. One client instance serves every resource
//! kind; the per-resource implementations live in the sibling modules.

mod agents;
mod central;
mod models;
mod servers;

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use regdesk_core::{
    EndpointProbe, EndpointTestReport, EndpointTestRequest, ProbeError, ServerTestReport,
};

use crate::config::RegistryConfig;
use crate::error::ClientResult;
use crate::http::{HttpBackend, ReqwestBackend};

/// Root path of the registry API.
const API_ROOT: &str = "v1/api/registry";

/// Registry API client backed by an injectable HTTP backend.
pub struct DefaultRegistryClient {
    backend: Arc<dyn HttpBackend>,
    base: Url,
}

impl DefaultRegistryClient {
    /// Build a production client from configuration.
    pub fn new(config: &RegistryConfig) -> ClientResult<Self> {
        let base = Url::parse(&config.base_url)?;
        Ok(Self {
            backend: Arc::new(ReqwestBackend::new(config)?),
            base,
        })
    }

    /// Build a client over a custom backend.
    pub fn with_backend(backend: Arc<dyn HttpBackend>, base: Url) -> Self {
        Self { backend, base }
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, url: &Url) -> ClientResult<T> {
        let value = self.backend.get_json(url).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: &Url,
        body: &Value,
    ) -> ClientResult<T> {
        let value = self.backend.post_json(url, body).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub(crate) async fn put<T: DeserializeOwned>(
        &self,
        url: &Url,
        body: &Value,
    ) -> ClientResult<T> {
        let value = self.backend.put_json(url, body).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub(crate) async fn delete_url(&self, url: &Url) -> ClientResult<()> {
        self.backend.delete(url).await
    }

    /// Build an API URL from path segments, percent-encoding each one.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut path = String::from(API_ROOT);
        for segment in segments {
            path.push('/');
            path.push_str(&urlencoding::encode(segment));
        }
        Ok(self.base.join(&path)?)
    }

    /// Build an API URL with query pairs appended.
    pub(crate) fn endpoint_with_query(
        &self,
        segments: &[&str],
        pairs: &[(&str, String)],
    ) -> ClientResult<Url> {
        let mut url = self.endpoint(segments)?;
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in pairs {
                query.append_pair(key, value);
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl EndpointProbe for DefaultRegistryClient {
    async fn test_agent_endpoint(
        &self,
        request: &EndpointTestRequest,
    ) -> Result<EndpointTestReport, ProbeError> {
        let url = self
            .endpoint(&["agents", "endpoint", "test"])
            .map_err(ProbeError::from)?;
        let body = serde_json::to_value(request)
            .map_err(|e| ProbeError::message(e.to_string()))?;

        let report: EndpointTestReport =
            self.post(&url, &body).await.map_err(ProbeError::from)?;
        Ok(report)
    }

    async fn test_server_connection(
        &self,
        discovery_url: &str,
    ) -> Result<ServerTestReport, ProbeError> {
        let url = self
            .endpoint(&["mcp-servers", "test-connection"])
            .map_err(ProbeError::from)?;
        let body = serde_json::json!({ "discoveryUrl": discovery_url });

        let report: ServerTestReport =
            self.post(&url, &body).await.map_err(ProbeError::from)?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::FakeBackend;
    use serde_json::json;

    fn client_with(backend: FakeBackend) -> DefaultRegistryClient {
        DefaultRegistryClient::with_backend(
            Arc::new(backend),
            Url::parse("http://localhost:8080/").unwrap(),
        )
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let client = client_with(FakeBackend::new());
        let url = client
            .endpoint(&["mcp-servers", "id-1", "tools", "read file", "invoke"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/v1/api/registry/mcp-servers/id-1/tools/read%20file/invoke"
        );
    }

    #[test]
    fn test_endpoint_with_query() {
        let client = client_with(FakeBackend::new());
        let url = client
            .endpoint_with_query(&["ai-models"], &[("page", "0".to_string())])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/v1/api/registry/ai-models?page=0"
        );
    }

    #[tokio::test]
    async fn test_agent_probe_posts_request_body() {
        let backend = FakeBackend::new().with_response(
            "agents/endpoint/test",
            json!({"ok": true, "status": 200, "latencyMs": 41}),
        );
        let client = client_with(backend);

        let request = EndpointTestRequest {
            method: "POST".to_string(),
            protocol: "HTTPS".to_string(),
            endpoint: "api.example.com/v1".to_string(),
            query_param: "q".to_string(),
            query: "test".to_string(),
            bearer_token: None,
        };
        let report = client.test_agent_endpoint(&request).await.unwrap();

        assert!(report.ok);
        assert_eq!(report.latency_ms, Some(41));
    }

    #[tokio::test]
    async fn test_server_probe_failure_maps_to_probe_error() {
        let client = client_with(FakeBackend::new());
        let error = client
            .test_server_connection("https://down.example.com")
            .await
            .unwrap_err();
        assert_eq!(error.status, Some(404));
    }
}
