//! HTTP backend abstraction for the registry API.
//!
//! This module provides a trait-based HTTP backend that allows for
//! dependency injection and easy testing. The production implementation
//! uses reqwest; GET requests retry transient errors with exponential
//! backoff, mutations are sent exactly once.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use crate::api::ApiErrorBody;
use crate::config::RegistryConfig;
use crate::error::{ClientError, ClientResult};

// ============================================================================
// HTTP Backend Trait
// ============================================================================

/// Trait for HTTP backends speaking JSON to the registry.
///
/// Methods move raw JSON; typed deserialization happens in the client on
/// top. Keeping the trait object-safe allows the client to hold any
/// backend as `Arc<dyn HttpBackend>`.
///
/// This is an implementation detail - external code should use
/// `DefaultRegistryClient` and interact with it through the core ports.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    /// GET a URL and return the JSON response.
    async fn get_json(&self, url: &Url) -> ClientResult<Value>;

    /// POST a JSON body and return the JSON response.
    async fn post_json(&self, url: &Url, body: &Value) -> ClientResult<Value>;

    /// PUT a JSON body and return the JSON response.
    async fn put_json(&self, url: &Url, body: &Value) -> ClientResult<Value>;

    /// DELETE a URL, discarding any response body.
    async fn delete(&self, url: &Url) -> ClientResult<()>;
}

// ============================================================================
// Reqwest Backend
// ============================================================================

/// Production HTTP backend using reqwest.
pub struct ReqwestBackend {
    client: reqwest::Client,
    max_retries: u8,
    retry_base_delay_ms: u64,
}

impl ReqwestBackend {
    /// Create a new reqwest backend with the given configuration.
    pub fn new(config: &RegistryConfig) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            max_retries: config.max_retries,
            retry_base_delay_ms: config.retry_base_delay_ms,
        })
    }

    /// GET with automatic retry for transient (5xx/network) errors.
    async fn get_with_retry(&self, url: &Url) -> ClientResult<reqwest::Response> {
        let mut last_error: Option<ClientError> = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = Duration::from_millis(
                    self.retry_base_delay_ms * 2u64.pow(u32::from(attempt) - 1),
                );
                tokio::time::sleep(delay).await;
            }

            match self.client.get(url.as_str()).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response);
                    }

                    // 5xx errors are retryable (server-side issues)
                    if status.is_server_error() && attempt < self.max_retries {
                        last_error = Some(into_status_error(response).await);
                        continue;
                    }

                    return Err(into_status_error(response).await);
                }
                Err(e) => {
                    // Network errors are retryable
                    if attempt < self.max_retries {
                        last_error = Some(e.into());
                        continue;
                    }
                    return Err(e.into());
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            ClientError::ApiStatus {
                status: 0,
                url: url.to_string(),
                body: ApiErrorBody::parse(""),
            }
        }))
    }

    async fn send_once(
        &self,
        request: reqwest::RequestBuilder,
    ) -> ClientResult<reqwest::Response> {
        let response = request.send().await?;
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(into_status_error(response).await)
        }
    }
}

/// Turn a non-success response into a structured error, keeping whatever
/// body the registry sent.
async fn into_status_error(response: reqwest::Response) -> ClientError {
    let status = response.status().as_u16();
    let url = response.url().to_string();
    let text = response.text().await.unwrap_or_default();
    ClientError::ApiStatus {
        status,
        url,
        body: ApiErrorBody::parse(&text),
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn get_json(&self, url: &Url) -> ClientResult<Value> {
        let response = self.get_with_retry(url).await?;
        Ok(response.json().await?)
    }

    async fn post_json(&self, url: &Url, body: &Value) -> ClientResult<Value> {
        let response = self
            .send_once(self.client.post(url.as_str()).json(body))
            .await?;
        Ok(response.json().await?)
    }

    async fn put_json(&self, url: &Url, body: &Value) -> ClientResult<Value> {
        let response = self
            .send_once(self.client.put(url.as_str()).json(body))
            .await?;
        Ok(response.json().await?)
    }

    async fn delete(&self, url: &Url) -> ClientResult<()> {
        self.send_once(self.client.delete(url.as_str())).await?;
        Ok(())
    }
}

// ============================================================================
// Fake Backend for Testing
// ============================================================================

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Recorded request seen by the fake backend.
    #[derive(Debug, Clone, PartialEq)]
    pub struct SeenRequest {
        pub method: &'static str,
        pub url: String,
        pub body: Option<Value>,
    }

    /// A fake HTTP backend that returns canned JSON responses and records
    /// every request it sees.
    #[derive(Default)]
    pub struct FakeBackend {
        responses: Mutex<HashMap<String, Value>>,
        seen: Mutex<Vec<SeenRequest>>,
    }

    impl FakeBackend {
        pub fn new() -> Self {
            Self::default()
        }

        /// Add a canned response for URLs containing the pattern.
        #[must_use]
        pub fn with_response(self, url_contains: &str, response: Value) -> Self {
            self.responses
                .lock()
                .unwrap()
                .insert(url_contains.to_string(), response);
            self
        }

        /// Every request the backend has served, in order.
        pub fn seen(&self) -> Vec<SeenRequest> {
            self.seen.lock().unwrap().clone()
        }

        fn respond(
            &self,
            method: &'static str,
            url: &Url,
            body: Option<&Value>,
        ) -> ClientResult<Value> {
            self.seen.lock().unwrap().push(SeenRequest {
                method,
                url: url.to_string(),
                body: body.cloned(),
            });

            let responses = self.responses.lock().unwrap();
            for (pattern, response) in responses.iter() {
                if url.as_str().contains(pattern) {
                    return Ok(response.clone());
                }
            }
            Err(ClientError::ApiStatus {
                status: 404,
                url: url.to_string(),
                body: ApiErrorBody::parse(""),
            })
        }
    }

    #[async_trait]
    impl HttpBackend for FakeBackend {
        async fn get_json(&self, url: &Url) -> ClientResult<Value> {
            self.respond("GET", url, None)
        }

        async fn post_json(&self, url: &Url, body: &Value) -> ClientResult<Value> {
            self.respond("POST", url, Some(body))
        }

        async fn put_json(&self, url: &Url, body: &Value) -> ClientResult<Value> {
            self.respond("PUT", url, Some(body))
        }

        async fn delete(&self, url: &Url) -> ClientResult<()> {
            self.respond("DELETE", url, None)?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakeBackend;
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_fake_backend_returns_canned_response() {
        let backend = FakeBackend::new().with_response("agents", json!({"ok": true}));
        let url = Url::parse("http://localhost:8080/v1/api/registry/agents").unwrap();

        let value: Value = backend.get_json(&url).await.unwrap();
        assert_eq!(value["ok"], true);

        let seen = backend.seen();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].method, "GET");
    }

    #[tokio::test]
    async fn test_fake_backend_404_for_unknown_url() {
        let backend = FakeBackend::new();
        let url = Url::parse("http://localhost:8080/unknown").unwrap();

        let result: ClientResult<Value> = backend.get_json(&url).await;
        assert!(matches!(
            result,
            Err(ClientError::ApiStatus { status: 404, .. })
        ));
    }

    #[test]
    fn test_reqwest_backend_creation() {
        let backend = ReqwestBackend::new(&RegistryConfig::default()).unwrap();
        assert_eq!(backend.max_retries, 3);
        assert_eq!(backend.retry_base_delay_ms, 500);
    }
}
