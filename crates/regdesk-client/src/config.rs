//! Client configuration.

/// Environment variable holding the registry API base URL.
pub const API_BASE_ENV: &str = "REGDESK_API_BASE";

/// Fallback base URL for local development.
pub const DEFAULT_API_BASE: &str = "http://localhost:8080";

/// Configuration for the registry HTTP client.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Base URL of the registry service.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Maximum retries for transient GET failures.
    pub max_retries: u8,
    /// Base delay for exponential backoff between retries.
    pub retry_base_delay_ms: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            timeout_secs: 30,
            max_retries: 3,
            retry_base_delay_ms: 500,
        }
    }
}

impl RegistryConfig {
    /// Config with an explicit base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Read the base URL from the environment, falling back to the local
    /// default.
    pub fn from_env() -> Self {
        let base_url = std::env::var(API_BASE_ENV).unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        Self::with_base_url(base_url)
    }
}
