//! HTTP client for the regdesk registry API.
//!
//! Implements the core port traits (`AgentRegistry`, `McpServerRegistry`,
//! `ModelCatalog`, `CentralCatalog`, `EndpointProbe`) over reqwest, behind
//! an injectable backend trait so the wire behavior is testable with
//! canned responses.

mod api;
mod client;
mod config;
mod error;
mod http;

pub use api::ApiErrorBody;
pub use client::DefaultRegistryClient;
pub use config::{API_BASE_ENV, DEFAULT_API_BASE, RegistryConfig};
pub use error::{ClientError, ClientResult};
pub use http::{HttpBackend, ReqwestBackend};
