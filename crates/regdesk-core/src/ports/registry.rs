//! Registry persistence ports.
//!
//! These traits define the contract between the console core and the
//! remote registry service. Adapters handle transport details; errors come
//! back structured so the console can surface them verbatim.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{
    Agent, AgentPayload, AiModel, AiModelPayload, CursorPage, McpServer, McpServerPayload, Page,
    PageRequest,
};

/// Errors surfaced by the registry collaborators.
///
/// API failures keep whatever structured body the backend returned; the
/// console shows them without reinterpretation.
#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    /// The requested entity does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The registry rejected the request.
    #[error("registry error: {message}")]
    Api {
        message: String,
        status: Option<u16>,
        code: Option<String>,
        details: Option<serde_json::Value>,
    },

    /// The registry could not be reached.
    #[error("transport error: {0}")]
    Transport(String),
}

impl RegistryError {
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
            status: None,
            code: None,
            details: None,
        }
    }
}

/// Agent registry operations.
#[async_trait]
pub trait AgentRegistry: Send + Sync {
    /// List agents with search/sort/pagination.
    async fn list_agents(&self, request: &PageRequest) -> Result<Page<Agent>, RegistryError>;

    /// Fetch a single agent.
    async fn get_agent(&self, id: Uuid) -> Result<Agent, RegistryError>;

    /// Create a new agent.
    async fn create_agent(&self, payload: &AgentPayload) -> Result<Agent, RegistryError>;

    /// Update an existing agent.
    async fn update_agent(&self, id: Uuid, payload: &AgentPayload)
    -> Result<Agent, RegistryError>;

    /// Delete an agent.
    async fn delete_agent(&self, id: Uuid) -> Result<(), RegistryError>;

    /// Full definition snapshot, suitable for export and re-import.
    async fn agent_definition(&self, id: Uuid) -> Result<serde_json::Value, RegistryError>;

    /// Import an agent from a definition snapshot.
    async fn import_agent(&self, snapshot: &serde_json::Value) -> Result<Agent, RegistryError>;
}

/// MCP server registry operations.
#[async_trait]
pub trait McpServerRegistry: Send + Sync {
    async fn list_servers(&self, request: &PageRequest) -> Result<Page<McpServer>, RegistryError>;

    async fn create_server(&self, payload: &McpServerPayload) -> Result<McpServer, RegistryError>;

    async fn update_server(
        &self,
        id: Uuid,
        payload: &McpServerPayload,
    ) -> Result<McpServer, RegistryError>;

    async fn delete_server(&self, id: Uuid) -> Result<(), RegistryError>;

    async fn server_definition(&self, id: Uuid) -> Result<serde_json::Value, RegistryError>;

    /// Bulk import from a JSON payload. `dry_run` validates without
    /// writing; `upsert` updates name/version matches instead of failing.
    async fn import_servers(
        &self,
        payload: &serde_json::Value,
        dry_run: bool,
        upsert: bool,
    ) -> Result<serde_json::Value, RegistryError>;

    /// Invoke a tool on a registered server.
    async fn invoke_tool(
        &self,
        server_id: Uuid,
        tool_name: &str,
        invocation: &ToolInvocation,
    ) -> Result<serde_json::Value, RegistryError>;
}

/// Default per-invocation timeout for tool calls.
pub const DEFAULT_INVOKE_TIMEOUT_MS: u64 = 30_000;

/// A tool invocation request.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolInvocation {
    pub args: serde_json::Map<String, serde_json::Value>,
    pub timeout_ms: u64,
    pub dry_run: bool,
    /// Normalized bearer token, omitted when empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bearer_token: Option<String>,
}

impl Default for ToolInvocation {
    fn default() -> Self {
        Self {
            args: serde_json::Map::new(),
            timeout_ms: DEFAULT_INVOKE_TIMEOUT_MS,
            dry_run: false,
            bearer_token: None,
        }
    }
}

/// AI model catalog operations.
#[async_trait]
pub trait ModelCatalog: Send + Sync {
    async fn list_models(&self, request: &PageRequest) -> Result<Page<AiModel>, RegistryError>;

    async fn create_model(&self, payload: &AiModelPayload) -> Result<AiModel, RegistryError>;

    async fn update_model(
        &self,
        id: Uuid,
        payload: &AiModelPayload,
    ) -> Result<AiModel, RegistryError>;

    async fn delete_model(&self, id: Uuid) -> Result<(), RegistryError>;
}

/// A server listed by the MCP Central catalog.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CentralServerSummary {
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// MCP Central browsing and one-click import.
#[async_trait]
pub trait CentralCatalog: Send + Sync {
    /// Browse the central catalog; cursor-paged.
    async fn browse(
        &self,
        cursor: Option<&str>,
        limit: u32,
        search: Option<&str>,
    ) -> Result<CursorPage<CentralServerSummary>, RegistryError>;

    /// Import a central server into the registry by name and version.
    async fn import_from_central(
        &self,
        server_name: &str,
        server_version: &str,
    ) -> Result<McpServer, RegistryError>;
}
