//! MCP server registry operations.

use async_trait::async_trait;
use serde_json::json;
use uuid::Uuid;

use regdesk_core::{
    McpServer, McpServerPayload, McpServerRegistry, Page, PageRequest, RegistryError,
    ToolInvocation,
};

use super::DefaultRegistryClient;

#[async_trait]
impl McpServerRegistry for DefaultRegistryClient {
    async fn list_servers(&self, request: &PageRequest) -> Result<Page<McpServer>, RegistryError> {
        let url = self.endpoint_with_query(&["mcp-servers"], &request.query_pairs())?;
        Ok(self.get(&url).await?)
    }

    async fn create_server(&self, payload: &McpServerPayload) -> Result<McpServer, RegistryError> {
        let url = self.endpoint(&["mcp-servers"])?;
        let body = serde_json::to_value(payload).map_err(crate::error::ClientError::from)?;
        Ok(self.post(&url, &body).await?)
    }

    async fn update_server(
        &self,
        id: Uuid,
        payload: &McpServerPayload,
    ) -> Result<McpServer, RegistryError> {
        let url = self.endpoint(&["mcp-servers", &id.to_string()])?;
        let body = serde_json::to_value(payload).map_err(crate::error::ClientError::from)?;
        Ok(self.put(&url, &body).await?)
    }

    async fn delete_server(&self, id: Uuid) -> Result<(), RegistryError> {
        let url = self.endpoint(&["mcp-servers", &id.to_string()])?;
        Ok(self.delete_url(&url).await?)
    }

    async fn server_definition(&self, id: Uuid) -> Result<serde_json::Value, RegistryError> {
        let url = self.endpoint(&["mcp-servers", &id.to_string(), "definition"])?;
        Ok(self.get(&url).await?)
    }

    async fn import_servers(
        &self,
        payload: &serde_json::Value,
        dry_run: bool,
        upsert: bool,
    ) -> Result<serde_json::Value, RegistryError> {
        let url = self.endpoint(&["mcp-servers", "import"])?;
        let body = json!({
            "payload": payload,
            "dryRun": dry_run,
            "upsert": upsert,
        });
        Ok(self.post(&url, &body).await?)
    }

    async fn invoke_tool(
        &self,
        server_id: Uuid,
        tool_name: &str,
        invocation: &ToolInvocation,
    ) -> Result<serde_json::Value, RegistryError> {
        let url = self.endpoint(&[
            "mcp-servers",
            &server_id.to_string(),
            "tools",
            tool_name,
            "invoke",
        ])?;

        // The invoke endpoint nests authentication under "auth"
        let mut body = json!({
            "args": invocation.args,
            "timeoutMs": invocation.timeout_ms,
            "dryRun": invocation.dry_run,
        });
        if let Some(token) = &invocation.bearer_token {
            body["auth"] = json!({ "bearerToken": token });
        }

        Ok(self.post(&url, &body).await?)
    }
}
