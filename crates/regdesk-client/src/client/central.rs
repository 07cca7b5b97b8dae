//! MCP Central catalog browsing and import.

use async_trait::async_trait;
use serde_json::{Value, json};

use regdesk_core::{
    CentralCatalog, CentralServerSummary, CursorPage, McpServer, RegistryError,
};

use super::DefaultRegistryClient;

#[async_trait]
impl CentralCatalog for DefaultRegistryClient {
    async fn browse(
        &self,
        cursor: Option<&str>,
        limit: u32,
        search: Option<&str>,
    ) -> Result<CursorPage<CentralServerSummary>, RegistryError> {
        let mut pairs = vec![("limit", limit.to_string())];
        if let Some(cursor) = cursor.map(str::trim).filter(|c| !c.is_empty()) {
            pairs.push(("cursor", cursor.to_string()));
        }
        if let Some(search) = search.map(str::trim).filter(|s| !s.is_empty()) {
            pairs.push(("search", search.to_string()));
        }

        let url = self.endpoint_with_query(&["mcp-central", "servers"], &pairs)?;
        let value: Value = self.get(&url).await?;
        Ok(parse_central_page(&value))
    }

    async fn import_from_central(
        &self,
        server_name: &str,
        server_version: &str,
    ) -> Result<McpServer, RegistryError> {
        let url = self.endpoint(&["mcp-central", "servers", "import"])?;
        let body = json!({
            "serverName": server_name.trim(),
            "serverVersion": server_version.trim(),
        });
        Ok(self.post(&url, &body).await?)
    }
}

/// Extract the server list from a central catalog response.
///
/// The catalog wraps its list under `servers`, `items` or `content`
/// depending on the upstream version; entries missing a usable name are
/// skipped.
fn parse_central_page(value: &Value) -> CursorPage<CentralServerSummary> {
    let list = value
        .get("servers")
        .or_else(|| value.get("items"))
        .or_else(|| value.get("content"))
        .and_then(Value::as_array);

    let items = list
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| serde_json::from_value(entry.clone()).ok())
                .filter(|s: &CentralServerSummary| !s.name.trim().is_empty())
                .collect()
        })
        .unwrap_or_default();

    let next_cursor = value
        .get("nextCursor")
        .or_else(|| value.get("cursor"))
        .and_then(Value::as_str)
        .map(str::to_string);

    CursorPage { items, next_cursor }
}
