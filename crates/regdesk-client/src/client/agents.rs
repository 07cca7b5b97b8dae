//! Agent registry operations.

use async_trait::async_trait;
use uuid::Uuid;

use regdesk_core::{Agent, AgentPayload, AgentRegistry, Page, PageRequest, RegistryError};

use super::DefaultRegistryClient;

#[async_trait]
impl AgentRegistry for DefaultRegistryClient {
    async fn list_agents(&self, request: &PageRequest) -> Result<Page<Agent>, RegistryError> {
        let url = self.endpoint_with_query(&["agents"], &request.query_pairs())?;
        Ok(self.get(&url).await?)
    }

    async fn get_agent(&self, id: Uuid) -> Result<Agent, RegistryError> {
        let url = self.endpoint(&["agents", &id.to_string()])?;
        Ok(self.get(&url).await?)
    }

    async fn create_agent(&self, payload: &AgentPayload) -> Result<Agent, RegistryError> {
        let url = self.endpoint(&["agents"])?;
        let body = serde_json::to_value(payload).map_err(crate::error::ClientError::from)?;
        Ok(self.post(&url, &body).await?)
    }

    async fn update_agent(
        &self,
        id: Uuid,
        payload: &AgentPayload,
    ) -> Result<Agent, RegistryError> {
        let url = self.endpoint(&["agents", &id.to_string()])?;
        let body = serde_json::to_value(payload).map_err(crate::error::ClientError::from)?;
        Ok(self.put(&url, &body).await?)
    }

    async fn delete_agent(&self, id: Uuid) -> Result<(), RegistryError> {
        let url = self.endpoint(&["agents", &id.to_string()])?;
        Ok(self.delete_url(&url).await?)
    }

    async fn agent_definition(&self, id: Uuid) -> Result<serde_json::Value, RegistryError> {
        let url = self.endpoint(&["agents", &id.to_string(), "definition"])?;
        Ok(self.get(&url).await?)
    }

    async fn import_agent(&self, snapshot: &serde_json::Value) -> Result<Agent, RegistryError> {
        let url = self.endpoint(&["agents", "import"])?;
        Ok(self.post(&url, snapshot).await?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use url::Url;

    use crate::http::testing::FakeBackend;

    use super::*;

    fn client_with(backend: FakeBackend) -> DefaultRegistryClient {
        DefaultRegistryClient::with_backend(
            Arc::new(backend),
            Url::parse("http://localhost:8080/").unwrap(),
        )
    }

    fn agent_json(name: &str) -> serde_json::Value {
        json!({
            "agentId": "4b2d1f6e-3f64-4d18-9f4e-2a32a3a6a111",
            "name": name,
            "description": "desc",
            "version": "1.0",
            "metadata": {
                "llms": [{"id": "m-1", "modelFamily": "OpenAI", "modelName": "gpt-4o"}],
                "discovery": {
                    "method": "POST",
                    "protocol": "HTTPS",
                    "endpoint": "api.example.com/v1",
                    "queryParam": "q"
                },
                "security": {},
                "tools": []
            }
        })
    }

    #[tokio::test]
    async fn test_list_sends_pagination_query() {
        let backend = FakeBackend::new().with_response(
            "agents",
            json!({
                "content": [agent_json("a1")],
                "totalPages": 5,
                "totalElements": 120,
                "number": 2,
                "size": 25
            }),
        );
        let client = client_with(backend);

        let request = PageRequest::first()
            .with_page(2)
            .with_search("check")
            .with_sort("name", regdesk_core::SortDir::Asc);
        let page = client.list_agents(&request).await.unwrap();

        assert_eq!(page.content.len(), 1);
        assert_eq!(page.page, 2);
        assert!(page.has_more());
    }

    #[tokio::test]
    async fn test_update_puts_to_entity_url() {
        let id: Uuid = "4b2d1f6e-3f64-4d18-9f4e-2a32a3a6a111".parse().unwrap();
        let backend = FakeBackend::new().with_response(&id.to_string(), agent_json("renamed"));
        let client = client_with(backend);

        let payload = AgentPayload {
            name: "renamed".to_string(),
            description: "desc".to_string(),
            version: "1.0".to_string(),
            github_repo_url: String::new(),
            metadata: regdesk_core::AgentMetadata::default(),
        };
        let agent = client.update_agent(id, &payload).await.unwrap();
        assert_eq!(agent.name, "renamed");
    }

    #[tokio::test]
    async fn test_not_found_maps_cleanly() {
        let client = client_with(FakeBackend::new());
        let error = client.get_agent(Uuid::nil()).await.unwrap_err();
        assert!(matches!(error, RegistryError::NotFound(_)));
    }
}
