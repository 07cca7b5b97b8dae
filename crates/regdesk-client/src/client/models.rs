//! AI model catalog operations.

use async_trait::async_trait;
use uuid::Uuid;

use regdesk_core::{AiModel, AiModelPayload, ModelCatalog, Page, PageRequest, RegistryError};

use super::DefaultRegistryClient;

#[async_trait]
impl ModelCatalog for DefaultRegistryClient {
    async fn list_models(&self, request: &PageRequest) -> Result<Page<AiModel>, RegistryError> {
        let url = self.endpoint_with_query(&["ai-models"], &request.query_pairs())?;
        Ok(self.get(&url).await?)
    }

    async fn create_model(&self, payload: &AiModelPayload) -> Result<AiModel, RegistryError> {
        let url = self.endpoint(&["ai-models"])?;
        let body = serde_json::to_value(payload).map_err(crate::error::ClientError::from)?;
        Ok(self.post(&url, &body).await?)
    }

    async fn update_model(
        &self,
        id: Uuid,
        payload: &AiModelPayload,
    ) -> Result<AiModel, RegistryError> {
        let url = self.endpoint(&["ai-models", &id.to_string()])?;
        let body = serde_json::to_value(payload).map_err(crate::error::ClientError::from)?;
        Ok(self.put(&url, &body).await?)
    }

    async fn delete_model(&self, id: Uuid) -> Result<(), RegistryError> {
        let url = self.endpoint(&["ai-models", &id.to_string()])?;
        Ok(self.delete_url(&url).await?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use url::Url;

    use crate::http::testing::FakeBackend;

    use super::*;

    #[tokio::test]
    async fn test_list_models_sorted_by_provider() {
        let backend = Arc::new(FakeBackend::new().with_response(
            "ai-models",
            json!({
                "content": [{
                    "modelId": "f0b94ec2-1a34-4c9a-8d8f-7b2f3c4d5e6f",
                    "modelName": "gpt-4o",
                    "provider": "OpenAI"
                }],
                "totalPages": 1,
                "totalElements": 1,
                "number": 0,
                "size": 25
            }),
        ));
        let client = DefaultRegistryClient::with_backend(
            backend.clone(),
            Url::parse("http://localhost:8080/").unwrap(),
        );

        let request = PageRequest::first().with_sort("provider", regdesk_core::SortDir::Asc);
        let page = client.list_models(&request).await.unwrap();
        assert_eq!(page.content[0].model_name, "gpt-4o");

        let seen = backend.seen();
        assert!(seen[0].url.contains("sortBy=provider"));
        assert!(seen[0].url.contains("sortDir=asc"));
    }
}
