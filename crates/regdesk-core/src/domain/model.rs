//! AI/LLM model catalog types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A model registered in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiModel {
    pub model_id: Uuid,
    pub model_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

/// Payload for creating or updating a catalog model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiModelPayload {
    pub model_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

/// Reference to a model from an agent's metadata.
///
/// The identity key feeds the dirty-check's set comparison, so it is
/// normalized the same way the snapshot normalizes strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelRef {
    pub id: String,
    #[serde(default)]
    pub model_family: String,
    #[serde(default)]
    pub model_name: String,
}

impl ModelRef {
    pub fn new(
        id: impl Into<String>,
        model_family: impl Into<String>,
        model_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            model_family: model_family.into(),
            model_name: model_name.into(),
        }
    }

    /// Order-independent identity used for set membership.
    pub fn identity_key(&self) -> String {
        format!(
            "{}|{}|{}",
            self.id.trim(),
            self.model_family.trim(),
            self.model_name.trim()
        )
    }
}
