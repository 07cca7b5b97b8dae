//! AI model catalog handlers.

use anyhow::Result;
use uuid::Uuid;

use regdesk_core::{AiModelPayload, ModelCatalog};

use crate::bootstrap::CliContext;
use crate::commands::ListArgs;
use crate::handlers::page_request;
use crate::presentation::tables;

pub async fn list(ctx: &CliContext, args: &ListArgs) -> Result<()> {
    let page = ctx.client.list_models(&page_request(args)).await?;
    println!("{}", tables::render_models(&page));
    Ok(())
}

pub async fn create(
    ctx: &CliContext,
    name: &str,
    description: Option<&str>,
    provider: Option<&str>,
) -> Result<()> {
    anyhow::ensure!(!name.trim().is_empty(), "model name is required");

    let payload = AiModelPayload {
        model_name: name.trim().to_string(),
        model_description: description.map(str::to_string),
        provider: provider.map(str::to_string),
    };
    let model = ctx.client.create_model(&payload).await?;
    println!("created model {} ({})", model.model_name, model.model_id);
    Ok(())
}

pub async fn edit(
    ctx: &CliContext,
    id: Uuid,
    name: Option<&str>,
    description: Option<&str>,
    provider: Option<&str>,
) -> Result<()> {
    // The catalog has no single-entity GET, so an edit needs the new name
    // spelled out; unchanged fields are found via the list
    let request = regdesk_core::PageRequest::first().with_size(500);
    let current = ctx
        .client
        .list_models(&request)
        .await?
        .content
        .into_iter()
        .find(|m| m.model_id == id)
        .ok_or_else(|| anyhow::anyhow!("no model with id {id}"))?;

    let payload = AiModelPayload {
        model_name: name
            .map(str::to_string)
            .unwrap_or_else(|| current.model_name.clone()),
        model_description: description
            .map(str::to_string)
            .or(current.model_description),
        provider: provider.map(str::to_string).or(current.provider),
    };

    let model = ctx.client.update_model(id, &payload).await?;
    println!("updated model {} ({})", model.model_name, model.model_id);
    Ok(())
}

pub async fn delete(ctx: &CliContext, id: Uuid, yes: bool) -> Result<()> {
    if !crate::handlers::confirm(&format!("Delete model {id}?"), yes)? {
        println!("aborted");
        return Ok(());
    }

    ctx.client.delete_model(id).await?;
    println!("deleted model {id}");
    Ok(())
}
