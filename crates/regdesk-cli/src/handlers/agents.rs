//! Agent command handlers.

use anyhow::{Context, Result};
use uuid::Uuid;

use regdesk_core::{
    AgentFormSession, AgentRegistry, EndpointProbe, ModelRef, ToolKey, ToolRef, VerificationState,
};

use crate::bootstrap::CliContext;
use crate::commands::{AgentCreateArgs, AgentEditArgs, AgentEndpointArgs, ListArgs};
use crate::handlers::{emit_json, page_request, verification_error};
use crate::presentation::tables;

/// Parse an `id|family|name` model flag.
fn parse_model_ref(raw: &str) -> Result<ModelRef> {
    let mut parts = raw.splitn(3, '|');
    let id = parts.next().unwrap_or_default().trim();
    anyhow::ensure!(!id.is_empty(), "model flag needs at least an id: {raw}");

    Ok(ModelRef::new(
        id,
        parts.next().unwrap_or_default().trim(),
        parts.next().unwrap_or_default().trim(),
    ))
}

fn tool_ref(key: &ToolKey) -> ToolRef {
    ToolRef {
        mcp_server_id: key.server_id.clone(),
        mcp_server_name: None,
        mcp_server_version: None,
        tool_name: key.tool_name.clone(),
    }
}

/// Run the session's connection test and fail loudly when it does not pass.
async fn verify(session: &mut AgentFormSession, probe: &dyn EndpointProbe) -> Result<()> {
    let state = session.test_connection(probe).await?;
    if state != VerificationState::Ok {
        return Err(verification_error(
            state,
            session.verification().last_failure(),
        ));
    }

    if let Some(report) = session.verification().last_report() {
        if let Some(latency) = report.get("latencyMs").and_then(serde_json::Value::as_u64) {
            println!("connection test passed ({latency} ms)");
        } else {
            println!("connection test passed");
        }
    }
    Ok(())
}

pub async fn list(ctx: &CliContext, args: &ListArgs) -> Result<()> {
    let page = ctx.client.list_agents(&page_request(args)).await?;
    println!("{}", tables::render_agents(&page));
    Ok(())
}

pub async fn show(ctx: &CliContext, id: Uuid) -> Result<()> {
    let agent = ctx.client.get_agent(id).await?;
    emit_json(&serde_json::to_value(&agent)?, None)
}

pub async fn create(ctx: &CliContext, args: &AgentCreateArgs) -> Result<()> {
    let mut session = AgentFormSession::open_new();
    session.set_name(&args.name);
    session.set_description(&args.description);
    session.set_version(&args.version);
    if let Some(url) = &args.github_url {
        session.set_github_repo_url(url);
    }
    for raw in &args.models {
        session.select_model(parse_model_ref(raw)?);
    }
    for key in &args.tools {
        session.select_tool(tool_ref(key));
    }
    apply_endpoint(&mut session, &args.endpoint);

    if let Some(section) = session.first_invalid_section() {
        anyhow::bail!("required fields incomplete in the {} section", section.label());
    }

    verify(&mut session, &ctx.client).await?;
    let agent = session.save(&ctx.client).await?;
    println!("created agent {} ({})", agent.name, agent.agent_id);
    Ok(())
}

fn apply_endpoint(session: &mut AgentFormSession, endpoint: &AgentEndpointArgs) {
    session.set_method(endpoint.method);
    session.set_protocol(endpoint.protocol);
    session.set_endpoint(&endpoint.endpoint);
    session.set_query_param(&endpoint.query_param);
    if let Some(token) = &endpoint.bearer_token {
        session.set_bearer_token(token);
    }
}

pub async fn edit(ctx: &CliContext, id: Uuid, changes: &AgentEditArgs) -> Result<()> {
    let agent = ctx.client.get_agent(id).await?;
    let mut session = AgentFormSession::open_existing(&agent);

    if let Some(name) = &changes.name {
        session.set_name(name);
    }
    if let Some(description) = &changes.description {
        session.set_description(description);
    }
    if let Some(version) = &changes.version {
        session.set_version(version);
    }
    if let Some(url) = &changes.github_url {
        session.set_github_repo_url(url);
    }
    if let Some(method) = changes.method {
        session.set_method(method);
    }
    if let Some(protocol) = changes.protocol {
        session.set_protocol(protocol);
    }
    if let Some(endpoint) = &changes.endpoint {
        session.set_endpoint(endpoint);
    }
    if let Some(query_param) = &changes.query_param {
        session.set_query_param(query_param);
    }
    if let Some(token) = &changes.bearer_token {
        session.set_bearer_token(token);
    }
    for raw in &changes.add_models {
        session.select_model(parse_model_ref(raw)?);
    }
    for raw in &changes.remove_models {
        session.deselect_model(&parse_model_ref(raw)?);
    }
    for key in &changes.add_tools {
        session.select_tool(tool_ref(key));
    }
    for key in &changes.remove_tools {
        session.deselect_tool(key);
    }

    if !session.is_dirty() {
        println!("nothing to change");
        return Ok(());
    }

    // Endpoint untouched means the stored verification still stands
    if session.needs_verification() {
        verify(&mut session, &ctx.client).await?;
    }

    let agent = session.save(&ctx.client).await?;
    println!("updated agent {} ({})", agent.name, agent.agent_id);
    Ok(())
}

pub async fn delete(ctx: &CliContext, id: Uuid, yes: bool) -> Result<()> {
    if !crate::handlers::confirm(&format!("Delete agent {id}?"), yes)? {
        println!("aborted");
        return Ok(());
    }

    ctx.client.delete_agent(id).await?;
    println!("deleted agent {id}");
    Ok(())
}

pub async fn export(ctx: &CliContext, id: Uuid, out: Option<&std::path::Path>) -> Result<()> {
    let definition = ctx.client.agent_definition(id).await?;
    emit_json(&definition, out)
}

pub async fn import(ctx: &CliContext, file: &std::path::Path) -> Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;
    let snapshot: serde_json::Value =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", file.display()))?;

    let agent = ctx.client.import_agent(&snapshot).await?;
    println!("imported agent {} ({})", agent.name, agent.agent_id);
    Ok(())
}

/// Standalone endpoint test: exercises the validators and the probe
/// without touching the registry.
pub async fn test(ctx: &CliContext, endpoint: &AgentEndpointArgs) -> Result<()> {
    let mut session = AgentFormSession::open_new();
    apply_endpoint(&mut session, endpoint);

    verify(&mut session, &ctx.client).await?;
    if let Some(report) = session.verification().last_report() {
        emit_json(report, None)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_model_ref_variants() {
        let full = parse_model_ref("m-1|OpenAI|gpt-4o").unwrap();
        assert_eq!(full.id, "m-1");
        assert_eq!(full.model_family, "OpenAI");
        assert_eq!(full.model_name, "gpt-4o");

        let bare = parse_model_ref("m-2").unwrap();
        assert_eq!(bare.id, "m-2");
        assert!(bare.model_family.is_empty());

        assert!(parse_model_ref("  |family|name").is_err());
    }
}
