//! MCP server command handlers.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use uuid::Uuid;

use regdesk_core::{
    EndpointProbe, McpServer, McpServerRegistry, PageRequest, ServerFormSession, ToolInvocation,
    VerificationState, build_args, normalize_bearer_token, parse_arg_specs,
};

use crate::bootstrap::CliContext;
use crate::commands::{ListArgs, ServerCreateArgs, ServerEditArgs, ServerInvokeArgs};
use crate::handlers::{emit_json, page_request, verification_error};
use crate::presentation::tables;

/// Page size used when resolving a single server from the list endpoint.
const LOOKUP_PAGE_SIZE: u32 = 500;

async fn fetch_server(ctx: &CliContext, id: Uuid) -> Result<McpServer> {
    let request = PageRequest::first().with_size(LOOKUP_PAGE_SIZE);
    let page = ctx.client.list_servers(&request).await?;
    page.content
        .into_iter()
        .find(|s| s.server_id == id)
        .with_context(|| format!("no MCP server with id {id}"))
}

async fn verify(session: &mut ServerFormSession, probe: &dyn EndpointProbe) -> Result<()> {
    let state = session.test_connection(probe).await?;
    if state != VerificationState::Ok {
        return Err(verification_error(
            state,
            session.verification().last_failure(),
        ));
    }

    if let Some(report) = session.last_report() {
        println!(
            "connected: {} tools discovered{}",
            report.tools.len(),
            report
                .latency_ms
                .map(|ms| format!(" ({ms} ms)"))
                .unwrap_or_default()
        );
    }
    Ok(())
}

pub async fn list(ctx: &CliContext, args: &ListArgs) -> Result<()> {
    let page = ctx.client.list_servers(&page_request(args)).await?;
    println!("{}", tables::render_servers(&page));
    Ok(())
}

pub async fn create(ctx: &CliContext, args: &ServerCreateArgs) -> Result<()> {
    let mut session = ServerFormSession::open_new();
    session.set_name(&args.name);
    session.set_description(&args.description);
    session.set_version(args.version);
    if let Some(url) = &args.repository_url {
        session.set_repository_url(url);
    }
    session.set_discovery_url(&args.url);

    if let Some(section) = session.first_invalid_section() {
        anyhow::bail!("required fields incomplete in the {} section", section.label());
    }

    verify(&mut session, &ctx.client).await?;
    let server = session.save(&ctx.client).await?;
    println!("created MCP server {} ({})", server.name, server.server_id);
    Ok(())
}

pub async fn edit(ctx: &CliContext, id: Uuid, changes: &ServerEditArgs) -> Result<()> {
    let server = fetch_server(ctx, id).await?;
    let mut session = ServerFormSession::open_existing(&server);

    if let Some(name) = &changes.name {
        session.set_name(name);
    }
    if let Some(description) = &changes.description {
        session.set_description(description);
    }
    if let Some(version) = changes.version {
        session.set_version(version);
    }
    if let Some(url) = &changes.repository_url {
        session.set_repository_url(url);
    }
    if let Some(scheme) = changes.scheme {
        session.set_scheme(scheme);
    }
    if let Some(rest) = &changes.url_rest {
        session.set_discovery_rest(rest);
    }

    if !session.is_dirty() {
        println!("nothing to change");
        return Ok(());
    }

    if session.needs_verification() {
        verify(&mut session, &ctx.client).await?;
    }

    let server = session.save(&ctx.client).await?;
    println!("updated MCP server {} ({})", server.name, server.server_id);
    Ok(())
}

pub async fn delete(ctx: &CliContext, id: Uuid, yes: bool) -> Result<()> {
    if !crate::handlers::confirm(&format!("Delete MCP server {id}?"), yes)? {
        println!("aborted");
        return Ok(());
    }

    ctx.client.delete_server(id).await?;
    println!("deleted MCP server {id}");
    Ok(())
}

pub async fn export(ctx: &CliContext, id: Uuid, out: Option<&std::path::Path>) -> Result<()> {
    let definition = ctx.client.server_definition(id).await?;
    emit_json(&definition, out)
}

pub async fn import(
    ctx: &CliContext,
    file: &std::path::Path,
    dry_run: bool,
    upsert: bool,
) -> Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;
    let payload: serde_json::Value =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", file.display()))?;

    let report = ctx.client.import_servers(&payload, dry_run, upsert).await?;
    emit_json(&report, None)
}

/// Standalone connection test against a discovery URL.
pub async fn test(ctx: &CliContext, url: &str) -> Result<()> {
    let mut session = ServerFormSession::open_new();
    session.set_name("probe");
    session.set_discovery_url(url);

    verify(&mut session, &ctx.client).await?;
    if let Some(report) = session.last_report() {
        emit_json(&serde_json::to_value(report)?, None)?;
    }
    Ok(())
}

pub async fn invoke(ctx: &CliContext, args: &ServerInvokeArgs) -> Result<()> {
    let server = fetch_server(ctx, args.id).await?;
    let tool = server
        .tools
        .iter()
        .find(|t| t.name == args.tool)
        .with_context(|| format!("server {} has no tool named {}", server.name, args.tool))?;

    let inputs = parse_key_values(&args.args)?;
    let specs = tool
        .arguments
        .as_ref()
        .map(parse_arg_specs)
        .unwrap_or_default();
    let coerced = build_args(&specs, &inputs)?;

    let token = args
        .bearer_token
        .as_deref()
        .map(normalize_bearer_token)
        .filter(|t| !t.is_empty())
        .map(str::to_string);

    let invocation = ToolInvocation {
        args: coerced,
        timeout_ms: args.timeout_ms,
        dry_run: args.dry_run,
        bearer_token: token,
    };

    let result = ctx
        .client
        .invoke_tool(args.id, &args.tool, &invocation)
        .await?;
    emit_json(&result, None)
}

/// Parse repeated `key=value` flags into an input map.
fn parse_key_values(raw: &[String]) -> Result<BTreeMap<String, String>> {
    let mut map = BTreeMap::new();
    for entry in raw {
        let (key, value) = entry
            .split_once('=')
            .with_context(|| format!("expected key=value, got: {entry}"))?;
        map.insert(key.trim().to_string(), value.to_string());
    }
    Ok(map)
}
