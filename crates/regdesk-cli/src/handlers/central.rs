//! MCP Central browsing and import handlers.

use anyhow::Result;

use regdesk_core::CentralCatalog;

use crate::bootstrap::CliContext;
use crate::presentation::tables;

pub async fn list(
    ctx: &CliContext,
    cursor: Option<&str>,
    limit: u32,
    search: Option<&str>,
) -> Result<()> {
    let page = ctx.client.browse(cursor, limit, search).await?;
    println!("{}", tables::render_central(&page.items));
    if let Some(next) = &page.next_cursor {
        println!("more available: --cursor {next}");
    }
    Ok(())
}

pub async fn import(ctx: &CliContext, name: &str, version: &str) -> Result<()> {
    let server = ctx.client.import_from_central(name, version).await?;
    println!(
        "imported MCP server {} v{} ({})",
        server.name, server.version, server.server_id
    );
    Ok(())
}
