//! Plain-text table rendering for list views.

use regdesk_core::{Agent, AiModel, CentralServerSummary, McpServer, Page};

/// Render rows under headers with padded columns.
fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.len());
            }
        }
    }

    let mut out = String::new();
    for (i, header) in headers.iter().enumerate() {
        if i > 0 {
            out.push_str("  ");
        }
        out.push_str(&format!("{header:<width$}", width = widths[i]));
    }
    out.push('\n');

    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i > 0 {
                out.push_str("  ");
            }
            out.push_str(&format!("{cell:<width$}", width = widths[i]));
        }
        out.push('\n');
    }
    out
}

fn page_footer<T>(page: &Page<T>) -> String {
    format!(
        "page {} of {} ({} total)",
        page.page + 1,
        page.total_pages.max(1),
        page.total_elements
    )
}

pub fn render_agents(page: &Page<Agent>) -> String {
    let rows: Vec<Vec<String>> = page
        .content
        .iter()
        .map(|agent| {
            vec![
                agent.agent_id.to_string(),
                agent.name.clone(),
                agent.version.clone(),
                agent.metadata.llms.len().to_string(),
                agent.metadata.tools.len().to_string(),
                agent.metadata.discovery.endpoint.clone(),
            ]
        })
        .collect();

    format!(
        "{}{}",
        table(
            &["ID", "NAME", "VERSION", "MODELS", "TOOLS", "ENDPOINT"],
            &rows
        ),
        page_footer(page)
    )
}

pub fn render_servers(page: &Page<McpServer>) -> String {
    let rows: Vec<Vec<String>> = page
        .content
        .iter()
        .map(|server| {
            vec![
                server.server_id.to_string(),
                server.name.clone(),
                server.version.clone(),
                if server.status.is_active() {
                    "ACTIVE".to_string()
                } else {
                    "INACTIVE".to_string()
                },
                server.tools.len().to_string(),
                server.discovery_url.clone(),
            ]
        })
        .collect();

    format!(
        "{}{}",
        table(
            &["ID", "NAME", "VERSION", "STATUS", "TOOLS", "DISCOVERY URL"],
            &rows
        ),
        page_footer(page)
    )
}

pub fn render_models(page: &Page<AiModel>) -> String {
    let rows: Vec<Vec<String>> = page
        .content
        .iter()
        .map(|model| {
            vec![
                model.model_id.to_string(),
                model.provider.clone().unwrap_or_else(|| "-".to_string()),
                model.model_name.clone(),
                model
                    .model_description
                    .clone()
                    .unwrap_or_default()
                    .lines()
                    .next()
                    .unwrap_or_default()
                    .to_string(),
            ]
        })
        .collect();

    format!(
        "{}{}",
        table(&["ID", "PROVIDER", "NAME", "DESCRIPTION"], &rows),
        page_footer(page)
    )
}

pub fn render_central(items: &[CentralServerSummary]) -> String {
    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|server| {
            vec![
                server.name.clone(),
                server.version.clone(),
                server.description.clone().unwrap_or_default(),
            ]
        })
        .collect();

    table(&["NAME", "VERSION", "DESCRIPTION"], &rows)
}
