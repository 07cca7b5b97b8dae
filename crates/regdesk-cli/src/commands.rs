//! Subcommand definitions.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use uuid::Uuid;

use regdesk_core::{HttpMethod, Protocol, Scheme, SemVer, SortDir, ToolKey};

/// Top-level commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Log in to the console
    Login {
        #[arg(long, default_value = "admin")]
        username: String,
        /// Password; falls back to REGDESK_PASSWORD
        #[arg(long, env = "REGDESK_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Log out and clear the session
    Logout,

    /// Manage registered agents
    #[command(subcommand)]
    Agents(AgentCommands),

    /// Manage registered MCP servers
    #[command(subcommand)]
    Servers(ServerCommands),

    /// Manage the AI model catalog
    #[command(subcommand)]
    Models(ModelCommands),

    /// Browse and import from MCP Central
    #[command(subcommand)]
    Central(CentralCommands),
}

/// Shared list/search/sort/pagination flags.
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Filter by search text
    #[arg(long)]
    pub search: Option<String>,

    /// 0-based page index
    #[arg(long, default_value_t = 0)]
    pub page: u32,

    /// Page size
    #[arg(long, default_value_t = regdesk_core::DEFAULT_PAGE_SIZE)]
    pub size: u32,

    /// Sort field (e.g. name, provider, modelName)
    #[arg(long = "sort-by")]
    pub sort_by: Option<String>,

    /// Sort direction
    #[arg(long = "sort-dir", value_parser = parse_sort_dir)]
    pub sort_dir: Option<SortDir>,
}

fn parse_sort_dir(raw: &str) -> Result<SortDir, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "asc" => Ok(SortDir::Asc),
        "desc" => Ok(SortDir::Desc),
        other => Err(format!("expected asc or desc, got: {other}")),
    }
}

#[derive(Subcommand)]
pub enum AgentCommands {
    /// List agents
    List(ListArgs),

    /// Show one agent as JSON
    Show { id: Uuid },

    /// Create an agent (runs a connection test before saving)
    Create(AgentCreateArgs),

    /// Edit an agent; only the given flags change
    Edit {
        id: Uuid,
        #[command(flatten)]
        changes: AgentEditArgs,
    },

    /// Delete an agent
    Delete {
        id: Uuid,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Export an agent's full definition snapshot
    Export {
        id: Uuid,
        /// Write to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Import an agent from a definition snapshot file
    Import { file: PathBuf },

    /// Test a discovery endpoint without saving anything
    Test(AgentEndpointArgs),
}

/// Endpoint flags shared by create/test.
#[derive(Args, Debug, Clone)]
pub struct AgentEndpointArgs {
    #[arg(long, default_value = "POST")]
    pub method: HttpMethod,

    #[arg(long, default_value = "HTTPS")]
    pub protocol: Protocol,

    /// Discovery endpoint, host[:port][/path]
    #[arg(long)]
    pub endpoint: String,

    #[arg(long = "query-param")]
    pub query_param: String,

    /// Bearer token, with or without the "Bearer " prefix
    #[arg(long = "bearer-token")]
    pub bearer_token: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct AgentCreateArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub description: String,

    #[arg(long, default_value = regdesk_core::DEFAULT_AGENT_VERSION)]
    pub version: String,

    #[arg(long = "github-url")]
    pub github_url: Option<String>,

    /// Associated model as id|family|name; repeatable
    #[arg(long = "model", required = true)]
    pub models: Vec<String>,

    /// Selected tool as <server-id>::<tool-name>; repeatable
    #[arg(long = "tool")]
    pub tools: Vec<ToolKey>,

    #[command(flatten)]
    pub endpoint: AgentEndpointArgs,
}

#[derive(Args, Debug, Clone, Default)]
pub struct AgentEditArgs {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub version: Option<String>,

    #[arg(long = "github-url")]
    pub github_url: Option<String>,

    #[arg(long)]
    pub method: Option<HttpMethod>,

    #[arg(long)]
    pub protocol: Option<Protocol>,

    #[arg(long)]
    pub endpoint: Option<String>,

    #[arg(long = "query-param")]
    pub query_param: Option<String>,

    #[arg(long = "bearer-token")]
    pub bearer_token: Option<String>,

    /// Add an associated model (id|family|name); repeatable
    #[arg(long = "add-model")]
    pub add_models: Vec<String>,

    /// Remove an associated model (id|family|name); repeatable
    #[arg(long = "remove-model")]
    pub remove_models: Vec<String>,

    /// Add a tool selection (<server-id>::<tool-name>); repeatable
    #[arg(long = "add-tool")]
    pub add_tools: Vec<ToolKey>,

    /// Remove a tool selection; repeatable
    #[arg(long = "remove-tool")]
    pub remove_tools: Vec<ToolKey>,
}

#[derive(Subcommand)]
pub enum ServerCommands {
    /// List MCP servers
    List(ListArgs),

    /// Register an MCP server (runs a connection test before saving)
    Create(ServerCreateArgs),

    /// Edit an MCP server; only the given flags change
    Edit {
        id: Uuid,
        #[command(flatten)]
        changes: ServerEditArgs,
    },

    /// Delete an MCP server
    Delete {
        id: Uuid,
        #[arg(long)]
        yes: bool,
    },

    /// Export a server's full definition snapshot
    Export {
        id: Uuid,
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Import MCP servers from a JSON file
    Import {
        file: PathBuf,
        /// Validate without writing
        #[arg(long = "dry-run")]
        dry_run: bool,
        /// Fail on name/version matches instead of updating them
        #[arg(long = "no-upsert")]
        no_upsert: bool,
    },

    /// Test a discovery URL without saving anything
    Test {
        /// Full discovery URL (scheme optional, https assumed)
        url: String,
    },

    /// Invoke a tool on a registered server
    Invoke(ServerInvokeArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ServerCreateArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long, default_value = "")]
    pub description: String,

    /// Server version as x.y.z
    #[arg(long, default_value = "1.0.0", value_parser = parse_semver)]
    pub version: SemVer,

    #[arg(long = "repository-url")]
    pub repository_url: Option<String>,

    /// Discovery URL (scheme optional, https assumed)
    #[arg(long)]
    pub url: String,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ServerEditArgs {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long, value_parser = parse_semver)]
    pub version: Option<SemVer>,

    #[arg(long = "repository-url")]
    pub repository_url: Option<String>,

    #[arg(long, value_parser = parse_scheme)]
    pub scheme: Option<Scheme>,

    /// Discovery URL host/path, no scheme
    #[arg(long = "url-rest")]
    pub url_rest: Option<String>,
}

fn parse_semver(raw: &str) -> Result<SemVer, String> {
    SemVer::parse(raw).ok_or_else(|| format!("expected x.y.z, got: {raw}"))
}

fn parse_scheme(raw: &str) -> Result<Scheme, String> {
    raw.parse()
}

#[derive(Args, Debug, Clone)]
pub struct ServerInvokeArgs {
    pub id: Uuid,

    /// Tool name as discovered on the server
    pub tool: String,

    /// Tool argument as key=value; repeatable. Values are coerced against
    /// the tool's schema.
    #[arg(long = "arg")]
    pub args: Vec<String>,

    #[arg(long = "timeout-ms", default_value_t = regdesk_core::DEFAULT_INVOKE_TIMEOUT_MS)]
    pub timeout_ms: u64,

    #[arg(long = "bearer-token")]
    pub bearer_token: Option<String>,

    /// Validate the invocation without running the tool
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Subcommand)]
pub enum ModelCommands {
    /// List catalog models
    List(ListArgs),

    /// Add a model to the catalog
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        provider: Option<String>,
    },

    /// Edit a catalog model
    Edit {
        id: Uuid,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        provider: Option<String>,
    },

    /// Remove a model from the catalog
    Delete {
        id: Uuid,
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum CentralCommands {
    /// Browse the MCP Central catalog
    List {
        #[arg(long)]
        cursor: Option<String>,
        #[arg(long, default_value_t = 10)]
        limit: u32,
        #[arg(long)]
        search: Option<String>,
    },

    /// Import a server from MCP Central by name and version
    Import { name: String, version: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Cli;
    use clap::Parser;

    #[test]
    fn test_agent_create_parses_repeated_flags() {
        let cli = Cli::parse_from([
            "regdesk",
            "agents",
            "create",
            "--name",
            "checkout",
            "--description",
            "handles checkout",
            "--model",
            "m-1|OpenAI|gpt-4o",
            "--model",
            "m-2|Anthropic|claude",
            "--tool",
            "srv-1::search",
            "--endpoint",
            "api.example.com/v1",
            "--query-param",
            "q",
        ]);

        let Commands::Agents(AgentCommands::Create(args)) = cli.command else {
            panic!("expected agents create");
        };
        assert_eq!(args.models.len(), 2);
        assert_eq!(args.tools[0], ToolKey::new("srv-1", "search"));
        assert_eq!(args.endpoint.method, HttpMethod::Post);
        assert_eq!(args.version, "1.0");
    }

    #[test]
    fn test_server_invoke_args() {
        let cli = Cli::parse_from([
            "regdesk",
            "servers",
            "invoke",
            "7f9d2a44-93b1-4c5e-a2da-52b44cf60b11",
            "read_file",
            "--arg",
            "path=/tmp/x",
            "--timeout-ms",
            "5000",
            "--dry-run",
        ]);

        let Commands::Servers(ServerCommands::Invoke(args)) = cli.command else {
            panic!("expected servers invoke");
        };
        assert_eq!(args.tool, "read_file");
        assert_eq!(args.args, vec!["path=/tmp/x".to_string()]);
        assert_eq!(args.timeout_ms, 5000);
        assert!(args.dry_run);
    }

    #[test]
    fn test_sort_dir_parser() {
        assert_eq!(parse_sort_dir("ASC"), Ok(SortDir::Asc));
        assert_eq!(parse_sort_dir("desc"), Ok(SortDir::Desc));
        assert!(parse_sort_dir("sideways").is_err());
    }

    #[test]
    fn test_semver_parser_rejects_garbage() {
        assert!(parse_semver("1.2.3").is_ok());
        assert!(parse_semver("one.two").is_err());
    }
}
