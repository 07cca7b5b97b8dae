//! Registry domain types.

pub mod agent;
pub mod model;
pub mod page;
pub mod schema;
pub mod server;

pub use agent::{
    Agent, AgentMetadata, AgentPayload, DEFAULT_AGENT_VERSION, DiscoveryConfig, HttpMethod,
    Protocol, SecurityConfig, ToolKey, ToolRef, is_valid_agent_version, version_options,
};
pub use model::{AiModel, AiModelPayload, ModelRef};
pub use page::{CursorPage, DEFAULT_PAGE_SIZE, Page, PageRequest, SortDir};
pub use schema::{ArgKind, ArgSpec, ArgValueError, build_args, parse_arg_specs};
pub use server::{
    McpServer, McpServerPayload, McpToolDef, Scheme, SemVer, ServerEndpoint, ServerStatus,
    normalize_tools,
};
