//! Core domain types and port definitions for the regdesk registry console.
//!
//! This crate holds everything the console knows without touching the
//! network: the registry resource types, the endpoint validators and
//! fingerprinting, the verification state machine, the form sessions with
//! their dirty-check and save gate, and the port traits the HTTP adapter
//! implements.

pub mod console;
pub mod domain;
pub mod endpoint;
pub mod form;
pub mod ports;
pub mod search;

// Re-export commonly used types for convenience
pub use console::{ConsoleSession, Credentials};
pub use domain::{
    Agent, AgentMetadata, AgentPayload, AiModel, AiModelPayload, ArgKind, ArgSpec, ArgValueError,
    CursorPage, DEFAULT_AGENT_VERSION, DEFAULT_PAGE_SIZE, DiscoveryConfig, HttpMethod, McpServer,
    McpServerPayload, McpToolDef, ModelRef, Page, PageRequest, Protocol, Scheme, SecurityConfig,
    SemVer, ServerEndpoint, ServerStatus, SortDir, ToolKey, ToolRef, build_args,
    is_valid_agent_version, normalize_tools, parse_arg_specs, version_options,
};
pub use endpoint::{
    Fingerprint, VerificationFailure, VerificationRecord, VerificationState,
    is_valid_bearer_token, is_valid_endpoint, is_valid_github_repo_url, normalize_bearer_token,
};
pub use form::{
    AgentFormSession, AgentTestTicket, DirtySnapshot, FormError, FormMode, FormSection, InFlight,
    SaveGateInput, ServerFormSession, ServerTestTicket, SnapshotFields, can_save,
    first_invalid_section,
};
pub use ports::{
    AgentRegistry, CentralCatalog, CentralServerSummary, DEFAULT_INVOKE_TIMEOUT_MS, EndpointProbe,
    EndpointTestReport, EndpointTestRequest, McpServerRegistry, ModelCatalog, ProbeError,
    RegistryError, ServerTestReport, TEST_QUERY, ToolInvocation,
};
pub use search::{Debouncer, SEARCH_DELAY};
