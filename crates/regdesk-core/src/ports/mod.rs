//! Port definitions for external collaborators.

pub mod probe;
pub mod registry;

pub use probe::{
    EndpointProbe, EndpointTestReport, EndpointTestRequest, ProbeError, ServerTestReport,
    TEST_QUERY,
};
pub use registry::{
    AgentRegistry, CentralCatalog, CentralServerSummary, DEFAULT_INVOKE_TIMEOUT_MS, McpServerRegistry,
    ModelCatalog, RegistryError, ToolInvocation,
};
