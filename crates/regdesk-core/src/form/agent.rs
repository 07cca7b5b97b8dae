//! Agent form session.
//!
//! Drives the create/edit dialog for agents: general info, associated
//! models, selected MCP tools, and the discovery endpoint with its
//! test-before-save verification rule.

use std::collections::BTreeMap;

use tracing::debug;

use crate::domain::{
    Agent, AgentMetadata, AgentPayload, DEFAULT_AGENT_VERSION, DiscoveryConfig, HttpMethod,
    McpServer, ModelRef, Protocol, SecurityConfig, ToolKey, ToolRef, is_valid_agent_version,
};
use crate::endpoint::{
    Fingerprint, VerificationFailure, VerificationRecord, VerificationState,
    is_valid_bearer_token, is_valid_endpoint, is_valid_github_repo_url, normalize_bearer_token,
};
use crate::form::gate::{FormSection, SaveGateInput, can_save, first_invalid_section};
use crate::form::snapshot::{DirtySnapshot, SnapshotFields};
use crate::form::{FormError, FormMode, InFlight};
use crate::ports::{
    AgentRegistry, EndpointProbe, EndpointTestReport, EndpointTestRequest, ProbeError,
};

/// Model family recorded when a selected model has no provider.
const FALLBACK_MODEL_FAMILY: &str = "AIModel";

/// Handle for an in-flight endpoint test.
///
/// Carries the generation the test belongs to, so a result arriving after
/// the session was closed or reopened is discarded.
#[derive(Debug)]
pub struct AgentTestTicket {
    generation: u64,
    fingerprint: Fingerprint,
    pub request: EndpointTestRequest,
}

/// Live field values at open time, before the snapshot is taken.
struct AgentDraft {
    name: String,
    description: String,
    version: String,
    github_repo_url: String,
    discovery: DiscoveryConfig,
    bearer_token: String,
    selected_models: BTreeMap<String, ModelRef>,
    selected_tools: BTreeMap<ToolKey, ToolRef>,
    extra_metadata: serde_json::Map<String, serde_json::Value>,
}

/// One open agent dialog.
pub struct AgentFormSession {
    mode: FormMode,
    name: String,
    description: String,
    version: String,
    github_repo_url: String,
    discovery: DiscoveryConfig,
    bearer_token: String,
    selected_models: BTreeMap<String, ModelRef>,
    selected_tools: BTreeMap<ToolKey, ToolRef>,
    /// Metadata keys this console does not manage, carried through saves.
    extra_metadata: serde_json::Map<String, serde_json::Value>,
    verification: VerificationRecord,
    snapshot: DirtySnapshot,
    in_flight: InFlight,
    generation: u64,
}

impl AgentFormSession {
    /// Open the dialog for a new agent.
    pub fn open_new() -> Self {
        Self::assemble(
            FormMode::Create,
            AgentDraft {
                name: String::new(),
                description: String::new(),
                version: DEFAULT_AGENT_VERSION.to_string(),
                github_repo_url: String::new(),
                discovery: DiscoveryConfig::default(),
                bearer_token: String::new(),
                selected_models: BTreeMap::new(),
                selected_tools: BTreeMap::new(),
                extra_metadata: serde_json::Map::new(),
            },
            VerificationRecord::untested(),
        )
    }

    /// Open the dialog on an existing agent.
    ///
    /// The stored endpoint configuration counts as verified: it passed a
    /// test when it was first saved, and verification is addressed by
    /// fingerprint, not by session.
    pub fn open_existing(agent: &Agent) -> Self {
        let discovery = agent.metadata.discovery.clone();
        let bearer_token = agent
            .metadata
            .security
            .bearer_token
            .clone()
            .unwrap_or_default();
        let fingerprint = discovery.fingerprint_with(&bearer_token);

        Self::assemble(
            FormMode::Edit(agent.agent_id),
            AgentDraft {
                name: agent.name.clone(),
                description: agent.description.clone(),
                version: agent.version.clone(),
                github_repo_url: agent.github_repo_url.clone().unwrap_or_default(),
                discovery,
                bearer_token,
                selected_models: agent
                    .metadata
                    .llms
                    .iter()
                    .map(|m| (m.identity_key(), m.clone()))
                    .collect(),
                selected_tools: agent
                    .metadata
                    .tools
                    .iter()
                    .map(|t| (ToolKey::from(t), t.clone()))
                    .collect(),
                extra_metadata: agent.metadata.extra.clone(),
            },
            VerificationRecord::verified(fingerprint, None),
        )
    }

    fn assemble(mode: FormMode, draft: AgentDraft, verification: VerificationRecord) -> Self {
        let snapshot = DirtySnapshot::capture(&SnapshotFields {
            name: draft.name.clone(),
            description: draft.description.clone(),
            version: draft.version.clone(),
            repository_url: draft.github_repo_url.clone(),
            models: draft.selected_models.keys().cloned().collect(),
            tools: draft
                .selected_tools
                .keys()
                .map(ToString::to_string)
                .collect(),
            endpoint_fingerprint: draft.discovery.fingerprint_with(&draft.bearer_token),
        });

        Self {
            mode,
            name: draft.name,
            description: draft.description,
            version: draft.version,
            github_repo_url: draft.github_repo_url,
            discovery: draft.discovery,
            bearer_token: draft.bearer_token,
            selected_models: draft.selected_models,
            selected_tools: draft.selected_tools,
            extra_metadata: draft.extra_metadata,
            verification,
            snapshot,
            in_flight: InFlight::Idle,
            generation: 0,
        }
    }

    /// Close the dialog, discarding any in-flight result.
    pub fn close(&mut self) {
        self.generation += 1;
        self.in_flight = InFlight::Idle;
    }

    // ------------------------------------------------------------------
    // Field mutators
    // ------------------------------------------------------------------

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn set_version(&mut self, version: impl Into<String>) {
        self.version = version.into();
    }

    pub fn set_github_repo_url(&mut self, url: impl Into<String>) {
        self.github_repo_url = url.into();
    }

    pub fn set_method(&mut self, method: HttpMethod) {
        self.discovery.method = method;
        self.resync_verification();
    }

    pub fn set_protocol(&mut self, protocol: Protocol) {
        self.discovery.protocol = protocol;
        self.resync_verification();
    }

    pub fn set_endpoint(&mut self, endpoint: impl Into<String>) {
        self.discovery.endpoint = endpoint.into();
        self.resync_verification();
    }

    pub fn set_query_param(&mut self, query_param: impl Into<String>) {
        self.discovery.query_param = query_param.into();
        self.resync_verification();
    }

    pub fn set_bearer_token(&mut self, token: impl Into<String>) {
        self.bearer_token = token.into();
        self.resync_verification();
    }

    pub fn select_model(&mut self, model: ModelRef) {
        self.selected_models.insert(model.identity_key(), model);
    }

    pub fn deselect_model(&mut self, model: &ModelRef) {
        self.selected_models.remove(&model.identity_key());
    }

    pub fn select_tool(&mut self, tool: ToolRef) {
        self.selected_tools.insert(ToolKey::from(&tool), tool);
    }

    pub fn deselect_tool(&mut self, key: &ToolKey) {
        self.selected_tools.remove(key);
    }

    /// Select every tool of an MCP server. Inactive servers are not
    /// selectable; existing selections on them can only be cleared.
    pub fn select_server_tools(&mut self, server: &McpServer) {
        if !server.status.is_active() {
            return;
        }
        let server_id = server.server_id.to_string();
        for tool in &server.tools {
            if tool.name.trim().is_empty() {
                continue;
            }
            self.select_tool(ToolRef {
                mcp_server_id: server_id.clone(),
                mcp_server_name: Some(server.name.clone()),
                mcp_server_version: Some(server.version.clone()),
                tool_name: tool.name.clone(),
            });
        }
    }

    /// Unlink every selected tool belonging to one server.
    pub fn clear_server_tools(&mut self, server_id: &str) {
        self.selected_tools
            .retain(|key, _| key.server_id != server_id);
    }

    // ------------------------------------------------------------------
    // Derived state
    // ------------------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn discovery(&self) -> &DiscoveryConfig {
        &self.discovery
    }

    pub fn selected_tool_count(&self) -> usize {
        self.selected_tools.len()
    }

    pub fn verification(&self) -> &VerificationRecord {
        &self.verification
    }

    pub fn in_flight(&self) -> InFlight {
        self.in_flight
    }

    /// Fingerprint of the live endpoint configuration.
    pub fn live_fingerprint(&self) -> Fingerprint {
        self.discovery.fingerprint_with(&self.bearer_token)
    }

    fn resync_verification(&mut self) {
        let live = self.live_fingerprint();
        self.verification.sync(&live);
    }

    fn live_fields(&self) -> SnapshotFields {
        SnapshotFields {
            name: self.name.clone(),
            description: self.description.clone(),
            version: self.version.clone(),
            repository_url: self.github_repo_url.clone(),
            models: self.selected_models.keys().cloned().collect(),
            tools: self
                .selected_tools
                .keys()
                .map(ToString::to_string)
                .collect(),
            endpoint_fingerprint: self.live_fingerprint(),
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.snapshot.is_dirty(&self.live_fields())
    }

    pub fn general_valid(&self) -> bool {
        !self.name.trim().is_empty()
            && is_valid_agent_version(&self.version)
            && !self.description.trim().is_empty()
            && !self.selected_models.is_empty()
            && is_valid_github_repo_url(&self.github_repo_url)
    }

    pub fn endpoint_valid(&self) -> bool {
        is_valid_endpoint(&self.discovery.endpoint)
            && !self.discovery.query_param.trim().is_empty()
            && is_valid_bearer_token(&self.bearer_token)
    }

    pub fn first_invalid_section(&self) -> Option<FormSection> {
        first_invalid_section(self.general_valid(), self.endpoint_valid())
    }

    /// Whether saving the live endpoint would require a fresh test.
    pub fn needs_verification(&self) -> bool {
        self.verification.needs_verification(&self.live_fingerprint())
    }

    pub fn can_save(&self) -> bool {
        can_save(&SaveGateInput {
            is_dirty: self.is_dirty(),
            all_fields_valid: self.general_valid() && self.endpoint_valid(),
            verification: self.verification.state(),
            busy: self.in_flight != InFlight::Idle,
        })
    }

    // ------------------------------------------------------------------
    // Test connection
    // ------------------------------------------------------------------

    /// Claim the session's network slot for an endpoint test.
    pub fn begin_test(&mut self) -> Result<AgentTestTicket, FormError> {
        if self.in_flight != InFlight::Idle {
            return Err(FormError::Busy);
        }
        if !self.endpoint_valid() {
            return Err(FormError::Invalid(FormSection::Endpoint));
        }

        self.in_flight = InFlight::Testing;
        Ok(AgentTestTicket {
            generation: self.generation,
            fingerprint: self.live_fingerprint(),
            request: EndpointTestRequest::from_config(&self.discovery, &self.bearer_token),
        })
    }

    /// Fold a test outcome back into the session.
    ///
    /// Results from a closed or reopened session are discarded.
    pub fn apply_test_outcome(
        &mut self,
        ticket: AgentTestTicket,
        outcome: Result<EndpointTestReport, ProbeError>,
    ) -> Result<VerificationState, FormError> {
        if ticket.generation != self.generation {
            debug!(fingerprint = %ticket.fingerprint, "discarding stale endpoint test result");
            return Err(FormError::Stale);
        }
        self.in_flight = InFlight::Idle;

        match outcome {
            Ok(report) if report.ok => {
                let payload = serde_json::to_value(&report).ok();
                self.verification.record_success(ticket.fingerprint, payload);
            }
            Ok(report) => {
                let message = report
                    .message
                    .clone()
                    .unwrap_or_else(|| "endpoint test returned non-ok".to_string());
                self.verification.record_failure(
                    ticket.fingerprint,
                    VerificationFailure {
                        message,
                        status: report.status,
                        details: serde_json::to_value(&report).ok(),
                    },
                );
            }
            Err(error) => {
                self.verification.record_failure(
                    ticket.fingerprint,
                    VerificationFailure {
                        message: error.message,
                        status: error.status,
                        details: error.details,
                    },
                );
            }
        }

        self.resync_verification();
        Ok(self.verification.state())
    }

    /// Run a connection test against the probe collaborator.
    pub async fn test_connection(
        &mut self,
        probe: &dyn EndpointProbe,
    ) -> Result<VerificationState, FormError> {
        let ticket = self.begin_test()?;
        let outcome = probe.test_agent_endpoint(&ticket.request).await;
        self.apply_test_outcome(ticket, outcome)
    }

    // ------------------------------------------------------------------
    // Save
    // ------------------------------------------------------------------

    /// Assemble the persist payload from the live state.
    pub fn payload(&self) -> AgentPayload {
        let token = normalize_bearer_token(&self.bearer_token);
        let llms = self
            .selected_models
            .values()
            .map(|m| ModelRef {
                id: m.id.trim().to_string(),
                model_family: if m.model_family.trim().is_empty() {
                    FALLBACK_MODEL_FAMILY.to_string()
                } else {
                    m.model_family.trim().to_string()
                },
                model_name: m.model_name.trim().to_string(),
            })
            .collect();

        AgentPayload {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            version: self.version.trim().to_string(),
            github_repo_url: self.github_repo_url.trim().to_string(),
            metadata: AgentMetadata {
                llms,
                discovery: DiscoveryConfig {
                    method: self.discovery.method,
                    protocol: self.discovery.protocol,
                    endpoint: self.discovery.endpoint.trim().to_string(),
                    query_param: self.discovery.query_param.trim().to_string(),
                },
                security: SecurityConfig {
                    bearer_token: (!token.is_empty()).then(|| token.to_string()),
                },
                tools: self.selected_tools.values().cloned().collect(),
                extra: self.extra_metadata.clone(),
            },
        }
    }

    /// Claim the session's network slot for a save.
    ///
    /// Checks run in the dialog's order: field validity first (with
    /// routing to the offending section), then the dirty gate, then the
    /// verification gate.
    pub fn begin_save(&mut self) -> Result<(u64, AgentPayload), FormError> {
        if self.in_flight != InFlight::Idle {
            return Err(FormError::Busy);
        }
        if let Some(section) = self.first_invalid_section() {
            return Err(FormError::Invalid(section));
        }
        if !self.is_dirty() {
            return Err(FormError::NotDirty);
        }
        if self.verification.state() != VerificationState::Ok {
            return Err(FormError::NeedsVerification);
        }

        self.in_flight = InFlight::Saving;
        Ok((self.generation, self.payload()))
    }

    /// Fold the persist outcome back into the session.
    ///
    /// Failures leave every field intact so the operator can retry.
    pub fn complete_save(
        &mut self,
        generation: u64,
        result: Result<Agent, crate::ports::RegistryError>,
    ) -> Result<Agent, FormError> {
        if generation != self.generation {
            return Err(FormError::Stale);
        }
        self.in_flight = InFlight::Idle;
        result.map_err(FormError::from)
    }

    /// Persist the draft through the registry port.
    pub async fn save(&mut self, registry: &dyn AgentRegistry) -> Result<Agent, FormError> {
        let (generation, payload) = self.begin_save()?;
        let result = match self.mode {
            FormMode::Create => registry.create_agent(&payload).await,
            FormMode::Edit(id) => registry.update_agent(id, &payload).await,
        };
        self.complete_save(generation, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ModelRef;

    fn valid_new_session() -> AgentFormSession {
        let mut session = AgentFormSession::open_new();
        session.set_name("checkout-agent");
        session.set_description("Handles checkout flows");
        session.set_version("1.2");
        session.select_model(ModelRef::new("m-1", "OpenAI", "gpt-4o"));
        session.set_endpoint("api.example.com/v1/agents");
        session.set_query_param("q");
        session
    }

    #[test]
    fn test_new_session_starts_clean_and_untested() {
        let session = AgentFormSession::open_new();
        assert!(!session.is_dirty());
        assert_eq!(session.verification().state(), VerificationState::Untested);
        assert!(!session.can_save());
    }

    #[test]
    fn test_validity_sections() {
        let mut session = AgentFormSession::open_new();
        assert_eq!(session.first_invalid_section(), Some(FormSection::General));

        session.set_name("a");
        session.set_description("d");
        session.select_model(ModelRef::new("m", "f", "n"));
        assert_eq!(session.first_invalid_section(), Some(FormSection::Endpoint));

        session.set_endpoint("api.example.com");
        session.set_query_param("q");
        assert_eq!(session.first_invalid_section(), None);
    }

    #[test]
    fn test_cannot_save_without_verification() {
        let mut session = valid_new_session();
        assert!(session.is_dirty());
        assert!(!session.can_save());
        assert!(matches!(
            session.begin_save(),
            Err(FormError::NeedsVerification)
        ));
    }

    #[test]
    fn test_successful_test_enables_save() {
        let mut session = valid_new_session();
        let ticket = session.begin_test().unwrap();
        session
            .apply_test_outcome(
                ticket,
                Ok(EndpointTestReport {
                    ok: true,
                    status: Some(200),
                    latency_ms: Some(12),
                    message: None,
                    response_snippet: None,
                }),
            )
            .unwrap();

        assert_eq!(session.verification().state(), VerificationState::Ok);
        assert!(session.can_save());
    }

    #[test]
    fn test_non_ok_report_is_a_failure() {
        let mut session = valid_new_session();
        let ticket = session.begin_test().unwrap();
        let state = session
            .apply_test_outcome(
                ticket,
                Ok(EndpointTestReport {
                    ok: false,
                    status: Some(502),
                    latency_ms: None,
                    message: Some("upstream refused".to_string()),
                    response_snippet: None,
                }),
            )
            .unwrap();

        assert_eq!(state, VerificationState::Failed);
        assert_eq!(
            session.verification().last_failure().unwrap().message,
            "upstream refused"
        );
        assert!(!session.can_save());
    }

    #[test]
    fn test_endpoint_edit_invalidates_then_revert_restores() {
        let mut session = valid_new_session();
        let ticket = session.begin_test().unwrap();
        session
            .apply_test_outcome(
                ticket,
                Ok(EndpointTestReport {
                    ok: true,
                    status: None,
                    latency_ms: None,
                    message: None,
                    response_snippet: None,
                }),
            )
            .unwrap();
        assert_eq!(session.verification().state(), VerificationState::Ok);

        session.set_query_param("other");
        assert_eq!(session.verification().state(), VerificationState::Untested);

        session.set_query_param("q");
        assert_eq!(session.verification().state(), VerificationState::Ok);
    }

    #[test]
    fn test_second_test_rejected_while_one_outstanding() {
        let mut session = valid_new_session();
        let _ticket = session.begin_test().unwrap();
        assert!(matches!(session.begin_test(), Err(FormError::Busy)));
        assert!(matches!(session.begin_save(), Err(FormError::Busy)));
    }

    #[test]
    fn test_stale_result_discarded_after_close() {
        let mut session = valid_new_session();
        let ticket = session.begin_test().unwrap();
        session.close();

        let result = session.apply_test_outcome(
            ticket,
            Ok(EndpointTestReport {
                ok: true,
                status: None,
                latency_ms: None,
                message: None,
                response_snippet: None,
            }),
        );
        assert!(matches!(result, Err(FormError::Stale)));
        assert_eq!(session.verification().state(), VerificationState::Untested);
    }

    #[test]
    fn test_payload_normalizes_bearer_and_families() {
        let mut session = valid_new_session();
        session.set_bearer_token("Bearer abc.def.ghi");
        session.select_model(ModelRef::new("m-2", "  ", "mystery"));

        let payload = session.payload();
        assert_eq!(
            payload.metadata.security.bearer_token.as_deref(),
            Some("abc.def.ghi")
        );

        let mystery = payload
            .metadata
            .llms
            .iter()
            .find(|m| m.id == "m-2")
            .unwrap();
        assert_eq!(mystery.model_family, FALLBACK_MODEL_FAMILY);
    }

    #[test]
    fn test_tool_selection_ignores_inactive_servers() {
        use crate::domain::{McpServer, McpToolDef, ServerStatus};
        use uuid::Uuid;

        let server = McpServer {
            server_id: Uuid::nil(),
            name: "files".to_string(),
            description: None,
            version: "1.0.0".to_string(),
            discovery_url: "https://files.example.com".to_string(),
            repository_url: None,
            status: ServerStatus::Inactive,
            tools: vec![McpToolDef {
                name: "read".to_string(),
                description: None,
                arguments: None,
            }],
            resolved_url: None,
            latency_ms: None,
            metadata: None,
            last_test_ok: None,
            last_test_ts: None,
        };

        let mut session = AgentFormSession::open_new();
        session.select_server_tools(&server);
        assert_eq!(session.selected_tool_count(), 0);

        let active = McpServer {
            status: ServerStatus::Active,
            ..server
        };
        session.select_server_tools(&active);
        assert_eq!(session.selected_tool_count(), 1);

        session.clear_server_tools(&Uuid::nil().to_string());
        assert_eq!(session.selected_tool_count(), 0);
    }
}
