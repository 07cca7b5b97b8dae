//! MCP server form session.
//!
//! Same conceptual component as the agent session, instantiated for the
//! server dialog: the endpoint is a scheme + host/path discovery URL, and a
//! passing connection test also yields the server's tool list and metadata,
//! which the save payload carries along.

use chrono::Utc;
use tracing::debug;

use crate::domain::{
    McpServer, McpServerPayload, McpToolDef, Scheme, SemVer, ServerEndpoint, normalize_tools,
};
use crate::endpoint::{
    Fingerprint, VerificationFailure, VerificationRecord, VerificationState, is_valid_endpoint,
    is_valid_github_repo_url,
};
use crate::form::gate::{FormSection, SaveGateInput, can_save, first_invalid_section};
use crate::form::snapshot::{DirtySnapshot, SnapshotFields};
use crate::form::{FormError, FormMode, InFlight};
use crate::ports::{EndpointProbe, McpServerRegistry, ProbeError, ServerTestReport};

/// Handle for an in-flight connection test.
#[derive(Debug)]
pub struct ServerTestTicket {
    generation: u64,
    fingerprint: Fingerprint,
    pub discovery_url: String,
}

/// Persisted artifacts of the entity this session was opened on.
#[derive(Debug, Clone, Default)]
struct StoredTestArtifacts {
    tools: Vec<McpToolDef>,
    resolved_url: Option<String>,
    latency_ms: Option<u64>,
    metadata: Option<serde_json::Value>,
}

/// One open MCP server dialog.
pub struct ServerFormSession {
    mode: FormMode,
    name: String,
    description: String,
    version: SemVer,
    repository_url: String,
    endpoint: ServerEndpoint,
    verification: VerificationRecord,
    /// Typed report from this session's last passing test.
    last_report: Option<ServerTestReport>,
    /// Artifacts loaded with the entity, shown until a new test replaces
    /// them.
    stored: StoredTestArtifacts,
    snapshot: DirtySnapshot,
    in_flight: InFlight,
    generation: u64,
}

impl ServerFormSession {
    /// Open the dialog for a new server.
    pub fn open_new() -> Self {
        Self::assemble(
            FormMode::Create,
            String::new(),
            String::new(),
            SemVer::default(),
            String::new(),
            ServerEndpoint::default(),
            StoredTestArtifacts::default(),
            VerificationRecord::untested(),
        )
    }

    /// Open the dialog on an existing server; its stored discovery URL
    /// counts as verified.
    pub fn open_existing(server: &McpServer) -> Self {
        let endpoint = ServerEndpoint::split(&server.discovery_url);
        let fingerprint = endpoint.fingerprint();

        Self::assemble(
            FormMode::Edit(server.server_id),
            server.name.clone(),
            server.description.clone().unwrap_or_default(),
            SemVer::parse_or_default(&server.version),
            server.repository_url.clone().unwrap_or_default(),
            endpoint,
            StoredTestArtifacts {
                tools: server.tools.clone(),
                resolved_url: server.resolved_url.clone(),
                latency_ms: server.latency_ms,
                metadata: server.metadata.clone(),
            },
            VerificationRecord::verified(fingerprint, None),
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn assemble(
        mode: FormMode,
        name: String,
        description: String,
        version: SemVer,
        repository_url: String,
        endpoint: ServerEndpoint,
        stored: StoredTestArtifacts,
        verification: VerificationRecord,
    ) -> Self {
        let snapshot = DirtySnapshot::capture(&SnapshotFields {
            name: name.clone(),
            description: description.clone(),
            version: version.to_string(),
            repository_url: repository_url.clone(),
            models: std::collections::BTreeSet::new(),
            tools: std::collections::BTreeSet::new(),
            endpoint_fingerprint: endpoint.fingerprint(),
        });

        Self {
            mode,
            name,
            description,
            version,
            repository_url,
            endpoint,
            verification,
            last_report: None,
            stored,
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

    pub fn set_version(&mut self, version: SemVer) {
        self.version = version;
    }

    pub fn set_repository_url(&mut self, url: impl Into<String>) {
        self.repository_url = url.into();
    }

    pub fn set_scheme(&mut self, scheme: Scheme) {
        self.endpoint.scheme = scheme;
        self.resync_verification();
    }

    pub fn set_discovery_rest(&mut self, rest: impl Into<String>) {
        self.endpoint.rest = rest.into();
        self.resync_verification();
    }

    /// Replace the whole URL, re-splitting scheme and remainder.
    pub fn set_discovery_url(&mut self, full: &str) {
        self.endpoint = ServerEndpoint::split(full);
        self.resync_verification();
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

    pub fn version(&self) -> SemVer {
        self.version
    }

    pub fn endpoint(&self) -> &ServerEndpoint {
        &self.endpoint
    }

    pub fn verification(&self) -> &VerificationRecord {
        &self.verification
    }

    pub fn in_flight(&self) -> InFlight {
        self.in_flight
    }

    pub fn last_report(&self) -> Option<&ServerTestReport> {
        self.last_report.as_ref()
    }

    /// Tools to display and persist: the latest passing test wins,
    /// otherwise whatever the entity already had.
    pub fn tools(&self) -> &[McpToolDef] {
        match &self.last_report {
            Some(report) if !report.tools.is_empty() => &report.tools,
            _ => &self.stored.tools,
        }
    }

    pub fn live_fingerprint(&self) -> Fingerprint {
        self.endpoint.fingerprint()
    }

    fn resync_verification(&mut self) {
        let live = self.live_fingerprint();
        self.verification.sync(&live);
    }

    fn live_fields(&self) -> SnapshotFields {
        SnapshotFields {
            name: self.name.clone(),
            description: self.description.clone(),
            version: self.version.to_string(),
            repository_url: self.repository_url.clone(),
            models: std::collections::BTreeSet::new(),
            tools: std::collections::BTreeSet::new(),
            endpoint_fingerprint: self.live_fingerprint(),
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.snapshot.is_dirty(&self.live_fields())
    }

    pub fn general_valid(&self) -> bool {
        !self.name.trim().is_empty() && is_valid_github_repo_url(&self.repository_url)
    }

    pub fn endpoint_valid(&self) -> bool {
        is_valid_endpoint(self.endpoint.rest_normalized())
    }

    pub fn first_invalid_section(&self) -> Option<FormSection> {
        first_invalid_section(self.general_valid(), self.endpoint_valid())
    }

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

    /// Claim the session's network slot for a connection test.
    pub fn begin_test(&mut self) -> Result<ServerTestTicket, FormError> {
        if self.in_flight != InFlight::Idle {
            return Err(FormError::Busy);
        }
        if !self.endpoint_valid() {
            return Err(FormError::Invalid(FormSection::Endpoint));
        }

        self.in_flight = InFlight::Testing;
        Ok(ServerTestTicket {
            generation: self.generation,
            fingerprint: self.live_fingerprint(),
            discovery_url: self.endpoint.full_url(),
        })
    }

    /// Fold a test outcome back into the session.
    pub fn apply_test_outcome(
        &mut self,
        ticket: ServerTestTicket,
        outcome: Result<ServerTestReport, ProbeError>,
    ) -> Result<VerificationState, FormError> {
        if ticket.generation != self.generation {
            debug!(url = %ticket.discovery_url, "discarding stale connection test result");
            return Err(FormError::Stale);
        }
        self.in_flight = InFlight::Idle;

        match outcome {
            Ok(report) if report.ok => {
                let payload = serde_json::to_value(&report).ok();
                self.verification.record_success(ticket.fingerprint, payload);
                self.last_report = Some(report);
            }
            Ok(report) => {
                let message = report
                    .message
                    .clone()
                    .unwrap_or_else(|| "connection test returned non-ok".to_string());
                self.verification.record_failure(
                    ticket.fingerprint,
                    VerificationFailure {
                        message,
                        status: None,
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
        let outcome = probe.test_server_connection(&ticket.discovery_url).await;
        self.apply_test_outcome(ticket, outcome)
    }

    // ------------------------------------------------------------------
    // Save
    // ------------------------------------------------------------------

    /// Assemble the persist payload from the live state.
    ///
    /// A passing test in this session stamps the payload with the test
    /// artifacts and the current time.
    pub fn payload(&self) -> McpServerPayload {
        let tools = normalize_tools(self.tools());
        let mut payload = McpServerPayload {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            version: self.version.to_string(),
            discovery_url: self.endpoint.full_url(),
            repository_url: {
                let repo = self.repository_url.trim();
                (!repo.is_empty()).then(|| repo.to_string())
            },
            tools: (!tools.is_empty()).then_some(tools),
            ..McpServerPayload::default()
        };

        if let Some(report) = &self.last_report {
            if report.ok {
                payload.resolved_url = report.resolved_url.clone();
                payload.latency_ms = report.latency_ms;
                payload.metadata = report.metadata.clone();
                payload.last_test_ok = Some(true);
                payload.last_test_ts = Some(Utc::now());
            }
        }

        payload
    }

    /// Claim the session's network slot for a save.
    pub fn begin_save(&mut self) -> Result<(u64, McpServerPayload), FormError> {
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
    pub fn complete_save(
        &mut self,
        generation: u64,
        result: Result<McpServer, crate::ports::RegistryError>,
    ) -> Result<McpServer, FormError> {
        if generation != self.generation {
            return Err(FormError::Stale);
        }
        self.in_flight = InFlight::Idle;
        result.map_err(FormError::from)
    }

    /// Persist the draft through the registry port.
    pub async fn save(
        &mut self,
        registry: &dyn McpServerRegistry,
    ) -> Result<McpServer, FormError> {
        let (generation, payload) = self.begin_save()?;
        let result = match self.mode {
            FormMode::Create => registry.create_server(&payload).await,
            FormMode::Edit(id) => registry.update_server(id, &payload).await,
        };
        self.complete_save(generation, result)
    }
}
