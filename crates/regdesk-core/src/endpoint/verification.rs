//! Endpoint verification state machine.
//!
//! Tracks whether the currently-configured endpoint has passed a live test
//! against the registry. Verification is fingerprint-addressed: any change
//! to any fingerprinted field forces `Untested`, and an exact revert to a
//! previously-answered configuration restores that answer without another
//! network call.

use serde::{Deserialize, Serialize};

use super::fingerprint::Fingerprint;

/// Verification status of the live endpoint configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationState {
    /// Never tested, or edited since the last answer.
    #[default]
    Untested,
    /// The live configuration matches a successfully tested one.
    Ok,
    /// The live configuration matches one whose test failed.
    Failed,
}

/// Failure details retained from a test call for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationFailure {
    /// Human-readable message from the collaborator or transport.
    pub message: String,
    /// HTTP status, when the failure carried one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Structured error body, surfaced verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl VerificationFailure {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            details: None,
        }
    }
}

/// Verification record for one form session.
///
/// Owned exclusively by the session that created it; reset on every form
/// open and discarded on close.
#[derive(Debug, Clone, Default)]
pub struct VerificationRecord {
    /// Last configuration that passed a test, if any.
    verified: Option<Fingerprint>,
    /// Configuration the most recent test answered (pass or fail).
    tested: Option<Fingerprint>,
    state: VerificationState,
    /// Opaque success payload from the last passing test.
    last_report: Option<serde_json::Value>,
    last_failure: Option<VerificationFailure>,
}

impl VerificationRecord {
    /// Record for a brand-new entity: nothing verified yet.
    pub fn untested() -> Self {
        Self::default()
    }

    /// Record for an existing entity whose stored configuration was
    /// previously verified.
    pub fn verified(fingerprint: Fingerprint, report: Option<serde_json::Value>) -> Self {
        Self {
            verified: Some(fingerprint.clone()),
            tested: Some(fingerprint),
            state: VerificationState::Ok,
            last_report: report,
            last_failure: None,
        }
    }

    pub fn state(&self) -> VerificationState {
        self.state
    }

    pub fn verified_fingerprint(&self) -> Option<&Fingerprint> {
        self.verified.as_ref()
    }

    pub fn last_report(&self) -> Option<&serde_json::Value> {
        self.last_report.as_ref()
    }

    pub fn last_failure(&self) -> Option<&VerificationFailure> {
        self.last_failure.as_ref()
    }

    /// Whether saving the live configuration would require a fresh test.
    pub fn needs_verification(&self, live: &Fingerprint) -> bool {
        self.verified.as_ref() != Some(live)
    }

    /// Re-derive the state after a field change.
    ///
    /// The live fingerprint decides everything: a match with the verified
    /// configuration is `Ok`, a match with a failed one is `Failed`, any
    /// other value is `Untested`.
    pub fn sync(&mut self, live: &Fingerprint) {
        if self.verified.as_ref() == Some(live) {
            self.state = VerificationState::Ok;
        } else if self.tested.as_ref() == Some(live) && self.last_failure.is_some() {
            self.state = VerificationState::Failed;
        } else {
            self.state = VerificationState::Untested;
        }
    }

    /// Record a passing test of the live configuration.
    pub fn record_success(&mut self, live: Fingerprint, report: Option<serde_json::Value>) {
        self.tested = Some(live.clone());
        self.verified = Some(live);
        self.state = VerificationState::Ok;
        self.last_report = report;
        self.last_failure = None;
    }

    /// Record a failing test of the live configuration.
    ///
    /// The verified fingerprint is left untouched: a later revert to the
    /// last-good configuration still counts as verified.
    pub fn record_failure(&mut self, live: Fingerprint, failure: VerificationFailure) {
        self.tested = Some(live);
        self.state = VerificationState::Failed;
        self.last_failure = Some(failure);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fp(s: &str) -> Fingerprint {
        Fingerprint::join([s])
    }

    #[test]
    fn test_new_record_is_untested() {
        let record = VerificationRecord::untested();
        assert_eq!(record.state(), VerificationState::Untested);
        assert!(record.needs_verification(&fp("anything")));
    }

    #[test]
    fn test_edit_open_starts_verified() {
        let record = VerificationRecord::verified(fp("f0"), None);
        assert_eq!(record.state(), VerificationState::Ok);
        assert!(!record.needs_verification(&fp("f0")));
        assert!(record.needs_verification(&fp("f1")));
    }

    #[test]
    fn test_change_forces_untested_and_revert_restores_ok() {
        let mut record = VerificationRecord::verified(fp("f0"), None);

        record.sync(&fp("f1"));
        assert_eq!(record.state(), VerificationState::Untested);

        record.sync(&fp("f0"));
        assert_eq!(record.state(), VerificationState::Ok);
    }

    #[test]
    fn test_failure_is_sticky_for_the_failed_config_only() {
        let mut record = VerificationRecord::untested();
        record.record_failure(fp("bad"), VerificationFailure::message("refused"));
        assert_eq!(record.state(), VerificationState::Failed);

        record.sync(&fp("other"));
        assert_eq!(record.state(), VerificationState::Untested);

        record.sync(&fp("bad"));
        assert_eq!(record.state(), VerificationState::Failed);
        assert_eq!(record.last_failure().unwrap().message, "refused");
    }

    #[test]
    fn test_failure_does_not_clobber_verified() {
        let mut record = VerificationRecord::verified(fp("good"), None);
        record.record_failure(fp("bad"), VerificationFailure::message("timeout"));
        assert_eq!(record.state(), VerificationState::Failed);

        record.sync(&fp("good"));
        assert_eq!(record.state(), VerificationState::Ok);
        assert!(!record.needs_verification(&fp("good")));
    }

    #[test]
    fn test_success_replaces_failure() {
        let mut record = VerificationRecord::untested();
        record.record_failure(fp("f"), VerificationFailure::message("boom"));
        record.record_success(fp("f"), Some(serde_json::json!({"ok": true})));

        assert_eq!(record.state(), VerificationState::Ok);
        assert!(record.last_failure().is_none());
        assert!(record.last_report().is_some());
    }
}
