//! Form sessions for the resource dialogs.
//!
//! A session owns everything one open dialog needs: the live draft, the
//! open-time snapshot, the verification record and the in-flight guard.
//! Nothing in here is shared between concurrent sessions, and nothing
//! outlives the open/close cycle.

pub mod agent;
pub mod gate;
pub mod server;
pub mod snapshot;

use thiserror::Error;
use uuid::Uuid;

use crate::ports::RegistryError;

pub use agent::{AgentFormSession, AgentTestTicket};
pub use gate::{FormSection, SaveGateInput, can_save, first_invalid_section};
pub use server::{ServerFormSession, ServerTestTicket};
pub use snapshot::{DirtySnapshot, SnapshotFields};

/// Whether the session creates a new entity or updates an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(Uuid),
}

/// The one network slot a form session owns.
///
/// A test is never issued while a test or save is outstanding, and a save
/// never runs concurrently with a test.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InFlight {
    #[default]
    Idle,
    Testing,
    Saving,
}

/// Errors produced by form sessions.
#[derive(Debug, Error)]
pub enum FormError {
    /// The form has no changes relative to its open-time snapshot.
    #[error("no changes to save")]
    NotDirty,

    /// A required field failed validation; the section names where to look
    /// first.
    #[error("required fields incomplete in the {} section", .0.label())]
    Invalid(FormSection),

    /// The endpoint configuration has not passed a connection test.
    #[error("endpoint changed; run a successful connection test before saving")]
    NeedsVerification,

    /// A test or save is already outstanding for this session.
    #[error("another request is in flight for this form")]
    Busy,

    /// The session was closed or reset while the request was in flight;
    /// the result was discarded.
    #[error("the form was closed while the request was in flight")]
    Stale,

    /// The registry rejected the persist call; surfaced verbatim.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}
