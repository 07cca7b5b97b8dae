//! Open-time snapshot and dirty-check.
//!
//! The snapshot is taken once when a form opens and never mutated; the
//! dirty flag is re-derived from a full comparison on every query rather
//! than maintained incrementally.

use std::collections::BTreeSet;

use crate::endpoint::Fingerprint;

/// Every field that participates in persistence, in comparable form.
///
/// Set-valued fields hold identity keys, so comparison is by membership
/// and cardinality, never by ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotFields {
    pub name: String,
    pub description: String,
    pub version: String,
    pub repository_url: String,
    pub models: BTreeSet<String>,
    pub tools: BTreeSet<String>,
    pub endpoint_fingerprint: Fingerprint,
}

impl SnapshotFields {
    /// Trim the string fields; sets are expected to hold trimmed keys.
    fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            version: self.version.trim().to_string(),
            repository_url: self.repository_url.trim().to_string(),
            models: self.models.clone(),
            tools: self.tools.clone(),
            endpoint_fingerprint: self.endpoint_fingerprint.clone(),
        }
    }
}

/// Immutable copy of the form's fields at open time.
#[derive(Debug, Clone)]
pub struct DirtySnapshot {
    fields: SnapshotFields,
}

impl DirtySnapshot {
    /// Capture the open-time state.
    pub fn capture(fields: &SnapshotFields) -> Self {
        Self {
            fields: fields.normalized(),
        }
    }

    /// Whether the live state diverges from the snapshot in any field.
    pub fn is_dirty(&self, live: &SnapshotFields) -> bool {
        live.normalized() != self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> SnapshotFields {
        SnapshotFields {
            name: "checkout-agent".to_string(),
            description: "handles checkout".to_string(),
            version: "1.0".to_string(),
            repository_url: String::new(),
            models: BTreeSet::from(["m1|OpenAI|gpt".to_string()]),
            tools: BTreeSet::from(["srv::search".to_string()]),
            endpoint_fingerprint: Fingerprint::join(["POST", "HTTPS", "h", "q", ""]),
        }
    }

    #[test]
    fn test_clean_immediately_after_capture() {
        let live = fields();
        let snapshot = DirtySnapshot::capture(&live);
        assert!(!snapshot.is_dirty(&live));
    }

    #[test]
    fn test_whitespace_only_change_stays_clean() {
        let snapshot = DirtySnapshot::capture(&fields());
        let mut live = fields();
        live.name = "  checkout-agent  ".to_string();
        assert!(!snapshot.is_dirty(&live));
    }

    #[test]
    fn test_single_mutation_then_undo() {
        let snapshot = DirtySnapshot::capture(&fields());

        let mut live = fields();
        live.description = "handles checkout and refunds".to_string();
        assert!(snapshot.is_dirty(&live));

        live.description = "handles checkout".to_string();
        assert!(!snapshot.is_dirty(&live));
    }

    #[test]
    fn test_set_comparison_ignores_insertion_order() {
        let mut base = fields();
        base.models = BTreeSet::from(["a".to_string(), "b".to_string()]);
        let snapshot = DirtySnapshot::capture(&base);

        let mut live = base.clone();
        // Re-inserting in reverse is still the same set
        live.models = BTreeSet::from(["b".to_string(), "a".to_string()]);
        assert!(!snapshot.is_dirty(&live));

        live.models.insert("c".to_string());
        assert!(snapshot.is_dirty(&live));
    }

    #[test]
    fn test_fingerprint_change_marks_dirty() {
        let snapshot = DirtySnapshot::capture(&fields());
        let mut live = fields();
        live.endpoint_fingerprint = Fingerprint::join(["POST", "HTTPS", "h", "q2", ""]);
        assert!(snapshot.is_dirty(&live));
    }
}
