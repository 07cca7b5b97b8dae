//! Endpoint configuration fingerprinting.
//!
//! A fingerprint is a normalized identity string over every field that
//! affects how an endpoint is reached. Two configurations are equivalent
//! iff their fingerprints are equal; the verification state machine is
//! addressed by fingerprint, not by edit count.

use serde::{Deserialize, Serialize};

/// Field delimiter. None of the legal field values can contain it: the
/// endpoint validator rejects `|` in hosts and paths, and the bearer
/// charset is base64url.
const DELIMITER: &str = "|";

/// Normalized identity of an endpoint configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Join already-normalized field values into a fingerprint.
    ///
    /// Callers are expected to trim fields and upper-case enumerated ones
    /// before joining; the domain config types do exactly that.
    pub fn join<'a, I>(fields: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self(fields.into_iter().collect::<Vec<_>>().join(DELIMITER))
    }

    /// The underlying identity string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_is_order_sensitive() {
        let a = Fingerprint::join(["GET", "HTTPS", "host", "q", ""]);
        let b = Fingerprint::join(["HTTPS", "GET", "host", "q", ""]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_join_is_stable() {
        let a = Fingerprint::join(["POST", "HTTP", "api.example.com", "q", "a.b.c"]);
        let b = Fingerprint::join(["POST", "HTTP", "api.example.com", "q", "a.b.c"]);
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "POST|HTTP|api.example.com|q|a.b.c");
    }

    #[test]
    fn test_single_field_changes_identity() {
        let base = Fingerprint::join(["POST", "HTTPS", "host", "q", "a.b.c"]);
        let bearer_only = Fingerprint::join(["POST", "HTTPS", "host", "q", "a.b.d"]);
        assert_ne!(base, bearer_only);
    }
}
