//! MCP server registry domain types.
//!
//! MCP servers are reached through a discovery URL. The form keeps the
//! scheme and the host/path remainder as separate fields; the full URL is
//! only assembled at the edges (test call, persisted payload).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::endpoint::Fingerprint;

/// URL scheme for a discovery URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scheme {
    #[serde(rename = "http://")]
    Http,
    #[default]
    #[serde(rename = "https://")]
    Https,
}

impl Scheme {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http://",
            Self::Https => "https://",
        }
    }
}

impl std::fmt::Display for Scheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Scheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_end_matches("://").to_ascii_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "https" => Ok(Self::Https),
            other => Err(format!("unsupported scheme: {other}")),
        }
    }
}

/// A discovery URL split into scheme and host/path remainder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerEndpoint {
    pub scheme: Scheme,
    /// Host and path, no scheme.
    pub rest: String,
}

impl ServerEndpoint {
    pub fn new(scheme: Scheme, rest: impl Into<String>) -> Self {
        Self {
            scheme,
            rest: rest.into(),
        }
    }

    /// Split a full URL; inputs without a scheme default to https.
    pub fn split(full: &str) -> Self {
        let v = full.trim();
        if let Some(rest) = strip_scheme_prefix(v, "https://") {
            Self::new(Scheme::Https, rest)
        } else if let Some(rest) = strip_scheme_prefix(v, "http://") {
            Self::new(Scheme::Http, rest)
        } else {
            Self::new(Scheme::Https, v)
        }
    }

    /// Host/path remainder with any pasted scheme stripped.
    pub fn rest_normalized(&self) -> &str {
        let rest = self.rest.trim();
        strip_scheme_prefix(rest, "https://")
            .or_else(|| strip_scheme_prefix(rest, "http://"))
            .unwrap_or(rest)
    }

    /// Assemble the full discovery URL. Empty when no host has been typed.
    pub fn full_url(&self) -> String {
        let rest = self.rest_normalized();
        if rest.is_empty() {
            String::new()
        } else {
            format!("{}{rest}", self.scheme)
        }
    }

    /// Fingerprint over the scheme and the normalized remainder.
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::join([self.scheme.as_str(), self.rest_normalized()])
    }
}

fn strip_scheme_prefix<'a>(value: &'a str, prefix: &str) -> Option<&'a str> {
    value
        .get(..prefix.len())
        .is_some_and(|p| p.eq_ignore_ascii_case(prefix))
        .then(|| &value[prefix.len()..])
}

/// Semantic version of a registered server, `major.minor.patch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SemVer {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Default for SemVer {
    fn default() -> Self {
        Self {
            major: 1,
            minor: 0,
            patch: 0,
        }
    }
}

impl SemVer {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse `x.y.z`; a bare `x.y` is tolerated with patch 0.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.trim().split('.');
        let major = parse_part(parts.next()?)?;
        let minor = parse_part(parts.next()?)?;
        let patch = match parts.next() {
            Some(p) => parse_part(p)?,
            None => 0,
        };
        if parts.next().is_some() {
            return None;
        }
        Some(Self::new(major, minor, patch))
    }

    /// Parse, falling back to `1.0.0` for malformed stored values.
    pub fn parse_or_default(raw: &str) -> Self {
        Self::parse(raw).unwrap_or_default()
    }
}

fn parse_part(part: &str) -> Option<u32> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

impl std::fmt::Display for SemVer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Registry-side status of an MCP server.
///
/// Anything the registry reports other than ACTIVE reads as inactive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", from = "String")]
pub enum ServerStatus {
    Active,
    #[default]
    Inactive,
}

impl From<String> for ServerStatus {
    fn from(raw: String) -> Self {
        if raw.trim().eq_ignore_ascii_case("active") {
            Self::Active
        } else {
            Self::Inactive
        }
    }
}

impl ServerStatus {
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Tool definition discovered from an MCP server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpToolDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON-Schema-shaped argument description, as emitted by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<serde_json::Value>,
}

/// Drop tool entries without a usable name before persisting.
pub fn normalize_tools(tools: &[McpToolDef]) -> Vec<McpToolDef> {
    tools
        .iter()
        .filter(|t| !t.name.trim().is_empty())
        .cloned()
        .collect()
}

/// An MCP server registered in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpServer {
    pub server_id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub version: String,
    pub discovery_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_url: Option<String>,
    #[serde(default)]
    pub status: ServerStatus,
    #[serde(default)]
    pub tools: Vec<McpToolDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_test_ok: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_test_ts: Option<DateTime<Utc>>,
}

/// Payload for creating or updating an MCP server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpServerPayload {
    pub name: String,
    pub description: String,
    pub version: String,
    pub discovery_url: String,
    pub repository_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<McpToolDef>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_test_ok: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_test_ts: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_detects_scheme() {
        let https = ServerEndpoint::split("https://api.example.com/mcp");
        assert_eq!(https.scheme, Scheme::Https);
        assert_eq!(https.rest, "api.example.com/mcp");

        let http = ServerEndpoint::split("HTTP://api.example.com/mcp");
        assert_eq!(http.scheme, Scheme::Http);

        let bare = ServerEndpoint::split("api.example.com/mcp");
        assert_eq!(bare.scheme, Scheme::Https);
        assert_eq!(bare.rest, "api.example.com/mcp");
    }

    #[test]
    fn test_full_url_strips_pasted_scheme() {
        let endpoint = ServerEndpoint::new(Scheme::Http, "https://api.example.com/mcp");
        assert_eq!(endpoint.full_url(), "http://api.example.com/mcp");

        let empty = ServerEndpoint::new(Scheme::Https, "   ");
        assert_eq!(empty.full_url(), "");
    }

    #[test]
    fn test_endpoint_fingerprint_tracks_scheme_and_rest() {
        let a = ServerEndpoint::new(Scheme::Https, "api.example.com/mcp");
        let b = ServerEndpoint::new(Scheme::Http, "api.example.com/mcp");
        let c = ServerEndpoint::new(Scheme::Https, "api.example.com/other");
        assert_ne!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
        assert_eq!(
            a.fingerprint(),
            ServerEndpoint::split("https://api.example.com/mcp").fingerprint()
        );
    }

    #[test]
    fn test_semver_parse() {
        assert_eq!(SemVer::parse("1.2.3"), Some(SemVer::new(1, 2, 3)));
        assert_eq!(SemVer::parse("1.2"), Some(SemVer::new(1, 2, 0)));
        assert_eq!(SemVer::parse(" 10.0.1 "), Some(SemVer::new(10, 0, 1)));
        assert_eq!(SemVer::parse("1"), None);
        assert_eq!(SemVer::parse("1.2.3.4"), None);
        assert_eq!(SemVer::parse("1.x.3"), None);
        assert_eq!(SemVer::parse("-1.2.3"), None);
        assert_eq!(SemVer::parse_or_default("garbage"), SemVer::default());
        assert_eq!(SemVer::new(2, 0, 1).to_string(), "2.0.1");
    }

    #[test]
    fn test_status_unknown_values_read_as_inactive() {
        let status: ServerStatus = serde_json::from_value(serde_json::json!("ACTIVE")).unwrap();
        assert!(status.is_active());

        let status: ServerStatus = serde_json::from_value(serde_json::json!("DRAINING")).unwrap();
        assert!(!status.is_active());
    }

    #[test]
    fn test_normalize_tools_drops_nameless() {
        let tools = vec![
            McpToolDef {
                name: "search".to_string(),
                description: None,
                arguments: None,
            },
            McpToolDef {
                name: "   ".to_string(),
                description: Some("ghost".to_string()),
                arguments: None,
            },
        ];
        let kept = normalize_tools(&tools);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name, "search");
    }
}
