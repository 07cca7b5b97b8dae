//! Agent registry domain types.
//!
//! Agents reach their remote implementation through a discovery endpoint:
//! method + protocol + `host[:port][/path]` + query parameter, optionally
//! authorized with a bearer token. The token lives in the security block of
//! the persisted metadata but participates in the endpoint fingerprint.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::model::ModelRef;
use crate::endpoint::{Fingerprint, normalize_bearer_token};

/// Default version offered when creating an agent.
pub const DEFAULT_AGENT_VERSION: &str = "1.0";

/// HTTP method for the discovery call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    #[default]
    Post,
    Put,
}

impl HttpMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            other => Err(format!("unsupported discovery method: {other}")),
        }
    }
}

/// Protocol for the discovery call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Protocol {
    Http,
    #[default]
    Https,
}

impl Protocol {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Http => "HTTP",
            Self::Https => "HTTPS",
        }
    }
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Protocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "HTTP" => Ok(Self::Http),
            "HTTPS" => Ok(Self::Https),
            other => Err(format!("unsupported discovery protocol: {other}")),
        }
    }
}

/// Discovery endpoint configuration as persisted in agent metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiscoveryConfig {
    pub method: HttpMethod,
    pub protocol: Protocol,
    pub endpoint: String,
    pub query_param: String,
}

impl DiscoveryConfig {
    /// Fingerprint over every endpoint-affecting field.
    ///
    /// The bearer token is passed separately because it is persisted in the
    /// security block, not the discovery block, yet still forces
    /// re-verification when it changes.
    pub fn fingerprint_with(&self, bearer_token: &str) -> Fingerprint {
        Fingerprint::join([
            self.method.as_str(),
            self.protocol.as_str(),
            self.endpoint.trim(),
            self.query_param.trim(),
            normalize_bearer_token(bearer_token),
        ])
    }
}

/// Security block of agent metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SecurityConfig {
    /// Normalized bearer token; omitted entirely when empty so the registry
    /// never sends an Authorization header for token-less agents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bearer_token: Option<String>,
}

/// Reference to a selected MCP tool in agent metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolRef {
    pub mcp_server_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mcp_server_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mcp_server_version: Option<String>,
    pub tool_name: String,
}

/// Identity of a selected tool: server plus tool name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ToolKey {
    pub server_id: String,
    pub tool_name: String,
}

impl ToolKey {
    pub fn new(server_id: impl Into<String>, tool_name: impl Into<String>) -> Self {
        Self {
            server_id: server_id.into(),
            tool_name: tool_name.into(),
        }
    }
}

impl std::fmt::Display for ToolKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}::{}", self.server_id, self.tool_name)
    }
}

impl std::str::FromStr for ToolKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once("::") {
            Some((server, tool)) if !server.is_empty() && !tool.is_empty() => {
                Ok(Self::new(server, tool))
            }
            _ => Err(format!("expected <server-id>::<tool-name>, got: {s}")),
        }
    }
}

impl From<&ToolRef> for ToolKey {
    fn from(tool: &ToolRef) -> Self {
        Self::new(tool.mcp_server_id.trim(), tool.tool_name.trim())
    }
}

/// Agent metadata blob.
///
/// Unknown keys from older snapshots are carried through untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentMetadata {
    pub llms: Vec<ModelRef>,
    pub discovery: DiscoveryConfig,
    pub security: SecurityConfig,
    pub tools: Vec<ToolRef>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// An agent registered in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub agent_id: Uuid,
    pub name: String,
    pub description: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_repo_url: Option<String>,
    #[serde(default)]
    pub metadata: AgentMetadata,
}

/// Payload for creating or updating an agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentPayload {
    pub name: String,
    pub description: String,
    pub version: String,
    /// Empty string when unset; the registry stores it as-is.
    pub github_repo_url: String,
    pub metadata: AgentMetadata,
}

/// The fixed version option list: 1.0 through 9.9, then 10.0.
pub fn version_options() -> Vec<String> {
    let mut out = Vec::new();
    for major in 1..=10u8 {
        for minor in 0..=9u8 {
            if major == 10 && minor > 0 {
                break;
            }
            out.push(format!("{major}.{minor}"));
        }
    }
    out
}

/// Whether a version string is one of the offered options.
pub fn is_valid_agent_version(version: &str) -> bool {
    let v = version.trim();
    version_options().iter().any(|option| option == v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_options_range() {
        let options = version_options();
        assert_eq!(options.len(), 91);
        assert_eq!(options.first().map(String::as_str), Some("1.0"));
        assert_eq!(options.last().map(String::as_str), Some("10.0"));
        assert!(options.contains(&"9.9".to_string()));
        assert!(!options.contains(&"10.1".to_string()));
    }

    #[test]
    fn test_agent_version_validation() {
        assert!(is_valid_agent_version("1.0"));
        assert!(is_valid_agent_version(" 10.0 "));
        assert!(!is_valid_agent_version("0.9"));
        assert!(!is_valid_agent_version("10.1"));
        assert!(!is_valid_agent_version(""));
    }

    #[test]
    fn test_fingerprint_normalizes_fields() {
        let config = DiscoveryConfig {
            method: HttpMethod::Post,
            protocol: Protocol::Https,
            endpoint: "  api.example.com/v1  ".to_string(),
            query_param: " q ".to_string(),
        };

        let with_prefix = config.fingerprint_with("Bearer abc.def.ghi");
        let without_prefix = config.fingerprint_with("abc.def.ghi");
        assert_eq!(with_prefix, without_prefix);
        assert_eq!(with_prefix.as_str(), "POST|HTTPS|api.example.com/v1|q|abc.def.ghi");
    }

    #[test]
    fn test_fingerprint_sensitive_to_every_field() {
        let base = DiscoveryConfig {
            endpoint: "api.example.com".to_string(),
            query_param: "q".to_string(),
            ..DiscoveryConfig::default()
        };
        let fp = base.fingerprint_with("");

        let method_changed = DiscoveryConfig {
            method: HttpMethod::Get,
            ..base.clone()
        };
        assert_ne!(fp, method_changed.fingerprint_with(""));

        let protocol_changed = DiscoveryConfig {
            protocol: Protocol::Http,
            ..base.clone()
        };
        assert_ne!(fp, protocol_changed.fingerprint_with(""));

        let query_changed = DiscoveryConfig {
            query_param: "query".to_string(),
            ..base.clone()
        };
        assert_ne!(fp, query_changed.fingerprint_with(""));

        assert_ne!(fp, base.fingerprint_with("a.b.c"));
    }

    #[test]
    fn test_tool_key_round_trip() {
        let key: ToolKey = "srv-1::search".parse().unwrap();
        assert_eq!(key, ToolKey::new("srv-1", "search"));
        assert_eq!(key.to_string(), "srv-1::search");
        assert!("srv-only".parse::<ToolKey>().is_err());
        assert!("::tool".parse::<ToolKey>().is_err());
    }

    #[test]
    fn test_metadata_preserves_unknown_keys() {
        let json = serde_json::json!({
            "llms": [],
            "discovery": {"method": "GET", "protocol": "HTTP", "endpoint": "h", "queryParam": "q"},
            "security": {},
            "tools": [],
            "ownerTeam": "platform"
        });
        let metadata: AgentMetadata = serde_json::from_value(json).unwrap();
        assert_eq!(metadata.discovery.method, HttpMethod::Get);
        assert_eq!(metadata.extra.get("ownerTeam").and_then(|v| v.as_str()), Some("platform"));

        let back = serde_json::to_value(&metadata).unwrap();
        assert_eq!(back.get("ownerTeam").and_then(|v| v.as_str()), Some("platform"));
    }
}
