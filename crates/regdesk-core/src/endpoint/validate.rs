//! Syntax validators for endpoint form fields.
//!
//! Pure, total functions: malformed input yields `false`, never an error.
//! Scheme and query string are supplied through separate form fields, so the
//! endpoint string itself must stay free of `://`, `?`, `#` and whitespace.

/// Maximum total length of a hostname.
const MAX_HOST_LEN: usize = 253;

/// Maximum length of a single DNS label.
const MAX_LABEL_LEN: usize = 63;

/// Validate a `host[:port][/path]` endpoint string.
///
/// `localhost` is accepted unconditionally (case-insensitive); any other
/// host must be an IPv4 literal or a sequence of DNS-conformant labels.
/// A port, when present, must be 1-5 digits in `[1, 65535]`.
pub fn is_valid_endpoint(raw: &str) -> bool {
    let raw = raw.trim();
    if raw.is_empty() {
        return false;
    }

    if raw.contains("://")
        || raw.contains('?')
        || raw.contains('#')
        || raw.chars().any(char::is_whitespace)
    {
        return false;
    }

    let (host_port, path) = match raw.find('/') {
        Some(idx) => (&raw[..idx], &raw[idx..]),
        None => (raw, ""),
    };

    if host_port.is_empty() {
        return false;
    }

    let colon_count = host_port.bytes().filter(|b| *b == b':').count();
    if colon_count > 1 {
        return false;
    }

    let host = if colon_count == 1 {
        let (host, port) = host_port
            .split_once(':')
            .unwrap_or((host_port, ""));
        if !is_valid_port(port) {
            return false;
        }
        host
    } else {
        host_port
    };

    if host.is_empty() || host.len() > MAX_HOST_LEN {
        return false;
    }

    if !host.eq_ignore_ascii_case("localhost")
        && !is_ipv4_literal(host)
        && !host.split('.').all(is_valid_dns_label)
    {
        return false;
    }

    path.is_empty() || is_valid_path(path)
}

/// Port: 1-5 decimal digits, numeric value in `[1, 65535]`.
fn is_valid_port(port: &str) -> bool {
    if port.is_empty() || port.len() > 5 || !port.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    matches!(port.parse::<u32>(), Ok(p) if (1..=65_535).contains(&p))
}

/// Full IPv4 literal: four octets, 0-255, no leading zeros.
fn is_ipv4_literal(host: &str) -> bool {
    let octets: Vec<&str> = host.split('.').collect();
    octets.len() == 4 && octets.into_iter().all(is_valid_octet)
}

fn is_valid_octet(octet: &str) -> bool {
    if octet.is_empty() || octet.len() > 3 || !octet.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    // "0" is fine, "00" and "012" are not
    if octet.len() > 1 && octet.starts_with('0') {
        return false;
    }
    matches!(octet.parse::<u16>(), Ok(v) if v <= 255)
}

/// DNS label: alphanumeric, internal hyphens only, 1-63 chars.
fn is_valid_dns_label(label: &str) -> bool {
    let bytes = label.as_bytes();
    if bytes.is_empty() || bytes.len() > MAX_LABEL_LEN {
        return false;
    }
    if !bytes[0].is_ascii_alphanumeric() || !bytes[bytes.len() - 1].is_ascii_alphanumeric() {
        return false;
    }
    bytes
        .iter()
        .all(|b| b.is_ascii_alphanumeric() || *b == b'-')
}

/// Path charset after the leading `/`: a conservative printable-ASCII set.
fn is_valid_path(path: &str) -> bool {
    if !path.starts_with('/') {
        return false;
    }
    path.bytes().all(|b| {
        b.is_ascii_alphanumeric()
            || matches!(
                b,
                b'-' | b'.'
                    | b'_'
                    | b'~'
                    | b'!'
                    | b'$'
                    | b'&'
                    | b'\''
                    | b'('
                    | b')'
                    | b'*'
                    | b'+'
                    | b','
                    | b';'
                    | b'='
                    | b':'
                    | b'@'
                    | b'%'
                    | b'/'
            )
    })
}

/// Strip an optional case-insensitive `"Bearer "` prefix and surrounding
/// whitespace from a pasted token.
pub fn normalize_bearer_token(raw: &str) -> &str {
    let v = raw.trim();
    if v.get(..7).is_some_and(|p| p.eq_ignore_ascii_case("bearer ")) {
        v[7..].trim()
    } else {
        v
    }
}

/// Validate a JWT-shaped bearer token: three non-empty dot-separated
/// base64url-charset segments. The field is optional, so empty input is
/// valid. Accepts input with or without a `"Bearer "` prefix.
///
/// This is a structural check only; no signature is verified.
pub fn is_valid_bearer_token(raw: &str) -> bool {
    let token = normalize_bearer_token(raw);
    if token.is_empty() {
        return true;
    }

    let segments: Vec<&str> = token.split('.').collect();
    segments.len() == 3
        && segments.iter().all(|s| {
            !s.is_empty()
                && s.bytes()
                    .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
        })
}

/// Validate a GitHub repository URL.
///
/// Canonical rule: scheme optional (https assumed) but must be http/https
/// when present, host `github.com` or `www.github.com`, path at least
/// `owner/repo` with the owner 1-39 alphanumeric-or-hyphen chars (no edge
/// hyphens) and the repo 1-100 chars of `[A-Za-z0-9._-]`. The field is
/// optional, so empty input is valid.
pub fn is_valid_github_repo_url(raw: &str) -> bool {
    let v = raw.trim();
    if v.is_empty() {
        return true;
    }

    let rest = if let Some(idx) = v.find("://") {
        let scheme = &v[..idx];
        if !scheme.eq_ignore_ascii_case("http") && !scheme.eq_ignore_ascii_case("https") {
            return false;
        }
        &v[idx + 3..]
    } else {
        v
    };

    // Drop query/fragment before inspecting the path
    let rest = rest
        .split(['?', '#'])
        .next()
        .unwrap_or_default();

    let (host, path) = match rest.find('/') {
        Some(idx) => (&rest[..idx], &rest[idx + 1..]),
        None => (rest, ""),
    };

    if !host.eq_ignore_ascii_case("github.com") && !host.eq_ignore_ascii_case("www.github.com") {
        return false;
    }

    let mut segments = path.split('/').filter(|s| !s.is_empty());
    let Some(owner) = segments.next() else {
        return false;
    };
    let Some(repo) = segments.next() else {
        return false;
    };

    is_valid_github_owner(owner) && is_valid_github_repo(repo)
}

fn is_valid_github_owner(owner: &str) -> bool {
    (1..=39).contains(&owner.len())
        && !owner.starts_with('-')
        && !owner.ends_with('-')
        && owner
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

fn is_valid_github_repo(repo: &str) -> bool {
    (1..=100).contains(&repo.len())
        && repo
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'-'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_plain_host() {
        assert!(is_valid_endpoint("api.example.com"));
        assert!(is_valid_endpoint("localhost"));
        assert!(is_valid_endpoint("LOCALHOST"));
        assert!(is_valid_endpoint("10.0.0.5"));
    }

    #[test]
    fn test_endpoint_host_with_path() {
        assert!(is_valid_endpoint("api.example.com/v1/agents"));
        assert!(is_valid_endpoint("api.example.com:8080/v1/api"));
        assert!(is_valid_endpoint("localhost:8080/v1/api"));
        assert!(is_valid_endpoint("10.0.0.5:8080/v1/api"));
    }

    #[test]
    fn test_endpoint_rejects_scheme_query_fragment_whitespace() {
        assert!(!is_valid_endpoint("https://api.example.com"));
        assert!(!is_valid_endpoint("api.example.com/v1?x=1"));
        assert!(!is_valid_endpoint("api.example.com/v1#frag"));
        assert!(!is_valid_endpoint("api.example .com"));
        assert!(!is_valid_endpoint(""));
        assert!(!is_valid_endpoint("   "));
    }

    #[test]
    fn test_endpoint_port_range() {
        assert!(is_valid_endpoint("api.example.com:1"));
        assert!(is_valid_endpoint("api.example.com:65535"));
        assert!(!is_valid_endpoint("api.example.com:0"));
        assert!(!is_valid_endpoint("api.example.com:99999"));
        assert!(!is_valid_endpoint("api.example.com:123456"));
        assert!(!is_valid_endpoint("api.example.com:"));
        assert!(!is_valid_endpoint("api.example.com:8a"));
    }

    #[test]
    fn test_endpoint_single_colon_only() {
        assert!(!is_valid_endpoint("api.example.com:80:90"));
        assert!(!is_valid_endpoint(":8080"));
    }

    #[test]
    fn test_endpoint_dns_labels() {
        assert!(is_valid_endpoint("my-service.internal"));
        assert!(!is_valid_endpoint("-bad.example.com"));
        assert!(!is_valid_endpoint("bad-.example.com"));
        assert!(!is_valid_endpoint("bad..example.com"));
        assert!(!is_valid_endpoint("bad_host.example.com"));
    }

    #[test]
    fn test_endpoint_ipv4_edge_cases() {
        assert!(is_valid_endpoint("255.255.255.255"));
        assert!(is_valid_endpoint("0.0.0.0"));
        // Not a valid IPv4 literal, and "256" is still a fine DNS label,
        // so this passes through the label grammar instead
        assert!(is_valid_endpoint("256.1.1.1"));
        assert!(!is_valid_endpoint("1.2.3.4.5:bad"));
    }

    #[test]
    fn test_endpoint_path_charset() {
        assert!(is_valid_endpoint("api.example.com/v1/a-b_c.d~e"));
        assert!(is_valid_endpoint("api.example.com/v1/agents:list"));
        assert!(!is_valid_endpoint("api.example.com/v1/\"x\""));
        assert!(!is_valid_endpoint("api.example.com/v1/<x>"));
    }

    #[test]
    fn test_bearer_token_optional() {
        assert!(is_valid_bearer_token(""));
        assert!(is_valid_bearer_token("   "));
    }

    #[test]
    fn test_bearer_token_three_segments() {
        assert!(is_valid_bearer_token("abc.def.ghi"));
        assert!(is_valid_bearer_token("a-b_c.DEF.123"));
        assert!(!is_valid_bearer_token("not-a-jwt"));
        assert!(!is_valid_bearer_token("a.b"));
        assert!(!is_valid_bearer_token("a.b.c.d"));
        assert!(!is_valid_bearer_token("a..c"));
        assert!(!is_valid_bearer_token("a.b!.c"));
    }

    #[test]
    fn test_bearer_prefix_stripped() {
        assert!(is_valid_bearer_token("Bearer abc.def.ghi"));
        assert!(is_valid_bearer_token("bearer abc.def.ghi"));
        assert!(is_valid_bearer_token("BEARER abc.def.ghi"));
        assert_eq!(normalize_bearer_token("Bearer abc.def.ghi"), "abc.def.ghi");
        assert_eq!(normalize_bearer_token("  bearer   abc.def.ghi  "), "abc.def.ghi");
        assert_eq!(normalize_bearer_token("abc.def.ghi"), "abc.def.ghi");
        // "Bearer" alone trims to a 6-char string, so no prefix to strip;
        // it reads as an ordinary (invalid) token
        assert_eq!(normalize_bearer_token("Bearer "), "Bearer");
        assert!(!is_valid_bearer_token("Bearer "));
    }

    #[test]
    fn test_github_url_optional() {
        assert!(is_valid_github_repo_url(""));
        assert!(is_valid_github_repo_url("   "));
    }

    #[test]
    fn test_github_url_accepted_forms() {
        assert!(is_valid_github_repo_url("https://github.com/org/repo"));
        assert!(is_valid_github_repo_url("http://github.com/org/repo"));
        assert!(is_valid_github_repo_url("https://www.github.com/org/repo"));
        assert!(is_valid_github_repo_url("github.com/org/repo"));
        assert!(is_valid_github_repo_url("https://github.com/org/repo.name-x"));
        assert!(is_valid_github_repo_url("https://github.com/org/repo/"));
        assert!(is_valid_github_repo_url("https://github.com/org/repo?tab=readme"));
    }

    #[test]
    fn test_github_url_rejected_forms() {
        assert!(!is_valid_github_repo_url("ftp://github.com/org/repo"));
        assert!(!is_valid_github_repo_url("https://gitlab.com/org/repo"));
        assert!(!is_valid_github_repo_url("https://github.com/org"));
        assert!(!is_valid_github_repo_url("https://github.com/-org/repo"));
        assert!(!is_valid_github_repo_url("https://github.com/org-/repo"));
        assert!(!is_valid_github_repo_url("https://github.com/o rg/repo"));
    }

    #[test]
    fn test_scenario_host_and_path() {
        // host=api.example.com, path=/v1/agents, no port
        assert!(is_valid_endpoint("api.example.com/v1/agents"));
    }

    #[test]
    fn test_scenario_port_out_of_range() {
        assert!(!is_valid_endpoint("api.example.com:99999"));
    }
}
