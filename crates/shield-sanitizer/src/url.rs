//! URL Gatekeeper
//!
//! Accepts only URLs that cannot execute script or leave the web schemes:
//! relative paths and absolute `http`/`https` URLs. Everything else becomes
//! an empty string, which callers treat as "no URL".

use serde_json::Value;

/// Pseudo-protocols rejected before any parsing.
const BLOCKED_PREFIXES: &[&str] = &["javascript:", "data:"];

/// Prefixes of relative references, accepted as-is.
const RELATIVE_PREFIXES: &[&str] = &["/", "./", "../"];

/// Schemes an absolute URL may use.
const ALLOWED_SCHEMES: &[&str] = &["http", "https"];

/// Components of an absolute URL, as far as the gatekeeper cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUrl {
    /// Lowercased scheme
    pub scheme: String,
    /// Host, without userinfo or port
    pub host: String,
    /// Explicit port, if any
    pub port: Option<u16>,
}

/// Sanitize a URL.
///
/// Returns the trimmed URL when it is safe, an empty string otherwise.
///
/// ```rust
/// use shield_sanitizer::url::sanitize_url;
///
/// assert_eq!(sanitize_url("javascript:alert(1)"), "");
/// assert_eq!(sanitize_url("/dashboard"), "/dashboard");
/// assert_eq!(sanitize_url("https://example.com"), "https://example.com");
/// assert_eq!(sanitize_url("ftp://x"), "");
/// ```
pub fn sanitize_url(url: &str) -> String {
    let trimmed = url.trim();
    let lowered = trimmed.to_ascii_lowercase();

    if BLOCKED_PREFIXES.iter().any(|prefix| lowered.starts_with(prefix)) {
        return String::new();
    }

    if RELATIVE_PREFIXES.iter().any(|prefix| trimmed.starts_with(prefix)) {
        return trimmed.to_string();
    }

    match parse_absolute(trimmed) {
        Some(parsed) if ALLOWED_SCHEMES.contains(&parsed.scheme.as_str()) => trimmed.to_string(),
        _ => String::new(),
    }
}

/// Sanitize a JSON value holding a URL. Non-strings yield an empty string.
pub fn sanitize_url_value(value: &Value) -> String {
    match value {
        Value::String(s) => sanitize_url(s),
        _ => String::new(),
    }
}

/// Parse an absolute URL of the form `scheme://[userinfo@]host[:port][/path][?query][#fragment]`.
///
/// Returns `None` when there is no valid scheme, no `//` authority, an empty
/// host, whitespace or control characters in the authority, or a port that
/// is not a number in `0..=65535`.
pub fn parse_absolute(input: &str) -> Option<ParsedUrl> {
    let (scheme, rest) = input.split_once(':')?;
    if !is_valid_scheme(scheme) {
        return None;
    }

    let rest = rest.strip_prefix("//")?;
    let authority_end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let authority = &rest[..authority_end];

    if authority.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return None;
    }

    // userinfo may itself contain ':'
    let host_port = match authority.rfind('@') {
        Some(at) => &authority[at + 1..],
        None => authority,
    };

    let (host, port) = split_host_port(host_port)?;
    if host.is_empty() {
        return None;
    }

    Some(ParsedUrl {
        scheme: scheme.to_ascii_lowercase(),
        host: host.to_string(),
        port,
    })
}

fn is_valid_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        _ => false,
    }
}

fn split_host_port(host_port: &str) -> Option<(&str, Option<u16>)> {
    // IPv6 literal: [::1]:8080
    if let Some(rest) = host_port.strip_prefix('[') {
        let close = rest.find(']')?;
        let host = &host_port[..close + 2];
        return match &rest[close + 1..] {
            "" => Some((host, None)),
            tail => Some((host, Some(parse_port(tail.strip_prefix(':')?)?))),
        };
    }

    match host_port.rsplit_once(':') {
        Some((host, "")) => Some((host, None)),
        Some((host, port)) => Some((host, Some(parse_port(port)?))),
        None => Some((host_port, None)),
    }
}

fn parse_port(port: &str) -> Option<u16> {
    if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    port.parse().ok()
}
