//! Tolerant access log line parser.
//!
//! Lines follow the combined log format:
//!
//! ```text
//! 10.0.0.1 - - [10/Oct/2023:13:55:36 +0000] "GET /index.html HTTP/1.1" 200 512 "-" "Mozilla/5.0 ..."
//! ```
//!
//! Each field has its own pattern and its own fallback, so a damaged request
//! line does not cost us the status code or the agent string. Parsing never
//! fails.

use super::agent::AgentClassification;
use super::types::{HttpMethod, LogEntry};
use chrono::{DateTime, FixedOffset, Local};
use once_cell::sync::Lazy;
use regex::Regex;

/// Timestamp layout inside the square brackets.
pub const TIMESTAMP_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";

/// Placeholder address for lines without a leading IPv4 literal.
pub const UNKNOWN_ADDRESS: &str = "Unknown";

static ADDRESS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+\.\d+\.\d+\.\d+)").expect("valid address regex"));
static TIMESTAMP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(.*?)\]").expect("valid timestamp regex"));
static METHOD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""([A-Z]+)"#).expect("valid method regex"));
static PATH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""[A-Z]+\s+([^\s?]+)"#).expect("valid path regex"));
static STATUS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""\s+(\d{3})\s+"#).expect("valid status regex"));
static SIZE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\s+(\d+)\s+""#).expect("valid size regex"));
static TRAILING_QUOTED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""([^"]*)"\s+"([^"]*)"$"#).expect("valid quoted fields regex"));

impl LogEntry {
    /// Parse a line, using the current local time when the line carries no
    /// usable timestamp.
    ///
    /// The result depends on the wall clock for such lines; use
    /// [`LogEntry::parse_with_fallback`] when determinism matters.
    pub fn parse(line: &str) -> Self {
        Self::parse_with_fallback(line, Local::now().fixed_offset())
    }

    /// Parse a line, substituting `fallback` for a missing or malformed
    /// timestamp.
    pub fn parse_with_fallback(line: &str, fallback: DateTime<FixedOffset>) -> Self {
        let (referer, agent_string) = parse_trailing_fields(line);
        let agent = AgentClassification::classify(&agent_string);

        Self {
            client_address: parse_client_address(line),
            timestamp: parse_timestamp(line).unwrap_or(fallback),
            method: parse_method(line),
            path: parse_path(line),
            status_code: parse_status_code(line),
            response_size: parse_response_size(line),
            referer,
            agent_string,
            agent,
        }
    }
}

fn first_group<'a>(re: &Regex, line: &'a str) -> Option<&'a str> {
    re.captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

pub fn parse_client_address(line: &str) -> String {
    first_group(&ADDRESS_RE, line)
        .unwrap_or(UNKNOWN_ADDRESS)
        .to_string()
}

/// Timestamp from the first bracketed group, or `None` if absent or not in
/// [`TIMESTAMP_FORMAT`].
pub fn parse_timestamp(line: &str) -> Option<DateTime<FixedOffset>> {
    let raw = first_group(&TIMESTAMP_RE, line)?;
    DateTime::parse_from_str(raw, TIMESTAMP_FORMAT).ok()
}

pub fn parse_method(line: &str) -> HttpMethod {
    first_group(&METHOD_RE, line).map_or(HttpMethod::Unknown, HttpMethod::from_token)
}

/// Request path without its query string.
pub fn parse_path(line: &str) -> String {
    first_group(&PATH_RE, line).unwrap_or_default().to_string()
}

pub fn parse_status_code(line: &str) -> u16 {
    first_group(&STATUS_RE, line)
        .and_then(|code| code.parse().ok())
        .unwrap_or(0)
}

pub fn parse_response_size(line: &str) -> u64 {
    first_group(&SIZE_RE, line)
        .and_then(|size| size.parse().ok())
        .unwrap_or(0)
}

/// Referer and agent string, the last two quoted fields of the line.
pub fn parse_trailing_fields(line: &str) -> (String, String) {
    let Some(caps) = TRAILING_QUOTED_RE.captures(line) else {
        return (String::new(), String::new());
    };
    let field = |idx: usize| {
        caps.get(idx)
            .map(|m| normalize_dash(m.as_str()))
            .unwrap_or_default()
    };
    (field(1), field(2))
}

fn normalize_dash(value: &str) -> String {
    if value == "-" {
        String::new()
    } else {
        value.to_string()
    }
}
