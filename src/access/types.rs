//! Data structures representing parsed access log entries.
//!
//! An entry is built once from a raw line and never modified afterwards; the
//! agent classification is derived from the agent string at construction.

use super::agent::AgentClassification;
use chrono::{DateTime, FixedOffset};
use std::fmt;

/// HTTP request method from the request line.
///
/// Tokens that are not a known method become `Unknown` instead of failing the
/// whole entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Head,
    Options,
    Patch,
    Trace,
    Connect,
    Unknown,
}

impl HttpMethod {
    /// Map a request-line token to a method. Matching is exact, so `get`
    /// is `Unknown`.
    pub fn from_token(token: &str) -> Self {
        match token {
            "GET" => Self::Get,
            "POST" => Self::Post,
            "PUT" => Self::Put,
            "DELETE" => Self::Delete,
            "HEAD" => Self::Head,
            "OPTIONS" => Self::Options,
            "PATCH" => Self::Patch,
            "TRACE" => Self::Trace,
            "CONNECT" => Self::Connect,
            _ => Self::Unknown,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
            Self::Patch => "PATCH",
            Self::Trace => "TRACE",
            Self::Connect => "CONNECT",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One access log line in structured form.
///
/// Every field has a fallback value, so an entry exists for any line that
/// passed the length guard:
///
/// - `client_address`: `"Unknown"` without a leading dotted quad
/// - `timestamp`: the caller's fallback time when the bracketed time is
///   missing or malformed
/// - `path`, `referer`, `agent_string`: empty string
/// - `status_code`, `response_size`: 0
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub(super) client_address: String,
    pub(super) timestamp: DateTime<FixedOffset>,
    pub(super) method: HttpMethod,
    pub(super) path: String,
    pub(super) status_code: u16,
    pub(super) response_size: u64,
    pub(super) referer: String,
    pub(super) agent_string: String,
    pub(super) agent: AgentClassification,
}

impl LogEntry {
    pub fn client_address(&self) -> &str {
        &self.client_address
    }

    pub const fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub const fn status_code(&self) -> u16 {
        self.status_code
    }

    pub const fn response_size(&self) -> u64 {
        self.response_size
    }

    pub fn referer(&self) -> &str {
        &self.referer
    }

    pub fn agent_string(&self) -> &str {
        &self.agent_string
    }

    pub const fn agent(&self) -> &AgentClassification {
        &self.agent
    }

    /// True for 4xx and 5xx responses.
    pub const fn is_error(&self) -> bool {
        matches!(self.status_code, 400..=599)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_from_token() {
        assert_eq!(HttpMethod::from_token("GET"), HttpMethod::Get);
        assert_eq!(HttpMethod::from_token("DELETE"), HttpMethod::Delete);
        assert_eq!(HttpMethod::from_token("PROPFIND"), HttpMethod::Unknown);
        assert_eq!(HttpMethod::from_token("get"), HttpMethod::Unknown);
        assert_eq!(HttpMethod::from_token(""), HttpMethod::Unknown);
    }

    #[test]
    fn test_method_display() {
        assert_eq!(HttpMethod::Options.to_string(), "OPTIONS");
        assert_eq!(HttpMethod::Unknown.to_string(), "UNKNOWN");
    }
}
