//! Access log parsing and agent classification.
//!
//! - [`types`] - [`LogEntry`](types::LogEntry) and [`HttpMethod`](types::HttpMethod)
//! - [`parser`] - field-by-field extraction from a raw line
//! - [`agent`] - browser, operating system and crawler detection

pub mod agent;
pub mod parser;
pub mod types;

pub use agent::{AgentClassification, BotKind, BrowserFamily, OsFamily};
pub use types::{HttpMethod, LogEntry};
