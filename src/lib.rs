//! # Access Log Tools
//!
//! Command-line tools for analyzing web-server access logs in the combined
//! log format, with transparent support for compressed files.
//!
//! ## Overview
//!
//! Every line is parsed into a [`LogEntry`](access::LogEntry) by a tolerant,
//! field-by-field parser and folded into a per-file
//! [`Statistics`](stats::Statistics) aggregator. Nothing but the aggregated
//! state is kept, so memory stays flat regardless of file size.
//!
//! ## Architecture
//!
//! - [`access`] - Line parsing, HTTP method, browser/OS/crawler classification
//! - [`stats`] - Running statistics and the final per-file report
//! - [`commands`] - The `analyze` command
//! - [`utils`] - File reading, the processing loop, progress, formatting, logging
//!
//! ## Example Usage
//!
//! ```bash
//! # Analyze a log (plain, .gz or .zst)
//! access-log analyze /var/log/nginx/access.log
//!
//! # Several logs, each with its own report, plus JSON export
//! access-log analyze access.log access.log.1.gz --output reports.json
//!
//! # Prompt for paths interactively
//! access-log analyze
//! ```
//!
//! ## Library Usage
//!
//! ```
//! use access_log_tools::access::{BrowserFamily, LogEntry};
//! use access_log_tools::stats::Statistics;
//!
//! let line = r#"10.0.0.1 - - [10/Oct/2023:13:55:36 +0000] "GET /index.html HTTP/1.1" 200 512 "-" "Mozilla/5.0 (Windows NT 10.0) Chrome/118.0""#;
//! let entry = LogEntry::parse(line);
//! assert_eq!(entry.agent().browser(), BrowserFamily::Chrome);
//!
//! let mut stats = Statistics::new();
//! stats.add_entry(&entry);
//! assert_eq!(stats.total_traffic(), 512);
//! ```

pub mod access;
pub mod commands;
pub mod stats;
pub mod utils;
