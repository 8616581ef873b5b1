//! Utility functions and helpers.
//!
//! - [`processor`] - Line loop with the length guard, feeding [`crate::stats::Statistics`]
//! - [`reader`] - Smart file reader with automatic decompression
//! - [`progress`] - Progress bar for long files
//! - [`format`] - Number, byte and percentage formatting
//! - [`time`] - Timestamp formatting helpers
//! - [`logging`] - `tracing` subscriber setup
//!
//! # Examples
//!
//! ```no_run
//! use access_log_tools::utils::processor::LogProcessor;
//!
//! let analysis = LogProcessor::new().process_file("access.log.gz").unwrap();
//! println!("{} entries", analysis.statistics.entry_count());
//! ```

pub mod format;
pub mod logging;
pub mod processor;
pub mod progress;
pub mod reader;
pub mod time;
