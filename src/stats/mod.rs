//! Streaming aggregation of parsed entries.
//!
//! - [`statistics`] - the running [`Statistics`] aggregator
//! - [`report`] - immutable [`Report`] snapshot for printing and export

pub mod report;
pub mod statistics;

pub use report::{BotReport, Report};
pub use statistics::Statistics;
