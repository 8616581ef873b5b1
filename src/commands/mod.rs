//! Command implementations.
//!
//! - [`analyze`] - Parse access logs and print traffic, visitor, crawler,
//!   browser and operating system statistics per file

pub mod analyze;
