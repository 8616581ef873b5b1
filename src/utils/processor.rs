//! Log file processing loop.
//!
//! Reads one access log line by line, applies the line-length guard, parses
//! every line into a [`LogEntry`] and folds it into a fresh [`Statistics`].
//! A line that is too long, or a read failure, aborts the file. A line that is
//! not valid UTF-8 is logged and skipped. Every other line, blank ones
//! included, becomes an entry.

use crate::access::LogEntry;
use crate::stats::Statistics;
use crate::utils::progress::ProgressBar;
use crate::utils::reader::{is_compressed, open_file};
use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset};
use std::borrow::Cow;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// Longest accepted line, in characters.
pub const DEFAULT_MAX_LINE_LENGTH: usize = 1024;

/// Conditions that abort processing of the current file.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error(
        "line {line_number} exceeds the maximum length of {max_length} characters (length: {length} characters)"
    )]
    LineTooLong {
        /// 1-based line number
        line_number: usize,
        length: usize,
        max_length: usize,
    },

    #[error("failed to read line {line_number}")]
    Io {
        line_number: usize,
        #[source]
        source: std::io::Error,
    },
}

/// Statistics collected during log processing
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProcessStats {
    /// Lines read, including skipped ones
    pub total_lines: usize,
    /// Lines parsed and added to the statistics
    pub parsed_entries: usize,
    /// Lines that are not valid UTF-8
    pub skipped_lines: usize,
}

impl ProcessStats {
    /// Print a summary of processing statistics
    pub fn report(&self) {
        eprintln!("\nProcessing Summary:");
        eprintln!("  Total lines: {}", self.total_lines);
        eprintln!("  Parsed entries: {}", self.parsed_entries);
        if self.skipped_lines > 0 {
            let skip_percentage = (self.skipped_lines as f64 / self.total_lines as f64) * 100.0;
            eprintln!(
                "  Skipped lines: {} ({:.2}%)",
                self.skipped_lines, skip_percentage
            );
        }
    }
}

/// Everything produced by processing one file.
#[derive(Debug, Clone)]
pub struct FileAnalysis {
    pub statistics: Statistics,
    pub process_stats: ProcessStats,
}

/// Processes access logs into [`Statistics`], one file at a time.
#[derive(Debug, Clone)]
pub struct LogProcessor {
    max_line_length: usize,
    show_progress: bool,
    fallback_time: Option<DateTime<FixedOffset>>,
}

impl Default for LogProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl LogProcessor {
    pub const fn new() -> Self {
        Self {
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            show_progress: false,
            fallback_time: None,
        }
    }

    #[must_use]
    pub const fn max_line_length(mut self, max: usize) -> Self {
        self.max_line_length = max;
        self
    }

    #[must_use]
    pub const fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Use a fixed time instead of the wall clock for lines without a
    /// timestamp.
    #[must_use]
    pub const fn fallback_time(mut self, time: DateTime<FixedOffset>) -> Self {
        self.fallback_time = Some(time);
        self
    }

    fn parse_line(&self, line: &str) -> LogEntry {
        match self.fallback_time {
            Some(fallback) => LogEntry::parse_with_fallback(line, fallback),
            None => LogEntry::parse(line),
        }
    }

    /// Open and process a single file (plain, `.gz` or `.zst`).
    pub fn process_file(&self, path: impl AsRef<Path>) -> Result<FileAnalysis> {
        let path = path.as_ref();
        // Decompressed byte counts can't be measured against the on-disk size
        let file_size = if is_compressed(path) {
            None
        } else {
            std::fs::metadata(path).ok().map(|m| m.len() as usize)
        };

        let file = open_file(path)?;
        let reader = BufReader::new(file);

        let progress = self.show_progress.then(|| match file_size {
            Some(size) => ProgressBar::new(size, "Processing"),
            None => ProgressBar::new_spinner("Processing"),
        });

        info!(path = %path.display(), "processing access log");

        let mut statistics = Statistics::new();
        let result = self.run(reader, &mut statistics, progress.as_ref(), file_size);

        if let Some(progress) = &progress {
            progress.finish();
        }

        let process_stats =
            result.with_context(|| format!("Failed to process {}", path.display()))?;

        info!(
            path = %path.display(),
            lines = process_stats.total_lines,
            entries = process_stats.parsed_entries,
            skipped = process_stats.skipped_lines,
            "finished access log"
        );

        Ok(FileAnalysis {
            statistics,
            process_stats,
        })
    }

    /// Process lines from an already-open reader into `statistics`.
    ///
    /// On error, `statistics` holds the entries accepted before the failing
    /// line.
    pub fn process_reader<R: BufRead>(
        &self,
        reader: R,
        statistics: &mut Statistics,
    ) -> Result<ProcessStats, ProcessError> {
        self.run(reader, statistics, None, None)
    }

    fn run<R: BufRead>(
        &self,
        mut reader: R,
        statistics: &mut Statistics,
        progress: Option<&ProgressBar>,
        file_size: Option<usize>,
    ) -> Result<ProcessStats, ProcessError> {
        let mut stats = ProcessStats::default();
        let mut buf = Vec::with_capacity(self.max_line_length + 2);
        let mut bytes_read = 0;

        loop {
            buf.clear();
            let line_number = stats.total_lines + 1;
            let read = reader
                .read_until(b'\n', &mut buf)
                .map_err(|source| ProcessError::Io {
                    line_number,
                    source,
                })?;
            if read == 0 {
                break;
            }
            stats.total_lines = line_number;
            bytes_read += read;

            // Update progress every 10k lines
            if let Some(progress) = progress {
                if line_number % 10_000 == 0 {
                    match file_size {
                        Some(size) => progress.update(bytes_read.min(size)),
                        None => progress.update(line_number),
                    }
                }
            }

            let line = String::from_utf8_lossy(trim_line_ending(&buf));
            let length = line.chars().count();
            if length > self.max_line_length {
                return Err(ProcessError::LineTooLong {
                    line_number,
                    length,
                    max_length: self.max_line_length,
                });
            }

            if matches!(line, Cow::Owned(_)) {
                warn!(line = line_number, "skipping line that is not valid UTF-8");
                stats.skipped_lines += 1;
                continue;
            }

            let entry = self.parse_line(&line);
            statistics.add_entry(&entry);
            stats.parsed_entries += 1;
        }

        Ok(stats)
    }
}

fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
