//! Access log analysis command.
//!
//! Each file is analyzed on its own, with a fresh [`Statistics`], and gets its
//! own report. Files are processed in the order given.
//!
//! # Usage
//!
//! ```bash
//! # One or more files (plain or compressed)
//! access-log analyze access.log
//! access-log analyze access.log access.log.1 access.log.2.gz
//!
//! # No files: prompt for paths on stdin until EOF
//! access-log analyze
//!
//! # Also write every report as JSON
//! access-log analyze access.log --output report.json
//! ```
//!
//! # Output
//!
//! Per file:
//! - Accepted entries, total traffic and the covered time range
//! - Traffic rate (bytes per hour)
//! - Visit, error and per-user averages (crawlers excluded from visits)
//! - Crawler request counts and shares (Googlebot, YandexBot)
//! - Browser and operating system shares
//! - Existing (200) and missing (404) pages
//!
//! A line longer than the maximum length, or a read error, aborts that file;
//! the remaining files are still analyzed.

use crate::stats::{Report, Statistics};
use crate::utils::format::{format_bytes, format_number, format_percent};
use crate::utils::processor::{FileAnalysis, LogProcessor, DEFAULT_MAX_LINE_LENGTH};
use crate::utils::time::{duration_human, format_timestamp};
use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::Path;
use tracing::error;

/// Pages listed per set before the output is truncated.
const MAX_LISTED_PAGES: usize = 20;

/// Options shared by every analyzed file.
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    pub max_line_length: usize,
    /// JSON file receiving all reports
    pub output: Option<String>,
    pub show_progress: bool,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            output: None,
            show_progress: false,
        }
    }
}

/// Report for one file, as written to the JSON output.
#[derive(Debug, Serialize)]
pub struct FileReport {
    pub file: String,
    pub file_number: usize,
    pub total_lines: usize,
    pub skipped_lines: usize,
    #[serde(flatten)]
    pub report: Report,
}

/// Tracks files across one invocation.
struct Session {
    processor: LogProcessor,
    reports: Vec<FileReport>,
    analyzed: usize,
    failed: usize,
}

impl Session {
    fn new(options: &AnalyzeOptions) -> Self {
        Self {
            processor: LogProcessor::new()
                .max_line_length(options.max_line_length)
                .show_progress(options.show_progress),
            reports: Vec::new(),
            analyzed: 0,
            failed: 0,
        }
    }

    /// Validate, process and print one file. Problems are reported and
    /// counted, never propagated, so the next file still runs.
    fn analyze_path(&mut self, log_file: &str) {
        let path = Path::new(log_file);
        if !path.exists() || path.is_dir() {
            eprintln!(
                "Invalid path (directory or missing file), skipping: {}",
                log_file
            );
            self.failed += 1;
            return;
        }

        self.analyzed += 1;
        let file_number = self.analyzed;
        eprintln!("\n[File {}] Processing: {}", file_number, log_file);

        match self.processor.process_file(path) {
            Ok(FileAnalysis {
                statistics,
                process_stats,
            }) => {
                process_stats.report();
                let file_report = FileReport {
                    file: log_file.to_string(),
                    file_number,
                    total_lines: process_stats.total_lines,
                    skipped_lines: process_stats.skipped_lines,
                    report: Report::from_statistics(&statistics, process_stats.total_lines),
                };
                print_report(&file_report, &statistics);
                self.reports.push(file_report);
            }
            Err(e) => {
                let message = format!("{e:#}");
                error!(file = log_file, error = %message, "aborted access log");
                eprintln!("Error: {}", message);
                self.failed += 1;
            }
        }
    }

    fn finish(self, output: Option<&str>) -> Result<Vec<FileReport>> {
        if let Some(output) = output {
            write_json(output, &self.reports)?;
            eprintln!("\nReports written to: {}", output);
        }

        if self.failed > 0 {
            bail!(
                "{} of {} file(s) could not be analyzed",
                self.failed,
                self.failed + self.reports.len()
            );
        }
        Ok(self.reports)
    }
}

/// Analyze the given files, or prompt for paths on stdin when none are given.
pub fn run(log_files: &[String], options: &AnalyzeOptions) -> Result<Vec<FileReport>> {
    if log_files.is_empty() {
        let stdin = io::stdin();
        return run_interactive(stdin.lock(), options);
    }

    let mut session = Session::new(options);
    for log_file in log_files {
        session.analyze_path(log_file);
    }
    session.finish(options.output.as_deref())
}

/// Read file paths from `input`, one per line, until EOF.
pub fn run_interactive<R: BufRead>(input: R, options: &AnalyzeOptions) -> Result<Vec<FileReport>> {
    let mut session = Session::new(options);

    eprintln!("Enter the path to an access log (Ctrl-D to finish):");
    for line in input.lines() {
        let line = line.context("Failed to read path from stdin")?;
        let log_file = line.trim();
        if log_file.is_empty() {
            continue;
        }
        session.analyze_path(log_file);
        eprintln!("\nEnter the path to an access log (Ctrl-D to finish):");
    }

    session.finish(options.output.as_deref())
}

fn write_json(output: &str, reports: &[FileReport]) -> Result<()> {
    let file =
        File::create(output).with_context(|| format!("Failed to create output file: {}", output))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, reports)
        .with_context(|| format!("Failed to write reports to {}", output))?;
    writer.flush()?;
    Ok(())
}

fn print_report(file_report: &FileReport, statistics: &Statistics) {
    let report = &file_report.report;

    println!("\n{}", "=".repeat(80));
    println!(
        "Access Log Report [File {}]: {}",
        file_report.file_number, file_report.file
    );
    println!("{}", "=".repeat(80));

    println!("\n1. Traffic");
    println!("{}", "-".repeat(80));
    println!(
        "{:<36} {:>20}",
        "Entries",
        format_number(report.entry_count as u64)
    );
    println!(
        "{:<36} {:>20}",
        "Total traffic",
        format_bytes(report.total_traffic)
    );
    if let (Some(min), Some(max)) = (&report.min_time, &report.max_time) {
        println!("{:<36} {:>20}", "First request", format_timestamp(min));
        println!("{:<36} {:>20}", "Last request", format_timestamp(max));
        println!("{:<36} {:>20}", "Time span", duration_human(min, max));
    }
    println!(
        "{:<36} {:>20}",
        "Traffic rate (per hour)",
        format_bytes(report.traffic_rate.round() as u64)
    );

    println!("\n2. Visitors");
    println!("{}", "-".repeat(80));
    println!(
        "{:<36} {:>20}",
        "Visits (excluding crawlers)",
        format_number(statistics.non_bot_visits() as u64)
    );
    println!(
        "{:<36} {:>20}",
        "Unique visitor addresses",
        format_number(statistics.unique_visitors() as u64)
    );
    println!(
        "{:<36} {:>20.2}",
        "Average visits per hour", report.average_visits_per_hour
    );
    println!(
        "{:<36} {:>20.2}",
        "Average visits per user", report.average_visits_per_user
    );
    println!(
        "{:<36} {:>20}",
        "Error requests (4xx/5xx)",
        format_number(report.error_request_count as u64)
    );
    println!(
        "{:<36} {:>20.2}",
        "Average error requests per hour", report.average_error_requests_per_hour
    );

    println!("\n3. Crawlers");
    println!("{}", "-".repeat(80));
    println!("{:<36} {:>20} {:>12}", "Crawler", "Requests", "Share");
    for bot in &report.bots {
        println!(
            "{:<36} {:>20} {:>11.2}%",
            bot.bot.as_str(),
            format_number(bot.requests as u64),
            bot.share_percent
        );
    }

    println!("\n4. Browsers");
    println!("{}", "-".repeat(80));
    print_shares(
        report
            .browser_statistics
            .iter()
            .map(|(family, share)| (family.as_str(), *share)),
    );

    println!("\n5. Operating Systems");
    println!("{}", "-".repeat(80));
    print_shares(
        report
            .os_statistics
            .iter()
            .map(|(family, share)| (family.as_str(), *share)),
    );

    println!("\n6. Existing Pages (200)");
    println!("{}", "-".repeat(80));
    print_pages(&report.existing_pages);

    println!("\n7. Missing Pages (404)");
    println!("{}", "-".repeat(80));
    print_pages(&report.non_existent_pages);

    println!("{}", "=".repeat(80));
}

fn print_shares<'a>(shares: impl Iterator<Item = (&'a str, f64)>) {
    let mut sorted: Vec<_> = shares.collect();
    if sorted.is_empty() {
        println!("(none)");
        return;
    }
    sorted.sort_by(|a, b| b.1.total_cmp(&a.1));
    for (name, share) in sorted {
        println!("{:<36} {:>20}", name, format_percent(share));
    }
}

fn print_pages(pages: &BTreeSet<String>) {
    if pages.is_empty() {
        println!("(none)");
        return;
    }
    for page in pages.iter().take(MAX_LISTED_PAGES) {
        println!("{}", page);
    }
    if pages.len() > MAX_LISTED_PAGES {
        println!("... and {} more", pages.len() - MAX_LISTED_PAGES);
    }
}
