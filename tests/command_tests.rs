/// Tests for the analyze command: validation, error handling, JSON export
use access_log_tools::commands::analyze::{self, AnalyzeOptions};
use std::fs::{self, File};
use std::io::{Cursor, Write};
use std::path::PathBuf;
use tempfile::TempDir;

const LINES: [&str; 3] = [
    r#"10.0.0.1 - - [10/Oct/2023:13:55:36 +0000] "GET /index.html HTTP/1.1" 200 512 "-" "Mozilla/5.0 (Windows NT 10.0) Chrome/118.0""#,
    r#"10.0.0.2 - - [10/Oct/2023:15:00:00 +0000] "GET /missing HTTP/1.1" 404 0 "-" "Mozilla/5.0 (X11; Linux x86_64; rv:109.0) Gecko/20100101 Firefox/119.0""#,
    r#"66.249.66.1 - - [10/Oct/2023:16:00:00 +0000] "GET /robots.txt HTTP/1.1" 200 68 "-" "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)""#,
];

/// Helper to create a sample access log file
fn create_sample_log(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = File::create(&path).unwrap();
    for line in LINES {
        writeln!(file, "{}", line).unwrap();
    }
    file.flush().unwrap();
    path
}

fn path_arg(path: &PathBuf) -> String {
    path.to_str().unwrap().to_string()
}

#[test]
fn test_analyze_single_file() {
    let dir = TempDir::new().unwrap();
    let log = create_sample_log(&dir, "access.log");

    let reports = analyze::run(&[path_arg(&log)], &AnalyzeOptions::default()).unwrap();

    assert_eq!(reports.len(), 1);
    let report = &reports[0];
    assert_eq!(report.file_number, 1);
    assert_eq!(report.total_lines, 3);
    assert_eq!(report.report.entry_count, 3);
    assert_eq!(report.report.total_traffic, 580);
    assert_eq!(report.report.error_request_count, 1);
    assert!(report.report.non_existent_pages.contains("/missing"));
}

#[test]
fn test_analyze_files_independently() {
    let dir = TempDir::new().unwrap();
    let first = create_sample_log(&dir, "access.log");
    let second = create_sample_log(&dir, "access.log.1");

    let reports = analyze::run(
        &[path_arg(&first), path_arg(&second)],
        &AnalyzeOptions::default(),
    )
    .unwrap();

    assert_eq!(reports.len(), 2);
    assert_eq!(reports[1].file_number, 2);
    // each file starts from empty statistics
    assert_eq!(reports[0].report.entry_count, 3);
    assert_eq!(reports[1].report.entry_count, 3);
}

#[test]
fn test_analyze_missing_file() {
    let result = analyze::run(
        &["/nonexistent/access.log".to_string()],
        &AnalyzeOptions::default(),
    );
    assert!(result.is_err());
}

#[test]
fn test_analyze_directory_is_rejected() {
    let dir = TempDir::new().unwrap();
    let result = analyze::run(&[path_arg(&dir.path().to_path_buf())], &AnalyzeOptions::default());
    assert!(result.is_err());
}

#[test]
fn test_analyze_continues_after_failed_file() {
    let dir = TempDir::new().unwrap();
    let good = create_sample_log(&dir, "good.log");
    let bad = dir.path().join("bad.log");
    fs::write(&bad, format!("{}\n", "x".repeat(2000))).unwrap();
    let output = dir.path().join("reports.json");

    let options = AnalyzeOptions {
        output: Some(path_arg(&output)),
        ..AnalyzeOptions::default()
    };
    let result = analyze::run(&[path_arg(&bad), path_arg(&good)], &options);

    let err = result.unwrap_err();
    assert!(err.to_string().contains("1 of 2"));

    // the good file was still analyzed and exported
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["entry_count"], 3);
}

#[test]
fn test_analyze_custom_max_line_length() {
    let dir = TempDir::new().unwrap();
    let log = create_sample_log(&dir, "access.log");

    let options = AnalyzeOptions {
        max_line_length: 50,
        ..AnalyzeOptions::default()
    };
    assert!(analyze::run(&[path_arg(&log)], &options).is_err());
}

#[test]
fn test_json_output() {
    let dir = TempDir::new().unwrap();
    let log = create_sample_log(&dir, "access.log");
    let output = dir.path().join("report.json");

    let options = AnalyzeOptions {
        output: Some(path_arg(&output)),
        ..AnalyzeOptions::default()
    };
    analyze::run(&[path_arg(&log)], &options).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    let report = &json[0];
    assert_eq!(report["file_number"], 1);
    assert_eq!(report["total_traffic"], 580);
    assert_eq!(report["bots"][0]["bot"], "Googlebot");
    assert_eq!(report["bots"][0]["requests"], 1);
    assert!(report["browser_statistics"]["Chrome"].is_f64());
    assert!(report["os_statistics"]["Linux"].is_f64());
    assert_eq!(report["existing_pages"][0], "/index.html");
}

#[test]
fn test_interactive_mode_reads_paths() {
    let dir = TempDir::new().unwrap();
    let log = create_sample_log(&dir, "access.log");

    let input = format!("\n{}\n", log.display());
    let reports = analyze::run_interactive(Cursor::new(input), &AnalyzeOptions::default()).unwrap();

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].report.entry_count, 3);
}

#[test]
fn test_interactive_mode_rejects_bad_path() {
    let input = "/nonexistent/access.log\n";
    let result = analyze::run_interactive(Cursor::new(input), &AnalyzeOptions::default());
    assert!(result.is_err());
}
