//! Exit behavior of the athenaq binary on configuration errors.
//!
//! None of these reach AWS: each fails before the first service call.

use super::common::run_athenaq;

#[test]
fn test_missing_query_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, stderr) = run_athenaq(dir.path(), &[]);

    assert_eq!(code, 1);
    assert!(stdout.is_empty());
    assert!(stderr.contains("Configuration Error"), "stderr: {stderr}");
    assert!(stderr.contains("--query"), "stderr: {stderr}");
}

#[test]
fn test_missing_output_location_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, stderr) = run_athenaq(dir.path(), &["-q", "SELECT 1", "-t"]);

    assert_eq!(code, 1);
    assert!(stdout.is_empty());
    assert!(stderr.contains("ATHENA_OUTPUT_LOCATION"), "stderr: {stderr}");
}

#[test]
fn test_unknown_connection_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, stderr) = run_athenaq(dir.path(), &["-q", "SELECT 1", "-c", "nope"]);

    assert_eq!(code, 1);
    assert!(stdout.is_empty());
    assert!(stderr.contains("Connection 'nope' not found"), "stderr: {stderr}");
}

#[test]
fn test_invalid_page_size_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_athenaq(
        dir.path(),
        &[
            "-q",
            "SELECT 1",
            "--output-location",
            "s3://bucket/",
            "--page-size",
            "5000",
        ],
    );

    assert_eq!(code, 1);
    assert!(stderr.contains("page size"), "stderr: {stderr}");
}

#[test]
fn test_help_lists_query_and_table_flags() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_athenaq(dir.path(), &["--help"]);

    assert_eq!(code, 0);
    assert!(stdout.contains("--query"));
    assert!(stdout.contains("--table"));
}
