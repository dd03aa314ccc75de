use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("Failed to write test file");
    path
}

fn comb(args: &[&OsStr]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_comb"))
        .args(args)
        .env("RUST_LOG", "info")
        .env_remove("COMB_BUFFER_SIZE")
        .output()
        .expect("Failed to execute comb binary")
}

#[test]
fn test_comb_binary_merges_files() {
    let dir = TempDir::new().unwrap();
    let a = write(dir.path(), "a.txt", "a\nb\nd\n");
    let b = write(dir.path(), "b.txt", "b\nc\n");

    let output = comb(&[a.as_os_str(), b.as_os_str()]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(output.status.success(), "Binary failed to run. stderr: {}", stderr);
    assert_eq!(stdout, "a\nb\nc\nd\n");
    assert!(stderr.contains("reached EOF"), "Should report end of each file: {}", stderr);
    assert!(stderr.contains("merge complete"), "Should report summary: {}", stderr);
}

#[test]
fn test_comb_binary_legacy_exclusion_flag() {
    let dir = TempDir::new().unwrap();
    let a = write(dir.path(), "a.txt", "a\nb\n");
    let b = write(dir.path(), "b.txt", "b\nc\n");

    let output = comb(&[OsStr::new("-1"), a.as_os_str(), b.as_os_str()]);

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "c\n");
}

#[test]
fn test_comb_binary_missing_file_exits_with_one() {
    let dir = TempDir::new().unwrap();
    let a = write(dir.path(), "a.txt", "a\n");
    let missing = dir.path().join("missing.txt");

    let output = comb(&[a.as_os_str(), missing.as_os_str()]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("missing.txt"), "Should name the missing file: {}", stderr);
    assert!(output.stdout.is_empty());
}

#[test]
fn test_comb_binary_stats_json() {
    let dir = TempDir::new().unwrap();
    let a = write(dir.path(), "a.txt", "a\nb\n");
    let b = write(dir.path(), "b.txt", "c\n");

    let output = comb(&[
        OsStr::new("--stats-json"),
        OsStr::new("--buffer-size"),
        OsStr::new("2"),
        a.as_os_str(),
        b.as_os_str(),
    ]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(output.status.success(), "stderr: {}", stderr);
    let json_line = stderr
        .lines()
        .find(|line| line.starts_with('{'))
        .expect("Should print statistics as JSON");
    let stats: serde_json::Value = serde_json::from_str(json_line).unwrap();
    assert_eq!(stats["written"], 3);
    assert!(stats["rounds"].as_u64().unwrap() >= 1);
}

#[test]
fn test_comb_binary_requires_files() {
    let output = comb(&[]);
    assert!(!output.status.success());
}

#[test]
fn test_comb_binary_rejects_zero_buffer() {
    let dir = TempDir::new().unwrap();
    let a = write(dir.path(), "a.txt", "a\n");

    let output = comb(&[OsStr::new("--buffer-size"), OsStr::new("0"), a.as_os_str()]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        stderr.matches("Configuration error").count(),
        1,
        "Should report the bad buffer size once: {}",
        stderr
    );
    assert!(output.stdout.is_empty());
}

#[test]
fn test_comb_binary_reports_unopenable_input() {
    let dir = TempDir::new().unwrap();
    let a = write(dir.path(), "a.txt", "a\n");

    let missing = dir.path().join("gone");
    let output = comb(&[a.as_os_str(), missing.as_os_str()]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("Cannot open"), "Should say the input could not be opened: {}", stderr);
}
