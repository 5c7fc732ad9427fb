//! Log tail tests

use std::io::Write;

use ugreen_panel::filesys::file::File;
use ugreen_panel::filesys::tail::{read_tail, EMPTY_LOG_PLACEHOLDER, MISSING_LOG_PLACEHOLDER};

#[tokio::test]
async fn test_missing_file_returns_placeholder() {
    let dir = tempfile::tempdir().unwrap();
    let file = File::new(dir.path().join("ugreen-fix.log"));

    assert_eq!(read_tail(&file, 220).await, MISSING_LOG_PLACEHOLDER);
}

#[tokio::test]
async fn test_empty_file_returns_placeholder() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ugreen-fix.log");
    std::fs::write(&path, "\n\n  \n").unwrap();

    assert_eq!(read_tail(&File::new(path), 220).await, EMPTY_LOG_PLACEHOLDER);
}

#[tokio::test]
async fn test_long_file_returns_last_lines_only() {
    let mut log = tempfile::NamedTempFile::new().unwrap();
    for i in 1..=300 {
        writeln!(log, "line {}", i).unwrap();
    }
    log.flush().unwrap();

    let tail = read_tail(&File::new(log.path()), 220).await;
    let lines: Vec<&str> = tail.lines().collect();

    assert_eq!(lines.len(), 220);
    assert_eq!(lines.first(), Some(&"line 81"));
    assert_eq!(lines.last(), Some(&"line 300"));
}

#[tokio::test]
async fn test_short_file_is_returned_whole_and_trimmed() {
    let mut log = tempfile::NamedTempFile::new().unwrap();
    write!(log, "\n[fix] unbinding usb\n[fix] done\n\n").unwrap();
    log.flush().unwrap();

    let tail = read_tail(&File::new(log.path()), 220).await;
    assert_eq!(tail, "[fix] unbinding usb\n[fix] done");
}

#[tokio::test]
async fn test_invalid_utf8_is_replaced() {
    let mut log = tempfile::NamedTempFile::new().unwrap();
    log.write_all(b"ok line\nbad \xff\xfe byte\n").unwrap();
    log.flush().unwrap();

    let tail = read_tail(&File::new(log.path()), 220).await;
    assert!(tail.starts_with("ok line\nbad "));
    assert!(tail.contains('\u{FFFD}'));
}

#[tokio::test]
async fn test_unreadable_path_returns_error_text() {
    // a directory cannot be read as a file
    let dir = tempfile::tempdir().unwrap();

    let tail = read_tail(&File::new(dir.path()), 220).await;
    assert!(tail.starts_with("(error reading log: "));
}

#[tokio::test]
async fn test_carriage_return_progress_counts_as_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ugreen-fix.log");
    let mut text = String::from("start\r\n");
    for pct in 0..=100 {
        text.push_str(&format!("progress {}%\r", pct));
    }
    text.push_str("done\r\n");
    std::fs::write(&path, text).unwrap();

    let tail = read_tail(&File::new(path), 3).await;

    assert_eq!(tail, "progress 99%\nprogress 100%\ndone");
}
