//! Tail of the fix script log, as shown on the dashboard

use std::io::ErrorKind;

use tracing::warn;

use crate::errors::PanelError;
use crate::filesys::file::File;

pub const MISSING_LOG_PLACEHOLDER: &str = "(log file does not exist yet)";
pub const EMPTY_LOG_PLACEHOLDER: &str = "(log is empty)";

/// Last `max_lines` lines of the file, trimmed.
///
/// Never fails: a missing, empty or unreadable file yields a placeholder
/// string that is displayed in place of the log.
pub async fn read_tail(file: &File, max_lines: usize) -> String {
    let contents = match file.read_lossy().await {
        Ok(contents) => contents,
        Err(PanelError::IoError(e)) if e.kind() == ErrorKind::NotFound => {
            return MISSING_LOG_PLACEHOLDER.to_string();
        }
        Err(e) => {
            warn!("Unable to read log file {}: {}", file.path().display(), e);
            return format!("(error reading log: {})", e);
        }
    };

    // a bare `\r` ends a line too
    let contents = normalize_newlines(&contents);
    let tail = last_lines(&contents, max_lines).trim();
    if tail.is_empty() {
        EMPTY_LOG_PLACEHOLDER.to_string()
    } else {
        tail.to_string()
    }
}

fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Suffix of `text` holding its last `n` lines, line endings included
fn last_lines(text: &str, n: usize) -> &str {
    if n == 0 {
        return "";
    }

    // a trailing newline terminates the last line rather than starting one
    let body = text.strip_suffix('\n').unwrap_or(text);
    match body.rmatch_indices('\n').nth(n - 1) {
        Some((idx, _)) => &text[idx + 1..],
        None => text,
    }
}
