//! Utility functions for log file naming, ANSI stripping, and time formatting.
use std::path::{Path, PathBuf};

/// Strip ANSI escape sequences from a string.
///
/// Handles SGR sequences (ending in `m`) and other CSI sequences (ending
/// in any letter in the `@`..`~` range), so cursor movement, erase, etc.
/// are also stripped without consuming unrelated text.
pub(super) fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            if let Some(next) = chars.next()
                && next == '['
            {
                for inner in chars.by_ref() {
                    if ('@'..='~').contains(&inner) {
                        break;
                    }
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Return the dated log file path inside `log_dir`
/// (`watchmaker-YYYY-MM-DD.log`, local date).
pub(super) fn log_file_path(log_dir: &Path) -> PathBuf {
    log_dir.join(format!(
        "watchmaker-{}.log",
        chrono::Local::now().format("%Y-%m-%d")
    ))
}

/// Format the current local time as `YYYY-MM-DD HH:MM:SS`.
pub(super) fn format_local_datetime() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Format the current local time as `HH:MM:SS`.
pub(super) fn format_local_time() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

/// Center `title` in a line of `#` characters `width` columns wide.
pub(super) fn banner(title: &str, width: usize) -> String {
    let padded = format!(" {title} ");
    let len = padded.chars().count();
    if len >= width {
        return padded;
    }
    let left = (width - len) / 2;
    let right = width - len - left;
    format!("{}{padded}{}", "#".repeat(left), "#".repeat(right))
}
