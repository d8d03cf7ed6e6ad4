//! Structured logger with dry-run awareness and summary collection.
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::types::{Log, WorkerRecord, WorkerStatus};
use super::utils::log_file_path;

/// Implement the display methods of [`Log`] by delegating to inherent methods
/// of the same name on the implementing type.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Structured logger with dry-run awareness and summary collection.
///
/// Every message goes through [`tracing`]; when a log directory was given,
/// the [`FileLayer`](super::subscriber::FileLayer) also appends it to
/// `<log_dir>/watchmaker-YYYY-MM-DD.log` with ANSI codes stripped.
#[derive(Debug)]
pub struct Logger {
    workers: Mutex<Vec<WorkerRecord>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a new logger.
    ///
    /// Stores the log file path for display in the run summary.  The file
    /// itself is opened by [`init_subscriber`](super::subscriber::init_subscriber).
    #[must_use]
    pub fn new(log_dir: Option<&Path>) -> Self {
        Self {
            workers: Mutex::new(Vec::new()),
            log_file: log_dir.map(log_file_path),
        }
    }

    /// Return the log file path, if file logging is enabled.
    #[must_use]
    pub const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Return a clone of all recorded worker results.
    #[must_use]
    pub fn worker_records(&self) -> Vec<WorkerRecord> {
        self.workers.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: "watchmaker::stage", "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose; always
    /// written to the log file).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a dry-run action message.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: "watchmaker::dry_run", "{msg}");
    }

    /// Record a worker result for the summary.
    pub fn record_worker(&self, name: &str, status: WorkerStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.workers.lock() {
            guard.push(WorkerRecord {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Count the number of failed workers.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.workers.lock().map_or(0, |guard| {
            guard
                .iter()
                .filter(|w| w.status == WorkerStatus::Failed)
                .count()
        })
    }

    /// Print the summary of all recorded workers.
    pub fn print_summary(&self) {
        let workers = self.worker_records();
        if workers.is_empty() {
            return;
        }

        self.stage("Summary");

        let mut ok = 0u32;
        let mut skipped = 0u32;
        let mut dry_run = 0u32;
        let mut failed = 0u32;
        let mut not_run = 0u32;

        for worker in &workers {
            let (icon, color) = match worker.status {
                WorkerStatus::Ok => {
                    ok += 1;
                    ("✓", "\x1b[32m")
                }
                WorkerStatus::Skipped => {
                    skipped += 1;
                    ("○", "\x1b[33m")
                }
                WorkerStatus::DryRun => {
                    dry_run += 1;
                    ("~", "\x1b[37m")
                }
                WorkerStatus::Failed => {
                    failed += 1;
                    ("✗", "\x1b[31m")
                }
                WorkerStatus::NotRun => {
                    not_run += 1;
                    ("·", "\x1b[2m")
                }
            };

            let suffix = worker
                .message
                .as_ref()
                .map_or_else(String::new, |msg| format!(" ({msg})"));

            self.info(&format!("{color}{icon} {}{suffix}\x1b[0m", worker.name));
        }

        let total = ok + skipped + dry_run + failed + not_run;
        self.info(&format!(
            "{total} workers: \x1b[32m{ok} ok\x1b[0m, \x1b[33m{skipped} skipped\x1b[0m, \x1b[37m{dry_run} dry-run\x1b[0m, \x1b[31m{failed} failed\x1b[0m, \x1b[2m{not_run} not run\x1b[0m"
        ));

        if let Some(path) = &self.log_file {
            self.info(&format!("\x1b[2mlog: {}\x1b[0m", path.display()));
        }
    }
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error, dry_run);

    fn record_worker(&self, name: &str, status: WorkerStatus, message: Option<&str>) {
        self.record_worker(name, status, message);
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logging::isolated_logger;
    use std::fs;

    #[test]
    fn logger_new() {
        let (log, _tmp, _guard) = isolated_logger();
        assert!(log.worker_records().is_empty(), "expected empty worker list");
    }

    #[test]
    fn logger_without_log_dir_has_no_path() {
        let log = Logger::new(None);
        assert!(log.log_path().is_none());
    }

    #[test]
    fn record_worker_ok() {
        let (log, _tmp, _guard) = isolated_logger();
        log.record_worker("Yum", WorkerStatus::Ok, None);
        let workers = log.worker_records();
        assert_eq!(workers.len(), 1);
        assert_eq!(workers[0].name, "Yum");
        assert_eq!(workers[0].status, WorkerStatus::Ok);
    }

    #[test]
    fn record_worker_with_message() {
        let (log, _tmp, _guard) = isolated_logger();
        log.record_worker("Yum", WorkerStatus::Skipped, Some("nothing to do"));
        assert_eq!(
            log.worker_records()[0].message,
            Some("nothing to do".to_string())
        );
    }

    #[test]
    fn failure_count_returns_correct_count() {
        let (log, _tmp, _guard) = isolated_logger();
        assert_eq!(log.failure_count(), 0);
        log.record_worker("a", WorkerStatus::Ok, None);
        log.record_worker("b", WorkerStatus::Failed, Some("error 1"));
        log.record_worker("c", WorkerStatus::NotRun, None);
        assert_eq!(log.failure_count(), 1);
    }

    #[test]
    fn log_trait_delegates_to_logger() {
        let (log, _tmp, _guard) = isolated_logger();
        let log_ref: &dyn Log = &log;
        log_ref.record_worker("via-trait", WorkerStatus::Ok, None);
        assert_eq!(log.worker_records().len(), 1);
    }

    #[test]
    fn log_file_is_created_with_header() {
        let (log, _tmp, _guard) = isolated_logger();
        let path = log.log_path().expect("log path should exist");
        let contents = fs::read_to_string(path).unwrap();
        assert!(contents.contains(" WATCHMAKER RUN "));
    }

    #[test]
    fn debug_always_written_to_file() {
        let (log, _tmp, _guard) = isolated_logger();
        let marker = format!("debug-marker-{}", std::process::id());
        log.debug(&marker);
        let contents = fs::read_to_string(log.log_path().unwrap()).unwrap();
        assert!(contents.contains("[debug]"));
        assert!(contents.contains(&marker));
    }

    #[test]
    fn stage_written_to_file_with_arrow() {
        let (log, _tmp, _guard) = isolated_logger();
        log.stage("Resolving configuration");
        let contents = fs::read_to_string(log.log_path().unwrap()).unwrap();
        assert!(contents.contains("==> Resolving configuration"));
    }

    #[test]
    fn warn_and_error_are_tagged() {
        let (log, _tmp, _guard) = isolated_logger();
        log.warn("careful");
        log.error("broken");
        let contents = fs::read_to_string(log.log_path().unwrap()).unwrap();
        assert!(contents.contains("[warn] careful"));
        assert!(contents.contains("[error] broken"));
    }

    #[test]
    fn dry_run_written_to_file() {
        let (log, _tmp, _guard) = isolated_logger();
        log.dry_run("would write /etc/yum.repos.d/epel.repo");
        let contents = fs::read_to_string(log.log_path().unwrap()).unwrap();
        assert!(contents.contains("[dry run] would write /etc/yum.repos.d/epel.repo"));
    }

    #[test]
    fn summary_strips_ansi_in_file() {
        let (log, _tmp, _guard) = isolated_logger();
        log.record_worker("Yum", WorkerStatus::Failed, Some("no route"));
        log.print_summary();
        let contents = fs::read_to_string(log.log_path().unwrap()).unwrap();
        assert!(contents.contains("✗ Yum (no route)"));
        assert!(contents.contains("1 workers: 0 ok, 0 skipped, 0 dry-run, 1 failed, 0 not run"));
        assert!(!contents.contains('\x1b'));
    }
}
