//! Core logging types: worker records, status, and the [`Log`] trait.

/// Worker execution result for summary reporting.
#[derive(Debug, Clone)]
pub struct WorkerRecord {
    /// Worker name as it appears in the plan.
    pub name: String,
    /// Final status of the worker.
    pub status: WorkerStatus,
    /// Optional detail message (e.g., skip reason or error description).
    pub message: Option<String>,
}

/// Status of a completed worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerStatus {
    /// Worker completed successfully.
    Ok,
    /// Worker had nothing to do (e.g., empty repository list).
    Skipped,
    /// Worker ran in dry-run mode; no changes were applied.
    DryRun,
    /// Worker failed and aborted the cadence.
    Failed,
    /// Worker never ran because an earlier worker failed.
    NotRun,
}

/// Logging collaborator handed to every component that reports progress.
///
/// [`Logger`](super::logger::Logger) is the production implementation; it
/// forwards to [`tracing`] and collects worker results for the run summary.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (suppressed on console unless verbose).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a dry-run action message.
    fn dry_run(&self, msg: &str);
    /// Record a worker result for the summary.
    fn record_worker(&self, name: &str, status: WorkerStatus, message: Option<&str>);
}
