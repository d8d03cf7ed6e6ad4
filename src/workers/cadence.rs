//! Sequential execution of a resolved worker plan.
use crate::config::WorkerPlan;
use crate::error::WorkerError;
use crate::logging::WorkerStatus;

use super::{Context, WorkerRegistry, WorkerResult};

/// Run every worker of `plan` in order, stopping at the first failure.
///
/// Each outcome is recorded on `ctx.log`; when a worker fails, the workers
/// after it are recorded as not run.
///
/// # Errors
///
/// Returns [`WorkerError::Unknown`] if a name is not registered and
/// [`WorkerError::Execution`] naming the first worker that fails.
pub fn run(plan: &WorkerPlan, registry: &WorkerRegistry, ctx: &Context) -> Result<(), WorkerError> {
    let entries = plan.entries();
    for (index, entry) in entries.iter().enumerate() {
        let worker = registry.create(entry.name())?;
        ctx.log.stage(&format!("Worker: {}", entry.name()));

        match worker.install(ctx, entry.parameters()) {
            Ok(WorkerResult::Ok) => {
                ctx.log.record_worker(entry.name(), WorkerStatus::Ok, None);
            }
            Ok(WorkerResult::Skipped(reason)) => {
                ctx.log.info(&format!("skipped: {reason}"));
                ctx.log
                    .record_worker(entry.name(), WorkerStatus::Skipped, Some(&reason));
            }
            Ok(WorkerResult::DryRun) => {
                ctx.log.record_worker(entry.name(), WorkerStatus::DryRun, None);
            }
            Err(e) => {
                ctx.log.error(&format!("{}: {e:#}", entry.name()));
                ctx.log
                    .record_worker(entry.name(), WorkerStatus::Failed, Some(&format!("{e:#}")));
                for rest in entries.iter().skip(index + 1) {
                    ctx.log.record_worker(rest.name(), WorkerStatus::NotRun, None);
                }
                return Err(WorkerError::Execution {
                    worker: entry.name().to_string(),
                    source: e.into(),
                });
            }
        }
    }
    Ok(())
}
