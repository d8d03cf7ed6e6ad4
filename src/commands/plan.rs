//! Command: print the resolved worker plan.
use anyhow::{Context as _, Result};

use crate::cli::{GlobalOpts, PlanOpts};
use crate::config::WorkerPlan;
use crate::download::Downloader;
use crate::error::WatchmakerError;
use crate::logging::Log;
use crate::platform::Os;
use crate::workers::WorkerRegistry;

/// Run the plan command.
///
/// # Errors
///
/// Returns an error if the OS cannot be determined or the configuration
/// cannot be loaded, resolved or validated.
pub fn run(
    global: &GlobalOpts,
    opts: &PlanOpts,
    downloader: &dyn Downloader,
    log: &dyn Log,
) -> Result<()> {
    let os = match opts.os {
        Some(os) => Os::from(os),
        None => Os::detect()?,
    };
    let plan = resolve(global, opts, os, downloader, log)?;
    print!("{}", render(&plan)?);
    Ok(())
}

/// Load and validate the plan for `os`.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded, resolved or
/// validated against the worker registry.
pub fn resolve(
    global: &GlobalOpts,
    opts: &PlanOpts,
    os: Os,
    downloader: &dyn Downloader,
    log: &dyn Log,
) -> Result<WorkerPlan, WatchmakerError> {
    super::resolve_plan(
        global.config.as_deref(),
        &opts.workers,
        &opts.extra,
        os,
        &WorkerRegistry::with_defaults(),
        downloader,
        log,
    )
}

/// Render `plan` as a YAML document in configuration shape.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render(plan: &WorkerPlan) -> Result<String> {
    serde_yaml::to_string(&plan.to_document()).context("rendering plan as YAML")
}
