//! Named workers that apply one provisioning concern each, and the cadence
//! that runs them in plan order.
pub mod cadence;
mod context;
pub mod distro;
pub mod registry;
pub mod yum;

pub use context::Context;
pub use registry::WorkerRegistry;

use anyhow::Result;
use serde_json::{Map, Value};

/// Outcome of a worker that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerResult {
    /// The worker applied its changes.
    Ok,
    /// The worker had nothing to do.
    Skipped(String),
    /// Dry-run mode; actions were logged but not applied.
    DryRun,
}

/// A provisioning step that can be scheduled by name from the configuration.
pub trait Worker: Send + Sync {
    /// Name used in configuration documents and the registry.
    fn name(&self) -> &str;

    /// Apply the worker to the live system using its merged parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters are invalid or the system cannot
    /// be changed.  Any error aborts the whole run.
    fn install(&self, ctx: &Context, parameters: &Map<String, Value>) -> Result<WorkerResult>;
}
