//! Top-level subcommand orchestration.
pub mod install;
pub mod plan;
pub mod version;

use std::sync::Arc;

use crate::cli::WorkerArgs;
use crate::config::{self, ConfigLocation, OverrideSet, WorkerPlan};
use crate::download::{Downloader, HttpDownloader};
use crate::error::{PlatformError, WatchmakerError};
use crate::exec::{Executor, SystemExecutor};
use crate::logging::Log;
use crate::platform::{Os, PlatformProfile};
use crate::workers::WorkerRegistry;

/// Host collaborators a command runs against.
///
/// [`Host::detect`] wires up the real system; tests build one by hand with
/// a temporary root, canned downloads and a recording executor.
#[derive(Debug, Clone)]
pub struct Host {
    /// OS identity and directory layout.
    pub profile: Arc<PlatformProfile>,
    /// HTTP client for remote config and repository files.
    pub downloader: Arc<dyn Downloader>,
    /// Process runner used for the reboot hand-off.
    pub executor: Arc<dyn Executor>,
}

impl Host {
    /// Detect the running system.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS is unsupported or its environment is
    /// incomplete.
    pub fn detect() -> Result<Self, PlatformError> {
        Ok(Self {
            profile: Arc::new(PlatformProfile::detect()?),
            downloader: Arc::new(HttpDownloader::new()),
            executor: Arc::new(SystemExecutor),
        })
    }
}

/// Build the overrides from the command line, load the configuration named
/// by `config_arg` and resolve it for `os`, then check every worker in the plan
/// is known to `registry`.
///
/// # Errors
///
/// Returns [`WatchmakerError::Config`] if the overrides are malformed or the
/// configuration cannot be loaded or resolved, and
/// [`WatchmakerError::Worker`] if the plan names an unknown worker.
pub fn resolve_plan(
    config_arg: Option<&str>,
    workers: &WorkerArgs,
    extra: &[String],
    os: Os,
    registry: &WorkerRegistry,
    downloader: &dyn Downloader,
    log: &dyn Log,
) -> Result<WorkerPlan, WatchmakerError> {
    let overrides = OverrideSet::from_args(&workers.named(), extra)?;
    if !overrides.is_empty() {
        log.debug(&format!("{} parameter override(s)", overrides.len()));
    }
    let location = ConfigLocation::from_arg(config_arg);
    let plan = config::load_plan(&location, os, &overrides, downloader, log)?;
    registry.validate(&plan)?;
    Ok(plan)
}
