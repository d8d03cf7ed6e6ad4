use std::sync::Arc;

use crate::download::Downloader;
use crate::logging::Log;
use crate::platform::PlatformProfile;

/// Shared, read-only context handed to every worker.
pub struct Context {
    /// Detected OS and directory layout.
    pub profile: Arc<PlatformProfile>,
    /// Logger for output and worker recording.
    pub log: Arc<dyn Log>,
    /// HTTP client used for repository definitions and other downloads.
    pub downloader: Arc<dyn Downloader>,
    /// Whether to perform a dry run (log actions without applying them).
    pub dry_run: bool,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("profile", &self.profile)
            .field("log", &"<dyn Log>")
            .field("downloader", &self.downloader)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl Context {
    /// Create a new worker context.
    #[must_use]
    pub fn new(
        profile: Arc<PlatformProfile>,
        log: Arc<dyn Log>,
        downloader: Arc<dyn Downloader>,
        dry_run: bool,
    ) -> Self {
        Self {
            profile,
            log,
            downloader,
            dry_run,
        }
    }
}
