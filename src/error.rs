//! Domain-specific error types for the provisioning engine.
//!
//! Internal modules return typed errors (e.g., [`ConfigError`],
//! [`WorkerError`]) while command handlers at the CLI boundary convert them
//! to [`anyhow::Error`] via the standard `?` operator.
//!
//! Every variant is fatal to the current run: there is no partial-success
//! reporting and no retry anywhere in the engine.
//!
//! # Error hierarchy
//!
//! ```text
//! WatchmakerError
//! ├── Config(ConfigError)      fetching, parsing, scoping and merging the config
//! ├── Platform(PlatformError)  OS detection and directory layout
//! ├── Worker(WorkerError)      registry lookup and worker execution
//! └── Repo(RepoError)          distribution detection and repo definitions
//! ```

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::download::DownloadError;

/// Top-level error type for the provisioning engine.
#[derive(Error, Debug)]
pub enum WatchmakerError {
    /// Configuration-related error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Platform detection or layout error.
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    /// Worker lookup or execution error.
    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),

    /// Repository worker error.
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

/// Errors that arise from loading and resolving the configuration document.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The remote configuration could not be retrieved.
    #[error("could not fetch config from {url}")]
    Fetch {
        /// URL that was requested.
        url: String,
        /// Underlying transport failure.
        #[source]
        source: DownloadError,
    },

    /// A local configuration path does not exist.
    #[error("config file {} does not exist", .path.display())]
    NotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// A local configuration file exists but could not be read.
    #[error("IO error reading config file {}: {source}", .path.display())]
    Io {
        /// Path that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The document is empty, not a mapping, or syntactically invalid.
    #[error("could not parse config {location}: {message}")]
    Parse {
        /// Where the document came from (path, URL or `<bundled>`).
        location: String,
        /// Parser diagnostic.
        message: String,
    },

    /// The document has no section for the current operating system.
    #[error("config has no '{os}' section (found: {available})")]
    Scope {
        /// OS key that was looked up.
        os: String,
        /// Comma-separated list of the keys that do exist.
        available: String,
    },

    /// A worker entry's parameters could not be merged.
    #[error("for worker '{entry}', the parameters could not be merged: {reason}")]
    Merge {
        /// Name of the offending worker entry.
        entry: String,
        /// Human-readable reason.
        reason: String,
    },

    /// Extra arguments must be given as `key value` pairs.
    #[error("extra arguments must be key/value pairs, got {count} item(s)")]
    OddOverrides {
        /// Number of items supplied.
        count: usize,
    },
}

/// Errors that arise from platform detection and directory creation.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// The host operating system is neither Linux nor Windows.
    #[error("system '{system}' is not supported")]
    Unsupported {
        /// Reported system name.
        system: String,
    },

    /// A required environment variable is not set.
    #[error("environment variable {var} is not set")]
    MissingEnvironment {
        /// Name of the missing variable.
        var: &'static str,
    },

    /// A run directory could not be created.
    #[error("could not create a directory in {}: {} ({source})", .root.display(), .path.display())]
    DirectoryCreation {
        /// Install root the directory lives under.
        root: PathBuf,
        /// Directory that was being created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

/// Errors that arise while dispatching workers.
#[derive(Error, Debug)]
pub enum WorkerError {
    /// The plan names a worker the registry does not know.
    #[error("unknown worker '{name}' (known workers: {known})")]
    Unknown {
        /// Name found in the plan.
        name: String,
        /// Comma-separated list of registered worker names.
        known: String,
    },

    /// A worker failed; the cadence was aborted.
    #[error("worker '{worker}' failed")]
    Execution {
        /// Name of the failing worker.
        worker: String,
        /// Underlying failure.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Errors that arise in the yum repository worker.
#[derive(Error, Debug)]
pub enum RepoError {
    /// The release file could not be read.
    #[error("could not read {}: {source}", .path.display())]
    ReleaseFile {
        /// Path of the release-identification file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The release line does not name a supported distribution.
    #[error("unsupported OS distribution '{line}'; OS must be one of: amazon, centos, red hat")]
    UnsupportedDistribution {
        /// First line of the release file.
        line: String,
    },

    /// The release-line pattern failed to compile.
    #[error("invalid release pattern")]
    Pattern(#[from] regex::Error),

    /// The distribution is known but its version has no EPEL mapping.
    #[error("unsupported OS version: dist = {family}, version = {version}")]
    UnsupportedVersion {
        /// Detected distribution family.
        family: String,
        /// Detected version string.
        version: String,
    },

    /// A repository definition in the worker parameters is malformed.
    #[error("invalid repository definition: {reason}")]
    Definition {
        /// Human-readable reason.
        reason: String,
    },

    /// A repository definition could not be downloaded.
    #[error("could not download repository definition")]
    Download(#[from] DownloadError),

    /// A repository definition could not be written.
    #[error("could not write {}: {source}", .path.display())]
    Write {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}
