// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed fake Linux host and a fluent builder
// so each integration test can set up an isolated system without repeating
// filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use watchmaker::cli::GlobalOpts;
use watchmaker::commands::Host;
use watchmaker::download::{DownloadError, Downloader};
use watchmaker::exec::{ExecResult, Executor};
use watchmaker::platform::PlatformProfile;

/// Release line written to `etc/system-release` by default.
pub const CENTOS_7: &str = "CentOS Linux release 7.4.1708 (Core)";

/// [`Downloader`] serving canned bodies keyed by URL.
#[derive(Debug, Default)]
pub struct MapDownloader {
    bodies: HashMap<String, String>,
    requested: Mutex<Vec<String>>,
}

impl MapDownloader {
    /// Serve `body` for `url`.
    pub fn with(mut self, url: &str, body: &str) -> Self {
        self.bodies.insert(url.to_string(), body.to_string());
        self
    }

    /// URLs requested so far, in order.
    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().expect("requested lock").clone()
    }
}

impl Downloader for MapDownloader {
    fn get(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        self.requested
            .lock()
            .expect("requested lock")
            .push(url.to_string());
        self.bodies
            .get(url)
            .map(|body| body.as_bytes().to_vec())
            .ok_or_else(|| DownloadError::new(url, "404 Not Found"))
    }
}

/// [`Executor`] that records command lines instead of running them.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    commands: Mutex<Vec<String>>,
}

impl RecordingExecutor {
    /// Command lines received so far.
    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().expect("commands lock").clone()
    }
}

impl Executor for RecordingExecutor {
    fn run_shell(&self, command_line: &str) -> anyhow::Result<ExecResult> {
        self.commands
            .lock()
            .expect("commands lock")
            .push(command_line.to_string());
        Ok(ExecResult {
            success: true,
            code: Some(0),
        })
    }
}

/// An isolated fake Linux host backed by a [`tempfile::TempDir`].
///
/// The directory is automatically deleted when dropped.
pub struct IntegrationTestContext {
    /// Temporary directory acting as the filesystem root.
    pub root: tempfile::TempDir,
    /// Downloads available to the run.
    pub downloader: Arc<MapDownloader>,
    /// Executor receiving the reboot command.
    pub executor: Arc<RecordingExecutor>,
}

impl IntegrationTestContext {
    /// Path to the fake filesystem root.
    pub fn root_path(&self) -> &Path {
        self.root.path()
    }

    /// Directory repository definitions are written to.
    pub fn repo_dir(&self) -> PathBuf {
        self.root.path().join("etc").join("yum.repos.d")
    }

    /// Global options pointing at `config.yaml` in the root.
    pub fn global(&self) -> GlobalOpts {
        GlobalOpts {
            config: Some(
                self.root
                    .path()
                    .join("config.yaml")
                    .to_string_lossy()
                    .to_string(),
            ),
            log_dir: None,
        }
    }

    /// Host wired to the fake root, downloader and executor.
    pub fn host(&self) -> Host {
        Host {
            profile: Arc::new(PlatformProfile::linux(self.root.path())),
            downloader: Arc::clone(&self.downloader) as Arc<dyn Downloader>,
            executor: Arc::clone(&self.executor) as Arc<dyn Executor>,
        }
    }
}

/// Fluent builder for [`IntegrationTestContext`].
pub struct TestContextBuilder {
    root: tempfile::TempDir,
    downloader: MapDownloader,
}

impl TestContextBuilder {
    /// Begin building a CentOS 7 host with an empty repository directory.
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        std::fs::create_dir_all(root.path().join("etc").join("yum.repos.d"))
            .expect("create repo dir");
        let builder = Self {
            root,
            downloader: MapDownloader::default(),
        };
        builder.with_release(CENTOS_7)
    }

    /// Overwrite the first line of `etc/system-release`.
    pub fn with_release(self, line: &str) -> Self {
        std::fs::write(
            self.root.path().join("etc").join("system-release"),
            format!("{line}\n"),
        )
        .expect("write system-release");
        self
    }

    /// Write `config.yaml` in the root.
    pub fn with_config(self, yaml: &str) -> Self {
        std::fs::write(self.root.path().join("config.yaml"), yaml).expect("write config");
        self
    }

    /// Serve `body` for `url`.
    pub fn with_download(mut self, url: &str, body: &str) -> Self {
        self.downloader = self.downloader.with(url, body);
        self
    }

    /// Finish building and return the configured context.
    pub fn build(self) -> IntegrationTestContext {
        IntegrationTestContext {
            root: self.root,
            downloader: Arc::new(self.downloader),
            executor: Arc::new(RecordingExecutor::default()),
        }
    }
}
