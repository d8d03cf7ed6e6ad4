//! Host OS detection and the per-OS directory layout used by a run.
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::PlatformError;

/// Delay and message handed to `shutdown.exe` on Windows.
const WINDOWS_RESTART_ARGS: &str =
    r#"/r /t 30 /d p:2:4 /c "Watchmaker complete. Rebooting computer.""#;

/// Delayed reboot scheduled through the shell on Linux.
const LINUX_RESTART_COMMAND: &str = "shutdown -r +1 &";

/// Detected operating system family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    /// Any Linux distribution.
    Linux,
    /// Microsoft Windows.
    Windows,
}

impl Os {
    /// Map a reported system name (`std::env::consts::OS` style, or the
    /// capitalised `Linux`/`Windows`) to an [`Os`].
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::Unsupported`] for any other system.
    pub fn from_system_name(system: &str) -> Result<Self, PlatformError> {
        if system.eq_ignore_ascii_case("linux") {
            Ok(Self::Linux)
        } else if system.eq_ignore_ascii_case("windows") {
            Ok(Self::Windows)
        } else {
            Err(PlatformError::Unsupported {
                system: system.to_string(),
            })
        }
    }

    /// Detect the OS this binary is running on.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::Unsupported`] on anything but Linux or Windows.
    pub fn detect() -> Result<Self, PlatformError> {
        Self::from_system_name(std::env::consts::OS)
    }

    /// The case-sensitive key selecting this OS's section of the config.
    #[must_use]
    pub const fn config_key(self) -> &'static str {
        match self {
            Self::Linux => "Linux",
            Self::Windows => "Windows",
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config_key())
    }
}

/// OS identity and filesystem layout for a provisioning run.
///
/// Built once after OS detection and never mutated afterwards.  The restart
/// command is opaque to everything but the process executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformProfile {
    /// Detected OS family.
    pub os: Os,
    /// Directory that owns the run's scratch space.
    pub install_root: PathBuf,
    /// Directory for log files.
    pub log_dir: PathBuf,
    /// Directory for downloaded and extracted working files.
    pub working_dir: PathBuf,
    /// Marker file path signalling that the system is ready.
    pub ready_file: PathBuf,
    /// Command line that schedules the post-provisioning reboot.
    pub restart_command: String,
    /// Release-identification file (Linux only).
    pub release_file: Option<PathBuf>,
    /// Directory yum reads repository definitions from (Linux only).
    pub repo_dir: Option<PathBuf>,
}

impl PlatformProfile {
    /// Detect the host OS and build its profile from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS is unsupported or, on Windows, if
    /// `SYSTEMDRIVE`/`SYSTEMROOT` are not set.
    pub fn detect() -> Result<Self, PlatformError> {
        Self::for_os(Os::detect()?, |var| std::env::var(var).ok())
    }

    /// Build the profile for `os`, reading environment variables via `env`.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::MissingEnvironment`] if a Windows variable
    /// is absent.
    pub fn for_os(
        os: Os,
        env: impl Fn(&'static str) -> Option<String>,
    ) -> Result<Self, PlatformError> {
        match os {
            Os::Linux => Ok(Self::linux(Path::new("/"))),
            Os::Windows => {
                let drive = env("SYSTEMDRIVE")
                    .ok_or(PlatformError::MissingEnvironment { var: "SYSTEMDRIVE" })?;
                let system_root = env("SYSTEMROOT")
                    .ok_or(PlatformError::MissingEnvironment { var: "SYSTEMROOT" })?;
                Ok(Self::windows(&drive, &system_root))
            }
        }
    }

    /// Linux layout rooted at `root` (`/` on a real host).
    #[must_use]
    pub fn linux(root: &Path) -> Self {
        let install_root = root.join("usr").join("tmp").join("systemprep");
        Self {
            os: Os::Linux,
            log_dir: root.join("var").join("log").join("watchmaker"),
            working_dir: install_root.join("workingfiles"),
            ready_file: root.join("var").join("run").join("system-is-ready"),
            restart_command: LINUX_RESTART_COMMAND.to_string(),
            release_file: Some(root.join("etc").join("system-release")),
            repo_dir: Some(root.join("etc").join("yum.repos.d")),
            install_root,
        }
    }

    /// Windows layout on `system_drive` (e.g. `C:`), with the shutdown
    /// utility under `system_root` (e.g. `C:\Windows`).
    ///
    /// Paths are joined with `\` explicitly so the layout is the same
    /// whichever host computes it.
    #[must_use]
    pub fn windows(system_drive: &str, system_root: &str) -> Self {
        let install_root = format!("{}\\Watchmaker", system_drive.trim_end_matches('\\'));
        let shutdown = format!(
            "{}\\system32\\shutdown.exe",
            system_root.trim_end_matches('\\')
        );
        Self {
            os: Os::Windows,
            log_dir: PathBuf::from(format!("{install_root}\\Logs")),
            working_dir: PathBuf::from(format!("{install_root}\\WorkingFiles")),
            ready_file: PathBuf::from(format!("{install_root}\\system-is-ready")),
            restart_command: format!("{shutdown} {WINDOWS_RESTART_ARGS}"),
            release_file: None,
            repo_dir: None,
            install_root: PathBuf::from(install_root),
        }
    }

    /// Create the log and working directories if they are absent.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::DirectoryCreation`] naming the install root,
    /// the directory and the OS error.
    pub fn ensure_directories(&self) -> Result<(), PlatformError> {
        for dir in [&self.log_dir, &self.working_dir] {
            if dir.is_dir() {
                continue;
            }
            std::fs::create_dir_all(dir).map_err(|source| PlatformError::DirectoryCreation {
                root: self.install_root.clone(),
                path: dir.clone(),
                source,
            })?;
        }
        Ok(())
    }
}
