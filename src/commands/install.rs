//! Command: resolve the configuration, run every worker, then reboot.
use std::sync::Arc;

use anyhow::{Context as _, Result};

use crate::cli::{GlobalOpts, InstallOpts};
use crate::exec::Executor;
use crate::logging::{Log, Logger};
use crate::platform::PlatformProfile;
use crate::workers::{Context, WorkerRegistry, cadence};

use super::Host;
use super::version::VERSION;

/// Run the install command against `host`.
///
/// Prints the worker summary whether or not the run succeeds, and applies
/// the reboot policy only after every worker succeeded.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or resolved, a
/// directory cannot be created, a worker fails, or the reboot command fails.
pub fn run(global: &GlobalOpts, opts: &InstallOpts, host: &Host, log: &Arc<Logger>) -> Result<()> {
    let profile = &host.profile;
    log.info(&format!("watchmaker {VERSION}"));
    log.info(&format!("detected {}", profile.os));

    log.stage("Resolving configuration");
    let registry = WorkerRegistry::with_defaults();
    let plan = super::resolve_plan(
        global.config.as_deref(),
        &opts.workers,
        &opts.extra,
        profile.os,
        &registry,
        host.downloader.as_ref(),
        &**log,
    )?;
    if plan.is_empty() {
        log.warn(&format!("no workers configured for {}", profile.os));
    } else {
        log.info(&format!("workers: {}", plan.names().join(", ")));
    }

    log.stage("Preparing directories");
    prepare_directories(profile, opts.dry_run, &**log)?;

    let ctx = Context::new(
        Arc::clone(profile),
        Arc::clone(log) as Arc<dyn Log>,
        Arc::clone(&host.downloader),
        opts.dry_run,
    );
    let outcome = cadence::run(&plan, &registry, &ctx);

    log.print_summary();
    log.info(&format!(
        "Stop time: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    ));
    outcome?;

    apply_reboot_policy(opts, profile, host.executor.as_ref(), &**log)
}

/// Create the log and working directories, or describe them in a dry run.
fn prepare_directories(profile: &PlatformProfile, dry_run: bool, log: &dyn Log) -> Result<()> {
    if dry_run {
        for dir in [&profile.log_dir, &profile.working_dir] {
            if !dir.is_dir() {
                log.dry_run(&format!("would create {}", dir.display()));
            }
        }
        return Ok(());
    }
    profile.ensure_directories()?;
    log.debug(&format!("working directory: {}", profile.working_dir.display()));
    Ok(())
}

/// Hand the restart command to the executor unless rebooting is disabled.
///
/// # Errors
///
/// Returns an error if the restart command cannot be run.
pub fn apply_reboot_policy(
    opts: &InstallOpts,
    profile: &PlatformProfile,
    executor: &dyn Executor,
    log: &dyn Log,
) -> Result<()> {
    if opts.no_reboot {
        log.info("reboot disabled (--no-reboot), not rebooting");
        return Ok(());
    }
    if opts.dry_run {
        log.dry_run(&format!("would reboot: {}", profile.restart_command));
        return Ok(());
    }
    log.info(&format!("rebooting: {}", profile.restart_command));
    executor
        .run_shell(&profile.restart_command)
        .context("scheduling reboot")?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::download::test_helpers::StubDownloader;
    use crate::error::{ConfigError, WatchmakerError};
    use crate::exec::{ExecResult, MockExecutor};

    const CENTOS: &str = "CentOS Linux release 7.4.1708 (Core)\n";
    const SALT: &str = "https://repo.example.com/salt.repo";

    fn ok_result() -> ExecResult {
        ExecResult {
            success: true,
            code: Some(0),
        }
    }

    /// Linux host rooted at `root` whose release file reads `release`.
    fn host(root: &Path, executor: MockExecutor, downloader: StubDownloader) -> Host {
        std::fs::create_dir_all(root.join("etc/yum.repos.d")).unwrap();
        std::fs::write(root.join("etc/system-release"), CENTOS).unwrap();
        Host {
            profile: Arc::new(PlatformProfile::linux(root)),
            downloader: Arc::new(downloader),
            executor: Arc::new(executor),
        }
    }

    fn write_config(root: &Path, yaml: &str) -> GlobalOpts {
        let path = root.join("site.yaml");
        std::fs::write(&path, yaml).unwrap();
        GlobalOpts {
            config: Some(path.to_string_lossy().to_string()),
            log_dir: None,
        }
    }

    fn salt_config(root: &Path) -> GlobalOpts {
        write_config(
            root,
            &format!("Linux:\n  Yum:\n    Parameters:\n      repositories:\n        - dist: all\n          url: {SALT}\n"),
        )
    }

    #[test]
    fn successful_run_reboots_once() {
        let tmp = tempfile::tempdir().unwrap();
        let mut executor = MockExecutor::new();
        executor
            .expect_run_shell()
            .withf(|cmd| cmd == "shutdown -r +1 &")
            .times(1)
            .returning(|_| Ok(ok_result()));
        let host = host(tmp.path(), executor, StubDownloader::new().with(SALT, "[salt]\n"));
        let global = salt_config(tmp.path());
        let log = Arc::new(Logger::new(None));

        run(&global, &InstallOpts::default(), &host, &log).unwrap();

        assert!(tmp.path().join("etc/yum.repos.d/salt.repo").is_file());
        assert!(host.profile.working_dir.is_dir());
        assert!(host.profile.log_dir.is_dir());
    }

    #[test]
    fn no_reboot_skips_restart_command() {
        let tmp = tempfile::tempdir().unwrap();
        let mut executor = MockExecutor::new();
        executor.expect_run_shell().times(0);
        let host = host(tmp.path(), executor, StubDownloader::new().with(SALT, "[salt]\n"));
        let global = salt_config(tmp.path());
        let opts = InstallOpts {
            no_reboot: true,
            ..InstallOpts::default()
        };
        run(&global, &opts, &host, &Arc::new(Logger::new(None))).unwrap();
    }

    #[test]
    fn dry_run_changes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let mut executor = MockExecutor::new();
        executor.expect_run_shell().times(0);
        let host = host(tmp.path(), executor, StubDownloader::new().with(SALT, "[salt]\n"));
        let global = salt_config(tmp.path());
        let opts = InstallOpts {
            dry_run: true,
            ..InstallOpts::default()
        };
        let log = Arc::new(Logger::new(None));
        run(&global, &opts, &host, &log).unwrap();

        assert!(!tmp.path().join("etc/yum.repos.d/salt.repo").exists());
        assert!(!host.profile.working_dir.exists());
        assert_eq!(
            log.worker_records().first().map(|r| r.status),
            Some(crate::logging::WorkerStatus::DryRun)
        );
    }

    #[test]
    fn failed_worker_prevents_reboot() {
        let tmp = tempfile::tempdir().unwrap();
        let mut executor = MockExecutor::new();
        executor.expect_run_shell().times(0);
        // No canned body: the download fails.
        let host = host(tmp.path(), executor, StubDownloader::new());
        let global = salt_config(tmp.path());
        let log = Arc::new(Logger::new(None));

        let err = run(&global, &InstallOpts::default(), &host, &log).unwrap_err();
        assert!(err.to_string().contains("worker 'Yum' failed"));
        assert_eq!(log.failure_count(), 1);
    }

    #[test]
    fn missing_os_section_runs_no_worker() {
        let tmp = tempfile::tempdir().unwrap();
        let mut executor = MockExecutor::new();
        executor.expect_run_shell().times(0);
        let downloader = StubDownloader::new().with(SALT, "[salt]\n");
        let host = host(tmp.path(), executor, downloader);
        let global = write_config(
            tmp.path(),
            &format!("Windows:\n  Yum:\n    Parameters:\n      repositories:\n        - dist: all\n          url: {SALT}\n"),
        );
        let log = Arc::new(Logger::new(None));

        let err = run(&global, &InstallOpts::default(), &host, &log).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<WatchmakerError>(),
            Some(WatchmakerError::Config(ConfigError::Scope { .. }))
        ));
        assert!(log.worker_records().is_empty());
        assert!(!tmp.path().join("etc/yum.repos.d/salt.repo").exists());
    }

    #[test]
    fn unknown_worker_fails_before_directories_are_created() {
        let tmp = tempfile::tempdir().unwrap();
        let mut executor = MockExecutor::new();
        executor.expect_run_shell().times(0);
        let host = host(tmp.path(), executor, StubDownloader::new());
        let global = write_config(
            tmp.path(),
            "Linux:\n  Yum:\n    Parameters: {}\n  Salt:\n    Parameters: {}\n",
        );
        let log = Arc::new(Logger::new(None));

        let err = run(&global, &InstallOpts::default(), &host, &log).unwrap_err();
        assert!(err.to_string().contains("unknown worker 'Salt'"));
        assert!(!host.profile.working_dir.exists());
    }

    #[test]
    fn reboot_failure_is_reported() {
        let mut executor = MockExecutor::new();
        executor
            .expect_run_shell()
            .returning(|_| Err(anyhow::anyhow!("permission denied")));
        let profile = PlatformProfile::windows("C:", r"C:\Windows");
        let err = apply_reboot_policy(
            &InstallOpts::default(),
            &profile,
            &executor,
            &Logger::new(None),
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("scheduling reboot: permission denied"));
    }
}
