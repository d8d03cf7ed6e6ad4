//! Command-line interface definition.
use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::platform::Os;

/// Top-level CLI entry point for the provisioning engine.
#[derive(Parser, Debug)]
#[command(
    name = "watchmaker",
    about = "Prepare a freshly provisioned Linux or Windows system for configuration management",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Increase console verbosity (`-v` debug, `-vv` trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Path or URL of the configuration document (default: the bundled config)
    #[arg(short, long, global = true, value_name = "PATH|URL")]
    pub config: Option<String>,

    /// Directory to write the watchmaker log file to
    #[arg(short, long, global = true, value_parser = parse_log_dir)]
    pub log_dir: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve the configuration and run every worker for this host
    Install(InstallOpts),
    /// Print the resolved worker plan without changing the system
    Plan(PlanOpts),
    /// Print version information
    Version,
}

/// Options for the `install` subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct InstallOpts {
    /// Do not reboot after a successful run
    #[arg(long = "no-reboot", alias = "noreboot")]
    pub no_reboot: bool,

    /// Preview changes without applying
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    /// Named worker arguments.
    #[command(flatten)]
    pub workers: WorkerArgs,

    /// Extra `key value` pairs passed to every worker (after `--`)
    #[arg(last = true, value_name = "KEY VALUE")]
    pub extra: Vec<String>,
}

/// Options for the `plan` subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct PlanOpts {
    /// Resolve for this OS instead of the host
    #[arg(long, value_enum)]
    pub os: Option<OsArg>,

    /// Named worker arguments.
    #[command(flatten)]
    pub workers: WorkerArgs,

    /// Extra `key value` pairs passed to every worker (after `--`)
    #[arg(last = true, value_name = "KEY VALUE")]
    pub extra: Vec<String>,
}

/// Named worker arguments; each one overrides the worker parameter of the
/// same meaning in every plan entry.
#[derive(Args, Debug, Clone, Default)]
pub struct WorkerArgs {
    /// Use S3 buckets instead of internet locations for content
    #[arg(long)]
    pub s3_source: bool,

    /// Comma-separated salt states to apply
    #[arg(long)]
    pub salt_states: Option<String>,

    /// Groups to grant administrative rights
    #[arg(long)]
    pub admin_groups: Option<String>,

    /// Users to grant administrative rights
    #[arg(long)]
    pub admin_users: Option<String>,

    /// Name to assign to the computer
    #[arg(long)]
    pub computer_name: Option<String>,

    /// Environment the system belongs to
    #[arg(long)]
    pub environment: Option<String>,

    /// Directory OU to place the computer in
    #[arg(long)]
    pub ou_path: Option<String>,
}

impl WorkerArgs {
    /// Pair each argument with the worker parameter key it sets.
    #[must_use]
    pub fn named(&self) -> [(&'static str, Option<String>); 7] {
        [
            ("sourceiss3bucket", self.s3_source.then(|| "true".to_string())),
            ("saltstates", self.salt_states.clone()),
            ("admingroups", self.admin_groups.clone()),
            ("adminusers", self.admin_users.clone()),
            ("computername", self.computer_name.clone()),
            ("entenv", self.environment.clone()),
            ("oupath", self.ou_path.clone()),
        ]
    }
}

/// OS selector for the `plan` subcommand.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsArg {
    /// Linux section
    Linux,
    /// Windows section
    Windows,
}

impl From<OsArg> for Os {
    fn from(value: OsArg) -> Self {
        match value {
            OsArg::Linux => Self::Linux,
            OsArg::Windows => Self::Windows,
        }
    }
}

/// Accept a log directory that is absent or a directory, never a file.
fn parse_log_dir(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if path.is_file() {
        return Err(format!("'{value}' is a file, expected a directory"));
    }
    Ok(path)
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use std::ffi::OsString;

    use super::*;
    use clap::CommandFactory;

    fn args_with_log_dir(dir: &std::path::Path) -> Vec<OsString> {
        vec![
            OsString::from("watchmaker"),
            OsString::from("--log-dir"),
            dir.as_os_str().to_os_string(),
            OsString::from("install"),
        ]
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_install_defaults() {
        let cli = Cli::parse_from(["watchmaker", "install"]);
        assert!(cli.global.config.is_none());
        assert!(cli.global.log_dir.is_none());
        let Command::Install(opts) = cli.command else {
            panic!("expected install");
        };
        assert!(!opts.no_reboot);
        assert!(!opts.dry_run);
        assert!(opts.extra.is_empty());
    }

    #[test]
    fn parse_install_with_config_url() {
        let cli = Cli::parse_from([
            "watchmaker",
            "install",
            "--config",
            "https://example.com/config.yaml",
        ]);
        assert_eq!(
            cli.global.config.as_deref(),
            Some("https://example.com/config.yaml")
        );
    }

    #[test]
    fn parse_noreboot_alias() {
        for flag in ["--no-reboot", "--noreboot"] {
            let cli = Cli::parse_from(["watchmaker", "install", flag]);
            let Command::Install(opts) = cli.command else {
                panic!("expected install");
            };
            assert!(opts.no_reboot, "{flag}");
        }
    }

    #[test]
    fn parse_install_dry_run_short() {
        let cli = Cli::parse_from(["watchmaker", "install", "-d"]);
        let Command::Install(opts) = cli.command else {
            panic!("expected install");
        };
        assert!(opts.dry_run);
    }

    #[test]
    fn parse_named_worker_arguments() {
        let cli = Cli::parse_from([
            "watchmaker",
            "install",
            "--salt-states",
            "highstate",
            "--environment",
            "dev",
            "--ou-path",
            "OU=Servers,DC=example,DC=com",
        ]);
        let Command::Install(opts) = cli.command else {
            panic!("expected install");
        };
        let named = opts.workers.named();
        assert_eq!(named[1], ("saltstates", Some("highstate".to_string())));
        assert_eq!(named[5], ("entenv", Some("dev".to_string())));
        assert_eq!(
            named[6],
            ("oupath", Some("OU=Servers,DC=example,DC=com".to_string()))
        );
        assert_eq!(named[0], ("sourceiss3bucket", None));
    }

    #[test]
    fn parse_s3_source_is_a_flag() {
        let cli = Cli::parse_from(["watchmaker", "install", "--s3-source", "--environment", "dev"]);
        let Command::Install(opts) = cli.command else {
            panic!("expected install");
        };
        assert!(opts.workers.s3_source);
        let named = opts.workers.named();
        assert_eq!(named[0], ("sourceiss3bucket", Some("true".to_string())));
        assert_eq!(named[5], ("entenv", Some("dev".to_string())));
    }

    #[test]
    fn parse_trailing_extra_arguments() {
        let cli = Cli::parse_from(["watchmaker", "install", "--", "--arg1", "v1", "arg2", "v2"]);
        let Command::Install(opts) = cli.command else {
            panic!("expected install");
        };
        assert_eq!(opts.extra, vec!["--arg1", "v1", "arg2", "v2"]);
    }

    #[test]
    fn parse_plan_for_windows() {
        let cli = Cli::parse_from(["watchmaker", "plan", "--os", "windows"]);
        let Command::Plan(opts) = cli.command else {
            panic!("expected plan");
        };
        assert_eq!(opts.os.map(Os::from), Some(Os::Windows));
    }

    #[test]
    fn parse_version() {
        let cli = Cli::parse_from(["watchmaker", "version"]);
        assert!(matches!(cli.command, Command::Version));
    }

    #[test]
    fn parse_verbose_after_subcommand() {
        let cli = Cli::parse_from(["watchmaker", "install", "-v"]);
        assert_eq!(cli.verbose, 1);
    }

    #[test]
    fn parse_verbose_is_counted() {
        assert_eq!(Cli::parse_from(["watchmaker", "install"]).verbose, 0);
        assert_eq!(Cli::parse_from(["watchmaker", "-vv", "install"]).verbose, 2);
        assert_eq!(Cli::parse_from(["watchmaker", "plan", "-v", "-v"]).verbose, 2);
    }

    #[test]
    fn log_dir_accepts_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("logs");
        let cli = Cli::try_parse_from(args_with_log_dir(&dir)).unwrap();
        assert_eq!(cli.global.log_dir, Some(dir));
    }

    #[test]
    fn log_dir_rejects_file() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let result = Cli::try_parse_from(args_with_log_dir(tmp.path()));
        assert!(result.is_err());
    }
}
