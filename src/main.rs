//! `watchmaker` binary entry point.
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser as _;

use watchmaker::cli::{Cli, Command};
use watchmaker::commands::{self, Host};
use watchmaker::download::HttpDownloader;
use watchmaker::logging::{self, Logger};

fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();

    let log_dir = args.global.log_dir.as_deref();
    let file_ok = logging::init_subscriber(args.verbose, log_dir);
    let log = Arc::new(Logger::new(log_dir.filter(|_| file_ok)));
    match log_dir {
        None => log.warn("no --log-dir given, not writing a log file"),
        Some(dir) if !file_ok => log.warn(&format!(
            "could not open a log file in {}, logging to the console only",
            dir.display()
        )),
        Some(_) => {}
    }

    let result = match &args.command {
        Command::Install(opts) => Host::detect()
            .map_err(anyhow::Error::from)
            .and_then(|host| commands::install::run(&args.global, opts, &host, &log)),
        Command::Plan(opts) => {
            commands::plan::run(&args.global, opts, &HttpDownloader::new(), &*log)
        }
        Command::Version => {
            commands::version::run();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log.error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
