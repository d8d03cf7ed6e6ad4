#![allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
//! Integration tests for the `plan` command: resolution of the configuration
//! document into the YAML plan a run would execute.

mod common;

use common::TestContextBuilder;
use watchmaker::cli::{PlanOpts, WorkerArgs};
use watchmaker::commands::plan;
use watchmaker::config::document::{DocumentFormat, parse};
use watchmaker::config::{OverrideSet, resolve};
use watchmaker::logging::Logger;
use watchmaker::platform::Os;

const LAYERED: &str = "All:
  Zeta:
    Parameters:
      level: all
      shared: from-all
  OnlyGlobal:
    Parameters:
      ignored: true
Linux:
  Zeta:
    Parameters:
      level: linux
  Alpha:
    Parameters:
      retries: 3
Windows: {}
";

/// Snapshot of a merged plan: OS keys keep their place, `All` fills the
/// gaps, overrides land last and `All`-only entries are dropped.
#[test]
fn layered_plan_snapshot() {
    let document = parse(LAYERED, DocumentFormat::Yaml, "layered.yaml").unwrap();
    let overrides = OverrideSet::from_args(
        &WorkerArgs {
            environment: Some("prod".to_string()),
            ..WorkerArgs::default()
        }
        .named(),
        &[],
    )
    .unwrap();
    let resolved = resolve(&document, Os::Linux, &overrides).unwrap();

    insta::assert_snapshot!(plan::render(&resolved).unwrap(), @r"
    Linux:
      Zeta:
        Parameters:
          level: linux
          shared: from-all
          entenv: prod
      Alpha:
        Parameters:
          retries: 3
          entenv: prod
    ");
}

#[test]
fn plan_for_other_os_uses_its_section() {
    let ctx = TestContextBuilder::new()
        .with_config("Linux:\n  Yum:\n    Parameters: {}\nWindows:\n  Yum:\n    Parameters: {}\n")
        .build();
    let log = Logger::new(None);

    let resolved = plan::resolve(
        &ctx.global(),
        &PlanOpts::default(),
        Os::Windows,
        ctx.downloader.as_ref(),
        &log,
    )
    .unwrap();

    assert_eq!(resolved.os(), Os::Windows);
    assert_eq!(resolved.names(), vec!["Yum"]);
}

#[test]
fn plan_missing_section_names_available_keys() {
    let ctx = TestContextBuilder::new()
        .with_config("Linux:\n  Yum:\n    Parameters: {}\n")
        .build();
    let log = Logger::new(None);

    let err = plan::resolve(
        &ctx.global(),
        &PlanOpts::default(),
        Os::Windows,
        ctx.downloader.as_ref(),
        &log,
    )
    .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Configuration error: config has no 'Windows' section (found: Linux)"
    );
}

#[test]
fn plan_from_toml_document() {
    let ctx = TestContextBuilder::new().build();
    let path = ctx.root_path().join("site.toml");
    std::fs::write(
        &path,
        "[Linux.Yum.Parameters]\nrepositories = [{ dist = \"all\", url = \"https://r.example.com/a.repo\" }]\n",
    )
    .unwrap();
    let global = watchmaker::cli::GlobalOpts {
        config: Some(path.to_string_lossy().to_string()),
        log_dir: None,
    };
    let log = Logger::new(None);

    let resolved = plan::resolve(
        &global,
        &PlanOpts::default(),
        Os::Linux,
        ctx.downloader.as_ref(),
        &log,
    )
    .unwrap();

    let params = resolved.entries()[0].parameters();
    assert_eq!(params["repositories"][0]["dist"], "all");
}
