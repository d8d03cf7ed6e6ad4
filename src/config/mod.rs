//! Configuration loading and resolution.
//!
//! A run reads one document (bundled, local or remote), parses it into an
//! ordered tree, scopes it to the host OS and merges the `All` defaults and
//! caller overrides into a [`WorkerPlan`].
pub mod document;
pub mod overrides;
pub mod resolver;
pub mod source;

pub use document::DocumentFormat;
pub use overrides::OverrideSet;
pub use resolver::{WorkerEntry, WorkerPlan, resolve};
pub use source::ConfigLocation;

use crate::download::Downloader;
use crate::error::ConfigError;
use crate::logging::Log;
use crate::platform::Os;

/// Fetch, parse and resolve the configuration at `location` for `os`.
///
/// # Errors
///
/// Returns any [`ConfigError`] raised while fetching, parsing, scoping or
/// merging the document.
pub fn load_plan(
    location: &ConfigLocation,
    os: Os,
    overrides: &OverrideSet,
    downloader: &dyn Downloader,
    log: &dyn Log,
) -> Result<WorkerPlan, ConfigError> {
    let text = source::fetch(location, downloader, log)?;
    let document = document::parse(&text, location.format(), &location.to_string())?;
    let plan = resolve(&document, os, overrides)?;
    log.debug(&format!(
        "resolved {} worker(s) for {os}: {}",
        plan.entries().len(),
        plan.names().join(", ")
    ));
    Ok(plan)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::download::test_helpers::StubDownloader;
    use crate::logging::Logger;

    #[test]
    fn load_plan_resolves_bundled_config_for_linux() {
        let log = Logger::new(None);
        let plan = load_plan(
            &ConfigLocation::Bundled,
            Os::Linux,
            &OverrideSet::new(),
            &StubDownloader::new(),
            &log,
        )
        .unwrap();
        assert_eq!(plan.names(), vec!["Yum"]);
    }

    #[test]
    fn load_plan_resolves_bundled_config_for_windows() {
        let log = Logger::new(None);
        let plan = load_plan(
            &ConfigLocation::Bundled,
            Os::Windows,
            &OverrideSet::new(),
            &StubDownloader::new(),
            &log,
        )
        .unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn load_plan_reads_remote_toml() {
        let log = Logger::new(None);
        let url = "https://example.com/site.toml";
        let stub = StubDownloader::new().with(url, "[Linux.Yum.Parameters]\nrepositories = []\n");
        let plan = load_plan(
            &ConfigLocation::Url(url.to_string()),
            Os::Linux,
            &OverrideSet::new(),
            &stub,
            &log,
        )
        .unwrap();
        assert_eq!(plan.names(), vec!["Yum"]);
    }

    #[test]
    fn load_plan_reports_empty_remote_document() {
        let log = Logger::new(None);
        let url = "https://example.com/empty.yaml";
        let stub = StubDownloader::new().with(url, "");
        let err = load_plan(
            &ConfigLocation::Url(url.to_string()),
            Os::Linux,
            &OverrideSet::new(),
            &stub,
            &log,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { ref location, .. } if location == url));
    }
}
