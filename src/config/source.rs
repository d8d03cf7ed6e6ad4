//! Locating and retrieving the raw configuration document.
use std::fmt;
use std::path::PathBuf;

use crate::download::{Downloader, is_url, sha256_hex};
use crate::error::ConfigError;
use crate::logging::Log;

use super::document::DocumentFormat;

/// Default configuration compiled into the binary.
pub const BUNDLED_CONFIG: &str = include_str!("../../static/config.yaml");

/// Where the configuration document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigLocation {
    /// The default document shipped with the binary.
    Bundled,
    /// An `http` or `https` URL.
    Url(String),
    /// A local filesystem path.
    Path(PathBuf),
}

impl ConfigLocation {
    /// Classify a `--config` argument; `None` selects the bundled document.
    #[must_use]
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            None => Self::Bundled,
            Some(s) if is_url(s) => Self::Url(s.to_string()),
            Some(s) => Self::Path(PathBuf::from(s)),
        }
    }

    /// Document format implied by the location (TOML for a `.toml` suffix).
    #[must_use]
    pub fn format(&self) -> DocumentFormat {
        match self {
            Self::Bundled => DocumentFormat::Yaml,
            Self::Url(url) => DocumentFormat::from_name(url),
            Self::Path(path) => DocumentFormat::from_name(&path.to_string_lossy()),
        }
    }
}

impl fmt::Display for ConfigLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bundled => f.write_str("<bundled>"),
            Self::Url(url) => f.write_str(url),
            Self::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Retrieve the raw text of the configuration document at `location`.
///
/// # Errors
///
/// Returns [`ConfigError::Fetch`] if a URL cannot be retrieved,
/// [`ConfigError::NotFound`] for a missing local path and
/// [`ConfigError::Io`] if a local file cannot be read.
pub fn fetch(
    location: &ConfigLocation,
    downloader: &dyn Downloader,
    log: &dyn Log,
) -> Result<String, ConfigError> {
    let text = match location {
        ConfigLocation::Bundled => {
            log.warn("no config given, using the default config");
            BUNDLED_CONFIG.to_string()
        }
        ConfigLocation::Url(url) => {
            log.info(&format!("fetching config from {url}"));
            downloader
                .get_text(url)
                .map_err(|source| ConfigError::Fetch {
                    url: url.clone(),
                    source,
                })?
        }
        ConfigLocation::Path(path) => {
            if !path.exists() {
                return Err(ConfigError::NotFound { path: path.clone() });
            }
            let shown = dunce::canonicalize(path).unwrap_or_else(|_| path.clone());
            log.info(&format!("reading config from {}", shown.display()));
            std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.clone(),
                source,
            })?
        }
    };
    log.debug(&format!(
        "config {location}: {} bytes, sha256 {}",
        text.len(),
        sha256_hex(text.as_bytes())
    ));
    Ok(text)
}
