//! HTTP retrieval for remote configuration documents and repository files.
//!
//! Callers depend on the [`Downloader`] trait so that tests can substitute
//! canned responses; production code uses [`HttpDownloader`].

use std::io::Read as _;

use thiserror::Error;

/// A failed HTTP retrieval.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("GET {url} failed: {reason}")]
pub struct DownloadError {
    /// URL that was requested.
    pub url: String,
    /// Transport or status diagnostic.
    pub reason: String,
}

impl DownloadError {
    /// Build a download error for `url`.
    #[must_use]
    pub fn new(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            reason: reason.into(),
        }
    }
}

/// Abstraction over blocking HTTP GET requests.
pub trait Downloader: Send + Sync + std::fmt::Debug {
    /// Fetch `url` and return the response body.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    fn get(&self, url: &str) -> Result<Vec<u8>, DownloadError>;

    /// Fetch `url` and return the response body decoded as UTF-8.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, or a
    /// body that is not valid UTF-8.
    fn get_text(&self, url: &str) -> Result<String, DownloadError> {
        let bytes = self.get(url)?;
        String::from_utf8(bytes)
            .map_err(|e| DownloadError::new(url, format!("response is not UTF-8: {e}")))
    }
}

/// Production [`Downloader`] backed by a shared [`ureq::Agent`].
///
/// No timeout is configured; a blocked fetch blocks the run.
#[derive(Debug)]
pub struct HttpDownloader {
    agent: ureq::Agent,
}

impl HttpDownloader {
    /// Create a downloader with a default agent.
    #[must_use]
    pub fn new() -> Self {
        Self {
            agent: ureq::Agent::new_with_defaults(),
        }
    }
}

impl Default for HttpDownloader {
    fn default() -> Self {
        Self::new()
    }
}

impl Downloader for HttpDownloader {
    fn get(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        let mut response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| DownloadError::new(url, e.to_string()))?;
        let mut body = Vec::new();
        response
            .body_mut()
            .as_reader()
            .read_to_end(&mut body)
            .map_err(|e| DownloadError::new(url, format!("reading response body: {e}")))?;
        Ok(body)
    }
}

/// Return `true` if `location` is an `http` or `https` URL.
#[must_use]
pub fn is_url(location: &str) -> bool {
    location
        .split_once("://")
        .is_some_and(|(scheme, rest)| {
            !rest.is_empty()
                && (scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https"))
        })
}

/// Return the final path segment of `url`, ignoring any query or fragment.
///
/// Returns `None` when the URL ends in `/` or has no path.
#[must_use]
pub fn file_name_from_url(url: &str) -> Option<&str> {
    let without_fragment = url.split('#').next().unwrap_or(url);
    let without_query = without_fragment
        .split('?')
        .next()
        .unwrap_or(without_fragment);
    let path = without_query
        .split_once("://")
        .map_or(without_query, |(_, rest)| rest);
    let (_, path) = path.split_once('/')?;
    path.rsplit('/').next().filter(|segment| !segment.is_empty())
}

/// Compute the lowercase hex SHA-256 digest of `bytes`.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    use sha2::{Digest, Sha256};
    use std::fmt::Write as _;

    let digest = Sha256::digest(bytes);
    let mut hex = String::with_capacity(64);
    for b in digest {
        write!(hex, "{b:02x}").unwrap_or(());
    }
    hex
}
