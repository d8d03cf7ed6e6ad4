//! Linux distribution detection from the release-identification file.
use std::fmt;
use std::path::Path;

use regex::Regex;

use crate::error::RepoError;

/// Family, separator and `major.minor` version at the start of the release line.
const RELEASE_PATTERN: &str = r"^(amazon|centos|red hat)[^0-9]+([0-9]+\.[0-9]+)";

/// Amazon Linux releases and the EPEL family each one tracks.
const AMAZON_EPEL_RELEASES: &[(&str, &str)] = &[
    ("2014.03", "6"),
    ("2014.09", "6"),
    ("2015.03", "6"),
    ("2015.09", "6"),
];

/// Supported distribution families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistroFamily {
    /// Amazon Linux.
    Amazon,
    /// `CentOS`.
    Centos,
    /// Red Hat Enterprise Linux.
    Redhat,
}

impl DistroFamily {
    /// Lower-case name as used in repository definitions.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Amazon => "amazon",
            Self::Centos => "centos",
            Self::Redhat => "redhat",
        }
    }

    fn from_captured(name: &str) -> Option<Self> {
        match name.replace(' ', "").as_str() {
            "amazon" => Some(Self::Amazon),
            "centos" => Some(Self::Centos),
            "redhat" => Some(Self::Redhat),
            _ => None,
        }
    }
}

impl fmt::Display for DistroFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detected distribution and the EPEL release family it is compatible with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributionIdentity {
    /// Distribution family.
    pub family: DistroFamily,
    /// `major.minor` version from the release line.
    pub version: String,
    /// EPEL major version (never empty).
    pub epel_release: String,
}

impl DistributionIdentity {
    /// Read the first line of `release_file` and identify the distribution.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::ReleaseFile`] if the file cannot be read, or any
    /// error from [`from_release_line`](Self::from_release_line).
    pub fn detect(release_file: &Path) -> Result<Self, RepoError> {
        let bytes = std::fs::read(release_file).map_err(|source| RepoError::ReleaseFile {
            path: release_file.to_path_buf(),
            source,
        })?;
        let first = bytes.split(|b| *b == b'\n').next().unwrap_or_default();
        Self::from_release_line(&String::from_utf8_lossy(first))
    }

    /// Identify the distribution from a release line such as
    /// `CentOS Linux release 7.4.1708 (Core)`.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::UnsupportedDistribution`] if the line does not
    /// name a supported family and version, and
    /// [`RepoError::UnsupportedVersion`] for an Amazon release without an
    /// EPEL mapping.
    pub fn from_release_line(line: &str) -> Result<Self, RepoError> {
        let pattern = Regex::new(RELEASE_PATTERN)?;
        let lowered = line.trim().to_lowercase();
        let unsupported = || RepoError::UnsupportedDistribution {
            line: line.trim().to_string(),
        };

        let captures = pattern.captures(&lowered).ok_or_else(unsupported)?;
        let family = captures
            .get(1)
            .and_then(|m| DistroFamily::from_captured(m.as_str()))
            .ok_or_else(unsupported)?;
        let version = captures
            .get(2)
            .map(|m| m.as_str().to_string())
            .ok_or_else(unsupported)?;

        let epel_release = match family {
            DistroFamily::Amazon => AMAZON_EPEL_RELEASES
                .iter()
                .find(|(release, _)| *release == version)
                .map(|(_, epel)| (*epel).to_string()),
            DistroFamily::Centos | DistroFamily::Redhat => version
                .split('.')
                .next()
                .filter(|major| !major.is_empty())
                .map(ToString::to_string),
        }
        .ok_or_else(|| RepoError::UnsupportedVersion {
            family: family.to_string(),
            version: version.clone(),
        })?;

        Ok(Self {
            family,
            version,
            epel_release,
        })
    }
}
