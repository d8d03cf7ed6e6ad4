//! Yum repository worker: place the `.repo` definitions that apply to the
//! detected distribution into the yum repository directory.
use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::config::document::kind;
use crate::download::{file_name_from_url, sha256_hex};
use crate::error::RepoError;

use super::distro::DistributionIdentity;
use super::{Context, Worker, WorkerResult};

/// Parameter holding the list of repository definitions.
const REPOSITORIES_KEY: &str = "repositories";

/// Legacy spelling of [`REPOSITORIES_KEY`].
const REPOSITORIES_ALIAS: &str = "yumrepomap";

/// `dist` value that matches every distribution.
const ANY_DIST: &str = "all";

/// One yum repository definition file to install.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepoDefinition {
    /// Distribution family the definition applies to, or `all`.
    pub dist: String,
    /// EPEL major version the definition applies to; absent matches any.
    #[serde(default, deserialize_with = "epel_version")]
    pub epel_version: Option<String>,
    /// Location of the `.repo` file.
    pub url: String,
}

impl RepoDefinition {
    /// Why this definition does not apply to `identity`, or `None` if it does.
    #[must_use]
    pub fn exclusion(&self, identity: &DistributionIdentity) -> Option<String> {
        if self.dist != ANY_DIST && self.dist != identity.family.as_str() {
            return Some(format!(
                "dist '{}' does not match '{}'",
                self.dist, identity.family
            ));
        }
        match &self.epel_version {
            Some(epel) if *epel != identity.epel_release => Some(format!(
                "epel_version '{epel}' does not match '{}'",
                identity.epel_release
            )),
            _ => None,
        }
    }
}

/// Accept `epel_version` as either a string or a number.
fn epel_version<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "epel_version must be a string or a number, found {}",
            kind(&other)
        ))),
    }
}

/// Read the repository list from worker parameters.
///
/// Returns `Ok(None)` when the list is absent, null or empty.
///
/// # Errors
///
/// Returns [`RepoError::Definition`] if the value is not a list or an item
/// is not a valid definition.
pub fn repo_definitions(
    parameters: &Map<String, Value>,
) -> Result<Option<Vec<RepoDefinition>>, RepoError> {
    let value = parameters
        .get(REPOSITORIES_KEY)
        .or_else(|| parameters.get(REPOSITORIES_ALIAS));
    let items = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Array(items)) if items.is_empty() => return Ok(None),
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(RepoError::Definition {
                reason: format!("{REPOSITORIES_KEY} must be a list, found {}", kind(other)),
            });
        }
    };
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            RepoDefinition::deserialize(item).map_err(|e| RepoError::Definition {
                reason: format!("entry {}: {e}", index + 1),
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

/// Installs yum repository definition files selected by distribution.
#[derive(Debug, Default, Clone, Copy)]
pub struct YumRepoWorker;

impl YumRepoWorker {
    /// Registry name.
    pub const NAME: &'static str = "Yum";

    /// Pick the definitions that apply to `identity` and compute where each
    /// will be written.
    fn select(
        ctx: &Context,
        identity: &DistributionIdentity,
        definitions: &[RepoDefinition],
        repo_dir: &Path,
    ) -> Result<Vec<(String, PathBuf)>, RepoError> {
        let mut selected = Vec::new();
        for definition in definitions {
            if let Some(reason) = definition.exclusion(identity) {
                ctx.log
                    .debug(&format!("skipping {}: {reason}", definition.url));
                continue;
            }
            let file_name =
                file_name_from_url(&definition.url).ok_or_else(|| RepoError::Definition {
                    reason: format!("url '{}' does not name a file", definition.url),
                })?;
            selected.push((definition.url.clone(), repo_dir.join(file_name)));
        }
        Ok(selected)
    }
}

impl Worker for YumRepoWorker {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn install(&self, ctx: &Context, parameters: &Map<String, Value>) -> Result<WorkerResult> {
        let profile = &ctx.profile;
        let (Some(release_file), Some(repo_dir)) = (&profile.release_file, &profile.repo_dir)
        else {
            return Err(anyhow!(
                "yum repositories cannot be managed on {}",
                profile.os
            ));
        };

        let identity = DistributionIdentity::detect(release_file)?;
        ctx.log.info(&format!(
            "detected {} {} (EPEL {})",
            identity.family, identity.version, identity.epel_release
        ));

        let Some(definitions) = repo_definitions(parameters)? else {
            ctx.log.info("no repositories configured, nothing to do");
            return Ok(WorkerResult::Skipped("nothing to do".to_string()));
        };

        let selected = Self::select(ctx, &identity, &definitions, repo_dir)?;
        if selected.is_empty() {
            return Ok(WorkerResult::Skipped(format!(
                "no repository applies to {} (EPEL {})",
                identity.family, identity.epel_release
            )));
        }

        for (url, dest) in &selected {
            if ctx.dry_run {
                ctx.log
                    .dry_run(&format!("would install {url} -> {}", dest.display()));
                continue;
            }
            let body = ctx.downloader.get(url).map_err(RepoError::from)?;
            std::fs::write(dest, &body).map_err(|source| RepoError::Write {
                path: dest.clone(),
                source,
            })?;
            ctx.log.info(&format!("installed {}", dest.display()));
            ctx.log.debug(&format!(
                "{}: {} bytes, sha256 {}",
                dest.display(),
                body.len(),
                sha256_hex(&body)
            ));
        }

        Ok(if ctx.dry_run {
            WorkerResult::DryRun
        } else {
            WorkerResult::Ok
        })
    }
}
