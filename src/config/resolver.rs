//! Scoping a parsed document to one OS and merging parameter layers.
use serde_json::{Map, Value};

use crate::error::ConfigError;
use crate::platform::Os;

use super::document::kind;
use super::overrides::OverrideSet;

/// Section whose entries provide defaults to every OS section.
pub const GLOBAL_SCOPE: &str = "All";

/// Key holding a worker entry's parameter mapping.
const PARAMETERS_KEY: &str = "Parameters";

/// Lower-case spelling accepted for [`PARAMETERS_KEY`].
const PARAMETERS_ALIAS: &str = "parameters";

/// One worker to run, with its fully merged parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkerEntry {
    name: String,
    parameters: Map<String, Value>,
}

impl WorkerEntry {
    /// Worker name as written in the document.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Merged parameters.
    #[must_use]
    pub const fn parameters(&self) -> &Map<String, Value> {
        &self.parameters
    }
}

/// Ordered list of workers resolved for one OS.
///
/// Document order is execution order.  The plan is immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkerPlan {
    os: Os,
    entries: Vec<WorkerEntry>,
}

impl WorkerPlan {
    /// OS the plan was resolved for.
    #[must_use]
    pub const fn os(&self) -> Os {
        self.os
    }

    /// Entries in execution order.
    #[must_use]
    pub fn entries(&self) -> &[WorkerEntry] {
        &self.entries
    }

    /// Worker names in execution order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(WorkerEntry::name).collect()
    }

    /// Return `true` if the plan schedules no workers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the plan back into document shape:
    /// `{<os>: {<worker>: {Parameters: {...}}}}`.
    #[must_use]
    pub fn to_document(&self) -> Value {
        let workers: Map<String, Value> = self
            .entries
            .iter()
            .map(|entry| {
                let mut body = Map::new();
                body.insert(
                    PARAMETERS_KEY.to_string(),
                    Value::Object(entry.parameters.clone()),
                );
                (entry.name.clone(), Value::Object(body))
            })
            .collect();
        let mut root = Map::new();
        root.insert(self.os.config_key().to_string(), Value::Object(workers));
        Value::Object(root)
    }
}

/// Resolve the worker plan for `os` from a parsed `document`.
///
/// For each entry of the OS section, parameters of the same-named `All`
/// entry fill in keys the OS entry does not set, then `overrides` replace
/// matching keys.  Entries only present under `All` are not scheduled.
/// The document itself is never modified.
///
/// # Errors
///
/// Returns [`ConfigError::Scope`] if the document has no section for `os`,
/// and [`ConfigError::Merge`] if a section or entry is malformed.
pub fn resolve(
    document: &Map<String, Value>,
    os: Os,
    overrides: &OverrideSet,
) -> Result<WorkerPlan, ConfigError> {
    let os_key = os.config_key();
    let Some(section) = document.get(os_key) else {
        return Err(ConfigError::Scope {
            os: os_key.to_string(),
            available: document.keys().cloned().collect::<Vec<_>>().join(", "),
        });
    };

    let section = section_entries(os_key, section)?;
    let global = match document.get(GLOBAL_SCOPE) {
        Some(value) => section_entries(GLOBAL_SCOPE, value)?,
        None => None,
    };

    let mut entries = Vec::new();
    for (name, body) in section.into_iter().flatten() {
        let mut parameters = entry_parameters(name, body)?.clone();
        if let Some(defaults) = global.and_then(|g| g.get(name)) {
            for (key, value) in entry_parameters(name, defaults)? {
                if !parameters.contains_key(key) {
                    parameters.insert(key.clone(), value.clone());
                }
            }
        }
        overrides.apply_to(&mut parameters);
        entries.push(WorkerEntry {
            name: name.clone(),
            parameters,
        });
    }

    Ok(WorkerPlan { os, entries })
}

/// Return a section's entries; a null section has none.
fn section_entries<'a>(
    key: &str,
    value: &'a Value,
) -> Result<Option<&'a Map<String, Value>>, ConfigError> {
    match value {
        Value::Object(map) => Ok(Some(map)),
        Value::Null => Ok(None),
        other => Err(ConfigError::Merge {
            entry: key.to_string(),
            reason: format!("section must be a mapping of workers, found {}", kind(other)),
        }),
    }
}

/// Return the parameter mapping of a worker entry body.
fn entry_parameters<'a>(
    name: &str,
    body: &'a Value,
) -> Result<&'a Map<String, Value>, ConfigError> {
    let merge_error = |reason: String| ConfigError::Merge {
        entry: name.to_string(),
        reason,
    };
    let Value::Object(body) = body else {
        return Err(merge_error(format!(
            "entry must be a mapping, found {}",
            kind(body)
        )));
    };
    match body.get(PARAMETERS_KEY).or_else(|| body.get(PARAMETERS_ALIAS)) {
        Some(Value::Object(parameters)) => Ok(parameters),
        Some(other) => Err(merge_error(format!(
            "{PARAMETERS_KEY} must be a mapping, found {}",
            kind(other)
        ))),
        None => Err(merge_error(format!("{PARAMETERS_KEY} is missing"))),
    }
}
