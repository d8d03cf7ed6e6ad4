//! Parsing raw configuration text into an ordered document tree.
use serde_json::{Map, Value};

use crate::error::ConfigError;

/// Serialization format of a configuration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// YAML (the default).
    Yaml,
    /// TOML, selected by a `.toml` suffix.
    Toml,
}

impl DocumentFormat {
    /// Pick the format from a path or URL; anything but `.toml` is YAML.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        let name = name.split(['?', '#']).next().unwrap_or(name);
        if name.to_ascii_lowercase().ends_with(".toml") {
            Self::Toml
        } else {
            Self::Yaml
        }
    }
}

/// Parse `text` into the top-level mapping of a configuration document.
///
/// Key order is preserved at every level. `location` only labels errors.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] if the text is empty, syntactically
/// invalid, or its top level is not a mapping.
pub fn parse(
    text: &str,
    format: DocumentFormat,
    location: &str,
) -> Result<Map<String, Value>, ConfigError> {
    let parse_error = |message: String| ConfigError::Parse {
        location: location.to_string(),
        message,
    };

    if text.trim().is_empty() {
        return Err(parse_error("document is empty".to_string()));
    }

    let value: Value = match format {
        DocumentFormat::Yaml => serde_yaml::from_str(text).map_err(|e| parse_error(e.to_string()))?,
        DocumentFormat::Toml => toml::from_str(text).map_err(|e| parse_error(e.to_string()))?,
    };

    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Err(parse_error("document is empty".to_string())),
        other => Err(parse_error(format!(
            "top level must be a mapping, found {}",
            kind(&other)
        ))),
    }
}

/// Short human-readable name of a JSON value's type.
pub(crate) const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}
