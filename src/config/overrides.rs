//! Caller-supplied parameter overrides.
use serde_json::{Map, Value};

use crate::error::ConfigError;

/// String parameters that replace worker parameters of the same name.
///
/// Built from the named CLI arguments and the trailing `key value` list.
/// Keys keep insertion order; a later insert of the same key wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideSet {
    values: Map<String, Value>,
}

impl OverrideSet {
    /// Create an empty override set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an override set from named arguments followed by a flat
    /// `key value ...` list.
    ///
    /// Named arguments whose value is `None` are dropped.  Leading `-`
    /// characters are stripped from the extra keys, so `--arg1 v` becomes
    /// `arg1 = v`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::OddOverrides`] if `extra` has an odd number of
    /// items.
    pub fn from_args(
        named: &[(&str, Option<String>)],
        extra: &[String],
    ) -> Result<Self, ConfigError> {
        if extra.len() % 2 != 0 {
            return Err(ConfigError::OddOverrides { count: extra.len() });
        }
        let mut set = Self::new();
        for (key, value) in named {
            set.insert(key, value.clone());
        }
        for pair in extra.chunks_exact(2) {
            if let [key, value] = pair {
                set.insert(key.trim_start_matches('-'), Some(value.clone()));
            }
        }
        Ok(set)
    }

    /// Insert `key`; a `None` value is ignored.
    pub fn insert(&mut self, key: &str, value: Option<String>) {
        if let Some(value) = value {
            self.values.insert(key.to_string(), Value::String(value));
        }
    }

    /// Return the override for `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    /// Return `true` if there are no overrides.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of overrides.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Overwrite the matching top-level keys of `parameters`.
    pub fn apply_to(&self, parameters: &mut Map<String, Value>) {
        for (key, value) in &self.values {
            parameters.insert(key.clone(), value.clone());
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use serde_json::json;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn from_args_drops_absent_named_values() {
        let set = OverrideSet::from_args(
            &[
                ("saltstates", Some("highstate".to_string())),
                ("oupath", None),
            ],
            &[],
        )
        .unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("saltstates"), Some("highstate"));
        assert_eq!(set.get("oupath"), None);
    }

    #[test]
    fn from_args_strips_leading_dashes() {
        let set =
            OverrideSet::from_args(&[], &strings(&["--arg1", "v1", "-arg2", "v2", "arg3", "v3"]))
                .unwrap();
        assert_eq!(set.get("arg1"), Some("v1"));
        assert_eq!(set.get("arg2"), Some("v2"));
        assert_eq!(set.get("arg3"), Some("v3"));
    }

    #[test]
    fn from_args_rejects_odd_length() {
        let err = OverrideSet::from_args(&[], &strings(&["--a", "1", "--b"])).unwrap_err();
        assert!(matches!(err, ConfigError::OddOverrides { count: 3 }));
    }

    #[test]
    fn extra_arguments_win_over_named() {
        let set = OverrideSet::from_args(
            &[("entenv", Some("dev".to_string()))],
            &strings(&["--entenv", "prod"]),
        )
        .unwrap();
        assert_eq!(set.get("entenv"), Some("prod"));
    }

    #[test]
    fn apply_to_replaces_top_level_keys_only() {
        let mut params = json!({"a": 1, "b": {"nested": true}})
            .as_object()
            .unwrap()
            .clone();
        let mut set = OverrideSet::new();
        set.insert("b", Some("4".to_string()));
        set.insert("c", Some("new".to_string()));
        set.apply_to(&mut params);
        assert_eq!(Value::Object(params), json!({"a": 1, "b": "4", "c": "new"}));
    }

    #[test]
    fn empty_set() {
        let set = OverrideSet::new();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
    }
}
