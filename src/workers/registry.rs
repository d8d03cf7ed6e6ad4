//! Mapping from configuration worker names to worker constructors.
use std::fmt;

use crate::config::WorkerPlan;
use crate::error::WorkerError;

use super::Worker;
use super::yum::YumRepoWorker;

/// Constructor for a worker.
pub type WorkerFactory = Box<dyn Fn() -> Box<dyn Worker> + Send + Sync>;

/// Explicit name → constructor table consulted by the cadence.
///
/// Names are case-sensitive and must match the keys used in the
/// configuration document.
#[derive(Default)]
pub struct WorkerRegistry {
    factories: Vec<(String, WorkerFactory)>,
}

impl fmt::Debug for WorkerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerRegistry")
            .field("names", &self.names())
            .finish()
    }
}

impl WorkerRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in worker.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(YumRepoWorker::NAME, || Box::new(YumRepoWorker));
        registry
    }

    /// Register `factory` under `name`, replacing any previous entry.
    pub fn register(
        &mut self,
        name: &str,
        factory: impl Fn() -> Box<dyn Worker> + Send + Sync + 'static,
    ) {
        self.factories.retain(|(n, _)| n != name);
        self.factories.push((name.to_string(), Box::new(factory)));
    }

    /// Registered names in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.factories.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Construct the worker registered as `name`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::Unknown`] if `name` is not registered.
    pub fn create(&self, name: &str) -> Result<Box<dyn Worker>, WorkerError> {
        self.factories
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, factory)| factory())
            .ok_or_else(|| self.unknown(name))
    }

    /// Check that every entry of `plan` names a registered worker.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::Unknown`] for the first unregistered name.
    pub fn validate(&self, plan: &WorkerPlan) -> Result<(), WorkerError> {
        for name in plan.names() {
            if !self.factories.iter().any(|(n, _)| n == name) {
                return Err(self.unknown(name));
            }
        }
        Ok(())
    }

    fn unknown(&self, name: &str) -> WorkerError {
        WorkerError::Unknown {
            name: name.to_string(),
            known: self.names().join(", "),
        }
    }
}
