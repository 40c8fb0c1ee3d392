//! Name-to-backend lookup.
//!
//! Scenarios and the CLI pick a backend by name (`statevector_simulator`,
//! `qasm_simulator`); the [`BackendRegistry`] turns that name plus a
//! [`BackendConfig`] into a live backend.

use std::collections::BTreeMap;

use tracing::debug;

use crate::backend::{Backend, BackendConfig, BackendFactory};
use crate::error::{HalError, HalResult};

type Constructor = Box<dyn Fn(BackendConfig) -> HalResult<Box<dyn Backend>> + Send + Sync>;

/// Registered backend constructors, ordered by name.
#[derive(Default)]
pub struct BackendRegistry {
    constructors: BTreeMap<String, Constructor>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `B` under `name`, replacing any earlier entry.
    pub fn register<B>(&mut self, name: impl Into<String>)
    where
        B: BackendFactory + 'static,
    {
        self.register_with(name, |config| {
            B::from_config(config).map(|b| Box::new(b) as Box<dyn Backend>)
        });
    }

    /// Register a constructor closure under `name`.
    pub fn register_with(
        &mut self,
        name: impl Into<String>,
        constructor: impl Fn(BackendConfig) -> HalResult<Box<dyn Backend>> + Send + Sync + 'static,
    ) {
        let name = name.into();
        debug!(backend = %name, "registered");
        self.constructors.insert(name, Box::new(constructor));
    }

    /// Build the backend registered under `name`.
    pub fn create(&self, name: &str, config: BackendConfig) -> HalResult<Box<dyn Backend>> {
        let constructor = self.constructors.get(name).ok_or_else(|| {
            HalError::UnknownBackend(format!(
                "'{name}' (registered: {})",
                self.available_backends().join(", ")
            ))
        })?;
        constructor(config)
    }

    /// Registered names in sorted order.
    pub fn available_backends(&self) -> Vec<String> {
        self.constructors.keys().cloned().collect()
    }

    pub fn has_backend(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refuse(_: BackendConfig) -> HalResult<Box<dyn Backend>> {
        Err(HalError::Configuration("refused".into()))
    }

    #[test]
    fn test_names_are_sorted() {
        let mut registry = BackendRegistry::new();
        assert!(registry.available_backends().is_empty());
        registry.register_with("qasm_simulator", refuse);
        registry.register_with("aer", refuse);
        assert_eq!(registry.available_backends(), vec!["aer", "qasm_simulator"]);
        assert!(registry.has_backend("aer"));
    }

    #[test]
    fn test_constructor_error_propagates() {
        let mut registry = BackendRegistry::new();
        registry.register_with("broken", refuse);
        let err = registry.create("broken", BackendConfig::new("broken"));
        assert!(matches!(err, Err(HalError::Configuration(_))));
    }

    #[test]
    fn test_unknown_name_lists_registered() {
        let mut registry = BackendRegistry::new();
        registry.register_with("qasm_simulator", refuse);
        match registry.create("ibmq_16", BackendConfig::new("ibmq_16")) {
            Err(HalError::UnknownBackend(msg)) => assert!(msg.contains("qasm_simulator")),
            _ => panic!("expected UnknownBackend"),
        }
    }
}
