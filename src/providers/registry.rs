/*!
 * Name-keyed registry of provider constructors.
 *
 * The registry is filled once during start-up (see
 * [`super::register_builtin_providers`]) and only read afterwards.
 */

use log::debug;
use std::fmt;

use super::Provider;
use crate::app_config::ProviderConfig;
use crate::errors::{ProviderError, RegistryError};

/// Constructor stored under a registry key
pub type ProviderFactory =
    Box<dyn Fn(&ProviderConfig) -> Result<Box<dyn Provider>, ProviderError> + Send + Sync>;

/// Mapping from provider name to constructor, in registration order
#[derive(Default)]
pub struct ProviderRegistry {
    factories: Vec<(String, ProviderFactory)>,
}

impl ProviderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in providers
    pub fn with_builtin_providers() -> Self {
        let mut registry = Self::new();
        super::register_builtin_providers(&mut registry);
        registry
    }

    /// Store a constructor under `name`, replacing any previous one
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&ProviderConfig) -> Result<Box<dyn Provider>, ProviderError> + Send + Sync + 'static,
    {
        let name = name.into();
        let factory: ProviderFactory = Box::new(factory);
        match self.factories.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => {
                debug!("Replacing provider '{}'", name);
                slot.1 = factory;
            }
            None => {
                debug!("Registering provider '{}'", name);
                self.factories.push((name, factory));
            }
        }
    }

    /// Instantiate the provider registered under `name`
    pub fn create(&self, name: &str, config: &ProviderConfig) -> Result<Box<dyn Provider>, RegistryError> {
        let factory = self.factory(name)?;
        factory(config).map_err(|source| RegistryError::Construction {
            name: name.to_string(),
            source,
        })
    }

    /// Registered names, in registration order
    pub fn available(&self) -> Vec<String> {
        self.factories.iter().map(|(key, _)| key.clone()).collect()
    }

    /// True if `name` is registered
    pub fn contains(&self, name: &str) -> bool {
        self.factories.iter().any(|(key, _)| key == name)
    }

    /// Fail with `ProviderNotFound` unless `name` is registered
    pub fn ensure_registered(&self, name: &str) -> Result<(), RegistryError> {
        self.factory(name).map(|_| ())
    }

    fn factory(&self, name: &str) -> Result<&ProviderFactory, RegistryError> {
        self.factories
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, factory)| factory)
            .ok_or_else(|| RegistryError::ProviderNotFound {
                name: name.to_string(),
                available: self.available(),
            })
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.available())
            .finish()
    }
}
