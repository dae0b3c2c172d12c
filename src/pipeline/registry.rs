//! Name-addressable factories for middlewares and handlers.
//!
//! A [`Registry`] is built once at start-up and passed explicitly into
//! resolution. It is never mutated while serving, so lookups need no
//! locking.

use std::collections::BTreeMap;

use crate::config::Settings;
use crate::error::ComponentError;

pub type Factory<T> = Box<dyn Fn(&Settings) -> Result<T, ComponentError> + Send + Sync>;

pub struct Registry<T> {
    factories: BTreeMap<&'static str, Factory<T>>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Registry<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Register `factory` under `name`, replacing any previous entry.
    pub fn register<F>(&mut self, name: &'static str, factory: F) -> &mut Self
    where
        F: Fn(&Settings) -> Result<T, ComponentError> + Send + Sync + 'static,
    {
        self.factories.insert(name, Box::new(factory));
        self
    }

    #[must_use]
    pub fn with<F>(mut self, name: &'static str, factory: F) -> Self
    where
        F: Fn(&Settings) -> Result<T, ComponentError> + Send + Sync + 'static,
    {
        self.register(name, factory);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Factory<T>> {
        self.factories.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.keys().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

/// Factory for components that take no settings: every call yields a clone
/// of `value` and any settings given are ignored.
pub fn no_config<T>(value: T) -> impl Fn(&Settings) -> Result<T, ComponentError> + Send + Sync
where
    T: Clone + Send + Sync + 'static,
{
    move |_settings| Ok(value.clone())
}
