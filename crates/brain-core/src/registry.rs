//! Providers by name.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::BrainError;
use crate::trait_def::Brain;

/// Named reply providers with a default.
///
/// Lookups never fall back silently: an unknown name is an error listing the
/// registered names.
#[derive(Clone)]
pub struct BrainRegistry {
    brains: IndexMap<String, Arc<dyn Brain>>,
    default: String,
}

impl BrainRegistry {
    /// An empty registry whose default provider is `default`.
    pub fn new(default: impl Into<String>) -> Self {
        Self {
            brains: IndexMap::new(),
            default: default.into(),
        }
    }

    /// Register a provider, replacing any previous one with the same name.
    pub fn register(&mut self, name: impl Into<String>, brain: Arc<dyn Brain>) {
        self.brains.insert(name.into(), brain);
    }

    /// Builder form of [`BrainRegistry::register`].
    pub fn with(mut self, name: impl Into<String>, brain: Arc<dyn Brain>) -> Self {
        self.register(name, brain);
        self
    }

    /// Look up `name`, or the default when `None`.
    pub fn get(&self, name: Option<&str>) -> Result<Arc<dyn Brain>, BrainError> {
        let name = self.resolve_name(name);
        self.brains
            .get(name)
            .cloned()
            .ok_or_else(|| BrainError::UnknownProvider {
                name: name.to_string(),
                available: self.names(),
            })
    }

    /// The name a lookup of `name` would use.
    pub fn resolve_name<'a>(&'a self, name: Option<&'a str>) -> &'a str {
        name.map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(self.default.as_str())
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> Vec<String> {
        self.brains.keys().cloned().collect()
    }

    /// Name of the default provider.
    pub fn default_name(&self) -> &str {
        &self.default
    }

    pub fn contains(&self, name: &str) -> bool {
        self.brains.contains_key(name)
    }
}

impl fmt::Debug for BrainRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrainRegistry")
            .field("providers", &self.names())
            .field("default", &self.default)
            .finish()
    }
}
