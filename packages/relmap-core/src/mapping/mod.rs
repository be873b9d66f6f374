//! User-authored mappings and their name-based registry.

pub mod declarative;
pub mod discovery;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, RwLock};

pub use declarative::{CharacteristicSpec, DeclarativeMapping, FieldSpec};
pub use discovery::{discover, DiscoveredMapping};

use crate::error::{MetadataError, Result};
use crate::metadata::MetadataBuilder;

/// Populates the metadata builder for one class.
pub trait Mapping: fmt::Debug + Send + Sync {
    /// Class the mapping describes.
    fn class(&self) -> &str;

    fn map(&self, builder: &mut MetadataBuilder);
}

type MappingFactory = Arc<dyn Fn() -> Arc<dyn Mapping> + Send + Sync>;

/// Mappings registered under a name, instantiated on demand.
#[derive(Default)]
pub struct MappingRegistry {
    factories: RwLock<BTreeMap<String, MappingFactory>>,
}

impl fmt::Debug for MappingRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappingRegistry")
            .field("names", &self.names())
            .finish()
    }
}

impl MappingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a mapping type constructed through `Default`.
    pub fn register<M>(&self, name: impl Into<String>) -> Result<()>
    where
        M: Mapping + Default + 'static,
    {
        self.register_factory(name, || Arc::new(M::default()) as Arc<dyn Mapping>)
    }

    pub fn register_factory<F>(&self, name: impl Into<String>, factory: F) -> Result<()>
    where
        F: Fn() -> Arc<dyn Mapping> + Send + Sync + 'static,
    {
        let name = name.into();
        let mut factories = self
            .factories
            .write()
            .map_err(|_| MetadataError::LockPoisoned)?;

        tracing::debug!(name = %name, "Registered mapping");
        factories.insert(name, Arc::new(factory));
        Ok(())
    }

    /// Registers an existing mapping instance, shared by every lookup.
    pub fn register_instance(&self, name: impl Into<String>, mapping: Arc<dyn Mapping>) -> Result<()> {
        self.register_factory(name, move || mapping.clone())
    }

    /// Instantiates the mapping registered under `name`.
    pub fn create(&self, name: &str) -> Option<Arc<dyn Mapping>> {
        let factory = {
            let factories = self.factories.read().ok()?;
            factories.get(name).cloned()?
        };
        Some(factory())
    }

    pub fn contains(&self, name: &str) -> bool {
        match self.factories.read() {
            Ok(factories) => factories.contains_key(name),
            Err(_) => false,
        }
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        match self.factories.read() {
            Ok(factories) => factories.keys().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct TagMapping;

    impl Mapping for TagMapping {
        fn class(&self) -> &str {
            "App\\Tag"
        }

        fn map(&self, builder: &mut MetadataBuilder) {
            builder.string("label");
        }
    }

    #[test]
    fn test_registry_creates_by_name() {
        let registry = MappingRegistry::new();
        registry.register::<TagMapping>("tags").unwrap();

        assert!(registry.contains("tags"));
        assert_eq!(registry.create("tags").map(|m| m.class().to_string()), Some("App\\Tag".to_string()));
        assert!(registry.create("missing").is_none());
        assert_eq!(registry.names(), vec!["tags".to_string()]);
    }

    #[test]
    fn test_instances_are_shared() {
        let registry = MappingRegistry::new();
        let mapping: Arc<dyn Mapping> = Arc::new(TagMapping);
        registry.register_instance("tags", mapping.clone()).unwrap();

        let created = registry.create("tags").unwrap();
        assert!(Arc::ptr_eq(&created, &mapping));
    }
}
