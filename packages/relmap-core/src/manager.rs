//! Registry of built entity and component metadata.

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::error::{MetadataError, Result};
use crate::mapping::{Mapping, MappingRegistry};
use crate::metadata::{BuildContext, BuiltMetadata, ComponentMetadata, EntityMetadata, MetadataBuilder};

type Snapshot<T> = ArcSwap<HashMap<String, Arc<T>>>;

/// Built metadata, keyed by class.
///
/// Registrations publish a new snapshot of the affected map, so lookups
/// never block.
#[derive(Debug)]
pub struct MetadataManager {
    context: BuildContext,
    mappings: MappingRegistry,
    entities: Snapshot<EntityMetadata>,
    components: Snapshot<ComponentMetadata>,
}

impl MetadataManager {
    pub fn new(context: BuildContext) -> Self {
        Self {
            context,
            mappings: MappingRegistry::new(),
            entities: ArcSwap::from_pointee(HashMap::new()),
            components: ArcSwap::from_pointee(HashMap::new()),
        }
    }

    pub fn context(&self) -> &BuildContext {
        &self.context
    }

    /// Name-based mapping registry used by [`map_named`](Self::map_named).
    pub fn mappings(&self) -> &MappingRegistry {
        &self.mappings
    }

    /// Stores built metadata under its class, replacing any previous entry.
    pub fn register(&self, metadata: BuiltMetadata) {
        let class = metadata.class().to_string();
        match metadata {
            BuiltMetadata::Entity(entity) => {
                self.entities.rcu(|current| {
                    let mut next = HashMap::clone(current);
                    next.insert(class.clone(), entity.clone());
                    next
                });
                tracing::debug!(class = %class, "Registered entity metadata");
            }
            BuiltMetadata::Component(component) => {
                self.components.rcu(|current| {
                    let mut next = HashMap::clone(current);
                    next.insert(class.clone(), component.clone());
                    next
                });
                tracing::debug!(class = %class, "Registered component metadata");
            }
        }
    }

    /// Builds a class from its descriptor enrichments alone and registers it.
    ///
    /// # Errors
    /// Any build failure for the class.
    pub fn register_class(&self, class: &str) -> Result<BuiltMetadata> {
        let built = self.builder(class).build()?;
        self.register(built.clone());
        Ok(built)
    }

    pub fn entity(&self, class: &str) -> Option<Arc<EntityMetadata>> {
        self.entities.load().get(class).cloned()
    }

    pub fn component(&self, class: &str) -> Option<Arc<ComponentMetadata>> {
        self.components.load().get(class).cloned()
    }

    /// Entity or component metadata for a class.
    pub fn get(&self, class: &str) -> Option<BuiltMetadata> {
        self.entity(class)
            .map(BuiltMetadata::Entity)
            .or_else(|| self.component(class).map(BuiltMetadata::Component))
    }

    pub fn has(&self, class: &str) -> bool {
        self.entities.load().contains_key(class) || self.components.load().contains_key(class)
    }

    /// Registered entity classes, sorted.
    pub fn entity_classes(&self) -> Vec<String> {
        let mut classes: Vec<_> = self.entities.load().keys().cloned().collect();
        classes.sort();
        classes
    }

    /// Registered component classes, sorted.
    pub fn component_classes(&self) -> Vec<String> {
        let mut classes: Vec<_> = self.components.load().keys().cloned().collect();
        classes.sort();
        classes
    }

    /// Fresh builder for a class, sharing this manager's build context.
    pub fn builder(&self, class: &str) -> MetadataBuilder {
        MetadataBuilder::new(self.context.clone(), class)
    }

    /// Runs a mapping against a fresh entity builder, then builds and registers the result.
    ///
    /// # Errors
    /// Any build failure for the mapped class.
    pub fn map(&self, mapping: &dyn Mapping) -> Result<BuiltMetadata> {
        let mut builder = self.builder(mapping.class());
        builder.entity();
        mapping.map(&mut builder);

        let built = builder.build()?;
        tracing::debug!(
            class = %built.class(),
            kind = ?built.kind(),
            fields = built.metadata().fields().len(),
            "Mapped class"
        );
        self.register(built.clone());
        Ok(built)
    }

    /// Maps the mapping registered under `name`.
    ///
    /// # Errors
    /// `UnknownMapping` if no mapping has that name, otherwise any build failure.
    pub fn map_named(&self, name: &str) -> Result<BuiltMetadata> {
        let mapping = self
            .mappings
            .create(name)
            .ok_or_else(|| MetadataError::UnknownMapping {
                name: name.to_string(),
            })?;
        self.map(mapping.as_ref())
    }

    /// Registers a mapping instance under a name.
    pub fn register_mapping(&self, name: impl Into<String>, mapping: Arc<dyn Mapping>) -> Result<()> {
        self.mappings.register_instance(name, mapping)
    }
}
