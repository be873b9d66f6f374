//! Field and class metadata, and the builders that produce them.

mod builder;
pub mod connection;
mod entity;
mod field;
mod field_builder;

use std::fmt;
use std::sync::Arc;

pub use builder::{BuildContext, BuildOptions, FieldOverride, MetadataBuilder, MetadataKind};
pub use connection::{Connection, ConnectionMap, ConnectionResolver, StaticConnection};
pub use entity::{ComponentMetadata, EntityMetadata};
pub use field::{Field, FieldSet};
pub use field_builder::{FieldBuilder, FieldSnapshot};

use crate::characteristics::{Characteristic, CharacteristicKind};

/// Read-only view of a built class mapping.
pub trait Metadata: fmt::Debug + Send + Sync {
    /// Mapped class name.
    fn class(&self) -> &str;

    fn field_set(&self) -> &FieldSet;

    /// Fields in declaration order.
    fn fields(&self) -> &[Field] {
        self.field_set().as_slice()
    }

    /// Field for a property name.
    fn field(&self, property: &str) -> Option<&Field> {
        self.field_set().get(property)
    }

    /// Field mapped to a column name.
    fn column(&self, column: &str) -> Option<&Field> {
        self.field_set().by_column(column)
    }

    fn has(&self, property: &str) -> bool {
        self.field_set().contains(property)
    }

    fn fields_by_kind(&self, kind: CharacteristicKind) -> Vec<&Field> {
        self.field_set().by_kind(kind)
    }

    /// Fields carrying a characteristic of kind `C`.
    fn fields_with<C: Characteristic>(&self) -> Vec<&Field>
    where
        Self: Sized,
    {
        self.fields_by_kind(CharacteristicKind::of::<C>())
    }

    fn as_entity(&self) -> Option<&EntityMetadata> {
        None
    }

    fn is_entity(&self) -> bool {
        self.as_entity().is_some()
    }
}

/// Result of building a class mapping.
#[derive(Debug, Clone)]
pub enum BuiltMetadata {
    Entity(Arc<EntityMetadata>),
    Component(Arc<ComponentMetadata>),
}

impl BuiltMetadata {
    pub fn class(&self) -> &str {
        self.metadata().class()
    }

    pub fn metadata(&self) -> &dyn Metadata {
        match self {
            BuiltMetadata::Entity(entity) => entity.as_ref() as &dyn Metadata,
            BuiltMetadata::Component(component) => component.as_ref(),
        }
    }

    pub fn entity(&self) -> Option<&Arc<EntityMetadata>> {
        match self {
            BuiltMetadata::Entity(entity) => Some(entity),
            BuiltMetadata::Component(_) => None,
        }
    }

    pub fn component(&self) -> Option<&Arc<ComponentMetadata>> {
        match self {
            BuiltMetadata::Component(component) => Some(component),
            BuiltMetadata::Entity(_) => None,
        }
    }

    pub fn kind(&self) -> MetadataKind {
        match self {
            BuiltMetadata::Entity(_) => MetadataKind::Entity,
            BuiltMetadata::Component(_) => MetadataKind::Component,
        }
    }
}

impl From<EntityMetadata> for BuiltMetadata {
    fn from(entity: EntityMetadata) -> Self {
        BuiltMetadata::Entity(Arc::new(entity))
    }
}

impl From<ComponentMetadata> for BuiltMetadata {
    fn from(component: ComponentMetadata) -> Self {
        BuiltMetadata::Component(Arc::new(component))
    }
}
