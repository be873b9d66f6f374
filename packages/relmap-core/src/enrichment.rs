//! Declarative enrichments attached to class descriptors.
//!
//! Class-level enrichments mutate the [`MetadataBuilder`]; property-level
//! enrichments mutate the [`FieldBuilder`] of their property. Both run during
//! [`MetadataBuilder::enrich`], in declaration order.

use std::fmt;
use std::sync::Arc;

use crate::characteristics::{DynCharacteristic, TouchEvent};
use crate::metadata::{FieldBuilder, MetadataBuilder};

/// Class-level enrichment.
pub trait Enrichment: fmt::Debug + Send + Sync {
    fn enrich(&self, metadata: &mut MetadataBuilder);
}

/// Property-level enrichment.
pub trait FieldEnrichment: fmt::Debug + Send + Sync {
    fn enrich(&self, field: &mut FieldBuilder);
}

/// Maps the class as an entity, optionally naming its table and connection.
#[derive(Debug, Clone, Default)]
pub struct EntityAttribute {
    pub table: Option<String>,
    pub connection: Option<String>,
}

impl EntityAttribute {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn connection(mut self, connection: impl Into<String>) -> Self {
        self.connection = Some(connection.into());
        self
    }
}

impl Enrichment for EntityAttribute {
    fn enrich(&self, metadata: &mut MetadataBuilder) {
        metadata.entity();
        if let Some(table) = &self.table {
            metadata.table(table);
        }
        if let Some(connection) = &self.connection {
            metadata.connection(connection);
        }
    }
}

/// Maps the class as a component.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComponentAttribute;

impl Enrichment for ComponentAttribute {
    fn enrich(&self, metadata: &mut MetadataBuilder) {
        metadata.component();
    }
}

/// Fixes a property's column name and, optionally, its column type.
#[derive(Debug, Clone, Default)]
pub struct FieldAttribute {
    pub column: Option<String>,
    pub column_type: Option<String>,
}

impl FieldAttribute {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn column(column: impl Into<String>, column_type: Option<&str>) -> Self {
        Self {
            column: Some(column.into()),
            column_type: column_type.map(str::to_string),
        }
    }
}

impl FieldEnrichment for FieldAttribute {
    fn enrich(&self, field: &mut FieldBuilder) {
        if let Some(column) = &self.column {
            field.column(Some(column.as_str()), self.column_type.as_deref());
        }
    }
}

/// Primary key field. Integer keys are big, unsigned and auto-incrementing.
#[derive(Debug, Clone)]
pub struct IdAttribute {
    pub column: String,
    pub column_type: String,
}

impl IdAttribute {
    pub fn new(column: impl Into<String>, column_type: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            column_type: column_type.into(),
        }
    }
}

impl Default for IdAttribute {
    fn default() -> Self {
        Self::new("id", "integer")
    }
}

impl FieldEnrichment for IdAttribute {
    fn enrich(&self, field: &mut FieldBuilder) {
        field.column(Some(self.column.as_str()), Some(self.column_type.as_str()));
        field.primary();

        if self.column_type == "integer" {
            field.big().unsigned().auto_incrementing(None);
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InvisibleAttribute;

impl FieldEnrichment for InvisibleAttribute {
    fn enrich(&self, field: &mut FieldBuilder) {
        field.invisible();
    }
}

/// Stamps the field with the current time on the given events.
#[derive(Debug, Clone)]
pub struct TouchableAttribute {
    pub events: Vec<TouchEvent>,
}

impl TouchableAttribute {
    pub fn new(events: impl IntoIterator<Item = TouchEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }
}

impl FieldEnrichment for TouchableAttribute {
    fn enrich(&self, field: &mut FieldBuilder) {
        field.touchable(self.events.iter().copied());
    }
}

/// Attaches arbitrary characteristics, including third-party kinds.
#[derive(Debug, Clone, Default)]
pub struct CharacteristicAttribute {
    pub characteristics: Vec<Arc<dyn DynCharacteristic>>,
}

impl CharacteristicAttribute {
    pub fn new(characteristics: Vec<Arc<dyn DynCharacteristic>>) -> Self {
        Self { characteristics }
    }
}

impl FieldEnrichment for CharacteristicAttribute {
    fn enrich(&self, field: &mut FieldBuilder) {
        for characteristic in &self.characteristics {
            field.characteristic(characteristic.clone());
        }
    }
}
