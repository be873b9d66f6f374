use std::collections::HashMap;
use std::sync::Arc;

use crate::characteristics::{
    Characteristic, CharacteristicKind, CharacteristicSet, DynCharacteristic,
};
use crate::error::CastError;
use crate::types::{ColumnDefinition, ColumnType, PropertyType};
use crate::value::Value;

use super::Metadata;

/// A built property ↔ column binding.
#[derive(Debug, Clone)]
pub struct Field {
    property: String,
    property_type: Arc<dyn PropertyType>,
    column: String,
    column_type: Arc<dyn ColumnType>,
    characteristics: CharacteristicSet,
}

impl Field {
    pub fn new(
        property: impl Into<String>,
        property_type: Arc<dyn PropertyType>,
        column: impl Into<String>,
        column_type: Arc<dyn ColumnType>,
        characteristics: CharacteristicSet,
    ) -> Self {
        Self {
            property: property.into(),
            property_type,
            column: column.into(),
            column_type,
            characteristics,
        }
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn property_type(&self) -> &Arc<dyn PropertyType> {
        &self.property_type
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn column_type(&self) -> &Arc<dyn ColumnType> {
        &self.column_type
    }

    pub fn characteristics(&self) -> &CharacteristicSet {
        &self.characteristics
    }

    /// Whether the field carries a characteristic of kind `C`.
    pub fn is<C: Characteristic>(&self) -> bool {
        self.characteristics.has::<C>()
    }

    pub fn is_kind(&self, kind: CharacteristicKind) -> bool {
        self.characteristics.has_kind(kind)
    }

    /// The field's characteristic of kind `C`, if present.
    pub fn characteristic<C: Characteristic>(&self) -> Option<&C> {
        self.characteristics.get::<C>()
    }

    pub fn handle(&self, kind: CharacteristicKind) -> Option<&Arc<dyn DynCharacteristic>> {
        self.characteristics.handle(kind)
    }

    /// Casts a stored value into the property's native form.
    pub fn to_property(&self, value: Value, metadata: &dyn Metadata) -> Result<Value, CastError> {
        self.property_type.cast(value, self, metadata)
    }

    /// Casts a property value into its stored form.
    pub fn to_column(&self, value: Value, metadata: &dyn Metadata) -> Result<Value, CastError> {
        self.column_type.cast(value, self, metadata)
    }

    pub fn definition(&self, metadata: &dyn Metadata) -> ColumnDefinition {
        self.column_type.definition(self, metadata)
    }
}

/// Fields of one class in declaration order, indexed by property and column.
#[derive(Debug, Clone, Default)]
pub struct FieldSet {
    fields: Vec<Field>,
    by_property: HashMap<String, usize>,
    by_column: HashMap<String, usize>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field, replacing any field for the same property in place.
    ///
    /// A column name already claimed by another field is re-pointed at the
    /// new field. A column the replaced field gives up falls back to the
    /// latest remaining field that shares it.
    pub fn insert(&mut self, field: Field) {
        let index = match self.by_property.get(field.property()) {
            Some(&index) => {
                let released = self.fields[index].column().to_string();
                self.fields[index] = field;
                if self.by_column.get(&released) == Some(&index) {
                    let fallback = self
                        .fields
                        .iter()
                        .enumerate()
                        .rev()
                        .find(|(i, f)| *i != index && f.column() == released)
                        .map(|(i, _)| i);
                    match fallback {
                        Some(other) => {
                            self.by_column.insert(released, other);
                        }
                        None => {
                            self.by_column.remove(&released);
                        }
                    }
                }
                index
            }
            None => {
                self.fields.push(field);
                let index = self.fields.len() - 1;
                self.by_property
                    .insert(self.fields[index].property().to_string(), index);
                index
            }
        };

        let field = &self.fields[index];
        if let Some(&other) = self.by_column.get(field.column()) {
            if other != index {
                tracing::warn!(
                    column = field.column(),
                    previous = self.fields[other].property(),
                    property = field.property(),
                    "Duplicate column name, index now points at the later field"
                );
            }
        }
        self.by_column.insert(field.column().to_string(), index);
    }

    pub fn get(&self, property: &str) -> Option<&Field> {
        self.by_property.get(property).map(|&index| &self.fields[index])
    }

    pub fn by_column(&self, column: &str) -> Option<&Field> {
        self.by_column.get(column).map(|&index| &self.fields[index])
    }

    pub fn contains(&self, property: &str) -> bool {
        self.by_property.contains_key(property)
    }

    pub fn as_slice(&self) -> &[Field] {
        &self.fields
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.fields.iter()
    }

    pub fn by_kind(&self, kind: CharacteristicKind) -> Vec<&Field> {
        self.fields.iter().filter(|f| f.is_kind(kind)).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<Field> for FieldSet {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        let mut set = Self::new();
        for field in iter {
            set.insert(field);
        }
        set
    }
}

impl<'a> IntoIterator for &'a FieldSet {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
