use std::sync::Arc;

use crate::characteristics::{
    Characteristic, CharacteristicKind, CharacteristicSet, Characteristics, DynCharacteristic,
    IndexName, TouchEvent,
};
use crate::value::Value;

/// Current state of a [`FieldBuilder`].
#[derive(Debug, Clone)]
pub struct FieldSnapshot {
    pub property: String,
    pub property_type: Option<String>,
    pub column: Option<String>,
    pub column_type: Option<String>,
    pub characteristics: CharacteristicSet,
}

/// Mutable description of one field, resolved into a
/// [`Field`](super::Field) when its metadata is built.
#[derive(Debug, Clone)]
pub struct FieldBuilder {
    property: String,
    property_type: Option<String>,
    column: Option<String>,
    column_type: Option<String>,
    characteristics: CharacteristicSet,
    factory: Arc<Characteristics>,
}

impl FieldBuilder {
    pub fn new(property: impl Into<String>, factory: Arc<Characteristics>) -> Self {
        Self {
            property: property.into(),
            property_type: None,
            column: None,
            column_type: None,
            characteristics: CharacteristicSet::new(),
            factory,
        }
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    /// Sets the property type by name.
    pub fn property_type(&mut self, name: impl Into<String>) -> &mut Self {
        self.property_type = Some(name.into());
        self
    }

    /// Sets the column name and, unless one is already set, the column type.
    ///
    /// The name is always replaced, so `None` clears a previous name.
    pub fn column(&mut self, name: Option<&str>, column_type: Option<&str>) -> &mut Self {
        self.column = name.map(str::to_string);
        if self.column_type.is_none() {
            self.column_type = column_type.map(str::to_string);
        }
        self
    }

    /// Replaces every characteristic.
    pub fn characteristics(
        &mut self,
        characteristics: impl IntoIterator<Item = Arc<dyn DynCharacteristic>>,
    ) -> &mut Self {
        self.characteristics = characteristics.into_iter().collect();
        self
    }

    /// Adds a characteristic, replacing any of the same kind.
    pub fn characteristic(&mut self, characteristic: Arc<dyn DynCharacteristic>) -> &mut Self {
        self.characteristics.insert(characteristic);
        self
    }

    /// Adds a characteristic value through the factory.
    pub fn with<C: Characteristic>(&mut self, characteristic: C) -> &mut Self {
        let characteristic = self.factory.make(characteristic);
        self.characteristic(characteristic)
    }

    pub fn without(&mut self, kind: CharacteristicKind) -> &mut Self {
        self.characteristics.remove(kind);
        self
    }

    pub fn has<C: Characteristic>(&self) -> bool {
        self.characteristics.has::<C>()
    }

    pub fn tiny(&mut self) -> &mut Self {
        let c = self.factory.tiny();
        self.characteristic(c)
    }

    pub fn small(&mut self) -> &mut Self {
        let c = self.factory.small();
        self.characteristic(c)
    }

    pub fn medium(&mut self) -> &mut Self {
        let c = self.factory.medium();
        self.characteristic(c)
    }

    pub fn big(&mut self) -> &mut Self {
        let c = self.factory.big();
        self.characteristic(c)
    }

    pub fn unsigned(&mut self) -> &mut Self {
        let c = self.factory.unsigned();
        self.characteristic(c)
    }

    pub fn auto_incrementing(&mut self, starting_from: Option<u64>) -> &mut Self {
        let c = self.factory.auto_incrementing(starting_from);
        self.characteristic(c)
    }

    pub fn binary(&mut self) -> &mut Self {
        let c = self.factory.binary();
        self.characteristic(c)
    }

    pub fn default_value(&mut self, value: impl Into<Value>) -> &mut Self {
        let c = self.factory.default_value(value);
        self.characteristic(c)
    }

    pub fn use_current(&mut self) -> &mut Self {
        let c = self.factory.use_current();
        self.characteristic(c)
    }

    pub fn use_current_on_update(&mut self) -> &mut Self {
        let c = self.factory.use_current_on_update();
        self.characteristic(c)
    }

    pub fn formatted(&mut self, format: impl Into<String>) -> &mut Self {
        let c = self.factory.formatted(format);
        self.characteristic(c)
    }

    pub fn immutable(&mut self) -> &mut Self {
        let c = self.factory.immutable();
        self.characteristic(c)
    }

    pub fn invisible(&mut self) -> &mut Self {
        let c = self.factory.invisible();
        self.characteristic(c)
    }

    pub fn length(&mut self, length: u32) -> &mut Self {
        let c = self.factory.length(length);
        self.characteristic(c)
    }

    pub fn not_null(&mut self) -> &mut Self {
        let c = self.factory.not_null();
        self.characteristic(c)
    }

    pub fn nullable(&mut self) -> &mut Self {
        let c = self.factory.nullable();
        self.characteristic(c)
    }

    pub fn precise(&mut self, precision: u32) -> &mut Self {
        let c = self.factory.precise(precision);
        self.characteristic(c)
    }

    pub fn primary(&mut self) -> &mut Self {
        let c = self.factory.primary();
        self.characteristic(c)
    }

    pub fn touchable(&mut self, events: impl IntoIterator<Item = TouchEvent>) -> &mut Self {
        let c = self.factory.touchable(events);
        self.characteristic(c)
    }

    pub fn unique(&mut self, name: impl Into<IndexName>) -> &mut Self {
        let c = self.factory.unique(name);
        self.characteristic(c)
    }

    pub fn indexed(&mut self, name: impl Into<IndexName>) -> &mut Self {
        let c = self.factory.indexed(name);
        self.characteristic(c)
    }

    pub fn fulltext_indexed(&mut self, name: impl Into<IndexName>) -> &mut Self {
        let c = self.factory.fulltext_indexed(name);
        self.characteristic(c)
    }

    pub fn spatially_indexed(&mut self, name: impl Into<IndexName>) -> &mut Self {
        let c = self.factory.spatially_indexed(name);
        self.characteristic(c)
    }

    pub fn charset(&mut self, charset: impl Into<String>) -> &mut Self {
        let c = self.factory.charset(charset);
        self.characteristic(c)
    }

    pub fn collation(&mut self, collation: impl Into<String>) -> &mut Self {
        let c = self.factory.collation(collation);
        self.characteristic(c)
    }

    pub fn after(&mut self, column: impl Into<String>) -> &mut Self {
        let c = self.factory.after(column);
        self.characteristic(c)
    }

    pub fn first(&mut self) -> &mut Self {
        let c = self.factory.first();
        self.characteristic(c)
    }

    /// Folds another builder's state into this one.
    ///
    /// With `overwrite`, every value `other` sets replaces ours; without it,
    /// values from `other` only fill what this builder left unset.
    pub fn merge(&mut self, other: FieldBuilder, overwrite: bool) -> &mut Self {
        fn pick(ours: &mut Option<String>, theirs: Option<String>, overwrite: bool) {
            if theirs.is_some() && (overwrite || ours.is_none()) {
                *ours = theirs;
            }
        }

        pick(&mut self.property_type, other.property_type, overwrite);
        pick(&mut self.column, other.column, overwrite);
        pick(&mut self.column_type, other.column_type, overwrite);

        for characteristic in other.characteristics.iter() {
            if overwrite || !self.characteristics.has_kind(characteristic.kind()) {
                self.characteristics.insert(characteristic.clone());
            }
        }
        self
    }

    pub fn snapshot(&self) -> FieldSnapshot {
        FieldSnapshot {
            property: self.property.clone(),
            property_type: self.property_type.clone(),
            column: self.column.clone(),
            column_type: self.column_type.clone(),
            characteristics: self.characteristics.clone(),
        }
    }

    pub(crate) fn into_snapshot(self) -> FieldSnapshot {
        FieldSnapshot {
            property: self.property,
            property_type: self.property_type,
            column: self.column,
            column_type: self.column_type,
            characteristics: self.characteristics,
        }
    }
}
