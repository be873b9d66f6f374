//! Property and column types.
//!
//! A [`PropertyType`] casts stored values into their native property form, a
//! [`ColumnType`] casts property values into their stored form and describes
//! the physical column. Both share the [`FieldType`] contract and are looked up
//! by name through the [`TypeManager`].

pub mod builtin_types;
mod cast;
pub mod column_definition;
pub mod columns;
pub mod properties;
pub mod type_manager;

use std::fmt;
use std::sync::Arc;

pub use column_definition::{ColumnDefinition, ColumnIndex, ColumnKind, IndexKind};
pub use type_manager::TypeManager;

use crate::characteristics::{
    AfterColumn, DefaultValue, First, FulltextIndexed, IndexName, Indexed, Invisible, NotNull,
    Nullable, Primary, SpatiallyIndexed, Unique, UseCurrent, UseCurrentOnUpdate, UsingCharset,
    UsingCollation,
};
use crate::error::CastError;
use crate::metadata::{Field, Metadata};
use crate::value::Value;

/// Shared contract of property and column types.
pub trait FieldType: fmt::Debug + Send + Sync {
    /// Unique registration name.
    fn name(&self) -> &str;

    /// Casts a value into this type's representation.
    fn cast(&self, value: Value, field: &Field, metadata: &dyn Metadata)
        -> Result<Value, CastError>;
}

/// Class a property type is bound to, and how it matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassMatch {
    pub class: String,
    /// Only the class itself matches; subclasses and implementors do not.
    pub exact: bool,
}

/// Casts column values into native property values.
pub trait PropertyType: FieldType {
    /// Class binding for class-typed properties, `None` for scalars.
    fn class_match(&self) -> Option<ClassMatch> {
        None
    }
}

/// Casts property values into column values and defines the column.
pub trait ColumnType: FieldType {
    /// Column flavour and sizing for the field, without shared modifiers.
    fn define(&self, field: &Field, metadata: &dyn Metadata) -> ColumnDefinition;

    /// Full column definition: [`ColumnType::define`] plus the modifiers every
    /// column supports (nullability, default, indexes, placement, charset).
    fn definition(&self, field: &Field, metadata: &dyn Metadata) -> ColumnDefinition {
        let mut definition = self.define(field, metadata);
        apply_modifiers(&mut definition, field);
        definition
    }
}

/// Either kind of type, for name-based registration.
#[derive(Debug, Clone)]
pub enum RegisteredType {
    Property(Arc<dyn PropertyType>),
    Column(Arc<dyn ColumnType>),
}

impl RegisteredType {
    pub fn name(&self) -> &str {
        match self {
            RegisteredType::Property(ty) => ty.name(),
            RegisteredType::Column(ty) => ty.name(),
        }
    }
}

fn apply_modifiers(definition: &mut ColumnDefinition, field: &Field) {
    definition.nullable = field.is::<Nullable>() && !field.is::<NotNull>();
    definition.default = field.characteristic::<DefaultValue>().map(|d| d.value.clone());

    if field.is::<Primary>() {
        push_index(definition, IndexKind::Primary, &IndexName::Auto);
    }
    if let Some(unique) = field.characteristic::<Unique>() {
        push_index(definition, IndexKind::Unique, &unique.name);
    }
    if let Some(indexed) = field.characteristic::<Indexed>() {
        push_index(definition, IndexKind::Index, &indexed.name);
    }
    if let Some(fulltext) = field.characteristic::<FulltextIndexed>() {
        push_index(definition, IndexKind::Fulltext, &fulltext.name);
    }
    if let Some(spatial) = field.characteristic::<SpatiallyIndexed>() {
        push_index(definition, IndexKind::Spatial, &spatial.name);
    }

    definition.charset = field
        .characteristic::<UsingCharset>()
        .map(|c| c.charset.clone());
    definition.collation = field
        .characteristic::<UsingCollation>()
        .map(|c| c.collation.clone());
    definition.after = field
        .characteristic::<AfterColumn>()
        .map(|a| a.column.clone());
    definition.first = field.is::<First>();
    definition.invisible = field.is::<Invisible>();
    definition.use_current = field.is::<UseCurrent>();
    definition.use_current_on_update = field.is::<UseCurrentOnUpdate>();
}

fn push_index(definition: &mut ColumnDefinition, kind: IndexKind, name: &IndexName) {
    if name.is_enabled() {
        definition.indexes.push(ColumnIndex {
            kind,
            name: name.name().map(str::to_string),
        });
    }
}
