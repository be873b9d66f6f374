//! Catalog of built-in types, resolvable by name at configuration time.

use std::sync::Arc;

use super::columns::{
    BooleanColumnType, CharColumnType, FloatColumnType, IntegerColumnType, JsonColumnType,
    StringColumnType, TimestampColumnType,
};
use super::properties::{
    ArrayPropertyType, BooleanPropertyType, CarbonPropertyType, DateTimePropertyType,
    FloatPropertyType, IntegerPropertyType, StringPropertyType,
};
use super::type_manager::TypeManager;
use super::{ColumnType, PropertyType};
use crate::error::Result;

/// Built-in property type names, in stock registration order.
pub const PROPERTY_TYPES: &[&str] = &[
    ArrayPropertyType::NAME,
    BooleanPropertyType::NAME,
    FloatPropertyType::NAME,
    IntegerPropertyType::NAME,
    StringPropertyType::NAME,
    CarbonPropertyType::NAME,
    DateTimePropertyType::NAME,
];

/// Built-in column type names.
pub const COLUMN_TYPES: &[&str] = &[
    BooleanColumnType::NAME,
    CharColumnType::NAME,
    FloatColumnType::NAME,
    IntegerColumnType::NAME,
    JsonColumnType::NAME,
    StringColumnType::NAME,
    TimestampColumnType::NAME,
];

/// Stock property → column defaults. Each is also applied in reverse.
pub const DEFAULT_MAPPINGS: &[(&str, &str)] = &[
    (BooleanPropertyType::NAME, BooleanColumnType::NAME),
    (IntegerPropertyType::NAME, IntegerColumnType::NAME),
    (ArrayPropertyType::NAME, JsonColumnType::NAME),
    (StringPropertyType::NAME, StringColumnType::NAME),
    (FloatPropertyType::NAME, FloatColumnType::NAME),
    (CarbonPropertyType::NAME, TimestampColumnType::NAME),
];

/// Constructs a built-in property type by name.
pub fn property_type(name: &str) -> Option<Arc<dyn PropertyType>> {
    let ty: Arc<dyn PropertyType> = match name {
        ArrayPropertyType::NAME => Arc::new(ArrayPropertyType),
        BooleanPropertyType::NAME => Arc::new(BooleanPropertyType),
        FloatPropertyType::NAME => Arc::new(FloatPropertyType),
        IntegerPropertyType::NAME => Arc::new(IntegerPropertyType),
        StringPropertyType::NAME => Arc::new(StringPropertyType),
        CarbonPropertyType::NAME => Arc::new(CarbonPropertyType),
        DateTimePropertyType::NAME => Arc::new(DateTimePropertyType),
        _ => return None,
    };
    Some(ty)
}

/// Constructs a built-in column type by name.
pub fn column_type(name: &str) -> Option<Arc<dyn ColumnType>> {
    let ty: Arc<dyn ColumnType> = match name {
        BooleanColumnType::NAME => Arc::new(BooleanColumnType),
        CharColumnType::NAME => Arc::new(CharColumnType),
        FloatColumnType::NAME => Arc::new(FloatColumnType),
        IntegerColumnType::NAME => Arc::new(IntegerColumnType),
        JsonColumnType::NAME => Arc::new(JsonColumnType),
        StringColumnType::NAME => Arc::new(StringColumnType),
        TimestampColumnType::NAME => Arc::new(TimestampColumnType),
        _ => return None,
    };
    Some(ty)
}

/// Registers every built-in type and the stock default mappings.
pub fn register_builtin_types(types: &TypeManager) -> Result<()> {
    for name in PROPERTY_TYPES {
        types.register_named_property(name)?;
    }
    for name in COLUMN_TYPES {
        types.register_named_column(name)?;
    }
    for (property, column) in DEFAULT_MAPPINGS {
        types.map_property_default_column_type(property, column, true)?;
    }
    Ok(())
}
