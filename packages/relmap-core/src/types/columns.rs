//! Built-in column types.

use std::fmt::Write;

use super::cast::{absent, date_format};
use super::{ColumnDefinition, ColumnKind, ColumnType, FieldType};
use crate::characteristics::{
    AutoIncrementing, Big, Binary, Length, Medium, Precise, Small, Tiny, Unsigned,
};
use crate::error::CastError;
use crate::metadata::{Field, Metadata};
use crate::value::Value;

#[derive(Debug, Default, Clone, Copy)]
pub struct BooleanColumnType;

impl BooleanColumnType {
    pub const NAME: &'static str = "boolean";
}

impl FieldType for BooleanColumnType {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn cast(&self, value: Value, field: &Field, _: &dyn Metadata) -> Result<Value, CastError> {
        Ok(match value {
            Value::Bool(_) => value,
            Value::Null => absent(field, Value::Bool(false)),
            other => Value::Bool(other.truthy()),
        })
    }
}

impl ColumnType for BooleanColumnType {
    fn define(&self, field: &Field, _: &dyn Metadata) -> ColumnDefinition {
        ColumnDefinition::new(field.column(), ColumnKind::Boolean)
    }
}

/// Fixed-width strings.
#[derive(Debug, Default, Clone, Copy)]
pub struct CharColumnType;

impl CharColumnType {
    pub const NAME: &'static str = "char";
}

impl FieldType for CharColumnType {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn cast(&self, value: Value, field: &Field, _: &dyn Metadata) -> Result<Value, CastError> {
        Ok(cast_string(value, field))
    }
}

impl ColumnType for CharColumnType {
    fn define(&self, field: &Field, _: &dyn Metadata) -> ColumnDefinition {
        ColumnDefinition::new(field.column(), ColumnKind::Char)
            .length(field.characteristic::<Length>().map(|l| l.length))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct StringColumnType;

impl StringColumnType {
    pub const NAME: &'static str = "string";
}

impl FieldType for StringColumnType {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn cast(&self, value: Value, field: &Field, _: &dyn Metadata) -> Result<Value, CastError> {
        Ok(cast_string(value, field))
    }
}

impl ColumnType for StringColumnType {
    fn define(&self, field: &Field, _: &dyn Metadata) -> ColumnDefinition {
        ColumnDefinition::new(field.column(), ColumnKind::String)
            .length(field.characteristic::<Length>().map(|l| l.length))
    }
}

/// Integers. The flavour follows the size characteristic, smallest first.
#[derive(Debug, Default, Clone, Copy)]
pub struct IntegerColumnType;

impl IntegerColumnType {
    pub const NAME: &'static str = "integer";
}

impl FieldType for IntegerColumnType {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn cast(&self, value: Value, field: &Field, _: &dyn Metadata) -> Result<Value, CastError> {
        Ok(match value {
            Value::Int(_) => value,
            Value::Null => absent(field, Value::Int(0)),
            other => Value::Int(other.coerce_i64()),
        })
    }
}

impl ColumnType for IntegerColumnType {
    fn define(&self, field: &Field, _: &dyn Metadata) -> ColumnDefinition {
        let kind = if field.is::<Tiny>() {
            ColumnKind::TinyInteger
        } else if field.is::<Small>() {
            ColumnKind::SmallInteger
        } else if field.is::<Medium>() {
            ColumnKind::MediumInteger
        } else if field.is::<Big>() {
            ColumnKind::BigInteger
        } else {
            ColumnKind::Integer
        };

        let definition =
            ColumnDefinition::new(field.column(), kind).unsigned(field.is::<Unsigned>());

        match field.characteristic::<AutoIncrementing>() {
            Some(increments) => definition.auto_increment(increments.starting_from),
            None => definition,
        }
    }
}

/// Floating point and fixed precision numbers.
#[derive(Debug, Default, Clone, Copy)]
pub struct FloatColumnType;

impl FloatColumnType {
    pub const NAME: &'static str = "float";
}

impl FieldType for FloatColumnType {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn cast(&self, value: Value, field: &Field, _: &dyn Metadata) -> Result<Value, CastError> {
        Ok(match value {
            Value::Float(_) => value,
            Value::Null => absent(field, Value::Float(0.0)),
            other => Value::Float(other.coerce_f64()),
        })
    }
}

impl ColumnType for FloatColumnType {
    fn define(&self, field: &Field, _: &dyn Metadata) -> ColumnDefinition {
        let precision = field.characteristic::<Precise>().map(|p| p.precision);
        let kind = match precision {
            Some(_) => ColumnKind::Decimal,
            None if field.is::<Big>() => ColumnKind::Double,
            None => ColumnKind::Float,
        };

        ColumnDefinition::new(field.column(), kind)
            .precision(precision)
            .unsigned(field.is::<Unsigned>())
    }
}

/// JSON documents, stored as serialized text.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonColumnType;

impl JsonColumnType {
    pub const NAME: &'static str = "json";
}

impl FieldType for JsonColumnType {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn cast(&self, value: Value, field: &Field, _: &dyn Metadata) -> Result<Value, CastError> {
        match value {
            Value::String(_) => Ok(value),
            Value::Null => Ok(absent(field, Value::Null)),
            other => serde_json::to_string(&other.to_json())
                .map(Value::String)
                .map_err(|source| CastError::InvalidJson {
                    field: field.property().to_string(),
                    source,
                }),
        }
    }
}

impl ColumnType for JsonColumnType {
    fn define(&self, field: &Field, _: &dyn Metadata) -> ColumnDefinition {
        let kind = if field.is::<Binary>() {
            ColumnKind::Jsonb
        } else {
            ColumnKind::Json
        };
        ColumnDefinition::new(field.column(), kind)
    }
}

/// Timestamps, stored as formatted strings.
#[derive(Debug, Default, Clone, Copy)]
pub struct TimestampColumnType;

impl TimestampColumnType {
    pub const NAME: &'static str = "timestamp";
}

impl FieldType for TimestampColumnType {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn cast(
        &self,
        value: Value,
        field: &Field,
        metadata: &dyn Metadata,
    ) -> Result<Value, CastError> {
        match value {
            Value::String(_) => Ok(value),
            Value::Null => Ok(absent(field, Value::Null)),
            Value::DateTime(dt) => {
                let format = date_format(field, metadata);
                let mut rendered = String::new();
                write!(rendered, "{}", dt.format(&format)).map_err(|_| {
                    CastError::InvalidDateTime {
                        field: field.property().to_string(),
                        value: dt.to_string(),
                        format: format.clone(),
                    }
                })?;
                Ok(Value::String(rendered))
            }
            other => Ok(Value::String(other.coerce_string())),
        }
    }
}

impl ColumnType for TimestampColumnType {
    fn define(&self, field: &Field, _: &dyn Metadata) -> ColumnDefinition {
        ColumnDefinition::new(field.column(), ColumnKind::Timestamp)
            .precision(field.characteristic::<Precise>().map(|p| p.precision))
    }
}

fn cast_string(value: Value, field: &Field) -> Value {
    match value {
        Value::String(_) => value,
        Value::Null => absent(field, Value::String(String::new())),
        other => Value::String(other.coerce_string()),
    }
}
