//! Built-in property types.

use super::cast::{absent, from_timestamp, parse_date_time};
use super::{ClassMatch, FieldType, PropertyType};
use crate::error::CastError;
use crate::metadata::{Field, Metadata};
use crate::value::Value;

#[derive(Debug, Default, Clone, Copy)]
pub struct IntegerPropertyType;

impl IntegerPropertyType {
    pub const NAME: &'static str = "integer";
}

impl FieldType for IntegerPropertyType {
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

impl PropertyType for IntegerPropertyType {}

#[derive(Debug, Default, Clone, Copy)]
pub struct FloatPropertyType;

impl FloatPropertyType {
    pub const NAME: &'static str = "float";
}

impl FieldType for FloatPropertyType {
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

impl PropertyType for FloatPropertyType {}

#[derive(Debug, Default, Clone, Copy)]
pub struct BooleanPropertyType;

impl BooleanPropertyType {
    pub const NAME: &'static str = "boolean";
}

impl FieldType for BooleanPropertyType {
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

impl PropertyType for BooleanPropertyType {}

#[derive(Debug, Default, Clone, Copy)]
pub struct StringPropertyType;

impl StringPropertyType {
    pub const NAME: &'static str = "string";
}

impl FieldType for StringPropertyType {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn cast(&self, value: Value, field: &Field, _: &dyn Metadata) -> Result<Value, CastError> {
        Ok(match value {
            Value::String(_) => value,
            Value::Null => absent(field, Value::String(String::new())),
            other => Value::String(other.coerce_string()),
        })
    }
}

impl PropertyType for StringPropertyType {}

/// Arrays and maps. Strings are decoded as JSON.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArrayPropertyType;

impl ArrayPropertyType {
    pub const NAME: &'static str = "array";
}

impl FieldType for ArrayPropertyType {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn cast(&self, value: Value, field: &Field, _: &dyn Metadata) -> Result<Value, CastError> {
        match value {
            Value::Array(_) | Value::Map(_) => Ok(value),
            Value::Null => Ok(absent(field, Value::Array(Vec::new()))),
            Value::String(raw) => {
                let json: serde_json::Value =
                    serde_json::from_str(&raw).map_err(|source| CastError::InvalidJson {
                        field: field.property().to_string(),
                        source,
                    })?;
                Ok(match Value::from(json) {
                    decoded @ (Value::Array(_) | Value::Map(_)) => decoded,
                    Value::Null => Value::Array(Vec::new()),
                    scalar => Value::Array(vec![scalar]),
                })
            }
            scalar => Ok(Value::Array(vec![scalar])),
        }
    }
}

impl PropertyType for ArrayPropertyType {}

/// Any date-time value, matched by inheritance.
#[derive(Debug, Default, Clone, Copy)]
pub struct DateTimePropertyType;

impl DateTimePropertyType {
    pub const NAME: &'static str = "DateTimeInterface";
}

impl FieldType for DateTimePropertyType {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn cast(&self, value: Value, field: &Field, metadata: &dyn Metadata) -> Result<Value, CastError> {
        cast_date_time(value, field, metadata)
    }
}

impl PropertyType for DateTimePropertyType {
    fn class_match(&self) -> Option<ClassMatch> {
        Some(ClassMatch {
            class: Self::NAME.to_string(),
            exact: false,
        })
    }
}

/// `Carbon` date-times, matched exactly.
#[derive(Debug, Default, Clone, Copy)]
pub struct CarbonPropertyType;

impl CarbonPropertyType {
    pub const NAME: &'static str = "Carbon";
}

impl FieldType for CarbonPropertyType {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn cast(&self, value: Value, field: &Field, metadata: &dyn Metadata) -> Result<Value, CastError> {
        cast_date_time(value, field, metadata)
    }
}

impl PropertyType for CarbonPropertyType {
    fn class_match(&self) -> Option<ClassMatch> {
        Some(ClassMatch {
            class: Self::NAME.to_string(),
            exact: true,
        })
    }
}

fn cast_date_time(value: Value, field: &Field, metadata: &dyn Metadata) -> Result<Value, CastError> {
    match value {
        Value::DateTime(_) => Ok(value),
        Value::Null => Ok(absent(field, Value::Null)),
        Value::Int(seconds) => from_timestamp(field, seconds).map(Value::DateTime),
        Value::Float(seconds) => from_timestamp(field, seconds.trunc() as i64).map(Value::DateTime),
        Value::String(raw) => parse_date_time(field, metadata, &raw).map(Value::DateTime),
        other => Err(CastError::InvalidDateTime {
            field: field.property().to_string(),
            value: other.coerce_string(),
            format: other.type_name().to_string(),
        }),
    }
}
