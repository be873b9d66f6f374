//! Mappings declared in JSON files.
//!
//! ```json
//! {
//!   "class": "App\\Models\\User",
//!   "table": "users",
//!   "fields": [
//!     { "name": "id", "id": true },
//!     { "name": "email", "type": "string", "characteristics": [{ "kind": "unique" }] },
//!     { "name": "createdAt", "native": "Carbon",
//!       "characteristics": [{ "kind": "touchable", "events": ["created"] }] }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::Mapping;
use crate::characteristics::{IndexName, TouchEvent};
use crate::error::{MetadataError, Result};
use crate::metadata::{FieldBuilder, MetadataBuilder, MetadataKind};
use crate::reflection::{ClassDescriptor, NativeType, PropertyDescriptor};
use crate::value::Value;

/// A mapping read from a declaration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeclarativeMapping {
    pub class: String,
    #[serde(default)]
    pub kind: MetadataKind,
    #[serde(default)]
    pub table: Option<String>,
    #[serde(default)]
    pub connection: Option<String>,
    /// Parent classes and interfaces of the mapped class.
    #[serde(default)]
    pub extends: Vec<String>,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldSpec {
    pub name: String,
    #[serde(default, rename = "type")]
    pub property_type: Option<String>,
    #[serde(default)]
    pub column: Option<String>,
    #[serde(default)]
    pub column_type: Option<String>,
    /// Declared native type, used when `type` is not given.
    #[serde(default)]
    pub native: Option<String>,
    /// Integer primary key shorthand.
    #[serde(default)]
    pub id: bool,
    #[serde(default)]
    pub characteristics: Vec<CharacteristicSpec>,
}

/// Serialized form of the built-in characteristics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum CharacteristicSpec {
    Tiny,
    Small,
    Medium,
    Big,
    Unsigned,
    Binary,
    Immutable,
    Invisible,
    Nullable,
    NotNull,
    First,
    Primary,
    UseCurrent,
    UseCurrentOnUpdate,
    Length {
        length: u32,
    },
    Precise {
        precision: u32,
    },
    Default {
        value: serde_json::Value,
    },
    Formatted {
        format: String,
    },
    AutoIncrementing {
        #[serde(default)]
        starting_from: Option<u64>,
    },
    Touchable {
        events: Vec<TouchEvent>,
    },
    Unique {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        disabled: bool,
    },
    Indexed {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        disabled: bool,
    },
    FulltextIndexed {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        disabled: bool,
    },
    SpatiallyIndexed {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        disabled: bool,
    },
    Charset {
        charset: String,
    },
    Collation {
        collation: String,
    },
    After {
        column: String,
    },
}

impl CharacteristicSpec {
    /// Adds the characteristic to a field builder.
    pub fn apply(&self, field: &mut FieldBuilder) {
        match self {
            CharacteristicSpec::Tiny => field.tiny(),
            CharacteristicSpec::Small => field.small(),
            CharacteristicSpec::Medium => field.medium(),
            CharacteristicSpec::Big => field.big(),
            CharacteristicSpec::Unsigned => field.unsigned(),
            CharacteristicSpec::Binary => field.binary(),
            CharacteristicSpec::Immutable => field.immutable(),
            CharacteristicSpec::Invisible => field.invisible(),
            CharacteristicSpec::Nullable => field.nullable(),
            CharacteristicSpec::NotNull => field.not_null(),
            CharacteristicSpec::First => field.first(),
            CharacteristicSpec::Primary => field.primary(),
            CharacteristicSpec::UseCurrent => field.use_current(),
            CharacteristicSpec::UseCurrentOnUpdate => field.use_current_on_update(),
            CharacteristicSpec::Length { length } => field.length(*length),
            CharacteristicSpec::Precise { precision } => field.precise(*precision),
            CharacteristicSpec::Default { value } => field.default_value(Value::from(value.clone())),
            CharacteristicSpec::Formatted { format } => field.formatted(format),
            CharacteristicSpec::AutoIncrementing { starting_from } => {
                field.auto_incrementing(*starting_from)
            }
            CharacteristicSpec::Touchable { events } => field.touchable(events.iter().copied()),
            CharacteristicSpec::Unique { name, disabled } => {
                field.unique(index_name(name, *disabled))
            }
            CharacteristicSpec::Indexed { name, disabled } => {
                field.indexed(index_name(name, *disabled))
            }
            CharacteristicSpec::FulltextIndexed { name, disabled } => {
                field.fulltext_indexed(index_name(name, *disabled))
            }
            CharacteristicSpec::SpatiallyIndexed { name, disabled } => {
                field.spatially_indexed(index_name(name, *disabled))
            }
            CharacteristicSpec::Charset { charset } => field.charset(charset),
            CharacteristicSpec::Collation { collation } => field.collation(collation),
            CharacteristicSpec::After { column } => field.after(column),
        };
    }
}

fn index_name(name: &Option<String>, disabled: bool) -> IndexName {
    if disabled {
        IndexName::Disabled
    } else {
        IndexName::from(name.as_deref())
    }
}

impl DeclarativeMapping {
    /// Parses a mapping from JSON text.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Reads a mapping file.
    ///
    /// # Errors
    /// `Io` if the file cannot be read, `MappingFile` if it is not a valid mapping.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| MetadataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content).map_err(|e| MetadataError::MappingFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Class descriptor implied by the file's `native` types and `extends`.
    pub fn descriptor(&self) -> Option<ClassDescriptor> {
        let natives: Vec<_> = self
            .fields
            .iter()
            .filter_map(|field| {
                field
                    .native
                    .as_deref()
                    .map(|native| PropertyDescriptor::new(&field.name, NativeType::parse(native)))
            })
            .collect();
        if natives.is_empty() && self.extends.is_empty() {
            return None;
        }

        let mut descriptor = ClassDescriptor::new(&self.class);
        for parent in &self.extends {
            descriptor = descriptor.extends(parent);
        }
        for property in natives {
            descriptor = descriptor.property(property);
        }
        Some(descriptor)
    }
}

impl Mapping for DeclarativeMapping {
    fn class(&self) -> &str {
        &self.class
    }

    fn map(&self, builder: &mut MetadataBuilder) {
        match self.kind {
            MetadataKind::Entity => builder.entity(),
            MetadataKind::Component => builder.component(),
        };
        if let Some(table) = &self.table {
            builder.table(table);
        }
        if let Some(connection) = &self.connection {
            builder.connection(connection);
        }

        for spec in &self.fields {
            let field = if spec.id {
                if let Some(column_type) = spec.column_type.as_deref().filter(|t| *t != "integer") {
                    tracing::warn!(
                        class = %self.class,
                        field = %spec.name,
                        column_type = %column_type,
                        "Column type ignored for id field"
                    );
                }
                builder.id_with(&spec.name, spec.column.as_deref().unwrap_or("id"))
            } else {
                builder.field(
                    &spec.name,
                    spec.property_type.as_deref(),
                    spec.column.as_deref(),
                    spec.column_type.as_deref(),
                    Vec::new(),
                )
            };

            for characteristic in &spec.characteristics {
                characteristic.apply(field);
            }
        }
    }
}
