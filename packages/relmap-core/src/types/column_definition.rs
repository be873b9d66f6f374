use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Physical column flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Boolean,
    TinyInteger,
    SmallInteger,
    MediumInteger,
    Integer,
    BigInteger,
    Float,
    Double,
    Decimal,
    Char,
    String,
    Json,
    Jsonb,
    Timestamp,
}

impl ColumnKind {
    /// Name of the column type that produces this flavour.
    pub fn column_type(&self) -> &'static str {
        match self {
            ColumnKind::Boolean => "boolean",
            ColumnKind::TinyInteger
            | ColumnKind::SmallInteger
            | ColumnKind::MediumInteger
            | ColumnKind::Integer
            | ColumnKind::BigInteger => "integer",
            ColumnKind::Float | ColumnKind::Double | ColumnKind::Decimal => "float",
            ColumnKind::Char => "char",
            ColumnKind::String => "string",
            ColumnKind::Json | ColumnKind::Jsonb => "json",
            ColumnKind::Timestamp => "timestamp",
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            ColumnKind::TinyInteger
                | ColumnKind::SmallInteger
                | ColumnKind::MediumInteger
                | ColumnKind::Integer
                | ColumnKind::BigInteger
        )
    }
}

/// Index attached to a column definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexKind {
    Primary,
    Unique,
    Index,
    Fulltext,
    Spatial,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnIndex {
    pub kind: IndexKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Schema descriptor produced by a column type for one field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDefinition {
    pub name: String,
    pub kind: ColumnKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
    pub unsigned: bool,
    pub auto_increment: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starting_value: Option<u64>,
    pub nullable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub indexes: Vec<ColumnIndex>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charset: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    pub first: bool,
    pub invisible: bool,
    pub use_current: bool,
    pub use_current_on_update: bool,
}

impl ColumnDefinition {
    /// Creates a bare definition with no modifiers applied.
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
            length: None,
            precision: None,
            unsigned: false,
            auto_increment: false,
            starting_value: None,
            nullable: false,
            default: None,
            indexes: Vec::new(),
            charset: None,
            collation: None,
            after: None,
            first: false,
            invisible: false,
            use_current: false,
            use_current_on_update: false,
        }
    }

    pub fn length(mut self, length: Option<u32>) -> Self {
        self.length = length;
        self
    }

    pub fn precision(mut self, precision: Option<u32>) -> Self {
        self.precision = precision;
        self
    }

    pub fn unsigned(mut self, unsigned: bool) -> Self {
        self.unsigned = unsigned;
        self
    }

    pub fn auto_increment(mut self, starting_value: Option<u64>) -> Self {
        self.auto_increment = true;
        self.starting_value = starting_value;
        self
    }

    pub fn has_index(&self, kind: IndexKind) -> bool {
        self.indexes.iter().any(|index| index.kind == kind)
    }
}
