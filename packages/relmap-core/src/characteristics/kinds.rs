//! Built-in characteristic kinds.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::Characteristic;
use crate::value::Value;

macro_rules! marker {
    ($(#[$doc:meta])* $ty:ident => $name:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        pub struct $ty;

        impl Characteristic for $ty {
            const NAME: &'static str = $name;
            const SINGLETON: bool = true;
        }
    };
}

marker!(
    /// Smallest integer flavour.
    Tiny => "tiny"
);
marker!(Small => "small");
marker!(Medium => "medium");
marker!(
    /// Widest integer or float flavour.
    Big => "big"
);
marker!(Unsigned => "unsigned");
marker!(
    /// Binary storage (e.g. `jsonb` instead of `json`).
    Binary => "binary"
);
marker!(
    /// Date-times are materialised as immutable values.
    Immutable => "immutable"
);
marker!(
    /// Hidden from default selects and serialization.
    Invisible => "invisible"
);
marker!(Nullable => "nullable");
marker!(NotNull => "not_null");
marker!(
    /// Place the column first in the table.
    First => "first"
);
marker!(Primary => "primary");
marker!(
    /// Column defaults to the current timestamp.
    UseCurrent => "use_current"
);
marker!(
    /// Column is set to the current timestamp on update.
    UseCurrentOnUpdate => "use_current_on_update"
);

/// Column length, in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Length {
    pub length: u32,
}

impl Length {
    pub fn new(length: u32) -> Self {
        Self { length }
    }
}

impl Characteristic for Length {
    const NAME: &'static str = "length";
}

/// Numeric or fractional-second precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Precise {
    pub precision: u32,
}

impl Precise {
    pub fn new(precision: u32) -> Self {
        Self { precision }
    }
}

impl Characteristic for Precise {
    const NAME: &'static str = "precise";
}

/// Value used when a non-nullable field receives nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultValue {
    pub value: Value,
}

impl DefaultValue {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

impl Characteristic for DefaultValue {
    const NAME: &'static str = "default";
}

/// A `chrono` format string for parsing and rendering date-times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatted {
    pub format: String,
}

impl Formatted {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
        }
    }
}

impl Characteristic for Formatted {
    const NAME: &'static str = "formatted";
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AutoIncrementing {
    pub starting_from: Option<u64>,
}

impl AutoIncrementing {
    pub fn new(starting_from: Option<u64>) -> Self {
        Self { starting_from }
    }
}

impl Characteristic for AutoIncrementing {
    const NAME: &'static str = "auto_incrementing";
}

/// Lifecycle events that stamp a field with the current time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TouchEvent {
    Created,
    Updated,
    Related,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Touchable {
    pub events: BTreeSet<TouchEvent>,
}

impl Touchable {
    pub fn new(events: impl IntoIterator<Item = TouchEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    pub fn on(&self, event: TouchEvent) -> bool {
        self.events.contains(&event)
    }
}

impl Characteristic for Touchable {
    const NAME: &'static str = "touchable";
}

/// Index naming for the index-style characteristics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexName {
    /// Let the schema layer pick a name.
    #[default]
    Auto,
    Named(String),
    /// Explicitly switched off.
    Disabled,
}

impl IndexName {
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Named(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::Disabled)
    }
}

impl From<Option<&str>> for IndexName {
    fn from(name: Option<&str>) -> Self {
        name.map_or(Self::Auto, |n| Self::Named(n.to_string()))
    }
}

impl From<bool> for IndexName {
    fn from(enabled: bool) -> Self {
        if enabled {
            Self::Auto
        } else {
            Self::Disabled
        }
    }
}

macro_rules! index_kind {
    ($(#[$doc:meta])* $ty:ident => $name:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Default, PartialEq, Eq)]
        pub struct $ty {
            pub name: IndexName,
        }

        impl $ty {
            pub fn new(name: impl Into<IndexName>) -> Self {
                Self { name: name.into() }
            }
        }

        impl Characteristic for $ty {
            const NAME: &'static str = $name;
        }
    };
}

index_kind!(Unique => "unique");
index_kind!(Indexed => "indexed");
index_kind!(FulltextIndexed => "fulltext_indexed");
index_kind!(
    /// Spatial index, for geometry columns.
    SpatiallyIndexed => "spatially_indexed"
);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsingCharset {
    pub charset: String,
}

impl Characteristic for UsingCharset {
    const NAME: &'static str = "charset";
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsingCollation {
    pub collation: String,
}

impl Characteristic for UsingCollation {
    const NAME: &'static str = "collation";
}

/// Place the column after another column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AfterColumn {
    pub column: String,
}

impl Characteristic for AfterColumn {
    const NAME: &'static str = "after";
}
