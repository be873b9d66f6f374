//! Metadata error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while registering types or building metadata.
#[derive(Error, Debug)]
pub enum MetadataError {
    /// Name resolves to neither a property type nor a column type
    #[error("Type '{name}' is neither a column nor a property type")]
    InvalidType { name: String },

    /// Property type could not be inferred from the native type
    #[error("The property '{property}' in class '{class}' has an invalid type for mapping: {reason}")]
    UnresolvedPropertyType {
        class: String,
        property: String,
        reason: String,
    },

    /// No default column type is mapped for the resolved property type
    #[error("Property '{property}' in class '{class}' has no valid column mapping for property type '{property_type}'")]
    NoDefaultColumnMapping {
        class: String,
        property: String,
        property_type: String,
    },

    /// Explicitly named property type is not registered
    #[error("Property '{property}' in class '{class}' uses unknown property type '{name}'")]
    UnknownPropertyType {
        class: String,
        property: String,
        name: String,
    },

    /// Explicitly named column type is not registered
    #[error("Property '{property}' in class '{class}' uses unknown column type '{name}'")]
    UnknownColumnType {
        class: String,
        property: String,
        name: String,
    },

    /// Class does not declare the property
    #[error("The property '{property}' doesn't exist in class '{class}'")]
    UnknownProperty { class: String, property: String },

    /// Name does not identify a registered mapping
    #[error("Mapping '{name}' is not registered")]
    UnknownMapping { name: String },

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error while reading configuration or mapping files
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Mapping file could not be parsed
    #[error("Invalid mapping file '{path}': {message}")]
    MappingFile { path: PathBuf, message: String },

    /// Lock poisoned (RwLock poisoned)
    #[error("Lock poisoned")]
    LockPoisoned,
}

/// Errors raised while casting a value between property and column form.
#[derive(Error, Debug)]
pub enum CastError {
    /// Serialized JSON payload could not be parsed or produced
    #[error("Invalid JSON for field '{field}': {source}")]
    InvalidJson {
        field: String,
        #[source]
        source: serde_json::Error,
    },

    /// Date-time string did not match the expected format
    #[error("Invalid date-time '{value}' for field '{field}' (format '{format}')")]
    InvalidDateTime {
        field: String,
        value: String,
        format: String,
    },
}

pub type Result<T> = std::result::Result<T, MetadataError>;
