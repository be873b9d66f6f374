//! Object/relational metadata engine.
//!
//! Provides the characteristic model, property and column types, the type
//! manager, field and metadata builders, enrichment, mappings and the
//! metadata manager that ties them together.

pub mod characteristics;
pub mod config;
pub mod engine;
pub mod enrichment;
pub mod error;
pub mod inflect;
pub mod manager;
pub mod mapping;
pub mod metadata;
pub mod reflection;
pub mod types;
pub mod value;

pub use characteristics::{Characteristic, CharacteristicKind, Characteristics, DynCharacteristic};
pub use config::MetadataConfig;
pub use engine::Engine;
pub use error::{CastError, MetadataError, Result};
pub use manager::MetadataManager;
pub use mapping::Mapping;
pub use metadata::{
    BuiltMetadata, ComponentMetadata, EntityMetadata, Field, FieldBuilder, Metadata,
    MetadataBuilder,
};
pub use types::TypeManager;
pub use value::Value;
