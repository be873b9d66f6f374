use std::sync::{Arc, OnceLock};

use super::connection::{Connection, ConnectionResolver};
use super::{FieldSet, Metadata};

/// Metadata for a class stored in its own table.
#[derive(Debug)]
pub struct EntityMetadata {
    class: String,
    fields: FieldSet,
    table: String,
    connection_name: Option<String>,
    resolver: Option<Arc<dyn ConnectionResolver>>,
    connection: OnceLock<Option<Arc<dyn Connection>>>,
}

impl EntityMetadata {
    pub fn new(
        class: impl Into<String>,
        fields: FieldSet,
        table: impl Into<String>,
        connection_name: Option<String>,
        resolver: Option<Arc<dyn ConnectionResolver>>,
    ) -> Self {
        Self {
            class: class.into(),
            fields,
            table: table.into(),
            connection_name,
            resolver,
            connection: OnceLock::new(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Explicit connection name; `None` means the default connection.
    pub fn connection_name(&self) -> Option<&str> {
        self.connection_name.as_deref()
    }

    /// Live connection, resolved on first use and cached.
    pub fn connection(&self) -> Option<Arc<dyn Connection>> {
        self.connection
            .get_or_init(|| {
                let resolver = self.resolver.as_ref()?;
                let connection = resolver.connection(self.connection_name.as_deref());
                if connection.is_none() {
                    tracing::debug!(
                        class = %self.class,
                        connection = ?self.connection_name,
                        "No connection resolved for entity"
                    );
                }
                connection
            })
            .clone()
    }
}

impl Metadata for EntityMetadata {
    fn class(&self) -> &str {
        &self.class
    }

    fn field_set(&self) -> &FieldSet {
        &self.fields
    }

    fn as_entity(&self) -> Option<&EntityMetadata> {
        Some(self)
    }
}

/// Metadata for a reusable field group with no table of its own.
#[derive(Debug, Clone)]
pub struct ComponentMetadata {
    class: String,
    fields: FieldSet,
}

impl ComponentMetadata {
    pub fn new(class: impl Into<String>, fields: FieldSet) -> Self {
        Self {
            class: class.into(),
            fields,
        }
    }
}

impl Metadata for ComponentMetadata {
    fn class(&self) -> &str {
        &self.class
    }

    fn field_set(&self) -> &FieldSet {
        &self.fields
    }
}
