//! Narrow database connection contract consumed by entity metadata.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::value::DEFAULT_DATE_FORMAT;

/// A database connection, as far as metadata is concerned.
pub trait Connection: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    /// `chrono` format used for timestamp columns.
    fn date_format(&self) -> &str;
}

/// Resolves connections by name; `None` asks for the default connection.
pub trait ConnectionResolver: fmt::Debug + Send + Sync {
    fn connection(&self, name: Option<&str>) -> Option<Arc<dyn Connection>>;
}

/// Connection described only by its name and date format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticConnection {
    name: String,
    date_format: String,
}

impl StaticConnection {
    pub fn new(name: impl Into<String>, date_format: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            date_format: date_format.into(),
        }
    }

    /// Connection using [`DEFAULT_DATE_FORMAT`].
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name, DEFAULT_DATE_FORMAT)
    }
}

impl Connection for StaticConnection {
    fn name(&self) -> &str {
        &self.name
    }

    fn date_format(&self) -> &str {
        &self.date_format
    }
}

/// Name-keyed set of connections with an optional default.
#[derive(Debug, Default, Clone)]
pub struct ConnectionMap {
    default: Option<String>,
    connections: HashMap<String, Arc<dyn Connection>>,
}

impl ConnectionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default(mut self, name: impl Into<String>) -> Self {
        self.default = Some(name.into());
        self
    }

    pub fn insert(&mut self, connection: Arc<dyn Connection>) {
        self.connections
            .insert(connection.name().to_string(), connection);
    }

    pub fn with(mut self, connection: impl Connection + 'static) -> Self {
        self.insert(Arc::new(connection));
        self
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

impl ConnectionResolver for ConnectionMap {
    fn connection(&self, name: Option<&str>) -> Option<Arc<dyn Connection>> {
        let name = name.or(self.default.as_deref())?;
        self.connections.get(name).cloned()
    }
}
