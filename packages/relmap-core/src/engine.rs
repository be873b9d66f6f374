//! Bootstraps the type manager, connections and metadata manager from a
//! [`MetadataConfig`].

use std::collections::HashSet;
use std::sync::Arc;

use crate::config::MetadataConfig;
use crate::error::Result;
use crate::manager::MetadataManager;
use crate::mapping::{discover, Mapping};
use crate::metadata::{BuildContext, BuiltMetadata, ConnectionMap, StaticConnection};
use crate::reflection::ClassRegistry;
use crate::types::TypeManager;

/// A configured metadata engine.
#[derive(Debug)]
pub struct Engine {
    config: MetadataConfig,
    types: Arc<TypeManager>,
    connections: Arc<ConnectionMap>,
    manager: MetadataManager,
}

impl Engine {
    /// Registers the configured types, default mappings and connections.
    ///
    /// Property defaults are applied before column defaults, both with
    /// reverse mapping enabled.
    ///
    /// # Errors
    /// `InvalidType` for a configured type name that is not a built-in type.
    pub fn new(config: MetadataConfig) -> Result<Self> {
        let classes = Arc::new(ClassRegistry::new());
        let types = TypeManager::new(classes);
        for name in &config.types.property {
            types.register_named_property(name)?;
        }
        for name in &config.types.column {
            types.register_named_column(name)?;
        }
        for (property, column) in &config.defaults.property {
            types.map_property_default_column_type(property, column, true)?;
        }
        for (column, property) in &config.defaults.column {
            types.map_column_default_property_type(column, property, true)?;
        }
        let types = Arc::new(types);

        let mut connections = ConnectionMap::new();
        if let Some(default) = &config.connections.default {
            connections = connections.with_default(default);
        }
        for (name, database) in &config.connections.databases {
            connections = match &database.date_format {
                Some(format) => connections.with(StaticConnection::new(name, format)),
                None => connections.with(StaticConnection::named(name)),
            };
        }
        let connections = Arc::new(connections);

        let context = BuildContext::new(types.clone())
            .with_connections(connections.clone())
            .with_options(config.build_options());

        tracing::debug!(
            property_types = config.types.property.len(),
            column_types = config.types.column.len(),
            connections = connections.len(),
            case = %config.case_conversion,
            field_override = %config.field_override,
            "Initialized metadata engine"
        );

        Ok(Self {
            config,
            types,
            connections,
            manager: MetadataManager::new(context),
        })
    }

    /// Loads the config file, applies environment overrides and builds the engine.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let mut config = MetadataConfig::from_file(path)?;
        config.apply_env_overrides()?;
        Self::new(config)
    }

    /// Discovers mapping files, then maps every discovered and configured mapping.
    ///
    /// Class descriptors implied by mapping files are registered unless the
    /// class already has one.
    ///
    /// # Errors
    /// `UnknownMapping` for a configured name with no registered mapping,
    /// otherwise the first build failure.
    pub fn map_all(&self) -> Result<Vec<BuiltMetadata>> {
        let mut names = Vec::new();
        for (namespace, dir) in &self.config.discovery {
            for discovered in discover(dir, namespace)? {
                let classes = self.classes();
                if let Some(descriptor) = discovered.mapping.descriptor() {
                    if !classes.contains(&descriptor.name) {
                        classes.register(descriptor)?;
                    }
                }
                self.manager
                    .register_mapping(discovered.name.clone(), Arc::new(discovered.mapping))?;
                names.push(discovered.name);
            }
        }
        names.extend(self.config.mappings.iter().cloned());

        let mut seen = HashSet::new();
        let mut built = Vec::new();
        for name in names {
            if seen.insert(name.clone()) {
                built.push(self.manager.map_named(&name)?);
            }
        }

        tracing::debug!(count = built.len(), "Mapped all configured mappings");
        Ok(built)
    }

    /// Registers a mapping to be mapped by name.
    pub fn register_mapping(&self, name: impl Into<String>, mapping: Arc<dyn Mapping>) -> Result<()> {
        self.manager.register_mapping(name, mapping)
    }

    pub fn config(&self) -> &MetadataConfig {
        &self.config
    }

    pub fn types(&self) -> &Arc<TypeManager> {
        &self.types
    }

    pub fn classes(&self) -> &Arc<ClassRegistry> {
        self.types.classes()
    }

    pub fn connections(&self) -> &Arc<ConnectionMap> {
        &self.connections
    }

    pub fn manager(&self) -> &MetadataManager {
        &self.manager
    }
}
