//! Engine configuration.
//!
//! Supports TOML config files, environment variable overrides, and defaults
//! matching the stock type setup.

use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MetadataError, Result};
use crate::inflect::CaseConversion;
use crate::metadata::{BuildOptions, FieldOverride};
use crate::types::builtin_types;

/// Top-level configuration for an [`Engine`](crate::Engine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataConfig {
    /// Enrich builders from class descriptors (default: true)
    pub inspect: bool,
    /// Case style of derived table and column names (default: snake)
    pub case_conversion: CaseConversion,
    /// Which side wins when a declared field is also enriched (default: mapping)
    pub field_override: FieldOverride,
    pub types: TypesConfig,
    pub defaults: DefaultsConfig,
    /// Names of registered mappings to map at boot
    pub mappings: Vec<String>,
    /// Namespace prefix → directory of mapping files
    pub discovery: BTreeMap<String, PathBuf>,
    pub connections: ConnectionsConfig,
}

/// Built-in types to register, in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypesConfig {
    pub property: Vec<String>,
    pub column: Vec<String>,
}

/// Default cross-mappings between property and column types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Property type → column type
    pub property: BTreeMap<String, String>,
    /// Column type → property type
    pub column: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionsConfig {
    /// Connection used when an entity names none
    pub default: Option<String>,
    pub databases: BTreeMap<String, DatabaseConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// strftime pattern for timestamp columns
    pub date_format: Option<String>,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            inspect: true,
            case_conversion: CaseConversion::Snake,
            field_override: FieldOverride::Mapping,
            types: TypesConfig::default(),
            defaults: DefaultsConfig::default(),
            mappings: Vec::new(),
            discovery: BTreeMap::new(),
            connections: ConnectionsConfig::default(),
        }
    }
}

impl Default for TypesConfig {
    fn default() -> Self {
        Self {
            property: to_strings(builtin_types::PROPERTY_TYPES),
            column: to_strings(builtin_types::COLUMN_TYPES),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            property: builtin_types::DEFAULT_MAPPINGS
                .iter()
                .map(|(property, column)| (property.to_string(), column.to_string()))
                .collect(),
            column: BTreeMap::new(),
        }
    }
}

fn to_strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

impl MetadataConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| MetadataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| MetadataError::Config(format!("Invalid TOML: {}", e)))
    }

    /// Saves the configuration to a TOML file.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let toml = toml::to_string_pretty(self)
            .map_err(|e| MetadataError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, toml).map_err(|source| MetadataError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies environment variable overrides.
    /// Environment variables are prefixed with `RELMAP_`.
    /// Example: `RELMAP_CASE_CONVERSION=kebab` overrides `case_conversion`.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| env::var(key).ok())
    }

    /// Applies `RELMAP_*` overrides read through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("RELMAP_INSPECTION") {
            self.inspect = val
                .trim()
                .parse()
                .map_err(|_| MetadataError::Config(format!("Invalid inspection: {}", val)))?;
        }
        if let Some(val) = lookup("RELMAP_CASE_CONVERSION") {
            self.case_conversion = val.parse()?;
        }
        if let Some(val) = lookup("RELMAP_FIELD_OVERRIDE") {
            self.field_override = val.parse()?;
        }
        Ok(())
    }

    /// Builder options derived from this configuration.
    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            case: self.case_conversion,
            field_override: self.field_override,
            enrich: self.inspect,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = MetadataConfig::default();
        assert!(config.inspect);
        assert_eq!(config.case_conversion, CaseConversion::Snake);
        assert_eq!(config.field_override, FieldOverride::Mapping);
        assert_eq!(config.types.property.len(), 7);
        assert_eq!(config.types.column.len(), 7);
        assert_eq!(config.defaults.property.get("Carbon").map(String::as_str), Some("timestamp"));
        assert!(config.defaults.column.is_empty());
    }

    #[test]
    fn test_from_toml() {
        let config = MetadataConfig::from_toml(
            r#"
            inspect = false
            case_conversion = "camel"
            field_override = "attribute"
            mappings = ["users"]

            [types]
            property = ["integer", "string"]
            column = ["integer", "string"]

            [defaults.property]
            integer = "integer"

            [discovery]
            "App\\Mappings" = "mappings"

            [connections]
            default = "main"

            [connections.databases.main]
            date_format = "%d/%m/%Y %H:%M"
            "#,
        )
        .unwrap();

        assert!(!config.inspect);
        assert_eq!(config.case_conversion, CaseConversion::Camel);
        assert_eq!(config.field_override, FieldOverride::Attribute);
        assert_eq!(config.types.property, vec!["integer", "string"]);
        assert_eq!(config.defaults.property.len(), 1);
        assert_eq!(config.discovery.get("App\\Mappings"), Some(&PathBuf::from("mappings")));
        assert_eq!(config.connections.default.as_deref(), Some("main"));
        assert_eq!(
            config.connections.databases["main"].date_format.as_deref(),
            Some("%d/%m/%Y %H:%M")
        );

        let options = config.build_options();
        assert!(!options.enrich);
        assert_eq!(options.case, CaseConversion::Camel);
    }

    #[test]
    fn test_invalid_toml() {
        let err = MetadataConfig::from_toml("case_conversion = \"shouty\"").unwrap_err();
        assert!(matches!(err, MetadataError::Config(_)));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("relmap.toml");

        let mut config = MetadataConfig::default();
        config.case_conversion = CaseConversion::Kebab;
        config.save_to_file(&path).unwrap();

        let loaded = MetadataConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("RELMAP_CASE_CONVERSION", "studly"),
            ("RELMAP_FIELD_OVERRIDE", "attribute"),
            ("RELMAP_INSPECTION", "false"),
        ]
        .into_iter()
        .collect();

        let mut config = MetadataConfig::default();
        config
            .apply_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.case_conversion, CaseConversion::Studly);
        assert_eq!(config.field_override, FieldOverride::Attribute);
        assert!(!config.inspect);

        let err = MetadataConfig::default()
            .apply_overrides(|key| (key == "RELMAP_INSPECTION").then(|| "sometimes".to_string()))
            .unwrap_err();
        assert!(matches!(err, MetadataError::Config(_)));
    }

    #[test]
    fn test_no_overrides_keeps_config() {
        let mut config = MetadataConfig::default();
        config.apply_overrides(|_| None).unwrap();
        assert_eq!(config, MetadataConfig::default());
    }
}
