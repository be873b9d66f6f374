use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::builtin_types;
use super::{ColumnDefinition, ColumnType, PropertyType, RegisteredType};
use crate::error::{MetadataError, Result};
use crate::reflection::{ClassRegistry, NativeType};

#[derive(Debug, Default)]
struct Registry {
    properties: HashMap<String, Arc<dyn PropertyType>>,
    columns: HashMap<String, Arc<dyn ColumnType>>,
    /// Exact class → property type name.
    exact_classes: HashMap<String, String>,
    /// Ancestor class → property type name, in registration order.
    inherited_classes: Vec<(String, String)>,
    /// Property type name → default column type name.
    property_columns: HashMap<String, String>,
    /// Column type name → default property type name.
    column_properties: HashMap<String, String>,
}

/// Registry of property and column types.
///
/// Holds every registered type by name, the class indices used to resolve
/// class-typed properties, and the default mappings between property and
/// column types. Registration takes a write lock; lookups share a read lock.
#[derive(Debug)]
pub struct TypeManager {
    registry: RwLock<Registry>,
    classes: Arc<ClassRegistry>,
}

impl Default for TypeManager {
    fn default() -> Self {
        Self::new(Arc::new(ClassRegistry::new()))
    }
}

impl TypeManager {
    /// Creates an empty type manager resolving class hierarchies through `classes`.
    pub fn new(classes: Arc<ClassRegistry>) -> Self {
        Self {
            registry: RwLock::new(Registry::default()),
            classes,
        }
    }

    /// Creates a type manager with every built-in type and the stock defaults.
    pub fn with_builtin_types(classes: Arc<ClassRegistry>) -> Result<Self> {
        let types = Self::new(classes);
        builtin_types::register_builtin_types(&types)?;
        Ok(types)
    }

    pub fn classes(&self) -> &Arc<ClassRegistry> {
        &self.classes
    }

    /// Registers a property or column type under its name.
    pub fn register(&self, ty: RegisteredType) -> Result<()> {
        match ty {
            RegisteredType::Property(property) => self.register_property(property),
            RegisteredType::Column(column) => self.register_column(column),
        }
    }

    /// Registers a property type.
    ///
    /// Class-bound types are also indexed by class: exact-match types by the
    /// class itself, others as an ancestor matcher. Re-registering an ancestor
    /// keeps its original position.
    pub fn register_property(&self, property: Arc<dyn PropertyType>) -> Result<()> {
        let mut registry = self
            .registry
            .write()
            .map_err(|_| MetadataError::LockPoisoned)?;

        let name = property.name().to_string();
        if let Some(class_match) = property.class_match() {
            if class_match.exact {
                registry
                    .exact_classes
                    .insert(class_match.class, name.clone());
            } else {
                let position = registry
                    .inherited_classes
                    .iter()
                    .position(|(class, _)| *class == class_match.class);
                match position {
                    Some(index) => registry.inherited_classes[index].1 = name.clone(),
                    None => registry
                        .inherited_classes
                        .push((class_match.class, name.clone())),
                }
            }
        }

        tracing::debug!(name = %name, "Registered property type");
        registry.properties.insert(name, property);
        Ok(())
    }

    /// Registers a column type.
    pub fn register_column(&self, column: Arc<dyn ColumnType>) -> Result<()> {
        let mut registry = self
            .registry
            .write()
            .map_err(|_| MetadataError::LockPoisoned)?;

        let name = column.name().to_string();
        tracing::debug!(name = %name, "Registered column type");
        registry.columns.insert(name, column);
        Ok(())
    }

    /// Registers the built-in type(s) known by `name`.
    ///
    /// A name shared by a property and a column type registers both.
    ///
    /// # Errors
    /// `InvalidType` if the name is neither a property nor a column type.
    pub fn register_named(&self, name: &str) -> Result<()> {
        let property = builtin_types::property_type(name);
        let column = builtin_types::column_type(name);
        if property.is_none() && column.is_none() {
            return Err(MetadataError::InvalidType {
                name: name.to_string(),
            });
        }

        if let Some(property) = property {
            self.register_property(property)?;
        }
        if let Some(column) = column {
            self.register_column(column)?;
        }
        Ok(())
    }

    /// Registers the built-in property type known by `name`.
    pub fn register_named_property(&self, name: &str) -> Result<()> {
        let property =
            builtin_types::property_type(name).ok_or_else(|| MetadataError::InvalidType {
                name: name.to_string(),
            })?;
        self.register_property(property)
    }

    /// Registers the built-in column type known by `name`.
    pub fn register_named_column(&self, name: &str) -> Result<()> {
        let column = builtin_types::column_type(name).ok_or_else(|| MetadataError::InvalidType {
            name: name.to_string(),
        })?;
        self.register_column(column)
    }

    /// Sets the default column type for a property type.
    ///
    /// With `reverse`, the column type's default property type is set under
    /// the same lock.
    pub fn map_property_default_column_type(
        &self,
        property: &str,
        column: &str,
        reverse: bool,
    ) -> Result<()> {
        let mut registry = self
            .registry
            .write()
            .map_err(|_| MetadataError::LockPoisoned)?;

        registry
            .property_columns
            .insert(property.to_string(), column.to_string());
        if reverse {
            registry
                .column_properties
                .insert(column.to_string(), property.to_string());
        }

        tracing::debug!(property, column, reverse, "Mapped default column type");
        Ok(())
    }

    /// Sets the default property type for a column type.
    ///
    /// With `reverse`, the property type's default column type is set under
    /// the same lock.
    pub fn map_column_default_property_type(
        &self,
        column: &str,
        property: &str,
        reverse: bool,
    ) -> Result<()> {
        let mut registry = self
            .registry
            .write()
            .map_err(|_| MetadataError::LockPoisoned)?;

        registry
            .column_properties
            .insert(column.to_string(), property.to_string());
        if reverse {
            registry
                .property_columns
                .insert(property.to_string(), column.to_string());
        }

        tracing::debug!(column, property, reverse, "Mapped default property type");
        Ok(())
    }

    pub fn property(&self, name: &str) -> Option<Arc<dyn PropertyType>> {
        let registry = self.registry.read().ok()?;
        registry.properties.get(name).cloned()
    }

    pub fn column(&self, name: &str) -> Option<Arc<dyn ColumnType>> {
        let registry = self.registry.read().ok()?;
        registry.columns.get(name).cloned()
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.property(name).is_some()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Resolves the property type for a declared native type.
    ///
    /// Scalars resolve by name, classes through [`TypeManager::property_by_class`].
    /// Optional types resolve as their inner type; unions and untyped
    /// declarations never resolve.
    pub fn property_by_native(&self, native: &NativeType) -> Option<Arc<dyn PropertyType>> {
        match native {
            NativeType::Builtin(builtin) => self.property(builtin.type_name()),
            NativeType::Class(class) => self.property_by_class(class),
            NativeType::Optional(inner) => self.property_by_native(inner),
            NativeType::Union(_) | NativeType::Untyped => None,
        }
    }

    /// Resolves the property type for a class.
    ///
    /// Exact-class registrations win; otherwise ancestor matchers are tried in
    /// registration order and the first one the class descends from wins.
    pub fn property_by_class(&self, class: &str) -> Option<Arc<dyn PropertyType>> {
        let registry = self.registry.read().ok()?;

        if let Some(name) = registry.exact_classes.get(class) {
            return registry.properties.get(name).cloned();
        }

        registry
            .inherited_classes
            .iter()
            .find(|(ancestor, _)| self.classes.is_subclass_of(class, ancestor))
            .and_then(|(_, name)| registry.properties.get(name).cloned())
    }

    /// Default property type for a column type.
    pub fn property_by_column(&self, column: &str) -> Option<Arc<dyn PropertyType>> {
        let registry = self.registry.read().ok()?;
        let name = registry.column_properties.get(column)?;
        registry.properties.get(name).cloned()
    }

    /// Default column type for a property type.
    pub fn column_by_property(&self, property: &str) -> Option<Arc<dyn ColumnType>> {
        let registry = self.registry.read().ok()?;
        let name = registry.property_columns.get(property)?;
        registry.columns.get(name).cloned()
    }

    /// Name of the default column type for a property type, registered or not.
    pub fn default_column_name(&self, property: &str) -> Option<String> {
        let registry = self.registry.read().ok()?;
        registry.property_columns.get(property).cloned()
    }

    /// Column type that produces the definition's column flavour.
    pub fn column_by_definition(&self, definition: &ColumnDefinition) -> Option<Arc<dyn ColumnType>> {
        self.column(definition.kind.column_type())
    }

    /// Registered property type names, sorted.
    pub fn property_names(&self) -> Vec<String> {
        let registry = match self.registry.read() {
            Ok(guard) => guard,
            Err(_) => return Vec::new(),
        };
        let mut names: Vec<_> = registry.properties.keys().cloned().collect();
        names.sort();
        names
    }

    /// Registered column type names, sorted.
    pub fn column_names(&self) -> Vec<String> {
        let registry = match self.registry.read() {
            Ok(guard) => guard,
            Err(_) => return Vec::new(),
        };
        let mut names: Vec<_> = registry.columns.keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CastError;
    use crate::metadata::{Field, Metadata};
    use crate::reflection::{BuiltinType, ClassDescriptor};
    use crate::types::properties::{CarbonPropertyType, DateTimePropertyType, IntegerPropertyType};
    use crate::types::{ClassMatch, ColumnKind, FieldType};
    use crate::value::Value;

    fn classes() -> Arc<ClassRegistry> {
        let classes = Arc::new(ClassRegistry::new());
        classes
            .register(ClassDescriptor::new("Carbon").extends("DateTimeInterface"))
            .unwrap();
        classes
            .register(ClassDescriptor::new("DateTimeImmutable").extends("DateTimeInterface"))
            .unwrap();
        classes
    }

    #[test]
    fn test_bidirectional_default_mapping() {
        let types = TypeManager::default();
        types.register(RegisteredType::Property(Arc::new(IntegerPropertyType))).unwrap();
        types.register_named_column("integer").unwrap();

        types
            .map_property_default_column_type("integer", "integer", true)
            .unwrap();

        assert_eq!(
            types.column_by_property("integer").map(|c| c.name().to_string()),
            Some("integer".to_string())
        );
        assert_eq!(
            types.property_by_column("integer").map(|p| p.name().to_string()),
            Some("integer".to_string())
        );
    }

    #[test]
    fn test_one_way_default_mapping() {
        let types = TypeManager::with_builtin_types(classes()).unwrap();
        types
            .map_column_default_property_type("char", "string", false)
            .unwrap();

        assert_eq!(
            types.property_by_column("char").map(|p| p.name().to_string()),
            Some("string".to_string())
        );
        // string still defaults to the string column
        assert_eq!(
            types.column_by_property("string").map(|c| c.name().to_string()),
            Some("string".to_string())
        );
    }

    #[test]
    fn test_exact_class_beats_inheritance() {
        let types = TypeManager::new(classes());
        types.register_property(Arc::new(DateTimePropertyType)).unwrap();
        types.register_property(Arc::new(CarbonPropertyType)).unwrap();

        let carbon = types.property_by_class("Carbon").unwrap();
        assert_eq!(carbon.name(), "Carbon");

        let immutable = types.property_by_class("DateTimeImmutable").unwrap();
        assert_eq!(immutable.name(), "DateTimeInterface");

        assert!(types.property_by_class("Money").is_none());
    }

    #[derive(Debug)]
    struct Matcher(&'static str, &'static str);

    impl FieldType for Matcher {
        fn name(&self) -> &str {
            self.0
        }

        fn cast(
            &self,
            value: Value,
            _: &Field,
            _: &dyn Metadata,
        ) -> std::result::Result<Value, CastError> {
            Ok(value)
        }
    }

    impl PropertyType for Matcher {
        fn class_match(&self) -> Option<ClassMatch> {
            Some(ClassMatch {
                class: self.1.to_string(),
                exact: false,
            })
        }
    }

    #[test]
    fn test_first_registered_ancestor_wins() {
        let classes = classes();
        classes
            .register(ClassDescriptor::new("DateTimeInterface").extends("Stringable"))
            .unwrap();
        let types = TypeManager::new(classes);

        types.register_property(Arc::new(Matcher("stringable", "Stringable"))).unwrap();
        types.register_property(Arc::new(DateTimePropertyType)).unwrap();

        let resolved = types.property_by_class("DateTimeImmutable").unwrap();
        assert_eq!(resolved.name(), "stringable");

        // Replacing a matcher keeps its position
        types.register_property(Arc::new(Matcher("text", "Stringable"))).unwrap();
        let resolved = types.property_by_class("DateTimeImmutable").unwrap();
        assert_eq!(resolved.name(), "text");
    }

    #[test]
    fn test_property_by_native() {
        let types = TypeManager::with_builtin_types(classes()).unwrap();

        let int = types
            .property_by_native(&NativeType::Builtin(BuiltinType::Int))
            .unwrap();
        assert_eq!(int.name(), "integer");

        let optional = types
            .property_by_native(&NativeType::class("Carbon").optional())
            .unwrap();
        assert_eq!(optional.name(), "Carbon");

        assert!(types.property_by_native(&NativeType::Untyped).is_none());
        assert!(types
            .property_by_native(&NativeType::parse("int|string"))
            .is_none());
    }

    #[test]
    fn test_register_named() {
        let types = TypeManager::default();
        types.register_named("integer").unwrap();
        assert!(types.has_property("integer"));
        assert!(types.has_column("integer"));

        types.register_named("timestamp").unwrap();
        assert!(types.has_column("timestamp"));
        assert!(!types.has_property("timestamp"));

        let err = types.register_named("uuid").unwrap_err();
        assert!(matches!(err, MetadataError::InvalidType { name } if name == "uuid"));
    }

    #[test]
    fn test_column_by_definition() {
        let types = TypeManager::with_builtin_types(classes()).unwrap();
        let definition = ColumnDefinition::new("tags", ColumnKind::Jsonb);

        let column = types.column_by_definition(&definition).unwrap();
        assert_eq!(column.name(), "json");
    }

    #[test]
    fn test_lookups_return_none() {
        let types = TypeManager::default();
        assert!(types.property("integer").is_none());
        assert!(types.column("integer").is_none());
        assert!(types.column_by_property("integer").is_none());
        assert!(types.property_names().is_empty());
    }
}
