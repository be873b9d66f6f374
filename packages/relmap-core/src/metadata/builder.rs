use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::connection::ConnectionResolver;
use super::field_builder::FieldSnapshot;
use super::{BuiltMetadata, ComponentMetadata, EntityMetadata, Field, FieldBuilder, FieldSet};
use crate::characteristics::{Characteristics, DynCharacteristic};
use crate::error::{MetadataError, Result};
use crate::inflect::{self, CaseConversion};
use crate::reflection::{short_name, ClassDescriptor, ClassRegistry, NativeType};
use crate::types::{ColumnType, PropertyType, TypeManager};

/// Which source wins when a declared field is also enriched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldOverride {
    /// Enrichment values replace declared ones.
    Attribute,
    /// Declared values stand; enrichment only fills gaps.
    #[default]
    Mapping,
}

impl FromStr for FieldOverride {
    type Err = MetadataError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "attribute" => Ok(FieldOverride::Attribute),
            "mapping" => Ok(FieldOverride::Mapping),
            other => Err(MetadataError::Config(format!(
                "invalid field override '{}': expected attribute or mapping",
                other
            ))),
        }
    }
}

impl fmt::Display for FieldOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldOverride::Attribute => f.write_str("attribute"),
            FieldOverride::Mapping => f.write_str("mapping"),
        }
    }
}

/// Build behaviour shared by every builder of an engine.
#[derive(Debug, Clone, Copy)]
pub struct BuildOptions {
    pub case: CaseConversion,
    pub field_override: FieldOverride,
    /// Run enrichment from class descriptors.
    pub enrich: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            case: CaseConversion::Snake,
            field_override: FieldOverride::Mapping,
            enrich: true,
        }
    }
}

/// Collaborators a [`MetadataBuilder`] resolves names against.
#[derive(Debug, Clone)]
pub struct BuildContext {
    pub types: Arc<TypeManager>,
    pub characteristics: Arc<Characteristics>,
    pub classes: Arc<ClassRegistry>,
    pub connections: Option<Arc<dyn ConnectionResolver>>,
    pub options: BuildOptions,
}

impl BuildContext {
    /// Context sharing the type manager's class registry.
    pub fn new(types: Arc<TypeManager>) -> Self {
        let classes = types.classes().clone();
        Self {
            types,
            characteristics: Arc::new(Characteristics::new()),
            classes,
            connections: None,
            options: BuildOptions::default(),
        }
    }

    pub fn with_connections(mut self, connections: Arc<dyn ConnectionResolver>) -> Self {
        self.connections = Some(connections);
        self
    }

    pub fn with_options(mut self, options: BuildOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_characteristics(mut self, characteristics: Arc<Characteristics>) -> Self {
        self.characteristics = characteristics;
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataKind {
    #[default]
    Entity,
    Component,
}

/// Assembles the metadata for one class.
///
/// Fields are declared explicitly through [`MetadataBuilder::field`] and its
/// shorthands, and enriched from the class descriptor registered for the
/// class. [`MetadataBuilder::build`] resolves every field against the type
/// manager and consumes the builder.
#[derive(Debug)]
pub struct MetadataBuilder {
    context: BuildContext,
    class: String,
    kind: MetadataKind,
    table: Option<String>,
    connection: Option<String>,
    fields: Vec<FieldBuilder>,
    enrich: bool,
    enriched: bool,
}

impl MetadataBuilder {
    pub fn new(context: BuildContext, class: impl Into<String>) -> Self {
        let enrich = context.options.enrich;
        Self {
            context,
            class: class.into(),
            kind: MetadataKind::Entity,
            table: None,
            connection: None,
            fields: Vec::new(),
            enrich,
            enriched: false,
        }
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn kind(&self) -> MetadataKind {
        self.kind
    }

    pub fn entity(&mut self) -> &mut Self {
        self.kind = MetadataKind::Entity;
        self
    }

    pub fn component(&mut self) -> &mut Self {
        self.kind = MetadataKind::Component;
        self
    }

    pub fn table(&mut self, table: impl Into<String>) -> &mut Self {
        self.table = Some(table.into());
        self
    }

    pub fn connection(&mut self, connection: impl Into<String>) -> &mut Self {
        self.connection = Some(connection.into());
        self
    }

    pub fn do_enrich(&mut self) -> &mut Self {
        self.enrich = true;
        self
    }

    pub fn do_not_enrich(&mut self) -> &mut Self {
        self.enrich = false;
        self
    }

    pub fn is_enriched(&self) -> bool {
        self.enriched
    }

    /// Declares a field, replacing any earlier declaration for the property.
    pub fn field(
        &mut self,
        name: &str,
        property_type: Option<&str>,
        column: Option<&str>,
        column_type: Option<&str>,
        characteristics: Vec<Arc<dyn DynCharacteristic>>,
    ) -> &mut FieldBuilder {
        let mut field = FieldBuilder::new(name, self.context.characteristics.clone());
        if let Some(property_type) = property_type {
            field.property_type(property_type);
        }
        field
            .column(column, column_type)
            .characteristics(characteristics);
        self.put(field)
    }

    /// Existing builder for a property.
    pub fn get_field(&mut self, name: &str) -> Option<&mut FieldBuilder> {
        self.fields.iter_mut().find(|f| f.property() == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.property() == name)
    }

    /// Auto-incrementing big unsigned integer key named `id`.
    pub fn id(&mut self) -> &mut FieldBuilder {
        self.id_with("id", "id")
    }

    pub fn id_with(&mut self, name: &str, column: &str) -> &mut FieldBuilder {
        let factory = self.context.characteristics.clone();
        self.field(
            name,
            Some("integer"),
            Some(column),
            Some("integer"),
            vec![
                factory.big(),
                factory.unsigned(),
                factory.auto_incrementing(None),
            ],
        )
    }

    pub fn string(&mut self, name: &str) -> &mut FieldBuilder {
        self.typed(name, "string")
    }

    pub fn integer(&mut self, name: &str) -> &mut FieldBuilder {
        self.typed(name, "integer")
    }

    pub fn tiny_integer(&mut self, name: &str) -> &mut FieldBuilder {
        self.typed(name, "integer").tiny()
    }

    pub fn small_integer(&mut self, name: &str) -> &mut FieldBuilder {
        self.typed(name, "integer").small()
    }

    pub fn medium_integer(&mut self, name: &str) -> &mut FieldBuilder {
        self.typed(name, "integer").medium()
    }

    pub fn big_integer(&mut self, name: &str) -> &mut FieldBuilder {
        self.typed(name, "integer").big()
    }

    pub fn bool(&mut self, name: &str) -> &mut FieldBuilder {
        self.typed(name, "boolean")
    }

    pub fn float(&mut self, name: &str) -> &mut FieldBuilder {
        self.typed(name, "float")
    }

    pub fn array(&mut self, name: &str) -> &mut FieldBuilder {
        self.typed(name, "array")
    }

    pub fn carbon(&mut self, name: &str) -> &mut FieldBuilder {
        self.typed(name, "Carbon")
    }

    pub fn date_time(&mut self, name: &str) -> &mut FieldBuilder {
        self.typed(name, "DateTimeInterface")
    }

    /// Field typed by the property type registered under a class name.
    pub fn class_field(&mut self, name: &str, class: &str) -> &mut FieldBuilder {
        self.typed(name, class)
    }

    fn typed(&mut self, name: &str, property_type: &str) -> &mut FieldBuilder {
        self.field(name, Some(property_type), None, None, Vec::new())
    }

    fn put(&mut self, field: FieldBuilder) -> &mut FieldBuilder {
        let index = match self.fields.iter().position(|f| f.property() == field.property()) {
            Some(index) => {
                self.fields[index] = field;
                index
            }
            None => {
                self.fields.push(field);
                self.fields.len() - 1
            }
        };
        &mut self.fields[index]
    }

    /// Applies the class descriptor's enrichments, at most once.
    ///
    /// Class enrichments run first. Then every described property without a
    /// declaration becomes a field enriched in place, while declared fields
    /// are enriched on a scratch builder merged under the configured
    /// [`FieldOverride`].
    pub fn enrich(&mut self) -> &mut Self {
        if self.enriched || !self.enrich {
            return self;
        }
        self.enriched = true;

        let Some(descriptor) = self.context.classes.get(&self.class) else {
            tracing::debug!(class = %self.class, "No class descriptor, skipping enrichment");
            return self;
        };

        for enrichment in &descriptor.enrichments {
            enrichment.enrich(self);
        }

        let overwrite = self.context.options.field_override == FieldOverride::Attribute;
        for property in &descriptor.properties {
            let mut scratch =
                FieldBuilder::new(&property.name, self.context.characteristics.clone());
            for enrichment in &property.enrichments {
                enrichment.enrich(&mut scratch);
            }

            match self.get_field(&property.name) {
                Some(declared) => {
                    declared.merge(scratch, overwrite);
                }
                None => {
                    self.put(scratch);
                }
            }
        }

        tracing::debug!(
            class = %self.class,
            class_enrichments = descriptor.enrichments.len(),
            properties = descriptor.properties.len(),
            "Enriched metadata builder"
        );
        self
    }

    /// Resolves every field and produces the metadata.
    ///
    /// # Errors
    /// Fails when a property type or column type cannot be resolved.
    pub fn build(mut self) -> Result<BuiltMetadata> {
        self.enrich();

        let descriptor = self.context.classes.get(&self.class);
        let mut fields = FieldSet::new();
        for field in std::mem::take(&mut self.fields) {
            fields.insert(self.build_field(field.into_snapshot(), descriptor.as_deref())?);
        }

        let built = match self.kind {
            MetadataKind::Entity => {
                let table = self.table.take().unwrap_or_else(|| {
                    inflect::table_name(short_name(&self.class), self.context.options.case)
                });
                tracing::debug!(
                    class = %self.class,
                    table = %table,
                    fields = fields.len(),
                    "Built entity metadata"
                );
                BuiltMetadata::from(EntityMetadata::new(
                    self.class,
                    fields,
                    table,
                    self.connection,
                    self.context.connections,
                ))
            }
            MetadataKind::Component => {
                tracing::debug!(
                    class = %self.class,
                    fields = fields.len(),
                    "Built component metadata"
                );
                BuiltMetadata::from(ComponentMetadata::new(self.class, fields))
            }
        };
        Ok(built)
    }

    fn build_field(
        &self,
        field: FieldSnapshot,
        descriptor: Option<&ClassDescriptor>,
    ) -> Result<Field> {
        let property_type = match &field.property_type {
            Some(name) => {
                self.context
                    .types
                    .property(name)
                    .ok_or_else(|| MetadataError::UnknownPropertyType {
                        class: self.class.clone(),
                        property: field.property.clone(),
                        name: name.clone(),
                    })?
            }
            None => self.infer_property_type(&field.property, descriptor)?,
        };

        let column = field
            .column
            .unwrap_or_else(|| self.context.options.case.apply(&field.property));

        let column_type = match &field.column_type {
            Some(name) => self.context.types.column(name).ok_or_else(|| {
                MetadataError::UnknownColumnType {
                    class: self.class.clone(),
                    property: field.property.clone(),
                    name: name.clone(),
                }
            })?,
            None => self.default_column_type(&field.property, property_type.as_ref())?,
        };

        tracing::trace!(
            class = %self.class,
            property = %field.property,
            property_type = property_type.name(),
            column = %column,
            column_type = column_type.name(),
            "Resolved field"
        );

        Ok(Field::new(
            field.property,
            property_type,
            column,
            column_type,
            field.characteristics,
        ))
    }

    fn infer_property_type(
        &self,
        property: &str,
        descriptor: Option<&ClassDescriptor>,
    ) -> Result<Arc<dyn PropertyType>> {
        let unresolved = |reason: String| MetadataError::UnresolvedPropertyType {
            class: self.class.clone(),
            property: property.to_string(),
            reason,
        };

        let descriptor =
            descriptor.ok_or_else(|| unresolved("no class descriptor is registered".to_string()))?;
        let declared = descriptor
            .find_property(property)
            .ok_or_else(|| MetadataError::UnknownProperty {
                class: self.class.clone(),
                property: property.to_string(),
            })?;

        match declared.native_type.inner() {
            NativeType::Union(_) => Err(unresolved(format!(
                "union type '{}' cannot be mapped",
                declared.native_type
            ))),
            NativeType::Untyped => Err(unresolved("no declared type".to_string())),
            native => self
                .context
                .types
                .property_by_native(native)
                .ok_or_else(|| unresolved(format!("no property type matches '{}'", native))),
        }
    }

    fn default_column_type(
        &self,
        property: &str,
        property_type: &dyn PropertyType,
    ) -> Result<Arc<dyn ColumnType>> {
        self.context
            .types
            .column_by_property(property_type.name())
            .ok_or_else(|| MetadataError::NoDefaultColumnMapping {
                class: self.class.clone(),
                property: property.to_string(),
                property_type: property_type.name().to_string(),
            })
    }
}
