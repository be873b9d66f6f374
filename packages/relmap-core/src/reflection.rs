//! Static class descriptions.
//!
//! Classes are described by [`ClassDescriptor`] values registered up front in a
//! [`ClassRegistry`]: declared properties with their native types, parent
//! classes and interfaces, and the enrichments attached at class and property
//! level. The builder and the type manager read them instead of inspecting
//! types at runtime.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::sync::{Arc, RwLock};

use crate::enrichment::{Enrichment, FieldEnrichment};
use crate::error::{MetadataError, Result};

/// Scalar native types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinType {
    Int,
    Float,
    String,
    Bool,
    Array,
}

impl BuiltinType {
    /// Name of the property type that handles this scalar.
    pub fn type_name(&self) -> &'static str {
        match self {
            BuiltinType::Int => "integer",
            BuiltinType::Float => "float",
            BuiltinType::String => "string",
            BuiltinType::Bool => "boolean",
            BuiltinType::Array => "array",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "int" | "integer" => Some(BuiltinType::Int),
            "float" | "double" => Some(BuiltinType::Float),
            "string" => Some(BuiltinType::String),
            "bool" | "boolean" => Some(BuiltinType::Bool),
            "array" => Some(BuiltinType::Array),
            _ => None,
        }
    }
}

/// Declared type of a property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeType {
    Builtin(BuiltinType),
    Class(String),
    /// Nullable form of another type.
    Optional(Box<NativeType>),
    Union(Vec<NativeType>),
    Untyped,
}

impl NativeType {
    pub fn class(name: impl Into<String>) -> Self {
        NativeType::Class(name.into())
    }

    pub fn optional(self) -> Self {
        match self {
            NativeType::Optional(_) => self,
            other => NativeType::Optional(Box::new(other)),
        }
    }

    /// Strips any optional wrapper.
    pub fn inner(&self) -> &NativeType {
        match self {
            NativeType::Optional(inner) => inner.inner(),
            other => other,
        }
    }

    /// Parses a type declaration such as `int`, `?Carbon` or `int|string`.
    pub fn parse(declaration: &str) -> Self {
        let declaration = declaration.trim();
        if declaration.is_empty() || declaration.eq_ignore_ascii_case("mixed") {
            return NativeType::Untyped;
        }
        if let Some(rest) = declaration.strip_prefix('?') {
            return NativeType::parse(rest).optional();
        }
        if declaration.contains('|') {
            let mut members: Vec<_> = declaration
                .split('|')
                .map(str::trim)
                .filter(|member| !member.eq_ignore_ascii_case("null"))
                .map(NativeType::parse)
                .collect();
            return match members.len() {
                1 => members.remove(0).optional(),
                _ => NativeType::Union(members),
            };
        }
        match BuiltinType::parse(declaration) {
            Some(builtin) => NativeType::Builtin(builtin),
            None => NativeType::Class(declaration.trim_start_matches('\\').to_string()),
        }
    }
}

impl fmt::Display for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NativeType::Builtin(builtin) => f.write_str(builtin.type_name()),
            NativeType::Class(class) => f.write_str(class),
            NativeType::Optional(inner) => write!(f, "?{}", inner),
            NativeType::Union(members) => {
                let names: Vec<_> = members.iter().map(ToString::to_string).collect();
                f.write_str(&names.join("|"))
            }
            NativeType::Untyped => f.write_str("mixed"),
        }
    }
}

/// A declared property.
#[derive(Debug, Clone)]
pub struct PropertyDescriptor {
    pub name: String,
    pub native_type: NativeType,
    pub enrichments: Vec<Arc<dyn FieldEnrichment>>,
}

impl PropertyDescriptor {
    pub fn new(name: impl Into<String>, native_type: NativeType) -> Self {
        Self {
            name: name.into(),
            native_type,
            enrichments: Vec::new(),
        }
    }

    /// Attaches a property-level enrichment. Order is preserved.
    pub fn enrich(mut self, enrichment: impl FieldEnrichment + 'static) -> Self {
        self.enrichments.push(Arc::new(enrichment));
        self
    }
}

/// A described class.
#[derive(Debug, Clone)]
pub struct ClassDescriptor {
    pub name: String,
    pub parents: Vec<String>,
    pub properties: Vec<PropertyDescriptor>,
    pub enrichments: Vec<Arc<dyn Enrichment>>,
}

impl ClassDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parents: Vec::new(),
            properties: Vec::new(),
            enrichments: Vec::new(),
        }
    }

    /// Adds a parent class or implemented interface.
    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.parents.push(parent.into());
        self
    }

    pub fn property(mut self, property: PropertyDescriptor) -> Self {
        self.properties.push(property);
        self
    }

    /// Attaches a class-level enrichment. Order is preserved.
    pub fn enrich(mut self, enrichment: impl Enrichment + 'static) -> Self {
        self.enrichments.push(Arc::new(enrichment));
        self
    }

    pub fn find_property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// Registry of class descriptors.
#[derive(Debug, Default)]
pub struct ClassRegistry {
    classes: RwLock<HashMap<String, Arc<ClassDescriptor>>>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a descriptor, replacing any previous one for the class.
    pub fn register(&self, descriptor: ClassDescriptor) -> Result<()> {
        let mut classes = self
            .classes
            .write()
            .map_err(|_| MetadataError::LockPoisoned)?;

        tracing::debug!(class = %descriptor.name, "Registered class descriptor");
        classes.insert(descriptor.name.clone(), Arc::new(descriptor));
        Ok(())
    }

    pub fn get(&self, class: &str) -> Option<Arc<ClassDescriptor>> {
        let classes = self.classes.read().ok()?;
        classes.get(class).cloned()
    }

    pub fn contains(&self, class: &str) -> bool {
        match self.classes.read() {
            Ok(classes) => classes.contains_key(class),
            Err(_) => false,
        }
    }

    /// Whether `class` is `ancestor` or inherits from it, directly or not.
    pub fn is_subclass_of(&self, class: &str, ancestor: &str) -> bool {
        if class == ancestor {
            return true;
        }
        let classes = match self.classes.read() {
            Ok(guard) => guard,
            Err(_) => return false,
        };

        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([class]);
        while let Some(current) = queue.pop_front() {
            if !seen.insert(current) {
                continue;
            }
            let Some(descriptor) = classes.get(current) else {
                continue;
            };
            for parent in &descriptor.parents {
                if parent == ancestor {
                    return true;
                }
                queue.push_back(parent);
            }
        }
        false
    }
}

/// Class name without its namespace (`App\Models\User` → `User`).
pub fn short_name(class: &str) -> &str {
    class
        .rsplit(['\\', ':', '.'])
        .find(|segment| !segment.is_empty())
        .unwrap_or(class)
}
