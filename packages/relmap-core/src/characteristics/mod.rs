//! Field characteristics: typed tags attached to fields and queried by kind.
//!
//! The set of kinds is open. Any type implementing [`Characteristic`] can be
//! attached to a field; fields store at most one instance per kind, keyed by
//! the kind's `TypeId`.

mod factory;
mod kinds;

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub use factory::Characteristics;
pub use kinds::*;

/// A characteristic kind.
///
/// Kinds declaring `SINGLETON = true` carry no data and are shared
/// process-wide through the [`Characteristics`] factory.
pub trait Characteristic: fmt::Debug + Send + Sync + 'static {
    /// Stable name used in diagnostics and mapping files.
    const NAME: &'static str;

    /// Whether the factory should cache a single shared instance.
    const SINGLETON: bool = false;
}

/// Object-safe view of a characteristic instance.
pub trait DynCharacteristic: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    fn kind(&self) -> CharacteristicKind;

    fn as_any(&self) -> &dyn Any;
}

impl<C: Characteristic> DynCharacteristic for C {
    fn name(&self) -> &'static str {
        C::NAME
    }

    fn kind(&self) -> CharacteristicKind {
        CharacteristicKind::of::<C>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Identity token for a characteristic kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CharacteristicKind {
    id: TypeId,
    name: &'static str,
}

impl CharacteristicKind {
    pub fn of<C: Characteristic>() -> Self {
        Self {
            id: TypeId::of::<C>(),
            name: C::NAME,
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for CharacteristicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Characteristics attached to a field, one per kind.
#[derive(Debug, Clone, Default)]
pub struct CharacteristicSet {
    entries: HashMap<TypeId, Arc<dyn DynCharacteristic>>,
}

impl CharacteristicSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a characteristic, replacing any previous one of the same kind.
    pub fn insert(&mut self, characteristic: Arc<dyn DynCharacteristic>) {
        self.entries
            .insert(characteristic.kind().id(), characteristic);
    }

    pub fn remove(&mut self, kind: CharacteristicKind) -> Option<Arc<dyn DynCharacteristic>> {
        self.entries.remove(&kind.id())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn has<C: Characteristic>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<C>())
    }

    pub fn has_kind(&self, kind: CharacteristicKind) -> bool {
        self.entries.contains_key(&kind.id())
    }

    /// Returns the characteristic of kind `C`, downcast to its concrete type.
    pub fn get<C: Characteristic>(&self) -> Option<&C> {
        self.entries
            .get(&TypeId::of::<C>())
            .and_then(|c| c.as_any().downcast_ref::<C>())
    }

    /// Returns the shared handle for a kind.
    pub fn handle(&self, kind: CharacteristicKind) -> Option<&Arc<dyn DynCharacteristic>> {
        self.entries.get(&kind.id())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn DynCharacteristic>> {
        self.entries.values()
    }

    /// Kind names, sorted for stable output.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.entries.values().map(|c| c.name()).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<Arc<dyn DynCharacteristic>> for CharacteristicSet {
    fn from_iter<I: IntoIterator<Item = Arc<dyn DynCharacteristic>>>(iter: I) -> Self {
        let mut set = Self::new();
        for characteristic in iter {
            set.insert(characteristic);
        }
        set
    }
}
