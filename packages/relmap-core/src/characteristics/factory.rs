//! Characteristic factory with a singleton cache.

use std::any::TypeId;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use super::kinds::*;
use super::{Characteristic, DynCharacteristic};

/// Creates characteristics, sharing one instance per singleton kind.
///
/// A kind is a singleton when it declares `SINGLETON = true` or has been
/// registered through [`Characteristics::register_singleton`]. The first
/// instance made for a singleton kind is cached and returned for every later
/// request of that kind.
#[derive(Debug, Default)]
pub struct Characteristics {
    cache: RwLock<HashMap<TypeId, Arc<dyn DynCharacteristic>>>,
    singletons: RwLock<HashSet<TypeId>>,
}

impl Characteristics {
    /// Creates a factory with an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a kind as a singleton regardless of its `SINGLETON` constant.
    pub fn register_singleton<C: Characteristic>(&self) {
        if let Ok(mut singletons) = self.singletons.write() {
            singletons.insert(TypeId::of::<C>());
        }
    }

    pub fn is_singleton<C: Characteristic>(&self) -> bool {
        C::SINGLETON
            || self
                .singletons
                .read()
                .map(|s| s.contains(&TypeId::of::<C>()))
                .unwrap_or(false)
    }

    /// Makes a characteristic, or returns the cached instance for singleton kinds.
    pub fn make<C: Characteristic>(&self, value: C) -> Arc<dyn DynCharacteristic> {
        if !self.is_singleton::<C>() {
            return Arc::new(value);
        }

        let id = TypeId::of::<C>();
        if let Some(existing) = self.cache.read().ok().and_then(|c| c.get(&id).cloned()) {
            return existing;
        }

        match self.cache.write() {
            Ok(mut cache) => cache
                .entry(id)
                .or_insert_with(|| Arc::new(value) as Arc<dyn DynCharacteristic>)
                .clone(),
            Err(_) => Arc::new(value),
        }
    }

    /// Number of cached singleton instances.
    pub fn cached(&self) -> usize {
        self.cache.read().map(|c| c.len()).unwrap_or(0)
    }

    pub fn tiny(&self) -> Arc<dyn DynCharacteristic> {
        self.make(Tiny)
    }

    pub fn small(&self) -> Arc<dyn DynCharacteristic> {
        self.make(Small)
    }

    pub fn medium(&self) -> Arc<dyn DynCharacteristic> {
        self.make(Medium)
    }

    pub fn big(&self) -> Arc<dyn DynCharacteristic> {
        self.make(Big)
    }

    pub fn unsigned(&self) -> Arc<dyn DynCharacteristic> {
        self.make(Unsigned)
    }

    pub fn auto_incrementing(&self, starting_from: Option<u64>) -> Arc<dyn DynCharacteristic> {
        self.make(AutoIncrementing::new(starting_from))
    }

    pub fn binary(&self) -> Arc<dyn DynCharacteristic> {
        self.make(Binary)
    }

    pub fn default_value(&self, value: impl Into<crate::value::Value>) -> Arc<dyn DynCharacteristic> {
        self.make(DefaultValue::new(value))
    }

    pub fn use_current(&self) -> Arc<dyn DynCharacteristic> {
        self.make(UseCurrent)
    }

    pub fn use_current_on_update(&self) -> Arc<dyn DynCharacteristic> {
        self.make(UseCurrentOnUpdate)
    }

    pub fn formatted(&self, format: impl Into<String>) -> Arc<dyn DynCharacteristic> {
        self.make(Formatted::new(format))
    }

    pub fn immutable(&self) -> Arc<dyn DynCharacteristic> {
        self.make(Immutable)
    }

    pub fn invisible(&self) -> Arc<dyn DynCharacteristic> {
        self.make(Invisible)
    }

    pub fn length(&self, length: u32) -> Arc<dyn DynCharacteristic> {
        self.make(Length::new(length))
    }

    pub fn not_null(&self) -> Arc<dyn DynCharacteristic> {
        self.make(NotNull)
    }

    pub fn nullable(&self) -> Arc<dyn DynCharacteristic> {
        self.make(Nullable)
    }

    pub fn precise(&self, precision: u32) -> Arc<dyn DynCharacteristic> {
        self.make(Precise::new(precision))
    }

    pub fn primary(&self) -> Arc<dyn DynCharacteristic> {
        self.make(Primary)
    }

    pub fn touchable(
        &self,
        events: impl IntoIterator<Item = TouchEvent>,
    ) -> Arc<dyn DynCharacteristic> {
        self.make(Touchable::new(events))
    }

    pub fn unique(&self, name: impl Into<IndexName>) -> Arc<dyn DynCharacteristic> {
        self.make(Unique::new(name))
    }

    pub fn indexed(&self, name: impl Into<IndexName>) -> Arc<dyn DynCharacteristic> {
        self.make(Indexed::new(name))
    }

    pub fn fulltext_indexed(&self, name: impl Into<IndexName>) -> Arc<dyn DynCharacteristic> {
        self.make(FulltextIndexed::new(name))
    }

    pub fn spatially_indexed(&self, name: impl Into<IndexName>) -> Arc<dyn DynCharacteristic> {
        self.make(SpatiallyIndexed::new(name))
    }

    pub fn charset(&self, charset: impl Into<String>) -> Arc<dyn DynCharacteristic> {
        self.make(UsingCharset {
            charset: charset.into(),
        })
    }

    pub fn collation(&self, collation: impl Into<String>) -> Arc<dyn DynCharacteristic> {
        self.make(UsingCollation {
            collation: collation.into(),
        })
    }

    pub fn after(&self, column: impl Into<String>) -> Arc<dyn DynCharacteristic> {
        self.make(AfterColumn {
            column: column.into(),
        })
    }

    pub fn first(&self) -> Arc<dyn DynCharacteristic> {
        self.make(First)
    }
}
