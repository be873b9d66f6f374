//! Shared fixtures.

use relmap_core::characteristics::{IndexName, TouchEvent};
use relmap_core::enrichment::{
    CharacteristicAttribute, EntityAttribute, IdAttribute, TouchableAttribute,
};
use relmap_core::reflection::{ClassDescriptor, NativeType, PropertyDescriptor};
use relmap_core::{Engine, MetadataConfig};

pub const USER: &str = "App\\Models\\User";

/// Engine with the stock configuration.
pub fn engine() -> Engine {
    Engine::new(MetadataConfig::default()).unwrap()
}

/// Registers the `User` class: id, name, unique email and a touchable creation stamp.
pub fn register_user(engine: &Engine) {
    let characteristics = engine.manager().context().characteristics.clone();
    engine
        .classes()
        .register(
            ClassDescriptor::new(USER)
                .enrich(EntityAttribute::new())
                .property(PropertyDescriptor::new("id", NativeType::parse("int")).enrich(IdAttribute::default()))
                .property(PropertyDescriptor::new("name", NativeType::parse("string")))
                .property(
                    PropertyDescriptor::new("email", NativeType::parse("string")).enrich(
                        CharacteristicAttribute::new(vec![characteristics.unique(IndexName::Auto)]),
                    ),
                )
                .property(
                    PropertyDescriptor::new("createdAt", NativeType::parse("Carbon"))
                        .enrich(TouchableAttribute::new([TouchEvent::Created])),
                ),
        )
        .unwrap();
}
