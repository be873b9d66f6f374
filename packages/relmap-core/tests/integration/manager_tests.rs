//! Manager registries shared across threads.

use std::sync::Arc;
use std::thread;

use relmap_core::mapping::Mapping;
use relmap_core::{Metadata, MetadataBuilder};

use super::helpers::engine;

#[derive(Debug)]
struct CounterMapping {
    class: String,
}

impl Mapping for CounterMapping {
    fn class(&self) -> &str {
        &self.class
    }

    fn map(&self, builder: &mut MetadataBuilder) {
        builder.id();
        builder.big_integer("hits").unsigned();
    }
}

#[test]
fn test_concurrent_registration_and_lookup() {
    let engine = Arc::new(engine());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let engine = engine.clone();
            thread::spawn(move || {
                let mapping = CounterMapping {
                    class: format!("App\\Counters\\Counter{}", i),
                };
                engine.manager().map(&mapping).unwrap();
                engine
                    .manager()
                    .entity(&mapping.class)
                    .map(|entity| entity.fields().len())
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), Some(2));
    }
    assert_eq!(engine.manager().entity_classes().len(), 8);
}

#[test]
fn test_named_mappings_through_engine() {
    let engine = engine();
    engine
        .register_mapping(
            "counters",
            Arc::new(CounterMapping {
                class: "App\\Counter".to_string(),
            }),
        )
        .unwrap();

    let built = engine.manager().map_named("counters").unwrap();
    let counter = built.entity().unwrap();
    assert_eq!(counter.table(), "counters");
    assert_eq!(counter.field("hits").unwrap().column_type().name(), "integer");
}
