//! Builds entities from class descriptors and checks the resolved fields.

use relmap_core::characteristics::{
    AutoIncrementing, Big, Primary, TouchEvent, Touchable, Unique, Unsigned,
};
use relmap_core::enrichment::FieldAttribute;
use relmap_core::reflection::{ClassDescriptor, NativeType, PropertyDescriptor};
use relmap_core::types::{ColumnKind, IndexKind};
use relmap_core::{Metadata, MetadataError};

use super::helpers::{engine, register_user, USER};

#[test]
fn test_user_entity() {
    let engine = engine();
    register_user(&engine);

    let built = engine.manager().register_class(USER).unwrap();
    let user = built.entity().unwrap();
    assert_eq!(user.table(), "users");
    assert_eq!(user.fields().len(), 4);

    let id = user.field("id").unwrap();
    assert!(id.is::<Big>());
    assert!(id.is::<Unsigned>());
    assert!(id.is::<AutoIncrementing>());
    assert!(id.is::<Primary>());
    assert_eq!(id.column(), "id");
    assert_eq!(id.column_type().name(), "integer");
    assert_eq!(id.property_type().name(), "integer");

    let email = user.field("email").unwrap();
    assert!(email.is::<Unique>());
    assert_eq!(email.column(), "email");

    let created = user.field("createdAt").unwrap();
    assert_eq!(created.column(), "created_at");
    assert_eq!(created.property_type().name(), "Carbon");
    assert_eq!(created.column_type().name(), "timestamp");
    assert!(created.characteristic::<Touchable>().unwrap().on(TouchEvent::Created));
    assert!(!created.characteristic::<Touchable>().unwrap().on(TouchEvent::Updated));

    assert!(engine.manager().entity(USER).is_some());
}

#[test]
fn test_user_column_definitions() {
    let engine = engine();
    register_user(&engine);
    let built = engine.manager().register_class(USER).unwrap();
    let user = built.entity().unwrap();

    let id = user.field("id").unwrap().definition(&**user);
    assert_eq!(id.kind, ColumnKind::BigInteger);
    assert!(id.unsigned);
    assert!(id.auto_increment);
    assert_eq!(id.indexes[0].kind, IndexKind::Primary);

    let email = user.field("email").unwrap().definition(&**user);
    assert_eq!(email.kind, ColumnKind::String);
    assert_eq!(email.indexes.len(), 1);
    assert_eq!(email.indexes[0].kind, IndexKind::Unique);
    assert!(!email.nullable);
}

#[test]
fn test_column_name_index() {
    let engine = engine();
    register_user(&engine);
    let built = engine.manager().register_class(USER).unwrap();
    let user = built.metadata();

    assert_eq!(user.column("email").unwrap().property(), "email");
    assert_eq!(user.column("created_at").unwrap().property(), "createdAt");
    assert!(user.column("createdAt").is_none());
    assert!(user.column("password").is_none());
}

#[test]
fn test_order_item_table() {
    let engine = engine();
    let mut builder = engine.manager().builder("App\\Models\\OrderItem");
    builder.integer("quantity");
    let built = builder.build().unwrap();

    assert_eq!(built.entity().unwrap().table(), "order_items");
    assert_eq!(built.metadata().field("quantity").unwrap().column_type().name(), "integer");
}

#[test]
fn test_inherited_class_match() {
    let engine = engine();
    let classes = engine.classes();
    classes
        .register(ClassDescriptor::new("Carbon").extends("DateTimeInterface"))
        .unwrap();
    classes
        .register(ClassDescriptor::new("App\\Support\\LocalTime").extends("Carbon"))
        .unwrap();
    classes
        .register(
            ClassDescriptor::new("App\\Models\\Shift")
                .property(PropertyDescriptor::new("startsAt", NativeType::parse("Carbon")))
                .property(
                    PropertyDescriptor::new("endsAt", NativeType::parse("?App\\Support\\LocalTime"))
                        .enrich(FieldAttribute::column("ends_at", Some("timestamp"))),
                ),
        )
        .unwrap();

    let built = engine.manager().register_class("App\\Models\\Shift").unwrap();
    let shift = built.metadata();
    assert_eq!(shift.field("startsAt").unwrap().property_type().name(), "Carbon");
    assert_eq!(
        shift.field("endsAt").unwrap().property_type().name(),
        "DateTimeInterface"
    );
}

#[test]
fn test_union_type_is_unresolved() {
    let engine = engine();
    engine
        .classes()
        .register(
            ClassDescriptor::new("App\\Models\\Setting")
                .property(PropertyDescriptor::new("value", NativeType::parse("int|string"))),
        )
        .unwrap();

    let err = engine.manager().register_class("App\\Models\\Setting").unwrap_err();
    assert!(matches!(err, MetadataError::UnresolvedPropertyType { .. }));
    assert!(engine.manager().entity("App\\Models\\Setting").is_none());
}

#[test]
fn test_missing_default_column_mapping() {
    let engine = engine();
    engine
        .classes()
        .register(
            ClassDescriptor::new("App\\Models\\Log")
                .property(PropertyDescriptor::new("at", NativeType::parse("DateTimeInterface"))),
        )
        .unwrap();

    let err = engine.manager().register_class("App\\Models\\Log").unwrap_err();
    match err {
        MetadataError::NoDefaultColumnMapping { property, property_type, .. } => {
            assert_eq!(property, "at");
            assert_eq!(property_type, "DateTimeInterface");
        }
        other => panic!("unexpected error: {other}"),
    }
}
