//! Declarative mapping files discovered from disk and mapped by the engine.

use std::fs;

use tempfile::tempdir;

use relmap_core::characteristics::{Length, TouchEvent, Touchable, Unique};
use relmap_core::mapping::{discover, DeclarativeMapping};
use relmap_core::{Engine, Metadata, MetadataConfig, MetadataError};

const POST: &str = r#"{
    "class": "App\\Blog\\Post",
    "fields": [
        { "name": "id", "id": true },
        { "name": "title", "type": "string",
          "characteristics": [{ "kind": "length", "length": 120 }, { "kind": "unique" }] },
        { "name": "publishedAt", "native": "?Carbon",
          "characteristics": [{ "kind": "nullable" }, { "kind": "touchable", "events": ["created"] }] }
    ]
}"#;

const ADDRESS: &str = r#"{
    "class": "App\\Address",
    "kind": "component",
    "fields": [
        { "name": "street", "type": "string" },
        { "name": "zip", "type": "string", "column_type": "char",
          "characteristics": [{ "kind": "length", "length": 5 }] }
    ]
}"#;

#[test]
fn test_engine_maps_discovered_files() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("Blog")).unwrap();
    fs::write(dir.path().join("Blog").join("Post.json"), POST).unwrap();
    fs::write(dir.path().join("Address.json"), ADDRESS).unwrap();

    let mut config = MetadataConfig::default();
    config
        .discovery
        .insert("App\\Mappings".to_string(), dir.path().to_path_buf());
    let engine = Engine::new(config).unwrap();

    let built = engine.map_all().unwrap();
    assert_eq!(built.len(), 2);

    let post = engine.manager().entity("App\\Blog\\Post").unwrap();
    assert_eq!(post.table(), "posts");
    assert_eq!(post.field("id").unwrap().column_type().name(), "integer");
    let title = post.field("title").unwrap();
    assert_eq!(title.characteristic::<Length>().unwrap().length, 120);
    assert!(title.is::<Unique>());

    let published = post.field("publishedAt").unwrap();
    assert_eq!(published.property_type().name(), "Carbon");
    assert_eq!(published.column(), "published_at");
    assert!(published.characteristic::<Touchable>().unwrap().on(TouchEvent::Created));
    assert!(published.definition(&*post).nullable);

    let address = engine.manager().component("App\\Address").unwrap();
    assert_eq!(address.field("zip").unwrap().column_type().name(), "char");
    assert!(engine.manager().entity("App\\Address").is_none());

    assert!(engine.manager().mappings().contains("App\\Mappings\\Blog\\Post"));
    assert!(engine.classes().contains("App\\Blog\\Post"));
}

#[test]
fn test_invalid_files_do_not_stop_discovery() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("Post.json"), POST).unwrap();
    fs::write(dir.path().join("Broken.json"), r#"{ "fields": [] }"#).unwrap();

    let found = discover(dir.path(), "App").unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "App\\Post");
}

#[test]
fn test_load_reports_the_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("Broken.json");
    fs::write(&path, "[]").unwrap();

    match DeclarativeMapping::load(&path).unwrap_err() {
        MetadataError::MappingFile { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("unexpected error: {other}"),
    }

    let missing = DeclarativeMapping::load(&dir.path().join("Missing.json")).unwrap_err();
    assert!(matches!(missing, MetadataError::Io { .. }));
}

#[test]
fn test_configured_mapping_without_registration() {
    let mut config = MetadataConfig::default();
    config.mappings.push("App\\Mappings\\Ghost".to_string());
    let engine = Engine::new(config).unwrap();

    let err = engine.map_all().unwrap_err();
    assert!(matches!(err, MetadataError::UnknownMapping { .. }));
}
