//! Configuration files driving engine bootstrap.

use std::fs;

use tempfile::tempdir;

use relmap_core::inflect::CaseConversion;
use relmap_core::{Engine, Metadata, MetadataConfig};

#[test]
fn test_engine_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("relmap.toml");
    fs::write(
        &path,
        r#"
        case_conversion = "kebab"

        [types]
        property = ["integer", "string"]
        column = ["integer", "string"]

        [defaults.property]
        integer = "integer"
        string = "string"
        "#,
    )
    .unwrap();

    let config = MetadataConfig::from_file(&path).unwrap();
    assert_eq!(config.case_conversion, CaseConversion::Kebab);

    let engine = Engine::new(config).unwrap();
    assert!(!engine.types().has_property("Carbon"));
    assert_eq!(engine.types().property_names().len(), 2);

    let mut builder = engine.manager().builder("App\\Models\\BlogCategory");
    builder.string("displayName");
    let built = builder.build().unwrap();
    assert_eq!(built.entity().unwrap().table(), "blog-categories");
    assert!(built.metadata().column("display-name").is_some());
}

#[test]
fn test_disabled_inspection_skips_enrichment() {
    use relmap_core::reflection::{ClassDescriptor, NativeType, PropertyDescriptor};

    let mut config = MetadataConfig::default();
    config.inspect = false;
    let engine = Engine::new(config).unwrap();
    engine
        .classes()
        .register(
            ClassDescriptor::new("App\\Models\\Tag")
                .property(PropertyDescriptor::new("label", NativeType::parse("string"))),
        )
        .unwrap();

    let built = engine.manager().register_class("App\\Models\\Tag").unwrap();
    assert!(built.metadata().fields().is_empty());
}

#[test]
fn test_missing_config_file() {
    let dir = tempdir().unwrap();
    assert!(MetadataConfig::from_file(dir.path().join("absent.toml")).is_err());
}
