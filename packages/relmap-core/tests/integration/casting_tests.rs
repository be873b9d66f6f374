//! Casting between property and column values through built fields.

use chrono::NaiveDate;

use relmap_core::metadata::EntityMetadata;
use relmap_core::{CastError, Engine, Metadata, MetadataConfig, Value};

use super::helpers::engine;

fn entity(engine: &Engine) -> std::sync::Arc<EntityMetadata> {
    let mut builder = engine.manager().builder("App\\Models\\Product");
    builder.integer("stock").nullable();
    builder.integer("rating").default_value(3);
    builder.integer("views");
    builder.string("sku").nullable();
    builder.string("title").default_value("untitled");
    builder.bool("active");
    builder.float("price");
    builder.array("tags");
    builder.carbon("releasedAt");
    builder.carbon("archivedAt").formatted("%Y");
    builder.carbon("launchDay").formatted("%Y-%m-%d");

    builder.build().unwrap().entity().unwrap().clone()
}

#[test]
fn test_null_follows_nullable_then_default_then_zero() {
    let engine = engine();
    let product = entity(&engine);
    let cast = |name: &str| {
        product
            .field(name)
            .unwrap()
            .to_property(Value::Null, &*product)
            .unwrap()
    };

    assert_eq!(cast("stock"), Value::Null);
    assert_eq!(cast("rating"), Value::Int(3));
    assert_eq!(cast("views"), Value::Int(0));
    assert_eq!(cast("sku"), Value::Null);
    assert_eq!(cast("title"), Value::String("untitled".to_string()));
    assert_eq!(cast("active"), Value::Bool(false));
    assert_eq!(cast("price"), Value::Float(0.0));
    assert_eq!(cast("tags"), Value::Array(Vec::new()));
    assert_eq!(cast("releasedAt"), Value::Null);
}

#[test]
fn test_column_casts_follow_the_same_null_policy() {
    let engine = engine();
    let product = entity(&engine);
    let stock = product.field("stock").unwrap();
    let rating = product.field("rating").unwrap();

    assert_eq!(stock.to_column(Value::Null, &*product).unwrap(), Value::Null);
    assert_eq!(rating.to_column(Value::Null, &*product).unwrap(), Value::Int(3));
}

#[test]
fn test_scalar_coercion() {
    let engine = engine();
    let product = entity(&engine);

    let views = product.field("views").unwrap();
    assert_eq!(views.to_property(Value::from("42"), &*product).unwrap(), Value::Int(42));

    let active = product.field("active").unwrap();
    assert_eq!(active.to_property(Value::Int(1), &*product).unwrap(), Value::Bool(true));

    let title = product.field("title").unwrap();
    assert_eq!(
        title.to_property(Value::Int(7), &*product).unwrap(),
        Value::String("7".to_string())
    );
}

#[test]
fn test_array_round_trip_through_json_column() {
    let engine = engine();
    let product = entity(&engine);
    let tags = product.field("tags").unwrap();
    assert_eq!(tags.column_type().name(), "json");

    let stored = tags
        .to_column(Value::Array(vec![Value::from("new"), Value::from("sale")]), &*product)
        .unwrap();
    assert_eq!(stored, Value::String(r#"["new","sale"]"#.to_string()));

    let loaded = tags.to_property(stored, &*product).unwrap();
    assert_eq!(loaded, Value::Array(vec![Value::from("new"), Value::from("sale")]));
}

#[test]
fn test_malformed_json_is_an_error() {
    let engine = engine();
    let product = entity(&engine);
    let err = product
        .field("tags")
        .unwrap()
        .to_property(Value::from("[1,"), &*product)
        .unwrap_err();
    assert!(matches!(err, CastError::InvalidJson { .. }));
}

#[test]
fn test_date_time_parsing() {
    let engine = engine();
    let product = entity(&engine);
    let released = product.field("releasedAt").unwrap();

    let expected = NaiveDate::from_ymd_opt(2024, 3, 9)
        .unwrap()
        .and_hms_opt(14, 5, 0)
        .unwrap();
    assert_eq!(
        released
            .to_property(Value::from("2024-03-09 14:05:00"), &*product)
            .unwrap(),
        Value::DateTime(expected)
    );

    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    assert_eq!(
        released.to_property(Value::Int(0), &*product).unwrap(),
        Value::DateTime(epoch)
    );

    let err = released
        .to_property(Value::from("next tuesday"), &*product)
        .unwrap_err();
    assert!(matches!(err, CastError::InvalidDateTime { .. }));
}

#[test]
fn test_timestamp_format_precedence() {
    let config = MetadataConfig::from_toml(
        r#"
        [connections]
        default = "main"

        [connections.databases.main]
        date_format = "%d/%m/%Y"
        "#,
    )
    .unwrap();
    let engine = Engine::new(config).unwrap();
    let product = entity(&engine);
    let moment = Value::DateTime(
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(14, 5, 0)
            .unwrap(),
    );

    let released = product.field("releasedAt").unwrap();
    assert_eq!(
        released.to_column(moment.clone(), &*product).unwrap(),
        Value::String("09/03/2024".to_string())
    );

    let archived = product.field("archivedAt").unwrap();
    assert_eq!(
        archived.to_column(moment.clone(), &*product).unwrap(),
        Value::String("2024".to_string())
    );

    let stock_engine = super::helpers::engine();
    let stock_product = entity(&stock_engine);
    assert_eq!(
        stock_product
            .field("releasedAt")
            .unwrap()
            .to_column(moment, &*stock_product)
            .unwrap(),
        Value::String("2024-03-09 14:05:00".to_string())
    );
}

fn connection_engine() -> anyhow::Result<Engine> {
    let config = MetadataConfig::from_toml(
        r#"
        [connections]
        default = "main"

        [connections.databases.main]
        date_format = "%d/%m/%Y"
        "#,
    )?;
    Ok(Engine::new(config)?)
}

#[test]
fn test_date_only_formatted_round_trip() -> anyhow::Result<()> {
    let engine = engine();
    let product = entity(&engine);
    let launch = product.field("launchDay").unwrap();
    let day = NaiveDate::from_ymd_opt(1990, 5, 17).unwrap().and_hms_opt(0, 0, 0).unwrap();

    let stored = launch.to_column(Value::DateTime(day), &*product)?;
    assert_eq!(stored, Value::String("1990-05-17".to_string()));
    assert_eq!(launch.to_property(stored, &*product)?, Value::DateTime(day));

    let archived = product.field("archivedAt").unwrap();
    let stored = archived.to_column(Value::DateTime(day), &*product)?;
    assert_eq!(stored, Value::String("1990".to_string()));
    assert_eq!(
        archived.to_property(stored, &*product)?,
        Value::DateTime(NaiveDate::from_ymd_opt(1990, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap())
    );
    Ok(())
}

#[test]
fn test_formatted_parse_is_strict() {
    let engine = engine();
    let product = entity(&engine);
    let err = product
        .field("launchDay")
        .unwrap()
        .to_property(Value::from("17/05/1990"), &*product)
        .unwrap_err();
    assert!(matches!(err, CastError::InvalidDateTime { ref format, .. } if format == "%Y-%m-%d"));
}

#[test]
fn test_connection_format_round_trip() -> anyhow::Result<()> {
    let engine = connection_engine()?;
    let product = entity(&engine);
    let released = product.field("releasedAt").unwrap();
    let moment = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap().and_hms_opt(14, 5, 0).unwrap();

    let stored = released.to_column(Value::DateTime(moment), &*product)?;
    assert_eq!(stored, Value::String("09/03/2024".to_string()));
    assert_eq!(
        released.to_property(stored, &*product)?,
        Value::DateTime(moment.date().and_hms_opt(0, 0, 0).unwrap())
    );

    // Unformatted fields still accept the common layouts.
    assert_eq!(
        released.to_property(Value::from("2024-03-09 14:05:00"), &*product)?,
        Value::DateTime(moment)
    );
    Ok(())
}
