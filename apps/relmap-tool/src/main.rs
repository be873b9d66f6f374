//! CLI tool for inspecting entity metadata.
//!
//! Loads an engine configuration, discovers declarative mapping files and
//! prints what the metadata builder makes of them.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use relmap_core::types::ColumnDefinition;
use relmap_core::{BuiltMetadata, Engine, Metadata, MetadataConfig};

/// Command-line arguments for the metadata tool.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML configuration file; stock defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Extra mapping directory as NAMESPACE=DIR (repeatable)
    #[arg(short, long = "discover", value_name = "NAMESPACE=DIR")]
    discover: Vec<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List registered property and column types with their defaults
    Types,
    /// Summarize every mapped class
    Inspect,
    /// Print column definitions as JSON
    Columns {
        /// Only this class
        #[arg(long)]
        class: Option<String>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => MetadataConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => MetadataConfig::default(),
    };
    config.apply_env_overrides()?;

    for entry in &args.discover {
        let Some((namespace, dir)) = entry.split_once('=') else {
            bail!("Invalid --discover value '{}': expected NAMESPACE=DIR", entry);
        };
        config
            .discovery
            .insert(namespace.to_string(), PathBuf::from(dir));
    }

    let engine = Engine::new(config).context("Failed to initialize engine")?;

    match args.command {
        Command::Types => print_types(&engine),
        Command::Inspect => {
            let built = engine.map_all().context("Failed to map classes")?;
            for metadata in &built {
                print_summary(metadata);
            }
            tracing::info!(classes = built.len(), "Inspection complete");
        }
        Command::Columns { class } => {
            let built = engine.map_all().context("Failed to map classes")?;
            let selected: Vec<_> = built
                .iter()
                .filter(|m| class.as_deref().map_or(true, |c| m.class() == c))
                .collect();
            if selected.is_empty() {
                if let Some(class) = class {
                    bail!("Class '{}' is not mapped", class);
                }
            }

            let mut tables = serde_json::Map::new();
            for metadata in selected {
                let view = metadata.metadata();
                let columns: Vec<ColumnDefinition> =
                    view.fields().iter().map(|f| f.definition(view)).collect();
                tables.insert(metadata.class().to_string(), serde_json::to_value(columns)?);
            }
            println!("{}", serde_json::to_string_pretty(&tables)?);
        }
    }

    Ok(())
}

fn print_types(engine: &Engine) {
    let types = engine.types();
    println!("Property types:");
    for name in types.property_names() {
        match types.column_by_property(&name) {
            Some(column) => println!("  {} -> {}", name, column.name()),
            None => println!("  {}", name),
        }
    }
    println!("Column types:");
    for name in types.column_names() {
        match types.property_by_column(&name) {
            Some(property) => println!("  {} -> {}", name, property.name()),
            None => println!("  {}", name),
        }
    }
}

fn print_summary(metadata: &BuiltMetadata) {
    match metadata {
        BuiltMetadata::Entity(entity) => println!(
            "{} (entity, table {}, connection {})",
            entity.class(),
            entity.table(),
            entity.connection_name().unwrap_or("default")
        ),
        BuiltMetadata::Component(component) => println!("{} (component)", component.class()),
    }

    for field in metadata.metadata().fields() {
        let characteristics = field.characteristics().names().join(", ");
        println!(
            "  {:<20} {:<12} -> {:<20} {:<10} [{}]",
            field.property(),
            field.property_type().name(),
            field.column(),
            field.column_type().name(),
            characteristics
        );
    }
}
