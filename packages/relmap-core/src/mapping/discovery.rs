//! Finds declarative mapping files under a directory.

use std::path::{Path, PathBuf};

use super::DeclarativeMapping;
use crate::error::{MetadataError, Result};

const MAPPING_EXTENSION: &str = "json";

/// A mapping file found during discovery.
#[derive(Debug, Clone)]
pub struct DiscoveredMapping {
    /// Namespaced name derived from the file's location.
    pub name: String,
    pub path: PathBuf,
    pub mapping: DeclarativeMapping,
}

/// Loads every mapping file below `dir`.
///
/// A file at `Blog/Post.json` under namespace `App\Mappings` is named
/// `App\Mappings\Blog\Post`. Files that fail to parse are skipped with a
/// warning. A missing directory yields no mappings. Results are sorted by name.
///
/// # Errors
/// `Io` if an existing directory cannot be read.
pub fn discover(dir: &Path, namespace: &str) -> Result<Vec<DiscoveredMapping>> {
    if !dir.is_dir() {
        tracing::debug!(path = %dir.display(), "Mapping directory does not exist");
        return Ok(Vec::new());
    }

    let mut found = Vec::new();
    walk(dir, namespace.trim_end_matches('\\'), &mut found)?;
    found.sort_by(|a, b| a.name.cmp(&b.name));

    tracing::debug!(
        path = %dir.display(),
        namespace = %namespace,
        count = found.len(),
        "Discovered mappings"
    );
    Ok(found)
}

fn walk(dir: &Path, namespace: &str, found: &mut Vec<DiscoveredMapping>) -> Result<()> {
    let entries = std::fs::read_dir(dir).map_err(|source| MetadataError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    for entry in entries {
        let entry = entry.map_err(|source| MetadataError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let file_type = entry.file_type().map_err(|source| MetadataError::Io {
            path: path.clone(),
            source,
        })?;

        if file_type.is_symlink() && path.is_dir() {
            tracing::debug!(path = %path.display(), "Skipping symlinked directory");
            continue;
        }
        if file_type.is_dir() {
            walk(&path, &join(namespace, stem), found)?;
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) != Some(MAPPING_EXTENSION) {
            continue;
        }

        match DeclarativeMapping::load(&path) {
            Ok(mapping) => found.push(DiscoveredMapping {
                name: join(namespace, stem),
                path,
                mapping,
            }),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Skipping invalid mapping file");
            }
        }
    }
    Ok(())
}

fn join(namespace: &str, segment: &str) -> String {
    if namespace.is_empty() {
        segment.to_string()
    } else {
        format!("{}\\{}", namespace, segment)
    }
}
