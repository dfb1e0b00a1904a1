//! Server catalog loading and saving.
//!
//! # Responsibilities
//! - Parse the catalog JSON document (`{"ftp": [...], "tv": [...],
//!   "others": [...]}`) into a validated [`Catalog`]
//! - Save a catalog back out and write a starter sample

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::catalog::{Catalog, Category, CategoryKind};

/// Errors raised while loading or saving a catalog.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("catalog root must be a JSON object")]
    NotAnObject,

    #[error("no servers loaded from catalog")]
    NoServers,
}

/// Serialized form of a catalog, URLs only.
#[derive(Debug, Serialize)]
struct CatalogDoc {
    ftp: Vec<String>,
    tv: Vec<String>,
    others: Vec<String>,
}

/// Load and validate the catalog from a JSON file.
pub fn load_catalog(path: &Path) -> Result<Catalog, ConfigError> {
    tracing::info!(path = %path.display(), "Loading server catalog");

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let catalog = parse_catalog(&content)?;

    tracing::info!(
        ftp = catalog.ftp.len(),
        tv = catalog.tv.len(),
        others = catalog.others.len(),
        "Catalog loaded"
    );
    Ok(catalog)
}

/// Parse a catalog from a JSON string.
///
/// Non-string entries, empty strings and invalid URLs are skipped with a
/// warning; a missing category key just leaves that category empty. Only a
/// catalog with zero loadable servers is an error.
pub fn parse_catalog(json: &str) -> Result<Catalog, ConfigError> {
    let root: Value = serde_json::from_str(json)?;
    let Some(object) = root.as_object() else {
        return Err(ConfigError::NotAnObject);
    };

    let mut catalog = Catalog::new();
    for kind in [CategoryKind::Ftp, CategoryKind::Tv, CategoryKind::Others] {
        match object.get(kind.key()) {
            Some(value) => parse_category(value, catalog.category_mut(kind)),
            None => tracing::warn!(key = kind.key(), "No category array in catalog"),
        }
    }

    if catalog.total() == 0 {
        return Err(ConfigError::NoServers);
    }
    Ok(catalog)
}

fn parse_category(value: &Value, category: &mut Category) {
    let Some(entries) = value.as_array() else {
        tracing::warn!(category = category.name(), "Category value is not an array");
        return;
    };

    for (index, entry) in entries.iter().enumerate() {
        let Some(url) = entry.as_str() else {
            tracing::warn!(category = category.name(), index, "Skipping non-string entry");
            continue;
        };
        if let Err(e) = category.add(url) {
            tracing::warn!(category = category.name(), index, error = %e, "Skipping entry");
        }
    }
}

/// True when the file parses and carries at least one category array.
pub fn validate_file(path: &Path) -> bool {
    let Ok(content) = fs::read_to_string(path) else {
        return false;
    };
    let Ok(root) = serde_json::from_str::<Value>(&content) else {
        tracing::warn!(path = %path.display(), "Catalog file is not valid JSON");
        return false;
    };
    let Some(object) = root.as_object() else {
        return false;
    };

    [CategoryKind::Ftp, CategoryKind::Tv, CategoryKind::Others]
        .iter()
        .any(|kind| object.contains_key(kind.key()))
}

/// Save a catalog to a pretty-printed JSON file.
pub fn save_catalog(path: &Path, catalog: &Catalog) -> Result<(), ConfigError> {
    let doc = CatalogDoc {
        ftp: urls(&catalog.ftp),
        tv: urls(&catalog.tv),
        others: urls(&catalog.others),
    };

    let json = serde_json::to_string_pretty(&doc)?;
    fs::write(path, json).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(path = %path.display(), "Catalog saved");
    Ok(())
}

fn urls(category: &Category) -> Vec<String> {
    category.servers().iter().map(|s| s.url.clone()).collect()
}

/// Write a starter catalog for first runs, creating the parent directory
/// when needed.
pub fn write_sample(path: &Path) -> Result<(), ConfigError> {
    tracing::info!(path = %path.display(), "Writing sample catalog");

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    let doc = CatalogDoc {
        ftp: vec![
            "http://ftp.example.net".to_string(),
            "http://mirror.example.org".to_string(),
        ],
        tv: vec!["http://tv.example.net".to_string()],
        others: vec!["http://cache.example.com".to_string()],
    };

    let json = serde_json::to_string_pretty(&doc)?;
    fs::write(path, json).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_categories() {
        let catalog = parse_catalog(
            r#"{
                "ftp": ["http://a.example.com", "http://b.example.com"],
                "tv": ["http://c.example.com"],
                "others": ["http://d.example.com"]
            }"#,
        )
        .unwrap();

        assert_eq!(catalog.ftp.len(), 2);
        assert_eq!(catalog.tv.len(), 1);
        assert_eq!(catalog.others.len(), 1);
        assert_eq!(catalog.total(), 4);
    }

    #[test]
    fn skips_bad_entries_but_keeps_good_ones() {
        let catalog = parse_catalog(
            r#"{
                "ftp": ["http://good.example.com", 42, "", "ftp://wrong-scheme.example.com"],
                "tv": []
            }"#,
        )
        .unwrap();

        assert_eq!(catalog.ftp.len(), 1);
        assert_eq!(catalog.ftp.servers()[0].url, "http://good.example.com");
    }

    #[test]
    fn empty_catalog_is_an_error() {
        assert!(matches!(
            parse_catalog(r#"{"ftp": [], "tv": [], "others": []}"#),
            Err(ConfigError::NoServers)
        ));
    }

    #[test]
    fn non_object_root_is_an_error() {
        assert!(matches!(
            parse_catalog(r#"["http://a.example.com"]"#),
            Err(ConfigError::NotAnObject)
        ));
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(matches!(
            parse_catalog("{not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
