//! Mapping file loader.
//!
//! Each configured path is either a JSON file holding one descriptor object or
//! an array of descriptors, or a directory whose `*.json` files are loaded in
//! file-name order.

use std::path::{Path, PathBuf};

use crate::error::CatalogError;

use super::catalog::MappingCatalog;
use super::descriptor::MappingDescriptor;

/// Loads descriptors from mapping files into a [`MappingCatalog`].
#[derive(Debug, Clone, Default)]
pub struct CatalogLoader {
    paths: Vec<PathBuf>,
}

impl CatalogLoader {
    /// Creates a loader for the given files and directories.
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the configured paths.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Reads every configured path and builds the catalog.
    pub fn load(&self) -> Result<MappingCatalog, CatalogError> {
        let mut descriptors = Vec::new();
        for path in &self.paths {
            if path.is_dir() {
                for file in Self::json_files(path)? {
                    descriptors.extend(Self::load_file(&file)?);
                }
            } else {
                descriptors.extend(Self::load_file(path)?);
            }
        }

        let catalog = MappingCatalog::from_descriptors(descriptors)?;
        tracing::info!(
            mappings = catalog.len(),
            sources = self.paths.len(),
            "Mapping catalog loaded"
        );
        Ok(catalog)
    }

    /// Parses a single mapping file.
    pub fn load_file(path: &Path) -> Result<Vec<MappingDescriptor>, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        // Decode the shape the file actually has so serde reports the offending field.
        let parsed = if content.trim_start().starts_with('[') {
            serde_json::from_str::<Vec<MappingDescriptor>>(&content)
        } else {
            serde_json::from_str::<MappingDescriptor>(&content).map(|one| vec![one])
        };
        let descriptors = parsed.map_err(|source| CatalogError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), count = descriptors.len(), "Loaded mapping file");
        Ok(descriptors)
    }

    fn json_files(dir: &Path) -> Result<Vec<PathBuf>, CatalogError> {
        let entries = std::fs::read_dir(dir).map_err(|source| CatalogError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| CatalogError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}
