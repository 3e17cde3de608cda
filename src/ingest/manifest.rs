//! Per-document JSON manifest export for the external search index.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::model::{IdMappingTable, Manifest};

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to create export directory '{path}': {source}")]
    DirectoryCreation {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write manifest '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Manifest serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Writes document manifests under an output root, mirroring the input tree.
#[derive(Debug, Clone)]
pub struct ManifestExporter {
    output_root: PathBuf,
}

impl ManifestExporter {
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
        }
    }

    /// Serializes `document` and its mapping table to
    /// `<output_root>/<relative_prefix>/<file_name>.json`.
    ///
    /// Intermediate directories are created as needed; a directory that
    /// already exists is not an error. Returns the manifest path.
    pub fn export(
        &self,
        document: &str,
        mappings: &IdMappingTable,
        relative_prefix: &Path,
        source: &Path,
    ) -> Result<PathBuf, ExportError> {
        let target_dir = self.output_root.join(relative_prefix);
        std::fs::create_dir_all(&target_dir).map_err(|source| ExportError::DirectoryCreation {
            path: target_dir.clone(),
            source,
        })?;

        let file_name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "harvest".to_string());
        let target = target_dir.join(format!("{}.json", file_name));

        let manifest = Manifest::from_mappings(document, mappings);
        let json = serde_json::to_string_pretty(&manifest)?;
        std::fs::write(&target, json).map_err(|source| ExportError::Write {
            path: target.clone(),
            source,
        })?;

        info!("Wrote manifest to {}", target.display());
        Ok(target)
    }
}
