use crate::model::{IdMappingTable, LoadOutcome};
use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// One serialized formula occurrence as produced by extraction.
///
/// Opaque at this layer: the stager inserts it verbatim into the harvest
/// envelope and never inspects its contents.
pub type FormulaFragment = String;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Malformed document markup: {0}")]
    MalformedMarkup(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Extraction failed: {0}")]
    Other(String),
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to open harvest artifact: {0}")]
    ArtifactOpen(#[from] std::io::Error),
    #[error("Loader timed out after {0}s")]
    Timeout(u64),
    #[error("Loader failed: {0}")]
    Other(String),
}

/// Extracts serialized formula fragments from raw document markup.
///
/// Fragment order must match document order; the stager preserves it when
/// writing the harvest envelope.
pub trait FormulaExtractor: Send + Sync {
    /// Returns the formula fragments found in `document`. `source` is used
    /// for diagnostics only.
    fn extract(&self, document: &str, source: &Path) -> Result<Vec<FormulaFragment>, ExtractError>;
}

/// Parses a staged harvest file and inserts each formula into an index.
///
/// The caller supplies a freshly emptied [`IdMappingTable`] and must not read
/// it until the call returns; the loader records every minted id and its
/// document locations there. A hard `Err` means the artifact could not be
/// loaded at all; an `Ok` outcome with `had_error` set means the loader hit
/// parse errors but may still have inserted some formulas — both the error
/// flag and the count are meaningful.
#[async_trait]
pub trait HarvestLoader: Send + Sync {
    async fn load(
        &self,
        harvest: &Path,
        mappings: &mut IdMappingTable,
    ) -> Result<LoadOutcome, LoadError>;
}
