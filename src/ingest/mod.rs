//! Ingest module - harvest ingestion pipeline for math-bearing documents.
//!
//! This module provides the core of the ingestion system:
//! - **Traversal**: deterministic directory enumeration via [`DirectoryWalker`]
//! - **Staging**: envelope-wrapped scratch harvests via [`HarvestStager`]
//! - **Export**: per-document JSON manifests via [`ManifestExporter`]
//! - **Orchestration**: the per-document protocol via [`pipeline::IngestionDriver`]

pub mod manifest;
pub mod pipeline;
pub mod stager;
pub mod walker;

// Re-export commonly used types
pub use manifest::{ExportError, ManifestExporter};
pub use pipeline::{IngestError, IngestionDriver};
pub use stager::{HarvestStager, StageError, StagedHarvest};
pub use walker::{DirectoryListing, DirectoryWalker, SkipReason, WalkError};
