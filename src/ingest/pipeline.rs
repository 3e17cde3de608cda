//! Ingestion driver for harvest corpora.
//!
//! This module provides the [`IngestionDriver`] coordinator that runs the
//! per-document protocol (extract → stage → load → export) over a directory
//! tree with:
//! - Async execution via `tokio`, with an optional timeout around the loader
//! - Structured logging via `tracing`
//! - Automatic removal of scratch harvest files via RAII ([`StagedHarvest`])
//! - Per-document failure containment: one bad document never aborts the run

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::ingest::manifest::ManifestExporter;
use crate::ingest::stager::HarvestStager;
use crate::ingest::walker::{DirectoryWalker, SkipReason, WalkError};
use crate::model::{IdMappingTable, IngestionReport};
use crate::traits::{FormulaExtractor, HarvestLoader, LoadError};

/// Errors that abort an entire ingestion run.
///
/// Everything below the source root is contained: per-document failures and
/// unreadable subdirectories are reported in the [`IngestionReport`] instead.
#[derive(thiserror::Error, Debug)]
pub enum IngestError {
    /// The source root itself could not be opened or listed
    #[error("Failed to open source root: {0}")]
    SourceRoot(#[from] WalkError),
}

/// Drives the harvest ingestion pipeline over a directory tree.
///
/// Per document, terminal on either path:
/// read → extract → stage → load → export-or-skip → cleanup. Documents are
/// processed depth-first, one at a time; each holds exactly one staged
/// harvest and one [`IdMappingTable`], both discarded before the next
/// document begins.
///
/// # Example
///
/// ```ignore
/// use formula_harvester::ingest::pipeline::IngestionDriver;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let driver = IngestionDriver::new(extractor, loader, ".xhtml")
///         .with_recursive(true)
///         .with_output_root("/var/lib/mws/es");
///     let report = driver.ingest("/data/harvests".as_ref()).await?;
///     println!("Total {}", report.total_loaded);
///     Ok(())
/// }
/// ```
pub struct IngestionDriver<X, L>
where
    X: FormulaExtractor,
    L: HarvestLoader,
{
    extractor: X,
    loader: L,
    walker: DirectoryWalker,
    stager: HarvestStager,

    /// Manifest exporter; `None` disables export for the whole run
    exporter: Option<ManifestExporter>,

    /// Whether to descend into subdirectories
    recursive: bool,

    /// Optional cap on one loader call; expiry is reported as a load failure
    load_timeout: Option<Duration>,
}

impl<X, L> IngestionDriver<X, L>
where
    X: FormulaExtractor,
    L: HarvestLoader,
{
    /// Creates a driver that processes files ending in `suffix`.
    ///
    /// Default configuration: no recursion, no manifest export, no loader
    /// timeout.
    pub fn new(extractor: X, loader: L, suffix: impl Into<String>) -> Self {
        Self {
            extractor,
            loader,
            walker: DirectoryWalker::new(suffix),
            stager: HarvestStager::new(),
            exporter: None,
            recursive: false,
            load_timeout: None,
        }
    }

    /// Enables or disables descent into subdirectories.
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Enables manifest export under `output_root`, mirroring the input
    /// tree's relative structure.
    pub fn with_output_root(mut self, output_root: impl Into<PathBuf>) -> Self {
        self.exporter = Some(ManifestExporter::new(output_root));
        self
    }

    /// Places scratch harvest files under `dir` instead of the system temp
    /// directory.
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.stager = self.stager.clone().with_scratch_dir(dir);
        self
    }

    /// Caps each loader call at `limit`; expiry counts as a load failure for
    /// that document only.
    pub fn with_load_timeout(mut self, limit: Duration) -> Self {
        self.load_timeout = Some(limit);
        self
    }

    /// Ingests every matching document under `source_root`.
    ///
    /// Returns the aggregate report; per-document and per-subdirectory
    /// failures are counted there rather than propagated. The only `Err` is
    /// a source root that cannot be opened.
    pub async fn ingest(&self, source_root: &Path) -> Result<IngestionReport, IngestError> {
        info!("Loading harvest files from {} ...", source_root.display());
        let start = std::time::Instant::now();

        let mut report = self
            .ingest_directory(source_root.to_path_buf(), PathBuf::new())
            .await?;
        report.duration_ms = start.elapsed().as_millis() as u64;

        if report.had_errors() {
            info!("Total {} (errors encountered)", report.total_loaded);
        } else {
            info!("Total {}", report.total_loaded);
        }
        Ok(report)
    }

    /// Processes one directory level, then recurses if enabled.
    ///
    /// A subdirectory whose listing fails contributes zero and is counted;
    /// only the failure of `dir` itself surfaces as `Err`, so each
    /// directory's failure stays local to its own subtree.
    fn ingest_directory(
        &self,
        dir: PathBuf,
        prefix: PathBuf,
    ) -> Pin<Box<dyn Future<Output = Result<IngestionReport, WalkError>> + Send + '_>> {
        Box::pin(async move {
            let listing = self.walker.scan(&dir)?;

            let mut report = IngestionReport {
                entries_skipped: listing.skipped.len(),
                ..Default::default()
            };

            for document in &listing.documents {
                self.process_document(document, &prefix, &mut report).await;
                debug!("Running total: {}", report.total_loaded);
            }

            for subdir in &listing.directories {
                if !self.recursive {
                    debug!(
                        reason = ?SkipReason::DirectoryNotRecursed,
                        "Skipping directory \"{}\"",
                        subdir.display()
                    );
                    report.entries_skipped += 1;
                    continue;
                }

                let name = subdir.file_name().map(PathBuf::from).unwrap_or_default();
                match self
                    .ingest_directory(subdir.clone(), prefix.join(name))
                    .await
                {
                    Ok(sub_report) => report.absorb(sub_report),
                    Err(e) => {
                        warn!("Skipping unreadable subdirectory: {}", e);
                        report.directories_failed += 1;
                    }
                }
            }

            Ok(report)
        })
    }

    /// Runs the extract → stage → load → export protocol for one document.
    ///
    /// Never returns an error: every failure mode is contained here and
    /// recorded in `report`, so the caller always moves on to the next
    /// document.
    async fn process_document(&self, path: &Path, prefix: &Path, report: &mut IngestionReport) {
        info!("Processing {} ...", path.display());

        let document = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                warn!("Failed to read \"{}\": {}", path.display(), e);
                report.documents_failed += 1;
                return;
            }
        };

        // An extraction failure degrades to an empty harvest: still staged,
        // still loaded, zero formulas.
        let fragments = match self.extractor.extract(&document, path) {
            Ok(fragments) => fragments,
            Err(e) => {
                warn!("Extraction failed for \"{}\": {}", path.display(), e);
                Vec::new()
            }
        };

        let staged = match self.stager.stage(&fragments, path) {
            Ok(staged) => staged,
            Err(e) => {
                warn!("Failed to stage harvest for \"{}\": {}", path.display(), e);
                report.documents_failed += 1;
                return;
            }
        };

        info!("Loading harvest {} ...", staged.path().display());
        report.documents_processed += 1;

        // Fresh table per document; the loader is its only writer.
        let mut mappings = IdMappingTable::new();
        let load_result = match self.load_timeout {
            Some(limit) => match timeout(limit, self.loader.load(staged.path(), &mut mappings))
                .await
            {
                Ok(result) => result,
                Err(_) => Err(LoadError::Timeout(limit.as_secs())),
            },
            None => self.loader.load(staged.path(), &mut mappings).await,
        };

        let outcome = match load_result {
            Ok(outcome) => outcome,
            Err(e) => {
                // Hard failure: nothing was loaded and the mapping table was
                // never populated, so there is nothing to export either.
                warn!("Error while loading \"{}\": {}", staged.path().display(), e);
                report.documents_failed += 1;
                return;
            }
        };

        if outcome.had_error {
            warn!("{} loaded (with errors)", outcome.loaded);
            report.documents_failed += 1;
        } else {
            info!("{} loaded", outcome.loaded);
        }
        report.total_loaded += outcome.loaded;

        // The loader is done with the scratch file; remove it before export
        // so the next document never overlaps with this one's artifact.
        drop(staged);

        if let Some(exporter) = &self.exporter {
            if let Err(e) = exporter.export(&document, &mappings, prefix, path) {
                warn!("Manifest export failed for \"{}\": {}", path.display(), e);
                report.exports_failed += 1;
            }
        }
    }
}
