use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identifier minted by the loader for one formula occurrence.
///
/// Only valid within the scope of the load that produced it — never compare
/// ids across documents or runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormulaId(pub u64);

/// Identifier for one crawled document stored in a crawl store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CrawlId(pub u64);

/// Location of one formula occurrence inside its source document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormulaLocation {
    /// XPath to the formula node within the document
    pub xpath: String,

    /// Source/document identifier (URL or xml:id of the enclosing element)
    pub url: String,
}

/// Ordered mapping from loader-minted formula ids to their document locations.
///
/// Scoped to exactly one document: the driver hands a freshly emptied table to
/// each loader call and consumes it immediately after the call returns. The
/// table is an explicit output parameter of `load` — it is never stored on a
/// shared long-lived handle, so concurrent documents cannot observe each
/// other's entries.
#[derive(Debug, Default, Clone)]
pub struct IdMappingTable {
    entries: BTreeMap<FormulaId, Vec<FormulaLocation>>,
}

impl IdMappingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a location for `id`, preserving insertion order per id.
    pub fn record(&mut self, id: FormulaId, location: FormulaLocation) {
        self.entries.entry(id).or_default().push(location);
    }

    /// Empties the table for reuse before the next load.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterates ids and their locations in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (FormulaId, &[FormulaLocation])> {
        self.entries.iter().map(|(id, locs)| (*id, locs.as_slice()))
    }

    /// All mapped ids, in iteration order.
    pub fn ids(&self) -> Vec<FormulaId> {
        self.entries.keys().copied().collect()
    }

    /// Number of distinct mapped ids.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Result of one harvest load.
///
/// `had_error` is orthogonal to `loaded`: the loader may report parse errors
/// and still have inserted some formulas. Both are surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOutcome {
    /// Whether the loader hit any error while parsing the harvest
    pub had_error: bool,

    /// Number of formulas actually inserted into the index
    pub loaded: u64,
}

/// One flattened (id, location) pair in the exported manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdMapping {
    pub id: FormulaId,
    pub xpath: String,
    pub url: String,
}

/// Per-document JSON manifest consumed by the external search index.
///
/// Field order matters: serialization emits `ids`, `id_mappings`, `xhtml` in
/// that order for the downstream consumer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// All mapped formula ids, in mapping-table iteration order
    pub ids: Vec<FormulaId>,

    /// One entry per (id, location) pair, flattened across all ids
    pub id_mappings: Vec<IdMapping>,

    /// Verbatim original document text
    pub xhtml: String,
}

impl Manifest {
    /// Builds a manifest from the original document text and a populated
    /// mapping table.
    pub fn from_mappings(document: &str, mappings: &IdMappingTable) -> Self {
        let mut ids = Vec::with_capacity(mappings.len());
        let mut id_mappings = Vec::new();
        for (id, locations) in mappings.iter() {
            ids.push(id);
            for location in locations {
                id_mappings.push(IdMapping {
                    id,
                    xpath: location.xpath.clone(),
                    url: location.url.clone(),
                });
            }
        }
        Self {
            ids,
            id_mappings,
            xhtml: document.to_string(),
        }
    }
}

/// Aggregate outcome of one ingestion run.
///
/// Per-document failures never zero out the running total; they are counted
/// here so callers can distinguish a clean run from a completed-with-errors
/// run.
#[derive(Debug, Default, Clone)]
pub struct IngestionReport {
    /// Total formulas loaded across all documents and subdirectories
    pub total_loaded: u64,

    /// Documents fully processed (staged and handed to the loader)
    pub documents_processed: usize,

    /// Entries skipped by classification (hidden, wrong suffix, non-regular)
    pub entries_skipped: usize,

    /// Documents that failed before or during load, or whose loader run
    /// reported errors
    pub documents_failed: usize,

    /// Manifest exports that failed to write
    pub exports_failed: usize,

    /// Subdirectories that could not be read during a recursive run
    pub directories_failed: usize,

    /// Wall-clock duration of the run (milliseconds)
    pub duration_ms: u64,
}

impl IngestionReport {
    /// Whether any per-file or per-directory error was reported during the
    /// run. A nonzero total does not imply a clean run.
    pub fn had_errors(&self) -> bool {
        self.documents_failed > 0 || self.exports_failed > 0 || self.directories_failed > 0
    }

    /// Folds a subdirectory's report into this one.
    pub(crate) fn absorb(&mut self, other: IngestionReport) {
        self.total_loaded += other.total_loaded;
        self.documents_processed += other.documents_processed;
        self.entries_skipped += other.entries_skipped;
        self.documents_failed += other.documents_failed;
        self.exports_failed += other.exports_failed;
        self.directories_failed += other.directories_failed;
    }
}
