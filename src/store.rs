//! Storage-capability seams for the formula and crawl stores.
//!
//! The real backends live outside this crate; what ships here are the trait
//! contracts plus null implementations used when indexing without persistent
//! storage. Callers pick the backend at construction time via
//! [`StoreBackend`] — never by inspecting the concrete type at runtime.

use crate::model::{CrawlId, FormulaId, FormulaLocation};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Operation '{0}' is not supported by this store backend")]
    NotSupported(&'static str),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Store error: {0}")]
    Other(String),
}

/// Backend selection for store construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    /// Writes succeed vacuously, reads are rejected as unsupported.
    #[default]
    Null,
}

/// Persistent store of formula occurrences.
pub trait FormulaStore: Send + Sync {
    /// Records one formula occurrence.
    fn insert_formula(
        &self,
        id: FormulaId,
        crawl: CrawlId,
        location: &FormulaLocation,
    ) -> Result<(), StoreError>;

    /// Returns up to `limit` locations of `id`, starting at `offset`.
    fn query_formula(
        &self,
        id: FormulaId,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<FormulaLocation>, StoreError>;
}

/// Persistent store of crawled document payloads.
pub trait CrawlStore: Send + Sync {
    /// Stores one crawled payload, returning its assigned id.
    fn put_data(&self, data: &str) -> Result<CrawlId, StoreError>;

    /// Retrieves a previously stored payload.
    fn get_data(&self, id: CrawlId) -> Result<String, StoreError>;
}

/// Formula store that accepts inserts as no-ops and rejects queries.
#[derive(Debug, Default)]
pub struct NullFormulaStore;

impl FormulaStore for NullFormulaStore {
    fn insert_formula(
        &self,
        _id: FormulaId,
        _crawl: CrawlId,
        _location: &FormulaLocation,
    ) -> Result<(), StoreError> {
        Ok(())
    }

    fn query_formula(
        &self,
        _id: FormulaId,
        _offset: usize,
        _limit: usize,
    ) -> Result<Vec<FormulaLocation>, StoreError> {
        Err(StoreError::NotSupported("query_formula"))
    }
}

/// Crawl store that accepts writes as no-ops and rejects reads.
#[derive(Debug, Default)]
pub struct NullCrawlStore;

impl CrawlStore for NullCrawlStore {
    fn put_data(&self, _data: &str) -> Result<CrawlId, StoreError> {
        Ok(CrawlId(0))
    }

    fn get_data(&self, _id: CrawlId) -> Result<String, StoreError> {
        Err(StoreError::NotSupported("get_data"))
    }
}

/// Constructs a formula store for the selected backend.
pub fn formula_store(backend: StoreBackend) -> Box<dyn FormulaStore> {
    match backend {
        StoreBackend::Null => Box::new(NullFormulaStore),
    }
}

/// Constructs a crawl store for the selected backend.
pub fn crawl_store(backend: StoreBackend) -> Box<dyn CrawlStore> {
    match backend {
        StoreBackend::Null => Box::new(NullCrawlStore),
    }
}
