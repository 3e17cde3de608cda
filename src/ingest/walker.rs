//! Deterministic single-level directory enumeration.
//!
//! The walker classifies one directory's entries and hands the results back
//! sorted; it never descends by itself. Whether to recurse into a listed
//! subdirectory is the driver's decision, which keeps "visit a file" cleanly
//! separated from "recurse into this directory" and keeps every per-entry
//! failure local to its own subtree.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum WalkError {
    #[error("Failed to read directory '{path}': {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Why an entry was skipped rather than queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Name begins with `.`
    Hidden,
    /// Regular file whose name does not end in the configured suffix
    WrongSuffix,
    /// Directory encountered with recursion disabled
    DirectoryNotRecursed,
    /// Neither a regular file nor a directory (socket, fifo, ...)
    Unsupported,
}

/// One directory level, classified and sorted.
#[derive(Debug, Default)]
pub struct DirectoryListing {
    /// Suffix-matching regular files, lexicographic by file name
    pub documents: Vec<PathBuf>,

    /// Subdirectories, lexicographic by file name; the caller decides
    /// whether to descend
    pub directories: Vec<PathBuf>,

    /// Entries skipped during classification, with the reason
    pub skipped: Vec<(PathBuf, SkipReason)>,
}

/// Enumerates one directory level with a filename-suffix filter.
#[derive(Debug, Clone)]
pub struct DirectoryWalker {
    suffix: String,
}

impl DirectoryWalker {
    /// Creates a walker that queues only files ending in `suffix`
    /// (e.g. `".xhtml"`).
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }

    /// Reads and classifies the entries of `dir`.
    ///
    /// Entries are sorted by file name before classification so results are
    /// reproducible across runs and platforms. Skips are reported via
    /// `tracing`, never as errors; the only error is failing to read the
    /// directory itself.
    pub fn scan(&self, dir: &Path) -> Result<DirectoryListing, WalkError> {
        let read = std::fs::read_dir(dir).map_err(|source| WalkError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut entries: Vec<PathBuf> = Vec::new();
        for entry in read {
            let entry = entry.map_err(|source| WalkError::ReadDir {
                path: dir.to_path_buf(),
                source,
            })?;
            entries.push(entry.path());
        }
        entries.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        let mut listing = DirectoryListing::default();
        for path in entries {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            if name.starts_with('.') {
                debug!("Skipping hidden entry \"{}\"", path.display());
                listing.skipped.push((path, SkipReason::Hidden));
            } else if path.is_dir() {
                listing.directories.push(path);
            } else if path.is_file() {
                if name.ends_with(&self.suffix) {
                    listing.documents.push(path);
                } else {
                    debug!("Skipping bad extension file \"{}\"", path.display());
                    listing.skipped.push((path, SkipReason::WrongSuffix));
                }
            } else {
                debug!("Skipping unsupported entry \"{}\"", path.display());
                listing.skipped.push((path, SkipReason::Unsupported));
            }
        }

        Ok(listing)
    }
}
