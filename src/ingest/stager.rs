//! Staging of extracted fragments into a scratch harvest file.
//!
//! The stager bridges extraction and loading: it wraps a document's fragments
//! in the harvest envelope and materializes them in a uniquely named scratch
//! file that the loader can reparse. The scratch file is removed when the
//! returned [`StagedHarvest`] drops, on every exit path — success, a
//! loader-reported error, or a panic during load.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

use crate::traits::FormulaFragment;

const HARVEST_HEADER: &str = concat!(
    "<?xml version=\"1.0\" ?>\n",
    "<mws:harvest xmlns:m=\"http://www.w3.org/1998/Math/MathML\"\n",
    "             xmlns:mws=\"http://search.mathweb.org/ns\">\n"
);
const HARVEST_FOOTER: &str = "</mws:harvest>\n";

#[derive(Error, Debug)]
pub enum StageError {
    #[error("Failed to create scratch harvest file: {0}")]
    Create(std::io::Error),
    #[error("Failed to write scratch harvest file: {0}")]
    Write(std::io::Error),
}

/// A staged harvest artifact, alive for exactly one document's processing.
///
/// Holds the scratch file open; `tempfile` guarantees a collision-free name
/// even when several documents are staged concurrently, and removes the file
/// on drop.
#[derive(Debug)]
pub struct StagedHarvest {
    file: NamedTempFile,
    fragment_count: usize,
}

impl StagedHarvest {
    /// Path of the scratch file, for the loader to open.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Number of fragments written into the envelope.
    pub fn fragment_count(&self) -> usize {
        self.fragment_count
    }
}

/// Writes envelope-wrapped fragments to uniquely named scratch files.
#[derive(Debug, Default, Clone)]
pub struct HarvestStager {
    /// Directory for scratch files; `None` uses the system temp dir
    scratch_dir: Option<PathBuf>,
}

impl HarvestStager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places scratch files under `dir` instead of the system temp dir.
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    /// Stages `fragments` for one document into a fresh scratch file.
    ///
    /// Fragments are inserted verbatim between the envelope tags, in the
    /// order given. An empty fragment list still produces a valid, empty
    /// envelope. The file is fully flushed before the handle is returned, so
    /// the loader sees complete contents. `source` is used for diagnostics
    /// only.
    pub fn stage(
        &self,
        fragments: &[FormulaFragment],
        source: &Path,
    ) -> Result<StagedHarvest, StageError> {
        let mut file = match &self.scratch_dir {
            Some(dir) => NamedTempFile::new_in(dir),
            None => NamedTempFile::new(),
        }
        .map_err(StageError::Create)?;

        file.write_all(HARVEST_HEADER.as_bytes())
            .map_err(StageError::Write)?;
        for fragment in fragments {
            file.write_all(fragment.as_bytes())
                .map_err(StageError::Write)?;
        }
        file.write_all(HARVEST_FOOTER.as_bytes())
            .map_err(StageError::Write)?;
        file.flush().map_err(StageError::Write)?;

        debug!(
            "Created harvest {} for \"{}\" ({} fragments)",
            file.path().display(),
            source.display(),
            fragments.len()
        );

        Ok(StagedHarvest {
            file,
            fragment_count: fragments.len(),
        })
    }
}
