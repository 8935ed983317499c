// src/source.rs
//! Lazy, memoized access to per-line hashes of the current and reference
//! versions of one file.
//!
//! A holder is owned by exactly one file-tracking invocation. File reads
//! happen at construction; hashing happens at most once per side, on first
//! access. With no reference side (first analysis of the file) all
//! checksum- and block-based matching is skipped by the engine.

use std::cell::OnceCell;
use std::path::Path;

use crate::error::{Result, TrackingError};
use crate::hashing::{hash_lines, LineHash};

enum ReferenceSource {
    /// Previous source text, hashed on first access.
    Text(String),
    /// Hashes restored from durable storage, as the scan pipeline stores
    /// them server-side instead of old source text.
    Hashes(Vec<LineHash>),
}

pub struct SourceHashHolder {
    current_source: String,
    reference_source: Option<ReferenceSource>,
    current: OnceCell<Vec<LineHash>>,
    reference: OnceCell<Option<Vec<LineHash>>>,
}

impl SourceHashHolder {
    /// Builds a holder from in-memory source texts. `reference_source` is
    /// `None` when the file was never analyzed before.
    #[must_use]
    pub fn new(current_source: impl Into<String>, reference_source: Option<String>) -> Self {
        Self {
            current_source: current_source.into(),
            reference_source: reference_source.map(ReferenceSource::Text),
            current: OnceCell::new(),
            reference: OnceCell::new(),
        }
    }

    /// Builds a holder whose reference side is already hashed (loaded from
    /// the previous analysis' stored line hashes).
    #[must_use]
    pub fn with_reference_hashes(
        current_source: impl Into<String>,
        reference_hashes: Option<Vec<LineHash>>,
    ) -> Self {
        Self {
            current_source: current_source.into(),
            reference_source: reference_hashes.map(ReferenceSource::Hashes),
            current: OnceCell::new(),
            reference: OnceCell::new(),
        }
    }

    /// Reads the current source from disk. I/O happens here, once; the
    /// accessors below never touch the filesystem.
    ///
    /// # Errors
    /// Returns `TrackingError::Io` if the file cannot be read.
    pub fn from_path(path: &Path, reference_source: Option<String>) -> Result<Self> {
        let current_source =
            std::fs::read_to_string(path).map_err(|source| TrackingError::Io {
                source,
                path: path.to_path_buf(),
            })?;
        Ok(Self::new(current_source, reference_source))
    }

    /// Per-line hashes of the file as produced by this analysis run.
    /// Computed on first call, cached afterwards.
    pub fn current_line_hashes(&self) -> &[LineHash] {
        self.current.get_or_init(|| hash_lines(&self.current_source))
    }

    /// Per-line hashes of the file as recorded by the previous analysis,
    /// or `None` if this is the file's first analysis.
    pub fn reference_line_hashes(&self) -> Option<&[LineHash]> {
        self.reference
            .get_or_init(|| match &self.reference_source {
                Some(ReferenceSource::Text(text)) => Some(hash_lines(text)),
                Some(ReferenceSource::Hashes(hashes)) => Some(hashes.clone()),
                None => None,
            })
            .as_deref()
    }

    /// Checksum for a 1-based line of the current source, for stamping onto
    /// a freshly detected issue. `None` when the line is out of range.
    #[must_use]
    pub fn checksum_for_line(&self, line: u32) -> Option<LineHash> {
        if line == 0 {
            return None;
        }
        self.current_line_hashes()
            .get(line as usize - 1)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashing::line_hash;

    #[test]
    fn current_hashes_are_memoized() {
        let holder = SourceHashHolder::new("a\nb\nc", None);
        let first = holder.current_line_hashes().as_ptr();
        let second = holder.current_line_hashes().as_ptr();
        assert_eq!(first, second);
        assert_eq!(holder.current_line_hashes().len(), 3);
    }

    #[test]
    fn missing_reference_side_stays_absent() {
        let holder = SourceHashHolder::new("a", None);
        assert!(holder.reference_line_hashes().is_none());
        assert!(holder.reference_line_hashes().is_none());
    }

    #[test]
    fn stored_reference_hashes_pass_through() {
        let stored = hash_lines("x\ny");
        let holder = SourceHashHolder::with_reference_hashes("x\ny", Some(stored.clone()));
        assert_eq!(holder.reference_line_hashes(), Some(stored.as_slice()));
    }

    #[test]
    fn checksum_for_line_is_one_based() {
        let holder = SourceHashHolder::new("first\nsecond", None);
        assert_eq!(holder.checksum_for_line(1), Some(line_hash("first")));
        assert_eq!(holder.checksum_for_line(2), Some(line_hash("second")));
        assert_eq!(holder.checksum_for_line(0), None);
        assert_eq!(holder.checksum_for_line(3), None);
    }
}
