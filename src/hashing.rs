// src/hashing.rs
//! Line-content hashing.
//!
//! A line hash must survive the formatting changes the platform wants to
//! ignore (indentation shifts, trailing whitespace) while catching any real
//! content change. We strip every tab and space from the line, then take a
//! SHA-256 hex digest of what remains.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Hex digest of one source line's whitespace-stripped content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineHash(pub String);

impl LineHash {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for LineHash {
    fn from(hex: String) -> Self {
        LineHash(hex)
    }
}

impl std::fmt::Display for LineHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hashes a single line, ignoring all tabs and spaces.
#[must_use]
pub fn line_hash(line: &str) -> LineHash {
    let stripped: String = line.chars().filter(|c| *c != ' ' && *c != '\t').collect();
    let mut hasher = Sha256::new();
    hasher.update(stripped.as_bytes());
    LineHash(format!("{:x}", hasher.finalize()))
}

/// Hashes every line of a source text, in order. Line endings are
/// normalized (CRLF/CR to LF) so hashes agree across platforms.
#[must_use]
pub fn hash_lines(source: &str) -> Vec<LineHash> {
    let normalized = source.replace("\r\n", "\n").replace('\r', "\n");
    normalized.split('\n').map(line_hash).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_is_ignored() {
        assert_eq!(line_hash("  foo = bar;"), line_hash("foo\t=\tbar;"));
        assert_eq!(line_hash("foo=bar;"), line_hash("   foo = bar;   "));
    }

    #[test]
    fn content_changes_are_detected() {
        assert_ne!(line_hash("foo = bar;"), line_hash("foo = baz;"));
    }

    #[test]
    fn line_endings_are_normalized() {
        assert_eq!(hash_lines("a\nb"), hash_lines("a\r\nb"));
        assert_eq!(hash_lines("a\nb").len(), 2);
    }
}
