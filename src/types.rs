// src/types.rs
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackingError};
use crate::hashing::LineHash;

/// Identifies a rule: the repository (plugin/engine) it comes from plus its
/// id within that repository. Immutable once an issue carries it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleKey {
    pub repository: String,
    pub rule: String,
}

impl RuleKey {
    #[must_use]
    pub fn new(repository: impl Into<String>, rule: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            rule: rule.into(),
        }
    }

    /// An empty repository or rule id means the issue was built wrong
    /// upstream; the tracker refuses such input rather than dropping it.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.repository.is_empty() || self.rule.is_empty() {
            return Err(TrackingError::MissingRuleKey {
                repository: self.repository.clone(),
                rule: self.rule.clone(),
            });
        }
        Ok(())
    }
}

impl std::fmt::Display for RuleKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.repository, self.rule)
    }
}

/// A finding freshly produced by the current analysis run. Lives in memory
/// only for the duration of one tracking call; the caller promotes it
/// afterwards (merged with matched reference identity, or marked new).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewIssue {
    pub rule_key: RuleKey,
    /// 1-based; `None` for file- or project-scoped findings.
    pub line: Option<u32>,
    pub message: String,
    /// Hash of the anchor line's content; `None` when there is no line or
    /// no source to hash.
    #[serde(default)]
    pub checksum: Option<LineHash>,
    /// Pre-assigned durable key, only set when re-validating an issue that
    /// is already tracked. Matched unconditionally when present.
    #[serde(default)]
    pub key: Option<String>,
}

impl NewIssue {
    #[must_use]
    pub fn new(rule_key: RuleKey, line: Option<u32>, message: impl Into<String>) -> Self {
        Self {
            rule_key,
            line,
            message: message.into(),
            checksum: None,
            key: None,
        }
    }

    #[must_use]
    pub fn with_checksum(mut self, checksum: LineHash) -> Self {
        self.checksum = Some(checksum);
        self
    }

    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
}

/// An issue as recorded at the end of the previous analysis, loaded from
/// durable storage. Never mutated by the tracker: it is either consumed
/// (matched, identity transferred) or left over for the caller to close.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceIssue {
    /// Stable persisted identifier, the only field durable across analyses.
    pub key: String,
    pub rule_key: RuleKey,
    /// Line as last recorded; `None` for unanchored issues.
    pub line: Option<u32>,
    /// Message as stored, possibly truncated by the persistence layer.
    pub message: String,
    #[serde(default)]
    pub checksum: Option<LineHash>,
    /// Prior lifecycle state. Consulted by the caller when disposing of
    /// unmatched issues, not by the tracker.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub resolution: Option<String>,
}

impl ReferenceIssue {
    #[must_use]
    pub fn new(
        key: impl Into<String>,
        rule_key: RuleKey,
        line: Option<u32>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            rule_key,
            line,
            message: message.into(),
            checksum: None,
            status: None,
            resolution: None,
        }
    }

    #[must_use]
    pub fn with_checksum(mut self, checksum: LineHash) -> Self {
        self.checksum = Some(checksum);
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    #[must_use]
    pub fn with_resolution(mut self, resolution: impl Into<String>) -> Self {
        self.resolution = Some(resolution.into());
        self
    }
}
