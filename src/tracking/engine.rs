// src/tracking/engine.rs
//! The matching engine: an ordered sequence of decreasing-confidence passes
//! over the new issue set against the reference set.
//!
//! Every pass removes its matches from both pools, so each issue is claimed
//! at most once and the first pass that can explain a pair wins. Within a
//! pass, new issues are visited in input order and the first unclaimed
//! qualifying reference candidate (also input order) is taken. No scoring,
//! so the result is deterministic for identical inputs.

use crate::config::TrackingConfig;
use crate::error::Result;
use crate::source::SourceHashHolder;
use crate::types::{NewIssue, ReferenceIssue};

use super::blocks;
use super::index::CandidateIndex;
use super::result::TrackingResult;

pub struct Tracker {
    config: TrackingConfig,
}

impl Default for Tracker {
    fn default() -> Self {
        Self::new()
    }
}

impl Tracker {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(TrackingConfig::default())
    }

    #[must_use]
    pub fn with_config(config: TrackingConfig) -> Self {
        Self { config }
    }

    /// Matches `new_issues` against `reference_issues`.
    ///
    /// Pass order, strongest first:
    /// 1. pre-assigned durable key (re-validation of already-tracked issues)
    /// 2. same line, same checksum, same message
    /// 3. same checksum, same message (line may differ)
    /// 4. same line, same message (checksum absent or different)
    /// 5. same line (message evolved)
    /// 6. same checksum (line and message both differ)
    /// 7. moved-block fallback via line-hash block recognition
    ///
    /// All passes are rule-scoped: issues of different rules never match.
    /// An issue missing a line or checksum simply skips the passes needing
    /// it. Matching is pure and stateless across calls.
    ///
    /// # Errors
    /// `TrackingError::MissingRuleKey` if any issue on either side carries
    /// an empty rule key, a caller contract violation that is failed fast.
    pub fn track(
        &self,
        new_issues: &[NewIssue],
        reference_issues: &[ReferenceIssue],
        source: Option<&SourceHashHolder>,
    ) -> Result<TrackingResult> {
        for issue in new_issues {
            issue.rule_key.validate()?;
        }
        for issue in reference_issues {
            issue.rule_key.validate()?;
        }

        let mut index = CandidateIndex::build(reference_issues);
        let mut result = TrackingResult::new(new_issues.len());

        self.match_by_key(new_issues, &mut index, &mut result);

        for pass in HEURISTIC_PASSES {
            if result.match_count() == new_issues.len() {
                break;
            }
            self.run_pass(pass, new_issues, reference_issues, &mut index, &mut result);
        }

        if result.match_count() != new_issues.len() {
            self.match_moved_blocks(new_issues, reference_issues, source, &mut index, &mut result);
        }

        result.set_unmatched_reference(index.unclaimed());
        Ok(result)
    }

    /// Pass 1: a pre-assigned key is authoritative and bypasses every
    /// heuristic below.
    fn match_by_key(
        &self,
        new_issues: &[NewIssue],
        index: &mut CandidateIndex<'_>,
        result: &mut TrackingResult,
    ) {
        for (n, issue) in new_issues.iter().enumerate() {
            let Some(key) = &issue.key else { continue };
            if let Some(r) = index.unclaimed_by_key(key, &issue.rule_key) {
                index.claim(r);
                result.record(n, r);
            }
        }
    }

    fn run_pass(
        &self,
        pass: Pass,
        new_issues: &[NewIssue],
        reference_issues: &[ReferenceIssue],
        index: &mut CandidateIndex<'_>,
        result: &mut TrackingResult,
    ) {
        for (n, issue) in new_issues.iter().enumerate() {
            if result.is_matched(n) {
                continue;
            }
            let candidates = pass.candidates(issue, index);
            let chosen = candidates
                .into_iter()
                .find(|&r| pass.accepts(issue, &reference_issues[r]));
            if let Some(r) = chosen {
                index.claim(r);
                result.record(n, r);
            }
        }
    }

    /// Pass 7: align leftover same-rule issues through unchanged blocks that
    /// moved position. Skipped without a source holder or without reference
    /// hashes (first analysis of the file).
    fn match_moved_blocks(
        &self,
        new_issues: &[NewIssue],
        reference_issues: &[ReferenceIssue],
        source: Option<&SourceHashHolder>,
        index: &mut CandidateIndex<'_>,
        result: &mut TrackingResult,
    ) {
        let Some(holder) = source else { return };
        let Some(reference_hashes) = holder.reference_line_hashes() else {
            return;
        };
        let detected = blocks::recognize(
            reference_hashes,
            holder.current_line_hashes(),
            self.config.min_block_size,
        );
        if detected.is_empty() {
            return;
        }

        for (n, issue) in new_issues.iter().enumerate() {
            if result.is_matched(n) {
                continue;
            }
            let Some(line) = issue.line else { continue };
            let Some(block) = detected.iter().find(|b| b.contains_cur_line(line)) else {
                continue;
            };
            let offset = block.cur_offset(line);

            // Among unclaimed reference issues of the same rule inside the
            // block's reference range, the closest relative offset wins,
            // exact agreement first.
            let chosen = index
                .unclaimed_by_rule(&issue.rule_key)
                .into_iter()
                .filter_map(|r| {
                    let ref_line = reference_issues[r].line?;
                    block
                        .contains_ref_line(ref_line)
                        .then(|| (block.ref_offset(ref_line).abs_diff(offset), r))
                })
                .min_by_key(|&(distance, r)| (distance, r));

            if let Some((_, r)) = chosen {
                index.claim(r);
                result.record(n, r);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    LineChecksumMessage,
    ChecksumMessage,
    LineMessage,
    Line,
    Checksum,
}

/// Heuristic passes 2-6, strongest first. The asymmetry between `Line`
/// (rank 5) and `Checksum` (rank 6) is a compatibility choice carried over
/// from the original ordering, not a provable optimum.
const HEURISTIC_PASSES: [Pass; 5] = [
    Pass::LineChecksumMessage,
    Pass::ChecksumMessage,
    Pass::LineMessage,
    Pass::Line,
    Pass::Checksum,
];

impl Pass {
    /// Narrowest index bucket for this pass. Candidates come back in
    /// reference input order.
    fn candidates(self, issue: &NewIssue, index: &CandidateIndex<'_>) -> Vec<usize> {
        match self {
            Pass::LineChecksumMessage | Pass::LineMessage | Pass::Line => issue
                .line
                .map(|line| index.unclaimed_by_rule_line(&issue.rule_key, line))
                .unwrap_or_default(),
            Pass::ChecksumMessage | Pass::Checksum => issue
                .checksum
                .as_ref()
                .map(|c| index.unclaimed_by_rule_checksum(&issue.rule_key, c.as_str()))
                .unwrap_or_default(),
        }
    }

    fn accepts(self, new: &NewIssue, reference: &ReferenceIssue) -> bool {
        match self {
            Pass::LineChecksumMessage => {
                same_line(new, reference)
                    && same_checksum(new, reference)
                    && same_message(new, reference)
            }
            Pass::ChecksumMessage => same_checksum(new, reference) && same_message(new, reference),
            Pass::LineMessage => same_line(new, reference) && same_message(new, reference),
            Pass::Line => same_line(new, reference),
            Pass::Checksum => same_checksum(new, reference),
        }
    }
}

/// Both lines present and equal. An absent line never equals anything, so
/// unanchored issues fall through line-based passes instead of matching a
/// defaulted line 0.
fn same_line(new: &NewIssue, reference: &ReferenceIssue) -> bool {
    matches!((new.line, reference.line), (Some(a), Some(b)) if a == b)
}

/// Both checksums present and equal. Two absent checksums are not "equal".
fn same_checksum(new: &NewIssue, reference: &ReferenceIssue) -> bool {
    matches!(
        (&new.checksum, &reference.checksum),
        (Some(a), Some(b)) if a == b
    )
}

/// Message equality tolerant of storage truncation: both sides trimmed,
/// then the longer one truncated to the shorter one's length before
/// comparing. Deliberately lossy.
fn same_message(new: &NewIssue, reference: &ReferenceIssue) -> bool {
    let a = new.message.trim();
    let b = reference.message.trim();
    let shorter = a.chars().count().min(b.chars().count());
    a.chars().take(shorter).eq(b.chars().take(shorter))
}
