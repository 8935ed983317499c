// src/tracking/result.rs
use serde::Serialize;

/// Outcome of one tracking call: a partial, one-to-one mapping from new
/// issues to reference issues, both addressed by their index in the input
/// slices. Injective by construction: `record` refuses a second claim on
/// either side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackingResult {
    /// `matches[i]` is the reference index matched to new issue `i`.
    matches: Vec<Option<usize>>,
    /// Reference indices never matched, in reference input order.
    unmatched_reference: Vec<usize>,
}

impl TrackingResult {
    pub(crate) fn new(new_count: usize) -> Self {
        Self {
            matches: vec![None; new_count],
            unmatched_reference: Vec::new(),
        }
    }

    /// Records a match. Both sides must be unclaimed; the engine's claim
    /// bookkeeping guarantees that, so a violation here is an engine bug.
    pub(crate) fn record(&mut self, new_index: usize, reference_index: usize) {
        debug_assert!(self.matches[new_index].is_none());
        debug_assert!(!self.matches.contains(&Some(reference_index)));
        self.matches[new_index] = Some(reference_index);
    }

    pub(crate) fn set_unmatched_reference(&mut self, indices: Vec<usize>) {
        self.unmatched_reference = indices;
    }

    /// Reference index matched to the given new issue, if any.
    #[must_use]
    pub fn reference_for(&self, new_index: usize) -> Option<usize> {
        self.matches.get(new_index).copied().flatten()
    }

    #[must_use]
    pub fn is_matched(&self, new_index: usize) -> bool {
        self.reference_for(new_index).is_some()
    }

    /// All matched pairs as `(new_index, reference_index)`, in new-issue
    /// input order.
    pub fn matched_pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.matches
            .iter()
            .enumerate()
            .filter_map(|(n, r)| r.map(|r| (n, r)))
    }

    /// New issues with no reference counterpart: genuinely new findings.
    pub fn unmatched_new(&self) -> impl Iterator<Item = usize> + '_ {
        self.matches
            .iter()
            .enumerate()
            .filter_map(|(n, r)| r.is_none().then_some(n))
    }

    /// Reference issues no new issue claimed: candidates for closing.
    #[must_use]
    pub fn unmatched_reference(&self) -> &[usize] {
        &self.unmatched_reference
    }

    #[must_use]
    pub fn match_count(&self) -> usize {
        self.matches.iter().filter(|m| m.is_some()).count()
    }
}
