// src/tracking/index.rs
//! Secondary indices over the reference issue set.
//!
//! Built once per tracking call, read-only afterwards apart from claim
//! bookkeeping. Buckets keep reference input order, which is what makes the
//! engine's first-claim-wins tie-break deterministic.

use std::collections::HashMap;

use crate::types::{ReferenceIssue, RuleKey};

pub(crate) struct CandidateIndex<'a> {
    reference: &'a [ReferenceIssue],
    by_key: HashMap<String, usize>,
    by_rule: HashMap<RuleKey, Vec<usize>>,
    by_rule_line: HashMap<(RuleKey, u32), Vec<usize>>,
    by_rule_checksum: HashMap<(RuleKey, String), Vec<usize>>,
    claimed: Vec<bool>,
}

impl<'a> CandidateIndex<'a> {
    pub(crate) fn build(reference: &'a [ReferenceIssue]) -> Self {
        let mut index = Self {
            reference,
            by_key: HashMap::new(),
            by_rule: HashMap::new(),
            by_rule_line: HashMap::new(),
            by_rule_checksum: HashMap::new(),
            claimed: vec![false; reference.len()],
        };

        for (i, issue) in reference.iter().enumerate() {
            index.by_key.entry(issue.key.clone()).or_insert(i);
            index
                .by_rule
                .entry(issue.rule_key.clone())
                .or_default()
                .push(i);
            if let Some(line) = issue.line {
                index
                    .by_rule_line
                    .entry((issue.rule_key.clone(), line))
                    .or_default()
                    .push(i);
            }
            if let Some(checksum) = &issue.checksum {
                index
                    .by_rule_checksum
                    .entry((issue.rule_key.clone(), checksum.as_str().to_string()))
                    .or_default()
                    .push(i);
            }
        }

        index
    }

    pub(crate) fn claim(&mut self, i: usize) {
        debug_assert!(!self.claimed[i]);
        self.claimed[i] = true;
    }

    /// Unclaimed reference issue with this durable key and rule, if any.
    /// Keys are unique in a well-formed reference set; the first occurrence
    /// wins otherwise.
    pub(crate) fn unclaimed_by_key(&self, key: &str, rule: &RuleKey) -> Option<usize> {
        self.by_key
            .get(key)
            .copied()
            .filter(|&i| !self.claimed[i])
            .filter(|&i| self.reference[i].rule_key == *rule)
    }

    pub(crate) fn unclaimed_by_rule(&self, rule: &RuleKey) -> Vec<usize> {
        self.unclaimed_in(self.by_rule.get(rule))
    }

    pub(crate) fn unclaimed_by_rule_line(&self, rule: &RuleKey, line: u32) -> Vec<usize> {
        self.unclaimed_in(self.by_rule_line.get(&(rule.clone(), line)))
    }

    pub(crate) fn unclaimed_by_rule_checksum(&self, rule: &RuleKey, checksum: &str) -> Vec<usize> {
        self.unclaimed_in(
            self.by_rule_checksum
                .get(&(rule.clone(), checksum.to_string())),
        )
    }

    /// All reference indices never claimed, in input order.
    pub(crate) fn unclaimed(&self) -> Vec<usize> {
        (0..self.claimed.len())
            .filter(|&i| !self.claimed[i])
            .collect()
    }

    fn unclaimed_in(&self, bucket: Option<&Vec<usize>>) -> Vec<usize> {
        bucket
            .map(|b| b.iter().copied().filter(|&i| !self.claimed[i]).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ReferenceIssue;

    fn rule(r: &str) -> RuleKey {
        RuleKey::new("squid", r)
    }

    #[test]
    fn buckets_keep_input_order_and_respect_claims() {
        let reference = vec![
            ReferenceIssue::new("A", rule("S100"), Some(3), "m"),
            ReferenceIssue::new("B", rule("S100"), Some(3), "m"),
            ReferenceIssue::new("C", rule("S200"), Some(3), "m"),
        ];
        let mut index = CandidateIndex::build(&reference);

        assert_eq!(index.unclaimed_by_rule_line(&rule("S100"), 3), vec![0, 1]);
        index.claim(0);
        assert_eq!(index.unclaimed_by_rule_line(&rule("S100"), 3), vec![1]);
        assert_eq!(index.unclaimed(), vec![1, 2]);
    }

    #[test]
    fn key_lookup_is_rule_scoped() {
        let reference = vec![ReferenceIssue::new("A", rule("S100"), None, "m")];
        let index = CandidateIndex::build(&reference);

        assert_eq!(index.unclaimed_by_key("A", &rule("S100")), Some(0));
        assert_eq!(index.unclaimed_by_key("A", &rule("S999")), None);
        assert_eq!(index.unclaimed_by_key("Z", &rule("S100")), None);
    }

    #[test]
    fn issues_without_line_or_checksum_stay_out_of_those_buckets() {
        let reference = vec![ReferenceIssue::new("A", rule("S100"), None, "m")];
        let index = CandidateIndex::build(&reference);

        assert!(index.unclaimed_by_rule_line(&rule("S100"), 0).is_empty());
        assert!(index
            .unclaimed_by_rule_checksum(&rule("S100"), "")
            .is_empty());
        assert_eq!(index.unclaimed_by_rule(&rule("S100")), vec![0]);
    }
}
