// src/tracking/blocks.rs
//! Moved-block recognition over two per-line hash sequences.
//!
//! Finds contiguous runs of lines whose content is identical between the
//! reference and current versions of a file, even when the runs sit at
//! different absolute positions. Issues anchored inside such a run can then
//! be re-anchored by relative offset instead of absolute line number.

use crate::hashing::LineHash;

/// One accepted run: `len` lines starting at `ref_start` in the reference
/// hash sequence and at `cur_start` in the current one. Starts are 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Block {
    pub ref_start: usize,
    pub cur_start: usize,
    pub len: usize,
}

impl Block {
    pub(crate) fn contains_ref_line(&self, line: u32) -> bool {
        let idx = (line as usize).wrapping_sub(1);
        line >= 1 && idx >= self.ref_start && idx < self.ref_start + self.len
    }

    pub(crate) fn contains_cur_line(&self, line: u32) -> bool {
        let idx = (line as usize).wrapping_sub(1);
        line >= 1 && idx >= self.cur_start && idx < self.cur_start + self.len
    }

    pub(crate) fn ref_offset(&self, line: u32) -> usize {
        line as usize - 1 - self.ref_start
    }

    pub(crate) fn cur_offset(&self, line: u32) -> usize {
        line as usize - 1 - self.cur_start
    }
}

/// Detects unchanged blocks shared by the two hash sequences.
///
/// Maximal common contiguous runs are collected first, then consumed
/// longest-first: a longer identical run is strictly stronger evidence of
/// "same code, moved" than a shorter one. Lines claimed by an accepted run
/// are removed from consideration, and whatever unclaimed remainder a later
/// run still has must itself reach `min_block_size` to be accepted.
pub(crate) fn recognize(
    reference: &[LineHash],
    current: &[LineHash],
    min_block_size: usize,
) -> Vec<Block> {
    let min = min_block_size.max(1);
    let runs = maximal_runs(reference, current);

    let mut ref_claimed = vec![false; reference.len()];
    let mut cur_claimed = vec![false; current.len()];
    let mut accepted = Vec::new();

    loop {
        let Some(best) = best_segment(&runs, &ref_claimed, &cur_claimed, min) else {
            break;
        };
        for offset in 0..best.len {
            ref_claimed[best.ref_start + offset] = true;
            cur_claimed[best.cur_start + offset] = true;
        }
        accepted.push(best);
    }

    accepted.sort_by_key(|b| (b.ref_start, b.cur_start));
    accepted
}

/// All maximal runs `reference[i..i+k] == current[j..j+k]`, i.e. runs that
/// cannot be extended at either end.
fn maximal_runs(reference: &[LineHash], current: &[LineHash]) -> Vec<Block> {
    let mut runs = Vec::new();
    for i in 0..reference.len() {
        for j in 0..current.len() {
            if reference[i] != current[j] {
                continue;
            }
            // Only start at a position where the run cannot extend backwards.
            if i > 0 && j > 0 && reference[i - 1] == current[j - 1] {
                continue;
            }
            let mut len = 0;
            while i + len < reference.len()
                && j + len < current.len()
                && reference[i + len] == current[j + len]
            {
                len += 1;
            }
            runs.push(Block {
                ref_start: i,
                cur_start: j,
                len,
            });
        }
    }
    runs
}

/// Longest unclaimed aligned segment across all runs, ties broken by
/// reference start then current start for determinism.
fn best_segment(
    runs: &[Block],
    ref_claimed: &[bool],
    cur_claimed: &[bool],
    min: usize,
) -> Option<Block> {
    let mut best: Option<Block> = None;
    for run in runs {
        let mut start = 0;
        while start < run.len {
            // Skip positions claimed on either side.
            while start < run.len && position_claimed(run, start, ref_claimed, cur_claimed) {
                start += 1;
            }
            let mut end = start;
            while end < run.len && !position_claimed(run, end, ref_claimed, cur_claimed) {
                end += 1;
            }
            let len = end - start;
            if len >= min {
                let candidate = Block {
                    ref_start: run.ref_start + start,
                    cur_start: run.cur_start + start,
                    len,
                };
                let better = match best {
                    None => true,
                    Some(b) => {
                        (candidate.len, std::cmp::Reverse(candidate.ref_start), std::cmp::Reverse(candidate.cur_start))
                            > (b.len, std::cmp::Reverse(b.ref_start), std::cmp::Reverse(b.cur_start))
                    }
                };
                if better {
                    best = Some(candidate);
                }
            }
            start = end.max(start + 1);
        }
    }
    best
}

fn position_claimed(run: &Block, offset: usize, ref_claimed: &[bool], cur_claimed: &[bool]) -> bool {
    ref_claimed[run.ref_start + offset] || cur_claimed[run.cur_start + offset]
}
