// src/tracking/mod.rs
//! Issue reconciliation: matches the findings of the current analysis
//! against those recorded by the previous one, so identity, history, and
//! creation date survive edits, refactors, and moved blocks.

mod blocks;
mod engine;
mod index;
mod result;

pub use engine::Tracker;
pub use result::TrackingResult;

use rayon::prelude::*;

use crate::error::Result;
use crate::source::SourceHashHolder;
use crate::types::{NewIssue, ReferenceIssue};

/// One file's worth of tracking input. The caller partitions the project's
/// reference issues per component before invocation; the tracker never sees
/// the project-wide pool.
pub struct ComponentInput {
    /// Caller-side component identifier (file key), carried through.
    pub component: String,
    pub new_issues: Vec<NewIssue>,
    pub reference_issues: Vec<ReferenceIssue>,
    /// Absent for components with no hashable source (first analysis,
    /// binary files, project-level scope).
    pub source: Option<SourceHashHolder>,
}

pub struct ComponentResult {
    pub component: String,
    pub new_issues: Vec<NewIssue>,
    pub reference_issues: Vec<ReferenceIssue>,
    pub result: TrackingResult,
}

/// Tracks many components in parallel. Each tracking is independent and
/// stateless, so this is a plain fan-out; output order matches input order.
///
/// # Errors
/// Fails on the first component whose issues violate the rule-key contract.
pub fn track_components(
    tracker: &Tracker,
    inputs: Vec<ComponentInput>,
) -> Result<Vec<ComponentResult>> {
    inputs
        .into_par_iter()
        .map(|input| {
            let result = tracker.track(
                &input.new_issues,
                &input.reference_issues,
                input.source.as_ref(),
            )?;
            Ok(ComponentResult {
                component: input.component,
                new_issues: input.new_issues,
                reference_issues: input.reference_issues,
                result,
            })
        })
        .collect()
}
