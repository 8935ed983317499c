// tests/block_recognition_test.rs
use reissue::{
    NewIssue, ReferenceIssue, RuleKey, SourceHashHolder, Tracker, TrackingConfig,
};

fn rule() -> RuleKey {
    RuleKey::new("squid", "S2095")
}

const REFERENCE_SOURCE: &str = "\
// header
old_prologue();
fn relocated() {
    first();
    second();
    third();
}
old_epilogue();";

// Two lines inserted above `relocated`, surroundings rewritten: the
// function body shifts down by two but its content is unchanged.
const CURRENT_SOURCE: &str = "\
// header
new_prologue();
inserted_one();
inserted_two();
fn relocated() {
    first();
    second();
    third();
}
new_epilogue();";

fn holder() -> SourceHashHolder {
    SourceHashHolder::new(CURRENT_SOURCE, Some(REFERENCE_SOURCE.to_string()))
}

#[test]
fn issue_inside_moved_block_keeps_its_identity() {
    // Anchored on `first();` (reference line 4, current line 6). No
    // checksum and a reworded message, so only block recognition can
    // explain the pair.
    let r = ReferenceIssue::new("A", rule(), Some(4), "old wording");
    let n = NewIssue::new(rule(), Some(6), "new wording");

    let result = Tracker::new().track(&[n], &[r], Some(&holder())).unwrap();

    assert_eq!(result.reference_for(0), Some(0));
}

#[test]
fn issues_in_changed_surroundings_do_not_spuriously_match() {
    let r_moved = ReferenceIssue::new("A", rule(), Some(5), "old wording");
    let r_changed = ReferenceIssue::new("B", rule(), Some(2), "on old prologue");
    let n_moved = NewIssue::new(rule(), Some(7), "new wording");
    let n_changed = NewIssue::new(rule(), Some(10), "on new epilogue");

    let result = Tracker::new()
        .track(&[n_moved, n_changed], &[r_moved, r_changed], Some(&holder()))
        .unwrap();

    assert_eq!(result.reference_for(0), Some(0));
    // The rewritten prologue/epilogue lines are outside every block.
    assert_eq!(result.reference_for(1), None);
    assert_eq!(result.unmatched_reference(), &[1]);
}

#[test]
fn multiple_issues_in_one_block_pair_by_relative_offset() {
    let r_first = ReferenceIssue::new("A", rule(), Some(4), "alpha");
    let r_second = ReferenceIssue::new("B", rule(), Some(5), "beta");
    let n_second = NewIssue::new(rule(), Some(7), "gamma");
    let n_first = NewIssue::new(rule(), Some(6), "delta");

    let result = Tracker::new()
        .track(&[n_second, n_first], &[r_first, r_second], Some(&holder()))
        .unwrap();

    // Offsets within the block decide, not input order or line numbers:
    // current line 7 sits at the same offset as reference line 5.
    assert_eq!(result.reference_for(0), Some(1));
    assert_eq!(result.reference_for(1), Some(0));
}

#[test]
fn min_block_size_gates_recognition() {
    // With an oversized minimum the relocated function no longer counts as
    // a block, so the pair stays unmatched.
    let r = ReferenceIssue::new("A", rule(), Some(4), "old wording");
    let n = NewIssue::new(rule(), Some(6), "new wording");

    let strict = Tracker::with_config(TrackingConfig { min_block_size: 20 });
    let result = strict.track(&[n], &[r], Some(&holder())).unwrap();

    assert_eq!(result.reference_for(0), None);
    assert_eq!(result.unmatched_reference(), &[0]);
}

#[test]
fn absent_holder_skips_block_recognition() {
    let r = ReferenceIssue::new("A", rule(), Some(4), "old wording");
    let n = NewIssue::new(rule(), Some(6), "new wording");

    let result = Tracker::new().track(&[n], &[r], None).unwrap();

    assert_eq!(result.reference_for(0), None);
}

#[test]
fn first_analysis_of_a_file_matches_nothing_by_blocks() {
    // No reference hashes: every new issue is new, every reference issue
    // (if somehow present) is unmatched.
    let holder = SourceHashHolder::new(CURRENT_SOURCE, None);
    let r = ReferenceIssue::new("A", rule(), Some(4), "old wording");
    let n = NewIssue::new(rule(), Some(6), "new wording");

    let result = Tracker::new().track(&[n], &[r], Some(&holder)).unwrap();

    assert_eq!(result.reference_for(0), None);
    assert_eq!(result.unmatched_reference(), &[0]);
}
