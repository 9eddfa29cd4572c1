//! Combining two diffs of the same base into one output plan.
//!
//! Both diffs hold exactly one record per base line, so they are walked with
//! two cursors that advance one base line at a time. Before each base line,
//! the added lines of either side are emitted first-side first. When both
//! sides added a block at the same spot and one block is contained in the
//! other, the contained block is dropped so shared insertions appear once.

use tracing::trace;

use crate::equality::{is_line_subset_of, lines_equal, Window};
use crate::types::{DiffRecord, LineChange, MergeError, MergeRecord, MergeSource};

/// Merge `diff_first` (base to `first`) with `diff_second` (base to `second`).
pub fn compute_merge<S: AsRef<str>>(
    diff_first: &[DiffRecord],
    first: &[S],
    diff_second: &[DiffRecord],
    second: &[S],
) -> Result<Vec<MergeRecord>, MergeError> {
    let anchored_first = diff_first.iter().filter(|r| r.is_base_anchored()).count();
    let anchored_second = diff_second.iter().filter(|r| r.is_base_anchored()).count();
    if anchored_first != anchored_second {
        return Err(MergeError::MisalignedDiffs {
            first: anchored_first,
            second: anchored_second,
        });
    }

    let mut result = Vec::with_capacity((diff_first.len() + diff_second.len()) / 2);
    let mut first_at = 0;
    let mut second_at = 0;

    loop {
        let first_block = result.len();
        let first_end = push_added(diff_first, first_at, &mut result, MergeRecord::First)?;
        let second_block = result.len();
        let second_end = push_added(diff_second, second_at, &mut result, MergeRecord::Second)?;

        let added_first = first_end - first_at;
        let added_second = second_end - second_at;
        if added_first > 0 && added_second > 0 {
            let first_window = Window::new(
                first,
                changed_line(&diff_first[first_at])?,
                added_first,
            )?;
            let second_window = Window::new(
                second,
                changed_line(&diff_second[second_at])?,
                added_second,
            )?;

            if is_line_subset_of(second_window, first_window) {
                trace!(lines = added_second, "dropping second-side insertion");
                result.truncate(second_block);
            } else if is_line_subset_of(first_window, second_window) {
                trace!(lines = added_first, "dropping first-side insertion");
                result.drain(first_block..second_block);
            }
        }

        let (Some(ra), Some(rb)) = (diff_first.get(first_end), diff_second.get(second_end))
        else {
            break;
        };

        if let Some(record) = combine(ra, first, rb, second)? {
            result.push(record);
        }

        first_at = first_end + 1;
        second_at = second_end + 1;
    }

    Ok(result)
}

/// Push a record for every added line from `start` on. Returns the index of
/// the first record that is not an addition.
fn push_added(
    diff: &[DiffRecord],
    start: usize,
    dest: &mut Vec<MergeRecord>,
    make: fn(usize) -> MergeRecord,
) -> Result<usize, MergeError> {
    let mut at = start;
    while let Some(record) = diff.get(at).filter(|r| r.change == LineChange::Added) {
        dest.push(make(changed_line(record)?));
        at += 1;
    }
    Ok(at)
}

/// Decide the output for one base line given what each side did with it.
fn combine<S: AsRef<str>>(
    ra: &DiffRecord,
    first: &[S],
    rb: &DiffRecord,
    second: &[S],
) -> Result<Option<MergeRecord>, MergeError> {
    use LineChange::{Changed, Unchanged};

    let record = match (ra.change, rb.change) {
        (Unchanged | Changed, Unchanged) => Some(MergeRecord::First(changed_line(ra)?)),
        (Unchanged, Changed) => Some(MergeRecord::Second(changed_line(rb)?)),
        (Changed, Changed) => {
            let a = changed_line(ra)?;
            let b = changed_line(rb)?;
            let text_a = line(first, a, MergeSource::First)?;
            let text_b = line(second, b, MergeSource::Second)?;
            if lines_equal(text_a, text_b) {
                Some(MergeRecord::First(a))
            } else {
                Some(MergeRecord::Conflict {
                    first: Some(a),
                    second: Some(b),
                })
            }
        }
        (Changed, _) | (_, Changed) => Some(MergeRecord::Conflict {
            first: ra.changed_index,
            second: rb.changed_index,
        }),
        // One or both sides deleted the line and the other left it alone.
        _ => None,
    };
    Ok(record)
}

fn changed_line(record: &DiffRecord) -> Result<usize, MergeError> {
    record.changed_index.ok_or(MergeError::MissingChangedLine {
        change: record.change,
        base_index: record.base_index,
    })
}

pub(crate) fn line<S: AsRef<str>>(
    lines: &[S],
    index: usize,
    side: MergeSource,
) -> Result<&str, MergeError> {
    lines
        .get(index)
        .map(AsRef::as_ref)
        .ok_or(MergeError::LineOutOfRange {
            side,
            index,
            len: lines.len(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::compute_diff;

    fn merge(base: &[&str], first: &[&str], second: &[&str]) -> Vec<MergeRecord> {
        let diff_first = compute_diff(base, first);
        let diff_second = compute_diff(base, second);
        compute_merge(&diff_first, first, &diff_second, second).unwrap()
    }

    #[test]
    fn test_first_change_wins_over_unchanged() {
        let records = merge(&["A", "B", "C"], &["A", "X", "C"], &["A", "B", "C"]);
        assert_eq!(
            records,
            vec![
                MergeRecord::First(0),
                MergeRecord::First(1),
                MergeRecord::First(2)
            ]
        );
    }

    #[test]
    fn test_second_change_wins_over_unchanged() {
        let records = merge(&["A", "B", "C"], &["A", "B", "C"], &["A", "Y", "C"]);
        assert_eq!(records[1], MergeRecord::Second(1));
    }

    #[test]
    fn test_conflicting_changes() {
        let records = merge(&["A", "B"], &["A", "B1"], &["A", "B2"]);
        assert_eq!(
            records,
            vec![
                MergeRecord::First(0),
                MergeRecord::Conflict {
                    first: Some(1),
                    second: Some(1)
                }
            ]
        );
    }

    #[test]
    fn test_identical_changes_do_not_conflict() {
        let records = merge(&["A", "B"], &["A", "B1"], &["A", " B1 "]);
        assert_eq!(records, vec![MergeRecord::First(0), MergeRecord::First(1)]);
    }

    #[test]
    fn test_change_against_removal_conflicts() {
        // The first side rewrites "B" inside a gap; the second drops it.
        let records = merge(&["A", "B", "C"], &["A", "X", "C"], &["A", "C"]);
        assert_eq!(
            records,
            vec![
                MergeRecord::First(0),
                MergeRecord::Conflict {
                    first: Some(1),
                    second: None
                },
                MergeRecord::First(2),
            ]
        );
    }

    #[test]
    fn test_removal_against_change_conflicts() {
        let records = merge(&["A", "B", "C"], &["A", "C"], &["A", "X", "C"]);
        assert_eq!(
            records,
            vec![
                MergeRecord::First(0),
                MergeRecord::Conflict {
                    first: None,
                    second: Some(1)
                },
                MergeRecord::First(1),
            ]
        );
    }

    #[test]
    fn test_agreed_removal_is_silent() {
        let records = merge(&["A", "B", "C"], &["A", "C"], &["A", "C"]);
        assert_eq!(records, vec![MergeRecord::First(0), MergeRecord::First(1)]);
    }

    #[test]
    fn test_one_sided_removal_is_applied() {
        let records = merge(&["A", "B", "C"], &["A", "C"], &["A", "B", "C"]);
        assert_eq!(records, vec![MergeRecord::First(0), MergeRecord::First(1)]);
        let records = merge(&["A", "B", "C"], &["A", "B", "C"], &["A", "C"]);
        assert_eq!(records, vec![MergeRecord::First(0), MergeRecord::First(2)]);
    }

    #[test]
    fn test_duplicate_insertion_from_second_is_dropped() {
        let records = merge(&["A"], &["A", "M1", "M2"], &["A", "M1"]);
        assert_eq!(
            records,
            vec![
                MergeRecord::First(0),
                MergeRecord::First(1),
                MergeRecord::First(2)
            ]
        );
    }

    #[test]
    fn test_duplicate_insertion_from_first_is_dropped() {
        let records = merge(&["A", "Z"], &["A", "M2", "Z"], &["A", "M1", "M2", "M3", "Z"]);
        assert_eq!(
            records,
            vec![
                MergeRecord::First(0),
                MergeRecord::Second(1),
                MergeRecord::Second(2),
                MergeRecord::Second(3),
                MergeRecord::First(2),
            ]
        );
    }

    #[test]
    fn test_distinct_insertions_are_both_kept() {
        let records = merge(&["A", "Z"], &["A", "P", "Z"], &["A", "Q", "Z"]);
        assert_eq!(
            records,
            vec![
                MergeRecord::First(0),
                MergeRecord::First(1),
                MergeRecord::Second(1),
                MergeRecord::First(2),
            ]
        );
    }

    #[test]
    fn test_empty_base_keeps_both_insertions_in_order() {
        let records = merge(&[], &["X"], &["Y"]);
        assert_eq!(records, vec![MergeRecord::First(0), MergeRecord::Second(0)]);
    }

    #[test]
    fn test_same_document_on_both_sides() {
        let base = ["a", "b", "c"];
        let side = ["a", "n", "c", "d"];
        let records = merge(&base, &side, &side);
        assert!(records.iter().all(|r| r.source() == MergeSource::First));
        let indices: Vec<usize> = records.iter().filter_map(|r| r.line_index()).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_misaligned_diffs_are_rejected() {
        let first = ["a"];
        let second = ["a", "b"];
        let diff_first = compute_diff(&["a"], &first);
        let diff_second = compute_diff(&["a", "b"], &second);
        assert_eq!(
            compute_merge(&diff_first, &first, &diff_second, &second).unwrap_err(),
            MergeError::MisalignedDiffs {
                first: 1,
                second: 2
            }
        );
    }

    #[test]
    fn test_out_of_range_insertion_is_rejected() {
        let first = ["a"];
        let second = ["b"];
        let diff_first = vec![DiffRecord::added(0)];
        let diff_second = vec![DiffRecord::added(5)];
        let err = compute_merge(&diff_first, &first, &diff_second, &second).unwrap_err();
        assert!(matches!(err, MergeError::WindowOutOfRange { start: 5, .. }));
    }
}
