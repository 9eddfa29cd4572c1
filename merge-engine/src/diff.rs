//! Greedy line alignment of a changed document against its base.
//!
//! The scan walks the base once and, for every base line, takes the first
//! equal line at or after the cursor in the changed document. This is not a
//! minimal edit script: repeated lines can align differently than an LCS diff
//! would, and the merge stage relies on exactly this behavior.
//!
//! Base lines that find no match are recorded as removed. When a later match
//! leaves a gap of skipped changed lines, the pending removed records right
//! before it are rewritten in place as changes paired with the gap, and
//! whatever is left of the gap becomes added lines. The end of the changed
//! document counts as one last match, so lines rewritten at the very end are
//! changes too.

use crate::equality::lines_equal;
use crate::types::{DiffRecord, LineChange};

/// Align `changed` against `base`.
///
/// Records that carry a base index appear once per base line, in base
/// order. Added records sit right before the base line they precede, or at
/// the end.
pub fn compute_diff<S: AsRef<str>>(base: &[S], changed: &[S]) -> Vec<DiffRecord> {
    let mut records = Vec::with_capacity(base.len() + changed.len());
    let mut cursor = 0;

    for (base_index, base_line) in base.iter().enumerate() {
        let base_line = base_line.as_ref();
        let found = changed[cursor..]
            .iter()
            .position(|line| lines_equal(line.as_ref(), base_line))
            .map(|offset| cursor + offset);

        let Some(matched) = found else {
            records.push(DiffRecord::removed(base_index));
            continue;
        };

        if matched > cursor {
            cursor = pair_pending_removals(&mut records, cursor, matched);
            records.extend((cursor..matched).map(DiffRecord::added));
        }

        records.push(DiffRecord::unchanged(base_index, matched));
        cursor = matched + 1;
    }

    let end = changed.len();
    if end > cursor {
        cursor = pair_pending_removals(&mut records, cursor, end);
    }
    records.extend((cursor..end).map(DiffRecord::added));
    records
}

/// Rewrite the trailing run of removed records as changes onto the gap
/// `cursor..gap_end`. Returns the first gap line left unpaired.
///
/// The run starts after the last record that already points into the
/// changed document. If it is longer than the gap, only its oldest records
/// are paired and the rest stay removed.
fn pair_pending_removals(records: &mut [DiffRecord], cursor: usize, gap_end: usize) -> usize {
    let pending = records
        .iter()
        .rposition(|record| record.changed_index.is_some())
        .map_or(0, |last| last + 1);

    let mut next = cursor;
    for record in records[pending..].iter_mut().take(gap_end - cursor) {
        debug_assert_eq!(record.change, LineChange::Removed);
        record.changed_index = Some(next);
        record.change = LineChange::Changed;
        next += 1;
    }
    next
}
