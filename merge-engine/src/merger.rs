//! End-to-end merge pipeline.
//!
//! Runs the two base diffs (in parallel when configured), merges them and
//! renders the result:
//!
//! 1. **Diff** base against each side
//! 2. **Merge** the two diffs into an output plan
//! 3. **Render** the plan into text lines

use std::thread;

use tracing::debug;

use crate::diff::compute_diff;
use crate::merge::compute_merge;
use crate::render::{render_merge, RenderOptions};
use crate::types::{DiffRecord, DiffSummary, MergeError, MergeRecord};

const BOM: char = '\u{feff}';

/// Split text into lines. Handles `\n` and `\r\n`, drops a leading byte
/// order mark, and does not yield an empty line for a final newline.
pub fn split_text(text: &str) -> Vec<&str> {
    text.strip_prefix(BOM).unwrap_or(text).lines().collect()
}

/// Configuration for the merge pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergerConfig {
    /// Compute the two diffs on separate threads.
    pub parallel_diff: bool,
    pub render: RenderOptions,
}

impl Default for MergerConfig {
    fn default() -> Self {
        Self {
            parallel_diff: true,
            render: RenderOptions::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Merger {
    config: MergerConfig,
}

/// Result of a full merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutput {
    /// The output plan, one record per merged line.
    pub records: Vec<MergeRecord>,
    /// Rendered lines. With marker-style conflicts this can be longer than
    /// `records`.
    pub lines: Vec<String>,
    /// Number of conflicting base lines.
    pub conflicts: usize,
}

impl MergeOutput {
    pub fn has_conflicts(&self) -> bool {
        self.conflicts > 0
    }

    /// The merged document, every line newline-terminated.
    pub fn to_text(&self) -> String {
        self.lines.iter().fold(String::new(), |mut text, line| {
            text.push_str(line);
            text.push('\n');
            text
        })
    }
}

impl Merger {
    pub fn new(config: MergerConfig) -> Self {
        Self { config }
    }

    /// Merge three documents given as text.
    pub fn merge_text(&self, base: &str, first: &str, second: &str) -> Result<MergeOutput, MergeError> {
        self.merge_lines(&split_text(base), &split_text(first), &split_text(second))
    }

    /// Merge three documents already split into lines.
    pub fn merge_lines<S>(&self, base: &[S], first: &[S], second: &[S]) -> Result<MergeOutput, MergeError>
    where
        S: AsRef<str> + Sync,
    {
        let (diff_first, diff_second) = self.diff_both(base, first, second);
        debug!(
            base = base.len(),
            first = ?DiffSummary::from_records(&diff_first),
            second = ?DiffSummary::from_records(&diff_second),
            "diffs computed"
        );

        let records = compute_merge(&diff_first, first, &diff_second, second)?;
        let conflicts = records.iter().filter(|r| r.is_conflict()).count();
        let lines = render_merge(&records, first, second, &self.config.render)?;
        debug!(lines = lines.len(), conflicts, "merge rendered");

        Ok(MergeOutput {
            records,
            lines,
            conflicts,
        })
    }

    fn diff_both<S>(&self, base: &[S], first: &[S], second: &[S]) -> (Vec<DiffRecord>, Vec<DiffRecord>)
    where
        S: AsRef<str> + Sync,
    {
        if !self.config.parallel_diff {
            return (compute_diff(base, first), compute_diff(base, second));
        }

        thread::scope(|scope| {
            let first_task = scope.spawn(|| compute_diff(base, first));
            let diff_second = compute_diff(base, second);
            let diff_first = first_task
                .join()
                .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
            (diff_first, diff_second)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{ConflictStyle, DEFAULT_PLACEHOLDER};

    #[test]
    fn test_clean_merge() {
        let merger = Merger::default();
        let output = merger
            .merge_text("line1\nline2\nline3\n", "lineA\nline2\nline3\n", "line1\nline2\nlineC\n")
            .unwrap();
        assert!(!output.has_conflicts());
        assert_eq!(output.to_text(), "lineA\nline2\nlineC\n");
    }

    #[test]
    fn test_conflict_is_counted() {
        let merger = Merger::default();
        let output = merger.merge_text("A\nB\n", "A\nB1\n", "A\nB2\n").unwrap();
        assert_eq!(output.conflicts, 1);
        assert_eq!(output.lines, vec!["A", DEFAULT_PLACEHOLDER]);
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let base = ["a", "b", "c", "d", "e"];
        let first = ["a", "x", "c", "new", "e"];
        let second = ["a", "b", "y", "d", "e", "tail"];

        let parallel = Merger::default().merge_lines(&base, &first, &second).unwrap();
        let sequential = Merger::new(MergerConfig {
            parallel_diff: false,
            ..Default::default()
        })
        .merge_lines(&base, &first, &second)
        .unwrap();
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_marker_style_keeps_both_sides() {
        let merger = Merger::new(MergerConfig {
            render: RenderOptions {
                conflict_style: ConflictStyle::Markers,
                ..Default::default()
            },
            ..Default::default()
        });
        let output = merger.merge_text("A\nB\n", "A\nB1\n", "A\nB2\n").unwrap();
        assert_eq!(
            output.lines,
            vec!["A", "<<<<<<< first", "B1", "=======", "B2", ">>>>>>> second"]
        );
        assert_eq!(output.records.len(), 2);
    }

    #[test]
    fn test_byte_order_mark_is_not_content() {
        let output = Merger::default()
            .merge_text("\u{feff}A\nB\n", "A\nB\nC\n", "\u{feff}A\r\nX\r\n")
            .unwrap();
        assert!(!output.has_conflicts());
        assert_eq!(output.to_text(), "A\nX\nC\n");
    }

    #[test]
    fn test_empty_documents() {
        let output = Merger::default().merge_text("", "", "").unwrap();
        assert!(output.lines.is_empty());
        assert_eq!(output.to_text(), "");
    }
}
