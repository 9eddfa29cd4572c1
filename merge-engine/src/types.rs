//! Core types for the merge engine.
//!
//! A merge runs in two stages. The diff stage aligns a changed document
//! against the base and yields one [`DiffRecord`] per alignment step. The
//! merge stage walks two such diffs side by side and yields one
//! [`MergeRecord`] per output line.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How a line moved between the base and a changed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineChange {
    /// The base line is present in the changed document.
    Unchanged,
    /// A line only the changed document has.
    Added,
    /// The base line has no counterpart in the changed document.
    Removed,
    /// The base line was replaced by a line of the changed document.
    Changed,
}

impl LineChange {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineChange::Unchanged => "unchanged",
            LineChange::Added => "added",
            LineChange::Removed => "removed",
            LineChange::Changed => "changed",
        }
    }
}

impl fmt::Display for LineChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One alignment step between a base line and a changed line.
///
/// Added records never carry a base index. Removed records never carry a
/// changed index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffRecord {
    pub base_index: Option<usize>,
    pub changed_index: Option<usize>,
    pub change: LineChange,
}

impl DiffRecord {
    pub fn unchanged(base_index: usize, changed_index: usize) -> Self {
        Self {
            base_index: Some(base_index),
            changed_index: Some(changed_index),
            change: LineChange::Unchanged,
        }
    }

    pub fn added(changed_index: usize) -> Self {
        Self {
            base_index: None,
            changed_index: Some(changed_index),
            change: LineChange::Added,
        }
    }

    pub fn removed(base_index: usize) -> Self {
        Self {
            base_index: Some(base_index),
            changed_index: None,
            change: LineChange::Removed,
        }
    }

    pub fn changed(base_index: usize, changed_index: usize) -> Self {
        Self {
            base_index: Some(base_index),
            changed_index: Some(changed_index),
            change: LineChange::Changed,
        }
    }

    /// Whether this record stands for a line of the base document.
    pub fn is_base_anchored(&self) -> bool {
        self.base_index.is_some()
    }
}

impl fmt::Display for DiffRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            OptIndex(self.base_index),
            OptIndex(self.changed_index),
            self.change
        )
    }
}

/// Formats an optional index, `-` standing for "no line".
pub(crate) struct OptIndex(pub Option<usize>);

impl fmt::Display for OptIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(index) => write!(f, "{index}"),
            None => f.write_str("-"),
        }
    }
}

/// Record counts of a single diff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    pub unchanged: usize,
    pub added: usize,
    pub removed: usize,
    pub changed: usize,
}

impl DiffSummary {
    pub fn from_records(records: &[DiffRecord]) -> Self {
        records.iter().fold(Self::default(), |mut summary, record| {
            match record.change {
                LineChange::Unchanged => summary.unchanged += 1,
                LineChange::Added => summary.added += 1,
                LineChange::Removed => summary.removed += 1,
                LineChange::Changed => summary.changed += 1,
            }
            summary
        })
    }
}

/// Which input document contributes an output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeSource {
    First,
    Second,
    Conflict,
}

impl MergeSource {
    /// Single-letter tag used by the diagnostic renderer.
    pub fn tag(&self) -> char {
        match self {
            MergeSource::First => 'f',
            MergeSource::Second => 's',
            MergeSource::Conflict => 'c',
        }
    }
}

impl fmt::Display for MergeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeSource::First => write!(f, "first"),
            MergeSource::Second => write!(f, "second"),
            MergeSource::Conflict => write!(f, "conflict"),
        }
    }
}

/// One line of the merged document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeRecord {
    /// Take the line at this index of the first document.
    First(usize),
    /// Take the line at this index of the second document.
    Second(usize),
    /// Both sides touched the same base line incompatibly. Either side may
    /// have removed it, in which case its index is `None`.
    Conflict {
        first: Option<usize>,
        second: Option<usize>,
    },
}

impl MergeRecord {
    pub fn source(&self) -> MergeSource {
        match self {
            MergeRecord::First(_) => MergeSource::First,
            MergeRecord::Second(_) => MergeSource::Second,
            MergeRecord::Conflict { .. } => MergeSource::Conflict,
        }
    }

    /// Index into the source document. For conflicts this is the second
    /// side's line and only advisory.
    pub fn line_index(&self) -> Option<usize> {
        match self {
            MergeRecord::First(index) | MergeRecord::Second(index) => Some(*index),
            MergeRecord::Conflict { second, .. } => *second,
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, MergeRecord::Conflict { .. })
    }
}

impl fmt::Display for MergeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", OptIndex(self.line_index()), self.source())
    }
}

/// Errors raised by the merge engine. Every variant is a caller error: the
/// algorithms are total over well-formed input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MergeError {
    #[error("window {start}+{len} out of range for {available} lines")]
    WindowOutOfRange {
        start: usize,
        len: usize,
        available: usize,
    },

    #[error(
        "diffs do not share a base: first has {first} base lines, second has {second}"
    )]
    MisalignedDiffs { first: usize, second: usize },

    #[error("{change} record for base line {base_index:?} has no changed line")]
    MissingChangedLine {
        change: LineChange,
        base_index: Option<usize>,
    },

    #[error("{side} line {index} out of range ({len} lines)")]
    LineOutOfRange {
        side: MergeSource,
        index: usize,
        len: usize,
    },
}
