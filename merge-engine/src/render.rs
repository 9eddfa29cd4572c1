//! Turning a merge plan back into text lines.

use serde::{Deserialize, Serialize};

use crate::merge::line;
use crate::types::{MergeError, MergeRecord, MergeSource, OptIndex};

pub const DEFAULT_PLACEHOLDER: &str = "*Conflict*";

/// Width of the diagnostic prefix column.
const PREFIX_WIDTH: usize = 5;

/// How conflicting base lines are written out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictStyle {
    /// One placeholder line per conflicting base line. Neither side's text
    /// is kept.
    #[default]
    Placeholder,
    /// Consecutive conflicts are grouped into a git-style block showing the
    /// first side's lines, then the second side's.
    Markers,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Prefix each line with its source tag and line index.
    pub diagnostic: bool,
    pub conflict_style: ConflictStyle,
    pub placeholder: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            diagnostic: false,
            conflict_style: ConflictStyle::Placeholder,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }
}

/// Resolve every record to its text.
pub fn render_merge<S: AsRef<str>>(
    records: &[MergeRecord],
    first: &[S],
    second: &[S],
    options: &RenderOptions,
) -> Result<Vec<String>, MergeError> {
    let mut out = Vec::with_capacity(records.len());
    let mut emit = |source: MergeSource, index: Option<usize>, text: &str| {
        if options.diagnostic {
            let prefix = format!("{} {}", source.tag(), OptIndex(index));
            out.push(format!("{prefix:<PREFIX_WIDTH$}{text}"));
        } else {
            out.push(text.to_string());
        }
    };

    let mut at = 0;
    while let Some(record) = records.get(at) {
        match *record {
            MergeRecord::First(index) => {
                emit(MergeSource::First, Some(index), line(first, index, MergeSource::First)?);
            }
            MergeRecord::Second(index) => {
                emit(MergeSource::Second, Some(index), line(second, index, MergeSource::Second)?);
            }
            MergeRecord::Conflict { second: index, .. } => {
                if options.conflict_style == ConflictStyle::Placeholder {
                    emit(MergeSource::Conflict, index, &options.placeholder);
                } else {
                    let run = records[at..]
                        .iter()
                        .take_while(|r| r.is_conflict())
                        .count();
                    let conflicts = &records[at..at + run];

                    emit(MergeSource::Conflict, None, "<<<<<<< first");
                    for conflict in conflicts {
                        if let MergeRecord::Conflict { first: Some(i), .. } = *conflict {
                            emit(MergeSource::First, Some(i), line(first, i, MergeSource::First)?);
                        }
                    }
                    emit(MergeSource::Conflict, None, "=======");
                    for conflict in conflicts {
                        if let MergeRecord::Conflict { second: Some(i), .. } = *conflict {
                            emit(MergeSource::Second, Some(i), line(second, i, MergeSource::Second)?);
                        }
                    }
                    emit(MergeSource::Conflict, None, ">>>>>>> second");

                    at += run;
                    continue;
                }
            }
        }
        at += 1;
    }

    Ok(out)
}
