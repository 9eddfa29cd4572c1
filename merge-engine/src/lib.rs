//! # merge-engine
//!
//! Three-way merge of line-oriented text. Given a common ancestor and two
//! independently edited copies, produces one document with the edits of
//! both and marks the lines where they clash.
//!
//! ## Approach
//!
//! 1. **Diff**: each copy is aligned against the ancestor with a greedy
//!    forward scan. Lines compare equal after trimming whitespace. Base lines
//!    without a match are removed, or changed when a later match leaves a
//!    gap of new lines to pair them with.
//!
//! 2. **Merge**: the two diffs are walked one base line at a time. A change
//!    on one side beats no change on the other, equal changes agree, and
//!    anything else touching the same base line is a conflict. Lines both
//!    sides added at the same spot are emitted once when one block contains
//!    the other.
//!
//! 3. **Render**: the merge plan is mapped back to text, with conflicts
//!    written as a placeholder line or as a git-style marker block.
//!
//! ## Example
//!
//! ```rust
//! use merge_engine::Merger;
//!
//! let merger = Merger::default();
//! let output = merger
//!     .merge_text("A\nB\nC\n", "A\nX\nC\n", "A\nB\nC\nD\n")
//!     .unwrap();
//!
//! assert!(!output.has_conflicts());
//! assert_eq!(output.to_text(), "A\nX\nC\nD\n");
//! ```

pub mod diff;
pub mod equality;
pub mod merge;
pub mod merger;
pub mod render;
pub mod types;

// Re-export primary public API
pub use diff::compute_diff;
pub use equality::{is_line_subset_of, is_subset_of, lines_equal, Window};
pub use merge::compute_merge;
pub use merger::{split_text, MergeOutput, Merger, MergerConfig};
pub use render::{render_merge, ConflictStyle, RenderOptions, DEFAULT_PLACEHOLDER};
pub use types::{
    DiffRecord, DiffSummary, LineChange, MergeError, MergeRecord, MergeSource,
};
