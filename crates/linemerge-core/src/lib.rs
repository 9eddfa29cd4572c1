pub mod config;
pub mod document;
pub mod job;
pub mod logging;

pub use config::Settings;
pub use document::{read_lines, split_lines, write_lines};
pub use job::{run_diff, run_merge, MergeJob, MergeSummary};
