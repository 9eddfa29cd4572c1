use crate::config::Settings;
use crate::document::{read_lines, write_lines};
use merge_engine::{compute_diff, DiffRecord, Merger};
use std::path::PathBuf;

/// The files involved in one three-way merge.
#[derive(Debug, Clone)]
pub struct MergeJob {
    pub base: PathBuf,
    pub first: PathBuf,
    pub second: PathBuf,
    /// Destination file. Stdout when unset.
    pub result: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeSummary {
    pub lines: usize,
    pub conflicts: usize,
}

/// Read the three inputs, merge them and write the result.
pub async fn run_merge(job: &MergeJob, settings: &Settings) -> anyhow::Result<MergeSummary> {
    tracing::info!(
        base = %job.base.display(),
        first = %job.first.display(),
        second = %job.second.display(),
        "Merging"
    );

    let (base, first, second) = tokio::try_join!(
        read_lines(&job.base),
        read_lines(&job.first),
        read_lines(&job.second)
    )?;

    let merger = Merger::new(settings.merge.to_merger_config());
    let output =
        tokio::task::spawn_blocking(move || merger.merge_lines(&base, &first, &second)).await??;

    write_lines(job.result.as_deref(), &output.lines).await?;

    if output.has_conflicts() {
        tracing::warn!(conflicts = output.conflicts, "Merge finished with conflicts");
    } else {
        tracing::info!(lines = output.lines.len(), "Merge finished cleanly");
    }

    Ok(MergeSummary {
        lines: output.lines.len(),
        conflicts: output.conflicts,
    })
}

/// Align one file against a base and return the raw diff records.
pub async fn run_diff(base: PathBuf, changed: PathBuf) -> anyhow::Result<Vec<DiffRecord>> {
    let (base, changed) = tokio::try_join!(read_lines(&base), read_lines(&changed))?;
    let records = tokio::task::spawn_blocking(move || compute_diff(&base, &changed)).await?;
    Ok(records)
}
