use clap::{Parser, Subcommand};
use linemerge_core::config::Settings;
use linemerge_core::job::{run_diff, run_merge, MergeJob};
use linemerge_core::logging::init_logging;
use merge_engine::ConflictStyle;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "linemerge",
    about = "Three-way merge of line-oriented text files"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the settings file
    #[arg(long, global = true, default_value = "linemerge.json")]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge two edited copies of a common base
    Merge {
        /// Common ancestor
        #[arg(short, long)]
        base: PathBuf,
        /// First edited copy
        #[arg(short, long)]
        first: PathBuf,
        /// Second edited copy
        #[arg(short, long)]
        second: PathBuf,
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        result: Option<PathBuf>,
        /// Prefix each line with its source and line index
        #[arg(long)]
        debug: bool,
        /// Show both sides of a conflict between markers
        #[arg(long)]
        markers: bool,
        /// Text written in place of a conflicting line
        #[arg(long)]
        placeholder: Option<String>,
        /// Compute both diffs on the current thread
        #[arg(long)]
        sequential: bool,
    },
    /// Show how a changed file aligns against its base
    Diff {
        #[arg(long)]
        base: PathBuf,
        #[arg(long)]
        changed: PathBuf,
        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write the default settings file
    InitConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Merge {
            base,
            first,
            second,
            result,
            debug,
            markers,
            placeholder,
            sequential,
        } => {
            let mut settings = Settings::load_or_default(&cli.config)?;
            settings.merge.diagnostic |= *debug;
            if *markers {
                settings.merge.conflict_style = ConflictStyle::Markers;
            }
            if let Some(text) = placeholder {
                settings.merge.conflict_placeholder = text.clone();
            }
            if *sequential {
                settings.merge.parallel_diff = false;
            }
            let job = MergeJob {
                base: base.clone(),
                first: first.clone(),
                second: second.clone(),
                result: result.clone(),
            };
            cmd_merge(&job, &settings).await
        }
        Commands::Diff {
            base,
            changed,
            json,
        } => cmd_diff(&cli, base.clone(), changed.clone(), *json).await,
        Commands::InitConfig => cmd_init_config(&cli),
    }
}

async fn cmd_merge(job: &MergeJob, settings: &Settings) -> anyhow::Result<()> {
    let _guard = init_logging(&settings.logging)?;

    let summary = run_merge(job, settings).await?;
    if summary.conflicts > 0 {
        eprintln!("{} conflicting line(s)", summary.conflicts);
    }
    if let Some(path) = &job.result {
        eprintln!("Merged {} line(s) into {}", summary.lines, path.display());
    }
    Ok(())
}

async fn cmd_diff(cli: &Cli, base: PathBuf, changed: PathBuf, json: bool) -> anyhow::Result<()> {
    let settings = Settings::load_or_default(&cli.config)?;
    let _guard = init_logging(&settings.logging)?;

    let records = run_diff(base, changed).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        for record in &records {
            println!("{record}");
        }
    }
    Ok(())
}

fn cmd_init_config(cli: &Cli) -> anyhow::Result<()> {
    if cli.config.exists() {
        eprintln!("{} already exists, leaving it untouched.", cli.config.display());
        return Ok(());
    }
    Settings::default().save(&cli.config)?;
    println!("Configuration saved to {}", cli.config.display());
    Ok(())
}
