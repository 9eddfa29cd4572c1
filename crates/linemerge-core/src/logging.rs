use crate::config::LoggingSettings;
use tracing_appender::rolling;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize logging to stderr and, when a log directory is configured, to
/// `linemerge.log` inside it. Stdout is left for the merged document.
///
/// Returns a guard that must be held for the lifetime of the application
/// to ensure file log messages are flushed.
pub fn init_logging(
    settings: &LoggingSettings,
) -> anyhow::Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let (file_layer, guard) = match &settings.dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let file_appender = rolling::never(dir, "linemerge.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.level)),
        )
        .with(file_layer)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()?;

    Ok(guard)
}
