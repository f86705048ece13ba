// Logger initialization
// The TUI owns stdout, so everything goes to a file under the log directory.

use crate::config::LoggingConfig;
use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_FILE_NAME: &str = "gemini-chat.log";

/// Install the global subscriber. Keep the returned guard alive until exit
/// or buffered lines are lost.
pub fn init_logger(config: &LoggingConfig) -> anyhow::Result<WorkerGuard> {
    std::fs::create_dir_all(&config.dir)
        .with_context(|| format!("Failed to create log directory {}", config.dir.display()))?;

    let file_appender = rolling::never(&config.dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_new(&config.filter)
        .with_context(|| format!("Invalid log filter '{}'", config.filter))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true),
        )
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::debug!(
        path = %config.dir.join(LOG_FILE_NAME).display(),
        "Tracing initialized with file output"
    );

    Ok(guard)
}
