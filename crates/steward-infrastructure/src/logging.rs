//! Tracing subscriber setup.

use steward_core::config::LoggingSettings;
use steward_core::error::{Result, StewardError};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::{Identity, Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, fmt};

const LOG_FILE_PREFIX: &str = "steward.log";

/// Keeps the background log writer alive. Drop it only at shutdown.
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard {
    _file_writer: Option<WorkerGuard>,
}

/// Installs the global subscriber described by `settings`.
///
/// # Errors
///
/// Returns a `Config` error if the level directive is invalid or a global
/// subscriber is already installed.
pub fn init_logging(settings: &LoggingSettings) -> Result<LoggingGuard> {
    init_logging_with(settings, Identity::new())
}

/// Like [`init_logging`], with an extra layer (e.g. an operation event
/// forwarder) installed underneath the filter.
pub fn init_logging_with<L>(settings: &LoggingSettings, extra: L) -> Result<LoggingGuard>
where
    L: Layer<Registry> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_new(&settings.level).map_err(|e| {
        StewardError::config(format!("Invalid log level '{}': {}", settings.level, e))
    })?;

    let (plain, json) = if settings.json {
        (None, Some(fmt::layer().json().with_writer(std::io::stderr)))
    } else {
        (Some(fmt::layer().with_writer(std::io::stderr)), None)
    };

    let (file, file_writer) = match &settings.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(extra)
        .with(filter)
        .with(plain)
        .with(json)
        .with(file)
        .try_init()
        .map_err(|e| StewardError::config(format!("Failed to install subscriber: {}", e)))?;

    tracing::info!("[Logging] Initialized with level '{}'", settings.level);
    Ok(LoggingGuard {
        _file_writer: file_writer,
    })
}
