//! tracing subscriber setup for the `ragctx` binary.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{
    filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer, Registry,
};

use crate::env::logging as env_vars;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Where log events go and how they are rendered
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: Level,
    /// Human-facing events on stderr
    pub stderr: bool,
    /// Also append every event to this file
    pub file: Option<PathBuf>,
    /// One JSON object per event
    pub json: bool,
    pub ansi: bool,
}

impl LoggingConfig {
    /// Read `RAGCTX_LOG_LEVEL`, `RAGCTX_LOG_FILE`, `RAGCTX_LOG_FORMAT` and `NO_COLOR`
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        Self {
            level: var(env_vars::LOG_LEVEL)
                .map(|v| parse_level(&v))
                .unwrap_or(Level::INFO),
            stderr: true,
            file: var(env_vars::LOG_FILE).map(PathBuf::from),
            json: var(env_vars::LOG_FORMAT).is_some_and(|v| v.eq_ignore_ascii_case("json")),
            ansi: var(env_vars::NO_COLOR).is_none(),
        }
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }
}

/// Accepts level names in any case; anything else means `INFO`.
fn parse_level(value: &str) -> Level {
    value.trim().parse().unwrap_or(Level::INFO)
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer when dropped and must outlive
/// every event the program emits.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = LevelFilter::from_level(config.level);
    let mut layers: Vec<BoxedLayer> = Vec::new();

    if config.stderr {
        layers.push(event_layer(std::io::stderr, config.json, config.ansi, filter));
    }

    let guard = match &config.file {
        Some(path) => {
            let (writer, guard) = file_writer(path)?;
            layers.push(event_layer(writer, config.json, false, filter));
            Some(guard)
        }
        None => None,
    };

    Registry::default()
        .with(layers)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::debug!(level = %config.level, file = ?config.file, json = config.json, "Logging ready");
    Ok(guard)
}

fn event_layer<W>(writer: W, json: bool, ansi: bool, filter: LevelFilter) -> BoxedLayer
where
    W: for<'w> fmt::MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = fmt::layer().with_writer(writer).with_ansi(ansi);
    if json {
        layer.json().with_filter(filter).boxed()
    } else {
        layer.with_filter(filter).boxed()
    }
}

fn file_writer(path: &Path) -> Result<(NonBlocking, WorkerGuard)> {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path.file_name().context("Log file path has no file name")?;
    std::fs::create_dir_all(directory)
        .with_context(|| format!("Failed to create log directory: {}", directory.display()))?;

    Ok(tracing_appender::non_blocking(
        tracing_appender::rolling::never(directory, file_name),
    ))
}

/// Record a failed operation with its error category
pub fn log_error<E: std::fmt::Display>(error: &E, category: &str) {
    tracing::error!(error = %error, category, "Operation failed");
}
