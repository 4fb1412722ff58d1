//! Tracing subscriber setup

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

use crate::config::LoggingConfig;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

const LOG_FILE_PREFIX: &str = "bookstore-server.log";

/// `RUST_LOG` when set, otherwise the configured level for this crate
fn build_env_filter(level: &str) -> anyhow::Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let directives = format!("bookstore_server={},tower_http=debug", level);
    EnvFilter::try_new(&directives)
        .with_context(|| format!("Invalid tracing filter '{}'", directives))
}

fn is_json(format: &str) -> bool {
    matches!(format.to_lowercase().as_str(), "json" | "jsonl")
}

/// Install the global subscriber.
///
/// The returned guard flushes the file sink on drop and must be held for the
/// lifetime of the process.
pub fn init(config: &LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let json = is_json(&config.format);
    let mut layers: Vec<BoxedLayer> = Vec::new();

    let console = if json {
        fmt::layer().json().with_target(true).boxed()
    } else {
        fmt::layer().pretty().with_target(true).boxed()
    };
    layers.push(console);

    let guard = match config.directory.as_deref() {
        Some(directory) => {
            std::fs::create_dir_all(directory)
                .with_context(|| format!("Cannot create log directory '{}'", directory))?;

            let appender = tracing_appender::rolling::daily(directory, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            let file = if json {
                fmt::layer().json().with_writer(writer).boxed()
            } else {
                fmt::layer().with_ansi(false).with_writer(writer).boxed()
            };
            layers.push(file);
            Some(guard)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(layers)
        .with(build_env_filter(&config.level)?)
        .try_init()
        .context("Tracing subscriber already installed")?;

    Ok(guard)
}
