//! Tracing setup for the CLI.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "koyomi_cli=info,koyomi_timeline=info,warn";
const LOG_FILE: &str = "koyomi.log";

/// Install the global subscriber: stderr always, plus a file under
/// `KOYOMI_LOG_DIR` when set.
///
/// Keep the returned guard alive for the life of the process or buffered file
/// output is lost.
pub fn init() -> Option<WorkerGuard> {
    let log_dir = std::env::var("KOYOMI_LOG_DIR").ok();

    let (file_layer, guard) = match &log_dir {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::never(dir, LOG_FILE);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            (
                Some(fmt::layer().with_writer(non_blocking).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(file_layer)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Some(dir) = log_dir {
        tracing::debug!("logging to {}/{}", dir, LOG_FILE);
    }
    guard
}
