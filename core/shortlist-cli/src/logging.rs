//! Tracing setup for the `shortlist` binary.
//!
//! Human-readable events go to stderr so stdout stays clean for command
//! output. The same events are appended to a daily file under
//! `~/.shortlist/logs`. Losing the file sink is not fatal; stderr logging
//! still comes up.

use std::env;

use shortlist_core::StorageConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

pub const DEBUG_LOG_ENV: &str = "SHORTLIST_DEBUG_LOG";
const LOG_FILE_PREFIX: &str = "shortlist.log";

/// Installs the global subscriber. Hold the returned guard until exit so
/// buffered file writes are flushed.
pub fn init(storage: &StorageConfig) -> Option<WorkerGuard> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let logs_dir = storage.logs_dir();
    let (file_layer, guard) = match fs_err::create_dir_all(&logs_dir) {
        Ok(()) => {
            let appender = tracing_appender::rolling::daily(&logs_dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        Err(err) => {
            eprintln!("shortlist: file logging disabled: {}", err);
            (None, None)
        }
    };

    let result = tracing_subscriber::registry()
        .with(filter())
        .with(stderr_layer)
        .with(file_layer)
        .try_init();
    if let Err(err) = result {
        eprintln!("shortlist: logging already initialized: {}", err);
    }

    guard
}

fn filter() -> EnvFilter {
    if debug_enabled() {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

fn debug_enabled() -> bool {
    env::var(DEBUG_LOG_ENV)
        .map(|value| matches!(value.as_str(), "1" | "true" | "TRUE" | "yes" | "YES"))
        .unwrap_or(false)
}
