use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::CoreConfig;

/// Install the global subscriber: stderr output filtered by `RUST_LOG`
/// (default `info`), plus a DEBUG file layer when the config names a log file.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing(config: &CoreConfig) {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));

    let registry = tracing_subscriber::registry().with(stderr_layer);

    match config.log_file.as_deref().and_then(open_log_file) {
        Some(file) => {
            let file_layer = fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_filter(tracing_subscriber::filter::LevelFilter::DEBUG);

            if registry.with(file_layer).try_init().is_ok() {
                tracing::debug!("file logging enabled");
            }
        }
        None => {
            let _ = registry.try_init();
        }
    }
}

fn open_log_file(path: &Path) -> Option<std::fs::File> {
    match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => Some(file),
        Err(e) => {
            eprintln!("Failed to open log file {}: {}", path.display(), e);
            None
        }
    }
}
