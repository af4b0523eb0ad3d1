use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, Once};

use crate::config::config_dir;

static TRACING_INIT: Once = Once::new();

/// Default log location, next to the config file
pub fn log_file_path() -> Option<PathBuf> {
    config_dir().ok().map(|dir| dir.join("persona-chat.log"))
}

/// Install the global tracing subscriber, writing to `log_path`.
///
/// The terminal belongs to the UI, so output goes to a file. `RUST_LOG`
/// controls the level and defaults to `info`. If the file can't be opened
/// logging stays off. Only the first call has any effect.
pub fn init_tracing(log_path: &Path) {
    TRACING_INIT.call_once(|| {
        if let Some(parent) = log_path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        let file = match OpenOptions::new().create(true).append(true).open(log_path) {
            Ok(file) => file,
            Err(_) => return,
        };

        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt()
            .with_writer(Mutex::new(file))
            .with_target(false)
            .with_ansi(false)
            .with_env_filter(filter)
            .try_init();
    });
}
