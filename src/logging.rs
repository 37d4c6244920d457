//! Log setup
//!
//! The terminal belongs to the UI, so logs go to a file. `RUST_LOG` overrides
//! the default filter.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset or invalid
pub const DEFAULT_FILTER: &str = "tvdeck=info";

/// File name used inside the cache directory
pub const LOG_FILE_NAME: &str = "tvdeck.log";

/// Default log location inside `dir`
pub fn default_log_path(dir: &Path) -> PathBuf {
    dir.join(LOG_FILE_NAME)
}

/// Installs the global subscriber writing to `path` (appending)
///
/// A second call is a no-op, so tests may call it freely.
pub fn init(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_FILTER.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .try_init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_log_path() {
        let path = default_log_path(Path::new("/tmp/tvdeck"));
        assert_eq!(path, PathBuf::from("/tmp/tvdeck/tvdeck.log"));
    }

    #[test]
    fn test_init_creates_log_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("tvdeck.log");

        init(&path).unwrap();
        init(&path).unwrap();

        assert!(path.exists());
    }
}
