//! File logging for the GUI; follow with `tail -f`

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to create log directory at {path:?}: {source}")]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid log file path: {0:?}")]
    InvalidPath(PathBuf),

    #[error("Tracing subscriber already initialized")]
    SubscriberAlreadySet,
}

/// Route tracing output to `log_path`, filtered by `RUST_LOG` (default "info")
pub fn init(log_path: &Path) -> Result<(), LoggingError> {
    use tracing_subscriber::EnvFilter;

    let file_name = log_path
        .file_name()
        .ok_or_else(|| LoggingError::InvalidPath(log_path.to_path_buf()))?;

    let directory = match log_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    std::fs::create_dir_all(directory).map_err(|source| LoggingError::DirectoryCreation {
        path: directory.to_path_buf(),
        source,
    })?;

    let file_appender = tracing_appender::rolling::never(directory, file_name);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(file_appender)
        .with_ansi(false)
        .try_init()
        .map_err(|_| LoggingError::SubscriberAlreadySet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_init_creates_log_directory() {
        let test_dir = std::env::temp_dir().join("pixel_finder_test_logs");
        let log_file = test_dir.join("nested").join("test.log");
        let _ = fs::remove_dir_all(&test_dir);

        // May fail with SubscriberAlreadySet if another test got there first
        let _ = init(&log_file);

        assert!(log_file.parent().unwrap().exists());
        let _ = fs::remove_dir_all(&test_dir);
    }

    #[test]
    fn test_init_rejects_path_without_file_name() {
        let err = init(Path::new("/")).unwrap_err();
        assert!(matches!(err, LoggingError::InvalidPath(_)));
    }
}
