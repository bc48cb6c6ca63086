// Diagnostic Log Sink
// Append-only, timestamped trace of every key parameter

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::Dispatch;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

/// Errors that can occur while opening or closing the sink
#[derive(Debug, Error)]
pub enum LogSinkError {
    #[error("cannot open log file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid log filter {filter:?}: {source}")]
    Filter {
        filter: String,
        #[source]
        source: ParseError,
    },

    #[error("failed to flush log file: {0}")]
    Flush(#[from] io::Error),
}

/// Result type for sink operations
pub type LogSinkResult<T> = Result<T, LogSinkError>;

/// A tracing subscriber writing to a file, held as a [`Dispatch`] rather
/// than installed process-wide. Code runs against it through
/// [`LogSink::in_scope`]; [`LogSink::close`] ends its lifecycle.
#[derive(Clone)]
pub struct LogSink {
    dispatch: Dispatch,
    file: Option<Arc<File>>,
}

impl LogSink {
    /// Open `path` for appending (creating it if needed) and build a
    /// subscriber filtered by the `filter` directive, e.g. "debug"
    pub fn open(path: &Path, filter: &str) -> LogSinkResult<Self> {
        let env_filter = EnvFilter::try_new(filter).map_err(|source| LogSinkError::Filter {
            filter: filter.to_string(),
            source,
        })?;

        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(path)
            .map_err(|source| LogSinkError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        let file = Arc::new(file);

        let subscriber = tracing_subscriber::fmt()
            .with_writer(Arc::clone(&file))
            .with_ansi(false)
            .with_target(false)
            .with_env_filter(env_filter)
            .finish();

        Ok(Self {
            dispatch: Dispatch::new(subscriber),
            file: Some(file),
        })
    }

    /// A sink that drops every event
    pub fn disabled() -> Self {
        Self {
            dispatch: Dispatch::none(),
            file: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.file.is_some()
    }

    /// Run `f` with this sink as the current thread's default subscriber
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    /// Flush the file to disk
    pub fn close(self) -> LogSinkResult<()> {
        if let Some(file) = self.file {
            file.sync_all()?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for LogSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogSink")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_writes_timestamped_events() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.log");

        let sink = LogSink::open(&path, "debug").unwrap();
        sink.in_scope(|| {
            tracing::debug!("n: {}", 3233);
            tracing::warn!("m must be between 1 and n");
        });
        sink.close().unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("DEBUG"));
        assert!(contents.contains("n: 3233"));
        assert!(contents.contains("WARN"));
        assert!(contents.contains("m must be between 1 and n"));
    }

    #[test]
    fn test_appends_across_sessions() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.log");

        for run in 0..2 {
            let sink = LogSink::open(&path, "info").unwrap();
            sink.in_scope(|| tracing::info!("run {}", run));
            sink.close().unwrap();
        }

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("run 0"));
        assert!(contents.contains("run 1"));
    }

    #[test]
    fn test_filter_drops_lower_levels() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.log");

        let sink = LogSink::open(&path, "warn").unwrap();
        sink.in_scope(|| {
            tracing::debug!("hidden detail");
            tracing::warn!("visible warning");
        });
        sink.close().unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(!contents.contains("hidden detail"));
        assert!(contents.contains("visible warning"));
    }

    #[test]
    fn test_bad_filter() {
        let dir = tempdir().unwrap();
        let result = LogSink::open(&dir.path().join("x.log"), "textbook_rsa=loudest");
        assert!(matches!(result, Err(LogSinkError::Filter { .. })));
    }

    #[test]
    fn test_disabled_sink() {
        let sink = LogSink::disabled();
        assert!(!sink.is_enabled());
        assert_eq!(sink.in_scope(|| 7), 7);
        sink.close().unwrap();
    }
}
