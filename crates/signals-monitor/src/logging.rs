//! Logging setup.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Setup logging with the given level.
///
/// When `log_dir` is given, events are also written to a daily rolling file
/// there. If that directory cannot be used, logging stays console-only and a
/// warning is emitted. The returned guard must be held until the process
/// exits or buffered lines are lost.
pub fn setup_logging(level: &str, json: bool, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (appender, file_error) = match log_dir.map(daily_appender) {
        Some(Ok(appender)) => (Some(appender), None),
        Some(Err(e)) => (None, Some(e)),
        None => (None, None),
    };
    let (writer, guard) = match appender {
        Some(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(writer), Some(guard))
        }
        None => (None, None),
    };

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .with(writer.map(|w| fmt::layer().json().with_writer(w)))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().pretty())
            .with(writer.map(|w| fmt::layer().with_ansi(false).with_writer(w)))
            .init();
    }

    if let (Some(dir), Some(e)) = (log_dir, file_error) {
        tracing::warn!(
            directory = %dir.display(),
            error = %e,
            "Log directory unusable, logging to console only"
        );
    }

    guard
}

/// Daily rolling `signals.<date>.log` under `dir`, created if missing.
fn daily_appender(dir: &Path) -> Result<RollingFileAppender, InitError> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("signals")
        .filename_suffix("log")
        .build(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daily_appender_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let logs = dir.path().join("logs/daily");

        assert!(daily_appender(&logs).is_ok());
        assert!(logs.is_dir());
    }

    #[test]
    fn test_daily_appender_fails_on_unusable_directory() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "file").unwrap();

        assert!(daily_appender(&blocker.join("logs")).is_err());
    }
}
