//! Process-wide logging setup, configured once per `start` invocation.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::internal::error::ConcertError;

/// Where log records go for the lifetime of the process.
#[derive(Debug, Clone)]
pub enum LogTarget {
    File(PathBuf),
    Stderr,
}

/// Install the global tracing subscriber. Records carry a timestamp,
/// severity, and target; `start` additionally enters a span holding the
/// session name so every record is attributable to its session. Calling
/// this twice is a no-op (relevant when commands run in-process in tests).
pub fn init(target: &LogTarget, level: tracing::Level) -> Result<(), ConcertError> {
    match target {
        LogTarget::File(path) => {
            let file = OpenOptions::new().append(true).create(true).open(path)?;
            let _ = tracing_subscriber::fmt()
                .with_max_level(level)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        LogTarget::Stderr => {
            let _ = tracing_subscriber::fmt()
                .with_max_level(level)
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
    Ok(())
}
