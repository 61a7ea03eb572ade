use std::io;
use std::path::PathBuf;

use crate::calendar::MonthKey;

pub type Result<T> = std::result::Result<T, AttendanceError>;

/// Errors surfaced by the attendance store and its helpers.
#[derive(Debug, thiserror::Error)]
pub enum AttendanceError {
    #[error("attendance store at {path:?} is unavailable: {source}")]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read attendance store {path:?}: {source}")]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write attendance store {path:?}: {source}")]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to delete attendance for {month}: {source}")]
    DeleteFailure {
        month: MonthKey,
        #[source]
        source: io::Error,
    },
    #[error("invalid month '{0}', expected YYYY-MM")]
    InvalidMonth(String),
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("year {0} is outside 0000-9999")]
    InvalidYear(i32),
    #[error("invalid config file {path:?}: {source}")]
    InvalidConfig {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("could not determine home directory")]
    NoHomeDir,
    #[error("failed to render report: {0}")]
    Render(String),
}
