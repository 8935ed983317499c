// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackingError {
    #[error("I/O error: {source} (path: {path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("issue has an empty rule key (repository: {repository:?}, rule: {rule:?})")]
    MissingRuleKey { repository: String, rule: String },
}

pub type Result<T> = std::result::Result<T, TrackingError>;

// Allow `?` on std::io::Error by converting to TrackingError::Io with unknown path.
impl From<std::io::Error> for TrackingError {
    fn from(source: std::io::Error) -> Self {
        TrackingError::Io {
            source,
            path: PathBuf::from("<unknown>"),
        }
    }
}
