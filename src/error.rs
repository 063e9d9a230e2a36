//! Error types for pathfan.
//!
//! Configuration problems (bad patterns, bad include regex, a root that is not a
//! directory) surface when a matcher or runner is built. I/O failures carry the
//! path they happened at. Work failures carry the path whose job failed.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Ignore files can only be resolved against a directory.
    #[error("path {} not a directory", .0.display())]
    NotADirectory(PathBuf),

    /// Malformed gitignore-style pattern (from the ignore file or caller excludes).
    #[error("invalid pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: ignore::Error,
    },

    /// Malformed include-filter regex.
    #[error("invalid include pattern: {0}")]
    Include(#[from] regex::Error),

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The work function returned an error for this path.
    #[error("work failed for {}: {error:#}", path.display())]
    Work { path: PathBuf, error: anyhow::Error },

    /// The work function panicked for this path.
    #[error("work panicked for {}: {message}", path.display())]
    WorkPanicked { path: PathBuf, message: String },

    /// The executor could not be built or refused a job.
    #[error("worker pool error: {0}")]
    Pool(String),

    /// A job was accepted but dropped before it ran.
    #[error("job for {} was dropped by the executor", .0.display())]
    JobLost(PathBuf),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// Path the error is attached to, when there is one.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Error::NotADirectory(path)
            | Error::Io { path, .. }
            | Error::Work { path, .. }
            | Error::WorkPanicked { path, .. }
            | Error::JobLost(path) => Some(path),
            Error::Pattern { .. } | Error::Include(_) | Error::Pool(_) => None,
        }
    }
}

/// Result alias used by the public pathfan API.
pub type Result<T> = std::result::Result<T, Error>;
