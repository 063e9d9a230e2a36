//! Public types for the pathfan API.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::utils::config::{
    DEFAULT_IGNORE_FILENAME, DEFAULT_INCLUDE_PATTERN, DEFAULT_ROOT_MARKERS,
};

/// Path → result of the work function, one entry per distinct input path.
pub type ResultMap<T> = HashMap<PathBuf, T>;

/// One entry skipped by the ignore matcher during a walk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Excluded {
    pub path: PathBuf,
    /// Source text of the deciding pattern.
    pub pattern: String,
}

/// Options for [`Runner`](crate::Runner). Everything a runner needs is carried here; nothing is
/// read from process-wide state.
#[derive(Clone, Debug)]
pub struct RunnerOpts {
    /// Worker count for the default pool. 0 uses rayon's default (one per logical CPU).
    pub concurrency: usize,
    /// Names marking a project root (files or directories), checked in order.
    pub root_markers: Vec<String>,
    /// Ignore file read from the project root.
    pub ignore_filename: String,
    /// Regex matched against names of files found inside directories.
    pub include: String,
    /// Follow symbolic links (symlinked files and dirs count as their targets).
    pub follow_links: bool,
    /// Strict mode: end the walk at the first traversal error instead of skipping it.
    pub strict: bool,
    /// Visit siblings in file-name order.
    pub sort: bool,
}

impl Default for RunnerOpts {
    fn default() -> Self {
        Self {
            concurrency: 0,
            root_markers: DEFAULT_ROOT_MARKERS.iter().map(|m| m.to_string()).collect(),
            ignore_filename: DEFAULT_IGNORE_FILENAME.to_string(),
            include: DEFAULT_INCLUDE_PATTERN.to_string(),
            follow_links: true,
            strict: true,
            sort: false,
        }
    }
}
