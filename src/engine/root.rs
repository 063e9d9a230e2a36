//! Project root discovery: nearest ancestor holding a root marker.

use log::debug;
use std::path::{Path, PathBuf};

use crate::engine::tools::resolve_path;
use crate::utils::config::DEFAULT_ROOT_MARKERS;

/// File or directory names whose presence marks a project root. Order is the check order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RootMarkers(Vec<String>);

impl Default for RootMarkers {
    fn default() -> Self {
        Self(DEFAULT_ROOT_MARKERS.iter().map(|m| m.to_string()).collect())
    }
}

impl RootMarkers {
    pub fn new<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(markers.into_iter().map(Into::into).collect())
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    /// True if `dir` contains any marker (existence only, contents never read).
    pub fn present_in(&self, dir: &Path) -> bool {
        self.0.iter().any(|marker| dir.join(marker).exists())
    }
}

/// Find the project root for `path`: resolve it, start from it (directory) or its parent (anything
/// else), and return the nearest ancestor containing a marker. Falls back to the filesystem root.
pub fn find_root(path: &Path, markers: &RootMarkers) -> PathBuf {
    let real = resolve_path(path);
    let start = match real.is_dir() {
        true => real.as_path(),
        false => real.parent().unwrap_or(real.as_path()),
    };

    let mut last = start;
    for candidate in start.ancestors() {
        if markers.present_in(candidate) {
            debug!("project root for {} is {}", path.display(), candidate.display());
            return candidate.to_path_buf();
        }
        last = candidate;
    }
    debug!(
        "no root marker above {}, using {}",
        path.display(),
        last.display()
    );
    last.to_path_buf()
}
