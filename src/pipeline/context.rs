//! Walk context: the immutable matcher state built once per walk, plus the shared
//! exclusion/skip records the walk fills in.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use crate::Excluded;
use crate::engine::patterns::PatternSet;
use crate::engine::tools::relative_to_root;

/// Shared context for one walk. Built in [`Runner::walk`](crate::Runner::walk) and moved into
/// the walk iterator; the matcher and include filter are never mutated after construction.
pub struct WalkContext {
    pub root: PathBuf,
    pub ignore: PatternSet,
    pub include: Regex,
    pub follow_links: bool,
    pub strict: bool,
    pub sort: bool,
    pub excluded: Arc<Mutex<Vec<Excluded>>>,
    pub skipped_paths: Arc<Mutex<Vec<(PathBuf, String)>>>,
}

/// What the ignore matcher says about one entry.
#[derive(Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Not excluded; consider it.
    Keep,
    /// Excluded, and nothing below it can be re-included: skip and prune.
    Prune,
    /// Excluded itself, but a negated pattern might re-include something below it.
    Descend,
}

impl WalkContext {
    pub fn new(root: PathBuf, ignore: PatternSet, include: Regex) -> Self {
        Self {
            root,
            ignore,
            include,
            follow_links: true,
            strict: true,
            sort: false,
            excluded: Arc::new(Mutex::new(Vec::new())),
            skipped_paths: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Judge `path` against the ignore matcher, recording it when excluded.
    pub fn judge(&self, path: &Path, is_dir: bool) -> Verdict {
        let Some(rel) = relative_to_root(path, &self.root) else {
            return Verdict::Keep;
        };
        let Some(pattern) = self.ignore.matched(&rel, is_dir) else {
            return Verdict::Keep;
        };
        if pattern.negated() {
            return Verdict::Keep;
        }
        log::debug!("excluded {} ({})", path.display(), pattern.source());
        self.excluded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Excluded {
                path: path.to_path_buf(),
                pattern: pattern.source().to_string(),
            });
        match is_dir && self.ignore.has_negations() {
            true => Verdict::Descend,
            false => Verdict::Prune,
        }
    }

    /// Record a traversal error that was skipped (non-strict mode).
    pub fn record_skipped(&self, path: PathBuf, msg: String) {
        self.skipped_paths
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((path, msg));
    }
}
