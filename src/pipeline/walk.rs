//! Lazy tree walk: walkdir traversal filtered by the ignore matcher and the include filter.

use log::{debug, warn};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError};
use walkdir::{DirEntry, WalkDir};

use crate::Excluded;
use crate::engine::tools::{include_matches, trim_cur_dir};
use crate::error::{Error, Result};

use super::context::{Verdict, WalkContext};

type EntryIter = Box<dyn Iterator<Item = walkdir::Result<DirEntry>> + Send>;

/// Significant files under a starting path, produced as the tree is walked.
///
/// Yields `Err` for traversal failures. In strict mode the first error ends the walk; otherwise
/// errors are logged, recorded in [`Walk::skipped`], and the walk carries on.
pub struct Walk {
    ctx: Arc<WalkContext>,
    iter: Option<EntryIter>,
    done: bool,
}

impl Walk {
    /// Start walking `start`. The start entry is explicit: if it is a file it is yielded whatever
    /// its extension (unless ignored). A nonexistent `start` gives an empty walk.
    pub fn new(start: &Path, ctx: WalkContext) -> Self {
        let ctx = Arc::new(ctx);
        let iter = match start.exists() {
            true => Some(entry_iter(start, &ctx)),
            false => {
                debug!("{} does not exist, nothing to walk", start.display());
                None
            }
        };
        Self {
            ctx,
            iter,
            done: false,
        }
    }

    /// Project root the walk matched paths against.
    pub fn root(&self) -> &Path {
        &self.ctx.root
    }

    /// Entries excluded by an ignore pattern so far.
    pub fn excluded(&self) -> Vec<Excluded> {
        self.ctx
            .excluded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Traversal errors skipped so far (non-strict mode only).
    pub fn skipped(&self) -> Vec<(PathBuf, String)> {
        self.ctx
            .skipped_paths
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

fn entry_iter(start: &Path, ctx: &Arc<WalkContext>) -> EntryIter {
    let mut walker = WalkDir::new(start).follow_links(ctx.follow_links);
    if ctx.sort {
        walker = walker.sort_by_file_name();
    }
    let judge_ctx = Arc::clone(ctx);
    Box::new(walker.into_iter().filter_entry(move |entry| {
        judge_ctx.judge(entry.path(), entry.file_type().is_dir()) != Verdict::Prune
    }))
}

impl Iterator for Walk {
    type Item = Result<PathBuf>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let iter = self.iter.as_mut()?;
        loop {
            match iter.next()? {
                Ok(entry) => {
                    if !entry.file_type().is_file() {
                        continue;
                    }
                    if entry.depth() == 0 || include_matches(&self.ctx.include, entry.path()) {
                        return Some(Ok(trim_cur_dir(entry.into_path())));
                    }
                }
                Err(err) => {
                    let path = err
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| self.ctx.root.clone());
                    let msg = err.to_string();
                    if self.ctx.strict {
                        self.done = true;
                        let source = err
                            .into_io_error()
                            .unwrap_or_else(|| std::io::Error::other(msg));
                        return Some(Err(Error::io(path, source)));
                    }
                    warn!("skipping {}: {}", path.display(), msg);
                    self.ctx.record_skipped(path, msg);
                }
            }
        }
    }
}
