//! Runner: the configured engine behind the public API.

use log::debug;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::engine::ignore_file::{compile_ignore_file, resolve_ignore};
use crate::engine::patterns::PatternSet;
use crate::engine::root::{RootMarkers, find_root};
use crate::engine::tools::or_cur_dir;
use crate::error::Result;
use crate::pipeline::dispatch::{self, RunIter};
use crate::pipeline::executor::{Executor, ExecutorFactory, rayon_factory};
use crate::pipeline::{Walk, WalkContext};
use crate::{ResultMap, RunnerOpts};

/// Walks trees and dispatches work with one fixed configuration.
///
/// Root markers, the include filter, walk policy and the pool factory are all chosen at
/// construction; two runners never share mutable state.
#[derive(Clone)]
pub struct Runner {
    root_markers: RootMarkers,
    ignore_filename: String,
    include: Regex,
    follow_links: bool,
    strict: bool,
    sort: bool,
    executor_factory: ExecutorFactory,
}

impl Runner {
    /// Build a runner from `opts`. Fails only if the include regex is malformed.
    /// Uses a dedicated rayon pool of `opts.concurrency` threads for dispatch. Work runs on
    /// threads of this process, sharing the caller's address space; it is not process-isolated.
    pub fn new(opts: &RunnerOpts) -> Result<Self> {
        debug!(
            "{} CONFIG:{:#?}",
            env!("CARGO_PKG_NAME").to_uppercase(),
            opts
        );
        Ok(Self {
            root_markers: RootMarkers::new(opts.root_markers.iter().cloned()),
            ignore_filename: opts.ignore_filename.clone(),
            include: Regex::new(&opts.include)?,
            follow_links: opts.follow_links,
            strict: opts.strict,
            sort: opts.sort,
            executor_factory: rayon_factory(opts.concurrency),
        })
    }

    /// Replace the pool factory, e.g. with [`thread_factory`](crate::thread_factory) or a custom
    /// [`Executor`]. Called once per dispatch.
    pub fn with_executor_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Result<Box<dyn Executor>> + Send + Sync + 'static,
    {
        self.executor_factory = Arc::new(factory);
        self
    }

    pub fn root_markers(&self) -> &RootMarkers {
        &self.root_markers
    }

    /// Nearest ancestor of `path` (or `path` itself) holding a root marker.
    pub fn project_root(&self, path: &Path) -> PathBuf {
        find_root(path, &self.root_markers)
    }

    /// Patterns from the ignore file in `root`; empty when there is none.
    pub fn compile_ignore(&self, root: &Path) -> Result<PatternSet> {
        compile_ignore_file(root, &self.ignore_filename)
    }

    /// Ignore-file patterns for `root` with `excludes` appended.
    pub fn resolve_ignore(&self, root: &Path, excludes: &[String]) -> Result<PatternSet> {
        resolve_ignore(root, &self.ignore_filename, excludes)
    }

    /// Start a lazy walk of `path`. Root discovery and matcher compilation happen now, so
    /// configuration errors surface here rather than mid-walk.
    pub fn walk(&self, path: &Path, excludes: &[String]) -> Result<Walk> {
        let path = or_cur_dir(path);
        let root = self.project_root(path);
        let ignore = self.resolve_ignore(&root, excludes)?;
        debug!(
            "walking {} (root {}, {} ignore patterns)",
            path.display(),
            root.display(),
            ignore.len()
        );
        let mut ctx = WalkContext::new(root, ignore, self.include.clone());
        ctx.follow_links = self.follow_links;
        ctx.strict = self.strict;
        ctx.sort = self.sort;
        Ok(Walk::new(path, ctx))
    }

    /// Run `work` once per distinct path; block until done and return results keyed by path.
    ///
    /// Jobs run on in-process worker threads: a panic is caught and reported as
    /// [`Error::WorkPanicked`](crate::Error::WorkPanicked), but a crash or abort takes the caller
    /// down with it.
    pub fn run<I, T, F>(&self, paths: I, work: F) -> Result<ResultMap<T>>
    where
        I: IntoIterator<Item = PathBuf>,
        T: Send + 'static,
        F: Fn(&Path) -> anyhow::Result<T> + Send + Sync + 'static,
    {
        dispatch::run(&self.executor_factory, paths, work)
    }

    /// Run `work` once per distinct path, yielding `(path, result)` in completion order.
    pub fn run_iter<I, T, F>(&self, paths: I, work: F) -> Result<RunIter<T>>
    where
        I: IntoIterator<Item = PathBuf>,
        T: Send + 'static,
        F: Fn(&Path) -> anyhow::Result<T> + Send + Sync + 'static,
    {
        dispatch::run_iter(&self.executor_factory, paths, work)
    }

    /// Walk every path in `paths`, then run `work` over everything found.
    /// Walk errors abort before any work is dispatched.
    pub fn walk_and_run<I, T, F>(
        &self,
        paths: I,
        work: F,
        excludes: &[String],
    ) -> Result<ResultMap<T>>
    where
        I: IntoIterator<Item = PathBuf>,
        T: Send + 'static,
        F: Fn(&Path) -> anyhow::Result<T> + Send + Sync + 'static,
    {
        let mut all_paths = Vec::new();
        for path in paths {
            for found in self.walk(&path, excludes)? {
                all_paths.push(found?);
            }
        }
        self.run(all_paths, work)
    }
}
