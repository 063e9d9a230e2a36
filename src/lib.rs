//! pathfan: find the significant files under a path and fan a function out over them.
//!
//! Walking finds the project root (nearest ancestor with a root marker), compiles that root's
//! `.gitignore` plus any caller excludes, and lazily yields files that are not ignored and either
//! were named explicitly or match the include filter. Dispatch runs a function once per path on a
//! worker pool and returns results keyed by path, either all at once or as they complete.
//!
//! The free functions below use a [`Runner`] with default [`RunnerOpts`]; build your own runner to
//! change markers, the include filter, walk policy, or the worker pool.

pub mod engine;
pub mod error;
pub mod pipeline;
pub mod runner;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use engine::patterns::{Pattern, PatternSet};
pub use engine::root::RootMarkers;
pub use error::{Error, Result};
pub use pipeline::{
    Executor, ExecutorFactory, Job, RayonExecutor, RunIter, ThreadExecutor, Walk, rayon_factory,
    thread_factory,
};
pub use runner::Runner;
pub use types::*;

use std::path::{Path, PathBuf};

/// Nearest ancestor of `path` (or `path` itself, if a directory) containing `pyproject.toml`,
/// `.git` or `.hg`. Falls back to the filesystem root.
pub fn project_root(path: &Path) -> PathBuf {
    engine::root::find_root(path, &RootMarkers::default())
}

/// Patterns from `root/.gitignore`; empty when the file is missing.
/// Fails with [`Error::NotADirectory`] when `root` is not a directory.
pub fn compile_ignore(root: &Path) -> Result<PatternSet> {
    engine::ignore_file::compile_ignore_file(root, utils::config::DEFAULT_IGNORE_FILENAME)
}

/// `root/.gitignore` patterns followed by `excludes`.
pub fn resolve_ignore(root: &Path, excludes: &[String]) -> Result<PatternSet> {
    engine::ignore_file::resolve_ignore(root, utils::config::DEFAULT_IGNORE_FILENAME, excludes)
}

/// Lazily walk `path`, yielding significant files. See [`Runner::walk`].
pub fn walk(path: &Path, excludes: &[String]) -> Result<Walk> {
    Runner::new(&RunnerOpts::default())?.walk(path, excludes)
}

/// Run `work` once per distinct path on the default pool; results keyed by path.
///
/// `work` gets the path as its only argument; capture anything else in the closure. It runs on
/// worker threads of the calling process, not in separate processes.
pub fn run<I, T, F>(paths: I, work: F) -> Result<ResultMap<T>>
where
    I: IntoIterator<Item = PathBuf>,
    T: Send + 'static,
    F: Fn(&Path) -> anyhow::Result<T> + Send + Sync + 'static,
{
    Runner::new(&RunnerOpts::default())?.run(paths, work)
}

/// Like [`run`], but yields `(path, result)` pairs as each job completes.
pub fn run_iter<I, T, F>(paths: I, work: F) -> Result<RunIter<T>>
where
    I: IntoIterator<Item = PathBuf>,
    T: Send + 'static,
    F: Fn(&Path) -> anyhow::Result<T> + Send + Sync + 'static,
{
    Runner::new(&RunnerOpts::default())?.run_iter(paths, work)
}

/// Walk each of `paths` and run `work` over everything found.
pub fn walk_and_run<I, T, F>(paths: I, work: F, excludes: &[String]) -> Result<ResultMap<T>>
where
    I: IntoIterator<Item = PathBuf>,
    T: Send + 'static,
    F: Fn(&Path) -> anyhow::Result<T> + Send + Sync + 'static,
{
    Runner::new(&RunnerOpts::default())?.walk_and_run(paths, work, excludes)
}
