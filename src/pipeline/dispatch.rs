//! Dispatch: run a work function once per path on a worker pool, collecting results by path.

use crossbeam_channel::{Receiver, Sender, unbounded};
use log::{debug, warn};
use std::any::Any;
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::ResultMap;
use crate::error::{Error, Result};

use super::executor::{ExecutorFactory, Job, PoolGuard};

/// (submission index, path, outcome) sent back by each job.
type Completion<T> = (usize, PathBuf, Result<T>);

/// Materialize `paths` once, dropping repeats (first occurrence keeps its place).
pub fn unique_paths<I>(paths: I) -> Vec<PathBuf>
where
    I: IntoIterator<Item = PathBuf>,
{
    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    let mut duplicates = 0_usize;
    for path in paths {
        if seen.insert(path.clone()) {
            unique.push(path);
        } else {
            duplicates += 1;
        }
    }
    if duplicates > 0 {
        warn!("ignoring {} duplicate input paths", duplicates);
    }
    unique
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    match payload.downcast::<String>() {
        Ok(msg) => *msg,
        Err(payload) => payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "non-string panic payload".to_string()),
    }
}

/// Wrap one (path, work) pair into a job that reports its outcome on `tx`.
fn make_job<T, F>(idx: usize, path: PathBuf, work: Arc<F>, tx: Sender<Completion<T>>) -> Job
where
    T: Send + 'static,
    F: Fn(&Path) -> anyhow::Result<T> + Send + Sync + 'static,
{
    Box::new(move || {
        let outcome = match panic::catch_unwind(AssertUnwindSafe(|| work(&path))) {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(error)) => Err(Error::Work {
                path: path.clone(),
                error,
            }),
            Err(payload) => Err(Error::WorkPanicked {
                path: path.clone(),
                message: panic_message(payload),
            }),
        };
        // Receiver gone means the caller stopped listening; nothing to report to.
        let _ = tx.send((idx, path, outcome));
    })
}

fn make_jobs<T, F>(paths: &[PathBuf], work: F) -> (Vec<Job>, Receiver<Completion<T>>)
where
    T: Send + 'static,
    F: Fn(&Path) -> anyhow::Result<T> + Send + Sync + 'static,
{
    let work = Arc::new(work);
    let (tx, rx) = unbounded();
    let jobs = paths
        .iter()
        .enumerate()
        .map(|(idx, path)| make_job(idx, path.clone(), Arc::clone(&work), tx.clone()))
        .collect();
    (jobs, rx)
}

/// Run `work` once per distinct path and block until all finish.
///
/// The first failure (in completion order) is returned and the rest of the results are
/// discarded; the pool is still released, waiting for jobs already running.
pub fn run<I, T, F>(factory: &ExecutorFactory, paths: I, work: F) -> Result<ResultMap<T>>
where
    I: IntoIterator<Item = PathBuf>,
    T: Send + 'static,
    F: Fn(&Path) -> anyhow::Result<T> + Send + Sync + 'static,
{
    let paths = unique_paths(paths);
    debug!("dispatching {} paths", paths.len());
    let (jobs, rx) = make_jobs(&paths, work);

    let guard = PoolGuard::acquire(factory)?;
    guard.executor().map(jobs)?;

    let mut results: Vec<Option<T>> = paths.iter().map(|_| None).collect();
    for (idx, _path, outcome) in rx.iter() {
        results[idx] = Some(outcome?);
    }
    drop(guard);

    paths
        .into_iter()
        .zip(results)
        .map(|(path, value)| match value {
            Some(value) => Ok((path, value)),
            None => Err(Error::JobLost(path)),
        })
        .collect()
}

/// Results of [`run_iter`], yielded in completion order.
///
/// Dropping it early releases the pool, which waits for jobs already handed to workers.
pub struct RunIter<T> {
    rx: Receiver<Completion<T>>,
    /// Paths by submission index; taken once their outcome is yielded.
    unreported: Vec<Option<PathBuf>>,
    remaining: usize,
    _guard: PoolGuard,
}

impl<T> RunIter<T> {
    /// Jobs not yet yielded.
    pub fn remaining(&self) -> usize {
        self.remaining
    }
}

impl<T> Iterator for RunIter<T> {
    type Item = Result<(PathBuf, T)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        match self.rx.recv() {
            Ok((idx, path, outcome)) => {
                if let Some(slot) = self.unreported.get_mut(idx) {
                    *slot = None;
                }
                self.remaining -= 1;
                Some(outcome.map(|value| (path, value)))
            }
            Err(_) => {
                // Every sender is gone with jobs unaccounted for: the executor dropped them.
                let path = self.unreported.iter_mut().find_map(Option::take)?;
                warn!("{} never reported back", path.display());
                self.remaining -= 1;
                Some(Err(Error::JobLost(path)))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

/// Submit one job per distinct path and return an iterator over `(path, result)` as each finishes.
/// A failed path shows up as an `Err` item; iteration continues with the rest.
pub fn run_iter<I, T, F>(factory: &ExecutorFactory, paths: I, work: F) -> Result<RunIter<T>>
where
    I: IntoIterator<Item = PathBuf>,
    T: Send + 'static,
    F: Fn(&Path) -> anyhow::Result<T> + Send + Sync + 'static,
{
    let paths = unique_paths(paths);
    debug!("streaming {} paths", paths.len());
    let (jobs, rx) = make_jobs(&paths, work);

    let guard = PoolGuard::acquire(factory)?;
    for job in jobs {
        guard.executor().submit(job)?;
    }

    Ok(RunIter {
        rx,
        remaining: paths.len(),
        unreported: paths.into_iter().map(Some).collect(),
        _guard: guard,
    })
}
