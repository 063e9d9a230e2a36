//! Worker-pool strategy for dispatch: submit one job, map many jobs, release the pool.
//!
//! Pools are built per dispatch call by an [`ExecutorFactory`] and always released through
//! [`PoolGuard`], so every exit path waits for in-flight jobs and joins the workers.

use crossbeam_channel::{Sender, unbounded};
use log::{debug, error};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use crate::error::{Error, Result};
use crate::utils::config::{PackagePaths, effective_concurrency};

/// One unit of work. Results travel back over whatever channel the job captured.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// A pool of workers running [`Job`]s off the caller's thread.
pub trait Executor: Send {
    /// Schedule one job.
    fn submit(&self, job: Job) -> Result<()>;

    /// Schedule every job; completion order is up to the pool.
    fn map(&self, jobs: Vec<Job>) -> Result<()> {
        for job in jobs {
            self.submit(job)?;
        }
        Ok(())
    }

    /// Wait for scheduled jobs to finish and release the workers. Must be idempotent.
    fn shutdown(&mut self);
}

/// Zero-argument constructor for a fresh pool, called once per dispatch.
pub type ExecutorFactory = Arc<dyn Fn() -> Result<Box<dyn Executor>> + Send + Sync>;

/// Default factory: a dedicated rayon pool of `concurrency` threads (0 = automatic).
pub fn rayon_factory(concurrency: usize) -> ExecutorFactory {
    Arc::new(move || {
        RayonExecutor::new(concurrency).map(|exe| Box::new(exe) as Box<dyn Executor>)
    })
}

/// Factory for [`ThreadExecutor`]: plain OS threads fed by a channel.
pub fn thread_factory(concurrency: usize) -> ExecutorFactory {
    Arc::new(move || {
        ThreadExecutor::new(concurrency).map(|exe| Box::new(exe) as Box<dyn Executor>)
    })
}

/// Owns an executor for the length of one dispatch and shuts it down on drop.
pub struct PoolGuard {
    executor: Box<dyn Executor>,
}

impl PoolGuard {
    pub fn acquire(factory: &ExecutorFactory) -> Result<Self> {
        Ok(Self {
            executor: factory()?,
        })
    }

    pub fn executor(&self) -> &dyn Executor {
        self.executor.as_ref()
    }
}

impl Drop for PoolGuard {
    fn drop(&mut self) {
        self.executor.shutdown();
    }
}

fn run_job(job: Job) {
    if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
        error!("job panicked outside the dispatch wrapper");
    }
}

// ---- rayon ----

/// Count of jobs submitted but not yet finished.
#[derive(Default)]
struct InFlight {
    count: Mutex<usize>,
    idle: Condvar,
}

impl InFlight {
    fn start(&self) {
        *self.count.lock().unwrap_or_else(PoisonError::into_inner) += 1;
    }

    fn finish(&self) {
        let mut count = self.count.lock().unwrap_or_else(PoisonError::into_inner);
        *count -= 1;
        if *count == 0 {
            self.idle.notify_all();
        }
    }

    fn wait_idle(&self) {
        let mut count = self.count.lock().unwrap_or_else(PoisonError::into_inner);
        while *count > 0 {
            count = self
                .idle
                .wait(count)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }
}

/// Decrements the in-flight count even if the job unwinds.
struct FinishOnDrop(Arc<InFlight>);

impl Drop for FinishOnDrop {
    fn drop(&mut self) {
        self.0.finish();
    }
}

/// Dedicated rayon thread pool, separate from rayon's global pool.
pub struct RayonExecutor {
    pool: Option<rayon::ThreadPool>,
    in_flight: Arc<InFlight>,
}

impl RayonExecutor {
    pub fn new(concurrency: usize) -> Result<Self> {
        let num_threads = effective_concurrency(concurrency);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|i| PackagePaths::get().worker_thread_name(i))
            .build()
            .map_err(|e| Error::Pool(e.to_string()))?;
        debug!("rayon pool with {} threads", num_threads);
        Ok(Self {
            pool: Some(pool),
            in_flight: Arc::new(InFlight::default()),
        })
    }
}

impl Executor for RayonExecutor {
    fn submit(&self, job: Job) -> Result<()> {
        let pool = self
            .pool
            .as_ref()
            .ok_or_else(|| Error::Pool("pool already shut down".to_string()))?;
        self.in_flight.start();
        let done = FinishOnDrop(Arc::clone(&self.in_flight));
        pool.spawn(move || {
            let _done = done;
            run_job(job);
        });
        Ok(())
    }

    fn shutdown(&mut self) {
        if let Some(pool) = self.pool.take() {
            self.in_flight.wait_idle();
            drop(pool);
        }
    }
}

// ---- plain threads ----

/// Fixed set of named OS threads pulling jobs from a crossbeam channel.
pub struct ThreadExecutor {
    job_tx: Option<Sender<Job>>,
    handles: Vec<JoinHandle<()>>,
}

impl ThreadExecutor {
    pub fn new(concurrency: usize) -> Result<Self> {
        let num_threads = effective_concurrency(concurrency);
        let (job_tx, job_rx) = unbounded::<Job>();
        let handles = (0..num_threads)
            .map(|i| {
                let job_rx = job_rx.clone();
                thread::Builder::new()
                    .name(PackagePaths::get().worker_thread_name(i))
                    .spawn(move || {
                        while let Ok(job) = job_rx.recv() {
                            run_job(job);
                        }
                    })
                    .map_err(|e| Error::Pool(e.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;
        debug!("thread pool with {} threads", num_threads);
        Ok(Self {
            job_tx: Some(job_tx),
            handles,
        })
    }
}

impl Executor for ThreadExecutor {
    fn submit(&self, job: Job) -> Result<()> {
        self.job_tx
            .as_ref()
            .ok_or_else(|| Error::Pool("pool already shut down".to_string()))?
            .send(job)
            .map_err(|_| Error::Pool("all workers exited".to_string()))
    }

    fn shutdown(&mut self) {
        // Dropping the last sender closes the channel so workers drain it and exit.
        drop(self.job_tx.take());
        for h in self.handles.drain(..) {
            if h.join().is_err() {
                error!("worker thread panicked");
            }
        }
    }
}
