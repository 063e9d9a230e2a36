//! Pipeline components: walk context, lazy walk, worker pools, dispatch.

pub mod context;
pub mod dispatch;
pub mod error_handler;
pub mod executor;
pub mod walk;

pub use context::{Verdict, WalkContext};
pub use dispatch::{RunIter, run, run_iter, unique_paths};
pub use error_handler::report_skipped_paths;
pub use executor::{
    Executor, ExecutorFactory, Job, PoolGuard, RayonExecutor, ThreadExecutor, rayon_factory,
    thread_factory,
};
pub use walk::Walk;
