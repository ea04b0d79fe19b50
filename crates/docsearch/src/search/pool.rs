//! Worker pools that run one search task per document.
//!
//! The orchestrator only sees [`WorkerPool`], so the concurrency backend can
//! change without touching parsing or evaluation.

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::{Result, SearchError};

/// A unit of work borrowing from the caller's stack.
pub type Task<'scope> = Box<dyn FnOnce() + Send + 'scope>;

/// Runs a batch of tasks, bounded by the pool's worker count.
///
/// `execute` returns once every task has finished. Tasks may complete in any
/// order.
pub trait WorkerPool: Send + Sync {
    fn worker_count(&self) -> usize;

    fn execute<'scope>(&self, tasks: Vec<Task<'scope>>);
}

/// Dedicated rayon thread pool.
#[derive(Debug)]
pub struct RayonWorkerPool {
    pool: ThreadPool,
}

impl RayonWorkerPool {
    pub fn new(workers: usize) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers.max(1))
            .thread_name(|index| format!("docsearch-worker-{index}"))
            .build()
            .map_err(|error| SearchError::WorkerPool(error.to_string()))?;
        Ok(Self { pool })
    }
}

impl WorkerPool for RayonWorkerPool {
    fn worker_count(&self) -> usize {
        self.pool.current_num_threads()
    }

    fn execute<'scope>(&self, tasks: Vec<Task<'scope>>) {
        self.pool.scope(|scope| {
            for task in tasks {
                scope.spawn(move |_| task());
            }
        });
    }
}

/// Runs tasks one after another on the calling thread, in submission order.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialWorkerPool;

impl WorkerPool for SequentialWorkerPool {
    fn worker_count(&self) -> usize {
        1
    }

    fn execute<'scope>(&self, tasks: Vec<Task<'scope>>) {
        for task in tasks {
            task();
        }
    }
}

/// Picks a backend for `workers` threads: one worker runs inline, more get a
/// rayon pool.
pub fn worker_pool(workers: usize) -> Result<Box<dyn WorkerPool>> {
    if workers <= 1 {
        return Ok(Box::new(SequentialWorkerPool));
    }
    Ok(Box::new(RayonWorkerPool::new(workers)?))
}

/// Number of workers used when none is configured.
pub fn default_worker_count() -> usize {
    std::thread::available_parallelism()
        .map(|count| count.get())
        .unwrap_or(1)
}
