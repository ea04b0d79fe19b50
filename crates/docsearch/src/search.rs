//! Concurrent search over a batch of documents.
//!
//! This module provides:
//! - The [`SearchOrchestrator`] that evaluates a query set against every document
//! - Worker pools bounding how many documents are processed at once
//! - Progress updates and the final match report

mod orchestrator;
mod pool;
mod progress;
mod report;


pub use orchestrator::SearchOrchestrator;
pub use pool::{
    default_worker_count, worker_pool, RayonWorkerPool, SequentialWorkerPool, Task, WorkerPool,
};
pub use progress::{ProgressSink, ProgressUpdate, SilentProgress, StdoutProgress};
pub use report::{DocumentMatches, MatchReport, SearchOutcome, SearchSummary};
