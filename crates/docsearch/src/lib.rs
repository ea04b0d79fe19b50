//! Boolean-query document search.
//!
//! This crate provides:
//! - A query language of phrases combined with AND, OR and parentheses
//! - Query sets loaded from an expression or a query file
//! - Document discovery, exclusion and text extraction
//! - A concurrent search orchestrator with progress and a match report

pub mod config;
pub mod document;
pub mod error;
pub mod query;
pub mod search;

// Re-export main types
pub use config::SearchConfig;
pub use document::{
    DirectorySource, DocumentRef, DocumentSource, ExclusionFilter, FileTextExtractor,
    TextExtractor,
};
pub use error::{Result, SearchError};
pub use query::{CompiledQuery, QueryInput, QueryNode, QueryParser, QuerySet};
pub use search::{
    worker_pool, MatchReport, ProgressSink, SearchOrchestrator, SearchOutcome, SearchSummary,
    StdoutProgress, WorkerPool,
};
