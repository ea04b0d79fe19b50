//! Drives a search batch: discovery, exclusion, concurrent evaluation and
//! aggregation.

use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use parking_lot::Mutex;

use crate::document::{DocumentRef, DocumentSource, ExclusionFilter, TextExtractor};
use crate::error::Result;
use crate::query::{FoldedText, QuerySet};

use super::pool::{Task, WorkerPool};
use super::progress::{ProgressSink, ProgressUpdate, SilentProgress};
use super::report::{MatchReport, SearchOutcome, SearchSummary};

/// Result of evaluating every query against one document.
#[derive(Debug, Default)]
struct DocumentEvaluation {
    matched: Vec<String>,
    failed: bool,
}

/// Shared state mutated by completing tasks.
///
/// Every completion updates the counters, emits its progress line and
/// records its matches under one lock, so updates never interleave.
#[derive(Debug)]
struct BatchAggregate {
    total: usize,
    processed: usize,
    failed: usize,
    report: MatchReport,
}

impl BatchAggregate {
    fn new(total: usize) -> Self {
        Self {
            total,
            processed: 0,
            failed: 0,
            report: MatchReport::default(),
        }
    }

    fn complete(
        &mut self,
        document: &DocumentRef,
        evaluation: DocumentEvaluation,
        progress: &dyn ProgressSink,
    ) {
        self.processed += 1;
        if evaluation.failed {
            self.failed += 1;
        }

        progress.document_finished(&ProgressUpdate {
            document: document.clone(),
            processed: self.processed,
            total: self.total,
            matches: evaluation.matched.len(),
            failed: evaluation.failed,
        });

        if !evaluation.matched.is_empty() {
            self.report.record(document.clone(), evaluation.matched);
        }
    }
}

/// Runs a compiled query set over a batch of documents.
pub struct SearchOrchestrator<'a> {
    queries: &'a QuerySet,
    extractor: &'a dyn TextExtractor,
    pool: &'a dyn WorkerPool,
    exclusion: Option<ExclusionFilter>,
    progress: &'a dyn ProgressSink,
}

impl<'a> SearchOrchestrator<'a> {
    pub fn new(
        queries: &'a QuerySet,
        extractor: &'a dyn TextExtractor,
        pool: &'a dyn WorkerPool,
    ) -> Self {
        Self {
            queries,
            extractor,
            pool,
            exclusion: None,
            progress: &SilentProgress,
        }
    }

    /// Skips documents whose display name matches the filter.
    pub fn with_exclusion(mut self, exclusion: Option<ExclusionFilter>) -> Self {
        self.exclusion = exclusion;
        self
    }

    pub fn with_progress(mut self, progress: &'a dyn ProgressSink) -> Self {
        self.progress = progress;
        self
    }

    /// Searches every document of `source`.
    ///
    /// Only a failing source is an error. Documents whose text cannot be
    /// extracted count as processed with no matches.
    pub fn run(&self, source: &dyn DocumentSource) -> Result<SearchOutcome> {
        let started = Instant::now();
        let discovered = source.documents()?;
        let discovered_count = discovered.len();

        let documents = discovered
            .into_iter()
            .filter(|document| !self.is_excluded(document))
            .collect::<Vec<_>>();
        let excluded = discovered_count - documents.len();
        let total = documents.len();

        if total == 0 {
            log::info!("no documents to process ({excluded} excluded)");
            return Ok(SearchOutcome {
                report: MatchReport::default(),
                summary: SearchSummary {
                    discovered: discovered_count,
                    excluded,
                    elapsed: started.elapsed(),
                    ..SearchSummary::default()
                },
            });
        }

        log::info!(
            "searching {total} documents with {} queries on {} workers",
            self.queries.len(),
            self.pool.worker_count()
        );

        let aggregate = Mutex::new(BatchAggregate::new(total));
        let tasks = documents
            .iter()
            .map(|document| {
                let aggregate = &aggregate;
                Box::new(move || {
                    let evaluation = self.evaluate_document(document);
                    aggregate.lock().complete(document, evaluation, self.progress);
                }) as Task<'_>
            })
            .collect::<Vec<_>>();
        self.pool.execute(tasks);

        let aggregate = aggregate.into_inner();
        let summary = SearchSummary {
            discovered: discovered_count,
            excluded,
            processed: aggregate.processed,
            failed: aggregate.failed,
            matched: aggregate.report.len(),
            elapsed: started.elapsed(),
        };
        log::info!("search finished: {summary}");

        Ok(SearchOutcome {
            report: aggregate.report,
            summary,
        })
    }

    fn is_excluded(&self, document: &DocumentRef) -> bool {
        let Some(filter) = self.exclusion.as_ref() else {
            return false;
        };
        let excluded = filter.is_excluded(document);
        if excluded {
            log::debug!("excluding {document} (matches '{}')", filter.as_str());
        }
        excluded
    }

    fn evaluate_document(&self, document: &DocumentRef) -> DocumentEvaluation {
        let started = Instant::now();

        // A panicking extractor must not take the other documents down with it.
        let extracted = panic::catch_unwind(AssertUnwindSafe(|| self.extractor.extract(document)));
        let text = match extracted {
            Ok(Ok(text)) => text,
            Ok(Err(error)) => {
                log::warn!("no text for {document}, treating as empty: {error}");
                return DocumentEvaluation {
                    matched: Vec::new(),
                    failed: true,
                };
            }
            Err(_) => {
                log::warn!("text extraction panicked for {document}, treating as empty");
                return DocumentEvaluation {
                    matched: Vec::new(),
                    failed: true,
                };
            }
        };

        let folded = FoldedText::new(&text);
        drop(text);
        let matched = self.queries.matching(&folded);

        log::debug!(
            "evaluated {document}: {} matches in {}ms",
            matched.len(),
            started.elapsed().as_millis()
        );
        DocumentEvaluation {
            matched,
            failed: false,
        }
    }
}
