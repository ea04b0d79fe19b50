//! Live progress reporting while documents complete.

use std::fmt;

use crate::document::DocumentRef;

/// One completed document, as seen by the progress sink.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpdate {
    pub document: DocumentRef,
    /// Documents completed so far, this one included.
    pub processed: usize,
    pub total: usize,
    /// Number of queries that matched this document.
    pub matches: usize,
    /// Whether text extraction failed for this document.
    pub failed: bool,
}

impl ProgressUpdate {
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.processed as f64 / self.total as f64 * 100.0
    }
}

impl fmt::Display for ProgressUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Processed {}: {}/{} ({:.1}%) — {} matches",
            self.document.display_name(),
            self.processed,
            self.total,
            self.percent(),
            self.matches
        )?;
        if self.failed {
            write!(f, " (extraction failed)")?;
        }
        Ok(())
    }
}

/// Receives one update per completed document.
///
/// Calls are serialized by the orchestrator, so `processed` strictly
/// increases from one call to the next.
pub trait ProgressSink: Send + Sync {
    fn document_finished(&self, update: &ProgressUpdate);
}

impl<F> ProgressSink for F
where
    F: Fn(&ProgressUpdate) + Send + Sync,
{
    fn document_finished(&self, update: &ProgressUpdate) {
        self(update)
    }
}

/// Prints each update as a line on stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutProgress;

impl ProgressSink for StdoutProgress {
    fn document_finished(&self, update: &ProgressUpdate) {
        println!("{update}");
    }
}

/// Discards updates.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentProgress;

impl ProgressSink for SilentProgress {
    fn document_finished(&self, _update: &ProgressUpdate) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(processed: usize, total: usize, failed: bool) -> ProgressUpdate {
        ProgressUpdate {
            document: DocumentRef::new("/papers/deep.pdf"),
            processed,
            total,
            matches: 2,
            failed,
        }
    }

    #[test]
    fn formats_count_percent_and_matches() {
        assert_eq!(
            update(1, 3, false).to_string(),
            "Processed deep.pdf: 1/3 (33.3%) — 2 matches"
        );
    }

    #[test]
    fn marks_failed_extractions() {
        assert!(update(3, 3, true)
            .to_string()
            .ends_with("(100.0%) — 2 matches (extraction failed)"));
    }

    #[test]
    fn percent_of_empty_batch_is_complete() {
        assert_eq!(update(0, 0, false).percent(), 100.0);
    }
}
