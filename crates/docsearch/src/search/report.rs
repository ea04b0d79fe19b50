//! Final search results.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::document::DocumentRef;

/// Queries that matched one document, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentMatches {
    pub document: DocumentRef,
    pub queries: Vec<String>,
}

/// Matching documents in the order they were recorded (completion order).
///
/// Documents without any match are never recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MatchReport {
    entries: Vec<DocumentMatches>,
}

impl MatchReport {
    pub(crate) fn record(&mut self, document: DocumentRef, queries: Vec<String>) {
        debug_assert!(!queries.is_empty(), "only matching documents are recorded");
        self.entries.push(DocumentMatches { document, queries });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DocumentMatches> {
        self.entries.iter()
    }

    /// Matched queries for the document with identifier `id`.
    pub fn get(&self, id: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|entry| entry.document.id() == id)
            .map(|entry| entry.queries.as_slice())
    }

    /// Report content keyed by document identifier, independent of the
    /// order documents completed in.
    pub fn by_document(&self) -> BTreeMap<&str, &[String]> {
        self.entries
            .iter()
            .map(|entry| (entry.document.id(), entry.queries.as_slice()))
            .collect()
    }
}

impl fmt::Display for MatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Final Results:")?;
        if self.entries.is_empty() {
            return writeln!(f, "No matching queries in documents.");
        }
        for entry in &self.entries {
            writeln!(f)?;
            writeln!(f, "File: {}", entry.document)?;
            for query in &entry.queries {
                writeln!(f, "  - {query}")?;
            }
        }
        Ok(())
    }
}

/// Counters describing one search run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSummary {
    /// Documents listed by the source.
    pub discovered: usize,
    /// Documents skipped by the exclusion filter.
    pub excluded: usize,
    pub processed: usize,
    /// Documents whose text could not be extracted.
    pub failed: usize,
    /// Documents with at least one matching query.
    pub matched: usize,
    #[serde(rename = "elapsedMs", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

fn serialize_millis<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
}

impl fmt::Display for SearchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} documents processed ({} excluded, {} failed), {} matched in {:.2}s",
            self.processed,
            self.excluded,
            self.failed,
            self.matched,
            self.elapsed.as_secs_f64()
        )
    }
}

/// Everything a search run produces.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchOutcome {
    pub report: MatchReport,
    pub summary: SearchSummary,
}
