//! Compiled queries shared read-only by every search worker.

use crate::error::{Result, SearchError};

use super::expression::{FoldedText, QueryNode};
use super::loader::{load_queries, QueryInput};
use super::parser::QueryParser;

/// A query string paired with its parsed tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledQuery {
    source: String,
    root: QueryNode,
}

impl CompiledQuery {
    pub fn compile(source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        let root = QueryParser::parse(&source)?;
        Ok(Self { source, root })
    }

    /// The query exactly as it was loaded, used in reports.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> &QueryNode {
        &self.root
    }

    pub fn matches(&self, text: &FoldedText) -> bool {
        self.root.evaluate(text)
    }
}

/// A query that failed to compile and was left out of the active set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedQuery {
    pub query: String,
    pub reason: String,
}

/// The active queries in declaration order.
#[derive(Debug, Clone, Default)]
pub struct QuerySet {
    queries: Vec<CompiledQuery>,
    rejected: Vec<RejectedQuery>,
}

impl QuerySet {
    /// Compiles each raw query on its own. Malformed queries are logged and
    /// skipped; the set fails only when nothing compiles.
    pub fn compile<I, S>(raw_queries: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::default();
        for raw in raw_queries {
            let raw = raw.into();
            match CompiledQuery::compile(raw.clone()) {
                Ok(query) => set.queries.push(query),
                Err(error) => {
                    log::warn!("skipping query '{raw}': {error}");
                    set.rejected.push(RejectedQuery {
                        query: raw,
                        reason: error.to_string(),
                    });
                }
            }
        }

        if set.queries.is_empty() {
            let message = if set.rejected.is_empty() {
                "no search terms found".to_string()
            } else {
                format!("all {} queries failed to parse", set.rejected.len())
            };
            return Err(SearchError::Load(message));
        }

        log::debug!(
            "compiled {} queries, rejected {}",
            set.queries.len(),
            set.rejected.len()
        );
        Ok(set)
    }

    /// Loads and compiles the queries described by `input`.
    pub fn from_input(input: &QueryInput) -> Result<Self> {
        Self::compile(load_queries(input)?)
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompiledQuery> {
        self.queries.iter()
    }

    pub fn rejected(&self) -> &[RejectedQuery] {
        &self.rejected
    }

    /// Sources of every query matching `text`, in declaration order.
    pub fn matching(&self, text: &FoldedText) -> Vec<String> {
        self.queries
            .iter()
            .filter(|query| query.matches(text))
            .map(|query| query.source().to_string())
            .collect()
    }
}
