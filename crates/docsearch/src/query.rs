//! Query language for document search.
//!
//! This module provides:
//! - Tokenization of raw boolean expressions
//! - Recursive-descent parsing into an evaluable tree
//! - Loading query sets from expressions and query files
//! - Case-insensitive evaluation against document text

mod compiled;
mod expression;
mod loader;
mod parser;
mod token;

pub use compiled::{CompiledQuery, QuerySet, RejectedQuery};
pub use expression::{FoldedText, OpNode, Operator, QueryNode, TermNode};
pub use loader::{load_queries, QueryInput};
pub use parser::QueryParser;
pub use token::{tokenize, Token, TokenKind};
