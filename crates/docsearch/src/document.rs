//! Documents to search: discovery, exclusion and text extraction.

mod extract;
mod source;

pub use extract::{FileTextExtractor, TextExtractor};
pub use source::{DirectorySource, DocumentRef, DocumentSource, ExclusionFilter};
