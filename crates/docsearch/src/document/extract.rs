//! Text extraction for documents.

use std::fs;

use crate::error::{Result, SearchError};

use super::source::DocumentRef;

/// Render width for HTML, wide enough that paragraphs are not wrapped and
/// phrases stay on one line.
const HTML_RENDER_WIDTH: usize = 10_000;

/// Produces the text of one document.
///
/// Implementations are called concurrently from search workers. A failure is
/// scoped to that document: the search treats it as empty text.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, document: &DocumentRef) -> Result<String>;
}

impl<F> TextExtractor for F
where
    F: Fn(&DocumentRef) -> Result<String> + Send + Sync,
{
    fn extract(&self, document: &DocumentRef) -> Result<String> {
        self(document)
    }
}

/// Reads documents from disk.
///
/// HTML files are rendered to plain text; everything else is decoded as
/// UTF-8, replacing invalid sequences.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileTextExtractor;

impl TextExtractor for FileTextExtractor {
    fn extract(&self, document: &DocumentRef) -> Result<String> {
        let bytes = fs::read(document.path()).map_err(|error| extraction_error(document, error))?;

        if is_html(document) {
            return html2text::from_read(&bytes[..], HTML_RENDER_WIDTH)
                .map_err(|error| extraction_error(document, error));
        }
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

fn is_html(document: &DocumentRef) -> bool {
    document
        .path()
        .extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| {
            extension.eq_ignore_ascii_case("html") || extension.eq_ignore_ascii_case("htm")
        })
}

fn extraction_error(document: &DocumentRef, error: impl std::fmt::Display) -> SearchError {
    SearchError::Extraction {
        document: document.id().to_string(),
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    fn create_temp_file(suffix: &str, content: &[u8]) -> NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn reads_plain_text() {
        let file = create_temp_file(".txt", b"Deep learning for image compression");
        let text = FileTextExtractor
            .extract(&DocumentRef::from_path(file.path()))
            .expect("extract");
        assert_eq!(text, "Deep learning for image compression");
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let file = create_temp_file(".txt", b"fpga \xff board");
        let text = FileTextExtractor
            .extract(&DocumentRef::from_path(file.path()))
            .expect("extract");
        assert!(text.starts_with("fpga "));
        assert!(text.ends_with(" board"));
    }

    #[test]
    fn html_is_rendered_to_text() {
        let file = create_temp_file(
            ".html",
            b"<html><body><p>Neural <b>codec</b> design</p><script>x</script></body></html>",
        );
        let text = FileTextExtractor
            .extract(&DocumentRef::from_path(file.path()))
            .expect("extract");
        assert!(text.contains("Neural"), "unexpected text: {text}");
        assert!(!text.contains("<p>"), "unexpected text: {text}");
    }

    #[test]
    fn missing_file_is_an_extraction_error() {
        let error = FileTextExtractor
            .extract(&DocumentRef::new("/nonexistent/paper.txt"))
            .expect_err("should fail");
        match error {
            SearchError::Extraction { document, .. } => {
                assert_eq!(document, "/nonexistent/paper.txt")
            }
            other => panic!("expected extraction error, got: {other:?}"),
        }
    }

    #[test]
    fn closures_are_extractors() {
        let extractor =
            |document: &DocumentRef| -> Result<String> { Ok(format!("text of {}", document.id())) };
        let text = extractor.extract(&DocumentRef::new("a")).expect("extract");
        assert_eq!(text, "text of a");
    }
}
