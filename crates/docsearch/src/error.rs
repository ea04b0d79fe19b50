#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Query syntax error: {message}{}", position_suffix(.position))]
    Syntax {
        message: String,
        position: Option<usize>,
    },

    #[error("No usable queries: {0}")]
    Load(String),

    #[error("Extraction failed for {document}: {message}")]
    Extraction { document: String, message: String },

    #[error("Invalid exclusion pattern: {0}")]
    ExclusionPattern(String),

    #[error("Document source error: {0}")]
    Source(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Worker pool error: {0}")]
    WorkerPool(String),
}

impl SearchError {
    pub(crate) fn syntax(message: impl Into<String>, position: usize) -> Self {
        Self::Syntax {
            message: message.into(),
            position: Some(position),
        }
    }

    pub(crate) fn syntax_at_end(message: impl Into<String>) -> Self {
        Self::Syntax {
            message: message.into(),
            position: None,
        }
    }

    /// Whether the error stops the whole batch rather than one query or document.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Syntax { .. } | Self::Extraction { .. })
    }
}

fn position_suffix(position: &Option<usize>) -> String {
    match position {
        Some(position) => format!(" near byte {position}"),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_error_mentions_position() {
        let error = SearchError::syntax("unexpected token", 4);
        assert_eq!(
            error.to_string(),
            "Query syntax error: unexpected token near byte 4"
        );
        assert!(!error.is_fatal());
    }

    #[test]
    fn syntax_error_at_end_has_no_position() {
        let error = SearchError::syntax_at_end("expected term");
        assert_eq!(error.to_string(), "Query syntax error: expected term");
    }

    #[test]
    fn configuration_errors_are_fatal() {
        assert!(SearchError::Load("empty".to_string()).is_fatal());
        assert!(SearchError::ExclusionPattern("(".to_string()).is_fatal());
        assert!(!SearchError::Extraction {
            document: "a.txt".to_string(),
            message: "boom".to_string(),
        }
        .is_fatal());
    }
}
