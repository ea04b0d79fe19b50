//! Document discovery and exclusion.

use std::fmt;
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use regex::Regex;
use serde::Serialize;

use crate::error::{Result, SearchError};

/// Identifier of one document: a file path or a URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct DocumentRef {
    id: String,
}

impl DocumentRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn from_path(path: &Path) -> Self {
        Self::new(path.to_string_lossy())
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Last segment of the identifier, used for exclusion and progress lines.
    pub fn display_name(&self) -> &str {
        let trimmed = self.id.trim_end_matches(['/', '\\']);
        match trimmed.rfind(['/', '\\']) {
            Some(split) => &trimmed[split + 1..],
            None => trimmed,
        }
    }

    pub fn path(&self) -> &Path {
        Path::new(&self.id)
    }
}

impl fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// Supplies the ordered list of documents to search.
pub trait DocumentSource {
    fn documents(&self) -> Result<Vec<DocumentRef>>;
}

impl DocumentSource for Vec<DocumentRef> {
    fn documents(&self) -> Result<Vec<DocumentRef>> {
        Ok(self.clone())
    }
}

/// Files with a given extension inside one folder.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
    extension: Option<String>,
    recursive: bool,
}

impl DirectorySource {
    /// Lists files ending in `extension` directly inside `root`. An empty
    /// extension (or `*`) lists every file.
    pub fn new(root: impl Into<PathBuf>, extension: &str) -> Self {
        Self {
            root: root.into(),
            extension: normalize_extension(extension),
            recursive: false,
        }
    }

    /// Also descends into sub-folders.
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn pattern(&self) -> String {
        let root = Pattern::escape(&self.root.to_string_lossy());
        let file = match self.extension.as_deref() {
            Some(extension) => format!("*.{}", Pattern::escape(extension)),
            None => "*".to_string(),
        };
        if self.recursive {
            format!("{root}/**/{file}")
        } else {
            format!("{root}/{file}")
        }
    }
}

impl DocumentSource for DirectorySource {
    fn documents(&self) -> Result<Vec<DocumentRef>> {
        if !self.root.is_dir() {
            return Err(SearchError::Source(format!(
                "'{}' is not a valid directory",
                self.root.display()
            )));
        }

        let options = MatchOptions {
            case_sensitive: false,
            require_literal_separator: true,
            require_literal_leading_dot: false,
        };
        let entries = glob::glob_with(&self.pattern(), options)
            .map_err(|error| SearchError::Source(format!("invalid document pattern: {error}")))?;

        let mut paths = Vec::new();
        for entry in entries {
            match entry {
                Ok(path) if path.is_file() => paths.push(path),
                Ok(_) => {}
                Err(error) => log::warn!("skipping unreadable entry: {error}"),
            }
        }
        paths.sort();

        log::debug!(
            "found {} documents under {}",
            paths.len(),
            self.root.display()
        );
        Ok(paths.iter().map(|path| DocumentRef::from_path(path)).collect())
    }
}

fn normalize_extension(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_start_matches("*.").trim_start_matches('.');
    if trimmed.is_empty() || trimmed == "*" {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Skips documents whose display name matches a regular expression.
#[derive(Debug, Clone)]
pub struct ExclusionFilter {
    pattern: Regex,
}

impl ExclusionFilter {
    /// Compiles the pattern. An invalid pattern is fatal: silently ignoring it
    /// would search every document.
    pub fn new(pattern: &str) -> Result<Self> {
        let pattern =
            Regex::new(pattern).map_err(|error| SearchError::ExclusionPattern(error.to_string()))?;
        Ok(Self { pattern })
    }

    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn is_excluded(&self, document: &DocumentRef) -> bool {
        self.pattern.is_match(document.display_name())
    }
}
