//! Turns user input into the list of raw query strings.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Result, SearchError};

/// Where the raw queries come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryInput {
    /// One expression typed on the command line.
    Expression(String),
    /// Contents of a query file: one query per line, or a JSON object with a
    /// `queries` list.
    File(String),
}

impl QueryInput {
    /// Reads a query file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|error| {
            SearchError::Config(format!(
                "unable to read query file {}: {error}",
                path.display()
            ))
        })?;
        Ok(Self::File(contents))
    }
}

#[derive(Debug, Deserialize)]
struct StructuredQueries {
    #[serde(default)]
    queries: Vec<String>,
}

/// Produces the raw query strings for `input`.
///
/// Fails with [`SearchError::Load`] when nothing is left to search for.
pub fn load_queries(input: &QueryInput) -> Result<Vec<String>> {
    let queries = match input {
        QueryInput::Expression(expression) => expression_queries(expression),
        QueryInput::File(contents) => file_queries(contents)?,
    };

    if queries.is_empty() {
        return Err(SearchError::Load("no search terms found".to_string()));
    }
    Ok(queries)
}

fn expression_queries(expression: &str) -> Vec<String> {
    let trimmed = expression.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    if is_plain_text(trimmed) {
        return vec![format!("\"{trimmed}\"")];
    }
    vec![trimmed.to_string()]
}

/// Free text with no operators, parentheses or quotes is searched as one
/// phrase.
fn is_plain_text(expression: &str) -> bool {
    let upper = expression.to_uppercase();
    let has_operator = upper.contains(" AND ") || upper.contains(" OR ");
    !has_operator && !expression.contains(['(', ')', '"'])
}

fn file_queries(contents: &str) -> Result<Vec<String>> {
    let contents = contents.trim();

    if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(contents) {
        let structured: StructuredQueries = serde_json::from_value(value)
            .map_err(|error| SearchError::Load(format!("invalid `queries` list: {error}")))?;
        return Ok(structured.queries);
    }

    let lines = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>();

    // A parenthesised block spread over several lines is one query.
    // TODO: replace with an explicit line-continuation marker.
    if lines.len() > 1 && contents.starts_with('(') && contents.ends_with(')') {
        return Ok(vec![lines.join(" ")]);
    }

    Ok(lines.into_iter().map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn from_file(contents: &str) -> Result<Vec<String>> {
        load_queries(&QueryInput::File(contents.to_string()))
    }

    fn from_expression(expression: &str) -> Result<Vec<String>> {
        load_queries(&QueryInput::Expression(expression.to_string()))
    }

    #[test]
    fn plain_expression_is_wrapped_as_a_phrase() {
        assert_eq!(
            from_expression("  neural codec ").expect("load"),
            vec!["\"neural codec\"".to_string()]
        );
    }

    #[test]
    fn boolean_expression_is_kept_verbatim() {
        assert_eq!(
            from_expression("deep AND fpga").expect("load"),
            vec!["deep AND fpga".to_string()]
        );
        assert_eq!(
            from_expression("deep or fpga").expect("load"),
            vec!["deep or fpga".to_string()]
        );
        assert_eq!(
            from_expression("(fpga)").expect("load"),
            vec!["(fpga)".to_string()]
        );
    }

    #[test]
    fn operator_words_inside_other_words_still_wrap() {
        assert_eq!(
            from_expression("android orchestra").expect("load"),
            vec!["\"android orchestra\"".to_string()]
        );
    }

    #[test]
    fn explicit_quotes_are_not_wrapped_again() {
        assert_eq!(
            from_expression("\"neural codec\"").expect("load"),
            vec!["\"neural codec\"".to_string()]
        );
    }

    #[test]
    fn empty_expression_fails_to_load() {
        let error = from_expression("   ").expect_err("should fail");
        assert!(matches!(error, SearchError::Load(_)), "got: {error:?}");
    }

    #[test]
    fn file_lines_are_independent_queries() {
        let queries = from_file("deep AND fpga\n\n  database OR sql  \n").expect("load");
        assert_eq!(queries, vec!["deep AND fpga", "database OR sql"]);
    }

    #[test]
    fn parenthesised_multi_line_file_is_one_query() {
        let queries = from_file("(deep AND\n  compression)\nOR (fpga)\n").expect("load");
        assert_eq!(queries, vec!["(deep AND compression) OR (fpga)"]);
    }

    #[test]
    fn single_parenthesised_line_stays_one_query() {
        let queries = from_file("(a OR b)").expect("load");
        assert_eq!(queries, vec!["(a OR b)"]);
    }

    #[test]
    fn structured_file_uses_queries_verbatim() {
        let queries =
            from_file(r#"{"queries": ["deep AND fpga", "  spaced  "]}"#).expect("load");
        assert_eq!(queries, vec!["deep AND fpga", "  spaced  "]);
    }

    #[test]
    fn structured_file_without_queries_fails_to_load() {
        let error = from_file(r#"{"terms": ["x"]}"#).expect_err("should fail");
        assert!(matches!(error, SearchError::Load(_)), "got: {error:?}");
    }

    #[test]
    fn structured_file_with_wrong_types_fails_to_load() {
        let error = from_file(r#"{"queries": [1, 2]}"#).expect_err("should fail");
        match error {
            SearchError::Load(message) => {
                assert!(message.contains("queries"), "unexpected message: {message}")
            }
            other => panic!("expected load error, got: {other:?}"),
        }
    }

    #[test]
    fn non_object_json_is_plain_text() {
        assert_eq!(from_file("42").expect("load"), vec!["42"]);
    }

    #[test]
    fn reads_query_file_from_disk() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"fpga\ndatabase\n").unwrap();
        file.flush().unwrap();

        let input = QueryInput::from_path(file.path()).expect("read");
        assert_eq!(load_queries(&input).expect("load"), vec!["fpga", "database"]);
    }

    #[test]
    fn missing_query_file_is_a_configuration_error() {
        let error = QueryInput::from_path(Path::new("/nonexistent/queries.txt"))
            .expect_err("should fail");
        assert!(matches!(error, SearchError::Config(_)), "got: {error:?}");
    }
}
