use connectors::error::ConnectorError;
use model::error::ModelError;
use query_syntax::ParseError;
use search_core::{CompileError, SearchError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Invalid search configuration: {0}")]
    Config(#[from] ModelError),

    #[error("Failed to load records: {0}")]
    Records(#[from] ConnectorError),

    #[error("Failed to parse the query: {0}")]
    QueryParse(#[from] ParseError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    #[error("Invalid SQL dialect provided: {0}")]
    InvalidDialect(String),

    #[error("Invalid reference time `{0}`, expected RFC 3339")]
    InvalidReferenceTime(String),
}

impl CliError {
    /// Message for the terminal. Query syntax errors point a caret at the
    /// offending column.
    pub fn report(&self) -> String {
        match self {
            CliError::QueryParse(err)
            | CliError::Compile(CompileError::Parse(err))
            | CliError::Search(SearchError::Compile(CompileError::Parse(err))) => err.format_error(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_points_at_syntax_errors() {
        let err = query_syntax::parse("name:dorian or").unwrap_err();

        for cli_err in [
            CliError::from(err.clone()),
            CliError::from(CompileError::from(err.clone())),
            CliError::from(SearchError::from(CompileError::from(err))),
        ] {
            let report = cli_err.report();
            assert!(report.starts_with("Parse error at line 1"), "{report}");
            assert!(report.contains("name:dorian or\n"), "{report}");
            assert!(report.contains('^'), "{report}");
        }
    }

    #[test]
    fn test_report_falls_back_to_display() {
        let err = CliError::InvalidDialect("oracle".into());
        assert_eq!(err.report(), "Invalid SQL dialect provided: oracle");
    }
}
