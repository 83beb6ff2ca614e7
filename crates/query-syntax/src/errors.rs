use crate::parser::Rule;
use pest::error::{Error as PestError, LineColLocation};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Syntax error at line {line}, column {column}: {message}")]
    Syntax {
        message: String,
        line: usize,
        column: usize,
        source_snippet: String,
    },

    #[error("Unknown operator '{0}'")]
    UnknownOperator(String),

    #[error("Unexpected rule '{0}' while building query")]
    UnexpectedRule(String),
}

impl ParseError {
    pub fn from_pest_error(err: PestError<Rule>) -> Self {
        let (line, column) = match err.line_col {
            LineColLocation::Pos((l, c)) => (l, c),
            LineColLocation::Span((l, c), _) => (l, c),
        };

        ParseError::Syntax {
            message: err.variant.message().to_string(),
            line,
            column,
            source_snippet: err.line().to_string(),
        }
    }

    /// Format error with a caret under the offending column
    pub fn format_error(&self) -> String {
        match self {
            ParseError::Syntax {
                message,
                line,
                column,
                source_snippet,
            } => format!(
                "Parse error at line {}, column {}:\n{}\n{}^\n{}",
                line,
                column,
                source_snippet,
                " ".repeat(column.saturating_sub(1)),
                message
            ),
            _ => self.to_string(),
        }
    }
}
