use connectors::error::ConnectorError;
use query_syntax::ParseError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Malformed query: {0}")]
    MalformedQuery(String),

    #[error("Field `{0}` is not searchable")]
    UnresolvedField(String),

    #[error("Cannot cast `{value}` for field `{field}`")]
    UncastableValue { field: String, value: String },

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}

#[derive(Error, Debug)]
pub enum SearchError {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error("Storage error: {0}")]
    Connector(#[from] ConnectorError),
}
