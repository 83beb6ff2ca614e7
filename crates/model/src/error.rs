use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Field '{0}' is registered more than once")]
    DuplicateField(String),

    #[error("Unknown semantic type '{0}'")]
    UnknownType(String),

    #[error("Invalid field locator '{0}'")]
    InvalidLocator(String),

    #[error("Unknown time zone '{0}'")]
    UnknownTimeZone(String),

    #[error("Invalid value for field '{field}': {message}")]
    InvalidRecordValue { field: String, message: String },

    #[error("Record must be a JSON object, found: {0}")]
    NotAnObject(String),

    #[error("Invalid search configuration: {0}")]
    Config(String),
}
