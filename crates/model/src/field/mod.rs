use crate::{core::semantic_type::SemanticType, error::ModelError};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

pub mod allowed;
pub mod registry;

/// Where a field lives in storage. Opaque to the compiler; adapters turn it
/// into a column reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locator {
    pub table: Option<String>,
    pub column: String,
}

impl Locator {
    pub fn column(column: impl Into<String>) -> Self {
        Locator {
            table: None,
            column: column.into(),
        }
    }

    pub fn qualified(table: impl Into<String>, column: impl Into<String>) -> Self {
        Locator {
            table: Some(table.into()),
            column: column.into(),
        }
    }
}

impl FromStr for Locator {
    type Err = ModelError;

    /// Accepts `column` or `table.column`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ModelError::InvalidLocator(s.to_string());
        let segments = s.trim().split('.').collect::<Vec<_>>();

        if segments.iter().any(|seg| seg.is_empty()) {
            return Err(invalid());
        }

        match segments.as_slice() {
            [column] => Ok(Locator::column(*column)),
            [table, column] => Ok(Locator::qualified(*table, *column)),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Locator {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Locator> for String {
    fn from(value: Locator) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.table {
            Some(table) => write!(f, "{}.{}", table, self.column),
            None => write!(f, "{}", self.column),
        }
    }
}

/// A searchable field: its public name, storage locator and semantic type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub locator: Locator,
    #[serde(rename = "type")]
    pub semantic_type: SemanticType,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, locator: Locator, semantic_type: SemanticType) -> Self {
        FieldDescriptor {
            name: name.into(),
            locator,
            semantic_type,
        }
    }

    /// Descriptor whose locator is a bare column named after the field.
    pub fn column(name: impl Into<String>, semantic_type: SemanticType) -> Self {
        let name = name.into();
        FieldDescriptor {
            locator: Locator::column(name.clone()),
            name,
            semantic_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locator_from_str() {
        assert_eq!(
            "users.name".parse::<Locator>().unwrap(),
            Locator::qualified("users", "name")
        );
        assert_eq!("name".parse::<Locator>().unwrap(), Locator::column("name"));
        assert!("a.b.c".parse::<Locator>().is_err());
        assert!("users.".parse::<Locator>().is_err());
        assert!("".parse::<Locator>().is_err());
    }

    #[test]
    fn test_descriptor_serde() {
        let field: FieldDescriptor = serde_json::from_str(
            r#"{ "name": "age", "locator": "users.age", "type": "bigint" }"#,
        )
        .unwrap();
        assert_eq!(
            field,
            FieldDescriptor::new("age", Locator::qualified("users", "age"), SemanticType::Integer)
        );
    }
}
