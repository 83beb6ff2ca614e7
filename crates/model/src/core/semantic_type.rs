use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// What a searchable field holds. Selects both the casting rules and the
/// operator semantics applied to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticType {
    #[serde(alias = "int", alias = "bigint")]
    Integer,
    #[serde(alias = "text")]
    String,
    #[serde(alias = "bool")]
    Boolean,
    #[serde(alias = "timestamp", alias = "date")]
    DateTime,
}

impl SemanticType {
    pub fn name(&self) -> &'static str {
        match self {
            SemanticType::Integer => "integer",
            SemanticType::String => "string",
            SemanticType::Boolean => "boolean",
            SemanticType::DateTime => "datetime",
        }
    }
}

impl FromStr for SemanticType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "integer" | "int" | "bigint" => Ok(SemanticType::Integer),
            "string" | "text" => Ok(SemanticType::String),
            "boolean" | "bool" => Ok(SemanticType::Boolean),
            "datetime" | "timestamp" | "date" => Ok(SemanticType::DateTime),
            _ => Err(ModelError::UnknownType(s.to_string())),
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_semantic_type_aliases() {
        assert_eq!("bigint".parse::<SemanticType>().unwrap(), SemanticType::Integer);
        assert_eq!("TEXT".parse::<SemanticType>().unwrap(), SemanticType::String);
        assert_eq!("bool".parse::<SemanticType>().unwrap(), SemanticType::Boolean);
        assert_eq!(
            "timestamp".parse::<SemanticType>().unwrap(),
            SemanticType::DateTime
        );
        assert!("float".parse::<SemanticType>().is_err());
    }

    #[test]
    fn test_semantic_type_serde() {
        let ty: SemanticType = serde_json::from_str("\"bigint\"").unwrap();
        assert_eq!(ty, SemanticType::Integer);
        assert_eq!(
            serde_json::to_string(&SemanticType::DateTime).unwrap(),
            "\"datetime\""
        );
    }
}
