use crate::{
    core::semantic_type::SemanticType,
    error::ModelError,
    field::{FieldDescriptor, Locator, registry::FieldRegistry},
};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What to do with a comparison key, or allow-listed name, that does not
/// resolve to a registered field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnresolvedFieldPolicy {
    /// Fail the compile call
    Strict,
    /// Compile to a predicate that matches nothing
    #[default]
    Lenient,
}

/// How values that do not parse as the field's type are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CastingPolicy {
    /// Coerce to a type-specific fallback (`0`, `false`, an unresolved
    /// datetime)
    #[default]
    Permissive,
    /// Fail the compile call
    Strict,
}

/// Searchable-field declaration of one entity, as read from JSON.
///
/// ```json
/// {
///   "entity": "users",
///   "time_zone": "Europe/Paris",
///   "unresolved_fields": "strict",
///   "casting": "permissive",
///   "fields": [
///     { "name": "name", "locator": "users.name", "type": "string" },
///     { "name": "age", "type": "bigint" }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    pub entity: String,
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
    #[serde(default)]
    pub unresolved_fields: UnresolvedFieldPolicy,
    #[serde(default)]
    pub casting: CastingPolicy,
    pub fields: Vec<FieldConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    pub name: String,
    /// Defaults to a column named after the field
    #[serde(default)]
    pub locator: Option<Locator>,
    #[serde(rename = "type", default = "default_type")]
    pub semantic_type: SemanticType,
}

fn default_time_zone() -> String {
    "UTC".to_string()
}

fn default_type() -> SemanticType {
    SemanticType::String
}

impl SearchConfig {
    pub fn from_json(source: &str) -> Result<Self, ModelError> {
        serde_json::from_str(source).map_err(|e| ModelError::Config(e.to_string()))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| ModelError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json(&source)
    }

    pub fn time_zone(&self) -> Result<Tz, ModelError> {
        self.time_zone
            .parse::<Tz>()
            .map_err(|_| ModelError::UnknownTimeZone(self.time_zone.clone()))
    }

    pub fn registry(&self) -> Result<FieldRegistry, ModelError> {
        let fields = self.fields.iter().map(|field| {
            let locator = field
                .locator
                .clone()
                .unwrap_or_else(|| Locator::column(field.name.clone()));
            FieldDescriptor::new(field.name.clone(), locator, field.semantic_type)
        });
        FieldRegistry::new(self.entity.clone(), fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = SearchConfig::from_json(
            r#"{
                "entity": "users",
                "fields": [
                    { "name": "name", "locator": "users.name" },
                    { "name": "age", "type": "bigint" }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(config.time_zone().unwrap(), Tz::UTC);
        assert_eq!(config.unresolved_fields, UnresolvedFieldPolicy::Lenient);
        assert_eq!(config.casting, CastingPolicy::Permissive);

        let registry = config.registry().unwrap();
        assert_eq!(registry.entity(), "users");
        let name = registry.get("name").unwrap();
        assert_eq!(name.semantic_type, SemanticType::String);
        assert_eq!(name.locator, Locator::qualified("users", "name"));
        assert_eq!(registry.get("age").unwrap().locator, Locator::column("age"));
    }

    #[test]
    fn test_config_errors() {
        let config = SearchConfig::from_json(
            r#"{ "entity": "e", "time_zone": "Mars/Olympus", "fields": [] }"#,
        )
        .unwrap();
        assert!(matches!(
            config.time_zone(),
            Err(ModelError::UnknownTimeZone(_))
        ));

        let err = SearchConfig::from_json(
            r#"{ "entity": "e", "fields": [{ "name": "x", "type": "float" }] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::Config(_)));

        let config = SearchConfig::from_json(
            r#"{ "entity": "e", "unresolved_fields": "strict", "fields": [{ "name": "x" }, { "name": "x" }] }"#,
        )
        .unwrap();
        assert_eq!(config.unresolved_fields, UnresolvedFieldPolicy::Strict);
        assert!(matches!(config.registry(), Err(ModelError::DuplicateField(_))));
    }
}
