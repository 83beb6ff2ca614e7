use crate::{adapter::Adapter, error::ConnectorError};
use filter::MemoryFilter;
use chrono_tz::Tz;
use model::{field::registry::FieldRegistry, records::record::Record};
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

pub mod filter;

/// A collection of records held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<Record>,
}

impl MemoryStore {
    pub fn new(records: Vec<Record>) -> Self {
        MemoryStore { records }
    }

    /// Loads a JSON array of objects, casting each by the registry's types.
    /// Naive timestamps are read in `zone`. Documents whose values cannot be
    /// cast are skipped.
    pub fn from_json(
        source: &str,
        registry: &FieldRegistry,
        zone: Tz,
    ) -> Result<Self, ConnectorError> {
        let json: JsonValue = serde_json::from_str(source)?;
        let JsonValue::Array(documents) = json else {
            return Err(ConnectorError::InvalidSource(
                "expected a JSON array of objects".to_string(),
            ));
        };

        let mut records = Vec::with_capacity(documents.len());
        for (position, document) in documents.iter().enumerate() {
            match Record::from_json(document, registry, zone) {
                Ok(record) => records.push(record),
                Err(error) => warn!(position, %error, "Skipping record"),
            }
        }

        debug!(
            entity = registry.entity(),
            loaded = records.len(),
            skipped = documents.len() - records.len(),
            "Loaded records"
        );
        Ok(MemoryStore { records })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Adapter for MemoryStore {
    type Filter = MemoryFilter;
    type Output = Vec<Record>;

    fn fetch(&self, filter: &Self::Filter) -> Result<Self::Output, ConnectorError> {
        Ok(self
            .records
            .iter()
            .filter(|record| filter.eval(record))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filter::{MemoryComparator, MemoryCondition, MemoryFilterExpr};
    use model::{
        core::{semantic_type::SemanticType, value::Value},
        field::FieldDescriptor,
    };
    use tracing_test::traced_test;

    fn registry() -> FieldRegistry {
        FieldRegistry::new(
            "users",
            [
                FieldDescriptor::column("name", SemanticType::String),
                FieldDescriptor::column("age", SemanticType::Integer),
            ],
        )
        .unwrap()
    }

    #[test]
    #[traced_test]
    fn test_from_json_skips_uncastable_documents() {
        let store = MemoryStore::from_json(
            r#"[
                { "name": "dorian", "age": 31 },
                { "name": "marie", "age": "unknown" },
                { "name": "ada" }
            ]"#,
            &registry(),
            Tz::UTC,
        )
        .unwrap();

        assert_eq!(store.len(), 2);
        assert!(logs_contain("Skipping record"));
    }

    #[test]
    fn test_from_json_requires_array() {
        let result = MemoryStore::from_json(r#"{ "name": "dorian" }"#, &registry(), Tz::UTC);
        assert!(matches!(result, Err(ConnectorError::InvalidSource(_))));

        let result = MemoryStore::from_json("not json", &registry(), Tz::UTC);
        assert!(matches!(result, Err(ConnectorError::Json(_))));
    }

    #[test]
    fn test_fetch_applies_filter() {
        let store = MemoryStore::from_json(
            r#"[{ "name": "dorian", "age": 31 }, { "name": "ada", "age": 12 }]"#,
            &registry(),
            Tz::UTC,
        )
        .unwrap();

        let filter = MemoryFilter::with_expr(MemoryFilterExpr::leaf(MemoryCondition {
            column: "age".into(),
            op: MemoryComparator::GreaterThan(Value::Integer(18)),
        }));
        let rows = store.fetch(&filter).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get_value("name"), &Value::String("dorian".into()));
        assert_eq!(store.fetch(&MemoryFilter::new()).unwrap().len(), 2);
    }
}
