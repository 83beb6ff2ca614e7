use crate::{
    core::{semantic_type::SemanticType, value::Value},
    error::ModelError,
    field::registry::FieldRegistry,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// One stored entity: field name to typed value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    values: HashMap<String, Value>,
    source: Option<JsonValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: Value) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// The value of `name`, or `Null` when the record has none.
    pub fn get_value(&self, name: &str) -> &Value {
        self.values.get(name).unwrap_or(&Value::Null)
    }

    /// Casts a JSON object using the registry's declared types. Values are
    /// read from, and stored under, each field's locator column; other keys
    /// are kept only in the source document. Timestamps without an offset
    /// are local to `zone`.
    pub fn from_json(
        json: &JsonValue,
        registry: &FieldRegistry,
        zone: Tz,
    ) -> Result<Self, ModelError> {
        let object = json
            .as_object()
            .ok_or_else(|| ModelError::NotAnObject(json.to_string()))?;

        let mut record = Record {
            values: HashMap::with_capacity(registry.len()),
            source: Some(json.clone()),
        };

        for field in registry.iter() {
            let column = &field.locator.column;
            let Some(raw) = object.get(column) else {
                continue;
            };
            let value = json_to_value(raw, field.semantic_type, zone).map_err(|message| {
                ModelError::InvalidRecordValue {
                    field: field.name.clone(),
                    message,
                }
            })?;
            record.values.insert(column.clone(), value);
        }

        Ok(record)
    }

    /// The document this record was read from, or one rebuilt from its
    /// typed values.
    pub fn to_json(&self) -> JsonValue {
        if let Some(source) = &self.source {
            return source.clone();
        }

        let object = self
            .values
            .iter()
            .map(|(name, value)| (name.clone(), value_to_json(value)))
            .collect::<serde_json::Map<_, _>>();
        JsonValue::Object(object)
    }
}

fn json_to_value(raw: &JsonValue, ty: SemanticType, zone: Tz) -> Result<Value, String> {
    if raw.is_null() {
        return Ok(Value::Null);
    }

    match ty {
        SemanticType::Integer => match raw {
            JsonValue::Number(n) => n
                .as_i64()
                .map(Value::Integer)
                .ok_or_else(|| format!("{n} is not a 64-bit integer")),
            JsonValue::String(s) => s
                .trim()
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|e| format!("'{s}': {e}")),
            other => Err(format!("expected an integer, found {other}")),
        },
        SemanticType::String => match raw {
            JsonValue::String(s) => Ok(Value::String(s.clone())),
            JsonValue::Number(n) => Ok(Value::String(n.to_string())),
            JsonValue::Bool(b) => Ok(Value::String(b.to_string())),
            other => Err(format!("expected a string, found {other}")),
        },
        SemanticType::Boolean => match raw {
            JsonValue::Bool(b) => Ok(Value::Boolean(*b)),
            JsonValue::Number(n) => Ok(Value::Boolean(n.as_i64().is_some_and(|n| n != 0))),
            JsonValue::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(Value::Boolean(true)),
                "false" | "0" => Ok(Value::Boolean(false)),
                _ => Err(format!("'{s}' is not a boolean")),
            },
            other => Err(format!("expected a boolean, found {other}")),
        },
        SemanticType::DateTime => match raw {
            JsonValue::String(s) => parse_timestamp(s, zone)
                .map(Value::DateTime)
                .ok_or_else(|| format!("'{s}' is not a timestamp")),
            JsonValue::Number(n) => n
                .as_i64()
                .and_then(|secs| DateTime::from_timestamp(secs, 0))
                .map(Value::DateTime)
                .ok_or_else(|| format!("{n} is not a unix timestamp")),
            other => Err(format!("expected a timestamp, found {other}")),
        },
    }
}

/// RFC 3339, or a naive date/datetime read as local time in `zone`.
/// Local times skipped by a DST change do not parse; repeated ones take
/// the earlier instant.
pub fn parse_timestamp(s: &str, zone: Tz) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.with_timezone(&Utc));
    }
    let naive = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })?;
    zone.from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
}

fn value_to_json(value: &Value) -> JsonValue {
    match value {
        Value::Integer(n) => JsonValue::from(*n),
        Value::Boolean(b) => JsonValue::Bool(*b),
        Value::Null => JsonValue::Null,
        other => other
            .as_text()
            .map(JsonValue::String)
            .unwrap_or(JsonValue::Null),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldDescriptor;
    use chrono::TimeZone;
    use serde_json::json;

    fn registry() -> FieldRegistry {
        FieldRegistry::new(
            "users",
            [
                FieldDescriptor::column("name", SemanticType::String),
                FieldDescriptor::column("age", SemanticType::Integer),
                FieldDescriptor::column("verified", SemanticType::Boolean),
                FieldDescriptor::column("created_at", SemanticType::DateTime),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_from_json_casts_registered_fields() {
        let doc = json!({
            "name": "Dorian",
            "age": "31",
            "verified": 1,
            "created_at": "2024-05-01T10:00:00+02:00",
            "extra": [1, 2, 3]
        });
        let record = Record::from_json(&doc, &registry(), Tz::UTC).unwrap();

        assert_eq!(record.get_value("name"), &Value::String("Dorian".into()));
        assert_eq!(record.get_value("age"), &Value::Integer(31));
        assert_eq!(record.get_value("verified"), &Value::Boolean(true));
        assert_eq!(
            record.get_value("created_at"),
            &Value::DateTime(Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap())
        );
        assert!(record.get("extra").is_none());
        assert_eq!(record.to_json(), doc);
    }

    #[test]
    fn test_from_json_rejects_bad_values() {
        let err = Record::from_json(&json!({ "age": "old" }), &registry(), Tz::UTC).unwrap_err();
        assert!(matches!(err, ModelError::InvalidRecordValue { field, .. } if field == "age"));

        let err = Record::from_json(&json!([1]), &registry(), Tz::UTC).unwrap_err();
        assert!(matches!(err, ModelError::NotAnObject(_)));
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 0).unwrap();
        assert_eq!(parse_timestamp("2024-01-02 03:04", Tz::UTC), Some(expected));
        assert_eq!(parse_timestamp("2024-01-02T03:04:00Z", Tz::UTC), Some(expected));
        assert_eq!(
            parse_timestamp("2024-01-02", Tz::UTC),
            Some(Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_timestamp("soon", Tz::UTC), None);
    }

    #[test]
    fn test_naive_timestamps_are_local_to_zone() {
        let paris = Tz::Europe__Paris;
        // CEST is UTC+2
        assert_eq!(
            parse_timestamp("2024-05-15 10:00", paris),
            Some(Utc.with_ymd_and_hms(2024, 5, 15, 8, 0, 0).unwrap())
        );
        assert_eq!(
            parse_timestamp("2024-01-02", paris),
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 23, 0, 0).unwrap())
        );
        // an explicit offset wins over the zone
        assert_eq!(
            parse_timestamp("2024-05-15T10:00:00Z", paris),
            Some(Utc.with_ymd_and_hms(2024, 5, 15, 10, 0, 0).unwrap())
        );
        // skipped by the spring-forward change
        assert_eq!(parse_timestamp("2024-03-31 02:30", paris), None);

        let doc = json!({ "created_at": "2024-05-15 10:00" });
        let record = Record::from_json(&doc, &registry(), paris).unwrap();
        assert_eq!(
            record.get_value("created_at"),
            &Value::DateTime(Utc.with_ymd_and_hms(2024, 5, 15, 8, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_to_json_without_source() {
        let record = Record::new()
            .with("age", Value::Integer(3))
            .with("name", Value::String("x".into()));
        assert_eq!(record.to_json(), json!({ "age": 3, "name": "x" }));
    }
}
