use crate::core::semantic_type::SemanticType;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt};

/// A scalar of one of the four semantic types.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Value {
    Integer(i64),
    String(String),
    Boolean(bool),
    DateTime(DateTime<Utc>),
    Null,
}

impl Value {
    pub fn semantic_type(&self) -> Option<SemanticType> {
        match self {
            Value::Integer(_) => Some(SemanticType::Integer),
            Value::String(_) => Some(SemanticType::String),
            Value::Boolean(_) => Some(SemanticType::Boolean),
            Value::DateTime(_) => Some(SemanticType::DateTime),
            Value::Null => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Text form of the value; datetimes are RFC 3339.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::Integer(v) => Some(v.to_string()),
            Value::String(v) => Some(v.clone()),
            Value::Boolean(v) => Some(v.to_string()),
            Value::DateTime(v) => Some(v.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Value::Null => None,
        }
    }

    /// Text form a Postgres `CAST(... AS TEXT)` gives for the value in a UTC
    /// session: datetimes read `2024-05-15 09:00:00+00`. Pattern matches test
    /// this form.
    pub fn cast_text(&self) -> Option<String> {
        match self {
            Value::DateTime(v) => {
                let seconds = v.format("%Y-%m-%d %H:%M:%S");
                // microsecond precision, trailing zeros trimmed
                let fraction = format!("{:06}", v.timestamp_subsec_micros());
                let fraction = fraction.trim_end_matches('0');
                if fraction.is_empty() {
                    Some(format!("{seconds}+00"))
                } else {
                    Some(format!("{seconds}.{fraction}+00"))
                }
            }
            other => other.as_text(),
        }
    }

    /// Orders two values of the same type. Mixed types and nulls are
    /// unordered.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        use Value::*;
        match (self, other) {
            (Integer(a), Integer(b)) => Some(a.cmp(b)),
            (String(a), String(b)) => Some(a.cmp(b)),
            (Boolean(a), Boolean(b)) => Some(a.cmp(b)),
            (DateTime(a), DateTime(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    pub fn equal(&self, other: &Value) -> bool {
        self.compare(other) == Some(Ordering::Equal)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{s:?}"),
            Value::Null => write!(f, "null"),
            other => write!(f, "{}", other.as_text().unwrap_or_default()),
        }
    }
}

/// A value after casting to a field's semantic type.
///
/// Range endpoints are always scalars; a datetime phrase that names a span
/// has already been flattened into its start or end.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CastedValue {
    Scalar(Value),
    Range {
        first: Value,
        last: Value,
        end_excluded: bool,
    },
}

impl CastedValue {
    pub fn range(first: Value, last: Value, end_excluded: bool) -> Self {
        CastedValue::Range {
            first,
            last,
            end_excluded,
        }
    }

    /// True when any part of the value failed to resolve.
    pub fn has_null(&self) -> bool {
        match self {
            CastedValue::Scalar(v) => v.is_null(),
            CastedValue::Range { first, last, .. } => first.is_null() || last.is_null(),
        }
    }

    /// Lower bound: the scalar itself or the range's `first`.
    pub fn first(&self) -> &Value {
        match self {
            CastedValue::Scalar(v) => v,
            CastedValue::Range { first, .. } => first,
        }
    }

    /// Upper bound: the scalar itself or the range's `last`.
    pub fn last(&self) -> &Value {
        match self {
            CastedValue::Scalar(v) => v,
            CastedValue::Range { last, .. } => last,
        }
    }

    pub fn end_excluded(&self) -> bool {
        matches!(
            self,
            CastedValue::Range {
                end_excluded: true,
                ..
            }
        )
    }
}

impl From<Value> for CastedValue {
    fn from(value: Value) -> Self {
        CastedValue::Scalar(value)
    }
}

impl fmt::Display for CastedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CastedValue::Scalar(v) => write!(f, "{v}"),
            CastedValue::Range {
                first,
                last,
                end_excluded,
            } => {
                let op = if *end_excluded { "..." } else { ".." };
                write!(f, "{first}{op}{last}")
            }
        }
    }
}
