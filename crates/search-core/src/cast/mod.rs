//! Casting of raw query values to a field's semantic type.
//!
//! Casting is permissive by default: text that does not read as the target
//! type falls back to a sentinel instead of failing the whole query.
//!
//! | Type     | Fallback |
//! |----------|----------|
//! | Integer  | leading digits (`"12abc"` → 12), otherwise `0`; floats truncate, booleans are `1`/`0` |
//! | Boolean  | `true t yes y on 1` are true, anything else is false |
//! | DateTime | `Null` when the phrase does not resolve, which matches nothing |
//! | String   | always the text form |
//!
//! With [`CastingPolicy::Strict`] any fallback is reported as
//! [`CompileError::UncastableValue`] instead.

pub mod date;

use crate::{
    cast::date::{DateResolver, PhraseResolver, Resolved},
    error::CompileError,
};
use chrono::SecondsFormat;
use model::{
    config::CastingPolicy,
    core::{semantic_type::SemanticType, value::CastedValue, value::Value},
    field::FieldDescriptor,
};
use query_syntax::{Literal, RawValue};

const TRUTHY: [&str; 6] = ["true", "t", "yes", "y", "on", "1"];
const FALSY: [&str; 6] = ["false", "f", "no", "n", "off", "0"];

#[derive(Debug, Clone, Copy)]
enum Endpoint {
    First,
    Last,
}

#[derive(Debug, Clone, Default)]
pub struct ValueCaster<R = PhraseResolver> {
    resolver: R,
    policy: CastingPolicy,
}

impl<R: DateResolver> ValueCaster<R> {
    pub fn new(resolver: R) -> Self {
        ValueCaster {
            resolver,
            policy: CastingPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: CastingPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> CastingPolicy {
        self.policy
    }

    /// Casts `raw` to the declared type of `field`.
    pub fn cast(&self, field: &FieldDescriptor, raw: &RawValue) -> Result<CastedValue, CompileError> {
        if self.policy == CastingPolicy::Strict {
            self.check_exact(field, raw)?;
        }

        Ok(match field.semantic_type {
            SemanticType::Integer => self.cast_integer(raw),
            SemanticType::String => self.cast_string(raw),
            SemanticType::Boolean => self.cast_boolean(raw),
            SemanticType::DateTime => self.cast_datetime(raw),
        })
    }

    pub fn cast_integer(&self, raw: &RawValue) -> CastedValue {
        cast_each(raw, |lit| Value::Integer(integer_of(lit)))
    }

    pub fn cast_string(&self, raw: &RawValue) -> CastedValue {
        cast_each(raw, |lit| Value::String(lit.as_text()))
    }

    pub fn cast_boolean(&self, raw: &RawValue) -> CastedValue {
        cast_each(raw, |lit| Value::Boolean(boolean_of(lit)))
    }

    /// A phrase naming a span casts to a range; inside an explicit range,
    /// a span endpoint contributes its start (`first`) or its end (`last`).
    pub fn cast_datetime(&self, raw: &RawValue) -> CastedValue {
        match raw {
            RawValue::Scalar(lit) => match self.resolver.resolve(&lit.as_text()) {
                Some(Resolved::Instant(t)) => CastedValue::Scalar(Value::DateTime(t)),
                Some(Resolved::Span { start, end }) => {
                    CastedValue::range(Value::DateTime(start), Value::DateTime(end), false)
                }
                None => CastedValue::Scalar(Value::Null),
            },
            RawValue::Range {
                first,
                last,
                end_excluded,
            } => CastedValue::range(
                self.endpoint(first, Endpoint::First),
                self.endpoint(last, Endpoint::Last),
                *end_excluded,
            ),
        }
    }

    fn endpoint(&self, lit: &Literal, position: Endpoint) -> Value {
        match (self.resolver.resolve(&lit.as_text()), position) {
            (Some(resolved), Endpoint::First) => Value::DateTime(resolved.start()),
            (Some(resolved), Endpoint::Last) => Value::DateTime(resolved.end()),
            (None, _) => Value::Null,
        }
    }

    fn check_exact(&self, field: &FieldDescriptor, raw: &RawValue) -> Result<(), CompileError> {
        let literals = match raw {
            RawValue::Scalar(lit) => vec![lit],
            RawValue::Range { first, last, .. } => vec![first, last],
        };

        for lit in literals {
            let exact = match field.semantic_type {
                SemanticType::Integer => exact_integer(lit).is_some(),
                SemanticType::String => true,
                SemanticType::Boolean => exact_boolean(lit).is_some(),
                SemanticType::DateTime => self.resolver.resolve(&lit.as_text()).is_some(),
            };
            if !exact {
                return Err(CompileError::UncastableValue {
                    field: field.name.clone(),
                    value: lit.as_text(),
                });
            }
        }

        Ok(())
    }
}

/// Literal that casts back to `value`; `None` for nulls.
pub fn to_literal(value: &Value) -> Option<Literal> {
    match value {
        Value::Integer(n) => Some(Literal::Integer(*n)),
        Value::String(s) => Some(Literal::String(s.clone())),
        Value::Boolean(b) => Some(Literal::Boolean(*b)),
        Value::DateTime(t) => Some(Literal::String(
            t.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        )),
        Value::Null => None,
    }
}

fn cast_each(raw: &RawValue, scalar: impl Fn(&Literal) -> Value) -> CastedValue {
    match raw {
        RawValue::Scalar(lit) => CastedValue::Scalar(scalar(lit)),
        RawValue::Range {
            first,
            last,
            end_excluded,
        } => CastedValue::range(scalar(first), scalar(last), *end_excluded),
    }
}

fn integer_of(lit: &Literal) -> i64 {
    match lit {
        Literal::Integer(n) => *n,
        // `as` saturates and maps NaN to 0
        Literal::Float(f) => f.trunc() as i64,
        Literal::Boolean(b) => i64::from(*b),
        Literal::String(s) => leading_integer(s),
    }
}

fn exact_integer(lit: &Literal) -> Option<i64> {
    match lit {
        Literal::Integer(n) => Some(*n),
        Literal::Float(f) if f.fract() == 0.0 => Some(*f as i64),
        Literal::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn leading_integer(text: &str) -> i64 {
    let text = text.trim_start();
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    digits
        .chars()
        .map_while(|c| c.to_digit(10))
        .fold(0i64, |acc, d| {
            let acc = acc.saturating_mul(10);
            if negative {
                acc.saturating_sub(i64::from(d))
            } else {
                acc.saturating_add(i64::from(d))
            }
        })
}

fn boolean_of(lit: &Literal) -> bool {
    match lit {
        Literal::Boolean(b) => *b,
        Literal::Integer(n) => *n != 0,
        Literal::Float(f) => *f != 0.0,
        Literal::String(s) => TRUTHY.contains(&s.trim().to_lowercase().as_str()),
    }
}

fn exact_boolean(lit: &Literal) -> Option<bool> {
    match lit {
        Literal::Boolean(b) => Some(*b),
        Literal::Integer(0) => Some(false),
        Literal::Integer(1) => Some(true),
        Literal::String(s) => {
            let token = s.trim().to_lowercase();
            if TRUTHY.contains(&token.as_str()) {
                Some(true)
            } else if FALSY.contains(&token.as_str()) {
                Some(false)
            } else {
                None
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeDelta, TimeZone, Utc};
    use chrono_tz::Tz;

    fn reference() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 15, 14, 30, 0).unwrap()
    }

    fn caster() -> ValueCaster {
        ValueCaster::new(PhraseResolver::at(Tz::UTC, reference()))
    }

    fn scalar(value: Value) -> CastedValue {
        CastedValue::Scalar(value)
    }

    #[test]
    fn test_integer_sentinels() {
        let c = caster();
        assert_eq!(c.cast_integer(&"42".into()), scalar(Value::Integer(42)));
        assert_eq!(c.cast_integer(&"12abc".into()), scalar(Value::Integer(12)));
        assert_eq!(c.cast_integer(&" -7x".into()), scalar(Value::Integer(-7)));
        assert_eq!(c.cast_integer(&"abc".into()), scalar(Value::Integer(0)));
        assert_eq!(
            c.cast_integer(&RawValue::Scalar(Literal::Float(3.9))),
            scalar(Value::Integer(3))
        );
        assert_eq!(c.cast_integer(&true.into()), scalar(Value::Integer(1)));
        assert_eq!(
            c.cast_integer(&"99999999999999999999999".into()),
            scalar(Value::Integer(i64::MAX))
        );
    }

    #[test]
    fn test_integer_range_keeps_exclusivity() {
        let c = caster();
        let casted = c.cast_integer(&RawValue::range(1_i64, 5_i64, true));
        assert_eq!(
            casted,
            CastedValue::range(Value::Integer(1), Value::Integer(5), true)
        );
    }

    #[test]
    fn test_boolean_tokens() {
        let c = caster();
        for token in ["true", "T", "yes", "Y", "on", "1"] {
            assert_eq!(c.cast_boolean(&token.into()), scalar(Value::Boolean(true)));
        }
        for token in ["false", "no", "0", "maybe", ""] {
            assert_eq!(c.cast_boolean(&token.into()), scalar(Value::Boolean(false)));
        }
        assert_eq!(c.cast_boolean(&2_i64.into()), scalar(Value::Boolean(true)));
    }

    #[test]
    fn test_string_is_text_form() {
        let c = caster();
        assert_eq!(c.cast_string(&30_i64.into()), scalar(Value::String("30".into())));
        assert_eq!(c.cast_string(&false.into()), scalar(Value::String("false".into())));
    }

    #[test]
    fn test_datetime_phrase_flattens_span() {
        let c = caster();
        let start = Utc.with_ymd_and_hms(2024, 5, 15, 0, 0, 0).unwrap();
        let end = start + TimeDelta::days(1) - TimeDelta::nanoseconds(1);

        assert_eq!(
            c.cast_datetime(&"today".into()),
            CastedValue::range(Value::DateTime(start), Value::DateTime(end), false)
        );

        let casted = c.cast_datetime(&RawValue::range("yesterday", "today", true));
        assert_eq!(
            casted,
            CastedValue::range(
                Value::DateTime(start - TimeDelta::days(1)),
                Value::DateTime(end),
                true
            )
        );
    }

    #[test]
    fn test_datetime_unresolved_is_null() {
        let c = caster();
        assert_eq!(c.cast_datetime(&"someday".into()), scalar(Value::Null));
        assert!(c.cast_datetime(&RawValue::range("someday", "today", false)).has_null());
    }

    #[test]
    fn test_strict_policy_rejects_fallbacks() {
        let c = caster().with_policy(CastingPolicy::Strict);
        let age = FieldDescriptor::column("age", SemanticType::Integer);
        let active = FieldDescriptor::column("active", SemanticType::Boolean);
        let born = FieldDescriptor::column("born", SemanticType::DateTime);

        assert!(c.cast(&age, &"12".into()).is_ok());
        assert!(matches!(
            c.cast(&age, &"12abc".into()),
            Err(CompileError::UncastableValue { field, value }) if field == "age" && value == "12abc"
        ));
        assert!(c.cast(&active, &"off".into()).is_ok());
        assert!(c.cast(&active, &"maybe".into()).is_err());
        assert!(c.cast(&born, &RawValue::range("2024-01-01", "later", false)).is_err());
    }

    #[test]
    fn test_recast_is_idempotent() {
        let c = caster();
        let age = FieldDescriptor::column("age", SemanticType::Integer);
        let born = FieldDescriptor::column("born", SemanticType::DateTime);

        for (field, raw) in [
            (&age, RawValue::from("12abc")),
            (&born, RawValue::from("2024-05-15 10:00")),
        ] {
            let once = c.cast(field, &raw).unwrap();
            let CastedValue::Scalar(value) = &once else {
                panic!("expected scalar, got {once}");
            };
            let again = c
                .cast(field, &RawValue::Scalar(to_literal(value).unwrap()))
                .unwrap();
            assert_eq!(once, again);
        }
    }
}
