//! The typed predicate tree a query compiles to.

pub mod builder;

use model::{core::value::CastedValue, field::FieldDescriptor};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionKind {
    Equal,
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
    /// Case-sensitive substring of the field's text form
    Contains,
    StartsWith,
    EndsWith,
    /// `first <= x <= last`, or `x < last` when the range excludes its end
    Between,
}

impl ConditionKind {
    pub fn name(&self) -> &'static str {
        match self {
            ConditionKind::Equal => "eq",
            ConditionKind::Greater => "gt",
            ConditionKind::GreaterOrEqual => "gte",
            ConditionKind::Less => "lt",
            ConditionKind::LessOrEqual => "lte",
            ConditionKind::Contains => "contains",
            ConditionKind::StartsWith => "starts_with",
            ConditionKind::EndsWith => "ends_with",
            ConditionKind::Between => "between",
        }
    }
}

/// A leaf: one field compared against one casted value.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: FieldDescriptor,
    pub kind: ConditionKind,
    pub value: CastedValue,
}

impl Condition {
    pub fn new(field: FieldDescriptor, kind: ConditionKind, value: impl Into<CastedValue>) -> Self {
        Condition {
            field,
            kind,
            value: value.into(),
        }
    }
}

/// Boolean composition of conditions. Built bottom-up and never mutated;
/// its shape mirrors the parse tree it came from.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Leaf(Condition),
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    Not(Box<Predicate>),
    /// Matches nothing
    Never,
}

impl Predicate {
    pub fn leaf(condition: Condition) -> Self {
        Predicate::Leaf(condition)
    }

    pub fn and(left: Predicate, right: Predicate) -> Self {
        Predicate::And(vec![left, right])
    }

    pub fn or(left: Predicate, right: Predicate) -> Self {
        Predicate::Or(vec![left, right])
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(inner: Predicate) -> Self {
        Predicate::Not(Box::new(inner))
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            Predicate::Leaf(_) => 1,
            Predicate::And(children) | Predicate::Or(children) => {
                children.iter().map(Predicate::leaf_count).sum()
            }
            Predicate::Not(inner) => inner.leaf_count(),
            Predicate::Never => 0,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}, {})", self.kind.name(), self.field.name, self.value)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Leaf(condition) => write!(f, "{condition}"),
            Predicate::And(items) => write_call(f, "and", items),
            Predicate::Or(items) => write_call(f, "or", items),
            Predicate::Not(inner) => write!(f, "not({inner})"),
            Predicate::Never => write!(f, "never"),
        }
    }
}

fn write_call(f: &mut fmt::Formatter<'_>, name: &str, items: &[Predicate]) -> fmt::Result {
    write!(f, "{name}(")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    write!(f, ")")
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::core::{semantic_type::SemanticType, value::Value};

    #[test]
    fn test_display_s_expression() {
        let age = FieldDescriptor::column("age", SemanticType::Integer);
        let name = FieldDescriptor::column("name", SemanticType::String);

        let predicate = Predicate::and(
            Predicate::leaf(Condition::new(age.clone(), ConditionKind::Greater, Value::Integer(30))),
            Predicate::not(Predicate::Or(vec![
                Predicate::leaf(Condition::new(
                    name,
                    ConditionKind::Contains,
                    Value::String("dor".into()),
                )),
                Predicate::leaf(Condition::new(
                    age,
                    ConditionKind::Between,
                    CastedValue::range(Value::Integer(1), Value::Integer(5), true),
                )),
                Predicate::Never,
            ])),
        );

        assert_eq!(
            predicate.to_string(),
            r#"and(gt(age, 30), not(or(contains(name, "dor"), between(age, 1...5), never)))"#
        );
        assert_eq!(predicate.leaf_count(), 3);
    }
}
