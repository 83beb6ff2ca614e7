//! Leaf construction: one field, one operator, one casted value.
//!
//! Each `(comparator, type)` pair maps to a condition kind, or to no match
//! at all. Booleans have no order beyond equality, so `>` and `<` never
//! match while `>=` and `<=` degrade to equality.
//!
//! A range value changes the leaf as follows: the matching comparators
//! (`: ~ = ^ $`) test `first <= x <= last` (or `x < last` when the end is
//! excluded), `>`/`>=` compare against `last`, and `<`/`<=` against `first`.

use crate::predicate::{Condition, ConditionKind, Predicate};
use model::{
    core::{semantic_type::SemanticType, value::CastedValue},
    field::FieldDescriptor,
};
use query_syntax::{Comparator, Operator};

/// Which part of a range an operator compares against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    Whole,
    First,
    Last,
}

fn bound(comparator: Comparator) -> Bound {
    match comparator {
        Comparator::Colon
        | Comparator::Matches
        | Comparator::Equal
        | Comparator::Prefix
        | Comparator::Suffix => Bound::Whole,
        Comparator::Greater | Comparator::GreaterOrEqual => Bound::Last,
        Comparator::Less | Comparator::LessOrEqual => Bound::First,
    }
}

/// The condition a comparator performs on a type; `None` never matches.
pub fn condition_kind(comparator: Comparator, ty: SemanticType) -> Option<ConditionKind> {
    use Comparator as C;
    use ConditionKind as K;
    use SemanticType as T;

    let kind = match (comparator, ty) {
        (C::Colon | C::Matches, T::String) => K::Contains,
        (C::Colon | C::Matches, T::Integer | T::Boolean | T::DateTime) => K::Equal,

        (C::Equal, T::Integer | T::String | T::Boolean | T::DateTime) => K::Equal,

        (C::Prefix, T::String) => K::StartsWith,
        (C::Prefix, T::Integer | T::Boolean | T::DateTime) => K::Equal,

        (C::Suffix, T::String) => K::EndsWith,
        (C::Suffix, T::Integer | T::Boolean | T::DateTime) => K::Equal,

        (C::Greater, T::Integer | T::String | T::DateTime) => K::Greater,
        (C::Greater, T::Boolean) => return None,

        (C::GreaterOrEqual, T::Integer | T::String | T::DateTime) => K::GreaterOrEqual,
        (C::GreaterOrEqual, T::Boolean) => K::Equal,

        (C::Less, T::Integer | T::String | T::DateTime) => K::Less,
        (C::Less, T::Boolean) => return None,

        (C::LessOrEqual, T::Integer | T::String | T::DateTime) => K::LessOrEqual,
        (C::LessOrEqual, T::Boolean) => K::Equal,
    };

    Some(kind)
}

/// Builds the predicate for `field <operator> value`. Negated operators
/// wrap the positive predicate in a `Not`.
pub fn build(field: &FieldDescriptor, operator: Operator, value: CastedValue) -> Predicate {
    let positive = build_positive(field, operator.comparator, value);
    if operator.negated {
        Predicate::not(positive)
    } else {
        positive
    }
}

fn build_positive(field: &FieldDescriptor, comparator: Comparator, value: CastedValue) -> Predicate {
    // an unresolved datetime cannot be compared with anything
    if value.has_null() {
        return Predicate::Never;
    }

    let Some(kind) = condition_kind(comparator, field.semantic_type) else {
        return Predicate::Never;
    };

    let condition = match (value, bound(comparator)) {
        (value @ CastedValue::Scalar(_), _) => Condition::new(field.clone(), kind, value),
        (range @ CastedValue::Range { .. }, Bound::Whole) => {
            Condition::new(field.clone(), ConditionKind::Between, range)
        }
        (CastedValue::Range { first, .. }, Bound::First) => {
            Condition::new(field.clone(), kind, first)
        }
        (CastedValue::Range { last, .. }, Bound::Last) => Condition::new(field.clone(), kind, last),
    };

    Predicate::leaf(condition)
}
