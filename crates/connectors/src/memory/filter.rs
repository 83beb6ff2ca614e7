use model::{core::value::Value, records::record::Record};
use std::cmp::Ordering;

/// An in-memory filter: holds an optional expression tree.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryFilter {
    expr: Option<MemoryFilterExpr>,
}

/// An expression over one or more leaf conditions.
#[derive(Clone, Debug, PartialEq)]
pub enum MemoryFilterExpr {
    Leaf(MemoryCondition),
    And(Vec<MemoryFilterExpr>),
    Or(Vec<MemoryFilterExpr>),
    Not(Box<MemoryFilterExpr>),
    /// Matches no record
    Never,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MemoryCondition {
    /// Record key the condition reads
    pub column: String,
    pub op: MemoryComparator,
}

#[derive(Clone, Debug, PartialEq)]
pub enum MemoryComparator {
    Equal(Value),
    GreaterThan(Value),
    GreaterThanOrEqual(Value),
    LessThan(Value),
    LessThanOrEqual(Value),
    /// Case-sensitive match against the text form of the column
    Contains(String),
    StartsWith(String),
    EndsWith(String),
    Between {
        first: Value,
        last: Value,
        end_excluded: bool,
    },
}

impl MemoryComparator {
    /// Tests one column value. A null column is unknown (`None`), as a SQL
    /// comparison against `NULL` would be.
    pub fn test(&self, actual: &Value) -> Option<bool> {
        if actual.is_null() {
            return None;
        }

        let outcome = match self {
            MemoryComparator::Equal(target) => actual.equal(target),
            MemoryComparator::GreaterThan(target) => {
                matches!(actual.compare(target), Some(Ordering::Greater))
            }
            MemoryComparator::GreaterThanOrEqual(target) => matches!(
                actual.compare(target),
                Some(Ordering::Greater) | Some(Ordering::Equal)
            ),
            MemoryComparator::LessThan(target) => {
                matches!(actual.compare(target), Some(Ordering::Less))
            }
            MemoryComparator::LessThanOrEqual(target) => matches!(
                actual.compare(target),
                Some(Ordering::Less) | Some(Ordering::Equal)
            ),
            MemoryComparator::Contains(pattern) => {
                text_matches(actual, |text| text.contains(pattern.as_str()))
            }
            MemoryComparator::StartsWith(pattern) => {
                text_matches(actual, |text| text.starts_with(pattern.as_str()))
            }
            MemoryComparator::EndsWith(pattern) => {
                text_matches(actual, |text| text.ends_with(pattern.as_str()))
            }
            MemoryComparator::Between {
                first,
                last,
                end_excluded,
            } => {
                let above = matches!(
                    actual.compare(first),
                    Some(Ordering::Greater) | Some(Ordering::Equal)
                );
                let below = match actual.compare(last) {
                    Some(Ordering::Less) => true,
                    Some(Ordering::Equal) => !end_excluded,
                    _ => false,
                };
                above && below
            }
        };
        Some(outcome)
    }
}

fn text_matches(actual: &Value, test: impl Fn(&str) -> bool) -> bool {
    actual.cast_text().is_some_and(|text| test(&text))
}

impl MemoryFilter {
    /// Create a new empty filter.
    pub fn new() -> Self {
        MemoryFilter { expr: None }
    }

    /// Create a new filter with the given expression.
    pub fn with_expr(expr: MemoryFilterExpr) -> Self {
        MemoryFilter { expr: Some(expr) }
    }

    /// Returns true if this record passes the filter (or if there's no filter).
    pub fn eval(&self, record: &Record) -> bool {
        match &self.expr {
            Some(expr) => expr.eval(record),
            None => true,
        }
    }
}

impl MemoryFilterExpr {
    pub fn leaf(cond: MemoryCondition) -> Self {
        MemoryFilterExpr::Leaf(cond)
    }

    pub fn and(exprs: Vec<MemoryFilterExpr>) -> Self {
        MemoryFilterExpr::And(exprs)
    }

    pub fn or(exprs: Vec<MemoryFilterExpr>) -> Self {
        MemoryFilterExpr::Or(exprs)
    }

    pub fn not(expr: MemoryFilterExpr) -> Self {
        MemoryFilterExpr::Not(Box::new(expr))
    }

    /// True only when the expression is known to hold for the record.
    pub fn eval(&self, record: &Record) -> bool {
        self.truth(record) == Some(true)
    }

    /// Three-valued evaluation: `None` is unknown, and `Not` keeps it
    /// unknown, so a row with a null column is dropped on both sides of a
    /// negation.
    pub fn truth(&self, record: &Record) -> Option<bool> {
        match self {
            MemoryFilterExpr::Leaf(cond) => cond.op.test(record.get_value(&cond.column)),
            MemoryFilterExpr::And(children) => {
                let mut outcome = Some(true);
                for child in children {
                    match child.truth(record) {
                        Some(false) => return Some(false),
                        None => outcome = None,
                        Some(true) => {}
                    }
                }
                outcome
            }
            MemoryFilterExpr::Or(children) => {
                let mut outcome = Some(false);
                for child in children {
                    match child.truth(record) {
                        Some(true) => return Some(true),
                        None => outcome = None,
                        Some(false) => {}
                    }
                }
                outcome
            }
            MemoryFilterExpr::Not(child) => child.truth(record).map(|b| !b),
            MemoryFilterExpr::Never => Some(false),
        }
    }
}
