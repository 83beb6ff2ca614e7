use super::compiler::FilterCompiler;
use crate::predicate::{Condition, ConditionKind, Predicate};
use connectors::memory::filter::{MemoryComparator, MemoryCondition, MemoryFilter, MemoryFilterExpr};

pub struct MemoryFilterCompiler;

impl FilterCompiler for MemoryFilterCompiler {
    type Filter = MemoryFilter;

    fn compile(predicate: &Predicate) -> Self::Filter {
        MemoryFilter::with_expr(compile_memory_expr(predicate))
    }
}

fn compile_memory_expr(predicate: &Predicate) -> MemoryFilterExpr {
    match predicate {
        Predicate::Leaf(condition) => MemoryFilterExpr::leaf(from_condition(condition)),
        Predicate::And(children) => {
            MemoryFilterExpr::and(children.iter().map(compile_memory_expr).collect())
        }
        Predicate::Or(children) => {
            MemoryFilterExpr::or(children.iter().map(compile_memory_expr).collect())
        }
        Predicate::Not(inner) => MemoryFilterExpr::not(compile_memory_expr(inner)),
        Predicate::Never => MemoryFilterExpr::Never,
    }
}

fn from_condition(condition: &Condition) -> MemoryCondition {
    let value = &condition.value;
    let pattern = || value.first().cast_text().unwrap_or_default();

    let op = match condition.kind {
        ConditionKind::Equal => MemoryComparator::Equal(value.first().clone()),
        ConditionKind::Greater => MemoryComparator::GreaterThan(value.first().clone()),
        ConditionKind::GreaterOrEqual => MemoryComparator::GreaterThanOrEqual(value.first().clone()),
        ConditionKind::Less => MemoryComparator::LessThan(value.first().clone()),
        ConditionKind::LessOrEqual => MemoryComparator::LessThanOrEqual(value.first().clone()),
        ConditionKind::Contains => MemoryComparator::Contains(pattern()),
        ConditionKind::StartsWith => MemoryComparator::StartsWith(pattern()),
        ConditionKind::EndsWith => MemoryComparator::EndsWith(pattern()),
        ConditionKind::Between => MemoryComparator::Between {
            first: value.first().clone(),
            last: value.last().clone(),
            end_excluded: value.end_excluded(),
        },
    };

    // records are keyed by the locator's column
    MemoryCondition {
        column: condition.field.locator.column.clone(),
        op,
    }
}
