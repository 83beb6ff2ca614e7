use super::compiler::FilterCompiler;
use crate::predicate::{Condition, ConditionKind, Predicate};
use connectors::sql::filter::{
    SqlFilter,
    condition::{Condition as SqlCondition, LikeAnchor, SqlComparator},
    expr::SqlFilterExpr,
};

pub struct SqlFilterCompiler;

impl FilterCompiler for SqlFilterCompiler {
    type Filter = SqlFilter;

    fn compile(predicate: &Predicate) -> Self::Filter {
        SqlFilter::with_expr(compile_sql_expr(predicate))
    }
}

fn compile_sql_expr(predicate: &Predicate) -> SqlFilterExpr {
    match predicate {
        Predicate::Leaf(condition) => SqlFilterExpr::leaf(from_condition(condition)),
        Predicate::And(children) => {
            SqlFilterExpr::and(children.iter().map(compile_sql_expr).collect())
        }
        Predicate::Or(children) => SqlFilterExpr::or(children.iter().map(compile_sql_expr).collect()),
        Predicate::Not(inner) => SqlFilterExpr::not(compile_sql_expr(inner)),
        Predicate::Never => SqlFilterExpr::Never,
    }
}

fn from_condition(condition: &Condition) -> SqlCondition {
    let value = &condition.value;
    let pattern = || value.first().cast_text().unwrap_or_default();

    let comparator = match condition.kind {
        ConditionKind::Equal => SqlComparator::Equal(value.first().clone()),
        ConditionKind::Greater => SqlComparator::GreaterThan(value.first().clone()),
        ConditionKind::GreaterOrEqual => SqlComparator::GreaterOrEqual(value.first().clone()),
        ConditionKind::Less => SqlComparator::LessThan(value.first().clone()),
        ConditionKind::LessOrEqual => SqlComparator::LessOrEqual(value.first().clone()),
        ConditionKind::Contains => SqlComparator::Like(pattern(), LikeAnchor::Anywhere),
        ConditionKind::StartsWith => SqlComparator::Like(pattern(), LikeAnchor::Start),
        ConditionKind::EndsWith => SqlComparator::Like(pattern(), LikeAnchor::End),
        ConditionKind::Between => SqlComparator::Between {
            first: value.first().clone(),
            last: value.last().clone(),
            end_excluded: value.end_excluded(),
        },
    };

    let locator = &condition.field.locator;
    SqlCondition {
        table: locator.table.clone(),
        column: locator.column.clone(),
        comparator,
    }
}
