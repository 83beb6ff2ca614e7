use crate::sql::dialect::{SqlDialect, SqlParams};
use expr::SqlFilterExpr;
use model::core::value::Value;

pub mod condition;
pub mod expr;

/// An optional SQL filter expression.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlFilter {
    pub expr: Option<SqlFilterExpr>,
}

impl SqlFilter {
    pub fn new() -> Self {
        SqlFilter { expr: None }
    }

    pub fn with_expr(expr: SqlFilterExpr) -> Self {
        SqlFilter { expr: Some(expr) }
    }

    /// Render " WHERE ..." (or an empty string if no expr) and the values
    /// bound to its placeholders.
    pub fn to_sql(&self, dialect: SqlDialect) -> (String, Vec<Value>) {
        let mut params = SqlParams::new(dialect);
        let clause = self
            .expr
            .as_ref()
            .map(|e| format!(" WHERE {}", e.to_sql(&mut params)))
            .unwrap_or_default();
        (clause, params.into_values())
    }
}
