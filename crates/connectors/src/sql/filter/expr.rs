use super::condition::Condition;
use crate::sql::dialect::SqlParams;

/// A full boolean expression for SQL filtering
#[derive(Debug, Clone, PartialEq)]
pub enum SqlFilterExpr {
    /// A single leaf condition
    Leaf(Condition),

    /// An AND of sub-expressions; empty means "always true"
    And(Vec<SqlFilterExpr>),

    /// An OR of sub-expressions; empty means "always false"
    Or(Vec<SqlFilterExpr>),

    Not(Box<SqlFilterExpr>),

    /// Matches no row (`1 = 0`)
    Never,
}

impl SqlFilterExpr {
    pub fn leaf(cond: Condition) -> Self {
        SqlFilterExpr::Leaf(cond)
    }

    pub fn and(exprs: Vec<SqlFilterExpr>) -> Self {
        SqlFilterExpr::And(exprs)
    }

    pub fn or(exprs: Vec<SqlFilterExpr>) -> Self {
        SqlFilterExpr::Or(exprs)
    }

    pub fn not(expr: SqlFilterExpr) -> Self {
        SqlFilterExpr::Not(Box::new(expr))
    }

    /// Render this expression as SQL, binding values into `params` in
    /// left-to-right order.
    pub fn to_sql(&self, params: &mut SqlParams) -> String {
        match self {
            SqlFilterExpr::Leaf(cond) => cond.to_sql_fragment(params),
            SqlFilterExpr::And(exprs) if exprs.is_empty() => "1 = 1".to_string(),
            SqlFilterExpr::Or(exprs) if exprs.is_empty() => "1 = 0".to_string(),
            SqlFilterExpr::And(exprs) => {
                let exprs = exprs.iter().map(|e| e.to_sql(params)).collect::<Vec<_>>();
                format!("({})", exprs.join(" AND "))
            }
            SqlFilterExpr::Or(exprs) => {
                let exprs = exprs.iter().map(|e| e.to_sql(params)).collect::<Vec<_>>();
                format!("({})", exprs.join(" OR "))
            }
            SqlFilterExpr::Not(expr) => format!("NOT ({})", expr.to_sql(params)),
            SqlFilterExpr::Never => "1 = 0".to_string(),
        }
    }
}
