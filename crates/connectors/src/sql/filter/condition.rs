use crate::sql::dialect::SqlParams;
use model::core::value::Value;
use std::fmt;

/// Which side(s) of a `LIKE` pattern are left open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeAnchor {
    /// `%value%`
    Anywhere,
    /// `value%`
    Start,
    /// `%value`
    End,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SqlComparator {
    Equal(Value),
    GreaterThan(Value),
    GreaterOrEqual(Value),
    LessThan(Value),
    LessOrEqual(Value),
    Like(String, LikeAnchor),
    Between {
        first: Value,
        last: Value,
        end_excluded: bool,
    },
}

/// A single table-column filter condition
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub table: Option<String>,
    pub column: String,
    pub comparator: SqlComparator,
}

impl Condition {
    pub fn column_ref(&self) -> String {
        match &self.table {
            Some(table) => format!("{}.{}", table, self.column),
            None => self.column.clone(),
        }
    }

    /// Render just this one condition as SQL, binding its values.
    pub fn to_sql_fragment(&self, params: &mut SqlParams) -> String {
        let column = self.column_ref();
        match &self.comparator {
            SqlComparator::Equal(v) => format!("{column} = {}", params.bind(v.clone())),
            SqlComparator::GreaterThan(v) => format!("{column} > {}", params.bind(v.clone())),
            SqlComparator::GreaterOrEqual(v) => {
                format!("{column} >= {}", params.bind(v.clone()))
            }
            SqlComparator::LessThan(v) => format!("{column} < {}", params.bind(v.clone())),
            SqlComparator::LessOrEqual(v) => format!("{column} <= {}", params.bind(v.clone())),
            SqlComparator::Like(text, anchor) => {
                let placeholder = params.bind(Value::String(like_pattern(text, *anchor)));
                params.dialect().text_like(&column, &placeholder)
            }
            SqlComparator::Between {
                first,
                last,
                end_excluded,
            } => {
                let lower = params.bind(first.clone());
                let upper = params.bind(last.clone());
                let op = if *end_excluded { "<" } else { "<=" };
                format!("({column} >= {lower} AND {column} {op} {upper})")
            }
        }
    }
}

/// Escapes `LIKE` metacharacters and opens the requested side(s).
pub fn like_pattern(text: &str, anchor: LikeAnchor) -> String {
    let mut escaped = String::with_capacity(text.len() + 2);
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }

    match anchor {
        LikeAnchor::Anywhere => format!("%{escaped}%"),
        LikeAnchor::Start => format!("{escaped}%"),
        LikeAnchor::End => format!("%{escaped}"),
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut params = SqlParams::default();
        write!(f, "{}", self.to_sql_fragment(&mut params))
    }
}
