use model::core::value::Value;
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SqlDialect {
    #[default]
    Postgres,
    MySql,
}

impl SqlDialect {
    /// Case-sensitive `LIKE` of a column's text form against a bound
    /// pattern.
    pub fn text_like(&self, column: &str, placeholder: &str) -> String {
        match self {
            SqlDialect::Postgres => format!("CAST({column} AS TEXT) LIKE {placeholder}"),
            // the default MySQL collations compare case-insensitively
            SqlDialect::MySql => {
                format!("CAST({column} AS CHAR) COLLATE utf8mb4_bin LIKE {placeholder}")
            }
        }
    }
}

impl FromStr for SqlDialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(SqlDialect::Postgres),
            "mysql" => Ok(SqlDialect::MySql),
            _ => Err(format!("Unsupported SQL dialect: {s}")),
        }
    }
}

impl fmt::Display for SqlDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlDialect::Postgres => write!(f, "postgres"),
            SqlDialect::MySql => write!(f, "mysql"),
        }
    }
}

/// Bound parameters collected while rendering a statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlParams {
    dialect: SqlDialect,
    values: Vec<Value>,
}

impl SqlParams {
    pub fn new(dialect: SqlDialect) -> Self {
        SqlParams {
            dialect,
            values: Vec::new(),
        }
    }

    pub fn dialect(&self) -> SqlDialect {
        self.dialect
    }

    /// Binds `value` and returns its placeholder.
    pub fn bind(&mut self, value: Value) -> String {
        self.values.push(value);
        match self.dialect {
            SqlDialect::Postgres => format!("${}", self.values.len()),
            SqlDialect::MySql => "?".to_string(),
        }
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders() {
        let mut pg = SqlParams::new(SqlDialect::Postgres);
        assert_eq!(pg.bind(Value::Integer(1)), "$1");
        assert_eq!(pg.bind(Value::Integer(2)), "$2");

        let mut my = SqlParams::new(SqlDialect::MySql);
        assert_eq!(my.bind(Value::Integer(1)), "?");
        assert_eq!(my.into_values(), vec![Value::Integer(1)]);
    }

    #[test]
    fn test_text_like_is_case_sensitive() {
        assert_eq!(
            SqlDialect::Postgres.text_like("people.full_name", "$1"),
            "CAST(people.full_name AS TEXT) LIKE $1"
        );
        assert_eq!(
            SqlDialect::MySql.text_like("people.full_name", "?"),
            "CAST(people.full_name AS CHAR) COLLATE utf8mb4_bin LIKE ?"
        );
    }

    #[test]
    fn test_dialect_from_str() {
        assert_eq!("PG".parse::<SqlDialect>().unwrap(), SqlDialect::Postgres);
        assert_eq!("mysql".parse::<SqlDialect>().unwrap(), SqlDialect::MySql);
        assert!("oracle".parse::<SqlDialect>().is_err());
    }
}
