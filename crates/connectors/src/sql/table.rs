use crate::{
    adapter::Adapter,
    error::ConnectorError,
    sql::{dialect::SqlDialect, filter::SqlFilter},
};
use model::core::value::Value;
use tracing::debug;

/// A table reached through SQL. Filtering it yields the statement to run.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlTable {
    pub name: String,
    pub dialect: SqlDialect,
}

/// A rendered `SELECT` and its bound parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlSelect {
    pub sql: String,
    pub params: Vec<Value>,
}

impl SqlTable {
    pub fn new(name: impl Into<String>, dialect: SqlDialect) -> Self {
        SqlTable {
            name: name.into(),
            dialect,
        }
    }

    pub fn select(&self, filter: &SqlFilter) -> SqlSelect {
        let (clause, params) = filter.to_sql(self.dialect);
        SqlSelect {
            sql: format!("SELECT * FROM {}{}", self.name, clause),
            params,
        }
    }
}

impl Adapter for SqlTable {
    type Filter = SqlFilter;
    type Output = SqlSelect;

    fn fetch(&self, filter: &Self::Filter) -> Result<Self::Output, ConnectorError> {
        let select = self.select(filter);
        debug!(sql = %select.sql, params = select.params.len(), "Rendered select");
        Ok(select)
    }
}
