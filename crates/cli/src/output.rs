use crate::error::CliError;
use connectors::sql::table::SqlSelect;
use model::{core::value::Value, records::record::Record};
use serde::Serialize;
use serde_json::Value as JsonValue;

#[derive(Serialize)]
struct SqlReport {
    sql: String,
    params: Vec<JsonValue>,
}

fn param_json(value: &Value) -> JsonValue {
    match value {
        Value::Integer(n) => JsonValue::from(*n),
        Value::Boolean(b) => JsonValue::from(*b),
        Value::Null => JsonValue::Null,
        other => JsonValue::from(other.as_text().unwrap_or_default()),
    }
}

pub fn records_json(records: &[Record]) -> Result<String, CliError> {
    let documents = records.iter().map(Record::to_json).collect::<Vec<_>>();
    Ok(serde_json::to_string_pretty(&documents)?)
}

pub fn select_json(select: &SqlSelect) -> Result<String, CliError> {
    let report = SqlReport {
        sql: select.sql.clone(),
        params: select.params.iter().map(param_json).collect(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

pub async fn write(json: String, path: Option<String>) -> Result<(), CliError> {
    match path {
        Some(path) => tokio::fs::write(path, json).await?,
        None => println!("{json}"),
    }
    Ok(())
}
