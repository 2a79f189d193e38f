//! Conversions between domain types and SQLite rows/values, plus the
//! parameterized `SELECT` builder for list queries.

use census_core::{
  filter::{FilterValue, ListQuery},
  person::Person,
};
use rusqlite::types::Value;

/// Column list shared by every `SELECT`; order matches [`person_from_row`].
pub const PERSON_COLUMNS: &str = "id, name, surname, patronymic, age, gender, nationality";

pub fn person_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Person> {
  Ok(Person {
    id:          row.get(0)?,
    name:        row.get(1)?,
    surname:     row.get(2)?,
    patronymic:  row.get(3)?,
    age:         row.get(4)?,
    gender:      row.get(5)?,
    nationality: row.get(6)?,
  })
}

pub fn encode_filter_value(value: &FilterValue) -> Value {
  match value {
    FilterValue::Integer(i) => Value::Integer(*i),
    FilterValue::Text(s) => Value::Text(s.clone()),
  }
}

/// Build the SQL text and positional parameters for a list query.
///
/// Only [`Field::column`](census_core::filter::Field::column) names reach the
/// SQL text; every value, including paging, is a bound `?N` parameter.
pub fn encode_list_query(query: &ListQuery) -> (String, Vec<Value>) {
  let mut params: Vec<Value> = Vec::with_capacity(query.conditions().len() + 2);
  let mut conds: Vec<String> = Vec::with_capacity(query.conditions().len());

  for cond in query.conditions() {
    params.push(encode_filter_value(&cond.value));
    conds.push(format!("{} = ?{}", cond.field.column(), params.len()));
  }

  let where_clause = if conds.is_empty() {
    String::new()
  } else {
    format!(" WHERE {}", conds.join(" AND "))
  };

  params.push(Value::Integer(i64::from(query.limit)));
  let limit_idx = params.len();
  params.push(Value::Integer(i64::from(query.offset)));
  let offset_idx = params.len();

  let sql = format!(
    "SELECT {PERSON_COLUMNS} FROM people{where_clause} ORDER BY id LIMIT ?{limit_idx} OFFSET ?{offset_idx}"
  );
  (sql, params)
}
