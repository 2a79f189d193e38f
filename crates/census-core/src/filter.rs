//! List queries: an allow-list of filterable fields plus offset/limit paging.
//!
//! Filter keys arrive as raw query-string parameters. They are only ever
//! mapped onto a [`Field`]; anything else is rejected, so a storage backend
//! can use [`Field::column`] verbatim and bind the values as parameters.

use std::{fmt, str::FromStr};

use crate::{Error, Result};

pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

// ─── Field ────────────────────────────────────────────────────────────────────

/// A column of the `people` table that can be filtered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
  Id,
  Name,
  Surname,
  Patronymic,
  Age,
  Gender,
  Nationality,
}

impl Field {
  pub const ALL: [Field; 7] = [
    Field::Id,
    Field::Name,
    Field::Surname,
    Field::Patronymic,
    Field::Age,
    Field::Gender,
    Field::Nationality,
  ];

  /// The column name. Static, so it is safe to splice into SQL text.
  pub fn column(self) -> &'static str {
    match self {
      Field::Id => "id",
      Field::Name => "name",
      Field::Surname => "surname",
      Field::Patronymic => "patronymic",
      Field::Age => "age",
      Field::Gender => "gender",
      Field::Nationality => "nationality",
    }
  }

  fn is_integer(self) -> bool { matches!(self, Field::Id | Field::Age) }

  /// Convert a raw query-string value into a typed filter value.
  pub fn parse_value(self, raw: &str) -> Result<FilterValue> {
    if self.is_integer() {
      raw
        .trim()
        .parse()
        .map(FilterValue::Integer)
        .map_err(|_| Error::InvalidFilterValue { field: self.column(), value: raw.to_owned() })
    } else {
      Ok(FilterValue::Text(raw.to_owned()))
    }
  }
}

impl FromStr for Field {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    Field::ALL
      .into_iter()
      .find(|f| f.column() == s)
      .ok_or_else(|| Error::UnknownField(s.to_owned()))
  }
}

impl fmt::Display for Field {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.column()) }
}

// ─── Values ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
  Integer(i64),
  Text(String),
}

/// A single `field = value` equality condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
  pub field: Field,
  pub value: FilterValue,
}

// ─── Query ────────────────────────────────────────────────────────────────────

/// Parameters for [`PersonStore::list`](crate::store::PersonStore::list).
///
/// Conditions are kept sorted by field with at most one per field, which
/// keeps generated SQL deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
  conditions: Vec<Condition>,
  pub offset: u32,
  pub limit:  u32,
}

impl Default for ListQuery {
  fn default() -> Self { Self { conditions: Vec::new(), offset: 0, limit: DEFAULT_LIMIT } }
}

impl ListQuery {
  /// Build a query from raw `key=value` pairs. `offset` and `limit` are
  /// paging parameters; every other key must name a [`Field`].
  /// A repeated field keeps its last value.
  pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
  where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
  {
    let mut query = Self::default();
    for (key, value) in pairs {
      let (key, value) = (key.as_ref(), value.as_ref());
      match key {
        "offset" => query.offset = parse_paging("offset", value)?,
        "limit" => query.limit = parse_paging("limit", value)?,
        other => {
          let field: Field = other.parse()?;
          query = query.filter(field, field.parse_value(value)?);
        }
      }
    }
    query.limit = query.limit.min(MAX_LIMIT);
    Ok(query)
  }

  /// Add (or replace) the condition on `field`.
  pub fn filter(mut self, field: Field, value: FilterValue) -> Self {
    match self.conditions.binary_search_by_key(&field, |c| c.field) {
      Ok(i) => self.conditions[i].value = value,
      Err(i) => self.conditions.insert(i, Condition { field, value }),
    }
    self
  }

  pub fn page(mut self, offset: u32, limit: u32) -> Self {
    self.offset = offset;
    self.limit = limit.min(MAX_LIMIT);
    self
  }

  pub fn conditions(&self) -> &[Condition] { &self.conditions }
}

fn parse_paging(param: &'static str, value: &str) -> Result<u32> {
  value
    .trim()
    .parse()
    .map_err(|_| Error::InvalidPaging { param, value: value.to_owned() })
}
