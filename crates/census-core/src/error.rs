//! Error types for `census-core`.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
  #[error("name must not be empty")]
  EmptyName,

  #[error("unknown filter field: {0:?}")]
  UnknownField(String),

  #[error("invalid value {value:?} for filter field {field}")]
  InvalidFilterValue { field: &'static str, value: String },

  #[error("invalid {param} parameter: {value:?}")]
  InvalidPaging { param: &'static str, value: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
