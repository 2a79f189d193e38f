//! Error type for `census-store-sqlite`.

use census_core::{person::PersonId, store::StoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// Zero rows matched or were affected.
  #[error("person not found: {0}")]
  PersonNotFound(PersonId),

  /// A single-row mutation reported an impossible affected-row count.
  #[error("unexpected affected-row count {count} for person {id}")]
  UnexpectedRowCount { id: PersonId, count: usize },
}

impl StoreError for Error {
  fn is_not_found(&self) -> bool { matches!(self, Error::PersonNotFound(_)) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
