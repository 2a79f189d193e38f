//! Error type for `census-service`.
//!
//! Storage failures on get/update/delete are collapsed into a small fixed
//! vocabulary; the cause is logged where it happens and not returned.
//! Enrichment and insert/list failures pass through unchanged.

use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum ServiceError {
  #[error("invalid person: {0}")]
  Invalid(#[from] census_core::Error),

  #[error(transparent)]
  Enrichment(#[from] census_enrich::Error),

  #[error("person not found")]
  NotFound,

  #[error("failed to get person")]
  Get,

  #[error("failed to update person")]
  Update,

  #[error("failed to delete person")]
  Delete,

  /// Insert and list errors, unchanged from the store.
  #[error(transparent)]
  Store(BoxError),
}
