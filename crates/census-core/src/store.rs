//! The `PersonStore` trait: the persistence gateway for [`Person`] records.
//!
//! Implemented by storage backends (e.g. `census-store-sqlite`). The service
//! layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  filter::ListQuery,
  person::{Person, PersonDraft, PersonId},
};

/// Lets callers tell the not-found signal apart from every other storage
/// failure without knowing the backend's concrete error type.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// `true` when zero rows matched or were affected.
  fn is_not_found(&self) -> bool;
}

/// Abstraction over a person store backend.
///
/// Every operation is a single statement against the `people` table; no
/// transaction spans more than one call.
pub trait PersonStore: Send + Sync {
  type Error: StoreError;

  /// Persist `draft` and return it with its store-assigned id.
  fn insert(
    &self,
    draft: PersonDraft,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Return the records matching every condition of `query`, ordered by id
  /// and paginated by `query.offset` / `query.limit`.
  fn list<'a>(
    &'a self,
    query: &'a ListQuery,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + 'a;

  /// Fetch one record. Fails with a not-found error if no row matches.
  fn get(
    &self,
    id: PersonId,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Replace all mutable fields of `person.id`. Fails with a not-found
  /// error when zero rows were affected.
  fn update(
    &self,
    person: Person,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Remove a record. Fails with a not-found error when zero rows were
  /// affected.
  fn delete(
    &self,
    id: PersonId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
