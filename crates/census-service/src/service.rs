//! [`PersonService`]: orchestration over a [`PersonStore`] and an
//! [`EnrichmentClient`].

use std::sync::Arc;

use census_core::{
  filter::ListQuery,
  person::{Person, PersonDraft, PersonId},
  store::{PersonStore, StoreError},
};
use census_enrich::{EnrichmentClient, HttpTransport, Transport};

use crate::ServiceError;

pub struct PersonService<S, T = HttpTransport> {
  store:    Arc<S>,
  enricher: EnrichmentClient<T>,
}

impl<S, T> PersonService<S, T>
where
  S: PersonStore,
  T: Transport,
{
  pub fn new(store: Arc<S>, enricher: EnrichmentClient<T>) -> Self { Self { store, enricher } }

  /// Enrich `draft` from its trimmed name and persist it.
  ///
  /// Client-supplied age, gender and nationality are always replaced. The
  /// first failing lookup aborts the create before anything is stored.
  pub async fn create(&self, mut draft: PersonDraft) -> Result<Person, ServiceError> {
    draft.trim_name();
    tracing::debug!(name = %draft.name, "creating person");
    draft.validate()?;

    let enrichment = self.enricher.enrich(&draft.name).await.inspect_err(|e| {
      tracing::error!(error = %e, "failed to enrich person");
    })?;

    draft.age = enrichment.age;
    draft.gender = enrichment.gender;
    draft.nationality = enrichment.nationality;

    let person = self.store.insert(draft).await.map_err(|e| {
      tracing::error!(error = %e, "failed to insert person");
      ServiceError::Store(Box::new(e))
    })?;

    tracing::info!(id = person.id, "person created");
    Ok(person)
  }

  pub async fn list(&self, query: &ListQuery) -> Result<Vec<Person>, ServiceError> {
    tracing::debug!(?query, "listing people");
    self.store.list(query).await.map_err(|e| {
      tracing::error!(error = %e, "failed to list people");
      ServiceError::Store(Box::new(e))
    })
  }

  pub async fn get(&self, id: PersonId) -> Result<Person, ServiceError> {
    tracing::debug!(id, "getting person");
    self
      .store
      .get(id)
      .await
      .map_err(|e| translate(id, e, ServiceError::Get))
  }

  /// Replace every mutable field of `person.id`.
  pub async fn update(&self, mut person: Person) -> Result<Person, ServiceError> {
    tracing::debug!(id = person.id, "updating person");
    person.trim_name();
    person.validate()?;
    let id = person.id;
    self
      .store
      .update(person)
      .await
      .map_err(|e| translate(id, e, ServiceError::Update))
  }

  pub async fn delete(&self, id: PersonId) -> Result<(), ServiceError> {
    tracing::debug!(id, "deleting person");
    self
      .store
      .delete(id)
      .await
      .map_err(|e| translate(id, e, ServiceError::Delete))
  }
}

/// Not-found becomes [`ServiceError::NotFound`]; anything else is logged and
/// replaced by `generic`.
fn translate<E: StoreError>(id: PersonId, err: E, generic: ServiceError) -> ServiceError {
  if err.is_not_found() {
    tracing::warn!(id, error = %err, "person not found");
    ServiceError::NotFound
  } else {
    tracing::error!(id, error = %err, "{generic}");
    generic
  }
}
