//! Handlers for `/people` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/people` | Body: [`PersonDraft`]; 201 + enriched [`Person`] |
//! | `GET`    | `/people` | Any [`Field`](census_core::filter::Field) as `?field=value`, plus `offset`/`limit` |
//! | `GET`    | `/people/{id}` | 404 if not found |
//! | `PUT`    | `/people/{id}` | Body: [`PersonDraft`]; full replace |
//! | `DELETE` | `/people/{id}` | 204; 404 if not found |
//!
//! Malformed bodies, ids and query strings are rejected with 400 and the
//! usual `{"error": ..}` body.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use census_core::{
  filter::ListQuery,
  person::{Person, PersonDraft, PersonId},
  store::PersonStore,
};
use census_enrich::Transport;
use census_service::PersonService;

use crate::{
  error::ApiError,
  extract::{JsonBody, PathParam, QueryParams},
};

type Service<S, T> = State<Arc<PersonService<S, T>>>;

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /people`
pub async fn create<S, T>(
  State(service): Service<S, T>,
  JsonBody(draft): JsonBody<PersonDraft>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PersonStore,
  T: Transport,
{
  let person = service.create(draft).await?;
  Ok((StatusCode::CREATED, Json(person)))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /people[?name=..][&age=..][&offset=..][&limit=..]`
pub async fn list<S, T>(
  State(service): Service<S, T>,
  QueryParams(params): QueryParams<Vec<(String, String)>>,
) -> Result<Json<Vec<Person>>, ApiError>
where
  S: PersonStore,
  T: Transport,
{
  let query = ListQuery::from_pairs(params).map_err(|e| ApiError::BadRequest(e.to_string()))?;
  Ok(Json(service.list(&query).await?))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /people/{id}`
pub async fn get_one<S, T>(
  State(service): Service<S, T>,
  PathParam(id): PathParam<PersonId>,
) -> Result<Json<Person>, ApiError>
where
  S: PersonStore,
  T: Transport,
{
  Ok(Json(service.get(id).await?))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /people/{id}`
pub async fn update<S, T>(
  State(service): Service<S, T>,
  PathParam(id): PathParam<PersonId>,
  JsonBody(draft): JsonBody<PersonDraft>,
) -> Result<Json<Person>, ApiError>
where
  S: PersonStore,
  T: Transport,
{
  Ok(Json(service.update(draft.with_id(id)).await?))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /people/{id}`
pub async fn delete<S, T>(
  State(service): Service<S, T>,
  PathParam(id): PathParam<PersonId>,
) -> Result<StatusCode, ApiError>
where
  S: PersonStore,
  T: Transport,
{
  service.delete(id).await?;
  Ok(StatusCode::NO_CONTENT)
}
