//! JSON REST API for Census.
//!
//! Exposes an axum [`Router`] backed by a [`PersonService`] over any
//! [`PersonStore`] and enrichment [`Transport`]. TLS and auth are out of
//! scope.

pub mod config;
pub mod error;
pub mod extract;
pub mod people;
pub mod telemetry;

use std::sync::Arc;

use axum::{Json, Router, routing::get};
use census_core::store::PersonStore;
use census_enrich::Transport;
use census_service::PersonService;
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

pub use config::ServerConfig;
pub use error::ApiError;

/// Build the API router for `service`.
pub fn router<S, T>(service: Arc<PersonService<S, T>>) -> Router
where
  S: PersonStore + 'static,
  T: Transport + 'static,
{
  Router::new()
    .route("/health", get(health))
    .route("/people", get(people::list::<S, T>).post(people::create::<S, T>))
    .route(
      "/people/{id}",
      get(people::get_one::<S, T>)
        .put(people::update::<S, T>)
        .delete(people::delete::<S, T>),
    )
    .layer(TraceLayer::new_for_http())
    .with_state(service)
}

async fn health() -> Json<Value> { Json(json!({ "status": "ok" })) }

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
  };
  use census_core::person::Person;
  use census_enrich::{
    EnrichmentClient,
    mock::{AGE_HOST, GENDER_HOST, MockTransport, NATIONALITY_HOST, mock_config},
  };
  use census_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  async fn make_app() -> (Router, MockTransport) {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let transport = MockTransport::new();
    let enricher = EnrichmentClient::new(transport.clone(), &mock_config()).unwrap();
    let service = Arc::new(PersonService::new(Arc::new(store), enricher));
    (router(service), transport)
  }

  async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response {
    let mut req = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(json) => {
        req = req.header(header::CONTENT_TYPE, "application/json");
        Body::from(json.to_string())
      }
      None => Body::empty(),
    };
    app.clone().oneshot(req.body(body).unwrap()).await.unwrap()
  }

  async fn send_raw(app: &Router, method: &str, uri: &str, body: &'static str) -> Response {
    let req = Request::builder()
      .method(method)
      .uri(uri)
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(body))
      .unwrap();
    app.clone().oneshot(req).await.unwrap()
  }

  async fn assert_bad_request(resp: Response) {
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/json");
    let body: Value = json_body(resp).await;
    assert!(body["error"].as_str().is_some_and(|m| !m.is_empty()), "{body}");
  }

  async fn json_body<T: serde::de::DeserializeOwned>(resp: Response) -> T {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  async fn create(app: &Router, transport: &MockTransport, name: &str) -> Person {
    transport.reply_all(35, "female", "UA");
    let resp = send(app, "POST", "/people", Some(json!({ "name": name }))).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    json_body(resp).await
  }

  // ── Health ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn health_returns_ok() {
    let (app, _) = make_app().await;
    let resp = send(&app, "GET", "/health", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
  }

  // ── Create ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn post_enriches_and_returns_201() {
    let (app, transport) = make_app().await;
    transport.reply_all(42, "male", "RU");

    let resp = send(
      &app,
      "POST",
      "/people",
      Some(json!({
        "name": "Dmitriy",
        "surname": "Ushakov",
        "patronymic": "Vasilevich",
        "age": 1,
        "nationality": "XX"
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let person: Person = json_body(resp).await;
    assert!(person.id > 0);
    assert_eq!((person.age, person.gender.as_str(), person.nationality.as_str()), (42, "male", "RU"));
    assert_eq!(person.patronymic, "Vasilevich");
  }

  #[tokio::test]
  async fn post_with_failing_enrichment_returns_502() {
    let (app, transport) = make_app().await;
    transport.reply(AGE_HOST, 200, r#"{"age":30}"#).reply(GENDER_HOST, 500, "");

    let resp = send(&app, "POST", "/people", Some(json!({ "name": "Anna" }))).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body: Value = json_body(resp).await;
    assert!(body["error"].as_str().unwrap().contains("gender"), "{body}");
    assert_eq!(transport.requests_to(NATIONALITY_HOST), 0);

    let list: Vec<Person> = json_body(send(&app, "GET", "/people", None).await).await;
    assert!(list.is_empty());
  }

  #[tokio::test]
  async fn post_with_empty_name_returns_400() {
    let (app, _) = make_app().await;
    let resp = send(&app, "POST", "/people", Some(json!({ "name": "" }))).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn post_without_name_returns_400_json() {
    let (app, transport) = make_app().await;
    let resp = send(&app, "POST", "/people", Some(json!({ "surname": "x" }))).await;
    assert_bad_request(resp).await;
    assert!(transport.requests().is_empty());
  }

  #[tokio::test]
  async fn post_malformed_json_returns_400_json() {
    let (app, _) = make_app().await;
    assert_bad_request(send_raw(&app, "POST", "/people", r#"{"name": "Anna""#).await).await;
  }

  // ── Read ────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn get_existing_and_missing() {
    let (app, transport) = make_app().await;
    let person = create(&app, &transport, "Oksana").await;

    let resp = send(&app, "GET", &format!("/people/{}", person.id), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Person = json_body(resp).await;
    assert_eq!(fetched, person);

    let resp = send(&app, "GET", "/people/9999", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = json_body(resp).await;
    assert_eq!(body["error"], "person not found");
  }

  #[tokio::test]
  async fn list_pages_and_filters() {
    let (app, transport) = make_app().await;
    for i in 0..12 {
      create(&app, &transport, &format!("Person{i}")).await;
    }

    let first: Vec<Person> = json_body(send(&app, "GET", "/people?limit=10&offset=0", None).await).await;
    let second: Vec<Person> = json_body(send(&app, "GET", "/people?limit=10&offset=10", None).await).await;
    assert_eq!(first.len(), 10);
    assert_eq!(second.len(), 2);
    assert!(second.iter().all(|p| first.iter().all(|q| q.id != p.id)));

    let named: Vec<Person> = json_body(send(&app, "GET", "/people?name=Person3", None).await).await;
    assert_eq!(named.len(), 1);
    assert_eq!(named[0].name, "Person3");
  }

  #[tokio::test]
  async fn list_with_unknown_field_returns_400() {
    let (app, _) = make_app().await;
    let resp = send(&app, "GET", "/people?1%3D1%20OR%20name=x", None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(resp).await;
    assert!(body["error"].as_str().unwrap().contains("unknown filter field"), "{body}");
  }

  // ── Update ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn put_replaces_fields_and_keeps_id() {
    let (app, transport) = make_app().await;
    let person = create(&app, &transport, "Oksana").await;

    let resp = send(
      &app,
      "PUT",
      &format!("/people/{}", person.id),
      Some(json!({
        "name": "Oksana",
        "surname": "Kovalenko",
        "patronymic": "",
        "age": 36,
        "gender": "female",
        "nationality": "PL"
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Person = json_body(resp).await;
    assert_eq!(updated.id, person.id);
    assert_eq!(updated.surname, "Kovalenko");
    assert_eq!(updated.nationality, "PL");

    let fetched: Person =
      json_body(send(&app, "GET", &format!("/people/{}", person.id), None).await).await;
    assert_eq!(fetched, updated);
  }

  #[tokio::test]
  async fn put_missing_returns_404() {
    let (app, _) = make_app().await;
    let resp = send(&app, "PUT", "/people/31337", Some(json!({ "name": "Ghost" }))).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  // ── Delete ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn delete_then_delete_again_returns_404() {
    let (app, transport) = make_app().await;
    let person = create(&app, &transport, "Oksana").await;
    let uri = format!("/people/{}", person.id);

    assert_eq!(send(&app, "DELETE", &uri, None).await.status(), StatusCode::NO_CONTENT);
    assert_eq!(send(&app, "GET", &uri, None).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(send(&app, "DELETE", &uri, None).await.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn non_numeric_id_returns_400_json() {
    let (app, _) = make_app().await;
    assert_bad_request(send(&app, "GET", "/people/abc", None).await).await;
    assert_bad_request(send(&app, "DELETE", "/people/abc", None).await).await;
  }

  #[tokio::test]
  async fn put_with_mistyped_field_returns_400_json() {
    let (app, transport) = make_app().await;
    let person = create(&app, &transport, "Oksana").await;
    let uri = format!("/people/{}", person.id);

    let resp = send(&app, "PUT", &uri, Some(json!({ "name": "Oksana", "age": "old" }))).await;
    assert_bad_request(resp).await;

    let fetched: Person = json_body(send(&app, "GET", &uri, None).await).await;
    assert_eq!(fetched, person);
  }
}
