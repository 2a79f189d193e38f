//! [`EnrichmentClient`]: the three lookups and the pipeline that chains them.

use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;

use crate::{
  Error, Lookup, Result, RetryPolicy,
  transport::{HttpTransport, Transport},
};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Endpoints and policies for the enrichment lookups.
#[derive(Debug, Clone)]
pub struct EnrichConfig {
  pub age_url:           String,
  pub gender_url:        String,
  pub nationality_url:   String,
  pub age_retry:         RetryPolicy,
  pub gender_retry:      RetryPolicy,
  pub nationality_retry: RetryPolicy,
  /// Per-request timeout for [`HttpTransport`].
  pub timeout:           Duration,
}

impl Default for EnrichConfig {
  /// The public agify/genderize/nationalize services. The age lookup is the
  /// one most prone to rate limiting, so it alone gets three attempts.
  fn default() -> Self {
    Self {
      age_url:           "https://api.agify.io/".to_owned(),
      gender_url:        "https://api.genderize.io/".to_owned(),
      nationality_url:   "https://api.nationalize.io/".to_owned(),
      age_retry:         RetryPolicy::fixed(3, Duration::from_secs(1)),
      gender_retry:      RetryPolicy::none(),
      nationality_retry: RetryPolicy::none(),
      timeout:           Duration::from_secs(30),
    }
  }
}

/// The attributes derived for a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrichment {
  pub age:         i32,
  pub gender:      String,
  /// ISO 3166-1 alpha-2 code of the most probable country.
  pub nationality: String,
}

#[derive(Debug)]
struct Endpoint {
  url:    Url,
  policy: RetryPolicy,
}

impl Endpoint {
  fn parse(lookup: Lookup, url: &str, policy: RetryPolicy) -> Result<Self> {
    let url = Url::parse(url).map_err(|e| Error::InvalidUrl {
      lookup,
      url: url.to_owned(),
      reason: e.to_string(),
    })?;
    Ok(Self { url, policy })
  }

  fn for_name(&self, name: &str) -> Url {
    let mut url = self.url.clone();
    url.query_pairs_mut().append_pair("name", name);
    url
  }
}

// ─── Client ───────────────────────────────────────────────────────────────────

pub struct EnrichmentClient<T = HttpTransport> {
  transport:   T,
  age:         Endpoint,
  gender:      Endpoint,
  nationality: Endpoint,
}

impl EnrichmentClient<HttpTransport> {
  /// Build a client that talks to the configured services over HTTP.
  pub fn from_config(config: &EnrichConfig) -> Result<Self> {
    let transport = HttpTransport::new(config.timeout)?;
    Self::new(transport, config)
  }
}

impl<T: Transport> EnrichmentClient<T> {
  pub fn new(transport: T, config: &EnrichConfig) -> Result<Self> {
    Ok(Self {
      transport,
      age:         Endpoint::parse(Lookup::Age, &config.age_url, config.age_retry)?,
      gender:      Endpoint::parse(Lookup::Gender, &config.gender_url, config.gender_retry)?,
      nationality: Endpoint::parse(
        Lookup::Nationality,
        &config.nationality_url,
        config.nationality_retry,
      )?,
    })
  }

  fn endpoint(&self, lookup: Lookup) -> &Endpoint {
    match lookup {
      Lookup::Age => &self.age,
      Lookup::Gender => &self.gender,
      Lookup::Nationality => &self.nationality,
    }
  }

  /// Run age, gender and nationality lookups in that order. The first
  /// failure is returned as-is and the remaining lookups are skipped.
  #[tracing::instrument(skip(self))]
  pub async fn enrich(&self, name: &str) -> Result<Enrichment> {
    let age = self.age(name).await?;
    let gender = self.gender(name).await?;
    let nationality = self.nationality(name).await?;
    tracing::debug!(age, %gender, %nationality, "enrichment complete");
    Ok(Enrichment { age, gender, nationality })
  }

  pub async fn age(&self, name: &str) -> Result<i32> {
    self.lookup(Lookup::Age, name, parse_age).await
  }

  pub async fn gender(&self, name: &str) -> Result<String> {
    self.lookup(Lookup::Gender, name, parse_gender).await
  }

  pub async fn nationality(&self, name: &str) -> Result<String> {
    self.lookup(Lookup::Nationality, name, parse_nationality).await
  }

  async fn lookup<V>(
    &self,
    lookup: Lookup,
    name: &str,
    parse: fn(Lookup, &Value) -> Result<V>,
  ) -> Result<V> {
    let endpoint = self.endpoint(lookup);
    let url = endpoint.for_name(name);

    let result = endpoint
      .policy
      .run(lookup, |attempt| {
        let url = &url;
        async move {
          tracing::debug!(%lookup, attempt, "querying {url}");
          let json = self.fetch_json(lookup, url).await?;
          parse(lookup, &json)
        }
      })
      .await;

    if let Err(e) = &result {
      tracing::error!(%lookup, error = %e, "lookup failed");
    }
    result
  }

  /// One attempt: request, status check, JSON decode.
  async fn fetch_json(&self, lookup: Lookup, url: &Url) -> Result<Value> {
    let resp = self
      .transport
      .get(url)
      .await
      .map_err(|source| Error::Transport { lookup, source })?;

    if !resp.is_success() {
      return Err(Error::Status { lookup, status: resp.status });
    }

    serde_json::from_slice(&resp.body).map_err(|source| Error::Decode { lookup, source })
  }
}

// ─── Response shapes ──────────────────────────────────────────────────────────

/// `{"age": <number>}`; `age` is `null` for names the service does not know.
#[derive(Deserialize)]
struct AgeResponse {
  age: Option<f64>,
}

/// `{"gender": <string>}`.
#[derive(Deserialize)]
struct GenderResponse {
  gender: Option<String>,
}

/// `{"country": [{"country_id": <string>, ...}, ...]}`, most probable first.
#[derive(Deserialize)]
struct NationalityResponse {
  country: Vec<CountryCandidate>,
}

#[derive(Deserialize)]
struct CountryCandidate {
  country_id: String,
}

/// Decode an already-valid JSON document into the expected shape. A
/// mismatch is a [`Error::Parse`], never a retryable decode failure.
fn shape<'a, R: Deserialize<'a>>(
  lookup: Lookup,
  json: &'a Value,
  reason: &'static str,
) -> Result<R> {
  R::deserialize(json).map_err(|_| Error::Parse { lookup, reason })
}

/// A `null` (unknown name) or negative age fails.
fn parse_age(lookup: Lookup, json: &Value) -> Result<i32> {
  let resp: AgeResponse = shape(lookup, json, "unexpected age response shape")?;
  resp
    .age
    .filter(|age| (0.0..=f64::from(i32::MAX)).contains(age))
    .map(|age| age as i32)
    .ok_or(Error::Parse { lookup, reason: "response has no numeric age" })
}

fn parse_gender(lookup: Lookup, json: &Value) -> Result<String> {
  let resp: GenderResponse = shape(lookup, json, "unexpected gender response shape")?;
  resp
    .gender
    .filter(|g| !g.is_empty())
    .ok_or(Error::Parse { lookup, reason: "response has no gender" })
}

fn parse_nationality(lookup: Lookup, json: &Value) -> Result<String> {
  let resp: NationalityResponse = shape(lookup, json, "unexpected nationality response shape")?;
  let top = resp
    .country
    .into_iter()
    .next()
    .ok_or(Error::Parse { lookup, reason: "country list is empty" })?;

  if top.country_id.is_empty() {
    return Err(Error::Parse { lookup, reason: "top country has no country_id" });
  }
  Ok(top.country_id)
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn age_accepts_integer_and_float() {
    assert_eq!(parse_age(Lookup::Age, &json!({"age": 42, "count": 10})).unwrap(), 42);
    assert_eq!(parse_age(Lookup::Age, &json!({"age": 42.9})).unwrap(), 42);
  }

  #[test]
  fn age_rejects_null_missing_and_negative() {
    for body in [json!({"age": null}), json!({}), json!({"age": -1}), json!({"age": "42"})] {
      assert!(matches!(parse_age(Lookup::Age, &body), Err(Error::Parse { .. })), "{body}");
    }
  }

  #[test]
  fn gender_requires_a_string() {
    assert_eq!(parse_gender(Lookup::Gender, &json!({"gender": "male"})).unwrap(), "male");
    assert!(parse_gender(Lookup::Gender, &json!({"gender": null})).is_err());
    assert!(parse_gender(Lookup::Gender, &json!({"name": "x"})).is_err());
  }

  #[test]
  fn wrongly_typed_fields_are_parse_errors() {
    let err = parse_gender(Lookup::Gender, &json!({"gender": 1})).unwrap_err();
    assert!(matches!(err, Error::Parse { lookup: Lookup::Gender, .. }));
    assert!(!err.is_transient());

    let err = parse_age(Lookup::Age, &json!({"age": [30]})).unwrap_err();
    assert!(matches!(err, Error::Parse { lookup: Lookup::Age, .. }));
  }

  #[test]
  fn nationality_picks_top_candidate() {
    let body = json!({
      "name": "dmitriy",
      "country": [
        {"country_id": "UA", "probability": 0.41},
        {"country_id": "RU", "probability": 0.39}
      ]
    });
    assert_eq!(parse_nationality(Lookup::Nationality, &body).unwrap(), "UA");
  }

  #[test]
  fn nationality_shape_mismatches_are_parse_errors() {
    let cases = [
      json!({}),
      json!({"country": "UA"}),
      json!({"country": []}),
      json!({"country": [{"probability": 0.5}]}),
      json!({"country": [{"country_id": ""}]}),
      json!({"country": ["UA"]}),
    ];
    for body in cases {
      let err = parse_nationality(Lookup::Nationality, &body).unwrap_err();
      assert!(!err.is_transient(), "{body}");
    }
  }

  #[test]
  fn name_is_query_encoded() {
    let endpoint = Endpoint::parse(Lookup::Age, "https://api.agify.io/", RetryPolicy::none()).unwrap();
    assert_eq!(endpoint.for_name("Anna Maria&x=1").as_str(), "https://api.agify.io/?name=Anna+Maria%26x%3D1");
  }

  #[test]
  fn invalid_base_url_is_rejected() {
    let err = Endpoint::parse(Lookup::Gender, "not a url", RetryPolicy::none()).unwrap_err();
    assert!(matches!(err, Error::InvalidUrl { lookup: Lookup::Gender, .. }));
  }
}
