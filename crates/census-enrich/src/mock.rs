//! Scripted in-memory [`Transport`] for tests.
//!
//! Replies are queued per host and replayed in order; every requested URL is
//! recorded so tests can assert which lookups ran and how often.
//!
//! ```rust,ignore
//! let transport = MockTransport::new();
//! transport.reply(AGE_HOST, 503, "");
//! transport.reply(AGE_HOST, 200, r#"{"age":42}"#);
//! let client = EnrichmentClient::new(transport.clone(), &mock_config())?;
//! assert_eq!(client.age("Dmitriy").await?, 42);
//! assert_eq!(transport.requests_to(AGE_HOST), 2);
//! ```

use std::{
  collections::{HashMap, VecDeque},
  io,
  sync::{Arc, Mutex, MutexGuard},
  time::Duration,
};

use reqwest::Url;

use crate::{
  EnrichConfig, RetryPolicy,
  transport::{HttpResponse, Transport, TransportError},
};

pub const AGE_HOST: &str = "age.mock";
pub const GENDER_HOST: &str = "gender.mock";
pub const NATIONALITY_HOST: &str = "nationality.mock";

/// An [`EnrichConfig`] pointing at the mock hosts, with the default attempt
/// counts but no delay between attempts.
pub fn mock_config() -> EnrichConfig {
  EnrichConfig {
    age_url: format!("http://{AGE_HOST}/"),
    gender_url: format!("http://{GENDER_HOST}/"),
    nationality_url: format!("http://{NATIONALITY_HOST}/"),
    age_retry: RetryPolicy::fixed(3, Duration::ZERO),
    ..EnrichConfig::default()
  }
}

#[derive(Debug, Clone)]
enum Reply {
  Response(HttpResponse),
  RequestError,
  BodyError,
}

#[derive(Default)]
struct Script {
  replies:  HashMap<String, VecDeque<Reply>>,
  requests: Vec<Url>,
}

#[derive(Clone, Default)]
pub struct MockTransport {
  inner: Arc<Mutex<Script>>,
}

impl MockTransport {
  pub fn new() -> Self { Self::default() }

  fn script(&self) -> MutexGuard<'_, Script> {
    // A panicking test thread may poison the lock; the script is still usable.
    self.inner.lock().unwrap_or_else(|e| e.into_inner())
  }

  fn push(&self, host: &str, reply: Reply) -> &Self {
    self.script().replies.entry(host.to_owned()).or_default().push_back(reply);
    self
  }

  /// Queue a response with `status` and `body` for `host`.
  pub fn reply(&self, host: &str, status: u16, body: &str) -> &Self {
    self.push(host, Reply::Response(HttpResponse { status, body: body.as_bytes().to_vec() }))
  }

  /// Queue a failure to send the request.
  pub fn fail_request(&self, host: &str) -> &Self { self.push(host, Reply::RequestError) }

  /// Queue a response whose body cannot be read.
  pub fn fail_body(&self, host: &str) -> &Self { self.push(host, Reply::BodyError) }

  /// Queue one successful reply per lookup.
  pub fn reply_all(&self, age: i32, gender: &str, nationality: &str) -> &Self {
    self
      .reply(AGE_HOST, 200, &format!(r#"{{"count":1,"name":"x","age":{age}}}"#))
      .reply(GENDER_HOST, 200, &format!(r#"{{"gender":"{gender}","probability":0.99}}"#))
      .reply(
        NATIONALITY_HOST,
        200,
        &format!(r#"{{"country":[{{"country_id":"{nationality}","probability":0.8}}]}}"#),
      )
  }

  /// Every URL requested so far, in order.
  pub fn requests(&self) -> Vec<Url> { self.script().requests.clone() }

  pub fn requests_to(&self, host: &str) -> usize {
    self
      .script()
      .requests
      .iter()
      .filter(|u| u.host_str() == Some(host))
      .count()
  }
}

impl Transport for MockTransport {
  async fn get(&self, url: &Url) -> Result<HttpResponse, TransportError> {
    let reply = {
      let mut script = self.script();
      script.requests.push(url.clone());
      let host = url.host_str().unwrap_or_default().to_owned();
      script.replies.get_mut(&host).and_then(VecDeque::pop_front)
    };

    match reply {
      Some(Reply::Response(resp)) => Ok(resp),
      Some(Reply::BodyError) => Err(TransportError::Body(Box::new(io::Error::new(
        io::ErrorKind::UnexpectedEof,
        "connection closed mid-body",
      )))),
      Some(Reply::RequestError) | None => Err(TransportError::Request(Box::new(io::Error::new(
        io::ErrorKind::ConnectionRefused,
        format!("no scripted reply for {url}"),
      )))),
    }
  }
}
