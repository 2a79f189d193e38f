//! The outbound HTTP seam.

use std::{future::Future, time::Duration};

use reqwest::{Client, Url};
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A fully-read response: status code plus body bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
  pub status: u16,
  pub body:   Vec<u8>,
}

impl HttpResponse {
  pub fn is_success(&self) -> bool { (200..300).contains(&self.status) }
}

#[derive(Debug, Error)]
pub enum TransportError {
  /// The request could not be sent or no response arrived.
  #[error("request failed: {0}")]
  Request(#[source] BoxError),

  /// A response arrived but its body could not be read.
  #[error("failed to read response body: {0}")]
  Body(#[source] BoxError),
}

/// Performs a single `GET` and reads the whole body.
pub trait Transport: Send + Sync {
  fn get<'a>(
    &'a self,
    url: &'a Url,
  ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send + 'a;
}

/// [`Transport`] backed by a shared [`reqwest::Client`].
///
/// Cheap to clone; the inner client is `Arc`-based.
#[derive(Clone)]
pub struct HttpTransport {
  client: Client,
}

impl HttpTransport {
  pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
    let client = Client::builder()
      .timeout(timeout)
      .user_agent(concat!("census/", env!("CARGO_PKG_VERSION")))
      .build()?;
    Ok(Self { client })
  }
}

impl Transport for HttpTransport {
  async fn get(&self, url: &Url) -> Result<HttpResponse, TransportError> {
    let resp = self
      .client
      .get(url.clone())
      .send()
      .await
      .map_err(|e| TransportError::Request(Box::new(e)))?;

    let status = resp.status().as_u16();
    let body = resp
      .bytes()
      .await
      .map_err(|e| TransportError::Body(Box::new(e)))?;

    Ok(HttpResponse { status, body: body.to_vec() })
  }
}
