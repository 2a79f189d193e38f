//! Error type for `census-enrich`.

use std::fmt;

use thiserror::Error;

use crate::transport::TransportError;

/// One step of the enrichment pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
  Age,
  Gender,
  Nationality,
}

impl Lookup {
  pub fn as_str(self) -> &'static str {
    match self {
      Lookup::Age => "age",
      Lookup::Gender => "gender",
      Lookup::Nationality => "nationality",
    }
  }
}

impl fmt::Display for Lookup {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("{lookup} lookup: {source}")]
  Transport {
    lookup: Lookup,
    #[source]
    source: TransportError,
  },

  #[error("{lookup} lookup: unexpected status code {status}")]
  Status { lookup: Lookup, status: u16 },

  #[error("{lookup} lookup: malformed JSON: {source}")]
  Decode {
    lookup: Lookup,
    #[source]
    source: serde_json::Error,
  },

  /// The response decoded but does not have the expected shape.
  #[error("{lookup} lookup: {reason}")]
  Parse { lookup: Lookup, reason: &'static str },

  #[error("{lookup} lookup failed after {attempts} attempts: {last}")]
  Exhausted {
    lookup:   Lookup,
    attempts: u32,
    #[source]
    last:     Box<Error>,
  },

  #[error("invalid {lookup} service URL {url:?}: {reason}")]
  InvalidUrl { lookup: Lookup, url: String, reason: String },

  #[error("failed to build HTTP client: {0}")]
  Client(#[from] reqwest::Error),
}

impl Error {
  /// Whether another attempt could succeed. Shape mismatches never are.
  pub fn is_transient(&self) -> bool {
    matches!(self, Error::Transport { .. } | Error::Status { .. } | Error::Decode { .. })
  }

  /// The pipeline step that failed, if the error came from one.
  pub fn lookup(&self) -> Option<Lookup> {
    match self {
      Error::Transport { lookup, .. }
      | Error::Status { lookup, .. }
      | Error::Decode { lookup, .. }
      | Error::Parse { lookup, .. }
      | Error::Exhausted { lookup, .. }
      | Error::InvalidUrl { lookup, .. } => Some(*lookup),
      Error::Client(_) => None,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
