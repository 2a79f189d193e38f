//! Name-based enrichment for new person records.
//!
//! Three external lookups (agify, genderize, nationalize) infer an age, a
//! gender and a nationality from a first name. They run as an ordered,
//! short-circuiting pipeline; only the age lookup retries by default.
//!
//! All network access goes through the [`Transport`] trait, so the retry and
//! failure-ordering behaviour can be exercised with
//! [`mock::MockTransport`] instead of real HTTP.

mod client;
mod retry;
mod transport;

pub mod error;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use client::{EnrichConfig, Enrichment, EnrichmentClient};
pub use error::{Error, Lookup, Result};
pub use retry::RetryPolicy;
pub use transport::{BoxError, HttpResponse, HttpTransport, Transport, TransportError};
