//! The Person service: enrichment-then-persistence for new records, and
//! error translation for everything else.
//!
//! [`PersonService`] is generic over the store backend and the outbound
//! transport, both injected at construction.

pub mod error;
mod service;

pub use error::{BoxError, ServiceError};
pub use service::PersonService;
