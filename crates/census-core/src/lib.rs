//! Core types and trait definitions for the Census person registry.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it.

// Native `async fn` in traits; the `Send` bounds are spelled out on the
// returned futures instead.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod filter;
pub mod person;
pub mod store;

pub use error::{Error, Result};
