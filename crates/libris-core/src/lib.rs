//! Core types, the storage trait and the integrity layer for the Libris
//! book catalog.
//!
//! This crate has no HTTP or database dependencies.
//! Storage backends implement [`store::CatalogStore`]; everything that
//! decides whether a write is allowed lives in [`catalog::Catalog`].

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod catalog;
pub mod change;
pub mod entity;
pub mod error;
pub mod store;
pub mod validation;

pub use catalog::Catalog;
pub use error::{Error, Outcome, Result};
