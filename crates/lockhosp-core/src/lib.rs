//! Core types and rules for the lock hospital archive.
//!
//! This crate is deliberately free of database dependencies. It holds the
//! categorical normalizer, the station merge rules, the report types and the
//! [`ArchiveStore`](store::ArchiveStore) trait that storage backends
//! implement.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod normalize;
pub mod record;
pub mod report;
pub mod station;
pub mod store;
pub mod table;

pub use error::{Error, Result};
