//! SQLite backend for the lock hospital archive.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread. Each cleanup pass executes inside a single SQLite transaction on
//! that thread; [`backup::backup_database`] copies the file before any of
//! them run.

mod encode;
mod resolve;
mod schema;
mod standardize;
mod store;
mod verify;

pub mod backup;
pub mod error;

pub use backup::backup_database;
pub use error::{Error, Result};
pub use store::SqliteArchive;

#[cfg(test)]
mod tests;
