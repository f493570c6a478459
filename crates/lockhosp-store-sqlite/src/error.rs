//! Error type for `lockhosp-store-sqlite`.

use std::path::PathBuf;

use lockhosp_core::table::ArchiveTable;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] lockhosp_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// The pass targets a table this archive does not have.
  #[error("table {0} does not exist in this archive")]
  MissingTable(ArchiveTable),

  #[error("database file not found: {}", .0.display())]
  DatabaseNotFound(PathBuf),

  #[error("backup failed at {}: {source}", path.display())]
  Backup {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
