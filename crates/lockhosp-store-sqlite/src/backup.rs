//! Pre-run backups.
//!
//! Every destructive pass is preceded by a plain copy of the database file
//! into a backup directory. A failed copy is an error: callers must not
//! open the archive for writing without one.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::{Error, Result};

/// File name for a backup of `database` taken at `at`, e.g.
/// `medical_lock_hospitals_backup_2024-03-01_142233.db`.
pub fn backup_file_name(database: &Path, at: DateTime<Local>) -> String {
  let stem = database
    .file_stem()
    .map(|s| s.to_string_lossy())
    .unwrap_or_else(|| "archive".into());
  let ext = database
    .extension()
    .map(|s| s.to_string_lossy())
    .unwrap_or_else(|| "db".into());
  format!("{stem}_backup_{}.{ext}", at.format("%Y-%m-%d_%H%M%S"))
}

/// Copy `database` into `backup_dir` (created if absent) under a
/// timestamped name and return the path of the copy.
///
/// Two backups within the same second get `-1`, `-2`, … suffixes rather
/// than overwriting each other.
pub async fn backup_database(database: &Path, backup_dir: &Path) -> Result<PathBuf> {
  let io_err = |path: &Path| {
    let path = path.to_path_buf();
    move |source: std::io::Error| Error::Backup { path, source }
  };

  if !tokio::fs::try_exists(database).await.map_err(io_err(database))? {
    return Err(Error::DatabaseNotFound(database.to_path_buf()));
  }

  tokio::fs::create_dir_all(backup_dir)
    .await
    .map_err(io_err(backup_dir))?;

  let name = backup_file_name(database, Local::now());
  let mut target = backup_dir.join(&name);
  let mut n = 1;
  while tokio::fs::try_exists(&target).await.map_err(io_err(&target))? {
    let (stem, ext) = name.rsplit_once('.').unwrap_or((name.as_str(), "db"));
    target = backup_dir.join(format!("{stem}-{n}.{ext}"));
    n += 1;
  }

  let bytes = tokio::fs::copy(database, &target)
    .await
    .map_err(io_err(&target))?;

  tracing::info!(from = %database.display(), to = %target.display(), bytes, "backup created");
  Ok(target)
}
