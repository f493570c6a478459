//! `lockhosp` — maintenance tool for the lock hospital archive database.
//!
//! Every command that writes to the archive first copies the database file
//! into the backup directory and refuses to continue if that copy fails.
//! `verify` and `stats` open the file read-only and never change it.
//! Reports go to stdout (text, or JSON with `--json`); logs go to stderr.

mod pipeline;
mod render;
mod settings;

use std::{future::Future, path::PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use lockhosp_core::{store::ArchiveStore as _, table::ArchiveTable};
use lockhosp_store_sqlite::{SqliteArchive, backup_database};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::{
  pipeline::{CleanupOptions, default_tables},
  render::emit,
  settings::Settings,
};

#[derive(Parser)]
#[command(author, version, about = "Lock hospital archive maintenance")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "lockhosp.toml")]
  config: PathBuf,

  /// Database file; overrides `database_path` from the configuration.
  #[arg(short, long)]
  database: Option<PathBuf>,

  /// Print reports as JSON.
  #[arg(long, global = true)]
  json: bool,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Create any missing archive tables.
  Init,
  /// Copy the database into the backup directory.
  Backup,
  /// Rewrite categorical columns onto their canonical labels.
  Standardize {
    /// Table to standardize; may be repeated. Defaults to every table with
    /// categorical columns.
    #[arg(long = "table")]
    tables:             Vec<ArchiveTable>,
    /// Also remove the `staff_*` columns from `hospital_operations`.
    #[arg(long)]
    drop_staff_columns: bool,
  },
  /// Apply the configured station merges and coordinate fixes.
  MergeStations,
  /// Audit the archive without changing it.
  Verify {
    /// Exit with an error if the archive is inconsistent.
    #[arg(long)]
    strict: bool,
  },
  /// Print record counts per year, stations per region, documents by
  /// citation count and act usage.
  Stats,
  /// Backup, standardize, merge stations, then verify.
  Clean {
    #[arg(long = "table")]
    tables:             Vec<ArchiveTable>,
    #[arg(long)]
    drop_staff_columns: bool,
  },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let mut settings = Settings::load(&cli.config)?;
  if let Some(database) = cli.database {
    settings.database_path = database;
  }

  run(cli.command, &settings, cli.json).await
}

async fn run(command: Command, settings: &Settings, json: bool) -> anyhow::Result<()> {
  match command {
    Command::Init => {
      with_archive(settings, Access::ReadWrite, |_| async { Ok(()) }).await?;
      tracing::info!(path = %settings.database_path.display(), "archive initialised");
    }

    Command::Backup => {
      let path = backup(settings).await?;
      if json {
        println!("{}", serde_json::json!({ "backup": path }));
      } else {
        println!("{}", path.display());
      }
    }

    Command::Standardize { tables, drop_staff_columns } => {
      backup(settings).await?;
      let tables = or_default(tables);
      let reports = with_archive(settings, Access::ReadWrite, |archive| async move {
        if drop_staff_columns {
          let dropped = archive
            .drop_staff_columns()
            .await
            .context("failed to drop staff columns")?;
          tracing::info!(columns = ?dropped, "dropped staff columns");
        }
        pipeline::standardize(&archive, &tables)
          .await
          .context("standardization failed")
      })
      .await?;
      emit(&reports, json)?;
    }

    Command::MergeStations => {
      backup(settings).await?;
      let resolution = with_archive(settings, Access::ReadWrite, |archive| async move {
        pipeline::resolve_stations(&archive, &settings.merges, &settings.coordinates)
          .await
          .context("station merge failed")
      })
      .await?;
      emit(&resolution, json)?;
    }

    Command::Verify { strict } => {
      let summary = with_archive(settings, Access::ReadOnly, |archive| async move {
        archive.summarize().await.context("verification failed")
      })
      .await?;
      emit(&summary, json)?;
      if strict && !summary.is_consistent() {
        anyhow::bail!("archive is inconsistent");
      }
    }

    Command::Stats => {
      let stats = with_archive(settings, Access::ReadOnly, |archive| async move {
        archive.statistics().await.context("failed to compute statistics")
      })
      .await?;
      emit(&stats, json)?;
    }

    Command::Clean { tables, drop_staff_columns } => {
      let backup_path = backup(settings).await?;
      let tables = or_default(tables);
      let report = with_archive(settings, Access::ReadWrite, |archive| async move {
        pipeline::run_cleanup(&archive, CleanupOptions {
          tables: &tables,
          drop_staff_columns,
          merges: &settings.merges,
          coordinates: &settings.coordinates,
        })
        .await
        .context("cleanup failed")
      })
      .await?;
      tracing::info!(backup = %backup_path.display(), "cleanup finished");
      emit(&report, json)?;
    }
  }

  Ok(())
}

fn or_default(tables: Vec<ArchiveTable>) -> Vec<ArchiveTable> {
  if tables.is_empty() { default_tables() } else { tables }
}

async fn backup(settings: &Settings) -> anyhow::Result<PathBuf> {
  backup_database(&settings.database_path, &settings.backup_dir)
    .await
    .with_context(|| {
      format!(
        "failed to back up {}; nothing was changed",
        settings.database_path.display()
      )
    })
}

#[derive(Clone, Copy)]
enum Access {
  /// Creates the file and any missing tables.
  ReadWrite,
  /// Audits an existing file as found.
  ReadOnly,
}

/// Open the archive, run `f`, and close the archive whether or not `f`
/// succeeded. An error from `f` takes precedence over one from closing.
async fn with_archive<F, Fut, T>(settings: &Settings, access: Access, f: F) -> anyhow::Result<T>
where
  F: FnOnce(SqliteArchive) -> Fut,
  Fut: Future<Output = anyhow::Result<T>>,
{
  let path = &settings.database_path;
  let archive = match access {
    Access::ReadWrite => SqliteArchive::open(path).await,
    Access::ReadOnly => {
      if !path.exists() {
        anyhow::bail!("database {} does not exist", path.display());
      }
      SqliteArchive::open_read_only(path).await
    }
  }
  .with_context(|| format!("failed to open archive at {}", path.display()))?;

  let result = f(archive.clone()).await;
  let closed = archive
    .close()
    .await
    .with_context(|| format!("failed to close archive at {}", path.display()));

  let value = result?;
  closed?;
  Ok(value)
}
