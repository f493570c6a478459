//! The cleanup pipeline: standardize categorical columns, merge station
//! variants, fix coordinates, audit.
//!
//! Generic over [`ArchiveStore`]; backing up the file is the caller's job
//! and must happen before any of these run.

use lockhosp_core::{
  report::{ArchiveSummary, CoordinateReport, MergeReport, StandardizationReport},
  station::{CoordinateRule, MergeRule},
  store::ArchiveStore,
  table::ArchiveTable,
};
use serde::Serialize;

/// Tables standardized when none are named explicitly.
pub fn default_tables() -> Vec<ArchiveTable> {
  std::iter::once(ArchiveTable::Stations)
    .chain(ArchiveTable::with_station_text())
    .collect()
}

/// Standardize `tables`, skipping any the archive does not have.
pub async fn standardize<S: ArchiveStore>(
  store: &S,
  tables: &[ArchiveTable],
) -> Result<Vec<StandardizationReport>, S::Error> {
  let mut reports = Vec::with_capacity(tables.len());
  for &table in tables {
    if !store.has_table(table).await? {
      tracing::warn!(%table, "table not present; skipping");
      continue;
    }
    reports.push(store.standardize(table).await?);
  }
  Ok(reports)
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct StationResolution {
  pub merges:      Vec<MergeReport>,
  pub coordinates: Vec<CoordinateReport>,
}

/// Run every merge rule in order, then every coordinate rule.
pub async fn resolve_stations<S: ArchiveStore>(
  store: &S,
  merges: &[MergeRule],
  coordinates: &[CoordinateRule],
) -> Result<StationResolution, S::Error> {
  let mut resolution = StationResolution::default();
  for rule in merges {
    resolution.merges.push(store.merge_stations(rule).await?);
  }
  for rule in coordinates {
    resolution.coordinates.push(store.apply_coordinates(rule).await?);
  }
  Ok(resolution)
}

#[derive(Debug, Clone, Serialize)]
pub struct CleanupReport {
  pub dropped_columns: Vec<String>,
  pub standardization: Vec<StandardizationReport>,
  pub stations:        StationResolution,
  pub summary:         ArchiveSummary,
}

pub struct CleanupOptions<'a> {
  pub tables:             &'a [ArchiveTable],
  pub drop_staff_columns: bool,
  pub merges:             &'a [MergeRule],
  pub coordinates:        &'a [CoordinateRule],
}

/// The full pass. Each step commits on its own, so a failure part way
/// leaves earlier steps applied; every step is safe to re-run.
pub async fn run_cleanup<S: ArchiveStore>(
  store: &S,
  options: CleanupOptions<'_>,
) -> Result<CleanupReport, S::Error> {
  let dropped_columns = if options.drop_staff_columns {
    store.drop_staff_columns().await?
  } else {
    Vec::new()
  };

  let standardization = standardize(store, options.tables).await?;
  let stations = resolve_stations(store, options.merges, options.coordinates).await?;
  let summary = store.summarize().await?;

  Ok(CleanupReport { dropped_columns, standardization, stations, summary })
}
