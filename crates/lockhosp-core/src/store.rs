//! The `ArchiveStore` trait.
//!
//! Implemented by storage backends (e.g. `lockhosp-store-sqlite`). The CLI
//! drives its cleanup pipeline through this abstraction.

use std::future::Future;

use crate::{
  record::{HospitalNote, HospitalOperation, TroopRecord, WomenAdmission},
  report::{
    ArchiveStatistics, ArchiveSummary, CoordinateReport, MergeReport, StandardizationReport,
  },
  station::{CoordinateRule, Document, MergeRule, NewStation, Station, StationReport},
  table::ArchiveTable,
};

/// Abstraction over an archive backend.
///
/// Every bulk mutation returns a structured report of what it changed.
/// Callers are expected to back the archive up before calling any of them.
pub trait ArchiveStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Catalogue ─────────────────────────────────────────────────────────

  /// Whether `table` exists in this archive. Legacy tables usually do not.
  fn has_table(
    &self,
    table: ArchiveTable,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Inserts ───────────────────────────────────────────────────────────

  /// Insert a document; an existing `doc_id` is left untouched.
  fn add_document<'a>(
    &'a self,
    document: &'a Document,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  fn add_station(
    &self,
    station: NewStation,
  ) -> impl Future<Output = Result<Station, Self::Error>> + Send + '_;

  fn add_station_report(
    &self,
    doc_id: String,
    station_id: i64,
  ) -> impl Future<Output = Result<StationReport, Self::Error>> + Send + '_;

  fn add_hospital_operation<'a>(
    &'a self,
    row: &'a HospitalOperation,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  fn add_women_admission<'a>(
    &'a self,
    row: &'a WomenAdmission,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  fn add_troop_record<'a>(
    &'a self,
    row: &'a TroopRecord,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  fn add_hospital_note<'a>(
    &'a self,
    note: &'a HospitalNote,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + 'a;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// All stations ordered by `station_id`.
  fn list_stations(&self) -> impl Future<Output = Result<Vec<Station>, Self::Error>> + Send + '_;

  /// All station reports ordered by `report_id`.
  fn list_station_reports(
    &self,
  ) -> impl Future<Output = Result<Vec<StationReport>, Self::Error>> + Send + '_;

  // ── Cleanup passes ────────────────────────────────────────────────────

  /// Rewrite every categorical column of `table` through the normalizer.
  fn standardize(
    &self,
    table: ArchiveTable,
  ) -> impl Future<Output = Result<StandardizationReport, Self::Error>> + Send + '_;

  /// Drop every `staff_*` column from `hospital_operations`. Irreversible;
  /// returns the dropped column names.
  fn drop_staff_columns(&self) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;

  /// Collapse every station matching the rule into one canonical row and
  /// rewrite the station text of the fact tables to match.
  fn merge_stations<'a>(
    &'a self,
    rule: &'a MergeRule,
  ) -> impl Future<Output = Result<MergeReport, Self::Error>> + Send + 'a;

  fn apply_coordinates<'a>(
    &'a self,
    rule: &'a CoordinateRule,
  ) -> impl Future<Output = Result<CoordinateReport, Self::Error>> + Send + 'a;

  // ── Verification ──────────────────────────────────────────────────────

  fn summarize(&self) -> impl Future<Output = Result<ArchiveSummary, Self::Error>> + Send + '_;

  /// Per-year record counts, stations per region, documents by citation
  /// count and act usage.
  fn statistics(
    &self,
  ) -> impl Future<Output = Result<ArchiveStatistics, Self::Error>> + Send + '_;
}
