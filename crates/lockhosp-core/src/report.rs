//! Structured reports returned by the cleanup passes.
//!
//! Every pass returns one of these instead of only printing, so callers can
//! audit what changed and tests can assert on it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{normalize::Field, station::NameCondition, table::ArchiveTable};

// ─── Value counts ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueCount {
  pub value: String,
  pub count: usize,
}

/// Value counts for one column, most frequent first; ties break on value.
/// Nulls are counted separately.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Histogram {
  pub values: Vec<ValueCount>,
  pub nulls:  usize,
}

impl Histogram {
  pub fn from_values<I, S>(values: I) -> Self
  where
    I: IntoIterator<Item = Option<S>>,
    S: AsRef<str>,
  {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut nulls = 0;
    for value in values {
      match value {
        Some(v) => *counts.entry(v.as_ref().to_owned()).or_default() += 1,
        None => nulls += 1,
      }
    }

    let mut values: Vec<ValueCount> = counts
      .into_iter()
      .map(|(value, count)| ValueCount { value, count })
      .collect();
    values.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));

    Self { values, nulls }
  }

  pub fn count_of(&self, value: &str) -> usize {
    self
      .values
      .iter()
      .find(|vc| vc.value == value)
      .map_or(0, |vc| vc.count)
  }

  pub fn non_null(&self) -> usize { self.values.iter().map(|vc| vc.count).sum() }

  pub fn distinct(&self) -> usize { self.values.len() }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCount {
  pub table: ArchiveTable,
  pub rows:  usize,
}

// ─── Standardization ─────────────────────────────────────────────────────────

/// Before/after distribution of one categorical column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnReport {
  pub field:   Field,
  pub before:  Histogram,
  pub after:   Histogram,
  /// Rows whose value was rewritten.
  pub changed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardizationReport {
  pub table:   ArchiveTable,
  pub rows:    usize,
  pub columns: Vec<ColumnReport>,
}

impl StandardizationReport {
  pub fn column(&self, field: Field) -> Option<&ColumnReport> {
    self.columns.iter().find(|c| c.field == field)
  }

  pub fn changed(&self) -> usize { self.columns.iter().map(|c| c.changed).sum() }
}

// ─── Station merges ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationRef {
  pub station_id: i64,
  pub name:       String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeReport {
  pub canonical:                 String,
  /// The surviving row, if any station matched at all.
  pub anchor_id:                 Option<i64>,
  /// A variant renamed to the canonical name because no anchor existed.
  pub promoted:                  Option<StationRef>,
  /// Variants folded into the anchor and deleted.
  pub merged:                    Vec<StationRef>,
  pub reports_repointed:         usize,
  pub duplicate_reports_removed: usize,
  pub coordinates_updated:       bool,
  /// Fact rows whose `station` text was rewritten, per table.
  pub renamed_rows:              Vec<TableCount>,
}

impl MergeReport {
  pub fn new(canonical: impl Into<String>) -> Self {
    Self {
      canonical:                 canonical.into(),
      anchor_id:                 None,
      promoted:                  None,
      merged:                    Vec::new(),
      reports_repointed:         0,
      duplicate_reports_removed: 0,
      coordinates_updated:       false,
      renamed_rows:              Vec::new(),
    }
  }

  pub fn renamed_total(&self) -> usize { self.renamed_rows.iter().map(|t| t.rows).sum() }

  /// True when the pass found nothing left to do.
  pub fn is_noop(&self) -> bool {
    self.promoted.is_none()
      && self.merged.is_empty()
      && self.reports_repointed == 0
      && self.duplicate_reports_removed == 0
      && !self.coordinates_updated
      && self.renamed_total() == 0
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinateReport {
  pub station: NameCondition,
  pub updated: usize,
}

// ─── Verification ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistinctValues {
  pub table:  ArchiveTable,
  pub field:  Field,
  pub values: Vec<String>,
}

/// Stations whose names differ only by case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateName {
  pub name:        String,
  pub station_ids: Vec<i64>,
}

/// A read-only audit of the archive after a cleanup run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveSummary {
  pub table_counts:            Vec<TableCount>,
  pub categorical:             Vec<DistinctValues>,
  pub duplicate_station_names: Vec<DuplicateName>,
  /// Report ids whose station or document no longer exists.
  pub orphaned_reports:        Vec<i64>,
  /// Fact rows whose `station` text names no station, per table.
  pub unmatched_station_text:  Vec<TableCount>,
  pub orphaned_notes:          usize,
  /// `None` when the archive has no `hospital_notes` table.
  pub inspection_frequency:    Option<Histogram>,
  pub unlicensed_control:      Option<Histogram>,
  pub committee_supervision:   Option<Histogram>,
}

impl ArchiveSummary {
  pub fn rows(&self, table: ArchiveTable) -> Option<usize> {
    self
      .table_counts
      .iter()
      .find(|t| t.table == table)
      .map(|t| t.rows)
  }

  pub fn distinct(&self, table: ArchiveTable, field: Field) -> Option<&[String]> {
    self
      .categorical
      .iter()
      .find(|d| d.table == table && d.field == field)
      .map(|d| d.values.as_slice())
  }

  /// No duplicate station identities and no dangling references.
  pub fn is_consistent(&self) -> bool {
    self.duplicate_station_names.is_empty()
      && self.orphaned_reports.is_empty()
      && self.orphaned_notes == 0
  }
}

// ─── Statistics ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearCount {
  pub year:    String,
  pub records: usize,
}

/// Rows per reporting year of one fact table, in year order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearlyRecords {
  pub table: ArchiveTable,
  pub years: Vec<YearCount>,
}

impl YearlyRecords {
  pub fn records_in(&self, year: &str) -> usize {
    self
      .years
      .iter()
      .find(|y| y.year == year)
      .map_or(0, |y| y.records)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionStations {
  pub region:   String,
  pub country:  Option<String>,
  pub stations: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentReports {
  pub doc_id:      String,
  pub source_name: Option<String>,
  pub reports:     usize,
}

/// How often an act appears in `hospital_operations`, and at how many
/// distinct stations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActUsage {
  pub act:        String,
  pub operations: usize,
  pub stations:   usize,
}

/// Read-only aggregates over the archive's contents. Tables the archive
/// lacks contribute nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveStatistics {
  pub records_per_year:     Vec<YearlyRecords>,
  /// Most stations first.
  pub stations_by_region:   Vec<RegionStations>,
  /// Most-cited documents first; documents with no reports are included.
  pub documents_by_reports: Vec<DocumentReports>,
  /// Most-used act first.
  pub act_usage:            Vec<ActUsage>,
}

impl ArchiveStatistics {
  pub fn yearly(&self, table: ArchiveTable) -> Option<&YearlyRecords> {
    self.records_per_year.iter().find(|y| y.table == table)
  }

  pub fn act(&self, act: &str) -> Option<&ActUsage> { self.act_usage.iter().find(|a| a.act == act) }
}
