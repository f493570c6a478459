//! Catalogue of the tables that make up the archive.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator as _};

/// A table of the archive database. The string form is the SQL table name.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
  AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ArchiveTable {
  Documents,
  Stations,
  StationReports,
  HospitalOperations,
  HospitalNotes,
  WomenAdmission,
  Troops,
  /// Pre-reimport name of `women_admission`; only present in older files.
  WomenData,
  /// Pre-reimport name of `troops`; only present in older files.
  TroopData,
}

impl ArchiveTable {
  /// Tables that carry a denormalized `station` name column instead of a key
  /// into `stations`.
  pub fn with_station_text() -> impl Iterator<Item = Self> {
    Self::iter().filter(|t| t.has_station_text())
  }

  pub fn has_station_text(self) -> bool {
    matches!(
      self,
      Self::HospitalOperations
        | Self::WomenAdmission
        | Self::Troops
        | Self::WomenData
        | Self::TroopData
    )
  }

  /// Whether the schema creates this table. Legacy tables are only ever
  /// read or cleaned when an older file already has them.
  pub fn is_legacy(self) -> bool { matches!(self, Self::WomenData | Self::TroopData) }

  /// The column holding the station name for station-text tables.
  pub fn station_column(self) -> Option<&'static str> {
    self.has_station_text().then_some("station")
  }
}
