//! Stations, the documents that report on them, and the rules used to merge
//! spelling variants of one station into a single canonical row.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Entities ────────────────────────────────────────────────────────────────

/// A source document (report, returns volume, correspondence).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
  pub doc_id:      String,
  pub source_name: Option<String>,
  #[serde(rename = "type")]
  pub kind:        Option<String>,
  pub link:        Option<String>,
  pub notes:       Option<String>,
}

impl Document {
  pub fn new(doc_id: impl Into<String>) -> Self {
    Self {
      doc_id:      doc_id.into(),
      source_name: None,
      kind:        None,
      link:        None,
      notes:       None,
    }
  }
}

/// A named administrative or military location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
  pub station_id:  i64,
  pub name:        String,
  pub region:      Option<String>,
  pub country:     Option<String>,
  pub coordinates: Option<Coordinates>,
  pub notes:       Option<String>,
}

/// Input for inserting a station; the store assigns `station_id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewStation {
  pub name:        String,
  pub region:      Option<String>,
  pub country:     Option<String>,
  pub coordinates: Option<Coordinates>,
  pub notes:       Option<String>,
}

impl NewStation {
  pub fn named(name: impl Into<String>) -> Self {
    Self { name: name.into(), ..Self::default() }
  }
}

/// Associates a document with a station it reports on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationReport {
  pub report_id:  i64,
  /// Absent for reports imported without a source document.
  pub doc_id:     Option<String>,
  pub station_id: i64,
}

// ─── Coordinates ─────────────────────────────────────────────────────────────

/// A validated latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinates")]
pub struct Coordinates {
  latitude:  f64,
  longitude: f64,
}

#[derive(Deserialize)]
struct RawCoordinates {
  latitude:  f64,
  longitude: f64,
}

impl TryFrom<RawCoordinates> for Coordinates {
  type Error = Error;

  fn try_from(raw: RawCoordinates) -> Result<Self> {
    Self::new(raw.latitude, raw.longitude)
  }
}

impl Coordinates {
  pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
    if !(-90.0..=90.0).contains(&latitude) {
      return Err(Error::LatitudeOutOfRange(latitude));
    }
    if !(-180.0..=180.0).contains(&longitude) {
      return Err(Error::LongitudeOutOfRange(longitude));
    }
    Ok(Self { latitude, longitude })
  }

  pub fn latitude(&self) -> f64 { self.latitude }

  pub fn longitude(&self) -> f64 { self.longitude }
}

// ─── Name conditions ─────────────────────────────────────────────────────────

/// A case-insensitive test on a station name.
///
/// Backends compile these into parameterised SQL; [`NameCondition::matches`]
/// is the in-memory equivalent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameCondition {
  Equals(String),
  StartsWith(String),
  Contains(String),
}

impl NameCondition {
  /// The lower-cased text the condition compares against.
  pub fn pattern(&self) -> String {
    match self {
      Self::Equals(p) | Self::StartsWith(p) | Self::Contains(p) => p.to_lowercase(),
    }
  }

  pub fn matches(&self, name: &str) -> bool {
    let name = name.to_lowercase();
    let pattern = self.pattern();
    match self {
      Self::Equals(_) => name == pattern,
      Self::StartsWith(_) => name.starts_with(&pattern),
      Self::Contains(_) => name.contains(&pattern),
    }
  }

  fn validate(&self) -> Result<()> {
    if self.pattern().trim().is_empty() {
      return Err(Error::BlankCondition);
    }
    Ok(())
  }
}

// ─── Rules ───────────────────────────────────────────────────────────────────

/// Collapse every station matching one of `variants` into a single row
/// named `canonical`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeRule {
  pub canonical:   String,
  pub variants:    Vec<NameCondition>,
  /// Written onto the canonical row once the merge is done.
  #[serde(default)]
  pub coordinates: Option<Coordinates>,
}

impl MergeRule {
  pub fn validate(&self) -> Result<()> {
    if self.canonical.trim().is_empty() {
      return Err(Error::BlankCanonicalName);
    }
    if self.variants.is_empty() {
      return Err(Error::EmptyMergeRule(self.canonical.clone()));
    }
    self.variants.iter().try_for_each(NameCondition::validate)
  }
}

/// Set coordinates on every station matching `station`, keeping its name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinateRule {
  pub station:     NameCondition,
  pub coordinates: Coordinates,
}

impl CoordinateRule {
  pub fn validate(&self) -> Result<()> { self.station.validate() }
}

fn coords(latitude: f64, longitude: f64) -> Coordinates {
  Coordinates { latitude, longitude }
}

/// Merges carried out on the archive so far.
pub fn builtin_merge_rules() -> Vec<MergeRule> {
  vec![
    MergeRule {
      canonical:   "Rangoon".into(),
      variants:    vec![
        NameCondition::Equals("India (British Burma)".into()),
        NameCondition::Equals("India (British Burma)+G143".into()),
        NameCondition::StartsWith("India (British Burma)".into()),
      ],
      coordinates: None,
    },
    MergeRule {
      canonical:   "Sitabaldi (Nagpur)".into(),
      variants:    vec![
        NameCondition::StartsWith("Seetabuldee".into()),
        NameCondition::StartsWith("Sitabaldi".into()),
      ],
      coordinates: Some(coords(21.1430, 79.0871)),
    },
  ]
}

/// Stations whose names are already canonical but which lacked coordinates.
pub fn builtin_coordinate_rules() -> Vec<CoordinateRule> {
  [
    ("Tonghoo", 18.9398, 96.4344),
    ("Jubbulpore", 23.1686, 79.9339),
    ("Muttra", 27.4924, 77.6737),
    ("Umballa", 30.3752, 76.7821),
    ("Meean Meer", 31.5484, 74.3602),
    ("Fyzabad", 26.7730, 82.1458),
    ("Mooltan", 30.1979793, 71.4724978),
  ]
  .into_iter()
  .map(|(name, lat, lon)| CoordinateRule {
    station:     NameCondition::StartsWith(name.into()),
    coordinates: coords(lat, lon),
  })
  .collect()
}
