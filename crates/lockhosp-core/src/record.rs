//! Fact-table records.
//!
//! These rows reference their station by name, not by `station_id`. Keeping
//! that text in step with `stations.name` is the job of the station merge.

use serde::{Deserialize, Serialize};

/// One row of `hospital_operations`: a lock hospital in a given year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HospitalOperation {
  pub hid:                          String,
  pub doc_id:                       Option<String>,
  pub source_name:                  Option<String>,
  pub source_type:                  Option<String>,
  pub year:                         Option<i64>,
  pub region:                       Option<String>,
  pub station:                      Option<String>,
  pub country:                      Option<String>,
  pub act:                          Option<String>,
  pub class:                        Option<String>,
  pub staff_medical_officers:       Option<i64>,
  pub staff_hospital_assistants:    Option<i64>,
  pub staff_matron:                 Option<i64>,
  pub staff_coolies:                Option<i64>,
  pub staff_peons:                  Option<i64>,
  pub staff_watermen:               Option<i64>,
  pub ops_inspection_regularity:    Option<String>,
  pub ops_unlicensed_control_notes: Option<String>,
  pub ops_committee_activity_notes: Option<String>,
}

/// One row of `women_admission`: register movements at a station.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WomenAdmission {
  pub unique_id:            String,
  pub doc_id:               Option<String>,
  pub source_name:          Option<String>,
  pub source_type:          Option<String>,
  pub region:               Option<String>,
  pub station:              Option<String>,
  pub country:              Option<String>,
  pub year:                 Option<i64>,
  pub women_start_register: Option<i64>,
  pub women_added:          Option<i64>,
  pub women_end_register:   Option<i64>,
  pub discharges:           Option<i64>,
  pub deaths:               Option<i64>,
}

/// One row of `troops`: garrison strength at a station.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TroopRecord {
  pub unique_id:    String,
  pub doc_id:       Option<String>,
  pub source_name:  Option<String>,
  pub source_type:  Option<String>,
  pub region:       Option<String>,
  pub station:      Option<String>,
  pub country:      Option<String>,
  pub year:         Option<i64>,
  pub regiments:    Option<String>,
  pub avg_strength: Option<f64>,
}

/// A narrative annotation on a hospital operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HospitalNote {
  pub hid:                     String,
  pub inspection_freq:         Option<String>,
  pub unlicensed_control_type: Option<String>,
  pub committee_supervision:   Option<String>,
  pub remarks:                 Option<String>,
}
