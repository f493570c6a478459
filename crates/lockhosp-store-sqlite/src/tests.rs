//! Integration tests for `SqliteArchive` against an in-memory database.

use lockhosp_core::{
  normalize::Field,
  record::{HospitalNote, HospitalOperation, TroopRecord, WomenAdmission},
  station::{
    CoordinateRule, Coordinates, Document, MergeRule, NameCondition, NewStation,
    builtin_merge_rules,
  },
  store::ArchiveStore,
  table::ArchiveTable,
};

use crate::{Error, SqliteArchive, backup::backup_database};

async fn archive() -> SqliteArchive {
  SqliteArchive::open_in_memory()
    .await
    .expect("in-memory archive")
}

async fn exec(archive: &SqliteArchive, sql: &'static str) {
  archive
    .conn
    .call(move |conn| {
      conn.execute_batch(sql)?;
      Ok(())
    })
    .await
    .unwrap();
}

async fn scalar(archive: &SqliteArchive, sql: &'static str) -> i64 {
  archive
    .conn
    .call(move |conn| Ok(conn.query_row(sql, [], |r| r.get(0))?))
    .await
    .unwrap()
}

fn operation(hid: &str, station: &str) -> HospitalOperation {
  HospitalOperation {
    hid: hid.into(),
    doc_id: Some("D1".into()),
    station: Some(station.into()),
    year: Some(1875),
    ..HospitalOperation::default()
  }
}

fn sitabaldi_rule() -> MergeRule {
  MergeRule {
    canonical:   "Sitabaldi (Nagpur)".into(),
    variants:    vec![
      NameCondition::StartsWith("seetabuldee".into()),
      NameCondition::StartsWith("sitabaldi".into()),
    ],
    coordinates: Some(Coordinates::new(21.1430, 79.0871).unwrap()),
  }
}

// ─── Schema ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn schema_is_idempotent() {
  let a = archive().await;
  a.init_schema().await.unwrap();

  for table in [
    ArchiveTable::Documents,
    ArchiveTable::Stations,
    ArchiveTable::StationReports,
    ArchiveTable::HospitalOperations,
    ArchiveTable::HospitalNotes,
    ArchiveTable::WomenAdmission,
    ArchiveTable::Troops,
  ] {
    assert!(a.has_table(table).await.unwrap(), "{table} missing");
  }
  assert!(!a.has_table(ArchiveTable::WomenData).await.unwrap());
  assert!(!a.has_table(ArchiveTable::TroopData).await.unwrap());
}

#[tokio::test]
async fn add_and_list_stations() {
  let a = archive().await;
  let mut new = NewStation::named("Umballa");
  new.region = Some("Punjab".into());
  new.coordinates = Some(Coordinates::new(30.3752, 76.7821).unwrap());

  let added = a.add_station(new).await.unwrap();
  let listed = a.list_stations().await.unwrap();
  assert_eq!(listed, vec![added]);
}

#[tokio::test]
async fn duplicate_station_name_is_rejected() {
  let a = archive().await;
  a.add_station(NewStation::named("Umballa")).await.unwrap();
  let err = a.add_station(NewStation::named("Umballa")).await.unwrap_err();
  assert!(matches!(err, Error::Database(_)));
}

// ─── Standardization ─────────────────────────────────────────────────────────

#[tokio::test]
async fn standardize_hospital_operations() {
  let a = archive().await;

  let mut first = operation("H1", "Umballa");
  first.class = Some("2ND CLASS".into());
  first.act = Some("Act No. XXII of 1864 (amended)".into());
  first.region = Some("N.W. Provinces and Oudh".into());
  first.country = Some(" british  india ".into());
  a.add_hospital_operation(&first).await.unwrap();

  let mut second = operation("H2", "Rangoon");
  second.class = Some("Second Class".into());
  second.act = Some("xiv".into());
  second.region = Some("  Madras   Presidency ".into());
  a.add_hospital_operation(&second).await.unwrap();

  let report = a.standardize(ArchiveTable::HospitalOperations).await.unwrap();
  assert_eq!(report.rows, 2);
  assert_eq!(
    report.columns.iter().map(|c| c.field).collect::<Vec<_>>(),
    vec![Field::Class, Field::Act, Field::Region, Field::Country]
  );

  let class = report.column(Field::Class).unwrap();
  assert_eq!(class.before.count_of("2ND CLASS"), 1);
  assert_eq!(class.after.count_of("Second Class"), 2);
  assert_eq!(class.changed, 1);

  let act = report.column(Field::Act).unwrap();
  assert_eq!(act.after.count_of("Act XXII of 1864"), 1);
  assert_eq!(act.after.count_of("Xiv"), 1);

  let region = report.column(Field::Region).unwrap();
  assert_eq!(region.after.count_of("North-Western Provinces & Oudh"), 1);
  assert_eq!(region.after.count_of("Madras Presidency"), 1);

  let country = report.column(Field::Country).unwrap();
  assert_eq!(country.after.count_of("British India"), 1);
  assert_eq!(country.after.nulls, 1);
  assert_eq!(country.changed, 1);

  let summary = a.summarize().await.unwrap();
  assert_eq!(
    summary.distinct(ArchiveTable::HospitalOperations, Field::Act).unwrap(),
    ["Act XXII of 1864", "Xiv"]
  );
}

#[tokio::test]
async fn standardize_twice_changes_nothing() {
  let a = archive().await;
  a.add_women_admission(&WomenAdmission {
    unique_id: "W1".into(),
    region: Some("british burma".into()),
    country: Some("India (British Burma)".into()),
    station: Some("Rangoon".into()),
    ..WomenAdmission::default()
  })
  .await
  .unwrap();

  let first = a.standardize(ArchiveTable::WomenAdmission).await.unwrap();
  assert_eq!(first.changed(), 2);

  let second = a.standardize(ArchiveTable::WomenAdmission).await.unwrap();
  assert_eq!(second.changed(), 0);
  assert_eq!(second.column(Field::Region).unwrap().after.count_of("Burma"), 1);
  assert_eq!(
    second.column(Field::Country).unwrap().after.count_of("British Burma"),
    1
  );
}

#[tokio::test]
async fn standardize_preserves_nulls() {
  let a = archive().await;
  a.add_troop_record(&TroopRecord { unique_id: "T1".into(), ..TroopRecord::default() })
    .await
    .unwrap();

  let report = a.standardize(ArchiveTable::Troops).await.unwrap();
  assert_eq!(report.changed(), 0);
  assert_eq!(report.column(Field::Region).unwrap().after.nulls, 1);
  assert_eq!(scalar(&a, "SELECT COUNT(*) FROM troops WHERE region IS NULL").await, 1);
}

#[tokio::test]
async fn standardize_missing_table_is_an_error() {
  let a = archive().await;
  let err = a.standardize(ArchiveTable::WomenData).await.unwrap_err();
  assert!(matches!(err, Error::MissingTable(ArchiveTable::WomenData)));
}

#[tokio::test]
async fn standardize_table_without_categorical_columns() {
  let a = archive().await;
  a.add_document(&Document::new("D1")).await.unwrap();
  let report = a.standardize(ArchiveTable::Documents).await.unwrap();
  assert_eq!(report.rows, 1);
  assert!(report.columns.is_empty());
}

#[tokio::test]
async fn drop_staff_columns_keeps_rows() {
  let a = archive().await;
  let mut op = operation("H1", "Muttra");
  op.staff_matron = Some(1);
  op.ops_inspection_regularity = Some("weekly".into());
  a.add_hospital_operation(&op).await.unwrap();

  let dropped = a.drop_staff_columns().await.unwrap();
  assert_eq!(dropped.len(), 6);
  assert!(dropped.iter().all(|c| c.starts_with("staff_")));

  assert_eq!(scalar(&a, "SELECT COUNT(*) FROM hospital_operations").await, 1);
  assert_eq!(
    scalar(
      &a,
      "SELECT COUNT(*) FROM pragma_table_info('hospital_operations') WHERE name LIKE 'staff_%'"
    )
    .await,
    0
  );
  assert_eq!(
    scalar(
      &a,
      "SELECT COUNT(*) FROM hospital_operations WHERE ops_inspection_regularity = 'weekly'"
    )
    .await,
    1
  );

  assert!(a.drop_staff_columns().await.unwrap().is_empty());
}

// ─── Station merges ──────────────────────────────────────────────────────────

#[tokio::test]
async fn merge_promotes_and_folds_variants() {
  let a = archive().await;
  a.add_document(&Document::new("D1")).await.unwrap();
  a.add_document(&Document::new("D2")).await.unwrap();

  let seeta = a.add_station(NewStation::named("Seetabuldee")).await.unwrap();
  let sita = a.add_station(NewStation::named("Sitabaldi")).await.unwrap();
  a.add_station_report("D1".into(), seeta.station_id).await.unwrap();
  a.add_station_report("D2".into(), sita.station_id).await.unwrap();
  a.add_hospital_operation(&operation("H1", "Seetabuldee")).await.unwrap();
  a.add_hospital_operation(&operation("H2", "Sitabaldi")).await.unwrap();

  let report = a.merge_stations(&sitabaldi_rule()).await.unwrap();
  assert_eq!(report.anchor_id, Some(seeta.station_id));
  assert_eq!(report.promoted.as_ref().map(|s| s.station_id), Some(seeta.station_id));
  assert_eq!(report.merged.len(), 1);
  assert_eq!(report.merged[0].station_id, sita.station_id);
  assert_eq!(report.reports_repointed, 1);
  assert!(report.coordinates_updated);
  assert_eq!(report.renamed_total(), 2);

  let stations = a.list_stations().await.unwrap();
  assert_eq!(stations.len(), 1);
  assert_eq!(stations[0].name, "Sitabaldi (Nagpur)");
  let coords = stations[0].coordinates.unwrap();
  assert_eq!((coords.latitude(), coords.longitude()), (21.1430, 79.0871));

  let reports = a.list_station_reports().await.unwrap();
  assert_eq!(reports.len(), 2);
  assert!(reports.iter().all(|r| r.station_id == seeta.station_id));

  assert_eq!(
    scalar(&a, "SELECT COUNT(*) FROM hospital_operations WHERE station = 'Sitabaldi (Nagpur)'")
      .await,
    2
  );

  let summary = a.summarize().await.unwrap();
  assert!(summary.is_consistent());
  assert!(summary.orphaned_reports.is_empty());
}

#[tokio::test]
async fn merged_station_leaves_no_references() {
  let a = archive().await;
  a.add_document(&Document::new("D1")).await.unwrap();
  let anchor = a.add_station(NewStation::named("Sitabaldi (Nagpur)")).await.unwrap();
  let variant = a.add_station(NewStation::named("SEETABULDEE")).await.unwrap();
  a.add_station_report("D1".into(), variant.station_id).await.unwrap();

  let report = a.merge_stations(&sitabaldi_rule()).await.unwrap();
  assert_eq!(report.anchor_id, Some(anchor.station_id));
  assert!(report.promoted.is_none());

  let reports = a.list_station_reports().await.unwrap();
  assert!(reports.iter().all(|r| r.station_id != variant.station_id));
  let stations = a.list_stations().await.unwrap();
  assert!(stations.iter().all(|s| s.station_id != variant.station_id));
}

#[tokio::test]
async fn second_merge_is_noop() {
  let a = archive().await;
  a.add_document(&Document::new("D1")).await.unwrap();
  let s = a.add_station(NewStation::named("Seetabuldee")).await.unwrap();
  a.add_station(NewStation::named("Sitabaldi")).await.unwrap();
  a.add_station_report("D1".into(), s.station_id).await.unwrap();
  a.add_hospital_operation(&operation("H1", "sitabaldi")).await.unwrap();

  let first = a.merge_stations(&sitabaldi_rule()).await.unwrap();
  assert!(!first.is_noop());

  let second = a.merge_stations(&sitabaldi_rule()).await.unwrap();
  assert!(second.is_noop(), "{second:?}");
  assert_eq!(second.anchor_id, first.anchor_id);
}

#[tokio::test]
async fn merge_collapses_duplicate_reports() {
  let a = archive().await;
  a.add_document(&Document::new("D1")).await.unwrap();
  let anchor = a.add_station(NewStation::named("Rangoon")).await.unwrap();
  let variant = a
    .add_station(NewStation::named("India (British Burma)+G143"))
    .await
    .unwrap();
  a.add_station_report("D1".into(), anchor.station_id).await.unwrap();
  a.add_station_report("D1".into(), variant.station_id).await.unwrap();

  let rangoon = builtin_merge_rules().remove(0);
  let report = a.merge_stations(&rangoon).await.unwrap();
  assert_eq!(report.reports_repointed, 1);
  assert_eq!(report.duplicate_reports_removed, 1);
  assert!(!report.coordinates_updated);

  let reports = a.list_station_reports().await.unwrap();
  assert_eq!(reports.len(), 1);
  assert_eq!(reports[0].station_id, anchor.station_id);
}

#[tokio::test]
async fn merge_keeps_anchor_reports_without_a_document() {
  let a = archive().await;
  let anchor = a.add_station(NewStation::named("Sitabaldi (Nagpur)")).await.unwrap();
  a.add_station(NewStation::named("Seetabuldee")).await.unwrap();
  exec(
    &a,
    "INSERT INTO station_reports (doc_id, station_id) VALUES (NULL, 1), (NULL, 1)",
  )
  .await;

  let report = a.merge_stations(&sitabaldi_rule()).await.unwrap();
  assert_eq!(report.anchor_id, Some(anchor.station_id));
  assert_eq!(report.duplicate_reports_removed, 0);

  let reports = a.list_station_reports().await.unwrap();
  assert_eq!(reports.len(), 2);
  assert!(reports.iter().all(|r| r.doc_id.is_none()));
}

#[tokio::test]
async fn merge_without_matches_touches_nothing() {
  let a = archive().await;
  a.add_station(NewStation::named("Umballa")).await.unwrap();

  let report = a.merge_stations(&sitabaldi_rule()).await.unwrap();
  assert!(report.is_noop());
  assert_eq!(report.anchor_id, None);
  assert_eq!(a.list_stations().await.unwrap().len(), 1);
}

#[tokio::test]
async fn merge_promotes_lowest_id_of_first_condition() {
  let a = archive().await;
  let sita = a.add_station(NewStation::named("Sitabaldi")).await.unwrap();
  let seeta_b = a.add_station(NewStation::named("Seetabuldee Bazaar")).await.unwrap();
  let seeta_a = a.add_station(NewStation::named("Seetabuldee")).await.unwrap();

  let report = a.merge_stations(&sitabaldi_rule()).await.unwrap();
  assert_eq!(report.anchor_id, Some(seeta_b.station_id));
  let merged: Vec<i64> = report.merged.iter().map(|s| s.station_id).collect();
  assert_eq!(merged, vec![seeta_a.station_id, sita.station_id]);
}

#[tokio::test]
async fn merge_rewrites_legacy_tables_when_present() {
  let a = archive().await;
  exec(
    &a,
    "CREATE TABLE women_data (unique_id TEXT PRIMARY KEY, station TEXT, region TEXT);
     INSERT INTO women_data VALUES ('W1', 'India (British Burma)', NULL);
     INSERT INTO women_data VALUES ('W2', 'Moulmein', NULL);",
  )
  .await;
  a.add_troop_record(&TroopRecord {
    unique_id: "T1".into(),
    station: Some("india (british burma)+G143".into()),
    ..TroopRecord::default()
  })
  .await
  .unwrap();

  let rangoon = builtin_merge_rules().remove(0);
  let report = a.merge_stations(&rangoon).await.unwrap();

  let rows_for = |table: ArchiveTable| {
    report
      .renamed_rows
      .iter()
      .find(|t| t.table == table)
      .map(|t| t.rows)
  };
  assert_eq!(rows_for(ArchiveTable::WomenData), Some(1));
  assert_eq!(rows_for(ArchiveTable::Troops), Some(1));
  assert_eq!(rows_for(ArchiveTable::TroopData), None);

  assert_eq!(scalar(&a, "SELECT COUNT(*) FROM women_data WHERE station = 'Rangoon'").await, 1);
  assert_eq!(scalar(&a, "SELECT COUNT(*) FROM troops WHERE station = 'Rangoon'").await, 1);
}

#[tokio::test]
async fn invalid_rule_is_rejected_before_touching_the_archive() {
  let a = archive().await;
  let rule = MergeRule { canonical: " ".into(), variants: vec![], coordinates: None };
  assert!(matches!(a.merge_stations(&rule).await, Err(Error::Core(_))));
}

// ─── Coordinates ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn coordinate_rule_updates_once() {
  let a = archive().await;
  a.add_station(NewStation::named("Mooltan")).await.unwrap();
  a.add_station(NewStation::named("Mooltan Cantonment")).await.unwrap();
  a.add_station(NewStation::named("Muttra")).await.unwrap();

  let rule = CoordinateRule {
    station:     NameCondition::StartsWith("mooltan".into()),
    coordinates: Coordinates::new(30.1979793, 71.4724978).unwrap(),
  };
  assert_eq!(a.apply_coordinates(&rule).await.unwrap().updated, 2);
  assert_eq!(a.apply_coordinates(&rule).await.unwrap().updated, 0);

  let stations = a.list_stations().await.unwrap();
  assert!(stations[2].coordinates.is_none());
}

// ─── Verification ────────────────────────────────────────────────────────────

#[tokio::test]
async fn summary_flags_inconsistencies() {
  let a = archive().await;
  a.add_document(&Document::new("D1")).await.unwrap();
  let umballa = a.add_station(NewStation::named("Umballa")).await.unwrap();
  let upper = a.add_station(NewStation::named("UMBALLA")).await.unwrap();
  a.add_station_report("D1".into(), umballa.station_id).await.unwrap();
  let dangling = a.add_station_report("D1".into(), 999).await.unwrap();
  let no_doc = a.add_station_report("D9".into(), umballa.station_id).await.unwrap();

  a.add_hospital_operation(&operation("H1", "Umballa")).await.unwrap();
  a.add_hospital_operation(&operation("H2", "Umbala")).await.unwrap();
  a.add_hospital_note(&HospitalNote {
    hid: "H1".into(),
    inspection_freq: Some("Weekly".into()),
    ..HospitalNote::default()
  })
  .await
  .unwrap();
  a.add_hospital_note(&HospitalNote {
    hid: "H404".into(),
    inspection_freq: Some("Weekly".into()),
    ..HospitalNote::default()
  })
  .await
  .unwrap();

  let summary = a.summarize().await.unwrap();
  assert!(!summary.is_consistent());
  assert_eq!(summary.rows(ArchiveTable::Stations), Some(2));
  assert_eq!(summary.rows(ArchiveTable::StationReports), Some(3));
  assert_eq!(summary.rows(ArchiveTable::WomenData), None);

  assert_eq!(summary.duplicate_station_names.len(), 1);
  assert_eq!(summary.duplicate_station_names[0].name, "umballa");
  assert_eq!(
    summary.duplicate_station_names[0].station_ids,
    vec![umballa.station_id, upper.station_id]
  );

  assert_eq!(summary.orphaned_reports, vec![dangling.report_id, no_doc.report_id]);
  assert_eq!(summary.orphaned_notes, 1);

  let unmatched = summary
    .unmatched_station_text
    .iter()
    .find(|t| t.table == ArchiveTable::HospitalOperations)
    .unwrap();
  assert_eq!(unmatched.rows, 1);

  let freq = summary.inspection_frequency.unwrap();
  assert_eq!(freq.count_of("Weekly"), 2);
}

#[tokio::test]
async fn empty_archive_is_consistent() {
  let a = archive().await;
  let summary = a.summarize().await.unwrap();
  assert!(summary.is_consistent());
  assert_eq!(summary.rows(ArchiveTable::Documents), Some(0));
  assert_eq!(summary.inspection_frequency.map(|h| h.non_null()), Some(0));
}

#[tokio::test]
async fn summary_counts_note_categories() {
  let a = archive().await;
  a.add_hospital_operation(&operation("H1", "Umballa")).await.unwrap();
  for (control, committee) in [
    (Some("Police"), Some("Monthly committee")),
    (Some("Police"), None),
    (Some("None"), Some("Monthly committee")),
  ] {
    a.add_hospital_note(&HospitalNote {
      hid: "H1".into(),
      unlicensed_control_type: control.map(Into::into),
      committee_supervision: committee.map(Into::into),
      ..HospitalNote::default()
    })
    .await
    .unwrap();
  }

  let summary = a.summarize().await.unwrap();
  let control = summary.unlicensed_control.unwrap();
  assert_eq!(control.count_of("Police"), 2);
  assert_eq!(control.count_of("None"), 0);
  assert_eq!(control.nulls, 1);

  let committee = summary.committee_supervision.unwrap();
  assert_eq!(committee.count_of("Monthly committee"), 2);
  assert_eq!(committee.nulls, 1);
}

#[tokio::test]
async fn station_report_without_document_reads_back_as_none() {
  let a = archive().await;
  a.add_document(&Document::new("D1")).await.unwrap();
  let s = a.add_station(NewStation::named("Mhow")).await.unwrap();
  exec(&a, "INSERT INTO station_reports (doc_id, station_id) VALUES (NULL, 1)").await;
  a.add_station_report("D1".into(), s.station_id).await.unwrap();

  let reports = a.list_station_reports().await.unwrap();
  assert_eq!(reports[0].doc_id, None);
  assert_eq!(reports[1].doc_id.as_deref(), Some("D1"));

  // Reports without a document are not dangling.
  assert!(a.summarize().await.unwrap().orphaned_reports.is_empty());
}

#[tokio::test]
async fn statistics_aggregate_archive_contents() {
  let a = archive().await;
  let mut doc = Document::new("D1");
  doc.source_name = Some("Report on Lock Hospitals, 1875".into());
  a.add_document(&doc).await.unwrap();
  a.add_document(&Document::new("D2")).await.unwrap();

  for (name, region) in [("Umballa", "Punjab"), ("Mooltan", "Punjab"), ("Rangoon", "Burma")] {
    let mut new = NewStation::named(name);
    new.region = Some(region.into());
    let station = a.add_station(new).await.unwrap();
    a.add_station_report("D1".into(), station.station_id).await.unwrap();
  }
  a.add_station(NewStation::named("Nowhere")).await.unwrap();

  let mut ops = vec![
    operation("H1", "Umballa"),
    operation("H2", "Umballa"),
    operation("H3", "Mooltan"),
    operation("H4", "Rangoon"),
  ];
  ops[0].act = Some("Act XXII of 1864".into());
  ops[1].act = Some("Act XXII of 1864".into());
  ops[2].act = Some("Act XXII of 1864".into());
  ops[3].act = Some("None".into());
  ops[3].year = Some(1876);
  for op in &ops {
    a.add_hospital_operation(op).await.unwrap();
  }

  let stats = a.statistics().await.unwrap();

  let yearly = stats.yearly(ArchiveTable::HospitalOperations).unwrap();
  assert_eq!(yearly.records_in("1875"), 3);
  assert_eq!(yearly.records_in("1876"), 1);
  assert_eq!(yearly.years[0].year, "1875");
  assert!(stats.yearly(ArchiveTable::Troops).unwrap().years.is_empty());
  assert!(stats.yearly(ArchiveTable::TroopData).is_none());

  assert_eq!(stats.stations_by_region.len(), 2);
  assert_eq!(stats.stations_by_region[0].region, "Punjab");
  assert_eq!(stats.stations_by_region[0].stations, 2);

  let docs: Vec<(&str, usize)> = stats
    .documents_by_reports
    .iter()
    .map(|d| (d.doc_id.as_str(), d.reports))
    .collect();
  assert_eq!(docs, vec![("D1", 3), ("D2", 0)]);
  assert_eq!(
    stats.documents_by_reports[0].source_name.as_deref(),
    Some("Report on Lock Hospitals, 1875")
  );

  assert_eq!(stats.act_usage.len(), 1);
  let act = stats.act("Act XXII of 1864").unwrap();
  assert_eq!((act.operations, act.stations), (3, 2));
}

#[tokio::test]
async fn read_only_open_leaves_legacy_file_untouched() {
  let dir = tempfile::TempDir::new().unwrap();
  let db = dir.path().join("legacy.db");
  {
    let conn = rusqlite::Connection::open(&db).unwrap();
    conn
      .execute_batch(
        "CREATE TABLE stations (
           station_id INTEGER PRIMARY KEY, name TEXT, region TEXT, country TEXT,
           latitude REAL, longitude REAL, notes TEXT
         );
         CREATE TABLE women_data (unique_id TEXT, station TEXT, region TEXT, year INTEGER);
         INSERT INTO stations (name) VALUES ('Umballa');
         INSERT INTO women_data VALUES ('W1', 'Umbala', 'punjab', 1875);",
      )
      .unwrap();
  }
  let before = std::fs::read(&db).unwrap();

  let a = SqliteArchive::open_read_only(&db).await.unwrap();
  let summary = a.summarize().await.unwrap();
  let stats = a.statistics().await.unwrap();
  assert!(a.add_station(NewStation::named("Mhow")).await.is_err());
  a.close().await.unwrap();

  assert_eq!(summary.rows(ArchiveTable::WomenData), Some(1));
  assert_eq!(summary.rows(ArchiveTable::HospitalOperations), None);
  assert_eq!(stats.yearly(ArchiveTable::WomenData).unwrap().records_in("1875"), 1);

  let conn = rusqlite::Connection::open(&db).unwrap();
  let tables: i64 = conn
    .query_row("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'", [], |r| r.get(0))
    .unwrap();
  assert_eq!(tables, 2);
  drop(conn);
  assert_eq!(std::fs::read(&db).unwrap(), before);
}

// ─── Backup ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn backup_copies_file_into_new_directory() {
  let dir = tempfile::TempDir::new().unwrap();
  let db = dir.path().join("medical_lock_hospitals.db");
  let a = SqliteArchive::open(&db).await.unwrap();
  a.add_station(NewStation::named("Fyzabad")).await.unwrap();
  a.close().await.unwrap();

  let backups = dir.path().join("archive").join("backups");
  let first = backup_database(&db, &backups).await.unwrap();
  let second = backup_database(&db, &backups).await.unwrap();

  assert_ne!(first, second);
  assert!(first.starts_with(&backups));
  let name = first.file_name().unwrap().to_string_lossy().into_owned();
  assert!(name.starts_with("medical_lock_hospitals_backup_"));
  assert!(name.ends_with(".db"));
  assert_eq!(std::fs::read(&db).unwrap(), std::fs::read(&first).unwrap());

  let restored = SqliteArchive::open(&second).await.unwrap();
  assert_eq!(restored.list_stations().await.unwrap()[0].name, "Fyzabad");
}

#[tokio::test]
async fn backup_of_missing_database_fails() {
  let dir = tempfile::TempDir::new().unwrap();
  let err = backup_database(&dir.path().join("absent.db"), dir.path())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::DatabaseNotFound(_)));
}
