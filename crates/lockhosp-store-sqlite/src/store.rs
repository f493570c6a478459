//! [`SqliteArchive`] — the SQLite implementation of [`ArchiveStore`].

use std::path::Path;

use lockhosp_core::{
  record::{HospitalNote, HospitalOperation, TroopRecord, WomenAdmission},
  report::{
    ArchiveStatistics, ArchiveSummary, CoordinateReport, MergeReport, StandardizationReport,
  },
  station::{CoordinateRule, Document, MergeRule, NewStation, Station, StationReport},
  store::ArchiveStore,
  table::ArchiveTable,
};
use rusqlite::OpenFlags;

use crate::{
  encode::{RawStation, table_exists},
  resolve, schema::SCHEMA, standardize, verify, Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A lock hospital archive backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. The file
/// is closed when the last clone is dropped, or explicitly via
/// [`SqliteArchive::close`].
#[derive(Clone)]
pub struct SqliteArchive {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteArchive {
  /// Open (or create) an archive at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let archive = Self { conn };
    archive.init_schema().await?;
    Ok(archive)
  }

  /// Open an existing archive for auditing. No schema is applied and any
  /// write through this handle fails, so legacy files are left as found.
  pub async fn open_read_only(path: impl AsRef<Path>) -> Result<Self> {
    let conn =
      tokio_rusqlite::Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY).await?;
    Ok(Self { conn })
  }

  /// Open an in-memory archive — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let archive = Self { conn };
    archive.init_schema().await?;
    Ok(archive)
  }

  pub(crate) async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Close the underlying connection, surfacing any error SQLite reports.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    Ok(())
  }
}

// ─── ArchiveStore impl ───────────────────────────────────────────────────────

impl ArchiveStore for SqliteArchive {
  type Error = Error;

  async fn has_table(&self, table: ArchiveTable) -> Result<bool> {
    Ok(
      self
        .conn
        .call(move |conn| Ok(table_exists(conn, table)?))
        .await?,
    )
  }

  // ── Inserts ───────────────────────────────────────────────────────────────

  async fn add_document(&self, document: &Document) -> Result<()> {
    let doc = document.clone();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR IGNORE INTO documents (doc_id, source_name, type, link, notes)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![doc.doc_id, doc.source_name, doc.kind, doc.link, doc.notes],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn add_station(&self, station: NewStation) -> Result<Station> {
    let lat = station.coordinates.map(|c| c.latitude());
    let lon = station.coordinates.map(|c| c.longitude());
    let (name, region, country, notes) = (
      station.name.clone(),
      station.region.clone(),
      station.country.clone(),
      station.notes.clone(),
    );

    let station_id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO stations (name, region, country, latitude, longitude, notes)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![name, region, country, lat, lon, notes],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Station {
      station_id,
      name: station.name,
      region: station.region,
      country: station.country,
      coordinates: station.coordinates,
      notes: station.notes,
    })
  }

  async fn add_station_report(&self, doc_id: String, station_id: i64) -> Result<StationReport> {
    let doc = doc_id.clone();
    let report_id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO station_reports (doc_id, station_id) VALUES (?1, ?2)",
          rusqlite::params![doc, station_id],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(StationReport { report_id, doc_id: Some(doc_id), station_id })
  }

  async fn add_hospital_operation(&self, row: &HospitalOperation) -> Result<()> {
    let r = row.clone();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR REPLACE INTO hospital_operations (
             hid, doc_id, source_name, source_type, year, region, station, country,
             act, class, staff_medical_officers, staff_hospital_assistants,
             staff_matron, staff_coolies, staff_peons, staff_watermen,
             ops_inspection_regularity, ops_unlicensed_control_notes,
             ops_committee_activity_notes
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14,
                     ?15, ?16, ?17, ?18, ?19)",
          rusqlite::params![
            r.hid,
            r.doc_id,
            r.source_name,
            r.source_type,
            r.year,
            r.region,
            r.station,
            r.country,
            r.act,
            r.class,
            r.staff_medical_officers,
            r.staff_hospital_assistants,
            r.staff_matron,
            r.staff_coolies,
            r.staff_peons,
            r.staff_watermen,
            r.ops_inspection_regularity,
            r.ops_unlicensed_control_notes,
            r.ops_committee_activity_notes,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn add_women_admission(&self, row: &WomenAdmission) -> Result<()> {
    let r = row.clone();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR REPLACE INTO women_admission (
             unique_id, doc_id, source_name, source_type, region, station, country,
             year, women_start_register, women_added, women_end_register,
             discharges, deaths
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
          rusqlite::params![
            r.unique_id,
            r.doc_id,
            r.source_name,
            r.source_type,
            r.region,
            r.station,
            r.country,
            r.year,
            r.women_start_register,
            r.women_added,
            r.women_end_register,
            r.discharges,
            r.deaths,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn add_troop_record(&self, row: &TroopRecord) -> Result<()> {
    let r = row.clone();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR REPLACE INTO troops (
             unique_id, doc_id, source_name, source_type, region, station, country,
             year, regiments, avg_strength
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
          rusqlite::params![
            r.unique_id,
            r.doc_id,
            r.source_name,
            r.source_type,
            r.region,
            r.station,
            r.country,
            r.year,
            r.regiments,
            r.avg_strength,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn add_hospital_note(&self, note: &HospitalNote) -> Result<i64> {
    let n = note.clone();
    let note_id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO hospital_notes (
             hid, inspection_freq, unlicensed_control_type, committee_supervision, remarks
           ) VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![
            n.hid,
            n.inspection_freq,
            n.unlicensed_control_type,
            n.committee_supervision,
            n.remarks,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;
    Ok(note_id)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn list_stations(&self) -> Result<Vec<Station>> {
    let raws: Vec<RawStation> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM stations ORDER BY station_id",
          RawStation::COLUMNS
        ))?;
        let rows = stmt
          .query_map([], RawStation::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawStation::into_station).collect()
  }

  async fn list_station_reports(&self) -> Result<Vec<StationReport>> {
    let reports = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare("SELECT report_id, doc_id, station_id FROM station_reports ORDER BY report_id")?;
        let rows = stmt
          .query_map([], |row| {
            Ok(StationReport {
              report_id:  row.get(0)?,
              doc_id:     row.get(1)?,
              station_id: row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(reports)
  }

  // ── Cleanup passes ────────────────────────────────────────────────────────

  async fn standardize(&self, table: ArchiveTable) -> Result<StandardizationReport> {
    self
      .conn
      .call(move |conn| Ok(standardize::standardize_table(conn, table)?))
      .await?
      .ok_or(Error::MissingTable(table))
  }

  async fn drop_staff_columns(&self) -> Result<Vec<String>> {
    self
      .conn
      .call(|conn| Ok(standardize::drop_staff_columns(conn)?))
      .await?
      .ok_or(Error::MissingTable(ArchiveTable::HospitalOperations))
  }

  async fn merge_stations(&self, rule: &MergeRule) -> Result<MergeReport> {
    rule.validate()?;
    let rule = rule.clone();
    let report = self
      .conn
      .call(move |conn| Ok(resolve::merge_stations(conn, &rule)?))
      .await?;
    Ok(report)
  }

  async fn apply_coordinates(&self, rule: &CoordinateRule) -> Result<CoordinateReport> {
    rule.validate()?;
    let rule = rule.clone();
    let report = self
      .conn
      .call(move |conn| Ok(resolve::apply_coordinates(conn, &rule)?))
      .await?;
    Ok(report)
  }

  // ── Verification ──────────────────────────────────────────────────────────

  async fn summarize(&self) -> Result<ArchiveSummary> {
    let summary = self
      .conn
      .call(|conn| Ok(verify::summarize(conn)?))
      .await?;
    Ok(summary)
  }

  async fn statistics(&self) -> Result<ArchiveStatistics> {
    let stats = self
      .conn
      .call(|conn| Ok(verify::statistics(conn)?))
      .await?;
    Ok(stats)
  }
}
