//! Read-only audit and statistics queries.

use std::collections::BTreeMap;

use lockhosp_core::{
  report::{
    ActUsage, ArchiveStatistics, ArchiveSummary, DistinctValues, DocumentReports, DuplicateName,
    Histogram, RegionStations, TableCount, YearCount, YearlyRecords,
  },
  table::ArchiveTable,
};
use rusqlite::Connection;
use strum::IntoEnumIterator as _;

use crate::encode::{categorical_fields, quote_ident, table_columns, table_exists, text_value};

pub fn summarize(conn: &Connection) -> rusqlite::Result<ArchiveSummary> {
  let present: Vec<ArchiveTable> = ArchiveTable::iter()
    .map(|t| table_exists(conn, t).map(|exists| (t, exists)))
    .collect::<rusqlite::Result<Vec<_>>>()?
    .into_iter()
    .filter_map(|(t, exists)| exists.then_some(t))
    .collect();
  let has = |t: ArchiveTable| present.contains(&t);

  let mut summary = ArchiveSummary::default();

  for &table in &present {
    let table_sql = quote_ident(table.as_ref());
    let rows: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table_sql}"), [], |r| r.get(0))?;
    summary.table_counts.push(TableCount { table, rows: rows as usize });

    for field in categorical_fields(conn, table)? {
      let column = quote_ident(field.as_ref());
      let mut stmt = conn.prepare(&format!(
        "SELECT DISTINCT {column} FROM {table_sql} WHERE {column} IS NOT NULL ORDER BY {column}"
      ))?;
      let values = stmt
        .query_map([], |row| row.get_ref(0).map(text_value))?
        .filter_map(Result::transpose)
        .collect::<rusqlite::Result<Vec<_>>>()?;
      summary.categorical.push(DistinctValues { table, field, values });
    }

    if let Some(column) = table.station_column()
      && has(ArchiveTable::Stations)
    {
      let column = quote_ident(column);
      let unmatched: i64 = conn.query_row(
        &format!(
          "SELECT COUNT(*) FROM {table_sql}
           WHERE {column} IS NOT NULL
             AND {column} NOT IN (SELECT name FROM stations)"
        ),
        [],
        |r| r.get(0),
      )?;
      summary
        .unmatched_station_text
        .push(TableCount { table, rows: unmatched as usize });
    }
  }

  if has(ArchiveTable::Stations) {
    summary.duplicate_station_names = duplicate_names(conn)?;
  }

  if has(ArchiveTable::StationReports) && has(ArchiveTable::Stations) && has(ArchiveTable::Documents) {
    let mut stmt = conn.prepare(
      "SELECT r.report_id
       FROM station_reports r
       LEFT JOIN stations  s ON s.station_id = r.station_id
       LEFT JOIN documents d ON d.doc_id     = r.doc_id
       WHERE s.station_id IS NULL
          OR (r.doc_id IS NOT NULL AND d.doc_id IS NULL)
       ORDER BY r.report_id",
    )?;
    summary.orphaned_reports = stmt
      .query_map([], |row| row.get(0))?
      .collect::<rusqlite::Result<Vec<i64>>>()?;
  }

  if has(ArchiveTable::HospitalNotes) {
    if has(ArchiveTable::HospitalOperations) {
      let orphaned: i64 = conn.query_row(
        "SELECT COUNT(*) FROM hospital_notes n
         WHERE NOT EXISTS (SELECT 1 FROM hospital_operations o WHERE o.hid = n.hid)",
        [],
        |r| r.get(0),
      )?;
      summary.orphaned_notes = orphaned as usize;
    }

    summary.inspection_frequency = Some(note_histogram(conn, "inspection_freq")?);
    summary.unlicensed_control = Some(note_histogram(conn, "unlicensed_control_type")?);
    summary.committee_supervision = Some(note_histogram(conn, "committee_supervision")?);
  }

  Ok(summary)
}

/// Value counts of one `hospital_notes` column. The import wrote a literal
/// `'None'` for missing values; it counts as null.
fn note_histogram(conn: &Connection, column: &str) -> rusqlite::Result<Histogram> {
  let mut stmt = conn.prepare(&format!("SELECT {} FROM hospital_notes", quote_ident(column)))?;
  let values = stmt
    .query_map([], |row| row.get_ref(0).map(text_value))?
    .map(|v| v.map(|v| v.filter(|v| v != "None")))
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(Histogram::from_values(values))
}

// ─── Statistics ──────────────────────────────────────────────────────────────

pub fn statistics(conn: &Connection) -> rusqlite::Result<ArchiveStatistics> {
  let mut stats = ArchiveStatistics::default();

  for table in ArchiveTable::with_station_text() {
    if !table_exists(conn, table)? || !table_columns(conn, table)?.iter().any(|c| c == "year") {
      continue;
    }
    let mut stmt = conn.prepare(&format!(
      "SELECT year, COUNT(*) FROM {} WHERE year IS NOT NULL GROUP BY year ORDER BY year",
      quote_ident(table.as_ref())
    ))?;
    let years = stmt
      .query_map([], |row| {
        let year = row.get_ref(0).map(text_value)?;
        let records = row.get::<_, i64>(1)? as usize;
        Ok(year.map(|year| YearCount { year, records }))
      })?
      .filter_map(Result::transpose)
      .collect::<rusqlite::Result<Vec<_>>>()?;
    stats.records_per_year.push(YearlyRecords { table, years });
  }

  if table_exists(conn, ArchiveTable::Stations)? {
    let mut stmt = conn.prepare(
      "SELECT region, country, COUNT(*) AS n
       FROM stations
       WHERE region IS NOT NULL
       GROUP BY region, country
       ORDER BY n DESC, region, country",
    )?;
    stats.stations_by_region = stmt
      .query_map([], |row| {
        Ok(RegionStations {
          region:   row.get(0)?,
          country:  row.get(1)?,
          stations: row.get::<_, i64>(2)? as usize,
        })
      })?
      .collect::<rusqlite::Result<Vec<_>>>()?;
  }

  if table_exists(conn, ArchiveTable::Documents)? && table_exists(conn, ArchiveTable::StationReports)? {
    let mut stmt = conn.prepare(
      "SELECT d.doc_id, d.source_name, COUNT(r.report_id) AS n
       FROM documents d
       LEFT JOIN station_reports r ON r.doc_id = d.doc_id
       GROUP BY d.doc_id, d.source_name
       ORDER BY n DESC, d.doc_id",
    )?;
    stats.documents_by_reports = stmt
      .query_map([], |row| {
        Ok(DocumentReports {
          doc_id:      row.get(0)?,
          source_name: row.get(1)?,
          reports:     row.get::<_, i64>(2)? as usize,
        })
      })?
      .collect::<rusqlite::Result<Vec<_>>>()?;
  }

  if table_exists(conn, ArchiveTable::HospitalOperations)? {
    let mut stmt = conn.prepare(
      "SELECT act, COUNT(*) AS n, COUNT(DISTINCT station)
       FROM hospital_operations
       WHERE act IS NOT NULL AND act <> 'None'
       GROUP BY act
       ORDER BY n DESC, act",
    )?;
    stats.act_usage = stmt
      .query_map([], |row| {
        Ok(ActUsage {
          act:        row.get(0)?,
          operations: row.get::<_, i64>(1)? as usize,
          stations:   row.get::<_, i64>(2)? as usize,
        })
      })?
      .collect::<rusqlite::Result<Vec<_>>>()?;
  }

  Ok(stats)
}

fn duplicate_names(conn: &Connection) -> rusqlite::Result<Vec<DuplicateName>> {
  let mut stmt = conn.prepare("SELECT station_id, LOWER(name) FROM stations ORDER BY station_id")?;
  let rows = stmt
    .query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  let mut by_name: BTreeMap<String, Vec<i64>> = BTreeMap::new();
  for (id, name) in rows {
    by_name.entry(name).or_default().push(id);
  }

  Ok(
    by_name
      .into_iter()
      .filter(|(_, ids)| ids.len() > 1)
      .map(|(name, station_ids)| DuplicateName { name, station_ids })
      .collect(),
  )
}
