//! Station identity resolution.
//!
//! A merge collapses every station row matching a rule's variant conditions
//! into one anchor row named after the rule's canonical name, repoints
//! `station_reports` onto the anchor before deleting each variant, then
//! rewrites the denormalized `station` text in the fact tables. The whole
//! merge runs in one transaction; a failure leaves the archive untouched.

use lockhosp_core::{
  report::{CoordinateReport, MergeReport, StationRef, TableCount},
  station::{CoordinateRule, Coordinates, MergeRule},
  table::ArchiveTable,
};
use rusqlite::{Connection, OptionalExtension as _, Transaction, params};

use crate::encode::{condition_sql, quote_ident, table_exists};

pub fn merge_stations(conn: &mut Connection, rule: &MergeRule) -> rusqlite::Result<MergeReport> {
  let tx = conn.transaction()?;
  let mut report = MergeReport::new(&rule.canonical);

  let mut anchor: Option<i64> = tx
    .query_row(
      "SELECT station_id FROM stations WHERE name = ?1",
      [&rule.canonical],
      |r| r.get(0),
    )
    .optional()?;

  // Conditions run in rule order and matches in id order, so with no anchor
  // the promoted row is the lowest id of the first condition that matches.
  for condition in &rule.variants {
    let (clause, pattern) = condition_sql(condition, "name", 1);
    let variants: Vec<StationRef> = {
      let mut stmt = tx.prepare(&format!(
        "SELECT station_id, name FROM stations
         WHERE {clause} AND name <> ?2
         ORDER BY station_id"
      ))?;
      stmt
        .query_map(params![pattern, rule.canonical], |row| {
          Ok(StationRef { station_id: row.get(0)?, name: row.get(1)? })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?
    };

    for variant in variants {
      match anchor {
        None => {
          tx.execute(
            "UPDATE stations SET name = ?1 WHERE station_id = ?2",
            params![rule.canonical, variant.station_id],
          )?;
          tracing::info!(
            station_id = variant.station_id,
            from = %variant.name,
            to = %rule.canonical,
            "promoted station to canonical name"
          );
          anchor = Some(variant.station_id);
          report.promoted = Some(variant);
        }
        Some(anchor_id) => {
          let repointed = tx.execute(
            "UPDATE station_reports SET station_id = ?1 WHERE station_id = ?2",
            params![anchor_id, variant.station_id],
          )?;
          tx.execute("DELETE FROM stations WHERE station_id = ?1", [variant.station_id])?;
          tracing::info!(
            station_id = variant.station_id,
            name = %variant.name,
            anchor_id,
            repointed,
            "merged duplicate station"
          );
          report.reports_repointed += repointed;
          report.merged.push(variant);
        }
      }
    }
  }

  report.anchor_id = anchor;

  if let Some(anchor_id) = anchor {
    report.duplicate_reports_removed = collapse_duplicate_reports(&tx, anchor_id)?;
    if let Some(coords) = rule.coordinates {
      report.coordinates_updated = set_coordinates(&tx, anchor_id, coords)?;
    }
  }

  report.renamed_rows = rename_station_text(&tx, rule)?;

  tx.commit()?;
  Ok(report)
}

/// Keep one report per document on the anchor after repointing. Reports
/// without a document are never duplicates of each other.
fn collapse_duplicate_reports(tx: &Transaction<'_>, anchor_id: i64) -> rusqlite::Result<usize> {
  tx.execute(
    "DELETE FROM station_reports
     WHERE station_id = ?1
       AND doc_id IS NOT NULL
       AND report_id NOT IN (
         SELECT MIN(report_id) FROM station_reports
         WHERE station_id = ?1
         GROUP BY doc_id
       )",
    [anchor_id],
  )
}

fn set_coordinates(
  tx: &Transaction<'_>,
  station_id: i64,
  coords: Coordinates,
) -> rusqlite::Result<bool> {
  let updated = tx.execute(
    "UPDATE stations SET latitude = ?1, longitude = ?2
     WHERE station_id = ?3
       AND (latitude IS NOT ?1 OR longitude IS NOT ?2)",
    params![coords.latitude(), coords.longitude(), station_id],
  )?;
  Ok(updated > 0)
}

/// Rewrite fact-table `station` text matching any variant to the canonical
/// name. Tables missing from the archive are skipped.
fn rename_station_text(tx: &Transaction<'_>, rule: &MergeRule) -> rusqlite::Result<Vec<TableCount>> {
  let mut renamed = Vec::new();

  for table in ArchiveTable::with_station_text() {
    if !table_exists(tx, table)? {
      if !table.is_legacy() {
        tracing::warn!(%table, "table missing; station text not updated");
      }
      continue;
    }
    let Some(column) = table.station_column() else { continue };
    let column_sql = quote_ident(column);

    let mut rows = 0;
    for condition in &rule.variants {
      let (clause, pattern) = condition_sql(condition, column, 2);
      rows += tx.execute(
        &format!(
          "UPDATE {} SET {column_sql} = ?1 WHERE {clause} AND {column_sql} <> ?1",
          quote_ident(table.as_ref())
        ),
        params![rule.canonical, pattern],
      )?;
    }

    if rows > 0 {
      tracing::info!(%table, rows, canonical = %rule.canonical, "renamed station text");
    }
    renamed.push(TableCount { table, rows });
  }

  Ok(renamed)
}

/// Set coordinates on every station matching the rule whose coordinates
/// differ.
pub fn apply_coordinates(conn: &Connection, rule: &CoordinateRule) -> rusqlite::Result<CoordinateReport> {
  let (clause, pattern) = condition_sql(&rule.station, "name", 3);
  let updated = conn.execute(
    &format!(
      "UPDATE stations SET latitude = ?1, longitude = ?2
       WHERE {clause}
         AND (latitude IS NOT ?1 OR longitude IS NOT ?2)"
    ),
    params![rule.coordinates.latitude(), rule.coordinates.longitude(), pattern],
  )?;

  tracing::info!(station = ?rule.station, updated, "set station coordinates");

  Ok(CoordinateReport { station: rule.station.clone(), updated })
}
