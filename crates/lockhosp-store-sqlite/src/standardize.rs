//! Standardization driver: read every row of a table, run the categorical
//! columns through the normalizer in memory, write back what changed.

use lockhosp_core::{
  report::{ColumnReport, Histogram, StandardizationReport},
  table::ArchiveTable,
};
use rusqlite::Connection;

use crate::encode::{categorical_fields, quote_ident, table_columns, table_exists, text_value};

/// Returns `None` when `table` does not exist.
pub fn standardize_table(
  conn: &mut Connection,
  table: ArchiveTable,
) -> rusqlite::Result<Option<StandardizationReport>> {
  if !table_exists(conn, table)? {
    return Ok(None);
  }

  let fields = categorical_fields(conn, table)?;
  let table_sql = quote_ident(table.as_ref());

  if fields.is_empty() {
    let rows: i64 =
      conn.query_row(&format!("SELECT COUNT(*) FROM {table_sql}"), [], |r| r.get(0))?;
    return Ok(Some(StandardizationReport { table, rows: rows as usize, columns: vec![] }));
  }

  let column_list = fields
    .iter()
    .map(|f| quote_ident(f.as_ref()))
    .collect::<Vec<_>>()
    .join(", ");

  // (rowid, one value per field)
  let rows: Vec<(i64, Vec<Option<String>>)> = {
    let mut stmt = conn.prepare(&format!("SELECT rowid, {column_list} FROM {table_sql}"))?;
    stmt
      .query_map([], |row| {
        let rowid: i64 = row.get(0)?;
        let values = (0..fields.len())
          .map(|i| row.get_ref(i + 1).map(text_value))
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok((rowid, values))
      })?
      .collect::<rusqlite::Result<Vec<_>>>()?
  };

  let tx = conn.transaction()?;
  let mut columns = Vec::with_capacity(fields.len());

  for (i, field) in fields.iter().copied().enumerate() {
    let before: Vec<Option<&str>> = rows.iter().map(|(_, v)| v[i].as_deref()).collect();
    let after: Vec<Option<String>> = before.iter().map(|v| field.standardize(*v)).collect();

    let mut changed = 0;
    {
      let mut update = tx.prepare(&format!(
        "UPDATE {table_sql} SET {} = ?1 WHERE rowid = ?2",
        quote_ident(field.as_ref())
      ))?;
      for ((rowid, _), (old, new)) in rows.iter().zip(before.iter().zip(&after)) {
        if *old != new.as_deref() {
          update.execute(rusqlite::params![new, rowid])?;
          changed += 1;
        }
      }
    }

    tracing::info!(%table, column = %field, changed, "standardized column");

    columns.push(ColumnReport {
      field,
      before: Histogram::from_values(before),
      after: Histogram::from_values(after),
      changed,
    });
  }

  tx.commit()?;

  Ok(Some(StandardizationReport { table, rows: rows.len(), columns }))
}

/// Returns `None` when `hospital_operations` does not exist.
pub fn drop_staff_columns(conn: &mut Connection) -> rusqlite::Result<Option<Vec<String>>> {
  let table = ArchiveTable::HospitalOperations;
  if !table_exists(conn, table)? {
    return Ok(None);
  }

  let staff: Vec<String> = table_columns(conn, table)?
    .into_iter()
    .filter(|c| c.starts_with("staff_"))
    .collect();

  let tx = conn.transaction()?;
  for column in &staff {
    tx.execute(
      &format!(
        "ALTER TABLE {} DROP COLUMN {}",
        quote_ident(table.as_ref()),
        quote_ident(column)
      ),
      [],
    )?;
  }
  tx.commit()?;

  if !staff.is_empty() {
    tracing::warn!(%table, dropped = ?staff, "dropped staff columns");
  }

  Ok(Some(staff))
}
