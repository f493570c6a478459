//! Helpers between domain types and the SQL the store issues.
//!
//! Table and column names are only ever interpolated from the
//! [`ArchiveTable`] catalogue or from `PRAGMA table_info`, and always
//! quoted. User-supplied text travels as bound parameters.

use lockhosp_core::{
  normalize::Field,
  station::{Coordinates, NameCondition, Station},
  table::ArchiveTable,
};
use rusqlite::{Connection, OptionalExtension as _, types::ValueRef};
use strum::IntoEnumIterator as _;

use crate::Result;

// ─── Identifiers ──────────────────────────────────────────────────────────────

pub fn quote_ident(name: &str) -> String { format!("\"{}\"", name.replace('"', "\"\"")) }

pub fn table_exists(conn: &Connection, table: ArchiveTable) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row(
        "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [table.as_ref()],
        |_| Ok(()),
      )
      .optional()?
      .is_some(),
  )
}

pub fn table_columns(conn: &Connection, table: ArchiveTable) -> rusqlite::Result<Vec<String>> {
  let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", quote_ident(table.as_ref())))?;
  let columns = stmt
    .query_map([], |row| row.get::<_, String>(1))?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(columns)
}

/// The categorical fields `table` actually has, in [`Field`] order.
pub fn categorical_fields(conn: &Connection, table: ArchiveTable) -> rusqlite::Result<Vec<Field>> {
  let columns = table_columns(conn, table)?;
  Ok(
    Field::iter()
      .filter(|f| columns.iter().any(|c| c.eq_ignore_ascii_case(f.as_ref())))
      .collect(),
  )
}

// ─── Values ───────────────────────────────────────────────────────────────────

/// Read a cell as text. Imported spreadsheets occasionally left numbers in
/// text columns; those are rendered rather than dropped.
pub fn text_value(value: ValueRef<'_>) -> Option<String> {
  match value {
    ValueRef::Null => None,
    ValueRef::Integer(i) => Some(i.to_string()),
    ValueRef::Real(f) => Some(f.to_string()),
    ValueRef::Text(t) | ValueRef::Blob(t) => Some(String::from_utf8_lossy(t).into_owned()),
  }
}

// ─── Name conditions ──────────────────────────────────────────────────────────

fn escape_like(pattern: &str) -> String {
  let mut out = String::with_capacity(pattern.len());
  for c in pattern.chars() {
    if matches!(c, '%' | '_' | '\\') {
      out.push('\\');
    }
    out.push(c);
  }
  out
}

/// Compile `condition` against `column` using the numbered parameter
/// `?{param}`. Returns the SQL fragment and the value to bind.
pub fn condition_sql(condition: &NameCondition, column: &str, param: usize) -> (String, String) {
  let column = quote_ident(column);
  let pattern = condition.pattern();
  match condition {
    NameCondition::Equals(_) => (format!("LOWER({column}) = ?{param}"), pattern),
    NameCondition::StartsWith(_) => (
      format!("LOWER({column}) LIKE ?{param} ESCAPE '\\'"),
      format!("{}%", escape_like(&pattern)),
    ),
    NameCondition::Contains(_) => (
      format!("LOWER({column}) LIKE ?{param} ESCAPE '\\'"),
      format!("%{}%", escape_like(&pattern)),
    ),
  }
}

// ─── Raw rows ─────────────────────────────────────────────────────────────────

/// A `stations` row as read from SQLite, before coordinate validation.
pub struct RawStation {
  pub station_id: i64,
  pub name:       String,
  pub region:     Option<String>,
  pub country:    Option<String>,
  pub latitude:   Option<f64>,
  pub longitude:  Option<f64>,
  pub notes:      Option<String>,
}

impl RawStation {
  pub const COLUMNS: &'static str =
    "station_id, name, region, country, latitude, longitude, notes";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      station_id: row.get(0)?,
      name:       row.get(1)?,
      region:     row.get(2)?,
      country:    row.get(3)?,
      latitude:   row.get(4)?,
      longitude:  row.get(5)?,
      notes:      row.get(6)?,
    })
  }

  pub fn into_station(self) -> Result<Station> {
    let coordinates = match (self.latitude, self.longitude) {
      (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)?),
      _ => None,
    };
    Ok(Station {
      station_id: self.station_id,
      name: self.name,
      region: self.region,
      country: self.country,
      coordinates,
      notes: self.notes,
    })
  }
}
