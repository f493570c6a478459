//! Report rendering: plain text for people, JSON for scripts.

use std::fmt::{self, Display, Formatter};

use lockhosp_core::report::{
  ArchiveStatistics, ArchiveSummary, ColumnReport, CoordinateReport, Histogram, MergeReport,
  StandardizationReport,
};
use serde::Serialize;

use crate::pipeline::{CleanupReport, StationResolution};

/// Print `value` to stdout, as pretty JSON when `json` is set.
pub fn emit<T>(value: &T, json: bool) -> anyhow::Result<()>
where
  T: Serialize,
  for<'a> Text<'a, T>: Display,
{
  if json {
    println!("{}", serde_json::to_string_pretty(value)?);
  } else {
    print!("{}", Text(value));
  }
  Ok(())
}

/// Text form of a report.
pub struct Text<'a, T: ?Sized>(pub &'a T);

fn histogram(f: &mut Formatter<'_>, h: &Histogram) -> fmt::Result {
  for vc in &h.values {
    writeln!(f, "      {:>6}  {}", vc.count, vc.value)?;
  }
  if h.nulls > 0 {
    writeln!(f, "      {:>6}  (null)", h.nulls)?;
  }
  Ok(())
}

impl Display for Text<'_, ColumnReport> {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    let c = self.0;
    writeln!(f, "  {}: {} row(s) changed", c.field, c.changed)?;
    writeln!(f, "    before:")?;
    histogram(f, &c.before)?;
    writeln!(f, "    after:")?;
    histogram(f, &c.after)
  }
}

impl Display for Text<'_, StandardizationReport> {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    let r = self.0;
    writeln!(f, "{} ({} rows)", r.table, r.rows)?;
    if r.columns.is_empty() {
      writeln!(f, "  no categorical columns")?;
    }
    for column in &r.columns {
      write!(f, "{}", Text(column))?;
    }
    Ok(())
  }
}

impl Display for Text<'_, Vec<StandardizationReport>> {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    for report in self.0 {
      write!(f, "{}", Text(report))?;
    }
    Ok(())
  }
}

impl Display for Text<'_, MergeReport> {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    let r = self.0;
    if r.is_noop() {
      return writeln!(f, "{}: nothing to merge", r.canonical);
    }
    writeln!(f, "{}:", r.canonical)?;
    if let Some(p) = &r.promoted {
      writeln!(f, "  promoted #{} {:?}", p.station_id, p.name)?;
    }
    for m in &r.merged {
      writeln!(f, "  merged   #{} {:?}", m.station_id, m.name)?;
    }
    if r.reports_repointed > 0 || r.duplicate_reports_removed > 0 {
      writeln!(
        f,
        "  reports: {} repointed, {} duplicate(s) removed",
        r.reports_repointed, r.duplicate_reports_removed
      )?;
    }
    if r.coordinates_updated {
      writeln!(f, "  coordinates updated")?;
    }
    for t in r.renamed_rows.iter().filter(|t| t.rows > 0) {
      writeln!(f, "  {}: {} station name(s) rewritten", t.table, t.rows)?;
    }
    Ok(())
  }
}

impl Display for Text<'_, CoordinateReport> {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    writeln!(
      f,
      "{}: {} station(s) updated",
      self.0.station.pattern(),
      self.0.updated
    )
  }
}

impl Display for Text<'_, StationResolution> {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    for merge in &self.0.merges {
      write!(f, "{}", Text(merge))?;
    }
    for coords in &self.0.coordinates {
      write!(f, "{}", Text(coords))?;
    }
    Ok(())
  }
}

impl Display for Text<'_, ArchiveSummary> {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    let s = self.0;

    writeln!(f, "Tables:")?;
    for t in &s.table_counts {
      writeln!(f, "  {:<22}{:>8}", t.table.as_ref(), t.rows)?;
    }

    writeln!(f, "Categorical values:")?;
    for d in &s.categorical {
      writeln!(f, "  {}.{}: {}", d.table, d.field, d.values.join(", "))?;
    }

    for (title, h) in [
      ("Inspection frequency", &s.inspection_frequency),
      ("Control of unlicensed women", &s.unlicensed_control),
      ("Committee supervision", &s.committee_supervision),
    ] {
      if let Some(h) = h {
        writeln!(f, "{title}:")?;
        histogram(f, h)?;
      }
    }

    for dup in &s.duplicate_station_names {
      writeln!(f, "duplicate station name {:?}: ids {:?}", dup.name, dup.station_ids)?;
    }
    if !s.orphaned_reports.is_empty() {
      writeln!(f, "orphaned station reports: {:?}", s.orphaned_reports)?;
    }
    if s.orphaned_notes > 0 {
      writeln!(f, "hospital notes without an operation: {}", s.orphaned_notes)?;
    }
    for t in s.unmatched_station_text.iter().filter(|t| t.rows > 0) {
      writeln!(f, "{}: {} row(s) name no known station", t.table, t.rows)?;
    }

    writeln!(f, "{}", if s.is_consistent() { "consistent" } else { "INCONSISTENT" })
  }
}

impl Display for Text<'_, ArchiveStatistics> {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    let s = self.0;

    for yearly in &s.records_per_year {
      writeln!(f, "{} by year:", yearly.table)?;
      for y in &yearly.years {
        writeln!(f, "  {:<8}{:>6}", y.year, y.records)?;
      }
    }

    writeln!(f, "Stations by region:")?;
    for r in &s.stations_by_region {
      let country = r.country.as_deref().unwrap_or("-");
      writeln!(f, "  {:>6}  {} ({country})", r.stations, r.region)?;
    }

    writeln!(f, "Documents by station reports:")?;
    for d in &s.documents_by_reports {
      match &d.source_name {
        Some(source) => writeln!(f, "  {:>6}  {} {source}", d.reports, d.doc_id)?,
        None => writeln!(f, "  {:>6}  {}", d.reports, d.doc_id)?,
      }
    }

    writeln!(f, "Acts in force:")?;
    for a in &s.act_usage {
      writeln!(
        f,
        "  {:>6}  {} ({} station(s))",
        a.operations, a.act, a.stations
      )?;
    }
    Ok(())
  }
}

impl Display for Text<'_, CleanupReport> {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    let r = self.0;
    if !r.dropped_columns.is_empty() {
      writeln!(f, "dropped columns: {}", r.dropped_columns.join(", "))?;
    }
    writeln!(f, "# Standardization")?;
    write!(f, "{}", Text(&r.standardization))?;
    writeln!(f, "# Stations")?;
    write!(f, "{}", Text(&r.stations))?;
    writeln!(f, "# Summary")?;
    write!(f, "{}", Text(&r.summary))
  }
}
