//! SQL schema for the archive.
//!
//! Idempotent thanks to `CREATE TABLE IF NOT EXISTS`, so it is safe to run
//! against a file produced by the original import. Legacy tables
//! (`women_data`, `troop_data`) are never created here.
//!
//! The archive stays in rollback-journal mode rather than WAL: backups copy
//! the single database file and must not miss pages parked in a `-wal` file.
//! Foreign keys are declared but not enforced; the station merge keeps
//! `station_reports` consistent itself.

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS documents (
    doc_id      TEXT PRIMARY KEY,
    source_name TEXT,
    type        TEXT,
    link        TEXT,
    notes       TEXT
);

CREATE TABLE IF NOT EXISTS stations (
    station_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name       TEXT UNIQUE NOT NULL,
    region     TEXT,
    country    TEXT,
    latitude   REAL,
    longitude  REAL,
    notes      TEXT
);

-- Many-to-many: which documents report on which stations.
CREATE TABLE IF NOT EXISTS station_reports (
    report_id  INTEGER PRIMARY KEY AUTOINCREMENT,
    doc_id     TEXT,
    station_id INTEGER,
    FOREIGN KEY (doc_id)     REFERENCES documents (doc_id),
    FOREIGN KEY (station_id) REFERENCES stations (station_id)
);

-- `station` is a name, not a key into stations.
CREATE TABLE IF NOT EXISTS hospital_operations (
    hid                          TEXT PRIMARY KEY,
    doc_id                       TEXT,
    source_name                  TEXT,
    source_type                  TEXT,
    year                         INTEGER,
    region                       TEXT,
    station                      TEXT,
    country                      TEXT,
    act                          TEXT,
    class                        TEXT,
    staff_medical_officers       INTEGER,
    staff_hospital_assistants    INTEGER,
    staff_matron                 INTEGER,
    staff_coolies                INTEGER,
    staff_peons                  INTEGER,
    staff_watermen               INTEGER,
    ops_inspection_regularity    TEXT,
    ops_unlicensed_control_notes TEXT,
    ops_committee_activity_notes TEXT,
    FOREIGN KEY (doc_id) REFERENCES documents (doc_id)
);

CREATE TABLE IF NOT EXISTS hospital_notes (
    note_id                 INTEGER PRIMARY KEY AUTOINCREMENT,
    hid                     TEXT NOT NULL,
    inspection_freq         TEXT,
    unlicensed_control_type TEXT,
    committee_supervision   TEXT,
    remarks                 TEXT,
    FOREIGN KEY (hid) REFERENCES hospital_operations (hid)
);

CREATE TABLE IF NOT EXISTS women_admission (
    unique_id            TEXT PRIMARY KEY,
    doc_id               TEXT,
    source_name          TEXT,
    source_type          TEXT,
    region               TEXT,
    station              TEXT,
    country              TEXT,
    year                 INTEGER,
    women_start_register INTEGER,
    women_added          INTEGER,
    women_end_register   INTEGER,
    discharges           INTEGER,
    deaths               INTEGER,
    FOREIGN KEY (doc_id) REFERENCES documents (doc_id)
);

CREATE TABLE IF NOT EXISTS troops (
    unique_id    TEXT PRIMARY KEY,
    doc_id       TEXT,
    source_name  TEXT,
    source_type  TEXT,
    region       TEXT,
    station      TEXT,
    country      TEXT,
    year         INTEGER,
    regiments    TEXT,
    avg_strength REAL,
    FOREIGN KEY (doc_id) REFERENCES documents (doc_id)
);

CREATE INDEX IF NOT EXISTS station_reports_station_idx ON station_reports(station_id);
CREATE INDEX IF NOT EXISTS hospital_notes_hid_idx      ON hospital_notes(hid);
";
