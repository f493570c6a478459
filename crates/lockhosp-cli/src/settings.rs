//! Runtime settings, layered from an optional TOML file and `LOCKHOSP_*`
//! environment variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use lockhosp_core::station::{
  CoordinateRule, MergeRule, builtin_coordinate_rules, builtin_merge_rules,
};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  #[serde(default = "default_database_path")]
  pub database_path: PathBuf,
  #[serde(default = "default_backup_dir")]
  pub backup_dir:    PathBuf,
  /// Station merges; the historical merges when omitted.
  #[serde(default = "builtin_merge_rules")]
  pub merges:        Vec<MergeRule>,
  /// Coordinate fixes; the historical fixes when omitted.
  #[serde(default = "builtin_coordinate_rules")]
  pub coordinates:   Vec<CoordinateRule>,
}

fn default_database_path() -> PathBuf { PathBuf::from("medical_lock_hospitals.db") }

fn default_backup_dir() -> PathBuf { PathBuf::from("archive/backups") }

impl Settings {
  /// Read `path` if it exists, then overlay the environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("LOCKHOSP"))
      .build()
      .with_context(|| format!("failed to read config file {}", path.display()))?;

    let settings: Self = settings
      .try_deserialize()
      .context("failed to deserialise settings")?;
    settings.validate()?;
    Ok(settings)
  }

  pub fn validate(&self) -> anyhow::Result<()> {
    for rule in &self.merges {
      rule
        .validate()
        .with_context(|| format!("invalid merge rule for {:?}", rule.canonical))?;
    }
    for rule in &self.coordinates {
      rule
        .validate()
        .with_context(|| format!("invalid coordinate rule for {:?}", rule.station))?;
    }
    Ok(())
  }
}
