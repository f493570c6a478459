//! Error types for `lockhosp-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("latitude {0} is outside [-90, 90]")]
  LatitudeOutOfRange(f64),

  #[error("longitude {0} is outside [-180, 180]")]
  LongitudeOutOfRange(f64),

  #[error("merge rule for {0:?} has no variant conditions")]
  EmptyMergeRule(String),

  #[error("canonical station name must not be blank")]
  BlankCanonicalName,

  #[error("name condition must not be blank")]
  BlankCondition,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
