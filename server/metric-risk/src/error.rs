//! Structured error types for the risk classifier.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RiskError {
  #[error("unknown metric: {0}")]
  UnknownMetric(String),

  #[error("duplicate record id: {0}")]
  DuplicateId(String),

  #[error("json: {0}")]
  Json(#[from] serde_json::Error),
}
