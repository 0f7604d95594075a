//! Working-set loading and the bundled sample records.

use std::collections::HashSet;

use crate::error::RiskError;
use crate::types::MetricRecord;

const SAMPLE_JSON: &str = include_str!("../data/sample.json");

/// Parse a JSON array of records, keeping order. Ids must be unique.
pub fn load_records(json: &str) -> Result<Vec<MetricRecord>, RiskError> {
  let records: Vec<MetricRecord> = serde_json::from_str(json)?;
  let mut seen = HashSet::new();
  for rec in &records {
    if !seen.insert(rec.id.as_str()) {
      return Err(RiskError::DuplicateId(rec.id.clone()));
    }
  }
  Ok(records)
}

/// The three sample patients shown by the dashboard.
pub fn sample_records() -> Result<Vec<MetricRecord>, RiskError> {
  load_records(SAMPLE_JSON)
}
