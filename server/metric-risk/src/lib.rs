//! Blood metric risk classifier: fixed clinical thresholds, inclusive comparison.
//! Used by the binary for stdin/stdout and by the dashboard as a library.

mod error;
mod risk;
mod sample;
mod types;

pub use error::RiskError;
pub use risk::{assess, assess_all, is_high_risk, is_high_risk_named};
pub use sample::{load_records, sample_records};
pub use types::{Metric, MetricRecord, RiskFlags, ThresholdTable};

/// Classify a JSON array of records against the clinical thresholds (no I/O).
pub fn run(json: &str) -> Result<Vec<RiskFlags>, RiskError> {
  let records = load_records(json)?;
  Ok(assess_all(&records, &ThresholdTable::CLINICAL))
}
