//! Threshold classification of lab values.

use crate::error::RiskError;
use crate::types::{Metric, MetricRecord, RiskFlags, ThresholdTable};

/// High risk iff `value >= threshold` (inclusive).
pub fn is_high_risk(metric: Metric, value: f64, thresholds: &ThresholdTable) -> bool {
  value >= thresholds.get(metric)
}

/// String-keyed variant. Unknown metric names are rejected, never treated as normal.
pub fn is_high_risk_named(
  name: &str,
  value: f64,
  thresholds: &ThresholdTable,
) -> Result<bool, RiskError> {
  let metric: Metric = name.parse()?;
  Ok(is_high_risk(metric, value, thresholds))
}

/// Flags for every metric of one record.
pub fn assess(record: &MetricRecord, thresholds: &ThresholdTable) -> RiskFlags {
  RiskFlags {
    id: record.id.clone(),
    a1c: is_high_risk(Metric::A1c, record.a1c, thresholds),
    ldl: is_high_risk(Metric::Ldl, record.ldl, thresholds),
    glucose: is_high_risk(Metric::Glucose, record.glucose, thresholds),
  }
}

/// Flags for a working set, in input order.
pub fn assess_all(records: &[MetricRecord], thresholds: &ThresholdTable) -> Vec<RiskFlags> {
  records.iter().map(|r| assess(r, thresholds)).collect()
}
