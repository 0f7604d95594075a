//! Record, metric, and threshold types (JSON contract with callers).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RiskError;

// ---------------------------------------------------------------------------
// Metric keys
// ---------------------------------------------------------------------------

/// One of the three lab values carried by a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
  A1c,
  Ldl,
  Glucose,
}

impl Metric {
  /// All metrics, in display (column) order.
  pub const ALL: [Metric; 3] = [Metric::A1c, Metric::Ldl, Metric::Glucose];

  pub fn key(self) -> &'static str {
    match self {
      Self::A1c => "a1c",
      Self::Ldl => "ldl",
      Self::Glucose => "glucose",
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Self::A1c => "A1C",
      Self::Ldl => "LDL",
      Self::Glucose => "Glucose",
    }
  }

  /// Unit suffix as written after a value ("6.5%", "160 mg/dL").
  pub fn unit(self) -> &'static str {
    match self {
      Self::A1c => "%",
      Self::Ldl | Self::Glucose => " mg/dL",
    }
  }
}

impl FromStr for Metric {
  type Err = RiskError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "a1c" => Ok(Self::A1c),
      "ldl" => Ok(Self::Ldl),
      "glucose" => Ok(Self::Glucose),
      other => Err(RiskError::UnknownMetric(other.to_string())),
    }
  }
}

impl fmt::Display for Metric {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.key())
  }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One patient observation. Field order matches the serialized form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
  pub id: String,
  pub date: NaiveDate,
  /// Percent.
  pub a1c: f64,
  /// mg/dL.
  pub ldl: f64,
  /// mg/dL.
  pub glucose: f64,
}

impl MetricRecord {
  pub fn value(&self, metric: Metric) -> f64 {
    match metric {
      Metric::A1c => self.a1c,
      Metric::Ldl => self.ldl,
      Metric::Glucose => self.glucose,
    }
  }
}

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// Per-metric cutoffs; a value at or above its cutoff is high risk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdTable {
  pub a1c: f64,
  pub ldl: f64,
  pub glucose: f64,
}

impl ThresholdTable {
  /// Clinical cutoffs used by the dashboard.
  pub const CLINICAL: ThresholdTable = ThresholdTable {
    a1c: 6.5,
    ldl: 160.0,
    glucose: 126.0,
  };

  pub fn get(&self, metric: Metric) -> f64 {
    match metric {
      Metric::A1c => self.a1c,
      Metric::Ldl => self.ldl,
      Metric::Glucose => self.glucose,
    }
  }
}

impl Default for ThresholdTable {
  fn default() -> Self {
    Self::CLINICAL
  }
}

/// Human-readable form, e.g. `A1C >= 6.5%, LDL >= 160 mg/dL, Glucose >= 126 mg/dL.`
impl fmt::Display for ThresholdTable {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, metric) in Metric::ALL.iter().enumerate() {
      if i > 0 {
        f.write_str(", ")?;
      }
      write!(f, "{} >= {}{}", metric.label(), self.get(*metric), metric.unit())?;
    }
    f.write_str(".")
  }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Classifier output for one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskFlags {
  pub id: String,
  pub a1c: bool,
  pub ldl: bool,
  pub glucose: bool,
}

impl RiskFlags {
  pub fn get(&self, metric: Metric) -> bool {
    match metric {
      Metric::A1c => self.a1c,
      Metric::Ldl => self.ldl,
      Metric::Glucose => self.glucose,
    }
  }

  pub fn any(&self) -> bool {
    self.a1c || self.ldl || self.glucose
  }
}
