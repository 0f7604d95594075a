//! Structured error types for the summarization client.
//!
//! None of these reach the dashboard user; the controller logs them and
//! reports a fixed failure message instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SummaryError {
  #[error("no API key configured")]
  MissingApiKey,

  #[error("http: {0}")]
  Http(#[from] reqwest::Error),

  #[error("upstream status {status}: {body}")]
  Status { status: u16, body: String },

  #[error("malformed response: {0}")]
  MalformedResponse(String),

  #[error("json: {0}")]
  Json(#[from] serde_json::Error),

  #[error("config: {key}: {reason}")]
  Config { key: String, reason: String },
}

impl SummaryError {
  pub fn config(key: &str, reason: &str) -> Self {
    Self::Config {
      key: key.to_string(),
      reason: reason.to_string(),
    }
  }

  pub fn malformed(msg: impl Into<String>) -> Self {
    Self::MalformedResponse(msg.into())
  }
}
