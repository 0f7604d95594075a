//! Summarization client configuration with sane defaults.

use std::time::Duration;

use crate::error::SummaryError;

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_MAX_TOKENS: u32 = 1500;

/// Where and how to reach the summarization service.
#[derive(Debug, Clone)]
pub struct SummaryConfig {
  /// Chat-completion endpoint URL.
  pub endpoint: String,
  /// Model identifier sent with every request.
  pub model: String,
  /// Completion token cap.
  pub max_tokens: u32,
  /// Bearer secret. Requests fail (and are reported as failed) when absent.
  pub api_key: Option<String>,
  /// Transport-level timeout. `None` leaves it to the HTTP client.
  pub timeout: Option<Duration>,
}

impl Default for SummaryConfig {
  fn default() -> Self {
    Self {
      endpoint: DEFAULT_ENDPOINT.to_string(),
      model: DEFAULT_MODEL.to_string(),
      max_tokens: DEFAULT_MAX_TOKENS,
      api_key: None,
      timeout: None,
    }
  }
}

impl SummaryConfig {
  /// Defaults overridden by `OPENAI_API_KEY`, `OPENAI_API_URL`, `OPENAI_MODEL`,
  /// `SUMMARY_MAX_TOKENS` and `SUMMARY_TIMEOUT_SECS`.
  pub fn from_env() -> Result<Self, SummaryError> {
    Self::from_lookup(|key| std::env::var(key).ok())
  }

  /// Same as [`from_env`](Self::from_env) with an injectable variable source.
  pub fn from_lookup<F>(lookup: F) -> Result<Self, SummaryError>
  where
    F: Fn(&str) -> Option<String>,
  {
    let mut cfg = Self::default();
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    cfg.api_key = get("OPENAI_API_KEY");
    if let Some(url) = get("OPENAI_API_URL") {
      cfg.endpoint = url;
    }
    if let Some(model) = get("OPENAI_MODEL") {
      cfg.model = model;
    }
    if let Some(raw) = get("SUMMARY_MAX_TOKENS") {
      cfg.max_tokens = raw
        .trim()
        .parse()
        .map_err(|_| SummaryError::config("SUMMARY_MAX_TOKENS", "expected a positive integer"))?;
    }
    if let Some(raw) = get("SUMMARY_TIMEOUT_SECS") {
      let secs: u64 = raw
        .trim()
        .parse()
        .map_err(|_| SummaryError::config("SUMMARY_TIMEOUT_SECS", "expected whole seconds"))?;
      cfg.timeout = Some(Duration::from_secs(secs));
    }
    Ok(cfg)
  }
}
