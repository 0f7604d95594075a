//! Request lifecycle + chat-completion wire types.

use serde::{Deserialize, Serialize};

use crate::error::SummaryError;

/// Shown to the user for every failure, whatever the upstream cause.
pub const FAILURE_MESSAGE: &str = "Failed to fetch summary. Please try again.";

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// Status of the dashboard's one summary request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestState {
  #[default]
  Idle,
  Loading,
  Succeeded(String),
  Failed(String),
}

impl RequestState {
  pub fn is_loading(&self) -> bool {
    matches!(self, Self::Loading)
  }

  /// Succeeded or Failed.
  pub fn is_settled(&self) -> bool {
    matches!(self, Self::Succeeded(_) | Self::Failed(_))
  }

  /// Summary text, only once a request has succeeded.
  pub fn summary(&self) -> Option<&str> {
    match self {
      Self::Succeeded(text) => Some(text),
      _ => None,
    }
  }
}

/// What happened to a `request_summary` trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
  /// The request ran and the state is now Succeeded or Failed.
  Completed,
  /// A request was already in flight; nothing was sent.
  Ignored,
}

// ---------------------------------------------------------------------------
// Outbound (what we send)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  System,
  User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
  pub role: Role,
  pub content: String,
}

impl ChatMessage {
  pub fn system(content: impl Into<String>) -> Self {
    Self {
      role: Role::System,
      content: content.into(),
    }
  }

  pub fn user(content: impl Into<String>) -> Self {
    Self {
      role: Role::User,
      content: content.into(),
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
  pub model: String,
  pub messages: Vec<ChatMessage>,
  pub max_tokens: u32,
}

// ---------------------------------------------------------------------------
// Inbound (what we read back). Unknown fields are ignored.
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ChatResponse {
  choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
  message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
  content: String,
}

/// Pull `choices[0].message.content` out of a response body, trimmed.
pub fn extract_summary(body: &str) -> Result<String, SummaryError> {
  let resp: ChatResponse = serde_json::from_str(body)?;
  let first = resp
    .choices
    .into_iter()
    .next()
    .ok_or_else(|| SummaryError::malformed("empty choices"))?;
  Ok(first.message.content.trim().to_string())
}
