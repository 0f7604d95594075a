//! Blood metrics risk summary: one LLM-backed summary request at a time.
//!
//! The controller builds a chat-completion payload from the record set and
//! clinical thresholds, makes a single outbound call, and exposes the
//! Idle/Loading/Succeeded/Failed lifecycle through an observable state cell.
//! Upstream errors are logged, never shown; the user sees one fixed message.

pub mod config;
pub mod controller;
pub mod dashboard;
pub mod error;
pub mod prompt;
pub mod state;
pub mod transport;
pub mod types;

pub use config::SummaryConfig;
pub use controller::SummaryController;
pub use error::SummaryError;
pub use transport::{HttpTransport, SummaryTransport};
pub use types::{RequestOutcome, RequestState, FAILURE_MESSAGE};
