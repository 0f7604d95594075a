//! Plain-text rendering and summary wiring for the terminal dashboard.

use std::sync::Arc;

use metric_risk::{assess, Metric, MetricRecord, ThresholdTable};
use tracing::error;

use crate::config::SummaryConfig;
use crate::controller::SummaryController;
use crate::error::SummaryError;
use crate::transport::HttpTransport;
use crate::types::{RequestOutcome, RequestState, FAILURE_MESSAGE};

pub const LOADING_TEXT: &str = "Analyzing data, please wait...";
pub const SUMMARY_HEADING: &str = "Risk Summary:";

/// Records as an aligned table, one row per record in order.
/// High-risk values get a trailing `*`.
pub fn render_table(records: &[MetricRecord], thresholds: &ThresholdTable) -> String {
  let mut header = vec!["ID".to_string(), "Date".to_string()];
  header.extend(Metric::ALL.iter().map(|m| m.label().to_string()));

  let mut rows = vec![header];
  for rec in records {
    let flags = assess(rec, thresholds);
    let mut row = vec![rec.id.clone(), rec.date.format("%Y-%m-%d").to_string()];
    for metric in Metric::ALL {
      let mark = if flags.get(metric) { "*" } else { "" };
      row.push(format!("{}{}", rec.value(metric), mark));
    }
    rows.push(row);
  }

  let widths: Vec<usize> = (0..rows[0].len())
    .map(|col| rows.iter().map(|r| r[col].len()).max().unwrap_or(0))
    .collect();

  let mut out = String::new();
  for row in &rows {
    let cells: Vec<String> = row
      .iter()
      .zip(&widths)
      .map(|(cell, w)| format!("{:<width$}", cell, width = *w))
      .collect();
    out.push_str(cells.join("  ").trim_end());
    out.push('\n');
  }
  out.push_str(&format!("* at or above threshold ({})\n", thresholds));
  out
}

/// What the status area shows for a state; nothing while idle.
pub fn status_text(state: &RequestState) -> Option<String> {
  match state {
    RequestState::Idle => None,
    RequestState::Loading => Some(LOADING_TEXT.to_string()),
    RequestState::Succeeded(text) => Some(format!("{}\n{}", SUMMARY_HEADING, text)),
    RequestState::Failed(message) => Some(message.clone()),
  }
}

/// Controller over the HTTP transport for `config`.
pub fn http_controller(config: SummaryConfig) -> Result<SummaryController, SummaryError> {
  let transport = HttpTransport::new(&config)?;
  Ok(SummaryController::new(config, Arc::new(transport)))
}

/// Status text when no controller could be built. The cause is only logged.
pub fn unavailable_text(err: &SummaryError) -> String {
  error!(error = %err, "summary client unavailable");
  FAILURE_MESSAGE.to_string()
}

/// Run one request and pass status text to `emit` for each state it goes through.
///
/// Loading is always reported before the final state, even when the watch
/// channel only delivers the settled value.
pub async fn stream_summary<F>(
  controller: &SummaryController,
  records: &[MetricRecord],
  thresholds: &ThresholdTable,
  mut emit: F,
) -> RequestOutcome
where
  F: FnMut(String),
{
  let mut rx = controller.subscribe();
  let _ = rx.borrow_and_update();

  let watcher = async {
    let mut saw_loading = false;
    while rx.changed().await.is_ok() {
      let state = rx.borrow_and_update().clone();
      if state.is_settled() && !saw_loading {
        emit(LOADING_TEXT.to_string());
      }
      saw_loading |= state.is_loading();
      if let Some(text) = status_text(&state) {
        emit(text);
      }
      if state.is_settled() {
        break;
      }
    }
  };
  let (outcome, ()) = tokio::join!(controller.request_summary(records, thresholds), watcher);
  outcome
}
