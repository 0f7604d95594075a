//! Summary request controller: owns the request state and drives one call at a time.

use std::sync::Arc;

use metric_risk::{MetricRecord, ThresholdTable};
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::config::SummaryConfig;
use crate::error::SummaryError;
use crate::prompt;
use crate::state::StateCell;
use crate::transport::SummaryTransport;
use crate::types::{extract_summary, RequestOutcome, RequestState, FAILURE_MESSAGE};

pub struct SummaryController {
  config: SummaryConfig,
  transport: Arc<dyn SummaryTransport>,
  state: StateCell,
}

impl SummaryController {
  pub fn new(config: SummaryConfig, transport: Arc<dyn SummaryTransport>) -> Self {
    Self {
      config,
      transport,
      state: StateCell::new(),
    }
  }

  pub fn state(&self) -> RequestState {
    self.state.current()
  }

  pub fn subscribe(&self) -> watch::Receiver<RequestState> {
    self.state.subscribe()
  }

  /// Run one summary request for `records`.
  ///
  /// Returns `Ignored` without side effects if a request is already in flight.
  /// Otherwise the state goes to Loading, one call is made, and the state
  /// settles on Succeeded (trimmed text) or Failed (fixed message) before
  /// `Completed` is returned.
  pub async fn request_summary(
    &self,
    records: &[MetricRecord],
    thresholds: &ThresholdTable,
  ) -> RequestOutcome {
    if !self.state.try_begin() {
      warn!("summary request already in flight, ignoring trigger");
      return RequestOutcome::Ignored;
    }
    let in_flight = InFlight::new(&self.state);
    info!(records = records.len(), "requesting risk summary");

    let next = match self.fetch(records, thresholds).await {
      Ok(text) => {
        info!(chars = text.len(), "risk summary received");
        RequestState::Succeeded(text)
      }
      Err(e) => {
        error!(error = %e, "risk summary request failed");
        RequestState::Failed(FAILURE_MESSAGE.to_string())
      }
    };
    in_flight.settle(next);
    RequestOutcome::Completed
  }

  async fn fetch(
    &self,
    records: &[MetricRecord],
    thresholds: &ThresholdTable,
  ) -> Result<String, SummaryError> {
    let request = prompt::build_request(records, thresholds, &self.config)?;
    let body = self.transport.send(&request).await?;
    extract_summary(&body)
  }
}

/// Held while a request is Loading. Dropped unsettled (the request future was
/// abandoned), it moves the cell to Failed so the next trigger can run.
struct InFlight<'a> {
  cell: &'a StateCell,
  settled: bool,
}

impl<'a> InFlight<'a> {
  fn new(cell: &'a StateCell) -> Self {
    Self {
      cell,
      settled: false,
    }
  }

  fn settle(mut self, next: RequestState) {
    self.cell.settle(next);
    self.settled = true;
  }
}

impl Drop for InFlight<'_> {
  fn drop(&mut self) {
    if !self.settled && self.cell.current().is_loading() {
      error!("risk summary request dropped before completion");
      self.cell.settle(RequestState::Failed(FAILURE_MESSAGE.to_string()));
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::ChatRequest;
  use async_trait::async_trait;
  use metric_risk::sample_records;
  use std::collections::VecDeque;
  use std::sync::atomic::{AtomicUsize, Ordering};
  use std::sync::Mutex;
  use std::time::Duration;
  use tokio::sync::Notify;

  /// Replies from a script, optionally holding each call until released.
  #[derive(Default)]
  struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<String, SummaryError>>>,
    calls: AtomicUsize,
    requests: Mutex<Vec<ChatRequest>>,
    gate: Option<Notify>,
  }

  impl ScriptedTransport {
    fn replying(replies: Vec<Result<String, SummaryError>>) -> Self {
      Self {
        replies: Mutex::new(replies.into()),
        ..Self::default()
      }
    }

    fn gated(mut self) -> Self {
      self.gate = Some(Notify::new());
      self
    }

    fn release(&self) {
      if let Some(gate) = &self.gate {
        gate.notify_one();
      }
    }

    fn calls(&self) -> usize {
      self.calls.load(Ordering::SeqCst)
    }
  }

  #[async_trait]
  impl SummaryTransport for ScriptedTransport {
    async fn send(&self, request: &ChatRequest) -> Result<String, SummaryError> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      self.requests.lock().unwrap().push(request.clone());
      if let Some(gate) = &self.gate {
        gate.notified().await;
      }
      self
        .replies
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| Err(SummaryError::malformed("script exhausted")))
    }
  }

  fn ok_body(content: &str) -> Result<String, SummaryError> {
    Ok(serde_json::json!({"choices":[{"message":{"content": content}}]}).to_string())
  }

  fn controller(transport: Arc<ScriptedTransport>) -> SummaryController {
    SummaryController::new(SummaryConfig::default(), transport)
  }

  #[tokio::test]
  async fn success_trims_content() {
    let transport = Arc::new(ScriptedTransport::replying(vec![ok_body(" X ")]));
    let ctl = controller(transport.clone());
    assert_eq!(ctl.state(), RequestState::Idle);

    let records = sample_records().unwrap();
    let outcome = ctl.request_summary(&records, &ThresholdTable::CLINICAL).await;

    assert_eq!(outcome, RequestOutcome::Completed);
    assert_eq!(ctl.state(), RequestState::Succeeded("X".into()));
    assert_eq!(transport.calls(), 1);
  }

  #[tokio::test]
  async fn transport_failure_maps_to_fixed_message() {
    let transport = Arc::new(ScriptedTransport::replying(vec![Err(SummaryError::Status {
      status: 503,
      body: "upstream overloaded".into(),
    })]));
    let ctl = controller(transport);

    ctl.request_summary(&sample_records().unwrap(), &ThresholdTable::CLINICAL).await;

    assert_eq!(ctl.state(), RequestState::Failed(FAILURE_MESSAGE.into()));
    assert_eq!(ctl.state().summary(), None);
  }

  #[tokio::test]
  async fn malformed_body_is_a_failure_not_partial_text() {
    let transport = Arc::new(ScriptedTransport::replying(vec![Ok(
      r#"{"choices":[{"text":"partial"}]}"#.into(),
    )]));
    let ctl = controller(transport);

    ctl.request_summary(&sample_records().unwrap(), &ThresholdTable::CLINICAL).await;

    assert_eq!(ctl.state(), RequestState::Failed(FAILURE_MESSAGE.into()));
  }

  #[tokio::test]
  async fn trigger_while_loading_is_ignored() {
    let transport = Arc::new(ScriptedTransport::replying(vec![ok_body("first")]).gated());
    let ctl = controller(transport.clone());
    let records = sample_records().unwrap();

    let first = ctl.request_summary(&records, &ThresholdTable::CLINICAL);
    let second = async {
      // Let the first request reach the transport.
      tokio::task::yield_now().await;
      assert_eq!(ctl.state(), RequestState::Loading);
      let outcome = ctl.request_summary(&records, &ThresholdTable::CLINICAL).await;
      assert_eq!(ctl.state(), RequestState::Loading);
      transport.release();
      outcome
    };
    let (a, b) = tokio::join!(first, second);

    assert_eq!(a, RequestOutcome::Completed);
    assert_eq!(b, RequestOutcome::Ignored);
    assert_eq!(transport.calls(), 1);
    assert_eq!(ctl.state(), RequestState::Succeeded("first".into()));
  }

  #[tokio::test]
  async fn machine_reenters_after_each_terminal_state() {
    let transport = Arc::new(ScriptedTransport::replying(vec![
      ok_body("one"),
      Err(SummaryError::MissingApiKey),
      ok_body("three"),
    ]));
    let ctl = controller(transport.clone());
    let records = sample_records().unwrap();

    ctl.request_summary(&records, &ThresholdTable::CLINICAL).await;
    assert_eq!(ctl.state(), RequestState::Succeeded("one".into()));

    ctl.request_summary(&records, &ThresholdTable::CLINICAL).await;
    assert_eq!(ctl.state(), RequestState::Failed(FAILURE_MESSAGE.into()));

    ctl.request_summary(&records, &ThresholdTable::CLINICAL).await;
    assert_eq!(ctl.state(), RequestState::Succeeded("three".into()));
    assert_eq!(transport.calls(), 3);
  }

  #[tokio::test]
  async fn retrigger_shows_loading_without_stale_text() {
    let transport =
      Arc::new(ScriptedTransport::replying(vec![ok_body("old"), ok_body("new")]).gated());
    let ctl = controller(transport.clone());
    let records = sample_records().unwrap();

    let first = ctl.request_summary(&records, &ThresholdTable::CLINICAL);
    let release = async {
      tokio::task::yield_now().await;
      transport.release();
    };
    tokio::join!(first, release);
    assert_eq!(ctl.state(), RequestState::Succeeded("old".into()));

    let second = ctl.request_summary(&records, &ThresholdTable::CLINICAL);
    let probe = async {
      tokio::task::yield_now().await;
      let during = ctl.state();
      transport.release();
      during
    };
    let (_, during) = tokio::join!(second, probe);

    assert_eq!(during, RequestState::Loading);
    assert_eq!(during.summary(), None);
    assert_eq!(ctl.state(), RequestState::Succeeded("new".into()));
  }

  #[tokio::test]
  async fn every_trigger_is_a_fresh_call() {
    let transport = Arc::new(ScriptedTransport::replying(vec![ok_body("a"), ok_body("b")]));
    let ctl = controller(transport.clone());
    let records = sample_records().unwrap();

    ctl.request_summary(&records, &ThresholdTable::CLINICAL).await;
    ctl.request_summary(&records, &ThresholdTable::CLINICAL).await;

    assert_eq!(transport.calls(), 2);
    assert_eq!(ctl.state(), RequestState::Succeeded("b".into()));
    let requests = transport.requests.lock().unwrap();
    assert_eq!(requests[0].messages, requests[1].messages);
  }

  /// First call never returns; later calls reply at once.
  #[derive(Default)]
  struct StallingTransport {
    calls: AtomicUsize,
  }

  #[async_trait]
  impl SummaryTransport for StallingTransport {
    async fn send(&self, _request: &ChatRequest) -> Result<String, SummaryError> {
      if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
        std::future::pending::<()>().await;
      }
      ok_body("recovered")
    }
  }

  #[tokio::test]
  async fn abandoned_request_settles_as_failed() {
    let transport = Arc::new(StallingTransport::default());
    let ctl = SummaryController::new(SummaryConfig::default(), transport.clone());
    let records = sample_records().unwrap();

    let timed = tokio::time::timeout(
      Duration::from_millis(20),
      ctl.request_summary(&records, &ThresholdTable::CLINICAL),
    )
    .await;
    assert!(timed.is_err());
    assert_eq!(ctl.state(), RequestState::Failed(FAILURE_MESSAGE.into()));

    let outcome = ctl.request_summary(&records, &ThresholdTable::CLINICAL).await;
    assert_eq!(outcome, RequestOutcome::Completed);
    assert_eq!(ctl.state(), RequestState::Succeeded("recovered".into()));
    assert_eq!(transport.calls.load(Ordering::SeqCst), 2);
  }
}
