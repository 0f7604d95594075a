//! Observable holder for the request state.
//!
//! A `watch` channel holds the current value and wakes subscribers on every
//! change. Only this crate writes; callers get read-only receivers.

use tokio::sync::watch;

use crate::types::RequestState;

#[derive(Debug)]
pub struct StateCell {
  tx: watch::Sender<RequestState>,
}

impl StateCell {
  pub fn new() -> Self {
    let (tx, _rx) = watch::channel(RequestState::Idle);
    Self { tx }
  }

  /// Snapshot of the current state.
  pub fn current(&self) -> RequestState {
    self.tx.borrow().clone()
  }

  /// Receiver notified on every transition.
  pub fn subscribe(&self) -> watch::Receiver<RequestState> {
    self.tx.subscribe()
  }

  /// Move to Loading unless already there. Check and write happen under one lock.
  pub(crate) fn try_begin(&self) -> bool {
    self.tx.send_if_modified(|state| {
      if state.is_loading() {
        return false;
      }
      *state = RequestState::Loading;
      true
    })
  }

  pub(crate) fn settle(&self, next: RequestState) {
    debug_assert!(next.is_settled());
    self.tx.send_replace(next);
  }
}

impl Default for StateCell {
  fn default() -> Self {
    Self::new()
  }
}
