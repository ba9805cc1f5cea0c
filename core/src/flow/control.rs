// core/src/flow/control.rs

//! Signals for controlling flow execution and the outcome of a run.

/// Returned by every handler to tell the flow whether to keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowControl {
  Continue,
  /// Halt the flow immediately. Remaining handlers and steps are not run.
  Stop,
}

/// Outcome of a full flow execution that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOutcome {
  /// Every step ran (or was skipped / downgraded as best-effort).
  Completed,
  /// A handler returned `FlowControl::Stop`.
  Stopped,
}
