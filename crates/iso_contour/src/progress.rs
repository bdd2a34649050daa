//! Progress reporting and cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Receives progress from a running contour call.
///
/// `should_abort` is polled at the same points progress is reported; a
/// `true` answer ends the call with the output built so far.
pub trait ProgressObserver {
  /// Fraction of the work done, in `[0, 1]`.
  fn report_progress(&mut self, _fraction: f64) {}

  fn should_abort(&self) -> bool {
    false
  }
}

/// Observer that ignores progress and never aborts.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {}

/// Shared cancellation flag.
#[derive(Debug, Default, Clone)]
pub struct AbortFlag(Arc<AtomicBool>);

impl AbortFlag {
  pub fn new() -> Self {
    Self::default()
  }

  /// Request cancellation.
  pub fn abort(&self) {
    self.0.store(true, Ordering::Relaxed);
  }

  pub fn is_aborted(&self) -> bool {
    self.0.load(Ordering::Relaxed)
  }

  pub fn reset(&self) {
    self.0.store(false, Ordering::Relaxed);
  }
}

impl ProgressObserver for AbortFlag {
  fn should_abort(&self) -> bool {
    self.is_aborted()
  }
}

/// Observer forwarding progress to a closure, with an optional abort flag.
pub struct ProgressCallback<F> {
  callback: F,
  abort: Option<AbortFlag>,
}

impl<F: FnMut(f64)> ProgressCallback<F> {
  pub fn new(callback: F) -> Self {
    Self {
      callback,
      abort: None,
    }
  }

  pub fn with_abort(mut self, flag: AbortFlag) -> Self {
    self.abort = Some(flag);
    self
  }
}

impl<F: FnMut(f64)> ProgressObserver for ProgressCallback<F> {
  fn report_progress(&mut self, fraction: f64) {
    (self.callback)(fraction.clamp(0.0, 1.0));
  }

  fn should_abort(&self) -> bool {
    self.abort.as_ref().is_some_and(AbortFlag::is_aborted)
  }
}
