//! Contouring off the calling thread.
//!
//! ```text
//! Caller                         rayon
//! ┌───────────────┐
//! │ start(job)    │──────────▶ ContourFilter::contour_with_progress
//! └───────────────┘                      │ (abort flag polled)
//!                                        ▼
//! ┌───────────────┐              sender.send(outcome)
//! │ poll()        │◀─────────────────────┘
//! └───────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let mut job = BackgroundContour::new();
//! job.start(ContourJob::new(Arc::new(input), vec![0.5], ContourConfig::default()));
//!
//! // Later, without blocking
//! if let Some(outcome) = job.poll() {
//!     render(&outcome.mesh);
//! }
//! ```

use std::sync::Arc;

use crossbeam_channel::{self as channel, Receiver, RecvError, TryRecvError};

use crate::config::ContourConfig;
use crate::dataset::DataSet;
use crate::dispatch::ContourFilter;
use crate::error::ContourOutcome;
use crate::progress::AbortFlag;

/// Input of one background call.
#[derive(Clone, Debug)]
pub struct ContourJob {
  pub input: Arc<DataSet>,
  pub values: Vec<f64>,
  pub config: ContourConfig,
}

impl ContourJob {
  pub fn new(input: Arc<DataSet>, values: Vec<f64>, config: ContourConfig) -> Self {
    Self {
      input,
      values,
      config,
    }
  }
}

/// One contour call at a time on rayon's pool.
#[derive(Default)]
pub struct BackgroundContour {
  receiver: Option<Receiver<ContourOutcome>>,
  abort: AbortFlag,
}

impl BackgroundContour {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_busy(&self) -> bool {
    self.receiver.is_some()
  }

  /// Start `job`. Returns `false` if a call is already running.
  pub fn start(&mut self, job: ContourJob) -> bool {
    if self.is_busy() {
      return false;
    }

    let (sender, receiver) = channel::bounded(1);
    self.receiver = Some(receiver);
    self.abort = AbortFlag::new();
    let mut abort = self.abort.clone();

    rayon::spawn(move || {
      let mut filter = ContourFilter::new(job.config).with_values(job.values);
      let outcome = filter.contour_with_progress(&job.input, &mut abort);
      // Receiver dropped means cancelled
      let _ = sender.send(outcome);
    });

    true
  }

  /// Finished outcome, if any. Never blocks.
  pub fn poll(&mut self) -> Option<ContourOutcome> {
    let receiver = self.receiver.as_ref()?;

    match receiver.try_recv() {
      Ok(outcome) => {
        self.receiver = None;
        Some(outcome)
      }
      Err(TryRecvError::Empty) => None,
      Err(TryRecvError::Disconnected) => {
        self.receiver = None;
        None
      }
    }
  }

  /// Block until the running call finishes.
  pub fn wait(&mut self) -> Option<ContourOutcome> {
    let receiver = self.receiver.take()?;
    match receiver.recv() {
      Ok(outcome) => Some(outcome),
      Err(RecvError) => None,
    }
  }

  /// Ask the running call to stop and drop its result.
  pub fn cancel(&mut self) {
    self.abort.abort();
    self.receiver = None;
  }
}
