//! Contour call statistics.
//!
//! Feature-gated and runtime-toggled; with the `metrics` feature off every
//! `record_*` call is a no-op.
//!
//! # Usage
//!
//! ```ignore
//! use iso_contour::metrics::COLLECT_METRICS;
//!
//! // Compile with --features metrics
//! COLLECT_METRICS.store(false, Ordering::Relaxed);
//!
//! let outcome = filter.contour(&input);
//! println!("{:.1} us", filter.metrics().avg_contour_timing_us());
//! ```

use std::collections::VecDeque;
use std::sync::atomic::AtomicBool;
#[cfg(feature = "metrics")]
use std::sync::atomic::Ordering;

use crate::error::{ContourOutcome, ContourStatus};

/// Runtime toggle for metrics collection.
pub static COLLECT_METRICS: AtomicBool = AtomicBool::new(true);

/// True when metrics are compiled in and switched on.
#[inline]
pub fn is_enabled() -> bool {
    #[cfg(feature = "metrics")]
    {
        COLLECT_METRICS.load(Ordering::Relaxed)
    }
    #[cfg(not(feature = "metrics"))]
    {
        false
    }
}

/// Last `capacity` per-call samples with a running total.
#[derive(Debug, Clone)]
pub struct CallSamples {
    samples: VecDeque<u64>,
    capacity: usize,
    total: u64,
}

impl CallSamples {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
            total: 0,
        }
    }

    /// Record a sample, dropping the oldest at capacity.
    pub fn record(&mut self, value: u64) {
        if self.samples.len() >= self.capacity {
            if let Some(old) = self.samples.pop_front() {
                self.total -= old;
            }
        }
        self.samples.push_back(value);
        self.total += value;
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    fn reset(&mut self) {
        self.samples.clear();
        self.total = 0;
    }

    pub fn average(&self) -> f64 {
        if self.samples.is_empty() {
            0.0
        } else {
            self.total as f64 / self.samples.len() as f64
        }
    }

    pub fn min_max(&self) -> Option<(u64, u64)> {
        let min = self.samples.iter().min()?;
        let max = self.samples.iter().max()?;
        Some((*min, *max))
    }
}

impl Default for CallSamples {
    fn default() -> Self {
        Self::new(128)
    }
}

/// Statistics over the contour calls of one filter.
#[derive(Debug, Clone, Default)]
pub struct ContourMetrics {
    // Calls
    pub calls: u64,
    pub aborted_calls: u64,
    pub rejected_calls: u64,

    // Output
    /// Points per call.
    pub points: CallSamples,
    /// Primitives per call.
    pub primitives: CallSamples,
    /// Total crossings resolved to an existing point.
    pub total_points_merged: u64,
    /// Total cells skipped for unknown type or missing points.
    pub total_cells_skipped: u64,

    // Timing
    /// Wall time per call in microseconds.
    pub contour_timings: CallSamples,
    /// Normals pass time per call in microseconds.
    pub normals_timings: CallSamples,
    pub last_contour_us: u64,
}

impl ContourMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the windows. Call counters are cumulative and kept.
    pub fn reset(&mut self) {
        self.points.reset();
        self.primitives.reset();
        self.contour_timings.reset();
        self.normals_timings.reset();
        self.last_contour_us = 0;
    }

    /// Record the result of one call.
    pub fn record_outcome(&mut self, outcome: &ContourOutcome) {
        if !is_enabled() {
            return;
        }

        self.calls += 1;
        match outcome.status {
            ContourStatus::Complete => {}
            ContourStatus::Aborted => self.aborted_calls += 1,
            ContourStatus::Rejected(_) => {
                self.rejected_calls += 1;
                return;
            }
        }

        let stats = &outcome.stats;
        self.points.record(outcome.mesh.number_of_points() as u64);
        self.primitives.record(outcome.mesh.number_of_cells() as u64);
        self.total_points_merged += stats.points_merged as u64;
        self.total_cells_skipped += stats.cells_skipped as u64;
        self.contour_timings.record(stats.elapsed_us);
        self.last_contour_us = stats.elapsed_us;
    }

    pub fn record_normals_timing(&mut self, timing_us: u64) {
        if is_enabled() {
            self.normals_timings.record(timing_us);
        }
    }

    pub fn avg_contour_timing_us(&self) -> f64 {
        self.contour_timings.average()
    }

    /// Fastest and slowest call still in the window.
    pub fn contour_timing_range_us(&self) -> Option<(u64, u64)> {
        self.contour_timings.min_max()
    }

    pub fn avg_normals_timing_us(&self) -> f64 {
        self.normals_timings.average()
    }

    pub fn avg_points(&self) -> f64 {
        self.points.average()
    }

    pub fn avg_primitives(&self) -> f64 {
        self.primitives.average()
    }
}
