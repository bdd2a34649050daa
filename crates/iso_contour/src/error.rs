//! Error and outcome types for contour calls.

use thiserror::Error;

use crate::types::PolyMesh;

/// Input problems that prevent a contour call from running.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContourError {
  /// No scalar array could be resolved.
  #[error("no scalar array to contour{}", requested(.0))]
  MissingScalars(Option<String>),

  /// The selected component does not exist.
  #[error("component {component} out of range for '{array}' with {components} components")]
  ComponentOutOfRange {
    array: String,
    component: usize,
    components: usize,
  },

  /// The scalar array does not have one tuple per point.
  #[error("scalar array '{array}' has {tuples} tuples for {points} points")]
  ScalarLengthMismatch {
    array: String,
    tuples: usize,
    points: usize,
  },
}

fn requested(name: &Option<String>) -> String {
  name
    .as_deref()
    .map(|n| format!(" (requested '{n}')"))
    .unwrap_or_default()
}

/// Result type for contour setup.
pub type ContourResult<T> = std::result::Result<T, ContourError>;

/// How a contour call ended.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ContourStatus {
  #[default]
  Complete,
  /// Stopped by the progress observer. The mesh holds what was built.
  Aborted,
  /// Nothing ran; the mesh is empty.
  Rejected(ContourError),
}

impl ContourStatus {
  pub fn is_complete(&self) -> bool {
    matches!(self, ContourStatus::Complete)
  }

  pub fn is_aborted(&self) -> bool {
    matches!(self, ContourStatus::Aborted)
  }

  pub fn error(&self) -> Option<&ContourError> {
    match self {
      ContourStatus::Rejected(err) => Some(err),
      _ => None,
    }
  }
}

/// Counters collected during one call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContourStats {
  /// (cell, iso-value) pairs handed to the marcher.
  pub cells_visited: usize,
  /// Cells skipped for unknown type or missing point ids.
  pub cells_skipped: usize,
  /// Edge crossings computed.
  pub crossings: usize,
  /// Crossings resolved to an existing point.
  pub points_merged: usize,
  /// New points whose attributes were interpolated.
  pub interpolations: usize,
  /// Primitives appended to the output.
  pub primitives: usize,
  /// Wall time of the call in microseconds.
  pub elapsed_us: u64,
}

impl ContourStats {
  /// Sum counters of two pieces (timings add as well).
  pub fn merge(&mut self, other: &ContourStats) {
    self.cells_visited += other.cells_visited;
    self.cells_skipped += other.cells_skipped;
    self.crossings += other.crossings;
    self.points_merged += other.points_merged;
    self.interpolations += other.interpolations;
    self.primitives += other.primitives;
    self.elapsed_us += other.elapsed_us;
  }
}

/// Mesh, status and counters of one contour call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContourOutcome {
  pub mesh: PolyMesh,
  pub status: ContourStatus,
  pub stats: ContourStats,
}

impl ContourOutcome {
  /// Empty outcome for a rejected call.
  pub fn rejected(error: ContourError) -> Self {
    Self {
      mesh: PolyMesh::default(),
      status: ContourStatus::Rejected(error),
      stats: ContourStats::default(),
    }
  }
}
