//! Cell lookup by scalar range.
//!
//! A scalar tree answers "which cells can contain `value`" without visiting
//! every cell. Building it costs one pass over the cells, so it pays off
//! when the same input is contoured at many iso-values.

use crate::dataset::{Cell, DataSet, ScalarField};
use crate::types::CellId;

/// Acceleration structure over per-cell scalar ranges.
pub trait ScalarTree: Send {
  /// Index the scalar range of every cell of `input`.
  fn build(&mut self, input: &DataSet, scalars: &ScalarField<'_>);

  fn is_built(&self) -> bool;

  /// Release all state.
  fn initialize(&mut self);

  /// Cells whose range contains `value`, appended to `out` in ascending
  /// id order.
  fn candidate_cells(&self, value: f64, out: &mut Vec<CellId>);
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct CellRange {
  min: f64,
  max: f64,
  cell: CellId,
}

/// Per-cell `(min, max)` intervals sorted by their lower end.
///
/// A query binary-searches the last interval starting at or below the value
/// and scans the prefix for intervals reaching it.
#[derive(Debug, Default, Clone)]
pub struct IntervalTree {
  ranges: Vec<CellRange>,
  /// Running maximum of `max` over the sorted prefix.
  prefix_max: Vec<f64>,
  built: bool,
}

impl IntervalTree {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn len(&self) -> usize {
    self.ranges.len()
  }

  pub fn is_empty(&self) -> bool {
    self.ranges.is_empty()
  }
}

impl ScalarTree for IntervalTree {
  #[tracing::instrument(skip_all, fields(cells = input.number_of_cells()))]
  fn build(&mut self, input: &DataSet, scalars: &ScalarField<'_>) {
    self.initialize();
    self.ranges.reserve(input.number_of_cells());

    let mut cell = Cell::default();
    for cell_id in 0..input.number_of_cells() {
      input.get_cell(cell_id, &mut cell);
      let mut values = cell.point_ids.iter().map(|&id| scalars.value(id as usize));
      let Some(first) = values.next() else {
        continue;
      };
      let (min, max) = values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
      self.ranges.push(CellRange {
        min,
        max,
        cell: cell_id,
      });
    }

    self.ranges.sort_by(|a, b| a.min.total_cmp(&b.min));
    let mut running = f64::NEG_INFINITY;
    self.prefix_max = self
      .ranges
      .iter()
      .map(|r| {
        running = running.max(r.max);
        running
      })
      .collect();
    self.built = true;
    tracing::debug!(intervals = self.ranges.len(), "scalar tree built");
  }

  fn is_built(&self) -> bool {
    self.built
  }

  fn initialize(&mut self) {
    self.ranges.clear();
    self.prefix_max.clear();
    self.built = false;
  }

  fn candidate_cells(&self, value: f64, out: &mut Vec<CellId>) {
    let end = self.ranges.partition_point(|r| r.min <= value);
    // Intervals before the first prefix maximum reaching `value` cannot hold it
    let start = self.prefix_max[..end].partition_point(|&m| m < value);

    let first = out.len();
    out.extend(
      self.ranges[start..end]
        .iter()
        .filter(|r| r.max >= value)
        .map(|r| r.cell),
    );
    out[first..].sort_unstable();
  }
}
