//! Attribute transfer from input points and cells to contour output.
//!
//! Output point attributes are blends of two input points along a crossed
//! edge; output cell attributes are copies of the input cell's row. Rows
//! are written strictly in id order, once each.

use crate::dataset::attributes::{AttributeTable, DataArray};
use crate::types::{CellId, PointId};

/// Builds the point and cell attribute tables of one contour output.
pub struct AttributeInterpolator<'a> {
  point_sources: Vec<&'a DataArray>,
  point_out: AttributeTable,
  cell_sources: Vec<&'a DataArray>,
  cell_out: AttributeTable,
  points_written: usize,
  cells_written: usize,
}

impl<'a> AttributeInterpolator<'a> {
  /// Mirror the schema of the source tables.
  ///
  /// Arrays whose tuple count differs from `point_count` / `cell_count`
  /// are skipped with a warning, as is `skip_point_array` when given.
  pub fn new(
    source_points: &'a AttributeTable,
    source_cells: &'a AttributeTable,
    point_count: usize,
    cell_count: usize,
    skip_point_array: Option<&str>,
    estimated_size: usize,
  ) -> Self {
    let (point_sources, point_out) = mirror(
      source_points,
      point_count,
      skip_point_array,
      estimated_size,
      "point",
    );
    let (cell_sources, cell_out) = mirror(source_cells, cell_count, None, estimated_size, "cell");

    Self {
      point_sources,
      point_out,
      cell_sources,
      cell_out,
      points_written: 0,
      cells_written: 0,
    }
  }

  /// Write the attributes of new point `dest`.
  ///
  /// Panics unless `dest` is the next unwritten point id.
  #[inline]
  pub fn interpolate_point(&mut self, dest: PointId, p0: usize, p1: usize, t: f64) {
    assert_eq!(
      dest as usize, self.points_written,
      "point attributes must be written once, in id order"
    );
    for (out, src) in self.point_out.arrays_mut().iter_mut().zip(&self.point_sources) {
      out.push_interpolated(src, p0, p1, t);
    }
    self.points_written += 1;
  }

  /// Write the attributes of output primitive `dest_row` from input cell
  /// `src_cell`.
  ///
  /// Panics unless `dest_row` is the next unwritten row.
  #[inline]
  pub fn copy_cell(&mut self, dest_row: usize, src_cell: CellId) {
    assert_eq!(
      dest_row, self.cells_written,
      "cell attributes must be written once, in row order"
    );
    for (out, src) in self.cell_out.arrays_mut().iter_mut().zip(&self.cell_sources) {
      out.push_copied(src, src_cell);
    }
    self.cells_written += 1;
  }

  pub fn points_written(&self) -> usize {
    self.points_written
  }

  pub fn cells_written(&self) -> usize {
    self.cells_written
  }

  /// Hand over the point and cell tables.
  pub fn finish(self) -> (AttributeTable, AttributeTable) {
    (self.point_out, self.cell_out)
  }
}

fn mirror<'a>(
  source: &'a AttributeTable,
  expected_tuples: usize,
  skip: Option<&str>,
  estimated_size: usize,
  kind: &str,
) -> (Vec<&'a DataArray>, AttributeTable) {
  let mut sources = Vec::with_capacity(source.len());
  let mut out = AttributeTable::new();

  for array in source.arrays() {
    if skip == Some(array.name()) {
      continue;
    }
    if array.tuple_count() != expected_tuples {
      tracing::warn!(
        array = array.name(),
        tuples = array.tuple_count(),
        expected = expected_tuples,
        "skipping {} array with wrong tuple count",
        kind
      );
      continue;
    }
    sources.push(array);
    out.add_array(array.empty_like(estimated_size));
  }

  if let Some(active) = source.scalars() {
    out.set_active_scalars(active.name());
  }

  (sources, out)
}

#[cfg(test)]
#[path = "interpolate_test.rs"]
mod interpolate_test;
