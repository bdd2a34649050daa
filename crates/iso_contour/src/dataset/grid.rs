//! Implicit-topology grids: image data, rectilinear and structured grids.
//!
//! All three share the same point layout (`x` fastest, then `y`, then `z`)
//! and derive their cells from the grid dimensions. Axes with a single
//! sample are collapsed, so a `[n, m, 1]` grid is a 2D sheet of pixels or
//! quads.
//!
//! # Corner order
//!
//! ```text
//!   image / rectilinear (binary ZYX)      structured (hexahedron order)
//!
//!       6──────7                              7──────6
//!      /│     /│                             /│     /│
//!     4─┼────5 │                            4─┼────5 │
//!     │ 2────┼─3                            │ 3────┼─2
//!     │/     │/                             │/     │/
//!     0──────1                              0──────1
//! ```

use glam::DVec3;

use super::cell::{Cell, CellType};
use crate::types::{Bounds, PointId, Points, Precision};

/// Point dimensions of a grid and the cell layout they imply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridExtent {
  pub dimensions: [usize; 3],
}

impl GridExtent {
  pub fn new(dimensions: [usize; 3]) -> Self {
    Self { dimensions }
  }

  pub fn number_of_points(&self) -> usize {
    self.dimensions.iter().product()
  }

  /// Axes with more than one sample, in x, y, z order.
  pub fn active_axes(&self) -> impl Iterator<Item = usize> + '_ {
    (0..3).filter(move |&a| self.dimensions[a] > 1)
  }

  /// Number of populated axes (0 to 3).
  pub fn data_dimension(&self) -> usize {
    self.active_axes().count()
  }

  pub fn number_of_cells(&self) -> usize {
    if self.number_of_points() == 0 {
      return 0;
    }
    self.active_axes().map(|a| self.dimensions[a] - 1).product()
  }

  /// Cell type produced for this extent given the hexahedral or voxel
  /// family.
  pub fn cell_type(&self, structured: bool) -> CellType {
    match (self.data_dimension(), structured) {
      (0, _) => CellType::Vertex,
      (1, _) => CellType::Line,
      (2, false) => CellType::Pixel,
      (2, true) => CellType::Quad,
      (_, false) => CellType::Voxel,
      (_, true) => CellType::Hexahedron,
    }
  }

  #[inline]
  pub fn point_index(&self, ijk: [usize; 3]) -> usize {
    ijk[0] + self.dimensions[0] * (ijk[1] + self.dimensions[1] * ijk[2])
  }

  #[inline]
  pub fn point_ijk(&self, index: usize) -> [usize; 3] {
    let nx = self.dimensions[0].max(1);
    let ny = self.dimensions[1].max(1);
    [index % nx, (index / nx) % ny, index / (nx * ny)]
  }

  /// Lower corner of cell `cell_id`.
  fn cell_origin(&self, cell_id: usize) -> [usize; 3] {
    let mut rest = cell_id;
    let mut ijk = [0usize; 3];
    for axis in 0..3 {
      let cells = self.dimensions[axis].saturating_sub(1).max(1);
      ijk[axis] = rest % cells;
      rest /= cells;
    }
    ijk
  }

  /// Fill `cell` with the corners of `cell_id`.
  ///
  /// `structured` selects hexahedron/quad corner order instead of the
  /// binary voxel/pixel order.
  pub fn fill_cell(&self, cell_id: usize, structured: bool, cell: &mut Cell) {
    cell.clear();
    let cell_type = self.cell_type(structured);
    cell.type_code = cell_type.code();

    let origin = self.cell_origin(cell_id);
    let axes: smallvec::SmallVec<[usize; 3]> = self.active_axes().collect();
    let corners = 1usize << axes.len();

    for corner in 0..corners {
      let bits = if structured { ccw_bits(corner) } else { corner };
      let mut ijk = origin;
      for (slot, &axis) in axes.iter().enumerate() {
        ijk[axis] += (bits >> slot) & 1;
      }
      cell.point_ids.push(self.point_index(ijk) as PointId);
    }
  }
}

/// Map a hexahedron/quad corner index onto binary axis offsets.
///
/// Within each layer corners run counter-clockwise: (0,0) (1,0) (1,1) (0,1).
#[inline]
const fn ccw_bits(corner: usize) -> usize {
  let layer = corner & !3;
  let ring = match corner & 3 {
    0 => 0b00,
    1 => 0b01,
    2 => 0b11,
    _ => 0b10,
  };
  layer | ring
}

/// Axis-aligned grid with uniform spacing.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageData {
  pub extent: GridExtent,
  pub origin: DVec3,
  pub spacing: DVec3,
}

impl ImageData {
  pub fn new(dimensions: [usize; 3], origin: DVec3, spacing: DVec3) -> Self {
    Self {
      extent: GridExtent::new(dimensions),
      origin,
      spacing,
    }
  }

  #[inline]
  pub fn point(&self, index: usize) -> DVec3 {
    let [i, j, k] = self.extent.point_ijk(index);
    self.origin + self.spacing * DVec3::new(i as f64, j as f64, k as f64)
  }

  pub fn bounds(&self) -> Bounds {
    if self.extent.number_of_points() == 0 {
      return Bounds::empty();
    }
    let last = self.extent.dimensions.map(|d| d.saturating_sub(1) as f64);
    let far = self.origin + self.spacing * DVec3::from_array(last);
    Bounds::new(self.origin.min(far), self.origin.max(far))
  }
}

/// Axis-aligned grid with per-axis coordinate lists.
#[derive(Clone, Debug, PartialEq)]
pub struct RectilinearGrid {
  pub x: Vec<f64>,
  pub y: Vec<f64>,
  pub z: Vec<f64>,
}

impl RectilinearGrid {
  pub fn new(x: Vec<f64>, y: Vec<f64>, z: Vec<f64>) -> Self {
    Self { x, y, z }
  }

  pub fn extent(&self) -> GridExtent {
    GridExtent::new([self.x.len(), self.y.len(), self.z.len()])
  }

  #[inline]
  pub fn point(&self, index: usize) -> DVec3 {
    let [i, j, k] = self.extent().point_ijk(index);
    DVec3::new(self.x[i], self.y[j], self.z[k])
  }

  pub fn bounds(&self) -> Bounds {
    if self.extent().number_of_points() == 0 {
      return Bounds::empty();
    }
    let range = |c: &[f64]| {
      c.iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
    };
    let (x0, x1) = range(&self.x);
    let (y0, y1) = range(&self.y);
    let (z0, z1) = range(&self.z);
    Bounds::new(DVec3::new(x0, y0, z0), DVec3::new(x1, y1, z1))
  }
}

/// Curvilinear grid: implicit topology, explicit point coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct StructuredGrid {
  pub extent: GridExtent,
  pub points: Points,
}

impl StructuredGrid {
  /// Panics if the point count does not match the dimensions.
  pub fn new(dimensions: [usize; 3], points: Points) -> Self {
    let extent = GridExtent::new(dimensions);
    assert_eq!(
      extent.number_of_points(),
      points.len(),
      "structured grid {:?} needs {} points",
      dimensions,
      extent.number_of_points()
    );
    Self { extent, points }
  }

  pub fn precision(&self) -> Precision {
    self.points.precision()
  }

  pub fn bounds(&self) -> Bounds {
    Bounds::from_points(self.points.iter())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_extent_cell_counts() {
    assert_eq!(GridExtent::new([3, 3, 3]).number_of_cells(), 8);
    assert_eq!(GridExtent::new([4, 3, 1]).number_of_cells(), 6);
    assert_eq!(GridExtent::new([5, 1, 1]).number_of_cells(), 4);
    assert_eq!(GridExtent::new([1, 1, 1]).number_of_cells(), 1);
    assert_eq!(GridExtent::new([0, 0, 0]).number_of_cells(), 0);
  }

  #[test]
  fn test_voxel_corners_are_binary_ordered() {
    let extent = GridExtent::new([2, 2, 2]);
    let mut cell = Cell::default();
    extent.fill_cell(0, false, &mut cell);

    assert_eq!(cell.cell_type(), Some(CellType::Voxel));
    assert_eq!(cell.point_ids.as_slice(), &[0, 1, 2, 3, 4, 5, 6, 7]);
  }

  #[test]
  fn test_hexahedron_corners_are_ccw_per_layer() {
    let extent = GridExtent::new([2, 2, 2]);
    let mut cell = Cell::default();
    extent.fill_cell(0, true, &mut cell);

    assert_eq!(cell.cell_type(), Some(CellType::Hexahedron));
    assert_eq!(cell.point_ids.as_slice(), &[0, 1, 3, 2, 4, 5, 7, 6]);
  }

  #[test]
  fn test_sheet_in_xz_plane_yields_pixels() {
    let extent = GridExtent::new([3, 1, 2]);
    let mut cell = Cell::default();
    extent.fill_cell(1, false, &mut cell);

    assert_eq!(cell.cell_type(), Some(CellType::Pixel));
    // cell 1 starts at i=1; z stride is 3
    assert_eq!(cell.point_ids.as_slice(), &[1, 2, 4, 5]);
  }

  #[test]
  fn test_image_point_and_bounds() {
    let image = ImageData::new([3, 2, 2], DVec3::new(1.0, 0.0, 0.0), DVec3::new(0.5, 2.0, 1.0));

    assert_eq!(image.point(0), DVec3::new(1.0, 0.0, 0.0));
    assert_eq!(image.point(5), DVec3::new(2.0, 2.0, 0.0));
    let bounds = image.bounds();
    assert_eq!(bounds.max, DVec3::new(2.0, 2.0, 1.0));
  }

  #[test]
  fn test_rectilinear_point() {
    let grid = RectilinearGrid::new(vec![0.0, 1.0, 3.0], vec![0.0, 2.0], vec![5.0]);

    assert_eq!(grid.extent().data_dimension(), 2);
    assert_eq!(grid.point(4), DVec3::new(1.0, 2.0, 5.0));
  }
}
