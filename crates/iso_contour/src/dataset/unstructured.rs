//! Explicit cell lists.

use super::cell::{Cell, CellPoints, CellType};
use crate::types::{Bounds, CellArray, PointId, Points, Precision};

/// Mixed-type mesh with explicit connectivity.
///
/// Type codes are stored raw; codes outside [`CellType`] are accepted here
/// and rejected (with a warning) by the contour driver.
#[derive(Clone, Debug, PartialEq)]
pub struct UnstructuredGrid {
  pub points: Points,
  types: Vec<u8>,
  cells: CellArray,
  /// Per polyhedron cell: index into `faces`.
  face_offsets: Vec<Option<usize>>,
  faces: Vec<Vec<CellPoints>>,
}

impl UnstructuredGrid {
  pub fn new(points: Points) -> Self {
    Self {
      points,
      types: Vec::new(),
      cells: CellArray::new(),
      face_offsets: Vec::new(),
      faces: Vec::new(),
    }
  }

  /// Append a cell. Returns its id.
  pub fn push_cell(&mut self, cell_type: CellType, point_ids: &[PointId]) -> usize {
    self.push_raw(cell_type.code(), point_ids)
  }

  /// Append a cell with an arbitrary type code.
  pub fn push_raw(&mut self, type_code: u8, point_ids: &[PointId]) -> usize {
    self.types.push(type_code);
    self.cells.push(point_ids);
    self.face_offsets.push(None);
    self.types.len() - 1
  }

  /// Append a polyhedron given its faces (outward winding).
  ///
  /// The cell's point list is the sorted set of face points.
  pub fn push_polyhedron(&mut self, faces: &[&[PointId]]) -> usize {
    let mut ids: Vec<PointId> = faces.iter().flat_map(|f| f.iter().copied()).collect();
    ids.sort_unstable();
    ids.dedup();

    let id = self.push_raw(CellType::Polyhedron.code(), &ids);
    self.face_offsets[id] = Some(self.faces.len());
    self
      .faces
      .push(faces.iter().map(|f| CellPoints::from_slice(f)).collect());
    id
  }

  pub fn number_of_points(&self) -> usize {
    self.points.len()
  }

  pub fn number_of_cells(&self) -> usize {
    self.types.len()
  }

  #[inline]
  pub fn cell_type_code(&self, cell_id: usize) -> u8 {
    self.types[cell_id]
  }

  pub fn fill_cell(&self, cell_id: usize, cell: &mut Cell) {
    cell.clear();
    cell.type_code = self.types[cell_id];
    cell.point_ids.extend_from_slice(self.cells.get(cell_id));
    if let Some(index) = self.face_offsets[cell_id] {
      cell.faces.extend(self.faces[index].iter().cloned());
    }
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
  use glam::DVec3;

  use super::*;

  #[test]
  fn test_push_and_fill() {
    let mut grid = UnstructuredGrid::new(Points::Double(vec![DVec3::ZERO; 4]));
    grid.push_cell(CellType::Triangle, &[0, 1, 2]);
    grid.push_raw(99, &[3]);

    let mut cell = Cell::default();
    grid.fill_cell(1, &mut cell);
    assert_eq!(cell.type_code, 99);
    assert_eq!(cell.cell_type(), None);

    grid.fill_cell(0, &mut cell);
    assert_eq!(cell.cell_type(), Some(CellType::Triangle));
    assert_eq!(cell.point_ids.as_slice(), &[0, 1, 2]);
    assert!(cell.faces.is_empty());
  }

  #[test]
  fn test_polyhedron_keeps_faces() {
    let mut grid = UnstructuredGrid::new(Points::Double(vec![DVec3::ZERO; 4]));
    let faces: [&[PointId]; 4] = [&[0, 1, 3], &[1, 2, 3], &[2, 0, 3], &[0, 2, 1]];
    let id = grid.push_polyhedron(&faces);

    let mut cell = Cell::default();
    grid.fill_cell(id, &mut cell);
    assert_eq!(cell.point_ids.as_slice(), &[0, 1, 2, 3]);
    assert_eq!(cell.faces.len(), 4);
    assert_eq!(cell.faces[3].as_slice(), &[0, 2, 1]);
  }
}
