//! Cell type tags and extracted cells.

use smallvec::SmallVec;

use crate::types::PointId;

/// Closed set of cell types understood by the marcher.
///
/// Discriminants are the numeric type codes used by unstructured grids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CellType {
  Vertex = 1,
  PolyVertex = 2,
  Line = 3,
  PolyLine = 4,
  Triangle = 5,
  TriangleStrip = 6,
  Polygon = 7,
  Pixel = 8,
  Quad = 9,
  Tetra = 10,
  Voxel = 11,
  Hexahedron = 12,
  Wedge = 13,
  Pyramid = 14,
  Polyhedron = 42,
}

/// Topological dimension per type code, `None` for unknown codes.
pub const CELL_TYPE_DIMENSIONS: [Option<u8>; 43] = build_dimension_table();

const fn build_dimension_table() -> [Option<u8>; 43] {
  let mut table = [None; 43];
  table[1] = Some(0);
  table[2] = Some(0);
  table[3] = Some(1);
  table[4] = Some(1);
  table[5] = Some(2);
  table[6] = Some(2);
  table[7] = Some(2);
  table[8] = Some(2);
  table[9] = Some(2);
  table[10] = Some(3);
  table[11] = Some(3);
  table[12] = Some(3);
  table[13] = Some(3);
  table[14] = Some(3);
  table[42] = Some(3);
  table
}

/// Dimension of a raw type code.
#[inline]
pub fn dimension_of_code(code: u8) -> Option<u8> {
  CELL_TYPE_DIMENSIONS.get(code as usize).copied().flatten()
}

impl CellType {
  /// Parse a raw type code.
  pub fn from_code(code: u8) -> Option<Self> {
    Some(match code {
      1 => CellType::Vertex,
      2 => CellType::PolyVertex,
      3 => CellType::Line,
      4 => CellType::PolyLine,
      5 => CellType::Triangle,
      6 => CellType::TriangleStrip,
      7 => CellType::Polygon,
      8 => CellType::Pixel,
      9 => CellType::Quad,
      10 => CellType::Tetra,
      11 => CellType::Voxel,
      12 => CellType::Hexahedron,
      13 => CellType::Wedge,
      14 => CellType::Pyramid,
      42 => CellType::Polyhedron,
      _ => return None,
    })
  }

  #[inline]
  pub fn code(self) -> u8 {
    self as u8
  }

  /// Topological dimension (0 for points, 3 for solids).
  #[inline]
  pub fn dimension(self) -> u8 {
    match self {
      CellType::Vertex | CellType::PolyVertex => 0,
      CellType::Line | CellType::PolyLine => 1,
      CellType::Triangle
      | CellType::TriangleStrip
      | CellType::Polygon
      | CellType::Pixel
      | CellType::Quad => 2,
      CellType::Tetra
      | CellType::Voxel
      | CellType::Hexahedron
      | CellType::Wedge
      | CellType::Pyramid
      | CellType::Polyhedron => 3,
    }
  }

  /// Minimum number of point ids a well-formed cell of this type has.
  pub fn min_points(self) -> usize {
    match self {
      CellType::Vertex | CellType::PolyVertex => 1,
      CellType::Line | CellType::PolyLine => 2,
      CellType::Triangle | CellType::TriangleStrip | CellType::Polygon => 3,
      CellType::Pixel | CellType::Quad | CellType::Tetra => 4,
      CellType::Pyramid => 5,
      CellType::Wedge => 6,
      CellType::Voxel | CellType::Hexahedron => 8,
      CellType::Polyhedron => 4,
    }
  }
}

/// Point ids of a cell; eight inline covers every fixed shape.
pub type CellPoints = SmallVec<[PointId; 8]>;

/// One cell pulled out of a data set.
///
/// `type_code` is kept raw so that cells with unknown codes can be reported
/// instead of failing extraction. `faces` is only filled for polyhedra and
/// holds global point ids with outward winding.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Cell {
  pub type_code: u8,
  pub point_ids: CellPoints,
  pub faces: Vec<CellPoints>,
}

impl Cell {
  pub fn new(cell_type: CellType, point_ids: &[PointId]) -> Self {
    Self {
      type_code: cell_type.code(),
      point_ids: SmallVec::from_slice(point_ids),
      faces: Vec::new(),
    }
  }

  pub fn cell_type(&self) -> Option<CellType> {
    CellType::from_code(self.type_code)
  }

  pub fn len(&self) -> usize {
    self.point_ids.len()
  }

  pub fn is_empty(&self) -> bool {
    self.point_ids.is_empty()
  }

  /// Reset for reuse without freeing the id storage.
  pub(crate) fn clear(&mut self) {
    self.type_code = 0;
    self.point_ids.clear();
    self.faces.clear();
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_codes_round_trip_through_enum() {
    for code in 0u8..=64 {
      if let Some(ty) = CellType::from_code(code) {
        assert_eq!(ty.code(), code);
        assert_eq!(dimension_of_code(code), Some(ty.dimension()));
      } else {
        assert_eq!(dimension_of_code(code), None, "code {} has a dimension", code);
      }
    }
  }

  #[test]
  fn test_unknown_codes_have_no_dimension() {
    assert_eq!(dimension_of_code(0), None);
    assert_eq!(dimension_of_code(15), None);
    assert_eq!(dimension_of_code(200), None);
  }
}
