//! Topology tables for the fixed cell shapes.
//!
//! Each 3D shape lists its edges and its faces. Faces are rings of local
//! point indices wound counter-clockwise when seen from outside the cell,
//! which is what lets the marcher orient the polygons it chains together.
//!
//! # Hexahedron / voxel
//!
//! ```text
//!   hexahedron                 voxel (binary ZYX)
//!
//!       7──────6                   6──────7
//!      /│     /│                  /│     /│
//!     4─┼────5 │                 4─┼────5 │
//!     │ 3────┼─2                 │ 2────┼─3
//!     │/     │/                  │/     │/
//!     0──────1                   0──────1
//! ```
//!
//! # Point order
//!
//! - tetrahedron: (0, 1, 2) counter-clockwise seen from point 3
//! - hexahedron: (0, 1, 2, 3) with its right-hand normal towards (4..7)
//! - wedge: (0, 1, 2) with its right-hand normal pointing away from (3, 4, 5)
//! - pyramid: base (0, 1, 2, 3) with its right-hand normal towards apex 4
//!
//! # Crossing tables
//!
//! `crossings[case]` is a bit mask of the edges whose endpoints disagree in
//! `case`, bit `i` of `case` being set when local point `i` is inside. A
//! zero entry means the cell is entirely on one side.

use crate::dataset::cell::CellType;

/// Edges, faces and crossing table of one fixed 3D shape.
#[derive(Debug)]
pub struct ShapeTable {
  pub cell_type: CellType,
  pub points: usize,
  pub edges: &'static [[u8; 2]],
  pub faces: &'static [&'static [u8]],
  pub crossings: &'static [u16],
}

impl ShapeTable {
  /// Edge mask crossed in `case`.
  #[inline]
  pub fn crossed_edges(&self, case: usize) -> u16 {
    self.crossings[case]
  }
}

// =============================================================================
// Tetrahedron
// =============================================================================

pub const TETRA_EDGES: [[u8; 2]; 6] = [[0, 1], [1, 2], [2, 0], [0, 3], [1, 3], [2, 3]];

pub const TETRA_FACES: [&[u8]; 4] = [&[0, 1, 3], &[1, 2, 3], &[2, 0, 3], &[0, 2, 1]];

pub const TETRA_CROSSINGS: [u16; 16] = generate_crossing_table(&TETRA_EDGES);

// =============================================================================
// Hexahedron
// =============================================================================

pub const HEXAHEDRON_EDGES: [[u8; 2]; 12] = [
  [0, 1],
  [1, 2],
  [3, 2],
  [0, 3],
  [4, 5],
  [5, 6],
  [7, 6],
  [4, 7],
  [0, 4],
  [1, 5],
  [3, 7],
  [2, 6],
];

pub const HEXAHEDRON_FACES: [&[u8]; 6] = [
  &[0, 3, 2, 1],
  &[4, 5, 6, 7],
  &[0, 1, 5, 4],
  &[3, 7, 6, 2],
  &[0, 4, 7, 3],
  &[1, 2, 6, 5],
];

pub const HEXAHEDRON_CROSSINGS: [u16; 256] = generate_crossing_table(&HEXAHEDRON_EDGES);

// =============================================================================
// Voxel
// =============================================================================

/// Voxel edges, grouped as pairs of corners differing in one axis bit.
pub const VOXEL_EDGES: [[u8; 2]; 12] = [
  [0, 1], // X axis at Y=0, Z=0
  [0, 2], // Y axis at X=0, Z=0
  [0, 4], // Z axis at X=0, Y=0
  [1, 3], // Y axis at X=1, Z=0
  [1, 5], // Z axis at X=1, Y=0
  [2, 3], // X axis at Y=1, Z=0
  [2, 6], // Z axis at X=0, Y=1
  [3, 7], // Z axis at X=1, Y=1
  [4, 5], // X axis at Y=0, Z=1
  [4, 6], // Y axis at X=0, Z=1
  [5, 7], // Y axis at X=1, Z=1
  [6, 7], // X axis at Y=1, Z=1
];

pub const VOXEL_FACES: [&[u8]; 6] = [
  &[0, 2, 3, 1], // -Z
  &[4, 5, 7, 6], // +Z
  &[0, 1, 5, 4], // -Y
  &[2, 6, 7, 3], // +Y
  &[0, 4, 6, 2], // -X
  &[1, 3, 7, 5], // +X
];

pub const VOXEL_CROSSINGS: [u16; 256] = generate_crossing_table(&VOXEL_EDGES);

// =============================================================================
// Wedge
// =============================================================================

pub const WEDGE_EDGES: [[u8; 2]; 9] = [
  [0, 1],
  [1, 2],
  [2, 0],
  [3, 4],
  [4, 5],
  [5, 3],
  [0, 3],
  [1, 4],
  [2, 5],
];

pub const WEDGE_FACES: [&[u8]; 5] = [
  &[0, 1, 2],
  &[3, 5, 4],
  &[0, 3, 4, 1],
  &[1, 4, 5, 2],
  &[2, 5, 3, 0],
];

pub const WEDGE_CROSSINGS: [u16; 64] = generate_crossing_table(&WEDGE_EDGES);

// =============================================================================
// Pyramid
// =============================================================================

pub const PYRAMID_EDGES: [[u8; 2]; 8] = [
  [0, 1],
  [1, 2],
  [2, 3],
  [3, 0],
  [0, 4],
  [1, 4],
  [2, 4],
  [3, 4],
];

pub const PYRAMID_FACES: [&[u8]; 5] = [
  &[0, 3, 2, 1],
  &[0, 1, 4],
  &[1, 2, 4],
  &[2, 3, 4],
  &[3, 0, 4],
];

pub const PYRAMID_CROSSINGS: [u16; 32] = generate_crossing_table(&PYRAMID_EDGES);

// =============================================================================
// 2D rings
// =============================================================================

/// Boundary ring of a triangle.
pub const TRIANGLE_RING: [u8; 3] = [0, 1, 2];

/// Boundary ring of a quad.
pub const QUAD_RING: [u8; 4] = [0, 1, 2, 3];

/// Boundary ring of a pixel (binary corner order).
pub const PIXEL_RING: [u8; 4] = [0, 1, 3, 2];

// =============================================================================
// Lookup
// =============================================================================

static TETRA: ShapeTable = ShapeTable {
  cell_type: CellType::Tetra,
  points: 4,
  edges: &TETRA_EDGES,
  faces: &TETRA_FACES,
  crossings: &TETRA_CROSSINGS,
};

static HEXAHEDRON: ShapeTable = ShapeTable {
  cell_type: CellType::Hexahedron,
  points: 8,
  edges: &HEXAHEDRON_EDGES,
  faces: &HEXAHEDRON_FACES,
  crossings: &HEXAHEDRON_CROSSINGS,
};

static VOXEL: ShapeTable = ShapeTable {
  cell_type: CellType::Voxel,
  points: 8,
  edges: &VOXEL_EDGES,
  faces: &VOXEL_FACES,
  crossings: &VOXEL_CROSSINGS,
};

static WEDGE: ShapeTable = ShapeTable {
  cell_type: CellType::Wedge,
  points: 6,
  edges: &WEDGE_EDGES,
  faces: &WEDGE_FACES,
  crossings: &WEDGE_CROSSINGS,
};

static PYRAMID: ShapeTable = ShapeTable {
  cell_type: CellType::Pyramid,
  points: 5,
  edges: &PYRAMID_EDGES,
  faces: &PYRAMID_FACES,
  crossings: &PYRAMID_CROSSINGS,
};

/// Table for a fixed 3D shape; `None` for every other type.
pub fn shape_table(cell_type: CellType) -> Option<&'static ShapeTable> {
  match cell_type {
    CellType::Tetra => Some(&TETRA),
    CellType::Hexahedron => Some(&HEXAHEDRON),
    CellType::Voxel => Some(&VOXEL),
    CellType::Wedge => Some(&WEDGE),
    CellType::Pyramid => Some(&PYRAMID),
    _ => None,
  }
}

/// Generate a crossing table at compile time.
///
/// `CASES` must be `2^points`.
const fn generate_crossing_table<const CASES: usize>(edges: &[[u8; 2]]) -> [u16; CASES] {
  let mut table = [0u16; CASES];
  let mut case = 0usize;

  while case < CASES {
    let mut edge_mask = 0u16;
    let mut edge = 0;

    while edge < edges.len() {
      let inside0 = (case >> edges[edge][0]) & 1;
      let inside1 = (case >> edges[edge][1]) & 1;

      if inside0 != inside1 {
        edge_mask |= 1 << edge;
      }

      edge += 1;
    }

    table[case] = edge_mask;
    case += 1;
  }

  table
}

#[cfg(test)]
#[path = "cell_table_test.rs"]
mod cell_table_test;
