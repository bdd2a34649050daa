//! Fixture meshes and mesh checks shared by tests and benchmarks.

use std::collections::HashMap;

use glam::DVec3;

use crate::dataset::{
  AttributeTable, CellType, DataArray, DataSet, Geometry, ImageData, StructuredGrid,
  UnstructuredGrid,
};
use crate::types::{PointId, Points, PolyMesh};

/// Name of the scalar array on every fixture.
pub const SCALARS: &str = "scalars";

// =============================================================================
// Single cells
// =============================================================================

fn unstructured(
  points: Vec<DVec3>,
  scalars: Vec<f64>,
  build: impl FnOnce(&mut UnstructuredGrid),
) -> DataSet {
  let mut grid = UnstructuredGrid::new(Points::Double(points));
  build(&mut grid);
  DataSet::new(Geometry::Unstructured(grid))
    .with_point_data(AttributeTable::new().with_scalars(DataArray::from_f64(SCALARS, scalars)))
}

/// Unit tetrahedron `(0,0,0) (1,0,0) (0,1,0) (0,0,1)`.
pub fn single_tetra(scalars: [f64; 4]) -> DataSet {
  let points = vec![DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::Z];
  unstructured(points, scalars.to_vec(), |g| {
    g.push_cell(CellType::Tetra, &[0, 1, 2, 3]);
  })
}

/// Unit quad in the xy plane, corners counter-clockwise from the origin.
pub fn single_quad(scalars: [f64; 4]) -> DataSet {
  let points = vec![
    DVec3::ZERO,
    DVec3::new(1.0, 0.0, 0.0),
    DVec3::new(1.0, 1.0, 0.0),
    DVec3::new(0.0, 1.0, 0.0),
  ];
  unstructured(points, scalars.to_vec(), |g| {
    g.push_cell(CellType::Quad, &[0, 1, 2, 3]);
  })
}

/// Right triangle `(0,0,0) (1,0,0) (0,1,0)`.
pub fn single_triangle(scalars: [f64; 3]) -> DataSet {
  let points = vec![DVec3::ZERO, DVec3::X, DVec3::Y];
  unstructured(points, scalars.to_vec(), |g| {
    g.push_cell(CellType::Triangle, &[0, 1, 2]);
  })
}

/// Two tetrahedra sharing the face `(1, 2, 3)`.
pub fn tetra_pair(scalars: [f64; 5]) -> DataSet {
  let points = vec![DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::Z, DVec3::ONE];
  unstructured(points, scalars.to_vec(), |g| {
    g.push_cell(CellType::Tetra, &[0, 1, 2, 3]);
    g.push_cell(CellType::Tetra, &[1, 2, 3, 4]);
  })
}

// =============================================================================
// Sphere fields
// =============================================================================

/// Distance from the centre of an `n`³ unit-spaced lattice.
pub fn sphere_distance(n: usize) -> impl Fn(DVec3) -> f64 {
  let center = DVec3::splat((n - 1) as f64 * 0.5);
  move |p| p.distance(center)
}

fn lattice(n: usize) -> Vec<DVec3> {
  let mut points = Vec::with_capacity(n * n * n);
  for k in 0..n {
    for j in 0..n {
      for i in 0..n {
        points.push(DVec3::new(i as f64, j as f64, k as f64));
      }
    }
  }
  points
}

/// Image data whose scalars are the distance to the lattice centre.
pub fn sphere_image(n: usize) -> DataSet {
  let image = ImageData::new([n, n, n], DVec3::ZERO, DVec3::ONE);
  let field = sphere_distance(n);
  let scalars = lattice(n).into_iter().map(field).collect();
  DataSet::new(Geometry::Image(image))
    .with_point_data(AttributeTable::new().with_scalars(DataArray::from_f64(SCALARS, scalars)))
}

/// Same field as [`sphere_image`] on a structured (hexahedral) grid.
pub fn sphere_structured(n: usize) -> DataSet {
  let points = lattice(n);
  let field = sphere_distance(n);
  let scalars = points.iter().copied().map(field).collect();
  let grid = StructuredGrid::new([n, n, n], Points::Double(points));
  DataSet::new(Geometry::Structured(grid))
    .with_point_data(AttributeTable::new().with_scalars(DataArray::from_f64(SCALARS, scalars)))
}

/// Same field on a conforming tetrahedral mesh, six tetrahedra per cube.
pub fn sphere_tetrahedra(n: usize) -> DataSet {
  let points = lattice(n);
  let field = sphere_distance(n);
  let scalars: Vec<f64> = points.iter().copied().map(field).collect();
  let index = |i: usize, j: usize, k: usize| (i + n * (j + n * k)) as PointId;

  let mut grid = UnstructuredGrid::new(Points::Double(points));
  // Paths from corner 000 to 111, one axis at a time
  const PATHS: [([usize; 3], bool); 6] = [
    ([0, 1, 2], true),
    ([0, 2, 1], false),
    ([1, 0, 2], false),
    ([1, 2, 0], true),
    ([2, 0, 1], true),
    ([2, 1, 0], false),
  ];
  for k in 0..n - 1 {
    for j in 0..n - 1 {
      for i in 0..n - 1 {
        for (axes, even) in PATHS {
          let mut corner = [i, j, k];
          let mut ids = [0 as PointId; 4];
          ids[0] = index(i, j, k);
          for (step, &axis) in axes.iter().enumerate() {
            corner[axis] += 1;
            ids[step + 1] = index(corner[0], corner[1], corner[2]);
          }
          if !even {
            ids.swap(1, 2);
          }
          grid.push_cell(CellType::Tetra, &ids);
        }
      }
    }
  }

  DataSet::new(Geometry::Unstructured(grid))
    .with_point_data(AttributeTable::new().with_scalars(DataArray::from_f64(SCALARS, scalars)))
}

/// Sphere field on an unstructured mesh built cube by cube. `build` gets
/// each cube's corners in binary order (bit 0 = +x, bit 1 = +y, bit 2 = +z).
fn sphere_cubes(n: usize, mut build: impl FnMut(&mut UnstructuredGrid, [PointId; 8])) -> DataSet {
  let points = lattice(n);
  let field = sphere_distance(n);
  let scalars: Vec<f64> = points.iter().copied().map(field).collect();
  let index = |i: usize, j: usize, k: usize| (i + n * (j + n * k)) as PointId;

  let mut grid = UnstructuredGrid::new(Points::Double(points));
  for k in 0..n - 1 {
    for j in 0..n - 1 {
      for i in 0..n - 1 {
        let corners: [PointId; 8] =
          std::array::from_fn(|c| index(i + (c & 1), j + ((c >> 1) & 1), k + (c >> 2)));
        build(&mut grid, corners);
      }
    }
  }

  DataSet::new(Geometry::Unstructured(grid))
    .with_point_data(AttributeTable::new().with_scalars(DataArray::from_f64(SCALARS, scalars)))
}

/// Same field on wedges, two per cube split along the xy diagonal.
pub fn sphere_wedges(n: usize) -> DataSet {
  sphere_cubes(n, |grid, c| {
    // bottom triangles wound clockwise seen from +z
    grid.push_cell(CellType::Wedge, &[c[0], c[2], c[3], c[4], c[6], c[7]]);
    grid.push_cell(CellType::Wedge, &[c[0], c[3], c[1], c[4], c[7], c[5]]);
  })
}

/// Same field on one polyhedron per cube.
pub fn sphere_polyhedra(n: usize) -> DataSet {
  sphere_cubes(n, |grid, c| {
    grid.push_polyhedron(&[
      &[c[0], c[2], c[3], c[1]],
      &[c[4], c[5], c[7], c[6]],
      &[c[0], c[1], c[5], c[4]],
      &[c[2], c[6], c[7], c[3]],
      &[c[0], c[4], c[6], c[2]],
      &[c[1], c[3], c[7], c[5]],
    ]);
  })
}

/// Replace the scalars of `input` with `values`.
pub fn with_scalars(input: DataSet, values: Vec<f64>) -> DataSet {
  input.with_point_data(AttributeTable::new().with_scalars(DataArray::from_f64(SCALARS, values)))
}

// =============================================================================
// Mixed cell types
// =============================================================================

/// One cell of every contourable type plus an unknown type code, laid out
/// side by side along x. Scalars equal the y coordinate.
pub fn mixed_cells() -> DataSet {
  let mut points = Vec::new();
  let mut add = |p: [f64; 3]| {
    points.push(DVec3::from_array(p));
    (points.len() - 1) as PointId
  };

  let vertex = add([0.0, 0.5, 0.0]);
  let l0 = add([1.0, 0.0, 0.0]);
  let l1 = add([1.0, 1.0, 0.0]);
  let t0 = add([2.0, 0.0, 0.0]);
  let t1 = add([3.0, 0.0, 0.0]);
  let t2 = add([2.0, 1.0, 0.0]);
  let q = [
    add([4.0, 0.0, 0.0]),
    add([5.0, 0.0, 0.0]),
    add([5.0, 1.0, 0.0]),
    add([4.0, 1.0, 0.0]),
  ];
  let tet = [
    add([6.0, 0.0, 0.0]),
    add([7.0, 0.0, 0.0]),
    add([6.0, 1.0, 0.0]),
    add([6.0, 0.0, 1.0]),
  ];
  let hex: Vec<PointId> = [
    [8.0, 0.0, 0.0],
    [9.0, 0.0, 0.0],
    [9.0, 1.0, 0.0],
    [8.0, 1.0, 0.0],
    [8.0, 0.0, 1.0],
    [9.0, 0.0, 1.0],
    [9.0, 1.0, 1.0],
    [8.0, 1.0, 1.0],
  ]
  .into_iter()
  .map(&mut add)
  .collect();
  let wedge: Vec<PointId> = [
    [10.0, 0.0, 0.0],
    [10.0, 1.0, 0.0],
    [11.0, 0.0, 0.0],
    [10.0, 0.0, 1.0],
    [10.0, 1.0, 1.0],
    [11.0, 0.0, 1.0],
  ]
  .into_iter()
  .map(&mut add)
  .collect();
  let pyramid: Vec<PointId> = [
    [12.0, 0.0, 0.0],
    [13.0, 0.0, 0.0],
    [13.0, 1.0, 0.0],
    [12.0, 1.0, 0.0],
    [12.5, 0.5, 1.0],
  ]
  .into_iter()
  .map(&mut add)
  .collect();

  let scalars = points.iter().map(|p| p.y).collect();
  let mut grid = UnstructuredGrid::new(Points::Double(points));
  grid.push_cell(CellType::Vertex, &[vertex]);
  grid.push_cell(CellType::Line, &[l0, l1]);
  grid.push_cell(CellType::Triangle, &[t0, t1, t2]);
  grid.push_cell(CellType::Quad, &q);
  grid.push_cell(CellType::Tetra, &tet);
  grid.push_cell(CellType::Hexahedron, &hex);
  grid.push_cell(CellType::Wedge, &wedge);
  grid.push_cell(CellType::Pyramid, &pyramid);
  grid.push_raw(99, &[t0, t1, t2]);

  DataSet::new(Geometry::Unstructured(grid))
    .with_point_data(AttributeTable::new().with_scalars(DataArray::from_f64(SCALARS, scalars)))
}

// =============================================================================
// Mesh checks
// =============================================================================

/// Directed polygon edges and how often each occurs.
pub fn directed_edges(mesh: &PolyMesh) -> HashMap<(PointId, PointId), usize> {
  let mut edges = HashMap::new();
  for poly in mesh.polys.iter() {
    for i in 0..poly.len() {
      let edge = (poly[i], poly[(i + 1) % poly.len()]);
      *edges.entry(edge).or_insert(0) += 1;
    }
  }
  edges
}

/// Number of polygon edges not matched by exactly one opposite edge.
///
/// Zero for a closed, consistently wound surface.
pub fn open_edge_count(mesh: &PolyMesh) -> usize {
  let edges = directed_edges(mesh);
  edges
    .iter()
    .filter(|&(&(a, b), &count)| count != 1 || edges.get(&(b, a)) != Some(&1))
    .count()
}

/// Ids referenced by any primitive.
pub fn referenced_points(mesh: &PolyMesh) -> Vec<PointId> {
  let mut ids: Vec<PointId> = mesh
    .verts
    .connectivity()
    .iter()
    .chain(mesh.lines.connectivity())
    .chain(mesh.polys.connectivity())
    .copied()
    .collect();
  ids.sort_unstable();
  ids.dedup();
  ids
}
