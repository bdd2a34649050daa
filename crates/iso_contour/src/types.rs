//! Core data types for contour output.

use glam::{DVec3, Vec3};

use crate::dataset::attributes::{AttributeTable, DataArray};

/// Index of a point in a point array.
pub type PointId = u32;

/// Index of a cell in an input data set.
pub type CellId = usize;

/// Name of the point array written by the normals pass.
pub const NORMALS_ARRAY: &str = "Normals";

/// Floating point precision of a point array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Precision {
  Single,
  Double,
}

/// Axis-aligned bounding box in double precision.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
  pub min: DVec3,
  pub max: DVec3,
}

impl Bounds {
  /// Create bounds with inverted extents (ready for encapsulation).
  pub fn empty() -> Self {
    Self {
      min: DVec3::splat(f64::INFINITY),
      max: DVec3::splat(f64::NEG_INFINITY),
    }
  }

  /// Create bounds from min/max corners.
  pub fn new(min: DVec3, max: DVec3) -> Self {
    Self { min, max }
  }

  /// Smallest bounds containing every point of the iterator.
  pub fn from_points(points: impl IntoIterator<Item = DVec3>) -> Self {
    let mut bounds = Self::empty();
    for p in points {
      bounds.encapsulate(p);
    }
    bounds
  }

  /// Expand bounds to include a point.
  #[inline]
  pub fn encapsulate(&mut self, point: DVec3) {
    self.min = self.min.min(point);
    self.max = self.max.max(point);
  }

  /// Check if bounds are valid (min <= max on all axes).
  pub fn is_valid(&self) -> bool {
    self.min.cmple(self.max).all()
  }

  /// Size along each axis (zero for invalid bounds).
  pub fn extent(&self) -> DVec3 {
    if self.is_valid() {
      self.max - self.min
    } else {
      DVec3::ZERO
    }
  }

  /// Length of the box diagonal.
  pub fn diagonal_length(&self) -> f64 {
    self.extent().length()
  }
}

impl Default for Bounds {
  fn default() -> Self {
    Self::empty()
  }
}

/// Point coordinates stored at the precision selected for the output.
#[derive(Clone, Debug, PartialEq)]
pub enum Points {
  Single(Vec<Vec3>),
  Double(Vec<DVec3>),
}

impl Points {
  /// Empty point array of the given precision.
  pub fn new(precision: Precision) -> Self {
    match precision {
      Precision::Single => Points::Single(Vec::new()),
      Precision::Double => Points::Double(Vec::new()),
    }
  }

  /// Convert double precision coordinates to the requested precision.
  pub fn from_f64(points: Vec<DVec3>, precision: Precision) -> Self {
    match precision {
      Precision::Single => Points::Single(points.iter().map(|p| p.as_vec3()).collect()),
      Precision::Double => Points::Double(points),
    }
  }

  pub fn precision(&self) -> Precision {
    match self {
      Points::Single(_) => Precision::Single,
      Points::Double(_) => Precision::Double,
    }
  }

  pub fn len(&self) -> usize {
    match self {
      Points::Single(p) => p.len(),
      Points::Double(p) => p.len(),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Point `id` widened to double precision.
  #[inline]
  pub fn get(&self, id: usize) -> DVec3 {
    match self {
      Points::Single(p) => p[id].as_dvec3(),
      Points::Double(p) => p[id],
    }
  }

  /// Iterate over all points in double precision.
  pub fn iter(&self) -> impl Iterator<Item = DVec3> + '_ {
    (0..self.len()).map(move |i| self.get(i))
  }

  /// Append all points of `other`, converting to this array's precision.
  pub fn extend_from(&mut self, other: &Points) {
    match self {
      Points::Single(p) => p.extend(other.iter().map(|q| q.as_vec3())),
      Points::Double(p) => p.extend(other.iter()),
    }
  }
}

/// Variable-length primitive list (offsets + flat connectivity).
#[derive(Clone, Debug, PartialEq)]
pub struct CellArray {
  offsets: Vec<usize>,
  connectivity: Vec<PointId>,
}

impl Default for CellArray {
  fn default() -> Self {
    Self::new()
  }
}

impl CellArray {
  pub fn new() -> Self {
    Self {
      offsets: vec![0],
      connectivity: Vec::new(),
    }
  }

  /// Pre-size for `cells` primitives of roughly `ids_per_cell` points.
  pub fn with_capacity(cells: usize, ids_per_cell: usize) -> Self {
    let mut offsets = Vec::with_capacity(cells + 1);
    offsets.push(0);
    Self {
      offsets,
      connectivity: Vec::with_capacity(cells * ids_per_cell),
    }
  }

  /// Append one primitive.
  #[inline]
  pub fn push(&mut self, ids: &[PointId]) {
    self.connectivity.extend_from_slice(ids);
    self.offsets.push(self.connectivity.len());
  }

  /// Number of primitives.
  pub fn len(&self) -> usize {
    self.offsets.len() - 1
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Point ids of primitive `index`.
  #[inline]
  pub fn get(&self, index: usize) -> &[PointId] {
    &self.connectivity[self.offsets[index]..self.offsets[index + 1]]
  }

  pub fn iter(&self) -> impl Iterator<Item = &[PointId]> + '_ {
    self.offsets.windows(2).map(|w| &self.connectivity[w[0]..w[1]])
  }

  /// Flat list of all point ids.
  pub fn connectivity(&self) -> &[PointId] {
    &self.connectivity
  }

  /// Append all primitives of `other`, shifting ids by `id_offset`.
  pub fn extend_shifted(&mut self, other: &CellArray, id_offset: PointId) {
    for cell in other.iter() {
      self.connectivity.extend(cell.iter().map(|&id| id + id_offset));
      self.offsets.push(self.connectivity.len());
    }
  }

  /// Release spare capacity.
  pub fn shrink_to_fit(&mut self) {
    self.offsets.shrink_to_fit();
    self.connectivity.shrink_to_fit();
  }
}

/// Contour result: points, primitives split by kind, and attributes.
///
/// Cell-data rows follow primitive insertion order. The generic driver
/// emits all vertices, then all lines, then all polygons, so row `r`
/// belongs to `verts` when `r < verts.len()`, to `lines` when
/// `r < verts.len() + lines.len()`, and to `polys` otherwise.
#[derive(Clone, Debug, PartialEq)]
pub struct PolyMesh {
  pub points: Points,
  pub verts: CellArray,
  pub lines: CellArray,
  pub polys: CellArray,
  pub point_data: AttributeTable,
  pub cell_data: AttributeTable,
}

impl Default for PolyMesh {
  fn default() -> Self {
    Self::new(Precision::Single)
  }
}

impl PolyMesh {
  pub fn new(precision: Precision) -> Self {
    Self {
      points: Points::new(precision),
      verts: CellArray::new(),
      lines: CellArray::new(),
      polys: CellArray::new(),
      point_data: AttributeTable::new(),
      cell_data: AttributeTable::new(),
    }
  }

  pub fn number_of_points(&self) -> usize {
    self.points.len()
  }

  /// Total primitive count across verts, lines and polys.
  pub fn number_of_cells(&self) -> usize {
    self.verts.len() + self.lines.len() + self.polys.len()
  }

  /// Returns true if no geometry was generated.
  pub fn is_empty(&self) -> bool {
    self.points.is_empty() && self.number_of_cells() == 0
  }

  /// Number of polygons with exactly three points.
  pub fn triangle_count(&self) -> usize {
    self.polys.iter().filter(|p| p.len() == 3).count()
  }

  /// Point normals, when the normals pass ran.
  pub fn normals(&self) -> Option<&DataArray> {
    self.point_data.array(NORMALS_ARRAY)
  }

  /// Append another piece. Points are concatenated without merging.
  ///
  /// Attribute arrays are matched by name; arrays missing from either side
  /// are dropped so the row invariants keep holding.
  pub fn append(&mut self, other: &PolyMesh) {
    if other.is_empty() {
      return;
    }
    if self.is_empty() {
      let precision = self.points.precision();
      *self = other.clone();
      if precision != other.points.precision() {
        self.points = Points::from_f64(other.points.iter().collect(), precision);
      }
      return;
    }

    let offset = self.points.len() as PointId;
    self.points.extend_from(&other.points);

    // Keep cell-data rows aligned with verts, lines, polys ordering
    let self_rows = self.split_cell_rows();
    let other_rows = other.split_cell_rows();
    let mut cell_data = self.cell_data.shared_schema(&other.cell_data);
    for (own, theirs) in self_rows.into_iter().zip(other_rows) {
      cell_data.extend_rows(&self.cell_data, own);
      cell_data.extend_rows(&other.cell_data, theirs);
    }
    self.cell_data = cell_data;

    let mut point_data = self.point_data.shared_schema(&other.point_data);
    point_data.extend_rows(&self.point_data, 0..self.point_data.tuple_count());
    point_data.extend_rows(&other.point_data, 0..other.point_data.tuple_count());
    self.point_data = point_data;

    self.verts.extend_shifted(&other.verts, offset);
    self.lines.extend_shifted(&other.lines, offset);
    self.polys.extend_shifted(&other.polys, offset);
  }

  /// Row ranges of the cell data belonging to verts, lines and polys.
  fn split_cell_rows(&self) -> [std::ops::Range<usize>; 3] {
    let v = self.verts.len();
    let l = v + self.lines.len();
    let p = l + self.polys.len();
    [0..v, v..l, l..p]
  }

  /// Check the structural invariants of the mesh.
  ///
  /// Returns a description of the first violation found.
  pub fn validate(&self) -> Result<(), String> {
    let n = self.points.len();
    for (kind, cells) in [("verts", &self.verts), ("lines", &self.lines), ("polys", &self.polys)] {
      if let Some(&bad) = cells.connectivity().iter().find(|&&id| id as usize >= n) {
        return Err(format!("{} references point {} of {}", kind, bad, n));
      }
    }
    for array in self.point_data.arrays() {
      if array.tuple_count() != n {
        return Err(format!(
          "point array '{}' has {} tuples for {} points",
          array.name(),
          array.tuple_count(),
          n
        ));
      }
    }
    let cells = self.number_of_cells();
    for array in self.cell_data.arrays() {
      if array.tuple_count() != cells {
        return Err(format!(
          "cell array '{}' has {} tuples for {} cells",
          array.name(),
          array.tuple_count(),
          cells
        ));
      }
    }
    Ok(())
  }

  /// Release spare capacity after incremental construction.
  pub fn squeeze(&mut self) {
    match &mut self.points {
      Points::Single(p) => p.shrink_to_fit(),
      Points::Double(p) => p.shrink_to_fit(),
    }
    self.verts.shrink_to_fit();
    self.lines.shrink_to_fit();
    self.polys.shrink_to_fit();
    self.point_data.shrink_to_fit();
    self.cell_data.shrink_to_fit();
  }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
