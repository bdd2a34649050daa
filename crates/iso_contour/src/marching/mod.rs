//! Cell-by-cell contouring.
//!
//! [`CellMarcher`] turns one cell and one iso-value into output primitives:
//!
//! - 1D cells (lines, poly-lines) give a vertex per crossed segment
//! - 2D cells give a line per inside run on their boundary ring
//! - 3D cells chain the runs on their outward faces into loops and give a
//!   polygon per loop, fan-triangulated on request
//!
//! A point is inside when its scalar is `>= iso`. Every crossing goes
//! through [`EdgeInterpolator`], which merges it with the identical
//! crossing produced by any neighbouring cell.
//!
//! Loops of 3D cells are wound so that their right-hand normal points
//! towards lower scalar values.

pub mod edge;
pub mod faces;

use smallvec::SmallVec;

pub use edge::{crossing_parameter, crossing_position, EdgeInterpolator, Endpoint};
use faces::{edge_key, ring_segments, EdgeKey, LoopBuffer, RingEdge, RingSegment};

use crate::cell_table::{shape_table, PIXEL_RING, QUAD_RING, TRIANGLE_RING};
use crate::dataset::{AttributeTable, Cell, CellType, DataSet, ScalarField};
use crate::error::ContourStats;
use crate::types::{CellArray, CellId, PointId};

/// Scalars of the current cell's points, reused across cells.
///
/// Grows to the largest cell seen and never shrinks during a call.
#[derive(Debug, Default, Clone)]
pub struct CellScalars {
  values: Vec<f64>,
}

impl CellScalars {
  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      values: Vec::with_capacity(capacity),
    }
  }

  /// Load the scalars of `point_ids`.
  pub fn load(&mut self, field: &ScalarField<'_>, point_ids: &[PointId]) {
    self.values.clear();
    self
      .values
      .extend(point_ids.iter().map(|&id| field.value(id as usize)));
  }

  #[inline]
  pub fn get(&self, local: usize) -> f64 {
    self.values[local]
  }

  pub fn as_slice(&self) -> &[f64] {
    &self.values
  }

  pub fn capacity(&self) -> usize {
    self.values.capacity()
  }

  /// True when every value is on the same side of `iso`.
  fn uniform(&self, iso: f64) -> bool {
    let mut values = self.values.iter();
    match values.next() {
      Some(&first) => {
        let side = first >= iso;
        values.all(|&v| (v >= iso) == side)
      }
      None => true,
    }
  }
}

/// Primitive lists and attributes produced by a marcher.
pub struct MarchOutput {
  pub verts: CellArray,
  pub lines: CellArray,
  pub polys: CellArray,
  pub point_data: AttributeTable,
  pub cell_data: AttributeTable,
  pub stats: ContourStats,
}

type CrossingCache = SmallVec<[((PointId, PointId), PointId); 16]>;

/// Per-call contouring state.
pub struct CellMarcher<'a> {
  input: &'a DataSet,
  edges: EdgeInterpolator<'a>,
  verts: CellArray,
  lines: CellArray,
  polys: CellArray,
  generate_triangles: bool,
  scalars: CellScalars,
  crossing_cache: CrossingCache,
  segments: Vec<(EdgeKey, EdgeKey)>,
  loops: LoopBuffer,
  polygon: SmallVec<[PointId; 16]>,
  stats: ContourStats,
}

impl<'a> CellMarcher<'a> {
  pub fn new(
    input: &'a DataSet,
    edges: EdgeInterpolator<'a>,
    generate_triangles: bool,
    estimated_size: usize,
  ) -> Self {
    Self {
      input,
      edges,
      verts: CellArray::with_capacity(estimated_size, 1),
      lines: CellArray::with_capacity(estimated_size, 2),
      polys: CellArray::with_capacity(estimated_size, 3),
      generate_triangles,
      scalars: CellScalars::with_capacity(8),
      crossing_cache: CrossingCache::new(),
      segments: Vec::new(),
      loops: LoopBuffer::default(),
      polygon: SmallVec::new(),
      stats: ContourStats::default(),
    }
  }

  /// Load the scalars of `cell` for the following `contour_cell` calls.
  pub fn load_cell(&mut self, field: &ScalarField<'_>, cell: &Cell) {
    self.scalars.load(field, &cell.point_ids);
  }

  pub fn cell_scalars(&self) -> &CellScalars {
    &self.scalars
  }

  /// Contour the loaded cell at `iso`, appending its primitives.
  pub fn contour_cell(&mut self, cell: &Cell, cell_type: CellType, iso: f64, cell_id: CellId) {
    debug_assert_eq!(self.scalars.as_slice().len(), cell.len());
    self.stats.cells_visited += 1;
    self.crossing_cache.clear();

    if self.scalars.uniform(iso) {
      return;
    }

    match cell_type {
      CellType::Vertex | CellType::PolyVertex => {}
      CellType::Line | CellType::PolyLine => self.contour_polyline(cell, iso, cell_id),
      CellType::Triangle => self.contour_ring(cell, &TRIANGLE_RING, iso, cell_id),
      CellType::Quad => self.contour_ring(cell, &QUAD_RING, iso, cell_id),
      CellType::Pixel => self.contour_ring(cell, &PIXEL_RING, iso, cell_id),
      CellType::Polygon => {
        let ring: SmallVec<[usize; 16]> = (0..cell.len()).collect();
        self.contour_ring(cell, &ring, iso, cell_id);
      }
      CellType::TriangleStrip => {
        for i in 0..cell.len().saturating_sub(2) {
          // odd triangles are flipped to keep the strip's winding
          let ring = if i % 2 == 0 {
            [i, i + 1, i + 2]
          } else {
            [i + 1, i, i + 2]
          };
          self.contour_ring(cell, &ring, iso, cell_id);
        }
      }
      CellType::Polyhedron => self.contour_polyhedron(cell, iso, cell_id),
      CellType::Tetra
      | CellType::Voxel
      | CellType::Hexahedron
      | CellType::Wedge
      | CellType::Pyramid => {
        let Some(table) = shape_table(cell_type) else {
          return;
        };
        let case = self.case_index(table.points, iso);
        if table.crossed_edges(case) == 0 {
          return;
        }
        self.contour_faces(cell, table.faces, iso, cell_id);
      }
    }
  }

  fn case_index(&self, points: usize, iso: f64) -> usize {
    (0..points).fold(0, |case, l| case | (((self.scalars.get(l) >= iso) as usize) << l))
  }

  #[inline]
  fn inside(&self, local: usize, iso: f64) -> bool {
    self.scalars.get(local) >= iso
  }

  /// Output point on local edge `edge` of `cell`.
  fn crossing(&mut self, cell: &Cell, edge: RingEdge, iso: f64) -> PointId {
    let ga = cell.point_ids[edge.0];
    let gb = cell.point_ids[edge.1];
    let key = if ga <= gb { (ga, gb) } else { (gb, ga) };
    if let Some(&(_, id)) = self.crossing_cache.iter().find(|(k, _)| *k == key) {
      return id;
    }

    let a = Endpoint {
      id: ga,
      position: self.input.point(ga as usize),
      scalar: self.scalars.get(edge.0),
    };
    let b = Endpoint {
      id: gb,
      position: self.input.point(gb as usize),
      scalar: self.scalars.get(edge.1),
    };
    let id = self.edges.cross_edge(a, b, iso);
    self.crossing_cache.push((key, id));
    id
  }

  #[inline]
  fn row(&self) -> usize {
    self.verts.len() + self.lines.len() + self.polys.len()
  }

  fn emit_vert(&mut self, id: PointId, cell_id: CellId) {
    let row = self.row();
    self.verts.push(&[id]);
    self.edges.attributes_mut().copy_cell(row, cell_id);
    self.stats.primitives += 1;
  }

  fn emit_line(&mut self, a: PointId, b: PointId, cell_id: CellId) {
    let row = self.row();
    self.lines.push(&[a, b]);
    self.edges.attributes_mut().copy_cell(row, cell_id);
    self.stats.primitives += 1;
  }

  fn emit_poly(&mut self, ids: &[PointId], cell_id: CellId) {
    let row = self.row();
    self.polys.push(ids);
    self.edges.attributes_mut().copy_cell(row, cell_id);
    self.stats.primitives += 1;
  }

  /// One vertex per distinct crossing of the poly-line. A crossing that lands
  /// exactly on an interior vertex is reported once, while separate `Line`
  /// cells meeting there each report it with the same point id.
  fn contour_polyline(&mut self, cell: &Cell, iso: f64, cell_id: CellId) {
    let mut emitted: SmallVec<[PointId; 4]> = SmallVec::new();
    for i in 0..cell.len().saturating_sub(1) {
      if self.inside(i, iso) == self.inside(i + 1, iso) {
        continue;
      }
      let id = self.crossing(cell, (i, i + 1), iso);
      // a crossing on a shared vertex is reported once
      if !emitted.contains(&id) {
        emitted.push(id);
        self.emit_vert(id, cell_id);
      }
    }
  }

  fn contour_ring<T>(&mut self, cell: &Cell, ring: &[T], iso: f64, cell_id: CellId)
  where
    T: Copy + Into<usize>,
  {
    let mut segments: SmallVec<[RingSegment; 4]> = SmallVec::new();
    ring_segments(ring, |l| self.inside(l, iso), &mut segments);

    for (enter, leave) in segments {
      let a = self.crossing(cell, enter, iso);
      let b = self.crossing(cell, leave, iso);
      if a != b {
        self.emit_line(a, b, cell_id);
      }
    }
  }

  fn contour_polyhedron(&mut self, cell: &Cell, iso: f64, cell_id: CellId) {
    let mut local_faces: SmallVec<[SmallVec<[usize; 8]>; 8]> = SmallVec::new();
    for face in &cell.faces {
      let mut local = SmallVec::new();
      for id in face {
        match cell.point_ids.iter().position(|p| p == id) {
          Some(l) => local.push(l),
          None => {
            tracing::warn!(cell_id, point = id, "polyhedron face uses a point outside the cell");
            self.stats.cells_skipped += 1;
            return;
          }
        }
      }
      local_faces.push(local);
    }
    self.contour_faces(cell, &local_faces, iso, cell_id);
  }

  /// Chain the face segments of a 3D cell into polygons.
  fn contour_faces<F, T>(&mut self, cell: &Cell, faces: &[F], iso: f64, cell_id: CellId)
  where
    F: AsRef<[T]>,
    T: Copy + Into<usize>,
  {
    self.segments.clear();
    let mut face_segments: SmallVec<[RingSegment; 4]> = SmallVec::new();
    for face in faces {
      face_segments.clear();
      ring_segments(face.as_ref(), |l| self.inside(l, iso), &mut face_segments);
      self
        .segments
        .extend(face_segments.iter().map(|&(enter, leave)| (edge_key(enter), edge_key(leave))));
    }
    if self.segments.is_empty() {
      return;
    }

    let mut loops = std::mem::take(&mut self.loops);
    loops.chain(&self.segments);

    for index in 0..loops.len() {
      let mut polygon = std::mem::take(&mut self.polygon);
      polygon.clear();
      for &key in loops.get(index) {
        let id = self.crossing(cell, key, iso);
        if polygon.last() != Some(&id) {
          polygon.push(id);
        }
      }
      while polygon.len() > 1 && polygon.first() == polygon.last() {
        polygon.pop();
      }

      if polygon.len() >= 3 {
        if self.generate_triangles {
          for i in 1..polygon.len() - 1 {
            let tri = [polygon[0], polygon[i], polygon[i + 1]];
            if tri[0] != tri[1] && tri[1] != tri[2] && tri[0] != tri[2] {
              self.emit_poly(&tri, cell_id);
            }
          }
        } else {
          self.emit_poly(&polygon, cell_id);
        }
      }
      self.polygon = polygon;
    }

    self.loops = loops;
  }

  /// Edge interpolation counters folded into the marcher's statistics.
  pub fn stats(&self) -> ContourStats {
    let mut stats = self.stats;
    stats.crossings = self.edges.crossings();
    stats.points_merged = self.edges.merged();
    stats.interpolations = stats.crossings - stats.points_merged;
    stats
  }

  /// Record a cell skipped by the caller.
  pub fn skip_cell(&mut self) {
    self.stats.cells_skipped += 1;
  }

  pub fn primitive_count(&self) -> usize {
    self.row()
  }

  /// Hand over the primitive lists and attributes.
  pub fn finish(self) -> MarchOutput {
    let stats = self.stats();
    let (point_data, cell_data) = self.edges.into_attributes().finish();
    MarchOutput {
      verts: self.verts,
      lines: self.lines,
      polys: self.polys,
      point_data,
      cell_data,
      stats,
    }
  }
}
