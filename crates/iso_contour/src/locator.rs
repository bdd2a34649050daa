//! Point merging for contour output.
//!
//! Crossing points are generated independently by every cell that touches
//! an edge. The locator hands out one id per distinct position so that
//! neighbouring cells stitch together instead of producing coincident
//! duplicates.
//!
//! [`MergePoints`] buckets points on a uniform grid over the input bounds.
//! With the default zero tolerance a point merges only with a bit-identical
//! point; since edge crossings are computed in a canonical endpoint order
//! that is exactly the set of crossings of the same edge.

use glam::DVec3;
use smallvec::SmallVec;

use crate::constants::{divisions_for, DEGENERATE_EXTENT};
use crate::types::{Bounds, PointId};

/// Incremental point insertion with de-duplication.
pub trait PointLocator: Send {
  /// Reset and size the structure for a new call.
  fn init_point_insertion(&mut self, bounds: Bounds, estimated_points: usize);

  /// Return the id of a matching point, or insert `point` and return its
  /// new id. The flag is true when the point was inserted.
  fn insert_unique_point(&mut self, point: DVec3) -> (PointId, bool);

  /// Id of a matching point without inserting.
  fn find_point(&self, point: DVec3) -> Option<PointId>;

  /// Number of points inserted since the last reset.
  fn number_of_points(&self) -> usize;

  /// Move the inserted points out. Lookups stop matching them.
  fn take_points(&mut self) -> Vec<DVec3>;

  /// Release all state.
  fn initialize(&mut self);
}

type Bucket = SmallVec<[PointId; 4]>;

/// Uniform-grid spatial hash.
#[derive(Debug, Clone, Default)]
pub struct MergePoints {
  tolerance: f64,
  origin: DVec3,
  /// Buckets per unit length along each axis.
  scale: DVec3,
  divisions: [usize; 3],
  buckets: Vec<Bucket>,
  points: Vec<DVec3>,
}

impl MergePoints {
  /// Exact-match locator.
  pub fn new() -> Self {
    Self::default()
  }

  /// Locator merging points closer than `tolerance`.
  pub fn with_tolerance(tolerance: f64) -> Self {
    Self {
      tolerance: tolerance.max(0.0),
      ..Self::default()
    }
  }

  pub fn tolerance(&self) -> f64 {
    self.tolerance
  }

  /// Bucket divisions along x, y and z.
  pub fn divisions(&self) -> [usize; 3] {
    self.divisions
  }

  /// Point `id` of the current call.
  pub fn point(&self, id: PointId) -> DVec3 {
    self.points[id as usize]
  }

  fn ensure_grid(&mut self) {
    if self.buckets.is_empty() {
      self.divisions = [1, 1, 1];
      self.origin = DVec3::ZERO;
      self.scale = DVec3::ZERO;
      self.buckets.push(Bucket::new());
    }
  }

  #[inline]
  fn cell_coord(&self, point: DVec3, axis: usize) -> usize {
    let divisions = self.divisions[axis];
    if divisions <= 1 {
      return 0;
    }
    let t = (point[axis] - self.origin[axis]) * self.scale[axis];
    if t.is_nan() || t <= 0.0 {
      return 0;
    }
    (t as usize).min(divisions - 1)
  }

  #[inline]
  fn bucket_index(&self, ijk: [usize; 3]) -> usize {
    ijk[0] + self.divisions[0] * (ijk[1] + self.divisions[1] * ijk[2])
  }

  fn search(&self, point: DVec3) -> Option<PointId> {
    if self.buckets.is_empty() {
      return None;
    }

    if self.tolerance == 0.0 {
      let ijk = [0, 1, 2].map(|a| self.cell_coord(point, a));
      return self.buckets[self.bucket_index(ijk)]
        .iter()
        .copied()
        .find(|&id| self.points[id as usize] == point);
    }

    let lo = [0, 1, 2].map(|a| self.cell_coord(point - DVec3::splat(self.tolerance), a));
    let hi = [0, 1, 2].map(|a| self.cell_coord(point + DVec3::splat(self.tolerance), a));
    let tol_sq = self.tolerance * self.tolerance;

    for k in lo[2]..=hi[2] {
      for j in lo[1]..=hi[1] {
        for i in lo[0]..=hi[0] {
          let bucket = &self.buckets[self.bucket_index([i, j, k])];
          if let Some(&id) = bucket
            .iter()
            .find(|&&id| self.points[id as usize].distance_squared(point) <= tol_sq)
          {
            return Some(id);
          }
        }
      }
    }
    None
  }
}

impl PointLocator for MergePoints {
  fn init_point_insertion(&mut self, bounds: Bounds, estimated_points: usize) {
    self.points.clear();
    self.points.reserve(estimated_points);
    self.buckets.clear();

    if !bounds.is_valid() {
      self.ensure_grid();
      return;
    }

    let per_axis = divisions_for(estimated_points);
    let extent = bounds.extent();
    self.origin = bounds.min;
    for axis in 0..3 {
      if extent[axis] > DEGENERATE_EXTENT {
        self.divisions[axis] = per_axis;
        self.scale[axis] = per_axis as f64 / extent[axis];
      } else {
        self.divisions[axis] = 1;
        self.scale[axis] = 0.0;
      }
    }

    let count = self.divisions.iter().product();
    self.buckets.resize_with(count, Bucket::new);
    tracing::trace!(divisions = ?self.divisions, estimated_points, "locator grid sized");
  }

  fn insert_unique_point(&mut self, point: DVec3) -> (PointId, bool) {
    self.ensure_grid();
    if let Some(id) = self.search(point) {
      return (id, false);
    }

    let id = self.points.len() as PointId;
    self.points.push(point);
    let ijk = [0, 1, 2].map(|a| self.cell_coord(point, a));
    let index = self.bucket_index(ijk);
    self.buckets[index].push(id);
    (id, true)
  }

  fn find_point(&self, point: DVec3) -> Option<PointId> {
    self.search(point)
  }

  fn number_of_points(&self) -> usize {
    self.points.len()
  }

  fn take_points(&mut self) -> Vec<DVec3> {
    for bucket in &mut self.buckets {
      bucket.clear();
    }
    std::mem::take(&mut self.points)
  }

  fn initialize(&mut self) {
    self.points = Vec::new();
    self.buckets = Vec::new();
    self.divisions = [0; 3];
  }
}

#[cfg(test)]
#[path = "locator_test.rs"]
mod locator_test;
