//! Edge crossings.

use glam::DVec3;

use crate::interpolate::AttributeInterpolator;
use crate::locator::PointLocator;
use crate::types::{PointId, Precision};

/// One end of a mesh edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Endpoint {
  /// Global input point id.
  pub id: PointId,
  pub position: DVec3,
  pub scalar: f64,
}

/// Interpolation parameter of `iso` between `s0` and `s1`.
///
/// Zero when the scalars are equal, clamped to `[0, 1]` otherwise.
#[inline]
pub fn crossing_parameter(s0: f64, s1: f64, iso: f64) -> f64 {
  let delta = s1 - s0;
  if delta == 0.0 {
    return 0.0;
  }
  let t = (iso - s0) / delta;
  if t.is_nan() {
    return 0.0;
  }
  t.clamp(0.0, 1.0)
}

/// Crossing position at parameter `t`, exact at both ends.
#[inline]
pub fn crossing_position(p0: DVec3, p1: DVec3, t: f64, precision: Precision) -> DVec3 {
  let p = p0 * (1.0 - t) + p1 * t;
  match precision {
    Precision::Single => p.as_vec3().as_dvec3(),
    Precision::Double => p,
  }
}

/// Turns edge crossings into merged output points.
///
/// Endpoints are always taken lower id first, so every cell sharing an
/// edge produces the same bits for its crossing and the locator can merge
/// on exact equality.
pub struct EdgeInterpolator<'a> {
  locator: &'a mut dyn PointLocator,
  attributes: AttributeInterpolator<'a>,
  precision: Precision,
  crossings: usize,
  merged: usize,
}

impl<'a> EdgeInterpolator<'a> {
  pub fn new(
    locator: &'a mut dyn PointLocator,
    attributes: AttributeInterpolator<'a>,
    precision: Precision,
  ) -> Self {
    Self {
      locator,
      attributes,
      precision,
      crossings: 0,
      merged: 0,
    }
  }

  /// Output point where the contour at `iso` crosses edge `a`-`b`.
  ///
  /// Point attributes are interpolated only when the point is new.
  pub fn cross_edge(&mut self, a: Endpoint, b: Endpoint, iso: f64) -> PointId {
    let (a, b) = if a.id <= b.id { (a, b) } else { (b, a) };
    let t = crossing_parameter(a.scalar, b.scalar, iso);
    let position = crossing_position(a.position, b.position, t, self.precision);

    self.crossings += 1;
    let (id, is_new) = self.locator.insert_unique_point(position);
    if is_new {
      self
        .attributes
        .interpolate_point(id, a.id as usize, b.id as usize, t);
    } else {
      self.merged += 1;
    }
    id
  }

  pub fn attributes_mut(&mut self) -> &mut AttributeInterpolator<'a> {
    &mut self.attributes
  }

  pub fn precision(&self) -> Precision {
    self.precision
  }

  /// Crossings computed so far.
  pub fn crossings(&self) -> usize {
    self.crossings
  }

  /// Crossings that resolved to an existing point.
  pub fn merged(&self) -> usize {
    self.merged
  }

  pub fn into_attributes(self) -> AttributeInterpolator<'a> {
    self.attributes
  }
}
