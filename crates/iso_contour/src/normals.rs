//! Point normals for contour surfaces.
//!
//! Normals follow the winding of the output polygons, so on an isosurface
//! they point towards lower scalar values.

use glam::Vec3A;

use crate::dataset::{DataArray, ScalarKind};
use crate::types::{PolyMesh, NORMALS_ARRAY};

/// Normal given to points that touch no (non-degenerate) polygon.
const FALLBACK_NORMAL: Vec3A = Vec3A::Y;

/// Compute angle-weighted point normals from the mesh polygons.
///
/// Each polygon is fan-triangulated; every triangle adds its unit normal to
/// its corners, weighted by the corner angle. The result is stored as a
/// 3-component `f32` point array named [`NORMALS_ARRAY`], replacing any
/// previous one.
///
/// Reference: Thürmer, G. & Wüthrich, C.A. (1998). Computing Vertex Normals
/// from Polygonal Facets. Journal of Graphics Tools, 3(1), 43-46.
pub fn compute_point_normals(mesh: &mut PolyMesh) {
  let positions: Vec<Vec3A> = mesh.points.iter().map(|p| p.as_vec3().into()).collect();
  let mut normals = vec![Vec3A::ZERO; positions.len()];

  for poly in mesh.polys.iter() {
    for i in 1..poly.len().saturating_sub(1) {
      let tri = [poly[0] as usize, poly[i] as usize, poly[i + 1] as usize];
      accumulate_triangle(&positions, tri, &mut normals);
    }
  }

  let mut values = Vec::with_capacity(normals.len() * 3);
  for n in normals {
    let len_sq = n.length_squared();
    let unit = if len_sq < 1e-12 {
      FALLBACK_NORMAL
    } else {
      n * len_sq.sqrt().recip()
    };
    values.extend(unit.to_array().map(f64::from));
  }

  mesh
    .point_data
    .add_array(DataArray::from_values(NORMALS_ARRAY, ScalarKind::F32, 3, values));
}

fn accumulate_triangle(positions: &[Vec3A], [i0, i1, i2]: [usize; 3], normals: &mut [Vec3A]) {
  let p0 = positions[i0];
  let p1 = positions[i1];
  let p2 = positions[i2];

  let e01 = p1 - p0;
  let e02 = p2 - p0;
  let e12 = p2 - p1;

  let face_normal = e01.cross(e02);
  let face_len_sq = face_normal.length_squared();
  if face_len_sq < 1e-12 {
    return;
  }
  let unit = face_normal * face_len_sq.sqrt().recip();

  normals[i0] += unit * vertex_angle(e01, e02);
  normals[i1] += unit * vertex_angle(-e01, e12);
  normals[i2] += unit * vertex_angle(-e02, -e12);
}

/// Angle between two edge vectors leaving a vertex, in radians.
#[inline]
fn vertex_angle(e1: Vec3A, e2: Vec3A) -> f32 {
  let len1_sq = e1.length_squared();
  let len2_sq = e2.length_squared();
  if len1_sq < 1e-12 || len2_sq < 1e-12 {
    return 0.0;
  }

  let cos_angle = e1.dot(e2) / (len1_sq.sqrt() * len2_sq.sqrt());
  cos_angle.clamp(-1.0, 1.0).acos()
}

#[cfg(test)]
#[path = "normals_test.rs"]
mod normals_test;
