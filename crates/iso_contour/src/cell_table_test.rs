use glam::DVec3;

use super::*;

fn all_shapes() -> [&'static ShapeTable; 5] {
  [
    shape_table(CellType::Tetra).unwrap(),
    shape_table(CellType::Hexahedron).unwrap(),
    shape_table(CellType::Voxel).unwrap(),
    shape_table(CellType::Wedge).unwrap(),
    shape_table(CellType::Pyramid).unwrap(),
  ]
}

/// Reference coordinates matching the documented point orders.
fn reference_points(cell_type: CellType) -> Vec<DVec3> {
  let p = DVec3::new;
  match cell_type {
    CellType::Tetra => vec![p(0., 0., 0.), p(1., 0., 0.), p(0., 1., 0.), p(0., 0., 1.)],
    CellType::Hexahedron => vec![
      p(0., 0., 0.),
      p(1., 0., 0.),
      p(1., 1., 0.),
      p(0., 1., 0.),
      p(0., 0., 1.),
      p(1., 0., 1.),
      p(1., 1., 1.),
      p(0., 1., 1.),
    ],
    CellType::Voxel => (0..8)
      .map(|i| p((i & 1) as f64, ((i >> 1) & 1) as f64, ((i >> 2) & 1) as f64))
      .collect(),
    CellType::Wedge => vec![
      p(0., 0., 0.),
      p(0., 1., 0.),
      p(1., 0., 0.),
      p(0., 0., 1.),
      p(0., 1., 1.),
      p(1., 0., 1.),
    ],
    CellType::Pyramid => vec![
      p(0., 0., 0.),
      p(1., 0., 0.),
      p(1., 1., 0.),
      p(0., 1., 0.),
      p(0.5, 0.5, 1.),
    ],
    _ => unreachable!(),
  }
}

#[test]
fn test_no_crossings_for_uniform_cases() {
  for shape in all_shapes() {
    let full = (1usize << shape.points) - 1;
    assert_eq!(shape.crossed_edges(0), 0, "{:?}", shape.cell_type);
    assert_eq!(shape.crossed_edges(full), 0, "{:?}", shape.cell_type);
    assert_eq!(shape.crossings.len(), 1 << shape.points);
  }
}

#[test]
fn test_single_corner_crosses_incident_edges() {
  for shape in all_shapes() {
    for corner in 0..shape.points {
      let mask = shape.crossed_edges(1 << corner);
      let incident = shape
        .edges
        .iter()
        .filter(|e| e[0] as usize == corner || e[1] as usize == corner)
        .count();
      assert_eq!(
        mask.count_ones() as usize,
        incident,
        "{:?} corner {}",
        shape.cell_type,
        corner
      );
    }
  }
}

#[test]
fn test_complement_cases_match() {
  for shape in all_shapes() {
    let full = (1usize << shape.points) - 1;
    for case in 0..=full {
      assert_eq!(shape.crossed_edges(case), shape.crossed_edges(full ^ case));
    }
  }
}

#[test]
fn test_every_face_edge_is_a_cell_edge() {
  for shape in all_shapes() {
    for face in shape.faces {
      for i in 0..face.len() {
        let a = face[i];
        let b = face[(i + 1) % face.len()];
        let known = shape
          .edges
          .iter()
          .any(|e| (e[0] == a && e[1] == b) || (e[0] == b && e[1] == a));
        assert!(known, "{:?} face edge {}-{} missing", shape.cell_type, a, b);
      }
    }
  }
}

#[test]
fn test_each_edge_bounds_two_faces_in_opposite_directions() {
  for shape in all_shapes() {
    for edge in shape.edges {
      let mut forward = 0;
      let mut backward = 0;
      for face in shape.faces {
        for i in 0..face.len() {
          let a = face[i];
          let b = face[(i + 1) % face.len()];
          if a == edge[0] && b == edge[1] {
            forward += 1;
          } else if a == edge[1] && b == edge[0] {
            backward += 1;
          }
        }
      }
      assert_eq!((forward, backward), (1, 1), "{:?} edge {:?}", shape.cell_type, edge);
    }
  }
}

#[test]
fn test_faces_wind_outward() {
  for shape in all_shapes() {
    let points = reference_points(shape.cell_type);
    let centroid = points.iter().copied().sum::<DVec3>() / points.len() as f64;

    for face in shape.faces {
      // Newell normal handles quads as well as triangles
      let mut normal = DVec3::ZERO;
      let mut face_center = DVec3::ZERO;
      for i in 0..face.len() {
        let a = points[face[i] as usize];
        let b = points[face[(i + 1) % face.len()] as usize];
        normal += a.cross(b);
        face_center += a;
      }
      face_center /= face.len() as f64;

      assert!(
        normal.dot(face_center - centroid) > 0.0,
        "{:?} face {:?} points inward",
        shape.cell_type,
        face
      );
    }
  }
}

#[test]
fn test_only_solid_shapes_have_tables() {
  assert!(shape_table(CellType::Triangle).is_none());
  assert!(shape_table(CellType::Polyhedron).is_none());
  assert!(shape_table(CellType::Line).is_none());
}
