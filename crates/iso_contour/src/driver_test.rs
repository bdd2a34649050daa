use glam::DVec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::*;
use crate::config::OutputPrecision;
use crate::dataset::{AttributeTable, DataArray, Geometry, ImageData, ScalarKind, UnstructuredGrid};
use crate::error::ContourError;
use crate::locator::MergePoints;
use crate::progress::{AbortFlag, NoProgress, ProgressCallback};
use crate::test_utils::{self, open_edge_count, SCALARS};
use crate::types::Precision;

const SPHERE_N: usize = 10;
const SPHERE_RADIUS: f64 = 3.3;

fn contour_with(
  input: &DataSet,
  values: &[f64],
  config: &ContourConfig,
  progress: &mut dyn ProgressObserver,
) -> ContourOutcome {
  let request = ContourRequest::new(input, values, config).unwrap();
  let mut locator = MergePoints::new();
  let mut session = Session {
    locator: &mut locator,
    scalar_tree: None,
    progress,
  };
  run(&request, 0..input.number_of_cells(), &mut session)
}

fn contour(input: &DataSet, values: &[f64]) -> ContourOutcome {
  contour_with(input, values, &ContourConfig::default(), &mut NoProgress)
}

fn has_point(mesh: &PolyMesh, expected: DVec3) -> bool {
  mesh.points.iter().any(|p| p.distance(expected) < 1e-12)
}

fn assert_closed_sphere(outcome: &ContourOutcome) {
  let mesh = &outcome.mesh;
  assert!(outcome.status.is_complete());
  assert!(mesh.validate().is_ok(), "{:?}", mesh.validate());
  assert!(!mesh.polys.is_empty());
  assert_eq!(mesh.triangle_count(), mesh.polys.len());
  assert_eq!(open_edge_count(mesh), 0, "surface has open or misoriented edges");

  let center = DVec3::splat((SPHERE_N - 1) as f64 * 0.5);
  for p in mesh.points.iter() {
    assert!((p.distance(center) - SPHERE_RADIUS).abs() < 0.5, "stray point {p}");
  }
}

// =============================================================================
// Closed surfaces
// =============================================================================

#[test]
fn test_sphere_on_image_is_watertight() {
  let input = test_utils::sphere_image(SPHERE_N);
  assert_closed_sphere(&contour(&input, &[SPHERE_RADIUS]));
}

#[test]
fn test_sphere_on_structured_grid_is_watertight() {
  let input = test_utils::sphere_structured(SPHERE_N);
  assert_closed_sphere(&contour(&input, &[SPHERE_RADIUS]));
}

#[test]
fn test_sphere_on_tetrahedra_is_watertight() {
  let input = test_utils::sphere_tetrahedra(SPHERE_N);
  assert_closed_sphere(&contour(&input, &[SPHERE_RADIUS]));
}

#[test]
fn test_sphere_on_wedges_is_watertight() {
  let input = test_utils::sphere_wedges(SPHERE_N);
  assert_closed_sphere(&contour(&input, &[SPHERE_RADIUS]));
}

#[test]
fn test_sphere_on_polyhedra_is_watertight() {
  let input = test_utils::sphere_polyhedra(SPHERE_N);
  assert_closed_sphere(&contour(&input, &[SPHERE_RADIUS]));
}

/// Random 0/1 field with a zero shell, so every surface closes inside the mesh.
fn binary_field(input: &DataSet, n: usize, rng: &mut StdRng) -> Vec<f64> {
  let far = (n - 1) as f64;
  (0..input.number_of_points())
    .map(|i| {
      let p = input.point(i);
      let on_shell = [p.x, p.y, p.z].iter().any(|&c| c == 0.0 || c == far);
      if !on_shell && rng.random_bool(0.5) { 1.0 } else { 0.0 }
    })
    .collect()
}

#[test]
fn test_binary_fields_are_watertight() {
  let n = 7;
  let meshes = [
    ("image", test_utils::sphere_image(n)),
    ("structured", test_utils::sphere_structured(n)),
    ("wedges", test_utils::sphere_wedges(n)),
    ("polyhedra", test_utils::sphere_polyhedra(n)),
  ];

  for seed in 0..8 {
    let mut rng = StdRng::seed_from_u64(seed);
    for (name, mesh) in &meshes {
      let values = binary_field(mesh, n, &mut rng);
      let input = test_utils::with_scalars(mesh.clone(), values);

      for generate_triangles in [true, false] {
        let config = ContourConfig::default().with_generate_triangles(generate_triangles);
        let outcome = contour_with(&input, &[0.5], &config, &mut NoProgress);
        let out = &outcome.mesh;

        assert!(outcome.status.is_complete());
        assert!(out.validate().is_ok(), "{name} seed {seed}: {:?}", out.validate());
        assert!(!out.polys.is_empty(), "{name} seed {seed}");
        assert_eq!(
          open_edge_count(out),
          0,
          "{name} seed {seed} triangles {generate_triangles}"
        );
        if generate_triangles {
          assert_eq!(out.triangle_count(), out.polys.len());
        }
      }
    }
  }
}

#[test]
fn test_image_isolines_close() {
  let image = ImageData::new([8, 8, 1], DVec3::ZERO, DVec3::ONE);
  let input = DataSet::new(Geometry::Image(image));
  let center = DVec3::new(3.5, 3.5, 0.0);
  let distance = (0..input.number_of_points())
    .map(|i| input.point(i).distance(center))
    .collect();
  let input = test_utils::with_scalars(input, distance);

  let mesh = contour(&input, &[2.2]).mesh;
  assert!(mesh.polys.is_empty());
  assert!(mesh.lines.len() >= 8);

  // Every point starts exactly one segment and ends exactly one
  let mut starts = vec![0; mesh.number_of_points()];
  let mut ends = vec![0; mesh.number_of_points()];
  for line in mesh.lines.iter() {
    assert_eq!(line.len(), 2);
    starts[line[0] as usize] += 1;
    ends[line[1] as usize] += 1;
  }
  assert!(starts.iter().all(|&c| c == 1), "{starts:?}");
  assert!(ends.iter().all(|&c| c == 1), "{ends:?}");

  for p in mesh.points.iter() {
    assert!((p.distance(center) - 2.2).abs() < 0.2, "stray point {p}");
  }
}

#[test]
fn test_sphere_winding_faces_lower_scalars() {
  // Scalars grow away from the centre, so lower values are inside
  let input = test_utils::sphere_image(SPHERE_N);
  let mesh = contour(&input, &[SPHERE_RADIUS]).mesh;
  let center = DVec3::splat((SPHERE_N - 1) as f64 * 0.5);

  for tri in mesh.polys.iter() {
    let [a, b, c] = [0, 1, 2].map(|i| mesh.points.get(tri[i] as usize));
    let normal = (b - a).cross(c - a);
    let centroid = (a + b + c) / 3.0;
    assert!(normal.dot(centroid - center) < 0.0);
  }
}

#[test]
fn test_shared_edge_crossings_share_ids() {
  let input = test_utils::tetra_pair([0.0, 1.0, 0.0, 0.0, 0.0]);
  let outcome = contour(&input, &[0.5]);
  let mesh = &outcome.mesh;

  assert_eq!(mesh.polys.len(), 2);
  assert_eq!(mesh.number_of_points(), 4);
  assert_eq!(outcome.stats.points_merged, 2);

  let edges = test_utils::directed_edges(mesh);
  let shared: Vec<_> = edges
    .keys()
    .filter(|&&(a, b)| edges.contains_key(&(b, a)))
    .collect();
  assert_eq!(shared.len(), 2, "one interior edge, seen from both triangles");
}

// =============================================================================
// Interpolation
// =============================================================================

#[test]
fn test_each_point_interpolated_once() {
  let input = test_utils::sphere_tetrahedra(6);
  let outcome = contour(&input, &[1.7]);
  let mesh = &outcome.mesh;

  assert_eq!(outcome.stats.interpolations, mesh.number_of_points());
  assert_eq!(
    outcome.stats.crossings,
    outcome.stats.interpolations + outcome.stats.points_merged
  );
  let scalars = mesh.point_data.array(SCALARS).unwrap();
  assert_eq!(scalars.tuple_count(), mesh.number_of_points());
  for &value in scalars.values() {
    assert!((value - 1.7).abs() < 1e-9);
  }
}

#[test]
fn test_output_is_deterministic() {
  let input = test_utils::sphere_tetrahedra(6);
  let first = contour(&input, &[1.2, 2.1]).mesh;
  let second = contour(&input, &[1.2, 2.1]).mesh;
  assert_eq!(first, second);
}

#[test]
fn test_compute_scalars_off_drops_contoured_array() {
  let mut input = test_utils::sphere_image(6);
  let pressure: Vec<f64> = (0..input.number_of_points()).map(|i| i as f64).collect();
  input.point_data.add_array(DataArray::from_f64("pressure", pressure));

  let config = ContourConfig::default().with_compute_scalars(false);
  let mesh = contour_with(&input, &[2.0], &config, &mut NoProgress).mesh;

  assert!(mesh.point_data.array(SCALARS).is_none());
  let pressure = mesh.point_data.array("pressure").unwrap();
  assert_eq!(pressure.tuple_count(), mesh.number_of_points());
  assert!(mesh.point_data.scalars().is_none());
}

#[test]
fn test_contoured_array_becomes_active_scalars() {
  let mut input = test_utils::single_tetra([0.0; 4]);
  input
    .point_data
    .add_array(DataArray::from_f64("height", vec![1.0, 0.0, 0.0, 0.0]));

  let config = ContourConfig::default().with_scalar_array("height");
  let mesh = contour_with(&input, &[0.5], &config, &mut NoProgress).mesh;

  assert_eq!(mesh.polys.len(), 1);
  assert_eq!(mesh.point_data.scalars().map(DataArray::name), Some("height"));
}

#[test]
fn test_array_component_selects_column() {
  let points = Points::Double(vec![DVec3::ZERO, DVec3::X]);
  let mut grid = UnstructuredGrid::new(points);
  grid.push_cell(crate::dataset::CellType::Line, &[0, 1]);
  let field = DataArray::from_values("field", ScalarKind::F64, 2, vec![0.0, 5.0, 0.0, 1.0]);
  let input = DataSet::new(Geometry::Unstructured(grid))
    .with_point_data(AttributeTable::new().with_scalars(field));

  let first = contour(&input, &[0.5]).mesh;
  assert_eq!(first.verts.len(), 0);

  let config = ContourConfig::default().with_array_component(1);
  let second = contour_with(&input, &[3.0], &config, &mut NoProgress).mesh;
  assert_eq!(second.verts.len(), 1);
  assert!(has_point(&second, DVec3::new(0.5, 0.0, 0.0)));
}

// =============================================================================
// Small cases
// =============================================================================

#[test]
fn test_single_tetra() {
  let input = test_utils::single_tetra([1.0, 0.0, 0.0, 0.0]);
  let mesh = contour(&input, &[0.5]).mesh;

  assert_eq!(mesh.number_of_points(), 3);
  assert_eq!(mesh.polys.len(), 1);
  assert!(has_point(&mesh, DVec3::new(0.5, 0.0, 0.0)));
  assert!(has_point(&mesh, DVec3::new(0.0, 0.5, 0.0)));
  assert!(has_point(&mesh, DVec3::new(0.0, 0.0, 0.5)));
}

#[test]
fn test_straddling_quad() {
  let input = test_utils::single_quad([0.0, 0.0, 1.0, 1.0]);
  let mesh = contour(&input, &[0.5]).mesh;

  assert_eq!(mesh.lines.len(), 1);
  assert_eq!(mesh.number_of_points(), 2);
  assert!(has_point(&mesh, DVec3::new(1.0, 0.5, 0.0)));
  assert!(has_point(&mesh, DVec3::new(0.0, 0.5, 0.0)));
}

#[test]
fn test_iso_value_on_vertex() {
  let input = test_utils::single_triangle([0.0, 0.5, 1.0]);
  let mesh = contour(&input, &[0.5]).mesh;

  assert_eq!(mesh.lines.len(), 1);
  assert_eq!(mesh.number_of_points(), 2);
  assert!(has_point(&mesh, DVec3::new(1.0, 0.0, 0.0)));
  assert!(has_point(&mesh, DVec3::new(0.0, 0.5, 0.0)));
}

#[test]
fn test_field_entirely_on_one_side() {
  let input = test_utils::sphere_image(6);
  for iso in [-1.0, 100.0] {
    let outcome = contour(&input, &[iso]);
    assert!(outcome.status.is_complete());
    assert!(outcome.mesh.is_empty());
    assert_eq!(outcome.stats.crossings, 0);
  }
}

#[test]
fn test_empty_input() {
  let input = DataSet::new(Geometry::Unstructured(UnstructuredGrid::new(Points::Double(
    Vec::new(),
  ))))
  .with_point_data(AttributeTable::new().with_scalars(DataArray::from_f64(SCALARS, Vec::new())));
  let outcome = contour(&input, &[0.5]);
  assert!(outcome.status.is_complete());
  assert!(outcome.mesh.is_empty());

  let input = test_utils::single_tetra([1.0, 0.0, 0.0, 0.0]);
  let outcome = contour(&input, &[]);
  assert!(outcome.status.is_complete());
  assert!(outcome.mesh.is_empty());
}

#[test]
fn test_request_rejects_bad_scalars() {
  let input = test_utils::single_tetra([1.0, 0.0, 0.0, 0.0]);
  let config = ContourConfig::default().with_array_component(1);
  let err = ContourRequest::new(&input, &[0.5], &config).err();
  assert!(matches!(err, Some(ContourError::ComponentOutOfRange { .. })));

  let config = ContourConfig::default().with_scalar_array("missing");
  let err = ContourRequest::new(&input, &[0.5], &config).err();
  assert_eq!(err, Some(ContourError::MissingScalars(Some("missing".into()))));
}

// =============================================================================
// Mixed cells and ordering
// =============================================================================

#[test]
fn test_mixed_cells_rows_follow_dimension() {
  let mut input = test_utils::mixed_cells();
  let ids: Vec<f64> = (0..input.number_of_cells()).map(|i| i as f64).collect();
  input.cell_data.add_array(DataArray::from_f64("cell_id", ids));

  let outcome = contour(&input, &[0.5]);
  let mesh = &outcome.mesh;
  assert!(mesh.validate().is_ok());
  assert_eq!(mesh.verts.len(), 1);
  assert_eq!(mesh.lines.len(), 2);
  assert!(mesh.polys.len() >= 4);
  assert_eq!(outcome.stats.cells_skipped, 1, "unknown type code");

  let rows = mesh.cell_data.array("cell_id").unwrap().values();
  assert_eq!(rows[0], 1.0, "line cell gives the only vertex");
  assert_eq!(&rows[1..3], &[2.0, 3.0]);
  assert!(rows.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_duplicate_values_are_contoured_twice() {
  let input = test_utils::sphere_image(6);
  let once = contour(&input, &[2.0]).mesh;
  let twice = contour(&input, &[2.0, 2.0]).mesh;

  assert_eq!(twice.polys.len(), 2 * once.polys.len());
  assert_eq!(twice.number_of_points(), once.number_of_points());
}

#[test]
fn test_cell_range_limits_output() {
  let input = test_utils::tetra_pair([0.0, 1.0, 0.0, 0.0, 0.0]);
  let config = ContourConfig::default();
  let request = ContourRequest::new(&input, &[0.5], &config).unwrap();
  let mut locator = MergePoints::new();
  let mut session = Session {
    locator: &mut locator,
    scalar_tree: None,
    progress: &mut NoProgress,
  };

  let outcome = run(&request, 1..10, &mut session);
  assert_eq!(outcome.mesh.polys.len(), 1);
  assert_eq!(outcome.mesh.number_of_points(), 3);
}

// =============================================================================
// Precision
// =============================================================================

#[test]
fn test_output_precision() {
  let input = test_utils::sphere_image(6);

  let mesh = contour(&input, &[2.0]).mesh;
  assert_eq!(mesh.points.precision(), Precision::Double);

  let config = ContourConfig::default().with_output_precision(OutputPrecision::Single);
  let single = contour_with(&input, &[2.0], &config, &mut NoProgress).mesh;
  assert_eq!(single.points.precision(), Precision::Single);
  assert_eq!(single.number_of_points(), mesh.number_of_points());
  assert_eq!(open_edge_count(&single), 0);
}

// =============================================================================
// Scalar tree
// =============================================================================

#[test]
fn test_scalar_tree_matches_cell_walk() {
  let input = test_utils::sphere_tetrahedra(8);
  let values = [1.5, 2.5];
  let plain = contour(&input, &values).mesh;

  let config = ContourConfig::default().with_scalar_tree(true);
  let request = ContourRequest::new(&input, &values, &config).unwrap();
  let mut locator = MergePoints::new();
  let mut tree = IntervalTree::new();
  let mut session = Session {
    locator: &mut locator,
    scalar_tree: Some(&mut tree),
    progress: &mut NoProgress,
  };
  let outcome = run(&request, 0..input.number_of_cells(), &mut session);
  drop(session);

  assert!(tree.is_built());
  let mesh = outcome.mesh;
  assert_eq!(mesh.number_of_points(), plain.number_of_points());
  assert_eq!(mesh.polys.len(), plain.polys.len());
  assert_eq!(open_edge_count(&mesh), 0);
}

#[test]
fn test_scalar_tree_without_cached_tree() {
  let input = test_utils::sphere_image(SPHERE_N);
  let config = ContourConfig::default().with_scalar_tree(true);
  assert_closed_sphere(&contour_with(&input, &[SPHERE_RADIUS], &config, &mut NoProgress));
}

// =============================================================================
// Progress and abort
// =============================================================================

#[test]
fn test_progress_is_monotonic_and_completes() {
  let input = test_utils::sphere_image(SPHERE_N);
  let mut seen = Vec::new();
  {
    let mut progress = ProgressCallback::new(|f| seen.push(f));
    contour_with(&input, &[SPHERE_RADIUS], &ContourConfig::default(), &mut progress);
  }

  assert_eq!(seen.first(), Some(&0.0));
  assert_eq!(seen.last(), Some(&1.0));
  assert!(seen.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_abort_returns_partial_output() {
  let flag = AbortFlag::new();
  flag.abort();

  let input = test_utils::mixed_cells();
  let mut observer = flag.clone();
  let outcome = contour_with(&input, &[0.5], &ContourConfig::default(), &mut observer);

  assert!(outcome.status.is_aborted());
  assert!(outcome.mesh.validate().is_ok());
  assert_eq!(outcome.mesh.verts.len(), 1);
  assert_eq!(outcome.mesh.lines.len(), 2);
  assert!(outcome.mesh.polys.is_empty());
}
