use glam::DVec3;

use super::*;

fn unit_bounds() -> Bounds {
  Bounds::new(DVec3::ZERO, DVec3::ONE)
}

#[test]
fn test_exact_duplicates_merge() {
  let mut locator = MergePoints::new();
  locator.init_point_insertion(unit_bounds(), 100);

  let (a, new_a) = locator.insert_unique_point(DVec3::new(0.25, 0.5, 0.75));
  let (b, new_b) = locator.insert_unique_point(DVec3::new(0.5, 0.5, 0.5));
  let (c, new_c) = locator.insert_unique_point(DVec3::new(0.25, 0.5, 0.75));

  assert!(new_a && new_b);
  assert!(!new_c, "identical point must not be inserted twice");
  assert_eq!(a, c);
  assert_ne!(a, b);
  assert_eq!(locator.number_of_points(), 2);
}

#[test]
fn test_exact_mode_keeps_near_points_apart() {
  let mut locator = MergePoints::new();
  locator.init_point_insertion(unit_bounds(), 100);

  let (a, _) = locator.insert_unique_point(DVec3::splat(0.5));
  let (b, new_b) = locator.insert_unique_point(DVec3::splat(0.5 + 1e-12));

  assert!(new_b);
  assert_ne!(a, b);
}

#[test]
fn test_tolerance_merges_across_bucket_boundary() {
  let mut locator = MergePoints::with_tolerance(1e-3);
  locator.init_point_insertion(unit_bounds(), 3000);
  let divisions = locator.divisions();
  assert!(divisions[0] > 1, "grid should be subdivided, got {:?}", divisions);

  // A bucket boundary along x
  let boundary = 1.0 / divisions[0] as f64;
  let (a, _) = locator.insert_unique_point(DVec3::new(boundary - 1e-4, 0.5, 0.5));
  let (b, is_new) = locator.insert_unique_point(DVec3::new(boundary + 1e-4, 0.5, 0.5));

  assert!(!is_new);
  assert_eq!(a, b);
}

#[test]
fn test_tolerance_keeps_distant_points_apart() {
  let mut locator = MergePoints::with_tolerance(1e-3);
  locator.init_point_insertion(unit_bounds(), 100);

  locator.insert_unique_point(DVec3::splat(0.2));
  let (_, is_new) = locator.insert_unique_point(DVec3::splat(0.21));

  assert!(is_new);
}

#[test]
fn test_degenerate_bounds_use_single_bucket() {
  let mut locator = MergePoints::new();
  locator.init_point_insertion(Bounds::new(DVec3::ONE, DVec3::ONE), 10_000);

  assert_eq!(locator.divisions(), [1, 1, 1]);
  let (a, _) = locator.insert_unique_point(DVec3::ONE);
  let (b, _) = locator.insert_unique_point(DVec3::ONE);
  assert_eq!(a, b);
}

#[test]
fn test_flat_bounds_collapse_one_axis() {
  let mut locator = MergePoints::new();
  locator.init_point_insertion(Bounds::new(DVec3::ZERO, DVec3::new(1.0, 1.0, 0.0)), 3000);

  let [nx, ny, nz] = locator.divisions();
  assert!(nx > 1 && ny > 1);
  assert_eq!(nz, 1);
}

#[test]
fn test_points_outside_bounds_are_clamped() {
  let mut locator = MergePoints::new();
  locator.init_point_insertion(unit_bounds(), 3000);

  let (a, _) = locator.insert_unique_point(DVec3::splat(-5.0));
  let (b, _) = locator.insert_unique_point(DVec3::splat(5.0));
  assert_ne!(a, b);
  assert_eq!(locator.find_point(DVec3::splat(5.0)), Some(b));
}

#[test]
fn test_insert_without_init() {
  let mut locator = MergePoints::new();
  let (a, is_new) = locator.insert_unique_point(DVec3::X);

  assert!(is_new);
  assert_eq!(a, 0);
  assert_eq!(locator.find_point(DVec3::X), Some(0));
}

#[test]
fn test_find_point_does_not_insert() {
  let mut locator = MergePoints::new();
  locator.init_point_insertion(unit_bounds(), 10);

  assert_eq!(locator.find_point(DVec3::splat(0.5)), None);
  assert_eq!(locator.number_of_points(), 0);
}

#[test]
fn test_take_points_and_initialize() {
  let mut locator = MergePoints::new();
  locator.init_point_insertion(unit_bounds(), 10);
  locator.insert_unique_point(DVec3::ZERO);
  locator.insert_unique_point(DVec3::ONE);

  let points = locator.take_points();
  assert_eq!(points, vec![DVec3::ZERO, DVec3::ONE]);
  assert_eq!(locator.number_of_points(), 0);
  assert_eq!(locator.find_point(DVec3::ZERO), None);

  locator.initialize();
  assert_eq!(locator.divisions(), [0, 0, 0]);
  let (id, _) = locator.insert_unique_point(DVec3::ONE);
  assert_eq!(id, 0);
}

#[test]
fn test_reinit_starts_ids_at_zero() {
  let mut locator = MergePoints::new();
  locator.init_point_insertion(unit_bounds(), 10);
  locator.insert_unique_point(DVec3::ZERO);
  locator.insert_unique_point(DVec3::ONE);

  locator.init_point_insertion(unit_bounds(), 10);
  let (id, is_new) = locator.insert_unique_point(DVec3::ONE);
  assert_eq!((id, is_new), (0, true));
}
