use super::*;

#[test]
fn test_estimated_size_has_floor() {
  assert_eq!(estimated_size(0, 0), ESTIMATE_GRANULARITY);
  assert_eq!(estimated_size(0, 5), ESTIMATE_GRANULARITY);
  assert_eq!(estimated_size(16, 2), ESTIMATE_GRANULARITY);
}

#[test]
fn test_estimated_size_rounds_up_to_granularity() {
  // floor(1e6^0.75) = 31622 -> next multiple of 1024
  assert_eq!(estimated_size(1_000_000, 1), 31 * 1024);

  // Scales linearly with the number of iso-values before rounding
  assert_eq!(estimated_size(1_000_000, 3), 93 * 1024);

  for cells in [10usize, 1000, 123_456, 9_999_999] {
    let size = estimated_size(cells, 2);
    assert_eq!(size % ESTIMATE_GRANULARITY, 0, "{} not rounded", size);
    assert!(size >= ESTIMATE_GRANULARITY);
  }
}

#[test]
fn test_divisions_for_small_counts() {
  assert_eq!(divisions_for(0), 1);
  assert_eq!(divisions_for(1), 1);
  assert_eq!(divisions_for(POINTS_PER_BUCKET), 1);
}

#[test]
fn test_divisions_for_grows_with_cube_root() {
  // 300 / 3 = 100 buckets -> cbrt ~4.64 -> 5 per axis
  assert_eq!(divisions_for(300), 5);
  assert!(divisions_for(30_000) > divisions_for(300));
}

#[test]
fn test_divisions_for_is_capped() {
  assert_eq!(divisions_for(usize::MAX / 2), MAX_DIVISIONS);
}
