//! Tuning constants shared by the contour driver and the point locator.
//!
//! None of these affect the geometry that is produced. They only control
//! pre-allocation, progress granularity and the shape of the locator's
//! bucket grid.

/// Allocation estimates are rounded to multiples of this value.
pub const ESTIMATE_GRANULARITY: usize = 1024;

/// Number of cells between progress reports / abort polls in the 3D pass.
pub const PROGRESS_INTERVAL: usize = 5000;

/// Expected number of points per locator bucket.
pub const POINTS_PER_BUCKET: usize = 3;

/// Upper bound on locator bucket divisions along one axis.
///
/// 100³ buckets is the largest grid the locator will allocate.
pub const MAX_DIVISIONS: usize = 100;

/// Extents below this are treated as flat when sizing the bucket grid.
pub const DEGENERATE_EXTENT: f64 = 1e-12;

/// Estimate the number of output points/primitives for a contour call.
///
/// `floor(num_cells^0.75) * num_values`, rounded up to a multiple of
/// [`ESTIMATE_GRANULARITY`] and never below it. Only used to pre-size
/// buffers; everything still grows past the estimate.
#[inline]
pub fn estimated_size(num_cells: usize, num_values: usize) -> usize {
  let base = (num_cells as f64).powf(0.75) as usize;
  let scaled = base.saturating_mul(num_values);
  let rounded = scaled.div_ceil(ESTIMATE_GRANULARITY) * ESTIMATE_GRANULARITY;
  rounded.max(ESTIMATE_GRANULARITY)
}

/// Bucket divisions per axis for an estimated point count.
///
/// `ceil(cbrt(estimate / POINTS_PER_BUCKET))`, clamped to
/// `1..=MAX_DIVISIONS`.
#[inline]
pub fn divisions_for(estimated_points: usize) -> usize {
  let buckets = (estimated_points / POINTS_PER_BUCKET).max(1) as f64;
  (buckets.cbrt().ceil() as usize).clamp(1, MAX_DIVISIONS)
}

#[cfg(test)]
#[path = "constants_test.rs"]
mod constants_test;
