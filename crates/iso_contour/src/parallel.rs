//! Sharded contouring on the rayon pool.
//!
//! Cells are split into contiguous ranges and each range is contoured with
//! its own locator and output. Crossings on edges shared by two shards are
//! not merged, so the pieces meet at duplicated points.

use std::ops::Range;
use std::sync::Arc;

use rayon::prelude::*;
use tracing::debug;
use web_time::Instant;

use crate::config::ContourConfig;
use crate::dataset::DataSet;
use crate::dispatch::{ContourFilter, ContourStrategy, TopologyClass};
use crate::driver::{self, ContourRequest, Session};
use crate::error::{ContourOutcome, ContourStats};
use crate::locator::MergePoints;
use crate::progress::NoProgress;
use crate::types::{CellId, PolyMesh};

/// Split `0..cells` into at most `shards` contiguous, non-empty ranges.
pub fn shard_ranges(cells: usize, shards: usize) -> Vec<Range<CellId>> {
  if cells == 0 {
    return Vec::new();
  }
  let size = cells.div_ceil(shards.max(1));
  (0..cells)
    .step_by(size)
    .map(|start| start..(start + size).min(cells))
    .collect()
}

/// Contour each shard of the request's cells in parallel.
///
/// Pieces are returned in cell order. Shards never use a scalar tree.
pub fn contour_sharded(request: &ContourRequest<'_>, shards: usize) -> Vec<ContourOutcome> {
  let config = ContourConfig {
    use_scalar_tree: false,
    ..request.config.clone()
  };
  let request = ContourRequest {
    config: &config,
    ..*request
  };

  shard_ranges(request.input.number_of_cells(), shards)
    .into_par_iter()
    .map(|cells| {
      let mut locator = MergePoints::with_tolerance(config.merge_tolerance);
      let mut session = Session {
        locator: &mut locator,
        scalar_tree: None,
        progress: &mut NoProgress,
      };
      driver::run(&request, cells, &mut session)
    })
    .collect()
}

/// Concatenate sharded pieces into one mesh.
///
/// The session's locator is not used; every shard has its own.
#[derive(Debug, Clone, Copy)]
pub struct ShardedStrategy {
  pub shards: usize,
}

impl Default for ShardedStrategy {
  fn default() -> Self {
    Self {
      shards: rayon::current_num_threads(),
    }
  }
}

impl ShardedStrategy {
  pub fn new(shards: usize) -> Self {
    Self { shards }
  }
}

impl ContourStrategy for ShardedStrategy {
  fn name(&self) -> &'static str {
    "sharded"
  }

  fn contour(&self, request: &ContourRequest<'_>, session: &mut Session<'_>) -> ContourOutcome {
    let start = Instant::now();
    let precision = request
      .config
      .output_precision
      .resolve(request.input.point_precision());

    let pieces = contour_sharded(request, self.shards);
    let mut mesh = PolyMesh::new(precision);
    let mut stats = ContourStats::default();
    for piece in &pieces {
      mesh.append(&piece.mesh);
      stats.merge(&piece.stats);
    }
    stats.elapsed_us = start.elapsed().as_micros() as u64;
    session.progress.report_progress(1.0);

    debug!(
      shards = pieces.len(),
      points = mesh.number_of_points(),
      elapsed_us = stats.elapsed_us,
      "sharded contour finished"
    );

    ContourOutcome {
      mesh,
      stats,
      ..Default::default()
    }
  }
}

/// Contour `input` with [`ShardedStrategy`] and no point merging across
/// shards.
pub fn contour_parallel(
  input: &DataSet,
  values: &[f64],
  config: &ContourConfig,
  shards: usize,
) -> ContourOutcome {
  let mut filter = ContourFilter::new(config.clone()).with_values(values);
  let strategy = Arc::new(ShardedStrategy::new(shards));
  for class in TopologyClass::ALL {
    filter.register_strategy(class, strategy.clone());
  }
  filter.contour(input)
}

#[cfg(test)]
#[path = "parallel_test.rs"]
mod parallel_test;
