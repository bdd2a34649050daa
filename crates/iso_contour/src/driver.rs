//! Generic contour driver.
//!
//! Walks the cells of any dataset and hands them to the [`CellMarcher`]:
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────────┐
//! │ run(request, cells, session)                                          │
//! │                                                                       │
//! │  locator.init_point_insertion(bounds, estimate)                       │
//! │           │                                                           │
//! │           ▼                                                           │
//! │  pass 1: lines      ┐                                                 │
//! │  pass 2: polygons   ├─ per cell: load scalars, contour every value    │
//! │  pass 3: volumes    ┘  (progress + abort every PROGRESS_INTERVAL)     │
//! │           │                                                           │
//! │           ▼  (or, with a scalar tree: per value, candidate cells)     │
//! │  PolyMesh { points, verts, lines, polys, point_data, cell_data }      │
//! └───────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Running the passes by dimension keeps all vertices before all lines
//! before all polygons, which is what cell-data rows are ordered by. The
//! scalar-tree path visits cells by iso-value instead and does not keep
//! that order.

use std::ops::Range;

use tracing::{debug, warn};
use web_time::Instant;

use crate::config::ContourConfig;
use crate::constants::{estimated_size, PROGRESS_INTERVAL};
use crate::dataset::cell::dimension_of_code;
use crate::dataset::{Cell, DataSet, ScalarField};
use crate::error::{ContourOutcome, ContourResult, ContourStatus};
use crate::interpolate::AttributeInterpolator;
use crate::locator::PointLocator;
use crate::marching::{CellMarcher, EdgeInterpolator, MarchOutput};
use crate::progress::ProgressObserver;
use crate::scalar_tree::{IntervalTree, ScalarTree};
use crate::types::{CellId, Points, PolyMesh};

/// Everything a strategy needs to contour one dataset.
#[derive(Clone, Copy)]
pub struct ContourRequest<'a> {
  pub input: &'a DataSet,
  pub scalars: ScalarField<'a>,
  pub values: &'a [f64],
  pub config: &'a ContourConfig,
}

impl<'a> ContourRequest<'a> {
  /// Resolve the scalar field selected by `config`.
  pub fn new(
    input: &'a DataSet,
    values: &'a [f64],
    config: &'a ContourConfig,
  ) -> ContourResult<Self> {
    let scalars = input.resolve_scalars(config.scalar_array.as_deref(), config.array_component)?;
    Ok(Self {
      input,
      scalars,
      values,
      config,
    })
  }
}

/// Mutable collaborators of one call.
pub struct Session<'s> {
  pub locator: &'s mut dyn PointLocator,
  /// Used when the config asks for a scalar tree. A temporary tree is
  /// built when none is given.
  pub scalar_tree: Option<&'s mut dyn ScalarTree>,
  pub progress: &'s mut dyn ProgressObserver,
}

/// Counts skipped cells, warning once per reason.
#[derive(Default)]
struct SkipLog {
  unknown: usize,
  short: usize,
}

impl SkipLog {
  fn unknown_type(&mut self, cell_id: CellId, code: u8) {
    if self.unknown == 0 {
      warn!(cell_id, code, "skipping cell with unknown type");
    }
    self.unknown += 1;
  }

  fn too_few_points(&mut self, cell_id: CellId, points: usize) {
    if self.short == 0 {
      warn!(cell_id, points, "skipping cell with too few points");
    }
    self.short += 1;
  }
}

/// Contour `cells` of the request's input at every iso-value.
///
/// Cells outside the input are ignored. An abort from the progress observer
/// ends the call with everything built so far.
#[tracing::instrument(skip_all, fields(cells = cells.len(), values = request.values.len()))]
pub fn run(
  request: &ContourRequest<'_>,
  cells: Range<CellId>,
  session: &mut Session<'_>,
) -> ContourOutcome {
  let start = Instant::now();
  let input = request.input;
  let config = request.config;
  let precision = config.output_precision.resolve(input.point_precision());

  let num_cells = input.number_of_cells();
  let cells = cells.start.min(num_cells)..cells.end.min(num_cells);
  if cells.is_empty() || input.number_of_points() == 0 || request.values.is_empty() {
    debug!("nothing to contour");
    return ContourOutcome {
      mesh: PolyMesh::new(precision),
      ..Default::default()
    };
  }

  let estimate = estimated_size(cells.len(), request.values.len());
  session.locator.init_point_insertion(input.bounds(), estimate);

  let skip = (!config.compute_scalars).then(|| request.scalars.name());
  let attributes = AttributeInterpolator::new(
    &input.point_data,
    &input.cell_data,
    input.number_of_points(),
    num_cells,
    skip,
    estimate,
  );
  let edges = EdgeInterpolator::new(&mut *session.locator, attributes, precision);
  let mut marcher = CellMarcher::new(input, edges, config.generate_triangles, estimate);
  let mut skipped = SkipLog::default();

  let aborted = if config.use_scalar_tree {
    let mut temporary = IntervalTree::new();
    let tree: &mut dyn ScalarTree = match session.scalar_tree.as_deref_mut() {
      Some(tree) => tree,
      None => &mut temporary,
    };
    march_tree(
      &mut marcher,
      request,
      &cells,
      tree,
      &mut *session.progress,
      &mut skipped,
    )
  } else {
    march_passes(&mut marcher, request, &cells, &mut *session.progress, &mut skipped)
  };

  let MarchOutput {
    verts,
    lines,
    polys,
    mut point_data,
    cell_data,
    mut stats,
  } = marcher.finish();

  let points = session.locator.take_points();
  session.locator.initialize();

  if config.compute_scalars {
    point_data.set_active_scalars(request.scalars.name());
  }

  let mut mesh = PolyMesh {
    points: Points::from_f64(points, precision),
    verts,
    lines,
    polys,
    point_data,
    cell_data,
  };
  mesh.squeeze();

  let status = if aborted {
    ContourStatus::Aborted
  } else {
    session.progress.report_progress(1.0);
    ContourStatus::Complete
  };
  stats.elapsed_us = start.elapsed().as_micros() as u64;

  debug!(
    points = mesh.number_of_points(),
    verts = mesh.verts.len(),
    lines = mesh.lines.len(),
    polys = mesh.polys.len(),
    merged = stats.points_merged,
    skipped = stats.cells_skipped,
    elapsed_us = stats.elapsed_us,
    aborted,
    "contour finished"
  );

  ContourOutcome { mesh, status, stats }
}

/// Contour one cell at each of `values`, or skip it when malformed.
fn contour_cell_values(
  marcher: &mut CellMarcher<'_>,
  request: &ContourRequest<'_>,
  values: &[f64],
  cell_id: CellId,
  cell: &mut Cell,
  skipped: &mut SkipLog,
) {
  request.input.get_cell(cell_id, cell);
  let Some(cell_type) = cell.cell_type() else {
    skipped.unknown_type(cell_id, cell.type_code);
    marcher.skip_cell();
    return;
  };
  if cell.len() < cell_type.min_points() {
    skipped.too_few_points(cell_id, cell.len());
    marcher.skip_cell();
    return;
  }

  marcher.load_cell(&request.scalars, cell);
  for &iso in values {
    marcher.contour_cell(cell, cell_type, iso, cell_id);
  }
}

/// Three passes, one per cell dimension. Returns true when aborted.
fn march_passes(
  marcher: &mut CellMarcher<'_>,
  request: &ContourRequest<'_>,
  cells: &Range<CellId>,
  progress: &mut dyn ProgressObserver,
  skipped: &mut SkipLog,
) -> bool {
  let input = request.input;
  let total = cells.len() as f64;
  let mut cell = Cell::default();

  for dimension in 1..=3u8 {
    for (visited, cell_id) in cells.clone().enumerate() {
      if dimension == 3 && visited % PROGRESS_INTERVAL == 0 {
        progress.report_progress(visited as f64 / total);
        if progress.should_abort() {
          debug!(visited, "contour aborted");
          return true;
        }
      }

      let code = input.cell_type_code(cell_id);
      match dimension_of_code(code) {
        Some(d) if d == dimension => {}
        Some(_) => continue,
        None => {
          // unknown codes are reported in the first pass only
          if dimension == 1 {
            skipped.unknown_type(cell_id, code);
            marcher.skip_cell();
          }
          continue;
        }
      }

      contour_cell_values(marcher, request, request.values, cell_id, &mut cell, skipped);
    }
  }
  false
}

/// Per iso-value, contour the tree's candidate cells. Returns true when
/// aborted.
fn march_tree(
  marcher: &mut CellMarcher<'_>,
  request: &ContourRequest<'_>,
  cells: &Range<CellId>,
  tree: &mut dyn ScalarTree,
  progress: &mut dyn ProgressObserver,
  skipped: &mut SkipLog,
) -> bool {
  if !tree.is_built() {
    tree.build(request.input, &request.scalars);
  }

  let total = request.values.len() as f64;
  let mut candidates = Vec::new();
  let mut cell = Cell::default();

  for (index, iso) in request.values.iter().enumerate() {
    progress.report_progress(index as f64 / total);
    if progress.should_abort() {
      debug!(index, "contour aborted");
      return true;
    }

    candidates.clear();
    tree.candidate_cells(*iso, &mut candidates);
    for &cell_id in candidates.iter().filter(|&&id| cells.contains(&id)) {
      if dimension_of_code(request.input.cell_type_code(cell_id)) == Some(0) {
        continue;
      }
      contour_cell_values(
        marcher,
        request,
        std::slice::from_ref(iso),
        cell_id,
        &mut cell,
        skipped,
      );
    }
  }
  false
}

#[cfg(test)]
#[path = "driver_test.rs"]
mod driver_test;
