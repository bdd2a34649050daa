//! Strategy selection and the contour filter.
//!
//! ```text
//! ContourFilter::contour(input)
//!   │  resolve scalars ── error ──▶ Rejected
//!   ▼
//! classify(input, scalars) ──▶ TopologyClass
//!   │
//!   ▼
//! strategies[class] (MarchingStrategy unless registered)
//!   │  Session { locator, scalar_tree, progress }
//!   ▼
//! ContourOutcome ──▶ normals (optional) ──▶ metrics
//! ```
//!
//! Every class routes to [`MarchingStrategy`] by default. Specialised
//! regular-grid strategies plug in through
//! [`ContourFilter::register_strategy`] and must produce output that
//! satisfies the same invariants.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};
use web_time::Instant;

use crate::config::ContourConfig;
use crate::dataset::{DataSet, Geometry, ScalarField, ScalarKind};
use crate::driver::{self, ContourRequest, Session};
use crate::error::{ContourOutcome, ContourStatus};
use crate::locator::{MergePoints, PointLocator};
use crate::metrics::ContourMetrics;
use crate::normals::compute_point_normals;
use crate::progress::{NoProgress, ProgressObserver};
use crate::scalar_tree::{IntervalTree, ScalarTree};
use crate::types::PolyMesh;
use crate::values::ContourValues;

/// Input shape used to pick a strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TopologyClass {
  /// Image data with two populated axes.
  Image2D,
  /// Image data with three populated axes.
  Image3D,
  Rectilinear3D,
  Structured3D,
  /// Everything else, including bit-typed scalars.
  Generic,
}

impl TopologyClass {
  pub const ALL: [TopologyClass; 5] = [
    TopologyClass::Image2D,
    TopologyClass::Image3D,
    TopologyClass::Rectilinear3D,
    TopologyClass::Structured3D,
    TopologyClass::Generic,
  ];
}

/// Classify `input` for strategy selection.
pub fn classify(input: &DataSet, scalars: &ScalarField<'_>) -> TopologyClass {
  if scalars.kind() == ScalarKind::Bit {
    return TopologyClass::Generic;
  }
  match &input.geometry {
    Geometry::Image(g) => match g.extent.data_dimension() {
      3 => TopologyClass::Image3D,
      2 => TopologyClass::Image2D,
      _ => TopologyClass::Generic,
    },
    Geometry::Rectilinear(g) if g.extent().data_dimension() == 3 => TopologyClass::Rectilinear3D,
    Geometry::Structured(g) if g.extent.data_dimension() == 3 => TopologyClass::Structured3D,
    _ => TopologyClass::Generic,
  }
}

/// One way of contouring a request.
pub trait ContourStrategy: Send + Sync {
  fn name(&self) -> &'static str;

  fn contour(&self, request: &ContourRequest<'_>, session: &mut Session<'_>) -> ContourOutcome;
}

/// Cell-by-cell marching over any topology.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarchingStrategy;

impl ContourStrategy for MarchingStrategy {
  fn name(&self) -> &'static str {
    "marching"
  }

  fn contour(&self, request: &ContourRequest<'_>, session: &mut Session<'_>) -> ContourOutcome {
    driver::run(request, 0..request.input.number_of_cells(), session)
  }
}

/// Scalar field a cached tree was built from.
#[derive(Clone, Debug, PartialEq, Eq)]
struct ScalarTreeKey {
  array: String,
  component: usize,
  points: usize,
  cells: usize,
}

impl ScalarTreeKey {
  fn of(input: &DataSet, scalars: &ScalarField<'_>) -> Self {
    Self {
      array: scalars.name().to_owned(),
      component: scalars.component(),
      points: input.number_of_points(),
      cells: input.number_of_cells(),
    }
  }
}

/// Contours datasets with a fixed configuration and value list.
///
/// The locator and scalar tree are kept between calls. The cached tree is
/// rebuilt when the contoured array, component or mesh size changes. Values
/// edited in place on a mesh of the same size are not detected; call
/// [`invalidate_scalar_tree`](Self::invalidate_scalar_tree) then.
pub struct ContourFilter {
  config: ContourConfig,
  values: ContourValues,
  locator: Option<Box<dyn PointLocator>>,
  scalar_tree: Option<Box<dyn ScalarTree>>,
  scalar_tree_key: Option<ScalarTreeKey>,
  strategies: HashMap<TopologyClass, Arc<dyn ContourStrategy>>,
  fallback: Arc<dyn ContourStrategy>,
  metrics: ContourMetrics,
}

impl Default for ContourFilter {
  fn default() -> Self {
    Self::new(ContourConfig::default())
  }
}

impl ContourFilter {
  pub fn new(config: ContourConfig) -> Self {
    Self {
      config,
      values: ContourValues::new(),
      locator: None,
      scalar_tree: None,
      scalar_tree_key: None,
      strategies: HashMap::new(),
      fallback: Arc::new(MarchingStrategy),
      metrics: ContourMetrics::new(),
    }
  }

  pub fn with_values(mut self, values: impl Into<ContourValues>) -> Self {
    self.values = values.into();
    self
  }

  pub fn config(&self) -> &ContourConfig {
    &self.config
  }

  pub fn config_mut(&mut self) -> &mut ContourConfig {
    &mut self.config
  }

  pub fn values(&self) -> &ContourValues {
    &self.values
  }

  pub fn values_mut(&mut self) -> &mut ContourValues {
    &mut self.values
  }

  /// Use `locator` for point merging.
  pub fn set_locator(&mut self, locator: Box<dyn PointLocator>) {
    self.locator = Some(locator);
  }

  /// Install a [`MergePoints`] with the configured tolerance.
  pub fn create_default_locator(&mut self) {
    self.locator = Some(Box::new(MergePoints::with_tolerance(self.config.merge_tolerance)));
  }

  /// Use `tree` when the config asks for a scalar tree. It is built on the
  /// next call.
  pub fn set_scalar_tree(&mut self, tree: Box<dyn ScalarTree>) {
    self.scalar_tree = Some(tree);
    self.scalar_tree_key = None;
  }

  /// Force the scalar tree to be rebuilt on the next call.
  pub fn invalidate_scalar_tree(&mut self) {
    if let Some(tree) = self.scalar_tree.as_deref_mut() {
      tree.initialize();
    }
    self.scalar_tree_key = None;
  }

  /// Route `class` to `strategy`.
  pub fn register_strategy(&mut self, class: TopologyClass, strategy: Arc<dyn ContourStrategy>) {
    self.strategies.insert(class, strategy);
  }

  /// Strategy that handles `class`.
  pub fn strategy_for(&self, class: TopologyClass) -> Arc<dyn ContourStrategy> {
    self
      .strategies
      .get(&class)
      .cloned()
      .unwrap_or_else(|| Arc::clone(&self.fallback))
  }

  pub fn metrics(&self) -> &ContourMetrics {
    &self.metrics
  }

  pub fn contour(&mut self, input: &DataSet) -> ContourOutcome {
    self.contour_with_progress(input, &mut NoProgress)
  }

  /// Contour `input` at every configured value.
  #[tracing::instrument(skip_all, fields(cells = input.number_of_cells(), values = self.values.len()))]
  pub fn contour_with_progress(
    &mut self,
    input: &DataSet,
    progress: &mut dyn ProgressObserver,
  ) -> ContourOutcome {
    if input.number_of_points() == 0 || input.number_of_cells() == 0 || self.values.is_empty() {
      debug!("nothing to contour");
      let precision = self.config.output_precision.resolve(input.point_precision());
      return ContourOutcome {
        mesh: PolyMesh::new(precision),
        ..Default::default()
      };
    }

    let request = match ContourRequest::new(input, self.values.values(), &self.config) {
      Ok(request) => request,
      Err(err) => {
        warn!(%err, "contour rejected");
        let outcome = ContourOutcome::rejected(err);
        self.metrics.record_outcome(&outcome);
        return outcome;
      }
    };
    if self.config.compute_gradients {
      debug!("gradient output is not produced by this filter");
    }

    let class = classify(input, &request.scalars);
    let strategy = self.strategy_for(class);
    debug!(?class, strategy = strategy.name(), "dispatching");

    let tolerance = self.config.merge_tolerance;
    let locator = self
      .locator
      .get_or_insert_with(|| Box::new(MergePoints::with_tolerance(tolerance)));
    let scalar_tree: Option<&mut dyn ScalarTree> = if self.config.use_scalar_tree {
      let tree = self
        .scalar_tree
        .get_or_insert_with(|| Box::new(IntervalTree::new()));
      let key = ScalarTreeKey::of(input, &request.scalars);
      if self.scalar_tree_key.as_ref() != Some(&key) {
        if tree.is_built() {
          debug!(array = %key.array, component = key.component, "scalar field changed, rebuilding tree");
        }
        tree.initialize();
        self.scalar_tree_key = Some(key);
      }
      Some(&mut **tree)
    } else {
      None
    };

    let mut session = Session {
      locator: &mut **locator,
      scalar_tree,
      progress,
    };
    let mut outcome = strategy.contour(&request, &mut session);

    if self.config.wants_normals() && outcome.status == ContourStatus::Complete {
      let start = Instant::now();
      compute_point_normals(&mut outcome.mesh);
      self
        .metrics
        .record_normals_timing(start.elapsed().as_micros() as u64);
    }

    self.metrics.record_outcome(&outcome);
    outcome
  }
}

/// Contour `input` once at `values` with a default-configured filter.
pub fn contour(input: &DataSet, values: &[f64], config: &ContourConfig) -> ContourOutcome {
  ContourFilter::new(config.clone())
    .with_values(values)
    .contour(input)
}

#[cfg(test)]
#[path = "dispatch_test.rs"]
mod dispatch_test;
