//! Contour configuration.

use crate::types::Precision;

/// Precision policy for output point coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OutputPrecision {
  /// Same precision as the input points.
  #[default]
  MatchInput,
  Single,
  Double,
}

impl OutputPrecision {
  /// Concrete precision for an input stored at `input`.
  pub fn resolve(self, input: Precision) -> Precision {
    match self {
      OutputPrecision::MatchInput => input,
      OutputPrecision::Single => Precision::Single,
      OutputPrecision::Double => Precision::Double,
    }
  }
}

/// Options shared by every contour strategy.
#[derive(Clone, Debug, PartialEq)]
pub struct ContourConfig {
  /// Interpolate the contoured scalar array onto output points.
  pub compute_scalars: bool,

  /// Normals post-pass: `None` leaves the choice to the strategy (the
  /// generic path then skips it), `Some(true)` forces it.
  pub compute_normals: Option<bool>,

  /// Accepted and ignored.
  pub compute_gradients: bool,

  /// Fan-triangulate polygons produced by 3D cells.
  pub generate_triangles: bool,

  pub output_precision: OutputPrecision,

  /// Visit only candidate cells from a scalar tree.
  pub use_scalar_tree: bool,

  /// Point array to contour. Active scalars when `None`.
  pub scalar_array: Option<String>,

  /// Component of a multi-component scalar array.
  pub array_component: usize,

  /// Point merge distance for the default locator. Zero merges exact
  /// duplicates only.
  pub merge_tolerance: f64,
}

impl Default for ContourConfig {
  fn default() -> Self {
    Self {
      compute_scalars: true,
      compute_normals: None,
      compute_gradients: false,
      generate_triangles: true,
      output_precision: OutputPrecision::default(),
      use_scalar_tree: false,
      scalar_array: None,
      array_component: 0,
      merge_tolerance: 0.0,
    }
  }
}

impl ContourConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_compute_scalars(mut self, compute: bool) -> Self {
    self.compute_scalars = compute;
    self
  }

  pub fn with_compute_normals(mut self, compute: bool) -> Self {
    self.compute_normals = Some(compute);
    self
  }

  pub fn with_compute_gradients(mut self, compute: bool) -> Self {
    self.compute_gradients = compute;
    self
  }

  pub fn with_generate_triangles(mut self, generate: bool) -> Self {
    self.generate_triangles = generate;
    self
  }

  pub fn with_output_precision(mut self, precision: OutputPrecision) -> Self {
    self.output_precision = precision;
    self
  }

  pub fn with_scalar_tree(mut self, use_tree: bool) -> Self {
    self.use_scalar_tree = use_tree;
    self
  }

  pub fn with_scalar_array(mut self, name: impl Into<String>) -> Self {
    self.scalar_array = Some(name.into());
    self
  }

  pub fn with_array_component(mut self, component: usize) -> Self {
    self.array_component = component;
    self
  }

  pub fn with_merge_tolerance(mut self, tolerance: f64) -> Self {
    self.merge_tolerance = tolerance.max(0.0);
    self
  }

  /// Whether the normals post-pass should run.
  pub fn wants_normals(&self) -> bool {
    self.compute_normals == Some(true)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_defaults() {
    let config = ContourConfig::default();
    assert!(config.compute_scalars);
    assert!(config.generate_triangles);
    assert!(!config.use_scalar_tree);
    assert!(!config.wants_normals());
    assert_eq!(config.output_precision, OutputPrecision::MatchInput);
    assert_eq!(config.merge_tolerance, 0.0);
  }

  #[test]
  fn test_precision_resolution() {
    assert_eq!(OutputPrecision::MatchInput.resolve(Precision::Double), Precision::Double);
    assert_eq!(OutputPrecision::MatchInput.resolve(Precision::Single), Precision::Single);
    assert_eq!(OutputPrecision::Single.resolve(Precision::Double), Precision::Single);
    assert_eq!(OutputPrecision::Double.resolve(Precision::Single), Precision::Double);
  }

  #[test]
  fn test_negative_tolerance_clamps() {
    assert_eq!(ContourConfig::new().with_merge_tolerance(-1.0).merge_tolerance, 0.0);
  }
}
