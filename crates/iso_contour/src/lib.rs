//! iso_contour - Isosurface, isoline and isopoint extraction
//!
//! This crate extracts contours of a point scalar field at one or more
//! iso-values from image, rectilinear, structured and unstructured meshes.
//! Every cell is classified by which corners satisfy `scalar >= iso`, and
//! crossings are placed on cell edges by linear interpolation.
//!
//! # Features
//!
//! - **Any cell type**: vertices, lines, polygons, 3D cells and polyhedra
//!   contour to points, lines and polygons respectively
//! - **Exact point merging**: crossings on shared edges are computed once
//!   and shared by every cell that touches the edge
//! - **Attribute interpolation**: point data follows the crossings and cell
//!   data is copied to the primitives it produces
//! - **Scalar tree**: optional interval index that skips cells whose range
//!   misses the iso-value
//! - **Parallel and background contouring** on the rayon pool
//!
//! # Example
//!
//! ```ignore
//! use iso_contour::{ContourConfig, ContourFilter};
//!
//! let mut filter = ContourFilter::new(ContourConfig::default().with_compute_normals(true))
//!   .with_values(vec![0.5]);
//! let outcome = filter.contour(&dataset);
//!
//! println!("{} points, {} triangles",
//!     outcome.mesh.number_of_points(), outcome.mesh.polys.len());
//! ```

pub mod cell_table;
pub mod constants;
pub mod types;

// Re-export commonly used items
pub use constants::{estimated_size, PROGRESS_INTERVAL};
pub use types::{Bounds, CellArray, CellId, PointId, Points, PolyMesh, Precision, NORMALS_ARRAY};

// Input meshes and their attributes
pub mod dataset;
pub use dataset::{
  AttributeTable, Cell, CellType, DataArray, DataSet, Geometry, GridExtent, ImageData,
  RectilinearGrid, ScalarField, ScalarKind, StructuredGrid, UnstructuredGrid,
};

pub mod config;
pub use config::{ContourConfig, OutputPrecision};

pub mod error;
pub use error::{ContourError, ContourOutcome, ContourResult, ContourStats, ContourStatus};

pub mod values;
pub use values::ContourValues;

pub mod progress;
pub use progress::{AbortFlag, NoProgress, ProgressCallback, ProgressObserver};

// Point merging
pub mod locator;
pub use locator::{MergePoints, PointLocator};

pub mod interpolate;
pub mod marching;

pub mod scalar_tree;
pub use scalar_tree::{IntervalTree, ScalarTree};

// Three-pass driver over a cell range
pub mod driver;
pub use driver::{ContourRequest, Session};

// Strategy selection and the public filter
pub mod dispatch;
pub use dispatch::{
  classify, contour, ContourFilter, ContourStrategy, MarchingStrategy, TopologyClass,
};

pub mod normals;
pub use normals::compute_point_normals;

pub mod parallel;
pub use parallel::{contour_parallel, contour_sharded, ShardedStrategy};

pub mod background;
pub use background::{BackgroundContour, ContourJob};

// Engine-agnostic metrics (feature-gated)
pub mod metrics;
pub use metrics::ContourMetrics;

// Fixtures shared by tests and benchmarks
pub mod test_utils;
