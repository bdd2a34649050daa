//! Input meshes.
//!
//! A [`DataSet`] pairs a geometry (one of four topology kinds) with point and
//! cell attribute tables. It is never mutated by the contour code.

pub mod attributes;
pub mod cell;
pub mod grid;
pub mod unstructured;

use glam::DVec3;

pub use attributes::{AttributeTable, DataArray, ScalarKind};
pub use cell::{Cell, CellType};
pub use grid::{GridExtent, ImageData, RectilinearGrid, StructuredGrid};
pub use unstructured::UnstructuredGrid;

use crate::error::{ContourError, ContourResult};
use crate::types::{Bounds, Precision};

/// One component of a point array, read as the contoured scalar.
#[derive(Clone, Copy, Debug)]
pub struct ScalarField<'a> {
  array: &'a DataArray,
  component: usize,
}

impl<'a> ScalarField<'a> {
  /// Panics if `component` is out of range.
  pub fn new(array: &'a DataArray, component: usize) -> Self {
    assert!(component < array.components(), "component out of range");
    Self { array, component }
  }

  #[inline]
  pub fn value(&self, point: usize) -> f64 {
    self.array.component(point, self.component)
  }

  pub fn array(&self) -> &'a DataArray {
    self.array
  }

  pub fn name(&self) -> &'a str {
    self.array.name()
  }

  pub fn kind(&self) -> ScalarKind {
    self.array.kind()
  }

  pub fn component(&self) -> usize {
    self.component
  }

  pub fn len(&self) -> usize {
    self.array.tuple_count()
  }

  pub fn is_empty(&self) -> bool {
    self.array.is_empty()
  }

  /// Value range of the selected component.
  pub fn range(&self) -> Option<(f64, f64)> {
    self.array.range(self.component)
  }
}

/// Concrete topology of an input mesh.
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
  Image(ImageData),
  Rectilinear(RectilinearGrid),
  Structured(StructuredGrid),
  Unstructured(UnstructuredGrid),
}

/// Immutable contour input.
#[derive(Clone, Debug, PartialEq)]
pub struct DataSet {
  pub geometry: Geometry,
  pub point_data: AttributeTable,
  pub cell_data: AttributeTable,
}

impl DataSet {
  pub fn new(geometry: Geometry) -> Self {
    Self {
      geometry,
      point_data: AttributeTable::new(),
      cell_data: AttributeTable::new(),
    }
  }

  pub fn with_point_data(mut self, point_data: AttributeTable) -> Self {
    self.point_data = point_data;
    self
  }

  pub fn with_cell_data(mut self, cell_data: AttributeTable) -> Self {
    self.cell_data = cell_data;
    self
  }

  pub fn number_of_points(&self) -> usize {
    match &self.geometry {
      Geometry::Image(g) => g.extent.number_of_points(),
      Geometry::Rectilinear(g) => g.extent().number_of_points(),
      Geometry::Structured(g) => g.extent.number_of_points(),
      Geometry::Unstructured(g) => g.number_of_points(),
    }
  }

  pub fn number_of_cells(&self) -> usize {
    match &self.geometry {
      Geometry::Image(g) => g.extent.number_of_cells(),
      Geometry::Rectilinear(g) => g.extent().number_of_cells(),
      Geometry::Structured(g) => g.extent.number_of_cells(),
      Geometry::Unstructured(g) => g.number_of_cells(),
    }
  }

  /// Coordinates of point `id`.
  #[inline]
  pub fn point(&self, id: usize) -> DVec3 {
    match &self.geometry {
      Geometry::Image(g) => g.point(id),
      Geometry::Rectilinear(g) => g.point(id),
      Geometry::Structured(g) => g.points.get(id),
      Geometry::Unstructured(g) => g.points.get(id),
    }
  }

  /// Raw type code of cell `cell_id`.
  #[inline]
  pub fn cell_type_code(&self, cell_id: usize) -> u8 {
    match &self.geometry {
      Geometry::Image(g) => g.extent.cell_type(false).code(),
      Geometry::Rectilinear(g) => g.extent().cell_type(false).code(),
      Geometry::Structured(g) => g.extent.cell_type(true).code(),
      Geometry::Unstructured(g) => g.cell_type_code(cell_id),
    }
  }

  /// Extract cell `cell_id` into a reusable buffer.
  pub fn get_cell(&self, cell_id: usize, cell: &mut Cell) {
    match &self.geometry {
      Geometry::Image(g) => g.extent.fill_cell(cell_id, false, cell),
      Geometry::Rectilinear(g) => g.extent().fill_cell(cell_id, false, cell),
      Geometry::Structured(g) => g.extent.fill_cell(cell_id, true, cell),
      Geometry::Unstructured(g) => g.fill_cell(cell_id, cell),
    }
  }

  pub fn bounds(&self) -> Bounds {
    match &self.geometry {
      Geometry::Image(g) => g.bounds(),
      Geometry::Rectilinear(g) => g.bounds(),
      Geometry::Structured(g) => g.bounds(),
      Geometry::Unstructured(g) => g.bounds(),
    }
  }

  /// Select the scalar field to contour.
  ///
  /// `name` picks a point array by name; otherwise the active scalars are
  /// used.
  pub fn resolve_scalars(
    &self,
    name: Option<&str>,
    component: usize,
  ) -> ContourResult<ScalarField<'_>> {
    let array = match name {
      Some(name) => self.point_data.array(name),
      None => self.point_data.scalars(),
    }
    .ok_or_else(|| ContourError::MissingScalars(name.map(str::to_owned)))?;

    if component >= array.components() {
      return Err(ContourError::ComponentOutOfRange {
        array: array.name().to_owned(),
        component,
        components: array.components(),
      });
    }
    if array.tuple_count() != self.number_of_points() {
      return Err(ContourError::ScalarLengthMismatch {
        array: array.name().to_owned(),
        tuples: array.tuple_count(),
        points: self.number_of_points(),
      });
    }

    Ok(ScalarField::new(array, component))
  }

  /// Precision of the stored point coordinates. Implicit grids are double.
  pub fn point_precision(&self) -> Precision {
    match &self.geometry {
      Geometry::Image(_) | Geometry::Rectilinear(_) => Precision::Double,
      Geometry::Structured(g) => g.precision(),
      Geometry::Unstructured(g) => g.precision(),
    }
  }
}
