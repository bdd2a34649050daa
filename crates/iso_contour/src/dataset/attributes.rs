//! Named attribute arrays attached to points or cells.
//!
//! Values are held widened to `f64`; the original storage type is kept as a
//! [`ScalarKind`] tag and honoured whenever new values are written (integer
//! kinds round and saturate, bits snap to 0/1, `F32` rounds through `f32`).

use std::ops::Range;

/// Storage type of an attribute array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScalarKind {
  /// Packed bits (0 or 1).
  Bit,
  I8,
  U8,
  I16,
  U16,
  I32,
  U32,
  I64,
  U64,
  F32,
  F64,
}

impl ScalarKind {
  /// True for every non floating point kind.
  pub fn is_integral(self) -> bool {
    !matches!(self, ScalarKind::F32 | ScalarKind::F64)
  }

  /// Map an arbitrary value onto the set representable by this kind.
  #[inline]
  pub fn coerce(self, value: f64) -> f64 {
    match self {
      ScalarKind::Bit => {
        if value >= 0.5 {
          1.0
        } else {
          0.0
        }
      }
      ScalarKind::I8 => value.round().clamp(i8::MIN as f64, i8::MAX as f64),
      ScalarKind::U8 => value.round().clamp(0.0, u8::MAX as f64),
      ScalarKind::I16 => value.round().clamp(i16::MIN as f64, i16::MAX as f64),
      ScalarKind::U16 => value.round().clamp(0.0, u16::MAX as f64),
      ScalarKind::I32 => value.round().clamp(i32::MIN as f64, i32::MAX as f64),
      ScalarKind::U32 => value.round().clamp(0.0, u32::MAX as f64),
      ScalarKind::I64 => value.round().clamp(i64::MIN as f64, i64::MAX as f64),
      ScalarKind::U64 => value.round().clamp(0.0, u64::MAX as f64),
      ScalarKind::F32 => value as f32 as f64,
      ScalarKind::F64 => value,
    }
  }
}

/// A named array of fixed-size tuples.
#[derive(Clone, Debug, PartialEq)]
pub struct DataArray {
  name: String,
  kind: ScalarKind,
  components: usize,
  values: Vec<f64>,
}

impl DataArray {
  /// Empty array with the given schema.
  pub fn new(name: impl Into<String>, kind: ScalarKind, components: usize) -> Self {
    assert!(components > 0, "attribute arrays need at least one component");
    Self {
      name: name.into(),
      kind,
      components,
      values: Vec::new(),
    }
  }

  /// Array from flat tuple values. Values are coerced to `kind`.
  pub fn from_values(
    name: impl Into<String>,
    kind: ScalarKind,
    components: usize,
    values: Vec<f64>,
  ) -> Self {
    let mut array = Self::new(name, kind, components);
    assert_eq!(
      values.len() % components,
      0,
      "value count {} is not a multiple of {} components",
      values.len(),
      components
    );
    array.values = values.into_iter().map(|v| kind.coerce(v)).collect();
    array
  }

  /// Single-component double array.
  pub fn from_f64(name: impl Into<String>, values: Vec<f64>) -> Self {
    Self::from_values(name, ScalarKind::F64, 1, values)
  }

  /// Single-component float array.
  pub fn from_f32(name: impl Into<String>, values: &[f32]) -> Self {
    Self::from_values(name, ScalarKind::F32, 1, values.iter().map(|&v| v as f64).collect())
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn kind(&self) -> ScalarKind {
    self.kind
  }

  pub fn components(&self) -> usize {
    self.components
  }

  pub fn tuple_count(&self) -> usize {
    self.values.len() / self.components
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  /// All values, tuple-major.
  pub fn values(&self) -> &[f64] {
    &self.values
  }

  /// Tuple `index`.
  #[inline]
  pub fn tuple(&self, index: usize) -> &[f64] {
    let start = index * self.components;
    &self.values[start..start + self.components]
  }

  /// Component `component` of tuple `index`.
  #[inline]
  pub fn component(&self, index: usize, component: usize) -> f64 {
    self.values[index * self.components + component]
  }

  /// Same schema, no values, room for `tuples` tuples.
  pub fn empty_like(&self, tuples: usize) -> Self {
    Self {
      name: self.name.clone(),
      kind: self.kind,
      components: self.components,
      values: Vec::with_capacity(tuples * self.components),
    }
  }

  /// Append one tuple.
  pub fn push_tuple(&mut self, tuple: &[f64]) {
    assert_eq!(
      tuple.len(),
      self.components,
      "tuple width mismatch for array '{}'",
      self.name
    );
    let kind = self.kind;
    self.values.extend(tuple.iter().map(|&v| kind.coerce(v)));
  }

  /// Append `lerp(source[i0], source[i1], t)`.
  ///
  /// `t = 0` and `t = 1` reproduce the endpoints exactly. Bits take the
  /// nearer endpoint instead of rounding the blend.
  #[inline]
  pub fn push_interpolated(&mut self, source: &DataArray, i0: usize, i1: usize, t: f64) {
    debug_assert_eq!(source.components, self.components);
    let kind = self.kind;
    let a = source.tuple(i0);
    let b = source.tuple(i1);
    if kind == ScalarKind::Bit {
      let nearest = if t < 0.5 { a } else { b };
      self.values.extend_from_slice(nearest);
      return;
    }
    self
      .values
      .extend(a.iter().zip(b).map(|(&va, &vb)| kind.coerce(va * (1.0 - t) + vb * t)));
  }

  /// Append tuple `index` of `source`.
  #[inline]
  pub fn push_copied(&mut self, source: &DataArray, index: usize) {
    debug_assert_eq!(source.components, self.components);
    self.values.extend_from_slice(source.tuple(index));
  }

  /// Minimum and maximum of one component, `None` when empty.
  pub fn range(&self, component: usize) -> Option<(f64, f64)> {
    if self.is_empty() || component >= self.components {
      return None;
    }
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for tuple in self.values.chunks_exact(self.components) {
      lo = lo.min(tuple[component]);
      hi = hi.max(tuple[component]);
    }
    Some((lo, hi))
  }

  /// Whether two arrays can exchange tuples.
  pub fn same_schema(&self, other: &DataArray) -> bool {
    self.name == other.name && self.kind == other.kind && self.components == other.components
  }

  pub fn shrink_to_fit(&mut self) {
    self.values.shrink_to_fit();
  }
}

/// Ordered set of named arrays with an optional active scalar array.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttributeTable {
  arrays: Vec<DataArray>,
  active_scalars: Option<usize>,
}

impl AttributeTable {
  pub fn new() -> Self {
    Self::default()
  }

  /// Add an array, replacing any array with the same name.
  ///
  /// Returns the array's index.
  pub fn add_array(&mut self, array: DataArray) -> usize {
    if let Some(index) = self.array_index(array.name()) {
      self.arrays[index] = array;
      index
    } else {
      self.arrays.push(array);
      self.arrays.len() - 1
    }
  }

  /// Builder form of [`add_array`](Self::add_array).
  pub fn with_array(mut self, array: DataArray) -> Self {
    self.add_array(array);
    self
  }

  /// Add an array and mark it as the active scalars.
  pub fn with_scalars(mut self, array: DataArray) -> Self {
    let index = self.add_array(array);
    self.active_scalars = Some(index);
    self
  }

  /// Mark the array called `name` as active. Returns false if absent.
  pub fn set_active_scalars(&mut self, name: &str) -> bool {
    match self.array_index(name) {
      Some(index) => {
        self.active_scalars = Some(index);
        true
      }
      None => false,
    }
  }

  /// The active scalar array.
  pub fn scalars(&self) -> Option<&DataArray> {
    self.active_scalars.map(|i| &self.arrays[i])
  }

  pub fn array(&self, name: &str) -> Option<&DataArray> {
    self.arrays.iter().find(|a| a.name() == name)
  }

  pub fn array_index(&self, name: &str) -> Option<usize> {
    self.arrays.iter().position(|a| a.name() == name)
  }

  pub fn arrays(&self) -> &[DataArray] {
    &self.arrays
  }

  pub(crate) fn arrays_mut(&mut self) -> &mut [DataArray] {
    &mut self.arrays
  }

  /// Number of arrays.
  pub fn len(&self) -> usize {
    self.arrays.len()
  }

  pub fn is_empty(&self) -> bool {
    self.arrays.is_empty()
  }

  /// Tuple count shared by the arrays (0 for an empty table).
  pub fn tuple_count(&self) -> usize {
    self.arrays.first().map_or(0, DataArray::tuple_count)
  }

  /// Empty arrays for every array present, with the same schema, in both
  /// tables. The active scalars carry over when they survive.
  pub fn shared_schema(&self, other: &AttributeTable) -> AttributeTable {
    let mut table = AttributeTable::new();
    for array in &self.arrays {
      if other.array(array.name()).is_some_and(|o| o.same_schema(array)) {
        table.add_array(array.empty_like(0));
      }
    }
    if let Some(active) = self.scalars() {
      table.set_active_scalars(active.name());
    }
    table
  }

  /// Append `rows` of every matching array of `source`.
  pub fn extend_rows(&mut self, source: &AttributeTable, rows: Range<usize>) {
    for array in &mut self.arrays {
      let Some(src) = source.array(array.name()) else {
        continue;
      };
      for row in rows.clone() {
        array.push_copied(src, row);
      }
    }
  }

  pub fn shrink_to_fit(&mut self) {
    for array in &mut self.arrays {
      array.shrink_to_fit();
    }
  }
}
