//! Iso-value lists.

/// Ordered iso-values. Duplicates are kept and contoured independently.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContourValues {
  values: Vec<f64>,
}

impl ContourValues {
  pub fn new() -> Self {
    Self::default()
  }

  /// Set value `index`, growing the list with zeros as needed.
  pub fn set_value(&mut self, index: usize, value: f64) {
    if index >= self.values.len() {
      self.values.resize(index + 1, 0.0);
    }
    self.values[index] = value;
  }

  pub fn value(&self, index: usize) -> Option<f64> {
    self.values.get(index).copied()
  }

  pub fn values(&self) -> &[f64] {
    &self.values
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  /// Resize to `count` values, zero-filling new entries.
  pub fn set_number_of_contours(&mut self, count: usize) {
    self.values.resize(count, 0.0);
  }

  /// Replace the list with `count` evenly spaced values over `[lo, hi]`,
  /// both ends included. A single value is placed at `lo`.
  pub fn generate_values(&mut self, count: usize, [lo, hi]: [f64; 2]) {
    self.values.clear();
    match count {
      0 => {}
      1 => self.values.push(lo),
      _ => {
        let step = (hi - lo) / (count - 1) as f64;
        self
          .values
          .extend((0..count).map(|i| if i == count - 1 { hi } else { lo + step * i as f64 }));
      }
    }
  }

  pub fn clear(&mut self) {
    self.values.clear();
  }
}

impl From<Vec<f64>> for ContourValues {
  fn from(values: Vec<f64>) -> Self {
    Self { values }
  }
}

impl From<&[f64]> for ContourValues {
  fn from(values: &[f64]) -> Self {
    Self {
      values: values.to_vec(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_set_value_grows() {
    let mut values = ContourValues::new();
    values.set_value(2, 1.5);
    assert_eq!(values.values(), &[0.0, 0.0, 1.5]);
    assert_eq!(values.value(2), Some(1.5));
    assert_eq!(values.value(3), None);
  }

  #[test]
  fn test_generate_values_inclusive() {
    let mut values = ContourValues::new();
    values.generate_values(5, [0.0, 1.0]);
    assert_eq!(values.values(), &[0.0, 0.25, 0.5, 0.75, 1.0]);

    values.generate_values(1, [2.0, 4.0]);
    assert_eq!(values.values(), &[2.0]);

    values.generate_values(0, [2.0, 4.0]);
    assert!(values.is_empty());
  }

  #[test]
  fn test_duplicates_are_kept() {
    let values = ContourValues::from(vec![0.5, 0.5]);
    assert_eq!(values.len(), 2);
  }

  #[test]
  fn test_set_number_of_contours_truncates_and_grows() {
    let mut values = ContourValues::from(vec![1.0, 2.0, 3.0]);
    values.set_number_of_contours(2);
    assert_eq!(values.values(), &[1.0, 2.0]);
    values.set_number_of_contours(3);
    assert_eq!(values.values(), &[1.0, 2.0, 0.0]);
  }
}
