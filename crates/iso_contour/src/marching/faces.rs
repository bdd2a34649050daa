//! Boundary-ring walks and loop chaining.
//!
//! A ring is a closed sequence of local point indices: the outline of a 2D
//! cell or one outward-wound face of a 3D cell. Every maximal run of inside
//! points on a ring gives one segment, from the crossing on the edge where
//! the run is entered to the crossing on the edge where it is left. Pairing
//! each entering edge with the next leaving edge does not depend on where
//! the walk starts, so two cells sharing a face or an edge always agree on
//! how its crossings connect.
//!
//! For a 3D cell each crossed edge is entered by one face and left by the
//! other, so the face segments chain into closed loops.

use smallvec::SmallVec;

/// Ring edge as traversed, `(from, to)` in local indices.
pub type RingEdge = (usize, usize);

/// Undirected local edge, lower index first.
pub type EdgeKey = (usize, usize);

/// Entering and leaving edge of one inside run.
pub type RingSegment = (RingEdge, RingEdge);

#[inline]
pub fn edge_key((a, b): RingEdge) -> EdgeKey {
  if a <= b {
    (a, b)
  } else {
    (b, a)
  }
}

/// Append one segment per maximal run of inside points on `ring`.
pub fn ring_segments<T, F>(ring: &[T], inside: F, out: &mut SmallVec<[RingSegment; 4]>)
where
  T: Copy + Into<usize>,
  F: Fn(usize) -> bool,
{
  let n = ring.len();
  if n < 2 {
    return;
  }
  let at = |i: usize| -> usize { ring[i % n].into() };

  for start in 0..n {
    let prev = at(start + n - 1);
    let first = at(start);
    if inside(prev) || !inside(first) {
      continue;
    }

    // prev is outside, so the walk terminates within n steps
    let mut last = start;
    while inside(at(last + 1)) {
      last += 1;
    }
    out.push(((prev, first), (at(last), at(last + 1))));
  }
}

/// Closed (or, for malformed cells, open) chains of edge keys.
#[derive(Debug, Default)]
pub struct LoopBuffer {
  keys: Vec<EdgeKey>,
  offsets: Vec<usize>,
  used: Vec<bool>,
}

impl LoopBuffer {
  pub fn clear(&mut self) {
    self.keys.clear();
    self.offsets.clear();
  }

  pub fn len(&self) -> usize {
    self.offsets.len()
  }

  pub fn is_empty(&self) -> bool {
    self.offsets.is_empty()
  }

  /// Keys of loop `index`.
  pub fn get(&self, index: usize) -> &[EdgeKey] {
    let start = self.offsets[index];
    let end = self.offsets.get(index + 1).copied().unwrap_or(self.keys.len());
    &self.keys[start..end]
  }

  /// Chain `segments` (entering key, leaving key) into loops.
  ///
  /// A segment's leaving edge is the entering edge of the next. Chains
  /// that cannot be closed are kept open.
  pub fn chain(&mut self, segments: &[(EdgeKey, EdgeKey)]) {
    self.clear();
    self.used.clear();
    self.used.resize(segments.len(), false);

    for seed in 0..segments.len() {
      if self.used[seed] {
        continue;
      }
      self.used[seed] = true;
      self.offsets.push(self.keys.len());

      let (head, mut tail) = segments[seed];
      self.keys.push(head);

      while tail != head {
        let next = (0..segments.len()).find(|&s| !self.used[s] && segments[s].0 == tail);
        match next {
          Some(s) => {
            self.used[s] = true;
            self.keys.push(tail);
            tail = segments[s].1;
          }
          None => {
            self.keys.push(tail);
            break;
          }
        }
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn segments_of(ring: &[usize], inside: &[bool]) -> Vec<RingSegment> {
    let mut out = SmallVec::new();
    ring_segments(ring, |l| inside[l], &mut out);
    out.into_vec()
  }

  #[test]
  fn test_single_run() {
    let segs = segments_of(&[0, 1, 2, 3], &[false, false, true, true]);
    assert_eq!(segs, vec![((1, 2), (3, 0))]);
  }

  #[test]
  fn test_run_wrapping_ring_end() {
    let segs = segments_of(&[0, 1, 2, 3], &[true, false, false, true]);
    assert_eq!(segs, vec![((2, 3), (0, 1))]);
  }

  #[test]
  fn test_saddle_separates_inside_corners() {
    let segs = segments_of(&[0, 1, 2, 3], &[true, false, true, false]);
    assert_eq!(segs, vec![((3, 0), (0, 1)), ((1, 2), (2, 3))]);
  }

  #[test]
  fn test_uniform_rings_have_no_segments() {
    assert!(segments_of(&[0, 1, 2], &[true, true, true]).is_empty());
    assert!(segments_of(&[0, 1, 2], &[false, false, false]).is_empty());
  }

  #[test]
  fn test_chain_closes_loop() {
    let a = (0, 1);
    let b = (0, 2);
    let c = (0, 3);
    let mut loops = LoopBuffer::default();
    loops.chain(&[(a, c), (b, a), (c, b)]);

    assert_eq!(loops.len(), 1);
    assert_eq!(loops.get(0), &[a, c, b]);
  }

  #[test]
  fn test_chain_two_loops() {
    let mut loops = LoopBuffer::default();
    loops.chain(&[((0, 1), (0, 2)), ((0, 2), (0, 1)), ((5, 6), (5, 7)), ((5, 7), (5, 6))]);

    assert_eq!(loops.len(), 2);
    assert_eq!(loops.get(1), &[(5, 6), (5, 7)]);
  }

  #[test]
  fn test_chain_keeps_open_chain() {
    let mut loops = LoopBuffer::default();
    loops.chain(&[((0, 1), (0, 2)), ((0, 2), (0, 3))]);

    assert_eq!(loops.len(), 1);
    assert_eq!(loops.get(0), &[(0, 1), (0, 2), (0, 3)]);
  }
}
