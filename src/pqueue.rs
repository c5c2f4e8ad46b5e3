/*!

  The mutable priority queue the FVI main loop uses to drive its phase-2
  pass (Section 4.5, "phase 2"): a binary heap of vertices keyed by weight,
  supporting decrease/increase-in-place via a key-to-slot index, mirroring
  `phase2_pq.set(...)` in
  `examples/original_source/src/solvers/potential/potential_computers/fvi.hpp`.

  `std::collections::BinaryHeap` has no `decrease-key`, so this is a small
  indexed binary heap: a dense `Vec` of `(key, priority)` pairs plus a
  `key -> slot` map kept in sync across swaps.

*/

use std::collections::HashMap;

use crate::graph::VertexId;
use crate::weight::WeightValue;

/// Controls how [`PriorityQueue::set`] resolves a key that is already queued.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum SetMode {
  /// Always overwrite, regardless of the current priority.
  Always,
  /// Overwrite only if the new priority is lower than the current one.
  OnlyIfLower,
  /// Overwrite only if the new priority is higher than the current one.
  OnlyIfHigher,
}

/// A min-heap over `VertexId` keys, ordered by an associated weight.
///
/// Ties break on insertion order (earlier insertions pop first), matching
/// the deterministic iteration the verifier tests rely on.
pub struct PriorityQueue<T: WeightValue> {
  heap: Vec<(VertexId, T, u64)>,
  slot_of: HashMap<VertexId, usize>,
  next_seq: u64,
}

impl<T: WeightValue> PriorityQueue<T> {
  pub fn new() -> Self {
    PriorityQueue { heap: Vec::new(), slot_of: HashMap::new(), next_seq: 0 }
  }

  pub fn len(&self) -> usize {
    self.heap.len()
  }

  pub fn is_empty(&self) -> bool {
    self.heap.is_empty()
  }

  pub fn contains(&self, key: VertexId) -> bool {
    self.slot_of.contains_key(&key)
  }

  fn less(&self, i: usize, j: usize) -> bool {
    let (_, ref pi, si) = self.heap[i];
    let (_, ref pj, sj) = self.heap[j];
    match pi.partial_cmp(pj) {
      Some(std::cmp::Ordering::Less) => true,
      Some(std::cmp::Ordering::Greater) => false,
      _ => si < sj,
    }
  }

  fn swap_slots(&mut self, i: usize, j: usize) {
    self.heap.swap(i, j);
    self.slot_of.insert(self.heap[i].0, i);
    self.slot_of.insert(self.heap[j].0, j);
  }

  fn sift_up(&mut self, mut i: usize) {
    while i > 0 {
      let parent = (i - 1) / 2;
      if self.less(i, parent) {
        self.swap_slots(i, parent);
        i = parent;
      } else {
        break;
      }
    }
  }

  fn sift_down(&mut self, mut i: usize) {
    loop {
      let left = 2 * i + 1;
      let right = 2 * i + 2;
      let mut smallest = i;
      if left < self.heap.len() && self.less(left, smallest) {
        smallest = left;
      }
      if right < self.heap.len() && self.less(right, smallest) {
        smallest = right;
      }
      if smallest == i {
        break;
      }
      self.swap_slots(i, smallest);
      i = smallest;
    }
  }

  fn insert(&mut self, key: VertexId, priority: T) {
    let seq = self.next_seq;
    self.next_seq += 1;
    let i = self.heap.len();
    self.heap.push((key, priority, seq));
    self.slot_of.insert(key, i);
    self.sift_up(i);
  }

  fn update(&mut self, i: usize, priority: T) {
    let key = self.heap[i].0;
    self.heap[i].1 = priority;
    // The new priority may sit on either side of the old one: try both
    // directions, only one of which will actually move anything.
    self.sift_up(i);
    let i = self.slot_of[&key];
    self.sift_down(i);
  }

  /// Inserts or updates `key`'s priority according to `mode`.
  pub fn set(&mut self, key: VertexId, priority: T, mode: SetMode) {
    if let Some(&i) = self.slot_of.get(&key) {
      let keep_old = match mode {
        SetMode::Always => false,
        SetMode::OnlyIfLower => priority >= self.heap[i].1,
        SetMode::OnlyIfHigher => priority <= self.heap[i].1,
      };
      if !keep_old {
        self.update(i, priority);
      }
    } else {
      self.insert(key, priority);
    }
  }

  /// Returns the least key without removing it.
  pub fn peek(&self) -> Option<&VertexId> {
    self.heap.first().map(|(k, _, _)| k)
  }

  pub fn pop(&mut self) -> Option<(VertexId, T)> {
    if self.heap.is_empty() {
      return None;
    }
    let last = self.heap.len() - 1;
    self.swap_slots(0, last);
    let (key, priority, _) = self.heap.pop().unwrap();
    self.slot_of.remove(&key);
    if !self.heap.is_empty() {
      self.sift_down(0);
    }
    Some((key, priority))
  }

  pub fn remove(&mut self, key: VertexId) -> Option<T> {
    let i = self.slot_of.remove(&key)?;
    let last = self.heap.len() - 1;
    if i != last {
      self.swap_slots(i, last);
    }
    let (_, priority, _) = self.heap.pop().unwrap();
    if i < self.heap.len() {
      self.sift_down(i);
      self.sift_up(i);
    }
    Some(priority)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn pops_in_ascending_priority_order() {
    let mut q: PriorityQueue<i64> = PriorityQueue::new();
    q.set(0, 5, SetMode::Always);
    q.set(1, 1, SetMode::Always);
    q.set(2, 3, SetMode::Always);
    assert_eq!(q.pop(), Some((1, 1)));
    assert_eq!(q.pop(), Some((2, 3)));
    assert_eq!(q.pop(), Some((0, 5)));
    assert_eq!(q.pop(), None);
  }

  #[test]
  fn only_if_lower_ignores_worse_updates() {
    let mut q: PriorityQueue<i64> = PriorityQueue::new();
    q.set(0, 5, SetMode::Always);
    q.set(0, 9, SetMode::OnlyIfLower);
    assert_eq!(q.peek(), Some(&0));
    q.set(0, 2, SetMode::OnlyIfLower);
    let (_, p) = q.pop().unwrap();
    assert_eq!(p, 2);
  }

  #[test]
  fn remove_drops_arbitrary_key() {
    let mut q: PriorityQueue<i64> = PriorityQueue::new();
    q.set(0, 5, SetMode::Always);
    q.set(1, 1, SetMode::Always);
    q.set(2, 3, SetMode::Always);
    assert_eq!(q.remove(2), Some(3));
    assert!(!q.contains(2));
    assert_eq!(q.pop(), Some((1, 1)));
    assert_eq!(q.pop(), Some((0, 5)));
  }
}
