/*!

  The dense-vector weight named in Section 3: a weight indexed by
  parity-game priority, compared lexicographically from the highest
  priority down. Grounded on
  `examples/original_source/src/solvers/fvi/weights/ovec.hpp`, whose `ovec`
  type this mirrors: index `0` holds the coefficient for the highest
  priority in the game, and the first index at which two vectors differ
  determines their order.

  Vectors of differing lengths are zero-extended on the right before any
  operation, so `DenseWeight::zero()` (the empty vector) composes with any
  other vector without the caller having to know the game's priority range
  up front.

*/

use std::cmp::Ordering;
use std::fmt;

use super::WeightValue;

#[derive(Clone, Eq, PartialEq, Debug, Hash, Default)]
pub struct DenseWeight(Vec<i64>);

impl DenseWeight {
  /// Builds the basis vector for `priority` out of `max_priority + 1`
  /// coefficients, negative if `negative` is set (used by the parity
  /// reduction to encode odd priorities / the `swap` instance).
  pub fn basis(max_priority: u32, priority: u32, negative: bool) -> Self {
    let mut coeffs = vec![0i64; (max_priority + 1) as usize];
    let index = (max_priority - priority) as usize;
    coeffs[index] = if negative { -1 } else { 1 };
    DenseWeight(coeffs)
  }

  /// The `infty` value for a game with `max_priority` and `edge_count`
  /// edges: a coefficient on the highest priority large enough that no
  /// realisable finite sum can reach it.
  pub fn infinity(max_priority: u32, edge_count: usize) -> Self {
    let mut coeffs = vec![0i64; (max_priority + 1) as usize];
    coeffs[0] = edge_count as i64 + 1;
    DenseWeight(coeffs)
  }

  fn len_of(a: &[i64], b: &[i64]) -> usize {
    a.len().max(b.len())
  }

  fn coeff(v: &[i64], i: usize) -> i64 {
    v.get(i).copied().unwrap_or(0)
  }
}

impl WeightValue for DenseWeight {
  fn zero() -> Self {
    DenseWeight(Vec::new())
  }

  fn add_in_place(&mut self, other: &Self) {
    let n = Self::len_of(&self.0, &other.0);
    self.0.resize(n, 0);
    for i in 0..n {
      self.0[i] += Self::coeff(&other.0, i);
    }
  }

  fn sub_in_place(&mut self, other: &Self) {
    let n = Self::len_of(&self.0, &other.0);
    self.0.resize(n, 0);
    for i in 0..n {
      self.0[i] -= Self::coeff(&other.0, i);
    }
  }

  fn negated(&self) -> Self {
    DenseWeight(self.0.iter().map(|x| -x).collect())
  }
}

impl PartialOrd for DenseWeight {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    let n = Self::len_of(&self.0, &other.0);
    for i in 0..n {
      let diff = Self::coeff(&self.0, i) - Self::coeff(&other.0, i);
      match diff.cmp(&0) {
        Ordering::Equal => continue,
        ord => return Some(ord),
      }
    }
    Some(Ordering::Equal)
  }
}

impl fmt::Display for DenseWeight {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "[")?;
    for (i, x) in self.0.iter().enumerate() {
      write!(f, " {i}->{x}")?;
    }
    write!(f, " ]")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn lexicographic_order_favours_higher_priority() {
    // max_priority = 2: index 0 <-> priority 2, index 1 <-> priority 1, index 2 <-> priority 0.
    let p2 = DenseWeight::basis(2, 2, false);
    let p1 = DenseWeight::basis(2, 1, false);
    assert!(p2 > p1);
  }

  #[test]
  fn zero_composes_with_any_length() {
    let mut z = DenseWeight::zero();
    let v = DenseWeight::basis(3, 1, false);
    z.add_in_place(&v);
    assert_eq!(z, v);
  }
}
