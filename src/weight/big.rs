/*!

  The arbitrary-precision weight, backed by [`num_bigint::BigInt`]. This is
  the default weight domain for the parity-to-energy reduction (Section
  4.7), since `infty = n^(p_max+1)` overflows `i64` for any game of
  realistic size and priority range.

*/

use num_bigint::BigInt;

use super::WeightValue;

pub type BigWeight = BigInt;

impl WeightValue for BigWeight {
  fn zero() -> Self {
    BigInt::from(0)
  }

  fn add_in_place(&mut self, other: &Self) {
    *self += other;
  }

  fn sub_in_place(&mut self, other: &Self) {
    *self -= other;
  }

  fn negated(&self) -> Self {
    -self.clone()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn grows_without_overflow() {
    let mut huge = BigWeight::from(10).pow(30);
    huge.add_in_place(&BigWeight::from(1));
    assert_eq!(huge, BigWeight::from(10).pow(30) + BigWeight::from(1));
  }
}
