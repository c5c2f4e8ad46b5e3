/*!

  The weight algebra (Section 3, "Weight") and the owned/proxy reference
  wrapper (Section 4.1, "Weight-handle (movable number)") that the energy
  game graph and the FVI potential computer are built on.

  [`WeightValue`] is the capability interface the design notes (Section 9)
  call for in place of the source's template hierarchy: an exact, linearly
  ordered abelian group with a distinguished `zero`, `+`, unary negation,
  and total comparison. [`fixed`], [`big`], [`dense`], and [`sparse`]
  provide the four concrete representations named in Section 3.

  [`WeightHandle`] is the movable-number wrapper: a handle into a
  [`crate::arena::Arena`] cell carrying an "owns" bit, with three transfer
  modes (`copy`, `proxy`, `steal`) plus the `steal_or_copy`/`steal_or_proxy`
  conveniences. Only edge weights and FVI's
  transient phase-2 queue entries go through handles, since those are the
  two places a weight value is genuinely aliased (an edge's weight cell is
  shared between its `outs` and `ins` entries; a phase-2 queue entry may
  borrow an edge's weight without duplicating it). Per-vertex potentials and
  deltas are never aliased, so they are plain `T` values — no handle
  indirection buys anything there.

*/

pub mod big;
pub mod dense;
pub mod fixed;
pub mod sparse;

use std::cell::{Ref, RefMut};
use std::cmp::Ordering;
use std::fmt;

use crate::arena::{CellIndex, SharedArena};

pub use big::BigWeight;
pub use dense::DenseWeight;
pub use fixed::FixedWeight;
pub use sparse::SparseWeight;

/// An exact, linearly-ordered abelian group with a distinguished `zero`.
///
/// Implementors must make comparison total (Section 3: "comparisons are
/// total") and `zero` the additive identity.
pub trait WeightValue: Clone + PartialEq + PartialOrd + fmt::Debug + fmt::Display {
  fn zero() -> Self;

  fn add_in_place(&mut self, other: &Self);
  fn sub_in_place(&mut self, other: &Self);

  /// Unary negation, used by the dual/swap instance (Section 4.5).
  fn negated(&self) -> Self;

  fn is_zero(&self) -> bool {
    *self == Self::zero()
  }
}

/// A handle into an arena cell, carrying an "owns" bit.
///
/// Exactly one live handle for any cell has `owns == true`; dropping that
/// handle frees the cell, dropping a non-owning handle is a no-op (Section
/// 3, "Ownership discipline for weight values").
pub struct WeightHandle<T: WeightValue> {
  arena: SharedArena<T>,
  cell: CellIndex,
  owns: bool,
}

impl<T: WeightValue> WeightHandle<T> {
  /// Allocates a fresh, owned cell holding `value`.
  pub fn new_owned(arena: &SharedArena<T>, value: T) -> Self {
    let cell = arena.borrow_mut().construct(value);
    WeightHandle { arena: arena.clone(), cell, owns: true }
  }

  /// Deep-duplicates `other` into a new owning cell.
  pub fn copy(other: &Self) -> Self {
    let value = other.get().clone();
    Self::new_owned(&other.arena, value)
  }

  /// Aliases `other`'s cell without taking ownership.
  pub fn proxy(other: &Self) -> Self {
    WeightHandle { arena: other.arena.clone(), cell: other.cell, owns: false }
  }

  /// Transfers ownership from `other`, which *must* currently own its cell.
  ///
  /// `other` becomes a non-owning proxy of the same cell.
  pub fn steal(other: &mut Self) -> Self {
    debug_assert!(other.owns, "steal() requires the donor to own its cell");
    other.owns = false;
    WeightHandle { arena: other.arena.clone(), cell: other.cell, owns: true }
  }

  /// Transfers ownership if `other` owned, otherwise makes a proxy.
  /// `other` never owns after this call.
  pub fn steal_or_proxy(other: &mut Self) -> Self {
    let was_owned = other.owns;
    other.owns = false;
    WeightHandle { arena: other.arena.clone(), cell: other.cell, owns: was_owned }
  }

  /// Transfers ownership from `other` if it owned, else deep-copies.
  /// The result always owns; `other` never owns after this call.
  pub fn steal_or_copy(other: &mut Self) -> Self {
    if other.owns {
      Self::steal(other)
    } else {
      Self::copy(other)
    }
  }

  pub fn owns(&self) -> bool {
    self.owns
  }

  pub fn get(&self) -> Ref<'_, T> {
    Ref::map(self.arena.borrow(), |a| a.get(self.cell))
  }

  pub fn get_mut(&self) -> RefMut<'_, T> {
    RefMut::map(self.arena.borrow_mut(), |a| a.get_mut(self.cell))
  }

  pub fn value(&self) -> T {
    self.get().clone()
  }

  pub fn set(&self, value: T) {
    *self.get_mut() = value;
  }

  pub fn add_assign(&self, other: &T) {
    self.get_mut().add_in_place(other);
  }

  pub fn sub_assign(&self, other: &T) {
    self.get_mut().sub_in_place(other);
  }
}

impl<T: WeightValue> Drop for WeightHandle<T> {
  fn drop(&mut self) {
    if self.owns {
      self.arena.borrow_mut().destroy(self.cell);
    }
  }
}

impl<T: WeightValue> PartialEq for WeightHandle<T> {
  fn eq(&self, other: &Self) -> bool {
    *self.get() == *other.get()
  }
}

impl<T: WeightValue> PartialOrd for WeightHandle<T> {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    self.get().partial_cmp(&*other.get())
  }
}

impl<T: WeightValue> fmt::Debug for WeightHandle<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "WeightHandle({:?}, owns={})", *self.get(), self.owns)
  }
}

impl<T: WeightValue> fmt::Display for WeightHandle<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", *self.get())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::arena::new_shared_arena;

  #[test]
  fn copy_is_independent() {
    let arena = new_shared_arena::<i64>();
    let a = WeightHandle::new_owned(&arena, 5i64.into());
    let b = WeightHandle::copy(&a);
    b.set(9);
    assert_eq!(a.value(), 5);
    assert_eq!(b.value(), 9);
  }

  #[test]
  fn steal_transfers_ownership() {
    let arena = new_shared_arena::<i64>();
    let mut a = WeightHandle::new_owned(&arena, 7i64.into());
    let c = WeightHandle::steal(&mut a);
    assert!(!a.owns());
    assert!(c.owns());
    assert_eq!(c.value(), 7);
    drop(c);
    assert!(arena.borrow().is_empty());
  }

  #[test]
  fn proxy_aliases_same_cell() {
    let arena = new_shared_arena::<i64>();
    let a = WeightHandle::new_owned(&arena, 3i64.into());
    let p = WeightHandle::proxy(&a);
    a.set(11);
    assert_eq!(p.value(), 11);
    assert!(!p.owns());
  }

  #[test]
  fn arena_occupancy_returns_to_zero() {
    let arena = new_shared_arena::<i64>();
    {
      let mut handles = Vec::new();
      for i in 0..1000i64 {
        let mut owner = WeightHandle::new_owned(&arena, i.into());
        let stolen = WeightHandle::steal(&mut owner);
        handles.push(stolen);
      }
      assert_eq!(arena.borrow().live_count(), 1000);
    }
    assert!(arena.borrow().is_empty());
  }
}
