/*!

  The parity-to-energy reduction (Section 4.7): a parity game, where each
  vertex carries a priority and the winner of a play is decided by the
  parity of the highest priority seen infinitely often, is reducible to an
  energy game by assigning every vertex's priority a signed basis weight
  and giving the attracting player (the one whose parity wins "staying
  finite forever") the role of Max.

  Grounded on `examples/original_source/src/energy_game/numbers/int.hpp`
  (the `(-n)^p` / `n^(p_max+1)` formulas for the fixed-width/bignum
  encoding) and the `ovec`/`omap` headers (the vector/map encodings,
  wrapped here as [`crate::weight::DenseWeight::basis`] /
  [`crate::weight::SparseWeight::basis`]).

*/

use crate::graph::{EnergyGame, Owner, VertexId};
use crate::weight::{BigWeight, DenseWeight, FixedWeight, SparseWeight, WeightValue};

/// A parity game: `n` vertices, each with an owner and a priority, and a
/// set of directed edges (unweighted — all payoff comes from priorities).
pub struct ParityGame {
  pub owner: Vec<Owner>,
  pub priority: Vec<u32>,
  pub edges: Vec<(VertexId, VertexId)>,
}

impl ParityGame {
  pub fn new(nverts: usize) -> Self {
    ParityGame { owner: vec![Owner::Max; nverts], priority: vec![0; nverts], edges: Vec::new() }
  }

  pub fn size(&self) -> usize {
    self.owner.len()
  }

  pub fn max_priority(&self) -> u32 {
    self.priority.iter().copied().max().unwrap_or(0)
  }

  pub fn set_vertex(&mut self, v: VertexId, owner: Owner, priority: u32) {
    self.owner[v as usize] = owner;
    self.priority[v as usize] = priority;
  }

  pub fn add_edge(&mut self, u: VertexId, v: VertexId) {
    self.edges.push((u, v));
  }

  /// Rejects a game with a vertex that has no outgoing edge, before it is
  /// reduced to an energy game and solved (Section 4.10/Section 7:
  /// `InputSemanticError`).
  pub fn validate_no_dead_ends(&self) -> crate::errors::Result<()> {
    let mut has_out = vec![false; self.size()];
    for &(u, _) in &self.edges {
      has_out[u as usize] = true;
    }
    for (v, &present) in has_out.iter().enumerate() {
      if !present {
        return Err(crate::errors::Error::InputSemantic { message: format!("vertex {v} has no outgoing edge") });
      }
    }
    Ok(())
  }

  /// Appends a default vertex (Max-owned, priority 0), used by the
  /// PGSolver parser to grow the game as it discovers vertex ids beyond
  /// the declared header bound.
  pub fn add_vertex_placeholder(&mut self) -> VertexId {
    self.owner.push(Owner::Max);
    self.priority.push(0);
    (self.owner.len() - 1) as VertexId
  }

  /// Builds the energy game whose vertices, owners, and edges mirror this
  /// parity game's, with every edge `u -> v` weighted by `basis(priority(u),
  /// negative = priority(u) is odd)` — Max (the even-parity player) wants
  /// to keep accumulating positive basis vectors forever, Min wants to
  /// force the energy below zero, exactly the parity condition.
  pub fn to_energy_game<F: BasisFn>(&self, basis: F, infty: F::Output) -> EnergyGame<F::Output> {
    let mut game = EnergyGame::new(self.size(), infty);
    for v in 0..self.size() as VertexId {
      game.set_owner(v, self.owner[v as usize]);
    }
    for &(u, v) in &self.edges {
      let p = self.priority[u as usize];
      let w = basis.call(p, p % 2 == 1);
      game.add_edge(u, w, v);
    }
    game
  }
}

/// A callable basis-vector constructor, so [`ParityGame::to_energy_game`]
/// can be generic over which of the three weight domains (Section 3) is
/// used without repeating its body three times.
pub trait BasisFn {
  type Output: WeightValue;
  fn call(&self, priority: u32, negative: bool) -> Self::Output;
}

pub struct FixedBasis {
  pub n: i64,
}

impl FixedBasis {
  /// `priority_to_weight(p) = (-n)^p`, `infty = n^(p_max + 1)`, following
  /// `int.hpp`. Only safe for small games: this overflows `i64` quickly as
  /// `p_max` grows, which is why [`BigBasis`] is the default (Section 9).
  pub fn infty(n: i64, max_priority: u32) -> FixedWeight {
    n.pow(max_priority + 1)
  }
}

impl BasisFn for FixedBasis {
  type Output = FixedWeight;
  fn call(&self, priority: u32, _negative: bool) -> FixedWeight {
    (-self.n).pow(priority)
  }
}

pub struct BigBasis {
  pub n: i64,
}

impl BigBasis {
  pub fn infty(n: i64, max_priority: u32) -> BigWeight {
    BigWeight::from(n).pow(max_priority + 1)
  }
}

impl BasisFn for BigBasis {
  type Output = BigWeight;
  fn call(&self, priority: u32, _negative: bool) -> BigWeight {
    BigWeight::from(-self.n).pow(priority)
  }
}

pub struct DenseBasis {
  pub max_priority: u32,
}

impl BasisFn for DenseBasis {
  type Output = DenseWeight;
  fn call(&self, priority: u32, negative: bool) -> DenseWeight {
    DenseWeight::basis(self.max_priority, priority, negative)
  }
}

pub struct SparseBasis;

impl BasisFn for SparseBasis {
  type Output = SparseWeight;
  fn call(&self, priority: u32, negative: bool) -> SparseWeight {
    SparseWeight::basis(priority, negative)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn dense_reduction_preserves_topology() {
    let mut pg = ParityGame::new(2);
    pg.set_vertex(0, Owner::Max, 2);
    pg.set_vertex(1, Owner::Min, 1);
    pg.add_edge(0, 1);
    pg.add_edge(1, 0);

    let max_priority = pg.max_priority();
    let basis = DenseBasis { max_priority };
    let infty = DenseWeight::infinity(max_priority, pg.edges.len());
    let game = pg.to_energy_game(basis, infty);

    assert_eq!(game.size(), 2);
    assert_eq!(game.outs(0).len(), 1);
    assert_eq!(game.outs(1).len(), 1);
  }

  #[test]
  fn odd_priorities_get_negative_basis() {
    let basis = SparseBasis;
    let even = basis.call(2, false);
    let odd = basis.call(1, true);
    assert!(even > SparseWeight::zero());
    assert!(odd < SparseWeight::zero());
  }
}
