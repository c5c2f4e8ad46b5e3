/*!

  The potential teller (Section 4.4): keeps the running potential/energy
  estimate for every vertex, tracks which vertices are *decided* (their
  final energy, `+infty` or `-infty`, is known), and drives the
  attract-and-shrink outer loop by folding each round's output back in.

  Grounded on `examples/original_source/src/solvers/potential/potential_teller.hpp`'s
  `reduce()`: the driver behind
  `do { computer.compute(); } while (teller.reduce(computer.get_potential())); }`
  in `examples/original_source/src/solvers/fvi.cpp`.

  Beyond the literal `reduce` of Section 4.4, this teller also closes the
  graph under `isolate_vertex`'s consequence: removing a decided vertex's
  edges (Section 4.3's mirror-removal invariant) can leave one of its
  predecessors with no outgoing edge left at all, which the FVI computer's
  precondition (every undecided vertex has an outgoing edge, Section 4.10)
  forbids. Rather than let that predecessor wait for a future round it can
  no longer take part in, the teller tracks, for every vertex, the best
  (owner-preferred) value any edge it has *ever* had pointed at a decided
  neighbour, and immediately finalises a vertex the instant its last edge
  disappears — an ordinary backward-induction step, not a new rule.

*/

use std::collections::{BTreeSet, VecDeque};

use crate::graph::{EnergyGame, Owner, VertexId};
use crate::weight::WeightValue;

pub struct PotentialTeller<T: WeightValue> {
  potential: Vec<T>,
  decided: Vec<bool>,
  undecided: BTreeSet<VertexId>,
  strategy: Vec<Option<VertexId>>,
  /// The best value (and the edge that realises it) any still-live or
  /// now-removed edge has offered this vertex towards an already-decided
  /// neighbour; `None` until the first such edge is seen.
  best_seen: Vec<Option<(T, VertexId)>>,
}

impl<T: WeightValue> PotentialTeller<T> {
  /// Starts every vertex at `zero()` and undecided.
  pub fn new(nverts: usize) -> Self {
    PotentialTeller {
      potential: vec![T::zero(); nverts],
      decided: vec![false; nverts],
      undecided: (0..nverts as VertexId).collect(),
      strategy: vec![None; nverts],
      best_seen: vec![None; nverts],
    }
  }

  pub fn potential(&self, v: VertexId) -> &T {
    &self.potential[v as usize]
  }

  pub fn is_decided(&self, v: VertexId) -> bool {
    self.decided[v as usize]
  }

  pub fn strategy(&self, v: VertexId) -> Option<VertexId> {
    self.strategy[v as usize]
  }

  pub fn undecided(&self) -> impl Iterator<Item = VertexId> + '_ {
    self.undecided.iter().copied()
  }

  pub fn undecided_count(&self) -> usize {
    self.undecided.len()
  }

  /// Marks `v` as decided with its final potential and strategy, without
  /// going through `reduce`. Used to seed vertices already known finished.
  pub fn decide(&mut self, v: VertexId, value: T) {
    self.potential[v as usize] = value;
    self.decided[v as usize] = true;
    self.undecided.remove(&v);
  }

  fn saturate(game: &EnergyGame<T>, mut value: T) -> T {
    if value > *game.infty() {
      value = game.infty().clone();
    } else if value < *game.minus_infty() {
      value = game.minus_infty().clone();
    }
    value
  }

  fn is_at_infinity(game: &EnergyGame<T>, value: &T) -> bool {
    *value >= *game.infty() || *value <= *game.minus_infty()
  }

  /// Offers `u` the candidate value `candidate` (reached via the edge to
  /// `target`), keeping only the one its owner prefers (`max` for Max,
  /// `min` for Min) of everything it has ever been offered.
  fn offer_best_seen(&mut self, game: &EnergyGame<T>, u: VertexId, candidate: T, target: VertexId) {
    let better = match &self.best_seen[u as usize] {
      None => true,
      Some((cur, _)) => {
        if game.is_max(u) {
          candidate > *cur
        } else {
          candidate < *cur
        }
      }
    };
    if better {
      self.best_seen[u as usize] = Some((candidate, target));
    }
  }

  /// Folds one round of the FVI computer's output back in: any undecided
  /// vertex whose freshly-stabilised potential has reached `+infty` or
  /// `-infty` is finalised and attracted out of `game` (Section 4.4,
  /// "reduce"), along with whatever chain of now-edgeless predecessors
  /// that finalisation forces.
  ///
  /// `round_strategy` supplies the positional strategy for vertices this
  /// round may decide directly (already filtered by the caller to the
  /// player this round's computer instance actually speaks for — Section
  /// 4.5, "Strategy reporting"); vertices decided instead because their
  /// last edge disappeared get their strategy from the best edge this
  /// teller has tracked for them.
  ///
  /// Returns whether any undecided vertex's potential changed.
  pub fn reduce(&mut self, game: &mut EnergyGame<T>, potential: &[T], round_strategy: &[Option<VertexId>]) -> bool {
    let mut changed = false;
    let snapshot: Vec<VertexId> = self.undecided.iter().copied().collect();
    let mut newly_decided: VecDeque<VertexId> = VecDeque::new();

    for v in snapshot {
      let value = Self::saturate(game, potential[v as usize].clone());
      if value != self.potential[v as usize] {
        changed = true;
      }
      self.potential[v as usize] = value.clone();
      if Self::is_at_infinity(game, &value) {
        self.strategy[v as usize] = round_strategy[v as usize];
        newly_decided.push_back(v);
      }
    }

    while let Some(v) = newly_decided.pop_front() {
      if self.decided[v as usize] {
        continue;
      }
      self.decided[v as usize] = true;
      self.undecided.remove(&v);
      changed = true;

      let predecessors: Vec<(VertexId, T)> = game.ins(v).iter().map(|e| (e.neighbor, e.weight.value())).collect();

      for &(u, ref w) in &predecessors {
        if u == v || self.decided[u as usize] {
          continue;
        }
        let mut candidate = w.clone();
        candidate.add_in_place(&self.potential[v as usize]);
        let candidate = Self::saturate(game, candidate);
        self.offer_best_seen(game, u, candidate, v);
      }

      game.isolate_vertex(v);

      for &(u, _) in &predecessors {
        if u == v || self.decided[u as usize] {
          continue;
        }
        if game.outs(u).is_empty() {
          let (value, target) = self.best_seen[u as usize]
            .clone()
            .expect("vertex lost its last outgoing edge without ever recording a candidate value");
          self.potential[u as usize] = value;
          self.strategy[u as usize] = Some(target);
          newly_decided.push_back(u);
        }
      }
    }

    changed
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::graph::Owner;

  #[test]
  fn reduce_attracts_vertices_at_infty() {
    let mut game: EnergyGame<i64> = EnergyGame::new(2, 100);
    game.set_owner(0, Owner::Max);
    game.set_owner(1, Owner::Min);
    game.add_edge(0, 5, 1);
    game.add_edge(1, -5, 0);
    let mut teller: PotentialTeller<i64> = PotentialTeller::new(2);

    let round = vec![100, 5];
    let strat = vec![None, None];
    assert!(teller.reduce(&mut game, &round, &strat));
    assert!(teller.is_decided(0));
    assert!(!teller.is_decided(1));
    assert!(game.outs(0).is_empty());
  }

  #[test]
  fn reduce_is_a_fixed_point_once_nothing_reaches_infty() {
    let mut game: EnergyGame<i64> = EnergyGame::new(2, 100);
    game.add_edge(0, 1, 1);
    game.add_edge(1, 1, 0);
    let mut teller: PotentialTeller<i64> = PotentialTeller::new(2);
    assert!(!teller.reduce(&mut game, &[3, 0], &[None, None]));
    assert_eq!(*teller.potential(0), 3);
  }

  /// A decided vertex's last edge vanishing forces its sole predecessor
  /// to a value using the edge weight that is about to be removed,
  /// rather than leaving that predecessor with zero outgoing edges.
  #[test]
  fn losing_the_last_edge_forces_the_predecessor() {
    let mut game: EnergyGame<i64> = EnergyGame::new(2, 1_000);
    game.set_owner(0, Owner::Max);
    game.set_owner(1, Owner::Min);
    game.add_edge(0, 3, 1);
    game.add_edge(1, -5, 0);
    let mut teller: PotentialTeller<i64> = PotentialTeller::new(2);

    // Round result decides vertex 0 to -infty directly; vertex 1's entry
    // is unchanged (still finite) this round.
    let round = vec![-1_000, 0];
    let strat = vec![None, None];
    assert!(teller.reduce(&mut game, &round, &strat));

    assert!(teller.is_decided(0));
    assert!(teller.is_decided(1));
    assert_eq!(*teller.potential(1), -1_000);
    assert_eq!(teller.strategy(1), Some(0));
  }
}
