/*!

  The fixed-point value-iteration computer (Section 4.5): the two-phase
  worklist algorithm that computes, for a round over the current undecided
  subgame, the set `F` of vertices whose finite energy is already pinned
  down together with that energy, and marks everything outside `F` (`F^c`)
  as a win for the player currently playing the role of Max — saturating
  those vertices' potential to `+infty` and recording their strategy.

  Grounded on `potential_fvi_swap` / `potential_fvi` in
  `examples/original_source/src/solvers/potential/potential_computers/fvi.hpp`:
  a FIFO "phase 1" that grows `F` along in-edges of Max vertices as soon as
  every one of their non-negative-weight escapes out of `F` is exhausted,
  and a priority-queue "phase 2" that grows `F` by one Min vertex at a
  time, picking the globally cheapest still-available escape into `F`.
  [`AlternatingDriver`] is `fvi_alt.hpp`'s outer loop: run one role, and if
  a full round leaves every undecided vertex unchanged, run the dual role
  once before resuming.

  Throughout, "effective" means: after flipping Max/Min and negating every
  weight and potential if `swap_roles` is set. Since negation distributes
  over the group operations `WeightValue` provides, the whole phase-1/
  phase-2 computation can be expressed against real weights with a single
  `eff()` conversion at the boundary, rather than threading a second sign
  through every comparison.

*/

use std::collections::VecDeque;

use crate::graph::{EnergyGame, Owner, VertexId};
use crate::pqueue::{PriorityQueue, SetMode};
use crate::teller::PotentialTeller;
use crate::weight::WeightValue;

/// One round's output: for every vertex the teller considered undecided on
/// entry, either its (real-space) finite potential for this round, or
/// `+infty`/`-infty` if the round has decided it; and, for vertices this
/// round decided, the positional strategy edge that realises the win.
pub struct RoundResult<T: WeightValue> {
  pub potential: Vec<T>,
  pub strategy: Vec<Option<VertexId>>,
}

pub struct FviComputer {
  /// When set, Max and Min swap roles, and every weight/potential is
  /// negated before use, so the same machinery computes the dual round
  /// (Section 4.5, "Dual/swap").
  pub swap_roles: bool,
}

impl FviComputer {
  pub fn new(swap_roles: bool) -> Self {
    FviComputer { swap_roles }
  }

  fn effective_owner(&self, game: &EnergyGame<impl WeightValue>, v: VertexId) -> Owner {
    let owner = game.owner(v);
    if self.swap_roles {
      owner.flip()
    } else {
      owner
    }
  }

  /// Negates `x` iff this is the swapped instance; the single place the
  /// dual's sign flip happens (Section 4.5, "Dual/swap").
  fn eff<T: WeightValue>(&self, x: &T) -> T {
    if self.swap_roles {
      x.negated()
    } else {
      x.clone()
    }
  }

  fn eff_infty<T: WeightValue>(&self, game: &EnergyGame<T>) -> T {
    if self.swap_roles {
      game.minus_infty().clone()
    } else {
      game.infty().clone()
    }
  }

  /// `w + potential[v] - potential[u]`, saturated to `[-infty, infty]`,
  /// then converted into effective space (Section 4.4, "adjusted weight").
  /// Reads live values straight off the teller; there is no separate
  /// timestamped cache slot (Section 9 allows specialising away the
  /// cache-validity machinery where, as here, recomputation is cheap
  /// relative to a vertex's degree).
  fn adjusted_weight<T: WeightValue>(
    &self,
    game: &EnergyGame<T>,
    teller: &PotentialTeller<T>,
    u: VertexId,
    w: &T,
    v: VertexId,
  ) -> T {
    let mut raw = w.clone();
    raw.add_in_place(teller.potential(v));
    raw.sub_in_place(teller.potential(u));
    if raw > *game.infty() {
      raw = game.infty().clone();
    } else if raw < *game.minus_infty() {
      raw = game.minus_infty().clone();
    }
    self.eff(&raw)
  }

  /// Runs one full round: determines `F`, grows it to a local fixed
  /// point, and finalises everything left over as a win for the
  /// currently-Max-effective player. Only vertices `teller` considers
  /// undecided are touched; `result.potential`/`result.strategy` are only
  /// meaningful at those indices.
  pub fn compute<T: WeightValue>(&self, game: &EnergyGame<T>, teller: &PotentialTeller<T>) -> RoundResult<T> {
    let n = game.size();
    let zero = T::zero();
    let mut in_f = vec![false; n];
    let mut potential: Vec<T> = (0..n).map(|v| teller.potential(v as VertexId).clone()).collect();
    let mut strategy: Vec<Option<VertexId>> = vec![None; n];

    // delta_eff[v]: v's effective finite value once grown into F. Kept
    // separately from `potential` (real space) so phase-1/phase-2 can
    // compare and combine in effective space without re-deriving sign
    // flips at every step; translated back into `potential` on growth.
    let mut delta_eff: Vec<T> = vec![zero.clone(); n];

    let mut fifo: VecDeque<VertexId> = VecDeque::new();
    let mut counter: Vec<usize> = vec![0; n];

    let mut pq2: PriorityQueue<T> = PriorityQueue::new();
    let mut phase2_weight: Vec<Option<T>> = vec![None; n];
    let mut phase2_target: Vec<Option<VertexId>> = vec![None; n];

    // --- Initialisation (Section 4.5, "Initialisation") ---
    for v in teller.undecided() {
      let outs = game.outs(v);
      debug_assert!(!outs.is_empty(), "vertex {v} has no outgoing edge; input validation should have rejected this");
      let owner = self.effective_owner(game, v);
      let signs: Vec<T> = outs.iter().map(|e| self.adjusted_weight(game, teller, v, &e.weight.value(), e.neighbor)).collect();
      let v_in_f = match owner {
        Owner::Min => signs.iter().all(|w| *w < zero),
        Owner::Max => signs.iter().any(|w| *w < zero),
      };
      if v_in_f {
        in_f[v as usize] = true;
        delta_eff[v as usize] = self.eff(teller.potential(v));
      }
    }

    for v in teller.undecided() {
      if in_f[v as usize] || self.effective_owner(game, v) != Owner::Max {
        continue;
      }
      let count = game
        .outs(v)
        .iter()
        .filter(|e| {
          let w = self.adjusted_weight(game, teller, v, &e.weight.value(), e.neighbor);
          w >= zero && !in_f[e.neighbor as usize]
        })
        .count();
      counter[v as usize] = count;
      if count == 0 {
        fifo.push_back(v);
      }
    }

    for v in game.vertices() {
      if !in_f[v as usize] {
        continue;
      }
      for edge in game.ins(v) {
        let u = edge.neighbor;
        if teller.is_decided(u) || in_f[u as usize] {
          continue;
        }
        if self.effective_owner(game, u) != Owner::Min {
          continue;
        }
        let w = self.adjusted_weight(game, teller, u, &edge.weight.value(), v);
        Self::offer_phase2(&mut pq2, &mut phase2_weight, &mut phase2_target, u, w, v);
      }
    }

    // --- Main loop: phase 1 / phase 2 (Section 4.5, "Main loop") ---
    loop {
      while let Some(v) = fifo.pop_front() {
        if in_f[v as usize] {
          continue;
        }
        let mut best: Option<T> = None;
        let mut best_edge = None;
        for e in game.outs(v) {
          if !in_f[e.neighbor as usize] {
            continue;
          }
          let w = self.adjusted_weight(game, teller, v, &e.weight.value(), e.neighbor);
          if !(w <= zero) {
            continue;
          }
          let mut candidate = w.clone();
          candidate.add_in_place(&delta_eff[e.neighbor as usize]);
          let better = match &best {
            None => true,
            Some(b) => candidate > *b,
          };
          if better {
            best = Some(candidate);
            best_edge = Some(e.neighbor);
          }
        }
        let value = best.unwrap_or_else(|| self.eff(game.minus_infty()));
        delta_eff[v as usize] = value;
        strategy[v as usize] = best_edge;
        in_f[v as usize] = true;
        self.grow_predecessors(game, teller, v, &delta_eff, &mut in_f, &mut counter, &mut fifo, &mut pq2, &mut phase2_weight, &mut phase2_target);
      }

      let mut grew = false;
      while let Some((u, w)) = pq2.pop() {
        if in_f[u as usize] {
          continue;
        }
        delta_eff[u as usize] = w;
        strategy[u as usize] = phase2_target[u as usize];
        in_f[u as usize] = true;
        grew = true;
        self.grow_predecessors(game, teller, u, &delta_eff, &mut in_f, &mut counter, &mut fifo, &mut pq2, &mut phase2_weight, &mut phase2_target);
        break;
      }
      if !grew {
        break;
      }
    }

    for v in teller.undecided() {
      if in_f[v as usize] {
        potential[v as usize] = self.eff(&delta_eff[v as usize]);
      }
    }

    // --- Finalisation (Fc, "the Max wins region") ---
    let fc: Vec<VertexId> = teller.undecided().filter(|&v| !in_f[v as usize]).collect();
    for &v in &fc {
      if self.effective_owner(game, v) == Owner::Min {
        let dst = game.outs(v).iter().find_map(|e| {
          let w = self.adjusted_weight(game, teller, v, &e.weight.value(), e.neighbor);
          (w >= zero && !in_f[e.neighbor as usize]).then_some(e.neighbor)
        });
        strategy[v as usize] = dst;
      }
    }

    let eff_infty = self.eff_infty(game);
    let mut is_infty = vec![false; n];
    let mut worklist: VecDeque<VertexId> = VecDeque::new();
    for &v in &fc {
      is_infty[v as usize] = true;
      potential[v as usize] = eff_infty.clone();
      worklist.push_back(v);
    }

    // Backward attractor over Fc: a Max vertex reaching any infty vertex
    // is infty too; a Min vertex is infty only once every one of its
    // outgoing edges targets an infty vertex (any edge into the original
    // F is a permanent, never-revoked escape, so it never fires here).
    let mut remaining: Vec<Option<usize>> = vec![None; n];
    while let Some(v) = worklist.pop_front() {
      for e in game.ins(v) {
        let u = e.neighbor;
        if teller.is_decided(u) || in_f[u as usize] || is_infty[u as usize] {
          continue;
        }
        match self.effective_owner(game, u) {
          Owner::Max => {
            is_infty[u as usize] = true;
            potential[u as usize] = eff_infty.clone();
            strategy[u as usize] = Some(v);
            worklist.push_back(u);
          }
          Owner::Min => {
            let left = remaining[u as usize].get_or_insert_with(|| game.outs(u).len());
            *left -= 1;
            if *left == 0 {
              is_infty[u as usize] = true;
              potential[u as usize] = eff_infty.clone();
              worklist.push_back(u);
            }
          }
        }
      }
    }

    RoundResult { potential, strategy }
  }

  /// Keeps `set`'s priority at the minimum it has been offered so far,
  /// also remembering which target edge realised it (Section 4.5, "push
  /// (u, adjusted_weight(u,v)) onto the phase-2 priority queue keyed by
  /// smallest adjusted weight").
  fn offer_phase2<T: WeightValue>(
    pq2: &mut PriorityQueue<T>,
    phase2_weight: &mut [Option<T>],
    phase2_target: &mut [Option<VertexId>],
    u: VertexId,
    w: T,
    target: VertexId,
  ) {
    let better = match &phase2_weight[u as usize] {
      None => true,
      Some(cur) => w < *cur,
    };
    if better {
      phase2_weight[u as usize] = Some(w.clone());
      phase2_target[u as usize] = Some(target);
      pq2.set(u, w, SetMode::Always);
    }
  }

  /// Shared by both phase-1 and phase-2 growth (Section 4.5's "update
  /// predecessors" step, repeated identically after each single-vertex
  /// growth): re-offers every in-neighbour of the vertex that just
  /// entered `F` to the appropriate queue.
  #[allow(clippy::too_many_arguments)]
  fn grow_predecessors<T: WeightValue>(
    &self,
    game: &EnergyGame<T>,
    teller: &PotentialTeller<T>,
    v: VertexId,
    delta_eff: &[T],
    in_f: &mut [bool],
    counter: &mut [usize],
    fifo: &mut VecDeque<VertexId>,
    pq2: &mut PriorityQueue<T>,
    phase2_weight: &mut [Option<T>],
    phase2_target: &mut [Option<VertexId>],
  ) {
    for e in game.ins(v) {
      let u = e.neighbor;
      if teller.is_decided(u) || in_f[u as usize] {
        continue;
      }
      let w = self.adjusted_weight(game, teller, u, &e.weight.value(), v);
      match self.effective_owner(game, u) {
        Owner::Min => {
          let mut candidate = w;
          candidate.add_in_place(&delta_eff[v as usize]);
          Self::offer_phase2(pq2, phase2_weight, phase2_target, u, candidate, v);
        }
        Owner::Max => {
          if w <= T::zero() {
            counter[u as usize] -= 1;
            if counter[u as usize] == 0 {
              fifo.push_back(u);
            }
          }
        }
      }
    }
  }
}

/// The alternating driver (Section 4.5/4.9): runs one role's computer to a
/// local fixed point, folds its output into the teller, and — whenever a
/// full round leaves the undecided set completely unchanged — runs the
/// dual role once before giving up, so a subgame making progress on only
/// one side still reaches quiescence rather than looping forever between
/// two all-zero rounds.
pub struct AlternatingDriver {
  primary: FviComputer,
  dual: FviComputer,
}

impl AlternatingDriver {
  pub fn new() -> Self {
    AlternatingDriver { primary: FviComputer::new(false), dual: FviComputer::new(true) }
  }

  /// Runs the full teller/computer loop to a fixed point (Section 4.9's
  /// driver state machine). Returns the positional strategy for every
  /// vertex: the unswapped run's decisions are a real Max vertex's
  /// strategy, the swapped run's are a real Min vertex's (Section 4.5,
  /// "Strategy reporting"); a vertex the teller finalises itself, because
  /// the last of its edges was pruned out from under it, keeps whatever
  /// strategy the teller recorded for it regardless of which run is active.
  pub fn solve<T: WeightValue>(&self, game: &mut EnergyGame<T>, teller: &mut PotentialTeller<T>) -> Vec<Option<VertexId>> {
    let mut use_dual = false;

    loop {
      if teller.undecided_count() == 0 {
        break;
      }

      let computer = if use_dual { &self.dual } else { &self.primary };
      let round = computer.compute(game, teller);

      // Only the run that actually speaks for a vertex's real owner may
      // hand it a strategy; the other run's guess, if any, is discarded.
      let mut round_strategy = round.strategy;
      for v in game.vertices() {
        let wants_this_run = if use_dual { game.owner(v) == Owner::Min } else { game.owner(v) == Owner::Max };
        if !wants_this_run {
          round_strategy[v as usize] = None;
        }
      }

      let changed = teller.reduce(game, &round.potential, &round_strategy);

      if changed {
        use_dual = false;
        continue;
      }

      if use_dual {
        break;
      }
      use_dual = true;
    }

    (0..game.size() as VertexId).map(|v| teller.strategy(v)).collect()
  }
}

impl Default for AlternatingDriver {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::graph::Owner;

  /// Section 8, scenario 1: Max owns 0, Min owns 1; `0->1` weight `+3`,
  /// `1->0` weight `-5`. Net `-2` per cycle: Min wins both vertices, and
  /// Min's strategy at 1 is the only edge it has, to 0.
  #[test]
  fn two_vertex_alternating_cycle_is_a_min_win() {
    let mut game: EnergyGame<i64> = EnergyGame::new(2, 1_000);
    game.set_owner(0, Owner::Max);
    game.set_owner(1, Owner::Min);
    game.add_edge(0, 3, 1);
    game.add_edge(1, -5, 0);

    let mut teller: PotentialTeller<i64> = PotentialTeller::new(2);
    let driver = AlternatingDriver::new();
    let strategy = driver.solve(&mut game, &mut teller);

    assert_eq!(teller.undecided_count(), 0);
    assert_eq!(*teller.potential(0), -1_000);
    assert_eq!(*teller.potential(1), -1_000);
    assert_eq!(strategy[1], Some(0));
  }

  /// Section 8, scenario 2: Max escapes to a positive cycle at 1; Min is
  /// trapped in a `-1` self-loop at 2.
  #[test]
  fn max_escape_gadget() {
    let mut game: EnergyGame<i64> = EnergyGame::new(3, 1_000);
    game.set_owner(0, Owner::Max);
    game.set_owner(1, Owner::Min);
    game.set_owner(2, Owner::Min);
    game.add_edge(0, 1, 1);
    game.add_edge(0, -10, 2);
    game.add_edge(1, -1, 0);
    game.add_edge(2, -1, 2);

    let mut teller: PotentialTeller<i64> = PotentialTeller::new(3);
    let driver = AlternatingDriver::new();
    let strategy = driver.solve(&mut game, &mut teller);

    assert_eq!(*teller.potential(0), 1_000);
    assert_eq!(*teller.potential(1), 1_000);
    assert_eq!(*teller.potential(2), -1_000);
    assert_eq!(strategy[0], Some(1));
  }

  /// Section 8, "Boundary behaviours": a single vertex with a zero-weight
  /// self-loop has no real escape either way, so it must fall straight
  /// into `Fc` and be decided in the very first round rather than loop.
  #[test]
  fn single_vertex_zero_self_loop_terminates() {
    let mut game: EnergyGame<i64> = EnergyGame::new(1, 50);
    game.set_owner(0, Owner::Max);
    game.add_edge(0, 0, 0);

    let mut teller: PotentialTeller<i64> = PotentialTeller::new(1);
    let driver = AlternatingDriver::new();
    driver.solve(&mut game, &mut teller);
    assert_eq!(teller.undecided_count(), 0);
    assert_eq!(*teller.potential(0), 50);
  }

  #[test]
  fn running_twice_is_deterministic() {
    let build = || {
      let mut game: EnergyGame<i64> = EnergyGame::new(3, 1_000);
      game.set_owner(0, Owner::Max);
      game.set_owner(1, Owner::Min);
      game.set_owner(2, Owner::Min);
      game.add_edge(0, 1, 1);
      game.add_edge(0, -10, 2);
      game.add_edge(1, -1, 0);
      game.add_edge(2, -1, 2);
      game
    };
    let mut g1 = build();
    let mut t1: PotentialTeller<i64> = PotentialTeller::new(3);
    let s1 = AlternatingDriver::new().solve(&mut g1, &mut t1);

    let mut g2 = build();
    let mut t2: PotentialTeller<i64> = PotentialTeller::new(3);
    let s2 = AlternatingDriver::new().solve(&mut g2, &mut t2);

    for v in 0..3 {
      assert_eq!(*t1.potential(v), *t2.potential(v));
    }
    assert_eq!(s1[0], s2[0]);
  }
}
