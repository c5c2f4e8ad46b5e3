/*!

  The energy-game graph (Section 4.3): vertices with an owner, ordered
  in/out edge lists sharing weight cells through the arena, and the
  `isolate_vertex`/`update_outs` operations the potential teller drives.

*/

use crate::arena::{new_shared_arena, SharedArena};
use crate::weight::{WeightHandle, WeightValue};

pub type VertexId = u32;

#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum Owner {
  Max,
  Min,
}

impl Owner {
  pub fn flip(self) -> Owner {
    match self {
      Owner::Max => Owner::Min,
      Owner::Min => Owner::Max,
    }
  }
}

/// One endpoint of an edge as stored in an adjacency list: the neighbouring
/// vertex and a handle to the (shared) weight cell.
///
/// In `outs[u]`, `neighbor` is the destination and the handle owns the
/// cell. In `ins[v]`, `neighbor` is the source and the handle is a proxy of
/// the same cell (Section 3, Edge invariant).
pub struct Edge<T: WeightValue> {
  pub neighbor: VertexId,
  pub weight: WeightHandle<T>,
}

pub struct EnergyGame<T: WeightValue> {
  arena: SharedArena<T>,
  owner: Vec<Owner>,
  outs: Vec<Vec<Edge<T>>>,
  ins: Vec<Vec<Edge<T>>>,
  infty: T,
  minus_infty: T,
}

impl<T: WeightValue> EnergyGame<T> {
  pub fn new(nverts: usize, infty: T) -> Self {
    let minus_infty = infty.negated();
    EnergyGame {
      arena: new_shared_arena(),
      owner: vec![Owner::Max; nverts],
      outs: (0..nverts).map(|_| Vec::new()).collect(),
      ins: (0..nverts).map(|_| Vec::new()).collect(),
      infty,
      minus_infty,
    }
  }

  pub fn size(&self) -> usize {
    self.owner.len()
  }

  pub fn vertices(&self) -> impl Iterator<Item = VertexId> {
    0..self.owner.len() as VertexId
  }

  pub fn add_vertex(&mut self, owner: Owner) -> VertexId {
    self.owner.push(owner);
    self.outs.push(Vec::new());
    self.ins.push(Vec::new());
    (self.owner.len() - 1) as VertexId
  }

  pub fn set_owner(&mut self, v: VertexId, owner: Owner) {
    self.owner[v as usize] = owner;
  }

  pub fn set_infty(&mut self, infty: T) {
    self.minus_infty = infty.negated();
    self.infty = infty;
  }

  pub fn infty(&self) -> &T {
    &self.infty
  }

  pub fn minus_infty(&self) -> &T {
    &self.minus_infty
  }

  pub fn is_max(&self, v: VertexId) -> bool {
    self.owner[v as usize] == Owner::Max
  }

  pub fn is_min(&self, v: VertexId) -> bool {
    self.owner[v as usize] == Owner::Min
  }

  pub fn owner(&self, v: VertexId) -> Owner {
    self.owner[v as usize]
  }

  pub fn max_vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
    self.vertices().filter(move |&v| self.is_max(v))
  }

  pub fn min_vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
    self.vertices().filter(move |&v| self.is_min(v))
  }

  pub fn outs(&self, v: VertexId) -> &[Edge<T>] {
    &self.outs[v as usize]
  }

  pub fn ins(&self, v: VertexId) -> &[Edge<T>] {
    &self.ins[v as usize]
  }

  /// Rejects a game that has a vertex with no outgoing edge: every FVI
  /// computer round (Section 4.10) assumes each undecided vertex always has
  /// at least one escape, so this must be caught before solving starts
  /// rather than discovered mid-round.
  pub fn validate_no_dead_ends(&self) -> crate::errors::Result<()> {
    for v in self.vertices() {
      if self.outs[v as usize].is_empty() {
        return Err(crate::errors::Error::InputSemantic { message: format!("vertex {v} has no outgoing edge") });
      }
    }
    Ok(())
  }

  /// Adds `u -> v` with weight `w`. The source holds an owning handle; the
  /// mirror entry in the destination's in-list proxies the same cell.
  pub fn add_edge(&mut self, u: VertexId, weight: T, v: VertexId) {
    let owning = WeightHandle::new_owned(&self.arena, weight);
    let proxy = WeightHandle::proxy(&owning);
    self.outs[u as usize].push(Edge { neighbor: v, weight: owning });
    self.ins[v as usize].push(Edge { neighbor: u, weight: proxy });
  }

  /// Applies `f` in place to every outgoing edge weight of `v` (the eager
  /// re-normalisation path, Section 4.3/4.4).
  pub fn update_outs(&self, v: VertexId, mut f: impl FnMut(&Edge<T>)) {
    for edge in &self.outs[v as usize] {
      f(edge);
    }
  }

  /// Removes every edge incident to `v` from its neighbours' adjacency
  /// lists, via swap-remove for amortised O(degree(v)). After this call
  /// `outs(v)` and `ins(v)` are both empty.
  ///
  /// Mirror entries are removed before the owning entries they proxy, so no
  /// dropped proxy ever outlives the owning handle it aliases.
  pub fn isolate_vertex(&mut self, v: VertexId) {
    for edge in &self.outs[v as usize] {
      if edge.neighbor == v {
        continue; // self-loop: the matching in-entry is in ins[v], cleared below.
      }
      let in_list = &mut self.ins[edge.neighbor as usize];
      if let Some(pos) = in_list.iter().position(|e| e.neighbor == v) {
        in_list.swap_remove(pos);
      }
    }
    self.outs[v as usize].clear();

    for edge in &self.ins[v as usize] {
      if edge.neighbor == v {
        continue;
      }
      let out_list = &mut self.outs[edge.neighbor as usize];
      if let Some(pos) = out_list.iter().position(|e| e.neighbor == v) {
        out_list.swap_remove(pos);
      }
    }
    self.ins[v as usize].clear();
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn mirrors_share_the_same_cell() {
    let mut g: EnergyGame<i64> = EnergyGame::new(2, 1_000);
    g.set_owner(0, Owner::Max);
    g.set_owner(1, Owner::Min);
    g.add_edge(0, 3, 1);
    assert_eq!(g.outs(0)[0].weight.value(), 3);
    assert_eq!(g.ins(1)[0].weight.value(), 3);

    g.outs(0)[0].weight.set(9);
    assert_eq!(g.ins(1)[0].weight.value(), 9);
  }

  #[test]
  fn isolate_vertex_clears_both_sides() {
    let mut g: EnergyGame<i64> = EnergyGame::new(3, 1_000);
    g.add_edge(0, 1, 1);
    g.add_edge(1, -1, 0);
    g.add_edge(1, 2, 2);

    g.isolate_vertex(1);

    assert!(g.outs(1).is_empty());
    assert!(g.ins(1).is_empty());
    assert!(g.outs(0).is_empty());
    assert!(g.ins(2).is_empty());
  }
}
