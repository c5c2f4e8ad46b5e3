/*!

  A solver for two-player infinite-duration energy games, and, by
  reduction, parity games, built around fixed-point value iteration
  (FVI): repeatedly relax a per-vertex potential towards the value its
  owner prefers, attract out any vertex whose potential saturates at
  `infty`, and recurse on what remains until nothing does.

  The pieces:

  - [`arena`] / [`weight`] — the weight algebra and the arena-backed
    owned/proxy handle that lets edge weights be shared between a
    vertex's in- and out-adjacency lists without duplication.
  - [`graph`] — the energy game itself: vertices, owners, and edges.
  - [`teller`] — tracks which vertices are decided and drives the
    attract-and-shrink outer loop.
  - [`pqueue`] / [`fvi`] — the value-iteration computer and its
    alternating (dual-instance) driver.
  - [`parity`] — the parity-to-energy reduction.
  - [`verify`] — an independent checker for a computed strategy.
  - [`io`] — the PGSolver and `energy` text formats, and the verdict
    writer.
  - [`config`] / [`parameters`] — solver tunables and their JSON loader.
  - [`errors`] — the crate's error type.
  - [`logging`] — verbosity-gated `log`/`env_logger` setup shared by the
    binaries.

*/

pub mod arena;
pub mod config;
pub mod errors;
pub mod fvi;
pub mod graph;
pub mod io;
pub mod logging;
pub mod parameters;
pub mod parity;
pub mod pqueue;
pub mod teller;
pub mod verify;
pub mod weight;

pub use errors::{Error, Result};
