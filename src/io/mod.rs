/*!

  Text formats (Section 6): the PGSolver parity-game format, the
  solver's own `energy` format for energy games, and the verdict writer
  both binaries share.

*/

pub mod energy;
pub mod output;
pub mod pgsolver;
