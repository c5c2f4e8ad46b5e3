/*!

  The verdict writer (Section 6): one line per vertex, `<id> <winner>
  <strategy-destination|-1>`, `winner` being `0` for Max and `1` for Min —
  the same convention PGSolver-format solvers conventionally emit, so a
  solution file can be diffed against other tools' output.

*/

use std::fmt::Write as _;

use crate::errors::{Error, Result};
use crate::graph::{Owner, VertexId};
use crate::verify::Verdict;

/// Reads back a verdict file written by [`write`], used by `verify_game`
/// to check a strategy computed (and saved) by a previous run.
pub fn parse(text: &str, nverts: usize) -> Result<Verdict> {
  let mut winner = vec![Owner::Max; nverts];
  let mut strategy = vec![None; nverts];

  for (line_no, line) in text.lines().enumerate().map(|(i, l)| (i + 1, l.trim())).filter(|(_, l)| !l.is_empty()) {
    let mut fields = line.split_whitespace();
    let id: usize = fields
      .next()
      .ok_or_else(|| Error::InputSyntax { line: line_no, message: "missing vertex id".into() })?
      .parse()
      .map_err(|_| Error::InputSyntax { line: line_no, message: "vertex id is not an integer".into() })?;
    let winner_bit: u8 = fields
      .next()
      .ok_or_else(|| Error::InputSyntax { line: line_no, message: "missing winner".into() })?
      .parse()
      .map_err(|_| Error::InputSyntax { line: line_no, message: "winner is not 0 or 1".into() })?;
    let dst: i64 = fields
      .next()
      .ok_or_else(|| Error::InputSyntax { line: line_no, message: "missing strategy destination".into() })?
      .parse()
      .map_err(|_| Error::InputSyntax { line: line_no, message: "strategy destination is not an integer".into() })?;

    if id >= nverts {
      return Err(Error::InputSemantic { message: format!("vertex id {id} is out of range for a game with {nverts} vertices") });
    }
    winner[id] = if winner_bit == 0 { Owner::Max } else { Owner::Min };
    strategy[id] = if dst < 0 { None } else { Some(dst as VertexId) };
  }

  Ok(Verdict { winner, strategy })
}

pub fn write(verdict: &Verdict) -> String {
  let mut out = String::new();
  for (v, winner) in verdict.winner.iter().enumerate() {
    let winner_bit = match winner {
      Owner::Max => 0,
      Owner::Min => 1,
    };
    let dst = verdict.strategy[v].map(|d| d as i64).unwrap_or(-1);
    let _ = writeln!(out, "{v} {winner_bit} {dst}");
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn formats_one_line_per_vertex() {
    let verdict = Verdict { winner: vec![Owner::Max, Owner::Min], strategy: vec![Some(1), None] };
    let text = write(&verdict);
    assert_eq!(text, "0 0 1\n1 1 -1\n");
  }
}
