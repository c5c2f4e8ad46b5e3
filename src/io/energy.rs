/*!

  The solver's native `energy` text format: an optional `energy
  <max-index>;` header followed by one line per vertex, `<id> <owner>
  <succ>,<weight>,<succ>,<weight>,...;`, owner `0` for Max and `1` for
  Min. Unlike PGSolver format, edges carry integer weights directly
  rather than deriving them from a priority, since this is the format the
  energy-game solver itself reads and writes (Section 6), grounded on
  the parsing loop in `examples/original_source/src/tools/solve-energy.cpp`
  (which reads each comma-separated field as `<dest> <weight>`,
  destination first).

*/

use crate::errors::{Error, Result};
use crate::graph::{EnergyGame, Owner};
use crate::weight::FixedWeight;

pub fn parse(input: &str, infty: FixedWeight) -> Result<EnergyGame<FixedWeight>> {
  let mut lines = input.lines().enumerate().map(|(i, l)| (i + 1, l.trim())).filter(|(_, l)| !l.is_empty());

  let mut first = lines.next();
  let mut max_index = None;
  if let Some((_, line)) = first {
    if line.starts_with("energy") {
      let rest = line.trim_start_matches("energy").trim().trim_end_matches(';');
      max_index = rest.parse::<usize>().ok();
      first = lines.next();
    }
  }

  let mut game: EnergyGame<FixedWeight> = EnergyGame::new(max_index.map(|m| m + 1).unwrap_or(0), infty);

  let mut record = |line_no: usize, line: &str, game: &mut EnergyGame<FixedWeight>| -> Result<()> {
    let body = line.trim_end_matches(';');
    let mut fields = body.split_whitespace();

    let id: usize = fields
      .next()
      .ok_or_else(|| Error::InputSyntax { line: line_no, message: "missing vertex id".into() })?
      .parse()
      .map_err(|_| Error::InputSyntax { line: line_no, message: "vertex id is not an integer".into() })?;
    let owner_bit: u8 = fields
      .next()
      .ok_or_else(|| Error::InputSyntax { line: line_no, message: "missing owner".into() })?
      .parse()
      .map_err(|_| Error::InputSyntax { line: line_no, message: "owner is not 0 or 1".into() })?;
    let owner = if owner_bit == 0 { Owner::Max } else { Owner::Min };

    while game.size() <= id {
      game.add_vertex(Owner::Max);
    }
    game.set_owner(id as u32, owner);

    if let Some(edges_field) = fields.next() {
      let mut tokens = edges_field.split(',').map(str::trim).filter(|t| !t.is_empty());
      while let Some(succ_str) = tokens.next() {
        let weight_str = tokens
          .next()
          .ok_or_else(|| Error::InputSyntax { line: line_no, message: format!("edge '{succ_str}' is missing its weight") })?;
        let succ: usize = succ_str
          .parse()
          .map_err(|_| Error::InputSyntax { line: line_no, message: format!("bad successor '{succ_str}'") })?;
        let weight: FixedWeight = weight_str
          .parse()
          .map_err(|_| Error::InputSyntax { line: line_no, message: format!("bad edge weight '{weight_str}'") })?;
        while game.size() <= succ {
          game.add_vertex(Owner::Max);
        }
        game.add_edge(id as u32, weight, succ as u32);
      }
    }
    Ok(())
  };

  if let Some((line_no, line)) = first {
    record(line_no, line, &mut game)?;
  }
  for (line_no, line) in lines {
    record(line_no, line, &mut game)?;
  }

  game.validate_no_dead_ends()?;
  Ok(game)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_weighted_edges() {
    let text = "energy 1;\n0 0 1,3,1,-2;\n1 1 0,0;\n";
    let game = parse(text, 1_000).unwrap();
    assert_eq!(game.size(), 2);
    assert_eq!(game.outs(0).len(), 2);
    assert_eq!(game.outs(0)[0].weight.value(), 3);
    assert_eq!(game.outs(0)[1].weight.value(), -2);
  }

  #[test]
  fn rejects_a_vertex_with_no_outgoing_edge() {
    let text = "energy 1;\n0 0 1,3;\n1 1;\n";
    match parse(text, 1_000) {
      Err(Error::InputSemantic { .. }) => {}
      other => panic!("expected InputSemantic, got {other:?}"),
    }
  }
}
