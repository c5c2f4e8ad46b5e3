/*!

  The PGSolver text format: an optional `parity <max-index>;` header
  followed by one line per vertex, `<id> <priority> <owner> <succ,succ,...>
  ["name"];`, owner `0` for the even/Max player and `1` for the odd/Min
  player. This is the format `pgsolver` and most of the parity-game
  literature's tooling (including the original this crate's algorithm is
  grounded on) reads and writes.

*/

use crate::errors::{Error, Result};
use crate::graph::Owner;
use crate::parity::ParityGame;

pub fn parse(input: &str) -> Result<ParityGame> {
  let mut lines = input.lines().enumerate().map(|(i, l)| (i + 1, l.trim())).filter(|(_, l)| !l.is_empty());

  let mut first = lines.next();
  let mut max_index = None;
  if let Some((_, line)) = first {
    if line.starts_with("parity") {
      let rest = line.trim_start_matches("parity").trim().trim_end_matches(';');
      max_index = rest.parse::<usize>().ok();
      first = lines.next();
    }
  }

  let mut game = ParityGame::new(max_index.map(|m| m + 1).unwrap_or(0));
  let mut max_seen: usize = 0;

  let record = |line_no: usize, line: &str, game: &mut ParityGame, max_seen: &mut usize| -> Result<()> {
    let body = line.trim_end_matches(';').trim();
    let body = match body.find('"') {
      Some(pos) => &body[..pos],
      None => body,
    };
    let mut fields = body.split_whitespace();

    let id: usize = fields
      .next()
      .ok_or_else(|| Error::InputSyntax { line: line_no, message: "missing vertex id".into() })?
      .parse()
      .map_err(|_| Error::InputSyntax { line: line_no, message: "vertex id is not an integer".into() })?;
    let priority: u32 = fields
      .next()
      .ok_or_else(|| Error::InputSyntax { line: line_no, message: "missing priority".into() })?
      .parse()
      .map_err(|_| Error::InputSyntax { line: line_no, message: "priority is not an integer".into() })?;
    let owner_bit: u8 = fields
      .next()
      .ok_or_else(|| Error::InputSyntax { line: line_no, message: "missing owner".into() })?
      .parse()
      .map_err(|_| Error::InputSyntax { line: line_no, message: "owner is not 0 or 1".into() })?;
    let owner = if owner_bit == 0 { Owner::Max } else { Owner::Min };

    let succs_field = fields
      .next()
      .ok_or_else(|| Error::InputSyntax { line: line_no, message: "missing successor list".into() })?;

    *max_seen = (*max_seen).max(id);
    while game.size() <= *max_seen {
      game.add_vertex_placeholder();
    }
    game.set_vertex(id as u32, owner, priority);

    for succ in succs_field.split(',') {
      let succ: usize = succ
        .trim()
        .parse()
        .map_err(|_| Error::InputSyntax { line: line_no, message: format!("bad successor '{succ}'") })?;
      *max_seen = (*max_seen).max(succ);
      while game.size() <= *max_seen {
        game.add_vertex_placeholder();
      }
      game.add_edge(id as u32, succ as u32);
    }
    Ok(())
  };

  if let Some((line_no, line)) = first {
    record(line_no, line, &mut game, &mut max_seen)?;
  }
  for (line_no, line) in lines {
    record(line_no, line, &mut game, &mut max_seen)?;
  }

  game.validate_no_dead_ends()?;
  Ok(game)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_a_two_vertex_cycle() {
    let text = "parity 1;\n0 2 0 1 \"a\";\n1 1 1 0 \"b\";\n";
    let game = parse(text).unwrap();
    assert_eq!(game.size(), 2);
    assert_eq!(game.owner[0], Owner::Max);
    assert_eq!(game.priority[0], 2);
    assert_eq!(game.owner[1], Owner::Min);
    assert_eq!(game.edges.len(), 2);
  }

  #[test]
  fn rejects_a_missing_owner_field() {
    let text = "0 2\n";
    assert!(parse(text).is_err());
  }

  #[test]
  fn rejects_a_vertex_with_no_outgoing_edge() {
    // Vertex 1 is only ever named as a successor, never given its own
    // line, so it is added as an edge-less placeholder.
    let text = "parity 1;\n0 2 0 1;\n";
    match parse(text) {
      Err(Error::InputSemantic { .. }) => {}
      other => panic!("expected InputSemantic, got {other:?}"),
    }
  }
}
