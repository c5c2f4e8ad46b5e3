//! CLI front-end: independently check a strategy (as written by
//! `solve_energy`) against a PGSolver game file, without re-running the
//! solver.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use user_error::UFE;

use nrg_solver::io::{energy, output, pgsolver};
use nrg_solver::logging;
use nrg_solver::verify;
use nrg_solver::weight::FixedWeight;
use nrg_solver::Result;

#[derive(Copy, Clone, Eq, PartialEq, Debug, ValueEnum)]
enum Mode {
  Parity,
  Energy,
}

/// Verify a previously computed strategy against a parity game.
#[derive(Parser, Debug)]
#[command(name = "verify_game", version)]
struct Args {
  /// Path to the PGSolver-format game file.
  game: PathBuf,

  /// Path to the solution file (`solve_energy`'s output).
  solution: PathBuf,

  /// Which winning condition to check against.
  #[arg(long, value_enum, default_value = "parity")]
  mode: Mode,

  #[arg(short, long, action = clap::ArgAction::Count)]
  verbose: u8,
}

fn main() -> ExitCode {
  let args = Args::parse();
  logging::init(logging::level_for_verbosity(args.verbose));

  match run(&args) {
    Ok(()) => {
      println!("OK: the declared strategy is consistent with the winning condition");
      ExitCode::SUCCESS
    }
    Err(err) => {
      err.print();
      ExitCode::FAILURE
    }
  }
}

fn run(args: &Args) -> Result<()> {
  let game_text = fs::read_to_string(&args.game)
    .map_err(|e| nrg_solver::Error::InputSyntax { line: 0, message: format!("reading {}: {e}", args.game.display()) })?;
  let solution_text = fs::read_to_string(&args.solution)
    .map_err(|e| nrg_solver::Error::InputSyntax { line: 0, message: format!("reading {}: {e}", args.solution.display()) })?;

  match args.mode {
    Mode::Parity => {
      let pg = pgsolver::parse(&game_text)?;
      let verdict = output::parse(&solution_text, pg.size())?;
      verify::verify_parity(&pg, &verdict)
    }
    Mode::Energy => {
      let infty: FixedWeight = 1_000_000_000;
      let game = energy::parse(&game_text, infty)?;
      let verdict = output::parse(&solution_text, game.size())?;
      verify::verify_energy(&game, &verdict)
    }
  }
}
