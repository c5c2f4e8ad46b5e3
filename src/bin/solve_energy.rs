//! CLI front-end: read a PGSolver or `energy` file, reduce parity games to
//! energy games, solve with fixed-point value iteration, optionally verify,
//! and print the per-vertex verdict.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use log::info;
use user_error::UFE;

use nrg_solver::config::{Config, VerifierMode, WeightDomain};
use nrg_solver::fvi::AlternatingDriver;
use nrg_solver::graph::EnergyGame;
use nrg_solver::io::{energy, output, pgsolver};
use nrg_solver::logging;
use nrg_solver::parity::{BigBasis, DenseBasis, FixedBasis, ParityGame, SparseBasis};
use nrg_solver::teller::PotentialTeller;
use nrg_solver::verify::{self, recover_verdict};
use nrg_solver::weight::{BigWeight, DenseWeight, FixedWeight, SparseWeight, WeightValue};
use nrg_solver::Result;

#[derive(Copy, Clone, Eq, PartialEq, Debug, ValueEnum)]
enum InputFormat {
  Pgsolver,
  Energy,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, ValueEnum)]
enum WeightDomainArg {
  Fixed,
  Big,
  Dense,
  Sparse,
}

impl From<WeightDomainArg> for WeightDomain {
  fn from(arg: WeightDomainArg) -> Self {
    match arg {
      WeightDomainArg::Fixed => WeightDomain::Fixed,
      WeightDomainArg::Big => WeightDomain::Big,
      WeightDomainArg::Dense => WeightDomain::Dense,
      WeightDomainArg::Sparse => WeightDomain::Sparse,
    }
  }
}

/// Solve a two-player energy or parity game by fixed-point value iteration.
#[derive(Parser, Debug)]
#[command(name = "solve_energy", version)]
struct Args {
  /// Path to the input game file.
  input: PathBuf,

  /// Input format.
  #[arg(long, value_enum, default_value = "pgsolver")]
  format: InputFormat,

  /// Weight domain to solve in. Only meaningful with `--format pgsolver`;
  /// `energy` format already carries fixed-width weights.
  #[arg(long, value_enum, default_value = "big")]
  weight_domain: WeightDomainArg,

  /// Base `n` used by the parity reduction's `(-n)^p` / `n^(p_max+1)` formulas.
  #[arg(long, default_value_t = 2)]
  base: i64,

  /// Skip independent verification of the computed strategy.
  #[arg(long)]
  no_verify: bool,

  /// Increase log verbosity; repeat for more (-v, -vv, -vvv).
  #[arg(short, long, action = clap::ArgAction::Count)]
  verbose: u8,
}

fn main() -> ExitCode {
  let args = Args::parse();
  logging::init(logging::level_for_verbosity(args.verbose));

  match run(&args) {
    Ok(report) => {
      print!("{report}");
      ExitCode::SUCCESS
    }
    Err(err) => {
      err.print();
      ExitCode::FAILURE
    }
  }
}

fn run(args: &Args) -> Result<String> {
  let text = fs::read_to_string(&args.input)
    .map_err(|e| nrg_solver::Error::InputSyntax { line: 0, message: format!("reading {}: {e}", args.input.display()) })?;

  let mut config = Config::default();
  config.weight_domain = args.weight_domain.into();
  config.base = args.base;
  config.verify = !args.no_verify;
  config.verifier_mode = VerifierMode::Parity;

  match args.format {
    InputFormat::Pgsolver => {
      let pg = pgsolver::parse(&text)?;
      solve_parity(&pg, &config)
    }
    InputFormat::Energy => {
      // The `energy` format carries concrete weights already, so `infty`
      // is just a bound comfortably above anything a real game's weights
      // could sum to, not derived from a priority range.
      let infty: FixedWeight = 1_000_000_000;
      let game = energy::parse(&text, infty)?;
      solve_energy_direct(game)
    }
  }
}

fn solve_parity(pg: &ParityGame, config: &Config) -> Result<String> {
  info!("solving a parity game with {} vertices, max priority {}", pg.size(), pg.max_priority());
  let max_priority = pg.max_priority();

  match config.weight_domain {
    WeightDomain::Fixed => {
      let basis = FixedBasis { n: config.base };
      let infty = FixedBasis::infty(config.base, max_priority);
      let game = pg.to_energy_game(basis, infty);
      report(pg, game, config.verify)
    }
    WeightDomain::Big => {
      let basis = BigBasis { n: config.base };
      let infty = BigBasis::infty(config.base, max_priority);
      let game = pg.to_energy_game(basis, infty);
      report(pg, game, config.verify)
    }
    WeightDomain::Dense => {
      let basis = DenseBasis { max_priority };
      let infty = DenseWeight::infinity(max_priority, pg.edges.len());
      let game = pg.to_energy_game(basis, infty);
      report(pg, game, config.verify)
    }
    WeightDomain::Sparse => {
      let basis = SparseBasis;
      let infty = SparseWeight::infinity(max_priority, pg.edges.len());
      let game = pg.to_energy_game(basis, infty);
      report(pg, game, config.verify)
    }
  }
}

fn report<T: WeightValue>(pg: &ParityGame, mut game: EnergyGame<T>, should_verify: bool) -> Result<String> {
  let mut teller: PotentialTeller<T> = PotentialTeller::new(game.size());
  let driver = AlternatingDriver::new();
  let strategy = driver.solve(&mut game, &mut teller);

  let verdict = recover_verdict(&game, &teller, &strategy);
  if should_verify {
    verify::verify_parity(pg, &verdict)?;
  }
  Ok(output::write(&verdict))
}

fn solve_energy_direct(mut game: EnergyGame<FixedWeight>) -> Result<String> {
  let mut teller: PotentialTeller<FixedWeight> = PotentialTeller::new(game.size());
  let driver = AlternatingDriver::new();
  let strategy = driver.solve(&mut game, &mut teller);
  let verdict = recover_verdict(&game, &teller, &strategy);
  Ok(output::write(&verdict))
}
