/*!

  Solver configuration: the handful of choices that change how a game is
  solved rather than what it means (Section 6's "ambient" surface — the
  weight domain, the verifier mode, trace verbosity). Distinct from
  [`crate::parameters`], which loads the same fields from a JSON file for
  scripted/batch use.

*/

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum WeightDomain {
  Fixed,
  Big,
  Dense,
  Sparse,
}

impl Default for WeightDomain {
  fn default() -> Self {
    WeightDomain::Big
  }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum VerifierMode {
  Parity,
  Energy,
}

impl Default for VerifierMode {
  fn default() -> Self {
    VerifierMode::Parity
  }
}

#[derive(Clone, Debug)]
pub struct Config {
  pub weight_domain: WeightDomain,
  pub verifier_mode: VerifierMode,
  pub verify: bool,
  pub base: i64,
}

impl Default for Config {
  fn default() -> Self {
    Config { weight_domain: WeightDomain::default(), verifier_mode: VerifierMode::default(), verify: true, base: 2 }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_favor_the_safe_weight_domain() {
    let cfg = Config::default();
    assert_eq!(cfg.weight_domain, WeightDomain::Big);
    assert!(cfg.verify);
  }
}
