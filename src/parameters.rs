/*!

  JSON-backed parameter loading, for batch/scripted runs that want to pin
  down a [`crate::config::Config`] from a file rather than flags. Uses the
  `json` crate directly rather than pulling in a derive-based deserializer
  for four fields.

*/

use crate::config::{Config, VerifierMode, WeightDomain};
use crate::errors::{Error, Result};

pub fn load(text: &str) -> Result<Config> {
  let parsed = json::parse(text).map_err(|e| Error::InputSyntax { line: 0, message: format!("invalid parameters file: {e}") })?;

  let mut config = Config::default();

  if let Some(domain) = parsed["weight_domain"].as_str() {
    config.weight_domain = match domain {
      "fixed" => WeightDomain::Fixed,
      "big" => WeightDomain::Big,
      "dense" => WeightDomain::Dense,
      "sparse" => WeightDomain::Sparse,
      other => {
        return Err(Error::InputSemantic { message: format!("unknown weight_domain '{other}'") });
      }
    };
  }

  if let Some(mode) = parsed["verifier_mode"].as_str() {
    config.verifier_mode = match mode {
      "parity" => VerifierMode::Parity,
      "energy" => VerifierMode::Energy,
      other => {
        return Err(Error::InputSemantic { message: format!("unknown verifier_mode '{other}'") });
      }
    };
  }

  if let Some(verify) = parsed["verify"].as_bool() {
    config.verify = verify;
  }

  if let Some(base) = parsed["base"].as_i64() {
    config.base = base;
  }

  Ok(config)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn loads_a_complete_parameters_file() {
    let text = r#"{"weight_domain": "dense", "verifier_mode": "energy", "verify": false, "base": 3}"#;
    let config = load(text).unwrap();
    assert_eq!(config.weight_domain, WeightDomain::Dense);
    assert_eq!(config.verifier_mode, VerifierMode::Energy);
    assert!(!config.verify);
    assert_eq!(config.base, 3);
  }

  #[test]
  fn defaults_fields_left_unspecified() {
    let config = load("{}").unwrap();
    assert_eq!(config.weight_domain, WeightDomain::Big);
  }

  #[test]
  fn rejects_an_unknown_weight_domain() {
    let text = r#"{"weight_domain": "quaternion"}"#;
    assert!(load(text).is_err());
  }
}
