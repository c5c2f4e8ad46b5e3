/*!

  Logging setup for the binaries. The teacher repo's own `log.rs`/`logging.rs`
  reached for a verbosity-gated global and a `static mut` sink; this crate
  keeps the same verbosity-gated tracing but wires it through
  [`env_logger`] instead, so it is safe to call from more than one place
  and composes with `RUST_LOG`.

*/

use log::LevelFilter;

/// Initializes the global logger at `level`, or from `RUST_LOG` if set.
/// Safe to call more than once; later calls are no-ops.
pub fn init(level: LevelFilter) {
  let _ = env_logger::Builder::from_default_env().filter_level(level).is_test(false).try_init();
}

/// Maps a `-v`/`-vv`/`-vvv` repeat-count into a level, matching the
/// teacher's own verbosity-counter convention in its CLI tools.
pub fn level_for_verbosity(count: u8) -> LevelFilter {
  match count {
    0 => LevelFilter::Warn,
    1 => LevelFilter::Info,
    2 => LevelFilter::Debug,
    _ => LevelFilter::Trace,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn verbosity_counts_map_to_increasing_levels() {
    assert_eq!(level_for_verbosity(0), LevelFilter::Warn);
    assert_eq!(level_for_verbosity(1), LevelFilter::Info);
    assert_eq!(level_for_verbosity(2), LevelFilter::Debug);
    assert_eq!(level_for_verbosity(5), LevelFilter::Trace);
  }
}
