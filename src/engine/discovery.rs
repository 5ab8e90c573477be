// In: src/engine/discovery.rs

//! Strategy-file discovery.
//!
//! Resolves `<instrument>-default.json` against, in order: the directories
//! named in the session config, the `FLAGKIT_STRATEGY_DIR` environment
//! variable, and the strategy assets bundled with the crate. The first
//! existing file wins; nothing is ever created or rewritten here.

use log::trace;
use std::env;
use std::path::PathBuf;

use crate::config::Instrument;
use crate::error::FlagError;

/// Environment variable naming an extra strategy directory.
pub const STRATEGY_DIR_ENV: &str = "FLAGKIT_STRATEGY_DIR";

/// The strategy assets shipped in the repository.
const BUNDLED_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/strategies");

pub fn find_strategy_file(
    instrument: Instrument,
    extra_dirs: &[PathBuf],
) -> Result<PathBuf, FlagError> {
    let file_name = format!("{}-default.json", instrument.key());

    let mut dirs: Vec<PathBuf> = extra_dirs.to_vec();
    if let Ok(env_dir) = env::var(STRATEGY_DIR_ENV) {
        if !env_dir.is_empty() {
            dirs.push(PathBuf::from(env_dir));
        }
    }
    dirs.push(PathBuf::from(BUNDLED_DIR));

    for dir in &dirs {
        let candidate = dir.join(&file_name);
        trace!("strategy discovery: trying {}", candidate.display());
        if candidate.is_file() {
            return Ok(candidate);
        }
    }

    Err(FlagError::StrategyNotFound(instrument.key().to_string()))
}

/// True when the bundled assets contain a default for `instrument`. Used by
/// tests to decide what discovery should find without duplicating the
/// search logic.
#[cfg(test)]
pub fn bundled_default_exists(instrument: Instrument) -> bool {
    PathBuf::from(BUNDLED_DIR)
        .join(format!("{}-default.json", instrument.key()))
        .is_file()
}
