// In: src/config.rs

//! The single source of truth for all flagkit configuration.
//!
//! This module defines the `FlaggerConfig` struct, which is designed to be
//! created once at the application boundary (e.g. from a caller's JSON blob
//! or Python keyword arguments) and then passed down through the system via
//! a shared, read-only `Arc<FlaggerConfig>`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

//==================================================================================
// I. Core Configuration Enums & Structs
//==================================================================================

/// The instrument a strategy was tuned for. Strategy-file discovery resolves
/// `<instrument>-default.json` against the configured search directories.
///
/// The facade's no-argument constructor pins this to [`Instrument::Generic`];
/// callers that need another instrument go through [`FlaggerConfig`].
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Instrument {
    /// **Default:** a conservative strategy that assumes nothing about the
    /// observing band or the correlator layout.
    #[default]
    Generic,

    /// The Murchison Widefield Array.
    Mwa,

    /// The LOFAR low-band and high-band antennas.
    Lofar,

    /// The ASKAP dishes.
    Askap,
}

impl Instrument {
    /// The lowercase key used in strategy file names.
    pub fn key(&self) -> &'static str {
        match self {
            Instrument::Generic => "generic",
            Instrument::Mwa => "mwa",
            Instrument::Lofar => "lofar",
            Instrument::Askap => "askap",
        }
    }
}

//==================================================================================
// II. The Unified FlaggerConfig
//==================================================================================

/// The single, unified configuration for a flagger session. This struct is
/// created once and shared throughout the system via an `Arc`.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "snake_case")]
pub struct FlaggerConfig {
    /// The instrument used for default strategy-file discovery.
    #[serde(default)]
    pub instrument: Instrument,

    /// Extra directories searched for strategy files, in order, before the
    /// `FLAGKIT_STRATEGY_DIR` environment variable and the bundled assets.
    #[serde(default)]
    pub strategy_dirs: Vec<PathBuf>,
}

impl Default for FlaggerConfig {
    fn default() -> Self {
        Self {
            instrument: Instrument::default(),
            strategy_dirs: Vec::new(),
        }
    }
}
