// In: src/bridge/flagger.rs

use std::path::Path;
use std::sync::Arc;

use log::debug;

use crate::config::{FlaggerConfig, Instrument};
use crate::engine::discovery;
use crate::engine::image::ImageBuf;
use crate::engine::mask::MaskBuf;
use crate::engine::strategy::CompiledStrategy;
use crate::error::FlagError;

use super::{FlagMask, ImageSet, Strategy};

/// The top-level facade: allocates handles, discovers and loads strategies.
///
/// A facade owns one session config and nothing else; every call is
/// independent. Construct it with [`Flagger::new`] for the built-in
/// defaults or [`Flagger::with_config`] to choose the instrument and the
/// strategy search directories.
#[derive(Debug, Clone)]
pub struct Flagger {
    config: Arc<FlaggerConfig>,
}

impl Flagger {
    /// A facade with the default config: the generic instrument, no extra
    /// strategy directories.
    pub fn new() -> Self {
        Self::with_config(FlaggerConfig::default())
    }

    /// A facade with an explicit session config.
    pub fn with_config(config: FlaggerConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Library version as `(major, minor, sub_minor)`. Independent of any
    /// instance state; always succeeds.
    pub fn version() -> (u16, u16, u16) {
        let parse = |s: &str| s.parse::<u16>().unwrap_or(0);
        (
            parse(env!("CARGO_PKG_VERSION_MAJOR")),
            parse(env!("CARGO_PKG_VERSION_MINOR")),
            parse(env!("CARGO_PKG_VERSION_PATCH")),
        )
    }

    /// Allocates a new image collection with every pixel set to
    /// `initial_value`. `width_capacity` becomes the horizontal stride and
    /// must be at least `width`.
    ///
    /// # Errors
    /// Fails with [`FlagError::InvalidDimensions`] on zero dimensions or a
    /// capacity below the width.
    pub fn make_image_set(
        &self,
        width: usize,
        height: usize,
        count: usize,
        initial_value: f32,
        width_capacity: usize,
    ) -> Result<ImageSet, FlagError> {
        let buf = ImageBuf::new(width, height, count, initial_value, width_capacity)?;
        Ok(ImageSet::from_buf(buf))
    }

    /// Allocates a new mask with every bit set to `initial_value`.
    ///
    /// # Errors
    /// Fails with [`FlagError::InvalidDimensions`] on zero dimensions or an
    /// area not divisible by 8.
    pub fn make_flag_mask(
        &self,
        width: usize,
        height: usize,
        initial_value: bool,
    ) -> Result<FlagMask, FlagError> {
        let buf = MaskBuf::new(width, height, initial_value)?;
        Ok(FlagMask::from_buf(buf))
    }

    /// Path of the default strategy file for this session's instrument.
    ///
    /// # Errors
    /// Fails with [`FlagError::StrategyNotFound`] when no default asset
    /// exists in any search directory.
    pub fn find_strategy_file(&self) -> Result<String, FlagError> {
        self.find_strategy_file_for(self.config.instrument)
    }

    /// Path of the default strategy file for an explicit instrument, using
    /// this session's search directories.
    pub fn find_strategy_file_for(&self, instrument: Instrument) -> Result<String, FlagError> {
        let path = discovery::find_strategy_file(instrument, &self.config.strategy_dirs)?;
        debug!(
            "resolved default strategy for '{}': {}",
            instrument.key(),
            path.display()
        );
        Ok(path.to_string_lossy().into_owned())
    }

    /// Loads and compiles a strategy file into a reusable handle.
    ///
    /// # Errors
    /// Fails with [`FlagError::Io`] when the file is missing or unreadable,
    /// [`FlagError::SerdeJson`] when it does not parse, and
    /// [`FlagError::MalformedStrategy`] when it parses but fails
    /// validation. There is no retry and no fallback.
    pub fn load_strategy_file<P: AsRef<Path>>(&self, path: P) -> Result<Strategy, FlagError> {
        let compiled = CompiledStrategy::from_file(path)?;
        Ok(Strategy::from_compiled(compiled))
    }
}

impl Default for Flagger {
    fn default() -> Self {
        Self::new()
    }
}
