// In: src/bridge/strategy.rs

use crate::engine::executor;
use crate::engine::strategy::CompiledStrategy;
use crate::error::FlagError;

use super::{FlagMask, ImageSet};

/// An owning handle around a loaded, compiled flagging strategy.
///
/// Construction absorbs the compiled strategy by move; there is no way to
/// observe a half-absorbed source, the type system rules it out. The handle
/// is reusable: `run` can be called any number of times.
#[derive(Debug, Clone)]
pub struct Strategy {
    inner: CompiledStrategy,
}

impl Strategy {
    pub(crate) fn from_compiled(compiled: CompiledStrategy) -> Self {
        Self { inner: compiled }
    }

    /// The name declared inside the strategy document.
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Applies the strategy to `input`, with `existing_flags` as the prior
    /// baseline, and returns a newly owned mask. Both inputs are read-only;
    /// prior flags are preserved in the result.
    ///
    /// # Errors
    /// Fails with [`FlagError::DimensionMismatch`] when the image set and
    /// the mask do not describe the same extent.
    pub fn run(&self, input: &ImageSet, existing_flags: &FlagMask) -> Result<FlagMask, FlagError> {
        let result = executor::run(&self.inner, input.buf(), existing_flags.buf())?;
        Ok(FlagMask::from_buf(result))
    }
}
