// In: src/error.rs

//! This module defines the single, unified error type for the entire flagkit
//! library. It uses the `thiserror` crate to provide ergonomic, context-aware
//! error handling.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlagError {
    // =========================================================================
    // === High-Level, Semantic Errors (Specific to our library's logic)
    // =========================================================================
    /// A requested allocation had a width, height or image count of zero, a
    /// stride smaller than the width, or a mask area not divisible by 8.
    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// The image set and flag mask handed to a strategy do not describe the
    /// same time/frequency extent.
    #[error("Dimension mismatch: image set is {image_width}x{image_height}, mask is {mask_width}x{mask_height}")]
    DimensionMismatch {
        image_width: usize,
        image_height: usize,
        mask_width: usize,
        mask_height: usize,
    },

    /// No default strategy file could be located for the given instrument in
    /// any of the configured search directories.
    #[error("No default strategy file found for instrument '{0}'")]
    StrategyNotFound(String),

    /// A strategy document parsed as JSON but failed semantic validation.
    #[error("Malformed strategy: {0}")]
    MalformedStrategy(String),

    // =========================================================================
    // === External Error Wrappers (Using #[from] for automatic conversion)
    // =========================================================================
    /// An error originating from the underlying I/O subsystem (e.g. a missing
    /// or unreadable strategy file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error from the Serde JSON library while parsing a strategy document.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}

// =============================================================================
// === Python FFI Conversion ===
// =============================================================================

#[cfg(feature = "python")]
impl From<FlagError> for pyo3::PyErr {
    fn from(err: FlagError) -> pyo3::PyErr {
        match err {
            FlagError::Io(_) | FlagError::StrategyNotFound(_) => {
                pyo3::exceptions::PyIOError::new_err(err.to_string())
            }
            _ => pyo3::exceptions::PyValueError::new_err(err.to_string()),
        }
    }
}
