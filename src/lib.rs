//! This file is the root of the `flagkit` Rust crate.
//!
//! Its responsibilities are strictly limited to:
//! 1.  Declaring all the top-level modules of our library (`bridge`,
//!     `engine`, `kernels`, etc.) so the Rust compiler knows they exist.
//! 2.  Defining the `#[pymodule]` which acts as the main entry point when
//!     the compiled library is imported into Python (feature `python`).

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//==================================================================================
// 1. Module Declarations
//==================================================================================
pub mod bridge;
pub mod config;
pub mod kernels;

mod engine;
mod error;
#[cfg(feature = "python")]
mod ffi;

// Re-export the boundary surface at the crate root.
pub use bridge::{FlagMask, Flagger, ImageSet, Strategy};
pub use config::{FlaggerConfig, Instrument};
pub use error::FlagError;

//==================================================================================
// 2. Python Module Definition
//==================================================================================
#[cfg(feature = "python")]
use pyo3::prelude::*;

/// The `flagkit` Python module, containing all exposed Rust classes.
#[cfg(feature = "python")]
#[pymodule]
fn flagkit(m: &Bound<'_, PyModule>) -> PyResult<()> {
    use ffi::python::{PyFlagMask, PyFlagger, PyImageSet, PyStrategy};

    m.add_class::<PyFlagger>()?;
    m.add_class::<PyImageSet>()?;
    m.add_class::<PyFlagMask>()?;
    m.add_class::<PyStrategy>()?;

    m.add_function(wrap_pyfunction!(ffi::python::version_py, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::python::enable_verbose_logging_py, m)?)?;

    // --- Expose version string as a module attribute ---
    m.add("__version__", VERSION)?;

    Ok(())
}
