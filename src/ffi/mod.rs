// In: src/ffi/mod.rs

//! The language boundary. Everything Python sees lives in `python`; the
//! rest of the crate never depends on anything in here.

pub mod python;
