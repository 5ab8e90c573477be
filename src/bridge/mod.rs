// In: src/bridge/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Bridge Layer
// ====================================================================================
//
// The `bridge` is the sole public-facing API of the flagkit library. It exposes
// four handle types and completely encapsulates the `engine` that does the real
// work. It is the authoritative boundary between the outside world (a host
// pipeline, or the Python layer in `ffi`) and the flagging internals.
//
// Control Flow:
//
//   1. [Flagger facade]          -> constructed by the caller, owns the session config
//         |
//         `-> make_image_set / make_flag_mask -> allocate owned handles
//         |
//         `-> find_strategy_file -> resolves the default asset for the instrument
//         |
//         `-> load_strategy_file -> [Strategy handle] (compiled, reusable)
//
//   2. [Strategy handle] -> run(&ImageSet, &FlagMask) -> new FlagMask
//         |
//         `-> forwards to `engine::executor` with the handles' storage
//
// Every call is synchronous and stateless given a constructed facade. Handles
// are cheap to clone; a clone shares the underlying collection (reference
// counted, lifetime = longest holder). Mutating a shared handle detaches it
// first (copy-on-write), which is the one place this Rust rendition departs
// from C++ shared_ptr aliasing; the departure is documented on the accessors.
//
// ====================================================================================
pub(crate) mod flag_mask;
pub(crate) mod flagger;
pub(crate) mod image_set;
pub(crate) mod strategy;

pub use flag_mask::FlagMask;
pub use flagger::Flagger;
pub use image_set::ImageSet;
pub use strategy::Strategy;

#[cfg(test)]
mod tests;
