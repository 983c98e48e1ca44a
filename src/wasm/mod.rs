//! WebAssembly bindings for the emulator.
//!
//! This module provides JavaScript-callable interfaces to the CPU, the
//! assembler and the decompiler, so a browser page can act as the front panel.

#[cfg(feature = "wasm")]
pub mod api;

#[cfg(feature = "wasm")]
pub use api::Emulator;
