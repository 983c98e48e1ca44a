//! Fuzz target for the assembler.
//!
//! This target feeds arbitrary strings to the assembler to find
//! edge cases, panics, and crashes in parsing and encoding.

#![no_main]

use emu6502::{assemble, Assembler, Cpu};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Lossy conversion exercises more edge cases in line handling
    let source = String::from_utf8_lossy(data);

    // We don't care about errors - just ensure no panics
    let _ = assemble(&source);

    // Full compile path, including the memory write and PC update
    let mut cpu = Cpu::headless();
    let _ = Assembler::new().compile(&mut cpu, &source);
});
