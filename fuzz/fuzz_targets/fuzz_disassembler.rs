//! Fuzz target for the decompiler.
//!
//! This target feeds arbitrary memory contents to the decompiler and dumper
//! to find edge cases and crashes in instruction decoding and formatting.

#![no_main]

use arbitrary::Arbitrary;
use emu6502::{decompile, dump, Cpu, MemoryBus};
use libfuzzer_sys::fuzz_target;

/// Complete fuzz input
#[derive(Debug, Arbitrary)]
struct FuzzInput {
    bytes: Vec<u8>,
    start_address: u16,
}

fuzz_target!(|input: FuzzInput| {
    // Limit input size to prevent OOM
    if input.bytes.len() > 65536 {
        return;
    }

    let mut cpu = Cpu::headless();
    for (offset, byte) in input.bytes.iter().enumerate() {
        cpu.poke(input.start_address.wrapping_add(offset as u16), *byte);
    }

    let listing = decompile(&cpu, input.start_address);
    assert!(listing.split("\r\n").count() <= 50);

    let rows = dump(&cpu, input.start_address);
    assert!(rows.split("\r\n").count() <= 50);
});
