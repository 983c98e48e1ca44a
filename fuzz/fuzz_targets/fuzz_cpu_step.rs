//! Fuzz target for CPU execution.
//!
//! This target creates arbitrary CPU states and memory contents,
//! then executes a batch of instructions to find edge cases and crashes.

#![no_main]

use arbitrary::Arbitrary;
use emu6502::{Cpu, MemoryBus};
use libfuzzer_sys::fuzz_target;

/// Arbitrary CPU initial state for fuzzing
#[derive(Debug, Arbitrary)]
struct FuzzCpuState {
    a: u8,
    x: u8,
    y: u8,
    sp: u16,
    pc: u16,
    flag_c: bool,
    flag_z: bool,
    flag_d: bool,
    flag_v: bool,
    flag_n: bool,
    /// Bytes written starting at PC
    program: Vec<u8>,
}

fuzz_target!(|state: FuzzCpuState| {
    if state.program.len() > 4096 {
        return;
    }

    let mut cpu = Cpu::headless();
    for (offset, byte) in state.program.iter().enumerate() {
        cpu.poke(state.pc.wrapping_add(offset as u16), *byte);
    }

    cpu.set_a(state.a);
    cpu.set_x(state.x);
    cpu.set_y(state.y);
    cpu.set_sp(state.sp);
    cpu.set_pc(state.pc);
    cpu.set_flag_c(state.flag_c);
    cpu.set_flag_z(state.flag_z);
    cpu.set_flag_d(state.flag_d);
    cpu.set_flag_v(state.flag_v);
    cpu.set_flag_n(state.flag_n);

    cpu.run();
    for _ in 0..4 {
        if !cpu.tick() {
            break;
        }
    }

    // Stack pointer never leaves the stack page
    assert!(cpu.sp() <= 0x100);
});
