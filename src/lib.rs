//! # 6502 Emulator and Assembler
//!
//! A software 6502-class processor together with a two-pass assembler and a
//! decompiler, designed for browser front panels as well as native hosts.
//!
//! This crate provides the execution engine (registers, flags, addressing-mode
//! resolution, a 64KB memory space and a cooperative fetch-execute loop), and the
//! assembler/decompiler pair that turns mnemonic source into bytes and back. Both
//! halves consult the same table of instruction descriptors.
//!
//! ## Quick Start
//!
//! ```rust
//! use emu6502::{Assembler, Cpu, MemoryBus};
//!
//! let mut cpu = Cpu::headless();
//! let mut assembler = Assembler::new();
//!
//! let ok = assembler.compile(&mut cpu, "LDA #$05\nSTA $10\n");
//! assert!(ok);
//!
//! cpu.step();
//! cpu.step();
//!
//! assert_eq!(cpu.a(), 0x05);
//! assert_eq!(cpu.peek(0x0010), 0x05);
//! ```
//!
//! ## Architecture
//!
//! - **Table-Driven Design**: every instruction is a descriptor literal in one catalog
//! - **Single Writer**: memory is owned by the CPU; the assembler writes through it
//! - **Cooperative Execution**: `run()` + `tick()` execute bounded batches so a host
//!   loop stays responsive
//! - **No Crashes**: runtime faults halt the machine instead of unwinding into the host
//!
//! ## Modules
//!
//! - `cpu` - CPU state and execution logic
//! - `memory` - MemoryBus trait and the 64KB address space
//! - `opcodes` - Instruction descriptors and the instruction table
//! - `addressing` - Addressing mode enumeration
//! - `assembler` - Two-pass assembler
//! - `disassembler` - Decompiler and hex dump
//! - `devices` - Display and log sinks

pub mod addressing;
pub mod assembler;
pub mod cpu;
pub mod devices;
pub mod disassembler;
pub mod memory;
pub mod opcodes;
pub mod wasm;

// Internal instruction implementations (not part of public API)
mod instructions;

use thiserror::Error;

// Re-export public API
pub use addressing::AddressingMode;
pub use assembler::{assemble, Assembler, AssemblerError, CompilationResult, ErrorKind};
pub use cpu::{Cpu, CpuConfig, Registers, RunState, StatusFlags};
pub use devices::{ConsoleLog, DisplaySink, FacadeLog, LogSink, NullDisplay, PixelBuffer};
pub use disassembler::{decompile, dump, ListingOptions};
pub use memory::{Memory, MemoryBus};
pub use opcodes::{instruction_table, InstructionDescriptor, InstructionTable, Operation};

/// Runtime faults. Each one halts the CPU until the next `reset()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// The fetched byte has no instruction descriptor.
    #[error("Invalid op code 0x{opcode:02X} encountered at ${address:04X}")]
    InvalidOpcode { opcode: u8, address: u16 },

    /// A push found the stack already full.
    #[error("Stack overflow.")]
    StackOverflow,

    /// A pop found the stack empty.
    #[error("Tried to pop empty stack.")]
    StackUnderflow,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_messages() {
        let fault = ExecutionError::InvalidOpcode {
            opcode: 0x02,
            address: 0x0203,
        };
        assert_eq!(fault.to_string(), "Invalid op code 0x02 encountered at $0203");
        assert_eq!(ExecutionError::StackOverflow.to_string(), "Stack overflow.");
        assert_eq!(
            ExecutionError::StackUnderflow.to_string(),
            "Tried to pop empty stack."
        );
    }
}
