//! # Increment and Decrement Instructions
//!
//! This module implements:
//! - INC, DEC: read-modify-write on memory
//! - INX, INY, DEX, DEY: register counters
//!
//! All of them wrap at the byte boundary and update Z and N.

use crate::memory::MemoryBus;
use crate::{AddressingMode, Cpu, ExecutionError};

/// Executes the INC (Increment Memory) instruction.
pub(crate) fn execute_inc(cpu: &mut Cpu, mode: AddressingMode) -> Result<(), ExecutionError> {
    modify_memory(cpu, mode, |value| value.wrapping_add(1));
    Ok(())
}

/// Executes the DEC (Decrement Memory) instruction.
pub(crate) fn execute_dec(cpu: &mut Cpu, mode: AddressingMode) -> Result<(), ExecutionError> {
    modify_memory(cpu, mode, |value| value.wrapping_sub(1));
    Ok(())
}

pub(crate) fn execute_inx(cpu: &mut Cpu) -> Result<(), ExecutionError> {
    cpu.x = cpu.x.wrapping_add(1);
    cpu.set_nz(cpu.x);
    Ok(())
}

pub(crate) fn execute_iny(cpu: &mut Cpu) -> Result<(), ExecutionError> {
    cpu.y = cpu.y.wrapping_add(1);
    cpu.set_nz(cpu.y);
    Ok(())
}

pub(crate) fn execute_dex(cpu: &mut Cpu) -> Result<(), ExecutionError> {
    cpu.x = cpu.x.wrapping_sub(1);
    cpu.set_nz(cpu.x);
    Ok(())
}

pub(crate) fn execute_dey(cpu: &mut Cpu) -> Result<(), ExecutionError> {
    cpu.y = cpu.y.wrapping_sub(1);
    cpu.set_nz(cpu.y);
    Ok(())
}

fn modify_memory(cpu: &mut Cpu, mode: AddressingMode, op: impl Fn(u8) -> u8) {
    let address = cpu.effective_address(mode);
    let value = op(cpu.memory.peek(address));
    cpu.memory.poke(address, value);
    cpu.set_nz(value);
}
