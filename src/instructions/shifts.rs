//! # Shift and Rotate Instructions
//!
//! ASL, LSR, ROL and ROR operate on the accumulator (implied form) or on
//! memory. The bit shifted out lands in the carry flag; Z and N follow the
//! result.

use crate::memory::MemoryBus;
use crate::{AddressingMode, Cpu, ExecutionError};

pub(crate) fn execute_asl(cpu: &mut Cpu, mode: AddressingMode) -> Result<(), ExecutionError> {
    shift(cpu, mode, |value, _| (value << 1, value & 0x80 != 0));
    Ok(())
}

pub(crate) fn execute_lsr(cpu: &mut Cpu, mode: AddressingMode) -> Result<(), ExecutionError> {
    shift(cpu, mode, |value, _| (value >> 1, value & 0x01 != 0));
    Ok(())
}

pub(crate) fn execute_rol(cpu: &mut Cpu, mode: AddressingMode) -> Result<(), ExecutionError> {
    shift(cpu, mode, |value, carry| {
        ((value << 1) | carry as u8, value & 0x80 != 0)
    });
    Ok(())
}

pub(crate) fn execute_ror(cpu: &mut Cpu, mode: AddressingMode) -> Result<(), ExecutionError> {
    shift(cpu, mode, |value, carry| {
        ((value >> 1) | ((carry as u8) << 7), value & 0x01 != 0)
    });
    Ok(())
}

/// Applies `op` (value, carry in) -> (result, carry out) to the accumulator or
/// to memory.
fn shift(cpu: &mut Cpu, mode: AddressingMode, op: impl Fn(u8, bool) -> (u8, bool)) {
    let carry_in = cpu.flag_c();

    let result = if mode == AddressingMode::Implied {
        let (result, carry_out) = op(cpu.a, carry_in);
        cpu.a = result;
        cpu.set_flag_c(carry_out);
        result
    } else {
        let address = cpu.effective_address(mode);
        let (result, carry_out) = op(cpu.memory.peek(address), carry_in);
        cpu.memory.poke(address, result);
        cpu.set_flag_c(carry_out);
        result
    };

    cpu.set_nz(result);
}
