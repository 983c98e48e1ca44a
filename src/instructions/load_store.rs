//! # Load and Store Instructions
//!
//! Loads (LDA, LDX, LDY) copy the operand into a register and update Z and N.
//! Stores (STA, STX, STY) write a register to the effective address and leave
//! the flags alone.

use crate::memory::MemoryBus;
use crate::{AddressingMode, Cpu, ExecutionError};

pub(crate) fn execute_lda(cpu: &mut Cpu, mode: AddressingMode) -> Result<(), ExecutionError> {
    cpu.a = cpu.operand_value(mode);
    cpu.set_nz(cpu.a);
    Ok(())
}

pub(crate) fn execute_ldx(cpu: &mut Cpu, mode: AddressingMode) -> Result<(), ExecutionError> {
    cpu.x = cpu.operand_value(mode);
    cpu.set_nz(cpu.x);
    Ok(())
}

pub(crate) fn execute_ldy(cpu: &mut Cpu, mode: AddressingMode) -> Result<(), ExecutionError> {
    cpu.y = cpu.operand_value(mode);
    cpu.set_nz(cpu.y);
    Ok(())
}

pub(crate) fn execute_sta(cpu: &mut Cpu, mode: AddressingMode) -> Result<(), ExecutionError> {
    let address = cpu.effective_address(mode);
    cpu.memory.poke(address, cpu.a);
    Ok(())
}

pub(crate) fn execute_stx(cpu: &mut Cpu, mode: AddressingMode) -> Result<(), ExecutionError> {
    let address = cpu.effective_address(mode);
    cpu.memory.poke(address, cpu.x);
    Ok(())
}

pub(crate) fn execute_sty(cpu: &mut Cpu, mode: AddressingMode) -> Result<(), ExecutionError> {
    let address = cpu.effective_address(mode);
    cpu.memory.poke(address, cpu.y);
    Ok(())
}
