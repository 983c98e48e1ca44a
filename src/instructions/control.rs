//! # Control Flow Instructions
//!
//! This module implements:
//! - JMP: Jump (absolute and indirect)
//! - JSR: Jump to Subroutine
//! - RTS: Return from Subroutine
//!
//! JSR pushes the address of its own last byte (high byte first), and RTS pulls
//! it back and resumes one byte later.

use crate::{AddressingMode, Cpu, ExecutionError};

/// Executes the JMP instruction. Indirect reads the target from a pointer.
pub(crate) fn execute_jmp(cpu: &mut Cpu, mode: AddressingMode) -> Result<(), ExecutionError> {
    cpu.pc = cpu.effective_address(mode);
    Ok(())
}

/// Executes the JSR instruction.
///
/// Fails with `StackOverflow` when fewer than two stack bytes are free.
pub(crate) fn execute_jsr(cpu: &mut Cpu) -> Result<(), ExecutionError> {
    let target = cpu.fetch_word();
    let return_address = cpu.pc.wrapping_sub(1);

    cpu.push((return_address >> 8) as u8)?;
    cpu.push((return_address & 0xFF) as u8)?;

    cpu.pc = target;
    Ok(())
}

/// Executes the RTS instruction.
pub(crate) fn execute_rts(cpu: &mut Cpu) -> Result<(), ExecutionError> {
    let low = cpu.pop()? as u16;
    let high = cpu.pop()? as u16;

    cpu.pc = ((high << 8) | low).wrapping_add(1);
    Ok(())
}
