//! # Register Transfer Instructions
//!
//! TAX, TAY, TXA and TYA copy between registers and update Z and N. TSX copies
//! the low byte of SP into X and TXS copies X into SP; neither touches the
//! flags.

use crate::{Cpu, ExecutionError};

pub(crate) fn execute_tax(cpu: &mut Cpu) -> Result<(), ExecutionError> {
    cpu.x = cpu.a;
    cpu.set_nz(cpu.x);
    Ok(())
}

pub(crate) fn execute_tay(cpu: &mut Cpu) -> Result<(), ExecutionError> {
    cpu.y = cpu.a;
    cpu.set_nz(cpu.y);
    Ok(())
}

pub(crate) fn execute_txa(cpu: &mut Cpu) -> Result<(), ExecutionError> {
    cpu.a = cpu.x;
    cpu.set_nz(cpu.a);
    Ok(())
}

pub(crate) fn execute_tya(cpu: &mut Cpu) -> Result<(), ExecutionError> {
    cpu.a = cpu.y;
    cpu.set_nz(cpu.a);
    Ok(())
}

pub(crate) fn execute_tsx(cpu: &mut Cpu) -> Result<(), ExecutionError> {
    cpu.x = (cpu.sp & 0xFF) as u8;
    Ok(())
}

pub(crate) fn execute_txs(cpu: &mut Cpu) -> Result<(), ExecutionError> {
    cpu.sp = cpu.x as u16;
    Ok(())
}
