//! # Stack Operations
//!
//! This module implements PHA, PHP, PLA and PLP.
//!
//! The stack occupies 0x0100-0x01FF and grows downward. SP is an offset into
//! that page: 0x100 means empty and 0 means full. Pushing onto a full stack
//! or pulling from an empty one is a fault.

use crate::{Cpu, ExecutionError, StatusFlags};

pub(crate) fn execute_pha(cpu: &mut Cpu) -> Result<(), ExecutionError> {
    cpu.push(cpu.a)
}

pub(crate) fn execute_php(cpu: &mut Cpu) -> Result<(), ExecutionError> {
    cpu.push(cpu.p.bits())
}

/// Pulls into A and updates Z and N.
pub(crate) fn execute_pla(cpu: &mut Cpu) -> Result<(), ExecutionError> {
    cpu.a = cpu.pop()?;
    cpu.set_nz(cpu.a);
    Ok(())
}

/// Pulls into P. All eight bits are kept.
pub(crate) fn execute_plp(cpu: &mut Cpu) -> Result<(), ExecutionError> {
    let value = cpu.pop()?;
    cpu.p = StatusFlags::from_bits_retain(value);
    Ok(())
}
