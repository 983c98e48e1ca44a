//! # Branch Instructions
//!
//! This module implements the eight conditional branches (BCC, BCS, BEQ, BNE,
//! BMI, BPL, BVC, BVS). Each one tests a single status flag.
//!
//! All branches use relative addressing: the operand byte is an offset from the
//! address just past the operand. Offsets above 0x7F count backwards.

use crate::opcodes::branch_target;
use crate::{Cpu, ExecutionError, StatusFlags};

/// Branches when `flag` is in the `expected` state.
///
/// The offset byte is consumed either way. No flags are affected.
pub(crate) fn branch_if(
    cpu: &mut Cpu,
    flag: StatusFlags,
    expected: bool,
) -> Result<(), ExecutionError> {
    let offset = cpu.fetch_byte();

    if cpu.flag(flag) == expected {
        cpu.pc = branch_target(cpu.pc, offset);
    }

    Ok(())
}
