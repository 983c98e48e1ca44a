//! # Flag Instructions
//!
//! CLC, SEC, CLD, SED and CLV each set or clear a single status flag.

use crate::{Cpu, ExecutionError, StatusFlags};

pub(crate) fn set(cpu: &mut Cpu, flag: StatusFlags, value: bool) -> Result<(), ExecutionError> {
    cpu.set_flag(flag, value);
    Ok(())
}
