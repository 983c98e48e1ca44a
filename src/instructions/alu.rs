//! # ALU (Arithmetic Logic Unit) Instructions
//!
//! This module implements arithmetic and logical operations:
//! - ADC: Add with Carry
//! - SBC: Subtract with Carry
//! - AND, ORA, EOR: Bitwise logic on the accumulator
//! - CMP, CPX, CPY: Register comparison
//! - BIT: Bit test
//!
//! ADC and SBC honor the decimal flag. In decimal mode both operands are treated
//! as packed BCD and the result is corrected nibble by nibble.

use crate::{AddressingMode, Cpu, ExecutionError, StatusFlags};

/// Executes the ADC (Add with Carry) instruction.
///
/// Adds the operand plus the carry flag to the accumulator. Updates C, V, Z and N.
pub(crate) fn execute_adc(cpu: &mut Cpu, mode: AddressingMode) -> Result<(), ExecutionError> {
    let value = cpu.operand_value(mode);
    add_with_carry(cpu, value);
    Ok(())
}

/// Executes the SBC (Subtract with Carry) instruction.
///
/// Subtracts the operand and the inverted carry (the borrow) from the
/// accumulator. Updates C, V, Z and N.
pub(crate) fn execute_sbc(cpu: &mut Cpu, mode: AddressingMode) -> Result<(), ExecutionError> {
    let value = cpu.operand_value(mode);
    subtract_with_carry(cpu, value);
    Ok(())
}

/// Executes the AND (Logical AND) instruction.
pub(crate) fn execute_and(cpu: &mut Cpu, mode: AddressingMode) -> Result<(), ExecutionError> {
    let value = cpu.operand_value(mode);
    cpu.a &= value;
    cpu.set_nz(cpu.a);
    Ok(())
}

/// Executes the ORA (Logical Inclusive OR) instruction.
pub(crate) fn execute_ora(cpu: &mut Cpu, mode: AddressingMode) -> Result<(), ExecutionError> {
    let value = cpu.operand_value(mode);
    cpu.a |= value;
    cpu.set_nz(cpu.a);
    Ok(())
}

/// Executes the EOR (Exclusive OR) instruction.
pub(crate) fn execute_eor(cpu: &mut Cpu, mode: AddressingMode) -> Result<(), ExecutionError> {
    let value = cpu.operand_value(mode);
    cpu.a ^= value;
    cpu.set_nz(cpu.a);
    Ok(())
}

/// Executes the CMP (Compare Accumulator) instruction.
pub(crate) fn execute_cmp(cpu: &mut Cpu, mode: AddressingMode) -> Result<(), ExecutionError> {
    let value = cpu.operand_value(mode);
    cpu.compare(cpu.a, value);
    Ok(())
}

/// Executes the CPX (Compare X Register) instruction.
pub(crate) fn execute_cpx(cpu: &mut Cpu, mode: AddressingMode) -> Result<(), ExecutionError> {
    let value = cpu.operand_value(mode);
    cpu.compare(cpu.x, value);
    Ok(())
}

/// Executes the CPY (Compare Y Register) instruction.
pub(crate) fn execute_cpy(cpu: &mut Cpu, mode: AddressingMode) -> Result<(), ExecutionError> {
    let value = cpu.operand_value(mode);
    cpu.compare(cpu.y, value);
    Ok(())
}

/// Executes the BIT (Bit Test) instruction.
///
/// Z reflects `A & M`; N and V are copied from bits 7 and 6 of the operand.
/// The accumulator is not changed.
pub(crate) fn execute_bit(cpu: &mut Cpu, mode: AddressingMode) -> Result<(), ExecutionError> {
    let value = cpu.operand_value(mode);

    cpu.set_flag(StatusFlags::ZERO, cpu.a & value == 0);
    cpu.set_flag(StatusFlags::NEGATIVE, value & 0x80 != 0);
    cpu.set_flag(StatusFlags::OVERFLOW, value & 0x40 != 0);
    Ok(())
}

pub(crate) fn add_with_carry(cpu: &mut Cpu, value: u8) {
    let a = cpu.a as i32;
    let src = value as i32;
    let carry_in = cpu.flag(StatusFlags::CARRY) as i32;

    // Starts set when the operands share a sign; cleared below if the result
    // stays in range.
    let mut overflow = (a ^ src) & 0x80 == 0;
    let mut carry = false;

    let total = if cpu.flag(StatusFlags::DECIMAL) {
        let mut total = (a & 0x0F) + (src & 0x0F) + carry_in;
        if total >= 0x0A {
            total = 0x10 | ((total + 6) & 0x0F);
        }
        total += (a & 0xF0) + (src & 0xF0);

        if carry_out(total, 0xA0, &mut carry, &mut overflow) {
            total += 0x60;
        }
        total
    } else {
        let total = a + src + carry_in;
        carry_out(total, 0x100, &mut carry, &mut overflow);
        total
    };

    cpu.set_flag(StatusFlags::CARRY, carry);
    cpu.set_flag(StatusFlags::OVERFLOW, overflow);
    cpu.a = (total & 0xFF) as u8;
    cpu.set_nz(cpu.a);
}

/// Carry for an addition reaching `cutoff`. Returns the carry.
fn carry_out(total: i32, cutoff: i32, carry: &mut bool, overflow: &mut bool) -> bool {
    if total >= cutoff {
        *carry = true;
        if *overflow && total >= 0x180 {
            *overflow = false;
        }
        true
    } else {
        *carry = false;
        if *overflow && total < 0x80 {
            *overflow = false;
        }
        false
    }
}

pub(crate) fn subtract_with_carry(cpu: &mut Cpu, value: u8) {
    let a = cpu.a as i32;
    let src = value as i32;
    let carry_in = cpu.flag(StatusFlags::CARRY) as i32;

    // Starts set when the operands differ in sign.
    let mut overflow = (a ^ src) & 0x80 != 0;
    let mut carry = carry_in != 0;

    let result = if cpu.flag(StatusFlags::DECIMAL) {
        let mut low = 0x0F + (a & 0x0F) - (src & 0x0F) + carry_in;
        let mut result;
        if low < 0x10 {
            result = 0;
            low -= 6;
        } else {
            result = 0x10;
            low -= 0x10;
        }

        result += 0xF0 + (a & 0xF0) - (src & 0xF0);
        if borrow_out(result, &mut carry, &mut overflow) {
            result -= 0x60;
        }
        result + low
    } else {
        let result = 0xFF + a - src + carry_in;
        borrow_out(result, &mut carry, &mut overflow);
        result
    };

    cpu.set_flag(StatusFlags::CARRY, carry);
    cpu.set_flag(StatusFlags::OVERFLOW, overflow);
    cpu.a = (result & 0xFF) as u8;
    cpu.set_nz(cpu.a);
}

/// Borrow for a subtraction biased by 0x100. Returns true when a borrow
/// occurred (carry clear).
fn borrow_out(result: i32, carry: &mut bool, overflow: &mut bool) -> bool {
    if result < 0x100 {
        *carry = false;
        if *overflow && result < 0x80 {
            *overflow = false;
        }
        true
    } else {
        *carry = true;
        if *overflow && result >= 0x180 {
            *overflow = false;
        }
        false
    }
}
