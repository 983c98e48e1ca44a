//! Formatting functions for disassembled instructions

use crate::addressing::AddressingMode;
use crate::opcodes::{branch_target, InstructionDescriptor};

/// Format a single instruction as assembly text
///
/// `operand` holds the bytes after the opcode; only as many as the mode uses
/// are shown. Relative branches show their absolute target, computed from
/// the address after the two-byte branch.
pub fn format_instruction(
    descriptor: &InstructionDescriptor,
    address: u16,
    operand: [u8; 2],
) -> String {
    let text = format_operand(descriptor.mode, address, operand);

    if text.is_empty() || descriptor.is_invalid() {
        descriptor.mnemonic.to_string()
    } else {
        format!("{} {}", descriptor.mnemonic, text)
    }
}

/// Format an instruction with its `$XXXX: ` address prefix
pub fn format_line(address: u16, descriptor: &InstructionDescriptor, operand: [u8; 2]) -> String {
    format!(
        "${:04X}: {}",
        address,
        format_instruction(descriptor, address, operand)
    )
}

/// Format one hex-dump row
pub fn format_dump_row(address: u16, bytes: &[u8]) -> String {
    let hex: Vec<String> = bytes.iter().map(|byte| format!("{:02X}", byte)).collect();
    format!("${:04X}: {}", address, hex.join(" "))
}

/// Format the operand based on addressing mode
fn format_operand(mode: AddressingMode, address: u16, operand: [u8; 2]) -> String {
    use AddressingMode::*;

    let byte = operand[0];
    let word = u16::from_le_bytes(operand);

    match mode {
        Implied => String::new(),
        Immediate => format!("#${:02X}", byte),
        ZeroPage => format!("${:02X}", byte),
        ZeroPageX => format!("${:02X},X", byte),
        ZeroPageY => format!("${:02X},Y", byte),
        Relative => format!("${:04X}", branch_target(address.wrapping_add(2), byte)),
        Absolute => format!("${:04X}", word),
        AbsoluteX => format!("${:04X},X", word),
        AbsoluteY => format!("${:04X},Y", word),
        Indirect => format!("(${:04X})", word),
        IndirectX => format!("(${:02X},X)", byte),
        IndirectY => format!("(${:02X}),Y", byte),
    }
}
