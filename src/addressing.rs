//! # Addressing Modes
//!
//! This module defines the twelve addressing modes understood by both the
//! execution engine and the assembler. Each mode determines how many operand
//! bytes follow the opcode and how the effective address is formed.

use std::fmt;

/// 6502 addressing mode enumeration.
///
/// # Operand Sizes
///
/// - **0 bytes**: Implied
/// - **1 byte**: Immediate, ZeroPage, ZeroPageX, ZeroPageY, Relative, IndirectX, IndirectY
/// - **2 bytes**: Absolute, AbsoluteX, AbsoluteY, Indirect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressingMode {
    /// No operand, operation implied by instruction (also the accumulator
    /// form of the shifts).
    ///
    /// Examples: CLC, RTS, NOP, ASL
    Implied,

    /// 8-bit constant operand in instruction.
    ///
    /// Example: LDA #$10
    Immediate,

    /// 8-bit address in zero page (0x00-0xFF).
    ///
    /// Example: LDA $80
    ZeroPage,

    /// Zero page address indexed by X register, wraps within zero page.
    ///
    /// Example: LDA $80,X
    ZeroPageX,

    /// Zero page address indexed by Y register, wraps within zero page.
    ///
    /// Example: LDX $80,Y
    ZeroPageY,

    /// Full 16-bit address.
    ///
    /// Example: JMP $1234
    Absolute,

    /// 16-bit address indexed by X register.
    ///
    /// Example: LDA $1234,X
    AbsoluteX,

    /// 16-bit address indexed by Y register.
    ///
    /// Example: LDA $1234,Y
    AbsoluteY,

    /// Indirect jump through 16-bit pointer.
    ///
    /// Example: JMP ($FFFC)
    Indirect,

    /// Indexed indirect: (ZP + X) then dereference.
    ///
    /// Example: LDA ($40,X)
    IndirectX,

    /// Indirect indexed: ZP dereference then + Y.
    ///
    /// Example: LDA ($40),Y
    IndirectY,

    /// Signed 8-bit offset for branch instructions.
    ///
    /// Example: BEQ LOOP
    Relative,
}

impl AddressingMode {
    /// Number of operand bytes that follow the opcode for this mode.
    pub const fn operand_bytes(self) -> u8 {
        use AddressingMode::*;

        match self {
            Implied => 0,
            Immediate | ZeroPage | ZeroPageX | ZeroPageY | IndirectX | IndirectY | Relative => 1,
            Absolute | AbsoluteX | AbsoluteY | Indirect => 2,
        }
    }

    /// Total instruction size in bytes (opcode + operands).
    pub const fn instruction_size(self) -> u8 {
        1 + self.operand_bytes()
    }
}

impl fmt::Display for AddressingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use AddressingMode::*;

        let name = match self {
            Implied => "implied",
            Immediate => "immediate",
            ZeroPage => "zero-page",
            ZeroPageX => "zero-page X-indexed",
            ZeroPageY => "zero-page Y-indexed",
            Absolute => "absolute",
            AbsoluteX => "absolute X-indexed",
            AbsoluteY => "absolute Y-indexed",
            Indirect => "indirect",
            IndirectX => "indexed-indirect X",
            IndirectY => "indirect-indexed Y",
            Relative => "relative",
        };
        f.write_str(name)
    }
}
