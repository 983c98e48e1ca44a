//! # Instruction Table
//!
//! This module holds the catalog of instruction descriptors that both the
//! execution engine and the assembler/decompiler consult. One descriptor exists
//! per (mnemonic, addressing mode) pair the machine understands.
//!
//! The catalog is a flat list of literals. At first use it is expanded into a
//! 256-slot table indexed by opcode byte, plus a lookup by mnemonic. Opcode
//! slots with no descriptor hold an "invalid" sentinel (mnemonic `???`, size 1)
//! so that decoding never fails.
//!
//! The `DCB` directive has a descriptor too, but only in the mnemonic lookup: it
//! occupies no opcode slot and cannot be executed.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::addressing::AddressingMode;
use crate::disassembler::formatter;

/// The operation an instruction performs, independent of its addressing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Adc,
    And,
    Asl,
    Bcc,
    Bcs,
    Beq,
    Bit,
    Bmi,
    Bne,
    Bpl,
    Bvc,
    Bvs,
    Clc,
    Cld,
    Clv,
    Cmp,
    Cpx,
    Cpy,
    Dec,
    Dex,
    Dey,
    Eor,
    Inc,
    Inx,
    Iny,
    Jmp,
    Jsr,
    Lda,
    Ldx,
    Ldy,
    Lsr,
    Nop,
    Ora,
    Pha,
    Php,
    Pla,
    Plp,
    Rol,
    Ror,
    Rts,
    Sbc,
    Sec,
    Sed,
    Sta,
    Stx,
    Sty,
    Tax,
    Tay,
    Tsx,
    Txa,
    Txs,
    Tya,
    /// Define-constant-bytes directive. Assembler only.
    Dcb,
    /// Sentinel for opcode bytes with no instruction.
    Invalid,
}

/// Static description of one instruction encoding.
///
/// # Examples
///
/// ```
/// use emu6502::{instruction_table, AddressingMode, Operation};
///
/// let lda = instruction_table().get(0xA9);
/// assert_eq!(lda.mnemonic, "LDA");
/// assert_eq!(lda.mode, AddressingMode::Immediate);
/// assert_eq!(lda.size, 2);
/// assert_eq!(lda.operation, Operation::Lda);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstructionDescriptor {
    /// Three-letter mnemonic, or `???` for the invalid sentinel.
    pub mnemonic: &'static str,

    /// Encoded size in bytes (opcode + operands). Zero for `DCB`, whose size
    /// depends on its operand list.
    pub size: u8,

    pub mode: AddressingMode,

    pub opcode: u8,

    pub operation: Operation,
}

impl InstructionDescriptor {
    /// True for opcode slots that hold no instruction.
    pub fn is_invalid(&self) -> bool {
        self.operation == Operation::Invalid
    }

    /// True for the eight conditional branches.
    pub fn is_branch(&self) -> bool {
        self.mode == AddressingMode::Relative
    }

    /// Renders this instruction as it appears at `address`, given the bytes
    /// that follow the opcode.
    ///
    /// ```
    /// use emu6502::instruction_table;
    ///
    /// let sta = instruction_table().get(0x9D);
    /// assert_eq!(sta.format(0x0200, [0x00, 0x02]), "STA $0200,X");
    /// ```
    pub fn format(&self, address: u16, operand: [u8; 2]) -> String {
        formatter::format_instruction(self, address, operand)
    }
}

const fn op(
    mnemonic: &'static str,
    mode: AddressingMode,
    opcode: u8,
    operation: Operation,
) -> InstructionDescriptor {
    InstructionDescriptor {
        mnemonic,
        size: mode.instruction_size(),
        mode,
        opcode,
        operation,
    }
}

const fn invalid(opcode: u8) -> InstructionDescriptor {
    InstructionDescriptor {
        mnemonic: "???",
        size: 1,
        mode: AddressingMode::Implied,
        opcode,
        operation: Operation::Invalid,
    }
}

/// The `DCB` directive. Present in the mnemonic lookup only.
pub const DCB_DIRECTIVE: InstructionDescriptor = InstructionDescriptor {
    mnemonic: "DCB",
    size: 0,
    mode: AddressingMode::Implied,
    opcode: 0x00,
    operation: Operation::Dcb,
};

use AddressingMode::*;
use Operation::*;

/// Every executable instruction the machine understands.
pub const CATALOG: &[InstructionDescriptor] = &[
    // ========== Arithmetic ==========
    op("ADC", Immediate, 0x69, Adc),
    op("ADC", ZeroPage, 0x65, Adc),
    op("ADC", ZeroPageX, 0x75, Adc),
    op("ADC", Absolute, 0x6D, Adc),
    op("ADC", AbsoluteX, 0x7D, Adc),
    op("ADC", AbsoluteY, 0x79, Adc),
    op("ADC", IndirectX, 0x61, Adc),
    op("ADC", IndirectY, 0x71, Adc),
    op("SBC", Immediate, 0xE9, Sbc),
    op("SBC", ZeroPage, 0xE5, Sbc),
    op("SBC", ZeroPageX, 0xF5, Sbc),
    op("SBC", Absolute, 0xED, Sbc),
    op("SBC", AbsoluteX, 0xFD, Sbc),
    op("SBC", AbsoluteY, 0xF9, Sbc),
    op("SBC", IndirectX, 0xE1, Sbc),
    op("SBC", IndirectY, 0xF1, Sbc),
    // ========== Logic ==========
    op("AND", Immediate, 0x29, And),
    op("AND", ZeroPage, 0x25, And),
    op("AND", ZeroPageX, 0x35, And),
    op("AND", Absolute, 0x2D, And),
    op("AND", AbsoluteX, 0x3D, And),
    op("AND", AbsoluteY, 0x39, And),
    op("AND", IndirectX, 0x21, And),
    op("AND", IndirectY, 0x31, And),
    op("ORA", Immediate, 0x09, Ora),
    op("ORA", ZeroPage, 0x05, Ora),
    op("ORA", ZeroPageX, 0x15, Ora),
    op("ORA", Absolute, 0x0D, Ora),
    op("ORA", AbsoluteX, 0x1D, Ora),
    op("ORA", AbsoluteY, 0x19, Ora),
    op("ORA", IndirectX, 0x01, Ora),
    op("ORA", IndirectY, 0x11, Ora),
    op("EOR", Immediate, 0x49, Eor),
    op("EOR", ZeroPage, 0x45, Eor),
    op("EOR", ZeroPageX, 0x55, Eor),
    op("EOR", Absolute, 0x4D, Eor),
    op("EOR", AbsoluteX, 0x5D, Eor),
    op("EOR", AbsoluteY, 0x59, Eor),
    op("EOR", IndirectX, 0x41, Eor),
    op("EOR", IndirectY, 0x51, Eor),
    op("BIT", ZeroPage, 0x24, Bit),
    op("BIT", Absolute, 0x2C, Bit),
    // ========== Compare ==========
    op("CMP", Immediate, 0xC9, Cmp),
    op("CMP", ZeroPage, 0xC5, Cmp),
    op("CMP", ZeroPageX, 0xD5, Cmp),
    op("CMP", Absolute, 0xCD, Cmp),
    op("CMP", AbsoluteX, 0xDD, Cmp),
    op("CMP", AbsoluteY, 0xD9, Cmp),
    op("CMP", IndirectX, 0xC1, Cmp),
    op("CMP", IndirectY, 0xD1, Cmp),
    op("CPX", Immediate, 0xE0, Cpx),
    op("CPX", ZeroPage, 0xE4, Cpx),
    op("CPX", Absolute, 0xEC, Cpx),
    op("CPY", Immediate, 0xC0, Cpy),
    op("CPY", ZeroPage, 0xC4, Cpy),
    op("CPY", Absolute, 0xCC, Cpy),
    // ========== Branches ==========
    op("BPL", Relative, 0x10, Bpl),
    op("BMI", Relative, 0x30, Bmi),
    op("BVC", Relative, 0x50, Bvc),
    op("BVS", Relative, 0x70, Bvs),
    op("BCC", Relative, 0x90, Bcc),
    op("BCS", Relative, 0xB0, Bcs),
    op("BNE", Relative, 0xD0, Bne),
    op("BEQ", Relative, 0xF0, Beq),
    // ========== Flags ==========
    op("CLC", Implied, 0x18, Clc),
    op("SEC", Implied, 0x38, Sec),
    op("CLV", Implied, 0xB8, Clv),
    op("CLD", Implied, 0xD8, Cld),
    op("SED", Implied, 0xF8, Sed),
    // ========== Increment / Decrement ==========
    op("INC", ZeroPage, 0xE6, Inc),
    op("INC", ZeroPageX, 0xF6, Inc),
    op("INC", Absolute, 0xEE, Inc),
    op("INC", AbsoluteX, 0xFE, Inc),
    op("DEC", ZeroPage, 0xC6, Dec),
    op("DEC", ZeroPageX, 0xD6, Dec),
    op("DEC", Absolute, 0xCE, Dec),
    op("DEC", AbsoluteX, 0xDE, Dec),
    op("INX", Implied, 0xE8, Inx),
    op("INY", Implied, 0xC8, Iny),
    op("DEX", Implied, 0xCA, Dex),
    op("DEY", Implied, 0x88, Dey),
    // ========== Control ==========
    op("JMP", Absolute, 0x4C, Jmp),
    op("JMP", Indirect, 0x6C, Jmp),
    op("JSR", Absolute, 0x20, Jsr),
    op("RTS", Implied, 0x60, Rts),
    op("NOP", Implied, 0xEA, Nop),
    // ========== Loads ==========
    op("LDA", Immediate, 0xA9, Lda),
    op("LDA", ZeroPage, 0xA5, Lda),
    op("LDA", ZeroPageX, 0xB5, Lda),
    op("LDA", Absolute, 0xAD, Lda),
    op("LDA", AbsoluteX, 0xBD, Lda),
    op("LDA", AbsoluteY, 0xB9, Lda),
    op("LDA", IndirectX, 0xA1, Lda),
    op("LDA", IndirectY, 0xB1, Lda),
    op("LDX", Immediate, 0xA2, Ldx),
    op("LDX", ZeroPage, 0xA6, Ldx),
    op("LDX", ZeroPageY, 0xB6, Ldx),
    op("LDX", Absolute, 0xAE, Ldx),
    op("LDX", AbsoluteY, 0xBE, Ldx),
    op("LDY", Immediate, 0xA0, Ldy),
    op("LDY", ZeroPage, 0xA4, Ldy),
    op("LDY", ZeroPageX, 0xB4, Ldy),
    op("LDY", Absolute, 0xAC, Ldy),
    op("LDY", AbsoluteX, 0xBC, Ldy),
    // ========== Stores ==========
    op("STA", ZeroPage, 0x85, Sta),
    op("STA", ZeroPageX, 0x95, Sta),
    op("STA", Absolute, 0x8D, Sta),
    op("STA", AbsoluteX, 0x9D, Sta),
    op("STA", AbsoluteY, 0x99, Sta),
    op("STA", IndirectX, 0x81, Sta),
    op("STA", IndirectY, 0x91, Sta),
    op("STX", ZeroPage, 0x86, Stx),
    op("STX", ZeroPageY, 0x96, Stx),
    op("STX", Absolute, 0x8E, Stx),
    op("STY", ZeroPage, 0x84, Sty),
    op("STY", ZeroPageX, 0x94, Sty),
    op("STY", Absolute, 0x8C, Sty),
    // ========== Shifts ==========
    op("ASL", Implied, 0x0A, Asl),
    op("ASL", ZeroPage, 0x06, Asl),
    op("ASL", ZeroPageX, 0x16, Asl),
    op("ASL", Absolute, 0x0E, Asl),
    op("ASL", AbsoluteX, 0x1E, Asl),
    op("LSR", Implied, 0x4A, Lsr),
    op("LSR", ZeroPage, 0x46, Lsr),
    op("LSR", ZeroPageX, 0x56, Lsr),
    op("LSR", Absolute, 0x4E, Lsr),
    op("LSR", AbsoluteX, 0x5E, Lsr),
    op("ROL", Implied, 0x2A, Rol),
    op("ROL", ZeroPage, 0x26, Rol),
    op("ROL", ZeroPageX, 0x36, Rol),
    op("ROL", Absolute, 0x2E, Rol),
    op("ROL", AbsoluteX, 0x3E, Rol),
    op("ROR", Implied, 0x6A, Ror),
    op("ROR", ZeroPage, 0x66, Ror),
    op("ROR", ZeroPageX, 0x76, Ror),
    op("ROR", Absolute, 0x6E, Ror),
    op("ROR", AbsoluteX, 0x7E, Ror),
    // ========== Stack ==========
    op("PHA", Implied, 0x48, Pha),
    op("PLA", Implied, 0x68, Pla),
    op("PHP", Implied, 0x08, Php),
    op("PLP", Implied, 0x28, Plp),
    // ========== Transfers ==========
    op("TAX", Implied, 0xAA, Tax),
    op("TAY", Implied, 0xA8, Tay),
    op("TXA", Implied, 0x8A, Txa),
    op("TYA", Implied, 0x98, Tya),
    op("TSX", Implied, 0xBA, Tsx),
    op("TXS", Implied, 0x9A, Txs),
];

/// Opcode-indexed and mnemonic-indexed views of [`CATALOG`].
pub struct InstructionTable {
    by_opcode: [InstructionDescriptor; 256],
    by_mnemonic: HashMap<&'static str, Vec<InstructionDescriptor>>,
}

impl InstructionTable {
    fn build() -> Self {
        let mut by_opcode = [invalid(0); 256];
        for (slot, entry) in by_opcode.iter_mut().enumerate() {
            *entry = invalid(slot as u8);
        }

        let mut by_mnemonic: HashMap<&'static str, Vec<InstructionDescriptor>> = HashMap::new();
        for descriptor in CATALOG.iter().chain(std::iter::once(&DCB_DIRECTIVE)) {
            if descriptor.operation != Operation::Dcb {
                by_opcode[descriptor.opcode as usize] = *descriptor;
            }
            by_mnemonic
                .entry(descriptor.mnemonic)
                .or_default()
                .push(*descriptor);
        }

        Self {
            by_opcode,
            by_mnemonic,
        }
    }

    /// Descriptor for an opcode byte. Unassigned bytes yield the invalid
    /// sentinel.
    pub fn get(&self, opcode: u8) -> &InstructionDescriptor {
        &self.by_opcode[opcode as usize]
    }

    /// All descriptors sharing a mnemonic, in catalog order. The name must
    /// already be uppercase.
    pub fn by_mnemonic(&self, mnemonic: &str) -> Option<&[InstructionDescriptor]> {
        self.by_mnemonic.get(mnemonic).map(Vec::as_slice)
    }

    /// The descriptor for a specific mnemonic/mode pair.
    pub fn find(&self, mnemonic: &str, mode: AddressingMode) -> Option<&InstructionDescriptor> {
        self.by_mnemonic(mnemonic)?.iter().find(|d| d.mode == mode)
    }
}

/// The shared instruction table, built on first use.
pub fn instruction_table() -> &'static InstructionTable {
    static TABLE: OnceLock<InstructionTable> = OnceLock::new();
    TABLE.get_or_init(InstructionTable::build)
}

/// Target of a relative branch whose operand byte is `offset`, taken from
/// `base` (the address just past the operand).
///
/// Offsets above 0x7F count backwards.
///
/// ```
/// use emu6502::opcodes::branch_target;
///
/// assert_eq!(branch_target(0x0202, 0x05), 0x0207);
/// assert_eq!(branch_target(0x0202, 0xFE), 0x0200);
/// ```
pub fn branch_target(base: u16, offset: u8) -> u16 {
    if offset > 0x7F {
        base.wrapping_sub(0x100 - offset as u16)
    } else {
        base.wrapping_add(offset as u16)
    }
}
