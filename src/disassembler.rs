//! 6502 Disassembler Module
//!
//! Converts machine code in memory back into human-readable text, either as
//! mnemonics (`decompile`) or as raw hex rows (`dump`).
//!
//! Both listings read through [`MemoryBus`], so they see exactly what the CPU
//! would see, including the random byte at the reserved address.

pub mod decoder;
pub mod formatter;

use std::fmt;

use crate::memory::MemoryBus;
use crate::opcodes::InstructionDescriptor;

/// Maximum number of lines in a listing.
pub const MAX_LISTING_LINES: usize = 50;

/// Bytes shown per hex-dump row.
pub const DUMP_ROW_BYTES: usize = 8;

/// Separator between listing lines.
pub const LINE_SEPARATOR: &str = "\r\n";

/// A single decoded instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    /// Memory address where this instruction starts
    pub address: u16,

    /// Descriptor for the opcode byte (the invalid sentinel for unused slots)
    pub descriptor: InstructionDescriptor,

    /// The two bytes after the opcode, whether or not the instruction uses them
    pub operand: [u8; 2],
}

impl Instruction {
    pub fn size(&self) -> u8 {
        self.descriptor.size
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&formatter::format_line(
            self.address,
            &self.descriptor,
            self.operand,
        ))
    }
}

/// Options controlling a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingOptions {
    /// First address listed
    pub start_address: u16,

    /// Number of instructions (or dump rows) to produce at most
    pub max_lines: usize,
}

impl Default for ListingOptions {
    fn default() -> Self {
        Self {
            start_address: 0x0000,
            max_lines: MAX_LISTING_LINES,
        }
    }
}

impl ListingOptions {
    pub fn starting_at(start_address: u16) -> Self {
        Self {
            start_address,
            ..Self::default()
        }
    }
}

/// Decodes instructions from `options.start_address` onwards.
///
/// Stops after `options.max_lines` instructions or once the next instruction
/// would start past $FFFF. Unused opcodes decode as one-byte invalid
/// instructions.
pub fn disassemble<B: MemoryBus + ?Sized>(bus: &B, options: ListingOptions) -> Vec<Instruction> {
    let mut instructions = Vec::new();
    let mut address = options.start_address as u32;

    while instructions.len() < options.max_lines && address <= 0xFFFF {
        let instruction = decoder::decode_instruction(bus, address as u16);
        address += instruction.size() as u32;
        instructions.push(instruction);
    }

    instructions
}

/// Decompiles up to 50 instructions starting at `start`.
///
/// Lines are `$XXXX: MNEMONIC operand`, joined with `\r\n`.
///
/// # Examples
///
/// ```
/// use emu6502::{decompile, Cpu, MemoryBus};
///
/// let mut cpu = Cpu::headless();
/// for (offset, byte) in [0xA9, 0x05, 0x8D, 0x00, 0x02, 0xD0, 0xF9].iter().enumerate() {
///     cpu.poke(0x0200 + offset as u16, *byte);
/// }
///
/// let listing = decompile(&cpu, 0x0200);
/// let lines: Vec<&str> = listing.split("\r\n").collect();
///
/// assert_eq!(lines[0], "$0200: LDA #$05");
/// assert_eq!(lines[1], "$0202: STA $0200");
/// assert_eq!(lines[2], "$0205: BNE $0200");
/// assert_eq!(lines.len(), 50);
/// ```
pub fn decompile<B: MemoryBus + ?Sized>(bus: &B, start: u16) -> String {
    decompile_with(bus, ListingOptions::starting_at(start))
}

pub fn decompile_with<B: MemoryBus + ?Sized>(bus: &B, options: ListingOptions) -> String {
    disassemble(bus, options)
        .iter()
        .map(Instruction::to_string)
        .collect::<Vec<_>>()
        .join(LINE_SEPARATOR)
}

/// Renders up to 50 rows of eight raw bytes starting at `start`.
///
/// Rows are `$XXXX: b0 b1 b2 b3 b4 b5 b6 b7`. The last row may read past
/// $FFFF, in which case the bytes wrap around to $0000.
pub fn dump<B: MemoryBus + ?Sized>(bus: &B, start: u16) -> String {
    dump_with(bus, ListingOptions::starting_at(start))
}

pub fn dump_with<B: MemoryBus + ?Sized>(bus: &B, options: ListingOptions) -> String {
    let mut rows = Vec::new();
    let mut address = options.start_address as u32;

    while rows.len() < options.max_lines && address <= 0xFFFF {
        let base = address as u16;
        let mut bytes = [0u8; DUMP_ROW_BYTES];
        for (offset, byte) in bytes.iter_mut().enumerate() {
            *byte = bus.peek(base.wrapping_add(offset as u16));
        }

        rows.push(formatter::format_dump_row(base, &bytes));
        address += DUMP_ROW_BYTES as u32;
    }

    rows.join(LINE_SEPARATOR)
}
