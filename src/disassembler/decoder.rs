//! Instruction decoder for the 6502 disassembler

use crate::disassembler::Instruction;
use crate::memory::MemoryBus;
use crate::opcodes::instruction_table;

/// Decode the instruction at `address`
///
/// Always succeeds: opcodes with no instruction decode as the invalid
/// sentinel, which is one byte long. The two following bytes are read with
/// wrap-around at $FFFF.
pub fn decode_instruction<B: MemoryBus + ?Sized>(bus: &B, address: u16) -> Instruction {
    let opcode = bus.peek(address);
    let descriptor = *instruction_table().get(opcode);

    Instruction {
        address,
        descriptor,
        operand: [
            bus.peek(address.wrapping_add(1)),
            bus.peek(address.wrapping_add(2)),
        ],
    }
}
