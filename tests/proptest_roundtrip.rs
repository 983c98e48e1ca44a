//! Property-based round-trip tests for assembler/decompiler.
//!
//! Decompiling one instruction and assembling the text at the same address
//! reproduces the original bytes.

use emu6502::opcodes::CATALOG;
use emu6502::{assemble, instruction_table, AddressingMode, InstructionDescriptor};
use proptest::prelude::*;

/// Zero-page indexed forms whose mnemonic also has the absolute indexed form
/// come back in the absolute form, so they are left out.
fn round_trippable(descriptor: &InstructionDescriptor) -> bool {
    let table = instruction_table();
    match descriptor.mode {
        AddressingMode::ZeroPageX => table
            .find(descriptor.mnemonic, AddressingMode::AbsoluteX)
            .is_none(),
        AddressingMode::ZeroPageY => table
            .find(descriptor.mnemonic, AddressingMode::AbsoluteY)
            .is_none(),
        _ => true,
    }
}

fn round_trippable_opcodes() -> Vec<u8> {
    CATALOG
        .iter()
        .filter(|d| round_trippable(d))
        .map(|d| d.opcode)
        .collect()
}

proptest! {
    #[test]
    fn prop_decompile_then_assemble(
        opcode in prop::sample::select(round_trippable_opcodes()),
        low in any::<u8>(),
        high in 0x01u8..=0xFF,
    ) {
        let descriptor = instruction_table().get(opcode);
        let text = descriptor.format(0x0200, [low, high]);

        let result = assemble(&text).unwrap();
        let bytes = &result.lines[0].bytes;

        let expected: Vec<u8> = [opcode, low, high]
            .into_iter()
            .take(descriptor.size as usize)
            .collect();
        prop_assert_eq!(bytes, &expected, "{}", text);
    }
}
