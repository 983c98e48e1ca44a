//! Property-based tests for the assembler.

use emu6502::assembler::encoder::branch_offset;
use emu6502::opcodes::branch_target;
use emu6502::{assemble, Cpu, MemoryBus};
use proptest::prelude::*;

proptest! {
    /// Property: every in-range branch offset encodes to the byte that
    /// branches back to the same target
    #[test]
    fn prop_branch_offset_inverts_branch_target(
        address in 0x0100u16..0xFE00,
        offset in -128i32..=127,
    ) {
        let target = (address as i32 + 2 + offset) as u16;
        let encoded = branch_offset(address, target as u32);

        prop_assert_eq!(encoded, offset as i8 as u8);
        prop_assert_eq!(branch_target(address.wrapping_add(2), encoded), target);
    }

    /// Property: an assembled branch lands on its label when executed
    #[test]
    fn prop_assembled_branch_reaches_label(padding in 0usize..=127) {
        let mut source = String::from("SEC\nBCS TARGET\n");
        for _ in 0..padding {
            source.push_str("NOP\n");
        }
        source.push_str("TARGET: RTS\n");

        let result = assemble(&source).unwrap();
        let target = result.label("TARGET").unwrap().address;

        let mut cpu = Cpu::headless();
        result.write_to(&mut cpu);
        cpu.step();
        cpu.step();

        prop_assert_eq!(cpu.pc(), target);
    }

    /// Property: immediate operands encode as themselves, decimal or hex
    #[test]
    fn prop_immediate_encoding(value in any::<u8>()) {
        let decimal = assemble(&format!("LDA #{}", value)).unwrap();
        let hex = assemble(&format!("LDA #${:02X}", value)).unwrap();

        prop_assert_eq!(&decimal.lines[0].bytes, &vec![0xA9, value]);
        prop_assert_eq!(&hex.lines[0].bytes, &vec![0xA9, value]);
    }

    /// Property: STA picks the zero-page form exactly when the address fits
    #[test]
    fn prop_store_form_follows_address(address in any::<u16>()) {
        let result = assemble(&format!("STA ${:04X}", address)).unwrap();
        let bytes = &result.lines[0].bytes;

        if address <= 0xFF {
            prop_assert_eq!(bytes, &vec![0x85, address as u8]);
        } else {
            prop_assert_eq!(bytes, &vec![0x8D, address as u8, (address >> 8) as u8]);
        }
    }

    /// Property: write_to copies exactly the assembled bytes
    #[test]
    fn prop_write_to_copies_bytes(values in prop::collection::vec(any::<u8>(), 1..32)) {
        let list: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        let result = assemble(&format!("*=$0400\nDCB {}", list.join(","))).unwrap();

        let mut cpu = Cpu::headless();
        let written = result.write_to(&mut cpu);

        prop_assert_eq!(written, values.len());
        for (offset, value) in values.iter().enumerate() {
            prop_assert_eq!(cpu.peek(0x0400 + offset as u16), *value);
        }
    }
}
