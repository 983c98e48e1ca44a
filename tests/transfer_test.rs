//! Tests for the register transfers and flag instructions.

use emu6502::{Cpu, MemoryBus};

fn setup_cpu(program: &[u8]) -> Cpu {
    let mut cpu = Cpu::headless();
    for (offset, byte) in program.iter().enumerate() {
        cpu.poke(0x0200 + offset as u16, *byte);
    }
    cpu
}

#[test]
fn test_tax_tay() {
    let mut cpu = setup_cpu(&[0xAA, 0xA8]);
    cpu.set_a(0x90);

    cpu.step();
    cpu.step();

    assert_eq!(cpu.x(), 0x90);
    assert_eq!(cpu.y(), 0x90);
    assert!(cpu.flag_n());
}

#[test]
fn test_txa_tya() {
    let mut cpu = setup_cpu(&[0x8A, 0x98]);
    cpu.set_x(0x05);

    cpu.step();
    assert_eq!(cpu.a(), 0x05);

    cpu.step();
    assert_eq!(cpu.a(), 0x00);
    assert!(cpu.flag_z());
}

#[test]
fn test_tsx_leaves_flags() {
    let mut cpu = setup_cpu(&[0xBA]);
    cpu.set_sp(0x00);
    cpu.set_flag_n(true);

    cpu.step();

    assert_eq!(cpu.x(), 0x00);
    assert!(!cpu.flag_z());
    assert!(cpu.flag_n());
}

#[test]
fn test_flag_instructions() {
    // SEC; SED; CLC; CLD; CLV
    let mut cpu = setup_cpu(&[0x38, 0xF8, 0x18, 0xD8, 0xB8]);
    cpu.set_flag_v(true);

    cpu.step();
    cpu.step();
    assert!(cpu.flag_c());
    assert!(cpu.flag_d());

    cpu.step();
    cpu.step();
    cpu.step();
    assert!(!cpu.flag_c());
    assert!(!cpu.flag_d());
    assert!(!cpu.flag_v());
}

#[test]
fn test_nop() {
    let mut cpu = setup_cpu(&[0xEA]);
    cpu.set_a(0x12);

    cpu.step();

    assert_eq!(cpu.pc(), 0x0201);
    assert_eq!(cpu.a(), 0x12);
}
