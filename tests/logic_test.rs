//! Tests for AND, ORA, EOR and BIT.

use emu6502::{Cpu, MemoryBus};

fn setup_cpu(program: &[u8]) -> Cpu {
    let mut cpu = Cpu::headless();
    for (offset, byte) in program.iter().enumerate() {
        cpu.poke(0x0200 + offset as u16, *byte);
    }
    cpu
}

#[test]
fn test_and_immediate() {
    let mut cpu = setup_cpu(&[0x29, 0x0F]);
    cpu.set_a(0xF3);

    cpu.step();

    assert_eq!(cpu.a(), 0x03);
    assert!(!cpu.flag_z());
    assert!(!cpu.flag_n());
}

#[test]
fn test_and_to_zero() {
    let mut cpu = setup_cpu(&[0x29, 0x0F]);
    cpu.set_a(0xF0);

    cpu.step();

    assert_eq!(cpu.a(), 0x00);
    assert!(cpu.flag_z());
}

#[test]
fn test_ora_sets_negative() {
    let mut cpu = setup_cpu(&[0x09, 0x80]);
    cpu.set_a(0x01);

    cpu.step();

    assert_eq!(cpu.a(), 0x81);
    assert!(cpu.flag_n());
}

#[test]
fn test_eor_absolute_y() {
    let mut cpu = setup_cpu(&[0x59, 0x00, 0x03]);
    cpu.poke(0x0302, 0xFF);
    cpu.set_y(0x02);
    cpu.set_a(0x0F);

    cpu.step();

    assert_eq!(cpu.a(), 0xF0);
    assert!(cpu.flag_n());
}

#[test]
fn test_eor_indirect_x() {
    let mut cpu = setup_cpu(&[0x41, 0x20]);
    cpu.poke(0x0024, 0x00);
    cpu.poke(0x0025, 0x03);
    cpu.poke(0x0300, 0x55);
    cpu.set_x(0x04);
    cpu.set_a(0x55);

    cpu.step();

    assert_eq!(cpu.a(), 0x00);
    assert!(cpu.flag_z());
}

#[test]
fn test_bit_copies_high_bits() {
    let mut cpu = setup_cpu(&[0x24, 0x10]);
    cpu.poke(0x0010, 0xC0);
    cpu.set_a(0x01);

    cpu.step();

    assert!(cpu.flag_n());
    assert!(cpu.flag_v());
    assert!(cpu.flag_z());
    assert_eq!(cpu.a(), 0x01);
}

#[test]
fn test_bit_absolute_nonzero() {
    let mut cpu = setup_cpu(&[0x2C, 0x00, 0x03]);
    cpu.poke(0x0300, 0x01);
    cpu.set_a(0x01);
    cpu.set_flag_v(true);

    cpu.step();

    assert!(!cpu.flag_z());
    assert!(!cpu.flag_n());
    assert!(!cpu.flag_v());
}
