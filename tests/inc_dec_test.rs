//! Tests for INC, DEC, INX, INY, DEX and DEY.

use emu6502::{Cpu, MemoryBus};

fn setup_cpu(program: &[u8]) -> Cpu {
    let mut cpu = Cpu::headless();
    for (offset, byte) in program.iter().enumerate() {
        cpu.poke(0x0200 + offset as u16, *byte);
    }
    cpu
}

#[test]
fn test_inc_zero_page_wraps() {
    let mut cpu = setup_cpu(&[0xE6, 0x10]);
    cpu.poke(0x0010, 0xFF);

    cpu.step();

    assert_eq!(cpu.peek(0x0010), 0x00);
    assert!(cpu.flag_z());
}

#[test]
fn test_inc_absolute_x() {
    let mut cpu = setup_cpu(&[0xFE, 0x00, 0x03]);
    cpu.poke(0x0305, 0x7F);
    cpu.set_x(0x05);

    cpu.step();

    assert_eq!(cpu.peek(0x0305), 0x80);
    assert!(cpu.flag_n());
}

#[test]
fn test_dec_absolute() {
    let mut cpu = setup_cpu(&[0xCE, 0x00, 0x03]);
    cpu.poke(0x0300, 0x01);

    cpu.step();

    assert_eq!(cpu.peek(0x0300), 0x00);
    assert!(cpu.flag_z());
}

#[test]
fn test_inx_iny_wrap() {
    let mut cpu = setup_cpu(&[0xE8, 0xC8]);
    cpu.set_x(0xFF);
    cpu.set_y(0x7F);

    cpu.step();
    assert_eq!(cpu.x(), 0x00);
    assert!(cpu.flag_z());

    cpu.step();
    assert_eq!(cpu.y(), 0x80);
    assert!(cpu.flag_n());
}

#[test]
fn test_dex_dey_wrap() {
    let mut cpu = setup_cpu(&[0xCA, 0x88]);
    cpu.set_y(0x01);

    cpu.step();
    assert_eq!(cpu.x(), 0xFF);
    assert!(cpu.flag_n());

    cpu.step();
    assert_eq!(cpu.y(), 0x00);
    assert!(cpu.flag_z());
}
