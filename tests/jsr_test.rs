//! Tests for JMP, JSR and RTS.

use emu6502::{Cpu, MemoryBus};

fn setup_cpu(program: &[u8]) -> Cpu {
    let mut cpu = Cpu::headless();
    for (offset, byte) in program.iter().enumerate() {
        cpu.poke(0x0200 + offset as u16, *byte);
    }
    cpu
}

#[test]
fn test_jmp_absolute() {
    let mut cpu = setup_cpu(&[0x4C, 0x34, 0x12]);

    cpu.step();

    assert_eq!(cpu.pc(), 0x1234);
}

#[test]
fn test_jmp_indirect() {
    let mut cpu = setup_cpu(&[0x6C, 0x00, 0x03]);
    cpu.poke(0x0300, 0x78);
    cpu.poke(0x0301, 0x56);

    cpu.step();

    assert_eq!(cpu.pc(), 0x5678);
}

#[test]
fn test_jsr_pushes_return_address() {
    let mut cpu = setup_cpu(&[0x20, 0x00, 0x03]);

    cpu.step();

    assert_eq!(cpu.pc(), 0x0300);
    assert_eq!(cpu.sp(), 0x00FE);
    assert_eq!(cpu.peek(0x01FF), 0x02); // high byte of $0202
    assert_eq!(cpu.peek(0x01FE), 0x02); // low byte of $0202
}

#[test]
fn test_jsr_rts_round_trip() {
    // JSR $0300; LDX #$01 ... $0300: LDA #$07; RTS
    let mut cpu = setup_cpu(&[0x20, 0x00, 0x03, 0xA2, 0x01]);
    cpu.poke(0x0300, 0xA9);
    cpu.poke(0x0301, 0x07);
    cpu.poke(0x0302, 0x60);

    cpu.step(); // JSR
    cpu.step(); // LDA
    cpu.step(); // RTS
    assert_eq!(cpu.pc(), 0x0203);
    assert_eq!(cpu.sp(), 0x0100);

    cpu.step(); // LDX
    assert_eq!(cpu.a(), 0x07);
    assert_eq!(cpu.x(), 0x01);
}

#[test]
fn test_rts_on_empty_stack_halts() {
    let mut cpu = setup_cpu(&[0x60]);

    cpu.step();

    assert!(cpu.is_halted());
}
