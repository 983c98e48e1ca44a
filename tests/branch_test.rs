//! Tests for the conditional branches.

use emu6502::{Cpu, MemoryBus};

fn setup_cpu(program: &[u8]) -> Cpu {
    let mut cpu = Cpu::headless();
    for (offset, byte) in program.iter().enumerate() {
        cpu.poke(0x0200 + offset as u16, *byte);
    }
    cpu
}

#[test]
fn test_beq_taken_forward() {
    let mut cpu = setup_cpu(&[0xF0, 0x10]);
    cpu.set_flag_z(true);

    cpu.step();

    assert_eq!(cpu.pc(), 0x0212);
}

#[test]
fn test_beq_not_taken() {
    let mut cpu = setup_cpu(&[0xF0, 0x10]);

    cpu.step();

    assert_eq!(cpu.pc(), 0x0202);
}

#[test]
fn test_bne_taken_backward() {
    let mut cpu = setup_cpu(&[0xEA, 0xD0, 0xFD]);

    cpu.step();
    cpu.step();

    assert_eq!(cpu.pc(), 0x0200);
}

#[test]
fn test_branch_extremes() {
    let mut cpu = setup_cpu(&[0x90, 0x7F]); // BCC +127
    cpu.step();
    assert_eq!(cpu.pc(), 0x0281);

    let mut cpu = setup_cpu(&[0x90, 0x80]); // BCC -128
    cpu.step();
    assert_eq!(cpu.pc(), 0x0182);
}

#[test]
fn test_carry_branches() {
    let mut cpu = setup_cpu(&[0xB0, 0x04]); // BCS
    cpu.set_flag_c(true);
    cpu.step();
    assert_eq!(cpu.pc(), 0x0206);

    let mut cpu = setup_cpu(&[0x90, 0x04]); // BCC
    cpu.set_flag_c(true);
    cpu.step();
    assert_eq!(cpu.pc(), 0x0202);
}

#[test]
fn test_sign_branches() {
    let mut cpu = setup_cpu(&[0x30, 0x04]); // BMI
    cpu.set_flag_n(true);
    cpu.step();
    assert_eq!(cpu.pc(), 0x0206);

    let mut cpu = setup_cpu(&[0x10, 0x04]); // BPL
    cpu.step();
    assert_eq!(cpu.pc(), 0x0206);
}

#[test]
fn test_overflow_branches() {
    let mut cpu = setup_cpu(&[0x70, 0x04]); // BVS
    cpu.set_flag_v(true);
    cpu.step();
    assert_eq!(cpu.pc(), 0x0206);

    let mut cpu = setup_cpu(&[0x50, 0x04]); // BVC
    cpu.set_flag_v(true);
    cpu.step();
    assert_eq!(cpu.pc(), 0x0202);
}

#[test]
fn test_countdown_loop() {
    // LDX #$05; loop: DEX; BNE loop
    let mut cpu = setup_cpu(&[0xA2, 0x05, 0xCA, 0xD0, 0xFD]);

    for _ in 0..11 {
        cpu.step();
    }

    assert_eq!(cpu.x(), 0);
    assert!(cpu.flag_z());
    assert_eq!(cpu.pc(), 0x0205);
}
