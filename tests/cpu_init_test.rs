//! Tests for CPU construction, reset and the register snapshot.

use std::cell::RefCell;
use std::rc::Rc;

use emu6502::{ConsoleLog, Cpu, CpuConfig, MemoryBus, NullDisplay, PixelBuffer, RunState};

fn setup_cpu() -> (Cpu, Rc<RefCell<ConsoleLog>>) {
    let console = Rc::new(RefCell::new(ConsoleLog::new()));
    let cpu = Cpu::new(Box::new(NullDisplay), Box::new(Rc::clone(&console)));
    (cpu, console)
}

#[test]
fn test_power_on_state() {
    let (cpu, console) = setup_cpu();

    assert_eq!(cpu.a(), 0);
    assert_eq!(cpu.x(), 0);
    assert_eq!(cpu.y(), 0);
    assert_eq!(cpu.status().bits(), 0);
    assert_eq!(cpu.pc(), 0x0200);
    assert_eq!(cpu.sp(), 0x0100);
    assert_eq!(cpu.state(), RunState::Idle);
    assert_eq!(console.borrow().last(), Some("CPU has been successfully reset."));
}

#[test]
fn test_reset_clears_registers_and_memory() {
    let (mut cpu, _console) = setup_cpu();

    cpu.set_a(0x11);
    cpu.set_x(0x22);
    cpu.set_y(0x33);
    cpu.set_pc(0x1234);
    cpu.set_sp(0x80);
    cpu.set_flag_c(true);
    cpu.set_flag_n(true);
    cpu.poke(0x0300, 0xAB);

    cpu.reset();

    assert_eq!(cpu.a(), 0);
    assert_eq!(cpu.x(), 0);
    assert_eq!(cpu.y(), 0);
    assert_eq!(cpu.pc(), 0x0200);
    assert_eq!(cpu.sp(), 0x0100);
    assert!(!cpu.flag_c());
    assert!(!cpu.flag_n());
    assert_eq!(cpu.peek(0x0300), 0);
}

#[test]
fn test_reset_blanks_display() {
    let screen = Rc::new(RefCell::new(PixelBuffer::new()));
    let console = Rc::new(RefCell::new(ConsoleLog::new()));
    let mut cpu = Cpu::new(Box::new(Rc::clone(&screen)), Box::new(console));

    cpu.poke(0xFC00, 0x01);
    cpu.poke(0xFFFF, 0x0F);
    assert!(!screen.borrow().is_blank());

    cpu.reset();

    assert!(screen.borrow().is_blank());
}

#[test]
fn test_custom_start_address() {
    let config = CpuConfig {
        start_address: 0x0600,
        ..CpuConfig::default()
    };
    let mut cpu = Cpu::with_config(Box::new(NullDisplay), Box::new(ConsoleLog::new()), config);

    assert_eq!(cpu.pc(), 0x0600);

    cpu.set_pc(0x0800);
    cpu.reset();
    assert_eq!(cpu.pc(), 0x0600);
}

#[test]
fn test_registers_snapshot() {
    let (mut cpu, _console) = setup_cpu();
    cpu.set_a(0x1F);
    cpu.set_flag_c(true);
    cpu.set_flag_n(true);

    let registers = cpu.registers();

    assert_eq!(registers.a, 0x1F);
    assert_eq!(registers.p, 0x81);
    assert_eq!(registers.pc, 0x0200);
    assert!(!registers.running);
    assert!(!registers.halted);
    assert_eq!(
        registers.to_string(),
        "A=$1F X=$00 Y=$00 P=10000001 PC=$0200 SP=$0100"
    );
}

#[test]
fn test_set_sp_is_clamped() {
    let (mut cpu, _console) = setup_cpu();

    cpu.set_sp(0x0FFF);
    assert_eq!(cpu.sp(), 0x0100);

    cpu.set_sp(0x42);
    assert_eq!(cpu.sp(), 0x42);
}
