//! # CPU State and Execution
//!
//! This module contains the `Cpu` struct representing the processor state and the
//! cooperative fetch-execute loop.
//!
//! ## CPU State
//!
//! The CPU maintains:
//! - **Registers**: Accumulator (A), index registers (X, Y)
//! - **Program counter** (PC): 16-bit address of next instruction
//! - **Stack pointer** (SP): offset into the stack page, 0x100 when empty
//! - **Status flags**: C, Z, D, V, N packed into [`StatusFlags`]
//! - **Memory**: the 64KB address space, owned exclusively by the CPU
//!
//! ## Execution Model
//!
//! ```text
//!   Idle ──run()──> Running ──stop()──> Idle
//!    │                 │
//!    │ step()          │ fault
//!    v                 v
//!   (one instruction)  Halted ──reset()──> Idle
//! ```
//!
//! - `step()`: execute one instruction from Idle
//! - `run()` + `tick()`: execute batches of instructions until stopped or halted
//!
//! A fault (invalid opcode, stack overflow/underflow) never propagates to the
//! caller of `step()`/`tick()`. It is logged and the machine enters `Halted`,
//! where it stays until `reset()`.

use std::fmt;

use bitflags::bitflags;

use crate::devices::{DisplaySink, FacadeLog, LogSink, NullDisplay};
use crate::disassembler::formatter;
use crate::instructions;
use crate::memory::{Memory, MemoryBus, DEFAULT_START, STACK_BASE};
use crate::opcodes::instruction_table;
use crate::{AddressingMode, ExecutionError};

/// Stack pointer value of an empty stack.
pub const STACK_EMPTY: u16 = 0x100;

/// Instructions executed per `tick()`.
pub const DEFAULT_BATCH_SIZE: usize = 255;

const RESET_MESSAGE: &str = "CPU has been successfully reset.";
const ERROR_STATE_MESSAGE: &str = "Cannot run in error state. Please RESET first.";
const ALREADY_RUNNING_MESSAGE: &str = "Already running.";
const HALTED_MESSAGE: &str = "Processing has been halted. RESET to continue.";

bitflags! {
    /// Processor status register.
    ///
    /// Only C, Z, D, V and N are driven by instructions. Other bits survive a
    /// PLP unchanged.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StatusFlags: u8 {
        const CARRY = 0x01;
        const ZERO = 0x02;
        const DECIMAL = 0x08;
        const OVERFLOW = 0x40;
        const NEGATIVE = 0x80;
    }
}

/// Execution state of the CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Not executing. `step()` and `run()` are accepted.
    Idle,
    /// Executing batches via `tick()`.
    Running,
    /// Stopped by a fault. Only `reset()` leaves this state.
    Halted(ExecutionError),
}

/// Construction-time settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuConfig {
    /// Program counter after reset.
    pub start_address: u16,

    /// Instructions executed per `tick()`.
    pub batch_size: usize,

    /// Log every executed instruction, disassembled, to the log sink.
    pub trace: bool,

    /// Seed for the random-number address.
    pub random_seed: u64,
}

impl Default for CpuConfig {
    fn default() -> Self {
        Self {
            start_address: DEFAULT_START,
            batch_size: DEFAULT_BATCH_SIZE,
            trace: false,
            random_seed: 0x6502,
        }
    }
}

/// Point-in-time copy of the registers and run state, for front panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registers {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub p: u8,
    pub pc: u16,
    pub sp: u16,
    pub running: bool,
    pub halted: bool,
    pub instructions_per_second: u64,
}

impl fmt::Display for Registers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "A=${:02X} X=${:02X} Y=${:02X} P={:08b} PC=${:04X} SP=${:04X}",
            self.a, self.x, self.y, self.p, self.pc, self.sp
        )
    }
}

/// The emulated processor.
///
/// # Examples
///
/// ```
/// use emu6502::{Cpu, MemoryBus, RunState};
///
/// let mut cpu = Cpu::headless();
/// assert_eq!(cpu.pc(), 0x0200);
///
/// cpu.poke(0x0200, 0xA9); // LDA #$42
/// cpu.poke(0x0201, 0x42);
/// cpu.step();
///
/// assert_eq!(cpu.a(), 0x42);
/// assert_eq!(cpu.pc(), 0x0202);
/// assert_eq!(cpu.state(), RunState::Idle);
/// ```
pub struct Cpu {
    /// Accumulator register
    pub(crate) a: u8,

    /// X index register
    pub(crate) x: u8,

    /// Y index register
    pub(crate) y: u8,

    /// Status register
    pub(crate) p: StatusFlags,

    /// Program counter (address of next byte to fetch)
    pub(crate) pc: u16,

    /// Stack pointer, 0..=0x100. The top item lives at 0x0100 + sp.
    pub(crate) sp: u16,

    pub(crate) memory: Memory,

    log: Box<dyn LogSink>,
    state: RunState,
    config: CpuConfig,

    instructions: u64,
    window_instructions: u64,
    started_ms: Option<f64>,
    window_start_ms: Option<f64>,
    elapsed_ms: f64,
    instructions_per_second: u64,
}

impl Cpu {
    /// Creates a CPU with default settings and resets it.
    pub fn new(display: Box<dyn DisplaySink>, log: Box<dyn LogSink>) -> Self {
        Self::with_config(display, log, CpuConfig::default())
    }

    /// Creates a CPU with explicit settings and resets it.
    pub fn with_config(
        display: Box<dyn DisplaySink>,
        log: Box<dyn LogSink>,
        config: CpuConfig,
    ) -> Self {
        let mut cpu = Self {
            a: 0,
            x: 0,
            y: 0,
            p: StatusFlags::empty(),
            pc: config.start_address,
            sp: STACK_EMPTY,
            memory: Memory::new(display, config.random_seed),
            log,
            state: RunState::Idle,
            config,
            instructions: 0,
            window_instructions: 0,
            started_ms: None,
            window_start_ms: None,
            elapsed_ms: 0.0,
            instructions_per_second: 0,
        };
        cpu.reset();
        cpu
    }

    /// A CPU with no display and messages routed to the `log` facade.
    pub fn headless() -> Self {
        Self::new(Box::new(NullDisplay), Box::new(FacadeLog))
    }

    /// Zeroes registers and memory, blanks the display and leaves any
    /// Running or Halted state.
    pub fn reset(&mut self) {
        self.a = 0;
        self.x = 0;
        self.y = 0;
        self.p = StatusFlags::empty();
        self.pc = self.config.start_address;
        self.sp = STACK_EMPTY;
        self.memory.clear();
        self.state = RunState::Idle;

        self.instructions = 0;
        self.window_instructions = 0;
        self.started_ms = None;
        self.window_start_ms = None;
        self.elapsed_ms = 0.0;
        self.instructions_per_second = 0;

        self.log(RESET_MESSAGE);
    }

    /// Executes exactly one instruction, then returns to Idle.
    ///
    /// Refused (with a log message) while Running or Halted.
    pub fn step(&mut self) {
        if !self.accepts_start() {
            return;
        }

        self.state = RunState::Running;
        match self.step_instruction() {
            Ok(()) => self.state = RunState::Idle,
            Err(fault) => self.halt(fault),
        }
    }

    /// Enters Running. The host then calls [`tick`](Self::tick) until it
    /// returns `false`.
    ///
    /// Refused (with a log message) while Running or Halted.
    pub fn run(&mut self) {
        if !self.accepts_start() {
            return;
        }

        log::debug!("run from ${:04X}", self.pc);
        self.state = RunState::Running;
        self.started_ms = None;
        self.window_start_ms = None;
        self.window_instructions = 0;
    }

    /// Leaves Running. Has no effect in other states.
    pub fn stop(&mut self) {
        if self.state == RunState::Running {
            log::debug!("stopped at ${:04X}", self.pc);
            self.state = RunState::Idle;
        }
    }

    /// Executes one batch of instructions while Running.
    ///
    /// Returns `true` if the CPU is still Running afterwards, which means the
    /// host should schedule another tick.
    pub fn tick(&mut self) -> bool {
        if self.state != RunState::Running {
            return false;
        }

        for _ in 0..self.config.batch_size {
            if let Err(fault) = self.step_instruction() {
                self.halt(fault);
                return false;
            }
        }

        true
    }

    /// Fetches, decodes and executes one instruction regardless of run state.
    ///
    /// This is the raw engine underneath `step()` and `tick()`; it reports
    /// faults instead of halting.
    pub fn step_instruction(&mut self) -> Result<(), ExecutionError> {
        let address = self.pc;
        let opcode = self.fetch_byte();
        let descriptor = *instruction_table().get(opcode);

        log::trace!("${:04X}: {} ({:?})", address, descriptor.mnemonic, descriptor.mode);
        if self.config.trace {
            let operand = [
                self.memory.raw(address.wrapping_add(1)),
                self.memory.raw(address.wrapping_add(2)),
            ];
            let line = formatter::format_line(address, &descriptor, operand);
            self.log(&line);
        }

        instructions::execute(self, &descriptor)?;

        self.instructions += 1;
        self.window_instructions += 1;
        Ok(())
    }

    /// Records a host timestamp (milliseconds) and refreshes the throughput
    /// figures once per elapsed second.
    pub fn record_time(&mut self, now_ms: f64) {
        let started = *self.started_ms.get_or_insert(now_ms);
        let window_start = *self.window_start_ms.get_or_insert(now_ms);

        self.elapsed_ms = now_ms - started;

        let window = now_ms - window_start;
        if window >= 1000.0 {
            self.instructions_per_second =
                (self.window_instructions as f64 * 1000.0 / window) as u64;
            self.window_instructions = 0;
            self.window_start_ms = Some(now_ms);
        }
    }

    fn accepts_start(&mut self) -> bool {
        match self.state {
            RunState::Idle => true,
            RunState::Running => {
                self.log(ALREADY_RUNNING_MESSAGE);
                false
            }
            RunState::Halted(_) => {
                self.log(ERROR_STATE_MESSAGE);
                false
            }
        }
    }

    fn halt(&mut self, fault: ExecutionError) {
        log::warn!("halted: {}", fault);
        self.log(&fault.to_string());
        self.log(HALTED_MESSAGE);
        self.state = RunState::Halted(fault);
    }

    pub(crate) fn log(&mut self, message: &str) {
        self.log.log(message);
    }

    // ========== Fetch ==========

    /// Reads the byte at PC and advances PC.
    pub(crate) fn fetch_byte(&mut self) -> u8 {
        let value = self.memory.peek(self.pc);
        self.pc = self.pc.wrapping_add(1);
        value
    }

    /// Reads a little-endian word at PC and advances PC past it.
    pub(crate) fn fetch_word(&mut self) -> u16 {
        let low = self.fetch_byte() as u16;
        let high = self.fetch_byte() as u16;
        (high << 8) | low
    }

    // ========== Addressing ==========

    /// Consumes the operand bytes of `mode` and returns the effective address.
    ///
    /// For Immediate the effective address is the operand byte itself. Implied
    /// and Relative have no memory operand; PC is returned untouched.
    pub(crate) fn effective_address(&mut self, mode: AddressingMode) -> u16 {
        match mode {
            AddressingMode::Implied | AddressingMode::Relative => self.pc,
            AddressingMode::Immediate => {
                let address = self.pc;
                self.pc = self.pc.wrapping_add(1);
                address
            }
            AddressingMode::ZeroPage => self.fetch_byte() as u16,
            AddressingMode::ZeroPageX => self.fetch_byte().wrapping_add(self.x) as u16,
            AddressingMode::ZeroPageY => self.fetch_byte().wrapping_add(self.y) as u16,
            AddressingMode::Absolute => self.fetch_word(),
            AddressingMode::AbsoluteX => self.fetch_word().wrapping_add(self.x as u16),
            AddressingMode::AbsoluteY => self.fetch_word().wrapping_add(self.y as u16),
            AddressingMode::Indirect => {
                let pointer = self.fetch_word();
                self.memory.peek_word(pointer)
            }
            AddressingMode::IndirectX => {
                let zp = self.fetch_byte().wrapping_add(self.x) as u16;
                self.memory.peek_word(zp)
            }
            AddressingMode::IndirectY => {
                let zp = self.fetch_byte() as u16;
                self.memory.peek_word(zp).wrapping_add(self.y as u16)
            }
        }
    }

    /// Consumes the operand bytes of `mode` and returns the value they select.
    pub(crate) fn operand_value(&mut self, mode: AddressingMode) -> u8 {
        let address = self.effective_address(mode);
        self.memory.peek(address)
    }

    // ========== Flags ==========

    pub(crate) fn flag(&self, flag: StatusFlags) -> bool {
        self.p.contains(flag)
    }

    pub(crate) fn set_flag(&mut self, flag: StatusFlags, value: bool) {
        self.p.set(flag, value);
    }

    /// N from bit 7, Z if the value is zero.
    pub(crate) fn set_nz(&mut self, value: u8) {
        self.p.set(StatusFlags::NEGATIVE, value & 0x80 != 0);
        self.p.set(StatusFlags::ZERO, value == 0);
    }

    /// Flags for `register - value`: C if no borrow, then N/Z from the low byte.
    pub(crate) fn compare(&mut self, register: u8, value: u8) {
        let difference = 0x100 + register as u16 - value as u16;
        self.p.set(StatusFlags::CARRY, difference >= 0x100);
        self.set_nz(difference as u8);
    }

    // ========== Stack ==========

    pub(crate) fn push(&mut self, value: u8) -> Result<(), ExecutionError> {
        if self.sp == 0 {
            return Err(ExecutionError::StackOverflow);
        }

        self.sp -= 1;
        self.memory.poke(STACK_BASE + self.sp, value);
        Ok(())
    }

    pub(crate) fn pop(&mut self) -> Result<u8, ExecutionError> {
        if self.sp >= STACK_EMPTY {
            return Err(ExecutionError::StackUnderflow);
        }

        let value = self.memory.peek(STACK_BASE + self.sp);
        self.sp += 1;
        Ok(value)
    }

    // ========== Register Getters ==========

    pub fn a(&self) -> u8 {
        self.a
    }

    pub fn x(&self) -> u8 {
        self.x
    }

    pub fn y(&self) -> u8 {
        self.y
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    /// Stack pointer as an offset into the stack page. 0x100 means empty.
    pub fn sp(&self) -> u16 {
        self.sp
    }

    pub fn status(&self) -> StatusFlags {
        self.p
    }

    pub fn flag_c(&self) -> bool {
        self.flag(StatusFlags::CARRY)
    }

    pub fn flag_z(&self) -> bool {
        self.flag(StatusFlags::ZERO)
    }

    pub fn flag_d(&self) -> bool {
        self.flag(StatusFlags::DECIMAL)
    }

    pub fn flag_v(&self) -> bool {
        self.flag(StatusFlags::OVERFLOW)
    }

    pub fn flag_n(&self) -> bool {
        self.flag(StatusFlags::NEGATIVE)
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    pub fn is_halted(&self) -> bool {
        matches!(self.state, RunState::Halted(_))
    }

    /// Total instructions executed since reset.
    pub fn instructions(&self) -> u64 {
        self.instructions
    }

    pub fn instructions_per_second(&self) -> u64 {
        self.instructions_per_second
    }

    /// Milliseconds between the first and latest `record_time` since `run()`.
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn config(&self) -> &CpuConfig {
        &self.config
    }

    /// Turns per-instruction trace logging on or off.
    pub fn set_trace(&mut self, trace: bool) {
        self.config.trace = trace;
    }

    pub fn registers(&self) -> Registers {
        Registers {
            a: self.a,
            x: self.x,
            y: self.y,
            p: self.p.bits(),
            pc: self.pc,
            sp: self.sp,
            running: self.is_running(),
            halted: self.is_halted(),
            instructions_per_second: self.instructions_per_second,
        }
    }

    // ========== Register Setters ==========

    pub fn set_a(&mut self, value: u8) {
        self.a = value;
    }

    pub fn set_x(&mut self, value: u8) {
        self.x = value;
    }

    pub fn set_y(&mut self, value: u8) {
        self.y = value;
    }

    pub fn set_pc(&mut self, value: u16) {
        self.pc = value;
    }

    /// Sets the stack pointer. Values above 0x100 are clamped to empty.
    pub fn set_sp(&mut self, value: u16) {
        self.sp = value.min(STACK_EMPTY);
    }

    pub fn set_status(&mut self, value: StatusFlags) {
        self.p = value;
    }

    pub fn set_flag_c(&mut self, value: bool) {
        self.set_flag(StatusFlags::CARRY, value);
    }

    pub fn set_flag_z(&mut self, value: bool) {
        self.set_flag(StatusFlags::ZERO, value);
    }

    pub fn set_flag_d(&mut self, value: bool) {
        self.set_flag(StatusFlags::DECIMAL, value);
    }

    pub fn set_flag_v(&mut self, value: bool) {
        self.set_flag(StatusFlags::OVERFLOW, value);
    }

    pub fn set_flag_n(&mut self, value: bool) {
        self.set_flag(StatusFlags::NEGATIVE, value);
    }
}

impl MemoryBus for Cpu {
    fn peek(&self, address: u16) -> u8 {
        self.memory.peek(address)
    }

    fn poke(&mut self, address: u16, value: u8) {
        self.memory.poke(address, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::ConsoleLog;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn cpu_with_console() -> (Cpu, Rc<RefCell<ConsoleLog>>) {
        let console = Rc::new(RefCell::new(ConsoleLog::new()));
        let cpu = Cpu::new(Box::new(NullDisplay), Box::new(Rc::clone(&console)));
        (cpu, console)
    }

    #[test]
    fn test_cpu_initialization() {
        let (cpu, console) = cpu_with_console();

        assert_eq!(cpu.a(), 0);
        assert_eq!(cpu.x(), 0);
        assert_eq!(cpu.y(), 0);
        assert_eq!(cpu.status(), StatusFlags::empty());
        assert_eq!(cpu.pc(), 0x0200);
        assert_eq!(cpu.sp(), 0x100);
        assert_eq!(cpu.state(), RunState::Idle);
        assert_eq!(console.borrow().last(), Some(RESET_MESSAGE));
    }

    #[test]
    fn test_custom_start_address() {
        let config = CpuConfig {
            start_address: 0x0600,
            ..CpuConfig::default()
        };
        let cpu = Cpu::with_config(Box::new(NullDisplay), Box::new(FacadeLog), config);
        assert_eq!(cpu.pc(), 0x0600);
    }

    #[test]
    fn test_push_pop_bounds() {
        let mut cpu = Cpu::headless();

        assert_eq!(cpu.pop(), Err(ExecutionError::StackUnderflow));

        for i in 0..256 {
            cpu.push(i as u8).unwrap();
        }
        assert_eq!(cpu.sp(), 0);
        assert_eq!(cpu.peek(0x01FF), 0x00);
        assert_eq!(cpu.peek(0x0100), 0xFF);
        assert_eq!(cpu.push(0), Err(ExecutionError::StackOverflow));

        assert_eq!(cpu.pop(), Ok(0xFF));
        assert_eq!(cpu.sp(), 1);
    }

    #[test]
    fn test_compare_flags() {
        let mut cpu = Cpu::headless();

        cpu.compare(0x10, 0x10);
        assert!(cpu.flag_c() && cpu.flag_z() && !cpu.flag_n());

        cpu.compare(0x10, 0x20);
        assert!(!cpu.flag_c() && !cpu.flag_z() && cpu.flag_n());

        cpu.compare(0x20, 0x10);
        assert!(cpu.flag_c() && !cpu.flag_z() && !cpu.flag_n());
    }

    #[test]
    fn test_indirect_indexed_does_not_wrap_zero_page() {
        let mut cpu = Cpu::headless();
        cpu.poke(0x0200, 0x40);
        cpu.poke(0x0040, 0xFF);
        cpu.poke(0x0041, 0x12);
        cpu.set_y(0x01);

        assert_eq!(cpu.effective_address(AddressingMode::IndirectY), 0x1300);
    }

    #[test]
    fn test_zero_page_indexed_wraps() {
        let mut cpu = Cpu::headless();
        cpu.poke(0x0200, 0xF0);
        cpu.set_x(0x20);

        assert_eq!(cpu.effective_address(AddressingMode::ZeroPageX), 0x0010);
    }

    #[test]
    fn test_registers_display() {
        let mut cpu = Cpu::headless();
        cpu.set_a(0x1F);
        cpu.set_flag_c(true);
        cpu.set_flag_n(true);

        assert_eq!(
            cpu.registers().to_string(),
            "A=$1F X=$00 Y=$00 P=10000001 PC=$0200 SP=$0100"
        );
    }

    #[test]
    fn test_record_time_reports_rate() {
        let mut cpu = Cpu::headless();
        cpu.poke(0x0200, 0x4C); // JMP $0200
        cpu.poke(0x0201, 0x00);
        cpu.poke(0x0202, 0x02);

        cpu.run();
        cpu.record_time(0.0);
        for _ in 0..4 {
            assert!(cpu.tick());
        }
        cpu.record_time(500.0);
        assert_eq!(cpu.instructions_per_second(), 0);

        cpu.record_time(2000.0);
        assert_eq!(cpu.elapsed_ms(), 2000.0);
        assert_eq!(cpu.instructions_per_second(), 4 * 255 / 2);
    }
}
