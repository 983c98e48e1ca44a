//! # Memory
//!
//! This module provides the `MemoryBus` capability that the assembler and the
//! decompiler use to reach memory through the CPU, and `Memory`, the 64KB
//! address space the CPU owns.
//!
//! ## Memory Map
//!
//! | Range         | Purpose                                         |
//! |---------------|-------------------------------------------------|
//! | $00FD         | Random number generator (reads a fresh byte)    |
//! | $0100-$01FF   | Stack page                                      |
//! | $0200         | Default program start                           |
//! | $FC00-$FFFF   | Display window (32x32 pixels)                   |
//!
//! ## Design Principles
//!
//! - No bus errors: every `u16` is a valid address, so reads and writes always succeed
//! - Writes into the display window are forwarded to a `DisplaySink` before returning
//! - The random-number address never reflects stored state

use std::cell::RefCell;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::devices::DisplaySink;

/// Number of addressable bytes.
pub const MEMORY_SIZE: usize = 0x10000;

/// Base of the 256-byte stack page.
pub const STACK_BASE: u16 = 0x0100;

/// Program counter after reset.
pub const DEFAULT_START: u16 = 0x0200;

/// First address of the display window.
pub const DISPLAY_START: u16 = 0xFC00;

/// Size of the display window in bytes.
pub const DISPLAY_SIZE: usize = 0x400;

/// Reads from this address yield a random byte.
pub const RANDOM_ADDRESS: u16 = 0x00FD;

/// Byte-level read/write capability.
///
/// The CPU implements this for callers outside the core (assembler, decompiler,
/// front panels) so that every access goes through the single owner of memory.
///
/// # Examples
///
/// ```
/// use emu6502::{Cpu, MemoryBus};
///
/// let mut cpu = Cpu::headless();
///
/// cpu.poke(0x1234, 0x42);
/// assert_eq!(cpu.peek(0x1234), 0x42);
/// ```
pub trait MemoryBus {
    /// Reads a byte. Never fails.
    fn peek(&self, address: u16) -> u8;

    /// Writes a byte. Never fails.
    fn poke(&mut self, address: u16, value: u8);

    /// Reads a little-endian word, wrapping at the top of memory.
    fn peek_word(&self, address: u16) -> u16 {
        let low = self.peek(address) as u16;
        let high = self.peek(address.wrapping_add(1)) as u16;
        (high << 8) | low
    }
}

/// True if `address` falls in the memory-mapped display window.
pub fn in_display_window(address: u16) -> bool {
    address >= DISPLAY_START
}

/// The 64KB address space.
pub struct Memory {
    data: Box<[u8; MEMORY_SIZE]>,
    rng: RefCell<StdRng>,
    display: Box<dyn DisplaySink>,
}

impl Memory {
    /// Zeroed memory that reports display writes to `display`.
    pub fn new(display: Box<dyn DisplaySink>, random_seed: u64) -> Self {
        Self {
            data: Box::new([0; MEMORY_SIZE]),
            rng: RefCell::new(StdRng::seed_from_u64(random_seed)),
            display,
        }
    }

    /// Zeroes every byte. Display pixels that were lit are reported as
    /// cleared so the sink ends up blank too.
    pub fn clear(&mut self) {
        for offset in 0..DISPLAY_SIZE {
            let address = DISPLAY_START + offset as u16;
            if self.data[address as usize] != 0 {
                self.display.on_write(address, 0);
            }
        }

        self.data.fill(0);
    }

    /// Stored byte at `address`, bypassing the random-number address.
    pub(crate) fn raw(&self, address: u16) -> u8 {
        self.data[address as usize]
    }
}

impl MemoryBus for Memory {
    fn peek(&self, address: u16) -> u8 {
        if address == RANDOM_ADDRESS {
            return self.rng.borrow_mut().gen();
        }

        self.data[address as usize]
    }

    fn poke(&mut self, address: u16, value: u8) {
        self.data[address as usize] = value;

        if in_display_window(address) {
            self.display.on_write(address, value);
        }
    }
}
