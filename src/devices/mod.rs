//! External collaborators of the emulator core.
//!
//! The core never renders pixels or prints text itself. It talks to the outside
//! world through two narrow capabilities:
//!
//! - **DisplaySink**: notified synchronously for every write that lands in the
//!   memory-mapped display window
//! - **LogSink**: receives lifecycle messages (reset, halt, compile progress) and
//!   runtime fault reports
//!
//! Both are handed to the CPU at construction time. A host that also needs to
//! look at the sink afterwards (to paint a canvas or show the console) wraps it
//! in `Rc<RefCell<_>>` and keeps a clone of the handle.
//!
//! # Example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use emu6502::{ConsoleLog, Cpu, MemoryBus, PixelBuffer};
//!
//! let screen = Rc::new(RefCell::new(PixelBuffer::new()));
//! let console = Rc::new(RefCell::new(ConsoleLog::new()));
//!
//! let mut cpu = Cpu::new(Box::new(Rc::clone(&screen)), Box::new(Rc::clone(&console)));
//! cpu.poke(0xFC00, 0x05);
//!
//! assert_eq!(screen.borrow().pixel(0, 0), 0x05);
//! assert_eq!(
//!     console.borrow().last(),
//!     Some("CPU has been successfully reset.")
//! );
//! ```

use std::cell::RefCell;
use std::rc::Rc;

pub mod console;
pub mod display;

pub use console::ConsoleLog;
pub use display::PixelBuffer;

/// Receiver for writes into the memory-mapped display window.
pub trait DisplaySink {
    /// Called with the raw (unmasked) address and the byte written.
    fn on_write(&mut self, address: u16, value: u8);
}

/// Receiver for textual lifecycle and fault messages.
pub trait LogSink {
    fn log(&mut self, message: &str);
}

impl<T: DisplaySink + ?Sized> DisplaySink for Rc<RefCell<T>> {
    fn on_write(&mut self, address: u16, value: u8) {
        self.borrow_mut().on_write(address, value);
    }
}

impl<T: LogSink + ?Sized> LogSink for Rc<RefCell<T>> {
    fn log(&mut self, message: &str) {
        self.borrow_mut().log(message);
    }
}

/// Display sink that ignores every write.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDisplay;

impl DisplaySink for NullDisplay {
    fn on_write(&mut self, _address: u16, _value: u8) {}
}

/// Log sink that forwards every message to the `log` facade at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct FacadeLog;

impl LogSink for FacadeLog {
    fn log(&mut self, message: &str) {
        log::info!("{}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        writes: Vec<(u16, u8)>,
    }

    impl DisplaySink for Recorder {
        fn on_write(&mut self, address: u16, value: u8) {
            self.writes.push((address, value));
        }
    }

    #[test]
    fn test_shared_display_handle_sees_writes() {
        let shared = Rc::new(RefCell::new(Recorder::default()));
        let mut sink: Box<dyn DisplaySink> = Box::new(Rc::clone(&shared));

        sink.on_write(0xFC10, 0x07);
        sink.on_write(0xFFFF, 0x01);

        assert_eq!(shared.borrow().writes, vec![(0xFC10, 0x07), (0xFFFF, 0x01)]);
    }

    #[test]
    fn test_shared_log_handle_sees_messages() {
        let shared = Rc::new(RefCell::new(ConsoleLog::new()));
        let mut sink: Box<dyn LogSink> = Box::new(Rc::clone(&shared));

        sink.log("hello");

        assert_eq!(shared.borrow().last(), Some("hello"));
    }
}
