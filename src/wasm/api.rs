//! WASM API for the 6502 emulator.
//!
//! Provides JavaScript-callable interfaces for CPU control, state inspection,
//! and assembly/decompilation. The page supplies two callbacks: one receiving
//! display writes as `(address, value)` and one receiving log lines.

use crate::{decompile, dump, Assembler, Cpu, CpuConfig, DisplaySink, LogSink, MemoryBus};
use wasm_bindgen::prelude::*;

/// Forwards display-window writes to a JavaScript callback.
struct JsDisplay {
    on_write: js_sys::Function,
}

impl DisplaySink for JsDisplay {
    fn on_write(&mut self, address: u16, value: u8) {
        let _ = self.on_write.call2(
            &JsValue::NULL,
            &JsValue::from(address),
            &JsValue::from(value),
        );
    }
}

/// Forwards log messages to a JavaScript callback.
struct JsLog {
    on_log: js_sys::Function,
}

impl LogSink for JsLog {
    fn log(&mut self, message: &str) {
        let _ = self.on_log.call1(&JsValue::NULL, &JsValue::from_str(message));
    }
}

/// Main emulator interface for JavaScript
#[wasm_bindgen]
pub struct Emulator {
    cpu: Cpu,
    assembler: Assembler,
}

#[wasm_bindgen]
impl Emulator {
    /// Create an emulator wired to the page's display and console callbacks
    #[wasm_bindgen(constructor)]
    pub fn new(on_display_write: js_sys::Function, on_log: js_sys::Function) -> Self {
        let config = CpuConfig {
            random_seed: (js_sys::Math::random() * u32::MAX as f64) as u64,
            ..CpuConfig::default()
        };

        let cpu = Cpu::with_config(
            Box::new(JsDisplay {
                on_write: on_display_write,
            }),
            Box::new(JsLog { on_log }),
            config,
        );

        Emulator {
            cpu,
            assembler: Assembler::new(),
        }
    }

    /// Reset registers and memory
    pub fn reset(&mut self) {
        self.cpu.reset();
    }

    /// Execute a single instruction
    pub fn step(&mut self) {
        self.cpu.step();
    }

    /// Start running; the page then calls `tick()` from its animation loop
    pub fn run(&mut self) {
        self.cpu.run();
    }

    pub fn stop(&mut self) {
        self.cpu.stop();
    }

    /// Execute one batch. Returns true while the CPU should be ticked again.
    pub fn tick(&mut self) -> bool {
        let again = self.cpu.tick();
        self.cpu.record_time(js_sys::Date::now());
        again
    }

    /// Assemble source into memory. Progress and errors go to the log callback.
    pub fn compile(&mut self, source: &str) -> bool {
        self.assembler.compile(&mut self.cpu, source)
    }

    pub fn decompile(&self, start_addr: u16) -> String {
        decompile(&self.cpu, start_addr)
    }

    pub fn dump(&self, start_addr: u16) -> String {
        dump(&self.cpu, start_addr)
    }

    // Memory access methods

    pub fn peek(&self, addr: u16) -> u8 {
        self.cpu.peek(addr)
    }

    pub fn poke(&mut self, addr: u16, value: u8) {
        self.cpu.poke(addr, value);
    }

    // Register setters

    /// Set the program counter
    pub fn set_pc(&mut self, addr: u16) {
        self.cpu.set_pc(addr);
    }

    /// Log every executed instruction
    pub fn set_trace(&mut self, trace: bool) {
        self.cpu.set_trace(trace);
    }

    // Register getters
    #[wasm_bindgen(getter)]
    pub fn a(&self) -> u8 {
        self.cpu.a()
    }

    #[wasm_bindgen(getter)]
    pub fn x(&self) -> u8 {
        self.cpu.x()
    }

    #[wasm_bindgen(getter)]
    pub fn y(&self) -> u8 {
        self.cpu.y()
    }

    #[wasm_bindgen(getter)]
    pub fn p(&self) -> u8 {
        self.cpu.status().bits()
    }

    #[wasm_bindgen(getter)]
    pub fn pc(&self) -> u16 {
        self.cpu.pc()
    }

    #[wasm_bindgen(getter)]
    pub fn sp(&self) -> u16 {
        self.cpu.sp()
    }

    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool {
        self.cpu.is_running()
    }

    #[wasm_bindgen(getter)]
    pub fn halted(&self) -> bool {
        self.cpu.is_halted()
    }

    #[wasm_bindgen(getter)]
    pub fn instructions_per_second(&self) -> f64 {
        self.cpu.instructions_per_second() as f64 // u64 is a BigInt in JavaScript
    }

    /// Register line as shown on the front panel
    #[wasm_bindgen(getter)]
    pub fn registers(&self) -> String {
        self.cpu.registers().to_string()
    }

    // Flag getters
    #[wasm_bindgen(getter)]
    pub fn flag_n(&self) -> bool {
        self.cpu.flag_n()
    }

    #[wasm_bindgen(getter)]
    pub fn flag_v(&self) -> bool {
        self.cpu.flag_v()
    }

    #[wasm_bindgen(getter)]
    pub fn flag_d(&self) -> bool {
        self.cpu.flag_d()
    }

    #[wasm_bindgen(getter)]
    pub fn flag_z(&self) -> bool {
        self.cpu.flag_z()
    }

    #[wasm_bindgen(getter)]
    pub fn flag_c(&self) -> bool {
        self.cpu.flag_c()
    }
}
