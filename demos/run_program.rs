//! Compile a program, run it in batches, and show the result
//!
//! Prints the console log, the registers, and a decompiled listing.

use std::cell::RefCell;
use std::rc::Rc;

use emu6502::{decompile, dump, Assembler, ConsoleLog, Cpu, MemoryBus, PixelBuffer};

fn main() {
    let screen = Rc::new(RefCell::new(PixelBuffer::new()));
    let console = Rc::new(RefCell::new(ConsoleLog::new()));
    let mut cpu = Cpu::new(Box::new(Rc::clone(&screen)), Box::new(Rc::clone(&console)));

    let source = r#"
        ; paint the first display row with a gradient
        LDX #$00
    PAINT:
        TXA
        STA $FC00,X
        INX
        CPX #$20
        BNE PAINT
        DCB $FF         ; unused opcode stops the run
    "#;

    if !Assembler::new().compile(&mut cpu, source) {
        for line in console.borrow().lines() {
            eprintln!("{}", line);
        }
        return;
    }

    cpu.run();
    while cpu.tick() {}

    for line in console.borrow().lines() {
        println!("{}", line);
    }
    println!("{}", cpu.registers());
    println!("Pixel (31, 0) = {:02X}", screen.borrow().pixel(31, 0));
    println!("Byte at $FC1F = {:02X}", cpu.peek(0xFC1F));

    println!();
    println!("{}", decompile(&cpu, 0x0200).lines().take(7).collect::<Vec<_>>().join("\n"));
    println!();
    println!("{}", dump(&cpu, 0xFC00).lines().take(4).collect::<Vec<_>>().join("\n"));
}
