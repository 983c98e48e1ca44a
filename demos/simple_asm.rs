//! Basic assembler usage example

use emu6502::assemble;

fn main() {
    let source = r#"
        LDA #$42
        STA $0300
    LOOP:
        DEX
        BNE LOOP
        DCB $DE,$AD
    "#;

    match assemble(source) {
        Ok(output) => {
            println!("Assembled {} bytes:", output.byte_count());
            for line in &output.lines {
                print!("${:04X}:", line.address);
                for byte in &line.bytes {
                    print!(" {:02X}", byte);
                }
                println!();
            }
            for label in &output.labels {
                println!("{} = ${:04X}", label.name, label.address);
            }
        }
        Err(error) => {
            eprintln!("Assembly failed: {}", error);
        }
    }
}
