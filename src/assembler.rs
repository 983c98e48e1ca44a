//! Two-pass assembler
//!
//! Converts assembly source text into machine code and loads it into memory.
//!
//! # Source Format
//!
//! Source is line oriented and case-insensitive. Everything after `;` is a
//! comment. Each line is one of:
//!
//! | Form                  | Meaning                                      |
//! |-----------------------|----------------------------------------------|
//! | `*=$C000`, `*=49152`  | set the emission address                     |
//! | `NAME = OTHER + 4`    | define a label relative to another label     |
//! | `$C000:`, `49152:`    | set the emission address (may prefix code)   |
//! | `NAME:`               | define a label here (may prefix code)        |
//! | `LDA #$01`            | an instruction                               |
//! | `DCB 1,2,$FF`         | literal bytes                                |
//!
//! # Passes
//!
//! 1. Every line is encoded as soon as it is read, so that label addresses are
//!    known. References to labels that are not defined yet get a placeholder
//!    operand and are remembered. Label math is resolved at the end of the pass.
//! 2. Every remembered reference is looked up and its placeholder patched.
//!
//! Nothing is written to memory unless both passes succeed.
//!
//! # Examples
//!
//! ```
//! use emu6502::assemble;
//!
//! let result = assemble("
//!     JMP START
//!     DCB 1,2,3
//! START:
//!     LDA #$01
//! ").unwrap();
//!
//! assert_eq!(result.lines[0].bytes, vec![0x4C, 0x06, 0x02]);
//! assert_eq!(result.label("START").map(|l| l.address), Some(0x0206));
//! assert_eq!(result.byte_count(), 8);
//! ```

pub mod encoder;
pub mod parser;
pub mod symbol_table;

use std::collections::HashMap;

use thiserror::Error;

use crate::addressing::AddressingMode;
use crate::cpu::Cpu;
use crate::memory::{MemoryBus, DEFAULT_START};
use crate::opcodes::{instruction_table, InstructionDescriptor, Operation};
use parser::Statement;
use symbol_table::SymbolTable;

/// A label and the address it names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub name: String,

    pub address: u16,

    /// Set while a label-math definition waits for resolution.
    pub dependency: Option<Dependency>,

    /// Source line (1-indexed) of the definition, not an address.
    pub line: usize,
}

/// The `OTHER + offset` half of a label-math definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub label: String,
    pub offset: i32,
}

/// Which byte of a label's address a one-byte operand takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteSelect {
    Low,
    High,
}

impl ByteSelect {
    pub fn apply(self, address: u16) -> u8 {
        match self {
            ByteSelect::Low => (address & 0xFF) as u8,
            ByteSelect::High => (address >> 8) as u8,
        }
    }
}

/// A reference to a label that was not defined when its line was encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelRef {
    pub name: String,
    pub select: ByteSelect,
}

/// The encoded form of one source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledLine {
    /// Address of the first byte.
    pub address: u16,

    pub bytes: Vec<u8>,

    /// Descriptor the bytes were encoded from. For `DCB` its size is the
    /// number of bytes emitted.
    pub descriptor: InstructionDescriptor,

    /// Source line (1-indexed)
    pub source_line: usize,

    /// Label still to be patched in. Always `None` after a successful
    /// assembly.
    pub pending: Option<LabelRef>,
}

/// Output of a successful assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationResult {
    pub labels: Vec<Label>,

    pub lines: Vec<CompiledLine>,

    /// Most recent address set by `*=` or an address label, if any.
    pub origin: Option<u16>,

    /// Number of address labels (`$C000:`) seen.
    pub memory_tags: usize,
}

impl CompilationResult {
    /// Total number of bytes across all lines.
    pub fn byte_count(&self) -> usize {
        self.lines.iter().map(|line| line.bytes.len()).sum()
    }

    pub fn label(&self, name: &str) -> Option<&Label> {
        self.labels.iter().find(|label| label.name == name)
    }

    /// Writes every line's bytes to `bus` at its address. Returns the number of
    /// bytes written.
    pub fn write_to<B: MemoryBus + ?Sized>(&self, bus: &mut B) -> usize {
        for line in &self.lines {
            for (offset, byte) in line.bytes.iter().enumerate() {
                bus.poke(line.address.wrapping_add(offset as u16), *byte);
            }
        }
        self.byte_count()
    }
}

/// An error that aborted assembly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}{kind}", line_prefix(.line))]
pub struct AssemblerError {
    /// Source line (1-indexed), when the error belongs to one.
    pub line: Option<usize>,

    pub kind: ErrorKind,
}

impl AssemblerError {
    pub(crate) fn at(line: usize, kind: ErrorKind) -> Self {
        Self {
            line: Some(line),
            kind,
        }
    }
}

fn line_prefix(line: &Option<usize>) -> String {
    match line {
        Some(line) => format!("Line {}: ", line),
        None => String::new(),
    }
}

/// Classification of assembly errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("Invalid op code: {0}")]
    InvalidMnemonic(String),

    /// Text that matches no statement or operand grammar.
    #[error("Invalid assembly: {0}")]
    InvalidSyntax(String),

    #[error("{mnemonic} does not support {mode} mode")]
    UnsupportedMode {
        mnemonic: String,
        mode: AddressingMode,
    },

    /// An operand value too large for its encoding.
    #[error("Value out of range: {0}")]
    OutOfRange(u32),

    #[error("Address out of range: {0}")]
    AddressOutOfRange(String),

    #[error("Duplicate label {0}")]
    DuplicateLabel(String),

    #[error("Cannot redefine label {0} in terms of itself")]
    SelfReferentialLabel(String),

    #[error("Unable to process label {label}: missing dependent label {dependency}")]
    MissingDependentLabel { label: String, dependency: String },

    /// Label math that never bottoms out in a plain label.
    #[error("Unable to process label {0}: circular label math")]
    CircularLabel(String),

    #[error("Label not defined: {0}")]
    UndefinedLabel(String),

    #[error("DCB with invalid value list: {0}")]
    InvalidDirective(String),

    #[error("DCB list too long: {0} bytes")]
    DirectiveTooLong(usize),

    #[error("Not implemented: cannot patch a {0}-byte instruction")]
    UnimplementedPatch(usize),
}

/// State carried from the first pass to the second.
#[derive(Debug)]
struct FirstPass {
    symbols: SymbolTable,
    lines: Vec<CompiledLine>,
    origin: Option<u16>,
    memory_tags: usize,
}

/// Assembler front end.
///
/// Keeps a per-mnemonic cache of candidate descriptors across compilations.
#[derive(Debug, Default)]
pub struct Assembler {
    cache: HashMap<String, &'static [InstructionDescriptor]>,
}

impl Assembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assembles `source` and loads it into the CPU's memory.
    ///
    /// Progress and any error are reported to the CPU's log sink. On success
    /// the program counter is set to the last address chosen by the source
    /// (`*=` or an address label), or left where it was. On failure memory
    /// and registers are untouched and `false` is returned.
    pub fn compile(&mut self, cpu: &mut Cpu, source: &str) -> bool {
        cpu.log("Starting compilation.");

        let outcome = self.compile_passes(cpu, source);
        match outcome {
            Ok(result) => {
                cpu.log("Compilation complete.");

                let total = result.write_to(cpu);
                cpu.log(&format!("{} bytes of code loaded to memory.", total));

                let pc = result.origin.unwrap_or(cpu.pc());
                cpu.set_pc(pc);
                true
            }
            Err(error) => {
                log::debug!("compilation failed: {}", error);
                cpu.log(&error.to_string());
                false
            }
        }
    }

    fn compile_passes(
        &mut self,
        cpu: &mut Cpu,
        source: &str,
    ) -> Result<CompilationResult, AssemblerError> {
        cpu.log("Starting compilation pass 1.");
        let first = self.first_pass(source)?;
        cpu.log(&format!(
            "Parsed {} memory tags and {} labels.",
            first.memory_tags,
            first.symbols.len()
        ));

        cpu.log("Starting compilation pass 2.");
        second_pass(first)
    }

    /// Assembles `source` without touching any memory.
    pub fn assemble(&mut self, source: &str) -> Result<CompilationResult, AssemblerError> {
        let first = self.first_pass(source)?;
        second_pass(first)
    }

    fn candidates(&mut self, mnemonic: &str) -> Result<&'static [InstructionDescriptor], ErrorKind> {
        if let Some(candidates) = self.cache.get(mnemonic) {
            return Ok(*candidates);
        }

        let candidates = instruction_table()
            .by_mnemonic(mnemonic)
            .ok_or_else(|| ErrorKind::InvalidMnemonic(mnemonic.to_string()))?;
        self.cache.insert(mnemonic.to_string(), candidates);
        Ok(candidates)
    }

    fn first_pass(&mut self, source: &str) -> Result<FirstPass, AssemblerError> {
        log::debug!("pass 1");

        let mut pass = FirstPass {
            symbols: SymbolTable::new(),
            lines: Vec::new(),
            origin: None,
            memory_tags: 0,
        };
        let mut address = DEFAULT_START;

        for (index, raw) in source.lines().enumerate() {
            let line_number = index + 1;
            let at = |kind: ErrorKind| AssemblerError::at(line_number, kind);

            let normalized = parser::normalize(raw);
            if normalized.is_empty() {
                continue;
            }

            let code = match parser::classify(&normalized).map_err(at)? {
                Statement::SetAddress(target) => {
                    pass.origin = Some(target);
                    address = target;
                    continue;
                }
                Statement::LabelMath {
                    name,
                    dependency,
                    offset,
                } => {
                    pass.symbols
                        .define_relative(name, dependency, offset, address, line_number)
                        .map_err(at)?;
                    continue;
                }
                Statement::AddressLabel { address: target, rest } => {
                    pass.memory_tags += 1;
                    pass.origin = Some(target);
                    address = target;
                    rest
                }
                Statement::Label { name, rest } => {
                    pass.symbols.define(name, address, line_number).map_err(at)?;
                    rest
                }
                Statement::Instruction { .. } => normalized.as_str(),
            };

            if code.is_empty() {
                continue;
            }

            let line = self
                .encode_line(code, address, line_number, &pass.symbols)
                .map_err(at)?;
            address = address.wrapping_add(line.bytes.len() as u16);
            pass.lines.push(line);
        }

        pass.symbols.resolve_dependencies()?;
        Ok(pass)
    }

    fn encode_line(
        &mut self,
        code: &str,
        address: u16,
        source_line: usize,
        symbols: &SymbolTable,
    ) -> Result<CompiledLine, ErrorKind> {
        let Statement::Instruction { mnemonic, operand } = parser::parse_instruction(code)? else {
            return Err(ErrorKind::InvalidSyntax(code.to_string()));
        };

        let candidates = self.candidates(mnemonic)?;

        if let Some(directive) = candidates.iter().find(|d| d.operation == Operation::Dcb) {
            let bytes = parser::parse_byte_list(operand)?;
            let size =
                u8::try_from(bytes.len()).map_err(|_| ErrorKind::DirectiveTooLong(bytes.len()))?;
            let descriptor = InstructionDescriptor {
                size,
                ..*directive
            };
            return Ok(CompiledLine {
                address,
                bytes,
                descriptor,
                source_line,
                pending: None,
            });
        }

        let operand = parser::parse_operand(operand)?;
        let encoded = encoder::encode(mnemonic, candidates, &operand, address, symbols)?;

        Ok(CompiledLine {
            address,
            bytes: encoded.bytes,
            descriptor: encoded.descriptor,
            source_line,
            pending: encoded.pending,
        })
    }
}

fn second_pass(first: FirstPass) -> Result<CompilationResult, AssemblerError> {
    log::debug!("pass 2");

    let FirstPass {
        symbols,
        mut lines,
        origin,
        memory_tags,
    } = first;

    for line in lines.iter_mut() {
        let Some(pending) = line.pending.as_ref() else {
            continue;
        };

        let target = symbols
            .lookup(&pending.name)
            .map(|label| label.address)
            .ok_or_else(|| {
                AssemblerError::at(
                    line.source_line,
                    ErrorKind::UndefinedLabel(pending.name.clone()),
                )
            })?;

        encoder::patch(line, target).map_err(|kind| AssemblerError::at(line.source_line, kind))?;
    }

    Ok(CompilationResult {
        labels: symbols.into_labels(),
        lines,
        origin,
        memory_tags,
    })
}

/// Assembles `source` without touching any memory.
///
/// Emission starts at $0200 unless the source sets an address.
pub fn assemble(source: &str) -> Result<CompilationResult, AssemblerError> {
    Assembler::new().assemble(source)
}
