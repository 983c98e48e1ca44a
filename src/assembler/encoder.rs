//! Instruction encoder for the assembler
//!
//! Picks the descriptor for a parsed operand, emits its bytes, and patches
//! placeholder bytes once forward labels are known.

use super::parser::{Operand, Value};
use super::symbol_table::SymbolTable;
use super::{ByteSelect, CompiledLine, ErrorKind, LabelRef};
use crate::addressing::AddressingMode;
use crate::opcodes::InstructionDescriptor;

/// Operand value used for an absolute-family label that is not defined yet.
/// It never fits in one byte, so the 3-byte form is chosen.
const ABSOLUTE_PLACEHOLDER: u32 = 0xFFFF;

/// Operand value used for a one-byte label reference that is not defined yet.
const BYTE_PLACEHOLDER: u32 = 0x00;

/// An encoded instruction, possibly waiting for a label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    pub descriptor: InstructionDescriptor,
    pub bytes: Vec<u8>,
    pub pending: Option<LabelRef>,
}

/// Offset byte for a branch at `address` whose target is `target`.
///
/// Offsets are not range-checked: a target more than a signed byte away
/// wraps around.
///
/// ```
/// use emu6502::assembler::encoder::branch_offset;
///
/// assert_eq!(branch_offset(0x0201, 0x0200), 0xFD);
/// assert_eq!(branch_offset(0x0200, 0x0281), 0x7F);
/// ```
pub fn branch_offset(address: u16, target: u32) -> u8 {
    let address = address as i64;
    let target = target as i64;

    let offset = if target <= address {
        0xFF - ((address + 1) - target)
    } else {
        (target - address) - 2
    };

    (offset & 0xFF) as u8
}

/// Encodes one instruction line at `address`.
///
/// `candidates` are all descriptors sharing the line's mnemonic.
pub fn encode(
    mnemonic: &str,
    candidates: &[InstructionDescriptor],
    operand: &Operand,
    address: u16,
    symbols: &SymbolTable,
) -> Result<Encoded, ErrorKind> {
    let encoder = LineEncoder {
        mnemonic,
        candidates,
        symbols,
    };

    if let Some(branch) = encoder.find(AddressingMode::Relative) {
        return encoder.branch(branch, operand, address);
    }

    match operand {
        Operand::None | Operand::Accumulator => {
            let descriptor = encoder.require(AddressingMode::Implied)?;
            Ok(emit(descriptor, 0, None))
        }

        Operand::Immediate(value) => {
            check_range(*value, 0xFF)?;
            let descriptor = encoder.require(AddressingMode::Immediate)?;
            Ok(emit(descriptor, *value, None))
        }

        Operand::ImmediateLabel { label, high } => {
            let select = if *high { ByteSelect::High } else { ByteSelect::Low };
            let descriptor = encoder.require(AddressingMode::Immediate)?;

            let (value, pending) = match symbols.lookup(label) {
                Some(found) => (select.apply(found.address) as u32, None),
                None => (
                    BYTE_PLACEHOLDER,
                    Some(LabelRef {
                        name: label.clone(),
                        select,
                    }),
                ),
            };
            Ok(emit(descriptor, value, pending))
        }

        Operand::IndirectX(value) => encoder.zero_page_pointer(value, AddressingMode::IndirectX),
        Operand::IndirectY(value) => encoder.zero_page_pointer(value, AddressingMode::IndirectY),

        Operand::IndexedX(value) => {
            encoder.indexed(value, AddressingMode::AbsoluteX, AddressingMode::ZeroPageX)
        }
        Operand::IndexedY(value) => {
            encoder.indexed(value, AddressingMode::AbsoluteY, AddressingMode::ZeroPageY)
        }

        Operand::Indirect(value) => {
            let (target, pending) = encoder.resolve(value, ABSOLUTE_PLACEHOLDER);
            check_range(target, 0xFFFF)?;
            let descriptor = encoder.require(AddressingMode::Indirect)?;
            Ok(emit(descriptor, target, pending))
        }

        Operand::Direct(value) => {
            let (target, pending) = encoder.resolve(value, ABSOLUTE_PLACEHOLDER);
            check_range(target, 0xFFFF)?;

            let descriptor = encoder
                .find(AddressingMode::ZeroPage)
                .filter(|_| target <= 0xFF)
                .or_else(|| encoder.find(AddressingMode::Absolute))
                .ok_or_else(|| encoder.unsupported(AddressingMode::Absolute))?;
            Ok(emit(descriptor, target, pending))
        }
    }
}

/// Rewrites the placeholder bytes of `line` now that its label is at `target`.
pub fn patch(line: &mut CompiledLine, target: u16) -> Result<(), ErrorKind> {
    let select = line
        .pending
        .as_ref()
        .map(|pending| pending.select)
        .unwrap_or(ByteSelect::Low);

    match line.bytes.len() {
        2 if line.descriptor.mode == AddressingMode::Relative => {
            line.bytes[1] = branch_offset(line.address, target as u32);
        }
        2 => {
            line.bytes[1] = select.apply(target);
        }
        3 => {
            line.bytes[1] = (target & 0xFF) as u8;
            line.bytes[2] = (target >> 8) as u8;
        }
        size => return Err(ErrorKind::UnimplementedPatch(size)),
    }

    line.pending = None;
    Ok(())
}

struct LineEncoder<'a> {
    mnemonic: &'a str,
    candidates: &'a [InstructionDescriptor],
    symbols: &'a SymbolTable,
}

impl LineEncoder<'_> {
    fn find(&self, mode: AddressingMode) -> Option<InstructionDescriptor> {
        self.candidates.iter().find(|d| d.mode == mode).copied()
    }

    fn require(&self, mode: AddressingMode) -> Result<InstructionDescriptor, ErrorKind> {
        self.find(mode).ok_or_else(|| self.unsupported(mode))
    }

    fn unsupported(&self, mode: AddressingMode) -> ErrorKind {
        ErrorKind::UnsupportedMode {
            mnemonic: self.mnemonic.to_string(),
            mode,
        }
    }

    /// Number or label value. Unknown labels yield `placeholder` and a
    /// pending reference.
    fn resolve(&self, value: &Value, placeholder: u32) -> (u32, Option<LabelRef>) {
        match value {
            Value::Number(number) => (*number, None),
            Value::Label(name) => match self.symbols.lookup(name) {
                Some(label) => (label.address as u32, None),
                None => (
                    placeholder,
                    Some(LabelRef {
                        name: name.clone(),
                        select: ByteSelect::Low,
                    }),
                ),
            },
        }
    }

    fn branch(
        &self,
        descriptor: InstructionDescriptor,
        operand: &Operand,
        address: u16,
    ) -> Result<Encoded, ErrorKind> {
        let Operand::Direct(value) = operand else {
            return Err(ErrorKind::InvalidSyntax(format!(
                "Invalid branch for {}",
                self.mnemonic
            )));
        };

        let (target, pending) = self.resolve(value, ABSOLUTE_PLACEHOLDER);
        check_range(target, 0xFFFF)?;

        Ok(Encoded {
            descriptor,
            bytes: vec![descriptor.opcode, branch_offset(address, target)],
            pending,
        })
    }

    /// `(zp,X)` and `(zp),Y`: the pointer must be in zero page.
    fn zero_page_pointer(&self, value: &Value, mode: AddressingMode) -> Result<Encoded, ErrorKind> {
        let (pointer, pending) = self.resolve(value, BYTE_PLACEHOLDER);
        check_range(pointer, 0xFF)?;
        let descriptor = self.require(mode)?;
        Ok(emit(descriptor, pointer, pending))
    }

    /// `val,X` / `val,Y`: the absolute form, or the zero-page form when the
    /// mnemonic has no absolute form and the value fits.
    fn indexed(
        &self,
        value: &Value,
        absolute: AddressingMode,
        zero_page: AddressingMode,
    ) -> Result<Encoded, ErrorKind> {
        let (target, pending) = self.resolve(value, ABSOLUTE_PLACEHOLDER);
        check_range(target, 0xFFFF)?;

        let descriptor = self
            .find(absolute)
            .or_else(|| self.find(zero_page).filter(|_| target <= 0xFF))
            .ok_or_else(|| self.unsupported(absolute))?;
        Ok(emit(descriptor, target, pending))
    }
}

fn check_range(value: u32, max: u32) -> Result<(), ErrorKind> {
    if value > max {
        return Err(ErrorKind::OutOfRange(value));
    }
    Ok(())
}

/// Opcode followed by as many little-endian operand bytes as the descriptor
/// calls for.
fn emit(descriptor: InstructionDescriptor, value: u32, pending: Option<LabelRef>) -> Encoded {
    let mut bytes = vec![descriptor.opcode];
    match descriptor.size {
        2 => bytes.push((value & 0xFF) as u8),
        3 => {
            bytes.push((value & 0xFF) as u8);
            bytes.push(((value >> 8) & 0xFF) as u8);
        }
        _ => {}
    }

    Encoded {
        descriptor,
        bytes,
        pending,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcodes::instruction_table;

    fn encode_line(mnemonic: &str, operand: Operand, symbols: &SymbolTable) -> Result<Encoded, ErrorKind> {
        let candidates = instruction_table().by_mnemonic(mnemonic).unwrap();
        encode(mnemonic, candidates, &operand, 0x0200, symbols)
    }

    #[test]
    fn test_branch_offsets() {
        // to the preceding instruction
        assert_eq!(branch_offset(0x0201, 0x0200), 0xFD);
        // to itself
        assert_eq!(branch_offset(0x0200, 0x0200), 0xFE);
        // to the next instruction
        assert_eq!(branch_offset(0x0200, 0x0202), 0x00);
        // 127 bytes past the next instruction
        assert_eq!(branch_offset(0x0200, 0x0281), 0x7F);
        // one further wraps to a backward offset
        assert_eq!(branch_offset(0x0200, 0x0282), 0x80);
        assert_eq!(branch_offset(0x0200, 0x0300), 0xFE);
    }

    #[test]
    fn test_zero_page_selected_when_value_fits() {
        let symbols = SymbolTable::new();

        let zp = encode_line("LDA", Operand::Direct(Value::Number(0x80)), &symbols).unwrap();
        assert_eq!(zp.bytes, vec![0xA5, 0x80]);

        let abs = encode_line("LDA", Operand::Direct(Value::Number(0x1234)), &symbols).unwrap();
        assert_eq!(abs.bytes, vec![0xAD, 0x34, 0x12]);
    }

    #[test]
    fn test_absolute_used_when_no_zero_page_form() {
        let symbols = SymbolTable::new();

        let jmp = encode_line("JMP", Operand::Direct(Value::Number(0x10)), &symbols).unwrap();
        assert_eq!(jmp.bytes, vec![0x4C, 0x10, 0x00]);
    }

    #[test]
    fn test_indexed_forms() {
        let symbols = SymbolTable::new();

        let sta = encode_line("STA", Operand::IndexedX(Value::Number(0x10)), &symbols).unwrap();
        assert_eq!(sta.bytes, vec![0x9D, 0x10, 0x00]);

        let sty = encode_line("STY", Operand::IndexedX(Value::Number(0x10)), &symbols).unwrap();
        assert_eq!(sty.bytes, vec![0x94, 0x10]);

        let error = encode_line("STY", Operand::IndexedX(Value::Number(0x1000)), &symbols);
        assert!(matches!(error, Err(ErrorKind::UnsupportedMode { .. })));
    }

    #[test]
    fn test_unknown_label_gets_placeholder() {
        let symbols = SymbolTable::new();

        let jmp = encode_line(
            "JMP",
            Operand::Direct(Value::Label("LATER".to_string())),
            &symbols,
        )
        .unwrap();
        assert_eq!(jmp.bytes, vec![0x4C, 0xFF, 0xFF]);
        assert_eq!(jmp.pending.map(|p| p.name), Some("LATER".to_string()));
    }

    #[test]
    fn test_known_label_in_zero_page() {
        let mut symbols = SymbolTable::new();
        symbols.define("PTR", 0x0040, 1).unwrap();

        let lda = encode_line(
            "LDA",
            Operand::IndirectY(Value::Label("PTR".to_string())),
            &symbols,
        )
        .unwrap();
        assert_eq!(lda.bytes, vec![0xB1, 0x40]);
        assert!(lda.pending.is_none());
    }

    #[test]
    fn test_range_checks() {
        let symbols = SymbolTable::new();

        assert_eq!(
            encode_line("LDA", Operand::Immediate(256), &symbols).unwrap_err(),
            ErrorKind::OutOfRange(256)
        );
        assert_eq!(
            encode_line("LDA", Operand::IndirectX(Value::Number(0x100)), &symbols).unwrap_err(),
            ErrorKind::OutOfRange(0x100)
        );
        assert_eq!(
            encode_line("JMP", Operand::Direct(Value::Number(0x10000)), &symbols).unwrap_err(),
            ErrorKind::OutOfRange(0x10000)
        );
    }

    #[test]
    fn test_mode_not_supported() {
        let symbols = SymbolTable::new();

        assert_eq!(
            encode_line("LDA", Operand::None, &symbols).unwrap_err(),
            ErrorKind::UnsupportedMode {
                mnemonic: "LDA".to_string(),
                mode: AddressingMode::Implied
            }
        );
        assert!(encode_line("STA", Operand::Immediate(1), &symbols).is_err());
        assert!(encode_line("BNE", Operand::Immediate(1), &symbols).is_err());
    }

    #[test]
    fn test_accumulator_shift() {
        let symbols = SymbolTable::new();

        let asl = encode_line("ASL", Operand::Accumulator, &symbols).unwrap();
        assert_eq!(asl.bytes, vec![0x0A]);
    }
}
