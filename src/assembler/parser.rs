//! Assembly source parser
//!
//! Every source line is normalized (uppercased, comment stripped, trimmed) and
//! then classified as one statement. Instruction operands are parsed into an
//! [`Operand`] whose shape selects the addressing-mode family; the encoder
//! decides the final mode.

use super::ErrorKind;

/// One classified source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement<'a> {
    /// `*=$C000` or `*=49152`
    SetAddress(u16),

    /// `NAME = OTHER + 12`
    LabelMath {
        name: &'a str,
        dependency: &'a str,
        offset: i32,
    },

    /// `$C000:` or `49152:` followed by an optional instruction
    AddressLabel { address: u16, rest: &'a str },

    /// `NAME:` followed by an optional instruction
    Label { name: &'a str, rest: &'a str },

    /// Three-letter mnemonic and its (possibly empty) operand text
    Instruction { mnemonic: &'a str, operand: &'a str },
}

/// A numeric literal or a label reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Number(u32),
    Label(String),
}

/// Operand shapes, one per addressing-mode grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    /// No operand text.
    None,
    /// `A`, the accumulator form of implied instructions.
    Accumulator,
    /// `#123`, `#$7F`
    Immediate(u32),
    /// `#<LABEL` (low byte) or `#>LABEL` (high byte)
    ImmediateLabel { label: String, high: bool },
    /// `(val,X)`
    IndirectX(Value),
    /// `(val),Y`
    IndirectY(Value),
    /// `val,X`
    IndexedX(Value),
    /// `val,Y`
    IndexedY(Value),
    /// `(val)`
    Indirect(Value),
    /// `val`
    Direct(Value),
}

/// Uppercases `line`, drops everything from the first `;` and trims.
pub fn normalize(line: &str) -> String {
    let upper = line.to_ascii_uppercase();
    let code = match upper.split_once(';') {
        Some((code, _comment)) => code,
        None => upper.as_str(),
    };
    code.trim().to_string()
}

/// Classifies a normalized, non-empty line.
pub fn classify(line: &str) -> Result<Statement<'_>, ErrorKind> {
    if let Some(rest) = line.strip_prefix('*') {
        return parse_set_address(rest).map(Statement::SetAddress);
    }

    if let Some(statement) = parse_label_math(line) {
        return Ok(statement);
    }

    if let Some((text, rest)) = split_address_label(line) {
        let address = parse_address(text)?;
        return Ok(Statement::AddressLabel { address, rest });
    }

    if let Some((name, rest)) = line.split_once(':') {
        if is_label_name(name) {
            return Ok(Statement::Label {
                name,
                rest: rest.trim(),
            });
        }
    }

    parse_instruction(line)
}

/// Splits a label-free line into mnemonic and operand.
pub fn parse_instruction(line: &str) -> Result<Statement<'_>, ErrorKind> {
    let mnemonic = line
        .get(..3)
        .filter(|m| m.bytes().all(|b| b.is_ascii_uppercase()))
        .ok_or_else(|| ErrorKind::InvalidSyntax(line.to_string()))?;

    Ok(Statement::Instruction {
        mnemonic,
        operand: line[3..].trim(),
    })
}

fn parse_set_address(rest: &str) -> Result<u16, ErrorKind> {
    let value = rest
        .trim_start()
        .strip_prefix('=')
        .ok_or_else(|| ErrorKind::InvalidSyntax(format!("*{}", rest)))?;
    parse_address(value.trim())
}

/// `$hex` or decimal address, which must fit in 16 bits.
fn parse_address(text: &str) -> Result<u16, ErrorKind> {
    let value = match text.strip_prefix('$') {
        Some(digits) => parse_number(digits, true),
        None => parse_number(text, false),
    }
    .ok_or_else(|| ErrorKind::InvalidSyntax(text.to_string()))?;

    u16::try_from(value).map_err(|_| ErrorKind::AddressOutOfRange(text.to_string()))
}

fn parse_label_math(line: &str) -> Option<Statement<'_>> {
    let (name, expression) = line.split_once('=')?;
    let name = name.trim();
    if !is_label_name(name) {
        return None;
    }

    let sign_at = expression.find(|c| c == '+' || c == '-')?;
    let dependency = expression[..sign_at].trim();
    let digits = expression[sign_at + 1..].trim();

    if !is_label_name(dependency)
        || digits.is_empty()
        || digits.len() > 3
        || !digits.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }

    let magnitude = parse_number(digits, false)? as i32;
    let offset = if expression[sign_at..].starts_with('-') {
        -magnitude
    } else {
        magnitude
    };

    Some(Statement::LabelMath {
        name,
        dependency,
        offset,
    })
}

fn split_address_label(line: &str) -> Option<(&str, &str)> {
    let (label, rest) = line.split_once(':')?;
    let numeric = match label.strip_prefix('$') {
        Some(digits) => !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_hexdigit()),
        None => !label.is_empty() && label.bytes().all(|b| b.is_ascii_digit()),
    };

    numeric.then(|| (label, rest.trim()))
}

/// Parses the operand of an ordinary instruction.
///
/// Radix is decided for the whole operand: if it contains `$` anywhere, the
/// first `$` is removed and numbers are read as hex.
pub fn parse_operand(text: &str) -> Result<Operand, ErrorKind> {
    let text = text.trim();
    let hex = text.contains('$');
    let text = text.replacen('$', "", 1);
    let text = text.trim();

    if text.is_empty() {
        return Ok(Operand::None);
    }

    if text == "A" {
        return Ok(Operand::Accumulator);
    }

    let invalid = || ErrorKind::InvalidSyntax(text.to_string());

    if let Some(inner) = text.strip_prefix('#') {
        let inner = inner.trim();
        if let Some(label) = inner.strip_prefix('<') {
            return immediate_label(label, false).ok_or_else(invalid);
        }
        if let Some(label) = inner.strip_prefix('>') {
            return immediate_label(label, true).ok_or_else(invalid);
        }
        return parse_number(inner, hex)
            .map(Operand::Immediate)
            .ok_or_else(invalid);
    }

    if let Some(inner) = text.strip_prefix('(') {
        let (inside, after) = inner.split_once(')').ok_or_else(invalid)?;
        let after = after.trim();

        if let Some((value, index)) = inside.split_once(',') {
            if index.trim() == "X" && after.is_empty() {
                return parse_value(value, hex).map(Operand::IndirectX).ok_or_else(invalid);
            }
            return Err(invalid());
        }

        if after.is_empty() {
            return parse_value(inside, hex).map(Operand::Indirect).ok_or_else(invalid);
        }

        let index = after.strip_prefix(',').ok_or_else(invalid)?;
        if index.trim() == "Y" {
            return parse_value(inside, hex).map(Operand::IndirectY).ok_or_else(invalid);
        }
        return Err(invalid());
    }

    if let Some((value, index)) = text.split_once(',') {
        let value = parse_value(value, hex).ok_or_else(invalid)?;
        return match index.trim() {
            "X" => Ok(Operand::IndexedX(value)),
            "Y" => Ok(Operand::IndexedY(value)),
            _ => Err(invalid()),
        };
    }

    parse_value(text, hex).map(Operand::Direct).ok_or_else(invalid)
}

fn immediate_label(label: &str, high: bool) -> Option<Operand> {
    let label = label.trim();
    is_label_name(label).then(|| Operand::ImmediateLabel {
        label: label.to_string(),
        high,
    })
}

/// A number in the operand's radix, or failing that a label name.
fn parse_value(text: &str, hex: bool) -> Option<Value> {
    let text = text.trim();

    if let Some(number) = parse_number(text, hex) {
        return Some(Value::Number(number));
    }

    is_label_name(text).then(|| Value::Label(text.to_string()))
}

/// Parses the comma-separated byte list of a `DCB` directive.
pub fn parse_byte_list(text: &str) -> Result<Vec<u8>, ErrorKind> {
    text.split(',')
        .map(|entry| {
            let entry = entry.trim();
            let number = match entry.strip_prefix('$') {
                Some(digits) => parse_number(digits, true),
                None => parse_number(entry, false),
            }
            .ok_or_else(|| ErrorKind::InvalidDirective(text.to_string()))?;

            u8::try_from(number).map_err(|_| ErrorKind::OutOfRange(number))
        })
        .collect()
}

/// Digits in base 16 or 10. Values too large for `u32` saturate so that
/// range checks still reject them.
pub fn parse_number(digits: &str, hex: bool) -> Option<u32> {
    if digits.is_empty() {
        return None;
    }

    let radix = if hex { 16 } else { 10 };
    digits.chars().try_fold(0u32, |acc, c| {
        let digit = c.to_digit(radix)?;
        Some(acc.saturating_mul(radix).saturating_add(digit))
    })
}

/// Labels are a letter followed by at least one letter, digit or underscore.
pub fn is_label_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_uppercase() => {}
        _ => return false,
    }

    let rest = chars.as_str();
    !rest.is_empty()
        && rest
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}
