//! Instruction encoding.
//!
//! Converts a resolved mnemonic plus its operand tokens into one 16-bit
//! opcode word. Encoding is stateless: `jump`/`call` words come back with a
//! zeroed address field and the target label attached, and the driver decides
//! whether the address is filled now or backpatched later.

use crate::errors::AssembleError;
use crate::lexer::Token;
use crate::mnemonic::{resolve_mnemonic, Mnemonic, OperandShape};
use crate::operand::{is_valid_label, parse_immediate_field, validate_register, ImmediateWidth};

/// Mask of the 12-bit address field.
pub const ADDRESS_MASK: u16 = 0x0FFF;

/// One encoded instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Encoded<'a> {
    /// The opcode word. The address field is zero when `target` is set.
    pub word: u16,
    /// Label whose address belongs in the address field.
    pub target: Option<Token<'a>>,
}

impl Encoded<'_> {
    const fn complete(word: u16) -> Self {
        Self { word, target: None }
    }
}

/// ORs the low 12 bits of `address` into the address field of `word`.
#[must_use]
pub const fn with_address(word: u16, address: u16) -> u16 {
    word | (address & ADDRESS_MASK)
}

/// Encodes one instruction, pulling exactly as many operand tokens as the
/// mnemonic requires from `operands`.
///
/// `at` is the mnemonic token itself and is used to report missing operands.
///
/// # Errors
///
/// Returns `MissingOperand` if input ends early, or the validation error of
/// the first malformed operand.
pub fn encode_instruction<'a, I>(
    mnemonic: Mnemonic,
    at: Token<'a>,
    operands: &mut I,
) -> Result<Encoded<'a>, AssembleError>
where
    I: Iterator<Item = Token<'a>>,
{
    let opcode = mnemonic.opcode();
    let mut next = || {
        operands.next().ok_or_else(|| AssembleError::MissingOperand {
            mnemonic: mnemonic.name(),
            line: at.line,
        })
    };

    let encoded = match mnemonic.shape() {
        OperandShape::None => Encoded::complete(opcode),
        OperandShape::Label => {
            let label = next()?;
            if !is_valid_label(label.text) || resolve_mnemonic(label.text).is_some() {
                return Err(AssembleError::InvalidLabel {
                    text: label.text.to_string(),
                    line: label.line,
                });
            }
            Encoded {
                word: opcode,
                target: Some(label),
            }
        }
        OperandShape::RegByte => {
            let reg = next()?;
            let reg = validate_register(reg.text, reg.line)?;
            let imm = next()?;
            let imm = parse_immediate_field(imm.text, ImmediateWidth::Byte, imm.line)?;
            Encoded::complete(opcode | (reg.field() << 8) | imm)
        }
        OperandShape::RegReg => {
            let first = next()?;
            let first = validate_register(first.text, first.line)?;
            let second = next()?;
            let second = validate_register(second.text, second.line)?;
            Encoded::complete(opcode | (first.field() << 8) | (second.field() << 4))
        }
        OperandShape::Address => {
            let imm = next()?;
            let imm = parse_immediate_field(imm.text, ImmediateWidth::Address, imm.line)?;
            Encoded::complete(opcode | imm)
        }
        OperandShape::Reg => {
            let reg = next()?;
            let reg = validate_register(reg.text, reg.line)?;
            Encoded::complete(opcode | (reg.field() << 8))
        }
    };

    Ok(encoded)
}
