//! Operand validation: registers, immediates, and label names.

use crate::errors::AssembleError;

/// A validated register operand (`v1`..`v16`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Register(u8);

impl Register {
    /// Lowest register number accepted by the grammar.
    pub const MIN: u8 = 1;
    /// Highest register number accepted by the grammar.
    pub const MAX: u8 = 16;

    /// Creates a register from its number, if in range.
    #[must_use]
    pub const fn new(number: u8) -> Option<Self> {
        if number >= Self::MIN && number <= Self::MAX {
            Some(Self(number))
        } else {
            None
        }
    }

    /// The 4-bit register field. `v16` wraps to field 0.
    #[must_use]
    pub const fn field(self) -> u16 {
        (self.0 & 0x0F) as u16
    }
}

/// Width of an immediate field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImmediateWidth {
    /// 8-bit byte immediate.
    Byte,
    /// 12-bit address immediate.
    Address,
}

impl ImmediateWidth {
    /// Field width in bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        match self {
            Self::Byte => 8,
            Self::Address => 12,
        }
    }

    /// Largest value the field can hold.
    #[must_use]
    pub const fn max(self) -> u16 {
        match self {
            Self::Byte => 0x00FF,
            Self::Address => 0x0FFF,
        }
    }
}

/// Validates a register operand.
///
/// Accepts exactly `v` followed by a decimal number in 1..=16 with no leading
/// zero, sign, or suffix.
///
/// # Errors
///
/// Returns `InvalidRegisterOperand` for any other text.
pub fn validate_register(text: &str, line: usize) -> Result<Register, AssembleError> {
    let invalid = || AssembleError::InvalidRegisterOperand {
        text: text.to_string(),
        line,
    };

    let digits = text.strip_prefix('v').ok_or_else(invalid)?;
    if digits.is_empty()
        || digits.len() > 2
        || digits.starts_with('0')
        || !digits.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(invalid());
    }

    digits
        .parse::<u8>()
        .ok()
        .and_then(Register::new)
        .ok_or_else(invalid)
}

/// Parses an integer immediate in decimal or `0x`-prefixed hexadecimal form.
///
/// # Errors
///
/// Returns `InvalidImmediate` for malformed syntax and `ImmediateOutOfRange`
/// when a well-formed value exceeds 16 bits.
pub fn parse_immediate(text: &str, line: usize) -> Result<u16, AssembleError> {
    let (digits, radix) = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .map_or((text, 10), |hex| (hex, 16));

    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(AssembleError::InvalidImmediate {
            text: text.to_string(),
            line,
        });
    }

    // Digits are validated above, so the only possible failure is overflow.
    u16::from_str_radix(digits, radix).map_err(|_| AssembleError::ImmediateOutOfRange {
        text: text.to_string(),
        bits: 16,
        line,
    })
}

/// Parses an immediate and checks it fits the given field width.
///
/// # Errors
///
/// Returns `InvalidImmediate` for malformed syntax and `ImmediateOutOfRange`
/// when the value does not fit `width`.
pub fn parse_immediate_field(
    text: &str,
    width: ImmediateWidth,
    line: usize,
) -> Result<u16, AssembleError> {
    let value = parse_immediate(text, line).map_err(|e| match e {
        AssembleError::ImmediateOutOfRange { text, line, .. } => {
            AssembleError::ImmediateOutOfRange {
                text,
                bits: width.bits(),
                line,
            }
        }
        other => other,
    })?;

    if value > width.max() {
        return Err(AssembleError::ImmediateOutOfRange {
            text: text.to_string(),
            bits: width.bits(),
            line,
        });
    }
    Ok(value)
}

/// Returns true if `s` is a valid label name (`[A-Za-z_][A-Za-z0-9_]*`).
#[must_use]
pub fn is_valid_label(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !first.is_ascii_alphabetic() && first != '_' {
        return false;
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Normalizes a label name for table lookup.
#[must_use]
pub fn normalize_label(s: &str) -> String {
    s.to_ascii_lowercase()
}
