//! Structured error reporting for the assembler.
//!
//! Every failure is fatal to the whole run: the first error aborts assembly
//! and no partial image is produced. Each variant carries the 1-indexed source
//! line it was detected on so the command surface can format diagnostics in
//! the usual style:
//!
//! ```text
//! program.c8:10: error: invalid register operand 'v17'
//! ```

use thiserror::Error;

/// An assembly failure with the source line it was detected on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssembleError {
    /// Operand does not match the register grammar (`v1`..`v16`).
    #[error("invalid register operand '{text}'")]
    InvalidRegisterOperand {
        /// The offending token.
        text: String,
        /// Source line of the token.
        line: usize,
    },
    /// Operand is not a decimal or `0x`-prefixed hexadecimal integer.
    #[error("invalid immediate '{text}'")]
    InvalidImmediate {
        /// The offending token.
        text: String,
        /// Source line of the token.
        line: usize,
    },
    /// Well-formed integer that does not fit the instruction's field.
    #[error("immediate '{text}' does not fit in {bits} bits")]
    ImmediateOutOfRange {
        /// The offending token.
        text: String,
        /// Width of the target field.
        bits: u32,
        /// Source line of the token.
        line: usize,
    },
    /// Token is neither a mnemonic nor an acceptable label definition.
    #[error("unrecognized instruction '{text}'")]
    UnrecognizedInstruction {
        /// The offending token.
        text: String,
        /// Source line of the token.
        line: usize,
    },
    /// `jump`/`call` target is not a label name.
    #[error("invalid label '{text}'")]
    InvalidLabel {
        /// The offending token.
        text: String,
        /// Source line of the token.
        line: usize,
    },
    /// Input ended before all operands of an instruction were read.
    #[error("missing operand for '{mnemonic}'")]
    MissingOperand {
        /// Mnemonic whose operands were cut short.
        mnemonic: &'static str,
        /// Source line of the mnemonic.
        line: usize,
    },
    /// Label defined a second time.
    #[error("duplicate label '{label}' (first defined at line {first_definition})")]
    DuplicateLabel {
        /// Normalized label name.
        label: String,
        /// Line of the repeated definition.
        line: usize,
        /// Line of the first definition.
        first_definition: usize,
    },
    /// Label referenced by `jump`/`call` but never defined.
    #[error("unresolved symbol '{label}'")]
    UnresolvedSymbol {
        /// Normalized label name.
        label: String,
        /// Line of the earliest reference.
        line: usize,
    },
    /// Program grew past the 12-bit address space.
    #[error("address 0x{address:04X} exceeds the 12-bit address space")]
    AddressOverflow {
        /// The address that would have been assigned.
        address: usize,
        /// Source line that caused the overflow.
        line: usize,
    },
}

impl AssembleError {
    /// Returns the source line the error was detected on.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::InvalidRegisterOperand { line, .. }
            | Self::InvalidImmediate { line, .. }
            | Self::ImmediateOutOfRange { line, .. }
            | Self::UnrecognizedInstruction { line, .. }
            | Self::InvalidLabel { line, .. }
            | Self::MissingOperand { line, .. }
            | Self::DuplicateLabel { line, .. }
            | Self::UnresolvedSymbol { line, .. }
            | Self::AddressOverflow { line, .. } => *line,
        }
    }

    /// Formats the error for stderr output, prefixed with `file:line`.
    #[must_use]
    pub fn format_for_stderr(&self, file: &str) -> String {
        format!("{file}:{}: error: {self}", self.line())
    }
}

#[cfg(test)]
mod tests {
    use super::AssembleError;

    #[test]
    fn display_names_the_offending_token() {
        let err = AssembleError::InvalidRegisterOperand {
            text: "v17".into(),
            line: 3,
        };
        assert_eq!(err.to_string(), "invalid register operand 'v17'");
        assert_eq!(err.line(), 3);
    }

    #[test]
    fn format_for_stderr_prefixes_location() {
        let err = AssembleError::UnrecognizedInstruction {
            text: "b".into(),
            line: 7,
        };
        assert_eq!(
            err.format_for_stderr("prog.c8"),
            "prog.c8:7: error: unrecognized instruction 'b'"
        );
    }

    #[test]
    fn duplicate_label_mentions_first_definition() {
        let err = AssembleError::DuplicateLabel {
            label: "loop".into(),
            line: 9,
            first_definition: 2,
        };
        assert_eq!(
            err.to_string(),
            "duplicate label 'loop' (first defined at line 2)"
        );
    }

    #[test]
    fn address_overflow_formats_hex() {
        let err = AssembleError::AddressOverflow {
            address: 0x1000,
            line: 1,
        };
        assert_eq!(
            err.to_string(),
            "address 0x1000 exceeds the 12-bit address space"
        );
    }
}
