//! Mnemonic table: names, opcode bases, and operand shapes.

/// Operand layout required by a mnemonic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandShape {
    /// No operands.
    None,
    /// One label, encoded into the 12-bit address field.
    Label,
    /// Register in bits 8..12, 8-bit immediate in bits 0..8.
    RegByte,
    /// Registers in bits 8..12 and 4..8.
    RegReg,
    /// 12-bit immediate in bits 0..12.
    Address,
    /// Register in bits 8..12.
    Reg,
}

impl OperandShape {
    /// Number of operand tokens consumed.
    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Self::None => 0,
            Self::Label | Self::Address | Self::Reg => 1,
            Self::RegByte | Self::RegReg => 2,
        }
    }
}

/// Every instruction the assembler understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mnemonic {
    /// Return from subroutine.
    Rts,
    /// Clear the screen.
    Clr,
    /// Jump to label.
    Jump,
    /// Call subroutine at label.
    Call,
    /// Skip if register equals immediate.
    Ske,
    /// Skip if register differs from immediate.
    Skne,
    /// Skip if registers are equal.
    Skre,
    /// Load immediate into register.
    Load,
    /// Add immediate to register.
    Add,
    /// Copy register.
    Move,
    /// Bitwise or.
    Or,
    /// Bitwise and.
    And,
    /// Bitwise xor.
    Xor,
    /// Add registers.
    Addr,
    /// Subtract registers.
    Sub,
    /// Shift.
    Slh,
    /// Skip if registers differ.
    Skrne,
    /// Load index register.
    Loadi,
    /// Jump to immediate plus offset register.
    Jumpi,
    /// Random byte masked by immediate.
    Rand,
    /// Add register to index.
    Addi,
    /// Store registers at index.
    Stor,
    /// Read registers from index.
    Read,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MnemonicEntry {
    name: &'static str,
    mnemonic: Mnemonic,
    opcode: u16,
    shape: OperandShape,
}

const fn entry(
    name: &'static str,
    mnemonic: Mnemonic,
    opcode: u16,
    shape: OperandShape,
) -> MnemonicEntry {
    MnemonicEntry {
        name,
        mnemonic,
        opcode,
        shape,
    }
}

const MNEMONIC_ENTRIES: &[MnemonicEntry] = &[
    entry("rts", Mnemonic::Rts, 0x00EE, OperandShape::None),
    entry("clr", Mnemonic::Clr, 0x00E0, OperandShape::None),
    entry("jump", Mnemonic::Jump, 0x1000, OperandShape::Label),
    entry("call", Mnemonic::Call, 0x2000, OperandShape::Label),
    entry("ske", Mnemonic::Ske, 0x3000, OperandShape::RegByte),
    entry("skne", Mnemonic::Skne, 0x4000, OperandShape::RegByte),
    entry("skre", Mnemonic::Skre, 0x5000, OperandShape::RegReg),
    entry("load", Mnemonic::Load, 0x6000, OperandShape::RegByte),
    entry("add", Mnemonic::Add, 0x7000, OperandShape::RegByte),
    entry("move", Mnemonic::Move, 0x8000, OperandShape::RegReg),
    entry("or", Mnemonic::Or, 0x8001, OperandShape::RegReg),
    entry("and", Mnemonic::And, 0x8002, OperandShape::RegReg),
    entry("xor", Mnemonic::Xor, 0x8003, OperandShape::RegReg),
    entry("addr", Mnemonic::Addr, 0x8004, OperandShape::RegReg),
    entry("sub", Mnemonic::Sub, 0x8005, OperandShape::RegReg),
    entry("slh", Mnemonic::Slh, 0x8006, OperandShape::RegReg),
    entry("skrne", Mnemonic::Skrne, 0x9000, OperandShape::RegReg),
    entry("loadi", Mnemonic::Loadi, 0xA000, OperandShape::Address),
    entry("jumpi", Mnemonic::Jumpi, 0xB000, OperandShape::Address),
    entry("rand", Mnemonic::Rand, 0xC000, OperandShape::RegByte),
    entry("addi", Mnemonic::Addi, 0xF01E, OperandShape::Reg),
    entry("stor", Mnemonic::Stor, 0xF055, OperandShape::Reg),
    entry("read", Mnemonic::Read, 0xF065, OperandShape::Reg),
];

impl Mnemonic {
    // Table rows are in declaration order.
    const fn entry(self) -> &'static MnemonicEntry {
        &MNEMONIC_ENTRIES[self as usize]
    }

    /// Canonical lower-case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.entry().name
    }

    /// Opcode word with every operand field zeroed.
    #[must_use]
    pub const fn opcode(self) -> u16 {
        self.entry().opcode
    }

    /// Operand layout.
    #[must_use]
    pub const fn shape(self) -> OperandShape {
        self.entry().shape
    }

    /// All mnemonics in table order.
    pub fn all() -> impl Iterator<Item = Self> {
        MNEMONIC_ENTRIES.iter().map(|e| e.mnemonic)
    }
}

/// Resolves a mnemonic name. Matching is ASCII case-insensitive.
#[must_use]
pub fn resolve_mnemonic(name: &str) -> Option<Mnemonic> {
    Mnemonic::all().find(|m| m.name().eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{resolve_mnemonic, Mnemonic, OperandShape, MNEMONIC_ENTRIES};

    #[test]
    fn table_rows_follow_declaration_order() {
        for (idx, entry) in MNEMONIC_ENTRIES.iter().enumerate() {
            assert_eq!(entry.mnemonic as usize, idx, "{}", entry.name);
        }
    }

    #[test]
    fn every_entry_resolves_to_itself() {
        for entry in MNEMONIC_ENTRIES {
            assert_eq!(resolve_mnemonic(entry.name), Some(entry.mnemonic));
            assert_eq!(entry.mnemonic.name(), entry.name);
            assert_eq!(entry.mnemonic.opcode(), entry.opcode);
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(resolve_mnemonic("JUMP"), Some(Mnemonic::Jump));
        assert_eq!(resolve_mnemonic("Jump"), Some(Mnemonic::Jump));
        assert_eq!(resolve_mnemonic("sKrNe"), Some(Mnemonic::Skrne));
    }

    #[test]
    fn unknown_mnemonic_returns_none() {
        assert_eq!(resolve_mnemonic("halt"), None);
        assert_eq!(resolve_mnemonic(""), None);
        assert_eq!(resolve_mnemonic("jump:"), None);
    }

    #[test]
    fn table_has_no_duplicate_names_or_variants() {
        let names: HashSet<_> = MNEMONIC_ENTRIES.iter().map(|e| e.name).collect();
        let variants: HashSet<_> = MNEMONIC_ENTRIES.iter().map(|e| e.mnemonic).collect();
        assert_eq!(names.len(), 23);
        assert_eq!(variants.len(), 23);
        assert_eq!(Mnemonic::all().count(), 23);
    }

    #[test]
    fn only_jump_and_call_take_labels() {
        let label_users: Vec<_> = Mnemonic::all()
            .filter(|m| m.shape() == OperandShape::Label)
            .collect();
        assert_eq!(label_users, vec![Mnemonic::Jump, Mnemonic::Call]);
    }

    #[test]
    fn arity_matches_shape() {
        assert_eq!(Mnemonic::Rts.shape().arity(), 0);
        assert_eq!(Mnemonic::Loadi.shape().arity(), 1);
        assert_eq!(Mnemonic::Stor.shape().arity(), 1);
        assert_eq!(Mnemonic::Rand.shape().arity(), 2);
        assert_eq!(Mnemonic::Xor.shape().arity(), 2);
    }
}
