//! Single-pass assembler driver.
//!
//! The driver pulls tokens front to back and classifies each one as either a
//! mnemonic or a label definition:
//!
//! 1. **Mnemonic**: the encoder consumes its operands and yields one word,
//!    appended at the next ROM index. A `jump`/`call` to a known label gets
//!    its address immediately; a label not seen yet is recorded in the
//!    backpatch table and the word's address field stays zero.
//! 2. **Label definition**: the label takes the address of the next word.
//!    Every word recorded for it in the backpatch table is patched, and the
//!    label is inserted into the symbol table for later references.
//!
//! Two label definitions in a row, with no instruction between them, are
//! rejected. Once input is exhausted any label still awaiting a backpatch is
//! an error unless [`AssemblerOptions::allow_unresolved`] is set.

use tracing::{debug, trace, warn};

use crate::emitter::to_bytes;
use crate::encoder::{encode_instruction, with_address, Encoded, ADDRESS_MASK};
use crate::errors::AssembleError;
use crate::lexer::{Token, Tokens};
use crate::mnemonic::resolve_mnemonic;
use crate::operand::{is_valid_label, normalize_label};
use crate::symbols::{BackpatchTable, SymbolTable};

/// Load address of the first word.
pub const BASE_ADDRESS: u16 = 0x200;

/// Highest address at which a word may start.
pub const LAST_WORD_ADDRESS: u16 = 0xFFE;

/// Absolute address of the word at ROM index `index`.
#[must_use]
pub const fn word_address(index: usize) -> usize {
    BASE_ADDRESS as usize + 2 * index
}

/// Assembly settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssemblerOptions {
    /// Leave never-defined `jump`/`call` targets zero-filled instead of
    /// failing with `UnresolvedSymbol`.
    pub allow_unresolved: bool,
}

/// One emitted word in the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingEntry {
    /// Absolute address of the word.
    pub address: u16,
    /// Final (patched) word value.
    pub word: u16,
    /// Source line of the instruction.
    pub line: usize,
}

/// A fully assembled program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    /// ROM words in load order, starting at [`BASE_ADDRESS`].
    pub words: Vec<u16>,
    /// Every label defined in the source.
    pub symbols: SymbolTable,
    /// Address-to-source mapping, one entry per word.
    pub listing: Vec<ListingEntry>,
}

impl Program {
    /// Serializes the ROM as big-endian bytes.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        to_bytes(&self.words)
    }
}

/// Assembles source text with default options.
///
/// # Errors
///
/// Returns the first `AssembleError` encountered.
pub fn assemble(source: &str) -> Result<Program, AssembleError> {
    assemble_with_options(source, AssemblerOptions::default())
}

/// Assembles source text with the given options.
///
/// # Errors
///
/// Returns the first `AssembleError` encountered.
pub fn assemble_with_options(
    source: &str,
    options: AssemblerOptions,
) -> Result<Program, AssembleError> {
    Assembler::with_options(options).assemble(Tokens::new(source))
}

/// Single-pass driver state.
#[derive(Debug, Default)]
pub struct Assembler {
    options: AssemblerOptions,
    rom: Vec<u16>,
    listing: Vec<ListingEntry>,
    symbols: SymbolTable,
    backpatches: BackpatchTable,
    labeled_line: bool,
}

impl Assembler {
    /// Creates a driver with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a driver with the given options.
    #[must_use]
    pub fn with_options(options: AssemblerOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Runs the pass over `tokens` and returns the finished program.
    ///
    /// # Errors
    ///
    /// Returns the first `AssembleError` encountered; nothing is emitted.
    pub fn assemble<'a, I>(mut self, tokens: I) -> Result<Program, AssembleError>
    where
        I: IntoIterator<Item = Token<'a>>,
    {
        let mut tokens = tokens.into_iter();
        while let Some(token) = tokens.next() {
            self.step(token, &mut tokens)?;
        }
        self.finish()
    }

    fn step<'a, I>(&mut self, token: Token<'a>, tokens: &mut I) -> Result<(), AssembleError>
    where
        I: Iterator<Item = Token<'a>>,
    {
        trace!(line = token.line, text = token.text, "token");

        if let Some(mnemonic) = resolve_mnemonic(token.text) {
            trace!(
                mnemonic = mnemonic.name(),
                operands = mnemonic.shape().arity(),
                "instruction"
            );
            let encoded = encode_instruction(mnemonic, token, tokens)?;
            self.emit(encoded, token.line)?;
            self.labeled_line = false;
            return Ok(());
        }

        self.define_label(token)
    }

    fn checked_address(&self, last_valid: u16, line: usize) -> Result<u16, AssembleError> {
        let address = word_address(self.rom.len());
        match u16::try_from(address) {
            Ok(addr) if addr <= last_valid => Ok(addr),
            _ => Err(AssembleError::AddressOverflow { address, line }),
        }
    }

    fn emit(&mut self, encoded: Encoded<'_>, line: usize) -> Result<(), AssembleError> {
        let address = self.checked_address(LAST_WORD_ADDRESS, line)?;

        let word = match encoded.target {
            None => encoded.word,
            Some(target) => {
                let name = normalize_label(target.text);
                if let Some(resolved) = self.symbols.address_of(&name) {
                    with_address(encoded.word, resolved)
                } else {
                    debug!(label = %name, index = self.rom.len(), "forward reference");
                    self.backpatches.record(&name, self.rom.len(), target.line);
                    encoded.word
                }
            }
        };

        self.rom.push(word);
        self.listing.push(ListingEntry {
            address,
            word,
            line,
        });
        Ok(())
    }

    fn define_label(&mut self, token: Token<'_>) -> Result<(), AssembleError> {
        let name = token.text.strip_suffix(':').unwrap_or(token.text);
        if self.labeled_line || !is_valid_label(name) || resolve_mnemonic(name).is_some() {
            return Err(AssembleError::UnrecognizedInstruction {
                text: token.text.to_string(),
                line: token.line,
            });
        }

        let address = self.checked_address(ADDRESS_MASK, token.line)?;
        let name = normalize_label(name);
        self.symbols.define(&name, address, token.line)?;

        for pending in self.backpatches.take(&name) {
            let word = &mut self.rom[pending.index];
            *word = with_address(*word, address);
            debug!(label = %name, index = pending.index, word = *word, "backpatched");
        }

        debug!(label = %name, address, "label defined");
        self.labeled_line = true;
        Ok(())
    }

    fn finish(self) -> Result<Program, AssembleError> {
        let Self {
            options,
            rom,
            mut listing,
            symbols,
            backpatches,
            ..
        } = self;

        if backpatches.is_empty() {
            trace!("every forward reference resolved");
        }
        for (label, first) in backpatches.unresolved() {
            if !options.allow_unresolved {
                return Err(AssembleError::UnresolvedSymbol {
                    label: label.to_string(),
                    line: first.line,
                });
            }
            warn!(label, line = first.line, "unresolved label left as address 0");
        }

        for (entry, word) in listing.iter_mut().zip(&rom) {
            entry.word = *word;
        }

        debug!(words = rom.len(), symbols = symbols.len(), "assembly complete");

        Ok(Program {
            words: rom,
            symbols,
            listing,
        })
    }
}
