//! Single-pass assembler for the CHIP-8 virtual machine.

use clap as _;
#[cfg(test)]
use tempfile as _;
use tracing_subscriber as _;

/// Single-pass driver, symbol resolution, and listing.
pub mod assembler;
/// Big-endian output serialization.
pub mod emitter;
/// Instruction encoding.
pub mod encoder;
/// Assembler error type.
pub mod errors;
/// Token source.
pub mod lexer;
/// Mnemonic table.
pub mod mnemonic;
/// Register, immediate, and label validation.
pub mod operand;
/// Symbol and backpatch tables.
pub mod symbols;

pub use assembler::{assemble, assemble_with_options, AssemblerOptions, Program};
pub use errors::AssembleError;
