//! CLI entry point for the chip8-asm binary.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chip8_asm::emitter::write_words;
use chip8_asm::{assemble_with_options, AssemblerOptions, Program};
use clap::Parser;
#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
#[cfg(test)]
use tempfile as _;
use thiserror as _;
use tracing::Level;

/// Assembles CHIP-8 source into a raw big-endian ROM image loaded at 0x200.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// Assembly source file
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    /// Output ROM file
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    /// Print an address listing to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Leave undefined jump/call targets as address 0 instead of failing
    #[arg(long)]
    allow_unresolved: bool,

    /// One of `TRACE`, `DEBUG`, `INFO`, `WARN`, or `ERROR`
    #[arg(short, long, default_value_t = Level::WARN)]
    log_level: Level,
}

fn run_build(args: &Args) -> Result<(), String> {
    let source = fs::read_to_string(&args.input)
        .map_err(|e| format!("error: failed to read {}: {e}", args.input.display()))?;

    let options = AssemblerOptions {
        allow_unresolved: args.allow_unresolved,
    };
    let program = assemble_with_options(&source, options)
        .map_err(|e| e.format_for_stderr(&args.input.display().to_string()))?;

    write_output(&args.output, &program)
        .map_err(|e| format!("error: failed to write {}: {e}", args.output.display()))?;

    if args.verbose {
        print_listing(&program, &source);
    }

    println!(
        "Assembled {} ({} bytes) -> {}",
        args.input.display(),
        program.words.len() * 2,
        args.output.display()
    );
    Ok(())
}

fn write_output(path: &Path, program: &Program) -> io::Result<()> {
    let file = File::create(path)?;
    write_or_discard(path, BufWriter::new(file), &program.words)
}

/// Writes `words` to `out`, removing `path` if the write fails partway.
fn write_or_discard<W: Write>(path: &Path, mut out: W, words: &[u16]) -> io::Result<()> {
    let result = write_words(words, &mut out);
    drop(out);
    if result.is_err() {
        let _ = fs::remove_file(path);
    }
    result
}

fn print_listing(program: &Program, source: &str) {
    for line in format_listing(program, source) {
        eprintln!("{line}");
    }
}

fn format_listing(program: &Program, source: &str) -> Vec<String> {
    let source_lines: Vec<&str> = source.lines().collect();
    let mut labels = program.symbols.sorted().into_iter().peekable();
    let mut out = Vec::with_capacity(program.listing.len());

    for entry in &program.listing {
        while let Some((name, _)) = labels.next_if(|(_, sym)| sym.address <= entry.address) {
            out.push(format!("{name}:"));
        }
        let text = source_lines
            .get(entry.line.saturating_sub(1))
            .map_or("", |l| l.trim());
        out.push(format!(
            "{:03X}: {:04X}  ; line {}: {}",
            entry.address, entry.word, entry.line, text
        ));
    }
    out.extend(labels.map(|(name, _)| format!("{name}:")));
    out
}

fn main() -> ExitCode {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(io::stderr)
        .init();

    match run_build(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}
