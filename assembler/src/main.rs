//! Hack Assembler - Main Entry Point
//!
//! A two-pass assembler for the Hack assembly language (`Nand2Tetris` Project 6).
//!
//! # Architecture
//! - **Pass 1**: Builds the symbol table by recording label positions
//! - **Pass 2**: Generates machine code, resolving all symbols
//!
//! # Usage
//! ```bash
//! cargo run <input.asm> [output.hack]
//! ```

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

use std::env;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::process;

mod code;
mod error;
mod parser;
mod symbol_table;

use error::AssemblyError;
use parser::{CommandType, ParserLines};
use symbol_table::SymbolTable;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Reads assembly file into memory
fn read_lines(path: &str) -> Result<Vec<String>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    reader
        .lines()
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(Into::into)
}

/// First pass: Build symbol table with label addresses
///
/// Scans through all lines and records the ROM address of each label.
/// Label definitions (L-commands) don't generate code, so they don't
/// increment the ROM address counter.
fn first_pass(lines: &[String], symbol_table: &mut SymbolTable) -> Result<()> {
    let mut rom_address = 0u16;
    let mut parser = ParserLines::from_lines(lines);

    while parser.advance() {
        match parser.command_type()? {
            CommandType::LCommand => {
                // Labels mark the next instruction's address
                let symbol = parser.symbol()?;
                if symbol_table.contains(symbol) {
                    return Err(AssemblyError::DuplicateLabel {
                        line: parser.line_number(),
                        symbol: symbol.to_string(),
                    }
                    .into());
                }
                symbol_table.add_entry(symbol, rom_address);
            }
            CommandType::ACommand | CommandType::CCommand => {
                // Actual instructions increment the address
                rom_address += 1;
            }
        }
    }

    Ok(())
}

/// Second pass: Generate machine code
///
/// Translates each instruction to binary:
/// - A-commands: Resolve symbols to addresses
/// - C-commands: Encode dest, comp, and jump fields
/// - L-commands: Skip (already processed in pass 1)
fn second_pass<W: Write>(
    lines: &[String],
    symbol_table: &mut SymbolTable,
    writer: &mut W,
) -> Result<()> {
    let mut ram_address = 16u16; // Variables start at RAM[16]
    let mut parser = ParserLines::from_lines(lines);

    while parser.advance() {
        match parser.command_type()? {
            CommandType::ACommand => {
                let symbol = parser.symbol()?;

                // A leading digit means a decimal literal; otherwise it's a
                // label or variable name resolved through the symbol table.
                let address = if symbol.starts_with(|c: char| c.is_ascii_digit()) {
                    let value: u32 = symbol.parse().map_err(|_| AssemblyError::InvalidAddress {
                        line: parser.line_number(),
                        text: symbol.to_string(),
                    })?;
                    if value > 32767 {
                        return Err(AssemblyError::AddressOutOfRange {
                            line: parser.line_number(),
                            address: value,
                        }
                        .into());
                    }
                    u16::try_from(value).expect("range checked above")
                } else {
                    symbol_table.get_or_insert(symbol, &mut ram_address)
                };

                let instruction = code::encode_a_instruction(address);
                writeln!(writer, "{instruction}")?;
            }
            CommandType::CCommand => {
                let dest = parser.dest()?.unwrap_or("");
                let comp = parser.comp()?.unwrap_or("");
                let jump = parser.jump()?.unwrap_or("");

                let (dest_valid, comp_valid, jump_valid) =
                    code::validate_mnemonics(dest, comp, jump);
                if !comp_valid {
                    return Err(AssemblyError::UnknownMnemonic {
                        line: parser.line_number(),
                        mnemonic: comp.to_string(),
                    }
                    .into());
                }
                if !dest_valid {
                    return Err(AssemblyError::UnknownMnemonic {
                        line: parser.line_number(),
                        mnemonic: dest.to_string(),
                    }
                    .into());
                }
                if !jump_valid {
                    return Err(AssemblyError::UnknownMnemonic {
                        line: parser.line_number(),
                        mnemonic: jump.to_string(),
                    }
                    .into());
                }

                let instruction = code::encode_c_instruction(dest, comp, jump);
                writeln!(writer, "{instruction}")?;
            }
            CommandType::LCommand => {
                // Already resolved in pass 1; label lines emit no code.
            }
        }
    }

    writer.flush()?;
    Ok(())
}

/// Determines the output file path
fn output_path(input: &str, explicit_output: Option<&str>) -> String {
    explicit_output.map_or_else(
        || input.replace(".asm", ".hack"),
        std::string::ToString::to_string,
    )
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    // Validate arguments
    if !(2..=3).contains(&args.len()) {
        eprintln!("Usage: {} <input.asm> [output.hack]", args[0]);
        eprintln!();
        eprintln!("Examples:");
        eprintln!("  {} Add.asm", args[0]);
        eprintln!("  {} Add.asm Add.hack", args[0]);
        process::exit(1);
    }

    let input_path = &args[1];

    // Read source file
    let lines = read_lines(input_path)?;

    // Initialize symbol table with predefined symbols
    let mut symbol_table = SymbolTable::new();

    // Pass 1: Build symbol table
    first_pass(&lines, &mut symbol_table)?;

    // Pass 2: Generate machine code
    let output = output_path(input_path, args.get(2).map(String::as_str));
    let output_file = File::create(&output)?;
    let mut writer = BufWriter::new(output_file);

    second_pass(&lines, &mut symbol_table, &mut writer)?;

    println!("Assembly completed. Output written to {output}");
    Ok(())
}
