//! Jack Compiler - Main Entry Point
//!
//! Compiles Jack source (`Nand2Tetris` Project 11) directly to Hack VM code,
//! with no intermediate AST.
//!
//! # Usage
//! ```bash
//! cargo run <input.jack|directory>
//! ```

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

use std::env;
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

mod compilation_engine;
mod error;
mod symbol_table;
mod token;
mod tokenizer;
mod vm_writer;

use compilation_engine::CompilationEngine;
use error::CompileError;
use tokenizer::tokenize;

type Result<T> = std::result::Result<T, CompileError>;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() != 2 {
        eprintln!("Usage: {} <input.jack|directory>", args[0]);
        std::process::exit(1);
    }

    let input_path = Path::new(&args[1]);
    let result = if input_path.is_dir() {
        compile_directory(input_path)
    } else {
        compile_single_file(input_path)
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Single `.jack` file: output is the sibling `<name>.vm`.
fn compile_single_file(input_path: &Path) -> Result<()> {
    let output_path = sibling_vm_path(input_path);
    compile_file(input_path, &output_path)?;
    println!(
        "Compilation complete: {} -> {}",
        input_path.display(),
        output_path.display()
    );
    Ok(())
}

/// Directory of `.jack` files: each file compiles independently into its own
/// sibling `.vm` file, matching how the Jack toolchain defines one file per
/// class.
fn compile_directory(dir_path: &Path) -> Result<()> {
    let mut jack_files: Vec<PathBuf> = fs::read_dir(dir_path)?
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.extension() == Some(OsStr::new("jack")))
        .collect();
    jack_files.sort();

    if jack_files.is_empty() {
        return Err(CompileError::NoJackFiles(dir_path.display().to_string()));
    }

    for jack_file in &jack_files {
        let output_path = sibling_vm_path(jack_file);
        compile_file(jack_file, &output_path)?;
        println!(
            "Compilation complete: {} -> {}",
            jack_file.display(),
            output_path.display()
        );
    }
    Ok(())
}

fn compile_file(input_path: &Path, output_path: &Path) -> Result<()> {
    let source = fs::read_to_string(input_path)?;
    let tokens = tokenize(&source)?;

    let output_file = File::create(output_path)?;
    let writer = BufWriter::new(output_file);
    let mut engine = CompilationEngine::new(&tokens, writer);
    engine.compile_class()?;
    engine.into_inner().flush()?;
    Ok(())
}

#[inline]
fn sibling_vm_path(input_path: &Path) -> PathBuf {
    input_path.with_extension("vm")
}
