use std::env;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

mod code_writer;
mod error;
mod parser;

use code_writer::CodeWriter;
use error::VmError;
use parser::{CommandType, Parser};

type Result<T> = std::result::Result<T, VmError>;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() != 2 {
        eprintln!("Usage: {} <input.vm|directory>", args[0]);
        std::process::exit(1);
    }

    let input_path = Path::new(&args[1]);
    let result = if input_path.is_dir() {
        translate_directory(input_path)
    } else {
        translate_single_file(input_path)
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Single `.vm` file: output is the sibling `<name>.asm`, no bootstrap.
fn translate_single_file(input_path: &Path) -> Result<()> {
    let output_path = sibling_asm_path(input_path);
    let mut code_writer = CodeWriter::new(path_to_str(&output_path))?;

    code_writer.set_filename(path_to_str(input_path));
    translate_file(input_path, &mut code_writer)?;

    code_writer.close()?;
    println!(
        "Translation complete: {} -> {}",
        input_path.display(),
        output_path.display()
    );
    Ok(())
}

/// Directory of `.vm` files: all are concatenated, in filename order, into a
/// single `<DirName>.asm`, with the bootstrap sequence prepended.
fn translate_directory(dir_path: &Path) -> Result<()> {
    let mut vm_files: Vec<PathBuf> = fs::read_dir(dir_path)?
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.extension() == Some(OsStr::new("vm")))
        .collect();
    vm_files.sort();

    if vm_files.is_empty() {
        return Err(VmError::NoVmFiles(dir_path.display().to_string()));
    }

    let dir_name = dir_path
        .file_name()
        .and_then(OsStr::to_str)
        .unwrap_or("Output");
    let output_path = dir_path.join(format!("{dir_name}.asm"));
    let mut code_writer = CodeWriter::new(path_to_str(&output_path))?;

    code_writer.write_bootstrap()?;

    for vm_file in &vm_files {
        code_writer.set_filename(path_to_str(vm_file));
        translate_file(vm_file, &mut code_writer)?;
    }

    code_writer.close()?;
    println!(
        "Translation complete: {} -> {}",
        dir_path.display(),
        output_path.display()
    );
    Ok(())
}

/// Translates every command of one `.vm` file through an already-configured
/// [`CodeWriter`] (filename already set for `static` segment scoping).
fn translate_file(input_path: &Path, code_writer: &mut CodeWriter) -> Result<()> {
    let mut parser = Parser::new(path_to_str(input_path))?;

    while parser.has_more_commands() {
        parser.advance();

        match parser.command_type() {
            CommandType::Arithmetic => {
                let command = parser.arg1()?;
                code_writer.write_arithmetic(command)?;
            }
            CommandType::Push => {
                let segment = parser.arg1()?;
                let index = parser.arg2()?;
                code_writer.write_push_pop("push", segment, index)?;
            }
            CommandType::Pop => {
                let segment = parser.arg1()?;
                let index = parser.arg2()?;
                code_writer.write_push_pop("pop", segment, index)?;
            }
            CommandType::Label => code_writer.write_label(parser.arg1()?)?,
            CommandType::Goto => code_writer.write_goto(parser.arg1()?)?,
            CommandType::If => code_writer.write_if(parser.arg1()?)?,
            CommandType::Function => {
                code_writer.write_function(parser.arg1()?, parser.arg2()?)?;
            }
            CommandType::Call => {
                code_writer.write_call(parser.arg1()?, parser.arg2()?)?;
            }
            CommandType::Return => code_writer.write_return()?,
        }
    }

    Ok(())
}

#[inline]
fn sibling_asm_path(input_path: &Path) -> PathBuf {
    input_path.with_extension("asm")
}

#[inline]
fn path_to_str(path: &Path) -> &str {
    path.to_str().expect("input path must be valid UTF-8")
}
