//! VM Translator for the `Nand2Tetris` course
//!
//! This crate translates stack-machine VM commands (`Nand2Tetris` Project 7/8)
//! into Hack assembly: arithmetic and push/pop over all eight memory segments,
//! program flow (`label`/`goto`/`if-goto`), and the function call/return
//! protocol, plus the bootstrap sequence that starts a translated program.
//!
//! # Architecture
//!
//! - [`parser`]: strips comments/blank lines and classifies each VM command
//! - [`code_writer`]: emits the corresponding Hack assembly for each command
//! - [`error`]: the unified error type for both
//!
//! # Example
//!
//! ```rust
//! use vm_translator::CodeWriter;
//!
//! let path = std::env::temp_dir().join("vm_translator_doctest.asm");
//! let mut writer = CodeWriter::new(path.to_str().unwrap()).unwrap();
//! writer.write_push_pop("push", "constant", 7).unwrap();
//! writer.write_arithmetic("neg").unwrap();
//! writer.close().unwrap();
//!
//! let asm = std::fs::read_to_string(&path).unwrap();
//! assert!(asm.contains("@7"));
//! std::fs::remove_file(&path).ok();
//! ```

#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod code_writer;
pub mod error;
pub mod parser;

pub use code_writer::CodeWriter;
pub use error::VmError;
pub use parser::{CommandType, Parser};
