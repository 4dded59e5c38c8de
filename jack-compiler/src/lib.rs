//! Jack Compiler for the `Nand2Tetris` course
//!
//! This crate compiles Jack source files directly into Hack VM code: no
//! intermediate AST is built. Tokenizing, parsing, and VM code emission all
//! happen in one recursive-descent pass over the token stream.
//!
//! # Architecture
//!
//! - [`token`]: Jack's keyword/symbol/literal vocabulary
//! - [`tokenizer`]: whole-source lexical analysis into a flat token stream
//! - [`symbol_table`]: two-scope (class/subroutine) variable bookkeeping
//! - [`vm_writer`]: typed emitter for VM commands
//! - [`compilation_engine`]: the recursive-descent, emit-while-parse compiler
//! - [`error`]: unified error type across all of the above
//!
//! # Example
//!
//! ```rust
//! use jack_compiler::tokenizer::tokenize;
//! use jack_compiler::compilation_engine::CompilationEngine;
//!
//! let source = "class Main { function void main() { return; } }";
//! let tokens = tokenize(source).unwrap();
//! let mut engine = CompilationEngine::new(&tokens, Vec::new());
//! engine.compile_class().unwrap();
//! let vm_code = String::from_utf8(engine.into_inner()).unwrap();
//! assert_eq!(vm_code, "function Main.main 0\npush constant 0\nreturn\n");
//! ```

#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod compilation_engine;
pub mod error;
pub mod symbol_table;
pub mod token;
pub mod tokenizer;
pub mod vm_writer;

pub use compilation_engine::CompilationEngine;
pub use error::CompileError;
pub use symbol_table::SymbolTable;
pub use tokenizer::tokenize;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_a_class_with_a_field_and_a_method() {
        let source = "class Point { \
            field int x, y; \
            constructor Point new(int ax, int ay) { \
                let x = ax; \
                let y = ay; \
                return this; \
            } \
            method int getX() { return x; } \
        }";
        let tokens = tokenize(source).unwrap();
        let mut engine = CompilationEngine::new(&tokens, Vec::new());
        engine.compile_class().unwrap();
        let vm_code = String::from_utf8(engine.into_inner()).unwrap();

        assert!(vm_code.starts_with("function Point.new 0\n"));
        assert!(vm_code.contains("call Memory.alloc 1"));
        assert!(vm_code.contains("function Point.getX 0"));
        assert!(vm_code.contains("push this 0"));
    }

    #[test]
    fn lexical_errors_propagate_through_compile_error() {
        let err = tokenize("\"unterminated").unwrap_err();
        let compile_err: CompileError = err.into();
        assert!(matches!(compile_err, CompileError::Lexical(_)));
    }
}
