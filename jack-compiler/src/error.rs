//! Error types for the Jack compiler.

use std::fmt;

use crate::tokenizer::LexicalError;

#[derive(Debug)]
pub enum CompileError {
    Lexical(LexicalError),
    Syntax { line: usize, message: String },
    Semantic { line: usize, message: String },
    Io(std::io::Error),
    /// A directory input with no `.jack` files in it.
    NoJackFiles(String),
}

impl std::error::Error for CompileError {}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lexical(e) => write!(f, "{e}"),
            Self::Syntax { line, message } => write!(f, "line {line}: {message}"),
            Self::Semantic { line, message } => write!(f, "line {line}: {message}"),
            Self::Io(e) => write!(f, "IO error: {e}"),
            Self::NoJackFiles(dir) => write!(f, "no .jack files found in directory '{dir}'"),
        }
    }
}

impl From<LexicalError> for CompileError {
    fn from(error: LexicalError) -> Self {
        Self::Lexical(error)
    }
}

impl From<std::io::Error> for CompileError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error)
    }
}
