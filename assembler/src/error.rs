//! Error types for the Hack assembler.
//!
//! Mirrors [`crate::parser::ParserError`]'s style: a small closed enum with a
//! manual `Display` impl instead of a error-derive crate.

use std::fmt;

use crate::parser::ParserError;

#[derive(Debug)]
pub enum AssemblyError {
    Parser(ParserError),
    Io(std::io::Error),
    /// An `@Xxx` line where `Xxx` starts with a digit but doesn't parse as a
    /// plain decimal literal.
    InvalidAddress { line: usize, text: String },
    /// A numeric `@` address outside the 15-bit range the A-instruction can encode.
    AddressOutOfRange { line: usize, address: u32 },
    /// A `dest`, `comp`, or `jump` mnemonic not present in the fixed encoding tables.
    UnknownMnemonic { line: usize, mnemonic: String },
    /// The same label was defined with `(Label)` more than once.
    DuplicateLabel { line: usize, symbol: String },
}

impl std::error::Error for AssemblyError {}

impl fmt::Display for AssemblyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parser(e) => write!(f, "{e}"),
            Self::Io(e) => write!(f, "IO error: {e}"),
            Self::InvalidAddress { line, text } => {
                write!(f, "line {line}: invalid address '@{text}'")
            }
            Self::AddressOutOfRange { line, address } => {
                write!(
                    f,
                    "line {line}: address {address} exceeds the 15-bit range (0-32767)"
                )
            }
            Self::UnknownMnemonic { line, mnemonic } => {
                write!(f, "line {line}: unknown mnemonic '{mnemonic}'")
            }
            Self::DuplicateLabel { line, symbol } => {
                write!(f, "line {line}: label '{symbol}' is already defined")
            }
        }
    }
}

impl From<ParserError> for AssemblyError {
    fn from(error: ParserError) -> Self {
        Self::Parser(error)
    }
}

impl From<std::io::Error> for AssemblyError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error)
    }
}
