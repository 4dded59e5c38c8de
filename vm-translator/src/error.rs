//! Error types for the VM translator.

use std::fmt;

#[derive(Debug)]
pub enum VmError {
    Io(std::io::Error),
    /// An arithmetic/logical command the parser didn't recognize as one of
    /// the nine fixed VM opcodes.
    UnknownArithmeticCommand(String),
    /// A `push`/`pop` segment name outside the eight fixed VM segments.
    UnknownSegment(String),
    /// A directory input with no `.vm` files in it.
    NoVmFiles(String),
    /// A command line that is missing a required argument, or whose
    /// argument isn't the shape its command type requires (e.g. `push
    /// constant` with no index, or `function Main.main` with no local
    /// count).
    VmParseError { line: usize, text: String },
}

impl std::error::Error for VmError {}

impl fmt::Display for VmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {e}"),
            Self::UnknownArithmeticCommand(cmd) => {
                write!(f, "unknown arithmetic command '{cmd}'")
            }
            Self::UnknownSegment(seg) => write!(f, "unknown segment '{seg}'"),
            Self::NoVmFiles(dir) => write!(f, "no .vm files found in directory '{dir}'"),
            Self::VmParseError { line, text } => {
                write!(f, "line {line}: malformed VM command '{text}'")
            }
        }
    }
}

impl From<std::io::Error> for VmError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error)
    }
}
