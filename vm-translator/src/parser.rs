use std::fs::File;
use std::io::{BufRead, BufReader};

use crate::error::VmError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    Arithmetic,
    Push,
    Pop,
    Label,
    Goto,
    If,
    Function,
    Return,
    Call,
}

pub struct Parser {
    /// `(original source line number, trimmed comment-free command text)`,
    /// blank and comment-only lines already filtered out.
    lines: Vec<(usize, String)>,
    current_line: usize,
    current_line_number: usize,
    current_command: String,
    /// Cached parts of the current command to avoid repeated parsing
    cached_parts: Vec<String>,
}

impl Parser {
    pub fn new(filename: &str) -> Result<Self, std::io::Error> {
        let file = File::open(filename)?;
        let reader = BufReader::new(file);

        let mut lines = Vec::new();
        for (line_number, line) in reader.lines().enumerate() {
            let line = line?;
            // Remove comments and whitespace
            let line = if let Some(pos) = line.find("//") {
                &line[..pos]
            } else {
                &line
            };

            let trimmed = line.trim();

            // Skip empty lines
            if !trimmed.is_empty() {
                lines.push((line_number + 1, trimmed.to_string()));
            }
        }

        Ok(Parser {
            lines,
            current_line: 0,
            current_line_number: 0,
            current_command: String::new(),
            cached_parts: Vec::new(),
        })
    }

    #[inline]
    pub fn has_more_commands(&self) -> bool {
        self.current_line < self.lines.len()
    }

    #[inline]
    pub fn advance(&mut self) {
        if self.has_more_commands() {
            let (line_number, command) =
                std::mem::take(&mut self.lines[self.current_line]);
            self.current_line_number = line_number;
            self.current_command = command;

            // Parse and cache command parts once
            self.cached_parts.clear();
            self.cached_parts.extend(
                self.current_command
                    .split_whitespace()
                    .map(|s| s.to_string()),
            );

            self.current_line += 1;
        }
    }

    /// The source line number of the command last returned by `advance`.
    #[inline]
    #[must_use]
    pub const fn line_number(&self) -> usize {
        self.current_line_number
    }

    #[inline]
    pub fn command_type(&self) -> CommandType {
        debug_assert!(!self.cached_parts.is_empty(), "Empty command");

        match self.cached_parts[0].as_str() {
            "push" => CommandType::Push,
            "pop" => CommandType::Pop,
            "label" => CommandType::Label,
            "goto" => CommandType::Goto,
            "if-goto" => CommandType::If,
            "function" => CommandType::Function,
            "return" => CommandType::Return,
            "call" => CommandType::Call,
            _ => CommandType::Arithmetic,
        }
    }

    fn malformed(&self) -> VmError {
        VmError::VmParseError {
            line: self.current_line_number,
            text: self.current_command.clone(),
        }
    }

    #[inline]
    pub fn arg1(&self) -> Result<&str, VmError> {
        match self.command_type() {
            CommandType::Arithmetic => Ok(&self.cached_parts[0]),
            CommandType::Return => Err(self.malformed()),
            _ => self
                .cached_parts
                .get(1)
                .map(String::as_str)
                .ok_or_else(|| self.malformed()),
        }
    }

    #[inline]
    pub fn arg2(&self) -> Result<i32, VmError> {
        match self.command_type() {
            CommandType::Push | CommandType::Pop | CommandType::Function | CommandType::Call => {
                self.cached_parts
                    .get(2)
                    .and_then(|part| part.parse().ok())
                    .ok_or_else(|| self.malformed())
            }
            _ => Err(self.malformed()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_vm_file(contents: &str) -> String {
        let path = std::env::temp_dir().join(format!(
            "vm_translator_parser_test_{}_{}.vm",
            std::process::id(),
            contents.len()
        ));
        std::fs::write(&path, contents).unwrap();
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn strips_comments_and_blank_lines() {
        let path = write_vm_file("// header\npush constant 7\n\n   \nadd // sum\n");
        let mut parser = Parser::new(&path).unwrap();
        std::fs::remove_file(&path).ok();

        parser.advance();
        assert_eq!(parser.command_type(), CommandType::Push);
        parser.advance();
        assert_eq!(parser.command_type(), CommandType::Arithmetic);
        assert!(!parser.has_more_commands());
    }

    #[test]
    fn tracks_original_line_numbers_across_skipped_lines() {
        let path = write_vm_file("// header\n\npush constant 7\nadd\n");
        let mut parser = Parser::new(&path).unwrap();
        std::fs::remove_file(&path).ok();

        parser.advance();
        assert_eq!(parser.line_number(), 3);
        parser.advance();
        assert_eq!(parser.line_number(), 4);
    }

    #[test]
    fn push_missing_index_is_a_parse_error() {
        let path = write_vm_file("push constant\n");
        let mut parser = Parser::new(&path).unwrap();
        std::fs::remove_file(&path).ok();

        parser.advance();
        let err = parser.arg2().unwrap_err();
        assert!(matches!(err, VmError::VmParseError { line: 1, .. }));
        assert!(err.to_string().contains("push constant"));
    }

    #[test]
    fn function_missing_local_count_is_a_parse_error() {
        let path = write_vm_file("function Main.main\n");
        let mut parser = Parser::new(&path).unwrap();
        std::fs::remove_file(&path).ok();

        parser.advance();
        assert!(parser.arg2().is_err());
    }

    #[test]
    fn push_with_non_numeric_index_is_a_parse_error() {
        let path = write_vm_file("push constant abc\n");
        let mut parser = Parser::new(&path).unwrap();
        std::fs::remove_file(&path).ok();

        parser.advance();
        assert!(parser.arg2().is_err());
    }

    #[test]
    fn label_missing_name_is_a_parse_error() {
        let path = write_vm_file("label\n");
        let mut parser = Parser::new(&path).unwrap();
        std::fs::remove_file(&path).ok();

        parser.advance();
        assert_eq!(parser.command_type(), CommandType::Label);
        assert!(parser.arg1().is_err());
    }

    #[test]
    fn well_formed_commands_parse_their_arguments() {
        let path = write_vm_file("push local 3\ncall Math.multiply 2\nreturn\n");
        let mut parser = Parser::new(&path).unwrap();
        std::fs::remove_file(&path).ok();

        parser.advance();
        assert_eq!(parser.arg1().unwrap(), "local");
        assert_eq!(parser.arg2().unwrap(), 3);

        parser.advance();
        assert_eq!(parser.arg1().unwrap(), "Math.multiply");
        assert_eq!(parser.arg2().unwrap(), 2);

        parser.advance();
        assert_eq!(parser.command_type(), CommandType::Return);
        assert!(parser.arg1().is_err());
    }
}
