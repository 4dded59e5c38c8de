//! Converts Jack source text into a flat token sequence.
//!
//! Unlike a line-buffered scanner, this runs once over the whole source
//! string: the compilation engine needs one-token lookahead, which is
//! awkward to provide over a lazy reader.

use std::fmt;

use crate::token::{is_symbol, Keyword, SpannedToken, Token};

#[derive(Debug)]
pub struct LexicalError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl std::error::Error for LexicalError {}

impl fmt::Display for LexicalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}:{}: {}", self.line, self.column, self.message)
    }
}

/// Tokenizes an entire Jack source file.
///
/// Whitespace and comments (`//` to end of line, `/* ... */`, `/** ... */`)
/// are discarded; the block form terminates at the next `*/` with no
/// nesting.
pub fn tokenize(source: &str) -> Result<Vec<SpannedToken>, LexicalError> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    let mut line = 1;
    let mut line_start = 0usize;

    let col = |i: usize, line_start: usize| i - line_start + 1;

    while i < chars.len() {
        let c = chars[i];

        if c == '\n' {
            i += 1;
            line += 1;
            line_start = i;
            continue;
        }
        if c.is_whitespace() {
            i += 1;
            continue;
        }
        if c == '/' && chars.get(i + 1) == Some(&'/') {
            while i < chars.len() && chars[i] != '\n' {
                i += 1;
            }
            continue;
        }
        if c == '/' && chars.get(i + 1) == Some(&'*') {
            let start_line = line;
            let start_col = col(i, line_start);
            i += 2;
            loop {
                if i >= chars.len() {
                    return Err(LexicalError {
                        line: start_line,
                        column: start_col,
                        message: "unterminated block comment".to_string(),
                    });
                }
                if chars[i] == '\n' {
                    i += 1;
                    line += 1;
                    line_start = i;
                    continue;
                }
                if chars[i] == '*' && chars.get(i + 1) == Some(&'/') {
                    i += 2;
                    break;
                }
                i += 1;
            }
            continue;
        }
        if c.is_ascii_digit() {
            let start = i;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
            let text: String = chars[start..i].iter().collect();
            let value: u32 = text.parse().expect("digit run parses as an integer");
            if value > 32767 {
                return Err(LexicalError {
                    line,
                    column: col(start, line_start),
                    message: format!("integer constant {value} exceeds 32767"),
                });
            }
            tokens.push(SpannedToken {
                token: Token::IntConst(u16::try_from(value).expect("range checked above")),
                line,
            });
            continue;
        }
        if c == '"' {
            let start_line = line;
            let start_col = col(i, line_start);
            i += 1;
            let start = i;
            while i < chars.len() && chars[i] != '"' && chars[i] != '\n' {
                i += 1;
            }
            if i >= chars.len() || chars[i] == '\n' {
                return Err(LexicalError {
                    line: start_line,
                    column: start_col,
                    message: "unterminated string constant".to_string(),
                });
            }
            let text: String = chars[start..i].iter().collect();
            i += 1; // closing quote
            tokens.push(SpannedToken {
                token: Token::StringConst(text),
                line: start_line,
            });
            continue;
        }
        if c.is_alphabetic() || c == '_' {
            let start = i;
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let text: String = chars[start..i].iter().collect();
            let token = Keyword::parse(&text).map_or_else(
                || Token::Identifier(text.clone()),
                Token::Keyword,
            );
            tokens.push(SpannedToken { token, line });
            continue;
        }
        if is_symbol(c) {
            tokens.push(SpannedToken {
                token: Token::Symbol(c),
                line,
            });
            i += 1;
            continue;
        }

        return Err(LexicalError {
            line,
            column: col(i, line_start),
            message: format!("unexpected character '{c}'"),
        });
    }

    Ok(tokens)
}
