//! Lexer for the Spyre programming language.
//!
//! Turns a source text into an ordered [`Token`](crate::token::Token)
//! sequence terminated by [`TokenKind::Eof`](crate::token::TokenKind::Eof).
//! Whitespace is skipped and otherwise ignored,
//! identifiers are matched against the keyword table, numeric literals
//! become `Int` or `Float` depending on the presence of a `.`, string
//! literals carry no escape processing, and punctuation is recognized by
//! longest match over the three-, two-, and one-character operator tables.
//!
//! # Examples
//!
//! ```
//! use spyre::lexer::Lexer;
//!
//! let mut lexer = Lexer::new("x : int; x = 1;");
//! let tokens = lexer.tokenize().unwrap();
//! assert!(!tokens.is_empty());
//! ```

mod cursor;
mod error;
mod skip;
mod tokens;

#[cfg(test)]
mod tests;

pub use error::LexError;

use crate::token::Token;

/// Tokenizes Spyre source text.
///
/// Holds the input text and a cursor (byte position, line, column) into it.
/// Unlike the reference lexer this is descended from, there is no
/// automatic-semicolon-insertion state to track: Spyre statements are
/// explicitly `;`-terminated, so the lexer never needs to remember the
/// previous token's kind.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer over `input`, starting at line 1, column 1.
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input,
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenizes the entire input, returning the token sequence ending in
    /// `Eof`, or the first [`LexError`] encountered.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace();
            if self.is_eof() {
                break;
            }
            tokens.push(self.next_token()?);
        }
        let eof_span = crate::token::Span::new(self.pos, self.pos, self.line, self.column);
        tokens.push(Token::new(crate::token::TokenKind::Eof, eof_span));
        Ok(tokens)
    }
}
