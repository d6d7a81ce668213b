//! Whitespace skipping for the lexer.
//!
//! Spyre has no lexer-level comment syntax: `/* ... */` block comments are
//! skipped over the token stream by the parser, not here, and there
//! is no line-comment form at all.

use super::Lexer;

impl<'a> Lexer<'a> {
    /// Skips `' '`, `'\t'`, `'\r'`, and `'\n'`.
    pub(super) fn skip_whitespace(&mut self) {
        while self.current_char().is_some_and(|c| c.is_whitespace()) {
            self.advance();
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::lexer::Lexer;
    use crate::token::TokenKind;

    #[test]
    fn skips_mixed_whitespace_between_tokens() {
        let mut lexer = Lexer::new("x \t\r\n y");
        let tokens = lexer.tokenize().unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Identifier("x".into()));
        assert_eq!(tokens[1].kind, TokenKind::Identifier("y".into()));
    }
}
