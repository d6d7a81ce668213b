//! Token navigation and basic parsing operations.

use super::{ParseError, Parser};
use crate::token::TokenKind;

impl Parser {
    pub(super) fn current_kind(&self) -> &TokenKind {
        &self.ast.tokens[self.pos].kind
    }

    pub(super) fn current_line(&self) -> usize {
        self.ast.tokens[self.pos].span.line
    }

    pub(super) fn peek_kind(&self, offset: usize) -> &TokenKind {
        let idx = (self.pos + offset).min(self.ast.tokens.len() - 1);
        &self.ast.tokens[idx].kind
    }

    pub(super) fn is_eof(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    pub(super) fn advance(&mut self) {
        if !self.is_eof() {
            self.pos += 1;
        }
    }

    pub(super) fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.current_kind()) == std::mem::discriminant(kind)
    }

    pub(super) fn expect(&mut self, kind: TokenKind) -> Result<(), ParseError> {
        if self.check(&kind) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::new(
                format!(
                    "expected {} but found {}",
                    kind.describe(),
                    self.current_kind().describe()
                ),
                self.current_line(),
            ))
        }
    }

    pub(super) fn expect_identifier(&mut self) -> Result<String, ParseError> {
        match self.current_kind().clone() {
            TokenKind::Identifier(name) => {
                self.advance();
                Ok(name)
            }
            other => Err(ParseError::new(
                format!("expected identifier but found {}", other.describe()),
                self.current_line(),
            )),
        }
    }
}
